//! Find command implementation

use std::sync::Arc;

use anyhow::{Context, anyhow};
use colored::*;
use implnav_core::search::{QualifiedNameRenderer, RenderedItem, Renderer, TaskReport};
use implnav_core::{
    Delivery, Document, GotoImplementation, InMemoryProgram, NavigationConfig, Navigator,
    ResultPresenter, SearchResults, Symbol, TerminalState,
};
use serde_json::json;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::args::FindArgs;
use crate::console::CliConsole;

/// Run one goto-implementation invocation against a model file
pub async fn execute(args: &FindArgs, config: NavigationConfig, verbose: bool) -> anyhow::Result<()> {
    let console = CliConsole::new(verbose && !args.json);
    let program = InMemoryProgram::load(&args.model)
        .with_context(|| format!("Failed to load program model {}", args.model.display()))?;
    let document = program
        .document(&args.file)
        .ok_or_else(|| anyhow!("Document '{}' is not part of the model", args.file))?;
    let offset = cursor_offset(args, &document)?;
    console.info(&format!("Searching at {}:{}", document.path, offset));

    let action = GotoImplementation::for_program(Arc::new(program), config);
    let Some(prepared) = action.invoke(&document, offset)? else {
        if args.json {
            println!(
                "{}",
                json!({ "anchor": null, "state": "ABORTED", "candidates": [] })
            );
        } else {
            console.warn("No implementations found");
        }
        return Ok(());
    };

    let anchor = prepared.anchor().clone();
    let cancel = CancellationToken::new();
    let presenter = ConsolePresenter::new(args.json, args.cancel_after, cancel.clone());
    let navigator = ConsoleNavigator { quiet: args.json };
    let handle = prepared.start_with_token(Box::new(presenter), Box::new(navigator), cancel.clone());

    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("interrupt received, cancelling search");
            cancel.cancel();
        }
    });
    let report = handle.join().await;
    interrupt.abort();
    let report = report?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report_json(&anchor, &report))?);
    } else if report.state == TerminalState::Cancelled {
        console.warn(&format!(
            "Search cancelled after {} deliveries",
            report.deliveries
        ));
    }
    Ok(())
}

/// Byte offset from `--offset` or `--line`/`--column`
fn cursor_offset(args: &FindArgs, document: &Document) -> anyhow::Result<usize> {
    match (args.offset, args.line, args.column) {
        (Some(offset), _, _) if offset <= document.text.len() => Ok(offset),
        (Some(offset), _, _) => Err(anyhow!(
            "Offset {} is past the end of '{}'",
            offset,
            document.path
        )),
        (None, Some(line), Some(column)) => document
            .offset_at(line, column)
            .ok_or_else(|| anyhow!("Position {}:{} is not in '{}'", line, column, document.path)),
        _ => Err(anyhow!("Either --offset or --line and --column is required")),
    }
}

fn report_json(anchor: &Symbol, report: &TaskReport) -> serde_json::Value {
    let renderer = QualifiedNameRenderer;
    let candidates: Vec<_> = report
        .candidates
        .iter()
        .map(|candidate| {
            let item = renderer.render(candidate);
            json!({
                "id": candidate.id.as_str(),
                "label": item.label,
                "location": item.location,
            })
        })
        .collect();

    json!({
        "task_id": report.task_id.to_string(),
        "anchor": anchor.id.as_str(),
        "state": report.state.to_string(),
        "candidates": candidates,
        "deliveries": report.deliveries,
        "navigated": report.navigated,
    })
}

fn format_row(item: &RenderedItem) -> String {
    format!("  {} {}  {}", "+".green(), item.label.bold(), item.location.dimmed())
}

/// Streams the chooser list to stdout
struct ConsolePresenter {
    renderer: QualifiedNameRenderer,
    quiet: bool,
    cancel_after: Option<usize>,
    cancel: CancellationToken,
    delivered: usize,
    caption: String,
}

impl ConsolePresenter {
    fn new(quiet: bool, cancel_after: Option<usize>, cancel: CancellationToken) -> Self {
        Self {
            renderer: QualifiedNameRenderer,
            quiet,
            cancel_after,
            cancel,
            delivered: 0,
            caption: String::new(),
        }
    }
}

impl ResultPresenter for ConsolePresenter {
    fn seed(&mut self, candidates: &[Symbol]) {
        debug!("first batch of {} candidate(s)", candidates.len());
    }

    fn deliver_one(&mut self, candidate: &Symbol) -> Delivery {
        self.delivered += 1;
        if !self.quiet {
            println!("{}", format_row(&self.renderer.render(candidate)));
        }
        if self.cancel_after == Some(self.delivered) {
            self.cancel.cancel();
        }
        Delivery::Accepted
    }

    fn set_caption(&mut self, caption: &str) {
        if self.caption.is_empty() && !self.quiet {
            println!("{}", caption.bold().underline());
        }
        self.caption = caption.to_string();
    }

    fn dismiss(&mut self) {
        debug!("chooser closed");
    }

    fn on_complete(&mut self, results: &SearchResults, state: TerminalState) {
        if self.quiet {
            return;
        }
        match state {
            TerminalState::Finished => println!("{}", self.caption.dimmed()),
            TerminalState::Cancelled => {
                println!("{} ({} shown)", "cancelled".yellow(), results.len())
            }
        }
    }
}

/// Reports the jump instead of moving an editor caret
struct ConsoleNavigator {
    quiet: bool,
}

impl Navigator for ConsoleNavigator {
    fn navigate_to(&mut self, candidate: &Symbol) -> bool {
        if !self.quiet {
            println!(
                "{} {} ({})",
                "→".cyan().bold(),
                candidate.qualified_name(),
                candidate.location
            );
        }
        true
    }
}
