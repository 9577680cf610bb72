//! Symbols command implementation

use std::path::Path;

use anyhow::Context;
use implnav_core::InMemoryProgram;

use crate::console::CliConsole;

/// List every declaration of a program model
pub fn execute(model: &Path) -> anyhow::Result<()> {
    let console = CliConsole::new(true);
    let program = InMemoryProgram::load(model)
        .with_context(|| format!("Failed to load program model {}", model.display()))?;

    console.print_header(&format!("Symbols in {}", model.display()));
    let rows = symbol_rows(&program);
    let widths = [
        rows.iter().map(|row| row[0].len()).max().unwrap_or(0),
        rows.iter().map(|row| row[1].len()).max().unwrap_or(0),
    ];
    for row in &rows {
        let columns: Vec<&str> = row.iter().map(String::as_str).collect();
        console.print_table_row(&columns, &widths);
    }

    console.info("");
    console.success(&format!("{} symbols", program.len()));
    Ok(())
}

fn symbol_rows(program: &InMemoryProgram) -> Vec<[String; 3]> {
    program
        .symbols()
        .into_iter()
        .map(|symbol| {
            [
                symbol.id.to_string(),
                symbol.kind.to_string(),
                symbol.location.to_string(),
            ]
        })
        .collect()
}
