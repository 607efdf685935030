use crate::config::LoadConfig;
use crate::error::{IsbeError, IsbeResult};
use crate::fetch;
use crate::grades::{in_vocabulary_order, parse_grades};
use crate::ingest::ingest_workbook;
use crate::normalize::{is_recognized, HeaderIndex};
use crate::source::{CalamineWorkbook, Workbook};
use crate::store::{SchoolSink, SqliteSink};
use crate::types::{LoadSummary, SheetStatus};
use colored::Colorize;
use std::path::PathBuf;

/// Options for the load command, as parsed from the command line
#[derive(Debug, Default, Clone)]
pub struct LoadOptions {
    pub config: Option<PathBuf>,
    pub input: Option<PathBuf>,
    pub db: Option<PathBuf>,
    pub grades: Option<String>,
    pub append: bool,
    pub json: bool,
}

/// Resolve the effective configuration: file (if any), then overrides
pub fn resolve_config(options: &LoadOptions) -> IsbeResult<LoadConfig> {
    let base = match &options.config {
        Some(path) => LoadConfig::from_file(path)?,
        None => LoadConfig::default(),
    };
    let config = base.with_overrides(
        options.input.clone(),
        options.db.clone(),
        options.grades.clone(),
    );
    config.validate()?;
    Ok(config)
}

/// Execute the load command
pub fn load(options: LoadOptions) -> IsbeResult<()> {
    let config = resolve_config(&options)?;
    // Malformed grades of interest would silently match nothing
    parse_grades(&config.grades)?;

    if !options.json {
        println!("{}", "🏫 ISBE - Loading school directory".bold().green());
        println!("   Workbook: {}", config.workbook.display());
        println!("   Database: {}", config.database.display());
        println!("   Grades:   {}", config.grades.bright_yellow());
        println!();
    }

    let mut workbook = CalamineWorkbook::open(&config.workbook)?;
    let mut sink = SqliteSink::open(&config.database, config.schema())?;
    sink.create_table()?;
    if !options.append {
        sink.clear()?;
    }

    let summary = ingest_workbook(&mut workbook, &mut sink, &config.filter())?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }
    Ok(())
}

fn print_summary(summary: &LoadSummary) {
    for outcome in &summary.outcomes {
        match outcome.status {
            SheetStatus::Skipped => {
                println!("   {} {}", "–".dimmed(), outcome.sheet.dimmed());
            }
            SheetStatus::Completed => println!(
                "   {} {}: {} read, {} inserted, {} rejected",
                "✅".green(),
                outcome.sheet.bright_blue().bold(),
                outcome.rows_read,
                outcome.records_inserted,
                outcome.rejected
            ),
            SheetStatus::Stopped => {
                println!(
                    "   {} {}: stopped after {} inserted",
                    "⚠️".yellow(),
                    outcome.sheet.bright_blue().bold(),
                    outcome.records_inserted
                );
                if let Some(e) = &outcome.error {
                    println!("      {}", e.to_string().red());
                }
            }
        }
    }
    println!();
    println!(
        "{} {} sheets, {} reads, {} writes",
        "📊 Summary:".bold().green(),
        summary.sheets,
        summary.reads,
        summary.writes
    );
    let stopped = summary.stopped().count();
    if stopped > 0 {
        println!(
            "{}",
            format!("   {} sheet(s) stopped early, see log for details", stopped).yellow()
        );
    }
}

/// Execute the fetch command
pub fn fetch(url: String, output: PathBuf) -> IsbeResult<()> {
    println!("{}", "🌐 ISBE - Fetching workbook".bold().green());
    println!("   From: {}", url);
    println!("   To:   {}", output.display());

    let bytes = fetch::download(&url, &output)?;
    println!("{}", format!("✅ Saved {} bytes", bytes).bold().green());
    Ok(())
}

/// Execute the grades command - show what a grade spec expands to
pub fn grades(spec: String) -> IsbeResult<()> {
    let grades = parse_grades(&spec)?;
    let ordered = in_vocabulary_order(&grades);
    println!("{} {}", spec.bright_yellow(), "→".dimmed());
    println!("   {}", ordered.join(", ").bold());
    Ok(())
}

/// Execute the headers command - show canonical headers per sheet
pub fn headers(input: PathBuf) -> IsbeResult<()> {
    println!("{}", "🔍 ISBE - Sheet headers".bold().green());
    println!("   Workbook: {}\n", input.display());

    let mut workbook = CalamineWorkbook::open(&input)?;
    let names = workbook.sheet_names();
    if names.is_empty() {
        return Err(IsbeError::Workbook(format!(
            "{} has no sheets",
            input.display()
        )));
    }

    for name in names {
        let sheet = workbook.sheet(&name)?;
        let header = sheet.header();
        let index = HeaderIndex::from_row(header);
        let marker = if is_recognized(header) {
            "loaded".green()
        } else {
            "skipped".dimmed()
        };
        println!("   📄 {} ({})", name.bright_blue().bold(), marker);
        for (field, col) in index.columns() {
            println!("      {:>3}  {}", col, field.cyan());
        }
        for dup in index.duplicates() {
            println!("      {}", format!("duplicate: {}", dup).yellow());
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
