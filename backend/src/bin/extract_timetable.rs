//! timetable-extract - print a group's timetable from a sheet as JSON.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use timetable::config::AppConfig;
use timetable::extract;
use timetable::io::SheetLoader;
use timetable::models::GroupSelector;

#[derive(Parser)]
#[command(name = "timetable-extract")]
#[command(version, about = "Extract timetables from a schedule spreadsheet", long_about = None)]
struct Cli {
    /// Sheet to read (defaults to the configured sheet)
    sheet: Option<PathBuf>,

    /// Group name, or `all` for every roster group
    #[arg(short, long, default_value = "all")]
    group: String,

    /// Read the sheet as a weekly grid workbook instead
    #[arg(long)]
    grid: bool,

    /// Print compact JSON
    #[arg(long)]
    compact: bool,
}

fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_max_level(Level::WARN)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load().context("loading configuration")?;
    let path = cli.sheet.unwrap_or_else(|| config.sheet.path.clone());

    let loaded = SheetLoader::load_from_file(&path)
        .with_context(|| format!("loading sheet {}", path.display()))?;

    let output = if cli.grid {
        let lessons = extract::parse_weekly_grid(&loaded.sheet, &config.grid)
            .with_context(|| format!("parsing weekly grid {}", path.display()))?;
        serde_json::to_value(lessons)?
    } else {
        let selector = GroupSelector::from(cli.group.as_str());
        let roster = config.roster();
        let result = extract::extract_schedule(&loaded.sheet, &config.layout, &selector, &roster);
        serde_json::to_value(result)?
    };

    let rendered = if cli.compact {
        serde_json::to_string(&output)?
    } else {
        serde_json::to_string_pretty(&output)?
    };
    println!("{}", rendered);
    Ok(())
}
