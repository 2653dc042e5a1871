//! Exports a small report to `hello.csv`.
//!
//! ```text
//! report-export [--out-dir DIR] [--delimiter ;] [--options options.yaml]
//! ```
//!
//! Set `RUST_LOG=fluent_csv=trace` to watch the rows being written.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use fluent_csv::{Column, TemplateBuilder, TemplateOptions};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "report-export", about = "Export a sample report as CSV")]
struct Cli {
    /// Directory that receives hello.csv (created when missing).
    #[arg(long, default_value_os_t = std::env::temp_dir())]
    out_dir: PathBuf,

    /// Column separator.
    #[arg(long, default_value = ";")]
    delimiter: String,

    /// YAML file with template options; overrides --delimiter.
    #[arg(long)]
    options: Option<PathBuf>,
}

struct Record {
    id: u32,
    name: String,
}

struct Report {
    items: Vec<Record>,
}

fn sample_report() -> Report {
    let names = ["Bob", "Alice", "Jason", "Kurt", "Bruce \"The Boss\" Springsteen"];
    Report {
        items: names
            .iter()
            .zip(1..)
            .map(|(name, id)| Record {
                id,
                name: name.to_string(),
            })
            .collect(),
    }
}

fn load_options(cli: &Cli) -> Result<TemplateOptions> {
    match &cli.options {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            Ok(TemplateOptions::from_yaml(&text)?)
        }
        None => Ok(TemplateOptions {
            delimiter: cli.delimiter.clone(),
            ..TemplateOptions::default()
        }),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let options = load_options(&cli)?;

    let template = TemplateBuilder::<Report, Record>::create()
        .add_columns(|columns| {
            columns.push(Column::new("Id", |r: &Record| r.id));
            columns.push(Column::field("Name", |r: &Record| &r.name));
        })
        .with_projector(|report| Box::new(report.items.iter()))
        .with_options(options)
        .build()?;

    // The renderer never creates directories.
    tokio::fs::create_dir_all(&cli.out_dir)
        .await
        .with_context(|| format!("creating {}", cli.out_dir.display()))?;

    let path = cli.out_dir.join("hello.csv");
    let summary = template.render_to_file(&path, &sample_report()).await?;

    info!(path = %path.display(), rows = summary.rows, "report exported");
    println!("{}", path.display());
    Ok(())
}
