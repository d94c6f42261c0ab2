use std::{
    io::Read,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use sumitup::{
    config, document, logging,
    pipeline::{Analysis, Origin, SourceText, SumItUp, SummaryLength},
};

#[derive(Parser)]
#[command(
    name = "sumitup-cli",
    about = "Summarize text or a document from the terminal"
)]
struct Cli {
    /// Summary length between 100 and 400. Defaults to SUMMARY_LENGTH_DEFAULT.
    #[arg(long, global = true)]
    length: Option<u32>,
    /// Skip sentiment analysis.
    #[arg(long, global = true)]
    no_sentiment: bool,
    /// Print the analysis as JSON.
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Summarize text given as an argument, or `-` to read stdin.
    Text { text: String },
    /// Summarize a `.txt`, `.pdf` or `.docx` file.
    File { path: PathBuf },
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = config::init_config().context("Failed to load configuration")?;
    logging::init_tracing("warn");

    let length = SummaryLength::new(cli.length.unwrap_or(config.default_summary_length))?;
    let with_sentiment = !cli.no_sentiment;

    let source = match cli.command {
        Command::Text { text } => pasted(text)?,
        Command::File { path } => from_file(path).await?,
    };

    let service = SumItUp::from_config(config)
        .await
        .context("Failed to load summarization model")?;
    let analysis = service
        .analyze_source(source, length, with_sentiment)
        .await?;
    print_analysis(&analysis, cli.json)
}

fn pasted(text: String) -> Result<SourceText> {
    let text = if text == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read stdin")?;
        buffer
    } else {
        text
    };
    if text.trim().is_empty() {
        bail!("Please enter some text to summarize.");
    }
    Ok(SourceText {
        text,
        origin: Origin::Pasted,
    })
}

async fn from_file(path: PathBuf) -> Result<SourceText> {
    let name = display_name(&path);
    let (kind, text) = tokio::task::spawn_blocking(move || document::load_path(&path))
        .await
        .context("Document extraction task failed")?
        .context("Error processing document")?;
    Ok(SourceText {
        text,
        origin: Origin::Document { name, kind },
    })
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn print_analysis(analysis: &Analysis, json: bool) -> Result<()> {
    if json {
        let body = serde_json::to_string_pretty(analysis).context("Failed to encode analysis")?;
        println!("{body}");
    } else {
        print!("{}", analysis.render());
    }
    Ok(())
}
