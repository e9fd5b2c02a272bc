//! Photo Portfolio CLI tool
//!
//! A command-line front end for building photo portfolio PDFs.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use glob::glob;

use photo_portfolio::config::AppConfig;
use photo_portfolio::date::{parse_date_expression, resolve_date};
use photo_portfolio::pdf::{extract_metadata, page_footers, Assembler};
use photo_portfolio::registry::EntryHandle;
use photo_portfolio::session::{PortfolioSession, SessionObserver};

/// Photo Portfolio - Build paginated PDF portfolios from photos
#[derive(Parser)]
#[command(name = "photo-portfolio")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    # Build a portfolio from every JPEG in a folder
    photo-portfolio build \"shoot/*.jpg\"

    # Build to an explicit file with a session date and open it
    photo-portfolio build -o portfolio.pdf --date today --open a.jpg b.jpg

    # Interactive session reading commands from stdin
    photo-portfolio session")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a portfolio from photos in one step
    Build {
        /// Photos (in order). Supports glob patterns like "*.jpg" and file:// URIs
        inputs: Vec<String>,

        /// Output PDF file path (defaults to a timestamp name in the output directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Session date printed under the header (e.g., "today", "yesterday", "2026-01-14")
        #[arg(long)]
        date: Option<String>,

        /// Open the output file after creation
        #[arg(long)]
        open: bool,
    },

    /// Run an interactive session reading commands from stdin
    Session {
        /// Configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Session date printed under the header
        #[arg(long)]
        date: Option<String>,
    },

    /// Show information about a generated portfolio
    Info {
        /// PDF file to inspect
        input: PathBuf,
    },

    /// Show the effective configuration
    Config {
        /// Configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write the defaults to the configuration file
        #[arg(long)]
        init: bool,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Build { inputs, output, config, date, open } => {
            cmd_build(inputs, output, config, date, open)
        }
        Commands::Session { config, date } => cmd_session(config, date),
        Commands::Info { input } => cmd_info(&input),
        Commands::Config { config, init } => cmd_config(config, init),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

/// Prints session events the way a window would update its widgets
struct ConsoleObserver;

impl SessionObserver for ConsoleObserver {
    fn registry_changed(&mut self, count: usize) {
        eprintln!("Photos ({})", count);
    }

    fn document_generated(&mut self, path: &Path) {
        eprintln!("Generated: {}", path.display());
    }
}

/// Expand glob patterns, leaving URIs and literal paths as given
fn expand_globs(patterns: Vec<String>) -> anyhow::Result<Vec<String>> {
    let mut items = Vec::new();

    for pattern in patterns {
        let is_uri = pattern.contains("://");
        if !is_uri && (pattern.contains('*') || pattern.contains('?') || pattern.contains('[')) {
            let mut matched = Vec::new();
            for entry in glob(&pattern)? {
                match entry {
                    Ok(path) => matched.push(path),
                    Err(e) => eprintln!("Warning: glob error for {}: {}", pattern, e),
                }
            }
            if matched.is_empty() {
                bail!("No files matched pattern: {}", pattern);
            }
            // Sort each pattern's matches for consistent ordering
            matched.sort();
            items.extend(matched.into_iter().map(|path| path.display().to_string()));
        } else {
            items.push(pattern);
        }
    }

    Ok(items)
}

fn session_date(date: Option<&str>) -> anyhow::Result<Option<chrono::NaiveDate>> {
    match date {
        Some(expr) => Ok(resolve_date(&parse_date_expression(expr)?)),
        None => Ok(None),
    }
}

fn new_session<O: SessionObserver>(
    config: &AppConfig,
    date: Option<&str>,
    observer: O,
) -> anyhow::Result<PortfolioSession<O>> {
    let options = config.assembler_options(session_date(date)?);
    Ok(PortfolioSession::new(
        Assembler::new(options),
        &config.output_dir,
        observer,
    ))
}

/// Drop the inputs into a fresh session and generate once
fn cmd_build(
    inputs: Vec<String>,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
    date: Option<String>,
    open: bool,
) -> anyhow::Result<()> {
    let config = AppConfig::load(config.as_deref())?;
    let inputs = expand_globs(inputs)?;

    let mut session = new_session(&config, date.as_deref(), ())?;
    session.drop_uris(&inputs);

    eprintln!("Building portfolio from {} photos...", session.registry().count());
    let document = session.generate(output.as_deref())?;
    let created_at = document.created_at();

    eprintln!(
        "Output: {} ({} pages)",
        document.output_path().display(),
        document.page_count()
    );

    if open || config.open_after_generate {
        session.open_document(&created_at)?;
    }

    Ok(())
}

/// Line-oriented session on stdin
fn cmd_session(config: Option<PathBuf>, date: Option<String>) -> anyhow::Result<()> {
    let config = AppConfig::load(config.as_deref())?;
    let mut session = new_session(&config, date.as_deref(), ConsoleObserver)?;

    eprintln!("Commands: drop <uri-or-path>..., remove <handle>, list, generate [FILE], open [N], docs, quit");
    eprintln!("{}", session.photos_label());

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            continue;
        };
        let args: Vec<&str> = words.collect();

        // A failed command is reported and the session goes on
        if let Err(e) = run_session_command(&mut session, &config, command, &args) {
            eprintln!("Error: {:#}", e);
        }
        if command == "quit" {
            break;
        }
        io::stderr().flush()?;
    }

    Ok(())
}

fn run_session_command(
    session: &mut PortfolioSession<ConsoleObserver>,
    config: &AppConfig,
    command: &str,
    args: &[&str],
) -> anyhow::Result<()> {
    match command {
        "drop" => {
            let items = expand_globs(args.iter().map(|arg| arg.to_string()).collect())?;
            for handle in session.drop_uris(&items) {
                if let Some(path) = session.registry().get(handle) {
                    println!("{} {}", handle.value(), path.display());
                }
            }
        }
        "remove" => {
            let value = args.first().context("remove needs a handle")?;
            let value: u64 = value
                .trim_start_matches('#')
                .parse()
                .with_context(|| format!("Invalid handle: {}", value))?;
            session.remove(EntryHandle::from_value(value));
        }
        "list" => {
            println!("{}", session.listing());
        }
        "generate" => {
            let output = args.first().map(PathBuf::from);
            let document = session.generate(output.as_deref())?;
            let created_at = document.created_at();
            if config.open_after_generate {
                session.open_document(&created_at)?;
            }
        }
        "open" => {
            let document = match args.first() {
                Some(n) => {
                    let n: usize = n.parse().with_context(|| format!("Invalid document number: {}", n))?;
                    document_number(n).and_then(|index| session.documents().nth(index))
                }
                None => session.latest(),
            };
            let created_at = document.context("No such document")?.created_at();
            session.open_document(&created_at)?;
        }
        "docs" => {
            for (index, document) in session.documents().enumerate() {
                println!(
                    "{}. {}  {} ({} photos, {} pages)",
                    index + 1,
                    document.created_at().format("%Y-%m-%d %H:%M:%S"),
                    document.output_path().display(),
                    document.photos().len(),
                    document.page_count()
                );
            }
        }
        "quit" => {}
        other => bail!("Unknown command: {}", other),
    }
    Ok(())
}

/// Zero-based index for a one-based document number as printed by `docs`
fn document_number(n: usize) -> Option<usize> {
    n.checked_sub(1)
}

/// Show information about a generated portfolio
fn cmd_info(input: &Path) -> anyhow::Result<()> {
    let metadata = extract_metadata(input)?;

    println!("File: {}", input.display());
    println!("Pages: {}", metadata.page_count);
    if let Some(title) = &metadata.title {
        println!("Title: {}", title);
    }
    if let Some(author) = &metadata.author {
        println!("Author: {}", author);
    }

    for (index, footer) in page_footers(input)?.iter().enumerate() {
        println!("  {:>3}: {}", index + 1, footer.as_deref().unwrap_or("-"));
    }

    Ok(())
}

/// Print the effective configuration, optionally writing the defaults first
fn cmd_config(config: Option<PathBuf>, init: bool) -> anyhow::Result<()> {
    let path = match config {
        Some(path) => Some(path),
        None => AppConfig::default_path(),
    };

    if init {
        let path = path.as_deref().context("No configuration directory on this platform")?;
        AppConfig::default().save_to(path)?;
        eprintln!("Wrote: {}", path.display());
    }

    let effective = match path.as_deref() {
        Some(path) if path.exists() => AppConfig::load_from(path)?,
        _ => AppConfig::default(),
    };
    println!("{}", serde_json::to_string_pretty(&effective)?);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_number_is_one_based() {
        assert_eq!(document_number(0), None);
        assert_eq!(document_number(1), Some(0));
        assert_eq!(document_number(3), Some(2));
    }

    #[test]
    fn test_expand_globs_keeps_uris_and_literals() {
        let items = vec!["file:///tmp/a%20b.png".to_string(), "plain.png".to_string()];
        assert_eq!(expand_globs(items.clone()).unwrap(), items);
    }
}
