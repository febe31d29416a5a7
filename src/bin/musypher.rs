//! musypher - the command-line converter
//!
//! Converts each MEI file given on the command line into a `<stem>_dump.cypher`
//! file, and optionally writes the APOC statements that load all of them.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use musypher::batch::{convert_paths, loader_statements};
use musypher::ConversionSettings;

/// Musypher - MEI to Cypher
#[derive(Parser, Debug)]
#[command(name = "musypher")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Convert MEI scores into Cypher CREATE dumps", long_about = None)]
struct Args {
    /// MEI files to convert; each dump is named <stem>_dump.cypher
    #[arg(value_name = "FILE", required = true)]
    files: Vec<PathBuf>,

    /// Report recovered problems (missing composer, unknown roles, ...)
    #[arg(short, long)]
    verbose: bool,

    /// Directory the dumps are written to
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Overwrite existing files without asking
    #[arg(short, long)]
    force: bool,

    /// Also write the statements loading every dump into FILE
    #[arg(short, long, value_name = "FILE")]
    loader: Option<PathBuf>,

    /// Dumps per loader statement (0 puts them all in one)
    #[arg(short = 'n', long, value_name = "N", default_value_t = 0)]
    files_per_statement: usize,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let default_filter = if args.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("cannot create output directory {}", args.output_dir.display()))?;

    let settings = ConversionSettings {
        verbose: args.verbose,
        ..ConversionSettings::default()
    };
    let reports = convert_paths(&args.files, &settings);

    let mut dumps = Vec::new();
    let mut failed = 0usize;

    for report in &reports {
        let result = match &report.outcome {
            Ok(result) => result,
            Err(e) => {
                eprintln!("Error: {}", e);
                failed += 1;
                continue;
            }
        };

        let name = report.dump_file_name();
        let target = args.output_dir.join(&name);
        match write_file(&target, &result.cypher, args.force) {
            Ok(true) => println!("{} -> {}", report.path.display(), target.display()),
            Ok(false) => println!("Kept existing {}", target.display()),
            Err(e) => {
                eprintln!("Error: {:#}", e);
                failed += 1;
                continue;
            }
        }
        dumps.push(name);
    }

    if let Some(loader) = &args.loader {
        let mut text = loader_statements(&dumps, args.files_per_statement).join(";\n");
        if !text.is_empty() {
            text.push_str(";\n");
        }
        if write_file(loader, &text, args.force)? {
            println!("Loader written to {}", loader.display());
        }
    }

    println!(
        "{} of {} file(s) converted",
        reports.len() - failed,
        reports.len()
    );
    Ok(if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Write `contents` to `path`, asking first if it exists. Returns whether the
/// file was written.
fn write_file(path: &Path, contents: &str, force: bool) -> Result<bool> {
    if path.exists() && !force && !confirm_overwrite(path)? {
        return Ok(false);
    }
    fs::write(path, contents).with_context(|| format!("cannot write {}", path.display()))?;
    Ok(true)
}

fn confirm_overwrite(path: &Path) -> Result<bool> {
    print!("{} already exists. Overwrite? [y/N] ", path.display());
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
