//! tabletest CLI: generate table-driven test scaffolds for a Go tree.
//!
//! Thin shell over `tabletest-core`: argument parsing, logging setup, report output.

use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use tracing::error;

use tabletest_core::tools::{run_init, CommandPostProcessor};
use tabletest_core::types::RunReport;
use tabletest_core::{load_config, run_generate};

/// tabletest: table-driven test scaffolds for Go functions.
#[derive(Parser)]
#[command(name = "tabletest", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate `_test.go` scaffolds for every function under a directory
    Generate {
        /// Root directory to scan (default: current directory)
        path: Option<PathBuf>,

        /// Overwrite existing test files
        #[arg(long, short)]
        force: bool,

        /// Copy the source file's imports into new test files
        #[arg(long)]
        copy_imports: bool,

        /// Skip the formatter and import organizer
        #[arg(long)]
        no_format: bool,

        /// Output the run report as JSON instead of human-readable text
        #[arg(long)]
        json: bool,
    },
    /// Install goimports and mockery, then generate mocks in the current directory
    Init {
        /// Print the commands without running them
        #[arg(long)]
        dry_run: bool,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn resolve_root(root: Option<PathBuf>) -> PathBuf {
    let root = match root {
        Some(p) => p,
        None => std::env::current_dir().unwrap_or_else(|e| {
            error!(error = %e, "Could not determine current directory");
            std::process::exit(1);
        }),
    };
    root.canonicalize().unwrap_or_else(|e| {
        error!(path = %root.display(), error = %e, "Path not found");
        std::process::exit(1);
    })
}

fn print_report(report: &RunReport) {
    println!("Root:       {}", report.root);
    println!("Scanned:    {} files", report.files_scanned);
    println!("Functions:  {}", report.functions);
    println!("Methods:    {} (skipped)", report.methods_skipped);
    if report.uncallable_skipped > 0 {
        println!("Init/blank: {} (skipped)", report.uncallable_skipped);
    }
    println!("Structs:    {}", report.structs);
    for path in &report.written {
        println!("  wrote    {path}");
    }
    for path in &report.skipped {
        println!("  exists   {path}");
    }
    eprintln!("\n{} written, {} skipped in {}ms", report.written.len(), report.skipped.len(), report.time_ms);
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tabletest=info".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { path, force, copy_imports, no_format, json } => {
            let root = resolve_root(path);
            let mut config = load_config(&root).unwrap_or_else(|e| {
                error!(error = %e, "Could not load config");
                std::process::exit(1);
            });
            config.overwrite |= force;
            config.copy_imports |= copy_imports;
            if no_format {
                config.format = false;
            }

            let post = CommandPostProcessor::from_config(&config);
            let report = run_generate(&config, &post).unwrap_or_else(|e| {
                error!(error = %e, "Generation failed");
                std::process::exit(1);
            });

            if json {
                match serde_json::to_string_pretty(&report) {
                    Ok(text) => println!("{text}"),
                    Err(e) => {
                        error!(error = %e, "Could not serialize report");
                        std::process::exit(1);
                    }
                }
            } else {
                print_report(&report);
            }
        }
        Commands::Init { dry_run } => {
            let root = resolve_root(None);
            if let Err(e) = run_init(&root, dry_run) {
                error!(error = %e, "Init failed");
                std::process::exit(1);
            }
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "tabletest", &mut std::io::stdout());
        }
    }
}
