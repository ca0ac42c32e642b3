//! Binary entrypoint for the `gridnest` layout tool.
use std::{
    io,
    path::{Path, PathBuf},
    process,
};

use clap::{Parser, Subcommand};
use config::{Layout, load_from_path, resolve_layout_path};
use logging as logshared;
use tracing_subscriber::{fmt, prelude::*};

/// Drag simulation over a mounted layout.
mod drag;

#[derive(Parser, Debug)]
#[command(name = "gridnest", about = "Nested grid layout tool", version)]
/// Command-line interface for the `gridnest` binary.
struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    command: Command,

    /// Logging controls
    #[command(flatten)]
    log: logshared::LogArgs,
}

#[derive(Subcommand, Debug)]
/// Top-level CLI subcommands.
enum Command {
    /// Load and validate a layout then exit.
    Check {
        /// Layout file to check (defaults to ~/.gridnest/layout.ron)
        path: Option<PathBuf>,

        /// Dump the parsed layout as JSON to stdout
        #[arg(long)]
        dump: bool,
    },
    /// Mount a layout, drag one widget and reconcile.
    Drag {
        /// Layout file (defaults to ~/.gridnest/layout.ron)
        path: Option<PathBuf>,

        /// Stable id of the widget to drag
        #[arg(long)]
        widget: String,

        /// Column to drop the widget at
        #[arg(long)]
        x: Option<u32>,

        /// Row to drop the widget at
        #[arg(long)]
        y: Option<u32>,

        /// Print the engine's saved layout as JSON instead of the tree
        #[arg(long)]
        json: bool,
    },
}

/// Resolve and load a layout, exiting with a readable message on failure.
fn load_or_exit(path: Option<&Path>) -> Layout {
    let resolved = match resolve_layout_path(path) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("{}", e.pretty());
            process::exit(1);
        }
    };
    match load_from_path(&resolved) {
        Ok(layout) => layout,
        Err(e) => {
            eprintln!("{}", e.pretty());
            process::exit(1);
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let env_filter = logshared::env_filter_from_spec(&cli.log.spec());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().without_time().with_writer(io::stderr))
        .try_init()
        .ok();

    match &cli.command {
        Command::Check { path, dump } => {
            let layout = load_or_exit(path.as_deref());
            if *dump {
                match serde_json::to_string_pretty(&layout) {
                    Ok(json) => println!("{json}"),
                    Err(e) => {
                        eprintln!("Failed to serialize layout: {e}");
                        process::exit(1);
                    }
                }
            } else {
                println!("OK ({} grids)", layout.grid_count());
            }
        }
        Command::Drag {
            path,
            widget,
            x,
            y,
            json,
        } => {
            let layout = load_or_exit(path.as_deref());
            let request = drag::DragRequest {
                widget: widget.as_str().into(),
                x: *x,
                y: *y,
            };
            match drag::run(&layout, &request) {
                Ok(outcome) => {
                    if *json {
                        match serde_json::to_string_pretty(&outcome.saved) {
                            Ok(out) => println!("{out}"),
                            Err(e) => {
                                eprintln!("Failed to serialize layout: {e}");
                                process::exit(1);
                            }
                        }
                    } else {
                        print!("{}", outcome.summary());
                    }
                }
                Err(e) => {
                    eprintln!("{e}");
                    process::exit(1);
                }
            }
        }
    }
}
