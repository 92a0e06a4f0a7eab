pub mod cli;
pub mod fs;
pub mod model;
pub mod processor;
pub mod writer;

pub use model::{Command, CommandKind, Diagnostic, ParsedScnFile, Scene, SceneState};
pub use processor::{LoadError, LoadOptions, ParseMode, load_scene, load_scene_from_str};

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::fs::{FileSystem, OsFileSystem};

pub fn run() -> anyhow::Result<ExitCode> {
    let args = cli::Cli::parse();
    init_tracing(args.log_filter());

    let fs = OsFileSystem;
    let mut stdout = io::stdout().lock();

    // 1. ── Lex (optional listing) ─────────────────────────────────────
    if args.tokens {
        let text = fs
            .read_file_to_text(&args.input)
            .with_context(|| format!("Reading {}", args.input.display()))?;
        writer::report::emit_tokens(&mut stdout, &args.input, &text)
            .with_context(|| "Writing token listing")?;
    }

    // 2. ── Load ───────────────────────────────────────────────────────
    let options = LoadOptions { mode: args.mode };
    let (scene, diagnostics) = load_scene(&args.input, &options, &fs)
        .with_context(|| format!("Loading {}", args.input.display()))?;

    // 3. ── Report ─────────────────────────────────────────────────────
    writer::report::emit(&mut stdout, &scene, &diagnostics).with_context(|| "Writing report")?;
    if args.commands {
        write!(stdout, "{}", writer::report::render_commands(&scene))?;
    }
    if let Some(path) = &args.json {
        writer::json::emit(&scene, &diagnostics, path)
            .with_context(|| format!("Writing {}", path.display()))?;
    }

    info!("main exiting");
    Ok(if scene.is_loaded() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}
