// Declare modules
pub mod cli;
pub mod config;
pub mod formatter;
pub mod models;
pub mod patterns;
pub mod scanner;
pub mod session;
pub mod store;

use anyhow::{Context, Result};
use clap::Parser;
use std::env;
use std::io::{self, BufRead, Write};
use std::thread;

use self::cli::Cli;
use self::config::{config_dir, resolve_config};
use self::formatter::OutputGenerator;
use self::scanner::{normalize_root, Scanner};
use self::store::CollectionStore;

/// Initializes components and runs the interactive loop.
pub fn run() -> Result<()> {
    // 1. Parse Args
    let args = Cli::parse();

    // 2. Resolve Configuration
    let current_dir = env::current_dir().context("Failed to get current directory")?;
    // Without a home directory there is nothing to remember; carry on with defaults.
    let settings_dir = config_dir()
        .map_err(|err| log::warn!("{:#}; settings and the remembered directory are skipped", err))
        .ok();
    let config = resolve_config(args, settings_dir.as_deref(), &current_dir)?;

    println!(
        "Collection file: {} (patterns: {})",
        config.content_path.display(),
        patterns::join_patterns(&config.patterns)
    );

    // 3. Load what previous runs collected
    let mut store = CollectionStore::open(&config.content_path);
    let scanner = Scanner::new(&config.patterns);

    // 4. Loop until an empty line, EOF or Ctrl-C
    watch_interrupt();
    // stdout stays unlocked so the interrupt thread can still print.
    interact(io::stdin().lock(), io::stdout(), &scanner, &mut store)?;

    println!("Done.");
    Ok(())
}

/// Reads folder paths line by line, scanning each and persisting the result.
///
/// Only errors writing to `output` end the loop early; everything else is
/// reported and the next path is read.
pub fn interact<R: BufRead, W: Write>(
    mut input: R,
    mut output: W,
    scanner: &Scanner,
    store: &mut CollectionStore,
) -> Result<()> {
    let mut line = String::new();

    loop {
        write!(output, "\nFolder to process (empty line to finish): ")?;
        output.flush()?;

        line.clear();
        match input.read_line(&mut line) {
            Ok(0) => {
                writeln!(output)?;
                break;
            }
            Ok(_) => {}
            Err(err) if err.kind() == io::ErrorKind::Interrupted => break,
            Err(err) => {
                log::error!("Failed to read input: {}", err);
                break;
            }
        }

        let raw = line.trim();
        if raw.is_empty() {
            writeln!(output, "No path given, finishing.")?;
            break;
        }

        process_path(raw, &mut output, scanner, store)?;
    }

    Ok(())
}

fn process_path<W: Write>(
    raw: &str,
    output: &mut W,
    scanner: &Scanner,
    store: &mut CollectionStore,
) -> Result<()> {
    let root = normalize_root(raw);

    if !root.exists() {
        writeln!(output, "'{}' does not exist, try again.", raw)?;
        return Ok(());
    }
    if !root.is_dir() {
        writeln!(output, "'{}' is not a directory, try again.", raw)?;
        return Ok(());
    }

    let Some(record) = scanner.scan_folder(&root) else {
        writeln!(output, "No matching files in '{}'.", raw)?;
        return Ok(());
    };

    let files = record.file_count();
    let path = record.path.clone();
    match store.append(record) {
        Ok(()) => writeln!(
            output,
            "Added {} ({}), {} entries in {}.",
            path,
            OutputGenerator::summary(1, files),
            store.len(),
            store.path().display()
        )?,
        Err(err) => {
            log::error!("{:#}", err);
            writeln!(
                output,
                "Added {} but saving failed; it will be written with the next folder.",
                path
            )?;
        }
    }

    Ok(())
}

/// Ctrl-C ends the process cleanly. Each folder is saved as soon as it is
/// added, so nothing is pending when the signal arrives.
fn watch_interrupt() {
    let spawned = thread::Builder::new()
        .name("ctrl-c".to_string())
        .spawn(|| {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(err) => {
                    log::warn!("Ctrl-C handling unavailable: {}", err);
                    return;
                }
            };
            runtime.block_on(async {
                match tokio::signal::ctrl_c().await {
                    Ok(()) => {
                        println!("\nInterrupted, finishing.");
                        std::process::exit(0);
                    }
                    Err(err) => log::warn!("Ctrl-C handling unavailable: {}", err),
                }
            });
        });

    if let Err(err) = spawned {
        log::warn!("Ctrl-C handling unavailable: {}", err);
    }
}
