use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use anyhow::{Context, Result};
use clap::Parser;
use duelwatch_core::config::target;
use duelwatch_core::{
    CardMonitor, ComboTable, MemoryReader, ProcessHandle, SampleSet, ShutdownSignal,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod prompt;

#[derive(Parser)]
#[command(name = "duelwatch")]
#[command(about = "Card combo monitor for the duel client")]
struct Args {
    /// JSON combo table; the built-in table is used when absent.
    #[arg(short, long)]
    combos: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("duelwatch=info".parse()?)
                .add_directive("duelwatch_core=info".parse()?),
        )
        .init();

    let args = Args::parse();

    info!("Duelwatch starting...");

    let combos = match &args.combos {
        Some(path) => match ComboTable::load(path) {
            Ok(table) => table,
            Err(e) => {
                warn!(
                    "Failed to load combo table from {}: {}; using built-in table",
                    path.display(),
                    e
                );
                ComboTable::builtin()
            }
        },
        None => ComboTable::builtin(),
    };
    info!("Loaded {} combo rules", combos.len());

    // Discovery failure is fatal: without a target process and module base
    // there is nothing to monitor.
    let process = ProcessHandle::find_and_open()
        .context("target process is not running or cannot be opened")?;
    let entry_address = process.module_base.wrapping_add(target::BASE_OFFSET);
    info!(
        "Found {} (pid {}), {} base {:#x}, chain entry {:#x}",
        target::PROCESS_NAME,
        process.pid,
        target::MODULE_NAME,
        process.module_base,
        entry_address
    );

    let shutdown = Arc::new(ShutdownSignal::new());
    let shutdown_ctrlc = Arc::clone(&shutdown);
    ctrlc::set_handler(move || {
        info!("Received shutdown signal, stopping...");
        shutdown_ctrlc.trigger();
    })?;

    let seen = Arc::new(SampleSet::new());

    // Constructed before the scope so the spawned thread can borrow it.
    // The scope joins the monitor before `monitor` and `process` drop, so
    // the handle is closed exactly once and only after sampling has
    // stopped.
    let monitor = CardMonitor::new(
        MemoryReader::new(&process),
        entry_address,
        &target::OFFSET_CHAIN,
        Arc::clone(&seen),
    );

    thread::scope(|s| {
        s.spawn(|| monitor.run(&shutdown));

        prompt::run(&seen, &combos, &shutdown);

        shutdown.trigger();
    });

    info!("Shutdown complete");
    Ok(())
}
