// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! waitset-trigger - WaitSet demo
//!
//! An `EventSource` offers two events, ACTIVATE and PERFORMED_ACTION, each
//! attachable to a WaitSet under its own trigger id. A producer thread
//! alternately activates the source and performs an action; the consumer
//! blocks on the WaitSet, runs the attached callback and resets the source.

mod source;

use anyhow::{Context, Result};
use clap::Parser;
use source::{EventSource, SourceEvent};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use waitset::{TriggerSnapshot, UserTrigger, WaitSet, WaitSetConfig};

const ACTIVATE_ID: u64 = 0;
const ACTION_ID: u64 = 1;
const SHUTDOWN_ID: u64 = u64::MAX;

/// WaitSet trigger demo
#[derive(Parser, Debug)]
#[command(name = "waitset-trigger")]
#[command(about = "Wait on two events of one origin from a background thread")]
struct Args {
    /// Pause between two events in milliseconds
    #[arg(short, long, default_value = "1000")]
    interval_ms: u64,

    /// Number of activate/action rounds (0 = until Ctrl+C)
    #[arg(short = 'n', long, default_value = "0")]
    iterations: u64,

    /// WaitSet capacity (default: WAITSET_CAPACITY or 128)
    #[arg(short, long)]
    capacity: Option<usize>,
}

fn main() {
    // Initialize logger for RUST_LOG-based debug output
    env_logger::init();

    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let config = match args.capacity {
        Some(capacity) => WaitSetConfig::with_capacity(capacity),
        None => WaitSetConfig::from_env(),
    };
    let waitset = Arc::new(WaitSet::from_config(&config).context("creating waitset")?);

    let source = EventSource::new();
    source
        .attach_to_waitset(
            &waitset,
            SourceEvent::Activate,
            ACTIVATE_ID,
            Some(call_on_activate),
        )
        .context("attaching ACTIVATE")?;
    source
        .attach_to_waitset(
            &waitset,
            SourceEvent::PerformedAction,
            ACTION_ID,
            Some(EventSource::call_on_action),
        )
        .context("attaching PERFORMED_ACTION")?;

    // Attached last so a batch ending the run lists source events first
    let shutdown = UserTrigger::new();
    shutdown
        .attach_to(&waitset, SHUTDOWN_ID, None)
        .context("attaching shutdown trigger")?;

    let ctrlc_shutdown = Arc::clone(&shutdown);
    ctrlc::set_handler(move || ctrlc_shutdown.trigger()).context("installing Ctrl+C handler")?;

    log::info!(
        "[demo] waitset ready: {} of {} slots used",
        waitset.len(),
        waitset.capacity()
    );

    let consumer = {
        let waitset = Arc::clone(&waitset);
        thread::spawn(move || consume(&waitset))
    };

    let producer = {
        let source = Arc::clone(&source);
        let shutdown = Arc::clone(&shutdown);
        let interval = Duration::from_millis(args.interval_ms);
        let iterations = args.iterations;
        thread::spawn(move || produce(&source, &shutdown, interval, iterations))
    };

    producer
        .join()
        .map_err(|_| anyhow::anyhow!("producer thread panicked"))?;
    consumer
        .join()
        .map_err(|_| anyhow::anyhow!("consumer thread panicked"))?;

    log::info!("[demo] shut down");
    Ok(())
}

fn call_on_activate(source: &EventSource) {
    println!("activated with code: {}", source.activation_code());
}

fn consume(waitset: &WaitSet) {
    while !dispatch(&waitset.wait()) {}
    log::debug!("[demo] consumer received shutdown");
}

/// Handle one batch in full; returns `true` once shutdown was part of it.
fn dispatch(snapshots: &[TriggerSnapshot]) -> bool {
    let mut shutdown = false;
    for snapshot in snapshots {
        match snapshot.trigger_id() {
            ACTIVATE_ID | ACTION_ID => {
                snapshot.call();
                if let Some(source) = snapshot.origin::<EventSource>() {
                    source.reset();
                }
            }
            SHUTDOWN_ID => shutdown = true,
            other => log::warn!("[demo] unexpected trigger id {}", other),
        }
    }
    shutdown
}

fn produce(source: &EventSource, shutdown: &UserTrigger, interval: Duration, iterations: u64) {
    let mut activation_code = 1;
    let mut round = 0;

    while !shutdown.has_triggered() {
        if iterations != 0 && round >= iterations {
            shutdown.trigger();
            break;
        }

        thread::sleep(interval);
        source.activate(activation_code);
        activation_code += 1;

        thread::sleep(interval);
        source.perform_action();

        round += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shutdown_batch_still_handles_action() {
        let waitset = WaitSet::new();
        let shutdown = UserTrigger::new();
        // Shutdown first in attachment order: the whole batch must still run
        shutdown
            .attach_to(&waitset, SHUTDOWN_ID, None)
            .expect("attach shutdown");
        let source = EventSource::new();
        source
            .attach_to_waitset(&waitset, SourceEvent::PerformedAction, ACTION_ID, None)
            .expect("attach action");

        source.perform_action();
        shutdown.trigger();

        let batch = waitset.try_wait();
        assert_eq!(batch.len(), 2);
        assert!(dispatch(&batch));
        assert!(!source.has_performed_action());
    }

    #[test]
    fn test_dispatch_without_shutdown_keeps_running() {
        let waitset = WaitSet::new();
        let source = EventSource::new();
        source
            .attach_to_waitset(&waitset, SourceEvent::Activate, ACTIVATE_ID, None)
            .expect("attach activate");

        source.activate(7);
        assert!(!dispatch(&waitset.try_wait()));
        assert!(!source.is_activated());
    }
}
