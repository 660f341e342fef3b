//! Sync command handler: one-shot reconciliation or watch mode.

use std::sync::Arc;
use std::time::Duration;

use daybook_core::config::Config;
use daybook_core::fs::RealFileSystem;
use daybook_sync::engine::{EngineConfig, SyncEngine, SyncEvent, SyncEventHandler, SyncOutcome};
use daybook_sync::webdav::WebdavStore;

/// Prints engine events to the console.
struct ConsoleEvents;

impl SyncEventHandler for ConsoleEvents {
    fn on_event(&self, event: SyncEvent) {
        match event {
            SyncEvent::CycleCompleted(outcome) => println!("  {}", describe(outcome)),
            SyncEvent::CycleFailed { message, .. } => eprintln!("  Sync failed: {}", message),
            SyncEvent::Halted { message } => {
                eprintln!("{}", message);
                eprintln!("Automatic sync is halted; fix the configuration and run `daybook sync` again.");
            }
        }
    }
}

fn describe(outcome: SyncOutcome) -> &'static str {
    match outcome {
        SyncOutcome::UpToDate => "Already up to date",
        SyncOutcome::Uploaded => "Uploaded local changes",
        SyncOutcome::Downloaded => "Downloaded remote changes",
        SyncOutcome::InitializedRemote => "Initialized the remote copy",
        SyncOutcome::SkippedGracePeriod => "Skipped: local file was just written",
        SyncOutcome::SkippedInFlight => "Skipped: a sync is already running",
        SyncOutcome::SkippedCircuitOpen => "Skipped: sync is halted until reconfiguration",
        SyncOutcome::Failed(_) => "Sync failed",
    }
}

pub fn handle_sync(config: &Config, watch: bool) -> Result<(), String> {
    let Some(settings) = &config.sync else {
        return Err(
            "sync is not configured; add a [sync] table to the daybook config file".to_string(),
        );
    };

    let remote = Arc::new(WebdavStore::new(
        &settings.server_url,
        &settings.username,
        &settings.password,
    ));
    let engine = Arc::new(SyncEngine::new(
        remote,
        Arc::new(RealFileSystem),
        EngineConfig {
            local_path: config.journal.path.clone(),
            remote_path: settings.remote_path.clone(),
            interval: Duration::from_secs(settings.interval_secs),
        },
        Arc::new(ConsoleEvents),
    ));

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| format!("failed to start async runtime: {}", e))?;

    runtime.block_on(async {
        if watch {
            engine.start();
            println!(
                "Syncing {} every {}s. Press Ctrl+C to stop.",
                settings.remote_path, settings.interval_secs
            );
            let _ = tokio::signal::ctrl_c().await;
            engine.stop();
            println!("\nSync stopped.");
            Ok(())
        } else {
            match engine.sync_now().await {
                SyncOutcome::Failed(_) => Err("sync failed".to_string()),
                outcome @ (SyncOutcome::SkippedGracePeriod
                | SyncOutcome::SkippedInFlight
                | SyncOutcome::SkippedCircuitOpen) => {
                    println!("{}", describe(outcome));
                    Ok(())
                }
                // Completed cycles are reported through the event channel.
                _ => Ok(()),
            }
        }
    })
}
