#[cfg(feature = "watch")]
pub mod enabled {
    use anyhow::Result;
    use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
    use organizer_core::organizer::SmartOrganizer;
    use std::sync::mpsc::channel;
    use std::thread;
    use std::time::Duration;
    use tracing::{error, info};

    /// Watches the source directory and funnels creation events into a
    /// single worker that owns the organizer. Passes are serialized through
    /// the worker's queue; overlapping passes would race on the undo log.
    pub fn watch_source(organizer: SmartOrganizer) -> Result<()> {
        let source = organizer.config().source_dir.clone();

        let (work_tx, work_rx) = channel::<()>();
        let worker = thread::spawn(move || {
            let mut organizer = organizer;
            while work_rx.recv().is_ok() {
                match organizer.organize() {
                    Ok(report) => info!(
                        "watch pass moved {} file(s), {} failure(s)",
                        report.actions.len(),
                        report.failures.len()
                    ),
                    Err(e) => error!("organize pass failed: {e}"),
                }
            }
        });

        let (tx, rx) = channel();
        let mut watcher: RecommendedWatcher = Watcher::new(
            tx,
            notify::Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;
        watcher.watch(&source, RecursiveMode::NonRecursive)?;

        println!("Watching {}...", source.display());
        for event in rx {
            let Ok(event) = event else { continue };
            if !matches!(event.kind, EventKind::Create(_)) {
                continue;
            }
            if event.paths.iter().any(|p| p.is_file()) && work_tx.send(()).is_err() {
                break;
            }
        }

        drop(work_tx);
        let _ = worker.join();
        Ok(())
    }
}

#[cfg(not(feature = "watch"))]
pub mod enabled {
    use anyhow::{bail, Result};
    use organizer_core::organizer::SmartOrganizer;

    pub fn watch_source(_organizer: SmartOrganizer) -> Result<()> {
        bail!("watch support not compiled in; rebuild with --features watch")
    }
}
