//! File system watcher for watch mode

use notify::{Config, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::time::Duration;

const DEBOUNCE_MS: u64 = 300;

/// Watches a report file and signals when it is rewritten
pub struct ReportWatcher {
    _watcher: RecommendedWatcher,
    receiver: Receiver<notify::Result<notify::Event>>,
    target: PathBuf,
}

fn is_create_or_modify(kind: &EventKind) -> bool {
    matches!(kind, EventKind::Create(_) | EventKind::Modify(_))
}

impl ReportWatcher {
    /// Start watching the report file's directory. The file itself may not
    /// exist yet; test runners typically replace it wholesale per run.
    pub fn watch(report: &Path) -> notify::Result<Self> {
        let (tx, rx) = channel();
        let mut watcher = RecommendedWatcher::new(
            move |res| {
                let _ = tx.send(res);
            },
            Config::default().with_poll_interval(Duration::from_millis(DEBOUNCE_MS)),
        )?;

        let dir = report.parent().filter(|p| !p.as_os_str().is_empty());
        watcher.watch(dir.unwrap_or(Path::new(".")), RecursiveMode::NonRecursive)?;

        Ok(Self {
            _watcher: watcher,
            receiver: rx,
            target: report.to_path_buf(),
        })
    }

    /// Whether an event touches the watched report file
    fn event_hits_target(&self, event: &notify::Event) -> bool {
        if !is_create_or_modify(&event.kind) {
            return false;
        }
        event
            .paths
            .iter()
            .any(|p| p.file_name() == self.target.file_name())
    }

    /// Block until the report file changes, then drain follow-up events for
    /// DEBOUNCE_MS so one rewrite triggers one re-render. Returns false on
    /// channel shutdown.
    pub fn wait_for_change(&self) -> bool {
        loop {
            match self.receiver.recv_timeout(Duration::from_secs(3600)) {
                Ok(Ok(event)) => {
                    if self.event_hits_target(&event) {
                        break;
                    }
                }
                Ok(Err(_)) => continue,
                Err(std::sync::mpsc::RecvTimeoutError::Timeout) => continue,
                Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => return false,
            }
        }

        std::thread::sleep(Duration::from_millis(DEBOUNCE_MS));
        while let Ok(ev) = self.receiver.try_recv() {
            let _ = ev;
        }
        true
    }
}
