//! Process inspection for locating the viewer.

use sysinfo::{ProcessRefreshKind, RefreshKind, System};
use tracing::warn;
use zathura_presence_core::{Result, ViewerLocator};

#[derive(Debug, Default)]
pub struct ProcessTableLocator;

impl ViewerLocator for ProcessTableLocator {
    fn locate(&self, process_name: &str) -> Result<Option<u32>> {
        let sys = System::new_with_specifics(
            RefreshKind::new().with_processes(ProcessRefreshKind::new()),
        );
        let pids: Vec<u32> = sys
            .processes_by_exact_name(process_name)
            .map(|process| process.pid().as_u32())
            .collect();
        Ok(pick_process(process_name, pids))
    }
}

/// Lowest pid wins so repeated lookups settle on the same process.
fn pick_process(process_name: &str, mut pids: Vec<u32>) -> Option<u32> {
    pids.sort_unstable();
    pids.dedup();
    if pids.len() > 1 {
        warn!(
            process_name,
            candidates = ?pids,
            "Multiple viewer processes found; using the first one"
        );
    }
    pids.first().copied()
}
