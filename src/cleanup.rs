//! Best-effort removal of intermediate files.

use crate::config::PLOT_LOGS;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

/// Delete each file, ignoring anything that can't be deleted.
pub fn remove_files<I, P>(files: I)
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    for file in files {
        let file = file.as_ref();
        match std::fs::remove_file(file) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Could not find {} to delete.", file.display());
            }
            Err(e) => debug!("Could not delete {}: {}", file.display(), e),
        }
    }
}

/// Delete the plot logs the engine leaves in `dir`.
pub fn remove_plot_logs(dir: &Path) {
    remove_files(PLOT_LOGS.iter().map(|log| dir.join(log)));
}
