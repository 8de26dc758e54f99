//! Fire-and-join fan-out of engine invocations.

use super::engine::CadEngine;
use crate::error::Result;
use crate::model::RenderJob;
use tracing::info;

/// Run every job on its own thread and wait for all of them.
///
/// Jobs must not share script or output paths. The first launch failure is returned once
/// every thread has finished.
pub fn run_all(engine: &dyn CadEngine, jobs: &[RenderJob]) -> Result<()> {
    info!("Plotting {} sheet(s)", jobs.len());

    let results: Vec<Result<()>> = std::thread::scope(|scope| {
        let handles: Vec<_> = jobs
            .iter()
            .map(|job| scope.spawn(move || engine.run_script(&job.drawing, &job.script)))
            .collect();

        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
            })
            .collect()
    });

    results.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PackError;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<(PathBuf, PathBuf)>>,
    }

    impl CadEngine for Recorder {
        fn run_script(&self, drawing: &Path, script: &Path) -> Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push((drawing.to_path_buf(), script.to_path_buf()));
            Ok(())
        }
    }

    struct Broken;

    impl CadEngine for Broken {
        fn run_script(&self, _drawing: &Path, _script: &Path) -> Result<()> {
            Err(PackError::EngineLaunch {
                executable: PathBuf::from("accoreconsole.exe"),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            })
        }
    }

    fn jobs(n: usize) -> Vec<RenderJob> {
        (0..n)
            .map(|i| {
                RenderJob::layout(
                    i,
                    PathBuf::from("/plans/a.dwg"),
                    format!("{}-R0", i + 1),
                    PathBuf::from(format!("/plans/scr{i}.scr")),
                )
            })
            .collect()
    }

    #[test]
    fn test_runs_every_job() {
        let engine = Recorder::default();
        run_all(&engine, &jobs(3)).unwrap();

        let mut scripts: Vec<_> = engine
            .calls
            .into_inner()
            .unwrap()
            .into_iter()
            .map(|(_, script)| script)
            .collect();
        scripts.sort();
        assert_eq!(
            scripts,
            vec![
                PathBuf::from("/plans/scr0.scr"),
                PathBuf::from("/plans/scr1.scr"),
                PathBuf::from("/plans/scr2.scr"),
            ]
        );
    }

    #[test]
    fn test_no_jobs() {
        run_all(&Recorder::default(), &[]).unwrap();
    }

    #[test]
    fn test_launch_failure_propagates() {
        let err = run_all(&Broken, &jobs(2)).unwrap_err();
        assert!(matches!(err, PackError::EngineLaunch { .. }));
    }
}
