//! One combined package from the modelspace view of many drawings.

use super::{pdf_in, run_all, same_dir, stage, JobReport, Renderer};
use crate::cleanup::remove_files;
use crate::config::{BASE_NAME_WIDTH, REVISION_OFFSET};
use crate::error::{PackError, Result};
use crate::model::RenderJob;
use crate::transform::{prefix, skip};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// A modelspace run over `drawings`, all from one source directory.
#[derive(Debug, Clone)]
pub struct ModelPack<'a> {
    pub drawings: &'a [PathBuf],
    pub dest: &'a Path,
    pub output: Option<&'a Path>,
    pub delete_source: bool,
}

/// Default package name for `count` drawings starting with `first`.
///
/// ```
/// use drawing_pack_rs::render::default_model_output;
/// use std::path::Path;
///
/// let first = Path::new("5300221014-VWC-MS-DWG-00200-01-R0.dwg");
/// assert_eq!(default_model_output(first, 3), "5300221014-VWC-MS-DWG-00200-01_03-R0.pdf");
/// ```
pub fn default_model_output(first: &Path, count: usize) -> String {
    let stem = first
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!(
        "{}-01_{:02}{}.pdf",
        prefix(&stem, BASE_NAME_WIDTH),
        count,
        skip(&stem, REVISION_OFFSET)
    )
}

/// Plot every drawing's modelspace and merge the pages in drawing order.
pub fn render_model(renderer: &mut Renderer<'_>, pack: &ModelPack<'_>) -> Result<JobReport> {
    let Some(first) = pack.drawings.first() else {
        return Ok(JobReport::default());
    };
    let mut report = JobReport {
        source: first.clone(),
        ..Default::default()
    };

    let source_dir = first.parent().unwrap_or(Path::new(""));
    let staging = !same_dir(source_dir, pack.dest);
    let work = if staging {
        stage_all(pack.drawings, pack.dest)?
    } else {
        pack.drawings.to_vec()
    };
    let render_dir = if staging { pack.dest } else { source_dir };

    let output = match pack.output {
        Some(name) => pdf_in(render_dir, name),
        None => render_dir.join(default_model_output(first, pack.drawings.len())),
    };

    let script = renderer.config.model_script_path();
    if let Err(source) = std::fs::write(&script, &renderer.config.model_script) {
        if staging {
            remove_files(&work);
        }
        return Err(PackError::Script {
            path: script,
            source,
        });
    }

    let jobs: Vec<RenderJob> = work
        .iter()
        .enumerate()
        .map(|(index, drawing)| RenderJob::model(index, drawing.clone(), script.clone()))
        .collect();

    let ran = run_all(renderer.engine, &jobs);
    remove_files([&script]);
    let merged = ran.and_then(|()| merge_plots(renderer, &jobs, &output, &mut report));

    remove_files(jobs.iter().map(RenderJob::raw_output));
    if staging || (pack.delete_source && merged.is_ok()) {
        remove_files(&work);
    }
    merged?;

    Ok(report)
}

fn stage_all(drawings: &[PathBuf], dest: &Path) -> Result<Vec<PathBuf>> {
    let mut staged = Vec::with_capacity(drawings.len());
    for drawing in drawings {
        match stage(drawing, dest) {
            Ok(copy) => staged.push(copy),
            Err(e) => {
                remove_files(&staged);
                return Err(e);
            }
        }
    }
    Ok(staged)
}

fn merge_plots(
    renderer: &mut Renderer<'_>,
    jobs: &[RenderJob],
    output: &Path,
    report: &mut JobReport,
) -> Result<()> {
    for job in jobs {
        let plot = job.raw_output();
        if !plot.exists() {
            warn!("Could not find {}. File skipped", plot.display());
            report.skipped.push(plot);
            continue;
        }
        let title = job.stem();
        renderer.merger.append(&plot, &title)?;
        report.bookmarks.push(title);
    }

    if report.bookmarks.is_empty() {
        warn!("Nothing was plotted; {} not written", output.display());
        return Ok(());
    }
    renderer.merger.write(output)?;
    info!("Wrote {}", output.display());
    report.output = Some(output.to_path_buf());
    Ok(())
}
