//! One package per drawing from its paperspace layouts.

use super::{enumerate_layouts, pdf_in, run_all, same_dir, stage, JobReport, Renderer};
use crate::cleanup::remove_files;
use crate::config::SHEET_LINE;
use crate::error::{PackError, Result};
use crate::model::{RenderJob, Sheet};
use crate::transform::{base_name, derive_suffix};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// A paperspace run over one drawing.
#[derive(Debug, Clone)]
pub struct PaperPack<'a> {
    pub drawing: &'a Path,
    pub dest: &'a Path,
    pub output: Option<&'a Path>,
    /// Leave the individual sheet PDFs next to the package.
    pub keep: bool,
    pub delete_source: bool,
}

/// Plot script for one layout: `template` with line [`SHEET_LINE`] set to `"<sheet>"`.
pub fn layout_script(template: &str, sheet: &str) -> String {
    let quoted = format!("\"{sheet}\"");
    let mut lines: Vec<&str> = template.lines().collect();
    if lines.len() <= SHEET_LINE {
        lines.resize(SHEET_LINE + 1, "");
    }
    lines[SHEET_LINE] = &quoted;

    let mut script = lines.join("\n");
    script.push('\n');
    script
}

/// Plot every layout of the drawing, name the sheets and merge them in name order.
pub fn render_paper(renderer: &mut Renderer<'_>, pack: &PaperPack<'_>) -> Result<JobReport> {
    let mut report = JobReport {
        source: pack.drawing.to_path_buf(),
        ..Default::default()
    };

    let source_dir = pack.drawing.parent().unwrap_or(Path::new(""));
    let staging = !same_dir(source_dir, pack.dest);
    let drawing = if staging {
        stage(pack.drawing, pack.dest)?
    } else {
        pack.drawing.to_path_buf()
    };
    let output = match pack.output {
        Some(name) => pdf_in(pack.dest, name),
        None => drawing.with_extension("pdf"),
    };

    let rendered = plot_sheets(renderer, &drawing, pack, &output, &mut report);

    if staging || (pack.delete_source && rendered.is_ok()) {
        remove_files([&drawing]);
    }
    rendered?;

    Ok(report)
}

fn plot_sheets(
    renderer: &mut Renderer<'_>,
    drawing: &Path,
    pack: &PaperPack<'_>,
    output: &Path,
    report: &mut JobReport,
) -> Result<()> {
    let sheets = enumerate_layouts(renderer.engine, drawing, renderer.config)?;
    if sheets.is_empty() {
        warn!("No layouts found in {}", drawing.display());
        return Ok(());
    }
    info!("{} sheet(s) in {}", sheets.len(), drawing.display());

    let mut jobs = Vec::with_capacity(sheets.len());
    for (index, sheet) in sheets.iter().enumerate() {
        let script = pack.dest.join(format!("scr{index}.scr"));
        let text = layout_script(&renderer.config.layout_script, sheet);
        if let Err(source) = std::fs::write(&script, text) {
            remove_files(jobs.iter().map(|job: &RenderJob| &job.script));
            return Err(PackError::Script {
                path: script,
                source,
            });
        }
        jobs.push(RenderJob::layout(index, drawing.to_path_buf(), sheet.as_str(), script));
    }

    let ran = run_all(renderer.engine, &jobs);
    remove_files(jobs.iter().map(|job| &job.script));
    ran?;

    let mut plotted = name_sheets(drawing, &jobs, report)?;
    plotted.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    let merged = merge_sheets(renderer, &plotted, output, report);
    if pack.keep {
        report.kept = plotted;
    } else {
        remove_files(&plotted);
    }
    merged
}

/// Rename each plotted sheet to its canonical name, returning the files that exist.
fn name_sheets(
    drawing: &Path,
    jobs: &[RenderJob],
    report: &mut JobReport,
) -> Result<Vec<PathBuf>> {
    let count = jobs.len();
    let base = base_name(drawing, count);
    let mut plotted = Vec::with_capacity(count);

    for job in jobs {
        let raw = job.raw_output();
        if !raw.exists() {
            warn!("Could not find {}. Sheet skipped", raw.display());
            report.skipped.push(raw);
            continue;
        }
        let Sheet::Layout(label) = &job.sheet else {
            continue;
        };
        let suffix = derive_suffix(label, count);
        if suffix.is_empty() {
            warn!(
                "Could not read a sheet number from '{}'; keeping {}",
                label,
                raw.display()
            );
            plotted.push(raw);
            continue;
        }

        let named = job.dest.join(format!("{base}{suffix}.pdf"));
        std::fs::rename(&raw, &named).map_err(|source| PackError::Rename {
            from: raw.clone(),
            to: named.clone(),
            source,
        })?;
        plotted.push(named);
    }
    Ok(plotted)
}

fn merge_sheets(
    renderer: &mut Renderer<'_>,
    plotted: &[PathBuf],
    output: &Path,
    report: &mut JobReport,
) -> Result<()> {
    if plotted.is_empty() {
        warn!("Nothing was plotted; {} not written", output.display());
        return Ok(());
    }
    for sheet in plotted {
        let title = sheet
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        renderer.merger.append(sheet, &title)?;
        report.bookmarks.push(title);
    }
    renderer.merger.write(output)?;
    info!("Wrote {}", output.display());
    report.output = Some(output.to_path_buf());
    Ok(())
}
