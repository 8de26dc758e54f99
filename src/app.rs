//! Turning a user request into rendering jobs and running them.

use crate::cleanup::remove_plot_logs;
use crate::config::{PlotConfig, Space};
use crate::error::Result;
use crate::render::{
    render_model, render_paper, CadEngine, JobReport, ModelPack, PaperPack, PdfMerger, Renderer,
};
use crate::search::{find_matches, normalize};
use crate::transform::resolve_latest;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// What the user asked for.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PackRequest {
    /// Search term (drawing number fragment, or anything glob-like).
    pub pattern: String,
    /// Directory to search, or a single drawing.
    pub source: PathBuf,
    /// Where packages are written. Defaults to the source directory.
    pub dest: Option<PathBuf>,
    /// Package name. Defaults to a name derived from the drawings.
    pub output: Option<PathBuf>,
    pub space: Space,
    /// Only the highest revision of each drawing.
    pub latest: bool,
    /// Keep the individual sheet PDFs (paperspace).
    pub keep: bool,
    /// Delete the source drawings once plotted.
    pub delete_source: bool,
}

impl PackRequest {
    /// Create a modelspace request with default options.
    pub fn new(pattern: impl Into<String>, source: impl Into<PathBuf>) -> Self {
        Self {
            pattern: pattern.into(),
            source: source.into(),
            ..Default::default()
        }
    }
}

/// The drawings a request resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackPlan {
    /// Normalized glob, when a directory was searched.
    pub pattern: Option<String>,
    pub source_dir: PathBuf,
    pub dest: PathBuf,
    /// Full paths, in package order.
    pub drawings: Vec<PathBuf>,
}

/// Result of planning: work to do, or the reason there is none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Plan {
    Ready(PackPlan),
    Rejected(PackOutcome),
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PackOutcome {
    /// One report per package built.
    Completed(Vec<JobReport>),
    SourceNotFound { source: PathBuf },
    NoMatches { pattern: String, source: PathBuf },
}

impl PackOutcome {
    /// Whether the request could be carried out.
    pub fn is_success(&self) -> bool {
        matches!(self, PackOutcome::Completed(_))
    }

    /// Packages written by the run.
    pub fn outputs(&self) -> Vec<&Path> {
        match self {
            PackOutcome::Completed(reports) => reports
                .iter()
                .filter_map(|report| report.output.as_deref())
                .collect(),
            _ => Vec::new(),
        }
    }
}

impl std::fmt::Display for PackOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PackOutcome::Completed(reports) => {
                let outputs = self.outputs();
                if outputs.is_empty() {
                    write!(f, "No PDF produced from {} package(s)", reports.len())
                } else {
                    let names: Vec<String> =
                        outputs.iter().map(|p| p.display().to_string()).collect();
                    write!(f, "Created {}", names.join(", "))
                }
            }
            PackOutcome::SourceNotFound { source } => {
                write!(f, "Could not find '{}'", source.display())
            }
            PackOutcome::NoMatches { pattern, source } => write!(
                f,
                "No matching files for '{}' in '{}'",
                pattern,
                source.display()
            ),
        }
    }
}

/// Resolve the drawings a request refers to, without touching the engine.
pub fn plan(request: &PackRequest) -> Result<Plan> {
    let source = &request.source;
    if !source.exists() {
        return Ok(Plan::Rejected(PackOutcome::SourceNotFound {
            source: source.clone(),
        }));
    }

    let (pattern, source_dir, mut drawings) = if source.is_dir() {
        let pattern = normalize(&request.pattern);
        let drawings: Vec<PathBuf> = find_matches(&pattern, source)?
            .into_iter()
            .map(|name| source.join(name))
            .collect();
        (Some(pattern), source.clone(), drawings)
    } else {
        let dir = match source.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let drawing = match source.file_name() {
            Some(name) => dir.join(name),
            None => source.clone(),
        };
        (None, dir, vec![drawing])
    };

    if request.latest {
        drawings = resolve_latest(&drawings);
    }
    if drawings.is_empty() {
        return Ok(Plan::Rejected(PackOutcome::NoMatches {
            pattern: request.pattern.clone(),
            source: source.clone(),
        }));
    }

    let dest = request.dest.clone().unwrap_or_else(|| source_dir.clone());
    Ok(Plan::Ready(PackPlan {
        pattern,
        source_dir,
        dest,
        drawings,
    }))
}

/// Package names for `total` paperspace packages: `name.pdf`, `name(1).pdf`, ...
///
/// ```
/// use drawing_pack_rs::app::output_names;
/// use std::path::{Path, PathBuf};
///
/// let names = output_names(3, Some(Path::new("file")));
/// assert_eq!(names[0], Some(PathBuf::from("file.pdf")));
/// assert_eq!(names[2], Some(PathBuf::from("file(2).pdf")));
/// assert_eq!(output_names(2, None), vec![None, None]);
/// ```
pub fn output_names(total: usize, name: Option<&Path>) -> Vec<Option<PathBuf>> {
    let Some(name) = name else {
        return vec![None; total];
    };
    let stem = name.with_extension("");
    let stem = stem.to_string_lossy();
    (0..total)
        .map(|i| match i {
            0 => Some(PathBuf::from(format!("{stem}.pdf"))),
            i => Some(PathBuf::from(format!("{stem}({i}).pdf"))),
        })
        .collect()
}

/// Plan the request and build every package it calls for.
///
/// Plot logs the engine leaves in the log directory are removed afterwards, whatever
/// happened.
pub fn run(
    request: &PackRequest,
    engine: &dyn CadEngine,
    merger: &mut dyn PdfMerger,
    config: &PlotConfig,
) -> Result<PackOutcome> {
    let plan = match plan(request)? {
        Plan::Ready(plan) => plan,
        Plan::Rejected(outcome) => return Ok(outcome),
    };
    std::fs::create_dir_all(&plan.dest)?;
    info!(
        "Plotting {} drawing(s) in {} to {}",
        plan.drawings.len(),
        request.space,
        plan.dest.display()
    );

    let mut renderer = Renderer::new(engine, merger, config);
    let reports = render(&mut renderer, request, &plan);
    remove_plot_logs(&config.log_dir);

    Ok(PackOutcome::Completed(reports?))
}

fn render(
    renderer: &mut Renderer<'_>,
    request: &PackRequest,
    plan: &PackPlan,
) -> Result<Vec<JobReport>> {
    match request.space {
        Space::Model => {
            let report = render_model(
                renderer,
                &ModelPack {
                    drawings: &plan.drawings,
                    dest: &plan.dest,
                    output: request.output.as_deref(),
                    delete_source: request.delete_source,
                },
            )?;
            Ok(vec![report])
        }
        Space::Paper => {
            let names = output_names(plan.drawings.len(), request.output.as_deref());
            let mut reports = Vec::with_capacity(plan.drawings.len());
            for (drawing, name) in plan.drawings.iter().zip(&names) {
                info!("Plotting layouts of {}", drawing.display());
                reports.push(render_paper(
                    renderer,
                    &PaperPack {
                        drawing,
                        dest: &plan.dest,
                        output: name.as_deref(),
                        keep: request.keep,
                        delete_source: request.delete_source,
                    },
                )?);
            }
            Ok(reports)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn touch(dir: &Path, names: &[&str]) {
        for name in names {
            std::fs::write(dir.join(name), b"dwg").unwrap();
        }
    }

    // ==================== output_names tests ====================

    #[test]
    fn test_output_names() {
        assert_eq!(
            output_names(4, Some(Path::new("file"))),
            vec![
                Some(PathBuf::from("file.pdf")),
                Some(PathBuf::from("file(1).pdf")),
                Some(PathBuf::from("file(2).pdf")),
                Some(PathBuf::from("file(3).pdf")),
            ]
        );
    }

    #[test]
    fn test_output_names_strips_extension() {
        assert_eq!(
            output_names(2, Some(Path::new("pack.pdf"))),
            vec![
                Some(PathBuf::from("pack.pdf")),
                Some(PathBuf::from("pack(1).pdf")),
            ]
        );
    }

    #[test]
    fn test_output_names_without_name() {
        assert_eq!(output_names(3, None), vec![None, None, None]);
        assert!(output_names(0, Some(Path::new("file"))).is_empty());
    }

    // ==================== plan tests ====================

    #[test]
    fn test_plan_directory() {
        let dir = tempfile::tempdir().unwrap();
        touch(
            dir.path(),
            &[
                "5300221014-VWC-MS-DWG-00200-02-R0.dwg",
                "5300221014-VWC-MS-DWG-00200-01-R0.dwg",
                "5300221014-VWC-MS-PID-00200-01-R0.dwg",
                "notes.txt",
            ],
        );

        let Plan::Ready(plan) = plan(&PackRequest::new("00200", dir.path())).unwrap() else {
            panic!("expected a plan");
        };
        assert_eq!(plan.pattern.as_deref(), Some("*DWG*00200*.dwg"));
        assert_eq!(plan.dest, dir.path());
        assert_eq!(
            plan.drawings,
            vec![
                dir.path().join("5300221014-VWC-MS-DWG-00200-01-R0.dwg"),
                dir.path().join("5300221014-VWC-MS-DWG-00200-02-R0.dwg"),
            ]
        );
    }

    #[test]
    fn test_plan_latest() {
        let dir = tempfile::tempdir().unwrap();
        touch(
            dir.path(),
            &[
                "5300221014-VWC-MS-DWG-00200-01-RA.dwg",
                "5300221014-VWC-MS-DWG-00200-01-R0.dwg",
                "5300221014-VWC-MS-DWG-00200-02-R1.dwg",
                "5300221014-VWC-MS-DWG-00200-02-R0.dwg",
            ],
        );
        let mut request = PackRequest::new("00200", dir.path());
        request.latest = true;

        let Plan::Ready(plan) = plan(&request).unwrap() else {
            panic!("expected a plan");
        };
        assert_eq!(
            plan.drawings,
            vec![
                dir.path().join("5300221014-VWC-MS-DWG-00200-01-R0.dwg"),
                dir.path().join("5300221014-VWC-MS-DWG-00200-02-R1.dwg"),
            ]
        );
    }

    #[test]
    fn test_plan_single_file() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), &["5300221014-VWC-MS-DWG-00200-01_03-R0.dwg"]);
        let drawing = dir.path().join("5300221014-VWC-MS-DWG-00200-01_03-R0.dwg");
        let mut request = PackRequest::new("", &drawing);
        request.dest = Some(dir.path().join("out"));

        let Plan::Ready(plan) = plan(&request).unwrap() else {
            panic!("expected a plan");
        };
        assert_eq!(plan.pattern, None);
        assert_eq!(plan.source_dir, dir.path());
        assert_eq!(plan.dest, dir.path().join("out"));
        assert_eq!(plan.drawings, vec![drawing]);
    }

    #[test]
    fn test_plan_source_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");

        let outcome = plan(&PackRequest::new("00200", &missing)).unwrap();
        let Plan::Rejected(outcome) = outcome else {
            panic!("expected a rejection");
        };
        assert!(!outcome.is_success());
        assert_eq!(
            outcome.to_string(),
            format!("Could not find '{}'", missing.display())
        );
    }

    #[test]
    fn test_plan_no_matches() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), &["5300221014-VWC-MS-DWG-00200-01-R0.dwg"]);

        let Plan::Rejected(outcome) = plan(&PackRequest::new("00999", dir.path())).unwrap() else {
            panic!("expected a rejection");
        };
        assert_eq!(
            outcome.to_string(),
            format!("No matching files for '00999' in '{}'", dir.path().display())
        );
    }

    #[test]
    fn test_plan_latest_drops_everything() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), &["DWG-notes.dwg"]);
        let mut request = PackRequest::new("", dir.path());
        request.latest = true;

        assert!(matches!(
            plan(&request).unwrap(),
            Plan::Rejected(PackOutcome::NoMatches { .. })
        ));
    }

    // ==================== PackOutcome tests ====================

    #[test]
    fn test_outcome_outputs() {
        let outcome = PackOutcome::Completed(vec![
            JobReport {
                source: PathBuf::from("a.dwg"),
                output: Some(PathBuf::from("a.pdf")),
                ..Default::default()
            },
            JobReport {
                source: PathBuf::from("b.dwg"),
                ..Default::default()
            },
        ]);
        assert!(outcome.is_success());
        assert_eq!(outcome.outputs(), vec![Path::new("a.pdf")]);
        assert_eq!(outcome.to_string(), "Created a.pdf");
    }
}
