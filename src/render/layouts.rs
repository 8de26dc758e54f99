//! Reading the paperspace layout names out of a drawing.

use super::engine::CadEngine;
use crate::cleanup::remove_files;
use crate::config::{PlotConfig, MODEL_LAYOUT};
use crate::error::{PackError, Result};
use std::path::Path;
use tracing::{debug, warn};

/// AutoLISP that writes every entry of the layout dictionary to `list`, one per line.
pub fn sheet_list_script(list: &Path) -> String {
    let list = list.to_string_lossy().replace('\\', "/");
    format!(
        r#"
(if (setq des (open "{list}" "w"))
  (progn
    (setq items (dictsearch (namedobjdict) "ACAD_LAYOUT"))
    (foreach layout items
      (if (= (car layout) 3)
        (write-line (cdr layout) des)
      )
    )
    (close des)
  )
)
"#
    )
}

/// Layout names from a layout list, in file order, without blanks or `Model`.
pub fn parse_layout_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && *line != MODEL_LAYOUT)
        .map(str::to_string)
        .collect()
}

/// Ask the engine for the paperspace layouts of `drawing`.
///
/// The dump script and the list file live in the scratch directory and are removed
/// before returning, whatever the engine did. A drawing the engine couldn't list yields
/// no sheets.
pub fn enumerate_layouts(
    engine: &dyn CadEngine,
    drawing: &Path,
    config: &PlotConfig,
) -> Result<Vec<String>> {
    let list = config.layout_list_path();
    let script = config.sheet_list_script_path();

    remove_files([&list]);
    std::fs::write(&script, sheet_list_script(&list)).map_err(|source| PackError::Script {
        path: script.clone(),
        source,
    })?;

    let ran = engine.run_script(drawing, &script);
    let sheets = match std::fs::read_to_string(&list) {
        Ok(text) => parse_layout_list(&text),
        Err(e) => {
            if ran.is_ok() {
                warn!("No layout list for {}: {}", drawing.display(), e);
            }
            Vec::new()
        }
    };
    remove_files([&list, &script]);
    ran?;

    debug!("{} layout(s) in {}", sheets.len(), drawing.display());
    Ok(sheets)
}
