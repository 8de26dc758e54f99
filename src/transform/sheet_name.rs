//! Canonical sheet names for split paperspace plots.

use crate::config::{BASE_NAME_WIDTH, MIN_SHEET_WIDTH};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

// 1-R0 -> (1)(-R0)
static SHEET_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?(\d+)(.*)").expect("Invalid sheet label regex"));

/// Digits used for sheet numbers in a drawing with `total_sheets` sheets.
pub fn sheet_width(total_sheets: usize) -> usize {
    MIN_SHEET_WIDTH.max(total_sheets.to_string().len())
}

/// Canonical suffix for a layout label: `-` + zero-padded sheet number + the rest.
///
/// Returns an empty string when the label carries no sheet number; the caller decides
/// what to do with such a sheet.
///
/// ```
/// use drawing_pack_rs::transform::derive_suffix;
///
/// assert_eq!(derive_suffix("1-R0", 12), "-01-R0");
/// assert_eq!(derive_suffix("-6-R0", 12), "-06-R0");
/// assert_eq!(derive_suffix("A", 12), "");
/// ```
pub fn derive_suffix(label: &str, total_sheets: usize) -> String {
    let Some(caps) = SHEET_LABEL.captures(label) else {
        return String::new();
    };
    let width = sheet_width(total_sheets);
    format!("-{:0>width$}{}", &caps[1], &caps[2])
}

/// Name shared by every sheet plotted from `source`.
///
/// A single-sheet drawing keeps its whole stem; a multi-sheet drawing is cut back to the
/// drawing prefix (`5300XXXXXX-VWC-MS-DWG-YYYYY`).
pub fn base_name(source: &Path, sheet_count: usize) -> String {
    if sheet_count == 1 {
        return source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
    }
    let name = source
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    prefix(&name, BASE_NAME_WIDTH).to_string()
}

/// The first `width` characters of `s` (all of it when shorter).
pub(crate) fn prefix(s: &str, width: usize) -> &str {
    match s.char_indices().nth(width) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Everything after the first `width` characters of `s`.
pub(crate) fn skip(s: &str, width: usize) -> &str {
    match s.char_indices().nth(width) {
        Some((idx, _)) => &s[idx..],
        None => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== derive_suffix tests ====================

    #[test]
    fn test_derive_suffix_pads() {
        assert_eq!(derive_suffix("1-R0", 12), "-01-R0");
        assert_eq!(derive_suffix("1-R0", 2), "-01-R0");
    }

    #[test]
    fn test_derive_suffix_leading_dash() {
        assert_eq!(derive_suffix("-6-R0", 12), "-06-R0");
        assert_eq!(derive_suffix("-10-R0", 2), "-10-R0");
    }

    #[test]
    fn test_derive_suffix_already_wide() {
        assert_eq!(derive_suffix("10-R0", 12), "-10-R0");
        assert_eq!(derive_suffix("-01-R0", 3), "-01-R0");
        assert_eq!(derive_suffix("-01-R0", 100), "-001-R0");
    }

    #[test]
    fn test_derive_suffix_wide_drawing() {
        assert_eq!(derive_suffix("7-R0", 120), "-007-R0");
        assert_eq!(derive_suffix("45", 120), "-045");
    }

    #[test]
    fn test_derive_suffix_unparseable() {
        assert_eq!(derive_suffix("A", 1), "");
        assert_eq!(derive_suffix("Layout", 12), "");
        assert_eq!(derive_suffix("", 3), "");
    }

    #[test]
    fn test_derive_suffix_number_inside_label() {
        assert_eq!(derive_suffix("Sheet3", 4), "-03");
    }

    #[test]
    fn test_sheet_width() {
        assert_eq!(sheet_width(1), 2);
        assert_eq!(sheet_width(99), 2);
        assert_eq!(sheet_width(100), 3);
    }

    // ==================== base_name tests ====================

    #[test]
    fn test_base_name_multi() {
        let source = Path::new("/plans/5300221014-VWC-MS-DWG-00200-01_03-R0.dwg");
        assert_eq!(base_name(source, 3), "5300221014-VWC-MS-DWG-00200");
    }

    #[test]
    fn test_base_name_single() {
        let source = Path::new("/plans/5300221014-VWC-MS-DWG-00200-01-R0.dwg");
        assert_eq!(base_name(source, 1), "5300221014-VWC-MS-DWG-00200-01-R0");
    }

    #[test]
    fn test_base_name_short_name() {
        assert_eq!(base_name(Path::new("plan.dwg"), 4), "plan.dwg");
    }

    #[test]
    fn test_prefix_and_skip() {
        let stem = "5300221014-VWC-MS-DWG-00200-01-R0";
        assert_eq!(prefix(stem, 27), "5300221014-VWC-MS-DWG-00200");
        assert_eq!(skip(stem, 30), "-R0");
        assert_eq!(skip("short", 30), "");
    }
}
