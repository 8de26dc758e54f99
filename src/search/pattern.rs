//! Search-term normalization and glob compilation.

use crate::config::{DRAWING_EXTENSION, DRAWING_TYPE_FILTER};
use crate::error::{PackError, Result};
use regex::Regex;

/// Turn a loose search term into a glob matching drawing files.
///
/// The term is wrapped in wildcards and given a single `.dwg` suffix, wildcard runs are
/// collapsed, and when the term starts with a digit (a bare drawing number such as `00205`)
/// or is empty, the `DWG` document-type filter is put back in front so other document
/// types sharing the numbering don't match.
///
/// ```
/// use drawing_pack_rs::search::normalize;
///
/// assert_eq!(normalize("205**R0"), "*DWG*205*R0*.dwg");
/// assert_eq!(normalize("PID-00205"), "*PID-00205*.dwg");
/// ```
pub fn normalize(raw: &str) -> String {
    let suffix = format!(".{DRAWING_EXTENSION}");
    let mut term = raw;
    while let Some(stripped) = strip_suffix_ignore_case(term, &suffix) {
        term = stripped;
    }

    let mut pattern = format!("*{term}*{suffix}");
    while pattern.contains("**") {
        pattern = pattern.replace("**", "*");
    }

    let bare_number = pattern[1..]
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit());
    if bare_number || pattern == format!("*{suffix}") {
        pattern = format!("*{DRAWING_TYPE_FILTER}{pattern}");
    }
    pattern
}

fn strip_suffix_ignore_case<'a>(s: &'a str, suffix: &str) -> Option<&'a str> {
    let split = s.len().checked_sub(suffix.len())?;
    if !s.is_char_boundary(split) {
        return None;
    }
    let (head, tail) = s.split_at(split);
    tail.eq_ignore_ascii_case(suffix).then_some(head)
}

/// Compile a shell-style glob into an anchored, case-insensitive regex.
///
/// `*` matches any run, `?` a single character and `[...]` classes pass through
/// (`[!...]` negates). Everything else is literal.
pub fn glob_to_regex(glob: &str) -> Result<Regex> {
    let mut regex = String::from("(?i)^");
    let mut in_class = false;
    let mut chars = glob.chars().peekable();

    while let Some(c) = chars.next() {
        if in_class {
            match c {
                ']' => {
                    in_class = false;
                    regex.push(']');
                }
                '\\' => regex.push_str("\\\\"),
                c => regex.push(c),
            }
            continue;
        }
        match c {
            '*' => regex.push_str(".*"),
            '?' => regex.push('.'),
            '[' => {
                in_class = true;
                regex.push('[');
                if chars.peek() == Some(&'!') {
                    chars.next();
                    regex.push('^');
                }
            }
            c => regex.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
        }
    }

    regex.push('$');
    Regex::new(&regex).map_err(|e| PackError::Pattern {
        pattern: glob.to_string(),
        message: e.to_string(),
    })
}
