use regex::Regex;
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// One comparison token of a natural sort key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortToken {
    /// Lowercased run of non-digit characters
    Text(String),
    /// Run of ASCII digits, stored without leading zeros
    Number(String),
}

impl SortToken {
    fn number(digits: &str) -> Self {
        let trimmed = digits.trim_start_matches('0');
        SortToken::Number(if trimmed.is_empty() { "0" } else { trimmed }.to_string())
    }
}

impl Ord for SortToken {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortToken::Text(a), SortToken::Text(b)) => a.cmp(b),
            // Equal-length digit strings without leading zeros compare lexically
            // exactly like their integer values, so no parsing (and no overflow).
            (SortToken::Number(a), SortToken::Number(b)) => {
                a.len().cmp(&b.len()).then_with(|| a.cmp(b))
            }
            (SortToken::Number(_), SortToken::Text(_)) => Ordering::Less,
            (SortToken::Text(_), SortToken::Number(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for SortToken {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn digit_runs() -> &'static Regex {
    static DIGITS: OnceLock<Regex> = OnceLock::new();
    DIGITS.get_or_init(|| Regex::new(r"[0-9]+").expect("digit pattern is valid"))
}

/// Build the natural sort key for a filename.
///
/// The key always alternates text and number tokens and starts with a
/// (possibly empty) text token, so two keys compare position by position
/// against tokens of the same kind: `frame2.jpg` < `frame10.jpg`.
pub fn natural_sort_key(name: &str) -> Vec<SortToken> {
    let mut tokens = Vec::new();
    let mut last = 0;

    for digits in digit_runs().find_iter(name) {
        tokens.push(SortToken::Text(name[last..digits.start()].to_lowercase()));
        tokens.push(SortToken::number(digits.as_str()));
        last = digits.end();
    }
    tokens.push(SortToken::Text(name[last..].to_lowercase()));

    tokens
}

/// Compare two paths by the natural sort key of their file names
pub fn compare_paths(a: &Path, b: &Path) -> Ordering {
    let key_a = natural_sort_key(&file_name_lossy(a));
    let key_b = natural_sort_key(&file_name_lossy(b));
    key_a.cmp(&key_b).then_with(|| a.cmp(b))
}

/// Sort image paths into display order
pub fn sort_naturally(paths: &mut [PathBuf]) {
    paths.sort_by(|a, b| compare_paths(a, b));
}

fn file_name_lossy(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
