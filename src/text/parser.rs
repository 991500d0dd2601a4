use super::symbol::split_symbol;
use crate::domain::Task;
use once_cell::sync::Lazy;
use regex::Regex;

/// "Task name: H:MM:SS", "Task name: MM:SS" or "Task name: SS"
///
/// 1. name (lazy, up to the colon that starts the time)
/// 2. first numeric block
/// 3. second numeric block (optional)
/// 4. third numeric block (optional)
///
/// Digits are ASCII only.
static TIME_SUFFIX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(.*?):\s*([0-9]{1,2})(?::([0-9]{2}))?(?::([0-9]{2}))?\s*$")
        .expect("valid time suffix regex")
});

/// One line of task text after parsing
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedLine {
    pub name: String,
    pub elapsed: f64,
    pub is_completed: bool,
}

impl ParsedLine {
    /// Build a fresh task (new id) from this line
    pub fn into_task(self) -> Task {
        let mut task = Task::new(self.name, self.elapsed);
        task.is_completed = self.is_completed;
        task
    }
}

/// Parse a raw text line into a task candidate
///
/// Returns `None` only for blank lines. A missing or malformed time suffix
/// leaves the whole text as the name with zero elapsed time.
pub fn parse_line(raw: &str) -> Option<ParsedLine> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let (_, content) = split_symbol(trimmed);

    let (name, elapsed) = match TIME_SUFFIX_RE.captures(content) {
        Some(caps) => {
            let group = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u64>().ok());
            let first = group(2).unwrap_or(0);
            let (hours, minutes, seconds) = match (group(3), group(4)) {
                // H:MM:SS
                (Some(second), Some(third)) => (first, second, third),
                // MM:SS
                (Some(second), None) => (0, first, second),
                // A single block is seconds
                _ => (0, 0, first),
            };
            let name = caps.get(1).map_or("", |m| m.as_str());
            (name, (hours * 3600 + minutes * 60 + seconds) as f64)
        }
        None => (content, 0.0),
    };

    let (name, is_completed) = strip_completion_marker(name.trim());

    Some(ParsedLine {
        name: name.to_string(),
        elapsed,
        is_completed,
    })
}

/// Parse every non-blank line of `text`
pub fn parse_lines(text: &str) -> Vec<ParsedLine> {
    text.lines().filter_map(parse_line).collect()
}

/// "~~name~~" -> ("name", true)
fn strip_completion_marker(name: &str) -> (&str, bool) {
    match name.strip_prefix("~~").and_then(|s| s.strip_suffix("~~")) {
        Some(inner) => (inner.trim(), true),
        None => (name, false),
    }
}
