use crate::domain::SyncMode;

/// Item prefixes recognized at the start of a line, separator included
pub const SUPPORTED_SYMBOLS: &[&str] = &[
    "• ", "- ", "* ", "→ ", "✓ ", "☐ ", "•\t", "-\t", "*\t", "→\t", "✓\t", "☐\t",
];

/// Split a line into its leading item symbol (if any) and the remaining text
///
/// The line is trimmed first; at most one symbol is consumed and the rest is
/// trimmed again.
pub fn split_symbol(line: &str) -> (Option<&'static str>, &str) {
    let trimmed = line.trim();
    for symbol in SUPPORTED_SYMBOLS {
        if let Some(rest) = trimmed.strip_prefix(symbol) {
            return (Some(symbol), rest.trim());
        }
    }
    (None, trimmed)
}

/// Symbol of the first line in `lines` that starts with one, or "" when none does
pub fn detect_symbol<S: AsRef<str>>(lines: &[S]) -> &'static str {
    lines
        .iter()
        .find_map(|line| split_symbol(line.as_ref()).0)
        .unwrap_or("")
}

/// Decide which item symbol the list uses after syncing `lines`
///
/// Replacing always adopts what the new text uses (possibly nothing). Adding
/// keeps an established symbol and only adopts a detected one when the list
/// has none yet.
pub fn resolve_symbol<S: AsRef<str>>(lines: &[S], current: &str, mode: SyncMode) -> String {
    match mode {
        SyncMode::Replace => detect_symbol(lines).to_string(),
        SyncMode::Add if current.is_empty() => detect_symbol(lines).to_string(),
        SyncMode::Add => current.to_string(),
    }
}
