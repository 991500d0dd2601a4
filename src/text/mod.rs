pub mod parser;
pub mod summary;
pub mod symbol;

pub use parser::{parse_line, parse_lines, ParsedLine};
pub use summary::{render_editor_text, render_summary, SummaryLabels};
pub use symbol::{detect_symbol, resolve_symbol, split_symbol, SUPPORTED_SYMBOLS};
