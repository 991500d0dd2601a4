use crate::domain::{format_hms, Task};
use serde::{Deserialize, Serialize};

/// Localizable strings used when rendering the summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryLabels {
    pub working_time: String,
    pub no_tasks: String,
}

impl Default for SummaryLabels {
    fn default() -> Self {
        Self {
            working_time: "Working time".to_string(),
            no_tasks: "No tasks yet".to_string(),
        }
    }
}

/// Render the clipboard summary
///
/// ```text
/// • Write report: 0:12:00
/// • ~~Review~~: 1:05:00
///
/// Working time: 1:17:00
/// ```
///
/// `elapsed_of` supplies the live elapsed value for each task.
pub fn render_summary<F>(tasks: &[Task], symbol: &str, labels: &SummaryLabels, elapsed_of: F) -> String
where
    F: Fn(&Task) -> f64,
{
    if tasks.is_empty() {
        return labels.no_tasks.clone();
    }

    let mut output = String::new();
    let mut total = 0.0;
    for task in tasks {
        let elapsed = elapsed_of(task);
        total += elapsed;
        output.push_str(&format!(
            "{}{}: {}\n",
            symbol,
            display_name(task),
            format_hms(elapsed)
        ));
    }

    output.push_str(&format!("\n{}: {}", labels.working_time, format_hms(total)));
    output
}

/// Render the text the task editor starts with: one "name: H:MM:SS" line per
/// task, without item symbols
pub fn render_editor_text<F>(tasks: &[Task], elapsed_of: F) -> String
where
    F: Fn(&Task) -> f64,
{
    tasks
        .iter()
        .map(|task| format!("{}: {}", display_name(task), format_hms(elapsed_of(task))))
        .collect::<Vec<_>>()
        .join("\n")
}

fn display_name(task: &Task) -> String {
    if task.is_completed {
        format!("~~{}~~", task.name)
    } else {
        task.name.clone()
    }
}
