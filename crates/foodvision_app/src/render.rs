use std::fmt::Write;

use foodvision_core::{Category, NutrientRecord, Phase, SessionSnapshot};

/// One progress line for a phase change, or `None` when there is nothing to say.
pub fn progress_line(view: &SessionSnapshot) -> Option<String> {
    if view.status_line.is_empty() {
        return None;
    }
    let job = view
        .job_id
        .as_ref()
        .map(|id| id.as_str())
        .unwrap_or("-");
    Some(format!("[{}] {}", job, view.status_line))
}

/// The result popup: category and nutrients on success, the error otherwise.
pub fn render_result(view: &SessionSnapshot) -> String {
    let mut out = String::new();
    match view.phase {
        Phase::Done => {
            let label = view.category.map(Category::label).unwrap_or("Unknown");
            let _ = writeln!(out, "Category: {}", label);
            if view.nutrients.is_empty() {
                let _ = writeln!(out, "No nutrition data available.");
            } else {
                out.push_str(&render_nutrients(&view.nutrients));
            }
        }
        Phase::Failed => {
            let message = view.error_message.as_deref().unwrap_or("Processing failed.");
            let _ = writeln!(out, "Error: {}", message);
        }
        _ => {}
    }
    out
}

fn render_nutrients(nutrients: &[NutrientRecord]) -> String {
    let name_width = nutrients
        .iter()
        .map(|record| record.name.len())
        .max()
        .unwrap_or(0)
        .max("Nutrient".len());

    let mut out = String::new();
    let _ = writeln!(out, "{:<name_width$}  {:>10}  Unit", "Nutrient", "Value");
    for record in nutrients {
        let _ = writeln!(
            out,
            "{:<name_width$}  {:>10}  {}",
            record.name,
            format_value(record.value),
            record.unit
        );
    }
    out
}

fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

pub fn render_categories() -> String {
    let mut out = String::new();
    for category in Category::ALL {
        let _ = writeln!(
            out,
            "{:>2}  {:<16} {}",
            category.index(),
            category.label(),
            category.search_phrase()
        );
    }
    out
}
