use std::io::IsTerminal;
use owo_colors::OwoColorize;
use terminal_size::{Width, terminal_size};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::reference::{Dimension, DimensionProfile, Question, ReferenceData};
use crate::scoring::ScoreResult;
use crate::session::HistoryEntry;

/// Width of the percent bar in the score table
const BAR_WIDTH: usize = 20;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
pub fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Horizontal bar for a 0-100 percentage. Values outside the range are
/// clamped for display.
pub fn score_bar(percent: f64, width: usize) -> String {
    let ratio = (percent / 100.0).clamp(0.0, 1.0);
    let filled = (ratio * width as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Format the score table: one line per dimension with mean, percent and bar.
/// Dimensions without answers show "n/a" instead of a bar.
pub fn format_score_table(result: &ScoreResult, use_colors: bool) -> String {
    let header = format!("{:<10} {:>5} {:>8}", "Dimension", "Mean", "Percent");
    let mut lines = vec![if use_colors {
        header.bold().to_string()
    } else {
        header
    }];

    let dominant = result.dominant();
    for dim in Dimension::ALL {
        let mean = result.means().get(dim);
        let percent = result.normalized().get(dim);
        let name = format!("{:<10}", dim.display_name());
        let numbers = format!("{:>5.2} {:>7.1}%", mean, percent);

        let bar = if result.answered(dim) == 0 {
            "n/a (no answers)".to_string()
        } else {
            score_bar(percent, BAR_WIDTH)
        };

        let line = if use_colors {
            let name = if dim == dominant {
                name.bold().cyan().to_string()
            } else {
                name
            };
            format!("{} {}  {}", name, numbers, bar.green())
        } else {
            format!("{} {}  {}", name, numbers, bar)
        };
        lines.push(line);
    }

    lines.join("\n")
}

/// "Dominant orientation: {label}"
pub fn format_dominant(result: &ScoreResult, reference: &ReferenceData, use_colors: bool) -> String {
    let label = &reference.profile(result.dominant()).label;
    if use_colors {
        format!("Dominant orientation: {}", label.bold().cyan())
    } else {
        format!("Dominant orientation: {}", label)
    }
}

/// Format a profile as a card: label, then one labeled line per field,
/// wrapped to `width` when given.
pub fn format_profile_card(profile: &DimensionProfile, width: Option<usize>, use_colors: bool) -> String {
    let title = format!("{} ({})", profile.label, profile.dimension.display_name());
    let mut lines = vec![if use_colors {
        title.bold().to_string()
    } else {
        title
    }];

    for (name, value) in profile.fields() {
        let prefix = format!("  {:<11}", format!("{}:", name));
        let indent = " ".repeat(prefix.width());
        let available = width.map(|w| w.saturating_sub(indent.len()).max(20));

        let wrapped = match available {
            Some(w) => wrap_text(value, w),
            None => vec![value.to_string()],
        };

        for (i, chunk) in wrapped.iter().enumerate() {
            let lead = if i == 0 {
                if use_colors {
                    prefix.dimmed().to_string()
                } else {
                    prefix.clone()
                }
            } else {
                indent.clone()
            };
            lines.push(format!("{}{}", lead, chunk));
        }
    }

    lines.join("\n")
}

/// Numbered question list: "Q{n}. [{dimension}] {text}"
pub fn format_question_list(questions: &[Question], use_colors: bool) -> String {
    if questions.is_empty() {
        return "No questions loaded.".to_string();
    }

    questions
        .iter()
        .enumerate()
        .map(|(i, q)| {
            let index = format!("Q{}.", i + 1);
            let tag = format!("[{}]", q.dimension.key());
            if use_colors {
                format!("{:>4} {} {}", index.dimmed(), tag.cyan(), q.text)
            } else {
                format!("{:>4} {} {}", index, tag, q.text)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Session history: local timestamp, four percentages and the dominant key
pub fn format_history(entries: &[HistoryEntry]) -> String {
    if entries.is_empty() {
        return "No history yet.".to_string();
    }

    let mut lines = vec![format!(
        "{:<19}  {:>8} {:>8} {:>8} {:>8}  {}",
        "Timestamp", "Outcome", "Relation", "Process", "Value", "Dominant"
    )];
    for entry in entries {
        let n = &entry.normalized;
        lines.push(format!(
            "{:<19}  {:>7.1}% {:>7.1}% {:>7.1}% {:>7.1}%  {}",
            entry.local_time(),
            n.get(Dimension::Outcome),
            n.get(Dimension::Relation),
            n.get(Dimension::Process),
            n.get(Dimension::Value),
            entry.dominant.key()
        ));
    }
    lines.join("\n")
}

/// Greedy word wrap by terminal display columns, so wide (CJK) characters
/// count as two. Text without spaces is broken at the width boundary.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for word in text.split_whitespace() {
        let word_width = word.width();

        if current_width > 0 && current_width + 1 + word_width > width {
            lines.push(std::mem::take(&mut current));
            current_width = 0;
        }

        if word_width <= width {
            if current_width > 0 {
                current.push(' ');
                current_width += 1;
            }
            current.push_str(word);
            current_width += word_width;
            continue;
        }

        // Wider than a whole line: break between characters
        for ch in word.chars() {
            let ch_width = ch.width().unwrap_or(0);
            if current_width > 0 && current_width + ch_width > width {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }
            current.push(ch);
            current_width += ch_width;
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}
