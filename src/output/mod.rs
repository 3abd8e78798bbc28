pub mod formatter;
pub mod stdout;

pub use formatter::{
    format_dominant, format_history, format_profile_card, format_question_list,
    format_score_table, get_terminal_width, score_bar, should_use_colors, wrap_text,
};
pub use stdout::write_report;
