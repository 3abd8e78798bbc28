//! Centralized theme module for TUI color constants and styles

use ratatui::prelude::*;

/// Which palette to use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

/// Complete color palette for the TUI
#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Score-based colors (traffic light pattern)
    pub score_high: Color,
    pub score_mid: Color,
    pub score_low: Color,
    pub bar_empty: Color,

    // Slider
    pub slider_on: Color,
    pub slider_off: Color,

    // Radar chart
    pub radar_grid: Color,
    pub radar_fill: Color,

    // Styles
    pub title_style: Style,
    pub header_style: Style,
    pub row_selected: Style,

    // General colors
    pub muted: Color,
    pub title_color: Color,

    // Tab colors
    pub tab_active_style: Style,
    pub tab_inactive_style: Style,

    // Status bar colors
    pub status_bar_bg: Color,
    pub status_key_color: Color,
    pub flash_success: Color,
    pub flash_error: Color,

    // Cards and popups
    pub card_border: Color,
    pub dominant_border: Color,
    pub popup_border: Color,
    pub popup_title: Style,
}

impl ThemeColors {
    /// Dark theme palette
    pub fn dark() -> Self {
        Self {
            score_high: Color::Green,
            score_mid: Color::Yellow,
            score_low: Color::Red,
            bar_empty: Color::DarkGray,
            slider_on: Color::Cyan,
            slider_off: Color::DarkGray,
            radar_grid: Color::DarkGray,
            radar_fill: Color::Cyan,
            title_style: Style::new().bold(),
            header_style: Style::new().bold(),
            row_selected: Style::new().bg(Color::Indexed(236)),
            muted: Color::Gray,
            title_color: Color::Cyan,
            tab_active_style: Style::new().fg(Color::Cyan).bold(),
            tab_inactive_style: Style::new().fg(Color::DarkGray),
            status_bar_bg: Color::Indexed(236),
            status_key_color: Color::Cyan,
            flash_success: Color::Green,
            flash_error: Color::Red,
            card_border: Color::Indexed(238),
            dominant_border: Color::Cyan,
            popup_border: Color::Cyan,
            popup_title: Style::new().fg(Color::Cyan).bold(),
        }
    }

    /// Light theme palette: darker foregrounds, pale backgrounds
    pub fn light() -> Self {
        Self {
            score_high: Color::Rgb(0, 128, 0),
            score_mid: Color::Rgb(180, 120, 0),
            score_low: Color::Rgb(190, 0, 0),
            bar_empty: Color::Indexed(250),
            slider_on: Color::Blue,
            slider_off: Color::Indexed(250),
            radar_grid: Color::Indexed(248),
            radar_fill: Color::Blue,
            title_style: Style::new().bold(),
            header_style: Style::new().bold(),
            row_selected: Style::new().bg(Color::Indexed(254)),
            muted: Color::Indexed(242),
            title_color: Color::Blue,
            tab_active_style: Style::new().fg(Color::Blue).bold(),
            tab_inactive_style: Style::new().fg(Color::Indexed(245)),
            status_bar_bg: Color::Indexed(254),
            status_key_color: Color::Blue,
            flash_success: Color::Rgb(0, 128, 0),
            flash_error: Color::Rgb(190, 0, 0),
            card_border: Color::Indexed(250),
            dominant_border: Color::Blue,
            popup_border: Color::Blue,
            popup_title: Style::new().fg(Color::Blue).bold(),
        }
    }

    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self::dark(),
            Theme::Light => Self::light(),
        }
    }

    /// Returns the color for a 0-100 percentage
    pub fn score_color(&self, percent: f64) -> Color {
        if percent >= 70.0 {
            self.score_high
        } else if percent >= 40.0 {
            self.score_mid
        } else {
            self.score_low
        }
    }
}

/// Pick a palette from the terminal background luminance.
///
/// Must run before the terminal enters raw/alternate mode. Falls back to dark
/// when the terminal does not answer.
pub fn resolve_theme() -> Theme {
    match terminal_light::luma() {
        Ok(luma) if luma > 0.6 => Theme::Light,
        _ => Theme::Dark,
    }
}
