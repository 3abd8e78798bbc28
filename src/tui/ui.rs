use ratatui::prelude::*;
use ratatui::symbols::Marker;
use ratatui::widgets::canvas::{Canvas, Line as CanvasLine};
use ratatui::widgets::{Block, Cell, Clear, List, ListItem, Paragraph, Row, Table, Tabs, Wrap};

use crate::reference::{Dimension, ReferenceData};
use crate::scoring::{ScoreResult, SCALE_MAX, SCALE_MIN};
use crate::tui::app::{App, InputMode, Screen};
use crate::tui::radar;
use crate::tui::theme::ThemeColors;

pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Handle very small terminal sizes gracefully
    if area.height < 10 || area.width < 40 {
        let msg = Paragraph::new("Terminal too small")
            .alignment(Alignment::Center);
        frame.render_widget(msg, area);
        return;
    }

    // Layout: Title(1) + Tabs(1) + Body(fill) + Status(1)
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .split(area);

    render_title(frame, chunks[0], &app.theme);
    render_tabs(frame, chunks[1], app);
    match app.screen {
        Screen::Quiz => render_quiz(frame, chunks[2], app),
        Screen::Result => render_result(frame, chunks[2], app),
        Screen::History => render_history(frame, chunks[2], app),
    }
    render_status_bar(frame, chunks[3], app);

    if app.input_mode == InputMode::Help {
        render_help_popup(frame, &app.theme);
    }
}

fn render_title(frame: &mut Frame, area: Rect, theme: &ThemeColors) {
    let title = Line::from(vec![
        Span::styled("POPA", Style::default().fg(theme.title_color).bold()),
        Span::styled(
            "  Outcome / Relation / Process / Value",
            Style::default().fg(theme.muted),
        ),
    ]);
    frame.render_widget(Paragraph::new(title), area);
}

fn render_tabs(frame: &mut Frame, area: Rect, app: &App) {
    let titles = vec!["Questions", "Result", "History"];
    let selected = match app.screen {
        Screen::Quiz => 0,
        Screen::Result => 1,
        Screen::History => 2,
    };

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.theme.tab_inactive_style)
        .highlight_style(app.theme.tab_active_style.reversed())
        .divider(" | ");

    frame.render_widget(tabs, area);
}

fn render_quiz(frame: &mut Frame, area: Rect, app: &mut App) {
    let theme = app.theme.clone();
    let questions = app.reference.questions();

    let items: Vec<ListItem> = questions
        .iter()
        .zip(&app.responses)
        .enumerate()
        .map(|(idx, (question, &response))| {
            let heading = Line::from(vec![
                Span::styled(format!("Q{}. ", idx + 1), Style::default().fg(theme.muted)),
                Span::raw(question.text.clone()),
            ]);
            ListItem::new(vec![heading, slider_line(response, &theme), Line::from("")])
        })
        .collect();

    let answered = format!(" Questions ({}) ", questions.len());
    let list = List::new(items)
        .block(Block::bordered().title(answered).border_style(Style::default().fg(theme.card_border)))
        .highlight_style(theme.row_selected)
        .highlight_symbol("▶ ");

    frame.render_stateful_widget(list, area, &mut app.list_state);
}

/// "    1 ○ ○ ● ○ ○ 5"
fn slider_line(response: u8, theme: &ThemeColors) -> Line<'static> {
    let mut spans = vec![Span::styled(
        format!("    {} ", SCALE_MIN),
        Style::default().fg(theme.muted),
    )];
    for value in SCALE_MIN..=SCALE_MAX {
        if value == response {
            spans.push(Span::styled("●", Style::default().fg(theme.slider_on).bold()));
        } else {
            spans.push(Span::styled("○", Style::default().fg(theme.slider_off)));
        }
        spans.push(Span::raw(" "));
    }
    spans.push(Span::styled(format!("{}", SCALE_MAX), Style::default().fg(theme.muted)));
    Line::from(spans)
}

fn render_result(frame: &mut Frame, area: Rect, app: &App) {
    let Some(result) = &app.last_result else {
        let msg = Paragraph::new("No result yet. Answer the questions and press Enter to submit.")
            .alignment(Alignment::Center)
            .style(Style::default().fg(app.theme.muted));
        frame.render_widget(msg, area);
        return;
    };

    let rows = Layout::vertical([Constraint::Length(16), Constraint::Fill(1)]).split(area);
    let top = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);

    render_radar(frame, top[0], result, &app.theme);
    render_score_table(frame, top[1], result, &app.reference, &app.theme);
    render_profile_cards(frame, rows[1], result, &app.reference, &app.theme);
}

fn render_radar(frame: &mut Frame, area: Rect, result: &ScoreResult, theme: &ThemeColors) {
    let data = radar::data_polygon(result.normalized());
    let grid_color = theme.radar_grid;
    let fill_color = theme.radar_fill;
    let label_style = Style::default().fg(theme.muted).bold();

    let canvas = Canvas::default()
        .block(Block::bordered().title(" Score (%) ").border_style(Style::default().fg(theme.card_border)))
        .marker(Marker::Braille)
        .x_bounds([-135.0, 135.0])
        .y_bounds([-125.0, 125.0])
        .paint(move |ctx| {
            for radius in radar::GRID_RINGS {
                let ring = radar::ring(radius);
                for ((x1, y1), (x2, y2)) in radar::segments(&ring) {
                    ctx.draw(&CanvasLine::new(x1, y1, x2, y2, grid_color));
                }
            }
            for dim in Dimension::ALL {
                let (x, y) = radar::axis_point(dim, radar::RADIAL_MAX);
                ctx.draw(&CanvasLine::new(0.0, 0.0, x, y, grid_color));
            }

            ctx.layer();
            for ((x1, y1), (x2, y2)) in radar::segments(&data) {
                ctx.draw(&CanvasLine::new(x1, y1, x2, y2, fill_color));
            }

            for dim in Dimension::ALL {
                let (x, y) = radar::axis_point(dim, radar::RADIAL_MAX + 12.0);
                // Shift left-side labels so they end near the axis tip
                let x = if x < -1.0 { x - 10.0 } else if x.abs() <= 1.0 { x - 8.0 } else { x };
                ctx.print(x, y, Span::styled(dim.display_name(), label_style));
            }
        });

    frame.render_widget(canvas, area);
}

fn render_score_table(
    frame: &mut Frame,
    area: Rect,
    result: &ScoreResult,
    reference: &ReferenceData,
    theme: &ThemeColors,
) {
    let dominant = result.dominant();

    let rows: Vec<Row> = Dimension::ALL
        .into_iter()
        .map(|dim| {
            let mean = result.means().get(dim);
            let percent = result.normalized().get(dim);
            let bar = if result.answered(dim) == 0 {
                Line::from(Span::styled("n/a", Style::default().fg(theme.muted)))
            } else {
                score_bar(percent, 10, theme)
            };

            let name_style = if dim == dominant {
                Style::default().fg(theme.dominant_border).bold()
            } else {
                Style::default()
            };

            Row::new(vec![
                Cell::from(dim.display_name()).style(name_style),
                Cell::from(format!("{:.2}", mean)),
                Cell::from(format!("{:.1}%", percent)).style(Style::default().fg(theme.score_color(percent))),
                Cell::from(bar),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(10),
        Constraint::Length(6),
        Constraint::Length(8),
        Constraint::Fill(1),
    ];

    let title = format!(" Dominant: {} ", reference.profile(dominant).label);
    let table = Table::new(rows, widths)
        .header(
            Row::new(vec!["Dimension", "Mean", "Percent", ""])
                .style(theme.header_style)
                .bottom_margin(1),
        )
        .block(
            Block::bordered()
                .title(title)
                .title_style(theme.popup_title)
                .border_style(Style::default().fg(theme.card_border)),
        );

    frame.render_widget(table, area);
}

fn render_profile_cards(
    frame: &mut Frame,
    area: Rect,
    result: &ScoreResult,
    reference: &ReferenceData,
    theme: &ThemeColors,
) {
    let dominant = result.dominant();
    let columns = Layout::horizontal([Constraint::Fill(1); 4]).split(area);

    for (dim, column) in Dimension::ALL.into_iter().zip(columns.iter()) {
        let profile = reference.profile(dim);
        let lines: Vec<Line> = profile
            .fields()
            .into_iter()
            .map(|(name, value)| {
                Line::from(vec![
                    Span::styled(format!("{}: ", name), Style::default().fg(theme.muted).bold()),
                    Span::raw(value.to_string()),
                ])
            })
            .collect();

        let border = if dim == dominant {
            theme.dominant_border
        } else {
            theme.card_border
        };

        let card = Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(
                Block::bordered()
                    .title(format!(" {} ", profile.label))
                    .border_style(Style::default().fg(border)),
            );
        frame.render_widget(card, *column);
    }
}

fn render_history(frame: &mut Frame, area: Rect, app: &App) {
    let entries = app.history();
    let theme = &app.theme;

    if entries.is_empty() {
        let msg = Paragraph::new("No history yet. Submit the questionnaire to record a result.")
            .alignment(Alignment::Center)
            .style(Style::default().fg(theme.muted));
        frame.render_widget(msg, area);
        return;
    }

    let rows: Vec<Row> = entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            let mut cells = vec![
                Cell::from(format!("{}.", idx + 1)).style(Style::default().fg(theme.muted)),
                Cell::from(entry.local_time()),
            ];
            for dim in Dimension::ALL {
                let percent = entry.normalized.get(dim);
                cells.push(
                    Cell::from(format!("{:>6.1}%", percent))
                        .style(Style::default().fg(theme.score_color(percent))),
                );
            }
            cells.push(Cell::from(entry.dominant.display_name()));
            Row::new(cells)
        })
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Length(20),
        Constraint::Length(9),
        Constraint::Length(9),
        Constraint::Length(9),
        Constraint::Length(9),
        Constraint::Fill(1),
    ];

    let table = Table::new(rows, widths)
        .header(
            Row::new(vec!["#", "Timestamp", "Outcome", "Relation", "Process", "Value", "Dominant"])
                .style(theme.header_style)
                .bottom_margin(1),
        )
        .block(
            Block::bordered()
                .title(" History (this session only) ")
                .border_style(Style::default().fg(theme.card_border)),
        );

    frame.render_widget(table, area);
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;

    let text = if let Some((ref msg, _)) = app.flash_message {
        let msg_color = if msg.starts_with("Failed") || msg.starts_with("Error") || msg.starts_with("Session expired") {
            theme.flash_error
        } else if msg.starts_with("Exported:") || msg.starts_with("Scored:") {
            theme.flash_success
        } else {
            Color::White
        };
        Line::from(Span::styled(msg.clone(), Style::default().fg(msg_color)))
    } else {
        let position = match app.screen {
            Screen::Quiz => format!(
                "Q{}/{}",
                app.selected_question().map(|i| i + 1).unwrap_or(0),
                app.responses.len()
            ),
            Screen::Result => "Result".to_string(),
            Screen::History => format!("{} results", app.history().len()),
        };

        let hints: &[(&str, &str)] = match app.screen {
            Screen::Quiz => &[
                ("j/k", ":nav "),
                ("h/l", ":adjust "),
                ("1-5", ":set "),
                ("Enter", ":submit "),
                ("Tab", ":view "),
                ("?", ":help "),
                ("q", ":quit"),
            ],
            Screen::Result => &[
                ("e", ":export "),
                ("r", ":retake "),
                ("Tab", ":view "),
                ("?", ":help "),
                ("q", ":quit"),
            ],
            Screen::History => &[("Tab", ":view "), ("?", ":help "), ("q", ":quit")],
        };

        let mut spans = vec![
            Span::styled(position, Style::default().fg(theme.muted)),
            Span::raw("  "),
        ];
        for (key, label) in hints {
            spans.push(Span::styled(*key, Style::default().fg(theme.status_key_color)));
            spans.push(Span::raw(*label));
        }
        Line::from(spans)
    };

    frame.render_widget(
        Paragraph::new(text).style(Style::default().bg(theme.status_bar_bg)),
        area,
    );
}

fn score_bar(percent: f64, width: usize, theme: &ThemeColors) -> Line<'static> {
    let ratio = (percent / 100.0).clamp(0.0, 1.0);
    let filled = (ratio * width as f64).round() as usize;
    let empty = width.saturating_sub(filled);

    let mut spans = Vec::new();
    if filled > 0 {
        spans.push(Span::styled(
            "█".repeat(filled),
            Style::default().fg(theme.score_color(percent)),
        ));
    }
    if empty > 0 {
        spans.push(Span::styled("░".repeat(empty), Style::default().fg(theme.bar_empty)));
    }

    Line::from(spans)
}

/// Create a centered rectangle with fixed width and height
fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    // Clamp dimensions to area bounds
    let width = width.min(area.width);
    let height = height.min(area.height);

    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect {
        x,
        y,
        width,
        height,
    }
}

/// Render the help overlay popup
fn render_help_popup(frame: &mut Frame, theme: &ThemeColors) {
    let popup_area = centered_rect_fixed(50, 17, frame.area());

    frame.render_widget(Clear, popup_area);

    let block = Block::bordered()
        .title(" Keyboard Shortcuts ")
        .title_style(theme.popup_title)
        .border_style(Style::default().fg(theme.popup_border));
    frame.render_widget(block.clone(), popup_area);

    let inner = block.inner(popup_area);

    let key_style = Style::default().fg(theme.status_key_color).bold();
    let shortcuts = [
        ("j / Down      ", "Next question"),
        ("k / Up        ", "Previous question"),
        ("l / Right     ", "Raise answer"),
        ("h / Left      ", "Lower answer"),
        ("1 - 5         ", "Set answer directly"),
        ("Enter         ", "Submit answers"),
        ("e             ", "Export result as CSV"),
        ("r             ", "Retake (reset answers)"),
        ("Tab           ", "Switch view"),
        ("?             ", "Show/hide this help"),
        ("q / Ctrl-c    ", "Quit"),
    ];

    let mut help_lines: Vec<Line> = shortcuts
        .iter()
        .map(|(key, action)| Line::from(vec![Span::styled(*key, key_style), Span::raw(*action)]))
        .collect();
    help_lines.push(Line::from(""));
    help_lines.push(Line::from(Span::styled(
        "Press any key to close",
        Style::default().fg(theme.muted),
    )));

    frame.render_widget(Paragraph::new(help_lines), inner);
}
