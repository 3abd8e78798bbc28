pub mod app;
pub mod event;
pub mod radar;
pub mod theme;
pub mod ui;

pub use app::App;
pub use theme::{resolve_theme, Theme, ThemeColors};

use crate::session::HistoryEntry;
use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use event::{Event, EventHandler};
use ratatui::DefaultTerminal;

/// Run the interactive questionnaire until the user quits and return the
/// history of the session that was active at exit.
pub async fn run_tui(mut app: App) -> anyhow::Result<Vec<HistoryEntry>> {
    // Buffer stderr while TUI is active to prevent output corrupting the display
    crate::stderr_buffer::activate();

    // Init terminal (sets up panic hooks automatically)
    let mut terminal = ratatui::init();

    let result = event_loop(&mut terminal, &mut app).await;

    // Restore terminal
    ratatui::restore();

    // Flush buffered stderr messages now that the terminal is restored
    for msg in crate::stderr_buffer::drain() {
        eprintln!("{}", msg);
    }

    result.map(|()| app.history().to_vec())
}

async fn event_loop(terminal: &mut DefaultTerminal, app: &mut App) -> anyhow::Result<()> {
    let mut events = EventHandler::new(250); // 250ms tick

    loop {
        terminal.draw(|frame| ui::draw(frame, app))?;

        match events.next().await {
            Some(Event::Key(key)) => {
                app.touch(Utc::now());
                handle_key_event(app, key);
            }
            Some(Event::Tick) => app.on_tick(Utc::now()),
            // Terminal input closed; nothing more can arrive
            None => return Ok(()),
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key_event(app: &mut App, key: KeyEvent) {
    match app.input_mode {
        app::InputMode::Normal => {
            match key.code {
                // Quit
                KeyCode::Char('q') => app.should_quit = true,
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    app.should_quit = true
                }

                // View switching
                KeyCode::Tab => app.cycle_screen(),

                // Help
                KeyCode::Char('?') => app.show_help(),

                _ => match app.screen {
                    app::Screen::Quiz => handle_quiz_key(app, key),
                    app::Screen::Result => handle_result_key(app, key),
                    app::Screen::History => {}
                },
            }
        }
        app::InputMode::Help => {
            // Any key exits help
            app.dismiss_help();
        }
    }
}

fn handle_quiz_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.next_question(),
        KeyCode::Char('k') | KeyCode::Up => app.previous_question(),
        KeyCode::Char('l') | KeyCode::Right => app.increase_response(),
        KeyCode::Char('h') | KeyCode::Left => app.decrease_response(),
        KeyCode::Char(c @ '1'..='5') => {
            if let Some(value) = c.to_digit(10) {
                app.set_response(value as u8);
            }
        }
        KeyCode::Enter => app.submit(Utc::now()),
        _ => {}
    }
}

fn handle_result_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('e') => app.export_result(),
        KeyCode::Char('r') => app.reset_form(),
        _ => {}
    }
}
