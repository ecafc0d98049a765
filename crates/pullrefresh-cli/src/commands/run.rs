use std::io;
use std::sync::Arc;

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    Terminal,
};
use tracing::info;

use pullrefresh_core::AppConfig;
use pullrefresh_tui::{
    event::{AppEvent, EventHandler},
    input::handle_key_event,
    widgets::{FeedListWidget, IndicatorWidget, StatusBarWidget},
    App, Theme,
};

pub async fn run(config: Arc<AppConfig>) -> Result<()> {
    // Mount before touching the terminal so a bad config fails cleanly
    let mut app = App::new(&config, Theme::default())?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, SetTitle("pullrefresh"))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    info!(
        threshold = config.pull.pull_threshold,
        max = config.pull.max_pull_distance,
        "Starting pull-to-refresh demo"
    );
    let result = main_loop(&mut terminal, &mut app, &config);
    app.controller.reset();

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn main_loop<B: Backend>(terminal: &mut Terminal<B>, app: &mut App, config: &AppConfig) -> Result<()> {
    let event_handler =
        EventHandler::with_animation_tick(config.ui.tick_rate_ms, config.ui.animation_tick_duration());

    loop {
        // Pick up finished refreshes and advance the pull animation
        app.on_tick();

        let view: &App = app;
        terminal.draw(|frame| {
            let size = frame.area();

            // Main layout: content + status bar
            let main_layout = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(1), Constraint::Length(1)])
                .split(size);

            // The pull opens a gap above the list for the indicator
            let gap = view.pull_rows().min(main_layout[0].height.saturating_sub(1));
            let content = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(gap), Constraint::Min(1)])
                .split(main_layout[0]);

            IndicatorWidget::render(frame, content[0], view);
            FeedListWidget::render(frame, content[1], view);
            StatusBarWidget::render(frame, main_layout[1], view);
        })?;

        if let Some(event) = event_handler.next(app.needs_fast_update())? {
            match event {
                AppEvent::Key(key) => {
                    let action = handle_key_event(key);
                    app.handle_action(action);
                }
                AppEvent::Mouse(mouse) => {
                    let action = app.drag.handle_mouse_event(mouse);
                    app.handle_action(action);
                }
                AppEvent::Resize(_, _) | AppEvent::Tick => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
