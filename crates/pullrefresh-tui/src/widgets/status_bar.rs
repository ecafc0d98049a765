use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let enabled_str = if app.controller.is_enabled() { "ON" } else { "OFF" };

        let state_text = format!(
            " {} | {:>3.0}% | {} ",
            app.controller.phase().as_str().to_uppercase(),
            app.controller.progress() * 100.0,
            enabled_str,
        );

        let message = app
            .status_message
            .as_deref()
            .map(|msg| format!(" {}", msg))
            .unwrap_or_default();

        let help_hint = " q:quit space/enter:pull r:refresh e:toggle ";
        let used = state_text.chars().count() + message.chars().count() + help_hint.len();
        let padding_len = (area.width as usize).saturating_sub(used);

        let message_color = if message.contains("failed") {
            app.theme.error
        } else if message.contains("Refreshed") {
            app.theme.success
        } else {
            app.theme.fg0
        };

        let line = Line::from(vec![
            Span::styled(
                state_text,
                Style::default().fg(app.theme.bg0).bg(app.theme.accent),
            ),
            Span::styled(message, Style::default().fg(message_color).bg(app.theme.bg2)),
            Span::styled(" ".repeat(padding_len), Style::default().bg(app.theme.bg2)),
            Span::styled(
                help_hint,
                Style::default().fg(app.theme.grey2).bg(app.theme.bg2),
            ),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }
}
