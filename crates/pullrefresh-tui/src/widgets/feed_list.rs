use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

use crate::app::App;

pub struct FeedListWidget;

impl FeedListWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let border_style = match app.controller.phase() {
            pullrefresh_core::Phase::Armed => Style::default().fg(app.theme.yellow),
            _ if app.controller.is_enabled() => Style::default().fg(app.theme.accent),
            _ => Style::default().fg(app.theme.grey0),
        };

        let block = Block::default()
            .title(" Feed ")
            .borders(Borders::ALL)
            .border_style(border_style)
            .style(Style::default().bg(app.theme.bg0));

        let items: Vec<ListItem> = app
            .feed
            .items()
            .into_iter()
            .map(|item| {
                let time = item.fetched_at.format("%H:%M:%S").to_string();
                ListItem::new(Line::from(vec![
                    Span::styled(time, Style::default().fg(app.theme.grey2)),
                    Span::raw("  "),
                    Span::styled(item.title, Style::default().fg(app.theme.fg0)),
                ]))
            })
            .collect();

        let list = List::new(items).block(block);

        let mut state = ListState::default().with_offset(app.list_scroll);
        frame.render_stateful_widget(list, area, &mut state);
    }
}
