use pullrefresh_core::{IndicatorFrame, IndicatorTransform, Phase};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Gauge, Paragraph},
    Frame,
};

use crate::app::App;

const ARROWS: [&str; 5] = ["↓", "↙", "←", "↖", "↑"];
const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const DEFAULT_SIZE: u16 = 3;

/// Draws the pull indicator in the gap opened above the content
pub struct IndicatorWidget;

impl IndicatorWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        let indicator = app.indicator_frame();
        if !indicator.is_visible() {
            return;
        }

        let color = app.theme.indicator_color(&app.indicator);
        let size = app.indicator.size.unwrap_or(DEFAULT_SIZE).max(1);

        // Bottom row of the gap, right above the content
        let row = Rect {
            y: area.y + area.height - 1,
            height: 1,
            ..area
        };

        match indicator {
            IndicatorFrame::Default(transform) => {
                let mut style = Style::default().fg(color).bg(app.theme.bg0);
                if transform.scale >= 1.0 {
                    style = style.add_modifier(Modifier::BOLD);
                }
                if transform.opacity < 0.5 {
                    style = style.add_modifier(Modifier::DIM);
                }

                let glyph = if transform.spinning {
                    spinner_glyph(app.spinner_index())
                } else {
                    arrow_glyph(transform.rotation_deg)
                };
                let count = glyph_count(size, &transform);
                let line = Line::from(vec![
                    Span::styled(glyph.repeat(count), style),
                    Span::styled(format!(" {}", label(app.controller.phase())), style),
                ]);

                let paragraph = Paragraph::new(line).alignment(Alignment::Center);
                frame.render_widget(paragraph, row);
            }
            IndicatorFrame::Custom { progress, phase } => {
                let width = (size * 10).min(row.width);
                let gauge_area = Rect {
                    x: row.x + (row.width - width) / 2,
                    width,
                    ..row
                };
                let gauge = Gauge::default()
                    .gauge_style(Style::default().fg(color).bg(app.theme.bg1))
                    .ratio(progress.clamp(0.0, 1.0))
                    .label(format!("{:.0}% {}", progress * 100.0, phase));
                frame.render_widget(gauge, gauge_area);
            }
        }
    }
}

/// Arrow for the given rotation, pointing down at rest and up once armed
pub fn arrow_glyph(rotation_deg: f64) -> &'static str {
    let step = (rotation_deg.clamp(0.0, 180.0) / 45.0).round() as usize;
    ARROWS[step.min(ARROWS.len() - 1)]
}

pub fn spinner_glyph(index: usize) -> &'static str {
    SPINNER[index % SPINNER.len()]
}

/// Number of glyphs drawn, scaling the configured size by the transform
pub fn glyph_count(size: u16, transform: &IndicatorTransform) -> usize {
    ((size as f64 * transform.scale).round() as usize).max(1)
}

pub fn label(phase: Phase) -> &'static str {
    match phase {
        Phase::Idle | Phase::Pulling => "Pull to refresh",
        Phase::Armed => "Release to refresh",
        Phase::Refreshing => "Refreshing...",
        Phase::Settling => "Done",
    }
}
