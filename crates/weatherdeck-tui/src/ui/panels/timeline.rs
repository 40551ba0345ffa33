//! Timeline strip: one column per day of the ±3-day window.
//!
//! Each column shows the weekday, the day of month and the temperature (or a
//! placeholder while that day has no data). Today is emphasized and the
//! selected day is highlighted; ←/→ move the selection.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use weatherdeck_core::dates;

use crate::app::App;
use crate::ui::styles;
use crate::utils::format_temperature;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Timeline ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.weather_data.is_empty() {
        let placeholder = Paragraph::new(Line::styled(
            "No weather data available",
            styles::muted_style(),
        ))
        .alignment(Alignment::Center);
        frame.render_widget(placeholder, inner);
        return;
    }

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![
            Constraint::Ratio(1, app.weather_data.len() as u32);
            app.weather_data.len()
        ])
        .split(inner);

    let today = dates::today();

    for ((date, data), column) in app.weather_data.iter().zip(columns.iter()) {
        let is_today = *date == today;
        let is_selected = app.selected_date == Some(*date);

        let day_style = if is_today {
            styles::today_style()
        } else {
            styles::muted_style()
        };

        let lines = vec![
            Line::styled(dates::weekday_label(*date), day_style).centered(),
            Line::styled(date.format("%d").to_string(), day_style).centered(),
            Line::styled(
                format_temperature(data.as_ref().and_then(|d| d.temperature)),
                if is_today {
                    styles::today_style()
                } else {
                    styles::text_style()
                },
            )
            .centered(),
        ];

        let mut column_widget = Paragraph::new(lines);
        if is_selected {
            column_widget = column_widget.style(styles::selected_style());
        }
        frame.render_widget(column_widget, *column);
    }
}
