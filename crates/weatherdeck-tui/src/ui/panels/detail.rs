//! Main display: the resolved location and the selected day's weather.

use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::ui::styles;
use crate::utils::{format_metric, format_temperature, truncate};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let title = format!(" {} ", truncate(&app.location.display(), 48));

    let block = Block::default()
        .title(title)
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    let mut lines = vec![Line::from("")];

    match app.selected_weather() {
        Some(data) => {
            lines.push(
                Line::styled(
                    format_temperature(data.temperature),
                    styles::highlight_style(),
                )
                .centered(),
            );
            lines.push(Line::styled(data.description.clone(), styles::text_style()).centered());
            lines.push(Line::from(""));
            lines.push(metric_line("Wind", format_metric(data.wind_speed, "km/h")));
            lines.push(metric_line("Pressure", format_metric(data.pressure, "hPa")));
            lines.push(metric_line("Precip", format_metric(data.precip, "mm")));
        }
        None => {
            let message = if app.is_loading {
                "Loading..."
            } else if app.weather_data.is_empty() {
                "Enter a location to see the weather"
            } else {
                "No data for this day"
            };
            lines.push(Line::styled(message, styles::muted_style()).centered());
        }
    }

    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Left);
    frame.render_widget(paragraph, area);
}

fn metric_line(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::raw("   "),
        Span::styled(format!("{:<10}", format!("{}:", label)), styles::muted_style()),
        Span::styled(value, styles::text_style()),
    ])
}
