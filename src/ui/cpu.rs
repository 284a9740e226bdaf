//! CPU chart view.
//!
//! Plots the `total` and `active` series of the app's CPU window. The x axis
//! is seconds since the oldest sample in the window.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use super::common::view_block;
use crate::app::App;
use crate::data::{CpuMode, CPU_SERIES};

/// Render the CPU view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let history = app.cpu_window.snapshot();
    let cpu = app.data.as_ref().and_then(|d| d.cpu);

    let title = format!(
        " CPU ({}/{} samples) ",
        history.len(),
        app.cpu_window.capacity()
    );

    if history.is_empty() {
        let message = if app.data.is_some() {
            " No CPU usage reported"
        } else {
            " Waiting for data..."
        };
        frame.render_widget(
            Paragraph::new(message)
                .style(Style::default().add_modifier(Modifier::DIM))
                .block(view_block(app, title)),
            area,
        );
        return;
    }

    let chunks = Layout::vertical([Constraint::Length(1), Constraint::Min(4)]).split(area);

    // Current reading above the chart
    let summary = match cpu {
        Some(sample) => {
            let unit = match sample.mode {
                CpuMode::Percent => "%",
                CpuMode::Counters => "",
            };
            Line::from(vec![
                Span::styled(" active ", Style::default().fg(app.theme.cpu_active)),
                Span::raw(format!("{:.1}{}", sample.active, unit)),
                Span::styled("  total ", Style::default().fg(app.theme.cpu_total)),
                Span::raw(format!("{:.1}{}", sample.total, unit)),
                Span::raw("  utilization "),
                Span::styled(
                    format!("{:.1}%", sample.utilization()),
                    app.theme.usage_style(sample.utilization()),
                ),
            ])
        }
        None => Line::from(" -"),
    };
    frame.render_widget(Paragraph::new(summary), chunks[0]);

    let total_points = history.points(CPU_SERIES[0]);
    let active_points = history.points(CPU_SERIES[1]);

    let datasets = vec![
        Dataset::default()
            .name(CPU_SERIES[0])
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(app.theme.cpu_total))
            .data(&total_points),
        Dataset::default()
            .name(CPU_SERIES[1])
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(app.theme.cpu_active))
            .data(&active_points),
    ];

    let x_max = history.span_secs().max(1.0);
    let y_max = match cpu.map(|c| c.mode) {
        Some(CpuMode::Percent) => 100.0,
        _ => history.max_value().filter(|m| *m > 0.0).unwrap_or(1.0) * 1.1,
    };

    let axis_style = Style::default().fg(app.theme.border);
    let chart = Chart::new(datasets)
        .block(view_block(app, title))
        .x_axis(
            Axis::default()
                .title("seconds")
                .style(axis_style)
                .bounds([0.0, x_max])
                .labels(vec![
                    Span::raw("0"),
                    Span::raw(format!("{:.0}", x_max / 2.0)),
                    Span::raw(format!("{:.0}", x_max)),
                ]),
        )
        .y_axis(
            Axis::default()
                .style(axis_style)
                .bounds([0.0, y_max])
                .labels(vec![
                    Span::raw("0"),
                    Span::raw(format!("{:.0}", y_max / 2.0)),
                    Span::raw(format!("{:.0}", y_max)),
                ]),
        );

    frame.render_widget(chart, chunks[1]);
}
