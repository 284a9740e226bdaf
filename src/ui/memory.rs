//! Memory map view.
//!
//! A table of the appliance's memory regions, each with its palette color, its
//! address range, size and a usage bar. The selected region's description and
//! usage are shown below the table.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use super::common::view_block;
use crate::app::App;
use crate::data::memmap::PLACEHOLDER_NAME;
use crate::data::units::format_bytes;
use crate::data::MemoryRegion;

/// Width of the usage bar in cells.
const BAR_WIDTH: usize = 10;

/// Render the Memory view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let regions = app.visible_regions();
    let hidden = app.memmap.len() - regions.len();

    let hidden_info = if hidden > 0 {
        format!(" [{} {} hidden, H:show]", hidden, PLACEHOLDER_NAME)
    } else {
        String::new()
    };

    if regions.is_empty() {
        let title = format!(" Memory map{} ", hidden_info);
        frame.render_widget(
            Paragraph::new(" No memory map reported")
                .style(Style::default().add_modifier(Modifier::DIM))
                .block(view_block(app, title)),
            area,
        );
        return;
    }

    let chunks = Layout::vertical([Constraint::Min(4), Constraint::Length(2)]).split(area);

    let header = Row::new(vec![
        Cell::from("Region"),
        Cell::from("Range"),
        Cell::from("Size"),
        Cell::from("In use"),
        Cell::from("Usage"),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = regions.iter().map(|r| region_row(app, r)).collect();

    let selected = app.selected_region.min(regions.len().saturating_sub(1));
    let total: u64 = regions.iter().map(|r| r.size).sum();
    let title = format!(
        " Memory map ({} regions, {}){} [{}/{}] ",
        regions.len(),
        format_bytes(total),
        hidden_info,
        selected + 1,
        regions.len()
    );

    let widths = [
        Constraint::Fill(2),
        Constraint::Fill(3),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Min(BAR_WIDTH as u16 + 6),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(view_block(app, title))
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(Some(selected));
    frame.render_stateful_widget(table, chunks[0], &mut state);

    if let Some(region) = regions.get(selected) {
        let detail = vec![
            Line::from(vec![
                Span::styled(
                    format!(" {} ", region.label()),
                    Style::default()
                        .fg(app.theme.region_color(region.index))
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(region.description.clone()),
            ]),
            Line::from(format!(" {}", region.detail())),
        ];
        frame.render_widget(Paragraph::new(detail), chunks[1]);
    }
}

fn region_row(app: &App, region: &MemoryRegion) -> Row<'static> {
    let color = app.theme.region_color(region.index);
    let percent = region.usage_percent();

    Row::new(vec![
        Cell::from(Line::from(vec![
            Span::styled("■ ", Style::default().fg(color)),
            Span::raw(region.label()),
        ])),
        Cell::from(region.range()),
        Cell::from(format_bytes(region.size)),
        Cell::from(format_bytes(region.in_use)),
        Cell::from(format!("{} {:>3.0}%", usage_bar(percent), percent))
            .style(app.theme.usage_style(percent)),
    ])
}

/// Text bar for a 0-100 percentage, e.g. `███▌      `.
fn usage_bar(percent: f64) -> String {
    let filled = (percent.clamp(0.0, 100.0) / 100.0 * BAR_WIDTH as f64 * 2.0).round() as usize;
    let full = filled / 2;
    let half = filled % 2;
    let mut bar = "█".repeat(full);
    if half == 1 {
        bar.push('▌');
    }
    let used = full + half;
    bar.push_str(&" ".repeat(BAR_WIDTH - used));
    bar
}
