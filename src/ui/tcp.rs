//! TCP status view.
//!
//! The appliance's TCP block has no fixed layout, so it is shown as flattened
//! `path = value` rows.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    widgets::{Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use super::common::view_block;
use crate::app::App;

/// Render the TCP view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let rows = app.tcp_rows();

    if rows.is_empty() {
        frame.render_widget(
            Paragraph::new(" No TCP status reported")
                .style(Style::default().add_modifier(Modifier::DIM))
                .block(view_block(app, " TCP ".to_string())),
            area,
        );
        return;
    }

    let header = Row::new(vec![Cell::from("Key"), Cell::from("Value")])
        .height(1)
        .style(app.theme.header);

    let selected = app.selected_tcp.min(rows.len() - 1);
    let title = format!(" TCP ({} entries) [{}/{}] ", rows.len(), selected + 1, rows.len());

    let table_rows: Vec<Row> = rows
        .into_iter()
        .map(|(key, value)| {
            Row::new(vec![
                Cell::from(key).style(Style::default().fg(app.theme.highlight)),
                Cell::from(value),
            ])
        })
        .collect();

    let table = Table::new(table_rows, [Constraint::Fill(1), Constraint::Fill(2)])
        .header(header)
        .block(view_block(app, title))
        .row_highlight_style(app.theme.selected);

    let mut state = TableState::default();
    state.select(Some(selected));

    frame.render_stateful_widget(table, area, &mut state);
}
