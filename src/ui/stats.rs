//! Statistics tree view.
//!
//! Shows the flattened [`StatTree`](crate::data::StatTree) as a table: one row
//! per visible node, indented by depth, with the value column filled in for
//! leaves and a leaf count for collapsed branches.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use super::common::{filter_info, view_block};
use crate::app::App;
use crate::data::units::format_count;
use crate::data::TreeRow;

/// Render the Stats view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let rows = app.visible_rows();

    if rows.is_empty() {
        let message = match app.data {
            None => " Waiting for data...",
            Some(ref data) if data.stats.is_empty() => " No statistics reported",
            Some(_) => " No statistics match the filter",
        };
        let block = view_block(app, format!(" Statistics{} ", filter_info(app)));
        frame.render_widget(
            Paragraph::new(message)
                .style(Style::default().add_modifier(Modifier::DIM))
                .block(block),
            area,
        );
        return;
    }

    let header = Row::new(vec![Cell::from("Name"), Cell::from("Value")])
        .height(1)
        .style(app.theme.header);

    let table_rows: Vec<Row> = rows.iter().map(|row| tree_row(app, row)).collect();

    let total = app.data.as_ref().map_or(0, |d| d.stats.leaf_count());
    let selected = app.selected_row.min(rows.len().saturating_sub(1));
    let title = format!(
        " Statistics ({} metrics){} [{}/{}] ",
        format_count(total as u64),
        filter_info(app),
        selected + 1,
        rows.len()
    );

    let widths = [Constraint::Fill(3), Constraint::Fill(1)];
    let table = Table::new(table_rows, widths)
        .header(header)
        .block(view_block(app, title))
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(Some(selected));

    frame.render_stateful_widget(table, area, &mut state);
}

fn tree_row(app: &App, row: &TreeRow) -> Row<'static> {
    let indent = "  ".repeat(row.depth);
    let node = row.node;

    if node.is_leaf() {
        let value = node.value().map(ToString::to_string).unwrap_or_default();
        return Row::new(vec![
            Cell::from(format!("{}  {}", indent, node.label())),
            Cell::from(value),
        ]);
    }

    let marker = if row.expanded { "▾" } else { "▸" };
    let name = Line::from(vec![
        Span::raw(format!("{}{} ", indent, marker)),
        Span::styled(
            node.label().to_string(),
            Style::default().fg(app.theme.highlight),
        ),
    ]);
    let summary = if row.expanded {
        String::new()
    } else {
        format!("({})", node.leaf_count())
    };

    Row::new(vec![
        Cell::from(name),
        Cell::from(summary).style(Style::default().add_modifier(Modifier::DIM)),
    ])
}
