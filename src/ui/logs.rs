//! Log tail view.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    widgets::{List, ListItem, ListState, Paragraph},
    Frame,
};

use super::common::{filter_info, view_block};
use crate::app::App;

/// Render the Logs view.
///
/// The selection follows the newest line until the user scrolls up.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let lines = app.filtered_logs();
    let total = app.data.as_ref().map_or(0, |d| d.logs.len());

    if lines.is_empty() {
        let message = if total == 0 {
            " No log lines reported"
        } else {
            " No log lines match the filter"
        };
        frame.render_widget(
            Paragraph::new(message)
                .style(Style::default().add_modifier(Modifier::DIM))
                .block(view_block(app, format!(" Log{} ", filter_info(app)))),
            area,
        );
        return;
    }

    let selected = app.selected_log.min(lines.len() - 1);
    let following = if selected + 1 == lines.len() {
        " [following]"
    } else {
        ""
    };
    let title = format!(
        " Log ({}/{}){}{} ",
        lines.len(),
        total,
        filter_info(app),
        following
    );

    let items: Vec<ListItem> = lines.iter().map(|line| ListItem::new(line.to_string())).collect();

    let list = List::new(items)
        .block(view_block(app, title))
        .highlight_style(app.theme.selected);

    let mut state = ListState::default();
    state.select(Some(selected));

    frame.render_stateful_widget(list, area, &mut state);
}
