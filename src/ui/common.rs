//! Common UI components shared across views.
//!
//! This module contains the header bar, tab bar, status bar, and help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};

use crate::app::{App, View};
use crate::data::units::format_bytes;

/// Render the header bar with the service status.
///
/// Displays: service name and version, uptime, heap usage, CPU frequency.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let title = Span::styled(" ACORN ", Style::default().add_modifier(Modifier::BOLD));

    let Some(status) = app.data.as_ref().and_then(|d| d.status.as_ref()) else {
        let state = if app.data.is_some() {
            "No status reported"
        } else {
            "Loading..."
        };
        let line = Line::from(vec![title, Span::raw(format!("│ {}", state))]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    };

    let indicator = if app.load_error.is_some() {
        Span::styled(" ● ", Style::default().fg(app.theme.error))
    } else {
        Span::styled(" ● ", Style::default().fg(app.theme.ok))
    };

    let mut spans = vec![
        indicator,
        title,
        Span::raw("│ "),
        Span::styled(
            status.service.clone().unwrap_or_else(|| "unknown service".to_string()),
            Style::default().fg(app.theme.highlight),
        ),
    ];

    if let Some(ref version) = status.version {
        spans.push(Span::raw(format!(" {}", version)));
    }

    spans.push(Span::raw(" │ up "));
    spans.push(Span::raw(
        status.uptime_label().unwrap_or_else(|| "-".to_string()),
    ));

    if let Some(heap) = status.heap_usage {
        spans.push(Span::raw(format!(" │ heap {}", format_bytes(heap))));
    }
    if let Some(freq) = status.cpu_freq {
        spans.push(Span::raw(format!(" │ {:.0} MHz", freq)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the tab bar showing available views.
///
/// Highlights the currently active view.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = View::ALL
        .iter()
        .map(|view| Line::from(format!(" {}:{} ", view.index() + 1, view.label())))
        .collect();

    let tabs = Tabs::new(titles)
        .select(app.current_view.index())
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Render the status bar at the bottom.
///
/// Shows: data source, time since last update, available controls.
/// Also displays temporary status messages and errors.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    // Check for temporary status message first
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    if let Some(ref err) = app.load_error {
        let updated = app
            .data
            .as_ref()
            .map(|d| format!(" | showing data from {:.1}s ago", d.last_updated.elapsed().as_secs_f64()))
            .unwrap_or_default();
        let paragraph = Paragraph::new(format!(" Error: {}{} | q:quit r:retry", err, updated))
            .style(Style::default().fg(app.theme.error));
        frame.render_widget(paragraph, area);
        return;
    }

    let status = if let Some(ref data) = app.data {
        let elapsed = data.last_updated.elapsed();

        let controls = if app.filter_active {
            "Type to search | Enter:apply Esc:cancel"
        } else {
            match app.current_view {
                View::Stats => "/:search Enter:toggle +/-:all Tab:switch ?:help q:quit",
                View::Cpu => "Tab:switch e:export ?:help q:quit",
                View::Memory => "↑↓:select H:hidden Tab:switch ?:help q:quit",
                View::Logs => "/:search ↑↓:scroll End:follow Tab:switch ?:help q:quit",
                View::Tcp => "↑↓:scroll Tab:switch ?:help q:quit",
            }
        };

        format!(
            " {} | Updated {:.1}s ago | {}",
            app.source_description(),
            elapsed.as_secs_f64(),
            controls,
        )
    } else {
        format!(" {} | Loading... | q:quit", app.source_description())
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));

    frame.render_widget(paragraph, area);
}

/// Filter suffix for view titles: the text being typed, or the applied filter.
pub fn filter_info(app: &App) -> String {
    if app.filter_active {
        format!(" /{}_", app.filter_text)
    } else if !app.filter_text.is_empty() {
        format!(" /{}/ [c:clear]", app.filter_text)
    } else {
        String::new()
    }
}

/// Bordered block used by every view.
pub fn view_block(app: &App, title: String) -> Block<'static> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border))
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current view.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Navigation",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  1-5         Jump to view"),
        Line::from("  ←/→ Tab     Switch views"),
        Line::from("  ↑/↓ j/k     Navigate list"),
        Line::from("  PgUp/PgDn   Jump 10 items"),
        Line::from("  Home/End    Jump to first/last"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Stats & Logs",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  Enter/Space Expand/collapse node"),
        Line::from("  + / -       Expand/collapse all"),
        Line::from("  /           Start filter/search"),
        Line::from("  c           Clear filter"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " General",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  H           Show hidden regions"),
        Line::from("  r           Reload data"),
        Line::from("  e           Export to JSON"),
        Line::from("  q           Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    // Center the help overlay - responsive to terminal size
    let help_width = 44u16.min(area.width.saturating_sub(4));
    let help_height = 27u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    // Clear the area behind the help
    frame.render_widget(Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
