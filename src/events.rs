use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use tracing::info;

use crate::app::{App, View};

/// File written by the `e` key.
pub const EXPORT_FILE: &str = "acorn_dash_export.json";

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    // If filter input is active, handle text input
    if app.filter_active {
        handle_filter_input(app, key);
        return;
    }

    match key.code {
        // Quit
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),

        // View switching
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.prev_view();
            } else {
                app.next_view();
            }
        }
        KeyCode::BackTab => app.prev_view(),

        // Direct view access
        KeyCode::Char('1') => app.set_view(View::Stats),
        KeyCode::Char('2') => app.set_view(View::Cpu),
        KeyCode::Char('3') => app.set_view(View::Memory),
        KeyCode::Char('4') => app.set_view(View::Logs),
        KeyCode::Char('5') => app.set_view(View::Tcp),

        // Navigation (up/down for items, left/right for tabs)
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Left | KeyCode::Char('h') => app.prev_view(),
        KeyCode::Right | KeyCode::Char('l') => app.next_view(),
        KeyCode::PageUp => app.select_prev_n(10),
        KeyCode::PageDown => app.select_next_n(10),
        KeyCode::Home => app.select_first(),
        KeyCode::End => app.select_last(),

        // Tree expansion
        KeyCode::Enter | KeyCode::Char(' ') => {
            if app.current_view == View::Stats {
                app.toggle_selected();
            }
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            if app.current_view == View::Stats {
                app.expand_all();
            }
        }
        KeyCode::Char('-') => {
            if app.current_view == View::Stats {
                app.collapse_all();
            }
        }

        // Memory map
        KeyCode::Char('H') => {
            app.toggle_hidden_regions();
            let state = if app.show_hidden_regions {
                "shown"
            } else {
                "hidden"
            };
            app.set_status_message(format!("N/A regions {}", state));
        }

        // Reload
        KeyCode::Char('r') => {
            app.reload_data();
        }

        // Help
        KeyCode::Char('?') => app.toggle_help(),

        // Filter (start typing to filter)
        KeyCode::Char('/') => {
            if matches!(app.current_view, View::Stats | View::Logs) {
                app.start_filter();
            }
        }

        // Clear filter
        KeyCode::Char('c') | KeyCode::Esc => {
            if !app.filter_text.is_empty() {
                app.clear_filter();
            }
        }

        // Export
        KeyCode::Char('e') => {
            let export_path = PathBuf::from(EXPORT_FILE);
            match app.export_state(&export_path) {
                Ok(()) => {
                    info!(path = %export_path.display(), "exported dashboard state");
                    app.set_status_message(format!("Exported to {}", export_path.display()));
                }
                Err(e) => {
                    app.set_status_message(format!("Export failed: {}", e));
                }
            }
        }

        _ => {}
    }
}

/// Handle key input while filter is active
fn handle_filter_input(app: &mut App, key: KeyEvent) {
    match key.code {
        // Confirm filter
        KeyCode::Enter => {
            app.filter_active = false;
        }

        // Cancel filter (keep text but exit input mode)
        KeyCode::Esc => {
            app.cancel_filter();
        }

        // Clear and exit
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.clear_filter();
        }

        // Backspace
        KeyCode::Backspace => {
            app.filter_pop();
            if app.filter_text.is_empty() {
                app.filter_active = false;
            }
        }

        // Type characters
        KeyCode::Char(c) => {
            app.filter_push(c);
        }

        _ => {}
    }
}

/// Handle mouse events
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent, content_start_row: u16) {
    match mouse.kind {
        // Scroll wheel
        MouseEventKind::ScrollUp => app.select_prev(),
        MouseEventKind::ScrollDown => app.select_next(),

        MouseEventKind::Down(MouseButton::Left) => {
            let clicked_row = mouse.row;

            // Tab clicks (row 1, after header)
            if clicked_row == 1 {
                if let Some(view) = tab_at(mouse.column) {
                    app.set_view(view);
                }
                return;
            }

            // Tables have a header row below the top border; the log list does not
            let first_item_row = match app.current_view {
                View::Stats | View::Memory | View::Tcp => content_start_row + 1,
                View::Logs | View::Cpu => content_start_row,
            };
            if clicked_row < first_item_row {
                return;
            }

            // Rows are mapped as if the list starts at the top (no scroll offset)
            let item_row = (clicked_row - first_item_row) as usize;
            if item_row >= app.item_count() {
                return;
            }
            let previous = match app.current_view {
                View::Stats => app.selected_row,
                View::Memory => app.selected_region,
                View::Logs => app.selected_log,
                View::Tcp => app.selected_tcp,
                View::Cpu => return,
            };
            app.select_first();
            app.select_next_n(item_row);

            // Clicking the selected branch toggles it
            if app.current_view == View::Stats && app.selected_row == previous {
                app.toggle_selected();
            }
        }

        _ => {}
    }
}

/// The view whose tab covers `column`. Each tab is its `" n:Label "` title
/// plus one cell of padding on both sides, followed by a one-cell divider.
fn tab_at(column: u16) -> Option<View> {
    let mut start = 0u16;
    for view in View::ALL {
        let width = format!(" {}:{} ", view.index() + 1, view.label()).len() as u16 + 2;
        if column < start + width {
            return Some(view);
        }
        start += width + 1;
    }
    None
}
