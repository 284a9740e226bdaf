//! Application state and navigation logic.

use std::collections::HashSet;
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::{debug, warn};

use crate::data::{
    tcp, DashboardData, MemoryRegion, TimeSeriesWindow, TreeNode, TreeRow, WindowError,
    CPU_SERIES,
};
use crate::source::DataSource;
use crate::ui::Theme;

/// The current view/tab in the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Collapsible tree of the appliance's statistics.
    Stats,
    /// Rolling chart of CPU usage.
    Cpu,
    /// Memory map regions with usage.
    Memory,
    /// Tail of the appliance's log.
    Logs,
    /// TCP status, flattened to key/value rows.
    Tcp,
}

impl View {
    pub const ALL: [View; 5] = [View::Stats, View::Cpu, View::Memory, View::Logs, View::Tcp];

    /// Cycle to the next view.
    pub fn next(self) -> Self {
        match self {
            View::Stats => View::Cpu,
            View::Cpu => View::Memory,
            View::Memory => View::Logs,
            View::Logs => View::Tcp,
            View::Tcp => View::Stats,
        }
    }

    /// Cycle to the previous view.
    pub fn prev(self) -> Self {
        match self {
            View::Stats => View::Tcp,
            View::Cpu => View::Stats,
            View::Memory => View::Cpu,
            View::Logs => View::Memory,
            View::Tcp => View::Logs,
        }
    }

    /// Returns the display label for this view.
    pub fn label(&self) -> &'static str {
        match self {
            View::Stats => "Stats",
            View::Cpu => "CPU",
            View::Memory => "Memory",
            View::Logs => "Logs",
            View::Tcp => "TCP",
        }
    }

    /// Position in the tab bar, 0-based.
    pub fn index(&self) -> usize {
        match self {
            View::Stats => 0,
            View::Cpu => 1,
            View::Memory => 2,
            View::Logs => 3,
            View::Tcp => 4,
        }
    }
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,

    // Data source
    source: Box<dyn DataSource>,
    pub data: Option<DashboardData>,
    pub cpu_window: TimeSeriesWindow,
    /// Current memory map, from the source's dedicated endpoint or the
    /// latest snapshot that carried one.
    pub memmap: Vec<MemoryRegion>,
    pub load_error: Option<String>,

    // Navigation state
    /// Full paths of expanded tree nodes.
    pub expanded: HashSet<String>,
    pub selected_row: usize,
    pub selected_region: usize,
    pub selected_log: usize,
    pub selected_tcp: usize,

    // Search/filter
    pub filter_text: String,
    pub filter_active: bool,

    pub show_hidden_regions: bool,

    // UI
    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create a new App with the given data source, keeping `cpu_window`
    /// samples of CPU history. The theme follows the terminal background.
    pub fn new(source: Box<dyn DataSource>, cpu_window: usize) -> Result<Self, WindowError> {
        Self::with_theme(source, cpu_window, Theme::auto_detect())
    }

    pub fn with_theme(
        source: Box<dyn DataSource>,
        cpu_window: usize,
        theme: Theme,
    ) -> Result<Self, WindowError> {
        Ok(Self {
            running: true,
            current_view: View::Stats,
            show_help: false,
            source,
            data: None,
            cpu_window: TimeSeriesWindow::configure(CPU_SERIES, cpu_window)?,
            memmap: Vec::new(),
            load_error: None,
            expanded: HashSet::new(),
            selected_row: 0,
            selected_region: 0,
            selected_log: 0,
            selected_tcp: 0,
            filter_text: String::new(),
            filter_active: false,
            show_hidden_regions: false,
            theme,
            status_message: None,
        })
    }

    /// Returns a description of the current data source.
    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired (3 seconds).
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < Duration::from_secs(3) {
                return Some(msg);
            }
        }
        None
    }

    /// Poll the data source for new data.
    ///
    /// Returns true if a new snapshot was applied. A snapshot whose statistics
    /// cannot be built into a tree is skipped as a whole: the previous data
    /// stays on screen and the error is shown in the status bar.
    pub fn reload_data(&mut self) -> bool {
        if let Some(entries) = self.source.memmap() {
            debug!(regions = entries.len(), "memory map received");
            self.memmap = MemoryRegion::from_entries(&entries);
        }

        let Some(snapshot) = self.source.poll() else {
            if let Some(err) = self.source.error() {
                self.load_error = Some(err);
            }
            self.clamp_selection();
            return false;
        };
        let received = Instant::now();

        let data = match DashboardData::from_snapshot(snapshot) {
            Ok(data) => data,
            Err(e) => {
                warn!(error = %e, "skipping snapshot");
                self.load_error = Some(e.to_string());
                return false;
            }
        };

        if let Some(cpu) = data.cpu {
            if let Err(e) = self.cpu_window.push(received, cpu.series()) {
                warn!(error = %e, "dropping CPU sample");
            }
        }
        if !data.memmap.is_empty() {
            self.memmap = data.memmap.clone();
        }

        let previous_logs = self.filtered_logs().len();
        let following_logs = self.selected_log + 1 >= previous_logs;

        self.data = Some(data);
        self.load_error = None;

        if following_logs {
            self.selected_log = self.filtered_logs().len().saturating_sub(1);
        }
        self.clamp_selection();
        true
    }

    /// Switch to the next view.
    pub fn next_view(&mut self) {
        self.current_view = self.current_view.next();
    }

    /// Switch to the previous view.
    pub fn prev_view(&mut self) {
        self.current_view = self.current_view.prev();
    }

    /// Switch to a specific view.
    pub fn set_view(&mut self, view: View) {
        self.current_view = view;
    }

    /// Tree rows currently shown in the Stats view.
    pub fn visible_rows(&self) -> Vec<TreeRow<'_>> {
        match self.data {
            Some(ref data) => data.stats.visible_rows(&self.expanded, &self.filter_text),
            None => Vec::new(),
        }
    }

    /// The tree node under the cursor.
    pub fn selected_node(&self) -> Option<&TreeNode> {
        self.visible_rows().get(self.selected_row).map(|row| row.node)
    }

    /// Memory regions shown in the Memory view.
    pub fn visible_regions(&self) -> Vec<&MemoryRegion> {
        self.memmap
            .iter()
            .filter(|r| self.show_hidden_regions || !r.is_placeholder())
            .collect()
    }

    /// Log lines shown in the Logs view.
    pub fn filtered_logs(&self) -> Vec<&str> {
        let Some(ref data) = self.data else {
            return Vec::new();
        };
        data.logs
            .iter()
            .map(String::as_str)
            .filter(|line| self.matches_filter(line))
            .collect()
    }

    /// TCP status rows shown in the TCP view.
    pub fn tcp_rows(&self) -> Vec<(String, String)> {
        self.data
            .as_ref()
            .and_then(|d| d.tcp.as_ref())
            .map(tcp::flatten)
            .unwrap_or_default()
    }

    /// Number of selectable items in the current view.
    pub(crate) fn item_count(&self) -> usize {
        match self.current_view {
            View::Stats => self.visible_rows().len(),
            View::Cpu => 0,
            View::Memory => self.visible_regions().len(),
            View::Logs => self.filtered_logs().len(),
            View::Tcp => self.tcp_rows().len(),
        }
    }

    fn selection_mut(&mut self) -> Option<&mut usize> {
        match self.current_view {
            View::Stats => Some(&mut self.selected_row),
            View::Cpu => None,
            View::Memory => Some(&mut self.selected_region),
            View::Logs => Some(&mut self.selected_log),
            View::Tcp => Some(&mut self.selected_tcp),
        }
    }

    /// Keep every selection inside its list.
    fn clamp_selection(&mut self) {
        let max_row = self.visible_rows().len().saturating_sub(1);
        let max_region = self.visible_regions().len().saturating_sub(1);
        let max_log = self.filtered_logs().len().saturating_sub(1);
        let max_tcp = self.tcp_rows().len().saturating_sub(1);

        self.selected_row = self.selected_row.min(max_row);
        self.selected_region = self.selected_region.min(max_region);
        self.selected_log = self.selected_log.min(max_log);
        self.selected_tcp = self.selected_tcp.min(max_tcp);
    }

    /// Move selection down by one item.
    pub fn select_next(&mut self) {
        self.select_next_n(1);
    }

    /// Move selection up by one item.
    pub fn select_prev(&mut self) {
        self.select_prev_n(1);
    }

    /// Move selection down by n items.
    pub fn select_next_n(&mut self, n: usize) {
        let max = self.item_count().saturating_sub(1);
        if let Some(selected) = self.selection_mut() {
            *selected = (*selected + n).min(max);
        }
    }

    /// Move selection up by n items.
    pub fn select_prev_n(&mut self, n: usize) {
        if let Some(selected) = self.selection_mut() {
            *selected = selected.saturating_sub(n);
        }
    }

    /// Jump to the first item in the list.
    pub fn select_first(&mut self) {
        if let Some(selected) = self.selection_mut() {
            *selected = 0;
        }
    }

    /// Jump to the last item in the list.
    pub fn select_last(&mut self) {
        let last = self.item_count().saturating_sub(1);
        if let Some(selected) = self.selection_mut() {
            *selected = last;
        }
    }

    /// Expand or collapse the selected tree node. Leaves are left alone.
    pub fn toggle_selected(&mut self) {
        let Some(path) = self
            .selected_node()
            .filter(|node| !node.is_leaf())
            .map(|node| node.full_path().to_string())
        else {
            return;
        };

        if !self.expanded.remove(&path) {
            self.expanded.insert(path);
        }
        self.clamp_selection();
    }

    /// Expand every interior node of the current tree.
    pub fn expand_all(&mut self) {
        if let Some(ref data) = self.data {
            self.expanded
                .extend(data.stats.branch_paths().into_iter().map(String::from));
        }
    }

    /// Collapse the whole tree.
    pub fn collapse_all(&mut self) {
        self.expanded.clear();
        self.clamp_selection();
    }

    /// Show or hide placeholder memory regions.
    pub fn toggle_hidden_regions(&mut self) {
        self.show_hidden_regions = !self.show_hidden_regions;
        self.clamp_selection();
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Enter filter input mode (starts capturing keystrokes for search).
    pub fn start_filter(&mut self) {
        self.filter_active = true;
    }

    /// Exit filter input mode without clearing the filter text.
    pub fn cancel_filter(&mut self) {
        self.filter_active = false;
    }

    /// Clear the filter text and exit filter mode.
    pub fn clear_filter(&mut self) {
        self.filter_text.clear();
        self.filter_active = false;
        self.clamp_selection();
    }

    /// Append a character to the filter text.
    pub fn filter_push(&mut self, c: char) {
        self.filter_text.push(c);
        self.clamp_selection();
    }

    /// Remove the last character from the filter text.
    pub fn filter_pop(&mut self) {
        self.filter_text.pop();
        self.clamp_selection();
    }

    /// Check if a name matches the current filter.
    pub fn matches_filter(&self, name: &str) -> bool {
        if self.filter_text.is_empty() {
            return true;
        }
        name.to_lowercase().contains(&self.filter_text.to_lowercase())
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Export current state to a file.
    pub fn export_state(&self, path: &Path) -> Result<()> {
        let Some(ref data) = self.data else {
            anyhow::bail!("No data to export");
        };

        let history = self.cpu_window.snapshot();
        let export = data.to_export(&self.memmap, Some(&history));
        let json = serde_json::to_string_pretty(&export)?;
        std::fs::write(path, json)?;

        Ok(())
    }
}
