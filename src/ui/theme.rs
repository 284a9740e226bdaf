//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

/// Number of distinct memory region colors before they repeat.
pub const REGION_PALETTE_LEN: usize = 8;

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for highlights and active elements.
    pub highlight: Color,
    /// Color for warnings, such as a nearly full memory region.
    pub warning: Color,
    /// Color for errors reported by the data source.
    pub error: Color,
    /// Color for healthy readings.
    pub ok: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// Style for header rows in tables.
    pub header: Style,
    /// Style for selected/highlighted rows.
    pub selected: Style,
    /// Style for the active tab.
    pub tab_active: Style,
    /// Style for inactive tabs.
    pub tab_inactive: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
    /// CPU chart line for the `total` series.
    pub cpu_total: Color,
    /// CPU chart line for the `active` series.
    pub cpu_active: Color,
    /// Memory region colors, assigned by region index.
    pub regions: [Color; REGION_PALETTE_LEN],
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            warning: Color::Yellow,
            error: Color::Red,
            ok: Color::Green,
            border: Color::Gray,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::Gray),
            border_type: BorderType::Rounded,
            cpu_total: Color::Gray,
            cpu_active: Color::LightGreen,
            regions: [
                Color::LightBlue,
                Color::LightGreen,
                Color::LightMagenta,
                Color::Yellow,
                Color::LightCyan,
                Color::LightRed,
                Color::Rgb(255, 165, 0),
                Color::Rgb(150, 120, 255),
            ],
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            warning: Color::Yellow,
            error: Color::Red,
            ok: Color::Green,
            border: Color::DarkGray,
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::LightBlue).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::DarkGray),
            border_type: BorderType::Rounded,
            cpu_total: Color::DarkGray,
            cpu_active: Color::Green,
            regions: [
                Color::Blue,
                Color::Green,
                Color::Magenta,
                Color::Rgb(180, 140, 0),
                Color::Cyan,
                Color::Red,
                Color::Rgb(200, 100, 0),
                Color::Rgb(90, 60, 200),
            ],
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        // Use terminal-light crate to detect background luminance
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Color of the memory region at 1-based `index`. Wraps after
    /// [`REGION_PALETTE_LEN`] regions.
    pub fn region_color(&self, index: usize) -> Color {
        self.regions[index.saturating_sub(1) % REGION_PALETTE_LEN]
    }

    /// Style for a usage percentage: warning above 75%, error above 90%.
    pub fn usage_style(&self, percent: f64) -> Style {
        if percent >= 90.0 {
            Style::default().fg(self.error).add_modifier(Modifier::BOLD)
        } else if percent >= 75.0 {
            Style::default().fg(self.warning)
        } else {
            Style::default().fg(self.ok)
        }
    }
}
