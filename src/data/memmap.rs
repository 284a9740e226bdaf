//! Memory map regions prepared for display.

use serde::Serialize;

use super::units::format_bytes;
use crate::source::MemmapEntry;

/// Regions with this name are placeholders and hidden by default.
pub const PLACEHOLDER_NAME: &str = "N/A";

/// A memory map region with its derived size and usage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemoryRegion {
    /// 1-based position in the appliance's map.
    pub index: usize,
    pub name: String,
    pub description: String,
    pub addr_start: u64,
    pub addr_end: u64,
    /// Inclusive size in bytes.
    pub size: u64,
    pub in_use: u64,
}

impl MemoryRegion {
    pub fn from_entry(index: usize, entry: &MemmapEntry) -> Self {
        let size = if entry.addr_end >= entry.addr_start {
            (entry.addr_end - entry.addr_start).saturating_add(1)
        } else {
            0
        };

        Self {
            index,
            name: entry.name.clone(),
            description: entry.description.clone(),
            addr_start: entry.addr_start,
            addr_end: entry.addr_end,
            size,
            in_use: entry.in_use,
        }
    }

    /// Convert a whole map, numbering regions from 1.
    pub fn from_entries(entries: &[MemmapEntry]) -> Vec<Self> {
        entries
            .iter()
            .enumerate()
            .map(|(i, e)| Self::from_entry(i + 1, e))
            .collect()
    }

    /// Display label, unique across the map (`"3: Heap"`).
    pub fn label(&self) -> String {
        format!("{}: {}", self.index, self.name)
    }

    pub fn is_placeholder(&self) -> bool {
        self.name == PLACEHOLDER_NAME
    }

    /// Share of the region in use, 0-100.
    pub fn usage_percent(&self) -> f64 {
        if self.size == 0 {
            0.0
        } else {
            self.in_use as f64 / self.size as f64 * 100.0
        }
    }

    /// `0x1000 - 0x1fff`
    pub fn range(&self) -> String {
        format!("0x{:x} - 0x{:x}", self.addr_start, self.addr_end)
    }

    /// One-line summary: address range plus usage.
    pub fn detail(&self) -> String {
        format!(
            "{} In use: {} ({:.0}%)",
            self.range(),
            format_bytes(self.in_use),
            self.usage_percent()
        )
    }
}
