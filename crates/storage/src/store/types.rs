#![forbid(unsafe_code)]

use super::ReferenceTemplate;
use ns_core::ButtonPlan;

#[derive(Clone, Debug)]
pub struct GenerateRequest {
    pub plan: ButtonPlan,
    pub reference: ReferenceTemplate,
    /// Layout ids to populate; `None` means every layout of the content page.
    pub layouts: Option<Vec<i64>>,
    pub title: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerateOutcome {
    pub page_id: i64,
    pub layout_ids: Vec<i64>,
    pub buttons_written: usize,
    pub placements_written: usize,
    pub home_button_added: bool,
    pub timestamp_ticks: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayoutCapacity {
    pub layout_id: i64,
    pub columns: u32,
    pub rows: u32,
    pub cells_per_page: u32,
    pub reserved_cells: usize,
    pub occupied_cells: usize,
    pub available_cells: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CapacityReport {
    pub page_id: i64,
    pub layouts: Vec<LayoutCapacity>,
}

impl CapacityReport {
    /// Smallest free-cell count over all layouts; the number of buttons a run can place.
    pub fn available_cells(&self) -> usize {
        self.layouts
            .iter()
            .map(|layout| layout.available_cells)
            .min()
            .unwrap_or(0)
    }

    pub fn limiting_layout(&self) -> Option<i64> {
        self.layouts
            .iter()
            .min_by_key(|layout| layout.available_cells)
            .map(|layout| layout.layout_id)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExistingButtons {
    pub count: i64,
    pub sample_labels: Vec<String>,
}
