#![forbid(unsafe_code)]

use super::{GridCell, LayoutGeometry};
use crate::CoreError;
use std::collections::BTreeSet;

/// Position in a layout's ordered list of free cells. The same slot index maps to a different
/// [`GridCell`] in each layout; it is the key that ties one button's placements together.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct SlotIndex(pub usize);

/// Free cells of one layout in allocation order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayoutSlots {
    geometry: LayoutGeometry,
    slots: Vec<GridCell>,
}

impl LayoutSlots {
    pub fn enumerate(geometry: LayoutGeometry, occupied: &BTreeSet<GridCell>) -> Self {
        let slots = geometry
            .cells()
            .filter(|cell| !geometry.is_reserved(*cell) && !occupied.contains(cell))
            .collect();
        Self { geometry, slots }
    }

    pub fn geometry(&self) -> &LayoutGeometry {
        &self.geometry
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn cell_for_slot(&self, slot: SlotIndex) -> Option<GridCell> {
        self.slots.get(slot.0).copied()
    }
}

/// Concrete cells claimed by one button, one per layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlotPlacement {
    pub slot: SlotIndex,
    pub cells: Vec<(i64, GridCell)>,
}

/// Hands out slot indices in order across a fixed set of layouts.
#[derive(Clone, Debug)]
pub struct PlacementPlan {
    layouts: Vec<LayoutSlots>,
    claimed: usize,
}

impl PlacementPlan {
    /// Fails unless every layout can take `required` more buttons.
    pub fn new(layouts: Vec<LayoutSlots>, required: usize) -> Result<Self, CoreError> {
        let Some(limiting) = layouts.iter().min_by_key(|layout| layout.len()) else {
            return Err(CoreError::InvalidOption(
                "no page layouts selected for placement".to_string(),
            ));
        };
        if limiting.len() < required {
            return Err(CoreError::CapacityExhausted {
                required,
                available: limiting.len(),
                limiting_layout: limiting.geometry.layout_id,
            });
        }
        Ok(Self {
            layouts,
            claimed: 0,
        })
    }

    pub fn layouts(&self) -> &[LayoutSlots] {
        &self.layouts
    }

    /// Smallest free-slot count over all layouts.
    pub fn capacity(&self) -> usize {
        self.layouts.iter().map(LayoutSlots::len).min().unwrap_or(0)
    }

    pub fn claimed(&self) -> usize {
        self.claimed
    }

    pub fn claim(&mut self) -> Result<SlotPlacement, CoreError> {
        let slot = SlotIndex(self.claimed);
        let cells = self
            .layouts
            .iter()
            .map(|layout| {
                layout
                    .cell_for_slot(slot)
                    .map(|cell| (layout.geometry.layout_id, cell))
            })
            .collect::<Option<Vec<_>>>();
        let Some(cells) = cells else {
            let limiting = self
                .layouts
                .iter()
                .min_by_key(|layout| layout.len())
                .map(|layout| layout.geometry.layout_id)
                .unwrap_or_default();
            return Err(CoreError::CapacityExhausted {
                required: self.claimed + 1,
                available: self.capacity(),
                limiting_layout: limiting,
            });
        };
        self.claimed += 1;
        Ok(SlotPlacement { slot, cells })
    }
}
