use super::*;
use crate::CoreError;
use std::collections::BTreeSet;

fn geometry(layout_id: i64, columns: u32, rows: u32) -> LayoutGeometry {
    LayoutGeometry::try_new(layout_id, columns, rows).expect("valid geometry")
}

#[test]
fn reserved_cells_are_asymmetric_between_first_and_later_pages() {
    let layout = geometry(1, 4, 3);
    let reserved = layout.reserved_cells();

    assert!(reserved.contains(&GridCell::new(3, 2)), "page 1 home");
    assert!(!reserved.contains(&GridCell::new(3, 0)), "page 1 top-right is free");
    assert!(reserved.contains(&GridCell::new(3, 3)), "page 2 navigation");
    assert!(reserved.contains(&GridCell::new(3, 5)), "page 2 home");
    assert!(reserved.contains(&GridCell::new(3, 29)), "page 10 home");
    assert!(reserved.iter().all(|cell| cell.column == 3));
    assert_eq!(reserved.len(), 19);
}

#[test]
fn single_row_layouts_share_home_and_navigation_cells() {
    let layout = geometry(1, 5, 1);
    assert_eq!(layout.reserved_cells().len(), 10);
}

#[test]
fn empty_geometry_is_rejected() {
    assert!(matches!(
        LayoutGeometry::try_new(9, 0, 4),
        Err(CoreError::InputFormat(_))
    ));
}

#[test]
fn slots_follow_page_then_row_major_order_and_skip_occupied() {
    let layout = geometry(1, 3, 2);
    let occupied = BTreeSet::from([GridCell::new(1, 0)]);
    let slots = LayoutSlots::enumerate(layout, &occupied);

    let first: Vec<String> = (0..6)
        .map(|i| slots.cell_for_slot(SlotIndex(i)).expect("slot").to_string())
        .collect();
    // Page 1: (2,1) is home. Page 2 starts at row 2 with (2,2) reserved for navigation.
    assert_eq!(first, vec!["0,0", "2,0", "0,1", "1,1", "0,2", "1,2"]);
    assert_eq!(slots.len(), 3 * 2 * 10 - 19 - 1);
}

#[test]
fn slot_index_maps_to_each_layouts_own_cell() {
    let narrow = LayoutSlots::enumerate(geometry(10, 2, 2), &BTreeSet::new());
    let wide = LayoutSlots::enumerate(geometry(11, 5, 3), &BTreeSet::new());
    let mut plan = PlacementPlan::new(vec![narrow, wide], 3).expect("capacity");

    let placements: Vec<SlotPlacement> = (0..3).map(|_| plan.claim().expect("claim")).collect();
    assert_eq!(placements[0].slot, SlotIndex(0));
    assert_eq!(
        placements[2].cells,
        vec![(10, GridCell::new(0, 1)), (11, GridCell::new(2, 0))]
    );
    assert_eq!(plan.claimed(), 3);
}

#[test]
fn capacity_is_the_minimum_over_layouts() {
    let roomy = LayoutSlots::enumerate(geometry(1, 4, 3), &BTreeSet::new());
    let occupied = BTreeSet::from([GridCell::new(0, 0)]);
    let tight = LayoutSlots::enumerate(geometry(2, 3, 3), &occupied);
    assert_eq!(tight.len(), 70);

    let plan = PlacementPlan::new(vec![roomy.clone(), tight.clone()], 70).expect("fits");
    assert_eq!(plan.capacity(), 70);

    let err = PlacementPlan::new(vec![roomy, tight], 71).expect_err("one too many");
    assert_eq!(
        err,
        CoreError::CapacityExhausted {
            required: 71,
            available: 70,
            limiting_layout: 2,
        }
    );
}

#[test]
fn claiming_past_capacity_fails_instead_of_wrapping() {
    let layout = LayoutSlots::enumerate(geometry(1, 2, 1), &BTreeSet::new());
    let available = layout.len();
    let mut plan = PlacementPlan::new(vec![layout], 0).expect("empty plan");
    for _ in 0..available {
        plan.claim().expect("within capacity");
    }
    assert!(matches!(
        plan.claim(),
        Err(CoreError::CapacityExhausted { .. })
    ));
}

#[test]
fn plan_requires_at_least_one_layout() {
    assert!(matches!(
        PlacementPlan::new(Vec::new(), 0),
        Err(CoreError::InvalidOption(_))
    ));
}

#[test]
fn grid_strings_parse_with_optional_spaces() {
    assert_eq!("3, 7".parse::<GridCell>().unwrap(), GridCell::new(3, 7));
    assert_eq!(GridCell::new(3, 7).to_string(), "3,7");
    assert!("3".parse::<GridCell>().is_err());
    assert!("a,b".parse::<GridCell>().is_err());
    assert_eq!(
        "2,1".parse::<GridSpan>().unwrap(),
        GridSpan {
            columns: 2,
            rows: 1
        }
    );
}

#[test]
fn spans_cover_every_cell_of_the_element() {
    let span = GridSpan {
        columns: 2,
        rows: 2,
    };
    let covered: Vec<String> = geometry(1, 4, 3)
        .covered_cells(GridCell::new(1, 4), span)
        .map(|cell| cell.to_string())
        .collect();
    assert_eq!(covered, vec!["1,4", "2,4", "1,5", "2,5"]);
}

#[test]
fn oversized_spans_are_clipped_to_the_grid() {
    let layout = geometry(1, 4, 3);
    let span: GridSpan = "100000,100000".parse().expect("span");

    let covered: BTreeSet<GridCell> = layout.covered_cells(GridCell::new(2, 28), span).collect();
    assert_eq!(
        covered,
        BTreeSet::from([
            GridCell::new(2, 28),
            GridCell::new(3, 28),
            GridCell::new(2, 29),
            GridCell::new(3, 29),
        ])
    );
    assert_eq!(
        layout.covered_cells(GridCell::new(9, 40), GridSpan::default()).count(),
        0
    );
}

#[test]
fn geometry_that_overflows_the_cell_count_is_rejected() {
    let err = LayoutGeometry::try_new(5, 100_000, 100_000).expect_err("overflowing grid");
    assert!(matches!(err, CoreError::InputFormat(_)));
    assert!(LayoutGeometry::try_new(5, 65_535, 6_553).is_ok());
}
