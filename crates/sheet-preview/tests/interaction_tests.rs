use sheet_preview::constants::*;
use sheet_preview::*;

fn create_test_layout() -> SheetLayout {
    let mut layout = SheetLayout::new(488.0, 330.0, 90.0, 55.0);
    let mut cell = GridCell::placed(4, 10.0, 265.0);
    cell.row = 0;
    cell.col = 0;
    cell.rotation = 180;
    cell.bleed_per_edge = Some(EdgeBleed {
        top: 3.0,
        bottom: 0.0,
        left: 3.0,
        right: 0.0,
    });
    cell.is_interior_edge = Some(EdgeFlags {
        right: true,
        ..EdgeFlags::default()
    });
    layout.grid.push(cell);

    let mut empty = GridCell::placed(0, 100.0, 265.0);
    empty.page_index = None;
    layout.grid.push(empty);

    let mut second = GridCell::placed(5, 100.0, 210.0);
    second.row = 1;
    second.col = 1;
    layout.grid.push(second);
    layout
}

#[test]
fn test_zoom_steps_accumulate() {
    let mut state = InteractionState::new();
    assert_eq!(state.zoom(), DEFAULT_ZOOM);

    for _ in 0..9 {
        state.zoom_in();
    }
    assert!((state.zoom() - 1.9).abs() < 1e-4);
}

#[test]
fn test_zoom_is_clamped() {
    let mut state = InteractionState::new();

    for _ in 0..100 {
        state.zoom_in();
    }
    assert_eq!(state.zoom(), MAX_ZOOM);

    for _ in 0..100 {
        state.zoom_out();
    }
    assert_eq!(state.zoom(), MIN_ZOOM);

    assert_eq!(state.set_zoom(10.0), MAX_ZOOM);
    assert_eq!(state.zoom_by(-10.0), MIN_ZOOM);

    state.reset_zoom();
    assert_eq!(state.zoom_by(f32::NAN), 1.0);
    assert_eq!(state.set_zoom(f32::INFINITY), 1.0);
    assert_eq!(state.zoom_by(f32::NEG_INFINITY), 1.0);
    assert!((MIN_ZOOM..=MAX_ZOOM).contains(&state.zoom()));

    state.reset_zoom();
    assert_eq!(state.zoom(), 1.0);
}

#[test]
fn test_hover_feeds_render_options() {
    let mut state = InteractionState::new();
    state.hover(Some(2));
    assert_eq!(state.hovered(), Some(2));

    let options = state.render_options(RenderOptions::default());
    assert_eq!(options.hovered, Some(2));

    state.hover(None);
    assert_eq!(state.render_options(options).hovered, None);
}

#[test]
fn test_tooltip_for_hovered_cell() {
    let layout = create_test_layout();
    let mut state = InteractionState::new();

    assert!(state.tooltip(&layout).is_none());

    state.hover(Some(0));
    let tooltip = state.tooltip(&layout).unwrap();
    assert_eq!(tooltip.cell_index, 0);
    assert_eq!(tooltip.page_number, 5);
    assert_eq!(tooltip.rotation, 180);
    assert_eq!(tooltip.bleed.top, 3.0);
    assert_eq!(tooltip.interior_edges, vec![Edge::Right]);

    let lines = tooltip.lines();
    assert_eq!(lines[0], "Page 5");
    assert!(lines.iter().any(|line| line.contains("Interior edges: right")));

    // Empty slots and unknown indices have no tooltip
    state.hover(Some(1));
    assert!(state.tooltip(&layout).is_none());
    state.hover(Some(42));
    assert!(state.tooltip(&layout).is_none());
}

#[test]
fn test_hit_test_uses_render_space() {
    let layout = create_test_layout();

    // Cell 0 occupies render rect (10, 10, 90, 55)
    assert_eq!(hit_test(&layout, ScreenPoint::new(50.0, 30.0)), Some(0));

    // Same point in print space would be far below the cell
    assert_eq!(hit_test(&layout, ScreenPoint::new(50.0, 300.0)), None);

    // Empty slot is not hoverable
    assert_eq!(hit_test(&layout, ScreenPoint::new(150.0, 30.0)), None);

    // Cell 2 at print (100, 210) is render (100, 65)
    assert_eq!(hit_test(&layout, ScreenPoint::new(150.0, 100.0)), Some(2));
}

#[test]
fn test_hover_does_not_change_layout() {
    let layout = create_test_layout();
    let before = layout.clone();

    let mut state = InteractionState::new();
    state.hover(hit_test(&layout, ScreenPoint::new(50.0, 30.0)));
    state.zoom_in();
    let _ = compose(&layout, &ThumbnailMap::new(), &state.render_options(RenderOptions::default()));

    assert_eq!(layout, before);
}
