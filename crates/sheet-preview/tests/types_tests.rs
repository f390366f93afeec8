use sheet_preview::*;

const ENGINE_RESPONSE: &str = r#"{
    "sheet_width_mm": 488.0,
    "sheet_height_mm": 330.0,
    "effective_trim_w": 90.0,
    "effective_trim_h": 55.0,
    "page_count": 8,
    "grid": [
        {
            "row": 0,
            "col": 0,
            "page_index": 0,
            "rotation": 0,
            "clip_rect": {"x": 7.0, "y": 262.0, "width": 96.0, "height": 61.0},
            "bleed_per_edge": {"top": 3.0, "bottom": 3.0, "left": 3.0, "right": 3.0},
            "is_interior_edge": {"top": false, "bottom": true, "left": false, "right": true},
            "trim_origin_x": 10.0,
            "trim_origin_y": 265.0
        },
        {"row": 0, "col": 1, "page_index": null, "trim_origin_x": 100.0, "trim_origin_y": 265.0},
        {"row": 1, "col": 0, "page_index": 7, "rotation": 180, "trim_origin_x": 10.0, "trim_origin_y": 210.0}
    ],
    "marks": [
        {"type": "crop", "x1": 10.0, "y1": 5.0, "x2": 10.0, "y2": 0.0, "properties": {"stroke": 0.25}},
        {"type": "color_bar", "x1": 200.0, "y1": 2.0, "x2": 204.0, "y2": 6.0,
         "properties": {"cmyk": [1.0, 0.0, 0.0, 0.0], "width": 4.0, "height": 4.0}},
        {"type": "hologram", "x1": 0.0, "y1": 0.0, "x2": 1.0, "y2": 1.0}
    ]
}"#;

#[test]
fn test_parse_engine_response() {
    let layout = SheetLayout::from_json(ENGINE_RESPONSE).unwrap();

    assert_eq!(layout.sheet_width_mm, 488.0);
    assert_eq!(layout.grid.len(), 3);
    assert_eq!(layout.page_count, Some(8));

    let first = &layout.grid[0];
    assert_eq!(first.page_index, Some(0));
    assert_eq!(first.bleed().left, 3.0);
    assert_eq!(first.interior_edges().edges(), vec![Edge::Bottom, Edge::Right]);
    assert_eq!(first.clip_rect, Some(Rectangle::new(7.0, 262.0, 96.0, 61.0)));

    assert_eq!(layout.grid[1].page_index, None);
    assert_eq!(layout.grid[2].rotation, 180);

    assert_eq!(layout.marks[0].kind, MarkKind::Crop);
    assert_eq!(layout.marks[1].kind, MarkKind::ColorBar);
    assert_eq!(layout.marks[1].properties.cmyk(), Some([1.0, 0.0, 0.0, 0.0]));
    assert_eq!(layout.marks[2].kind, MarkKind::Other("hologram".to_string()));
}

#[test]
fn test_missing_optional_fields_default() {
    let json = r#"{
        "sheet_width_mm": 100.0,
        "sheet_height_mm": 100.0,
        "effective_trim_w": 20.0,
        "effective_trim_h": 20.0,
        "grid": [{"page_index": 2, "trim_origin_x": 5.0, "trim_origin_y": 5.0}]
    }"#;
    let layout = SheetLayout::from_json(json).unwrap();
    let cell = &layout.grid[0];

    assert_eq!(cell.rotation, 0);
    assert_eq!(cell.clip_rect, None);
    assert_eq!(cell.bleed(), EdgeBleed::default());
    assert!(cell.interior_edges().edges().is_empty());
    assert!(layout.marks.is_empty());
    assert_eq!(layout.page_count, None);
}

#[test]
fn test_unknown_mark_kind_round_trips_its_name() {
    let mark = Mark::new(MarkKind::from("hologram".to_string()), 0.0, 0.0, 1.0, 1.0);
    let json = serde_json::to_value(&mark).unwrap();
    assert_eq!(json["type"], "hologram");

    let mark = Mark::new(MarkKind::SlugText, 0.0, 0.0, 0.0, 0.0);
    let json = serde_json::to_value(&mark).unwrap();
    assert_eq!(json["type"], "slug_text");
}

#[test]
fn test_page_index_beyond_document_is_rejected() {
    let mut layout = SheetLayout::new(200.0, 200.0, 50.0, 50.0);
    layout.grid.push(GridCell::placed(0, 0.0, 0.0));
    layout.grid.push(GridCell::placed(4, 60.0, 0.0));

    assert!(layout.validate_page_indices(5).is_ok());
    match layout.validate_page_indices(4) {
        Err(PreviewError::InvalidLayout(msg)) => assert!(msg.contains("page 4")),
        other => panic!("Expected InvalidLayout error, got {:?}", other),
    }

    layout.page_count = Some(3);
    assert!(layout.validate().is_err());
}

#[test]
fn test_overlapping_trim_areas_are_rejected() {
    let mut layout = SheetLayout::new(200.0, 200.0, 50.0, 50.0);
    layout.grid.push(GridCell::placed(0, 0.0, 0.0));
    layout.grid.push(GridCell::placed(1, 40.0, 0.0));
    assert!(matches!(
        layout.validate(),
        Err(PreviewError::InvalidLayout(_))
    ));

    // Touching edges are fine
    layout.grid[1].trim_origin_x = 50.0;
    assert!(layout.validate().is_ok());

    // Empty slots never overlap anything
    let mut empty = GridCell::placed(2, 10.0, 10.0);
    empty.page_index = None;
    layout.grid.push(empty);
    assert!(layout.validate().is_ok());
}

#[test]
fn test_invalid_sheet_dimensions() {
    let layout = SheetLayout::new(0.0, 100.0, 10.0, 10.0);
    assert!(layout.validate().is_err());

    let layout = SheetLayout::new(100.0, 100.0, -1.0, 10.0);
    assert!(layout.validate().is_err());
}

#[test]
fn test_page_indices_are_distinct() {
    let mut layout = SheetLayout::new(300.0, 300.0, 50.0, 50.0);
    layout.grid.push(GridCell::placed(3, 0.0, 0.0));
    layout.grid.push(GridCell::placed(1, 60.0, 0.0));
    layout.grid.push(GridCell::placed(3, 120.0, 0.0));

    let pages: Vec<usize> = layout.page_indices().into_iter().collect();
    assert_eq!(pages, vec![1, 3]);
}
