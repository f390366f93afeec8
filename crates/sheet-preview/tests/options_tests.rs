use sheet_preview::*;
use tempfile::NamedTempFile;

#[test]
fn test_default_options_are_valid() {
    let options = PreviewOptions::default();
    assert!(options.validate().is_ok());
    assert!(options.show_bleed);
    assert!(options.show_marks);
    assert_eq!(options.thumbnails.max_dimension_px, 200);
    assert_eq!(options.thumbnails.jpeg_quality, 55);
    assert_eq!(options.thumbnails.snapshot_every, 4);
}

#[test]
fn test_validation_errors() {
    let mut options = PreviewOptions::default();
    options.zoom = 5.0;
    match options.validate() {
        Err(PreviewError::Config(msg)) => assert!(msg.contains("Zoom")),
        other => panic!("Expected Config error, got {:?}", other),
    }

    let mut options = PreviewOptions::default();
    options.thumbnails.jpeg_quality = 0;
    assert!(options.validate().is_err());

    let mut options = PreviewOptions::default();
    options.thumbnails.snapshot_every = 0;
    assert!(options.validate().is_err());

    let mut options = PreviewOptions::default();
    options.thumbnails.max_dimension_px = 0;
    assert!(options.validate().is_err());

    let mut options = PreviewOptions::default();
    options.guides = Some(SheetGuides {
        mark_margin_mm: -1.0,
        grip_edge_mm: 10.0,
    });
    assert!(options.validate().is_err());
}

#[test]
fn test_render_options_follow_preview_options() {
    let mut options = PreviewOptions::default();
    options.show_marks = false;
    options.guides = None;

    let render = RenderOptions::from_options(&options);
    assert!(render.show_bleed);
    assert!(!render.show_marks);
    assert_eq!(render.guides, None);
    assert_eq!(render.hovered, None);
}

#[tokio::test]
async fn test_save_and_load_options() {
    let mut options = PreviewOptions::default();
    options.show_bleed = false;
    options.zoom = 1.5;
    options.thumbnails.jpeg_quality = 80;
    options.guides = Some(SheetGuides {
        mark_margin_mm: 5.0,
        grip_edge_mm: 12.0,
    });

    let temp_file = NamedTempFile::new().unwrap();
    let path = temp_file.path();

    options.save(path).await.unwrap();
    let loaded = PreviewOptions::load(path).await.unwrap();

    assert_eq!(loaded, options);
}

#[tokio::test]
async fn test_partial_options_file_uses_defaults() {
    let temp_file = NamedTempFile::new().unwrap();
    tokio::fs::write(temp_file.path(), r#"{"show_marks": false}"#)
        .await
        .unwrap();

    let loaded = PreviewOptions::load(temp_file.path()).await.unwrap();
    assert!(!loaded.show_marks);
    assert!(loaded.show_bleed);
    assert_eq!(loaded.thumbnails, ThumbnailSettings::default());
}

#[tokio::test]
async fn test_invalid_options_file() {
    let temp_file = NamedTempFile::new().unwrap();
    tokio::fs::write(temp_file.path(), r#"{"zoom": 12.0}"#)
        .await
        .unwrap();

    assert!(matches!(
        PreviewOptions::load(temp_file.path()).await,
        Err(PreviewError::Config(_))
    ));
}
