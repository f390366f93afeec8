use sheet_preview::coords::{rect_top, screen_y};
use sheet_preview::*;

#[test]
fn test_screen_y_is_an_involution() {
    for height in [1.0_f32, 297.0, 330.0] {
        for y in [0.0_f32, 12.5, 100.0, height] {
            assert_eq!(screen_y(screen_y(y, height), height), y);
        }
    }
}

#[test]
fn test_cell_trim_rect_maps_to_top_left() {
    // 488x330 sheet, 90x55 trim at print (10, 265)
    let mapper = CoordinateMapper::new(330.0);
    let trim = Rectangle::new(10.0, 265.0, 90.0, 55.0);
    let rect = mapper.rect(&trim);

    assert_eq!(rect, ScreenRect::new(10.0, 10.0, 90.0, 55.0));
    assert_eq!(rect_top(265.0, 55.0, 330.0), 10.0);
}

#[test]
fn test_point_flips_only_y() {
    let mapper = CoordinateMapper::new(200.0);
    assert_eq!(mapper.point(15.0, 0.0), ScreenPoint::new(15.0, 200.0));
    assert_eq!(mapper.point(15.0, 200.0), ScreenPoint::new(15.0, 0.0));
    assert_eq!(mapper.screen_y(50.0), 150.0);
}

#[test]
fn test_rect_at_matches_rect() {
    let mapper = CoordinateMapper::new(330.0);
    let rect = Rectangle::new(7.0, 262.0, 96.0, 61.0);
    assert_eq!(
        mapper.rect(&rect),
        mapper.rect_at(rect.x, rect.y, rect.width, rect.height)
    );
}
