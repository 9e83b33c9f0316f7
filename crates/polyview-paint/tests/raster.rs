use polyview_paint::{Canvas, Color, DrawList, Fill, PaintError, Rect, pos2, rasterize, vec2};

#[test]
fn solid_rect_is_rasterized() -> Result<(), PaintError> {
    let mut list = DrawList::new(20.0, 10.0);
    list.fill_rect(
        Rect::from_min_size(pos2(0.0, 0.0), vec2(20.0, 10.0)),
        0.0,
        Fill::Solid(Color::from_rgb(255, 0, 0)),
    );
    list.fill_rect(
        Rect::from_min_size(pos2(10.0, 0.0), vec2(10.0, 10.0)),
        0.0,
        Fill::Solid(Color::from_rgb(0, 0, 255)),
    );

    let image = rasterize(&list)?;
    assert_eq!(image.dimensions(), (20, 10));
    assert_eq!(image.get_pixel(2, 5).0, [255, 0, 0, 255]);
    assert_eq!(image.get_pixel(17, 5).0, [0, 0, 255, 255]);
    Ok(())
}

#[test]
fn gradient_darkens_toward_end() -> Result<(), PaintError> {
    let mut list = DrawList::new(4.0, 40.0);
    list.fill_rect(
        Rect::from_min_size(pos2(0.0, 0.0), vec2(4.0, 40.0)),
        0.0,
        Fill::linear(pos2(0.0, 0.0), pos2(0.0, 40.0), Color::WHITE, Color::BLACK),
    );
    let image = rasterize(&list)?;
    let top = image.get_pixel(2, 1).0[0];
    let bottom = image.get_pixel(2, 38).0[0];
    assert!(top > bottom);
    Ok(())
}

#[test]
fn empty_canvas_is_an_error() {
    let list = DrawList::new(0.0, 10.0);
    assert!(matches!(
        rasterize(&list),
        Err(PaintError::CanvasSize { width: 0, .. })
    ));
}
