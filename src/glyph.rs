//! Glyph rendering
//!
//! A glyph occupies a 70x82 region. Two anchor dots are always drawn; every
//! stroke enabled in the mask adds one fixed bar. Bar geometry depends only on
//! the stroke, never on the digit.

use embedded_graphics::{
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle},
};
use heapless::Vec;

use crate::segment::{SegmentMask, Stroke};

/// Size of the region a glyph is drawn into
pub const GLYPH_SIZE: Size = Size::new(70, 82);

const fn rect(x: i32, y: i32, w: u32, h: u32) -> Rectangle {
    Rectangle::new(Point::new(x, y), Size::new(w, h))
}

/// Dots shared by every glyph, visible on their own in 6, 8 and 9
pub const ANCHORS: [Rectangle; 2] = [rect(33, 25, 4, 4), rect(33, 53, 4, 4)];

/// Geometry of a stroke relative to the glyph origin
pub const fn stroke_rect(stroke: Stroke) -> Rectangle {
    match stroke {
        Stroke::UpperLeft => rect(0, 25, 37, 4),
        Stroke::UpperCenter => rect(33, 0, 4, 29),
        Stroke::UpperRight => rect(33, 25, 37, 4),
        Stroke::LowerLeft => rect(0, 53, 37, 4),
        Stroke::Center => rect(33, 25, 4, 32),
        Stroke::LowerRight => rect(33, 53, 37, 4),
        Stroke::LowerCenter => rect(33, 53, 4, 29),
        Stroke::Serif => rect(29, 0, 4, 29),
    }
}

/// Every rectangle drawn for `mask`, anchors first, placed at `origin`
pub fn glyph_rects(mask: SegmentMask, origin: Point) -> Vec<Rectangle, 10> {
    ANCHORS
        .iter()
        .copied()
        .chain(mask.strokes().map(stroke_rect))
        .map(|r| r.translate(origin))
        .collect()
}

/// Fill the glyph for `mask` with the foreground color
pub fn render<D>(mask: SegmentMask, origin: Point, target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let style = PrimitiveStyle::with_fill(BinaryColor::On);
    for r in glyph_rects(mask, origin) {
        r.into_styled(style).draw(target)?;
    }
    Ok(())
}
