//! The cross splitting the screen into four quadrants

use embedded_graphics::{
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle},
};

pub const SCREEN_WIDTH: u32 = 144;
pub const SCREEN_HEIGHT: u32 = 168;

/// Bar thickness, also the gap between quadrants
pub const BAR_WIDTH: u32 = 4;

pub const VERTICAL_BAR: Rectangle =
    Rectangle::new(Point::new(70, 0), Size::new(BAR_WIDTH, SCREEN_HEIGHT));
pub const HORIZONTAL_BAR: Rectangle =
    Rectangle::new(Point::new(0, 82), Size::new(SCREEN_WIDTH, BAR_WIDTH));

/// The full screen, which is the divider's drawing region
pub const SCREEN: Rectangle =
    Rectangle::new(Point::zero(), Size::new(SCREEN_WIDTH, SCREEN_HEIGHT));

pub fn render_divider<D>(target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let style = PrimitiveStyle::with_fill(BinaryColor::On);
    VERTICAL_BAR.into_styled(style).draw(target)?;
    HORIZONTAL_BAR.into_styled(style).draw(target)
}
