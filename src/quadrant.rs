//! Screen quadrants, one digit each
//!
//! ```text
//!   hour tens   | hour units
//!   ------------+------------
//!   min tens    | min units
//! ```

use embedded_graphics::{pixelcolor::BinaryColor, prelude::*, primitives::Rectangle};

use crate::clock::ClockState;
use crate::glyph::{self, GLYPH_SIZE};
use crate::segment::{encode, Digit};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Quadrant {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Quadrant {
    /// Paint order
    pub const ALL: [Quadrant; 4] = [
        Quadrant::TopLeft,
        Quadrant::TopRight,
        Quadrant::BottomLeft,
        Quadrant::BottomRight,
    ];

    pub const fn origin(self) -> Point {
        match self {
            Quadrant::TopLeft => Point::new(0, 0),
            Quadrant::TopRight => Point::new(74, 0),
            Quadrant::BottomLeft => Point::new(0, 86),
            Quadrant::BottomRight => Point::new(74, 86),
        }
    }

    pub const fn region(self) -> Rectangle {
        Rectangle::new(self.origin(), GLYPH_SIZE)
    }

    /// Digit this quadrant shows for `state`
    pub const fn digit(self, state: &ClockState) -> Digit {
        match self {
            Quadrant::TopLeft => Digit::tens(state.hour()),
            Quadrant::TopRight => Digit::units(state.hour()),
            Quadrant::BottomLeft => Digit::tens(state.minute()),
            Quadrant::BottomRight => Digit::units(state.minute()),
        }
    }

    pub fn draw<D>(self, state: &ClockState, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        glyph::render(encode(self.digit(state)), self.origin(), target)
    }
}

/// The four digits in paint order
pub fn digits(state: &ClockState) -> [Digit; 4] {
    Quadrant::ALL.map(|q| q.digit(state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{sample, HourFormat};
    use crate::divider::{HORIZONTAL_BAR, SCREEN, VERTICAL_BAR};
    use proptest::prelude::*;

    fn at(hour: u8, minute: u8) -> ClockState {
        sample(hour, minute, HourFormat::TwentyFourHour).unwrap()
    }

    fn values(state: &ClockState) -> [u8; 4] {
        digits(state).map(Digit::value)
    }

    #[test]
    fn test_single_digit_hour() {
        let state = at(7, 0);
        assert_eq!(Quadrant::TopLeft.digit(&state).value(), 0);
        assert_eq!(Quadrant::TopRight.digit(&state).value(), 7);
    }

    #[test]
    fn test_decomposition() {
        assert_eq!(values(&at(23, 59)), [2, 3, 5, 9]);
        assert_eq!(values(&at(12, 0)), [1, 2, 0, 0]);
    }

    #[test]
    fn test_out_of_range_time_never_reaches_quadrants() {
        assert!(sample(123, 75, HourFormat::TwentyFourHour).is_err());
        assert!(sample(23, 75, HourFormat::TwelveHour).is_err());
    }

    #[test]
    fn test_regions_tile_screen() {
        for q in Quadrant::ALL {
            let region = q.region();
            assert_eq!(SCREEN.intersection(&region), region);
            assert!(region.intersection(&VERTICAL_BAR).is_zero_sized());
            assert!(region.intersection(&HORIZONTAL_BAR).is_zero_sized());
        }
    }

    proptest! {
        #[test]
        fn digits_rebuild_time(hour in 0u8..24, minute in 0u8..60) {
            let [ht, hu, mt, mu] = values(&at(hour, minute));
            prop_assert_eq!(ht * 10 + hu, hour);
            prop_assert_eq!(mt * 10 + mu, minute);
        }
    }
}
