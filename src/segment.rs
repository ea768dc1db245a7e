//! Digit to bar-segment encoding
//!
//! Every glyph is built from the same seven bars plus a serif. A digit is
//! encoded as one byte where each bit switches one bar on:
//!
//! ```text
//!   bit 7  upper left      bit 3  center (vertical)
//!   bit 6  upper center    bit 2  lower right
//!   bit 5  upper right     bit 1  lower center
//!   bit 4  lower left      bit 0  serif of the 1
//! ```
//!
//! The two anchor dots shared by all glyphs are not part of the mask.

use crate::error::Error;

/// A validated decimal digit (0..=9)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Digit(u8);

impl Digit {
    pub fn new(value: u8) -> Result<Self, Error> {
        if value <= 9 {
            Ok(Digit(value))
        } else {
            Err(Error::OutOfRange(value))
        }
    }

    /// Tens digit of a value below 100
    pub(crate) const fn tens(value: u8) -> Self {
        debug_assert!(value < 100);
        Digit(value / 10)
    }

    /// Units digit of any value
    pub(crate) const fn units(value: u8) -> Self {
        Digit(value % 10)
    }

    pub const fn value(self) -> u8 {
        self.0
    }
}

/// One of the maskable bars of a glyph, named by its position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Stroke {
    UpperLeft,
    UpperCenter,
    UpperRight,
    LowerLeft,
    Center,
    LowerRight,
    LowerCenter,
    Serif,
}

impl Stroke {
    /// All strokes, highest bit first
    pub const ALL: [Stroke; 8] = [
        Stroke::UpperLeft,
        Stroke::UpperCenter,
        Stroke::UpperRight,
        Stroke::LowerLeft,
        Stroke::Center,
        Stroke::LowerRight,
        Stroke::LowerCenter,
        Stroke::Serif,
    ];

    /// Bit position of this stroke in a [`SegmentMask`]
    pub const fn bit(self) -> u8 {
        match self {
            Stroke::UpperLeft => 7,
            Stroke::UpperCenter => 6,
            Stroke::UpperRight => 5,
            Stroke::LowerLeft => 4,
            Stroke::Center => 3,
            Stroke::LowerRight => 2,
            Stroke::LowerCenter => 1,
            Stroke::Serif => 0,
        }
    }
}

/// Bar selection for one glyph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SegmentMask(pub u8);

impl SegmentMask {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, stroke: Stroke) -> bool {
        self.0 & (1 << stroke.bit()) != 0
    }

    /// Strokes switched on, highest bit first
    pub fn strokes(self) -> impl Iterator<Item = Stroke> {
        Stroke::ALL.into_iter().filter(move |s| self.contains(*s))
    }
}

impl From<Stroke> for SegmentMask {
    fn from(stroke: Stroke) -> Self {
        SegmentMask(1 << stroke.bit())
    }
}

impl core::ops::BitOr<Stroke> for SegmentMask {
    type Output = SegmentMask;
    fn bitor(self, rhs: Stroke) -> Self::Output {
        SegmentMask(self.0 | (1 << rhs.bit()))
    }
}

const DIGIT_MASKS: [SegmentMask; 10] = [
    SegmentMask(0b0000_1000), // 0
    SegmentMask(0b0000_1011), // 1
    SegmentMask(0b1000_0100), // 2
    SegmentMask(0b1001_0000), // 3
    SegmentMask(0b0101_0010), // 4
    SegmentMask(0b0011_0000), // 5
    SegmentMask(0b0010_0000), // 6
    SegmentMask(0b1000_1010), // 7
    SegmentMask(0b0000_0000), // 8
    SegmentMask(0b0001_0000), // 9
];

/// Mask for a digit
pub const fn encode(digit: Digit) -> SegmentMask {
    DIGIT_MASKS[digit.0 as usize]
}

/// Mask for a raw value, rejecting anything that is not a digit
pub fn encode_value(value: u8) -> Result<SegmentMask, Error> {
    Digit::new(value).map(encode)
}
