//! LinesWatch: a bar-segment watch face for a 144x168 memory LCD.
//!
//! Each digit of the time is drawn in its own screen quadrant from a handful
//! of straight bars. The library is `no_std` and independent of the board; the
//! RP2040 firmware in `main.rs` plays the host and drives [`WatchFace`].

#![cfg_attr(not(test), no_std)]

pub mod clock;
pub mod divider;
pub mod error;
pub mod face;
pub mod glyph;
pub mod memlcd;
pub mod quadrant;
pub mod segment;

pub use clock::{sample, ClockState, HourFormat, WallClock};
pub use error::Error;
pub use face::{Region, RenderPlan, WatchFace};
pub use memlcd::{FrameBuffer, LcdError, MemoryLcd};
pub use quadrant::Quadrant;
pub use segment::{encode, Digit, SegmentMask, Stroke};
