//! Host facing side of the watch face
//!
//! The host owns scheduling: it calls [`WatchFace::on_init`] once, then
//! [`WatchFace::on_minute_tick`] on every minute boundary, and paints the
//! regions listed in the returned [`RenderPlan`]. Ticks and paints must be
//! serialized by the host; on a preemptive host keep the face behind one lock.

use embedded_graphics::{
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle},
};
use heapless::Vec;

use crate::clock::{sample, ClockState, HourFormat};
use crate::divider::{self, SCREEN};
use crate::error::Error;
use crate::quadrant::{self, Quadrant};
use crate::segment::Digit;

/// An independently redrawable part of the screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Region {
    Divider,
    Quadrant(Quadrant),
}

impl Region {
    pub const fn bounds(self) -> Rectangle {
        match self {
            Region::Divider => SCREEN,
            Region::Quadrant(q) => q.region(),
        }
    }
}

/// Regions that need a redraw, in paint order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderPlan {
    regions: Vec<Region, 5>,
}

impl RenderPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every region of the screen
    pub fn full() -> Self {
        let mut plan = Self::new();
        plan.mark(Region::Divider);
        plan.mark_quadrants();
        plan
    }

    pub fn quadrants() -> Self {
        let mut plan = Self::new();
        plan.mark_quadrants();
        plan
    }

    fn mark_quadrants(&mut self) {
        for q in Quadrant::ALL {
            self.mark(Region::Quadrant(q));
        }
    }

    /// Marks a region dirty; marking twice is a no-op
    pub fn mark(&mut self, region: Region) {
        if !self.regions.contains(&region) {
            // Five regions exist, capacity is five
            let _ = self.regions.push(region);
        }
    }

    /// Union of two plans
    pub fn merge(&mut self, other: &RenderPlan) {
        for region in other.iter() {
            self.mark(region);
        }
    }

    pub fn contains(&self, region: Region) -> bool {
        self.regions.contains(&region)
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Region> + '_ {
        self.regions.iter().copied()
    }

    pub fn clear(&mut self) {
        self.regions.clear();
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for RenderPlan {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "RenderPlan{}", self.regions.as_slice());
    }
}

/// Four bar-segment digits split by a cross
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WatchFace {
    state: ClockState,
}

impl WatchFace {
    /// Samples the launch time; the whole screen must be painted.
    pub fn on_init(
        hour: u8,
        minute: u8,
        format: HourFormat,
    ) -> Result<(Self, RenderPlan), Error> {
        let state = sample(hour, minute, format)?;
        Ok((Self { state }, RenderPlan::full()))
    }

    /// Resamples the time; only the digits need repainting.
    pub fn on_minute_tick(
        &mut self,
        hour: u8,
        minute: u8,
        format: HourFormat,
    ) -> Result<RenderPlan, Error> {
        self.state = sample(hour, minute, format)?;
        Ok(RenderPlan::quadrants())
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    pub fn digits(&self) -> [Digit; 4] {
        quadrant::digits(&self.state)
    }

    /// Draws one region over whatever is already there
    pub fn paint<D>(&self, region: Region, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        match region {
            Region::Divider => divider::render_divider(target),
            Region::Quadrant(q) => q.draw(&self.state, target),
        }
    }

    /// Blanks each planned region to the background, then paints it
    pub fn paint_plan<D>(&self, plan: &RenderPlan, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        let background = PrimitiveStyle::with_fill(BinaryColor::Off);
        for region in plan.iter() {
            region.bounds().into_styled(background).draw(target)?;
        }
        // Divider last so cleared quadrant bounds never cut into it
        for region in plan.iter().filter(|r| *r != Region::Divider) {
            self.paint(region, target)?;
        }
        if plan.contains(Region::Divider) {
            self.paint(Region::Divider, target)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memlcd::FrameBuffer;

    #[test]
    fn test_init_plan_covers_screen() {
        let (_, plan) = WatchFace::on_init(9, 5, HourFormat::TwelveHour).unwrap();
        assert_eq!(plan.len(), 5);
        assert!(plan.contains(Region::Divider));
        for q in Quadrant::ALL {
            assert!(plan.contains(Region::Quadrant(q)));
        }
    }

    #[test]
    fn test_tick_plan_skips_divider() {
        let (mut face, _) = WatchFace::on_init(9, 5, HourFormat::TwelveHour).unwrap();
        let plan = face.on_minute_tick(9, 6, HourFormat::TwelveHour).unwrap();
        assert_eq!(plan.len(), 4);
        assert!(!plan.contains(Region::Divider));
        assert_eq!((face.state().hour(), face.state().minute()), (9, 6));
    }

    #[test]
    fn test_invalid_tick_keeps_state() {
        let (mut face, _) = WatchFace::on_init(10, 10, HourFormat::TwentyFourHour).unwrap();
        assert!(face.on_minute_tick(25, 0, HourFormat::TwentyFourHour).is_err());
        assert_eq!((face.state().hour(), face.state().minute()), (10, 10));
    }

    #[test]
    fn test_plan_merge_dedups() {
        let mut plan = RenderPlan::quadrants();
        plan.merge(&RenderPlan::full());
        plan.mark(Region::Divider);
        assert_eq!(plan.len(), 5);
        plan.clear();
        assert!(plan.is_empty());
    }

    #[test]
    fn test_paint_is_idempotent() {
        let (face, plan) = WatchFace::on_init(13, 0, HourFormat::TwentyFourHour).unwrap();
        let mut first = FrameBuffer::new();
        face.paint_plan(&plan, &mut first).unwrap();
        let mut second = first.clone();
        face.paint_plan(&plan, &mut second).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_repaint_clears_previous_digit() {
        let (mut face, plan) = WatchFace::on_init(8, 8, HourFormat::TwentyFourHour).unwrap();
        let mut fb = FrameBuffer::new();
        face.paint_plan(&plan, &mut fb).unwrap();
        // Upper left bar of an 8 in the bottom right quadrant is absent
        assert_eq!(fb.get_pixel(Point::new(74, 86 + 25)), Some(BinaryColor::Off));

        let plan = face.on_minute_tick(8, 7, HourFormat::TwentyFourHour).unwrap();
        face.paint_plan(&plan, &mut fb).unwrap();
        assert_eq!(fb.get_pixel(Point::new(74, 86 + 25)), Some(BinaryColor::On));

        let plan = face.on_minute_tick(8, 8, HourFormat::TwentyFourHour).unwrap();
        face.paint_plan(&plan, &mut fb).unwrap();
        assert_eq!(fb.get_pixel(Point::new(74, 86 + 25)), Some(BinaryColor::Off));
    }
}
