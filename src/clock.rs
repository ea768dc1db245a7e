use crate::error::Error;

/// User preference for how hours are shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HourFormat {
    #[default]
    TwelveHour,
    TwentyFourHour,
}

impl HourFormat {
    pub fn from_24h_style(is_24h: bool) -> Self {
        if is_24h {
            HourFormat::TwentyFourHour
        } else {
            HourFormat::TwelveHour
        }
    }
}

/// Time as displayed: hour already normalized for the active format.
///
/// Only [`sample`] builds one, so the hour is always 0..=23 and the minute
/// 0..=59.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockState {
    hour: u8,
    minute: u8,
}

impl ClockState {
    pub const fn hour(&self) -> u8 {
        self.hour
    }

    pub const fn minute(&self) -> u8 {
        self.minute
    }
}

/// Maps a 0..=23 hour to what the face shows (1..=12 in twelve hour mode)
pub const fn normalize_hour(hour: u8, format: HourFormat) -> u8 {
    match format {
        HourFormat::TwentyFourHour => hour,
        HourFormat::TwelveHour => match hour % 12 {
            0 => 12,
            h => h,
        },
    }
}

/// Builds the displayed state from a wall clock reading.
pub fn sample(hour: u8, minute: u8, format: HourFormat) -> Result<ClockState, Error> {
    if hour >= 24 || minute >= 60 {
        return Err(Error::InvalidTime { hour, minute });
    }
    Ok(ClockState {
        hour: normalize_hour(hour, format),
        minute,
    })
}

/// Free running 24-hour clock advanced by a 1 Hz tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WallClock {
    hours: u8,
    mins: u8,
    secs: u8,
}

impl WallClock {
    pub fn new(hours: u8, mins: u8, secs: u8) -> Result<Self, Error> {
        if hours >= 24 || mins >= 60 || secs >= 60 {
            return Err(Error::InvalidTime {
                hour: hours,
                minute: mins,
            });
        }
        Ok(Self { hours, mins, secs })
    }

    pub fn hours(&self) -> u8 {
        self.hours
    }

    pub fn minutes(&self) -> u8 {
        self.mins
    }

    pub fn seconds(&self) -> u8 {
        self.secs
    }

    /// Increments the second. Returns true if a minute boundary was crossed.
    pub fn tick(&mut self) -> bool {
        self.secs += 1;
        if self.secs >= 60 {
            self.secs = 0;
            self.add_minute();
            true
        } else {
            false
        }
    }

    /// Increments the minute. Handles rollover to hours.
    pub fn add_minute(&mut self) {
        self.mins += 1;
        if self.mins >= 60 {
            self.mins = 0;
            self.hours = (self.hours + 1) % 24;
        }
    }
}
