//! Time-of-day values and time windows.
//!
//! Times cross the crate boundary as `"HH:MM"` strings and are held
//! internally as minutes past midnight.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RoutingError};

const MINUTES_PER_DAY: u16 = 24 * 60;

/// A wall-clock time of day with minute resolution.
///
/// # Examples
///
/// ```
/// use u_delivery::models::ClockTime;
///
/// let t: ClockTime = "09:30".parse().unwrap();
/// assert_eq!(t.minutes(), 570.0);
/// assert_eq!(t.to_string(), "09:30");
/// assert!("9:30".parse::<ClockTime>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime(u16);

impl ClockTime {
    /// Creates a time from minutes past midnight.
    ///
    /// Returns `None` for values at or beyond 24:00.
    pub fn from_minutes(minutes: u16) -> Option<Self> {
        (minutes < MINUTES_PER_DAY).then_some(Self(minutes))
    }

    /// Creates a time from an hour (0-23) and minute (0-59).
    pub fn from_hm(hour: u16, minute: u16) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self(hour * 60 + minute))
        } else {
            None
        }
    }

    /// Minutes past midnight.
    pub fn minutes(&self) -> f64 {
        f64::from(self.0)
    }

    /// Hour component.
    pub fn hour(&self) -> u16 {
        self.0 / 60
    }

    /// Minute component.
    pub fn minute(&self) -> u16 {
        self.0 % 60
    }
}

impl FromStr for ClockTime {
    type Err = RoutingError;

    fn from_str(s: &str) -> Result<Self> {
        let malformed = || RoutingError::MalformedTime(s.to_string());
        let bytes = s.as_bytes();
        if bytes.len() != 5 || bytes[2] != b':' {
            return Err(malformed());
        }
        let digit = |b: u8| -> Result<u16> {
            if b.is_ascii_digit() {
                Ok(u16::from(b - b'0'))
            } else {
                Err(malformed())
            }
        };
        let hour = digit(bytes[0])? * 10 + digit(bytes[1])?;
        let minute = digit(bytes[3])? * 10 + digit(bytes[4])?;
        Self::from_hm(hour, minute).ok_or_else(malformed)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl TryFrom<String> for ClockTime {
    type Error = RoutingError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<ClockTime> for String {
    fn from(t: ClockTime) -> Self {
        t.to_string()
    }
}

/// An inclusive acceptance interval `[start, end]`.
///
/// Arriving before `start` means waiting until `start`; arriving after
/// `end` is infeasible.
///
/// # Examples
///
/// ```
/// use u_delivery::models::TimeWindow;
///
/// let tw = TimeWindow::parse("09:00", "10:00").unwrap();
/// assert_eq!(tw.start(), 540.0);
/// assert_eq!(tw.service_start(530.0), Some(540.0));
/// assert_eq!(tw.service_start(555.5), Some(555.5));
/// assert_eq!(tw.service_start(601.0), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "(String, String)", into = "(String, String)")]
pub struct TimeWindow {
    start: ClockTime,
    end: ClockTime,
}

impl TimeWindow {
    /// Creates a window; fails if `start` is after `end`.
    pub fn new(start: ClockTime, end: ClockTime) -> Result<Self> {
        if start > end {
            return Err(RoutingError::InvertedTimeWindow {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// Parses a window from two `"HH:MM"` strings.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Self::new(start.parse()?, end.parse()?)
    }

    /// Window opening, in minutes past midnight.
    pub fn start(&self) -> f64 {
        self.start.minutes()
    }

    /// Window closing, in minutes past midnight.
    pub fn end(&self) -> f64 {
        self.end.minutes()
    }

    /// Window opening as a clock time.
    pub fn start_time(&self) -> ClockTime {
        self.start
    }

    /// Window closing as a clock time.
    pub fn end_time(&self) -> ClockTime {
        self.end
    }

    /// Returns `true` if `time` falls within the window.
    pub fn contains(&self, time: f64) -> bool {
        time >= self.start() && time <= self.end()
    }

    /// Waiting time incurred when arriving at `arrival`.
    pub fn waiting_time(&self, arrival: f64) -> f64 {
        (self.start() - arrival).max(0.0)
    }

    /// Returns `true` if arriving at `arrival` misses the window.
    pub fn is_violated(&self, arrival: f64) -> bool {
        arrival > self.end()
    }

    /// Time at which service can begin when arriving at `arrival`.
    ///
    /// `None` if the window has already closed.
    pub fn service_start(&self, arrival: f64) -> Option<f64> {
        if self.is_violated(arrival) {
            None
        } else {
            Some(arrival.max(self.start()))
        }
    }
}

impl TryFrom<(String, String)> for TimeWindow {
    type Error = RoutingError;

    fn try_from((start, end): (String, String)) -> Result<Self> {
        Self::parse(&start, &end)
    }
}

impl From<TimeWindow> for (String, String) {
    fn from(tw: TimeWindow) -> Self {
        (tw.start.to_string(), tw.end.to_string())
    }
}
