use std::collections::BTreeMap;

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::models::Day;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Meridiem {
    Am,
    Pm,
}

impl Meridiem {
    pub fn as_str(self) -> &'static str {
        match self {
            Meridiem::Am => "AM",
            Meridiem::Pm => "PM",
        }
    }
}

/// A time as the hour/minute/AM-PM selects present it: hour 1–12, minute
/// one of 00/15/30/45.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clock12 {
    pub hour: u8,
    pub minute: u8,
    pub meridiem: Meridiem,
}

impl Clock12 {
    pub fn new(hour: u8, minute: u8, meridiem: Meridiem) -> Self {
        Self { hour, minute, meridiem }
    }

    /// Renders as a stored 24-hour "HH:MM" string.
    /// 12 AM → 00:MM, 1–11 AM unchanged, 12 PM → 12:MM, 1–11 PM → +12.
    pub fn to_24h(self) -> String {
        let mut h = self.hour;
        match self.meridiem {
            Meridiem::Am => {
                if h == 12 {
                    h = 0;
                }
            }
            Meridiem::Pm => {
                if h != 12 {
                    h += 12;
                }
            }
        }
        format!("{h:02}:{:02}", self.minute)
    }

    /// Parses a stored 24-hour "HH:MM" string back into select components.
    /// Returns `None` when the string is not two `:`-separated numbers.
    pub fn from_24h(time24: &str) -> Option<Clock12> {
        let (h_str, m_str) = time24.split_once(':')?;
        let h: u8 = h_str.trim().parse().ok()?;
        let minute: u8 = m_str.trim().parse().ok()?;

        let meridiem = if h < 12 { Meridiem::Am } else { Meridiem::Pm };
        let hour = match h {
            0 => 12,
            1..=12 => h,
            _ => h - 12,
        };
        Some(Clock12 { hour, minute, meridiem })
    }

    /// Minutes since midnight, for comparing against a wall-clock instant.
    pub fn minutes_from_midnight(self) -> u32 {
        let mut h = self.hour as u32;
        match self.meridiem {
            Meridiem::Am => {
                if h == 12 {
                    h = 0;
                }
            }
            Meridiem::Pm => {
                if h != 12 {
                    h += 12;
                }
            }
        }
        h * 60 + self.minute as u32
    }
}

/// One day's open/close pair as stored in the `business_hours` column.
/// `open > close` is a legal overnight window (e.g. 22:00–02:00).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenHours {
    pub open: String,
    pub close: String,
}

/// One day's submission from the hours editor.
#[derive(Debug, Clone, Copy)]
pub enum DayInput {
    Closed,
    Open { open: Clock12, close: Clock12 },
}

/// Weekly business hours. A day mapped to `None` is closed; an absent day
/// is treated the same.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BusinessHours {
    #[serde(flatten)]
    pub days: BTreeMap<Day, Option<OpenHours>>,
}

/// Result of resolving a week of editor inputs. `hours` records the
/// attempted values even for days that failed validation, so the editor can
/// redisplay them next to the per-day error.
#[derive(Debug, Clone)]
pub struct WeekResolution {
    pub hours: BusinessHours,
    pub errors: BTreeMap<Day, String>,
}

impl WeekResolution {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

impl BusinessHours {
    /// Converts and validates a week of editor inputs. The only rejection
    /// is `open == close`; any other ordering is accepted, overnight
    /// windows included. Each day validates independently.
    pub fn resolve_week(inputs: &[(Day, DayInput)]) -> WeekResolution {
        let mut hours = BusinessHours::default();
        let mut errors = BTreeMap::new();

        for &(day, input) in inputs {
            match input {
                DayInput::Closed => {
                    hours.days.insert(day, None);
                }
                DayInput::Open { open, close } => {
                    let open = open.to_24h();
                    let close = close.to_24h();
                    if open == close {
                        errors.insert(
                            day,
                            "Opening and closing times cannot be the same.".to_string(),
                        );
                    }
                    hours.days.insert(day, Some(OpenHours { open, close }));
                }
            }
        }

        WeekResolution { hours, errors }
    }

    pub fn from_json(s: &str) -> anyhow::Result<Self> {
        let hours: BusinessHours = serde_json::from_str(s)?;
        for window in hours.days.values().flatten() {
            if Clock12::from_24h(&window.open).is_none() {
                anyhow::bail!("invalid open time: {}", window.open);
            }
            if Clock12::from_24h(&window.close).is_none() {
                anyhow::bail!("invalid close time: {}", window.close);
            }
        }
        Ok(hours)
    }

    pub fn hours_for(&self, day: Day) -> Option<&OpenHours> {
        self.days.get(&day).and_then(|h| h.as_ref())
    }

    /// Whether the venue is open at the given instant. An overnight window
    /// (close < open) covers clock times past the open OR before the close.
    pub fn is_open_at(&self, dt: &NaiveDateTime) -> bool {
        let day = Day::from_weekday(chrono::Datelike::weekday(dt));
        let Some(window) = self.hours_for(day) else {
            return false;
        };

        let time = format!("{:02}:{:02}", dt.hour(), dt.minute());
        if window.open < window.close {
            time >= window.open && time < window.close
        } else {
            time >= window.open || time < window.close
        }
    }
}
