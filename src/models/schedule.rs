use chrono::{Datelike, NaiveDateTime, Timelike};

use crate::models::hours::{Clock12, Meridiem};
use crate::models::Day;

/// EN DASH (U+2013), the range separator in generated `hh_times` text.
/// The parser also accepts a plain hyphen for hand-typed data.
const EN_DASH: char = '\u{2013}';

const VALID_MINUTES: [u8; 4] = [0, 15, 30, 45];

const CLOSED_LABEL: &str = "No happy hour";

/// A single start–end range within one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeBlock {
    pub start: Clock12,
    pub end: Clock12,
}

impl Default for TimeBlock {
    /// 4:00 PM–6:00 PM, what the editor offers when a closed day is opened.
    fn default() -> Self {
        Self {
            start: Clock12::new(4, 0, Meridiem::Pm),
            end: Clock12::new(6, 0, Meridiem::Pm),
        }
    }
}

/// One day's happy hour state: closed, or one to two time blocks. The
/// first block is retained even while the day is closed so re-opening the
/// day restores something sensible.
#[derive(Debug, Clone, PartialEq)]
pub struct DaySchedule {
    pub closed: bool,
    pub first: TimeBlock,
    pub second: Option<TimeBlock>,
}

impl Default for DaySchedule {
    fn default() -> Self {
        Self {
            closed: true,
            first: TimeBlock::default(),
            second: None,
        }
    }
}

/// The weekly happy hour schedule, one state per day of the week.
///
/// `parse` and `to_text` form the codec for the free-text `hh_times`
/// column. Parsing is best-effort and total: malformed lines and tokens
/// are dropped silently and every day is always present in the result.
/// `to_text(parse(to_text(s))) == to_text(s)` for any schedule the editor
/// can produce.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeeklySchedule {
    days: [DaySchedule; 7],
}

impl WeeklySchedule {
    pub fn day(&self, day: Day) -> &DaySchedule {
        &self.days[day.index()]
    }

    pub fn day_mut(&mut self, day: Day) -> &mut DaySchedule {
        &mut self.days[day.index()]
    }

    /// Parses schedule text. Lines look like `"Friday: 4 PM–6 PM, 9 PM–11 PM"`
    /// or `"Friday: No happy hour"`; anything else on a line is skipped.
    /// Days without a usable line stay closed. When the same day appears
    /// twice, the last occurrence wins.
    pub fn parse(text: &str) -> WeeklySchedule {
        let mut schedule = WeeklySchedule::default();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return schedule;
        }

        for line in trimmed.split('\n') {
            let Some((day_part, rest)) = line.split_once(':') else {
                continue;
            };
            let Some(day) = Day::from_name(day_part) else {
                continue;
            };
            let content = rest.trim();
            if content.is_empty() {
                continue;
            }

            let state = schedule.day_mut(day);
            if content == CLOSED_LABEL {
                state.closed = true;
                continue;
            }

            // Up to two comma-separated ranges; a third and beyond are
            // ignored. A day whose first range fails to parse stays
            // closed with its default block intact.
            let mut segments = content.split(", ");
            let Some(first) = segments.next().and_then(parse_time_range) else {
                continue;
            };
            state.closed = false;
            state.first = first;
            state.second = segments.next().and_then(parse_time_range);
        }

        schedule
    }

    /// Emits the canonical text form, every day in Sunday-first order.
    pub fn to_text(&self) -> String {
        Day::SUNDAY_FIRST
            .iter()
            .map(|&day| {
                let state = self.day(day);
                if state.closed {
                    return format!("{}: {CLOSED_LABEL}", day.name());
                }
                let mut ranges = format_block(&state.first);
                if let Some(second) = &state.second {
                    ranges.push_str(", ");
                    ranges.push_str(&format_block(second));
                }
                format!("{}: {ranges}", day.name())
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Whether happy hour is running at the given instant.
    pub fn is_active_at(&self, dt: &NaiveDateTime) -> bool {
        let state = self.day(Day::from_weekday(dt.weekday()));
        if state.closed {
            return false;
        }

        let minute_of_day = dt.hour() * 60 + dt.minute();
        let in_block = |block: &TimeBlock| {
            minute_of_day >= block.start.minutes_from_midnight()
                && minute_of_day < block.end.minutes_from_midnight()
        };
        in_block(&state.first) || state.second.as_ref().is_some_and(in_block)
    }
}

/// Splits a range on an en-dash or hyphen. With three or more tokens the
/// first and last are used; with fewer than two the range is discarded.
fn parse_time_range(segment: &str) -> Option<TimeBlock> {
    let parts: Vec<&str> = segment.trim().split([EN_DASH, '-']).collect();
    if parts.len() < 2 {
        return None;
    }
    let start = parse_time(parts[0])?;
    let end = parse_time(parts[parts.len() - 1])?;
    Some(TimeBlock { start, end })
}

/// Parses a single `H[:MM] AM/PM` token, case-insensitively, whitespace
/// before the meridiem optional. Minutes default to 00 when absent and
/// fall back to 00 when not one of the four select options (membership
/// test, not rounding). `"close"`/`"closing"` map to 11:00 PM.
fn parse_time(token: &str) -> Option<Clock12> {
    let token = token.trim();
    if token.eq_ignore_ascii_case("close") || token.eq_ignore_ascii_case("closing") {
        return Some(Clock12::new(11, 0, Meridiem::Pm));
    }

    let lower = token.to_ascii_lowercase();
    let (rest, meridiem) = if let Some(r) = lower.strip_suffix("am") {
        (r, Meridiem::Am)
    } else if let Some(r) = lower.strip_suffix("pm") {
        (r, Meridiem::Pm)
    } else {
        return None;
    };

    let rest = rest.trim_end();
    let (hour_part, minute_part) = match rest.split_once(':') {
        Some((h, m)) => (h, Some(m)),
        None => (rest, None),
    };

    if hour_part.is_empty() || hour_part.len() > 2 || !hour_part.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    let hour: u8 = hour_part.parse().ok()?;

    let minute = match minute_part {
        None => 0,
        Some(m) => {
            if m.len() != 2 || !m.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            let raw: u8 = m.parse().ok()?;
            if VALID_MINUTES.contains(&raw) {
                raw
            } else {
                0
            }
        }
    };

    Some(Clock12::new(hour, minute, meridiem))
}

fn format_time(t: Clock12) -> String {
    if t.minute == 0 {
        format!("{} {}", t.hour, t.meridiem.as_str())
    } else {
        format!("{}:{:02} {}", t.hour, t.minute, t.meridiem.as_str())
    }
}

fn format_block(block: &TimeBlock) -> String {
    format!("{}{EN_DASH}{}", format_time(block.start), format_time(block.end))
}
