use serde::{Deserialize, Serialize};

/// Day of the week. Lowercase names are the JSON keys used by the
/// `business_hours` column; capitalized names appear in schedule text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Day {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Day {
    /// Sunday-first, the order happy hour schedules are written in.
    pub const SUNDAY_FIRST: [Day; 7] = [
        Day::Sunday,
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
    ];

    /// Monday-first, the order the business hours editor lists days.
    pub const MONDAY_FIRST: [Day; 7] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
        Day::Sunday,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Day::Sunday => "Sunday",
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
            Day::Saturday => "Saturday",
        }
    }

    /// Exact, case-sensitive match on the capitalized day name.
    pub fn from_name(s: &str) -> Option<Day> {
        Day::SUNDAY_FIRST.into_iter().find(|d| d.name() == s)
    }

    pub fn from_weekday(w: chrono::Weekday) -> Day {
        match w {
            chrono::Weekday::Sun => Day::Sunday,
            chrono::Weekday::Mon => Day::Monday,
            chrono::Weekday::Tue => Day::Tuesday,
            chrono::Weekday::Wed => Day::Wednesday,
            chrono::Weekday::Thu => Day::Thursday,
            chrono::Weekday::Fri => Day::Friday,
            chrono::Weekday::Sat => Day::Saturday,
        }
    }

    /// Position in the Sunday-first week, used to index schedule storage.
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}
