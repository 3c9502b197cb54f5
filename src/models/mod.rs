pub mod day;
pub mod event;
pub mod hours;
pub mod operator;
pub mod schedule;
pub mod special;
pub mod venue;

pub use day::Day;
pub use event::{EventInput, VenueEvent};
pub use hours::{BusinessHours, Clock12, DayInput, Meridiem, OpenHours, WeekResolution};
pub use operator::Operator;
pub use schedule::{DaySchedule, TimeBlock, WeeklySchedule};
pub use special::{HhItem, ItemInput, SpecialsError, SpecialsKind, MAX_SPECIALS};
pub use venue::{Venue, VenueDetails};
