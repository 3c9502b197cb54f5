pub mod events;
pub mod provision;
pub mod venues;
