pub mod ideas;
pub mod matches;
pub mod user;
