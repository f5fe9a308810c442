//! Raw document shapes exchanged with the platform store. These mirror
//! what is actually persisted: sparse, loosely-typed, and tolerant of
//! older writers that omitted fields.

mod match_record;
mod message_record;
mod user_record;

pub use match_record::MatchRecord;
pub use message_record::{MessageKind, MessageRecord};
pub use user_record::{LocationRecord, PreferencesRecord, UserPatch, UserRecord};
