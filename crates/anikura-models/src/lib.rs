pub mod record;
pub mod script;

pub use record::{AnimeRecord, MediaKind};
