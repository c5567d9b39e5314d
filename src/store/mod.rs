pub mod profile;

pub use profile::{JsonStore, ProfileData, SessionRecord};
