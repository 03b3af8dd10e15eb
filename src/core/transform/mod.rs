//! Pure table transforms. Each takes a parsed table plus a config value and
//! returns a new table; none of them touch storage.

pub mod clean;
pub mod dates;
pub mod emails;
pub mod generator;
pub mod merge;
pub mod pivot;
pub mod split;
