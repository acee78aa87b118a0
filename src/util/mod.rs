//! Utility functions: ID generation and timestamp encoding.

pub mod id;
pub mod time;

pub use id::{IdConfig, IdGenerator, normalize_id};
pub use time::{format_timestamp, parse_timestamp};
