#![forbid(unsafe_code)]

pub mod model;
pub mod reward;
pub mod time;

pub use time::Clock;
