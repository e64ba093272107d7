#![forbid(unsafe_code)]

pub mod analytics;
pub mod deck;
pub mod model;
pub mod quiz;
pub mod scheduler;
pub mod time;

pub use time::Clock;
