//! Clock, path resolution and the draft services used by the wizard steps.

pub mod services;
pub mod time;
pub mod utils;

pub use time::{Clock, FixedClock, SystemClock};
