//! Rule-based helpers shared by the sanitizer and the projector.

pub mod amounts;
pub mod patterns;

pub use amounts::{decimal_from_number, parse_amount};
pub use patterns::*;
