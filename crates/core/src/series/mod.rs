//! Date-aligned series transforms. Every function takes a series by
//! reference and returns a new one.

pub mod areas;
pub mod average;
pub mod delta;
pub mod gaps;
pub mod weekly;
