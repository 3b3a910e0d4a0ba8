pub mod day;
pub mod week;
