pub mod contract;
pub mod number;
pub mod record;
