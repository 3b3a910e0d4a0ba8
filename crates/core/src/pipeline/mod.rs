pub mod options;
pub mod reconcile;

pub use options::PipelineOptions;
pub use reconcile::{reconcile, run, DailyDocument, Diagnostics, Reconciled, WeeklyDocument};
