pub mod engine;
pub mod scheduler;

pub use engine::{CycleError, SyncEngine};
pub use scheduler::{CycleOutcome, RefreshScheduler};
