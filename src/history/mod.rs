//! Job history: persisted scheduling outcomes, aggregations and CSV export

pub mod analytics;
pub mod export;
pub mod store;

pub use analytics::Analytics;
pub use export::{export_csv, export_filename};
pub use store::{HistoryStore, JobRecord};
