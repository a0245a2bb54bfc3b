//! Data module - CSV loading and typed survey records

mod loader;
mod survey;

pub use loader::{extract_records, DataLoader, LoaderError};
pub use survey::StudentRecord;
