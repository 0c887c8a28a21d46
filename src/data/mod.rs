//! Data module - record schemas, fixture generation and loading

pub mod field;
mod generator;
mod loader;
pub mod records;

pub use field::{FieldKey, FieldValue, Record, MISSING_KEY};
pub use generator::{month_bounds, DatasetGenerator, GeneratorError, MONTHS};
pub use loader::{DataLoader, LoaderError};
pub use records::*;
