//! Business license domain: the output record and the entity-to-field
//! mapping heuristic.

pub mod mapper;
pub mod record;

pub use mapper::{CONFIDENCE_THRESHOLD, FieldMapper};
pub use record::LicenseRecord;
