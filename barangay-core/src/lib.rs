//! Barangay Core - Entity Types
//!
//! Pure data structures with no I/O. All other crates depend on this.
//! Entities mirror the field maps stored in the key-value backend, so the
//! key naming and field spellings here are load-bearing for data written by
//! earlier deployments.

pub mod dates;
pub mod entities;
pub mod enums;
pub mod error;
pub mod fields;
pub mod keys;

pub use dates::{parse_date, short_month_name};
pub use entities::{
    Announcement, DocumentRequest, Event, FamilyHead, Resident, User,
};
pub use enums::{DocumentStatus, EntityType};
pub use error::{BarangayError, BarangayResult, CodecError, StorageError};
pub use fields::FieldMap;
