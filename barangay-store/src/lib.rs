//! Barangay Store - Record-Store Convention Layer
//!
//! Implements the conventions for keeping typed municipal records on a flat
//! key-value backend: hash-per-record encoding, counter-minted IDs,
//! prefix-scan collection listing, and set-backed family membership.
//! The backend itself is pluggable behind [`KvBackend`].

pub mod backend;
pub mod codec;
pub mod idgen;
pub mod memory;
pub mod relationship;
pub mod retry;
pub mod scanner;
pub mod store;

pub use backend::{Batch, BatchOp, KvBackend};
pub use codec::{load_entity, remove_entity, save_entity, KvEntity, ReadPolicy};
pub use idgen::{generate_display_id, generate_id};
pub use memory::MemoryBackend;
pub use retry::RetryingBackend;
pub use scanner::{list_all, sort_announcements, sort_document_requests, sort_events};
pub use store::{
    NewAnnouncement, NewDocumentRequest, NewEvent, NewFamilyHead, NewResident, RecordStore,
    ResidentUpdate,
};
