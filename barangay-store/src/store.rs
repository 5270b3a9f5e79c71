//! Typed record-store facade.
//!
//! This is the surface the route layer calls: minting IDs, stamping
//! registration dates, keeping the resident `familyHeadId` field and the
//! family membership set in step via atomic batches, and enforcing the one
//! business rule owned here (a family head with members cannot be deleted).

use crate::backend::{Batch, KvBackend};
use crate::codec::{self, KvEntity, ReadPolicy};
use crate::idgen;
use crate::relationship;
use crate::retry::RetryingBackend;
use crate::scanner;
use barangay_core::{
    keys, Announcement, BarangayError, BarangayResult, DocumentRequest, DocumentStatus,
    EntityType, Event, FamilyHead, Resident, StorageError, User,
};
use chrono::Utc;
use std::collections::BTreeSet;
use std::sync::Arc;
use uuid::Uuid;

/// Caller-supplied fields for a new resident.
#[derive(Debug, Clone, Default)]
pub struct NewResident {
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub birth_date: String,
    pub address: String,
    pub contact_number: String,
    pub family_head_id: String,
}

/// Partial update for a resident. `registration_date` is deliberately not
/// updatable; it is always carried forward from the stored record.
#[derive(Debug, Clone, Default)]
pub struct ResidentUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub birth_date: Option<String>,
    pub address: Option<String>,
    pub contact_number: Option<String>,
    pub family_head_id: Option<String>,
}

/// Caller-supplied fields for a new family head.
#[derive(Debug, Clone, Default)]
pub struct NewFamilyHead {
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub birth_date: String,
    pub address: String,
    pub contact_number: String,
}

/// Caller-supplied fields for a new announcement.
#[derive(Debug, Clone, Default)]
pub struct NewAnnouncement {
    pub title: String,
    pub content: String,
    pub posted_by: String,
}

/// Caller-supplied fields for a new event.
#[derive(Debug, Clone, Default)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub event_date: String,
    pub location: String,
}

/// Caller-supplied fields for a new document request.
#[derive(Debug, Clone, Default)]
pub struct NewDocumentRequest {
    pub resident_name: String,
    pub document_type: String,
    pub purpose: String,
}

/// Attempts per backend call before a transient failure reaches the caller.
const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Typed operations over one key-value backend.
#[derive(Clone)]
pub struct RecordStore {
    backend: Arc<dyn KvBackend>,
    read_policy: ReadPolicy,
}

impl RecordStore {
    /// Store over `backend`, with every call wrapped in a
    /// [`RetryingBackend`] absorbing up to two transient failures.
    pub fn new(backend: Arc<dyn KvBackend>) -> Self {
        Self::with_backend(Arc::new(RetryingBackend::new(
            backend,
            DEFAULT_MAX_ATTEMPTS,
        )))
    }

    /// Store over `backend` exactly as given, no retry wrapper. For callers
    /// composing their own decorator stack.
    pub fn with_backend(backend: Arc<dyn KvBackend>) -> Self {
        Self {
            backend,
            read_policy: ReadPolicy::Strict,
        }
    }

    /// Store over a fresh in-process backend. Test and demo convenience.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(crate::memory::MemoryBackend::new()))
    }

    /// Override the default strict read policy, e.g. [`ReadPolicy::Heal`]
    /// for deployments still carrying partially-written legacy records.
    pub fn with_read_policy(mut self, policy: ReadPolicy) -> Self {
        self.read_policy = policy;
        self
    }

    pub fn backend(&self) -> &dyn KvBackend {
        self.backend.as_ref()
    }

    fn now_stamp() -> String {
        Utc::now().to_rfc3339()
    }

    fn not_found(entity_type: EntityType, id: &str) -> BarangayError {
        BarangayError::Storage(StorageError::NotFound {
            entity_type,
            id: id.to_string(),
        })
    }

    // ========================================================================
    // FAMILY HEADS
    // ========================================================================

    pub async fn create_family_head(&self, new: NewFamilyHead) -> BarangayResult<FamilyHead> {
        let id = idgen::generate_id(self.backend(), keys::FAMILY_HEADS_COUNT, "F").await?;
        let head = FamilyHead {
            id,
            first_name: new.first_name,
            last_name: new.last_name,
            gender: new.gender,
            birth_date: new.birth_date,
            address: new.address,
            contact_number: new.contact_number,
            registration_date: Self::now_stamp(),
        };
        codec::save_entity(self.backend(), &head).await?;
        tracing::debug!(id = %head.id, "family head created");
        Ok(head)
    }

    pub async fn get_family_head(&self, id: &str) -> BarangayResult<Option<FamilyHead>> {
        codec::load_entity(self.backend(), id, self.read_policy).await
    }

    pub async fn list_family_heads(&self) -> BarangayResult<Vec<FamilyHead>> {
        self.list_family_heads_with(self.read_policy).await
    }

    pub async fn list_family_heads_with(
        &self,
        policy: ReadPolicy,
    ) -> BarangayResult<Vec<FamilyHead>> {
        scanner::list_all(self.backend(), policy).await
    }

    /// Resident IDs registered under a family head.
    pub async fn family_members(&self, family_head_id: &str) -> BarangayResult<BTreeSet<String>> {
        relationship::list_members(self.backend(), family_head_id).await
    }

    /// Delete a family head. Rejected while the family still has members;
    /// residents must be deleted or moved first.
    pub async fn delete_family_head(&self, id: &str) -> BarangayResult<()> {
        let members = relationship::list_members(self.backend(), id).await?;
        if !members.is_empty() {
            return Err(BarangayError::Storage(StorageError::FamilyNotEmpty {
                family_head_id: id.to_string(),
                member_count: members.len(),
            }));
        }
        let existing: Option<FamilyHead> =
            codec::load_entity(self.backend(), id, ReadPolicy::Heal).await?;
        if existing.is_none() {
            return Err(Self::not_found(EntityType::FamilyHead, id));
        }
        let batch = Batch::new()
            .delete(FamilyHead::storage_key(id))
            .delete(keys::family_members_key(id));
        self.backend().apply(batch).await?;
        tracing::debug!(%id, "family head deleted");
        Ok(())
    }

    // ========================================================================
    // RESIDENTS
    // ========================================================================

    /// Create a resident: mint the ID, stamp the registration date, then
    /// write the record and the parent membership in one atomic batch.
    pub async fn create_resident(&self, new: NewResident) -> BarangayResult<Resident> {
        let id = idgen::generate_id(self.backend(), keys::RESIDENTS_COUNT, "R").await?;
        let resident = Resident {
            id,
            first_name: new.first_name,
            last_name: new.last_name,
            gender: new.gender,
            birth_date: new.birth_date,
            address: new.address,
            contact_number: new.contact_number,
            family_head_id: new.family_head_id,
            registration_date: Self::now_stamp(),
        };
        let mut batch = Batch::new().hash_set_multi(
            Resident::storage_key(&resident.id),
            resident.to_fields(),
        );
        if !resident.family_head_id.is_empty() {
            batch = batch.set_add(
                keys::family_members_key(&resident.family_head_id),
                resident.id.clone(),
            );
        }
        self.backend().apply(batch).await?;
        tracing::debug!(id = %resident.id, family = %resident.family_head_id, "resident created");
        Ok(resident)
    }

    pub async fn get_resident(&self, id: &str) -> BarangayResult<Option<Resident>> {
        codec::load_entity(self.backend(), id, self.read_policy).await
    }

    pub async fn list_residents(&self) -> BarangayResult<Vec<Resident>> {
        self.list_residents_with(self.read_policy).await
    }

    pub async fn list_residents_with(&self, policy: ReadPolicy) -> BarangayResult<Vec<Resident>> {
        scanner::list_all(self.backend(), policy).await
    }

    /// Apply a partial update. The stored registration date is always
    /// preserved; a family change moves the membership entry in the same
    /// batch as the record write.
    pub async fn update_resident(
        &self,
        id: &str,
        update: ResidentUpdate,
    ) -> BarangayResult<Resident> {
        let mut resident: Resident = codec::load_entity(self.backend(), id, ReadPolicy::Heal)
            .await?
            .ok_or_else(|| Self::not_found(EntityType::Resident, id))?;

        let previous_family = resident.family_head_id.clone();
        if let Some(first_name) = update.first_name {
            resident.first_name = first_name;
        }
        if let Some(last_name) = update.last_name {
            resident.last_name = last_name;
        }
        if let Some(gender) = update.gender {
            resident.gender = gender;
        }
        if let Some(birth_date) = update.birth_date {
            resident.birth_date = birth_date;
        }
        if let Some(address) = update.address {
            resident.address = address;
        }
        if let Some(contact_number) = update.contact_number {
            resident.contact_number = contact_number;
        }
        if let Some(family_head_id) = update.family_head_id {
            resident.family_head_id = family_head_id;
        }

        let mut batch = Batch::new()
            .hash_set_multi(Resident::storage_key(&resident.id), resident.to_fields());
        if resident.family_head_id != previous_family {
            if !previous_family.is_empty() {
                batch = batch.set_remove(
                    keys::family_members_key(&previous_family),
                    resident.id.clone(),
                );
            }
            if !resident.family_head_id.is_empty() {
                batch = batch.set_add(
                    keys::family_members_key(&resident.family_head_id),
                    resident.id.clone(),
                );
            }
        }
        self.backend().apply(batch).await?;
        Ok(resident)
    }

    /// Delete a resident and its membership entry in one atomic batch.
    pub async fn delete_resident(&self, id: &str) -> BarangayResult<()> {
        let resident: Resident = codec::load_entity(self.backend(), id, ReadPolicy::Heal)
            .await?
            .ok_or_else(|| Self::not_found(EntityType::Resident, id))?;

        let mut batch = Batch::new().delete(Resident::storage_key(id));
        if !resident.family_head_id.is_empty() {
            batch = batch.set_remove(
                keys::family_members_key(&resident.family_head_id),
                id.to_string(),
            );
        }
        self.backend().apply(batch).await?;
        tracing::debug!(%id, "resident deleted");
        Ok(())
    }

    // ========================================================================
    // ANNOUNCEMENTS / EVENTS
    // ========================================================================

    pub async fn create_announcement(&self, new: NewAnnouncement) -> BarangayResult<Announcement> {
        let announcement = Announcement {
            id: Uuid::now_v7().to_string(),
            title: new.title,
            content: new.content,
            date: Self::now_stamp(),
            posted_by: new.posted_by,
        };
        codec::save_entity(self.backend(), &announcement).await?;
        Ok(announcement)
    }

    pub async fn get_announcement(&self, id: &str) -> BarangayResult<Option<Announcement>> {
        codec::load_entity(self.backend(), id, self.read_policy).await
    }

    /// All announcements, newest posting first.
    pub async fn list_announcements(&self) -> BarangayResult<Vec<Announcement>> {
        let mut items = scanner::list_all(self.backend(), self.read_policy).await?;
        scanner::sort_announcements(&mut items);
        Ok(items)
    }

    pub async fn delete_announcement(&self, id: &str) -> BarangayResult<()> {
        codec::remove_entity::<Announcement>(self.backend(), id).await
    }

    pub async fn create_event(&self, new: NewEvent) -> BarangayResult<Event> {
        let event = Event {
            id: Uuid::now_v7().to_string(),
            title: new.title,
            description: new.description,
            event_date: new.event_date,
            location: new.location,
        };
        codec::save_entity(self.backend(), &event).await?;
        Ok(event)
    }

    pub async fn get_event(&self, id: &str) -> BarangayResult<Option<Event>> {
        codec::load_entity(self.backend(), id, self.read_policy).await
    }

    /// All events, soonest first.
    pub async fn list_events(&self) -> BarangayResult<Vec<Event>> {
        let mut items = scanner::list_all(self.backend(), self.read_policy).await?;
        scanner::sort_events(&mut items);
        Ok(items)
    }

    pub async fn delete_event(&self, id: &str) -> BarangayResult<()> {
        codec::remove_entity::<Event>(self.backend(), id).await
    }

    // ========================================================================
    // DOCUMENT REQUESTS
    // ========================================================================

    pub async fn create_document_request(
        &self,
        new: NewDocumentRequest,
    ) -> BarangayResult<DocumentRequest> {
        let display_id = idgen::generate_display_id(self.backend()).await?;
        let request = DocumentRequest {
            id: Uuid::now_v7().to_string(),
            display_id,
            resident_name: new.resident_name,
            document_type: new.document_type,
            purpose: new.purpose,
            status: DocumentStatus::Pending,
            request_date: Self::now_stamp(),
        };
        codec::save_entity(self.backend(), &request).await?;
        tracing::debug!(id = %request.id, display = %request.display_id, "document request created");
        Ok(request)
    }

    pub async fn get_document_request(&self, id: &str) -> BarangayResult<Option<DocumentRequest>> {
        codec::load_entity(self.backend(), id, self.read_policy).await
    }

    /// All document requests, newest first.
    pub async fn list_document_requests(&self) -> BarangayResult<Vec<DocumentRequest>> {
        let mut items = scanner::list_all(self.backend(), self.read_policy).await?;
        scanner::sort_document_requests(&mut items);
        Ok(items)
    }

    pub async fn update_document_request_status(
        &self,
        id: &str,
        status: DocumentStatus,
    ) -> BarangayResult<DocumentRequest> {
        let mut request: DocumentRequest =
            codec::load_entity(self.backend(), id, ReadPolicy::Heal)
                .await?
                .ok_or_else(|| Self::not_found(EntityType::DocumentRequest, id))?;
        request.status = status;
        codec::save_entity(self.backend(), &request).await?;
        Ok(request)
    }

    // ========================================================================
    // USERS
    // ========================================================================

    pub async fn save_user(&self, user: &User) -> BarangayResult<()> {
        codec::save_entity(self.backend(), user).await
    }

    pub async fn get_user(&self, username: &str) -> BarangayResult<Option<User>> {
        codec::load_entity(self.backend(), username, self.read_policy).await
    }

    pub async fn delete_user(&self, username: &str) -> BarangayResult<()> {
        codec::remove_entity::<User>(self.backend(), username).await
    }

    // ========================================================================
    // COUNTERS / HEALTH
    // ========================================================================

    /// Lifetime resident registrations. Counter-based: deletes never
    /// decrement it, so this is not the live population size.
    pub async fn resident_count(&self) -> BarangayResult<i64> {
        self.backend().counter_get(keys::RESIDENTS_COUNT).await
    }

    /// Lifetime family head registrations. Counter-based, like
    /// [`Self::resident_count`].
    pub async fn family_head_count(&self) -> BarangayResult<i64> {
        self.backend().counter_get(keys::FAMILY_HEADS_COUNT).await
    }

    pub async fn ping(&self) -> BarangayResult<()> {
        self.backend().ping().await
    }
}
