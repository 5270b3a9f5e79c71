//! Entity codec: typed records <-> stored field maps.
//!
//! Each entity type declares its storage shape statically through
//! [`KvEntity`]: field names keep the camelCase spellings already present in
//! production backends. Writes always emit the full required field set in one
//! atomic hash write; reads run under a [`ReadPolicy`] chosen by the caller.

use crate::backend::KvBackend;
use barangay_core::{
    keys, Announcement, BarangayResult, CodecError, DocumentRequest, DocumentStatus, EntityType,
    Event, FamilyHead, FieldMap, Resident, User,
};

/// How to treat stored records that do not match their declared shape.
///
/// The previous system silently defaulted missing fields to empty strings on
/// every read, which hid data-entry corruption from operators. `Strict` is
/// the default here; `Heal` reproduces the legacy behavior for scans over
/// data written before validation existed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadPolicy {
    /// A missing required field is an error the caller must handle.
    #[default]
    Strict,
    /// Missing required fields decode as empty strings (legacy behavior).
    Heal,
}

/// A typed record storable as one hash under `"{prefix}:{id}"`.
pub trait KvEntity: Clone + Send + Sync + Sized + 'static {
    const ENTITY_TYPE: EntityType;

    /// Identity within the type: minted ID, random token, or username.
    fn id(&self) -> &str;

    /// Full storage field map. Every required field must be present.
    fn to_fields(&self) -> FieldMap;

    /// Decode a stored field map. `id` is the identity taken from the
    /// storage key, used to heal records whose `id` field was never written.
    fn from_fields(id: &str, fields: &FieldMap, policy: ReadPolicy) -> Result<Self, CodecError>;

    fn storage_key(id: &str) -> String {
        keys::storage_key(Self::ENTITY_TYPE, id)
    }

    fn scan_prefix() -> String {
        keys::scan_prefix(Self::ENTITY_TYPE)
    }
}

/// Write an entity's full field map in one atomic hash write.
pub async fn save_entity<T: KvEntity>(backend: &dyn KvBackend, entity: &T) -> BarangayResult<()> {
    backend
        .hash_set_multi(&T::storage_key(entity.id()), &entity.to_fields())
        .await
}

/// Load one entity. A zero-field hash means the entity does not exist and
/// reads as `None`; a malformed hash is a codec error under `Strict`.
pub async fn load_entity<T: KvEntity>(
    backend: &dyn KvBackend,
    id: &str,
    policy: ReadPolicy,
) -> BarangayResult<Option<T>> {
    let fields = backend.hash_get_all(&T::storage_key(id)).await?;
    if fields.is_empty() {
        return Ok(None);
    }
    Ok(Some(T::from_fields(id, &fields, policy)?))
}

/// Remove an entity's hash entirely.
pub async fn remove_entity<T: KvEntity>(backend: &dyn KvBackend, id: &str) -> BarangayResult<()> {
    backend.delete(&T::storage_key(id)).await
}

// ============================================================================
// FIELD READER
// ============================================================================

struct FieldReader<'a> {
    entity_type: EntityType,
    id: &'a str,
    fields: &'a FieldMap,
    policy: ReadPolicy,
}

impl<'a> FieldReader<'a> {
    fn new(entity_type: EntityType, id: &'a str, fields: &'a FieldMap, policy: ReadPolicy) -> Self {
        Self {
            entity_type,
            id,
            fields,
            policy,
        }
    }

    /// Reject records stored under this key but typed as something else.
    /// Strict only: under `Heal` the key prefix wins, so one corrupted
    /// `type` field cannot abort a whole legacy-data scan. Records from
    /// before the `type` field existed pass untyped under either policy.
    fn check_type(&self) -> Result<(), CodecError> {
        if let Some(found) = self.fields.get("type") {
            if !found.is_empty() && found != self.entity_type.key_prefix() {
                match self.policy {
                    ReadPolicy::Heal => {
                        tracing::debug!(
                            id = %self.id,
                            expected = %self.entity_type.key_prefix(),
                            %found,
                            "healing record with mismatched type field"
                        );
                    }
                    ReadPolicy::Strict => {
                        return Err(CodecError::TypeMismatch {
                            entity_type: self.entity_type,
                            id: self.id.to_string(),
                            found: found.clone(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    fn required(&self, name: &str) -> Result<String, CodecError> {
        match self.fields.get(name) {
            Some(value) => Ok(value.clone()),
            None => match self.policy {
                ReadPolicy::Heal => Ok(String::new()),
                ReadPolicy::Strict => Err(CodecError::MissingField {
                    entity_type: self.entity_type,
                    id: self.id.to_string(),
                    field: name.to_string(),
                }),
            },
        }
    }

    /// The identity field, healed from the storage key when blank.
    fn identity(&self, name: &str) -> Result<String, CodecError> {
        match self.fields.get(name) {
            Some(value) if !value.is_empty() => Ok(value.clone()),
            _ => match self.policy {
                ReadPolicy::Heal => Ok(self.id.to_string()),
                ReadPolicy::Strict => Err(CodecError::MissingField {
                    entity_type: self.entity_type,
                    id: self.id.to_string(),
                    field: name.to_string(),
                }),
            },
        }
    }
}

// ============================================================================
// ENTITY IMPLEMENTATIONS
// ============================================================================

impl KvEntity for Resident {
    const ENTITY_TYPE: EntityType = EntityType::Resident;

    fn id(&self) -> &str {
        &self.id
    }

    fn to_fields(&self) -> FieldMap {
        barangay_core::fields::field_map([
            ("id", self.id.as_str()),
            ("firstName", self.first_name.as_str()),
            ("lastName", self.last_name.as_str()),
            ("gender", self.gender.as_str()),
            ("birthDate", self.birth_date.as_str()),
            ("address", self.address.as_str()),
            ("contactNumber", self.contact_number.as_str()),
            ("familyHeadId", self.family_head_id.as_str()),
            ("registrationDate", self.registration_date.as_str()),
            ("type", Self::ENTITY_TYPE.key_prefix()),
        ])
    }

    fn from_fields(id: &str, fields: &FieldMap, policy: ReadPolicy) -> Result<Self, CodecError> {
        let r = FieldReader::new(Self::ENTITY_TYPE, id, fields, policy);
        r.check_type()?;
        Ok(Resident {
            id: r.identity("id")?,
            first_name: r.required("firstName")?,
            last_name: r.required("lastName")?,
            gender: r.required("gender")?,
            birth_date: r.required("birthDate")?,
            address: r.required("address")?,
            contact_number: r.required("contactNumber")?,
            family_head_id: r.required("familyHeadId")?,
            registration_date: r.required("registrationDate")?,
        })
    }
}

impl KvEntity for FamilyHead {
    const ENTITY_TYPE: EntityType = EntityType::FamilyHead;

    fn id(&self) -> &str {
        &self.id
    }

    fn to_fields(&self) -> FieldMap {
        barangay_core::fields::field_map([
            ("id", self.id.as_str()),
            ("firstName", self.first_name.as_str()),
            ("lastName", self.last_name.as_str()),
            ("gender", self.gender.as_str()),
            ("birthDate", self.birth_date.as_str()),
            ("address", self.address.as_str()),
            ("contactNumber", self.contact_number.as_str()),
            ("registrationDate", self.registration_date.as_str()),
            ("type", Self::ENTITY_TYPE.key_prefix()),
        ])
    }

    fn from_fields(id: &str, fields: &FieldMap, policy: ReadPolicy) -> Result<Self, CodecError> {
        let r = FieldReader::new(Self::ENTITY_TYPE, id, fields, policy);
        r.check_type()?;
        Ok(FamilyHead {
            id: r.identity("id")?,
            first_name: r.required("firstName")?,
            last_name: r.required("lastName")?,
            gender: r.required("gender")?,
            birth_date: r.required("birthDate")?,
            address: r.required("address")?,
            contact_number: r.required("contactNumber")?,
            registration_date: r.required("registrationDate")?,
        })
    }
}

impl KvEntity for Announcement {
    const ENTITY_TYPE: EntityType = EntityType::Announcement;

    fn id(&self) -> &str {
        &self.id
    }

    fn to_fields(&self) -> FieldMap {
        barangay_core::fields::field_map([
            ("id", self.id.as_str()),
            ("title", self.title.as_str()),
            ("content", self.content.as_str()),
            ("date", self.date.as_str()),
            ("postedBy", self.posted_by.as_str()),
            ("type", Self::ENTITY_TYPE.key_prefix()),
        ])
    }

    fn from_fields(id: &str, fields: &FieldMap, policy: ReadPolicy) -> Result<Self, CodecError> {
        let r = FieldReader::new(Self::ENTITY_TYPE, id, fields, policy);
        r.check_type()?;
        Ok(Announcement {
            id: r.identity("id")?,
            title: r.required("title")?,
            content: r.required("content")?,
            date: r.required("date")?,
            posted_by: r.required("postedBy")?,
        })
    }
}

impl KvEntity for Event {
    const ENTITY_TYPE: EntityType = EntityType::Event;

    fn id(&self) -> &str {
        &self.id
    }

    fn to_fields(&self) -> FieldMap {
        barangay_core::fields::field_map([
            ("id", self.id.as_str()),
            ("title", self.title.as_str()),
            ("description", self.description.as_str()),
            ("eventDate", self.event_date.as_str()),
            ("location", self.location.as_str()),
            ("type", Self::ENTITY_TYPE.key_prefix()),
        ])
    }

    fn from_fields(id: &str, fields: &FieldMap, policy: ReadPolicy) -> Result<Self, CodecError> {
        let r = FieldReader::new(Self::ENTITY_TYPE, id, fields, policy);
        r.check_type()?;
        Ok(Event {
            id: r.identity("id")?,
            title: r.required("title")?,
            description: r.required("description")?,
            event_date: r.required("eventDate")?,
            location: r.required("location")?,
        })
    }
}

impl KvEntity for DocumentRequest {
    const ENTITY_TYPE: EntityType = EntityType::DocumentRequest;

    fn id(&self) -> &str {
        &self.id
    }

    fn to_fields(&self) -> FieldMap {
        barangay_core::fields::field_map([
            ("id", self.id.as_str()),
            ("displayId", self.display_id.as_str()),
            ("residentName", self.resident_name.as_str()),
            ("documentType", self.document_type.as_str()),
            ("purpose", self.purpose.as_str()),
            ("status", self.status.as_str()),
            ("requestDate", self.request_date.as_str()),
            ("type", Self::ENTITY_TYPE.key_prefix()),
        ])
    }

    fn from_fields(id: &str, fields: &FieldMap, policy: ReadPolicy) -> Result<Self, CodecError> {
        let r = FieldReader::new(Self::ENTITY_TYPE, id, fields, policy);
        r.check_type()?;
        let raw_status = r.required("status")?;
        let status = match DocumentStatus::parse(&raw_status) {
            Some(status) => status,
            None => match policy {
                ReadPolicy::Heal => DocumentStatus::Pending,
                ReadPolicy::Strict => {
                    return Err(CodecError::InvalidValue {
                        entity_type: Self::ENTITY_TYPE,
                        id: id.to_string(),
                        field: "status".to_string(),
                        value: raw_status,
                    })
                }
            },
        };
        Ok(DocumentRequest {
            id: r.identity("id")?,
            display_id: r.required("displayId")?,
            resident_name: r.required("residentName")?,
            document_type: r.required("documentType")?,
            purpose: r.required("purpose")?,
            status,
            request_date: r.required("requestDate")?,
        })
    }
}

impl KvEntity for User {
    const ENTITY_TYPE: EntityType = EntityType::User;

    fn id(&self) -> &str {
        &self.username
    }

    fn to_fields(&self) -> FieldMap {
        barangay_core::fields::field_map([
            ("username", self.username.as_str()),
            ("password", self.password.as_str()),
            ("role", self.role.as_str()),
            ("type", Self::ENTITY_TYPE.key_prefix()),
        ])
    }

    fn from_fields(id: &str, fields: &FieldMap, policy: ReadPolicy) -> Result<Self, CodecError> {
        let r = FieldReader::new(Self::ENTITY_TYPE, id, fields, policy);
        r.check_type()?;
        Ok(User {
            username: r.identity("username")?,
            password: r.required("password")?,
            role: r.required("role")?,
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================
