use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::ServiceResult;
use crate::context::{Platform, RequestContext};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    #[default]
    Internal,
    Organization,
    External,
    Patient,
    System,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum EntityStatus {
    #[default]
    Active,
    Deleted,
    Suspended,
}

/// Related records a lookup should expand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityInformation {
    Memberships,
    Members,
    Contacts,
    ExternalIds,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactType {
    #[default]
    Phone,
    Email,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: String,
    pub contact_type: ContactType,
    pub value: String,
    pub provisioned: bool,
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityInfo {
    pub display_name: String,
    pub first_name: String,
    pub last_name: String,
    pub short_title: String,
    pub long_title: String,
    pub note: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
    pub entity_type: EntityType,
    pub status: EntityStatus,
    pub info: EntityInfo,
    #[serde(default)]
    pub contacts: Vec<Contact>,
    #[serde(default)]
    pub memberships: Vec<Entity>,
    #[serde(default)]
    pub members: Vec<Entity>,
    /// Owning auth account, empty for organizations and unclaimed entities
    #[serde(default)]
    pub account_id: String,
}

impl Entity {
    pub fn is_organization(&self) -> bool {
        self.entity_type == EntityType::Organization
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum LookupKey {
    EntityId(String),
    ExternalId(String),
    AccountId(String),
    BatchEntityIds(Vec<String>),
}

impl Default for LookupKey {
    fn default() -> Self {
        LookupKey::EntityId(String::new())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestedInformation {
    pub depth: i64,
    pub entity_information: Vec<EntityInformation>,
}

impl RequestedInformation {
    pub fn memberships() -> Self {
        Self {
            depth: 0,
            entity_information: vec![EntityInformation::Memberships],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupEntitiesRequest {
    pub key: LookupKey,
    pub requested_information: Option<RequestedInformation>,
    #[serde(default)]
    pub statuses: Vec<EntityStatus>,
    #[serde(default)]
    pub root_types: Vec<EntityType>,
    #[serde(default)]
    pub child_types: Vec<EntityType>,
    pub member_of_entity: Option<String>,
}

impl LookupEntitiesRequest {
    pub fn by_entity_id(id: impl Into<String>) -> Self {
        Self {
            key: LookupKey::EntityId(id.into()),
            ..Default::default()
        }
    }

    pub fn by_external_id(id: impl Into<String>) -> Self {
        Self {
            key: LookupKey::ExternalId(id.into()),
            ..Default::default()
        }
    }

    pub fn by_account_id(id: impl Into<String>) -> Self {
        Self {
            key: LookupKey::AccountId(id.into()),
            ..Default::default()
        }
    }

    pub fn with_information(mut self, info: RequestedInformation) -> Self {
        self.requested_information = Some(info);
        self
    }

    pub fn with_statuses(mut self, statuses: Vec<EntityStatus>) -> Self {
        self.statuses = statuses;
        self
    }

    pub fn with_child_types(mut self, child_types: Vec<EntityType>) -> Self {
        self.child_types = child_types;
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LookupEntitiesResponse {
    pub entities: Vec<Entity>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LookupEntitiesByContactRequest {
    pub contact_value: String,
    pub requested_information: Option<RequestedInformation>,
    #[serde(default)]
    pub statuses: Vec<EntityStatus>,
    #[serde(default)]
    pub root_types: Vec<EntityType>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LookupEntitiesByContactResponse {
    pub entities: Vec<Entity>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LookupEntityDomainRequest {
    pub entity_id: String,
    pub domain: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LookupEntityDomainResponse {
    pub entity_id: String,
    pub domain: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateContactRequest {
    pub entity_id: String,
    pub contact: Contact,
    pub requested_information: Option<RequestedInformation>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateContactsRequest {
    pub entity_id: String,
    pub contacts: Vec<Contact>,
    pub requested_information: Option<RequestedInformation>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateContactsRequest {
    pub entity_id: String,
    pub contacts: Vec<Contact>,
    pub requested_information: Option<RequestedInformation>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteContactsRequest {
    pub entity_id: String,
    pub entity_contact_ids: Vec<String>,
    pub requested_information: Option<RequestedInformation>,
}

/// Response shared by every call that returns the mutated entity
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityResponse {
    pub entity: Option<Entity>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateEntityRequest {
    pub entity_info: EntityInfo,
    pub entity_type: EntityType,
    pub external_id: String,
    pub initial_membership_entity_id: String,
    #[serde(default)]
    pub contacts: Vec<Contact>,
    pub requested_information: Option<RequestedInformation>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateEntityRequest {
    pub entity_id: String,
    pub entity_info: Option<EntityInfo>,
    pub contacts: Option<Vec<Contact>>,
    pub requested_information: Option<RequestedInformation>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateEntityDomainRequest {
    pub entity_id: String,
    pub domain: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateEntityDomainResponse {}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SerializedEntityContactRequest {
    pub entity_id: String,
    pub platform: Platform,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SerializedClientEntityContact {
    pub entity_id: String,
    pub platform: Platform,
    pub serialized_entity_contact: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SerializedEntityContactResponse {
    pub serialized_entity_contact: Option<SerializedClientEntityContact>,
}

#[async_trait]
pub trait DirectoryClient: Send + Sync {
    async fn lookup_entities(
        &self,
        ctx: &RequestContext,
        req: LookupEntitiesRequest,
    ) -> ServiceResult<LookupEntitiesResponse>;

    async fn lookup_entities_by_contact(
        &self,
        ctx: &RequestContext,
        req: LookupEntitiesByContactRequest,
    ) -> ServiceResult<LookupEntitiesByContactResponse>;

    async fn lookup_entity_domain(
        &self,
        ctx: &RequestContext,
        req: LookupEntityDomainRequest,
    ) -> ServiceResult<LookupEntityDomainResponse>;

    async fn create_contact(
        &self,
        ctx: &RequestContext,
        req: CreateContactRequest,
    ) -> ServiceResult<EntityResponse>;

    async fn create_contacts(
        &self,
        ctx: &RequestContext,
        req: CreateContactsRequest,
    ) -> ServiceResult<EntityResponse>;

    async fn update_contacts(
        &self,
        ctx: &RequestContext,
        req: UpdateContactsRequest,
    ) -> ServiceResult<EntityResponse>;

    async fn delete_contacts(
        &self,
        ctx: &RequestContext,
        req: DeleteContactsRequest,
    ) -> ServiceResult<EntityResponse>;

    async fn create_entity(
        &self,
        ctx: &RequestContext,
        req: CreateEntityRequest,
    ) -> ServiceResult<EntityResponse>;

    async fn update_entity(
        &self,
        ctx: &RequestContext,
        req: UpdateEntityRequest,
    ) -> ServiceResult<EntityResponse>;

    async fn create_entity_domain(
        &self,
        ctx: &RequestContext,
        req: CreateEntityDomainRequest,
    ) -> ServiceResult<CreateEntityDomainResponse>;

    async fn serialized_entity_contact(
        &self,
        ctx: &RequestContext,
        req: SerializedEntityContactRequest,
    ) -> ServiceResult<SerializedEntityContactResponse>;
}
