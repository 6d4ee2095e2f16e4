#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use care_gateway::config::{self, AppConfig};
use care_gateway::context::RequestContext;
use care_gateway::dispatch::{DispatchMode, Dispatcher};
use care_gateway::handlers::AppState;
use care_gateway::ral::ResourceAccessor;
use care_gateway::services::auth::{Account, AccountRole, AccountType};
use care_gateway::services::care::{CarePlan, Visit};
use care_gateway::services::directory::{Entity, EntityStatus, EntityType};
use care_gateway::services::media::MediaInfo;
use care_gateway::services::payments::PaymentMethod;
use care_gateway::services::threading::{SavedMessage, ScheduledMessage, Thread, ThreadItem};
use care_gateway::services::{Clients, ServiceError, ServiceResult};

/// Records held by the in-memory backend
#[derive(Default)]
pub struct FakeState {
    pub entities: HashMap<String, Vec<Entity>>,
    pub external_ids: HashMap<String, Vec<Entity>>,
    pub accounts: HashMap<String, Account>,
    pub tokens: HashMap<String, Account>,
    pub threads: HashMap<String, Thread>,
    pub thread_items: HashMap<String, ThreadItem>,
    pub saved_messages: HashMap<String, SavedMessage>,
    pub scheduled_messages: HashMap<String, ScheduledMessage>,
    pub visits: HashMap<String, Visit>,
    pub care_plans: HashMap<String, CarePlan>,
    pub media: HashMap<String, MediaInfo>,
    pub payment_methods: HashMap<String, PaymentMethod>,
}

/// One object standing in for every downstream service. Each call is
/// counted by operation name.
#[derive(Default)]
pub struct FakeBackend {
    state: Mutex<FakeState>,
    calls: Mutex<BTreeMap<&'static str, usize>>,
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, op: &'static str) {
        let mut calls = self.calls.lock().unwrap_or_else(PoisonError::into_inner);
        *calls.entry(op).or_default() += 1;
    }

    pub fn calls(&self, op: &str) -> usize {
        let calls = self.calls.lock().unwrap_or_else(PoisonError::into_inner);
        calls.get(op).copied().unwrap_or_default()
    }

    pub fn total_calls(&self) -> usize {
        let calls = self.calls.lock().unwrap_or_else(PoisonError::into_inner);
        calls.values().sum()
    }

    pub fn reset_calls(&self) {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }

    /// Register an account whose single directory entity belongs to `orgs`
    pub fn add_account(&self, account: &Account, entity_id: &str, orgs: &[&str]) {
        let entity = member(entity_id, orgs);
        let mut state = self.state();
        state.accounts.insert(account.id.clone(), account.clone());
        state.external_ids.insert(account.id.clone(), vec![entity.clone()]);
        state.entities.insert(entity_id.to_string(), vec![entity]);
    }

    pub fn add_token(&self, token: &str, account: &Account) {
        self.state().tokens.insert(token.to_string(), account.clone());
    }

    pub fn add_entity(&self, entity: Entity) {
        self.state().entities.insert(entity.id.clone(), vec![entity]);
    }

    /// Make an entity id resolve to several directory records
    pub fn add_duplicate_entity(&self, entity_id: &str, orgs: &[&str]) {
        let entity = member(entity_id, orgs);
        self.state()
            .entities
            .insert(entity_id.to_string(), vec![entity.clone(), entity]);
    }

    pub fn add_thread(&self, thread_id: &str, org_id: &str) {
        self.state().threads.insert(
            thread_id.to_string(),
            Thread {
                id: thread_id.to_string(),
                organization_id: org_id.to_string(),
                title: format!("Thread {}", thread_id),
                ..Default::default()
            },
        );
    }

    /// Change the status of an entity wherever the directory holds it
    pub fn set_entity_status(&self, entity_id: &str, status: EntityStatus) {
        let mut state = self.state();
        let FakeState {
            entities,
            external_ids,
            ..
        } = &mut *state;
        for entity in entities.values_mut().chain(external_ids.values_mut()).flatten() {
            if entity.id == entity_id {
                entity.status = status;
            }
        }
    }

    pub fn set_thread_primary_entity(&self, thread_id: &str, entity_id: &str) {
        if let Some(thread) = self.state().threads.get_mut(thread_id) {
            thread.primary_entity_id = entity_id.to_string();
        }
    }

    pub fn add_thread_item(&self, item_id: &str, thread_id: &str) {
        let mut state = self.state();
        let organization_id = state
            .threads
            .get(thread_id)
            .map(|thread| thread.organization_id.clone())
            .unwrap_or_default();
        state.thread_items.insert(
            item_id.to_string(),
            ThreadItem {
                id: item_id.to_string(),
                thread_id: thread_id.to_string(),
                organization_id,
                ..Default::default()
            },
        );
    }

    pub fn add_saved_message(&self, id: &str, org_id: &str) {
        self.state().saved_messages.insert(
            id.to_string(),
            SavedMessage {
                id: id.to_string(),
                title: "Follow up".to_string(),
                organization_id: org_id.to_string(),
                ..Default::default()
            },
        );
    }

    pub fn add_scheduled_message(&self, id: &str, thread_id: &str) {
        self.state().scheduled_messages.insert(
            id.to_string(),
            ScheduledMessage {
                id: id.to_string(),
                thread_id: thread_id.to_string(),
                ..Default::default()
            },
        );
    }

    /// A care plan, submitted when `parent_id` is not empty
    pub fn add_care_plan(&self, id: &str, creator_id: &str, parent_id: &str) {
        self.state().care_plans.insert(
            id.to_string(),
            CarePlan {
                id: id.to_string(),
                name: "Acne treatment".to_string(),
                creator_id: creator_id.to_string(),
                parent_id: parent_id.to_string(),
                submitted: !parent_id.is_empty(),
                ..Default::default()
            },
        );
    }

    pub fn add_visit(&self, visit_id: &str, entity_id: &str, org_id: &str) {
        self.state().visits.insert(
            visit_id.to_string(),
            Visit {
                id: visit_id.to_string(),
                name: "Acne".to_string(),
                entity_id: entity_id.to_string(),
                organization_id: org_id.to_string(),
                ..Default::default()
            },
        );
    }

    pub fn add_media(&self, info: MediaInfo) {
        self.state().media.insert(info.id.clone(), info);
    }

    pub fn add_payment_method(&self, id: &str, customer_entity_id: &str) {
        self.state().payment_methods.insert(
            id.to_string(),
            PaymentMethod {
                id: id.to_string(),
                customer_entity_id: customer_entity_id.to_string(),
                brand: "visa".to_string(),
                last_four: "4242".to_string(),
                ..Default::default()
            },
        );
    }
}

pub fn org(id: &str) -> Entity {
    Entity {
        id: id.to_string(),
        entity_type: EntityType::Organization,
        ..Default::default()
    }
}

pub fn member(id: &str, orgs: &[&str]) -> Entity {
    Entity {
        id: id.to_string(),
        entity_type: EntityType::Internal,
        memberships: orgs.iter().map(|o| org(o)).collect(),
        ..Default::default()
    }
}

pub fn provider(id: &str) -> Account {
    Account {
        id: id.to_string(),
        account_type: AccountType::Provider,
        role: AccountRole::Doctor,
        claims: BTreeMap::new(),
    }
}

pub fn patient(id: &str) -> Account {
    Account {
        id: id.to_string(),
        account_type: AccountType::Patient,
        role: AccountRole::Patient,
        claims: BTreeMap::new(),
    }
}

pub fn clients(fake: &Arc<FakeBackend>) -> Clients {
    Clients {
        auth: fake.clone(),
        directory: fake.clone(),
        threading: fake.clone(),
        excomms: fake.clone(),
        layout: fake.clone(),
        care: fake.clone(),
        media: fake.clone(),
        payments: fake.clone(),
        patientsync: fake.clone(),
    }
}

pub fn accessor(fake: &Arc<FakeBackend>) -> ResourceAccessor {
    ResourceAccessor::new(clients(fake))
}

pub fn context_for(account: &Account) -> RequestContext {
    RequestContext::new("req-test").with_account(Some(account.clone()))
}

pub fn test_config() -> AppConfig {
    let mut config = config::config().clone();
    config.web.domain = "https://web.test".to_string();
    config.features.video_calling_org_ids = Vec::new();
    config
}

/// Router state over the fake backend. Async subscribers run inline so
/// their effects are visible once a request completes.
pub fn app_state(fake: &Arc<FakeBackend>) -> AppState {
    AppState {
        ral: accessor(fake),
        dispatcher: Arc::new(Dispatcher::new(DispatchMode::Inline)),
        config: Arc::new(test_config()),
    }
}

fn unsupported<T>(op: &str) -> ServiceResult<T> {
    Err(ServiceError::Unavailable(format!("{} is not faked", op)))
}

fn not_found<T>(what: &str) -> ServiceResult<T> {
    Err(ServiceError::NotFound(what.to_string()))
}

mod auth_fake {
    use super::*;
    use async_trait::async_trait;
    use care_gateway::services::auth::*;
    use care_gateway::services::AuthClient;

    #[async_trait]
    impl AuthClient for FakeBackend {
        async fn authenticate_login(
            &self,
            _ctx: &RequestContext,
            _req: AuthenticateLoginRequest,
        ) -> ServiceResult<AuthenticateLoginResponse> {
            self.record("authenticate_login");
            unsupported("authenticate_login")
        }

        async fn authenticate_login_with_code(
            &self,
            _ctx: &RequestContext,
            _req: AuthenticateLoginWithCodeRequest,
        ) -> ServiceResult<AuthenticateLoginWithCodeResponse> {
            self.record("authenticate_login_with_code");
            unsupported("authenticate_login_with_code")
        }

        async fn check_authentication(
            &self,
            _ctx: &RequestContext,
            req: CheckAuthenticationRequest,
        ) -> ServiceResult<CheckAuthenticationResponse> {
            self.record("check_authentication");
            match self.state().tokens.get(&req.token) {
                Some(account) => Ok(CheckAuthenticationResponse {
                    is_authenticated: true,
                    account: Some(account.clone()),
                    token: None,
                }),
                None => not_found("token"),
            }
        }

        async fn check_password_reset_token(
            &self,
            _ctx: &RequestContext,
            _req: CheckPasswordResetTokenRequest,
        ) -> ServiceResult<CheckPasswordResetTokenResponse> {
            self.record("check_password_reset_token");
            unsupported("check_password_reset_token")
        }

        async fn check_verification_code(
            &self,
            _ctx: &RequestContext,
            _req: CheckVerificationCodeRequest,
        ) -> ServiceResult<CheckVerificationCodeResponse> {
            self.record("check_verification_code");
            unsupported("check_verification_code")
        }

        async fn create_account(
            &self,
            _ctx: &RequestContext,
            _req: CreateAccountRequest,
        ) -> ServiceResult<CreateAccountResponse> {
            self.record("create_account");
            unsupported("create_account")
        }

        async fn create_password_reset_token(
            &self,
            _ctx: &RequestContext,
            _req: CreatePasswordResetTokenRequest,
        ) -> ServiceResult<CreatePasswordResetTokenResponse> {
            self.record("create_password_reset_token");
            unsupported("create_password_reset_token")
        }

        async fn create_verification_code(
            &self,
            _ctx: &RequestContext,
            _req: CreateVerificationCodeRequest,
        ) -> ServiceResult<CreateVerificationCodeResponse> {
            self.record("create_verification_code");
            unsupported("create_verification_code")
        }

        async fn get_account(
            &self,
            _ctx: &RequestContext,
            req: GetAccountRequest,
        ) -> ServiceResult<GetAccountResponse> {
            self.record("get_account");
            Ok(GetAccountResponse {
                account: self.state().accounts.get(&req.account_id).cloned(),
            })
        }

        async fn unauthenticate(
            &self,
            _ctx: &RequestContext,
            _req: UnauthenticateRequest,
        ) -> ServiceResult<UnauthenticateResponse> {
            self.record("unauthenticate");
            unsupported("unauthenticate")
        }

        async fn update_password(
            &self,
            _ctx: &RequestContext,
            _req: UpdatePasswordRequest,
        ) -> ServiceResult<UpdatePasswordResponse> {
            self.record("update_password");
            unsupported("update_password")
        }

        async fn verified_value(
            &self,
            _ctx: &RequestContext,
            _req: VerifiedValueRequest,
        ) -> ServiceResult<VerifiedValueResponse> {
            self.record("verified_value");
            unsupported("verified_value")
        }
    }
}

mod directory_fake {
    use super::*;
    use async_trait::async_trait;
    use care_gateway::services::directory::*;
    use care_gateway::services::DirectoryClient;

    #[async_trait]
    impl DirectoryClient for FakeBackend {
        async fn lookup_entities(
            &self,
            _ctx: &RequestContext,
            req: LookupEntitiesRequest,
        ) -> ServiceResult<LookupEntitiesResponse> {
            self.record("lookup_entities");
            let state = self.state();
            let entities = match &req.key {
                LookupKey::EntityId(id) => state.entities.get(id).cloned().unwrap_or_default(),
                LookupKey::ExternalId(id) | LookupKey::AccountId(id) => {
                    state.external_ids.get(id).cloned().unwrap_or_default()
                }
                LookupKey::BatchEntityIds(ids) => ids
                    .iter()
                    .filter_map(|id| state.entities.get(id))
                    .flatten()
                    .cloned()
                    .collect(),
            };
            let entities = entities
                .into_iter()
                .filter(|entity| req.statuses.is_empty() || req.statuses.contains(&entity.status))
                .collect();
            Ok(LookupEntitiesResponse { entities })
        }

        async fn lookup_entities_by_contact(
            &self,
            _ctx: &RequestContext,
            _req: LookupEntitiesByContactRequest,
        ) -> ServiceResult<LookupEntitiesByContactResponse> {
            self.record("lookup_entities_by_contact");
            not_found("contact")
        }

        async fn lookup_entity_domain(
            &self,
            _ctx: &RequestContext,
            _req: LookupEntityDomainRequest,
        ) -> ServiceResult<LookupEntityDomainResponse> {
            self.record("lookup_entity_domain");
            unsupported("lookup_entity_domain")
        }

        async fn create_contact(
            &self,
            _ctx: &RequestContext,
            _req: CreateContactRequest,
        ) -> ServiceResult<EntityResponse> {
            self.record("create_contact");
            unsupported("create_contact")
        }

        async fn create_contacts(
            &self,
            _ctx: &RequestContext,
            _req: CreateContactsRequest,
        ) -> ServiceResult<EntityResponse> {
            self.record("create_contacts");
            unsupported("create_contacts")
        }

        async fn update_contacts(
            &self,
            _ctx: &RequestContext,
            _req: UpdateContactsRequest,
        ) -> ServiceResult<EntityResponse> {
            self.record("update_contacts");
            unsupported("update_contacts")
        }

        async fn delete_contacts(
            &self,
            _ctx: &RequestContext,
            _req: DeleteContactsRequest,
        ) -> ServiceResult<EntityResponse> {
            self.record("delete_contacts");
            unsupported("delete_contacts")
        }

        async fn create_entity(
            &self,
            _ctx: &RequestContext,
            _req: CreateEntityRequest,
        ) -> ServiceResult<EntityResponse> {
            self.record("create_entity");
            unsupported("create_entity")
        }

        async fn update_entity(
            &self,
            _ctx: &RequestContext,
            _req: UpdateEntityRequest,
        ) -> ServiceResult<EntityResponse> {
            self.record("update_entity");
            unsupported("update_entity")
        }

        async fn create_entity_domain(
            &self,
            _ctx: &RequestContext,
            _req: CreateEntityDomainRequest,
        ) -> ServiceResult<CreateEntityDomainResponse> {
            self.record("create_entity_domain");
            unsupported("create_entity_domain")
        }

        async fn serialized_entity_contact(
            &self,
            _ctx: &RequestContext,
            _req: SerializedEntityContactRequest,
        ) -> ServiceResult<SerializedEntityContactResponse> {
            self.record("serialized_entity_contact");
            unsupported("serialized_entity_contact")
        }
    }
}

mod threading_fake {
    use super::*;
    use async_trait::async_trait;
    use care_gateway::services::threading::*;
    use care_gateway::services::ThreadsClient;

    #[async_trait]
    impl ThreadsClient for FakeBackend {
        async fn create_empty_thread(
            &self,
            _ctx: &RequestContext,
            _req: CreateEmptyThreadRequest,
        ) -> ServiceResult<ThreadResponse> {
            self.record("create_empty_thread");
            unsupported("create_empty_thread")
        }

        async fn thread(
            &self,
            _ctx: &RequestContext,
            req: ThreadRequest,
        ) -> ServiceResult<ThreadResponse> {
            self.record("thread");
            match self.state().threads.get(&req.thread_id) {
                Some(thread) => Ok(ThreadResponse {
                    thread: Some(thread.clone()),
                }),
                None => not_found(&req.thread_id),
            }
        }

        async fn threads(
            &self,
            _ctx: &RequestContext,
            req: ThreadsRequest,
        ) -> ServiceResult<ThreadsResponse> {
            self.record("threads");
            let state = self.state();
            let threads = req
                .thread_ids
                .iter()
                .filter_map(|id| state.threads.get(id))
                .cloned()
                .collect();
            Ok(ThreadsResponse { threads })
        }

        async fn thread_item(
            &self,
            _ctx: &RequestContext,
            req: ThreadItemRequest,
        ) -> ServiceResult<ThreadItemResponse> {
            self.record("thread_item");
            match self.state().thread_items.get(&req.item_id) {
                Some(item) => Ok(ThreadItemResponse {
                    item: Some(item.clone()),
                }),
                None => not_found(&req.item_id),
            }
        }

        async fn thread_items(
            &self,
            _ctx: &RequestContext,
            _req: ThreadItemsRequest,
        ) -> ServiceResult<ThreadItemsResponse> {
            self.record("thread_items");
            unsupported("thread_items")
        }

        async fn thread_item_view_details(
            &self,
            _ctx: &RequestContext,
            _req: ThreadItemViewDetailsRequest,
        ) -> ServiceResult<ThreadItemViewDetailsResponse> {
            self.record("thread_item_view_details");
            unsupported("thread_item_view_details")
        }

        async fn threads_for_member(
            &self,
            _ctx: &RequestContext,
            req: ThreadsForMemberRequest,
        ) -> ServiceResult<ThreadsResponse> {
            self.record("threads_for_member");
            let threads = self
                .state()
                .threads
                .values()
                .filter(|thread| thread.primary_entity_id == req.entity_id)
                .cloned()
                .collect();
            Ok(ThreadsResponse { threads })
        }

        async fn query_threads(
            &self,
            _ctx: &RequestContext,
            _req: QueryThreadsRequest,
        ) -> ServiceResult<QueryThreadsResponse> {
            self.record("query_threads");
            unsupported("query_threads")
        }

        async fn mark_threads_as_read(
            &self,
            _ctx: &RequestContext,
            _req: MarkThreadsAsReadRequest,
        ) -> ServiceResult<MarkThreadsAsReadResponse> {
            self.record("mark_threads_as_read");
            Ok(MarkThreadsAsReadResponse {})
        }

        async fn post_message(
            &self,
            _ctx: &RequestContext,
            req: PostMessageRequest,
        ) -> ServiceResult<PostMessageResponse> {
            self.record("post_message");
            let thread = match self.state().threads.get(&req.thread_id) {
                Some(thread) => thread.clone(),
                None => return not_found(&req.thread_id),
            };
            Ok(PostMessageResponse {
                item: Some(ThreadItem {
                    id: format!("ti_{}", req.uuid),
                    thread_id: thread.id.clone(),
                    organization_id: thread.organization_id.clone(),
                    actor_entity_id: req.from_entity_id,
                    internal: req.message.internal,
                    ..Default::default()
                }),
                thread: Some(thread),
            })
        }

        async fn delete_thread(
            &self,
            _ctx: &RequestContext,
            _req: DeleteThreadRequest,
        ) -> ServiceResult<DeleteThreadResponse> {
            self.record("delete_thread");
            unsupported("delete_thread")
        }

        async fn create_saved_query(
            &self,
            _ctx: &RequestContext,
            _req: CreateSavedQueryRequest,
        ) -> ServiceResult<SavedQueryResponse> {
            self.record("create_saved_query");
            unsupported("create_saved_query")
        }

        async fn saved_query(
            &self,
            _ctx: &RequestContext,
            req: SavedQueryRequest,
        ) -> ServiceResult<SavedQueryResponse> {
            self.record("saved_query");
            not_found(&req.saved_query_id)
        }

        async fn saved_queries(
            &self,
            _ctx: &RequestContext,
            _req: SavedQueriesRequest,
        ) -> ServiceResult<SavedQueriesResponse> {
            self.record("saved_queries");
            unsupported("saved_queries")
        }

        async fn saved_query_templates(
            &self,
            _ctx: &RequestContext,
            _req: SavedQueriesRequest,
        ) -> ServiceResult<SavedQueriesResponse> {
            self.record("saved_query_templates");
            unsupported("saved_query_templates")
        }

        async fn update_saved_query(
            &self,
            _ctx: &RequestContext,
            _req: UpdateSavedQueryRequest,
        ) -> ServiceResult<SavedQueryResponse> {
            self.record("update_saved_query");
            unsupported("update_saved_query")
        }

        async fn tags(
            &self,
            _ctx: &RequestContext,
            _req: TagsRequest,
        ) -> ServiceResult<TagsResponse> {
            self.record("tags");
            unsupported("tags")
        }

        async fn create_saved_message(
            &self,
            _ctx: &RequestContext,
            _req: CreateSavedMessageRequest,
        ) -> ServiceResult<SavedMessageResponse> {
            self.record("create_saved_message");
            unsupported("create_saved_message")
        }

        async fn delete_saved_message(
            &self,
            _ctx: &RequestContext,
            _req: DeleteSavedMessageRequest,
        ) -> ServiceResult<DeleteSavedMessageResponse> {
            self.record("delete_saved_message");
            unsupported("delete_saved_message")
        }

        async fn saved_messages(
            &self,
            _ctx: &RequestContext,
            req: SavedMessagesRequest,
        ) -> ServiceResult<SavedMessagesResponse> {
            self.record("saved_messages");
            let state = self.state();
            let saved_messages = match &req.by {
                SavedMessagesBy::Ids(ids) => ids
                    .iter()
                    .filter_map(|id| state.saved_messages.get(id))
                    .cloned()
                    .collect(),
                SavedMessagesBy::EntityIds(_) => Vec::new(),
            };
            Ok(SavedMessagesResponse { saved_messages })
        }

        async fn update_saved_message(
            &self,
            _ctx: &RequestContext,
            _req: UpdateSavedMessageRequest,
        ) -> ServiceResult<SavedMessageResponse> {
            self.record("update_saved_message");
            unsupported("update_saved_message")
        }

        async fn create_scheduled_message(
            &self,
            _ctx: &RequestContext,
            req: CreateScheduledMessageRequest,
        ) -> ServiceResult<CreateScheduledMessageResponse> {
            self.record("create_scheduled_message");
            let scheduled = ScheduledMessage {
                id: format!("{}{}", SCHEDULED_MESSAGE_ID_PREFIX, req.thread_id),
                thread_id: req.thread_id,
                actor_entity_id: req.actor_entity_id,
                scheduled_for: req.scheduled_for,
                sent_at: None,
                status: ScheduledMessageStatus::Pending,
                content: req.content,
            };
            self.state()
                .scheduled_messages
                .insert(scheduled.id.clone(), scheduled.clone());
            Ok(CreateScheduledMessageResponse {
                scheduled_message: Some(scheduled),
            })
        }

        async fn delete_scheduled_message(
            &self,
            _ctx: &RequestContext,
            _req: DeleteScheduledMessageRequest,
        ) -> ServiceResult<DeleteScheduledMessageResponse> {
            self.record("delete_scheduled_message");
            unsupported("delete_scheduled_message")
        }

        async fn scheduled_messages(
            &self,
            _ctx: &RequestContext,
            req: ScheduledMessagesRequest,
        ) -> ServiceResult<ScheduledMessagesResponse> {
            self.record("scheduled_messages");
            let state = self.state();
            let scheduled_messages = state
                .scheduled_messages
                .values()
                .filter(|message| match &req.lookup {
                    ScheduledMessagesLookup::ThreadId(id) => message.thread_id == *id,
                    ScheduledMessagesLookup::ScheduledMessageId(id) => message.id == *id,
                })
                .cloned()
                .collect();
            Ok(ScheduledMessagesResponse { scheduled_messages })
        }

        async fn batch_jobs(
            &self,
            _ctx: &RequestContext,
            _req: BatchJobsRequest,
        ) -> ServiceResult<BatchJobsResponse> {
            self.record("batch_jobs");
            unsupported("batch_jobs")
        }

        async fn batch_post_messages(
            &self,
            _ctx: &RequestContext,
            _req: BatchPostMessagesRequest,
        ) -> ServiceResult<BatchPostMessagesResponse> {
            self.record("batch_post_messages");
            unsupported("batch_post_messages")
        }

        async fn clone_attachments(
            &self,
            _ctx: &RequestContext,
            _req: CloneAttachmentsRequest,
        ) -> ServiceResult<CloneAttachmentsResponse> {
            self.record("clone_attachments");
            unsupported("clone_attachments")
        }
    }
}

mod excomms_fake {
    use super::*;
    use async_trait::async_trait;
    use care_gateway::services::excomms::*;
    use care_gateway::services::ExCommsClient;

    #[async_trait]
    impl ExCommsClient for FakeBackend {
        async fn initiate_phone_call(
            &self,
            _ctx: &RequestContext,
            _req: InitiatePhoneCallRequest,
        ) -> ServiceResult<InitiatePhoneCallResponse> {
            self.record("initiate_phone_call");
            unsupported("initiate_phone_call")
        }

        async fn initiate_ip_call(
            &self,
            _ctx: &RequestContext,
            _req: InitiateIpCallRequest,
        ) -> ServiceResult<IpCallResponse> {
            self.record("initiate_ip_call");
            unsupported("initiate_ip_call")
        }

        async fn ip_call(
            &self,
            _ctx: &RequestContext,
            _req: IpCallRequest,
        ) -> ServiceResult<IpCallResponse> {
            self.record("ip_call");
            unsupported("ip_call")
        }

        async fn pending_ip_calls(
            &self,
            _ctx: &RequestContext,
            _req: PendingIpCallsRequest,
        ) -> ServiceResult<PendingIpCallsResponse> {
            self.record("pending_ip_calls");
            unsupported("pending_ip_calls")
        }

        async fn update_ip_call(
            &self,
            _ctx: &RequestContext,
            _req: UpdateIpCallRequest,
        ) -> ServiceResult<IpCallResponse> {
            self.record("update_ip_call");
            unsupported("update_ip_call")
        }

        async fn provision_email_address(
            &self,
            _ctx: &RequestContext,
            _req: ProvisionEmailAddressRequest,
        ) -> ServiceResult<ProvisionEmailAddressResponse> {
            self.record("provision_email_address");
            unsupported("provision_email_address")
        }

        async fn provision_phone_number(
            &self,
            _ctx: &RequestContext,
            _req: ProvisionPhoneNumberRequest,
        ) -> ServiceResult<ProvisionPhoneNumberResponse> {
            self.record("provision_phone_number");
            unsupported("provision_phone_number")
        }

        async fn send_message(
            &self,
            _ctx: &RequestContext,
            _req: SendMessageRequest,
        ) -> ServiceResult<SendMessageResponse> {
            self.record("send_message");
            unsupported("send_message")
        }
    }
}

mod layout_fake {
    use super::*;
    use async_trait::async_trait;
    use care_gateway::services::layout::*;
    use care_gateway::services::LayoutClient;

    #[async_trait]
    impl LayoutClient for FakeBackend {
        async fn get_visit_layout(
            &self,
            _ctx: &RequestContext,
            _req: GetVisitLayoutRequest,
        ) -> ServiceResult<VisitLayoutResponse> {
            self.record("get_visit_layout");
            unsupported("get_visit_layout")
        }

        async fn get_visit_layout_by_version(
            &self,
            _ctx: &RequestContext,
            _req: GetVisitLayoutByVersionRequest,
        ) -> ServiceResult<VisitLayoutResponse> {
            self.record("get_visit_layout_by_version");
            unsupported("get_visit_layout_by_version")
        }

        async fn get_visit_layout_version(
            &self,
            _ctx: &RequestContext,
            _req: GetVisitLayoutVersionRequest,
        ) -> ServiceResult<VisitLayoutVersionResponse> {
            self.record("get_visit_layout_version");
            unsupported("get_visit_layout_version")
        }
    }
}

mod care_fake {
    use super::*;
    use async_trait::async_trait;
    use care_gateway::services::care::*;
    use care_gateway::services::CareClient;

    #[async_trait]
    impl CareClient for FakeBackend {
        async fn create_visit(
            &self,
            _ctx: &RequestContext,
            req: CreateVisitRequest,
        ) -> ServiceResult<VisitResponse> {
            self.record("create_visit");
            let mut state = self.state();
            let visit = Visit {
                id: format!("v_new_{}", state.visits.len() + 1),
                name: req.name,
                layout_version_id: req.layout_version_id,
                entity_id: req.entity_id,
                organization_id: req.organization_id,
                creator_id: req.creator_id,
                ..Default::default()
            };
            state.visits.insert(visit.id.clone(), visit.clone());
            Ok(VisitResponse { visit: Some(visit) })
        }

        async fn get_visit(
            &self,
            _ctx: &RequestContext,
            req: GetVisitRequest,
        ) -> ServiceResult<VisitResponse> {
            self.record("get_visit");
            match self.state().visits.get(&req.id) {
                Some(visit) => Ok(VisitResponse {
                    visit: Some(visit.clone()),
                }),
                None => not_found(&req.id),
            }
        }

        async fn get_visits(
            &self,
            _ctx: &RequestContext,
            _req: GetVisitsRequest,
        ) -> ServiceResult<GetVisitsResponse> {
            self.record("get_visits");
            unsupported("get_visits")
        }

        async fn delete_visit(
            &self,
            _ctx: &RequestContext,
            _req: DeleteVisitRequest,
        ) -> ServiceResult<DeleteVisitResponse> {
            self.record("delete_visit");
            unsupported("delete_visit")
        }

        async fn submit_visit(
            &self,
            _ctx: &RequestContext,
            req: SubmitVisitRequest,
        ) -> ServiceResult<VisitResponse> {
            self.record("submit_visit");
            let mut state = self.state();
            match state.visits.get_mut(&req.visit_id) {
                Some(visit) => {
                    visit.submitted = true;
                    visit.submitted_at = Some(chrono::Utc::now());
                    Ok(VisitResponse {
                        visit: Some(visit.clone()),
                    })
                }
                None => not_found(&req.visit_id),
            }
        }

        async fn triage_visit(
            &self,
            _ctx: &RequestContext,
            _req: TriageVisitRequest,
        ) -> ServiceResult<VisitResponse> {
            self.record("triage_visit");
            unsupported("triage_visit")
        }

        async fn create_visit_answers(
            &self,
            _ctx: &RequestContext,
            _req: CreateVisitAnswersRequest,
        ) -> ServiceResult<CreateVisitAnswersResponse> {
            self.record("create_visit_answers");
            unsupported("create_visit_answers")
        }

        async fn get_answers_for_visit(
            &self,
            _ctx: &RequestContext,
            _req: GetAnswersForVisitRequest,
        ) -> ServiceResult<GetAnswersForVisitResponse> {
            self.record("get_answers_for_visit");
            unsupported("get_answers_for_visit")
        }

        async fn care_plan(
            &self,
            _ctx: &RequestContext,
            req: CarePlanRequest,
        ) -> ServiceResult<CarePlanResponse> {
            self.record("care_plan");
            match self.state().care_plans.get(&req.id) {
                Some(care_plan) => Ok(CarePlanResponse {
                    care_plan: Some(care_plan.clone()),
                }),
                None => not_found(&req.id),
            }
        }

        async fn create_care_plan(
            &self,
            _ctx: &RequestContext,
            req: CreateCarePlanRequest,
        ) -> ServiceResult<CarePlanResponse> {
            self.record("create_care_plan");
            let mut state = self.state();
            let care_plan = CarePlan {
                id: format!("cp_new_{}", state.care_plans.len() + 1),
                name: req.name,
                creator_id: req.creator_id,
                treatments: req.treatments,
                instructions: req.instructions,
                ..Default::default()
            };
            state
                .care_plans
                .insert(care_plan.id.clone(), care_plan.clone());
            Ok(CarePlanResponse {
                care_plan: Some(care_plan),
            })
        }

        async fn submit_care_plan(
            &self,
            _ctx: &RequestContext,
            req: SubmitCarePlanRequest,
        ) -> ServiceResult<CarePlanResponse> {
            self.record("submit_care_plan");
            let mut state = self.state();
            match state.care_plans.get_mut(&req.id) {
                Some(care_plan) => {
                    care_plan.parent_id = req.parent_id;
                    care_plan.submitted = true;
                    care_plan.submitted_at = Some(chrono::Utc::now());
                    Ok(CarePlanResponse {
                        care_plan: Some(care_plan.clone()),
                    })
                }
                None => not_found(&req.id),
            }
        }

        async fn update_care_plan(
            &self,
            _ctx: &RequestContext,
            req: UpdateCarePlanRequest,
        ) -> ServiceResult<CarePlanResponse> {
            self.record("update_care_plan");
            let mut state = self.state();
            match state.care_plans.get_mut(&req.id) {
                Some(care_plan) => {
                    if let Some(name) = req.name {
                        care_plan.name = name;
                    }
                    if let Some(treatments) = req.treatments {
                        care_plan.treatments = treatments;
                    }
                    if let Some(instructions) = req.instructions {
                        care_plan.instructions = instructions;
                    }
                    Ok(CarePlanResponse {
                        care_plan: Some(care_plan.clone()),
                    })
                }
                None => not_found(&req.id),
            }
        }
    }
}

mod media_fake {
    use super::*;
    use async_trait::async_trait;
    use care_gateway::services::media::*;
    use care_gateway::services::MediaClient;

    #[async_trait]
    impl MediaClient for FakeBackend {
        async fn claim_media(
            &self,
            _ctx: &RequestContext,
            _req: ClaimMediaRequest,
        ) -> ServiceResult<ClaimMediaResponse> {
            self.record("claim_media");
            unsupported("claim_media")
        }

        async fn clone_media(
            &self,
            _ctx: &RequestContext,
            _req: CloneMediaRequest,
        ) -> ServiceResult<CloneMediaResponse> {
            self.record("clone_media");
            unsupported("clone_media")
        }

        async fn media_infos(
            &self,
            _ctx: &RequestContext,
            req: MediaInfosRequest,
        ) -> ServiceResult<MediaInfosResponse> {
            self.record("media_infos");
            let state = self.state();
            Ok(MediaInfosResponse {
                media_infos: req
                    .media_ids
                    .iter()
                    .filter_map(|id| state.media.get(id).map(|info| (id.clone(), info.clone())))
                    .collect(),
            })
        }

        async fn update_media(
            &self,
            _ctx: &RequestContext,
            _req: UpdateMediaRequest,
        ) -> ServiceResult<UpdateMediaResponse> {
            self.record("update_media");
            unsupported("update_media")
        }
    }
}

mod payments_fake {
    use super::*;
    use async_trait::async_trait;
    use care_gateway::services::payments::*;
    use care_gateway::services::PaymentsClient;

    impl FakeBackend {
        fn methods_for(&self, customer_entity_id: &str) -> Vec<PaymentMethod> {
            self.state()
                .payment_methods
                .values()
                .filter(|m| m.customer_entity_id == customer_entity_id)
                .cloned()
                .collect()
        }
    }

    #[async_trait]
    impl PaymentsClient for FakeBackend {
        async fn connect_vendor_account(
            &self,
            _ctx: &RequestContext,
            _req: ConnectVendorAccountRequest,
        ) -> ServiceResult<ConnectVendorAccountResponse> {
            self.record("connect_vendor_account");
            unsupported("connect_vendor_account")
        }

        async fn create_payment_method(
            &self,
            _ctx: &RequestContext,
            _req: CreatePaymentMethodRequest,
        ) -> ServiceResult<PaymentMethodsResponse> {
            self.record("create_payment_method");
            unsupported("create_payment_method")
        }

        async fn payment_methods(
            &self,
            _ctx: &RequestContext,
            req: PaymentMethodsRequest,
        ) -> ServiceResult<PaymentMethodsResponse> {
            self.record("payment_methods");
            Ok(PaymentMethodsResponse {
                payment_methods: self.methods_for(&req.customer_entity_id),
            })
        }

        async fn payment_method(
            &self,
            _ctx: &RequestContext,
            req: PaymentMethodRequest,
        ) -> ServiceResult<PaymentMethodResponse> {
            self.record("payment_method");
            match self.state().payment_methods.get(&req.payment_method_id) {
                Some(method) => Ok(PaymentMethodResponse {
                    payment_method: Some(method.clone()),
                }),
                None => not_found(&req.payment_method_id),
            }
        }

        async fn delete_payment_method(
            &self,
            _ctx: &RequestContext,
            req: DeletePaymentMethodRequest,
        ) -> ServiceResult<PaymentMethodsResponse> {
            self.record("delete_payment_method");
            let removed = self.state().payment_methods.remove(&req.payment_method_id);
            match removed {
                Some(method) => Ok(PaymentMethodsResponse {
                    payment_methods: self.methods_for(&method.customer_entity_id),
                }),
                None => not_found(&req.payment_method_id),
            }
        }
    }
}

mod patientsync_fake {
    use super::*;
    use async_trait::async_trait;
    use care_gateway::services::patientsync::*;
    use care_gateway::services::PatientSyncClient;

    #[async_trait]
    impl PatientSyncClient for FakeBackend {
        async fn configure_sync(
            &self,
            _ctx: &RequestContext,
            _req: ConfigureSyncRequest,
        ) -> ServiceResult<ConfigureSyncResponse> {
            self.record("configure_sync");
            unsupported("configure_sync")
        }

        async fn lookup_sync_configuration(
            &self,
            _ctx: &RequestContext,
            _req: LookupSyncConfigurationRequest,
        ) -> ServiceResult<LookupSyncConfigurationResponse> {
            self.record("lookup_sync_configuration");
            unsupported("lookup_sync_configuration")
        }
    }
}
