use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::media::MediaOwnerType;
use super::ServiceResult;
use crate::context::RequestContext;

pub const THREAD_ITEM_ID_PREFIX: &str = "ti_";
pub const SAVED_MESSAGE_ID_PREFIX: &str = "sm_";
pub const SCHEDULED_MESSAGE_ID_PREFIX: &str = "schm_";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreadType {
    #[default]
    Unknown,
    External,
    Team,
    Secure,
    SecureExternal,
    Support,
    Setup,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thread {
    pub id: String,
    pub organization_id: String,
    pub primary_entity_id: String,
    pub thread_type: ThreadType,
    pub title: String,
    pub summary: String,
    pub unread: bool,
    pub last_message_timestamp: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointChannel {
    #[default]
    App,
    Sms,
    Email,
    Voice,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub channel: EndpointChannel,
    pub id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentType {
    #[default]
    GenericUrl,
    Image,
    Video,
    Audio,
    Document,
    Visit,
    CarePlan,
    Payment,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub attachment_type: AttachmentType,
    pub title: String,
    pub user_title: String,
    pub url: String,
    /// Media or resource id the attachment points at
    pub content_id: String,
}

/// Message body as written by a poster
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagePost {
    /// BML encoded
    pub text: String,
    pub title: String,
    pub summary: String,
    pub internal: bool,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    pub source: Option<Endpoint>,
    #[serde(default)]
    pub destinations: Vec<Endpoint>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    pub title: String,
    pub summary: String,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    pub source: Option<Endpoint>,
    #[serde(default)]
    pub destinations: Vec<Endpoint>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadItem {
    pub id: String,
    pub thread_id: String,
    pub organization_id: String,
    pub actor_entity_id: String,
    pub internal: bool,
    pub timestamp: u64,
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostMessageRequest {
    pub uuid: String,
    pub thread_id: String,
    pub from_entity_id: String,
    pub message: MessagePost,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostMessageResponse {
    pub thread: Option<Thread>,
    pub item: Option<ThreadItem>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateEmptyThreadRequest {
    pub uuid: String,
    pub organization_id: String,
    pub from_entity_id: String,
    pub primary_entity_id: String,
    #[serde(default)]
    pub member_entity_ids: Vec<String>,
    pub thread_type: ThreadType,
    pub summary: String,
    pub system_title: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThreadResponse {
    pub thread: Option<Thread>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThreadRequest {
    pub thread_id: String,
    pub viewer_entity_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThreadsRequest {
    pub thread_ids: Vec<String>,
    pub viewer_entity_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThreadsResponse {
    pub threads: Vec<Thread>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThreadItemRequest {
    pub item_id: String,
    pub viewer_entity_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThreadItemResponse {
    pub item: Option<ThreadItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IteratorDirection {
    #[default]
    FromStart,
    FromEnd,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThreadIterator {
    pub start_cursor: String,
    pub end_cursor: String,
    pub direction: IteratorDirection,
    pub count: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThreadItemsRequest {
    pub thread_id: String,
    pub viewer_entity_id: String,
    pub iterator: ThreadIterator,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThreadItemEdge {
    pub item: ThreadItem,
    pub cursor: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThreadItemsResponse {
    pub edges: Vec<ThreadItemEdge>,
    pub has_more: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThreadItemViewDetailsRequest {
    pub item_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThreadItemViewDetails {
    pub thread_item_id: String,
    pub entity_id: String,
    pub view_time: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThreadItemViewDetailsResponse {
    pub item_view_details: Vec<ThreadItemViewDetails>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThreadsForMemberRequest {
    pub entity_id: String,
    pub primary_only: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub text: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryThreadsRequest {
    pub organization_id: String,
    pub viewer_entity_id: String,
    pub query: Option<Query>,
    pub iterator: ThreadIterator,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThreadEdge {
    pub thread: Thread,
    pub cursor: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryThreadsResponse {
    pub edges: Vec<ThreadEdge>,
    pub has_more: bool,
    pub total: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThreadWatermark {
    pub thread_id: String,
    pub last_message_timestamp: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarkThreadsAsReadRequest {
    pub thread_watermarks: Vec<ThreadWatermark>,
    pub entity_id: String,
    pub seen: bool,
    pub timestamp: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarkThreadsAsReadResponse {}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteThreadRequest {
    pub thread_id: String,
    pub actor_entity_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteThreadResponse {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedQuery {
    pub id: String,
    pub organization_id: String,
    pub entity_id: String,
    pub title: String,
    pub short_title: String,
    pub query: Option<Query>,
    pub unread: u32,
    pub total: u32,
    pub ordinal: i32,
    pub notifications_enabled: bool,
    pub hidden: bool,
    pub template: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateSavedQueryRequest {
    pub organization_id: String,
    pub entity_id: String,
    pub title: String,
    pub query: Option<Query>,
    pub ordinal: i32,
    pub notifications_enabled: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SavedQueryResponse {
    pub saved_query: Option<SavedQuery>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SavedQueryRequest {
    pub saved_query_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SavedQueriesRequest {
    pub entity_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SavedQueriesResponse {
    pub saved_queries: Vec<SavedQuery>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSavedQueryRequest {
    pub saved_query_id: String,
    pub title: Option<String>,
    pub query: Option<Query>,
    pub ordinal: Option<i32>,
    pub notifications_enabled: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TagsRequest {
    pub organization_id: String,
    pub prefix: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub hidden: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TagsResponse {
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedMessage {
    pub id: String,
    pub title: String,
    pub organization_id: String,
    pub creator_entity_id: String,
    pub owner_entity_id: String,
    pub internal: bool,
    pub content: MessagePost,
    pub created: u64,
    pub modified: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateSavedMessageRequest {
    pub organization_id: String,
    pub creator_entity_id: String,
    pub owner_entity_id: String,
    pub title: String,
    pub content: MessagePost,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SavedMessageResponse {
    pub saved_message: Option<SavedMessage>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteSavedMessageRequest {
    pub saved_message_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteSavedMessageResponse {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum SavedMessagesBy {
    Ids(Vec<String>),
    EntityIds(Vec<String>),
}

impl Default for SavedMessagesBy {
    fn default() -> Self {
        SavedMessagesBy::Ids(Vec::new())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SavedMessagesRequest {
    pub by: SavedMessagesBy,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SavedMessagesResponse {
    pub saved_messages: Vec<SavedMessage>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSavedMessageRequest {
    pub saved_message_id: String,
    pub title: Option<String>,
    pub content: Option<MessagePost>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduledMessageStatus {
    #[default]
    Pending,
    Sent,
    Deleted,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledMessage {
    pub id: String,
    pub thread_id: String,
    pub actor_entity_id: String,
    pub scheduled_for: DateTime<Utc>,
    pub sent_at: Option<DateTime<Utc>>,
    pub status: ScheduledMessageStatus,
    pub content: MessagePost,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateScheduledMessageRequest {
    pub thread_id: String,
    pub actor_entity_id: String,
    pub scheduled_for: DateTime<Utc>,
    pub content: MessagePost,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateScheduledMessageResponse {
    pub scheduled_message: Option<ScheduledMessage>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteScheduledMessageRequest {
    pub scheduled_message_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteScheduledMessageResponse {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ScheduledMessagesLookup {
    ThreadId(String),
    ScheduledMessageId(String),
}

impl Default for ScheduledMessagesLookup {
    fn default() -> Self {
        ScheduledMessagesLookup::ThreadId(String::new())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduledMessagesRequest {
    pub lookup: ScheduledMessagesLookup,
    #[serde(default)]
    pub statuses: Vec<ScheduledMessageStatus>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduledMessagesResponse {
    pub scheduled_messages: Vec<ScheduledMessage>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchJobStatus {
    #[default]
    Pending,
    Complete,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchJob {
    pub id: String,
    pub requesting_entity_id: String,
    pub status: BatchJobStatus,
    pub tasks_requested: u32,
    pub tasks_completed: u32,
    pub tasks_errored: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchJobsRequest {
    pub ids: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchJobsResponse {
    pub batch_jobs: Vec<BatchJob>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchPostMessagesRequest {
    pub requesting_entity_id: String,
    pub post_messages_requests: Vec<PostMessageRequest>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchPostMessagesResponse {
    pub batch_job: Option<BatchJob>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CloneAttachmentsRequest {
    pub attachments: Vec<Attachment>,
    pub owner_type: MediaOwnerType,
    pub owner_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CloneAttachmentsResponse {
    pub attachments: Vec<Attachment>,
}

#[async_trait]
pub trait ThreadsClient: Send + Sync {
    async fn create_empty_thread(
        &self,
        ctx: &RequestContext,
        req: CreateEmptyThreadRequest,
    ) -> ServiceResult<ThreadResponse>;

    async fn thread(&self, ctx: &RequestContext, req: ThreadRequest)
        -> ServiceResult<ThreadResponse>;

    async fn threads(
        &self,
        ctx: &RequestContext,
        req: ThreadsRequest,
    ) -> ServiceResult<ThreadsResponse>;

    async fn thread_item(
        &self,
        ctx: &RequestContext,
        req: ThreadItemRequest,
    ) -> ServiceResult<ThreadItemResponse>;

    async fn thread_items(
        &self,
        ctx: &RequestContext,
        req: ThreadItemsRequest,
    ) -> ServiceResult<ThreadItemsResponse>;

    async fn thread_item_view_details(
        &self,
        ctx: &RequestContext,
        req: ThreadItemViewDetailsRequest,
    ) -> ServiceResult<ThreadItemViewDetailsResponse>;

    async fn threads_for_member(
        &self,
        ctx: &RequestContext,
        req: ThreadsForMemberRequest,
    ) -> ServiceResult<ThreadsResponse>;

    async fn query_threads(
        &self,
        ctx: &RequestContext,
        req: QueryThreadsRequest,
    ) -> ServiceResult<QueryThreadsResponse>;

    async fn mark_threads_as_read(
        &self,
        ctx: &RequestContext,
        req: MarkThreadsAsReadRequest,
    ) -> ServiceResult<MarkThreadsAsReadResponse>;

    async fn post_message(
        &self,
        ctx: &RequestContext,
        req: PostMessageRequest,
    ) -> ServiceResult<PostMessageResponse>;

    async fn delete_thread(
        &self,
        ctx: &RequestContext,
        req: DeleteThreadRequest,
    ) -> ServiceResult<DeleteThreadResponse>;

    async fn create_saved_query(
        &self,
        ctx: &RequestContext,
        req: CreateSavedQueryRequest,
    ) -> ServiceResult<SavedQueryResponse>;

    async fn saved_query(
        &self,
        ctx: &RequestContext,
        req: SavedQueryRequest,
    ) -> ServiceResult<SavedQueryResponse>;

    async fn saved_queries(
        &self,
        ctx: &RequestContext,
        req: SavedQueriesRequest,
    ) -> ServiceResult<SavedQueriesResponse>;

    async fn saved_query_templates(
        &self,
        ctx: &RequestContext,
        req: SavedQueriesRequest,
    ) -> ServiceResult<SavedQueriesResponse>;

    async fn update_saved_query(
        &self,
        ctx: &RequestContext,
        req: UpdateSavedQueryRequest,
    ) -> ServiceResult<SavedQueryResponse>;

    async fn tags(&self, ctx: &RequestContext, req: TagsRequest) -> ServiceResult<TagsResponse>;

    async fn create_saved_message(
        &self,
        ctx: &RequestContext,
        req: CreateSavedMessageRequest,
    ) -> ServiceResult<SavedMessageResponse>;

    async fn delete_saved_message(
        &self,
        ctx: &RequestContext,
        req: DeleteSavedMessageRequest,
    ) -> ServiceResult<DeleteSavedMessageResponse>;

    async fn saved_messages(
        &self,
        ctx: &RequestContext,
        req: SavedMessagesRequest,
    ) -> ServiceResult<SavedMessagesResponse>;

    async fn update_saved_message(
        &self,
        ctx: &RequestContext,
        req: UpdateSavedMessageRequest,
    ) -> ServiceResult<SavedMessageResponse>;

    async fn create_scheduled_message(
        &self,
        ctx: &RequestContext,
        req: CreateScheduledMessageRequest,
    ) -> ServiceResult<CreateScheduledMessageResponse>;

    async fn delete_scheduled_message(
        &self,
        ctx: &RequestContext,
        req: DeleteScheduledMessageRequest,
    ) -> ServiceResult<DeleteScheduledMessageResponse>;

    async fn scheduled_messages(
        &self,
        ctx: &RequestContext,
        req: ScheduledMessagesRequest,
    ) -> ServiceResult<ScheduledMessagesResponse>;

    async fn batch_jobs(
        &self,
        ctx: &RequestContext,
        req: BatchJobsRequest,
    ) -> ServiceResult<BatchJobsResponse>;

    async fn batch_post_messages(
        &self,
        ctx: &RequestContext,
        req: BatchPostMessagesRequest,
    ) -> ServiceResult<BatchPostMessagesResponse>;

    async fn clone_attachments(
        &self,
        ctx: &RequestContext,
        req: CloneAttachmentsRequest,
    ) -> ServiceResult<CloneAttachmentsResponse>;
}
