//! JSON-over-HTTP transport for the downstream services.
//!
//! Every call is a `POST {base_url}/{method}` carrying the request record as
//! JSON. The caller's bearer token and request id are forwarded, and the
//! context deadline bounds the call.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use url::Url;

use super::auth::*;
use super::care::*;
use super::directory::*;
use super::excomms::*;
use super::layout::*;
use super::media::*;
use super::patientsync::*;
use super::payments::*;
use super::threading::*;
use super::{ServiceError, ServiceResult};
use crate::context::RequestContext;

#[derive(Debug, Clone)]
pub struct HttpServiceClient {
    service: &'static str,
    base_url: Url,
    http: reqwest::Client,
}

impl HttpServiceClient {
    pub fn new(service: &'static str, base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        // Url::join replaces the last path segment unless the base ends with '/'
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("care-gateway/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            service,
            base_url,
            http,
        })
    }

    pub fn service(&self) -> &'static str {
        self.service
    }

    async fn call<Req, Resp>(
        &self,
        ctx: &RequestContext,
        method: &str,
        req: &Req,
    ) -> ServiceResult<Resp>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let url = self
            .base_url
            .join(method)
            .map_err(|e| ServiceError::Transport(format!("{}.{}: {}", self.service, method, e)))?;

        let mut request = self
            .http
            .post(url)
            .header("X-Request-ID", ctx.request_id())
            .json(req);
        if let Some(token) = ctx.auth_token() {
            request = request.bearer_auth(token);
        }
        if let Some(remaining) = ctx.remaining() {
            if remaining.is_zero() {
                return Err(ServiceError::DeadlineExceeded(format!("{}.{}", self.service, method)));
            }
            request = request.timeout(remaining);
        }

        tracing::debug!("Calling {}.{} for request {}", self.service, method, ctx.request_id());

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ServiceError::DeadlineExceeded(format!("{}.{}", self.service, method))
            } else {
                ServiceError::Transport(format!("{}.{}: {}", self.service, method, e))
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<Resp>()
                .await
                .map_err(|e| ServiceError::Decode(format!("{}.{}: {}", self.service, method, e)));
        }

        let body = response.text().await.unwrap_or_default();
        Err(error_for_status(status, body))
    }
}

/// Map a non-success status from a downstream service
pub fn error_for_status(status: StatusCode, body: String) -> ServiceError {
    match status {
        StatusCode::NOT_FOUND => ServiceError::NotFound(body),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            ServiceError::InvalidArgument(body)
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ServiceError::PermissionDenied(body),
        StatusCode::GONE => ServiceError::Expired(body),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            ServiceError::DeadlineExceeded(body)
        }
        status => ServiceError::Unavailable(format!("{}: {}", status, body)),
    }
}

#[async_trait]
impl AuthClient for HttpServiceClient {
    async fn authenticate_login(
        &self,
        ctx: &RequestContext,
        req: AuthenticateLoginRequest,
    ) -> ServiceResult<AuthenticateLoginResponse> {
        self.call(ctx, "authenticate_login", &req).await
    }

    async fn authenticate_login_with_code(
        &self,
        ctx: &RequestContext,
        req: AuthenticateLoginWithCodeRequest,
    ) -> ServiceResult<AuthenticateLoginWithCodeResponse> {
        self.call(ctx, "authenticate_login_with_code", &req).await
    }

    async fn check_authentication(
        &self,
        ctx: &RequestContext,
        req: CheckAuthenticationRequest,
    ) -> ServiceResult<CheckAuthenticationResponse> {
        self.call(ctx, "check_authentication", &req).await
    }

    async fn check_password_reset_token(
        &self,
        ctx: &RequestContext,
        req: CheckPasswordResetTokenRequest,
    ) -> ServiceResult<CheckPasswordResetTokenResponse> {
        self.call(ctx, "check_password_reset_token", &req).await
    }

    async fn check_verification_code(
        &self,
        ctx: &RequestContext,
        req: CheckVerificationCodeRequest,
    ) -> ServiceResult<CheckVerificationCodeResponse> {
        self.call(ctx, "check_verification_code", &req).await
    }

    async fn create_account(
        &self,
        ctx: &RequestContext,
        req: CreateAccountRequest,
    ) -> ServiceResult<CreateAccountResponse> {
        self.call(ctx, "create_account", &req).await
    }

    async fn create_password_reset_token(
        &self,
        ctx: &RequestContext,
        req: CreatePasswordResetTokenRequest,
    ) -> ServiceResult<CreatePasswordResetTokenResponse> {
        self.call(ctx, "create_password_reset_token", &req).await
    }

    async fn create_verification_code(
        &self,
        ctx: &RequestContext,
        req: CreateVerificationCodeRequest,
    ) -> ServiceResult<CreateVerificationCodeResponse> {
        self.call(ctx, "create_verification_code", &req).await
    }

    async fn get_account(
        &self,
        ctx: &RequestContext,
        req: GetAccountRequest,
    ) -> ServiceResult<GetAccountResponse> {
        self.call(ctx, "get_account", &req).await
    }

    async fn unauthenticate(
        &self,
        ctx: &RequestContext,
        req: UnauthenticateRequest,
    ) -> ServiceResult<UnauthenticateResponse> {
        self.call(ctx, "unauthenticate", &req).await
    }

    async fn update_password(
        &self,
        ctx: &RequestContext,
        req: UpdatePasswordRequest,
    ) -> ServiceResult<UpdatePasswordResponse> {
        self.call(ctx, "update_password", &req).await
    }

    async fn verified_value(
        &self,
        ctx: &RequestContext,
        req: VerifiedValueRequest,
    ) -> ServiceResult<VerifiedValueResponse> {
        self.call(ctx, "verified_value", &req).await
    }
}

#[async_trait]
impl DirectoryClient for HttpServiceClient {
    async fn lookup_entities(
        &self,
        ctx: &RequestContext,
        req: LookupEntitiesRequest,
    ) -> ServiceResult<LookupEntitiesResponse> {
        self.call(ctx, "lookup_entities", &req).await
    }

    async fn lookup_entities_by_contact(
        &self,
        ctx: &RequestContext,
        req: LookupEntitiesByContactRequest,
    ) -> ServiceResult<LookupEntitiesByContactResponse> {
        self.call(ctx, "lookup_entities_by_contact", &req).await
    }

    async fn lookup_entity_domain(
        &self,
        ctx: &RequestContext,
        req: LookupEntityDomainRequest,
    ) -> ServiceResult<LookupEntityDomainResponse> {
        self.call(ctx, "lookup_entity_domain", &req).await
    }

    async fn create_contact(
        &self,
        ctx: &RequestContext,
        req: CreateContactRequest,
    ) -> ServiceResult<EntityResponse> {
        self.call(ctx, "create_contact", &req).await
    }

    async fn create_contacts(
        &self,
        ctx: &RequestContext,
        req: CreateContactsRequest,
    ) -> ServiceResult<EntityResponse> {
        self.call(ctx, "create_contacts", &req).await
    }

    async fn update_contacts(
        &self,
        ctx: &RequestContext,
        req: UpdateContactsRequest,
    ) -> ServiceResult<EntityResponse> {
        self.call(ctx, "update_contacts", &req).await
    }

    async fn delete_contacts(
        &self,
        ctx: &RequestContext,
        req: DeleteContactsRequest,
    ) -> ServiceResult<EntityResponse> {
        self.call(ctx, "delete_contacts", &req).await
    }

    async fn create_entity(
        &self,
        ctx: &RequestContext,
        req: CreateEntityRequest,
    ) -> ServiceResult<EntityResponse> {
        self.call(ctx, "create_entity", &req).await
    }

    async fn update_entity(
        &self,
        ctx: &RequestContext,
        req: UpdateEntityRequest,
    ) -> ServiceResult<EntityResponse> {
        self.call(ctx, "update_entity", &req).await
    }

    async fn create_entity_domain(
        &self,
        ctx: &RequestContext,
        req: CreateEntityDomainRequest,
    ) -> ServiceResult<CreateEntityDomainResponse> {
        self.call(ctx, "create_entity_domain", &req).await
    }

    async fn serialized_entity_contact(
        &self,
        ctx: &RequestContext,
        req: SerializedEntityContactRequest,
    ) -> ServiceResult<SerializedEntityContactResponse> {
        self.call(ctx, "serialized_entity_contact", &req).await
    }
}

#[async_trait]
impl ThreadsClient for HttpServiceClient {
    async fn create_empty_thread(
        &self,
        ctx: &RequestContext,
        req: CreateEmptyThreadRequest,
    ) -> ServiceResult<ThreadResponse> {
        self.call(ctx, "create_empty_thread", &req).await
    }

    async fn thread(
        &self,
        ctx: &RequestContext,
        req: ThreadRequest,
    ) -> ServiceResult<ThreadResponse> {
        self.call(ctx, "thread", &req).await
    }

    async fn threads(
        &self,
        ctx: &RequestContext,
        req: ThreadsRequest,
    ) -> ServiceResult<ThreadsResponse> {
        self.call(ctx, "threads", &req).await
    }

    async fn thread_item(
        &self,
        ctx: &RequestContext,
        req: ThreadItemRequest,
    ) -> ServiceResult<ThreadItemResponse> {
        self.call(ctx, "thread_item", &req).await
    }

    async fn thread_items(
        &self,
        ctx: &RequestContext,
        req: ThreadItemsRequest,
    ) -> ServiceResult<ThreadItemsResponse> {
        self.call(ctx, "thread_items", &req).await
    }

    async fn thread_item_view_details(
        &self,
        ctx: &RequestContext,
        req: ThreadItemViewDetailsRequest,
    ) -> ServiceResult<ThreadItemViewDetailsResponse> {
        self.call(ctx, "thread_item_view_details", &req).await
    }

    async fn threads_for_member(
        &self,
        ctx: &RequestContext,
        req: ThreadsForMemberRequest,
    ) -> ServiceResult<ThreadsResponse> {
        self.call(ctx, "threads_for_member", &req).await
    }

    async fn query_threads(
        &self,
        ctx: &RequestContext,
        req: QueryThreadsRequest,
    ) -> ServiceResult<QueryThreadsResponse> {
        self.call(ctx, "query_threads", &req).await
    }

    async fn mark_threads_as_read(
        &self,
        ctx: &RequestContext,
        req: MarkThreadsAsReadRequest,
    ) -> ServiceResult<MarkThreadsAsReadResponse> {
        self.call(ctx, "mark_threads_as_read", &req).await
    }

    async fn post_message(
        &self,
        ctx: &RequestContext,
        req: PostMessageRequest,
    ) -> ServiceResult<PostMessageResponse> {
        self.call(ctx, "post_message", &req).await
    }

    async fn delete_thread(
        &self,
        ctx: &RequestContext,
        req: DeleteThreadRequest,
    ) -> ServiceResult<DeleteThreadResponse> {
        self.call(ctx, "delete_thread", &req).await
    }

    async fn create_saved_query(
        &self,
        ctx: &RequestContext,
        req: CreateSavedQueryRequest,
    ) -> ServiceResult<SavedQueryResponse> {
        self.call(ctx, "create_saved_query", &req).await
    }

    async fn saved_query(
        &self,
        ctx: &RequestContext,
        req: SavedQueryRequest,
    ) -> ServiceResult<SavedQueryResponse> {
        self.call(ctx, "saved_query", &req).await
    }

    async fn saved_queries(
        &self,
        ctx: &RequestContext,
        req: SavedQueriesRequest,
    ) -> ServiceResult<SavedQueriesResponse> {
        self.call(ctx, "saved_queries", &req).await
    }

    async fn saved_query_templates(
        &self,
        ctx: &RequestContext,
        req: SavedQueriesRequest,
    ) -> ServiceResult<SavedQueriesResponse> {
        self.call(ctx, "saved_query_templates", &req).await
    }

    async fn update_saved_query(
        &self,
        ctx: &RequestContext,
        req: UpdateSavedQueryRequest,
    ) -> ServiceResult<SavedQueryResponse> {
        self.call(ctx, "update_saved_query", &req).await
    }

    async fn tags(&self, ctx: &RequestContext, req: TagsRequest) -> ServiceResult<TagsResponse> {
        self.call(ctx, "tags", &req).await
    }

    async fn create_saved_message(
        &self,
        ctx: &RequestContext,
        req: CreateSavedMessageRequest,
    ) -> ServiceResult<SavedMessageResponse> {
        self.call(ctx, "create_saved_message", &req).await
    }

    async fn delete_saved_message(
        &self,
        ctx: &RequestContext,
        req: DeleteSavedMessageRequest,
    ) -> ServiceResult<DeleteSavedMessageResponse> {
        self.call(ctx, "delete_saved_message", &req).await
    }

    async fn saved_messages(
        &self,
        ctx: &RequestContext,
        req: SavedMessagesRequest,
    ) -> ServiceResult<SavedMessagesResponse> {
        self.call(ctx, "saved_messages", &req).await
    }

    async fn update_saved_message(
        &self,
        ctx: &RequestContext,
        req: UpdateSavedMessageRequest,
    ) -> ServiceResult<SavedMessageResponse> {
        self.call(ctx, "update_saved_message", &req).await
    }

    async fn create_scheduled_message(
        &self,
        ctx: &RequestContext,
        req: CreateScheduledMessageRequest,
    ) -> ServiceResult<CreateScheduledMessageResponse> {
        self.call(ctx, "create_scheduled_message", &req).await
    }

    async fn delete_scheduled_message(
        &self,
        ctx: &RequestContext,
        req: DeleteScheduledMessageRequest,
    ) -> ServiceResult<DeleteScheduledMessageResponse> {
        self.call(ctx, "delete_scheduled_message", &req).await
    }

    async fn scheduled_messages(
        &self,
        ctx: &RequestContext,
        req: ScheduledMessagesRequest,
    ) -> ServiceResult<ScheduledMessagesResponse> {
        self.call(ctx, "scheduled_messages", &req).await
    }

    async fn batch_jobs(
        &self,
        ctx: &RequestContext,
        req: BatchJobsRequest,
    ) -> ServiceResult<BatchJobsResponse> {
        self.call(ctx, "batch_jobs", &req).await
    }

    async fn batch_post_messages(
        &self,
        ctx: &RequestContext,
        req: BatchPostMessagesRequest,
    ) -> ServiceResult<BatchPostMessagesResponse> {
        self.call(ctx, "batch_post_messages", &req).await
    }

    async fn clone_attachments(
        &self,
        ctx: &RequestContext,
        req: CloneAttachmentsRequest,
    ) -> ServiceResult<CloneAttachmentsResponse> {
        self.call(ctx, "clone_attachments", &req).await
    }
}

#[async_trait]
impl ExCommsClient for HttpServiceClient {
    async fn initiate_phone_call(
        &self,
        ctx: &RequestContext,
        req: InitiatePhoneCallRequest,
    ) -> ServiceResult<InitiatePhoneCallResponse> {
        self.call(ctx, "initiate_phone_call", &req).await
    }

    async fn initiate_ip_call(
        &self,
        ctx: &RequestContext,
        req: InitiateIpCallRequest,
    ) -> ServiceResult<IpCallResponse> {
        self.call(ctx, "initiate_ip_call", &req).await
    }

    async fn ip_call(
        &self,
        ctx: &RequestContext,
        req: IpCallRequest,
    ) -> ServiceResult<IpCallResponse> {
        self.call(ctx, "ip_call", &req).await
    }

    async fn pending_ip_calls(
        &self,
        ctx: &RequestContext,
        req: PendingIpCallsRequest,
    ) -> ServiceResult<PendingIpCallsResponse> {
        self.call(ctx, "pending_ip_calls", &req).await
    }

    async fn update_ip_call(
        &self,
        ctx: &RequestContext,
        req: UpdateIpCallRequest,
    ) -> ServiceResult<IpCallResponse> {
        self.call(ctx, "update_ip_call", &req).await
    }

    async fn provision_email_address(
        &self,
        ctx: &RequestContext,
        req: ProvisionEmailAddressRequest,
    ) -> ServiceResult<ProvisionEmailAddressResponse> {
        self.call(ctx, "provision_email_address", &req).await
    }

    async fn provision_phone_number(
        &self,
        ctx: &RequestContext,
        req: ProvisionPhoneNumberRequest,
    ) -> ServiceResult<ProvisionPhoneNumberResponse> {
        self.call(ctx, "provision_phone_number", &req).await
    }

    async fn send_message(
        &self,
        ctx: &RequestContext,
        req: SendMessageRequest,
    ) -> ServiceResult<SendMessageResponse> {
        self.call(ctx, "send_message", &req).await
    }
}

#[async_trait]
impl LayoutClient for HttpServiceClient {
    async fn get_visit_layout(
        &self,
        ctx: &RequestContext,
        req: GetVisitLayoutRequest,
    ) -> ServiceResult<VisitLayoutResponse> {
        self.call(ctx, "get_visit_layout", &req).await
    }

    async fn get_visit_layout_by_version(
        &self,
        ctx: &RequestContext,
        req: GetVisitLayoutByVersionRequest,
    ) -> ServiceResult<VisitLayoutResponse> {
        self.call(ctx, "get_visit_layout_by_version", &req).await
    }

    async fn get_visit_layout_version(
        &self,
        ctx: &RequestContext,
        req: GetVisitLayoutVersionRequest,
    ) -> ServiceResult<VisitLayoutVersionResponse> {
        self.call(ctx, "get_visit_layout_version", &req).await
    }
}

#[async_trait]
impl CareClient for HttpServiceClient {
    async fn create_visit(
        &self,
        ctx: &RequestContext,
        req: CreateVisitRequest,
    ) -> ServiceResult<VisitResponse> {
        self.call(ctx, "create_visit", &req).await
    }

    async fn get_visit(
        &self,
        ctx: &RequestContext,
        req: GetVisitRequest,
    ) -> ServiceResult<VisitResponse> {
        self.call(ctx, "get_visit", &req).await
    }

    async fn get_visits(
        &self,
        ctx: &RequestContext,
        req: GetVisitsRequest,
    ) -> ServiceResult<GetVisitsResponse> {
        self.call(ctx, "get_visits", &req).await
    }

    async fn delete_visit(
        &self,
        ctx: &RequestContext,
        req: DeleteVisitRequest,
    ) -> ServiceResult<DeleteVisitResponse> {
        self.call(ctx, "delete_visit", &req).await
    }

    async fn submit_visit(
        &self,
        ctx: &RequestContext,
        req: SubmitVisitRequest,
    ) -> ServiceResult<VisitResponse> {
        self.call(ctx, "submit_visit", &req).await
    }

    async fn triage_visit(
        &self,
        ctx: &RequestContext,
        req: TriageVisitRequest,
    ) -> ServiceResult<VisitResponse> {
        self.call(ctx, "triage_visit", &req).await
    }

    async fn create_visit_answers(
        &self,
        ctx: &RequestContext,
        req: CreateVisitAnswersRequest,
    ) -> ServiceResult<CreateVisitAnswersResponse> {
        self.call(ctx, "create_visit_answers", &req).await
    }

    async fn get_answers_for_visit(
        &self,
        ctx: &RequestContext,
        req: GetAnswersForVisitRequest,
    ) -> ServiceResult<GetAnswersForVisitResponse> {
        self.call(ctx, "get_answers_for_visit", &req).await
    }

    async fn care_plan(
        &self,
        ctx: &RequestContext,
        req: CarePlanRequest,
    ) -> ServiceResult<CarePlanResponse> {
        self.call(ctx, "care_plan", &req).await
    }

    async fn create_care_plan(
        &self,
        ctx: &RequestContext,
        req: CreateCarePlanRequest,
    ) -> ServiceResult<CarePlanResponse> {
        self.call(ctx, "create_care_plan", &req).await
    }

    async fn submit_care_plan(
        &self,
        ctx: &RequestContext,
        req: SubmitCarePlanRequest,
    ) -> ServiceResult<CarePlanResponse> {
        self.call(ctx, "submit_care_plan", &req).await
    }

    async fn update_care_plan(
        &self,
        ctx: &RequestContext,
        req: UpdateCarePlanRequest,
    ) -> ServiceResult<CarePlanResponse> {
        self.call(ctx, "update_care_plan", &req).await
    }
}

#[async_trait]
impl MediaClient for HttpServiceClient {
    async fn claim_media(
        &self,
        ctx: &RequestContext,
        req: ClaimMediaRequest,
    ) -> ServiceResult<ClaimMediaResponse> {
        self.call(ctx, "claim_media", &req).await
    }

    async fn clone_media(
        &self,
        ctx: &RequestContext,
        req: CloneMediaRequest,
    ) -> ServiceResult<CloneMediaResponse> {
        self.call(ctx, "clone_media", &req).await
    }

    async fn media_infos(
        &self,
        ctx: &RequestContext,
        req: MediaInfosRequest,
    ) -> ServiceResult<MediaInfosResponse> {
        self.call(ctx, "media_infos", &req).await
    }

    async fn update_media(
        &self,
        ctx: &RequestContext,
        req: UpdateMediaRequest,
    ) -> ServiceResult<UpdateMediaResponse> {
        self.call(ctx, "update_media", &req).await
    }
}

#[async_trait]
impl PaymentsClient for HttpServiceClient {
    async fn connect_vendor_account(
        &self,
        ctx: &RequestContext,
        req: ConnectVendorAccountRequest,
    ) -> ServiceResult<ConnectVendorAccountResponse> {
        self.call(ctx, "connect_vendor_account", &req).await
    }

    async fn create_payment_method(
        &self,
        ctx: &RequestContext,
        req: CreatePaymentMethodRequest,
    ) -> ServiceResult<PaymentMethodsResponse> {
        self.call(ctx, "create_payment_method", &req).await
    }

    async fn payment_methods(
        &self,
        ctx: &RequestContext,
        req: PaymentMethodsRequest,
    ) -> ServiceResult<PaymentMethodsResponse> {
        self.call(ctx, "payment_methods", &req).await
    }

    async fn payment_method(
        &self,
        ctx: &RequestContext,
        req: PaymentMethodRequest,
    ) -> ServiceResult<PaymentMethodResponse> {
        self.call(ctx, "payment_method", &req).await
    }

    async fn delete_payment_method(
        &self,
        ctx: &RequestContext,
        req: DeletePaymentMethodRequest,
    ) -> ServiceResult<PaymentMethodsResponse> {
        self.call(ctx, "delete_payment_method", &req).await
    }
}

#[async_trait]
impl PatientSyncClient for HttpServiceClient {
    async fn configure_sync(
        &self,
        ctx: &RequestContext,
        req: ConfigureSyncRequest,
    ) -> ServiceResult<ConfigureSyncResponse> {
        self.call(ctx, "configure_sync", &req).await
    }

    async fn lookup_sync_configuration(
        &self,
        ctx: &RequestContext,
        req: LookupSyncConfigurationRequest,
    ) -> ServiceResult<LookupSyncConfigurationResponse> {
        self.call(ctx, "lookup_sync_configuration", &req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let client = HttpServiceClient::new(
            "directory",
            "http://localhost:9000/directory",
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(
            client.base_url.join("lookup_entities").unwrap().as_str(),
            "http://localhost:9000/directory/lookup_entities"
        );
    }

    #[test]
    fn test_error_for_status() {
        assert!(error_for_status(StatusCode::NOT_FOUND, String::new()).is_not_found());
        assert!(matches!(
            error_for_status(StatusCode::FORBIDDEN, String::new()),
            ServiceError::PermissionDenied(_)
        ));
        assert!(matches!(
            error_for_status(StatusCode::GONE, String::new()),
            ServiceError::Expired(_)
        ));
        assert!(matches!(
            error_for_status(StatusCode::BAD_GATEWAY, "upstream".to_string()),
            ServiceError::Unavailable(msg) if msg.contains("upstream")
        ));
    }
}
