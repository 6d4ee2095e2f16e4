use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::ServiceResult;
use crate::context::RequestContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallInitiationType {
    /// The service dials both parties
    #[default]
    Connect,
    /// The caller dials a proxy number
    ReturnPhoneNumber,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InitiatePhoneCallRequest {
    pub caller_entity_id: String,
    pub organization_id: String,
    pub source_phone_number: String,
    pub destination_phone_number: String,
    pub call_initiation_type: CallInitiationType,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InitiatePhoneCallResponse {
    pub proxy_phone_number: String,
    pub originating_phone_number: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IpCallType {
    #[default]
    Video,
    Audio,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IpCallState {
    #[default]
    Pending,
    Accepted,
    Declined,
    Connected,
    Failed,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IpCallRole {
    #[default]
    Caller,
    Recipient,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpCallParticipant {
    pub account_id: String,
    pub entity_id: String,
    pub identity: String,
    pub role: IpCallRole,
    pub state: IpCallState,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpCall {
    pub id: String,
    pub call_type: IpCallType,
    pub pending: bool,
    pub token: String,
    pub participants: Vec<IpCallParticipant>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InitiateIpCallRequest {
    pub call_type: IpCallType,
    pub caller_entity_id: String,
    pub recipient_entity_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IpCallResponse {
    pub call: Option<IpCall>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IpCallRequest {
    pub ip_call_id: String,
    pub account_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PendingIpCallsRequest {
    pub account_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PendingIpCallsResponse {
    pub calls: Vec<IpCall>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateIpCallRequest {
    pub ip_call_id: String,
    pub account_id: String,
    pub state: IpCallState,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProvisionEmailAddressRequest {
    pub email_address: String,
    pub provision_for: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProvisionEmailAddressResponse {
    pub email_address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum PhoneNumberSelector {
    AreaCode(String),
    PhoneNumber(String),
}

impl Default for PhoneNumberSelector {
    fn default() -> Self {
        PhoneNumberSelector::AreaCode(String::new())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProvisionPhoneNumberRequest {
    pub uuid: String,
    pub provision_for: String,
    pub number: PhoneNumberSelector,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProvisionPhoneNumberResponse {
    pub phone_number: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    #[default]
    Sms,
    Email,
    Voice,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub uuid: String,
    pub channel: Channel,
    pub from_channel_id: String,
    pub to_channel_id: String,
    pub subject: String,
    pub text: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SendMessageResponse {}

#[async_trait]
pub trait ExCommsClient: Send + Sync {
    async fn initiate_phone_call(
        &self,
        ctx: &RequestContext,
        req: InitiatePhoneCallRequest,
    ) -> ServiceResult<InitiatePhoneCallResponse>;

    async fn initiate_ip_call(
        &self,
        ctx: &RequestContext,
        req: InitiateIpCallRequest,
    ) -> ServiceResult<IpCallResponse>;

    async fn ip_call(&self, ctx: &RequestContext, req: IpCallRequest)
        -> ServiceResult<IpCallResponse>;

    async fn pending_ip_calls(
        &self,
        ctx: &RequestContext,
        req: PendingIpCallsRequest,
    ) -> ServiceResult<PendingIpCallsResponse>;

    async fn update_ip_call(
        &self,
        ctx: &RequestContext,
        req: UpdateIpCallRequest,
    ) -> ServiceResult<IpCallResponse>;

    async fn provision_email_address(
        &self,
        ctx: &RequestContext,
        req: ProvisionEmailAddressRequest,
    ) -> ServiceResult<ProvisionEmailAddressResponse>;

    async fn provision_phone_number(
        &self,
        ctx: &RequestContext,
        req: ProvisionPhoneNumberRequest,
    ) -> ServiceResult<ProvisionPhoneNumberResponse>;

    async fn send_message(
        &self,
        ctx: &RequestContext,
        req: SendMessageRequest,
    ) -> ServiceResult<SendMessageResponse>;
}
