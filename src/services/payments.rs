use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::ServiceResult;
use crate::context::RequestContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VendorAccountType {
    #[default]
    Stripe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VendorAccountLifecycle {
    #[default]
    Connected,
    Disconnected,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorAccount {
    pub id: String,
    pub entity_id: String,
    pub account_type: VendorAccountType,
    pub lifecycle: VendorAccountLifecycle,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConnectVendorAccountRequest {
    pub entity_id: String,
    pub vendor_account_type: VendorAccountType,
    pub stripe_code: String,
    pub stripe_scope: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConnectVendorAccountResponse {
    pub vendor_accounts: Vec<VendorAccount>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethodType {
    #[default]
    Card,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub id: String,
    pub customer_entity_id: String,
    pub method_type: PaymentMethodType,
    pub brand: String,
    pub last_four: String,
    pub default: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatePaymentMethodRequest {
    pub customer_entity_id: String,
    pub method_type: PaymentMethodType,
    pub token: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentMethodsResponse {
    pub payment_methods: Vec<PaymentMethod>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentMethodsRequest {
    pub customer_entity_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentMethodRequest {
    pub payment_method_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentMethodResponse {
    pub payment_method: Option<PaymentMethod>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeletePaymentMethodRequest {
    pub payment_method_id: String,
}

#[async_trait]
pub trait PaymentsClient: Send + Sync {
    async fn connect_vendor_account(
        &self,
        ctx: &RequestContext,
        req: ConnectVendorAccountRequest,
    ) -> ServiceResult<ConnectVendorAccountResponse>;

    async fn create_payment_method(
        &self,
        ctx: &RequestContext,
        req: CreatePaymentMethodRequest,
    ) -> ServiceResult<PaymentMethodsResponse>;

    async fn payment_methods(
        &self,
        ctx: &RequestContext,
        req: PaymentMethodsRequest,
    ) -> ServiceResult<PaymentMethodsResponse>;

    async fn payment_method(
        &self,
        ctx: &RequestContext,
        req: PaymentMethodRequest,
    ) -> ServiceResult<PaymentMethodResponse>;

    async fn delete_payment_method(
        &self,
        ctx: &RequestContext,
        req: DeletePaymentMethodRequest,
    ) -> ServiceResult<PaymentMethodsResponse>;
}
