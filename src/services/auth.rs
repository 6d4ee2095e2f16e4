use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::ServiceResult;
use crate::context::{Platform, RequestContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    #[default]
    Unknown,
    Patient,
    Provider,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountRole {
    #[default]
    Unknown,
    Patient,
    Doctor,
    CareCoordinator,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub account_type: AccountType,
    pub role: AccountRole,
    /// Opaque claims issued by the auth service
    #[serde(default)]
    pub claims: BTreeMap<String, String>,
}

impl Account {
    pub fn is_provider(&self) -> bool {
        self.account_type == AccountType::Provider
    }

    pub fn is_patient(&self) -> bool {
        self.account_type == AccountType::Patient
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenDuration {
    #[default]
    Short,
    Medium,
    Long,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthToken {
    pub value: String,
    pub expiration_epoch: u64,
    pub client_encryption_key: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationCodeType {
    #[default]
    Phone,
    Email,
    AccountInvite,
    PasswordReset,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthenticateLoginRequest {
    pub email: String,
    pub password: String,
    pub token_duration: TokenDuration,
    pub device_id: String,
    pub platform: Platform,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthenticateLoginResponse {
    pub account: Option<Account>,
    pub token: Option<AuthToken>,
    pub two_factor_required: bool,
    pub two_factor_phone_number: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthenticateLoginWithCodeRequest {
    pub token: String,
    pub code: String,
    pub token_duration: TokenDuration,
    pub device_id: String,
    pub platform: Platform,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthenticateLoginWithCodeResponse {
    pub account: Option<Account>,
    pub token: Option<AuthToken>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckAuthenticationRequest {
    pub token: String,
    pub refresh: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckAuthenticationResponse {
    pub is_authenticated: bool,
    pub account: Option<Account>,
    pub token: Option<AuthToken>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckPasswordResetTokenRequest {
    pub token: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckPasswordResetTokenResponse {
    pub account_id: String,
    pub account_phone_number: String,
    pub account_email: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckVerificationCodeRequest {
    pub token: String,
    pub code: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckVerificationCodeResponse {
    pub value: String,
    pub account: Option<Account>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateAccountRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub password: String,
    pub account_type: AccountType,
    pub device_id: String,
    pub platform: Platform,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateAccountResponse {
    pub account: Option<Account>,
    pub token: Option<AuthToken>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatePasswordResetTokenRequest {
    pub email: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatePasswordResetTokenResponse {
    pub token: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateVerificationCodeRequest {
    pub code_type: VerificationCodeType,
    pub value_to_verify: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateVerificationCodeResponse {
    pub token: String,
    pub code: String,
    pub expiration_epoch: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GetAccountRequest {
    pub account_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GetAccountResponse {
    pub account: Option<Account>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UnauthenticateRequest {
    pub token: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UnauthenticateResponse {}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePasswordRequest {
    pub token: String,
    pub code: String,
    pub new_password: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePasswordResponse {}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerifiedValueRequest {
    pub token: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerifiedValueResponse {
    pub value: String,
}

#[async_trait]
pub trait AuthClient: Send + Sync {
    async fn authenticate_login(
        &self,
        ctx: &RequestContext,
        req: AuthenticateLoginRequest,
    ) -> ServiceResult<AuthenticateLoginResponse>;

    async fn authenticate_login_with_code(
        &self,
        ctx: &RequestContext,
        req: AuthenticateLoginWithCodeRequest,
    ) -> ServiceResult<AuthenticateLoginWithCodeResponse>;

    async fn check_authentication(
        &self,
        ctx: &RequestContext,
        req: CheckAuthenticationRequest,
    ) -> ServiceResult<CheckAuthenticationResponse>;

    async fn check_password_reset_token(
        &self,
        ctx: &RequestContext,
        req: CheckPasswordResetTokenRequest,
    ) -> ServiceResult<CheckPasswordResetTokenResponse>;

    async fn check_verification_code(
        &self,
        ctx: &RequestContext,
        req: CheckVerificationCodeRequest,
    ) -> ServiceResult<CheckVerificationCodeResponse>;

    async fn create_account(
        &self,
        ctx: &RequestContext,
        req: CreateAccountRequest,
    ) -> ServiceResult<CreateAccountResponse>;

    async fn create_password_reset_token(
        &self,
        ctx: &RequestContext,
        req: CreatePasswordResetTokenRequest,
    ) -> ServiceResult<CreatePasswordResetTokenResponse>;

    async fn create_verification_code(
        &self,
        ctx: &RequestContext,
        req: CreateVerificationCodeRequest,
    ) -> ServiceResult<CreateVerificationCodeResponse>;

    async fn get_account(
        &self,
        ctx: &RequestContext,
        req: GetAccountRequest,
    ) -> ServiceResult<GetAccountResponse>;

    async fn unauthenticate(
        &self,
        ctx: &RequestContext,
        req: UnauthenticateRequest,
    ) -> ServiceResult<UnauthenticateResponse>;

    async fn update_password(
        &self,
        ctx: &RequestContext,
        req: UpdatePasswordRequest,
    ) -> ServiceResult<UpdatePasswordResponse>;

    async fn verified_value(
        &self,
        ctx: &RequestContext,
        req: VerifiedValueRequest,
    ) -> ServiceResult<VerifiedValueResponse>;
}
