use super::access::service_error;
use super::ResourceAccessor;
use crate::context::{DeviceHeaders, RequestContext};
use crate::error::{Error, Result};
use crate::services::auth::*;

impl ResourceAccessor {
    pub async fn account(&self, ctx: &RequestContext, account_id: &str) -> Result<Account> {
        self.can_access_account(ctx, account_id)?;
        self.auth
            .get_account(
                ctx,
                GetAccountRequest {
                    account_id: account_id.to_string(),
                },
            )
            .await
            .map_err(|e| service_error(ctx, &format!("account {}", account_id), e))?
            .account
            .ok_or_else(|| Error::not_found(ctx, &format!("account {}", account_id)))
    }

    // Login, account creation and the password/verification flows are open
    // to unauthenticated callers. The auth service enforces its own rules.

    pub async fn authenticate_login(
        &self,
        ctx: &RequestContext,
        email: &str,
        password: &str,
        duration: TokenDuration,
    ) -> Result<AuthenticateLoginResponse> {
        let device = ctx.device();
        self.auth
            .authenticate_login(
                ctx,
                AuthenticateLoginRequest {
                    email: email.to_string(),
                    password: password.to_string(),
                    token_duration: duration,
                    device_id: device.map(|d| d.device_id.clone()).unwrap_or_default(),
                    platform: DeviceHeaders::auth_platform(device),
                },
            )
            .await
            .map_err(|e| service_error(ctx, "login", e))
    }

    pub async fn authenticate_login_with_code(
        &self,
        ctx: &RequestContext,
        token: &str,
        code: &str,
        duration: TokenDuration,
    ) -> Result<AuthenticateLoginWithCodeResponse> {
        let device = ctx.device();
        self.auth
            .authenticate_login_with_code(
                ctx,
                AuthenticateLoginWithCodeRequest {
                    token: token.to_string(),
                    code: code.to_string(),
                    token_duration: duration,
                    device_id: device.map(|d| d.device_id.clone()).unwrap_or_default(),
                    platform: DeviceHeaders::auth_platform(device),
                },
            )
            .await
            .map_err(|e| service_error(ctx, "verification code", e))
    }

    /// Resolve a bearer token to an account. Used by the ingress middleware
    /// before any account is on the context.
    pub async fn check_authentication(
        &self,
        ctx: &RequestContext,
        token: &str,
    ) -> Result<CheckAuthenticationResponse> {
        self.auth
            .check_authentication(
                ctx,
                CheckAuthenticationRequest {
                    token: token.to_string(),
                    refresh: false,
                },
            )
            .await
            .map_err(|e| service_error(ctx, "auth token", e))
    }

    pub async fn check_password_reset_token(
        &self,
        ctx: &RequestContext,
        token: &str,
    ) -> Result<CheckPasswordResetTokenResponse> {
        self.auth
            .check_password_reset_token(
                ctx,
                CheckPasswordResetTokenRequest {
                    token: token.to_string(),
                },
            )
            .await
            .map_err(|e| service_error(ctx, "password reset token", e))
    }

    pub async fn check_verification_code(
        &self,
        ctx: &RequestContext,
        token: &str,
        code: &str,
    ) -> Result<CheckVerificationCodeResponse> {
        self.auth
            .check_verification_code(
                ctx,
                CheckVerificationCodeRequest {
                    token: token.to_string(),
                    code: code.to_string(),
                },
            )
            .await
            .map_err(|e| service_error(ctx, "verification code", e))
    }

    pub async fn create_account(
        &self,
        ctx: &RequestContext,
        mut req: CreateAccountRequest,
    ) -> Result<CreateAccountResponse> {
        let device = ctx.device();
        req.device_id = device.map(|d| d.device_id.clone()).unwrap_or_default();
        req.platform = DeviceHeaders::auth_platform(device);

        self.auth
            .create_account(ctx, req)
            .await
            .map_err(|e| service_error(ctx, "account", e))
    }

    pub async fn create_password_reset_token(
        &self,
        ctx: &RequestContext,
        email: &str,
    ) -> Result<CreatePasswordResetTokenResponse> {
        self.auth
            .create_password_reset_token(
                ctx,
                CreatePasswordResetTokenRequest {
                    email: email.to_string(),
                },
            )
            .await
            .map_err(|e| service_error(ctx, &format!("account for {}", email), e))
    }

    pub async fn create_verification_code(
        &self,
        ctx: &RequestContext,
        code_type: VerificationCodeType,
        value_to_verify: &str,
    ) -> Result<CreateVerificationCodeResponse> {
        self.auth
            .create_verification_code(
                ctx,
                CreateVerificationCodeRequest {
                    code_type,
                    value_to_verify: value_to_verify.to_string(),
                },
            )
            .await
            .map_err(|e| service_error(ctx, "verification code", e))
    }

    pub async fn unauthenticate(&self, ctx: &RequestContext, token: &str) -> Result<()> {
        self.auth
            .unauthenticate(
                ctx,
                UnauthenticateRequest {
                    token: token.to_string(),
                },
            )
            .await
            .map_err(|e| service_error(ctx, "auth token", e))?;
        Ok(())
    }

    pub async fn update_password(
        &self,
        ctx: &RequestContext,
        token: &str,
        code: &str,
        new_password: &str,
    ) -> Result<()> {
        self.auth
            .update_password(
                ctx,
                UpdatePasswordRequest {
                    token: token.to_string(),
                    code: code.to_string(),
                    new_password: new_password.to_string(),
                },
            )
            .await
            .map_err(|e| service_error(ctx, "password reset token", e))?;
        Ok(())
    }

    pub async fn verified_value(&self, ctx: &RequestContext, token: &str) -> Result<String> {
        let resp = self
            .auth
            .verified_value(
                ctx,
                VerifiedValueRequest {
                    token: token.to_string(),
                },
            )
            .await
            .map_err(|e| service_error(ctx, "verification token", e))?;
        Ok(resp.value)
    }
}
