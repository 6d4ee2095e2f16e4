use super::access::{service_error, ResourceKind};
use super::ResourceAccessor;
use crate::context::RequestContext;
use crate::error::{Error, Result};
use crate::services::excomms::*;

impl ResourceAccessor {
    // Caller entity and organization are checked separately; this does not
    // assert the caller *is* the entity.
    pub async fn initiate_phone_call(
        &self,
        ctx: &RequestContext,
        req: InitiatePhoneCallRequest,
    ) -> Result<InitiatePhoneCallResponse> {
        self.can_access_resource(ctx, &req.caller_entity_id, ResourceKind::Entity)
            .await?;
        self.can_access_resource(ctx, &req.organization_id, ResourceKind::Organization)
            .await?;
        self.excomms
            .initiate_phone_call(ctx, req)
            .await
            .map_err(|e| service_error(ctx, "phone call", e))
    }

    pub async fn initiate_ip_call(
        &self,
        ctx: &RequestContext,
        req: InitiateIpCallRequest,
    ) -> Result<IpCall> {
        self.assert_is_entity(ctx, &req.caller_entity_id).await?;
        for recipient in &req.recipient_entity_ids {
            self.can_access_resource(ctx, recipient, ResourceKind::Entity).await?;
        }
        self.excomms
            .initiate_ip_call(ctx, req)
            .await
            .map_err(|e| service_error(ctx, "ip call", e))?
            .call
            .ok_or_else(|| Error::internal_msg(ctx, "excomms returned no call on initiate"))
    }

    /// Participation is enforced by excomms using the caller's account id
    pub async fn ip_call(&self, ctx: &RequestContext, ip_call_id: &str) -> Result<IpCall> {
        let account = ctx.account().ok_or_else(|| Error::not_authenticated(ctx))?;
        let what = format!("ip call {}", ip_call_id);
        self.excomms
            .ip_call(
                ctx,
                IpCallRequest {
                    ip_call_id: ip_call_id.to_string(),
                    account_id: account.id.clone(),
                },
            )
            .await
            .map_err(|e| service_error(ctx, &what, e))?
            .call
            .ok_or_else(|| Error::not_found(ctx, &what))
    }

    pub async fn pending_ip_calls(&self, ctx: &RequestContext) -> Result<Vec<IpCall>> {
        let account = ctx.account().ok_or_else(|| Error::not_authenticated(ctx))?;
        let resp = self
            .excomms
            .pending_ip_calls(
                ctx,
                PendingIpCallsRequest {
                    account_id: account.id.clone(),
                },
            )
            .await
            .map_err(|e| service_error(ctx, "pending ip calls", e))?;
        Ok(resp.calls)
    }

    pub async fn update_ip_call(
        &self,
        ctx: &RequestContext,
        req: UpdateIpCallRequest,
    ) -> Result<IpCall> {
        self.can_access_account(ctx, &req.account_id)?;
        let what = format!("ip call {}", req.ip_call_id);
        self.excomms
            .update_ip_call(ctx, req)
            .await
            .map_err(|e| service_error(ctx, &what, e))?
            .call
            .ok_or_else(|| Error::not_found(ctx, &what))
    }

    pub async fn provision_email_address(
        &self,
        ctx: &RequestContext,
        req: ProvisionEmailAddressRequest,
    ) -> Result<ProvisionEmailAddressResponse> {
        self.can_access_resource(ctx, &req.provision_for, ResourceKind::Entity)
            .await?;
        self.excomms
            .provision_email_address(ctx, req)
            .await
            .map_err(|e| service_error(ctx, "email address", e))
    }

    pub async fn provision_phone_number(
        &self,
        ctx: &RequestContext,
        req: ProvisionPhoneNumberRequest,
    ) -> Result<ProvisionPhoneNumberResponse> {
        self.can_access_resource(ctx, &req.provision_for, ResourceKind::Entity)
            .await?;
        self.excomms
            .provision_phone_number(ctx, req)
            .await
            .map_err(|e| service_error(ctx, "phone number", e))
    }

    /// Inbound message relay; not authorized
    pub async fn send_message(&self, ctx: &RequestContext, req: SendMessageRequest) -> Result<()> {
        self.excomms
            .send_message(ctx, req)
            .await
            .map_err(|e| service_error(ctx, "message", e))?;
        Ok(())
    }
}
