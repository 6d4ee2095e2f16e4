use super::access::{service_error, ResourceKind};
use super::ResourceAccessor;
use crate::context::RequestContext;
use crate::error::{Error, Result};
use crate::policy::Policy;
use crate::services::payments::*;

impl ResourceAccessor {
    /// Link a practice's Stripe account. Providers only.
    pub async fn connect_vendor_account(
        &self,
        ctx: &RequestContext,
        req: ConnectVendorAccountRequest,
    ) -> Result<Vec<VendorAccount>> {
        Policy::Provider.check(ctx)?;
        self.can_access_resource(ctx, &req.entity_id, ResourceKind::Entity).await?;
        let resp = self
            .payments
            .connect_vendor_account(ctx, req)
            .await
            .map_err(|e| service_error(ctx, "vendor account", e))?;
        Ok(resp.vendor_accounts)
    }

    pub async fn create_payment_method(
        &self,
        ctx: &RequestContext,
        req: CreatePaymentMethodRequest,
    ) -> Result<Vec<PaymentMethod>> {
        self.can_access_resource(ctx, &req.customer_entity_id, ResourceKind::Entity)
            .await?;
        let resp = self
            .payments
            .create_payment_method(ctx, req)
            .await
            .map_err(|e| service_error(ctx, "payment method", e))?;
        Ok(resp.payment_methods)
    }

    pub async fn payment_methods(
        &self,
        ctx: &RequestContext,
        customer_entity_id: &str,
    ) -> Result<Vec<PaymentMethod>> {
        self.can_access_resource(ctx, customer_entity_id, ResourceKind::Entity)
            .await?;
        let resp = self
            .payments
            .payment_methods(
                ctx,
                PaymentMethodsRequest {
                    customer_entity_id: customer_entity_id.to_string(),
                },
            )
            .await
            .map_err(|e| {
                service_error(ctx, &format!("payment methods for {}", customer_entity_id), e)
            })?;
        Ok(resp.payment_methods)
    }

    pub async fn payment_method(
        &self,
        ctx: &RequestContext,
        payment_method_id: &str,
    ) -> Result<PaymentMethod> {
        let what = format!("payment method {}", payment_method_id);
        let method = self
            .payments
            .payment_method(
                ctx,
                PaymentMethodRequest {
                    payment_method_id: payment_method_id.to_string(),
                },
            )
            .await
            .map_err(|e| service_error(ctx, &what, e))?
            .payment_method
            .ok_or_else(|| Error::not_found(ctx, &what))?;
        self.can_access_resource(ctx, &method.customer_entity_id, ResourceKind::Entity)
            .await?;
        Ok(method)
    }

    /// Returns the customer's remaining payment methods
    pub async fn delete_payment_method(
        &self,
        ctx: &RequestContext,
        payment_method_id: &str,
    ) -> Result<Vec<PaymentMethod>> {
        self.payment_method(ctx, payment_method_id).await?;
        let resp = self
            .payments
            .delete_payment_method(
                ctx,
                DeletePaymentMethodRequest {
                    payment_method_id: payment_method_id.to_string(),
                },
            )
            .await
            .map_err(|e| service_error(ctx, &format!("payment method {}", payment_method_id), e))?;
        Ok(resp.payment_methods)
    }
}
