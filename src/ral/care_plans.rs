use super::access::{service_error, ResourceKind};
use super::ResourceAccessor;
use crate::context::RequestContext;
use crate::error::{Error, Result};
use crate::policy::Policy;
use crate::services::care::*;
use crate::services::threading::{
    SAVED_MESSAGE_ID_PREFIX, SCHEDULED_MESSAGE_ID_PREFIX, THREAD_ITEM_ID_PREFIX,
};

impl ResourceAccessor {
    pub async fn care_plan(&self, ctx: &RequestContext, care_plan_id: &str) -> Result<CarePlan> {
        let care_plan = self.lookup_care_plan(ctx, care_plan_id).await?;
        self.can_access_care_plan(ctx, &care_plan).await?;
        Ok(care_plan)
    }

    /// The calling provider is always recorded as the creator
    pub async fn create_care_plan(
        &self,
        ctx: &RequestContext,
        mut req: CreateCarePlanRequest,
    ) -> Result<CarePlan> {
        let account = Policy::Provider.check(ctx)?;
        req.creator_id = account.id.clone();
        self.care
            .create_care_plan(ctx, req)
            .await
            .map_err(|e| service_error(ctx, "care plan", e))?
            .care_plan
            .ok_or_else(|| Error::internal_msg(ctx, "care returned no care plan on create"))
    }

    /// Attach a draft plan to the thread item, saved message or scheduled
    /// message it was sent with. The caller needs access to both.
    pub async fn submit_care_plan(
        &self,
        ctx: &RequestContext,
        care_plan_id: &str,
        parent_id: &str,
    ) -> Result<CarePlan> {
        let care_plan = self.lookup_care_plan(ctx, care_plan_id).await?;
        self.can_access_care_plan(ctx, &care_plan).await?;
        if care_plan.is_submitted() {
            return Err(Error::not_supported(ctx, "This care plan has already been submitted."));
        }
        if parent_id.is_empty() {
            return Err(Error::not_supported(
                ctx,
                "A care plan must be submitted with a message.",
            ));
        }
        self.can_access_care_plan_parent(ctx, care_plan_id, parent_id)
            .await?;

        let what = format!("care plan {}", care_plan_id);
        self.care
            .submit_care_plan(
                ctx,
                SubmitCarePlanRequest {
                    id: care_plan_id.to_string(),
                    parent_id: parent_id.to_string(),
                },
            )
            .await
            .map_err(|e| service_error(ctx, &what, e))?
            .care_plan
            .ok_or_else(|| Error::not_found(ctx, &what))
    }

    pub async fn update_care_plan(
        &self,
        ctx: &RequestContext,
        req: UpdateCarePlanRequest,
    ) -> Result<CarePlan> {
        let care_plan = self.lookup_care_plan(ctx, &req.id).await?;
        self.can_access_care_plan(ctx, &care_plan).await?;
        let what = format!("care plan {}", req.id);
        self.care
            .update_care_plan(ctx, req)
            .await
            .map_err(|e| service_error(ctx, &what, e))?
            .care_plan
            .ok_or_else(|| Error::not_found(ctx, &what))
    }

    async fn lookup_care_plan(&self, ctx: &RequestContext, care_plan_id: &str) -> Result<CarePlan> {
        let what = format!("care plan {}", care_plan_id);
        self.care
            .care_plan(
                ctx,
                CarePlanRequest {
                    id: care_plan_id.to_string(),
                },
            )
            .await
            .map_err(|e| service_error(ctx, &what, e))?
            .care_plan
            .ok_or_else(|| Error::not_found(ctx, &what))
    }

    /// A draft is visible to its creator only. Once submitted, access
    /// follows the parent the plan was sent with.
    async fn can_access_care_plan(&self, ctx: &RequestContext, care_plan: &CarePlan) -> Result<()> {
        if !care_plan.is_submitted() {
            let account = ctx.account().ok_or_else(|| Error::not_authenticated(ctx))?;
            if account.id != care_plan.creator_id {
                return Err(Error::not_authorized(ctx, &care_plan.id));
            }
            return Ok(());
        }
        self.can_access_care_plan_parent(ctx, &care_plan.id, &care_plan.parent_id)
            .await
    }

    async fn can_access_care_plan_parent(
        &self,
        ctx: &RequestContext,
        care_plan_id: &str,
        parent_id: &str,
    ) -> Result<()> {
        if parent_id.starts_with(THREAD_ITEM_ID_PREFIX) {
            self.can_access_resource(ctx, parent_id, ResourceKind::ThreadItem)
                .await
        } else if parent_id.starts_with(SAVED_MESSAGE_ID_PREFIX) {
            let saved = self.lookup_saved_message(ctx, parent_id).await?;
            self.can_access_resource(ctx, &saved.organization_id, ResourceKind::Organization)
                .await
        } else if parent_id.starts_with(SCHEDULED_MESSAGE_ID_PREFIX) {
            let scheduled = self.lookup_scheduled_message(ctx, parent_id).await?;
            self.can_post_message(ctx, &scheduled.thread_id).await
        } else {
            Err(Error::internal_msg(
                ctx,
                format!(
                    "Unknown parent id type '{}' for care plan {}",
                    parent_id, care_plan_id
                ),
            ))
        }
    }
}
