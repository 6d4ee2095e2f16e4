use super::access::{service_error, ResourceKind};
use super::ResourceAccessor;
use crate::context::RequestContext;
use crate::error::{Error, Result};
use crate::policy::Policy;
use crate::services::care::*;
use crate::services::layout::*;
use crate::services::patientsync::*;
use std::collections::HashMap;

impl ResourceAccessor {
    /// Providers open visits on behalf of a patient entity
    pub async fn create_visit(
        &self,
        ctx: &RequestContext,
        req: CreateVisitRequest,
    ) -> Result<Visit> {
        Policy::Provider.check(ctx)?;
        self.can_access_resource(ctx, &req.entity_id, ResourceKind::Entity).await?;
        self.care
            .create_visit(ctx, req)
            .await
            .map_err(|e| service_error(ctx, "visit", e))?
            .visit
            .ok_or_else(|| Error::internal_msg(ctx, "care returned no visit on create"))
    }

    pub async fn visit(&self, ctx: &RequestContext, visit_id: &str) -> Result<Visit> {
        self.can_access_resource(ctx, visit_id, ResourceKind::Visit).await?;
        let what = format!("visit {}", visit_id);
        self.care
            .get_visit(
                ctx,
                GetVisitRequest {
                    id: visit_id.to_string(),
                },
            )
            .await
            .map_err(|e| service_error(ctx, &what, e))?
            .visit
            .ok_or_else(|| Error::not_found(ctx, &what))
    }

    pub async fn visits(
        &self,
        ctx: &RequestContext,
        entity_id: &str,
        submitted: Option<bool>,
    ) -> Result<Vec<Visit>> {
        self.can_access_resource(ctx, entity_id, ResourceKind::Entity).await?;
        let resp = self
            .care
            .get_visits(
                ctx,
                GetVisitsRequest {
                    entity_id: entity_id.to_string(),
                    submitted,
                },
            )
            .await
            .map_err(|e| service_error(ctx, &format!("visits for entity {}", entity_id), e))?;
        Ok(resp.visits)
    }

    pub async fn delete_visit(&self, ctx: &RequestContext, req: DeleteVisitRequest) -> Result<()> {
        self.can_access_resource(ctx, &req.visit_id, ResourceKind::Visit).await?;
        let visit_id = req.visit_id.clone();
        self.care
            .delete_visit(ctx, req)
            .await
            .map_err(|e| service_error(ctx, &format!("visit {}", visit_id), e))?;
        self.rmap.evict(&visit_id);
        Ok(())
    }

    pub async fn submit_visit(&self, ctx: &RequestContext, visit_id: &str) -> Result<Visit> {
        Policy::Patient.check(ctx)?;
        self.can_access_resource(ctx, visit_id, ResourceKind::Visit).await?;
        let what = format!("visit {}", visit_id);
        self.care
            .submit_visit(
                ctx,
                SubmitVisitRequest {
                    visit_id: visit_id.to_string(),
                },
            )
            .await
            .map_err(|e| service_error(ctx, &what, e))?
            .visit
            .ok_or_else(|| Error::not_found(ctx, &what))
    }

    pub async fn triage_visit(&self, ctx: &RequestContext, visit_id: &str) -> Result<Visit> {
        Policy::Patient.check(ctx)?;
        self.can_access_resource(ctx, visit_id, ResourceKind::Visit).await?;
        let what = format!("visit {}", visit_id);
        self.care
            .triage_visit(
                ctx,
                TriageVisitRequest {
                    visit_id: visit_id.to_string(),
                },
            )
            .await
            .map_err(|e| service_error(ctx, &what, e))?
            .visit
            .ok_or_else(|| Error::not_found(ctx, &what))
    }

    pub async fn create_visit_answers(
        &self,
        ctx: &RequestContext,
        req: CreateVisitAnswersRequest,
    ) -> Result<()> {
        Policy::Patient.check(ctx)?;
        self.can_access_resource(ctx, &req.visit_id, ResourceKind::Visit).await?;
        let what = format!("visit {}", req.visit_id);
        self.care
            .create_visit_answers(ctx, req)
            .await
            .map_err(|e| service_error(ctx, &what, e))?;
        Ok(())
    }

    pub async fn answers_for_visit(
        &self,
        ctx: &RequestContext,
        visit_id: &str,
        serialize_for_patient: bool,
    ) -> Result<HashMap<String, serde_json::Value>> {
        self.can_access_resource(ctx, visit_id, ResourceKind::Visit).await?;
        let resp = self
            .care
            .get_answers_for_visit(
                ctx,
                GetAnswersForVisitRequest {
                    visit_id: visit_id.to_string(),
                    serialize_for_patient,
                },
            )
            .await
            .map_err(|e| service_error(ctx, &format!("answers for visit {}", visit_id), e))?;
        Ok(resp.answers)
    }

    // Layouts are shared catalog data; any signed-in caller may read them.

    pub async fn visit_layout(&self, ctx: &RequestContext, id: &str) -> Result<VisitLayout> {
        Policy::Authenticated.check(ctx)?;
        let what = format!("visit layout {}", id);
        self.layout
            .get_visit_layout(ctx, GetVisitLayoutRequest { id: id.to_string() })
            .await
            .map_err(|e| service_error(ctx, &what, e))?
            .visit_layout
            .ok_or_else(|| Error::not_found(ctx, &what))
    }

    pub async fn visit_layout_by_version(
        &self,
        ctx: &RequestContext,
        version_id: &str,
    ) -> Result<VisitLayout> {
        Policy::Authenticated.check(ctx)?;
        let what = format!("visit layout for version {}", version_id);
        self.layout
            .get_visit_layout_by_version(
                ctx,
                GetVisitLayoutByVersionRequest {
                    visit_layout_version_id: version_id.to_string(),
                },
            )
            .await
            .map_err(|e| service_error(ctx, &what, e))?
            .visit_layout
            .ok_or_else(|| Error::not_found(ctx, &what))
    }

    pub async fn visit_layout_version(
        &self,
        ctx: &RequestContext,
        visit_layout_id: &str,
    ) -> Result<VisitLayoutVersion> {
        Policy::Authenticated.check(ctx)?;
        let what = format!("active version of visit layout {}", visit_layout_id);
        self.layout
            .get_visit_layout_version(
                ctx,
                GetVisitLayoutVersionRequest {
                    visit_layout_id: visit_layout_id.to_string(),
                },
            )
            .await
            .map_err(|e| service_error(ctx, &what, e))?
            .visit_layout_version
            .ok_or_else(|| Error::not_found(ctx, &what))
    }

    pub async fn configure_sync(
        &self,
        ctx: &RequestContext,
        req: ConfigureSyncRequest,
    ) -> Result<()> {
        Policy::Provider.check(ctx)?;
        self.can_access_resource(ctx, &req.organization_id, ResourceKind::Organization)
            .await?;
        self.patientsync
            .configure_sync(ctx, req)
            .await
            .map_err(|e| service_error(ctx, "sync configuration", e))?;
        Ok(())
    }

    pub async fn sync_configuration(
        &self,
        ctx: &RequestContext,
        organization_id: &str,
        source: SyncSource,
    ) -> Result<SyncConfiguration> {
        Policy::Provider.check(ctx)?;
        self.can_access_resource(ctx, organization_id, ResourceKind::Organization)
            .await?;
        let what = format!("sync configuration for organization {}", organization_id);
        self.patientsync
            .lookup_sync_configuration(
                ctx,
                LookupSyncConfigurationRequest {
                    organization_id: organization_id.to_string(),
                    source,
                },
            )
            .await
            .map_err(|e| service_error(ctx, &what, e))?
            .config
            .ok_or_else(|| Error::not_found(ctx, &what))
    }
}
