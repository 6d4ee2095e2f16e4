use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::ServiceResult;
use crate::context::RequestContext;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visit {
    pub id: String,
    pub name: String,
    pub layout_version_id: String,
    pub entity_id: String,
    pub organization_id: String,
    pub creator_id: String,
    pub submitted: bool,
    pub triaged: bool,
    pub submitted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateVisitRequest {
    pub layout_version_id: String,
    pub name: String,
    pub entity_id: String,
    pub organization_id: String,
    pub creator_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VisitResponse {
    pub visit: Option<Visit>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GetVisitRequest {
    pub id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GetVisitsRequest {
    pub entity_id: String,
    pub submitted: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GetVisitsResponse {
    pub visits: Vec<Visit>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteVisitRequest {
    pub visit_id: String,
    pub actor_entity_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteVisitResponse {}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmitVisitRequest {
    pub visit_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TriageVisitRequest {
    pub visit_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateVisitAnswersRequest {
    pub visit_id: String,
    pub actor_entity_id: String,
    /// Answers keyed by question id, as submitted by the client
    pub answers_json: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateVisitAnswersResponse {}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GetAnswersForVisitRequest {
    pub visit_id: String,
    pub serialize_for_patient: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GetAnswersForVisitResponse {
    pub answers: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreatmentAvailability {
    #[default]
    Unknown,
    Otc,
    Rx,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarePlanTreatment {
    pub name: String,
    pub availability: TreatmentAvailability,
    pub e_prescribe: bool,
    pub medication_id: String,
    pub dosage: String,
    pub route: String,
    pub form: String,
    pub dispense_type: String,
    pub dispense_number: u32,
    pub refills: u32,
    pub substitutions_allowed: bool,
    pub days_supply: u32,
    pub sig: String,
    pub pharmacy_id: String,
    pub pharmacy_instructions: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarePlanInstruction {
    pub title: String,
    pub steps: Vec<String>,
}

/// A treatment plan drafted by a provider. It has no parent until it is
/// submitted as part of a thread item, saved message or scheduled message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarePlan {
    pub id: String,
    pub name: String,
    pub creator_id: String,
    #[serde(default)]
    pub parent_id: String,
    pub submitted: bool,
    pub submitted_at: Option<DateTime<Utc>>,
    pub treatments: Vec<CarePlanTreatment>,
    pub instructions: Vec<CarePlanInstruction>,
}

impl CarePlan {
    pub fn is_submitted(&self) -> bool {
        !self.parent_id.is_empty()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CarePlanRequest {
    pub id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CarePlanResponse {
    pub care_plan: Option<CarePlan>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateCarePlanRequest {
    pub name: String,
    pub creator_id: String,
    pub treatments: Vec<CarePlanTreatment>,
    pub instructions: Vec<CarePlanInstruction>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmitCarePlanRequest {
    pub id: String,
    pub parent_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCarePlanRequest {
    pub id: String,
    pub name: Option<String>,
    pub treatments: Option<Vec<CarePlanTreatment>>,
    pub instructions: Option<Vec<CarePlanInstruction>>,
}

#[async_trait]
pub trait CareClient: Send + Sync {
    async fn create_visit(
        &self,
        ctx: &RequestContext,
        req: CreateVisitRequest,
    ) -> ServiceResult<VisitResponse>;

    async fn get_visit(&self, ctx: &RequestContext, req: GetVisitRequest)
        -> ServiceResult<VisitResponse>;

    async fn get_visits(
        &self,
        ctx: &RequestContext,
        req: GetVisitsRequest,
    ) -> ServiceResult<GetVisitsResponse>;

    async fn delete_visit(
        &self,
        ctx: &RequestContext,
        req: DeleteVisitRequest,
    ) -> ServiceResult<DeleteVisitResponse>;

    async fn submit_visit(
        &self,
        ctx: &RequestContext,
        req: SubmitVisitRequest,
    ) -> ServiceResult<VisitResponse>;

    async fn triage_visit(
        &self,
        ctx: &RequestContext,
        req: TriageVisitRequest,
    ) -> ServiceResult<VisitResponse>;

    async fn create_visit_answers(
        &self,
        ctx: &RequestContext,
        req: CreateVisitAnswersRequest,
    ) -> ServiceResult<CreateVisitAnswersResponse>;

    async fn get_answers_for_visit(
        &self,
        ctx: &RequestContext,
        req: GetAnswersForVisitRequest,
    ) -> ServiceResult<GetAnswersForVisitResponse>;

    async fn care_plan(
        &self,
        ctx: &RequestContext,
        req: CarePlanRequest,
    ) -> ServiceResult<CarePlanResponse>;

    async fn create_care_plan(
        &self,
        ctx: &RequestContext,
        req: CreateCarePlanRequest,
    ) -> ServiceResult<CarePlanResponse>;

    async fn submit_care_plan(
        &self,
        ctx: &RequestContext,
        req: SubmitCarePlanRequest,
    ) -> ServiceResult<CarePlanResponse>;

    async fn update_care_plan(
        &self,
        ctx: &RequestContext,
        req: UpdateCarePlanRequest,
    ) -> ServiceResult<CarePlanResponse>;
}
