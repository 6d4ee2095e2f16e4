use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::services::threading::ScheduledMessageStatus;

/// Tag identifying an event variant; the dispatcher's registry key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    VisitSubmitted,
    TreatmentPlanActivated,
    RefillError,
    ScheduledMessageUpdated,
    MessagePosted,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::VisitSubmitted => "visit_submitted",
            EventKind::TreatmentPlanActivated => "treatment_plan_activated",
            EventKind::RefillError => "refill_error",
            EventKind::ScheduledMessageUpdated => "scheduled_message_updated",
            EventKind::MessagePosted => "message_posted",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitSubmitted {
    pub visit_id: String,
    pub entity_id: String,
    pub organization_id: String,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreatmentPlanActivated {
    pub treatment_plan_id: String,
    pub patient_entity_id: String,
    pub organization_id: String,
    pub thread_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefillError {
    pub treatment_plan_id: String,
    pub prescription_id: String,
    pub patient_entity_id: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledMessageUpdated {
    pub scheduled_message_id: String,
    pub thread_id: String,
    pub status: ScheduledMessageStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagePosted {
    pub thread_id: String,
    pub item_id: String,
    pub organization_id: String,
    pub actor_entity_id: String,
    pub summary: String,
    pub internal: bool,
}

/// Every value the dispatcher can deliver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "snake_case")]
pub enum Event {
    VisitSubmitted(VisitSubmitted),
    TreatmentPlanActivated(TreatmentPlanActivated),
    RefillError(RefillError),
    ScheduledMessageUpdated(ScheduledMessageUpdated),
    MessagePosted(MessagePosted),
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::VisitSubmitted(_) => EventKind::VisitSubmitted,
            Event::TreatmentPlanActivated(_) => EventKind::TreatmentPlanActivated,
            Event::RefillError(_) => EventKind::RefillError,
            Event::ScheduledMessageUpdated(_) => EventKind::ScheduledMessageUpdated,
            Event::MessagePosted(_) => EventKind::MessagePosted,
        }
    }
}

/// A payload type that typed subscribers can register for
pub trait EventPayload: Clone + Send + Sync + 'static {
    const KIND: EventKind;

    fn from_event(event: &Event) -> Option<&Self>;
}

macro_rules! event_payloads {
    ($($name:ident),* $(,)?) => {
        $(
            impl EventPayload for $name {
                const KIND: EventKind = EventKind::$name;

                fn from_event(event: &Event) -> Option<&Self> {
                    match event {
                        Event::$name(payload) => Some(payload),
                        _ => None,
                    }
                }
            }

            impl From<$name> for Event {
                fn from(payload: $name) -> Self {
                    Event::$name(payload)
                }
            }
        )*
    };
}

event_payloads!(
    VisitSubmitted,
    TreatmentPlanActivated,
    RefillError,
    ScheduledMessageUpdated,
    MessagePosted,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_matches_only_its_variant() {
        let event: Event = RefillError {
            treatment_plan_id: "tp_1".to_string(),
            prescription_id: "rx_1".to_string(),
            patient_entity_id: "e_1".to_string(),
            reason: "out of stock".to_string(),
        }
        .into();

        assert_eq!(event.kind(), EventKind::RefillError);
        assert!(RefillError::from_event(&event).is_some());
        assert!(MessagePosted::from_event(&event).is_none());
    }

    #[test]
    fn test_event_serializes_with_tag() {
        let event = Event::ScheduledMessageUpdated(ScheduledMessageUpdated {
            scheduled_message_id: "schm_1".to_string(),
            thread_id: "t_1".to_string(),
            status: ScheduledMessageStatus::Sent,
        });
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["event"], "scheduled_message_updated");
        assert_eq!(value["payload"]["status"], "sent");
    }
}
