use crate::models::ids::OfferId;
use crate::models::kinds::{NextStep, Sentiment};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Outbound notification handed to analytics / backend collaborators.
///
/// One value per user-visible event. Sinks consume these fire-and-forget;
/// nothing is returned to the emitting controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum InteractionEvent {
    OfferAccepted { offer_id: OfferId },
    OfferSkipped { offer_id: OfferId },
    AllOffersSkipped,
    RemindLaterRequested,
    FeedbackRecorded { sentiment: Sentiment },
    SurveyDeclined,
    SurveySubmitted { topics: Vec<String>, credit_cents: i32 },
    NextStepChosen { step: NextStep },
    TurnOffOffersRequested,
    ManageSettingsRequested,
    ChatRequested,
    TrackPackageRequested,
    ViewReceiptRequested,
}

impl InteractionEvent {
    /// Snake-case event name, identical to the serialized `event` tag
    pub fn name(&self) -> &'static str {
        match self {
            InteractionEvent::OfferAccepted { .. } => "offer_accepted",
            InteractionEvent::OfferSkipped { .. } => "offer_skipped",
            InteractionEvent::AllOffersSkipped => "all_offers_skipped",
            InteractionEvent::RemindLaterRequested => "remind_later_requested",
            InteractionEvent::FeedbackRecorded { .. } => "feedback_recorded",
            InteractionEvent::SurveyDeclined => "survey_declined",
            InteractionEvent::SurveySubmitted { .. } => "survey_submitted",
            InteractionEvent::NextStepChosen { .. } => "next_step_chosen",
            InteractionEvent::TurnOffOffersRequested => "turn_off_offers_requested",
            InteractionEvent::ManageSettingsRequested => "manage_settings_requested",
            InteractionEvent::ChatRequested => "chat_requested",
            InteractionEvent::TrackPackageRequested => "track_package_requested",
            InteractionEvent::ViewReceiptRequested => "view_receipt_requested",
        }
    }
}

/// An event as stored or forwarded by a sink
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: Uuid,
    pub occurred_at: DateTime<Utc>,
    /// Visitor session that emitted the event, when hosted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<Uuid>,
    #[serde(flatten)]
    pub event: InteractionEvent,
}

impl EventRecord {
    pub fn new(event: InteractionEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            session_id: None,
            event,
        }
    }

    pub fn with_session(mut self, session_id: Uuid) -> Self {
        self.session_id = Some(session_id);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_tag_matches_name() {
        let events = vec![
            InteractionEvent::OfferAccepted { offer_id: OfferId::new("AX-1") },
            InteractionEvent::AllOffersSkipped,
            InteractionEvent::FeedbackRecorded { sentiment: Sentiment::Great },
            InteractionEvent::NextStepChosen { step: NextStep::LeaveReview },
        ];

        for event in events {
            let json = serde_json::to_value(&event).unwrap();
            assert_eq!(json["event"], event.name());
        }
    }

    #[test]
    fn test_feedback_payload_shape() {
        let event = InteractionEvent::FeedbackRecorded { sentiment: Sentiment::Okay };
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json, serde_json::json!({ "event": "feedback_recorded", "sentiment": "okay" }));
    }

    #[test]
    fn test_record_flattens_event() {
        let record = EventRecord::new(InteractionEvent::OfferSkipped { offer_id: "setup-video".into() });
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["event"], "offer_skipped");
        assert_eq!(json["offer_id"], "setup-video");
        assert!(json["id"].is_string());
        assert!(json.get("session_id").is_none());
    }

    #[test]
    fn test_record_carries_session() {
        let session_id = Uuid::new_v4();
        let record = EventRecord::new(InteractionEvent::ChatRequested).with_session(session_id);
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["session_id"], session_id.to_string());

        let parsed: EventRecord = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.session_id, Some(session_id));
        assert_eq!(parsed.event, InteractionEvent::ChatRequested);
    }
}
