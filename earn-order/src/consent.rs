use earn_core::{EventSink, Transition};
use earn_shared::InteractionEvent;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// "Manage Preferences" footer.
///
/// Holds only the expand/collapse flag; the preference changes themselves
/// belong to the external settings service.
pub struct ConsentFooter {
    expanded: bool,
    sink: Arc<dyn EventSink>,
}

impl ConsentFooter {
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self { expanded: false, sink }
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn toggle(&mut self) -> Transition {
        self.expanded = !self.expanded;
        Transition::Applied
    }

    /// Only reachable from the expanded panel
    pub fn turn_off_offers(&mut self) -> Transition {
        self.from_panel(InteractionEvent::TurnOffOffersRequested)
    }

    /// Only reachable from the expanded panel
    pub fn manage_settings(&mut self) -> Transition {
        self.from_panel(InteractionEvent::ManageSettingsRequested)
    }

    pub fn chat(&mut self) -> Transition {
        info!("Chat requested from footer");
        self.sink.notify(InteractionEvent::ChatRequested);
        Transition::Applied
    }

    pub fn snapshot(&self) -> ConsentSnapshot {
        ConsentSnapshot { expanded: self.expanded }
    }

    fn from_panel(&mut self, event: InteractionEvent) -> Transition {
        if !self.expanded {
            debug!(event = event.name(), "Ignoring preference action on collapsed footer");
            return Transition::Ignored;
        }
        info!(event = event.name(), "Preference action requested");
        self.sink.notify(event);
        Transition::Applied
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ConsentSnapshot {
    pub expanded: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use earn_core::RecordingSink;

    #[test]
    fn test_panel_actions_require_expanded() {
        let sink = Arc::new(RecordingSink::new());
        let mut footer = ConsentFooter::new(sink.clone());

        assert!(footer.turn_off_offers().is_ignored());
        assert!(footer.manage_settings().is_ignored());
        assert!(sink.is_empty());

        footer.toggle();
        assert!(footer.is_expanded());
        assert!(footer.turn_off_offers().is_applied());
        assert!(footer.manage_settings().is_applied());

        assert_eq!(
            sink.events(),
            vec![InteractionEvent::TurnOffOffersRequested, InteractionEvent::ManageSettingsRequested]
        );
    }

    #[test]
    fn test_chat_always_available() {
        let sink = Arc::new(RecordingSink::new());
        let mut footer = ConsentFooter::new(sink.clone());

        footer.chat();
        footer.toggle();
        footer.toggle();
        footer.chat();

        assert!(!footer.is_expanded());
        assert_eq!(sink.count(|e| *e == InteractionEvent::ChatRequested), 2);
    }
}
