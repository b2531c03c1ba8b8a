use crate::{CoreError, CoreResult};
use earn_shared::{EventRecord, InteractionEvent};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::broadcast;
use tracing::{debug, info};
use uuid::Uuid;

/// The single outbound capability every controller depends on.
///
/// Controllers call `notify`; sinks receive the stamped record through
/// `publish`. Implementations must tolerate being called any number of
/// times, in any order, from independent controllers.
pub trait EventSink: Send + Sync {
    fn publish(&self, record: EventRecord);

    fn notify(&self, event: InteractionEvent) {
        self.publish(EventRecord::new(event));
    }
}

/// Logs each notification as a structured `info` event
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn publish(&self, record: EventRecord) {
        let payload = serde_json::to_string(&record.event).unwrap_or_default();
        match record.session_id {
            Some(session_id) => info!(event = record.event.name(), %session_id, %payload, "Interaction event"),
            None => info!(event = record.event.name(), %payload, "Interaction event"),
        }
    }
}

/// Keeps every notification in memory, in emission order
#[derive(Debug, Default)]
pub struct RecordingSink {
    records: Mutex<Vec<EventRecord>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<EventRecord> {
        self.lock().clone()
    }

    pub fn events(&self) -> Vec<InteractionEvent> {
        self.lock().iter().map(|r| r.event.clone()).collect()
    }

    /// Number of recorded events matching `predicate`
    pub fn count(&self, predicate: impl Fn(&InteractionEvent) -> bool) -> usize {
        self.lock().iter().filter(|r| predicate(&r.event)).count()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, Vec<EventRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl EventSink for RecordingSink {
    fn publish(&self, record: EventRecord) {
        self.lock().push(record);
    }
}

/// Publishes notifications on a broadcast channel (e.g. for SSE subscribers)
#[derive(Debug, Clone)]
pub struct BroadcastSink {
    tx: broadcast::Sender<EventRecord>,
}

impl BroadcastSink {
    /// Capacity must be non-zero
    pub fn new(capacity: usize) -> CoreResult<Self> {
        if capacity == 0 {
            return Err(CoreError::InvalidConfig(
                "event buffer capacity must be greater than zero".to_string(),
            ));
        }
        let (tx, _) = broadcast::channel(capacity);
        Ok(Self { tx })
    }

    pub fn from_sender(tx: broadcast::Sender<EventRecord>) -> Self {
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EventRecord> {
        self.tx.subscribe()
    }
}

impl EventSink for BroadcastSink {
    fn publish(&self, record: EventRecord) {
        let name = record.event.name();
        if self.tx.send(record).is_err() {
            debug!(event = name, "No subscribers for interaction event");
        }
    }
}

/// Fans one notification out to several sinks in registration order
#[derive(Default, Clone)]
pub struct SinkSet {
    sinks: Vec<Arc<dyn EventSink>>,
}

impl SinkSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn push(&mut self, sink: Arc<dyn EventSink>) {
        self.sinks.push(sink);
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl EventSink for SinkSet {
    fn publish(&self, record: EventRecord) {
        for sink in &self.sinks {
            sink.publish(record.clone());
        }
    }
}

/// Stamps every record with the visitor session it came from
#[derive(Clone)]
pub struct SessionSink {
    session_id: Uuid,
    inner: Arc<dyn EventSink>,
}

impl SessionSink {
    pub fn new(session_id: Uuid, inner: Arc<dyn EventSink>) -> Self {
        Self { session_id, inner }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }
}

impl EventSink for SessionSink {
    fn publish(&self, record: EventRecord) {
        self.inner.publish(record.with_session(self.session_id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use earn_shared::{OfferId, Sentiment};

    #[test]
    fn test_recording_sink_keeps_order() {
        let sink = RecordingSink::new();
        sink.notify(InteractionEvent::RemindLaterRequested);
        sink.notify(InteractionEvent::OfferSkipped { offer_id: OfferId::new("setup-video") });

        assert_eq!(
            sink.events(),
            vec![
                InteractionEvent::RemindLaterRequested,
                InteractionEvent::OfferSkipped { offer_id: OfferId::new("setup-video") },
            ]
        );
        assert_eq!(sink.count(|e| matches!(e, InteractionEvent::OfferSkipped { .. })), 1);

        sink.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn test_sink_set_fans_out() {
        let first = Arc::new(RecordingSink::new());
        let second = Arc::new(RecordingSink::new());
        let set = SinkSet::new().with(first.clone()).with(second.clone());

        set.notify(InteractionEvent::FeedbackRecorded { sentiment: Sentiment::Issue });

        assert_eq!(set.len(), 2);
        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 1);
    }

    #[tokio::test]
    async fn test_broadcast_sink_delivers_to_subscribers() {
        let sink = BroadcastSink::new(16).unwrap();
        let mut rx = sink.subscribe();

        sink.notify(InteractionEvent::ChatRequested);

        let record = rx.recv().await.unwrap();
        assert_eq!(record.event, InteractionEvent::ChatRequested);
    }

    #[test]
    fn test_broadcast_without_subscribers_is_silent() {
        let sink = BroadcastSink::new(4).unwrap();
        sink.notify(InteractionEvent::ViewReceiptRequested);
    }

    #[test]
    fn test_broadcast_rejects_zero_capacity() {
        assert!(matches!(BroadcastSink::new(0), Err(CoreError::InvalidConfig(_))));
    }

    #[test]
    fn test_session_sink_stamps_records() {
        let recording = Arc::new(RecordingSink::new());
        let first = SessionSink::new(Uuid::new_v4(), recording.clone());
        let second = SessionSink::new(Uuid::new_v4(), recording.clone());

        first.notify(InteractionEvent::OfferSkipped { offer_id: OfferId::new("setup-video") });
        second.notify(InteractionEvent::OfferSkipped { offer_id: OfferId::new("setup-video") });

        let sessions: Vec<Option<Uuid>> = recording.records().iter().map(|r| r.session_id).collect();
        assert_eq!(sessions, vec![Some(first.session_id()), Some(second.session_id())]);
    }
}
