use earn_catalog::{format_amount, DeliveryProgress, OrderSummary};
use earn_core::{EventSink, Timings, TransientFlag, Transition};
use earn_shared::InteractionEvent;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// "Order Confirmed" screen: delivery tracker, order summary and its actions
pub struct OrderConfirmation {
    order: OrderSummary,
    progress: DeliveryProgress,
    copied: TransientFlag,
    sink: Arc<dyn EventSink>,
    timings: Timings,
}

impl OrderConfirmation {
    pub fn new(order: OrderSummary, sink: Arc<dyn EventSink>, timings: Timings) -> Self {
        Self {
            order,
            progress: DeliveryProgress::default(),
            copied: TransientFlag::new(),
            sink,
            timings,
        }
    }

    pub fn order(&self) -> &OrderSummary {
        &self.order
    }

    pub fn progress(&self) -> &DeliveryProgress {
        &self.progress
    }

    pub fn track_package(&mut self) -> Transition {
        info!(order_number = %self.order.order_number, "Track package requested");
        self.sink.notify(InteractionEvent::TrackPackageRequested);
        Transition::Applied
    }

    pub fn view_receipt(&mut self) -> Transition {
        info!(order_number = %self.order.order_number, "Receipt requested");
        self.sink.notify(InteractionEvent::ViewReceiptRequested);
        Transition::Applied
    }

    /// Text for the clipboard collaborator; shows the "copied" mark briefly.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn copy_order_number(&mut self) -> String {
        self.copied.raise(self.timings.copy_ack());
        self.order.order_number.clone()
    }

    pub fn is_copied(&self) -> bool {
        self.copied.is_raised()
    }

    pub fn snapshot(&self) -> ConfirmationSnapshot {
        ConfirmationSnapshot {
            order: self.order.clone(),
            subtotal: format_amount(self.order.subtotal_cents()),
            shipping: self.order.shipping_label(),
            total: self.order.total_label(),
            progress: self.progress.clone(),
            copied: self.is_copied(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfirmationSnapshot {
    pub order: OrderSummary,
    pub subtotal: String,
    pub shipping: String,
    pub total: String,
    pub progress: DeliveryProgress,
    pub copied: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use earn_core::RecordingSink;
    use std::time::Duration;

    fn confirmation() -> (OrderConfirmation, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::new());
        (OrderConfirmation::new(OrderSummary::default(), sink.clone(), Timings::default()), sink)
    }

    #[test]
    fn test_actions_emit_events() {
        let (mut screen, sink) = confirmation();

        screen.track_package();
        screen.view_receipt();

        assert_eq!(
            sink.events(),
            vec![InteractionEvent::TrackPackageRequested, InteractionEvent::ViewReceiptRequested]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_copy_marks_briefly() {
        let (mut screen, sink) = confirmation();

        assert_eq!(screen.copy_order_number(), "AX7829");
        assert!(screen.is_copied());

        tokio::time::sleep(Duration::from_millis(2_050)).await;
        assert!(!screen.is_copied());
        assert!(sink.is_empty());
    }

    #[test]
    fn test_snapshot_labels() {
        let (screen, _sink) = confirmation();
        let snapshot = screen.snapshot();

        assert_eq!(snapshot.subtotal, "$89.00");
        assert_eq!(snapshot.shipping, "Free");
        assert_eq!(snapshot.total, "$89.00");
        assert_eq!(snapshot.progress.stages.len(), 3);
    }
}
