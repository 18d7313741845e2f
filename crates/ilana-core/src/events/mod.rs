//! Workflow event bus
//!
//! Broadcast-based event distribution so host shims can refresh their UI
//! without the controller knowing about them. Each subscriber receives a
//! copy of every published event.

use tokio::sync::broadcast;

use crate::workflow::triage::SkipReason;
use crate::workflow::ScanScope;

/// Events published by the suggestion workflow
#[derive(Debug, Clone)]
pub enum WorkflowEvent {
    /// A scan was triggered (manually or by the debounce timer)
    ScanStarted { generation: u64, scope: ScanScope },

    /// Triage decided the text was not worth analyzing
    ScanSkipped { generation: u64, reason: SkipReason },

    /// A scan's results were installed as the current session state
    ScanCompleted {
        generation: u64,
        finding_count: usize,
    },

    /// A scan completed after a newer scan had started; its results were dropped
    ScanDiscarded { generation: u64 },

    /// Highlights for the current scan were applied to the document
    HighlightsApplied { count: usize },

    /// A finding was accepted and removed from the active list
    FindingAccepted { finding_id: String },

    /// A finding was ignored and removed from the active list
    FindingIgnored { finding_id: String },

    /// A fire-and-forget feedback submission failed
    FeedbackFailed { finding_id: String, error: String },

    /// Real-time analysis was toggled
    RealtimeToggled { enabled: bool },

    /// The intelligence-status label was refreshed
    StatusUpdated { label: String },
}

impl WorkflowEvent {
    /// Get the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::ScanStarted { .. } => "scan_started",
            Self::ScanSkipped { .. } => "scan_skipped",
            Self::ScanCompleted { .. } => "scan_completed",
            Self::ScanDiscarded { .. } => "scan_discarded",
            Self::HighlightsApplied { .. } => "highlights_applied",
            Self::FindingAccepted { .. } => "finding_accepted",
            Self::FindingIgnored { .. } => "finding_ignored",
            Self::FeedbackFailed { .. } => "feedback_failed",
            Self::RealtimeToggled { .. } => "realtime_toggled",
            Self::StatusUpdated { .. } => "status_updated",
        }
    }
}

/// Event bus for workflow event distribution
#[derive(Debug)]
pub struct EventBus {
    sender: broadcast::Sender<WorkflowEvent>,
    capacity: usize,
}

impl EventBus {
    /// Create a new event bus with the specified capacity.
    ///
    /// The capacity determines how many events can be buffered before slow
    /// subscribers start losing events.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender, capacity }
    }

    /// Publish an event to all subscribers.
    ///
    /// Returns the number of active receivers; 0 when nobody is listening.
    pub fn publish(&self, event: WorkflowEvent) -> usize {
        match self.sender.send(event) {
            Ok(n) => n,
            Err(_) => 0,
        }
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<WorkflowEvent> {
        self.sender.subscribe()
    }

    /// Get the number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Get the channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for EventBus {
    /// Create a default event bus with capacity of 256 events
    fn default() -> Self {
        Self::new(256)
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            capacity: self.capacity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_published_events() {
        let bus = EventBus::new(16);
        let mut subscriber = bus.subscribe();

        let sent = bus.publish(WorkflowEvent::RealtimeToggled { enabled: true });
        assert_eq!(sent, 1);

        let event = subscriber.recv().await.unwrap();
        assert_eq!(event.event_type(), "realtime_toggled");
    }

    #[tokio::test]
    async fn publish_without_subscribers_returns_zero() {
        let bus = EventBus::new(16);
        let sent = bus.publish(WorkflowEvent::HighlightsApplied { count: 3 });
        assert_eq!(sent, 0);
    }

    #[tokio::test]
    async fn cloned_bus_reaches_original_subscribers() {
        let bus = EventBus::new(16);
        let clone = bus.clone();
        let mut subscriber = bus.subscribe();

        clone.publish(WorkflowEvent::StatusUpdated {
            label: "lightweight_advanced".into(),
        });

        let event = subscriber.recv().await.unwrap();
        assert!(matches!(event, WorkflowEvent::StatusUpdated { .. }));
    }
}
