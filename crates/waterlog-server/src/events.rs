use tokio::sync::broadcast;

/// Notification emitted after a successful mutation.
///
/// The core does not know about screens or caches; a presentation layer
/// subscribes and decides what to invalidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    IntakeChanged,
    ConditionChanged,
    ReportCreated { report_id: String },
}

pub type EventSender = broadcast::Sender<StoreEvent>;

pub fn channel() -> (EventSender, broadcast::Receiver<StoreEvent>) {
    broadcast::channel(64)
}

/// Send an event, ignoring the case where nobody is listening.
pub fn emit(tx: &EventSender, event: StoreEvent) {
    let _ = tx.send(event);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emit_without_subscribers_is_fine() {
        let (tx, rx) = channel();
        drop(rx);
        emit(&tx, StoreEvent::IntakeChanged);
    }

    #[tokio::test]
    async fn subscribers_receive_events() {
        let (tx, mut rx) = channel();
        emit(
            &tx,
            StoreEvent::ReportCreated {
                report_id: "r-1".to_string(),
            },
        );
        let got = rx.recv().await.unwrap();
        assert_eq!(
            got,
            StoreEvent::ReportCreated {
                report_id: "r-1".to_string()
            }
        );
    }
}
