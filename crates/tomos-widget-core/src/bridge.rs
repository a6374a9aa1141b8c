use futures::channel::oneshot;
use serde::Serialize;

use crate::protocol::OutboundMessage;

/// Monotonic readiness of the chat frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReadinessFlags {
    /// The frame announced `chatReady`.
    pub ready: bool,
    /// The frame answered a status query.
    pub acknowledged: bool,
}

/// Resolves once the frame reports ready.
#[derive(Debug)]
pub struct ReadySignal(oneshot::Receiver<()>);

impl ReadySignal {
    /// True when readiness was observed, false if the bridge went away
    /// first.
    pub async fn wait(self) -> bool {
        self.0.await.is_ok()
    }
}

#[derive(Debug)]
pub enum OpenDispatch {
    SendNow,
    Deferred(ReadySignal),
    /// An open is already waiting for readiness; it will be sent once.
    AlreadyPending,
}

/// Host side of the frame protocol: origin check, readiness bookkeeping and
/// the deferred `openChatWindow` command.
#[derive(Debug)]
pub struct ProtocolBridge {
    frame_host: String,
    flags: ReadinessFlags,
    ready_waiters: Vec<oneshot::Sender<()>>,
    open_pending: bool,
}

impl ProtocolBridge {
    pub fn new(frame_host: impl Into<String>) -> Self {
        Self {
            frame_host: frame_host.into(),
            flags: ReadinessFlags::default(),
            ready_waiters: Vec::new(),
            open_pending: false,
        }
    }

    pub fn flags(&self) -> ReadinessFlags {
        self.flags
    }

    /// Inbound messages must come from an origin containing the frame host.
    pub fn accepts_origin(&self, sender_origin: &str) -> bool {
        !self.frame_host.is_empty() && sender_origin.contains(self.frame_host.as_str())
    }

    /// `chatReady`. The first call wakes pending waiters and returns the
    /// icon/status queries; later calls return nothing.
    pub fn on_ready(&mut self) -> Vec<OutboundMessage> {
        if self.flags.ready {
            return Vec::new();
        }
        self.flags.ready = true;
        for waiter in self.ready_waiters.drain(..) {
            let _ = waiter.send(());
        }
        vec![
            OutboundMessage::GetChatButtonIcon,
            OutboundMessage::GetChatButtonStatus,
        ]
    }

    /// `chatButtonStatus`. Returns true on the first acknowledgement.
    pub fn on_status(&mut self) -> bool {
        let first = !self.flags.acknowledged;
        self.flags.acknowledged = true;
        first
    }

    /// Queries sent on every discovery round.
    pub fn discovery_queries(&self) -> [OutboundMessage; 2] {
        [
            OutboundMessage::GetChatButtonStatus,
            OutboundMessage::GetChatButtonIcon,
        ]
    }

    pub fn request_open(&mut self) -> OpenDispatch {
        if self.flags.ready {
            return OpenDispatch::SendNow;
        }
        if self.open_pending {
            return OpenDispatch::AlreadyPending;
        }
        self.open_pending = true;
        let (sender, receiver) = oneshot::channel();
        self.ready_waiters.push(sender);
        OpenDispatch::Deferred(ReadySignal(receiver))
    }

    /// Drops a deferred open the user no longer wants. Its signal resolves
    /// to false. True when one was pending.
    pub fn cancel_open(&mut self) -> bool {
        let was_pending = self.open_pending;
        self.open_pending = false;
        self.ready_waiters.clear();
        was_pending
    }

    /// Claims the deferred open. True exactly once per deferral, and only
    /// after readiness.
    pub fn take_pending_open(&mut self) -> bool {
        if self.flags.ready && self.open_pending {
            self.open_pending = false;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_must_contain_frame_host() {
        let bridge = ProtocolBridge::new("tomos.bot");
        assert!(bridge.accepts_origin("https://tomos.bot"));
        assert!(bridge.accepts_origin("https://app.tomos.bot"));
        assert!(!bridge.accepts_origin("https://evil.example"));
        assert!(!ProtocolBridge::new("").accepts_origin("https://tomos.bot"));
    }

    #[test]
    fn ready_queries_are_dispatched_once() {
        let mut bridge = ProtocolBridge::new("tomos.bot");
        assert_eq!(bridge.on_ready().len(), 2);
        assert!(bridge.on_ready().is_empty());
        assert!(bridge.flags().ready);
    }

    #[test]
    fn acknowledgement_is_monotonic() {
        let mut bridge = ProtocolBridge::new("tomos.bot");
        assert!(bridge.on_status());
        assert!(!bridge.on_status());
        assert!(bridge.flags().acknowledged);
    }

    #[tokio::test]
    async fn deferred_open_resolves_on_ready_and_is_claimed_once() {
        let mut bridge = ProtocolBridge::new("tomos.bot");
        let OpenDispatch::Deferred(signal) = bridge.request_open() else {
            panic!("expected deferred open before readiness");
        };
        assert!(matches!(bridge.request_open(), OpenDispatch::AlreadyPending));
        assert!(!bridge.take_pending_open());

        bridge.on_ready();
        assert!(signal.wait().await);
        assert!(bridge.take_pending_open());
        assert!(!bridge.take_pending_open());
        assert!(matches!(bridge.request_open(), OpenDispatch::SendNow));
    }

    #[tokio::test]
    async fn cancelled_open_is_never_claimed() {
        let mut bridge = ProtocolBridge::new("tomos.bot");
        let OpenDispatch::Deferred(signal) = bridge.request_open() else {
            panic!("expected deferred open before readiness");
        };
        assert!(bridge.cancel_open());
        assert!(!bridge.cancel_open());

        bridge.on_ready();
        assert!(!signal.wait().await);
        assert!(!bridge.take_pending_open());
    }

    #[tokio::test]
    async fn dropped_bridge_releases_waiters() {
        let mut bridge = ProtocolBridge::new("tomos.bot");
        let OpenDispatch::Deferred(signal) = bridge.request_open() else {
            panic!("expected deferred open before readiness");
        };
        drop(bridge);
        assert!(!signal.wait().await);
    }
}
