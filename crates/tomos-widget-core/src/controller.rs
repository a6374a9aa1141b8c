use serde::Serialize;
use serde_json::Value;

use crate::bridge::{OpenDispatch, ProtocolBridge, ReadinessFlags, ReadySignal};
use crate::config::WidgetConfig;
use crate::position::WidgetPosition;
use crate::protocol::{Decoded, InboundMessage, OutboundMessage, decode_inbound};
use crate::resolver::WelcomeConfig;
use crate::widget::{BubblePhase, Glyphs, LauncherToggle, WidgetPhase, WidgetStateMachine, WidgetSurface};

/// Outbound half of the frame channel.
pub trait FramePort {
    fn post(&mut self, message: OutboundMessage);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageOutcome {
    /// Sender origin failed the frame-host check; content was not read.
    Rejected,
    Ignored,
    Applied(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WidgetSnapshot {
    pub phase: WidgetPhase,
    pub bubble: BubblePhase,
    pub position: WidgetPosition,
    pub close_icon_shown: bool,
    pub readiness: ReadinessFlags,
}

/// The single per-page widget instance. Message and click callbacks share
/// it; it owns the state machine, the bridge and the frame port.
pub struct WidgetController<S: WidgetSurface, P: FramePort> {
    widget: WidgetStateMachine<S>,
    bridge: ProtocolBridge,
    port: P,
}

impl<S: WidgetSurface, P: FramePort> WidgetController<S, P> {
    pub fn new(config: &WidgetConfig, surface: S, port: P, welcome: Option<&WelcomeConfig>) -> Self {
        let glyphs = Glyphs {
            launcher: config.launcher_glyph.clone(),
            close: config.close_glyph.clone(),
        };
        Self {
            widget: WidgetStateMachine::mount(surface, glyphs, welcome),
            bridge: ProtocolBridge::new(config.frame_host.clone()),
            port,
        }
    }

    pub fn widget(&self) -> &WidgetStateMachine<S> {
        &self.widget
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    pub fn readiness(&self) -> ReadinessFlags {
        self.bridge.flags()
    }

    pub fn is_acknowledged(&self) -> bool {
        self.bridge.flags().acknowledged
    }

    pub fn accepts_origin(&self, sender_origin: &str) -> bool {
        self.bridge.accepts_origin(sender_origin)
    }

    /// Authenticates, decodes and applies one raw frame message.
    pub fn handle_message(&mut self, sender_origin: &str, payload: &Value) -> MessageOutcome {
        if !self.bridge.accepts_origin(sender_origin) {
            tracing::debug!(%sender_origin, "dropping message from foreign origin");
            return MessageOutcome::Rejected;
        }

        match decode_inbound(payload) {
            Decoded::Message(message) => {
                let action = message.action();
                self.apply(message);
                MessageOutcome::Applied(action)
            }
            Decoded::Unknown(action) => {
                tracing::debug!(%action, "ignoring unknown frame action");
                MessageOutcome::Ignored
            }
            Decoded::Malformed(reason) => {
                tracing::debug!(%reason, "ignoring malformed frame message");
                MessageOutcome::Ignored
            }
        }
    }

    pub fn apply(&mut self, message: InboundMessage) {
        match message {
            InboundMessage::ChatReady => {
                self.widget.apply_ready();
                for query in self.bridge.on_ready() {
                    self.port.post(query);
                }
            }
            InboundMessage::ChatButtonIcon {
                image_url,
                svg,
                radius,
            } => {
                self.widget
                    .apply_icon_update(image_url.as_deref(), svg.as_deref(), radius);
            }
            InboundMessage::ChatButtonStatus { visible } => {
                if self.bridge.on_status() {
                    tracing::debug!("chat frame acknowledged status query");
                }
                self.widget.apply_visibility(visible != Some(false));
                self.drop_stale_open();
            }
            InboundMessage::UpdateChatButtonColor { color } => {
                if let Some(color) = color {
                    self.widget.apply_color(&color);
                }
            }
            InboundMessage::UpdateWidgetPosition { position } => {
                self.widget.apply_position(position.as_deref());
            }
            InboundMessage::CloseChatWindow => {
                self.widget.close_frame();
                self.drop_stale_open();
            }
        }
    }

    /// Launcher click. Returns a signal to await when the open command has
    /// to wait for the frame; pass it back through
    /// [`Self::flush_deferred_open`] once it resolves.
    pub fn activate_launcher(&mut self) -> Option<ReadySignal> {
        match self.widget.toggle_launcher() {
            LauncherToggle::Opened => match self.bridge.request_open() {
                OpenDispatch::SendNow => {
                    self.port.post(OutboundMessage::OpenChatWindow);
                    None
                }
                OpenDispatch::Deferred(signal) => Some(signal),
                OpenDispatch::AlreadyPending => None,
            },
            LauncherToggle::Closed => {
                self.drop_stale_open();
                None
            }
            LauncherToggle::Ignored => None,
        }
    }

    /// A deferred open only survives while the frame is still shown.
    fn drop_stale_open(&mut self) {
        if self.widget.phase() != WidgetPhase::Open && self.bridge.cancel_open() {
            tracing::debug!("dropped deferred open; chat was closed before the frame was ready");
        }
    }

    /// Sends the deferred open if one is still owed. True when sent.
    pub fn flush_deferred_open(&mut self) -> bool {
        if self.bridge.take_pending_open() {
            self.port.post(OutboundMessage::OpenChatWindow);
            true
        } else {
            false
        }
    }

    pub fn dismiss_bubble(&mut self) {
        self.widget.dismiss_bubble();
    }

    /// One discovery round.
    pub fn send_discovery_queries(&mut self) {
        for query in self.bridge.discovery_queries() {
            self.port.post(query);
        }
    }

    pub fn snapshot(&self) -> WidgetSnapshot {
        WidgetSnapshot {
            phase: self.widget.phase(),
            bubble: self.widget.bubble_phase(),
            position: self.widget.position(),
            close_icon_shown: self.widget.is_close_icon_shown(),
            readiness: self.bridge.flags(),
        }
    }
}
