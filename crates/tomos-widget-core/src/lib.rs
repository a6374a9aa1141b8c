//! Core of the Tomos embeddable chat widget.
//!
//! Everything here is platform independent: the browser entrypoint plugs in
//! a [`ConfigTransport`], a [`WidgetSurface`] and a [`FramePort`].

pub mod boot;
pub mod bridge;
pub mod config;
pub mod controller;
pub mod discovery;
pub mod gate;
pub mod icon;
pub mod origin;
pub mod position;
pub mod protocol;
pub mod resolver;
pub mod tenant;
pub mod widget;

pub use boot::{BootError, BootPlan, prepare};
pub use bridge::{ProtocolBridge, ReadinessFlags, ReadySignal};
pub use config::{ConfigOverrides, WidgetConfig};
pub use controller::{FramePort, MessageOutcome, WidgetController, WidgetSnapshot};
pub use discovery::{DiscoveryPolicy, DiscoveryStop, run_discovery};
pub use gate::{AllowedOriginSet, GateDecision, is_allowed};
pub use icon::IconNode;
pub use origin::normalize_origin;
pub use position::WidgetPosition;
pub use protocol::{InboundMessage, OutboundMessage};
pub use resolver::{ConfigLeaf, ConfigResolver, ConfigTransport, TransportError, WelcomeConfig};
pub use tenant::{EmbedSource, TenantIdentity, resolve_tenant};
pub use widget::{BubblePhase, WidgetPhase, WidgetSurface};
