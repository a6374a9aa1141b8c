use serde_json::{Value, json};
use tomos_widget_core::icon::IconNode;
use tomos_widget_core::{
    BubblePhase, FramePort, MessageOutcome, OutboundMessage, WelcomeConfig, WidgetConfig,
    WidgetController, WidgetPhase, WidgetPosition, WidgetSurface,
};

const FRAME_ORIGIN: &str = "https://tomos.bot";

#[derive(Debug, Default)]
struct PageSurface {
    launcher_visible: bool,
    frame_visible: bool,
    bubble_visible: bool,
    icon: Vec<IconNode>,
    color: Option<String>,
    position: Option<WidgetPosition>,
}

impl WidgetSurface for PageSurface {
    fn set_launcher_visible(&mut self, visible: bool) {
        self.launcher_visible = visible;
    }
    fn set_frame_visible(&mut self, visible: bool) {
        self.frame_visible = visible;
    }
    fn set_bubble_visible(&mut self, visible: bool) {
        self.bubble_visible = visible;
    }
    fn set_launcher_icon(&mut self, nodes: &[IconNode]) {
        self.icon = nodes.to_vec();
    }
    fn set_launcher_color(&mut self, color: &str) {
        self.color = Some(color.to_string());
    }
    fn set_launcher_radius(&mut self, _percent: f64) {}
    fn set_position(&mut self, position: WidgetPosition) {
        self.position = Some(position);
    }
}

#[derive(Debug, Default)]
struct SentMessages(Vec<OutboundMessage>);

impl SentMessages {
    fn count(&self, message: OutboundMessage) -> usize {
        self.0.iter().filter(|sent| **sent == message).count()
    }
}

impl FramePort for SentMessages {
    fn post(&mut self, message: OutboundMessage) {
        self.0.push(message);
    }
}

type Controller = WidgetController<PageSurface, SentMessages>;

fn mounted(welcome: Option<&str>) -> Controller {
    let welcome = welcome.map(|text| WelcomeConfig {
        enabled: true,
        text: text.to_string(),
    });
    WidgetController::new(
        &WidgetConfig::default(),
        PageSurface::default(),
        SentMessages::default(),
        welcome.as_ref(),
    )
}

fn frame_says(controller: &mut Controller, payload: Value) -> MessageOutcome {
    controller.handle_message(FRAME_ORIGIN, &payload)
}

fn glyph(text: &str) -> Vec<IconNode> {
    vec![IconNode::Glyph {
        text: text.to_string(),
    }]
}

fn close_glyph() -> Vec<IconNode> {
    glyph(&WidgetConfig::default().close_glyph)
}

#[test]
fn ready_close_then_activate_ends_open_with_close_icon() {
    let mut controller = mounted(None);
    frame_says(&mut controller, json!({"action": "chatReady"}));
    frame_says(&mut controller, json!({"action": "closeChatWindow"}));

    assert!(controller.activate_launcher().is_none());

    assert_eq!(controller.widget().phase(), WidgetPhase::Open);
    assert!(controller.widget().is_close_icon_shown());
    assert_eq!(controller.widget().surface().icon, close_glyph());
    assert!(controller.widget().surface().frame_visible);
    assert_eq!(controller.port().count(OutboundMessage::OpenChatWindow), 1);
}

#[test]
fn status_hidden_before_ready_keeps_launcher_hidden() {
    let mut controller = mounted(None);
    frame_says(&mut controller, json!({"action": "chatButtonStatus", "visible": false}));
    frame_says(&mut controller, json!({"action": "chatReady"}));

    assert!(controller.activate_launcher().is_none());
    assert_eq!(controller.widget().phase(), WidgetPhase::MountedHidden);
    assert_eq!(controller.port().count(OutboundMessage::OpenChatWindow), 0);
}

#[test]
fn hiding_while_open_does_not_reopen_later() {
    let mut controller = mounted(None);
    frame_says(&mut controller, json!({"action": "chatReady"}));
    frame_says(&mut controller, json!({"action": "chatButtonStatus", "visible": true}));
    controller.activate_launcher();

    frame_says(&mut controller, json!({"action": "chatButtonStatus", "visible": false}));
    assert_eq!(controller.widget().phase(), WidgetPhase::MountedHidden);
    assert!(!controller.widget().surface().launcher_visible);
    assert!(!controller.widget().surface().frame_visible);

    frame_says(&mut controller, json!({"action": "chatButtonStatus", "visible": true}));
    assert_eq!(controller.widget().phase(), WidgetPhase::MountedVisible);
    assert!(!controller.widget().surface().frame_visible);
    assert!(!controller.widget().is_close_icon_shown());
}

#[test]
fn repeated_ready_sends_queries_once() {
    let mut controller = mounted(None);
    for _ in 0..3 {
        assert_eq!(
            frame_says(&mut controller, json!({"action": "chatReady"})),
            MessageOutcome::Applied("chatReady")
        );
    }

    assert_eq!(controller.port().count(OutboundMessage::GetChatButtonIcon), 1);
    assert_eq!(controller.port().count(OutboundMessage::GetChatButtonStatus), 1);
    assert!(controller.readiness().ready);
}

#[tokio::test]
async fn open_before_ready_is_sent_exactly_once() {
    let mut controller = mounted(None);
    frame_says(&mut controller, json!({"action": "chatButtonStatus", "visible": true}));

    let signal = controller
        .activate_launcher()
        .expect("open must wait for the frame");
    assert_eq!(controller.widget().phase(), WidgetPhase::Open);
    assert_eq!(controller.port().count(OutboundMessage::OpenChatWindow), 0);

    assert!(controller.activate_launcher().is_none());
    let reopened = controller
        .activate_launcher()
        .expect("reopening waits for the frame again");
    assert!(!controller.flush_deferred_open());

    frame_says(&mut controller, json!({"action": "chatReady"}));
    assert!(!signal.wait().await);
    assert!(reopened.wait().await);
    assert!(controller.flush_deferred_open());
    assert!(!controller.flush_deferred_open());

    assert_eq!(controller.port().count(OutboundMessage::OpenChatWindow), 1);
}

#[tokio::test]
async fn open_then_close_before_ready_sends_nothing() {
    let mut controller = mounted(None);
    frame_says(&mut controller, json!({"action": "chatButtonStatus", "visible": true}));

    let signal = controller
        .activate_launcher()
        .expect("open must wait for the frame");
    assert!(controller.activate_launcher().is_none());
    assert_eq!(controller.widget().phase(), WidgetPhase::MountedVisible);

    frame_says(&mut controller, json!({"action": "chatReady"}));
    assert!(!signal.wait().await);
    assert!(!controller.flush_deferred_open());
    assert_eq!(controller.port().count(OutboundMessage::OpenChatWindow), 0);
}

#[test]
fn foreign_origin_is_rejected_without_effect() {
    let mut controller = mounted(None);
    let outcome = controller.handle_message(
        "https://attacker.example",
        &json!({"action": "chatButtonStatus", "visible": true}),
    );

    assert_eq!(outcome, MessageOutcome::Rejected);
    assert_eq!(controller.widget().phase(), WidgetPhase::MountedHidden);
    assert!(!controller.is_acknowledged());
    assert!(controller.port().0.is_empty());
}

#[test]
fn unknown_and_malformed_messages_are_ignored() {
    let mut controller = mounted(None);
    let before = controller.snapshot();

    assert_eq!(
        frame_says(&mut controller, json!({"action": "selfDestruct"})),
        MessageOutcome::Ignored
    );
    assert_eq!(
        frame_says(&mut controller, json!("chatReady")),
        MessageOutcome::Ignored
    );
    assert_eq!(
        frame_says(&mut controller, json!({"visible": true})),
        MessageOutcome::Ignored
    );

    assert_eq!(controller.snapshot(), before);
    assert!(controller.port().0.is_empty());
}

#[test]
fn dismissed_bubble_never_returns() {
    let mut controller = mounted(Some("Hola"));
    frame_says(&mut controller, json!({"action": "chatButtonStatus", "visible": true}));
    assert_eq!(controller.widget().bubble_phase(), BubblePhase::Shown);
    assert!(controller.widget().surface().bubble_visible);

    controller.dismiss_bubble();
    frame_says(&mut controller, json!({"action": "chatButtonStatus", "visible": false}));
    frame_says(&mut controller, json!({"action": "chatButtonStatus", "visible": true}));
    frame_says(&mut controller, json!({"action": "chatReady"}));
    controller.activate_launcher();
    frame_says(&mut controller, json!({"action": "closeChatWindow"}));

    assert_eq!(controller.widget().bubble_phase(), BubblePhase::Dismissed);
    assert!(!controller.widget().surface().bubble_visible);
}

#[test]
fn icon_update_while_open_lands_after_close() {
    let mut controller = mounted(None);
    frame_says(&mut controller, json!({"action": "chatReady"}));
    frame_says(&mut controller, json!({"action": "chatButtonStatus", "visible": true}));
    controller.activate_launcher();

    frame_says(
        &mut controller,
        json!({"action": "chatButtonIcon", "svg": "<svg viewBox=\"0 0 1 1\"/>"}),
    );
    assert_eq!(controller.widget().surface().icon, close_glyph());

    frame_says(&mut controller, json!({"action": "closeChatWindow"}));
    assert_eq!(
        controller.widget().surface().icon,
        vec![IconNode::Svg {
            markup: "<svg viewBox=\"0 0 1 1\"/>".to_string()
        }]
    );
}

#[test]
fn appearance_updates_reach_the_surface() {
    let mut controller = mounted(None);
    frame_says(
        &mut controller,
        json!({"action": "updateChatButtonColor", "color": "#112233"}),
    );
    frame_says(
        &mut controller,
        json!({"action": "updateWidgetPosition", "position": "LEFT"}),
    );

    assert_eq!(controller.widget().surface().color.as_deref(), Some("#112233"));
    assert_eq!(controller.widget().position(), WidgetPosition::Left);

    frame_says(
        &mut controller,
        json!({"action": "updateWidgetPosition", "position": "top"}),
    );
    assert_eq!(
        controller.widget().surface().position,
        Some(WidgetPosition::Right)
    );
}

#[test]
fn discovery_round_posts_status_and_icon_queries() {
    let mut controller = mounted(None);
    controller.send_discovery_queries();
    controller.send_discovery_queries();

    assert_eq!(
        controller.port().0,
        vec![
            OutboundMessage::GetChatButtonStatus,
            OutboundMessage::GetChatButtonIcon,
            OutboundMessage::GetChatButtonStatus,
            OutboundMessage::GetChatButtonIcon,
        ]
    );
    assert!(!controller.is_acknowledged());

    frame_says(&mut controller, json!({"action": "chatButtonStatus"}));
    assert!(controller.is_acknowledged());
    assert_eq!(controller.widget().phase(), WidgetPhase::MountedVisible);
}
