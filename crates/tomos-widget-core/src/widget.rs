use serde::Serialize;

use crate::icon::{IconNode, IconSlots, select_icon};
use crate::position::WidgetPosition;
use crate::resolver::WelcomeConfig;

/// Rendering seam for the launcher, the greeting bubble and the chat frame.
///
/// Implementations only mirror what they are told; every decision about
/// what should be visible lives in [`WidgetStateMachine`].
pub trait WidgetSurface {
    fn set_launcher_visible(&mut self, visible: bool);
    fn set_frame_visible(&mut self, visible: bool);
    fn set_bubble_visible(&mut self, visible: bool);
    fn set_launcher_icon(&mut self, nodes: &[IconNode]);
    fn set_launcher_color(&mut self, color: &str);
    fn set_launcher_radius(&mut self, percent: f64);
    /// Applies one position to every positioned element at once.
    fn set_position(&mut self, position: WidgetPosition);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetPhase {
    MountedHidden,
    MountedVisible,
    Open,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BubblePhase {
    /// No active welcome text configured.
    Unavailable,
    Eligible,
    Shown,
    Dismissed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LauncherToggle {
    Opened,
    Closed,
    Ignored,
}

/// Glyphs used when the frame has not supplied an icon and while open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Glyphs {
    pub launcher: String,
    pub close: String,
}

pub struct WidgetStateMachine<S: WidgetSurface> {
    surface: S,
    glyphs: Glyphs,
    icons: IconSlots,
    position: WidgetPosition,
    launcher_visible: bool,
    /// Set once the frame has sent any `chatButtonStatus`.
    visibility_reported: bool,
    frame_open: bool,
    welcome_text: Option<String>,
    bubble_shown: bool,
    bubble_dismissed: bool,
}

impl<S: WidgetSurface> WidgetStateMachine<S> {
    /// Pushes the initial `MountedHidden` state onto a freshly mounted
    /// surface.
    pub fn mount(mut surface: S, glyphs: Glyphs, welcome: Option<&WelcomeConfig>) -> Self {
        let icons = IconSlots::new(vec![IconNode::Glyph {
            text: glyphs.launcher.clone(),
        }]);
        let position = WidgetPosition::default();

        surface.set_position(position);
        surface.set_launcher_icon(icons.showing());
        surface.set_launcher_visible(false);
        surface.set_frame_visible(false);
        surface.set_bubble_visible(false);

        Self {
            surface,
            glyphs,
            icons,
            position,
            launcher_visible: false,
            visibility_reported: false,
            frame_open: false,
            welcome_text: welcome
                .and_then(WelcomeConfig::active_text)
                .map(ToString::to_string),
            bubble_shown: false,
            bubble_dismissed: false,
        }
    }

    pub fn phase(&self) -> WidgetPhase {
        if !self.launcher_visible {
            WidgetPhase::MountedHidden
        } else if self.frame_open {
            WidgetPhase::Open
        } else {
            WidgetPhase::MountedVisible
        }
    }

    pub fn bubble_phase(&self) -> BubblePhase {
        if self.welcome_text.is_none() {
            BubblePhase::Unavailable
        } else if self.bubble_dismissed {
            BubblePhase::Dismissed
        } else if self.bubble_shown {
            BubblePhase::Shown
        } else {
            BubblePhase::Eligible
        }
    }

    pub fn position(&self) -> WidgetPosition {
        self.position
    }

    pub fn icon_showing(&self) -> &[IconNode] {
        self.icons.showing()
    }

    pub fn is_close_icon_shown(&self) -> bool {
        self.icons.is_overlay_shown()
    }

    pub fn welcome_text(&self) -> Option<&str> {
        self.welcome_text.as_deref()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// `chatButtonStatus`: hiding force-closes the frame and hides the
    /// bubble without dismissing it; showing never reopens the frame.
    pub fn apply_visibility(&mut self, visible: bool) {
        self.visibility_reported = true;
        if visible {
            if !self.launcher_visible {
                self.launcher_visible = true;
                self.surface.set_launcher_visible(true);
            }
        } else {
            self.close_frame_internal();
            if self.launcher_visible {
                self.launcher_visible = false;
                self.surface.set_launcher_visible(false);
            }
        }
        self.reevaluate_bubble();
    }

    /// `chatReady`: a live frame reveals the launcher unless the frame has
    /// already reported a visibility of its own.
    pub fn apply_ready(&mut self) {
        if self.visibility_reported || self.launcher_visible {
            return;
        }
        self.launcher_visible = true;
        self.surface.set_launcher_visible(true);
        self.reevaluate_bubble();
    }

    /// Launcher click. Ignored while the launcher is hidden.
    pub fn toggle_launcher(&mut self) -> LauncherToggle {
        if !self.launcher_visible {
            return LauncherToggle::Ignored;
        }

        if self.frame_open {
            self.close_frame_internal();
            self.reevaluate_bubble();
            LauncherToggle::Closed
        } else {
            self.frame_open = true;
            self.surface.set_frame_visible(true);
            self.bubble_dismissed = true;
            self.reevaluate_bubble();
            let close = vec![IconNode::Glyph {
                text: self.glyphs.close.clone(),
            }];
            if self.icons.show_overlay(close) {
                self.surface.set_launcher_icon(self.icons.showing());
            }
            LauncherToggle::Opened
        }
    }

    /// `closeChatWindow` from the frame. Returns true when the frame was
    /// open.
    pub fn close_frame(&mut self) -> bool {
        let was_open = self.close_frame_internal();
        self.reevaluate_bubble();
        was_open
    }

    /// Bubble close control; permanent for the page lifetime.
    pub fn dismiss_bubble(&mut self) {
        self.bubble_dismissed = true;
        self.reevaluate_bubble();
    }

    /// `chatButtonIcon`: replaces the persistent default icon. While the
    /// close icon is showing the new default is staged for the next restore.
    pub fn apply_icon_update(&mut self, image_url: Option<&str>, svg: Option<&str>, radius: Option<f64>) {
        if let Some(percent) = radius {
            self.surface.set_launcher_radius(percent);
        }

        let nodes = select_icon(image_url, svg, &self.glyphs.launcher);
        if self.icons.replace_default(nodes) {
            self.surface.set_launcher_icon(self.icons.showing());
        }
    }

    pub fn apply_color(&mut self, color: &str) {
        let color = color.trim();
        if !color.is_empty() {
            self.surface.set_launcher_color(color);
        }
    }

    pub fn apply_position(&mut self, raw: Option<&str>) {
        self.position = WidgetPosition::normalize(raw);
        self.surface.set_position(self.position);
    }

    fn close_frame_internal(&mut self) -> bool {
        let was_open = self.frame_open;
        if was_open {
            self.frame_open = false;
            self.surface.set_frame_visible(false);
        }
        if self.icons.restore() {
            self.surface.set_launcher_icon(self.icons.showing());
        }
        was_open
    }

    fn reevaluate_bubble(&mut self) {
        let should_show = self.welcome_text.is_some()
            && !self.bubble_dismissed
            && self.launcher_visible
            && !self.frame_open;
        if should_show != self.bubble_shown {
            self.bubble_shown = should_show;
            self.surface.set_bubble_visible(should_show);
        }
    }
}
