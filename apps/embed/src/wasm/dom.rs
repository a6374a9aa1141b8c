use web_sys::{Document, DomParser, Element, SupportedType};

use super::*;

/// Elements created for one mounted widget.
#[derive(Clone)]
pub(super) struct WidgetElements {
    pub(super) launcher: HtmlElement,
    pub(super) bubble: HtmlElement,
    pub(super) bubble_close: HtmlElement,
    pub(super) frame: HtmlIFrameElement,
}

fn html_element(document: &Document, tag: &str, id: &str) -> Result<HtmlElement, String> {
    let element = document
        .create_element(tag)
        .map_err(|_| format!("failed to create {id}"))?
        .dyn_into::<HtmlElement>()
        .map_err(|_| format!("{id} is not HtmlElement"))?;
    element.set_id(id);
    Ok(element)
}

fn install_stylesheet(document: &Document) -> Result<(), String> {
    if document.get_element_by_id(STYLE_ID).is_some() {
        return Ok(());
    }
    let head = document
        .head()
        .ok_or_else(|| "document head is unavailable".to_string())?;
    let style = html_element(document, "style", STYLE_ID)?;
    style.set_text_content(Some(&stylesheet()));
    head.append_child(&style)
        .map_err(|_| "failed to append widget stylesheet".to_string())?;
    Ok(())
}

/// Creates the launcher, the greeting bubble and the chat frame. Fails when
/// a widget is already mounted on the page.
pub(super) fn mount_widget_dom(
    frame_url: &str,
    welcome_text: Option<&str>,
) -> Result<WidgetElements, String> {
    let window = web_sys::window().ok_or_else(|| "window is unavailable".to_string())?;
    let document = window
        .document()
        .ok_or_else(|| "document is unavailable".to_string())?;
    let body = document
        .body()
        .ok_or_else(|| "document body is unavailable".to_string())?;

    if document.get_element_by_id(LAUNCHER_ID).is_some() {
        return Err("chat widget is already mounted".to_string());
    }
    install_stylesheet(&document)?;

    let launcher = html_element(&document, "button", LAUNCHER_ID)?;
    launcher
        .set_attribute("type", "button")
        .map_err(|_| "failed to configure launcher".to_string())?;
    launcher
        .set_attribute("aria-label", "Chat")
        .map_err(|_| "failed to configure launcher".to_string())?;

    let bubble = html_element(&document, "div", BUBBLE_ID)?;
    let bubble_text = html_element(&document, "span", BUBBLE_TEXT_ID)?;
    bubble_text.set_text_content(welcome_text);
    let bubble_close = html_element(&document, "button", BUBBLE_CLOSE_ID)?;
    bubble_close
        .set_attribute("type", "button")
        .map_err(|_| "failed to configure bubble close".to_string())?;
    bubble_close
        .set_attribute("aria-label", "Close")
        .map_err(|_| "failed to configure bubble close".to_string())?;
    bubble_close.set_text_content(Some("\u{00D7}"));
    bubble
        .append_child(&bubble_text)
        .map_err(|_| "failed to assemble bubble".to_string())?;
    bubble
        .append_child(&bubble_close)
        .map_err(|_| "failed to assemble bubble".to_string())?;

    let frame = document
        .create_element("iframe")
        .map_err(|_| "failed to create chat frame".to_string())?
        .dyn_into::<HtmlIFrameElement>()
        .map_err(|_| "chat frame is not HtmlIFrameElement".to_string())?;
    frame.set_id(FRAME_ID);
    frame.set_src(frame_url);
    frame
        .set_attribute("allow", FRAME_ALLOW)
        .map_err(|_| "failed to configure chat frame".to_string())?;
    frame
        .set_attribute("title", "Chat")
        .map_err(|_| "failed to configure chat frame".to_string())?;

    let elements: [&Element; 3] = [&launcher, &bubble, &frame];
    for element in elements {
        body.append_child(element)
            .map_err(|_| "failed to append widget element".to_string())?;
    }

    Ok(WidgetElements {
        launcher,
        bubble,
        bubble_close,
        frame,
    })
}

/// [`WidgetSurface`] backed by the mounted elements.
pub(super) struct DomSurface {
    elements: WidgetElements,
}

impl DomSurface {
    pub(super) fn new(elements: WidgetElements) -> Self {
        Self { elements }
    }

    fn launcher_document(&self) -> Option<Document> {
        self.elements.launcher.owner_document()
    }

    fn append_icon_node(&self, document: &Document, node: &IconNode) {
        let launcher = &self.elements.launcher;
        match node {
            IconNode::Image { url } => {
                let Ok(image) = document.create_element("img") else {
                    return;
                };
                let _ = image.set_attribute("src", url);
                let _ = image.set_attribute("alt", "chat icon");
                let _ = image.set_attribute("width", ICON_SIZE_PX);
                let _ = image.set_attribute("height", ICON_SIZE_PX);
                let _ = image.set_attribute("style", "object-fit:contain");
                let _ = launcher.set_attribute(LOADED_ATTR, url);
                let _ = launcher.append_child(&image);
            }
            IconNode::Svg { markup } => {
                let Some(svg) = parse_svg(markup) else {
                    tracing::debug!("launcher svg could not be parsed");
                    return;
                };
                let _ = svg.set_attribute("width", ICON_SIZE_PX);
                let _ = svg.set_attribute("height", ICON_SIZE_PX);
                let _ = launcher.set_attribute(LOADED_ATTR, "");
                let _ = launcher.append_child(&svg);
            }
            IconNode::Glyph { text } => {
                let _ = launcher.remove_attribute(LOADED_ATTR);
                let _ = launcher.append_child(&document.create_text_node(text));
            }
        }
    }

    fn set_display(element: &HtmlElement, value: &str) {
        let _ = element.style().set_property("display", value);
    }
}

fn parse_svg(markup: &str) -> Option<Element> {
    let parser = DomParser::new().ok()?;
    let parsed = parser
        .parse_from_string(markup, SupportedType::ImageSvgXml)
        .ok()?;
    parsed.query_selector("svg").ok()?
}

impl WidgetSurface for DomSurface {
    fn set_launcher_visible(&mut self, visible: bool) {
        Self::set_display(&self.elements.launcher, launcher_display(visible));
    }

    fn set_frame_visible(&mut self, visible: bool) {
        Self::set_display(&self.elements.frame, block_display(visible));
    }

    fn set_bubble_visible(&mut self, visible: bool) {
        Self::set_display(&self.elements.bubble, block_display(visible));
    }

    fn set_launcher_icon(&mut self, nodes: &[IconNode]) {
        let Some(document) = self.launcher_document() else {
            return;
        };
        self.elements.launcher.set_inner_html("");
        for node in nodes {
            self.append_icon_node(&document, node);
        }
    }

    fn set_launcher_color(&mut self, color: &str) {
        let _ = self
            .elements
            .launcher
            .style()
            .set_property("background-color", color);
    }

    fn set_launcher_radius(&mut self, percent: f64) {
        if let Some(radius) = radius_css(percent) {
            let _ = self
                .elements
                .launcher
                .style()
                .set_property("border-radius", &radius);
        }
    }

    fn set_position(&mut self, position: WidgetPosition) {
        let elements: [&Element; 3] = [
            &self.elements.launcher,
            &self.elements.bubble,
            &self.elements.frame,
        ];
        for element in elements {
            let _ = element.set_attribute(POSITION_ATTR, position.as_str());
        }
    }
}

/// [`FramePort`] posting into the chat frame's window.
pub(super) struct FrameWindowPort {
    frame: HtmlIFrameElement,
    target_origin: String,
}

impl FrameWindowPort {
    pub(super) fn new(frame: HtmlIFrameElement, target_origin: String) -> Self {
        Self {
            frame,
            target_origin,
        }
    }
}

impl FramePort for FrameWindowPort {
    fn post(&mut self, message: OutboundMessage) {
        let Some(target) = self.frame.content_window() else {
            tracing::debug!(action = message.action(), "chat frame has no window yet");
            return;
        };
        let payload = js_sys::Object::new();
        if js_sys::Reflect::set(
            &payload,
            &JsValue::from_str("action"),
            &JsValue::from_str(message.action()),
        )
        .is_err()
        {
            return;
        }
        if target.post_message(&payload, &self.target_origin).is_err() {
            tracing::debug!(action = message.action(), "posting to chat frame failed");
        }
    }
}
