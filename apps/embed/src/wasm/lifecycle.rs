use web_sys::Element;

use super::*;

type SharedController = Rc<RefCell<WidgetController<DomSurface, FrameWindowPort>>>;

/// What the host page told us about this embed, captured synchronously.
pub(super) struct EmbedContext {
    pub(super) source: EmbedSource,
    pub(super) overrides: ConfigOverrides,
    pub(super) verbose: bool,
}

fn embed_script() -> Option<Element> {
    let document = web_sys::window()?.document()?;
    if let Some(script) = document.current_script() {
        return Some(script);
    }

    let found = document.query_selector_all(EMBED_SCRIPT_SELECTOR).ok()?;
    let scripts: Vec<Element> = (0..found.length())
        .filter_map(|index| found.item(index))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect();
    let candidates: Vec<ScriptCandidate> = scripts
        .iter()
        .map(|script| ScriptCandidate {
            src: script.get_attribute("src"),
            has_empresa_attr: script.has_attribute(EMPRESA_ATTR),
        })
        .collect();
    pick_embed_script(&candidates).and_then(|index| scripts.into_iter().nth(index))
}

pub(super) fn read_embed_context() -> EmbedContext {
    let script = embed_script();
    let attribute = |name: &str| script.as_ref().and_then(|script| script.get_attribute(name));
    let page_url = web_sys::window().and_then(|window| window.location().href().ok());

    EmbedContext {
        source: EmbedSource {
            empresa_attr: attribute(EMPRESA_ATTR),
            bot_attr: attribute(BOT_ATTR),
            script_src: attribute("src"),
            page_url,
        },
        overrides: ConfigOverrides {
            store_url: attribute(STORE_URL_ATTR),
            chat_url: attribute(CHAT_URL_ATTR),
        },
        verbose: script
            .as_ref()
            .is_some_and(|script| script.has_attribute(DEBUG_ATTR)),
    }
}

pub(super) async fn boot(context: EmbedContext) -> Result<(), BootError> {
    let BootPlan {
        config,
        frame_url,
        welcome,
        ..
    } = prepare(&FetchTransport, &context.source, &context.overrides).await?;

    let welcome_text = welcome.as_ref().and_then(|welcome| welcome.active_text());
    let elements = mount_widget_dom(&frame_url, welcome_text).map_err(BootError::Host)?;
    let port = FrameWindowPort::new(elements.frame.clone(), config.frame_origin());
    let controller: SharedController = Rc::new(RefCell::new(WidgetController::new(
        &config,
        DomSurface::new(elements.clone()),
        port,
        welcome.as_ref(),
    )));

    install_message_listener(&controller).map_err(BootError::Host)?;
    install_click_listener(&elements.launcher, {
        let controller = Rc::clone(&controller);
        move || on_launcher_click(&controller)
    })
    .map_err(BootError::Host)?;
    install_click_listener(&elements.bubble_close, {
        let controller = Rc::clone(&controller);
        move || controller.borrow_mut().dismiss_bubble()
    })
    .map_err(BootError::Host)?;

    tracing::debug!(snapshot = ?controller.borrow().snapshot(), "chat widget mounted");
    spawn_discovery(controller, config.discovery);
    Ok(())
}

fn install_message_listener(controller: &SharedController) -> Result<(), String> {
    let window = web_sys::window().ok_or_else(|| "window is unavailable".to_string())?;
    let controller = Rc::clone(controller);
    let callback = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(move |event: web_sys::Event| {
        let Ok(event) = event.dyn_into::<MessageEvent>() else {
            return;
        };
        let origin = event.origin();
        // Payloads from foreign origins are never read.
        if !controller.borrow().accepts_origin(&origin) {
            return;
        }
        let payload = message_payload(&event.data());
        controller.borrow_mut().handle_message(&origin, &payload);
    }));
    window
        .add_event_listener_with_callback("message", callback.as_ref().unchecked_ref())
        .map_err(|_| "failed to listen for frame messages".to_string())?;
    callback.forget();
    Ok(())
}

fn message_payload(data: &JsValue) -> Value {
    js_sys::JSON::stringify(data)
        .ok()
        .and_then(|json| json.as_string())
        .and_then(|json| serde_json::from_str(&json).ok())
        .unwrap_or(Value::Null)
}

fn install_click_listener(
    element: &HtmlElement,
    mut on_click: impl FnMut() + 'static,
) -> Result<(), String> {
    let callback = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(move |event: web_sys::Event| {
        event.stop_propagation();
        on_click();
    }));
    element
        .add_event_listener_with_callback("click", callback.as_ref().unchecked_ref())
        .map_err(|_| "failed to listen for clicks".to_string())?;
    callback.forget();
    Ok(())
}

fn on_launcher_click(controller: &SharedController) {
    let deferred = controller.borrow_mut().activate_launcher();
    let Some(signal) = deferred else {
        return;
    };
    let controller = Rc::clone(controller);
    spawn_local(async move {
        if signal.wait().await && controller.borrow_mut().flush_deferred_open() {
            tracing::debug!("sent deferred open to chat frame");
        }
    });
}

fn spawn_discovery(controller: SharedController, policy: DiscoveryPolicy) {
    spawn_local(async move {
        run_discovery(
            policy,
            sleep,
            || controller.borrow().is_acknowledged(),
            || controller.borrow_mut().send_discovery_queries(),
        )
        .await;
    });
}
