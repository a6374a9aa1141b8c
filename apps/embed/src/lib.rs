#![cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]

mod layout;
mod script;

#[cfg(target_arch = "wasm32")]
mod wasm {
    use std::cell::RefCell;
    use std::rc::Rc;

    use gloo_net::http::Request;
    use gloo_timers::future::sleep;
    use serde_json::Value;
    use tomos_widget_core::icon::IconNode;
    use tomos_widget_core::{
        BootError, BootPlan, ConfigOverrides, ConfigTransport, DiscoveryPolicy, EmbedSource,
        FramePort, OutboundMessage, TransportError, WidgetController, WidgetPosition,
        WidgetSurface, prepare, run_discovery,
    };
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::spawn_local;
    use web_sys::{HtmlElement, HtmlIFrameElement, MessageEvent};

    use crate::layout::*;
    use crate::script::*;

    mod console;
    mod dom;
    mod lifecycle;
    mod network;

    use dom::*;
    use lifecycle::*;
    use network::*;

    #[wasm_bindgen(start)]
    pub fn start() {
        console_error_panic_hook::set_once();

        let context = read_embed_context();
        console::install_subscriber(context.verbose);
        spawn_local(async move {
            match boot(context).await {
                Ok(()) | Err(BootError::OriginBlocked { .. }) => {}
                Err(error) => tracing::error!(%error, "chat widget failed to start"),
            }
        });
    }
}
