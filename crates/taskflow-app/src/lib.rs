//! TaskFlow App: WASM entry point.
//!
//! This crate is the composition root (DI wiring layer).
//! It assembles all platform adapters and hands them to the egui UI.

mod app;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use taskflow_platform::storage::open_storage;
use taskflow_types::config::StorageBackendType;
use taskflow_types::{Result, TaskflowError};

const CANVAS_ID: &str = "taskflow_canvas";

/// WASM entry point: called from index.html
#[wasm_bindgen(start)]
pub async fn main() {
    // Initialize logging
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("TaskFlow starting...");

    // Config always lives in the persistent store so it can name the
    // backend for everything else.
    let config_store = open_storage(&StorageBackendType::Auto);
    let config = app::load_config(config_store.as_ref()).await;
    log::info!("API base: {}", config.api.normalized_base());

    let canvas = match find_canvas() {
        Ok(canvas) => canvas,
        Err(e) => {
            log::error!("Cannot start: {}", e);
            return;
        }
    };

    let web_options = eframe::WebOptions::default();
    wasm_bindgen_futures::spawn_local(async move {
        let started = eframe::WebRunner::new()
            .start(
                canvas,
                web_options,
                Box::new(move |cc| Ok(Box::new(app::TaskflowApp::new(cc, config, config_store)))),
            )
            .await;
        if let Err(e) = started {
            log::error!("Failed to start eframe: {:?}", e);
        }
    });
}

fn find_canvas() -> Result<web_sys::HtmlCanvasElement> {
    gloo_utils::document()
        .get_element_by_id(CANVAS_ID)
        .ok_or_else(|| TaskflowError::JsInterop(format!("No canvas element with id '{}'", CANVAS_ID)))?
        .dyn_into::<web_sys::HtmlCanvasElement>()
        .map_err(|_| TaskflowError::JsInterop(format!("#{} is not a canvas", CANVAS_ID)))
}
