pub mod analytics;
pub mod app;
pub mod audio;
pub mod clock;
pub mod config;
pub mod curriculum;
pub mod data;
pub mod effects;
pub mod error;
pub mod model;
pub mod progress;
pub mod session;
pub mod settings;
pub mod storage;
pub mod ui;
pub mod view_models;

pub use app::PhonicsApp;

/// Arranque en el navegador: `the_canvas_id` es el canvas de `index.html`.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    use wasm_bindgen::JsCast;

    eframe::WebLogger::init(log::LevelFilter::Debug).ok();

    wasm_bindgen_futures::spawn_local(async {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document to attach to");
            return;
        };
        let canvas = match document
            .get_element_by_id("the_canvas_id")
            .and_then(|e| e.dyn_into::<web_sys::HtmlCanvasElement>().ok())
        {
            Some(canvas) => canvas,
            None => {
                log::error!("Canvas #the_canvas_id not found");
                return;
            }
        };

        let result = eframe::WebRunner::new()
            .start(
                canvas,
                eframe::WebOptions::default(),
                Box::new(|cc| Ok(Box::new(PhonicsApp::new(cc)))),
            )
            .await;
        if let Err(e) = result {
            log::error!("Failed to start eframe: {e:?}");
        }
    });
}
