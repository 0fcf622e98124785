//! Entry point of the admin shell bundle (`/assets/gnt_frontend.js`)

mod app;

use app::App;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn run() {
    gnt_frontend_common::init_browser_logging();

    let root = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id("app"));
    match root {
        Some(root) => {
            yew::Renderer::<App>::with_root(root).render();
        }
        None => tracing::error!("#app element not found, shell not mounted"),
    }
}
