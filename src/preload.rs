// Warms the browser cache with every frame so drags never wait on the network
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::HtmlImageElement;
use yew::Callback;

use crate::model::FrameIndexer;

pub struct FramePreloader {
    images: Vec<HtmlImageElement>,
    _callbacks: Vec<Closure<dyn FnMut(web_sys::Event)>>,
}

impl FramePreloader {
    /// Starts one request per frame. `on_loaded` / `on_failed` fire once per frame.
    pub fn start(
        indexer: &FrameIndexer,
        on_loaded: Callback<()>,
        on_failed: Callback<()>,
    ) -> Self {
        let mut images = Vec::with_capacity(indexer.total() as usize);
        let mut callbacks = Vec::with_capacity(indexer.total() as usize * 2);
        for asset in indexer.all_assets() {
            let img = match HtmlImageElement::new() {
                Ok(img) => img,
                Err(e) => {
                    log::warn!("could not create image for {}: {:?}", asset, e);
                    on_failed.emit(());
                    continue;
                }
            };
            let load_cb = {
                let on_loaded = on_loaded.clone();
                Closure::wrap(Box::new(move |_e: web_sys::Event| {
                    on_loaded.emit(());
                }) as Box<dyn FnMut(_)>)
            };
            let error_cb = {
                let on_failed = on_failed.clone();
                let asset = asset.clone();
                Closure::wrap(Box::new(move |_e: web_sys::Event| {
                    log::warn!("frame {} failed to load", asset);
                    on_failed.emit(());
                }) as Box<dyn FnMut(_)>)
            };
            img.set_onload(Some(load_cb.as_ref().unchecked_ref()));
            img.set_onerror(Some(error_cb.as_ref().unchecked_ref()));
            img.set_src(asset.as_str());
            images.push(img);
            callbacks.push(load_cb);
            callbacks.push(error_cb);
        }
        Self {
            images,
            _callbacks: callbacks,
        }
    }
}

impl Drop for FramePreloader {
    fn drop(&mut self) {
        for img in &self.images {
            img.set_onload(None);
            img.set_onerror(None);
        }
    }
}
