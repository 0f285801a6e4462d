// Browser display surface: one <img> inside the interactive viewer element
use web_sys::{HtmlElement, HtmlImageElement};

use crate::model::{AssetId, ZoomAnchor};
use crate::render_loop::DisplaySurface;

pub const GRABBING_CLASS: &str = "grabbing";

pub struct ImageSurface {
    viewer: HtmlElement,
    image: HtmlImageElement,
}

impl ImageSurface {
    pub fn new(viewer: HtmlElement, image: HtmlImageElement) -> Self {
        Self { viewer, image }
    }
}

pub fn transform_value(zoom: f64) -> String {
    format!("scale({})", zoom)
}

pub fn transform_origin_value(anchor: ZoomAnchor) -> String {
    format!("{}% {}%", anchor.x, anchor.y)
}

impl DisplaySurface for ImageSurface {
    fn show_frame(&mut self, asset: &AssetId) {
        self.image.set_src(asset.as_str());
    }

    fn set_transform(&mut self, zoom: f64, anchor: ZoomAnchor) {
        let style = self.image.style();
        if let Err(e) = style
            .set_property("transform-origin", &transform_origin_value(anchor))
            .and_then(|_| style.set_property("transform", &transform_value(zoom)))
        {
            log::warn!("could not apply zoom transform: {:?}", e);
        }
    }

    fn set_grabbing(&mut self, grabbing: bool) {
        if let Err(e) = self
            .viewer
            .class_list()
            .toggle_with_force(GRABBING_CLASS, grabbing)
        {
            log::warn!("could not toggle grab class: {:?}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn css_values_match_the_transform() {
        assert_eq!(transform_value(1.5), "scale(1.5)");
        assert_eq!(transform_value(1.0), "scale(1)");
        assert_eq!(
            transform_origin_value(ZoomAnchor { x: 12.5, y: 100.0 }),
            "12.5% 100%"
        );
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod web_tests {
    use super::*;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn surface() -> (HtmlElement, HtmlImageElement, ImageSurface) {
        let document = web_sys::window().unwrap().document().unwrap();
        let viewer: HtmlElement = document.create_element("div").unwrap().dyn_into().unwrap();
        let image: HtmlImageElement = document.create_element("img").unwrap().dyn_into().unwrap();
        viewer.append_child(&image).unwrap();
        let s = ImageSurface::new(viewer.clone(), image.clone());
        (viewer, image, s)
    }

    #[wasm_bindgen_test]
    fn writes_transform_and_origin_styles() {
        let (_viewer, image, mut s) = surface();
        s.set_transform(2.0, ZoomAnchor { x: 25.0, y: 75.0 });
        let style = image.style();
        assert_eq!(style.get_property_value("transform").unwrap(), "scale(2)");
        assert_eq!(
            style.get_property_value("transform-origin").unwrap(),
            "25% 75%"
        );
    }

    #[wasm_bindgen_test]
    fn grabbing_toggles_the_viewer_class() {
        let (viewer, _image, mut s) = surface();
        s.set_grabbing(true);
        assert!(viewer.class_list().contains(GRABBING_CLASS));
        s.set_grabbing(false);
        assert!(!viewer.class_list().contains(GRABBING_CLASS));
    }

    #[wasm_bindgen_test]
    fn show_frame_swaps_the_image_source() {
        let (_viewer, image, mut s) = surface();
        let cfg = crate::config::ViewerConfig::default();
        let asset = crate::model::FrameIndexer::new(&cfg).resolve(7);
        s.show_frame(&asset);
        assert!(image.src().ends_with("images/0007.jpg"));
    }
}
