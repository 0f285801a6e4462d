// Small DOM helpers shared by the viewer components
use wasm_bindgen::JsValue;
use web_sys::{Element, TouchList};

use crate::state::{SurfaceRect, TouchPoint};

/// Mirrors the classic `'ontouchstart' in window` probe.
pub fn is_touch_device() -> bool {
    web_sys::window()
        .map(|w| js_sys::Reflect::has(&w, &JsValue::from_str("ontouchstart")).unwrap_or(false))
        .unwrap_or(false)
}

pub fn surface_rect(el: &Element) -> SurfaceRect {
    let rect = el.get_bounding_client_rect();
    SurfaceRect {
        left: rect.left(),
        top: rect.top(),
        width: rect.width(),
        height: rect.height(),
    }
}

pub fn touch_points(list: &TouchList) -> Vec<TouchPoint> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .map(|t| TouchPoint::new(t.client_x() as f64, t.client_y() as f64))
        .collect()
}
