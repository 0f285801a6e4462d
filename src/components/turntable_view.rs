use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{EventTarget, HtmlElement, HtmlImageElement, MouseEvent, TouchEvent, WheelEvent};
use yew::prelude::*;

use crate::config::ViewerConfig;
use crate::model::Viewer;
use crate::render_loop::{AnimationFrameLoop, Clock, PerformanceClock, RenderLoop};
use crate::state::InteractionMode;
use crate::surface::ImageSurface;
use crate::util::{surface_rect, touch_points};

#[derive(Properties, PartialEq, Clone)]
pub struct TurntableViewProps {
    pub config: ViewerConfig,
}

/// One DOM listener, detached again on drop.
struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(web_sys::Event)>,
}

impl Listener {
    fn attach<E, F>(target: &EventTarget, kind: &'static str, mut handler: F) -> Result<Self, JsValue>
    where
        E: JsCast + 'static,
        F: FnMut(E) + 'static,
    {
        let callback = Closure::wrap(Box::new(move |e: web_sys::Event| {
            if let Ok(e) = e.dyn_into::<E>() {
                handler(e);
            }
        }) as Box<dyn FnMut(web_sys::Event)>);
        target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            kind,
            callback,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref());
    }
}

/// Everything the mounted view keeps alive; dropping it detaches and stops.
struct Mounted {
    _listeners: Vec<Listener>,
    _frame_loop: AnimationFrameLoop<ImageSurface>,
}

type SharedLoop = Rc<RefCell<RenderLoop<ImageSurface>>>;

fn notify(render_loop: &SharedLoop, change: Option<InteractionMode>) {
    if let Some(mode) = change {
        render_loop.borrow_mut().notify_mode(mode);
    }
}

fn mount(
    viewer_el: HtmlElement,
    image_el: HtmlImageElement,
    viewer: Rc<RefCell<Viewer>>,
) -> Result<Mounted, JsValue> {
    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;
    let render_loop: SharedLoop = Rc::new(RefCell::new(RenderLoop::new(ImageSurface::new(
        viewer_el.clone(),
        image_el.clone(),
    ))));
    let clock = PerformanceClock;
    let mut listeners = Vec::new();

    // Pointer drag: press on the viewer, move/release anywhere on the page
    {
        let viewer = viewer.clone();
        let render_loop = render_loop.clone();
        listeners.push(Listener::attach(&viewer_el, "mousedown", move |e: MouseEvent| {
            let change = viewer.borrow_mut().pointer_down(e.client_x() as f64);
            notify(&render_loop, change);
            e.prevent_default();
        })?);
    }
    {
        let viewer = viewer.clone();
        listeners.push(Listener::attach(&document, "mousemove", move |e: MouseEvent| {
            viewer.borrow_mut().pointer_move(e.client_x() as f64);
        })?);
    }
    {
        let viewer = viewer.clone();
        let render_loop = render_loop.clone();
        listeners.push(Listener::attach(&document, "mouseup", move |_e: MouseEvent| {
            let change = viewer.borrow_mut().pointer_up();
            notify(&render_loop, change);
        })?);
    }
    // Wheel zoom
    {
        let viewer = viewer.clone();
        let viewer_el_wheel = viewer_el.clone();
        listeners.push(Listener::attach(&viewer_el, "wheel", move |e: WheelEvent| {
            e.prevent_default();
            let rect = surface_rect(&viewer_el_wheel);
            viewer
                .borrow_mut()
                .wheel(e.client_x() as f64, e.client_y() as f64, rect, e.delta_y());
        })?);
    }
    // Touch: one finger spins, two fingers pinch
    {
        let viewer = viewer.clone();
        let render_loop = render_loop.clone();
        listeners.push(Listener::attach(&viewer_el, "touchstart", move |e: TouchEvent| {
            let points = touch_points(&e.touches());
            let change = viewer.borrow_mut().touch_start(&points);
            notify(&render_loop, change);
        })?);
    }
    {
        let viewer = viewer.clone();
        listeners.push(Listener::attach(&viewer_el, "touchmove", move |e: TouchEvent| {
            let points = touch_points(&e.touches());
            viewer.borrow_mut().touch_move(&points, clock.now_ms());
        })?);
    }
    for kind in ["touchend", "touchcancel"] {
        let viewer = viewer.clone();
        let render_loop = render_loop.clone();
        listeners.push(Listener::attach(&viewer_el, kind, move |e: TouchEvent| {
            let change = viewer.borrow_mut().touch_end(e.touches().length() as usize);
            notify(&render_loop, change);
        })?);
    }
    // No long-press menu, no native image dragging
    listeners.push(Listener::attach(&viewer_el, "contextmenu", |e: web_sys::Event| {
        e.prevent_default();
    })?);
    listeners.push(Listener::attach(&image_el, "dragstart", |e: web_sys::Event| {
        e.prevent_default();
    })?);

    let frame_loop = AnimationFrameLoop::start(render_loop, viewer).ok_or("render loop did not start")?;
    Ok(Mounted {
        _listeners: listeners,
        _frame_loop: frame_loop,
    })
}

#[function_component(TurntableView)]
pub fn turntable_view(props: &TurntableViewProps) -> Html {
    let viewer_ref = use_node_ref();
    let image_ref = use_node_ref();
    let viewer = use_mut_ref(|| Viewer::new(&props.config));

    {
        let viewer_ref = viewer_ref.clone();
        let image_ref = image_ref.clone();
        let viewer = viewer.clone();
        use_effect_with((), move |_| {
            let mounted = match (viewer_ref.cast::<HtmlElement>(), image_ref.cast::<HtmlImageElement>()) {
                (Some(viewer_el), Some(image_el)) => match mount(viewer_el, image_el, viewer) {
                    Ok(m) => Some(m),
                    Err(e) => {
                        log::error!("turntable mount failed: {:?}", e);
                        None
                    }
                },
                _ => {
                    log::error!("turntable elements not attached");
                    None
                }
            };
            move || drop(mounted)
        });
    }

    let first_frame = viewer.borrow().motion().indexer().resolve(1).to_string();
    html! {
        <div ref={viewer_ref} class="turntable-viewer">
            <img ref={image_ref} class="turntable-image" src={first_frame} alt="" draggable="false" />
        </div>
    }
}
