use super::{hint_bar::HintBar, loading_overlay::LoadingOverlay, turntable_view::TurntableView};
use crate::config::ViewerConfig;
use crate::model::FrameIndexer;
use crate::preload::FramePreloader;
use crate::state::{LoadAction, LoadProgress};
use crate::util::is_touch_device;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use yew::prelude::*;

#[function_component(App)]
pub fn app() -> Html {
    let config = use_memo((), |_| ViewerConfig::load_from_document());
    let progress = use_reducer(|| LoadProgress::new(config.total_frames));
    let touch = use_memo((), |_| is_touch_device());

    // Preload every frame; the turntable runs regardless of how this goes
    {
        let progress = progress.clone();
        let config = config.clone();
        use_effect_with((), move |_| {
            let on_loaded = {
                let progress = progress.clone();
                Callback::from(move |_| progress.dispatch(LoadAction::FrameLoaded))
            };
            let on_failed = {
                let progress = progress.clone();
                Callback::from(move |_| progress.dispatch(LoadAction::FrameFailed))
            };
            let preloader = FramePreloader::start(&FrameIndexer::new(&config), on_loaded, on_failed);
            move || drop(preloader)
        });
    }
    // Reveal shortly after the last frame settles
    {
        let progress_reveal = progress.clone();
        let delay = config.reveal_delay_ms;
        use_effect_with(progress.settled(), move |settled| {
            let mut pending = None;
            if *settled {
                log::info!(
                    "{} frames ready ({} failed)",
                    progress_reveal.loaded,
                    progress_reveal.failed
                );
                let reveal = {
                    let progress = progress_reveal.clone();
                    Closure::wrap(Box::new(move || {
                        progress.dispatch(LoadAction::Reveal);
                    }) as Box<dyn FnMut()>)
                };
                if let Some(win) = web_sys::window() {
                    match win.set_timeout_with_callback_and_timeout_and_arguments_0(
                        reveal.as_ref().unchecked_ref(),
                        delay,
                    ) {
                        Ok(id) => pending = Some((id, reveal)),
                        Err(e) => log::warn!("reveal timer failed: {:?}", e),
                    }
                }
            }
            move || {
                if let Some((id, _reveal)) = pending {
                    if let Some(win) = web_sys::window() {
                        win.clear_timeout_with_handle(id);
                    }
                }
            }
        });
    }

    html! {
        <div class="turntable">
            <TurntableView config={(*config).clone()} />
            <LoadingOverlay progress={(*progress).clone()} />
            <HintBar show={progress.ready} touch={*touch} />
        </div>
    }
}
