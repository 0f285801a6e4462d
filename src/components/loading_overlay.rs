use crate::state::LoadProgress;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct LoadingOverlayProps {
    pub progress: LoadProgress,
}

#[function_component]
pub fn LoadingOverlay(props: &LoadingOverlayProps) -> Html {
    if props.progress.ready {
        return html! {};
    }
    let pct = props.progress.percent();
    html! {
        <div class="loading-overlay">
            <div class="loading-label">{ format!("Loading {}%", pct) }</div>
            <div class="loading-bar">
                <div class="loading-fill" style={format!("width:{}%;", pct)}></div>
            </div>
            { if props.progress.failed > 0 {
                html!{ <div class="loading-failed">{ format!("{} frames unavailable", props.progress.failed) }</div> }
            } else { html!{} } }
        </div>
    }
}
