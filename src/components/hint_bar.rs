use yew::prelude::*;

pub const DESKTOP_HINT: &str = "Drag to rotate · Scroll to zoom";
pub const MOBILE_HINT: &str = "Swipe to rotate · Pinch to zoom";

#[derive(Properties, PartialEq, Clone)]
pub struct HintBarProps {
    pub show: bool,
    #[prop_or(false)]
    pub touch: bool,
}

#[function_component]
pub fn HintBar(props: &HintBarProps) -> Html {
    if !props.show {
        return html! {};
    }
    let text = if props.touch { MOBILE_HINT } else { DESKTOP_HINT };
    html! {<div class="hint-bar">{ text }</div>}
}
