mod components;
mod config;
mod model;
mod preload;
mod render_loop;
mod state;
mod surface;
mod util;

use components::App;

fn main() {
    console_error_panic_hook::set_once();
    let level = if cfg!(debug_assertions) {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    if console_log::init_with_level(level).is_err() {
        web_sys::console::warn_1(&"logger already initialised".into());
    }
    yew::Renderer::<App>::new().render();
}
