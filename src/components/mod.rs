pub mod app;
pub mod hint_bar;
pub mod loading_overlay;
pub mod turntable_view;

pub use app::App;
