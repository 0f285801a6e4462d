pub mod gesture;
pub mod loading;
pub mod touch;

pub use gesture::{GestureTracker, InteractionMode, SurfaceRect};
pub use loading::{LoadAction, LoadProgress};
pub use touch::TouchPoint;
