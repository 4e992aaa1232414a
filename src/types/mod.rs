pub mod context;
pub mod keybind;
pub mod window;

pub use context::{Context, Timeout};
pub use keybind::Keybind;
pub use window::Window;
