pub mod colorize;
pub mod views;

pub use colorize::{colorize, highlight};
pub use views::Renderer;
