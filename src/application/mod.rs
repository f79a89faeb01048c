mod application;
pub mod data;
mod line_reader;
mod render;
mod runtime_config;
mod session;

pub use application::{Application, ApplicationError};
pub use line_reader::{Editor, LineReader};
pub use render::Renderer;
pub use runtime_config::RuntimeConfig;
pub use session::Session;
