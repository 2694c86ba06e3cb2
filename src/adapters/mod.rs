// Adapters layer: concrete implementations of the domain ports.

pub mod console;
pub mod http;
pub mod json;
pub mod memory;

pub use console::{ConsolePresenter, PresenterConfig};
pub use http::CanvasHttpClient;
pub use json::JsonPresenter;
pub use memory::InMemoryCanvas;
