pub mod config;
pub mod content;

pub use config::Config;
pub use content::{ContentMap, FieldValue, RenderMode};
