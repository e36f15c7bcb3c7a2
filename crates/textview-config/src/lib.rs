pub mod color;
pub mod config;
pub mod options;
pub mod theme;

pub use color::HexColor;
pub use config::ViewConfig;
pub use options::EditorOptions;
pub use theme::{builtin_dark, builtin_light, ColorStyle};
