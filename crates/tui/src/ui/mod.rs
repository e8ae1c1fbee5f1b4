pub mod input;
pub mod layout;
pub mod render;
pub mod runtime;
pub mod theme;
