//! Error types

mod duplicate_renderer;
mod grid;
mod validation;

pub use duplicate_renderer::*;
pub use grid::*;
pub use validation::*;
