//! Error types

mod data;
mod load;
mod schema;
mod type_mismatch;

pub use data::*;
pub use load::*;
pub use schema::*;
pub use type_mismatch::*;
