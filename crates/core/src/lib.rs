#![forbid(unsafe_code)]

mod chunker;
mod color;
mod error;
mod ids;
mod label;
mod model;
mod options;
mod placement;
mod plan;

pub use chunker::*;
pub use color::*;
pub use error::CoreError;
pub use ids::*;
pub use label::*;
pub use model::*;
pub use options::*;
pub use placement::*;
pub use plan::*;
