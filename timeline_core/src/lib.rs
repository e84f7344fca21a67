pub mod converter;
pub mod error;
pub mod model;

pub use converter::config::*;
pub use error::*;
pub use model::metadata::*;
pub use model::time::*;
pub use model::timeline::*;
pub use model::track::*;
