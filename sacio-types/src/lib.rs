pub mod domain;
pub mod error;
pub mod header;

pub use domain::*;
pub use error::*;
pub use header::*;
