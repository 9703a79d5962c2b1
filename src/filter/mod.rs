pub mod types;
pub mod filter;
pub mod error;

pub use types::*;
pub use filter::project;
pub use error::FilterError;
