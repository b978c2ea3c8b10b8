pub mod config;
pub mod error;
pub mod models;
pub mod report;
pub mod traits;

pub use config::*;
pub use error::*;
pub use models::*;
pub use report::*;
pub use traits::*;
