pub mod error;
pub mod models;
pub mod sqlite;

pub use error::*;
pub use models::*;
pub use sqlite::*;
