pub mod errors;
pub mod payload;
pub mod todo;

pub use errors::*;
pub use payload::*;
pub use todo::*;
