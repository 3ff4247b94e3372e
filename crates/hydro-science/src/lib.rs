pub mod error;
pub mod hargreaves;
pub mod solar;

pub use error::ScienceError;
pub use hargreaves::compute_eto;
