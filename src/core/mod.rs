pub mod models;
pub mod errors;
pub mod traits;

pub use models::*;
pub use errors::{ReportError, Result};
pub use traits::EventSource;
