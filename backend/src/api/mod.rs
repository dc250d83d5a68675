//! REST API module.
//!
//! Admin routes (publish, validate, history) and storefront routes
//! (published data, catalog).

mod history;
mod publish;
mod published;
mod status;

pub use history::*;
pub use publish::*;
pub use published::*;
pub use status::*;

/// Handler result; errors render as JSON error bodies.
pub type ApiResult<T> = Result<T, crate::errors::AppError>;
