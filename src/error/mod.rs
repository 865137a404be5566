//! Unified error system for the POS/reservation API
//!
//! - [`ErrorCode`]: classification of every failure, with HTTP mapping
//! - [`AppError`]: client-facing error (`{ "error": msg }` body)
//! - [`ServiceError`]: DB-layer bridge enabling `?` propagation without
//!   per-call `map_err` boilerplate

mod codes;
mod http;
mod types;

pub use codes::ErrorCode;
pub use types::{AppError, ServiceError, ServiceResult};
