pub mod error;
pub mod generate;

pub use error::AppError;
pub use generate::{GenerateRequest, GenerateResponse};
