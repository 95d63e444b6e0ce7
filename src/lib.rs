//! Flight Delay ML - предсказание задержек рейсов от 15 минут

pub mod error;
pub mod models;
pub mod preprocessing;
pub mod types;

pub use error::PredictionError;
pub use models::*;
pub use preprocessing::*;
pub use types::*;
