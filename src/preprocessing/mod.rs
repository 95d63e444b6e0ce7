/// Модуль предобработки данных

pub mod feature_engineering;
pub mod normalization;

pub use feature_engineering::{DistanceBins, FeatureEngineer};
pub use normalization::InputNormalizer;
