//! Скоринг и решение по порогу

use ndarray::Array1;
use tracing::debug;

use crate::error::PredictionError;
use crate::models::artifacts::{ArtifactBundle, CategoricalEncoders, CategoryEncoder, DelayModel};
use crate::preprocessing::{FeatureEngineer, InputNormalizer};
use crate::types::{EngineeredFeatures, RawItinerary, Verdict};

/// Порядок значений в числовом векторе модели
pub const FEATURE_NAMES: [&str; 15] = [
    "Month",
    "DayofMonth",
    "DayOfWeek",
    "UniqueCarrier",
    "Origin",
    "Dest",
    "Distance",
    "Month_sin",
    "Month_cos",
    "DayOfWeek_sin",
    "DayOfWeek_cos",
    "Hour_sin",
    "Hour_cos",
    "Distance_Bin",
    "TimeOfDay",
];

/// Классификатор: кодирует категории, вызывает скоринговую функцию
/// и сравнивает вероятность с откалиброванным порогом.
pub struct DelayClassifier {
    model: Box<dyn DelayModel>,
    encoders: CategoricalEncoders,
    threshold: f64,
}

impl DelayClassifier {
    pub fn new(model: Box<dyn DelayModel>, encoders: CategoricalEncoders, threshold: f64) -> Self {
        Self {
            model,
            encoders,
            threshold,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn classify(&self, features: &EngineeredFeatures) -> Result<Verdict, PredictionError> {
        let input = self.encode(features)?;
        let probability = self.model.score(&input)?;

        // Строго больше порога: ровно на пороге рейс считается вовремя
        let delayed = probability > self.threshold;
        let message = if delayed {
            format!("High chance of delay: {:.1}%", probability * 100.0)
        } else {
            format!("Low chance of delay: {:.1}%", probability * 100.0)
        };

        debug!(probability, threshold = self.threshold, delayed, "Scored itinerary");

        Ok(Verdict {
            probability,
            delayed,
            message,
        })
    }

    /// Сборка числового вектора в порядке FEATURE_NAMES
    fn encode(&self, features: &EngineeredFeatures) -> Result<Array1<f64>, PredictionError> {
        let carrier = self.encoders.carrier.encode(&features.unique_carrier)?;
        let origin = self.encoders.airport.encode(&features.origin)?;
        let dest = self.encoders.airport.encode(&features.dest)?;

        Ok(Array1::from(vec![
            features.month as f64,
            features.day_of_month as f64,
            features.day_of_week as f64,
            carrier,
            origin,
            dest,
            features.distance,
            features.month_sin,
            features.month_cos,
            features.day_of_week_sin,
            features.day_of_week_cos,
            features.hour_sin,
            features.hour_cos,
            features.distance_bin.ordinal(),
            features.time_of_day.ordinal(),
        ]))
    }
}

/// Полный конвейер одного запроса:
/// нормализация -> инженерия признаков -> скоринг -> вердикт.
/// Без состояния между запросами, можно вызывать из нескольких задач.
pub struct DelayPredictor {
    normalizer: InputNormalizer,
    engineer: FeatureEngineer,
    classifier: DelayClassifier,
}

impl DelayPredictor {
    /// Сборка конвейера из загруженных артефактов
    pub fn from_artifacts(bundle: ArtifactBundle) -> Self {
        Self {
            normalizer: InputNormalizer::new(),
            engineer: FeatureEngineer::new(bundle.distance_bins),
            classifier: DelayClassifier::new(bundle.model, bundle.encoders, bundle.threshold),
        }
    }

    pub fn predict(&self, raw: &RawItinerary) -> Result<Verdict, PredictionError> {
        let normalized = self.normalizer.normalize(raw)?;
        let features = self.engineer.engineer(&normalized)?;
        self.classifier.classify(&features)
    }
}
