//! Артефакты обученной модели

use anyhow::{Context, Result};
use ndarray::Array1;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

use crate::error::PredictionError;
use crate::preprocessing::DistanceBins;

/// Скоринговая функция: вектор признаков -> вероятность задержки.
/// Конвейер не знает, как устроена модель внутри.
pub trait DelayModel: Send + Sync {
    fn score(&self, input: &Array1<f64>) -> Result<f64, PredictionError>;
}

/// Логистическая модель, веса подобраны при обучении
#[derive(Debug, Clone)]
pub struct LogisticModel {
    weights: Array1<f64>,
    bias: f64,
}

impl LogisticModel {
    pub fn new(weights: Vec<f64>, bias: f64) -> Self {
        Self {
            weights: Array1::from(weights),
            bias,
        }
    }

    pub fn n_features(&self) -> usize {
        self.weights.len()
    }
}

impl DelayModel for LogisticModel {
    fn score(&self, input: &Array1<f64>) -> Result<f64, PredictionError> {
        if input.len() != self.weights.len() {
            return Err(PredictionError::Model(format!(
                "feature vector has {} values, model expects {}",
                input.len(),
                self.weights.len()
            )));
        }
        let z = self.weights.dot(input) + self.bias;
        Ok(1.0 / (1.0 + (-z).exp()))
    }
}

/// Кодирование категориальной метки в число, как ожидает модель
pub trait CategoryEncoder {
    fn encode(&self, label: &str) -> Result<f64, PredictionError>;
}

/// Кодировщик кодов авиакомпаний
#[derive(Debug, Clone)]
pub struct CarrierEncoder {
    mapping: HashMap<String, f64>,
}

impl CarrierEncoder {
    pub fn new(mapping: HashMap<String, f64>) -> Self {
        Self { mapping }
    }
}

impl CategoryEncoder for CarrierEncoder {
    fn encode(&self, label: &str) -> Result<f64, PredictionError> {
        self.mapping.get(label).copied().ok_or_else(|| {
            PredictionError::Model(format!("carrier code {:?} unknown to the fitted encoder", label))
        })
    }
}

/// Кодировщик кодов аэропортов (общий для Origin и Dest)
#[derive(Debug, Clone)]
pub struct AirportEncoder {
    mapping: HashMap<String, f64>,
}

impl AirportEncoder {
    pub fn new(mapping: HashMap<String, f64>) -> Self {
        Self { mapping }
    }
}

impl CategoryEncoder for AirportEncoder {
    fn encode(&self, label: &str) -> Result<f64, PredictionError> {
        self.mapping.get(label).copied().ok_or_else(|| {
            PredictionError::Model(format!("airport code {:?} unknown to the fitted encoder", label))
        })
    }
}

#[derive(Debug, Clone)]
pub struct CategoricalEncoders {
    pub carrier: CarrierEncoder,
    pub airport: AirportEncoder,
}

/// Неизменяемый набор артефактов: скоринговая функция, кодировщики,
/// порог решения и квантильные границы дистанции. Загружается один раз
/// на процесс и дальше только читается.
pub struct ArtifactBundle {
    pub model: Box<dyn DelayModel>,
    pub encoders: CategoricalEncoders,
    pub threshold: f64,
    pub distance_bins: DistanceBins,
}

/// Формат файла артефактов
#[derive(Debug, Deserialize)]
struct ArtifactFile {
    model: ModelFile,
    encoders: EncoderTables,
    threshold: f64,
    distance_bin_edges: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct ModelFile {
    weights: Vec<f64>,
    bias: f64,
}

#[derive(Debug, Deserialize)]
struct EncoderTables {
    carrier: HashMap<String, f64>,
    airport: HashMap<String, f64>,
}

impl ArtifactBundle {
    pub fn new(
        model: Box<dyn DelayModel>,
        encoders: CategoricalEncoders,
        threshold: f64,
        distance_bins: DistanceBins,
    ) -> Result<Self, PredictionError> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(PredictionError::Model(format!(
                "decision threshold {} outside [0, 1]",
                threshold
            )));
        }
        Ok(Self {
            model,
            encoders,
            threshold,
            distance_bins,
        })
    }

    /// Загрузка артефактов из JSON файла
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read model artifacts from {:?}", path))?;
        let file: ArtifactFile = serde_json::from_str(&data)
            .with_context(|| format!("failed to parse model artifacts from {:?}", path))?;

        let model = LogisticModel::new(file.model.weights, file.model.bias);
        let distance_bins = DistanceBins::new(file.distance_bin_edges)
            .context("invalid distance bin edges in artifacts")?;
        let encoders = CategoricalEncoders {
            carrier: CarrierEncoder::new(file.encoders.carrier),
            airport: AirportEncoder::new(file.encoders.airport),
        };

        info!(
            path = %path.display(),
            n_features = model.n_features(),
            threshold = file.threshold,
            "Model artifacts loaded"
        );

        Self::new(Box::new(model), encoders, file.threshold, distance_bins)
            .context("invalid model artifacts")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logistic_model_scores_in_unit_interval() {
        let model = LogisticModel::new(vec![0.5, -0.25, 1.0], 0.1);
        let prob = model.score(&Array1::from(vec![1.0, 2.0, 3.0])).unwrap();
        assert!((0.0..=1.0).contains(&prob));
    }

    #[test]
    fn logistic_model_rejects_schema_mismatch() {
        let model = LogisticModel::new(vec![0.5, -0.25, 1.0], 0.1);
        let err = model.score(&Array1::from(vec![1.0, 2.0])).unwrap_err();
        assert!(matches!(err, PredictionError::Model(_)));
    }

    #[test]
    fn encoders_reject_unknown_labels() {
        let mut mapping = HashMap::new();
        mapping.insert("AA".to_string(), 0.0);
        let encoder = CarrierEncoder::new(mapping);

        assert_eq!(encoder.encode("AA").unwrap(), 0.0);
        assert!(matches!(
            encoder.encode("ZZ").unwrap_err(),
            PredictionError::Model(_)
        ));
    }

    #[test]
    fn bundle_rejects_threshold_outside_unit_interval() {
        let model = Box::new(LogisticModel::new(vec![0.0], 0.0));
        let encoders = CategoricalEncoders {
            carrier: CarrierEncoder::new(HashMap::new()),
            airport: AirportEncoder::new(HashMap::new()),
        };
        let bins = DistanceBins::new(vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();

        let result = ArtifactBundle::new(model, encoders, 1.5, bins);
        assert!(matches!(result, Err(PredictionError::Model(_))));
    }

    #[test]
    fn loads_bundle_from_json() {
        let json = serde_json::json!({
            "model": { "weights": [0.1, 0.2], "bias": -0.3 },
            "encoders": {
                "carrier": { "AA": 0.0 },
                "airport": { "JFK": 0.0, "LAX": 1.0 }
            },
            "threshold": 0.42,
            "distance_bin_edges": [11.0, 368.0, 641.0, 1045.0, 1587.0, 4983.0]
        });
        let dir = std::env::temp_dir().join("flight-delay-ml-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("artifacts.json");
        std::fs::write(&path, json.to_string()).unwrap();

        let bundle = ArtifactBundle::load(&path).unwrap();
        assert_eq!(bundle.threshold, 0.42);
        assert_eq!(bundle.encoders.airport.encode("LAX").unwrap(), 1.0);
    }
}
