//! Нормализация входных данных

use serde_json::Value;

use crate::error::PredictionError;
use crate::types::{NormalizedItinerary, RawItinerary};

pub struct InputNormalizer;

impl InputNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Приведение сырого маршрута к гарантированным типам.
    /// Календарные поля зажимаются в диапазон, остальные числовые поля
    /// при неудачном парсинге дают ошибку (значение вне диапазона там
    /// осмысленно, а не опечатка, поэтому не зажимается).
    pub fn normalize(&self, raw: &RawItinerary) -> Result<NormalizedItinerary, PredictionError> {
        let month = coerce_numeric("Month", &raw.month)? as i32;
        let day_of_month = coerce_numeric("DayofMonth", &raw.day_of_month)? as i32;
        let day_of_week = coerce_numeric("DayOfWeek", &raw.day_of_week)? as i32;

        let dep_time = coerce_numeric("DepTime", &raw.dep_time)?;
        let distance = coerce_numeric("Distance", &raw.distance)?;

        Ok(NormalizedItinerary {
            month: month.clamp(1, 12),
            day_of_month: day_of_month.clamp(1, 31),
            day_of_week: day_of_week.clamp(1, 7),
            dep_time,
            distance,
            unique_carrier: raw.unique_carrier.clone(),
            origin: raw.origin.clone(),
            dest: raw.dest.clone(),
        })
    }
}

impl Default for InputNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Число или числовая строка -> f64. Строки "NaN"/"inf" парсятся
/// в нефинитные значения, для конвейера это не числа.
fn coerce_numeric(field: &str, value: &Value) -> Result<f64, PredictionError> {
    let parsed = match value {
        Value::Number(n) => n.as_f64().ok_or_else(|| {
            PredictionError::Validation(format!("field {} is not a finite number", field))
        })?,
        Value::String(s) => s.trim().parse::<f64>().map_err(|_| {
            PredictionError::Validation(format!("field {} is not numeric: {:?}", field, s))
        })?,
        Value::Null => {
            return Err(PredictionError::Validation(format!(
                "required field {} is missing",
                field
            )))
        }
        _ => {
            return Err(PredictionError::Validation(format!(
                "field {} is not numeric",
                field
            )))
        }
    };

    if !parsed.is_finite() {
        return Err(PredictionError::Validation(format!(
            "field {} is not a finite number",
            field
        )));
    }
    Ok(parsed)
}
