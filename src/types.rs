/// Типы данных для предсказания задержек рейсов

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Сырой маршрут из формы. Числовые поля могут приходить как числа
/// или как строки, поэтому до нормализации хранятся как `Value`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawItinerary {
    #[serde(rename = "Month", default)]
    pub month: Value,
    #[serde(rename = "DayofMonth", default)]
    pub day_of_month: Value,
    #[serde(rename = "DayOfWeek", default)]
    pub day_of_week: Value,
    #[serde(rename = "DepTime", default)]
    pub dep_time: Value, // HHMM, 0-2359
    #[serde(rename = "UniqueCarrier", default)]
    pub unique_carrier: String,
    #[serde(rename = "Origin", default)]
    pub origin: String,
    #[serde(rename = "Dest", default)]
    pub dest: String,
    #[serde(rename = "Distance", default)]
    pub distance: Value, // мили
}

/// Маршрут после нормализации: типы гарантированы, календарные поля
/// зажаты в допустимые диапазоны.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedItinerary {
    pub month: i32,        // 1-12
    pub day_of_month: i32, // 1-31
    pub day_of_week: i32,  // 1-7
    pub dep_time: f64,
    pub unique_carrier: String,
    pub origin: String,
    pub dest: String,
    pub distance: f64,
}

/// Категория дистанции по квантилям обучающей выборки
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistanceBin {
    #[serde(rename = "Very_Short")]
    VeryShort,
    Short,
    Medium,
    Long,
    #[serde(rename = "Very_Long")]
    VeryLong,
}

impl DistanceBin {
    /// Порядковый код для числового вектора модели
    pub fn ordinal(self) -> f64 {
        match self {
            DistanceBin::VeryShort => 0.0,
            DistanceBin::Short => 1.0,
            DistanceBin::Medium => 2.0,
            DistanceBin::Long => 3.0,
            DistanceBin::VeryLong => 4.0,
        }
    }
}

/// Время суток по часу вылета
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeOfDay {
    Night,
    Morning,
    Afternoon,
    Evening,
}

impl TimeOfDay {
    pub fn ordinal(self) -> f64 {
        match self {
            TimeOfDay::Night => 0.0,
            TimeOfDay::Morning => 1.0,
            TimeOfDay::Afternoon => 2.0,
            TimeOfDay::Evening => 3.0,
        }
    }
}

/// Итоговый набор признаков для модели. DepTime и Hour сюда
/// не входят: они нужны только как промежуточные значения.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineeredFeatures {
    pub month: i32,
    pub day_of_month: i32,
    pub day_of_week: i32,
    pub unique_carrier: String,
    pub origin: String,
    pub dest: String,
    pub distance: f64,
    pub month_sin: f64,
    pub month_cos: f64,
    pub day_of_week_sin: f64,
    pub day_of_week_cos: f64,
    pub hour_sin: f64,
    pub hour_cos: f64,
    pub distance_bin: DistanceBin,
    pub time_of_day: TimeOfDay,
}

/// Результат предсказания
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub probability: f64, // 0.0-1.0
    pub delayed: bool,
    pub message: String,
}
