//! Feature engineering для модели задержек

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::error::PredictionError;
use crate::types::{DistanceBin, EngineeredFeatures, NormalizedItinerary, TimeOfDay};

/// Квантильные границы дистанции, подобранные на обучающей выборке.
/// Шесть возрастающих границ задают пять корзин равной массы;
/// на инференсе границы не пересчитываются.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistanceBins {
    pub edges: Vec<f64>,
}

impl DistanceBins {
    pub fn new(edges: Vec<f64>) -> Result<Self, PredictionError> {
        if edges.len() != 6 {
            return Err(PredictionError::Feature(format!(
                "expected 6 distance bin edges, got {}",
                edges.len()
            )));
        }
        if edges.windows(2).any(|w| w[0] >= w[1]) {
            return Err(PredictionError::Feature(
                "distance bin edges must be strictly ascending".to_string(),
            ));
        }
        Ok(Self { edges })
    }

    /// Корзина для дистанции. Значения за крайними границами зажимаются
    /// в ближайшую корзину; отрицательная дистанция вне области,
    /// на которой подобраны границы.
    pub fn assign(&self, distance: f64) -> Result<DistanceBin, PredictionError> {
        if !(distance >= 0.0) {
            return Err(PredictionError::Feature(format!(
                "distance {} outside the non-negative binning domain",
                distance
            )));
        }

        let bins = [
            DistanceBin::VeryShort,
            DistanceBin::Short,
            DistanceBin::Medium,
            DistanceBin::Long,
            DistanceBin::VeryLong,
        ];
        for (i, window) in self.edges.windows(2).enumerate() {
            if distance <= window[1] {
                return Ok(bins[i]);
            }
        }
        Ok(DistanceBin::VeryLong)
    }
}

pub struct FeatureEngineer {
    bins: DistanceBins,
}

impl FeatureEngineer {
    pub fn new(bins: DistanceBins) -> Self {
        Self { bins }
    }

    /// Построение итогового набора признаков. Чистая функция:
    /// при фиксированных границах результат детерминирован.
    pub fn engineer(
        &self,
        itinerary: &NormalizedItinerary,
    ) -> Result<EngineeredFeatures, PredictionError> {
        // Минуты (HHMM mod 100) отбрасываются: модель обучалась
        // на часовой гранулярности
        let hour = derive_hour(itinerary.dep_time);
        if !(0..=23).contains(&hour) {
            return Err(PredictionError::Feature(format!(
                "hour {} derived from DepTime {} is outside 0-23",
                hour, itinerary.dep_time
            )));
        }

        let (month_sin, month_cos) = cyclical(itinerary.month as f64, 12.0);
        let (day_of_week_sin, day_of_week_cos) = cyclical(itinerary.day_of_week as f64, 7.0);
        let (hour_sin, hour_cos) = cyclical(hour as f64, 24.0);

        let distance_bin = self.bins.assign(itinerary.distance)?;
        let time_of_day = time_of_day(hour);

        Ok(EngineeredFeatures {
            month: itinerary.month,
            day_of_month: itinerary.day_of_month,
            day_of_week: itinerary.day_of_week,
            unique_carrier: itinerary.unique_carrier.clone(),
            origin: itinerary.origin.clone(),
            dest: itinerary.dest.clone(),
            distance: itinerary.distance,
            month_sin,
            month_cos,
            day_of_week_sin,
            day_of_week_cos,
            hour_sin,
            hour_cos,
            distance_bin,
            time_of_day,
        })
    }
}

/// Час вылета: целочисленное деление HHMM на 100
fn derive_hour(dep_time: f64) -> i32 {
    dep_time.div_euclid(100.0) as i32
}

/// Циклические признаки
fn cyclical(value: f64, period: f64) -> (f64, f64) {
    let phase = 2.0 * PI * value / period;
    (phase.sin(), phase.cos())
}

/// Время суток: (-inf,6] ночь, (6,12] утро, (12,18] день, (18,+inf) вечер
fn time_of_day(hour: i32) -> TimeOfDay {
    if hour <= 6 {
        TimeOfDay::Night
    } else if hour <= 12 {
        TimeOfDay::Morning
    } else if hour <= 18 {
        TimeOfDay::Afternoon
    } else {
        TimeOfDay::Evening
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn bins() -> DistanceBins {
        DistanceBins::new(vec![11.0, 368.0, 641.0, 1045.0, 1587.0, 4983.0]).unwrap()
    }

    fn normalized() -> NormalizedItinerary {
        NormalizedItinerary {
            month: 6,
            day_of_month: 15,
            day_of_week: 3,
            dep_time: 1430.0,
            unique_carrier: "AA".to_string(),
            origin: "JFK".to_string(),
            dest: "LAX".to_string(),
            distance: 2475.0,
        }
    }

    #[test]
    fn derives_hour_discarding_minutes() {
        assert_eq!(derive_hour(1435.0), 14);
        assert_eq!(derive_hour(59.0), 0);
        assert_eq!(derive_hour(2359.0), 23);
    }

    #[test]
    fn cyclical_pairs_lie_on_unit_circle() {
        for month in 1..=12 {
            let (s, c) = cyclical(month as f64, 12.0);
            assert!((s * s + c * c - 1.0).abs() < 1e-12);
        }
        for day in 1..=7 {
            let (s, c) = cyclical(day as f64, 7.0);
            assert!((s * s + c * c - 1.0).abs() < 1e-12);
        }
        for hour in 0..=23 {
            let (s, c) = cyclical(hour as f64, 24.0);
            assert!((s * s + c * c - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn cyclical_pairs_lie_on_unit_circle_for_random_values() {
        let mut rng = rand::thread_rng();
        for _ in 0..1000 {
            let value: f64 = rng.gen_range(-100.0..100.0);
            let period: f64 = rng.gen_range(1.0..60.0);
            let (s, c) = cyclical(value, period);
            assert!((s * s + c * c - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn adjacent_periods_are_numerically_close() {
        // Декабрь и январь рядом на окружности
        let (dec_s, dec_c) = cyclical(12.0, 12.0);
        let (jan_s, jan_c) = cyclical(1.0, 12.0);
        let (jun_s, jun_c) = cyclical(6.0, 12.0);

        let dec_jan = ((dec_s - jan_s).powi(2) + (dec_c - jan_c).powi(2)).sqrt();
        let dec_jun = ((dec_s - jun_s).powi(2) + (dec_c - jun_c).powi(2)).sqrt();
        assert!(dec_jan < dec_jun);
    }

    #[test]
    fn time_of_day_boundaries() {
        assert_eq!(time_of_day(6), TimeOfDay::Night);
        assert_eq!(time_of_day(7), TimeOfDay::Morning);
        assert_eq!(time_of_day(12), TimeOfDay::Morning);
        assert_eq!(time_of_day(13), TimeOfDay::Afternoon);
        assert_eq!(time_of_day(18), TimeOfDay::Afternoon);
        assert_eq!(time_of_day(19), TimeOfDay::Evening);
        assert_eq!(time_of_day(0), TimeOfDay::Night);
    }

    #[test]
    fn assigns_distance_bins_from_fitted_edges() {
        let bins = bins();
        assert_eq!(bins.assign(200.0).unwrap(), DistanceBin::VeryShort);
        assert_eq!(bins.assign(500.0).unwrap(), DistanceBin::Short);
        assert_eq!(bins.assign(800.0).unwrap(), DistanceBin::Medium);
        assert_eq!(bins.assign(1200.0).unwrap(), DistanceBin::Long);
        assert_eq!(bins.assign(2475.0).unwrap(), DistanceBin::VeryLong);
    }

    #[test]
    fn clamps_distances_beyond_outer_edges() {
        let bins = bins();
        assert_eq!(bins.assign(5.0).unwrap(), DistanceBin::VeryShort);
        assert_eq!(bins.assign(9000.0).unwrap(), DistanceBin::VeryLong);
    }

    #[test]
    fn rejects_negative_distance() {
        let err = bins().assign(-1.0).unwrap_err();
        assert!(matches!(err, PredictionError::Feature(_)));
    }

    #[test]
    fn rejects_malformed_edges() {
        assert!(DistanceBins::new(vec![0.0, 1.0]).is_err());
        assert!(DistanceBins::new(vec![0.0, 2.0, 1.0, 3.0, 4.0, 5.0]).is_err());
    }

    #[test]
    fn engineers_full_feature_record() {
        let features = FeatureEngineer::new(bins()).engineer(&normalized()).unwrap();

        assert_eq!(features.time_of_day, TimeOfDay::Afternoon); // час 14
        assert_eq!(features.distance_bin, DistanceBin::VeryLong);
        assert_eq!(features.month, 6);
        assert_eq!(features.unique_carrier, "AA");

        let (expected_sin, expected_cos) = cyclical(14.0, 24.0);
        assert_eq!(features.hour_sin, expected_sin);
        assert_eq!(features.hour_cos, expected_cos);
    }

    #[test]
    fn rejects_hour_outside_day() {
        let mut itinerary = normalized();
        itinerary.dep_time = 2460.0; // час 24

        let err = FeatureEngineer::new(bins()).engineer(&itinerary).unwrap_err();
        assert!(matches!(err, PredictionError::Feature(_)));
    }
}
