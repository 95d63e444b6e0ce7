/// Ошибки конвейера предсказания

use thiserror::Error;

/// Три стадии, на которых запрос может завершиться ошибкой.
/// Повторных попыток нет: любая ошибка сразу возвращается вызывающему.
#[derive(Debug, Error)]
pub enum PredictionError {
    /// Обязательное поле отсутствует или не парсится как число
    #[error("validation error: {0}")]
    Validation(String),

    /// Значение вне области, на которой подобрана конфигурация признаков
    #[error("feature error: {0}")]
    Feature(String),

    /// Артефакты модели недоступны или скоринг завершился ошибкой
    #[error("model error: {0}")]
    Model(String),
}
