/// Модель задержек и её артефакты

pub mod artifacts;
pub mod delay;

pub use artifacts::{
    AirportEncoder, ArtifactBundle, CarrierEncoder, CategoricalEncoders, CategoryEncoder,
    DelayModel, LogisticModel,
};
pub use delay::{DelayClassifier, DelayPredictor};
