// Core computation exports
pub mod encoding;
pub mod predictor;
pub mod regression;
pub mod stats;

pub use encoding::LabelEncoder;
pub use predictor::{CategoryEncoders, ModelError, PredictionInput, SalaryModel};
pub use regression::{LinearRegression, RegressionError};
pub use stats::{age_on, average_age, average_salary, mean, Aggregate};
