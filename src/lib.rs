//! HR API - employee profile service
//!
//! CRUD over a single profile table, aggregate statistics (average age and
//! salary) and a linear salary predictor that retrains on every request.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use self::core::{LinearRegression, SalaryModel};
pub use error::ApiError;
pub use models::{Profile, ProfileFields, ProfileFilter};
pub use routes::{configure_app, AppState};
pub use services::{MemoryStore, PostgresStore, ProfileStore};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let model = LinearRegression::fit(&[vec![1.0], vec![2.0]], &[2.0, 4.0]).unwrap();
        assert!((model.predict(&[3.0]).unwrap() - 6.0).abs() < 1e-9);
    }
}
