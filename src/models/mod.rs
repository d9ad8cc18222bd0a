// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{OrderField, Ordering, Profile, ProfileFields, ProfileFilter, ProfileQuery};
pub use requests::{ListProfilesQuery, ProfilePatch};
pub use responses::{
    AverageAgeResponse, AverageSalaryResponse, EncodedLabel, ErrorResponse, ExperienceSalaryResponse,
    HealthResponse, PredictionLabelsResponse, PredictionResponse, ProfilePage,
};
