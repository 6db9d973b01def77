pub mod credentials;
pub mod harvest;
pub mod model;
pub mod session;
pub mod settings;
pub mod twitter;

#[cfg(test)]
mod testing;

pub use credentials::{Credentials, CredentialsError};
pub use harvest::{HarvestEnd, StatusHarvest};
pub use model::{Account, Author, Status};
pub use session::Session;
pub use settings::Settings;
pub use twitter::{ApiError, Endpoint, TwitterApi};
