//! Filesystem-backed collaborators: paths, credentials and configuration.

pub mod config_service;
pub mod paths;
pub mod secret_service;

pub use config_service::ConfigService;
pub use paths::GlancePaths;
pub use secret_service::SecretServiceImpl;
