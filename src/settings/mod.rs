//! Persisted user preferences

pub mod schema;
pub mod store;

pub use schema::AppSettings;
pub use store::SettingsError;
