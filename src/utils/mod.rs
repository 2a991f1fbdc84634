/// Environment-based configuration loading.
pub mod config;
