#[cfg(feature = "cli")]
pub mod cli;
pub mod inputs;
pub mod toml_config;

pub use inputs::AddressFilter;
pub use toml_config::Settings;
