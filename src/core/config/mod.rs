pub mod client;
pub mod data;
pub mod defaults;
pub mod io;
pub mod printing;

#[cfg(test)]
pub mod tests;

pub use client::{ClientConfig, ClientConfigError};
pub use data::Config;
pub use io::ConfigError;
