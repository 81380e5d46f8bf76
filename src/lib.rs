pub mod catalog;
pub mod client;
pub mod config;
pub mod decode;
pub mod discovery;
pub mod error;
pub mod mqtt;
pub mod poller;
pub mod sensor;
pub mod sink;
pub mod state;

pub use config::Config;
pub use error::AppError;
