pub mod client;
pub mod models;
pub mod webhooks;

pub use self::client::Client;
