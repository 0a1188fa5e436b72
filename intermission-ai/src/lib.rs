pub mod models;
pub mod provider;

pub use models::ProviderConfig;
pub use provider::OpenAiBackend;
