pub mod config_store;
pub mod gemini;
pub mod log_notifier;
pub mod memory_store;
pub mod reqwest_transport;

pub use config_store::TomlConfigStore;
pub use gemini::GeminiProvider;
pub use log_notifier::LogNotifier;
pub use memory_store::MemoryStore;
pub use reqwest_transport::ReqwestTransport;
