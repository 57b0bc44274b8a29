pub mod audio;
pub mod config;
pub mod http;
pub mod notifier;
pub mod provider;
pub mod store;

pub use audio::AudioSink;
pub use config::ConfigStore;
pub use http::{HttpRequest, HttpResponse, HttpTransport, RequestBody};
pub use notifier::Notifier;
pub use provider::GenerativeProvider;
pub use store::KeyValueStore;
