pub mod audio;
pub mod branding;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod prompt;
pub mod response;

pub use audio::{DecodedAudio, PcmFormat, PlaybackState};
pub use branding::BrandContext;
pub use config::AppConfig;
pub use endpoint::Endpoint;
pub use error::DomainError;
pub use response::{ApiResponse, ResponseBody};
