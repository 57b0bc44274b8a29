pub mod api;
pub mod controller;
pub mod gateway;
pub mod player;
pub mod session;

pub use api::BrandCraftApi;
pub use controller::{AppController, AudioOutputFactory, Collaborators, SignInOutcome};
pub use gateway::{Gateway, TokenSource};
pub use player::AudioPlayer;
pub use session::{AppState, AuthToken};
