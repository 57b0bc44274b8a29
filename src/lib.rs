#![forbid(unsafe_code)]

//! Client core for the BrandCraft branding assistant.
//!
//! Backend calls go through [`app::Gateway`], which bounds every request by a
//! timeout and substitutes simulated responses on auth and context endpoints
//! when the backend is down. Synthesized speech arrives as base64 PCM and is
//! decoded by [`domain::audio::decode_base64_pcm`].

pub mod adapters;
pub mod app;
pub mod commands;
pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use app::{AppController, BrandCraftApi, Gateway};
pub use domain::{ApiResponse, DecodedAudio, DomainError};
