//! The Picasa session: request construction, transport and caching.

mod auth;
mod cache;
mod client;
mod options;
pub mod sizes;

pub use auth::{StaticToken, TokenSource};
pub use client::Picasa;
pub(crate) use client::Inner;
pub use options::RequestOptions;
pub use sizes::{Crop, ImageSize};
