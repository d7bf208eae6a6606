//! Typed client for Picasa Web Albums Atom feeds.
//!
//! A [`Picasa`] session fetches feeds, caches the raw responses and hands
//! back a [`Document`]: the user, album, search, recent-photos or photo
//! record the feed's category markers call for. Records keep a weak link
//! to the session so they can page ([`Paginate::next`]) and load their
//! photos ([`Album::photos`]) on demand.
//!
//! ```no_run
//! use picasa_feed::{Config, Paginate, Picasa, RequestOptions};
//!
//! # async fn run() -> Result<(), picasa_feed::PicasaError> {
//! let picasa = Picasa::new(&Config::default())?;
//! if let Some(user) = picasa.user(Some("liz"), RequestOptions::default()).await? {
//!     let next_page = user.next().await?;
//! #   let _ = next_page;
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod mapping;
pub mod resolver;
pub mod session;
pub mod types;
pub mod util;

pub use config::{Config, ConfigError};
pub use error::{MalformedDocument, PicasaError};
pub use resolver::parse;
pub use session::{Crop, ImageSize, Picasa, RequestOptions, StaticToken, TokenSource};
pub use types::{
    Account, Album, Author, Document, FeedKind, Header, Link, Paginate, Paging, Photo, PhotoUrl,
    RecentPhotos, Resource, Search, Thumbnail, User,
};
