//! Async client for the photoshare REST API.
//!
//! Each page of the web front end is a controller in [`pages`]: it loads the
//! persisted session, talks to the API through an [`api::ApiClient`], and
//! builds a [`view::Node`] tree with the functions in [`render`].

pub mod api;
pub mod error;
pub mod multipart;
pub mod navigation;
pub mod pages;
pub mod render;
pub mod session;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod transport;
pub mod view;

pub use error::ClientError;
