//! URL handling module for Landing-Monitor
//!
//! Destination URLs are normalized before they enter a result set so that
//! duplicates differing only in their query string are checked once.

mod normalize;

pub use normalize::normalize_url;
