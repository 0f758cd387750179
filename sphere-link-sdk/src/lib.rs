//! Sphere payment-link SDK.
//!
//! Shared types for payment links and platform redirect sets, the link
//! decoder, and (behind the `client` feature) the HTTP client for the
//! project redirect-link endpoint.

#![forbid(unsafe_code)]

#[cfg(feature = "client")]
pub mod client;
pub mod link;
pub mod objects;

pub use link::{DecodeError, PayloadError, decode_page_url, decode_param, encode_param};
pub use objects::{
    Amount, Intent, LinkKind, LinkPayload, ParsedLink, Platform, PlatformUnavailable,
    RedirectLinks, RedirectSet, build_url,
};
