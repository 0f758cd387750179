pub mod link;
pub mod redirect;

pub use link::{Amount, Intent, LinkKind, LinkPayload, ParsedLink};
pub use redirect::{Platform, PlatformUnavailable, RedirectLinks, RedirectSet, build_url};
