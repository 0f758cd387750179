//! Platform redirect sets and outbound URL composition.

use serde::{Deserialize, Deserializer, Serialize};

use super::link::{LinkKind, ParsedLink};

/// Delivery channels a payment link can be continued on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Chat-app mini-app.
    Telegram,
    Web,
    Mobile,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Telegram, Platform::Web, Platform::Mobile];

    /// Query key under which the raw parameter is forwarded.
    pub const fn query_key(&self) -> &'static str {
        match self {
            Platform::Telegram => "startapp",
            Platform::Web | Platform::Mobile => "data",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::Telegram => write!(f, "telegram"),
            Platform::Web => write!(f, "web"),
            Platform::Mobile => write!(f, "mobile"),
        }
    }
}

impl std::str::FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "telegram" => Ok(Platform::Telegram),
            "web" => Ok(Platform::Web),
            "mobile" => Ok(Platform::Mobile),
            other => Err(format!("unknown platform: {other}")),
        }
    }
}

/// The platform's base URL is missing from the redirect set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("platform URL not available for {0}")]
pub struct PlatformUnavailable(pub Platform);

/// Redirect targets for one intent category, as stored by the backend.
///
/// Every field is optional on the wire. A missing or `null` base URL only
/// makes the matching platform unavailable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectSet {
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telegram_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_api_key: Option<String>,
    /// Kept as sent; never interpreted.
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

impl RedirectSet {
    /// A set with only the generic web URL.
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Base URL used for `platform`, if the set carries one.
    ///
    /// Mobile falls back to the web URL; the chat-app has no fallback.
    pub fn base_url(&self, platform: Platform) -> Option<&str> {
        match platform {
            Platform::Telegram => non_empty(self.telegram_url.as_deref()),
            Platform::Web => non_empty(Some(&self.url)),
            Platform::Mobile => {
                non_empty(self.mobile_url.as_deref()).or_else(|| non_empty(Some(&self.url)))
            }
        }
    }

    /// Compose `<base>?<key>=<raw_param>` for `platform`.
    ///
    /// The raw parameter is appended as-is, without re-encoding.
    pub fn build_url(
        &self,
        platform: Platform,
        raw_param: &str,
    ) -> Result<String, PlatformUnavailable> {
        let base = self
            .base_url(platform)
            .ok_or(PlatformUnavailable(platform))?;
        Ok(format!("{base}?{}={raw_param}", platform.query_key()))
    }
}

/// Response body of the project redirect-link endpoint.
///
/// A project may configure only one of the two sets; the other then reads
/// as an empty set with every platform unavailable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectLinks {
    #[serde(
        rename = "requestRedirectLink",
        default,
        deserialize_with = "null_as_default"
    )]
    pub request_redirect_link: RedirectSet,
    #[serde(
        rename = "sendLinkRedirect",
        default,
        deserialize_with = "null_as_default"
    )]
    pub send_link_redirect: RedirectSet,
}

impl RedirectLinks {
    /// The set serving links of `kind`.
    pub fn for_kind(&self, kind: LinkKind) -> &RedirectSet {
        match kind {
            LinkKind::RequestLink => &self.request_redirect_link,
            LinkKind::SendLink => &self.send_link_redirect,
        }
    }

    pub fn build_url(
        &self,
        platform: Platform,
        link: &ParsedLink,
    ) -> Result<String, PlatformUnavailable> {
        self.for_kind(link.kind).build_url(platform, &link.raw_param)
    }

    pub fn is_available(&self, platform: Platform, kind: LinkKind) -> bool {
        self.for_kind(kind).base_url(platform).is_some()
    }
}

/// Compose the navigation URL for `platform` from a decoded link and the
/// backend redirect sets.
pub fn build_url(
    platform: Platform,
    link: &ParsedLink,
    redirects: &RedirectLinks,
) -> Result<String, PlatformUnavailable> {
    redirects.build_url(platform, link)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::link::{Intent, LinkPayload};

    fn link(kind: LinkKind, raw: &str) -> ParsedLink {
        ParsedLink {
            kind,
            payload: LinkPayload {
                intent: Intent::Request,
                id: "1".to_string(),
                amount: None,
                username: "alice".to_string(),
                chain: None,
                token: None,
            },
            raw_param: raw.to_string(),
        }
    }

    fn links() -> RedirectLinks {
        RedirectLinks {
            request_redirect_link: RedirectSet {
                telegram_url: Some("https://t.me/sphere_bot/pay".to_string()),
                mobile_url: Some("sphere://pay".to_string()),
                ..RedirectSet::with_url("https://pay.example/r")
            },
            send_link_redirect: RedirectSet::with_url("https://pay.example/s"),
        }
    }

    #[test]
    fn test_web_ignores_other_fields() {
        let l = link(LinkKind::RequestLink, "request_link-abc=");
        assert_eq!(
            build_url(Platform::Web, &l, &links()).unwrap(),
            "https://pay.example/r?data=request_link-abc="
        );
    }

    #[test]
    fn test_telegram_uses_startapp() {
        let l = link(LinkKind::RequestLink, "request_link-abc=");
        assert_eq!(
            build_url(Platform::Telegram, &l, &links()).unwrap(),
            "https://t.me/sphere_bot/pay?startapp=request_link-abc="
        );
    }

    #[test]
    fn test_mobile_prefers_mobile_url() {
        let l = link(LinkKind::RequestLink, "request_link-abc=");
        assert_eq!(
            build_url(Platform::Mobile, &l, &links()).unwrap(),
            "sphere://pay?data=request_link-abc="
        );
    }

    #[test]
    fn test_mobile_falls_back_to_url() {
        let l = link(LinkKind::SendLink, "send_link-xyz");
        assert_eq!(
            build_url(Platform::Mobile, &l, &links()).unwrap(),
            "https://pay.example/s?data=send_link-xyz"
        );
    }

    #[test]
    fn test_telegram_has_no_fallback() {
        let l = link(LinkKind::SendLink, "send_link-xyz");
        assert_eq!(
            build_url(Platform::Telegram, &l, &links()),
            Err(PlatformUnavailable(Platform::Telegram))
        );
        assert!(!links().is_available(Platform::Telegram, LinkKind::SendLink));
    }

    #[test]
    fn test_empty_strings_count_as_absent() {
        let set = RedirectSet {
            telegram_url: Some(String::new()),
            mobile_url: Some(String::new()),
            ..RedirectSet::with_url("")
        };
        for platform in Platform::ALL {
            assert_eq!(set.build_url(platform, "x"), Err(PlatformUnavailable(platform)));
        }
    }

    #[test]
    fn test_response_parsing() {
        let json = r#"{
            "requestRedirectLink": {
                "url": "https://pay.example/r",
                "telegram_url": "https://t.me/bot/app",
                "project_api_key": "pk_test",
                "createdAt": "2024-05-01T10:00:00.000Z",
                "updatedAt": "2024-05-02T10:00:00Z"
            },
            "sendLinkRedirect": {
                "url": "https://pay.example/s",
                "mobile_url": "sphere://collect",
                "project_api_key": "pk_test",
                "createdAt": "2024-05-01T10:00:00Z",
                "updatedAt": "2024-05-01T10:00:00Z"
            }
        }"#;
        let parsed: RedirectLinks = serde_json::from_str(json).unwrap();
        assert_eq!(
            parsed.request_redirect_link.telegram_url.as_deref(),
            Some("https://t.me/bot/app")
        );
        assert_eq!(parsed.request_redirect_link.mobile_url, None);
        assert_eq!(
            parsed.send_link_redirect.mobile_url.as_deref(),
            Some("sphere://collect")
        );
        assert_eq!(
            parsed.request_redirect_link.created_at.as_deref(),
            Some("2024-05-01T10:00:00.000Z")
        );
    }

    #[test]
    fn test_partial_response_disables_platforms() {
        let json = r#"{
            "requestRedirectLink": {
                "url": null,
                "telegram_url": "https://t.me/bot/app",
                "createdAt": "2024-05-01 10:00:00"
            },
            "sendLinkRedirect": null
        }"#;
        let parsed: RedirectLinks = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.request_redirect_link.url, "");
        assert!(parsed.is_available(Platform::Telegram, LinkKind::RequestLink));
        assert!(!parsed.is_available(Platform::Web, LinkKind::RequestLink));
        assert!(!parsed.is_available(Platform::Mobile, LinkKind::RequestLink));
        assert_eq!(parsed.send_link_redirect, RedirectSet::default());

        let only_request: RedirectLinks =
            serde_json::from_str(r#"{"requestRedirectLink":{"url":"https://pay.example/r"}}"#)
                .unwrap();
        for platform in Platform::ALL {
            assert!(!only_request.is_available(platform, LinkKind::SendLink));
        }
        assert!(only_request.is_available(Platform::Web, LinkKind::RequestLink));
    }
}
