//! Display texts for the chooser page.

use serde::Serialize;
use sphere_link_sdk::{Intent, LinkPayload, ParsedLink, Platform};

use crate::session::{Failure, ReadyState};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayInfo {
    pub title: &'static str,
    pub subtitle: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailRow {
    pub label: &'static str,
    pub value: String,
}

/// A platform button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformOption {
    pub platform: Platform,
    pub title: &'static str,
    pub caption: &'static str,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorView {
    pub title: &'static str,
    pub message: &'static str,
    pub action: &'static str,
}

/// `<amount>[ <token>]`
fn amount_with_token(payload: &LinkPayload) -> String {
    let mut out = payload
        .amount
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_default();
    if let Some(token) = payload.token.as_deref().filter(|t| !t.is_empty()) {
        out.push(' ');
        out.push_str(token);
    }
    out
}

pub fn display_info(link: Option<&ParsedLink>) -> DisplayInfo {
    let Some(link) = link else {
        return DisplayInfo {
            title: "Choose Platform",
            subtitle: "Where would you like to continue?".to_string(),
        };
    };

    let who = &link.payload.username;
    let what = amount_with_token(&link.payload);
    if link.is_request() {
        DisplayInfo {
            title: "Payment Request",
            subtitle: format!("{who} requested {what} from you"),
        }
    } else {
        DisplayInfo {
            title: "Payment Received",
            subtitle: format!("{who} sent you {what}"),
        }
    }
}

pub fn detail_rows(link: &ParsedLink) -> Vec<DetailRow> {
    let payload = &link.payload;
    let is_request = payload.intent == Intent::Request;

    let mut amount = amount_with_token(payload);
    if let Some(chain) = payload.chain.as_deref().filter(|c| !c.is_empty()) {
        amount.push_str(&format!(" ({chain})"));
    }

    vec![
        DetailRow {
            label: "Action:",
            value: if is_request { "Pay Request" } else { "Collect Payment" }.to_string(),
        },
        DetailRow {
            label: "Amount:",
            value: amount,
        },
        DetailRow {
            label: if is_request { "Requested by:" } else { "Sent by:" },
            value: payload.username.clone(),
        },
        DetailRow {
            label: "Transaction ID:",
            value: payload.id.clone(),
        },
    ]
}

/// Platform buttons in display order. A button is enabled only when a link
/// was decoded and the redirect set has a base URL for it.
pub fn platform_options(ready: &ReadyState) -> Vec<PlatformOption> {
    let link = ready.link.as_ref();
    let is_request = link.is_some_and(|l| l.payload.intent == Intent::Request);

    Platform::ALL
        .into_iter()
        .map(|platform| {
            let (title, caption) = match (platform, is_request) {
                (Platform::Telegram, true) => ("Telegram", "Pay via Telegram Mini App"),
                (Platform::Telegram, false) => ("Telegram", "Collect via Telegram Mini App"),
                (Platform::Web, true) => ("Web Browser", "Pay in your browser"),
                (Platform::Web, false) => ("Web Browser", "Collect in your browser"),
                (Platform::Mobile, true) => ("Mobile App", "Pay via mobile app"),
                (Platform::Mobile, false) => ("Mobile App", "Collect via mobile app"),
            };
            let enabled =
                link.is_some_and(|l| ready.redirects.is_available(platform, l.kind));
            PlatformOption {
                platform,
                title,
                caption,
                enabled,
            }
        })
        .collect()
}

pub fn error_view(failure: &Failure) -> ErrorView {
    ErrorView {
        title: "Error",
        message: failure.message,
        action: "Retry",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sphere_link_sdk::{Amount, LinkKind, RedirectLinks, RedirectSet};

    fn link(kind: LinkKind, intent: Intent, token: Option<&str>, chain: Option<&str>) -> ParsedLink {
        ParsedLink {
            kind,
            payload: LinkPayload {
                intent,
                id: "123".to_string(),
                amount: Some(Amount::Number(50.into())),
                username: "alice".to_string(),
                chain: chain.map(str::to_string),
                token: token.map(str::to_string),
            },
            raw_param: format!("{kind}-eyJ9"),
        }
    }

    #[test]
    fn test_display_without_link() {
        let info = display_info(None);
        assert_eq!(info.title, "Choose Platform");
        assert_eq!(info.subtitle, "Where would you like to continue?");
    }

    #[test]
    fn test_display_request() {
        let l = link(LinkKind::RequestLink, Intent::Request, Some("USDC"), None);
        let info = display_info(Some(&l));
        assert_eq!(info.title, "Payment Request");
        assert_eq!(info.subtitle, "alice requested 50 USDC from you");
    }

    #[test]
    fn test_display_send_without_token() {
        let l = link(LinkKind::SendLink, Intent::Send, None, None);
        let info = display_info(Some(&l));
        assert_eq!(info.title, "Payment Received");
        assert_eq!(info.subtitle, "alice sent you 50");
    }

    #[test]
    fn test_detail_rows() {
        let l = link(LinkKind::SendLink, Intent::Send, Some("USDT"), Some("tron"));
        let rows = detail_rows(&l);
        let pairs: Vec<(&str, &str)> = rows.iter().map(|r| (r.label, r.value.as_str())).collect();
        assert_eq!(
            pairs,
            vec![
                ("Action:", "Collect Payment"),
                ("Amount:", "50 USDT (tron)"),
                ("Sent by:", "alice"),
                ("Transaction ID:", "123"),
            ]
        );
    }

    #[test]
    fn test_platform_options_follow_availability() {
        let ready = ReadyState {
            link: Some(link(LinkKind::RequestLink, Intent::Request, None, None)),
            redirects: RedirectLinks {
                request_redirect_link: RedirectSet::with_url("https://pay.example/r"),
                send_link_redirect: RedirectSet {
                    telegram_url: Some("https://t.me/bot/app".to_string()),
                    ..RedirectSet::with_url("https://pay.example/s")
                },
            },
        };
        let options = platform_options(&ready);
        let enabled: Vec<(Platform, bool)> = options.iter().map(|o| (o.platform, o.enabled)).collect();
        assert_eq!(
            enabled,
            vec![
                (Platform::Telegram, false),
                (Platform::Web, true),
                (Platform::Mobile, true),
            ]
        );
        assert_eq!(options[0].caption, "Pay via Telegram Mini App");
    }

    #[test]
    fn test_platform_options_disabled_without_link() {
        let ready = ReadyState {
            link: None,
            redirects: RedirectLinks {
                request_redirect_link: RedirectSet::with_url("https://pay.example/r"),
                send_link_redirect: RedirectSet::with_url("https://pay.example/s"),
            },
        };
        let options = platform_options(&ready);
        assert!(options.iter().all(|o| !o.enabled));
        assert_eq!(options[1].caption, "Collect in your browser");
    }
}
