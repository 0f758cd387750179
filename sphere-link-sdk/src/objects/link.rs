//! Payment link payload types.

use serde::{Deserialize, Serialize};

/// The two link families carried in the `data` page parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkKind {
    RequestLink,
    SendLink,
}

impl LinkKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            LinkKind::RequestLink => "request_link",
            LinkKind::SendLink => "send_link",
        }
    }

    /// Match a parameter prefix such as `request_link`.
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "request_link" => Some(LinkKind::RequestLink),
            "send_link" => Some(LinkKind::SendLink),
            _ => None,
        }
    }
}

impl std::fmt::Display for LinkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LinkKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_prefix(s).ok_or_else(|| format!("unknown link kind: {s}"))
    }
}

/// Whether the link asks the reader to pay or to collect a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Request,
    Send,
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Intent::Request => write!(f, "request"),
            Intent::Send => write!(f, "send"),
        }
    }
}

impl std::str::FromStr for Intent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "request" => Ok(Intent::Request),
            "send" => Ok(Intent::Send),
            other => Err(format!("unknown intent: {other}")),
        }
    }
}

/// Amount as written by the link issuer.
///
/// Issuers send either a JSON number or a string; the value is never
/// interpreted, only displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Number(serde_json::Number),
    Text(String),
}

impl Amount {
    /// Interpret `s` as a JSON number when possible, keeping it as text
    /// otherwise.
    pub fn parse_lenient(s: &str) -> Self {
        serde_json::from_str::<serde_json::Number>(s)
            .map(Amount::Number)
            .unwrap_or_else(|_| Amount::Text(s.to_owned()))
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Amount::Number(n) => write!(f, "{n}"),
            Amount::Text(s) => f.write_str(s),
        }
    }
}

/// Decoded body of a payment link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkPayload {
    pub intent: Intent,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Amount>,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// A successfully decoded `data` parameter.
///
/// `raw_param` is the parameter exactly as it appeared in the page URL and
/// is what gets forwarded to every redirect target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLink {
    pub kind: LinkKind,
    pub payload: LinkPayload,
    pub raw_param: String,
}

impl ParsedLink {
    pub fn is_request(&self) -> bool {
        self.kind == LinkKind::RequestLink
    }
}
