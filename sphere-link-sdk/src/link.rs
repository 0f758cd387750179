//! Decoding of the `data` page parameter.
//!
//! A payment link page carries a single query parameter:
//!
//! ```text
//! ?data={request_link|send_link}-{base64(json)}
//! ```
//!
//! Decoding is pure. The original parameter value is kept verbatim in
//! [`ParsedLink::raw_param`] so it can be forwarded to redirect targets.

use serde::Deserialize;
use url::Url;

use crate::objects::{Amount, Intent, LinkKind, LinkPayload, ParsedLink};

/// Name of the page query parameter holding the link.
pub const DATA_PARAM: &str = "data";

/// Errors produced while decoding a link parameter.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid page url: {0}")]
    InvalidPageUrl(#[from] url::ParseError),
    #[error("no data parameter found in url")]
    MissingParameter,
    #[error("data parameter does not match {{request_link|send_link}}-{{base64}}")]
    MalformedParameter,
    #[error("invalid base64 encoding")]
    InvalidEncoding,
    #[error("invalid payload: {0}")]
    InvalidPayload(#[from] PayloadError),
}

/// Why a decoded payload was rejected.
#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    #[error("payload is not utf-8")]
    NotUtf8,
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
}

impl DecodeError {
    /// Message shown to the user on the error screen.
    pub fn user_message(&self) -> &'static str {
        match self {
            DecodeError::MissingParameter => "No data parameter found in URL",
            DecodeError::MalformedParameter => {
                "Invalid data format. Expected: request_link-{base64} or send_link-{base64}"
            }
            DecodeError::InvalidPayload(PayloadError::MissingField(_)) => {
                "Missing required fields in decoded data"
            }
            DecodeError::InvalidPageUrl(_)
            | DecodeError::InvalidEncoding
            | DecodeError::InvalidPayload(_) => {
                "Failed to parse URL data. Please check the format."
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Decode the `data` parameter of a full page URL.
pub fn decode_page_url(page_url: &str) -> Result<ParsedLink, DecodeError> {
    let url = Url::parse(page_url)?;
    let param = url
        .query_pairs()
        .find(|(key, _)| key == DATA_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
        .ok_or(DecodeError::MissingParameter)?;
    decode_param(&param)
}

/// Decode a raw `data` parameter value.
pub fn decode_param(param: &str) -> Result<ParsedLink, DecodeError> {
    let (prefix, encoded) = param
        .split_once('-')
        .ok_or(DecodeError::MalformedParameter)?;
    let kind = LinkKind::from_prefix(prefix).ok_or(DecodeError::MalformedParameter)?;
    if encoded.is_empty() || encoded.contains(is_line_terminator) {
        return Err(DecodeError::MalformedParameter);
    }

    let bytes = forgiving_base64_decode(encoded)?;
    let text = std::str::from_utf8(&bytes).map_err(|_| PayloadError::NotUtf8)?;
    let payload = parse_payload(text)?;

    Ok(ParsedLink {
        kind,
        payload,
        raw_param: param.to_owned(),
    })
}

/// Fields as they may appear on the wire; presence is checked afterwards.
#[derive(Deserialize)]
struct WirePayload {
    intent: Option<Intent>,
    id: Option<String>,
    amount: Option<Amount>,
    username: Option<String>,
    chain: Option<String>,
    token: Option<String>,
}

fn required(value: Option<String>, field: &'static str) -> Result<String, PayloadError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(PayloadError::MissingField(field))
}

fn parse_payload(text: &str) -> Result<LinkPayload, PayloadError> {
    let wire: WirePayload = serde_json::from_str(text)?;
    let intent = wire.intent.ok_or(PayloadError::MissingField("intent"))?;
    Ok(LinkPayload {
        intent,
        id: required(wire.id, "id")?,
        amount: wire.amount,
        username: required(wire.username, "username")?,
        chain: wire.chain,
        token: wire.token,
    })
}

/// Line terminators end the encoded part of a link; they are never skipped
/// as whitespace.
fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

const BASE64_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// Clear the bits of a final partial quantum that do not reach an output
/// byte. `atob` ignores them while the strict codec rejects them.
fn clear_trailing_bits(compact: &mut String) {
    let mask = match compact.len() % 4 {
        2 => 0b11_0000,
        3 => 0b11_1100,
        _ => return,
    };
    let Some(last) = compact.pop() else {
        return;
    };
    let cleared = u8::try_from(last)
        .ok()
        .and_then(|b| BASE64_ALPHABET.iter().position(|&a| a == b))
        .map_or(last, |index| char::from(BASE64_ALPHABET[index & mask]));
    compact.push(cleared);
}

/// Standard-alphabet base64 with browser `atob` leniency: ASCII whitespace
/// is ignored, trailing padding is optional and unused trailing bits may be
/// set.
fn forgiving_base64_decode(input: &str) -> Result<Vec<u8>, DecodeError> {
    let mut compact: String = input
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    if compact.len() % 4 == 0 {
        for _ in 0..2 {
            if compact.ends_with('=') {
                compact.pop();
            }
        }
    }
    if compact.len() % 4 == 1 || compact.contains('=') {
        return Err(DecodeError::InvalidEncoding);
    }
    clear_trailing_bits(&mut compact);
    fast32::base64::RFC4648_NOPAD
        .decode_str(&compact)
        .map_err(|_| DecodeError::InvalidEncoding)
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Build a `data` parameter value for `payload`.
pub fn encode_param(kind: LinkKind, payload: &LinkPayload) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string(payload)?;
    Ok(format!("{}-{}", kind.as_str(), base64_encode_padded(json.as_bytes())))
}

/// Standard-alphabet base64 with `=` padding.
fn base64_encode_padded(bytes: &[u8]) -> String {
    let mut encoded = fast32::base64::RFC4648_NOPAD.encode(bytes);
    while encoded.len() % 4 != 0 {
        encoded.push('=');
    }
    encoded
}
