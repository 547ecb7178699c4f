//! Share reference decoding
//!
//! A share reference is any string carrying Base64-encoded markup after a
//! `#`, typically a URL fragment: `https://example.com/#PGgxPmhpPC9oMT4=`.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;

use crate::{Error, Result};

const LENIENT: GeneralPurposeConfig =
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent);

const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT);
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT);

/// Decode the tool markup carried by a share reference.
///
/// The payload is the text after the first `#`, up to the next `#` if
/// there is one. Standard and URL-safe alphabets are accepted, with or
/// without padding. The decoded text is returned as-is.
///
/// # Errors
///
/// - [`Error::InvalidReference`] if there is no `#`
/// - [`Error::EmptyPayload`] if nothing follows it
/// - [`Error::Decode`] if the payload is not Base64 or not UTF-8
pub fn decode_reference(reference: &str) -> Result<String> {
    let (_, rest) = reference
        .trim()
        .split_once('#')
        .ok_or(Error::InvalidReference)?;
    let payload = rest.split_once('#').map_or(rest, |(payload, _)| payload);

    if payload.is_empty() {
        return Err(Error::EmptyPayload);
    }

    let engine = if payload.contains(['-', '_']) {
        &URL_SAFE_LENIENT
    } else {
        &STANDARD_LENIENT
    };

    let bytes = engine.decode(payload).map_err(|e| Error::Decode {
        reason: e.to_string(),
    })?;

    String::from_utf8(bytes).map_err(|e| Error::Decode {
        reason: e.to_string(),
    })
}

/// Build a share reference for `text` on top of `base`.
pub fn encode_reference(base: &str, text: &str) -> String {
    format!("{}#{}", base, STANDARD.encode(text))
}
