//! `application/x-www-form-urlencoded` field extraction.
//!
//! A field's value is everything after the first `=` of the first pair whose
//! name matches, percent-decoded. `+` is kept as-is; the list page turns it
//! into a space at display time.

use std::borrow::Cow;

/// Value of the first `key=value` pair named `key`, if any.
pub fn form_field(body: &str, key: &str) -> Option<String> {
    body.split('&').find_map(|pair| {
        let (name, value) = pair.split_once('=')?;
        (name == key).then(|| percent_decode(value))
    })
}

fn percent_decode(value: &str) -> String {
    match urlencoding::decode_binary(value.as_bytes()) {
        Cow::Borrowed(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        Cow::Owned(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
    }
}
