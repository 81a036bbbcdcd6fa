use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::borrow::Cow;
use urlencoding::encode;

fn invalid_slug_chars_regex() -> &'static Regex {
    lazy_static! {
        static ref RE: Regex = Regex::new(r"[^\p{L}\p{N}\s_-]").unwrap();
    }
    &*RE
}

fn whitespace_regex() -> &'static Regex {
    lazy_static! {
        static ref RE: Regex = Regex::new(r"\s+").unwrap();
    }
    &*RE
}

fn dashes_regex() -> &'static Regex {
    lazy_static! {
        static ref RE: Regex = Regex::new(r"-+").unwrap();
    }
    &*RE
}

fn entity_regex() -> &'static Regex {
    lazy_static! {
        static ref RE: Regex = Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|[a-zA-Z]+);").unwrap();
    }
    &*RE
}

/// Lowercase, dash-separated form of a display name, keeping letters of any script.
pub fn slugify(text: &str) -> String {
    let lowered = text.trim().to_lowercase();
    let replaced = invalid_slug_chars_regex().replace_all(&lowered, "-");
    let dashed = whitespace_regex().replace_all(&replaced, "-");
    let collapsed = dashes_regex().replace_all(&dashed, "-");
    collapsed.trim_matches('-').to_string()
}

/// URL-safe encoding of a topic tag, as used in `/tags/{tag}` links.
pub fn encode_tag(value: &str) -> String {
    encode(value).into_owned()
}

/// Decode the entities that upload paths pick up when they pass through
/// HTML-escaped settings. Unknown named entities are left untouched.
pub fn decode_html_entities(text: &str) -> Cow<'_, str> {
    entity_regex().replace_all(text, |caps: &Captures| {
        let entity = &caps[1];
        let decoded = if let Some(hex) = entity
            .strip_prefix("#x")
            .or_else(|| entity.strip_prefix("#X"))
        {
            u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
        } else if let Some(dec) = entity.strip_prefix('#') {
            dec.parse::<u32>().ok().and_then(char::from_u32)
        } else {
            named_entity(entity)
        };
        match decoded {
            Some(ch) => ch.to_string(),
            None => caps[0].to_string(),
        }
    })
}

fn named_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        "sol" => Some('/'),
        "equals" => Some('='),
        "colon" => Some(':'),
        "grave" => Some('`'),
        _ => None,
    }
}
