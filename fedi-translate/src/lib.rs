//! Translation between local forum entities and federation protocol objects.
//!
//! Outbound, [`ActorBuilder`] and [`NoteBuilder`] project users, categories
//! and posts into objects ready for delivery. Inbound, [`profile`] and
//! [`post`] normalize what peers send into the shape the forum caches.
//! Nothing here keeps state; every lookup goes through the traits in
//! [`ports`].

use chrono::{DateTime, SecondsFormat, Utc};
use fedi_ref::RefError;
use thiserror::Error as ThisError;

mod actor;
mod note;
pub mod ports;
pub mod post;
pub mod profile;

pub use actor::ActorBuilder;
pub use note::NoteBuilder;
pub use ports::LookupError;
pub use post::{NormalizedPost, ProtocolEnvelope};
pub use profile::NormalizedProfile;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("Lookup failed, cause: {0}")]
    Lookup(#[from] LookupError),
    #[error("Failed to parse actor id {input}, cause: {source}")]
    BadActorId {
        input: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Actor id has no hostname: {0}")]
    MissingHost(String),
    #[error("Stored timestamp is out of range: {0}")]
    BadTimestamp(i64),
    #[error("Bad reference, cause: {0}")]
    Ref(#[from] RefError),
}

/// Milliseconds since the epoch for a protocol date, `None` when it can't be read.
pub(crate) fn parse_epoch_millis(text: &str) -> Option<i64> {
    DateTime::parse_from_rfc3339(text)
        .or_else(|_| DateTime::parse_from_rfc2822(text))
        .ok()
        .map(|date| date.timestamp_millis())
}

pub(crate) fn format_epoch_millis(millis: i64) -> Result<String, Error> {
    let date = DateTime::<Utc>::from_timestamp_millis(millis).ok_or(Error::BadTimestamp(millis))?;
    Ok(date.to_rfc3339_opts(SecondsFormat::Millis, true))
}
