//! Remote Notes, Pages and Articles as local post records.
//!
//! Topic assignment is not done here, that belongs to whoever reconciles
//! reply chains into local topics.

use fedi_msg::RemoteObject;
use log::{trace, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::parse_epoch_millis;

/// Addressing and attachments exactly as the peer sent them.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct ProtocolEnvelope {
    pub to: Option<Value>,
    pub cc: Option<Value>,
    pub attachment: Option<Value>,
    pub tag: Option<Value>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedPost {
    pub author_ref: String,
    pub post_ref: String,
    pub title: Option<String>,
    pub content: String,
    pub source_content: Option<String>,
    /// `None` when `published` could not be read.
    pub timestamp: Option<i64>,
    pub parent_ref: Option<String>,
    pub edited_at: Option<i64>,
    /// Peers don't say who edited a post, so edits are credited to its author.
    pub editor_ref: Option<String>,
    #[serde(rename = "_activitypub")]
    pub protocol_envelope: ProtocolEnvelope,
}

/// `None` for object types that are not cached as posts.
pub fn normalize_one(object: &RemoteObject) -> Option<NormalizedPost> {
    if !object.kind.is_post() {
        warn!("Ignoring remote object {} of unsupported type", object.id);
        return None;
    }
    trace!("Normalizing remote post {}", object.id);

    let edited_at = object.updated.as_deref().and_then(parse_epoch_millis);
    let editor_ref = edited_at.map(|_| object.attributed_to.clone());
    let source_content = object.source_content.clone().or_else(|| {
        object
            .source
            .as_ref()
            .map(|source| source.content.clone())
    });

    Some(NormalizedPost {
        author_ref: object.attributed_to.clone(),
        post_ref: object.id.clone(),
        title: object.name.clone(),
        content: object.content.clone().unwrap_or_default(),
        source_content,
        timestamp: object.published.as_deref().and_then(parse_epoch_millis),
        parent_ref: object.in_reply_to.clone(),
        edited_at,
        editor_ref,
        protocol_envelope: ProtocolEnvelope {
            to: object.to.clone(),
            cc: object.cc.clone(),
            attachment: object.attachment.clone(),
            tag: object.tag.clone(),
        },
    })
}

/// Element-wise [`normalize_one`]; missing inputs stay missing.
pub fn normalize_many(objects: &[Option<RemoteObject>]) -> Vec<Option<NormalizedPost>> {
    objects
        .iter()
        .map(|object| object.as_ref().and_then(normalize_one))
        .collect()
}
