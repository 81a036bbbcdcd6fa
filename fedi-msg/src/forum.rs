//! Local forum entities, as handed to the outbound builders by the entity
//! store and the post hydration step.

use fedi_ref::{encode_tag, ObjectId};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalUser {
    pub uid: u64,
    pub username: String,
    pub userslug: String,
    pub display_name: String,
    #[serde(default)]
    pub about_me: Option<String>,
    /// Site-relative avatar path, e.g. `/assets/uploads/profile/1-avatar.png`.
    #[serde(default)]
    pub picture: Option<String>,
    #[serde(default)]
    pub cover_url: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalCategory {
    pub cid: u64,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub background_image: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicTag {
    pub value: String,
    pub value_encoded: String,
}

impl TopicTag {
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        let value_encoded = encode_tag(&value);
        Self {
            value,
            value_encoded,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HydratedTopic {
    pub tid: u64,
    /// `{tid}/{title-slug}`
    pub slug: String,
    pub is_main_post: bool,
    #[serde(default)]
    pub tags: Vec<TopicTag>,
    /// Author of the topic, local or remote.
    pub uid: ObjectId,
    pub main_pid: ObjectId,
}

/// A local post with the fields delivery needs already joined in.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HydratedPost {
    pub pid: u64,
    pub uid: u64,
    #[serde(default)]
    pub to_pid: Option<ObjectId>,
    /// Milliseconds since the epoch, as stored.
    pub timestamp: i64,
    /// Markdown as written by the author.
    pub raw_content: String,
    /// Rendered HTML.
    pub content: String,
    pub topic: HydratedTopic,
}

/// How a post hangs off its topic. Exactly one applies to any post.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Threading<'a> {
    DirectReply {
        parent: &'a ObjectId,
    },
    TopicReply {
        main_pid: &'a ObjectId,
        topic_author: &'a ObjectId,
    },
    NewTopic,
}

impl HydratedPost {
    pub fn threading(&self) -> Threading<'_> {
        if let Some(parent) = &self.to_pid {
            Threading::DirectReply { parent }
        } else if !self.topic.is_main_post {
            Threading::TopicReply {
                main_pid: &self.topic.main_pid,
                topic_author: &self.topic.uid,
            }
        } else {
            Threading::NewTopic
        }
    }
}
