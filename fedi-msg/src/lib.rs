// https://www.w3.org/TR/activitystreams-vocabulary/

use serde::{
    de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor},
    Deserialize, Deserializer, Serialize, Serializer,
};
use serde_json::Value;
use serde_with::{serde_as, DefaultOnError, DeserializeAs};
use std::fmt;

pub mod forum;

pub const ACTIVITYSTREAMS_CONTEXT: &str = "https://www.w3.org/ns/activitystreams";

pub const MARKDOWN_MEDIA_TYPE: &str = "text/markdown";

fn activitystreams_context() -> String {
    ACTIVITYSTREAMS_CONTEXT.to_string()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub enum ObjectType {
    Note,
    Page,
    Article,
    #[serde(other)]
    Unknown,
}

impl ObjectType {
    /// Object types cached locally as posts.
    pub fn is_post(&self) -> bool {
        matches!(self, ObjectType::Note | ObjectType::Page | ObjectType::Article)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub enum ActorType {
    Person,
    Group,
}

/// An `icon` or `image` value. Peers send either a bare URL or an object
/// describing the image; both are folded into this at the boundary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MediaLink {
    PlainUrl(String),
    Described {
        kind: String,
        media_type: Option<String>,
        url: String,
    },
}

impl MediaLink {
    pub fn image(media_type: Option<String>, url: String) -> Self {
        MediaLink::Described {
            kind: "Image".to_string(),
            media_type,
            url,
        }
    }

    pub fn url(&self) -> &str {
        match self {
            MediaLink::PlainUrl(url) => url,
            MediaLink::Described { url, .. } => url,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageObject {
    #[serde(rename = "type", default = "ImageObject::default_kind")]
    kind: String,
    #[serde(default)]
    media_type: Option<String>,
    url: String,
}

impl ImageObject {
    fn default_kind() -> String {
        "Image".to_string()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageObjectRef<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    media_type: Option<&'a str>,
    url: &'a str,
}

impl Serialize for MediaLink {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            MediaLink::PlainUrl(url) => serializer.serialize_str(url),
            MediaLink::Described {
                kind,
                media_type,
                url,
            } => ImageObjectRef {
                kind: kind.as_str(),
                media_type: media_type.as_deref(),
                url: url.as_str(),
            }
            .serialize(serializer),
        }
    }
}

// https://serde.rs/string-or-struct.html
impl<'de> Deserialize<'de> for MediaLink {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DeserializeMediaLink;

        impl<'de> Visitor<'de> for DeserializeMediaLink {
            type Value = MediaLink;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("url string, image object or list of those")
            }

            fn visit_str<E>(self, value: &str) -> Result<MediaLink, E>
            where
                E: de::Error,
            {
                Ok(MediaLink::PlainUrl(value.to_string()))
            }

            fn visit_map<M>(self, map: M) -> Result<MediaLink, M::Error>
            where
                M: MapAccess<'de>,
            {
                let image: ImageObject =
                    Deserialize::deserialize(de::value::MapAccessDeserializer::new(map))?;
                Ok(MediaLink::Described {
                    kind: image.kind,
                    media_type: image.media_type,
                    url: image.url,
                })
            }

            // some peers send several sizes, the first one wins
            fn visit_seq<S>(self, mut seq: S) -> Result<MediaLink, S::Error>
            where
                S: SeqAccess<'de>,
            {
                let first = seq
                    .next_element::<MediaLink>()?
                    .ok_or_else(|| de::Error::invalid_length(0, &self))?;
                while seq.next_element::<IgnoredAny>()?.is_some() {}
                Ok(first)
            }
        }

        deserializer.deserialize_any(DeserializeMediaLink)
    }
}

/// Reads a reference to another object down to its id. Peers send a bare
/// id, an embedded object (or link) carrying the id, or a list of those, in
/// which case the first entry wins.
pub struct FirstId;

struct LinkedId(String);

#[derive(Deserialize)]
struct EmbeddedObject {
    #[serde(alias = "href")]
    id: String,
}

impl<'de> Deserialize<'de> for LinkedId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DeserializeLinkedId;

        impl<'de> Visitor<'de> for DeserializeLinkedId {
            type Value = LinkedId;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("object id, object with an id or list of those")
            }

            fn visit_str<E>(self, value: &str) -> Result<LinkedId, E>
            where
                E: de::Error,
            {
                Ok(LinkedId(value.to_string()))
            }

            fn visit_map<M>(self, map: M) -> Result<LinkedId, M::Error>
            where
                M: MapAccess<'de>,
            {
                let object: EmbeddedObject =
                    Deserialize::deserialize(de::value::MapAccessDeserializer::new(map))?;
                Ok(LinkedId(object.id))
            }

            fn visit_seq<S>(self, mut seq: S) -> Result<LinkedId, S::Error>
            where
                S: SeqAccess<'de>,
            {
                let first = seq
                    .next_element::<LinkedId>()?
                    .ok_or_else(|| de::Error::invalid_length(0, &self))?;
                while seq.next_element::<IgnoredAny>()?.is_some() {}
                Ok(first)
            }
        }

        deserializer.deserialize_any(DeserializeLinkedId)
    }
}

impl<'de> DeserializeAs<'de, String> for FirstId {
    fn deserialize_as<D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        LinkedId::deserialize(deserializer).map(|linked| linked.0)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_inbox: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicKey {
    pub id: String,
    pub owner: String,
    pub public_key_pem: String,
}

/// Actor as published by this site.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    #[serde(rename = "@context", default = "activitystreams_context")]
    pub context: String,
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ActorType,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub followers: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub following: Option<String>,
    pub inbox: String,
    pub outbox: String,
    pub endpoints: Endpoints,
    pub name: String,
    pub preferred_username: String,
    pub summary: Option<String>,
    pub icon: Option<MediaLink>,
    pub image: Option<MediaLink>,
    pub public_key: PublicKey,
}

/// Actor as received from a peer. Only `id` is required, everything else
/// is read leniently.
#[serde_as]
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteActor {
    pub id: String,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub preferred_username: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub name: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub summary: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub icon: Option<MediaLink>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub image: Option<MediaLink>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub published: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub inbox: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub endpoints: Option<Endpoints>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub follower_count: Option<u64>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub following_count: Option<u64>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(alias = "postcount", default)]
    pub post_count: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    pub content: String,
    pub media_type: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type")]
pub enum Tag {
    Hashtag { href: String, name: String },
    Mention { href: String, name: String },
}

/// Note as published by this site.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    #[serde(rename = "@context", default = "activitystreams_context")]
    pub context: String,
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ObjectType,
    pub to: Vec<String>,
    pub cc: Vec<String>,
    pub in_reply_to: Option<String>,
    pub published: String,
    pub url: String,
    pub attributed_to: String,
    pub audience: String,
    pub sensitive: bool,
    pub summary: Option<String>,
    pub name: Option<String>,
    pub content: String,
    pub source: Source,
    pub tag: Vec<Tag>,
    pub attachment: Vec<Value>,
}

/// Note, Page or Article (or anything else) as received from a peer.
/// Addressing and attachment fields are kept as raw JSON.
#[serde_as]
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteObject {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ObjectType,
    #[serde_as(deserialize_as = "DefaultOnError<FirstId>")]
    #[serde(default)]
    pub attributed_to: String,
    #[serde_as(deserialize_as = "DefaultOnError<Option<FirstId>>")]
    #[serde(default)]
    pub in_reply_to: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub published: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub updated: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub name: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub content: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub source_content: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub source: Option<Source>,
    #[serde(default)]
    pub to: Option<Value>,
    #[serde(default)]
    pub cc: Option<Value>,
    #[serde(default)]
    pub attachment: Option<Value>,
    #[serde(default)]
    pub tag: Option<Value>,
}
