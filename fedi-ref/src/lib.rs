use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error as ThisError;

mod config;
mod text;

pub use config::{Config, ConfigError, PUBLIC_ADDRESS};
pub use text::{decode_html_entities, encode_tag, slugify};

#[derive(Clone, Debug, ThisError)]
pub enum RefError {
    #[error("Does not match as {ref_type}: {input}")]
    BadFormat {
        ref_type: &'static str,
        input: String,
    },
}

/// Identifier of a user, post or topic that is either local (numeric) or
/// remote (an absolute URI owned by a peer).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ObjectId {
    Local(u64),
    Remote(String),
}

impl ObjectId {
    // Anything that reads as a number is local, everything else is a peer's URI.
    pub fn from_string(string: String) -> Result<Self, RefError> {
        let trimmed = string.trim();
        if trimmed.is_empty() {
            return Err(RefError::BadFormat {
                ref_type: "Object",
                input: string,
            });
        }
        match trimmed.parse::<u64>() {
            Ok(id) => Ok(ObjectId::Local(id)),
            Err(_) => Ok(ObjectId::Remote(string)),
        }
    }

    /// Canonical URI: remote ids pass through verbatim, local ids are
    /// synthesized under the site base URL for the given kind.
    pub fn to_uri(&self, config: &Config, kind: LocalKind) -> String {
        match self {
            ObjectId::Local(id) => config.local_uri(kind, *id),
            ObjectId::Remote(uri) => uri.clone(),
        }
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectId::Local(id) => write!(f, "{}", id),
            ObjectId::Remote(uri) => f.write_str(uri),
        }
    }
}

impl From<u64> for ObjectId {
    fn from(value: u64) -> Self {
        ObjectId::Local(value)
    }
}

// Stored ids show up both as JSON numbers and as strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawObjectId {
    Number(u64),
    Text(String),
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match RawObjectId::deserialize(deserializer)? {
            RawObjectId::Number(id) => Ok(ObjectId::Local(id)),
            RawObjectId::Text(text) => {
                ObjectId::from_string(text).map_err(serde::de::Error::custom)
            }
        }
    }
}

impl Serialize for ObjectId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            ObjectId::Local(id) => serializer.serialize_u64(*id),
            ObjectId::Remote(uri) => serializer.serialize_str(uri),
        }
    }
}

/// Kinds of local entity that have a canonical URI.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LocalKind {
    User,
    Post,
    Category,
}

impl LocalKind {
    pub fn path_segment(&self) -> &'static str {
        match self {
            LocalKind::User => "uid",
            LocalKind::Post => "post",
            LocalKind::Category => "category",
        }
    }
}

/// Kinds of local actor. Both share one address space on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActorKind {
    User,
    Category,
}

impl ActorKind {
    /// Short key used by the key store (`uid` / `cid`).
    pub fn as_str(&self) -> &'static str {
        match self {
            ActorKind::User => "uid",
            ActorKind::Category => "cid",
        }
    }

    pub fn local_kind(&self) -> LocalKind {
        match self {
            ActorKind::User => LocalKind::User,
            ActorKind::Category => LocalKind::Category,
        }
    }
}

impl fmt::Display for ActorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config::new("https://forum.example.org").unwrap()
    }

    #[test]
    fn test_numeric_id_is_local() {
        assert_eq!(
            ObjectId::from_string("42".to_string()).unwrap(),
            ObjectId::Local(42)
        );
    }

    #[test]
    fn test_uri_id_is_remote() {
        assert_eq!(
            ObjectId::from_string("https://remote.example/users/bob".to_string()).unwrap(),
            ObjectId::Remote("https://remote.example/users/bob".to_string())
        );
    }

    #[test]
    fn test_empty_id_is_rejected() {
        assert!(ObjectId::from_string("  ".to_string()).is_err());
    }

    #[test]
    fn test_to_uri() {
        let config = config();
        assert_eq!(
            ObjectId::Local(7).to_uri(&config, LocalKind::Post),
            "https://forum.example.org/post/7"
        );
        assert_eq!(
            ObjectId::Local(3).to_uri(&config, LocalKind::User),
            "https://forum.example.org/uid/3"
        );
        assert_eq!(
            ObjectId::Remote("https://remote.example/notes/1".to_string())
                .to_uri(&config, LocalKind::Post),
            "https://remote.example/notes/1"
        );
    }

    #[test]
    fn test_deserialize_number_and_string() {
        let ids: Vec<ObjectId> =
            serde_json::from_str(r#"[5, "6", "https://remote.example/u/1"]"#).unwrap();
        assert_eq!(
            ids,
            vec![
                ObjectId::Local(5),
                ObjectId::Local(6),
                ObjectId::Remote("https://remote.example/u/1".to_string()),
            ]
        );
    }

    #[test]
    fn test_serialize() {
        let json = serde_json::to_string(&vec![
            ObjectId::Local(5),
            ObjectId::Remote("https://remote.example/u/1".to_string()),
        ])
        .unwrap();
        assert_eq!(json, r#"[5,"https://remote.example/u/1"]"#);
    }

    #[test]
    fn test_actor_kind_keys() {
        assert_eq!(ActorKind::User.as_str(), "uid");
        assert_eq!(ActorKind::Category.to_string(), "cid");
    }
}
