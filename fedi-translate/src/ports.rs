//! Lookups the builders and normalizers depend on. Implementations live with
//! the caller (entity store, key store, uploads, plugins); failures come back
//! as [`LookupError`] and are passed on untouched.

use async_trait::async_trait;
use fedi_msg::forum::{LocalCategory, LocalUser};
use fedi_ref::{ActorKind, ObjectId};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error as ThisError;

#[derive(Clone, Debug, ThisError)]
pub enum LookupError {
    #[error("No {kind} found for {id}")]
    NotFound { kind: &'static str, id: String },
    #[error("Lookup unavailable: {message}")]
    Unavailable { message: String },
}

#[async_trait]
pub trait EntityStore: Send + Sync {
    async fn user(&self, uid: u64) -> Result<LocalUser, LookupError>;

    async fn category(&self, cid: u64) -> Result<LocalCategory, LookupError>;
}

#[async_trait]
pub trait KeyStore: Send + Sync {
    /// PEM-encoded public key of a local actor.
    async fn public_key(&self, kind: ActorKind, id: u64) -> Result<String, LookupError>;
}

#[async_trait]
pub trait MediaResolver: Send + Sync {
    /// Path on disk of the user's uploaded avatar.
    async fn user_avatar_path(&self, uid: u64) -> Result<PathBuf, LookupError>;

    async fn user_cover_path(&self, uid: u64) -> Result<PathBuf, LookupError>;

    /// Mime type guessed from a file name, `None` when unknown.
    fn media_type(&self, path: &Path) -> Option<String>;
}

/// A mention found in post text. `id` is a numeric uid for local users and
/// the actor URI for remote ones; `slug` is the handle as written, `@` included.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct MentionMatch {
    pub id: String,
    pub slug: String,
}

/// Optional capability: only present when the site has mentions turned on.
#[async_trait]
pub trait Mentions: Send + Sync {
    async fn matches(&self, text: &str) -> Result<Vec<MentionMatch>, LookupError>;
}

#[async_trait]
pub trait TopicLookup: Send + Sync {
    async fn title(&self, tid: u64) -> Result<String, LookupError>;
}

#[async_trait]
pub trait PostLookup: Send + Sync {
    /// Author of a post, local or remote.
    async fn author(&self, pid: &ObjectId) -> Result<ObjectId, LookupError>;
}

#[async_trait]
pub trait IconPalette: Send + Sync {
    /// Ordered background colours for avatar placeholders.
    async fn backgrounds(&self) -> Result<Vec<String>, LookupError>;
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use std::collections::HashMap;

    pub(crate) fn unavailable(message: &str) -> LookupError {
        LookupError::Unavailable {
            message: message.to_string(),
        }
    }

    #[derive(Default)]
    pub(crate) struct FixtureEntityStore {
        pub(crate) users: HashMap<u64, LocalUser>,
        pub(crate) categories: HashMap<u64, LocalCategory>,
    }

    #[async_trait]
    impl EntityStore for FixtureEntityStore {
        async fn user(&self, uid: u64) -> Result<LocalUser, LookupError> {
            self.users.get(&uid).cloned().ok_or(LookupError::NotFound {
                kind: "user",
                id: uid.to_string(),
            })
        }

        async fn category(&self, cid: u64) -> Result<LocalCategory, LookupError> {
            self.categories
                .get(&cid)
                .cloned()
                .ok_or(LookupError::NotFound {
                    kind: "category",
                    id: cid.to_string(),
                })
        }
    }

    pub(crate) struct FixtureKeyStore;

    #[async_trait]
    impl KeyStore for FixtureKeyStore {
        async fn public_key(&self, kind: ActorKind, id: u64) -> Result<String, LookupError> {
            Ok(format!(
                "-----BEGIN PUBLIC KEY-----\n{}:{}\n-----END PUBLIC KEY-----",
                kind, id
            ))
        }
    }

    pub(crate) struct FailingKeyStore;

    #[async_trait]
    impl KeyStore for FailingKeyStore {
        async fn public_key(&self, _kind: ActorKind, _id: u64) -> Result<String, LookupError> {
            Err(unavailable("key store offline"))
        }
    }

    pub(crate) struct FixtureMediaResolver;

    #[async_trait]
    impl MediaResolver for FixtureMediaResolver {
        async fn user_avatar_path(&self, uid: u64) -> Result<PathBuf, LookupError> {
            Ok(PathBuf::from(format!("/srv/uploads/profile/{}-avatar.png", uid)))
        }

        async fn user_cover_path(&self, uid: u64) -> Result<PathBuf, LookupError> {
            Ok(PathBuf::from(format!("/srv/uploads/profile/{}-cover.jpg", uid)))
        }

        fn media_type(&self, path: &Path) -> Option<String> {
            match path.extension()?.to_str()? {
                "png" => Some("image/png".to_string()),
                "jpg" | "jpeg" => Some("image/jpeg".to_string()),
                "svg" => Some("image/svg+xml".to_string()),
                _ => None,
            }
        }
    }

    #[derive(Default)]
    pub(crate) struct FixtureMentions {
        pub(crate) matches: Vec<MentionMatch>,
    }

    impl FixtureMentions {
        pub(crate) fn new(matches: &[(&str, &str)]) -> Self {
            Self {
                matches: matches
                    .iter()
                    .map(|(id, slug)| MentionMatch {
                        id: id.to_string(),
                        slug: slug.to_string(),
                    })
                    .collect(),
            }
        }
    }

    #[async_trait]
    impl Mentions for FixtureMentions {
        async fn matches(&self, _text: &str) -> Result<Vec<MentionMatch>, LookupError> {
            Ok(self.matches.clone())
        }
    }

    pub(crate) struct FailingMentions;

    #[async_trait]
    impl Mentions for FailingMentions {
        async fn matches(&self, _text: &str) -> Result<Vec<MentionMatch>, LookupError> {
            Err(unavailable("mentions plugin crashed"))
        }
    }

    #[derive(Default)]
    pub(crate) struct FixtureTopics {
        pub(crate) titles: HashMap<u64, String>,
    }

    #[async_trait]
    impl TopicLookup for FixtureTopics {
        async fn title(&self, tid: u64) -> Result<String, LookupError> {
            self.titles.get(&tid).cloned().ok_or(LookupError::NotFound {
                kind: "topic",
                id: tid.to_string(),
            })
        }
    }

    #[derive(Default)]
    pub(crate) struct FixturePosts {
        pub(crate) authors: HashMap<ObjectId, ObjectId>,
    }

    #[async_trait]
    impl PostLookup for FixturePosts {
        async fn author(&self, pid: &ObjectId) -> Result<ObjectId, LookupError> {
            self.authors.get(pid).cloned().ok_or(LookupError::NotFound {
                kind: "post",
                id: pid.to_string(),
            })
        }
    }

    pub(crate) struct FixturePalette(pub(crate) Vec<String>);

    impl FixturePalette {
        pub(crate) fn new(colors: &[&str]) -> Self {
            Self(colors.iter().map(|color| color.to_string()).collect())
        }
    }

    #[async_trait]
    impl IconPalette for FixturePalette {
        async fn backgrounds(&self) -> Result<Vec<String>, LookupError> {
            Ok(self.0.clone())
        }
    }
}
