use thiserror::Error as ThisError;
use url::Url;

use crate::{ActorKind, LocalKind};

/// Audience address meaning "anyone, including logged-out readers".
pub const PUBLIC_ADDRESS: &str = "https://www.w3.org/ns/activitystreams#Public";

#[derive(Clone, Debug, ThisError)]
pub enum ConfigError {
    #[error("Failed to parse base url {input}, cause: {source}")]
    BadBaseUrl {
        input: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Base url has no hostname: {0}")]
    MissingHost(String),
}

/// Site-wide settings every builder and normalizer reads from.
#[derive(Clone, Debug)]
pub struct Config {
    base_url: String,
    parsed_base_url: Url,
    /// Path prefix for installs below the domain root, `""` otherwise.
    relative_path: String,
    brand_logo: Option<String>,
}

impl Config {
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let parsed_base_url = Url::parse(base_url).map_err(|source| ConfigError::BadBaseUrl {
            input: base_url.to_string(),
            source,
        })?;
        if parsed_base_url.host_str().is_none() {
            return Err(ConfigError::MissingHost(base_url.to_string()));
        }

        let base_url = base_url.trim_end_matches('/').to_string();
        let relative_path = parsed_base_url.path().trim_end_matches('/').to_string();

        Ok(Self {
            base_url,
            parsed_base_url,
            relative_path,
            brand_logo: None,
        })
    }

    pub fn with_brand_logo(mut self, brand_logo: impl Into<String>) -> Self {
        let brand_logo = brand_logo.into();
        self.brand_logo = if brand_logo.is_empty() {
            None
        } else {
            Some(brand_logo)
        };
        self
    }

    pub fn brand_logo(&self) -> Option<&str> {
        self.brand_logo.as_deref()
    }

    pub fn hostname(&self) -> &str {
        // checked in Config::new
        self.parsed_base_url.host_str().unwrap_or_default()
    }

    pub fn local_uri(&self, kind: LocalKind, id: u64) -> String {
        format!("{}/{}/{}", self.base_url, kind.path_segment(), id)
    }

    pub fn actor_uri(&self, kind: ActorKind, id: u64) -> String {
        self.local_uri(kind.local_kind(), id)
    }

    pub fn followers_uri(&self, uid: u64) -> String {
        format!("{}/followers", self.actor_uri(ActorKind::User, uid))
    }

    pub fn following_uri(&self, uid: u64) -> String {
        format!("{}/following", self.actor_uri(ActorKind::User, uid))
    }

    pub fn shared_inbox_uri(&self) -> String {
        format!("{}/inbox", self.base_url)
    }

    pub fn topic_uri(&self, slug: &str) -> String {
        format!("{}/topic/{}", self.base_url, slug)
    }

    pub fn tag_uri(&self, value_encoded: &str) -> String {
        format!("{}/tags/{}", self.base_url, value_encoded)
    }

    pub fn user_page_url(&self, userslug: &str) -> String {
        format!("{}/user/{}", self.base_url, userslug)
    }

    pub fn category_page_url(&self, slug: &str) -> String {
        format!("{}/category/{}", self.base_url, slug)
    }

    /// Absolute URL of a site-relative upload or asset path. Paths that
    /// already start with the install's path prefix join the bare origin.
    pub fn absolute_url(&self, path: &str) -> String {
        let prefixed = !self.relative_path.is_empty()
            && path
                .strip_prefix(self.relative_path.as_str())
                .map_or(false, |rest| rest.starts_with('/'));
        if prefixed {
            format!("{}{}", self.parsed_base_url.origin().ascii_serialization(), path)
        } else {
            format!("{}{}", self.base_url, path)
        }
    }

    pub fn default_logo(&self) -> String {
        format!("{}/assets/logo.png", self.relative_path)
    }
}
