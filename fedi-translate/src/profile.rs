//! Remote actors as local user profiles.

use fedi_msg::RemoteActor;
use fedi_ref::slugify;
use futures::future::join_all;
use log::{trace, warn};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{parse_epoch_millis, ports::IconPalette, Error};

/// Profile of a remote user, ready to be cached by the caller.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedProfile {
    /// The actor's URI, never a local uid.
    pub uid: String,
    /// `preferredUsername@hostname`
    pub username: String,
    pub userslug: String,
    pub display_name: Option<String>,
    pub fullname: Option<String>,
    pub about_me: Option<String>,
    pub picture: Option<String>,
    pub uploaded_picture: Option<String>,
    pub cover_url: Option<String>,
    pub cover_position: String,
    /// `None` when the actor's `published` date could not be read.
    pub join_date: Option<i64>,
    pub status: String,
    pub icon_text: String,
    pub icon_bg_color: Option<String>,
    pub post_count: Option<u64>,
    pub follower_count: Option<u64>,
    pub following_count: Option<u64>,
    pub inbox: Option<String>,
    pub shared_inbox: Option<String>,
}

/// Normalize a batch of remote actors concurrently. The output lines up with
/// the input: `None` stays `None` and a malformed actor only fails its own slot.
pub async fn normalize_profiles(
    palette: &dyn IconPalette,
    actors: &[Option<RemoteActor>],
) -> Vec<Result<Option<NormalizedProfile>, Error>> {
    trace!("Normalizing {} remote actors", actors.len());

    join_all(actors.iter().map(|actor| async move {
        match actor {
            None => Ok(None),
            Some(actor) => normalize_profile(palette, actor)
                .await
                .map(Some)
                .map_err(|err| {
                    warn!("Failed to normalize actor {}: {}", actor.id, err);
                    err
                }),
        }
    }))
    .await
}

pub async fn normalize_profile(
    palette: &dyn IconPalette,
    actor: &RemoteActor,
) -> Result<NormalizedProfile, Error> {
    let preferred_username = match actor.preferred_username.as_deref() {
        Some(preferred_username) if !preferred_username.is_empty() => {
            preferred_username.to_string()
        }
        _ => slugify(actor.name.as_deref().unwrap_or_default()),
    };

    let parsed_id = Url::parse(&actor.id).map_err(|source| Error::BadActorId {
        input: actor.id.clone(),
        source,
    })?;
    let hostname = parsed_id
        .host_str()
        .ok_or_else(|| Error::MissingHost(actor.id.clone()))?;
    let handle = format!("{}@{}", preferred_username, hostname);

    let backgrounds = palette.backgrounds().await?;
    let icon_bg_color = icon_background(&preferred_username, &backgrounds).map(String::from);

    Ok(NormalizedProfile {
        uid: actor.id.clone(),
        username: handle.clone(),
        userslug: handle,
        display_name: actor.name.clone(),
        fullname: actor.name.clone(),
        about_me: actor.summary.clone(),
        picture: actor.icon.as_ref().map(|icon| icon.url().to_string()),
        uploaded_picture: None,
        cover_url: actor.image.as_ref().map(|image| image.url().to_string()),
        cover_position: "50% 50%".to_string(),
        join_date: actor.published.as_deref().and_then(parse_epoch_millis),
        status: "offline".to_string(),
        icon_text: icon_text(&preferred_username),
        icon_bg_color,
        post_count: actor.post_count,
        follower_count: actor.follower_count,
        following_count: actor.following_count,
        inbox: actor.inbox.clone(),
        shared_inbox: actor
            .endpoints
            .as_ref()
            .and_then(|endpoints| endpoints.shared_inbox.clone()),
    })
}

/// Pick a placeholder colour from the sum of the name's UTF-16 code units.
/// Cosmetic only; `None` for an empty palette.
pub fn icon_background<'a>(preferred_username: &str, palette: &'a [String]) -> Option<&'a str> {
    if palette.is_empty() {
        return None;
    }
    let sum: u64 = preferred_username.encode_utf16().map(u64::from).sum();
    let index = (sum % palette.len() as u64) as usize;
    palette.get(index).map(String::as_str)
}

fn icon_text(preferred_username: &str) -> String {
    preferred_username
        .chars()
        .next()
        .map(|first| first.to_uppercase().collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::fixtures::FixturePalette;
    use serde_json::json;

    fn palette() -> FixturePalette {
        FixturePalette::new(&["#f44336", "#e91e63", "#9c27b0", "#673ab7"])
    }

    fn actor(value: serde_json::Value) -> RemoteActor {
        serde_json::from_value(value).unwrap()
    }

    fn bob() -> RemoteActor {
        actor(json!({
            "id": "https://remote.example/users/bob",
            "type": "Person",
            "preferredUsername": "bob",
            "name": "Bob Smith",
            "summary": "<p>hi</p>",
            "icon": { "type": "Image", "mediaType": "image/png", "url": "https://remote.example/bob.png" },
            "image": "https://remote.example/bob-cover.jpg",
            "published": "2023-11-14T22:13:20Z",
            "inbox": "https://remote.example/users/bob/inbox",
            "endpoints": { "sharedInbox": "https://remote.example/inbox" },
            "followerCount": 3,
            "followingCount": 4,
            "postcount": 5
        }))
    }

    #[tokio::test]
    async fn test_normalize_profile() {
        let profile = normalize_profile(&palette(), &bob()).await.unwrap();

        assert_eq!(profile.uid, "https://remote.example/users/bob");
        assert_eq!(profile.username, "bob@remote.example");
        assert_eq!(profile.userslug, "bob@remote.example");
        assert_eq!(profile.display_name.as_deref(), Some("Bob Smith"));
        assert_eq!(profile.picture.as_deref(), Some("https://remote.example/bob.png"));
        assert_eq!(
            profile.cover_url.as_deref(),
            Some("https://remote.example/bob-cover.jpg")
        );
        assert_eq!(profile.join_date, Some(1_700_000_000_000));
        assert_eq!(profile.icon_text, "B");
        assert_eq!(profile.post_count, Some(5));
        assert_eq!(
            profile.shared_inbox.as_deref(),
            Some("https://remote.example/inbox")
        );
    }

    #[tokio::test]
    async fn test_icon_color_from_char_codes() {
        // b + o + b = 98 + 111 + 98 = 307, 307 % 4 = 3
        let profile = normalize_profile(&palette(), &bob()).await.unwrap();
        assert_eq!(profile.icon_bg_color.as_deref(), Some("#673ab7"));

        let again = normalize_profile(&palette(), &bob()).await.unwrap();
        assert_eq!(profile, again);
    }

    #[test]
    fn test_icon_background_empty_palette() {
        assert_eq!(icon_background("bob", &[]), None);
    }

    #[tokio::test]
    async fn test_preferred_username_falls_back_to_name() {
        let profile = normalize_profile(
            &palette(),
            &actor(json!({
                "id": "https://remote.example/u/42",
                "name": "Alice Liddell"
            })),
        )
        .await
        .unwrap();

        assert_eq!(profile.username, "alice-liddell@remote.example");
        assert_eq!(profile.icon_text, "A");
        assert_eq!(profile.picture, None);
        assert_eq!(profile.cover_url, None);
        assert_eq!(profile.join_date, None);
        assert_eq!(profile.shared_inbox, None);
    }

    #[tokio::test]
    async fn test_unreadable_published_date() {
        let profile = normalize_profile(
            &palette(),
            &actor(json!({
                "id": "https://remote.example/u/1",
                "preferredUsername": "carol",
                "published": "not a date"
            })),
        )
        .await
        .unwrap();

        assert_eq!(profile.join_date, None);
    }

    #[tokio::test]
    async fn test_actor_id_without_host() {
        let result = normalize_profile(
            &palette(),
            &actor(json!({ "id": "mailto:bob@x", "preferredUsername": "bob" })),
        )
        .await;

        assert!(matches!(result, Err(Error::MissingHost(ref id)) if id == "mailto:bob@x"));
    }

    #[tokio::test]
    async fn test_batch_keeps_order_and_gaps() {
        let batch = vec![
            Some(bob()),
            None,
            Some(actor(json!({ "id": "not a uri", "preferredUsername": "x" }))),
            Some(actor(json!({
                "id": "https://other.example/@dave",
                "preferredUsername": "dave"
            }))),
        ];

        let results = normalize_profiles(&palette(), &batch).await;

        assert_eq!(results.len(), 4);
        assert_eq!(
            results[0].as_ref().unwrap().as_ref().unwrap().username,
            "bob@remote.example"
        );
        assert!(matches!(results[1], Ok(None)));
        assert!(matches!(results[2], Err(Error::BadActorId { .. })));
        assert_eq!(
            results[3].as_ref().unwrap().as_ref().unwrap().username,
            "dave@other.example"
        );
    }
}
