use fedi_msg::{Actor, ActorType, Endpoints, MediaLink, PublicKey, ACTIVITYSTREAMS_CONTEXT};
use fedi_ref::{decode_html_entities, ActorKind, Config};
use log::trace;
use std::path::Path;

use crate::{
    ports::{EntityStore, KeyStore, MediaResolver},
    Error,
};

/// Publishes local users as `Person` and categories as `Group` actors.
pub struct ActorBuilder<'a> {
    config: &'a Config,
    entities: &'a dyn EntityStore,
    keys: &'a dyn KeyStore,
    media: &'a dyn MediaResolver,
}

impl<'a> ActorBuilder<'a> {
    pub fn new(
        config: &'a Config,
        entities: &'a dyn EntityStore,
        keys: &'a dyn KeyStore,
        media: &'a dyn MediaResolver,
    ) -> Self {
        Self {
            config,
            entities,
            keys,
            media,
        }
    }

    pub async fn person(&self, uid: u64) -> Result<Actor, Error> {
        trace!("Building Person actor for uid {}", uid);
        let config = self.config;

        let user = self.entities.user(uid).await?;
        let public_key_pem = self.keys.public_key(ActorKind::User, uid).await?;

        let icon = match non_empty(user.picture.as_deref()) {
            Some(picture) => {
                let path = self.media.user_avatar_path(uid).await?;
                Some(MediaLink::image(
                    self.media.media_type(&path),
                    config.absolute_url(picture),
                ))
            }
            None => None,
        };

        let image = match non_empty(user.cover_url.as_deref()) {
            Some(cover) => {
                let path = self.media.user_cover_path(uid).await?;
                Some(MediaLink::image(
                    self.media.media_type(&path),
                    config.absolute_url(cover),
                ))
            }
            None => None,
        };

        let id = config.actor_uri(ActorKind::User, uid);

        Ok(Actor {
            context: ACTIVITYSTREAMS_CONTEXT.to_string(),
            url: config.user_page_url(&user.userslug),
            followers: Some(config.followers_uri(uid)),
            following: Some(config.following_uri(uid)),
            inbox: format!("{}/inbox", id),
            outbox: format!("{}/outbox", id),
            endpoints: Endpoints {
                shared_inbox: Some(config.shared_inbox_uri()),
            },
            kind: ActorType::Person,
            name: user.display_name,
            preferred_username: user.username,
            summary: user.about_me,
            icon,
            image,
            public_key: public_key(&id, public_key_pem),
            id,
        })
    }

    pub async fn group(&self, cid: u64) -> Result<Actor, Error> {
        trace!("Building Group actor for cid {}", cid);
        let config = self.config;

        let category = self.entities.category(cid).await?;
        let public_key_pem = self.keys.public_key(ActorKind::Category, cid).await?;

        // category image, then the site logo, then the stock logo
        let background_image = non_empty(category.background_image.as_deref())
            .or_else(|| config.brand_logo())
            .map(String::from)
            .unwrap_or_else(|| config.default_logo());
        let background_image = decode_html_entities(&background_image);
        let file_name = Path::new(&*background_image)
            .file_name()
            .map(Path::new)
            .unwrap_or_else(|| Path::new(""));
        let icon = MediaLink::image(
            self.media.media_type(file_name),
            config.absolute_url(&background_image),
        );

        let id = config.actor_uri(ActorKind::Category, cid);

        Ok(Actor {
            context: ACTIVITYSTREAMS_CONTEXT.to_string(),
            url: config.category_page_url(&category.slug),
            followers: None,
            following: None,
            inbox: format!("{}/inbox", id),
            outbox: format!("{}/outbox", id),
            endpoints: Endpoints {
                shared_inbox: Some(config.shared_inbox_uri()),
            },
            kind: ActorType::Group,
            name: category.name,
            preferred_username: format!("cid.{}", cid),
            summary: category.description,
            icon: Some(icon),
            image: None,
            public_key: public_key(&id, public_key_pem),
            id,
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}

fn public_key(actor_id: &str, public_key_pem: String) -> PublicKey {
    PublicKey {
        id: format!("{}#key", actor_id),
        owner: actor_id.to_string(),
        public_key_pem,
    }
}
