use fedi_msg::{
    forum::{HydratedPost, Threading},
    Note, ObjectType, Source, Tag, ACTIVITYSTREAMS_CONTEXT, MARKDOWN_MEDIA_TYPE,
};
use fedi_ref::{ActorKind, Config, LocalKind, ObjectId, PUBLIC_ADDRESS};
use log::{debug, trace};

use crate::{
    format_epoch_millis,
    ports::{MentionMatch, Mentions, PostLookup, TopicLookup},
    Error,
};

/// Builds the `Note` delivered to peers for a local post.
///
/// The output depends only on the post and what the lookups return, so two
/// calls with the same inputs produce the same object. Any failed lookup
/// fails the whole build.
pub struct NoteBuilder<'a> {
    config: &'a Config,
    posts: &'a dyn PostLookup,
    topics: &'a dyn TopicLookup,
    mentions: Option<&'a dyn Mentions>,
}

impl<'a> NoteBuilder<'a> {
    pub fn new(
        config: &'a Config,
        posts: &'a dyn PostLookup,
        topics: &'a dyn TopicLookup,
        mentions: Option<&'a dyn Mentions>,
    ) -> Self {
        Self {
            config,
            posts,
            topics,
            mentions,
        }
    }

    pub async fn build(&self, post: &HydratedPost) -> Result<Note, Error> {
        trace!("Building Note for pid {}", post.pid);
        let config = self.config;

        let id = config.local_uri(LocalKind::Post, post.pid);
        let published = format_epoch_millis(post.timestamp)?;

        let mut to = vec![PUBLIC_ADDRESS.to_string()];
        let cc = vec![config.followers_uri(post.uid)];

        let mut in_reply_to = None;
        let mut name = None;
        let mut tag = Vec::new();

        match post.threading() {
            Threading::DirectReply { parent } => {
                debug!("pid {} replies to {}", post.pid, parent);
                in_reply_to = Some(parent.to_uri(config, LocalKind::Post));
                let parent_author = self.posts.author(parent).await?;
                to.insert(0, parent_author.to_uri(config, LocalKind::User));
            }
            Threading::TopicReply {
                main_pid,
                topic_author,
            } => {
                debug!("pid {} replies to topic {}", post.pid, post.topic.tid);
                in_reply_to = Some(main_pid.to_uri(config, LocalKind::Post));
                to.insert(0, topic_author.to_uri(config, LocalKind::User));
            }
            Threading::NewTopic => {
                debug!("pid {} starts topic {}", post.pid, post.topic.tid);
                name = Some(self.topics.title(post.topic.tid).await?);
                tag.extend(post.topic.tags.iter().map(|topic_tag| Tag::Hashtag {
                    href: config.tag_uri(&topic_tag.value_encoded),
                    name: format!("#{}", topic_tag.value),
                }));
            }
        }

        if let Some(mentions) = self.mentions {
            let matches = mentions.matches(&post.raw_content).await?;
            debug!("pid {} mentions {} actors", post.pid, matches.len());
            for mention in matches {
                let (mention, remote_id) = mention_tag(config, mention)?;
                tag.push(mention);
                // local users already get it through the public address
                to.extend(remote_id);
            }
        }

        Ok(Note {
            context: ACTIVITYSTREAMS_CONTEXT.to_string(),
            url: id.clone(),
            id,
            kind: ObjectType::Note,
            to,
            cc,
            in_reply_to,
            published,
            attributed_to: config.actor_uri(ActorKind::User, post.uid),
            audience: config.topic_uri(&post.topic.slug),
            sensitive: false,
            summary: None,
            name,
            content: post.content.clone(),
            source: Source {
                content: post.raw_content.clone(),
                media_type: MARKDOWN_MEDIA_TYPE.to_string(),
            },
            tag,
            // TODO: fill from link previews
            attachment: Vec::new(),
        })
    }
}

/// The `Mention` tag for a match, plus the id to address when the mentioned
/// actor lives elsewhere.
fn mention_tag(config: &Config, mention: MentionMatch) -> Result<(Tag, Option<String>), Error> {
    match ObjectId::from_string(mention.id)? {
        ObjectId::Local(_) => {
            // local slugs are always lowercase
            let slug = mention.slug.to_lowercase();
            let handle = slug.strip_prefix('@').unwrap_or(&slug);
            let tag = Tag::Mention {
                href: config.user_page_url(handle),
                name: format!("{}@{}", slug, config.hostname()),
            };
            Ok((tag, None))
        }
        ObjectId::Remote(uri) => {
            let tag = Tag::Mention {
                href: uri.clone(),
                name: mention.slug,
            };
            Ok((tag, Some(uri)))
        }
    }
}
