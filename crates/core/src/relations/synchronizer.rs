use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde_json::Value;

use super::membership::{membership_change, MembershipChange};
use super::window::expand_window;
use crate::catalog::{
    from_item, post_key, to_item, BlogPost, Comment, CommentKey, CommentView,
};
use crate::storage::{DocumentStore, RepositoryError, Result, Tables, WriteCondition};

const LIKES: &str = "likes";
const COMMENTS: &str = "comments";
const COMMENT_PROJECTION: &[&str] = &["commentId", "createdAt", "content", "username"];

/// Result of a like toggle.
#[derive(Debug, Clone, PartialEq)]
pub struct LikeOutcome {
    pub change: MembershipChange,
    /// The post as it looks after the toggle.
    pub post: BlogPost,
}

/// One window of expanded comments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommentPage {
    /// Newest first.
    pub comments: Vec<CommentView>,
    /// Position to pass back for the next, older window.
    pub next_cursor: Option<usize>,
}

/// Maintains the likes set and comment log embedded in blog posts.
///
/// Every mutation is a single atomic store primitive on the post item, so
/// concurrent toggles and appends on the same post never overwrite each other.
#[derive(Clone)]
pub struct RelationSynchronizer {
    store: Arc<dyn DocumentStore>,
    tables: Tables,
}

impl RelationSynchronizer {
    pub fn new(store: Arc<dyn DocumentStore>, tables: Tables) -> Self {
        Self { store, tables }
    }

    /// Loads a blog post, failing with `NotFound` when it does not exist.
    pub async fn load_post(&self, theme: &str, created_at: i64) -> Result<BlogPost> {
        let key = post_key(theme, created_at);
        let item = self
            .store
            .get_item(&self.tables.blog_posts, &key)
            .await?
            .ok_or_else(|| RepositoryError::NotFound {
                entity_type: "BlogPost",
                id: key.to_string(),
            })?;
        from_item(item).map_err(|e| RepositoryError::Serialization(e.to_string()))
    }

    /// Likes the post for `actor`, or removes the like if one exists.
    ///
    /// A primitive reporting no change means an identical concurrent toggle
    /// already reached the same state, which counts as success. The returned
    /// likes are the set as the atomic update left it, not the snapshot read
    /// to decide the direction.
    pub async fn toggle_like(&self, theme: &str, created_at: i64, actor: &str) -> Result<LikeOutcome> {
        let post = self.load_post(theme, created_at).await?;
        let change = membership_change(&post, actor);
        let key = post.key();

        let update = match change {
            MembershipChange::Added => {
                self.store
                    .add_to_set(&self.tables.blog_posts, &key, LIKES, actor)
                    .await?
            }
            MembershipChange::Removed => {
                self.store
                    .remove_from_set(&self.tables.blog_posts, &key, LIKES, actor)
                    .await?
            }
        };

        Ok(LikeOutcome {
            change,
            post: BlogPost {
                likes: update.members,
                ..post
            },
        })
    }

    /// Stores `comment` and appends its reference to the parent post.
    ///
    /// The comment is written first: a failure in between leaves an
    /// unreferenced comment rather than a dangling reference.
    pub async fn add_comment(&self, comment: Comment) -> Result<Comment> {
        let post = self
            .load_post(&comment.blog_theme, comment.blog_created_at)
            .await?;

        let item = to_item(&comment).map_err(|e| RepositoryError::Serialization(e.to_string()))?;
        self.store
            .put_item(&self.tables.comments, item, WriteCondition::IfNotExists)
            .await?;

        let reference = Value::String(comment.reference().as_str().to_string());
        self.store
            .append_to_list(&self.tables.blog_posts, &post.key(), COMMENTS, reference)
            .await?;

        Ok(comment)
    }

    /// Expands one window of a post's comment log into comments.
    ///
    /// Malformed tokens and references whose comment is missing are skipped.
    pub async fn list_comments(
        &self,
        theme: &str,
        created_at: i64,
        window: Option<u32>,
        cursor: Option<usize>,
    ) -> Result<CommentPage> {
        let post = self.load_post(theme, created_at).await?;
        let window = expand_window(&post.comments, window, cursor);

        let keys: Vec<CommentKey> = window
            .refs
            .iter()
            .filter_map(|reference| reference.parse().ok())
            .collect();
        let mut resolved = self.resolve_children(&keys).await?;

        let comments = keys
            .iter()
            .rev()
            .filter_map(|key| resolved.remove(key))
            .collect();

        Ok(CommentPage {
            comments,
            next_cursor: window.next,
        })
    }

    /// Fetches the projected comments for `keys` in one batch.
    ///
    /// Keys with no stored comment are absent from the result.
    pub async fn resolve_children(
        &self,
        keys: &[CommentKey],
    ) -> Result<HashMap<CommentKey, CommentView>> {
        let mut seen = HashSet::new();
        let unique: Vec<_> = keys
            .iter()
            .filter(|key| seen.insert(*key))
            .map(CommentKey::to_key)
            .collect();
        if unique.is_empty() {
            return Ok(HashMap::new());
        }

        let items = self
            .store
            .batch_get(&self.tables.comments, &unique, Some(COMMENT_PROJECTION))
            .await?;

        items
            .into_iter()
            .map(|item| {
                let key = CommentKey::from_item(&item).ok_or_else(|| {
                    RepositoryError::InvalidData("Missing or invalid field: commentId".to_string())
                })?;
                let view = from_item::<CommentView>(item)
                    .map_err(|e| RepositoryError::Serialization(e.to_string()))?;
                Ok((key, view))
            })
            .collect()
    }
}
