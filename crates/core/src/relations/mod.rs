//! Embedded relationships of blog posts: the likes set and the comment log.

mod membership;
mod synchronizer;
mod window;

pub use membership::{append_reference, membership_change, toggle_membership, MembershipChange};
pub use synchronizer::{CommentPage, LikeOutcome, RelationSynchronizer};
pub use window::{expand_window, window_size, Window, DEFAULT_WINDOW, FULL_EXPANSION_LIMIT};
