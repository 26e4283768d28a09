use crate::catalog::{BlogPost, CommentRef};

/// What toggling a like does to a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipChange {
    Added,
    Removed,
}

pub fn membership_change(post: &BlogPost, actor: &str) -> MembershipChange {
    if post.likes.iter().any(|name| name == actor) {
        MembershipChange::Removed
    } else {
        MembershipChange::Added
    }
}

/// Removes the first exact match of `actor` from the likes, or appends it.
pub fn toggle_membership(mut post: BlogPost, actor: &str) -> BlogPost {
    match post.likes.iter().position(|name| name == actor) {
        Some(index) => {
            post.likes.remove(index);
        }
        None => post.likes.push(actor.to_string()),
    }
    post
}

/// Appends `reference` to the comment log. Duplicates are kept.
pub fn append_reference(mut post: BlogPost, reference: CommentRef) -> BlogPost {
    post.comments.push(reference);
    post
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::BlogContent;
    use std::collections::HashSet;

    fn post(likes: &[&str]) -> BlogPost {
        BlogPost {
            theme: "coffee".to_string(),
            created_at: 7,
            title: "Beans".to_string(),
            content: BlogContent::Freeform { paragraphs: vec![] },
            img: "coffee.png".to_string(),
            product_collection: None,
            likes: likes.iter().map(|s| s.to_string()).collect(),
            comments: vec![],
        }
    }

    #[test]
    fn test_toggle_twice_restores_likes() {
        let original = post(&["bob", "carol"]);
        let toggled = toggle_membership(toggle_membership(original.clone(), "alice"), "alice");

        let before: HashSet<_> = original.likes.iter().collect();
        let after: HashSet<_> = toggled.likes.iter().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_toggle_removes_existing_member() {
        let toggled = toggle_membership(post(&["alice", "bob"]), "alice");
        assert_eq!(toggled.likes, vec!["bob".to_string()]);
    }

    #[test]
    fn test_toggle_keeps_membership_unique() {
        let toggled = toggle_membership(post(&["bob"]), "alice");
        assert_eq!(toggled.likes, vec!["bob".to_string(), "alice".to_string()]);
    }

    #[test]
    fn test_membership_change_reflects_presence() {
        assert_eq!(
            membership_change(&post(&["alice"]), "alice"),
            MembershipChange::Removed
        );
        assert_eq!(
            membership_change(&post(&[]), "alice"),
            MembershipChange::Added
        );
    }

    #[test]
    fn test_append_preserves_call_order() {
        let mut current = post(&[]);
        let refs: Vec<CommentRef> = (0..5).map(|i| CommentRef::new(&format!("c-{i}"), i)).collect();
        for reference in &refs {
            current = append_reference(current, reference.clone());
        }
        assert_eq!(current.comments, refs);
    }

    #[test]
    fn test_append_keeps_duplicates() {
        let reference = CommentRef::new("c-1", 1);
        let current = append_reference(append_reference(post(&[]), reference.clone()), reference);
        assert_eq!(current.comments.len(), 2);
    }
}
