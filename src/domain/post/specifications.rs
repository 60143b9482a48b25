use std::collections::HashSet;

use crate::domain::post::entity::Post;
use crate::domain::user::value_objects::{Capability, UserId};

pub trait PostSpecification {
    fn is_satisfied(&self) -> bool;
}

pub struct CanUpdatePostSpec<'a> {
    capabilities: &'a HashSet<Capability>,
    post: &'a Post,
    user_id: UserId,
}

impl<'a> CanUpdatePostSpec<'a> {
    pub fn new(capabilities: &'a HashSet<Capability>, post: &'a Post, user_id: UserId) -> Self {
        Self {
            capabilities,
            post,
            user_id,
        }
    }
}

impl PostSpecification for CanUpdatePostSpec<'_> {
    fn is_satisfied(&self) -> bool {
        has_capability(self.capabilities, "posts", "update:any")
            || (has_capability(self.capabilities, "posts", "update:own")
                && self.post.is_authored_by(self.user_id))
    }
}

pub struct CanDeletePostSpec<'a> {
    capabilities: &'a HashSet<Capability>,
    post: &'a Post,
    user_id: UserId,
}

impl<'a> CanDeletePostSpec<'a> {
    pub fn new(capabilities: &'a HashSet<Capability>, post: &'a Post, user_id: UserId) -> Self {
        Self {
            capabilities,
            post,
            user_id,
        }
    }
}

impl PostSpecification for CanDeletePostSpec<'_> {
    fn is_satisfied(&self) -> bool {
        has_capability(self.capabilities, "posts", "delete:any")
            || (has_capability(self.capabilities, "posts", "delete:own")
                && self.post.is_authored_by(self.user_id))
    }
}

fn has_capability(capabilities: &HashSet<Capability>, resource: &str, action: &str) -> bool {
    capabilities.iter().any(|cap| cap.matches(resource, action))
}
