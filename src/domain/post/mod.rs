pub mod comment;
pub mod entity;
pub mod repository;
pub mod specifications;
pub mod value_objects;

pub use comment::{Comment, CommentBody, CommentId, NewComment};
pub use entity::{AuthorRef, CategoryRef, NewPost, Post, PostUpdate};
pub use repository::{CommentRepository, PostListFilter, PostReadRepository, PostWriteRepository};
pub use value_objects::{FeaturedImage, PostContent, PostExcerpt, PostId, PostTitle};
