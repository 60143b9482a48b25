pub mod category;
pub mod errors;
pub mod pagination;
pub mod post;
pub mod slug;
pub mod user;
