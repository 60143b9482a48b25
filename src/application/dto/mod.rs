pub mod auth;
pub mod categories;
pub mod pagination;
pub mod posts;
pub mod users;

pub use auth::{AuthPayloadDto, AuthTokenDto, AuthenticatedUser, TokenSubject};
pub use categories::CategoryDto;
pub use pagination::{PageMeta, PagedDto};
pub use posts::{AuthorDto, CategorySummaryDto, CommentDto, PostDto};
pub use users::UserDto;
