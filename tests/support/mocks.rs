// tests/support/mocks.rs
use async_trait::async_trait;
use blog_core::application::{
    ApplicationResult,
    dto::{AuthTokenDto, AuthenticatedUser, TokenSubject},
    error::ApplicationError,
    ports::{
        security::{PasswordHasher, TokenManager},
        storage::{ImageStore, ImageUpload, StoredImage},
        time::Clock,
        util::SlugSuffixGenerator,
    },
};
use blog_core::domain::{
    category::{Category, CategoryId, CategoryName, CategoryRepository, NewCategory},
    errors::{DomainError, DomainResult},
    pagination::{Page, PageRequest},
    post::{
        AuthorRef, CategoryRef, Comment, CommentId, CommentRepository, NewComment, NewPost, Post,
        PostId, PostListFilter, PostReadRepository, PostUpdate, PostWriteRepository,
    },
    slug::Slug,
    user::{Email, NewUser, Role, User, UserId, UserRepository},
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use once_cell::sync::Lazy;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, AtomicI64, AtomicU32, Ordering},
};

/* -------------------------------- time -------------------------------- */

static FIXED_NOW: Lazy<DateTime<Utc>> = Lazy::new(|| {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .expect("valid fixed timestamp")
});

pub fn fixed_now() -> DateTime<Utc> {
    *FIXED_NOW
}

#[derive(Clone, Debug, Default)]
pub struct DummyClock;

impl Clock for DummyClock {
    fn now(&self) -> DateTime<Utc> {
        fixed_now()
    }
}

/* -------------------------------- slug suffixes -------------------------------- */

/// Always hands out the same suffix, so a title can only be used twice.
#[derive(Clone, Debug)]
pub struct FixedSuffix(pub &'static str);

impl SlugSuffixGenerator for FixedSuffix {
    fn suffix(&self, len: usize) -> String {
        self.0.chars().cycle().take(len).collect()
    }
}

/* -------------------------------- security -------------------------------- */

const TOKEN_PREFIX: &str = "test-token:";

/// Token for a subject, in the format [`TestTokenManager`] issues.
pub fn token_for(id: i64, role: Role, name: &str) -> String {
    format!("{TOKEN_PREFIX}{id}:{}:{name}", role.as_str())
}

/// Issues readable, unsigned tokens that encode the subject.
#[derive(Clone, Debug, Default)]
pub struct TestTokenManager;

#[async_trait]
impl TokenManager for TestTokenManager {
    async fn issue(&self, subject: TokenSubject) -> ApplicationResult<AuthTokenDto> {
        let issued_at = fixed_now();
        let ttl = Duration::days(7);
        Ok(AuthTokenDto {
            token: token_for(subject.user_id.into(), subject.role, &subject.name),
            issued_at,
            expires_at: issued_at + ttl,
            expires_in: ttl.num_seconds(),
        })
    }

    async fn authenticate(&self, token: &str) -> ApplicationResult<AuthenticatedUser> {
        let invalid = || ApplicationError::unauthorized("malformed test token");
        let rest = token.strip_prefix(TOKEN_PREFIX).ok_or_else(invalid)?;
        let mut parts = rest.splitn(3, ':');

        let id = parts
            .next()
            .and_then(|raw| raw.parse::<i64>().ok())
            .ok_or_else(invalid)?;
        let role: Role = parts
            .next()
            .and_then(|raw| raw.parse().ok())
            .ok_or_else(invalid)?;
        let name = parts.next().ok_or_else(invalid)?.to_string();

        let now = fixed_now();
        Ok(AuthenticatedUser {
            id: UserId::new(id)?,
            name,
            role,
            capabilities: role.default_capabilities(),
            issued_at: now,
            expires_at: now + Duration::days(7),
        })
    }
}

/// Deterministic "hash" that still rejects wrong passwords.
#[derive(Clone, Debug, Default)]
pub struct StrictPasswordHasher;

#[async_trait]
impl PasswordHasher for StrictPasswordHasher {
    async fn hash(&self, password: &str) -> ApplicationResult<String> {
        Ok(format!("hash::{password}"))
    }

    async fn verify(&self, password: &str, expected_hash: &str) -> ApplicationResult<()> {
        if format!("hash::{password}") == expected_hash {
            Ok(())
        } else {
            Err(ApplicationError::unauthorized("Invalid credentials"))
        }
    }
}

/* -------------------------------- image store -------------------------------- */

/// Keeps track of what was stored and removed instead of touching disk.
#[derive(Debug, Default)]
pub struct RecordingImageStore {
    counter: AtomicU32,
    fail: AtomicBool,
    pub stored: Mutex<Vec<String>>,
    pub removed: Mutex<Vec<String>>,
}

impl RecordingImageStore {
    pub fn fail_uploads(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    pub fn stored_ids(&self) -> Vec<String> {
        self.stored.lock().unwrap().clone()
    }

    pub fn removed_ids(&self) -> Vec<String> {
        self.removed.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageStore for RecordingImageStore {
    async fn store(&self, upload: ImageUpload) -> ApplicationResult<StoredImage> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(ApplicationError::storage("disk full"));
        }
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        let name = upload.file_name.unwrap_or_else(|| "image".into());
        let public_id = format!("test-{n}-{name}");
        self.stored.lock().unwrap().push(public_id.clone());
        Ok(StoredImage {
            url: format!("/uploads/{public_id}"),
            public_id: Some(public_id),
        })
    }

    async fn remove(&self, public_id: &str) -> ApplicationResult<()> {
        self.removed.lock().unwrap().push(public_id.to_string());
        Ok(())
    }
}

/* -------------------------------- users -------------------------------- */

#[derive(Debug, Default)]
pub struct InMemoryUserRepo {
    next_id: AtomicI64,
    users: Mutex<Vec<User>>,
}

impl InMemoryUserRepo {
    /// Drop an account while leaving its tokens valid.
    pub fn remove(&self, id: i64) {
        self.users.lock().unwrap().retain(|user| i64::from(user.id) != id);
    }

    pub fn author_ref(&self, id: UserId) -> Option<AuthorRef> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|user| user.id == id)
            .map(|user| AuthorRef {
                id: user.id,
                name: user.name.to_string(),
            })
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepo {
    async fn count(&self) -> DomainResult<u64> {
        Ok(self.users.lock().unwrap().len() as u64)
    }

    async fn insert(&self, new_user: NewUser) -> DomainResult<User> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|user| user.email == new_user.email) {
            return Err(DomainError::duplicate_key("email"));
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let user = User {
            id: UserId::new(id)?,
            name: new_user.name,
            email: new_user.email,
            password_hash: new_user.password_hash,
            role: new_user.role,
            created_at: new_user.created_at,
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &Email) -> DomainResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|user| &user.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: UserId) -> DomainResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|user| user.id == id)
            .cloned())
    }
}

/* -------------------------------- categories -------------------------------- */

/// Enforces the same unique name and unique slug constraints as the database.
#[derive(Debug, Default)]
pub struct InMemoryCategoryRepo {
    next_id: AtomicI64,
    categories: Mutex<Vec<Category>>,
}

impl InMemoryCategoryRepo {
    /// Insert a category directly, bypassing the slug allocator.
    pub fn seed(&self, name: &str, slug: &str) -> i64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let category = Category {
            id: CategoryId::new(id).unwrap(),
            name: CategoryName::new(name).unwrap(),
            slug: Slug::new(slug).unwrap(),
            description: None,
            created_at: fixed_now(),
            updated_at: fixed_now(),
        };
        self.categories.lock().unwrap().push(category);
        id
    }

    pub fn category_ref(&self, id: CategoryId) -> Option<CategoryRef> {
        self.categories
            .lock()
            .unwrap()
            .iter()
            .find(|category| category.id == id)
            .map(|category| CategoryRef {
                id: category.id,
                name: category.name.as_str().to_string(),
                slug: category.slug.as_str().to_string(),
            })
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepo {
    async fn insert(&self, category: NewCategory) -> DomainResult<Category> {
        let slug = category
            .slug
            .ok_or_else(|| DomainError::Validation("slug missing".into()))?;
        let mut categories = self.categories.lock().unwrap();
        if categories.iter().any(|c| c.name == category.name) {
            return Err(DomainError::duplicate_key("name"));
        }
        if categories.iter().any(|c| c.slug == slug) {
            return Err(DomainError::duplicate_key("slug"));
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let stored = Category {
            id: CategoryId::new(id)?,
            name: category.name,
            slug,
            description: category.description,
            created_at: category.created_at,
            updated_at: category.updated_at,
        };
        categories.push(stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: CategoryId) -> DomainResult<Option<Category>> {
        Ok(self
            .categories
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn find_by_name(&self, name: &CategoryName) -> DomainResult<Option<Category>> {
        Ok(self
            .categories
            .lock()
            .unwrap()
            .iter()
            .find(|c| &c.name == name)
            .cloned())
    }

    async fn list(&self) -> DomainResult<Vec<Category>> {
        let mut categories = self.categories.lock().unwrap().clone();
        categories.sort_by(|a, b| a.name.as_str().cmp(b.name.as_str()));
        Ok(categories)
    }
}

/* -------------------------------- posts and comments -------------------------------- */

/// Posts and comments backed by vectors. Slug uniqueness is checked and the
/// row pushed under one lock, so concurrent inserts race like they would on
/// a unique index.
pub struct InMemoryPostStore {
    users: Arc<InMemoryUserRepo>,
    categories: Arc<InMemoryCategoryRepo>,
    next_post_id: AtomicI64,
    next_comment_id: AtomicI64,
    insert_attempts: AtomicU32,
    fail_inserts: AtomicBool,
    posts: Mutex<Vec<Post>>,
    comments: Mutex<Vec<Comment>>,
}

impl InMemoryPostStore {
    pub fn new(users: Arc<InMemoryUserRepo>, categories: Arc<InMemoryCategoryRepo>) -> Self {
        Self {
            users,
            categories,
            next_post_id: AtomicI64::new(0),
            next_comment_id: AtomicI64::new(0),
            insert_attempts: AtomicU32::new(0),
            fail_inserts: AtomicBool::new(false),
            posts: Mutex::new(Vec::new()),
            comments: Mutex::new(Vec::new()),
        }
    }

    /// Number of `insert` calls so far, successful or not.
    pub fn insert_attempts(&self) -> u32 {
        self.insert_attempts.load(Ordering::SeqCst)
    }

    /// Make every following insert fail with a non-slug persistence error.
    pub fn fail_inserts(&self) {
        self.fail_inserts.store(true, Ordering::SeqCst);
    }

    pub fn slugs(&self) -> Vec<String> {
        self.posts
            .lock()
            .unwrap()
            .iter()
            .map(|post| post.slug.as_str().to_string())
            .collect()
    }
}

#[async_trait]
impl PostWriteRepository for InMemoryPostStore {
    async fn insert(&self, post: NewPost) -> DomainResult<Post> {
        self.insert_attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(DomainError::Persistence("connection reset".into()));
        }

        let slug = post
            .slug
            .ok_or_else(|| DomainError::Validation("slug missing".into()))?;
        let category = self
            .categories
            .category_ref(post.category_id)
            .ok_or_else(|| DomainError::Persistence("category foreign key".into()))?;
        let author = self
            .users
            .author_ref(post.author_id)
            .ok_or_else(|| DomainError::Persistence("author foreign key".into()))?;

        let mut posts = self.posts.lock().unwrap();
        if posts.iter().any(|existing| existing.slug == slug) {
            return Err(DomainError::duplicate_key("slug"));
        }

        let id = self.next_post_id.fetch_add(1, Ordering::SeqCst) + 1;
        let stored = Post {
            id: PostId::new(id)?,
            title: post.title,
            slug,
            content: post.content,
            excerpt: post.excerpt,
            featured_image: post.featured_image,
            category,
            author,
            created_at: post.created_at,
            updated_at: post.updated_at,
        };
        posts.push(stored.clone());
        Ok(stored)
    }

    async fn update(&self, update: PostUpdate) -> DomainResult<Post> {
        let category = match update.category_id {
            Some(id) => Some(
                self.categories
                    .category_ref(id)
                    .ok_or_else(|| DomainError::Persistence("category foreign key".into()))?,
            ),
            None => None,
        };

        let mut posts = self.posts.lock().unwrap();
        let post = posts
            .iter_mut()
            .find(|post| post.id == update.id)
            .ok_or_else(|| DomainError::NotFound("Post not found".into()))?;

        if let Some(title) = update.title {
            post.title = title;
        }
        if let Some(content) = update.content {
            post.content = content;
        }
        if let Some(excerpt) = update.excerpt {
            post.excerpt = excerpt;
        }
        if let Some(category) = category {
            post.category = category;
        }
        if let Some(image) = update.featured_image {
            post.featured_image = Some(image);
        }
        post.updated_at = update.updated_at;
        Ok(post.clone())
    }

    async fn delete(&self, id: PostId) -> DomainResult<()> {
        let mut posts = self.posts.lock().unwrap();
        let before = posts.len();
        posts.retain(|post| post.id != id);
        if posts.len() == before {
            return Err(DomainError::NotFound("Post not found".into()));
        }
        self.comments
            .lock()
            .unwrap()
            .retain(|comment| comment.post_id != id);
        Ok(())
    }
}

#[async_trait]
impl PostReadRepository for InMemoryPostStore {
    async fn find_by_id(&self, id: PostId) -> DomainResult<Option<Post>> {
        Ok(self
            .posts
            .lock()
            .unwrap()
            .iter()
            .find(|post| post.id == id)
            .cloned())
    }

    async fn find_by_slug(&self, slug: &Slug) -> DomainResult<Option<Post>> {
        Ok(self
            .posts
            .lock()
            .unwrap()
            .iter()
            .find(|post| &post.slug == slug)
            .cloned())
    }

    async fn list_page(
        &self,
        filter: PostListFilter,
        page: PageRequest,
    ) -> DomainResult<Page<Post>> {
        let needle = filter.search.map(|s| s.to_lowercase());
        let mut matching: Vec<Post> = self
            .posts
            .lock()
            .unwrap()
            .iter()
            .filter(|post| filter.author.is_none_or(|author| post.author.id == author))
            .filter(|post| {
                needle.as_deref().is_none_or(|needle| {
                    post.title.as_str().to_lowercase().contains(needle)
                        || post.content.as_str().to_lowercase().contains(needle)
                })
            })
            .cloned()
            .collect();

        matching.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| i64::from(b.id).cmp(&i64::from(a.id)))
        });

        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect();
        Ok(Page::new(items, total, page))
    }
}

#[async_trait]
impl CommentRepository for InMemoryPostStore {
    async fn add(&self, comment: NewComment) -> DomainResult<Comment> {
        if !self
            .posts
            .lock()
            .unwrap()
            .iter()
            .any(|post| post.id == comment.post_id)
        {
            return Err(DomainError::NotFound("Post not found".into()));
        }

        let author = comment.author_id.and_then(|id| self.users.author_ref(id));
        let id = self.next_comment_id.fetch_add(1, Ordering::SeqCst) + 1;
        let stored = Comment {
            id: CommentId(id),
            post_id: comment.post_id,
            author,
            body: comment.body,
            created_at: comment.created_at,
        };
        self.comments.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn list_for_post(&self, post_id: PostId) -> DomainResult<Vec<Comment>> {
        let mut comments: Vec<Comment> = self
            .comments
            .lock()
            .unwrap()
            .iter()
            .filter(|comment| comment.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by_key(|comment| (comment.created_at, i64::from(comment.id)));
        Ok(comments)
    }
}
