//! Services layer - business logic
//!
//! Services implement the application rules on top of the repositories:
//! authentication, moderation, ownership scoping and slug bookkeeping.

pub mod comment;
pub mod moderation;
pub mod news;
pub mod note;
pub mod password;
pub mod user;

pub use comment::{CommentService, CommentServiceError};
pub use moderation::{find_banned_word, BAD_WORDS, WARNING};
pub use news::NewsService;
pub use note::{generate_slug, slug_taken_message, NoteService, NoteServiceError};
pub use password::{hash_password, verify_password};
pub use user::{LoginInput, SignupInput, UserService, UserServiceError};
