//! User-facing flows that drive the store.
//!
//! - [`SubmissionController`]: the "add a feed" state machine
//! - [`PostsController`]: opening and previewing posts

mod posts;
mod submission;

pub use posts::PostsController;
pub use submission::SubmissionController;
