pub mod feed;
pub mod post;
pub mod state;

pub use feed::{FeedMeta, FeedSource};
pub use post::{Post, PostCandidate};
pub use state::{Feedback, FormState, LoadErrorKind, LoadingState, SubmissionState, UiState};
