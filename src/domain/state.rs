use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::app::FreshetError;
use crate::validation::ValidationError;

/// Form axis of the submission state machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormState {
    #[default]
    Filling,
    Validating,
    ValidatingFailed(ValidationError),
    ValidatingSucceeded,
}

/// Feed loading axis of the submission state machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadingState {
    #[default]
    Idling,
    Loading,
    LoadingFailed(LoadErrorKind),
    LoadingSucceeded,
}

/// Coarse classification of a failed feed load, as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadErrorKind {
    Network,
    MalformedDocument,
    Unknown,
}

impl From<&FreshetError> for LoadErrorKind {
    fn from(err: &FreshetError) -> Self {
        match err {
            FreshetError::Network { .. } => LoadErrorKind::Network,
            FreshetError::MalformedDocument(_) => LoadErrorKind::MalformedDocument,
            _ => LoadErrorKind::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionState {
    pub form: FormState,
    pub feed_loading: LoadingState,
}

/// Reader-side state: which posts were opened and which one is previewed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiState {
    pub visited_posts: BTreeSet<i64>,
    pub preview: Option<i64>,
}

/// User-facing feedback, identified by a stable message key.
///
/// Presentation owns the text for each key; [`Feedback::message`] is the
/// built-in English fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    RequiredField,
    InvalidUrl,
    AlreadyExists,
    ContentLoadingError,
    XmlParsingError,
    UnknownError,
    LoadSuccess,
}

impl Feedback {
    pub fn key(self) -> &'static str {
        match self {
            Feedback::RequiredField => "requiredField",
            Feedback::InvalidUrl => "invalidURL",
            Feedback::AlreadyExists => "alreadyExists",
            Feedback::ContentLoadingError => "contentLoadingError",
            Feedback::XmlParsingError => "xmlParsingError",
            Feedback::UnknownError => "unknownError",
            Feedback::LoadSuccess => "loadSuccess",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Feedback::RequiredField => "You must fill in the RSS feed URL",
            Feedback::InvalidUrl => "Link must be a valid URL",
            Feedback::AlreadyExists => "RSS feed has already been added",
            Feedback::ContentLoadingError => "Failed to load content",
            Feedback::XmlParsingError => "Failed to parse XML",
            Feedback::UnknownError => "Something went wrong",
            Feedback::LoadSuccess => "RSS feed added successfully",
        }
    }

    pub fn is_failure(self) -> bool {
        self != Feedback::LoadSuccess
    }

    /// Feedback for a form state, if that state carries any.
    pub fn for_form(state: FormState) -> Option<Self> {
        match state {
            FormState::ValidatingFailed(err) => Some(err.into()),
            _ => None,
        }
    }

    pub fn for_loading(state: LoadingState) -> Option<Self> {
        match state {
            LoadingState::LoadingFailed(kind) => Some(kind.into()),
            LoadingState::LoadingSucceeded => Some(Feedback::LoadSuccess),
            _ => None,
        }
    }
}

impl From<ValidationError> for Feedback {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::MissingValue => Feedback::RequiredField,
            ValidationError::MalformedUrl => Feedback::InvalidUrl,
            ValidationError::Duplicate => Feedback::AlreadyExists,
        }
    }
}

impl From<LoadErrorKind> for Feedback {
    fn from(kind: LoadErrorKind) -> Self {
        match kind {
            LoadErrorKind::Network => Feedback::ContentLoadingError,
            LoadErrorKind::MalformedDocument => Feedback::XmlParsingError,
            LoadErrorKind::Unknown => Feedback::UnknownError,
        }
    }
}
