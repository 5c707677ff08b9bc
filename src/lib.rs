//! # freshet
//!
//! Keeps a small, user-curated set of RSS/Atom feeds fresh in memory by
//! polling every source on a fixed interval and merging only new items.
//!
//! ## Architecture
//!
//! ```text
//! SubmissionController ─┐
//!                       ├─> SyncEngine ─> Fetcher → FeedParser → dedup ─> Store ─> listener
//! Scheduler (per tick) ─┘
//! ```
//!
//! Everything shares one [`MemoryStore`](store::MemoryStore) through `Rc` and
//! runs cooperatively on a single thread inside a tokio `LocalSet`.
//!
//! ## Quick Start
//!
//! ```bash
//! # Subscribe and keep polling every 5 seconds
//! freshet watch https://blog.rust-lang.org/feed.xml
//!
//! # Poll faster
//! freshet --interval 2s watch https://blog.rust-lang.org/feed.xml
//!
//! # Look at a feed once
//! freshet check https://blog.rust-lang.org/feed.xml
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together the store, the
/// sync engine and the controllers.
pub mod app;

/// Command-line interface using clap.
///
/// - `watch <url>...` - subscribe and poll until Ctrl-C
/// - `check <url>` - fetch and parse a feed once
pub mod cli;

/// Configuration loaded from `~/.config/freshet/config.toml`.
pub mod config;

/// User flows: adding a feed, opening a post.
pub mod controller;

/// Core domain models.
///
/// - [`FeedSource`](domain::FeedSource): a subscribed feed
/// - [`Post`](domain::Post): one item of a feed, with a global id
/// - [`SubmissionState`](domain::SubmissionState): the two-axis form state
pub mod domain;

/// Transport collaborator.
///
/// - [`Fetcher`](fetcher::Fetcher): async trait returning a document body
/// - [`HttpFetcher`](fetcher::HttpFetcher): reqwest-based implementation
pub mod fetcher;

/// Parser collaborator: feed-rs based [`Normalizer`](normalizer::Normalizer).
pub mod normalizer;

/// Console rendering of store notifications.
pub mod presenter;

/// Drift-corrected periodic refresh of all tracked feeds.
pub mod scheduler;

/// Observable in-memory state.
///
/// - [`Store`](store::Store): reads plus notified mutations
/// - [`MemoryStore`](store::MemoryStore): the single-threaded implementation
pub mod store;

/// Register and refresh feeds, merging only new posts.
pub mod sync;

/// URL checks for new subscriptions.
pub mod validation;

#[cfg(test)]
pub(crate) mod test_support;
