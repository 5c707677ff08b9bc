use std::rc::Rc;

use crate::app::{FreshetError, Result};
use crate::domain::Post;
use crate::store::Store;

/// Reader actions on stored posts.
pub struct PostsController<S: Store> {
    store: Rc<S>,
}

impl<S: Store> PostsController<S> {
    pub fn new(store: Rc<S>) -> Self {
        Self { store }
    }

    /// Mark a post as visited and show it in the preview.
    pub fn open_post(&self, post_id: i64) -> Result<Post> {
        let post = self
            .store
            .get_post(post_id)
            .ok_or(FreshetError::PostNotFound(post_id))?;

        self.store.mark_visited(post_id)?;
        self.store.set_preview(Some(post_id))?;
        Ok(post)
    }

    pub fn close_preview(&self) -> Result<()> {
        self.store.set_preview(None)
    }
}
