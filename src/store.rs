use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use log::debug;
use thiserror::Error;

use crate::model::Post;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("post {0} not found")]
    NotFound(i64),
}

#[derive(Debug)]
struct Records {
    posts: HashMap<i64, Post>,
    next_id: i64,
}

/// In-memory collection of posts.
///
/// Every operation holds the same exclusive lock for its whole duration, so
/// ids are handed out strictly in lock order and never reused after a delete.
#[derive(Debug)]
pub struct PostStore {
    records: Mutex<Records>,
}

impl PostStore {
    pub fn new() -> PostStore {
        PostStore {
            records: Mutex::new(Records {
                posts: HashMap::new(),
                next_id: 1,
            }),
        }
    }

    // Each operation touches one entry and the counter together, so the
    // records behind a poisoned lock are still consistent.
    fn lock(&self) -> MutexGuard<'_, Records> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of all posts, in no particular order.
    pub fn list(&self) -> Vec<Post> {
        let records = self.lock();
        let posts: Vec<Post> = records.posts.values().cloned().collect();
        debug!("listing {} posts", posts.len());
        posts
    }

    pub fn insert(&self, body: &str) -> Post {
        let mut records = self.lock();
        let post = Post::new(records.next_id, body);
        records.next_id += 1;
        records.posts.insert(post.id, post.clone());
        debug!("inserted post {}", post.id);
        post
    }

    pub fn get(&self, id: i64) -> Result<Post, StoreError> {
        self.lock()
            .posts
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    pub fn delete(&self, id: i64) -> Result<(), StoreError> {
        match self.lock().posts.remove(&id) {
            Some(_) => {
                debug!("deleted post {}", id);
                Ok(())
            }
            None => Err(StoreError::NotFound(id)),
        }
    }

    pub fn len(&self) -> usize {
        self.lock().posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for PostStore {
    fn default() -> PostStore {
        PostStore::new()
    }
}
