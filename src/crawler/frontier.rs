//! Crawl frontier and visited set
//!
//! The frontier is a strict FIFO queue of `(url, depth)` entries. The same URL
//! may be queued more than once; repeats are dropped when dequeued because
//! the URL is already in the visited set by then.

use std::collections::{HashSet, VecDeque};
use url::Url;

/// A URL waiting to be crawled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    pub url: Url,

    /// Depth at which the URL was enqueued
    pub depth: u32,
}

/// BFS queue plus the set of URLs already dequeued
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<FrontierEntry>,
    visited: HashSet<String>,
}

impl Frontier {
    /// Creates a frontier holding only `(seed, 0)`
    pub fn with_seed(seed: Url) -> Self {
        let mut frontier = Self::default();
        frontier.push(seed, 0);
        frontier
    }

    /// Appends an entry to the back of the queue
    pub fn push(&mut self, url: Url, depth: u32) {
        self.queue.push_back(FrontierEntry { url, depth });
    }

    /// Takes the oldest entry
    pub fn pop(&mut self) -> Option<FrontierEntry> {
        self.queue.pop_front()
    }

    /// Adds `url` to the visited set
    ///
    /// # Returns
    ///
    /// * `true` - The URL had not been visited before
    /// * `false` - The URL was already visited
    pub fn mark_visited(&mut self, url: &Url) -> bool {
        self.visited.insert(url.as_str().to_string())
    }

    pub fn is_visited(&self, url: &Url) -> bool {
        self.visited.contains(url.as_str())
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Number of pending entries, repeats included
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
