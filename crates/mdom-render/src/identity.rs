//! Positional key assignment.
//!
//! A node's key is the key prefix followed by its sibling index at every
//! level below the root, joined by `-`:
//!
//! ```text
//! div          h
//! ├── h1       h-0
//! │   ├── "A " h-0-0
//! │   └── em   h-0-1
//! └── p        h-1
//! ```
//!
//! Keys depend only on tree shape, so two renders of structurally identical
//! trees produce identical keys, and two positions in one tree never share a
//! key.

use std::fmt::Write;

use crate::error::RenderError;

/// Path from the root to the node currently being visited.
///
/// The key of the current position is kept materialized in a buffer;
/// descending appends one segment and ascending truncates it again.
#[derive(Debug)]
pub struct IdentityTrail {
    key: String,
    segment_starts: Vec<usize>,
    max_depth: usize,
}

impl IdentityTrail {
    /// Start a trail at the root.
    #[must_use]
    pub fn new(prefix: &str, max_depth: usize) -> Self {
        Self {
            key: prefix.to_owned(),
            segment_starts: Vec::new(),
            max_depth,
        }
    }

    /// Current depth below the root.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.segment_starts.len()
    }

    /// Key of the current position.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Move to the child at `index` of the current node.
    ///
    /// Fails without moving when the child would lie deeper than the
    /// configured maximum depth.
    pub fn descend(&mut self, index: usize) -> Result<(), RenderError> {
        if self.depth() >= self.max_depth {
            return Err(RenderError::DepthExceeded {
                limit: self.max_depth,
            });
        }
        self.segment_starts.push(self.key.len());
        write!(self.key, "-{index}").unwrap();
        Ok(())
    }

    /// Move back to the parent of the current node.
    pub fn ascend(&mut self) {
        if let Some(start) = self.segment_starts.pop() {
            self.key.truncate(start);
        }
    }
}
