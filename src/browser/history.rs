// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Navigation history
//!
//! An indexed stack of request snapshots with a cursor. Entries flagged as
//! redirect hops are skipped when traversing, so `back` and `forward`
//! always land on a user-initiated request.

use crate::error::{Error, Result};
use crate::http::Request;

#[derive(Debug, Clone)]
struct HistoryEntry {
    request: Request,
    redirect: bool,
}

/// Browsing history with a movable cursor
#[derive(Debug, Clone, Default)]
pub struct History {
    stack: Vec<HistoryEntry>,
    position: usize,
}

impl History {
    /// Create an empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all entries
    pub fn clear(&mut self) {
        self.stack.clear();
        self.position = 0;
    }

    /// Check if no request has been recorded yet
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Number of recorded entries
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    /// Record a request. Forward entries beyond the cursor are discarded.
    /// `redirect` flags entries produced by following a redirect.
    pub fn add(&mut self, request: Request, redirect: bool) {
        if !self.stack.is_empty() {
            self.stack.truncate(self.position + 1);
        }
        self.stack.push(HistoryEntry { request, redirect });
        self.position = self.stack.len() - 1;
    }

    /// The entry under the cursor
    pub fn current(&self) -> Result<&Request> {
        self.stack
            .get(self.position)
            .map(|entry| &entry.request)
            .ok_or_else(|| Error::logic("the page history is empty"))
    }

    /// Move the cursor to the previous user-initiated entry
    pub fn back(&mut self) -> Result<&Request> {
        let mut position = self.position;
        loop {
            if position == 0 {
                return Err(Error::logic("you are already on the first page"));
            }
            position -= 1;
            if !self.stack[position].redirect {
                break;
            }
        }
        self.position = position;
        Ok(&self.stack[position].request)
    }

    /// Move the cursor to the next user-initiated entry
    pub fn forward(&mut self) -> Result<&Request> {
        let mut position = self.position;
        loop {
            if position + 1 >= self.stack.len() {
                return Err(Error::logic("you are already on the last page"));
            }
            position += 1;
            if !self.stack[position].redirect {
                break;
            }
        }
        self.position = position;
        Ok(&self.stack[position].request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{Files, Params, ServerParams};
    use std::collections::BTreeMap;

    fn request(uri: &str) -> Request {
        Request::new(
            "GET",
            uri,
            Params::new(),
            Files::new(),
            ServerParams::new(),
            None,
            BTreeMap::new(),
        )
    }

    #[test]
    fn test_empty_history() {
        let mut history = History::new();
        assert!(history.is_empty());
        assert!(history.current().is_err());
        assert!(history.back().is_err());
        assert!(history.forward().is_err());
    }

    #[test]
    fn test_back_and_forward() {
        let mut history = History::new();
        history.add(request("http://x/a"), false);
        history.add(request("http://x/b"), false);
        history.add(request("http://x/c"), false);

        assert_eq!(history.current().unwrap().uri(), "http://x/c");
        assert_eq!(history.back().unwrap().uri(), "http://x/b");
        assert_eq!(history.back().unwrap().uri(), "http://x/a");
        assert!(history.back().is_err());
        assert_eq!(history.forward().unwrap().uri(), "http://x/b");
        assert_eq!(history.forward().unwrap().uri(), "http://x/c");
        assert!(history.forward().is_err());
    }

    #[test]
    fn test_add_truncates_forward_entries() {
        let mut history = History::new();
        history.add(request("http://x/a"), false);
        history.add(request("http://x/b"), false);
        history.back().unwrap();
        history.add(request("http://x/c"), false);

        assert_eq!(history.len(), 2);
        assert_eq!(history.current().unwrap().uri(), "http://x/c");
        assert!(history.forward().is_err());
    }

    #[test]
    fn test_traversal_skips_redirect_hops() {
        let mut history = History::new();
        history.add(request("http://x/a"), false);
        history.add(request("http://x/hop"), true);
        history.add(request("http://x/b"), false);

        assert_eq!(history.back().unwrap().uri(), "http://x/a");
        assert_eq!(history.forward().unwrap().uri(), "http://x/b");
    }

    #[test]
    fn test_back_with_only_hops_behind() {
        let mut history = History::new();
        history.add(request("http://x/hop"), true);
        history.add(request("http://x/b"), false);

        assert!(history.back().is_err());
    }

    #[test]
    fn test_clear() {
        let mut history = History::new();
        history.add(request("http://x/a"), false);
        history.clear();
        assert!(history.is_empty());
        assert!(history.current().is_err());
    }
}
