// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Browser configuration

use crate::http::{TransportConfig, DEFAULT_USER_AGENT};

/// Browser configuration
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// User agent applied when no `HTTP_USER_AGENT` server parameter is set
    pub user_agent: String,
    /// Follow 30x redirects automatically
    pub follow_redirects: bool,
    /// Follow zero-timeout meta refreshes automatically
    pub follow_meta_refresh: bool,
    /// Redirect limit per user-initiated request, -1 = unbounded
    pub max_redirects: i32,
    /// Transport settings
    pub transport: TransportConfig,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            follow_redirects: true,
            follow_meta_refresh: false,
            max_redirects: -1,
            transport: TransportConfig::default(),
        }
    }
}

impl BrowserConfig {
    /// Create a new browser config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the user agent
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Enable or disable automatic redirect following
    pub fn follow_redirects(mut self, follow: bool) -> Self {
        self.follow_redirects = follow;
        self
    }

    /// Enable or disable automatic meta-refresh following
    pub fn follow_meta_refresh(mut self, follow: bool) -> Self {
        self.follow_meta_refresh = follow;
        self
    }

    /// Set the redirect limit, -1 for unbounded
    pub fn max_redirects(mut self, max: i32) -> Self {
        self.max_redirects = max;
        self
    }

    /// Set transport settings
    pub fn transport(mut self, transport: TransportConfig) -> Self {
        self.transport = transport;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BrowserConfig::default();
        assert!(config.follow_redirects);
        assert!(!config.follow_meta_refresh);
        assert_eq!(config.max_redirects, -1);
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
    }

    #[test]
    fn test_builder() {
        let config = BrowserConfig::new()
            .user_agent("Custom/1.0")
            .follow_redirects(false)
            .max_redirects(5);
        assert_eq!(config.user_agent, "Custom/1.0");
        assert!(!config.follow_redirects);
        assert_eq!(config.max_redirects, 5);
    }
}
