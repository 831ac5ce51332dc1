// SPDX-FileCopyrightText: 2026 Pitstop Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Page metadata port.

/// Describes the page an event fires from.
pub trait PageContext: Send + Sync {
    /// Client user agent, sent unhashed as `client_user_agent`.
    fn user_agent(&self) -> String;

    /// URL of the page at the time of firing.
    fn current_url(&self) -> String;
}

/// A page context with fixed values, used by the CLI and in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticPage {
    pub user_agent: String,
    pub url: String,
}

impl StaticPage {
    pub fn new(user_agent: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            url: url.into(),
        }
    }
}

impl PageContext for StaticPage {
    fn user_agent(&self) -> String {
        self.user_agent.clone()
    }

    fn current_url(&self) -> String {
        self.url.clone()
    }
}
