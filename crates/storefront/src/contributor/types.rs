//! Contributor and profile types.

use serde::{Deserialize, Serialize};

/// Cached identity profile of a signed-in visitor.
///
/// `nickname` is the GitHub username the contributor lookup is keyed on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub nickname: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub picture: Option<String>,
}

impl Profile {
    /// The nickname, if present and non-empty.
    #[must_use]
    pub fn github_username(&self) -> Option<&str> {
        self.nickname.as_deref().filter(|n| !n.is_empty())
    }
}

/// A rewarded open-source contributor.
///
/// Always replaced as a whole when a new record arrives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contributor {
    pub email: Option<String>,
    pub github: Option<GithubContributions>,
    pub shopify: Option<ShopifyRewards>,
}

/// GitHub side of a contributor record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GithubContributions {
    pub username: String,
    pub contribution_count: i64,
    #[serde(default)]
    pub pull_requests: Vec<PullRequest>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    pub id: String,
}

/// Shopify customer and discount codes earned by contributing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopifyRewards {
    pub id: Option<String>,
    #[serde(default)]
    pub codes: Vec<DiscountCode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountCode {
    pub code: String,
    pub used: bool,
}
