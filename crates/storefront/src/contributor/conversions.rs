//! Contributor response conversion.

use super::client::update_contributor_tags::UpdateContributorTagsUpdateContributorTags;
use super::types::{Contributor, DiscountCode, GithubContributions, PullRequest, ShopifyRewards};

#[must_use]
pub fn convert_contributor(record: UpdateContributorTagsUpdateContributorTags) -> Contributor {
    Contributor {
        email: record.email,
        github: record.github.map(|g| GithubContributions {
            username: g.username,
            contribution_count: g.contribution_count,
            pull_requests: g
                .pull_requests
                .into_iter()
                .map(|pr| PullRequest { id: pr.id })
                .collect(),
        }),
        shopify: record.shopify.map(|s| ShopifyRewards {
            id: s.id,
            codes: s
                .codes
                .into_iter()
                .map(|c| DiscountCode {
                    code: c.code,
                    used: c.used,
                })
                .collect(),
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::contributor::client::update_contributor_tags::ResponseData;

    #[test]
    fn test_convert_full_record() {
        let data: ResponseData = serde_json::from_value(serde_json::json!({
            "updateContributorTags": {
                "email": "jlengstorf@example.com",
                "github": {
                    "username": "jlengstorf",
                    "contributionCount": 3,
                    "pullRequests": [{"id": "PR_1"}, {"id": "PR_2"}, {"id": "PR_3"}]
                },
                "shopify": {
                    "id": "gid://shopify/Customer/1",
                    "codes": [{"code": "HOLYBUCKETS", "used": false}]
                }
            }
        }))
        .unwrap();

        let contributor = convert_contributor(data.update_contributor_tags.unwrap());

        let github = contributor.github.unwrap();
        assert_eq!(github.username, "jlengstorf");
        assert_eq!(github.contribution_count, 3);
        assert_eq!(github.pull_requests.len(), 3);
        let shopify = contributor.shopify.unwrap();
        assert_eq!(shopify.id.as_deref(), Some("gid://shopify/Customer/1"));
        assert_eq!(
            shopify.codes,
            vec![DiscountCode {
                code: "HOLYBUCKETS".to_string(),
                used: false,
            }]
        );
    }

    #[test]
    fn test_convert_record_without_rewards() {
        let data: ResponseData = serde_json::from_value(serde_json::json!({
            "updateContributorTags": {"email": null, "github": null, "shopify": null}
        }))
        .unwrap();

        let contributor = convert_contributor(data.update_contributor_tags.unwrap());

        assert_eq!(
            contributor,
            Contributor {
                email: None,
                github: None,
                shopify: None,
            }
        );
    }
}
