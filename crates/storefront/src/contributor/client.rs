//! Contributor GraphQL API client.

use std::future::Future;

use graphql_client::GraphQLQuery;
use tracing::instrument;
use url::Url;

use crate::graphql::{ApiError, GraphQLTransport};

use super::conversions::convert_contributor;
use super::types::Contributor;

/// Remote lookup of contributor records.
pub trait ContributorApi {
    /// Refresh the contributor's tags and return their record.
    fn update_contributor_tags(
        &self,
        github_username: &str,
    ) -> impl Future<Output = Result<Contributor, ApiError>> + Send;
}

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/contributor/schema.graphql",
    query_path = "graphql/contributor/update_contributor_tags.graphql",
    response_derives = "Debug, Clone"
)]
pub struct UpdateContributorTags;

/// Client for the contributor GraphQL endpoint.
#[derive(Clone)]
pub struct ContributorClient {
    transport: GraphQLTransport,
}

impl ContributorClient {
    #[must_use]
    pub fn new(endpoint: &Url) -> Self {
        Self {
            transport: GraphQLTransport::new(endpoint.as_str()),
        }
    }
}

impl ContributorApi for ContributorClient {
    #[instrument(skip(self))]
    async fn update_contributor_tags(&self, github_username: &str) -> Result<Contributor, ApiError> {
        let variables = update_contributor_tags::Variables {
            user: github_username.to_string(),
        };

        let data = self
            .transport
            .execute::<UpdateContributorTags>(variables)
            .await?;

        data.update_contributor_tags
            .map(convert_contributor)
            .ok_or_else(|| ApiError::NotFound(format!("Contributor not found: {github_username}")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_query_body() {
        let body = UpdateContributorTags::build_query(update_contributor_tags::Variables {
            user: "octocat".to_string(),
        });
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["operationName"], "UpdateContributorTags");
        assert_eq!(json["variables"], serde_json::json!({"user": "octocat"}));
        assert!(
            json["query"]
                .as_str()
                .unwrap()
                .contains("updateContributorTags(githubUsername: $user)")
        );
    }

    #[test]
    fn test_null_payload_decodes() {
        let data: update_contributor_tags::ResponseData =
            serde_json::from_str(r#"{"updateContributorTags": null}"#).unwrap();
        assert!(data.update_contributor_tags.is_none());
    }
}
