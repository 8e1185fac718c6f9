// SPDX-License-Identifier: Apache-2.0

//! Existence checks for remote resources.
//!
//! Lookups are read-only filtered queries; zero matches is a clean `None`.

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, instrument};

use super::client::AdminClient;
use super::documents::{ARTICLES_BY_QUERY, BLOG_BY_QUERY};
use super::transport::GraphqlTransport;
use crate::Result;
use crate::error::SyncError;

/// Reference to a resource that exists on the platform.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRef {
    /// Global id, e.g. `gid://shopify/Blog/123`.
    pub id: String,
    /// Unique handle within the parent scope.
    pub handle: String,
    /// Title, when the query selects it.
    #[serde(default)]
    pub title: Option<String>,
    /// Template suffix, when the query selects it.
    #[serde(default)]
    pub template_suffix: Option<String>,
}

impl ResourceRef {
    /// Numeric id from the trailing gid segment.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::MalformedResponse` if the gid does not end in a number.
    pub fn numeric_id(&self) -> Result<u64> {
        numeric_id_from_gid(&self.id)
    }
}

/// Parses the numeric id out of `gid://shopify/<Type>/<id>`.
///
/// # Errors
///
/// Returns `SyncError::MalformedResponse` if the last segment is not a number.
pub fn numeric_id_from_gid(gid: &str) -> Result<u64> {
    gid.rsplit('/')
        .next()
        .and_then(|segment| segment.parse().ok())
        .ok_or_else(|| SyncError::MalformedResponse {
            message: format!("Could not parse numeric id from gid: {gid}"),
        })
}

/// Finds the blog with `handle`.
#[instrument(skip(client))]
pub async fn find_blog<T: GraphqlTransport>(
    client: &AdminClient<T>,
    handle: &str,
) -> Result<Option<ResourceRef>> {
    let nodes: Vec<ResourceRef> = client
        .query_at(
            BLOG_BY_QUERY,
            json!({ "query": format!("handle:{handle}") }),
            "/blogs/nodes",
        )
        .await?;

    let found = first_exact(nodes, handle);
    debug!(found = found.is_some(), "Blog lookup finished");
    Ok(found)
}

/// Finds the article with `handle` inside `blog`.
///
/// With no blog there is nothing to scope the query by, so the answer is
/// `None` without contacting the API.
#[instrument(skip(client, blog), fields(blog = blog.map(|b| b.handle.as_str())))]
pub async fn find_article<T: GraphqlTransport>(
    client: &AdminClient<T>,
    blog: Option<&ResourceRef>,
    handle: &str,
) -> Result<Option<ResourceRef>> {
    let Some(blog) = blog else {
        debug!("Parent blog not resolved, skipping lookup");
        return Ok(None);
    };

    // Search syntax treats whitespace as AND.
    let query = format!("handle:{handle} blog_id:{}", blog.numeric_id()?);
    let nodes: Vec<ResourceRef> = client
        .query_at(ARTICLES_BY_QUERY, json!({ "query": query }), "/articles/nodes")
        .await?;

    Ok(first_exact(nodes, handle))
}

// Search is fuzzy; only an exact handle counts as a match.
fn first_exact(nodes: Vec<ResourceRef>, handle: &str) -> Option<ResourceRef> {
    nodes.into_iter().find(|node| node.handle == handle)
}
