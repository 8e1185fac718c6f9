// SPDX-License-Identifier: Apache-2.0

//! Check-then-create for blogs and articles.
//!
//! The platform is the only record of what already exists: every ensure
//! starts with a lookup and only creates on a clean miss. Dry runs never send
//! a mutation.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{info, instrument, warn};

use super::client::{AdminClient, extract};
use super::documents::{ARTICLE_CREATE, BLOG_CREATE};
use super::resolver::{ResourceRef, find_article, find_blog};
use super::transport::GraphqlTransport;
use crate::Result;
use crate::error::{SyncError, UserError};
use crate::record::InputRecord;

/// Blog to look up, or create when absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogSpec {
    /// Title used on creation.
    pub title: String,
    /// Handle used for lookup and creation.
    pub handle: String,
    /// Template suffix used on creation.
    pub template_suffix: String,
}

/// Values substituted for blank optional article fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleDefaults {
    /// Author when the record leaves it blank.
    pub author: String,
    /// Template suffix when the record leaves it blank.
    pub template_suffix: String,
}

/// Where the target blog stands after [`ensure_blog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlogState {
    /// The blog already existed.
    Existing(ResourceRef),
    /// The blog was created by this run.
    Created(ResourceRef),
    /// Dry run: the blog does not exist and would be created.
    Planned(BlogSpec),
}

impl BlogState {
    /// The live blog, if there is one.
    #[must_use]
    pub fn resource(&self) -> Option<&ResourceRef> {
        match self {
            BlogState::Existing(blog) | BlogState::Created(blog) => Some(blog),
            BlogState::Planned(_) => None,
        }
    }
}

/// Outcome of ensuring one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SyncOutcome {
    /// Created, or (with `preview`) would have been created.
    Created {
        /// True for dry runs: nothing was sent.
        preview: bool,
    },
    /// Already existed.
    Skipped,
    /// Could not be ensured.
    Failed {
        /// Error detail, verbatim.
        reason: String,
    },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MutationPayload {
    #[serde(default)]
    user_errors: Vec<UserError>,
}

/// Makes sure the blog described by `spec` exists.
///
/// The lookup always runs since it is read-only. On a miss, a dry run reports
/// [`BlogState::Planned`] and a live run creates the blog.
///
/// # Errors
///
/// Any lookup or create failure, including `SyncError::UserErrors` from
/// `blogCreate`. Callers treat these as fatal.
#[instrument(skip(client, spec), fields(handle = %spec.handle))]
pub async fn ensure_blog<T: GraphqlTransport>(
    client: &AdminClient<T>,
    spec: &BlogSpec,
    dry_run: bool,
) -> Result<BlogState> {
    if let Some(blog) = find_blog(client, &spec.handle).await? {
        info!(id = %blog.id, "Using existing blog");
        return Ok(BlogState::Existing(blog));
    }

    if dry_run {
        info!("Dry run: blog would be created");
        return Ok(BlogState::Planned(spec.clone()));
    }

    let variables = json!({
        "blog": {
            "title": spec.title,
            "handle": spec.handle,
            "templateSuffix": spec.template_suffix,
        }
    });
    let data = client.execute(BLOG_CREATE, variables).await?;
    check_user_errors(&data, "blogCreate")?;

    let blog: ResourceRef = extract(&data, "/blogCreate/blog")?;
    info!(id = %blog.id, "Created blog");
    Ok(BlogState::Created(blog))
}

/// Builds the `ArticleCreateInput` for `record`, applying `defaults`.
///
/// # Errors
///
/// Returns `SyncError::Validation` if handle, title or body is blank.
pub fn article_input(
    blog: &ResourceRef,
    record: &InputRecord,
    defaults: &ArticleDefaults,
) -> Result<Value> {
    validate(record)?;

    let author = non_blank(&record.author).unwrap_or(defaults.author.as_str());
    let template_suffix =
        non_blank(&record.template_suffix).unwrap_or(defaults.template_suffix.as_str());

    Ok(json!({
        "blogId": blog.id,
        "handle": record.handle,
        "title": record.title,
        "author": { "name": author },
        "body": record.body_html,
        "tags": record.tags,
        "isPublished": record.published,
        "templateSuffix": template_suffix,
    }))
}

/// Makes sure the article for `record` exists in `blog`.
///
/// `blog` is `None` only when a dry run found no blog; every record then
/// previews as created without any lookup. Local validation runs before any
/// network call.
///
/// # Errors
///
/// `SyncError::Validation` for incomplete records, and lookup failures. Create
/// failures that the API explains (`userErrors`, GraphQL errors) come back as
/// [`SyncOutcome::Failed`] instead.
#[instrument(skip(client, blog, record, defaults), fields(handle = %record.handle))]
pub async fn ensure_article<T: GraphqlTransport>(
    client: &AdminClient<T>,
    blog: Option<&ResourceRef>,
    record: &InputRecord,
    defaults: &ArticleDefaults,
    dry_run: bool,
) -> Result<SyncOutcome> {
    validate(record)?;

    let Some(blog) = blog else {
        return Ok(SyncOutcome::Created { preview: true });
    };

    if find_article(client, Some(blog), &record.handle)
        .await?
        .is_some()
    {
        return Ok(SyncOutcome::Skipped);
    }

    if dry_run {
        return Ok(SyncOutcome::Created { preview: true });
    }

    let input = article_input(blog, record, defaults)?;
    match create_article(client, input).await {
        Ok(()) => Ok(SyncOutcome::Created { preview: false }),
        Err(err) if err.is_indeterminate() => {
            // The write may have landed before the failure was observed.
            warn!(error = %err, "Create outcome unknown, re-checking existence");
            match find_article(client, Some(blog), &record.handle).await {
                Ok(Some(_)) => {
                    info!("Article exists after failed create; counting as created");
                    Ok(SyncOutcome::Created { preview: false })
                }
                _ => Err(err),
            }
        }
        Err(err @ (SyncError::UserErrors { .. } | SyncError::GraphQl { .. })) => {
            Ok(SyncOutcome::Failed {
                reason: err.to_string(),
            })
        }
        Err(err) => Err(err),
    }
}

async fn create_article<T: GraphqlTransport>(client: &AdminClient<T>, input: Value) -> Result<()> {
    let data = client
        .execute(ARTICLE_CREATE, json!({ "article": input }))
        .await?;
    check_user_errors(&data, "articleCreate")
}

fn check_user_errors(data: &Value, operation: &str) -> Result<()> {
    let payload: MutationPayload = extract(data, &format!("/{operation}"))?;
    if payload.user_errors.is_empty() {
        Ok(())
    } else {
        Err(SyncError::UserErrors {
            operation: operation.to_string(),
            errors: payload.user_errors,
        })
    }
}

fn validate(record: &InputRecord) -> Result<()> {
    let missing: Vec<&str> = [
        ("Handle", &record.handle),
        ("Title", &record.title),
        ("Body HTML", &record.body_html),
    ]
    .into_iter()
    .filter(|(_, value)| value.trim().is_empty())
    .map(|(name, _)| name)
    .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(SyncError::Validation {
            message: format!("row missing {}", missing.join("/")),
        })
    }
}

fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}
