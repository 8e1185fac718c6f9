// SPDX-License-Identifier: Apache-2.0

//! GraphQL documents for the Admin API.
//!
//! Documents are opaque templates; callers only supply variables.

/// Looks up a blog by search query (e.g. `handle:news`).
pub const BLOG_BY_QUERY: &str = r"
query BlogByHandle($query: String!) {
  blogs(first: 10, query: $query) {
    nodes {
      id
      handle
      title
      templateSuffix
    }
  }
}
";

/// Creates a blog.
pub const BLOG_CREATE: &str = r"
mutation BlogCreate($blog: BlogCreateInput!) {
  blogCreate(blog: $blog) {
    blog {
      id
      handle
      title
      templateSuffix
    }
    userErrors {
      field
      message
    }
  }
}
";

/// Looks up articles by search query; supports `handle:` and `blog_id:` filters.
pub const ARTICLES_BY_QUERY: &str = r"
query ArticlesByQuery($query: String!) {
  articles(first: 10, query: $query) {
    nodes {
      id
      handle
    }
  }
}
";

/// Creates an article.
pub const ARTICLE_CREATE: &str = r"
mutation ArticleCreate($article: ArticleCreateInput!) {
  articleCreate(article: $article) {
    article {
      id
      handle
      title
    }
    userErrors {
      field
      message
    }
  }
}
";
