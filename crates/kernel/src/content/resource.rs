//! Content resource descriptors.

use std::fmt;

/// A content type exposed through the uniform CRUD surface.
///
/// `table` is interpolated into SQL text, so resources are only ever built
/// from the constants below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Resource {
    /// Table holding the rows.
    table: &'static str,

    /// URL segment under the API prefix.
    slug: &'static str,
}

impl Resource {
    pub const BLOGS: Resource = Resource {
        table: "blogs",
        slug: "blogs",
    };

    pub const NEWS: Resource = Resource {
        table: "news",
        slug: "news",
    };

    /// Every resource served by the kernel.
    pub const ALL: [Resource; 2] = [Resource::BLOGS, Resource::NEWS];

    pub fn table(&self) -> &'static str {
        self.table
    }

    pub fn slug(&self) -> &'static str {
        self.slug
    }

    /// Collection route, e.g. `/v1/blogs`.
    pub fn collection_path(&self) -> String {
        format!("/v1/{}", self.slug)
    }

    /// Member route, e.g. `/v1/blogs/{id}`.
    pub fn member_path(&self) -> String {
        format!("/v1/{}/{{id}}", self.slug)
    }

    /// Call-site label for error context, e.g. `blogs.update`.
    pub fn operation(&self, name: &str) -> String {
        format!("{}.{name}", self.table)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug)
    }
}
