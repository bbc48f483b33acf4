//! Response envelope for paginated collections.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::request::PageRequest;

/// Navigation links for a page, built from the request URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageLinks {
    /// Link to the current page.
    #[serde(rename = "self")]
    pub self_: String,
    /// Link to the following page, when one exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    /// Link to the preceding page, when one exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
}

/// One page of items plus totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    items: Vec<T>,
    page: u32,
    per_page: u32,
    total_items: u64,
    total_pages: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    links: Option<PageLinks>,
}

impl<T> Page<T> {
    /// Wrap the items fetched for `request` together with the total row count.
    #[must_use]
    pub fn new(items: Vec<T>, request: PageRequest, total_items: u64) -> Self {
        let total_pages = total_items.div_ceil(u64::from(request.per_page()));
        Self {
            items,
            page: request.page(),
            per_page: request.per_page(),
            total_items,
            total_pages,
            links: None,
        }
    }

    /// Items on this page.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consume the envelope, returning the items.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Requested page size.
    #[must_use]
    pub const fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Rows matching the query across all pages.
    #[must_use]
    pub const fn total_items(&self) -> u64 {
        self.total_items
    }

    /// Number of pages for the current size; zero when nothing matched.
    #[must_use]
    pub const fn total_pages(&self) -> u64 {
        self.total_pages
    }

    /// Whether a following page exists.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        (self.page as u64) < self.total_pages
    }

    /// Whether a preceding page exists.
    #[must_use]
    pub const fn has_prev(&self) -> bool {
        self.page > 1
    }

    /// Navigation links, if attached.
    #[must_use]
    pub const fn links(&self) -> Option<&PageLinks> {
        self.links.as_ref()
    }

    /// Convert every item while keeping the totals.
    #[must_use]
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            total_items: self.total_items,
            total_pages: self.total_pages,
            links: self.links,
        }
    }

    /// Attach `self`/`next`/`prev` links derived from `base`.
    ///
    /// Existing query parameters other than `page` and `perPage` are kept so
    /// filters such as `search` survive navigation.
    #[must_use]
    pub fn with_links(mut self, base: &Url) -> Self {
        let request = PageRequest::first(self.per_page).with_page(self.page);
        let next = self
            .has_next()
            .then(|| link_for(base, request.with_page(self.page.saturating_add(1))));
        let prev = self
            .has_prev()
            .then(|| link_for(base, request.with_page(self.page.saturating_sub(1))));
        self.links = Some(PageLinks {
            self_: link_for(base, request),
            next,
            prev,
        });
        self
    }
}

fn link_for(base: &Url, request: PageRequest) -> String {
    let retained: Vec<(String, String)> = base
        .query_pairs()
        .filter(|(key, _)| key != "page" && key != "perPage")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut url = base.clone();
    {
        let mut pairs = url.query_pairs_mut();
        pairs.clear();
        for (key, value) in &retained {
            pairs.append_pair(key, value);
        }
        pairs.append_pair("page", &request.page().to_string());
        pairs.append_pair("perPage", &request.per_page().to_string());
    }
    url.to_string()
}
