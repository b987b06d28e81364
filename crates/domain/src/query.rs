use std::collections::BTreeMap;

use pharmadex_core::{AppError, AppResult, RecordId};
use serde::{Deserialize, Serialize};

/// Page size applied when the caller does not request one.
pub const DEFAULT_PAGE_SIZE: u32 = 25;

/// Upper bound for a requested page size.
pub const MAX_PAGE_SIZE: u32 = 200;

/// Pagination, search, filter, and sort inputs for a list operation.
///
/// Filters are kept in a `BTreeMap` so that the serialized form is
/// deterministic; equal queries always produce equal cache keys.
/// Construction goes through [`ListQuery::new`] so the page bounds hold
/// for every instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    page: u32,
    page_size: u32,
    search: Option<String>,
    filters: BTreeMap<String, String>,
    sort_by: Option<String>,
    sort_descending: bool,
}

impl ListQuery {
    /// Creates a validated query with 1-based page numbering.
    pub fn new(page: u32, page_size: u32) -> AppResult<Self> {
        if page == 0 {
            return Err(AppError::Validation(
                "page number must be 1 or greater".to_owned(),
            ));
        }

        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(AppError::Validation(format!(
                "page size must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }

        Ok(Self {
            page,
            page_size,
            search: None,
            filters: BTreeMap::new(),
            sort_by: None,
            sort_descending: false,
        })
    }

    /// Sets the free-text search term; blank input coerces to absent.
    #[must_use]
    pub fn with_search(mut self, search: Option<String>) -> Self {
        self.search = search
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());
        self
    }

    /// Adds one field-specific filter.
    #[must_use]
    pub fn with_filter(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(field.into(), value.into());
        self
    }

    /// Sets the sort field and direction.
    #[must_use]
    pub fn with_sort(mut self, sort_by: Option<String>, sort_descending: bool) -> Self {
        self.sort_by = sort_by
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());
        self.sort_descending = sort_descending;
        self
    }

    /// Returns the 1-based page number.
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Returns the page size.
    #[must_use]
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Returns the free-text search term.
    #[must_use]
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// Returns the sort field, if one was requested.
    #[must_use]
    pub fn sort_by(&self) -> Option<&str> {
        self.sort_by.as_deref()
    }

    /// Returns whether sorting is descending.
    #[must_use]
    pub fn sort_descending(&self) -> bool {
        self.sort_descending
    }

    /// Returns one field filter value.
    #[must_use]
    pub fn filter(&self, field: &str) -> Option<&str> {
        self.filters.get(field).map(String::as_str)
    }

    /// Parses one field filter as a boolean.
    pub fn bool_filter(&self, field: &str) -> AppResult<Option<bool>> {
        match self.filter(field) {
            None => Ok(None),
            Some(value) if value.eq_ignore_ascii_case("true") => Ok(Some(true)),
            Some(value) if value.eq_ignore_ascii_case("false") => Ok(Some(false)),
            Some(value) => Err(AppError::Validation(format!(
                "filter '{field}' must be true or false, got '{value}'"
            ))),
        }
    }

    /// Parses one field filter as a record identifier.
    pub fn id_filter(&self, field: &str) -> AppResult<Option<RecordId>> {
        match self.filter(field) {
            None => Ok(None),
            Some(value) => value.parse::<RecordId>().map(Some).map_err(|_| {
                AppError::Validation(format!(
                    "filter '{field}' must be a numeric identifier, got '{value}'"
                ))
            }),
        }
    }

    /// Returns the number of rows to skip for offset pagination.
    #[must_use]
    pub fn offset(&self) -> usize {
        (self.page as usize - 1) * self.page_size as usize
    }

    /// Returns the maximum number of rows for one page.
    #[must_use]
    pub fn limit(&self) -> usize {
        self.page_size as usize
    }

    /// Returns a stable cache key covering every query input.
    ///
    /// Separator characters inside values are escaped, so two distinct
    /// queries never share a key even when a search term or filter value
    /// contains `&` or `=`.
    #[must_use]
    pub fn cache_key(&self) -> String {
        let mut key = format!("page={}&size={}", self.page, self.page_size);
        if let Some(search) = &self.search {
            key.push_str("&search=");
            key.push_str(&escape_key_component(search));
        }
        if let Some(sort_by) = &self.sort_by {
            key.push_str("&sort=");
            key.push_str(&escape_key_component(sort_by));
            if self.sort_descending {
                key.push_str("&desc=true");
            }
        }
        for (field, value) in &self.filters {
            key.push('&');
            key.push_str(&escape_key_component(field));
            key.push('=');
            key.push_str(&escape_key_component(value));
        }

        key
    }
}

fn escape_key_component(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('&', "%26")
        .replace('=', "%3d")
}

/// One page of a list result with filter-wide counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Records for the requested page.
    pub items: Vec<T>,
    /// Number of records matching the filter across all pages.
    pub total_count: u64,
    /// Number of pages at the requested page size.
    pub page_count: u32,
}

impl<T> Page<T> {
    /// Creates a page, deriving the page count from the total.
    #[must_use]
    pub fn new(items: Vec<T>, total_count: u64, page_size: u32) -> Self {
        let page_count = total_count.div_ceil(u64::from(page_size)).min(u64::from(u32::MAX));
        Self {
            items,
            total_count,
            page_count: page_count as u32,
        }
    }

    /// Maps page items into another representation, keeping the counts.
    #[must_use]
    pub fn map<U>(self, convert: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(convert).collect(),
            total_count: self.total_count,
            page_count: self.page_count,
        }
    }
}

/// Slices an already-filtered, already-sorted in-memory collection into the
/// requested page.
#[must_use]
pub fn paginate<T>(items: Vec<T>, query: &ListQuery) -> Page<T> {
    let total_count = items.len() as u64;
    let paged = items
        .into_iter()
        .skip(query.offset())
        .take(query.limit())
        .collect();

    Page::new(paged, total_count, query.page_size())
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::{ListQuery, Page, paginate};

    fn query(page: u32, page_size: u32) -> ListQuery {
        ListQuery::new(page, page_size).unwrap_or_else(|_| unreachable!())
    }

    #[test]
    fn page_number_is_one_based() {
        assert!(ListQuery::new(0, 25).is_err());
        assert!(ListQuery::new(1, 25).is_ok());
    }

    #[test]
    fn page_size_is_bounded() {
        assert!(ListQuery::new(1, 0).is_err());
        assert!(ListQuery::new(1, 201).is_err());
        assert!(ListQuery::new(1, 200).is_ok());
    }

    #[test]
    fn offset_skips_preceding_pages() {
        assert_eq!(query(3, 10).offset(), 20);
        assert_eq!(query(1, 10).offset(), 0);
    }

    #[test]
    fn equal_queries_share_a_cache_key() {
        let left = query(2, 25)
            .with_search(Some("raw".to_owned()))
            .with_filter("isActive", "true")
            .with_sort(Some("name".to_owned()), true);
        let right = query(2, 25)
            .with_search(Some("raw".to_owned()))
            .with_filter("isActive", "true")
            .with_sort(Some("name".to_owned()), true);

        assert_eq!(left, right);
        assert_eq!(left.cache_key(), right.cache_key());
    }

    #[test]
    fn differing_filters_produce_distinct_cache_keys() {
        let active = query(1, 25).with_filter("isActive", "true");
        let inactive = query(1, 25).with_filter("isActive", "false");
        assert_ne!(active.cache_key(), inactive.cache_key());
    }

    #[test]
    fn search_text_cannot_forge_a_filter_cache_key() {
        let searched = query(1, 25).with_search(Some("rm&isActive=true".to_owned()));
        let filtered = query(1, 25)
            .with_search(Some("rm".to_owned()))
            .with_filter("isActive", "true");
        assert_ne!(searched.cache_key(), filtered.cache_key());

        let joined = query(1, 25).with_filter("code", "a&name=b");
        let split = query(1, 25)
            .with_filter("code", "a")
            .with_filter("name", "b");
        assert_ne!(joined.cache_key(), split.cache_key());
    }

    #[test]
    fn escaped_values_still_share_keys_when_equal() {
        let left = query(1, 25).with_search(Some("50% w/w".to_owned()));
        let right = query(1, 25).with_search(Some("50% w/w".to_owned()));
        assert_eq!(left.cache_key(), right.cache_key());
    }

    #[test]
    fn blank_search_coerces_to_absent() {
        let listed = query(1, 25).with_search(Some("   ".to_owned()));
        assert!(listed.search().is_none());
        assert_eq!(listed.cache_key(), query(1, 25).cache_key());
    }

    #[test]
    fn bool_filter_rejects_non_boolean_values() {
        let listed = query(1, 25).with_filter("isActive", "yes");
        assert!(listed.bool_filter("isActive").is_err());
        assert!(listed.bool_filter("missing").unwrap_or(Some(true)).is_none());
    }

    #[test]
    fn page_count_rounds_up() {
        let page: Page<u32> = Page::new(Vec::new(), 101, 25);
        assert_eq!(page.page_count, 5);

        let empty: Page<u32> = Page::new(Vec::new(), 0, 25);
        assert_eq!(empty.page_count, 0);
    }

    #[test]
    fn paginate_returns_requested_slice() {
        let items: Vec<u32> = (0..12).collect();
        let page = paginate(items, &query(2, 5));

        assert_eq!(page.items, vec![5, 6, 7, 8, 9]);
        assert_eq!(page.total_count, 12);
        assert_eq!(page.page_count, 3);
    }

    proptest! {
        #[test]
        fn consecutive_pages_never_drop_or_duplicate(
            total in 0usize..500,
            page_size in 1u32..40,
        ) {
            let items: Vec<usize> = (0..total).collect();
            let mut collected = Vec::new();
            let mut page_number = 1u32;

            loop {
                let listed = ListQuery::new(page_number, page_size);
                prop_assert!(listed.is_ok());
                let Ok(listed) = listed else { unreachable!() };
                let page = paginate(items.clone(), &listed);
                prop_assert_eq!(page.total_count, total as u64);
                if page.items.is_empty() {
                    break;
                }
                collected.extend(page.items);
                page_number += 1;
            }

            prop_assert_eq!(collected, items);
        }
    }
}
