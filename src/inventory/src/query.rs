//! Filter → sort → paginate composition over fetched collections

use crate::error::{InventoryError, Result};
use serde::Serialize;
use std::cmp::Ordering;

/// A pure predicate over table rows
pub trait Predicate<T> {
    fn matches(&self, item: &T) -> bool;
}

impl<T, F> Predicate<T> for F
where
    F: Fn(&T) -> bool,
{
    fn matches(&self, item: &T) -> bool {
        self(item)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// One page of query results
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number
    pub page: usize,
    pub page_size: usize,
    /// Rows matching the filters, across all pages
    pub total: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}

type Comparator<'a, T> = Box<dyn Fn(&T, &T) -> Ordering + 'a>;

/// Composes filters (logical AND), an optional stable sort, and optional
/// pagination over a borrowed collection.
pub struct TableQuery<'a, T> {
    filters: Vec<Box<dyn Predicate<T> + 'a>>,
    sort: Option<Comparator<'a, T>>,
    page: Option<(usize, usize)>,
}

impl<'a, T> TableQuery<'a, T> {
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
            sort: None,
            page: None,
        }
    }

    /// Adds a predicate; rows must satisfy every predicate
    pub fn filter<P>(mut self, predicate: P) -> Self
    where
        P: Predicate<T> + 'a,
    {
        self.filters.push(Box::new(predicate));
        self
    }

    /// Sorts by `key`; ties keep their input order
    pub fn sort_by<K, F>(mut self, key: F, order: SortOrder) -> Self
    where
        K: Ord,
        F: Fn(&T) -> K + 'a,
    {
        self.sort = Some(Box::new(move |a, b| {
            let ordering = key(a).cmp(&key(b));
            match order {
                SortOrder::Ascending => ordering,
                SortOrder::Descending => ordering.reverse(),
            }
        }));
        self
    }

    /// Returns page `page` (1-based) of `page_size` rows
    pub fn paginate(mut self, page: usize, page_size: usize) -> Self {
        self.page = Some((page, page_size));
        self
    }

    /// Rows matching every filter, without sorting or paging
    pub fn count(&self, items: &[T]) -> usize {
        items.iter().filter(|item| self.accepts(item)).count()
    }

    fn accepts(&self, item: &T) -> bool {
        self.filters.iter().all(|predicate| predicate.matches(item))
    }

    pub fn run<'b>(&self, items: &'b [T]) -> Result<Page<&'b T>> {
        let mut rows: Vec<&'b T> = items.iter().filter(|item| self.accepts(item)).collect();

        if let Some(compare) = &self.sort {
            rows.sort_by(|a, b| compare(a, b));
        }

        let total = rows.len();
        let Some((page, page_size)) = self.page else {
            return Ok(Page {
                items: rows,
                page: 1,
                page_size: total,
                total,
                total_pages: usize::from(total > 0),
            });
        };

        if page_size == 0 {
            return Err(InventoryError::InvalidPageSize(page_size));
        }
        if page == 0 {
            return Err(InventoryError::InvalidPage(page));
        }

        let total_pages = total.div_ceil(page_size);
        let items = rows
            .into_iter()
            .skip((page - 1).saturating_mul(page_size))
            .take(page_size)
            .collect();

        Ok(Page {
            items,
            page,
            page_size,
            total,
            total_pages,
        })
    }
}

impl<'a, T> Default for TableQuery<'a, T> {
    fn default() -> Self {
        Self::new()
    }
}
