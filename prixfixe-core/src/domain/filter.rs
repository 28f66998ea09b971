//! Pagination and time-range filtering for list queries

use serde::{Deserialize, Serialize};

pub const DEFAULT_LIMIT: u8 = 20;
pub const MAX_LIMIT: u8 = 250;
/// Largest offset PostgreSQL accepts for `OFFSET`.
pub const MAX_OFFSET: u64 = i64::MAX as u64;

/// Selectors applied uniformly to every list query.
///
/// Range bounds are exclusive and compare against epoch seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryFilter {
    pub page: u64,
    pub limit: u8,
    pub created_after: Option<u64>,
    pub created_before: Option<u64>,
    pub updated_after: Option<u64>,
    pub updated_before: Option<u64>,
}

impl QueryFilter {
    /// Requested page, counting from one.
    pub fn page(&self) -> u64 {
        self.page.max(1)
    }

    pub fn limit(&self) -> u8 {
        match self.limit {
            0 => DEFAULT_LIMIT,
            n => n.min(MAX_LIMIT),
        }
    }

    /// Rows skipped before this page; saturates at [`MAX_OFFSET`].
    pub fn offset(&self) -> u64 {
        (self.page() - 1)
            .saturating_mul(u64::from(self.limit()))
            .min(MAX_OFFSET)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u64,
    pub limit: u8,
    pub total_count: u64,
}

/// One page of records plus the number of records matching the filter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListPage<T> {
    pub pagination: Pagination,
    pub items: Vec<T>,
}

impl<T> ListPage<T> {
    pub fn new(filter: &QueryFilter, items: Vec<T>, total_count: u64) -> Self {
        Self {
            pagination: Pagination {
                page: filter.page(),
                limit: filter.limit(),
                total_count,
            },
            items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 0, 1, 20, 0)]
    #[case(1, 20, 1, 20, 0)]
    #[case(2, 5, 2, 5, 5)]
    #[case(10, 20, 10, 20, 180)]
    #[case(3, 255, 3, 250, 500)]
    #[case(u64::MAX, 20, u64::MAX, 20, MAX_OFFSET)]
    #[case(u64::MAX / 10, 250, u64::MAX / 10, 250, MAX_OFFSET)]
    fn test_filter_paging(
        #[case] page: u64,
        #[case] limit: u8,
        #[case] expected_page: u64,
        #[case] expected_limit: u8,
        #[case] expected_offset: u64,
    ) {
        let filter = QueryFilter {
            page,
            limit,
            ..Default::default()
        };
        assert_eq!(filter.page(), expected_page);
        assert_eq!(filter.limit(), expected_limit);
        assert_eq!(filter.offset(), expected_offset);
    }

    #[test]
    fn test_list_page_pagination() {
        let filter = QueryFilter {
            page: 2,
            limit: 5,
            ..Default::default()
        };
        let page = ListPage::new(&filter, vec![1, 2, 3], 8);
        assert_eq!(
            page.pagination,
            Pagination {
                page: 2,
                limit: 5,
                total_count: 8
            }
        );
        assert_eq!(page.items.len(), 3);
    }
}
