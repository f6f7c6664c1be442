//! Pagination policies.

/// Per-entity limit defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagePolicy {
    pub default_limit: i32,
    /// Limits above this revert to the default. `None` means no ceiling.
    pub max_limit: Option<i32>,
}

pub const LUMO_PAGE_POLICY: PagePolicy = PagePolicy {
    default_limit: 50,
    max_limit: Some(100),
};

pub const LUME_PAGE_POLICY: PagePolicy = PagePolicy {
    default_limit: 50,
    max_limit: Some(100),
};

pub const LINK_PAGE_POLICY: PagePolicy = PagePolicy {
    default_limit: 10,
    max_limit: None,
};

/// Raw paging arguments as supplied by a caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: i32,
    pub offset: i32,
}

impl PageRequest {
    pub fn new(limit: i32, offset: i32) -> Self {
        Self { limit, offset }
    }
}

/// Normalized paging window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i32,
    pub offset: i32,
}

impl PagePolicy {
    pub fn normalize(&self, request: PageRequest) -> Page {
        let over_ceiling = self.max_limit.is_some_and(|max| request.limit > max);
        let limit = if request.limit <= 0 || over_ceiling {
            self.default_limit
        } else {
            request.limit
        };

        Page {
            limit,
            offset: request.offset.max(0),
        }
    }
}

/// One page of results together with the window that produced it.
#[derive(Debug, Clone)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub page: Page,
}

impl<T> Paged<T> {
    /// Offset of the following page, present only when this page is full.
    pub fn next_offset(&self) -> Option<i64> {
        if self.items.len() as i64 == self.page.limit as i64 {
            Some(self.page.offset as i64 + self.page.limit as i64)
        } else {
            None
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paged<U> {
        Paged {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(LUMO_PAGE_POLICY, 0, 50)]
    #[case(LUMO_PAGE_POLICY, -5, 50)]
    #[case(LUMO_PAGE_POLICY, 1, 1)]
    #[case(LUMO_PAGE_POLICY, 100, 100)]
    #[case(LUMO_PAGE_POLICY, 101, 50)]
    #[case(LUME_PAGE_POLICY, 0, 50)]
    #[case(LUME_PAGE_POLICY, 250, 50)]
    #[case(LUME_PAGE_POLICY, 20, 20)]
    #[case(LINK_PAGE_POLICY, 0, 10)]
    #[case(LINK_PAGE_POLICY, -1, 10)]
    #[case(LINK_PAGE_POLICY, 500, 500)]
    fn test_limit_normalization(#[case] policy: PagePolicy, #[case] limit: i32, #[case] expected: i32) {
        let page = policy.normalize(PageRequest::new(limit, 0));
        assert_eq!(page.limit, expected);
    }

    #[rstest]
    #[case(-10, 0)]
    #[case(0, 0)]
    #[case(30, 30)]
    fn test_offset_normalization(#[case] offset: i32, #[case] expected: i32) {
        let page = LUMO_PAGE_POLICY.normalize(PageRequest::new(10, offset));
        assert_eq!(page.offset, expected);
    }

    #[test]
    fn test_next_offset_only_when_page_full() {
        let page = Page { limit: 2, offset: 4 };

        let full = Paged { items: vec![1, 2], page };
        assert_eq!(full.next_offset(), Some(6));

        let short = Paged { items: vec![1], page };
        assert_eq!(short.next_offset(), None);

        let empty: Paged<i32> = Paged { items: vec![], page };
        assert_eq!(empty.next_offset(), None);
    }
}
