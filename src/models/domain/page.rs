use crate::errors::{AppError, AppResult};

/// One-based page selection over an id-ordered result set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    page_number: u64,
    page_size: u64,
}

impl PageRequest {
    pub fn new(page_number: u64, page_size: u64) -> AppResult<Self> {
        if page_number == 0 {
            return Err(AppError::ValidationError(
                "page number must be at least 1".to_string(),
            ));
        }
        if page_size == 0 {
            return Err(AppError::ValidationError(
                "page size must be greater than 0".to_string(),
            ));
        }

        Ok(Self {
            page_number,
            page_size,
        })
    }

    pub fn first(page_size: u64) -> AppResult<Self> {
        Self::new(1, page_size)
    }

    pub fn page_number(&self) -> u64 {
        self.page_number
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    pub fn skip(&self) -> u64 {
        (self.page_number - 1).saturating_mul(self.page_size)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageResult<T> {
    pub items: Vec<T>,
    /// Size of the whole matching set, not of `items`.
    pub total_count: u64,
}

impl<T> PageResult<T> {
    pub fn new(items: Vec<T>, total_count: u64) -> Self {
        Self { items, total_count }
    }

    pub fn total_pages(&self, page_size: u64) -> u64 {
        if page_size == 0 {
            return 0;
        }
        self.total_count.div_ceil(page_size)
    }
}
