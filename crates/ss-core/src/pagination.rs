//! Offset based pagination used by the collection endpoints

use serde::Deserialize;

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 500;

/// `?offset=&pageSize=` query parameters
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PaginationParams {
    #[serde(default)]
    pub offset: i64,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            offset: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PaginationParams {
    pub fn new(offset: i64, page_size: i64) -> Self {
        Self {
            offset: offset.max(0),
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Clamps values a client may have sent out of range
    pub fn normalized(self) -> Self {
        Self::new(self.offset, self.page_size)
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }

    /// Slice an already loaded, ordered collection
    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        let params = self.normalized();
        items
            .into_iter()
            .skip(params.offset as usize)
            .take(params.page_size as usize)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_clamps() {
        let params = PaginationParams {
            offset: -4,
            page_size: 10_000,
        }
        .normalized();
        assert_eq!(params.offset, 0);
        assert_eq!(params.page_size, MAX_PAGE_SIZE);
    }

    #[test]
    fn test_apply_slices_collection() {
        let params = PaginationParams::new(2, 2);
        assert_eq!(params.apply(vec![1, 2, 3, 4, 5]), vec![3, 4]);
        assert!(PaginationParams::new(9, 2).apply(vec![1, 2]).is_empty());
    }

    #[test]
    fn test_deserialize_defaults() {
        let params: PaginationParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params, PaginationParams::default());
        let params: PaginationParams = serde_json::from_str(r#"{"pageSize": 5}"#).unwrap();
        assert_eq!(params.page_size, 5);
    }
}
