use serde::{Deserialize, Serialize};

/// Default page size for list views.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Paginated list query, sent as URL query parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListRequest {
    #[serde(rename = "pageNumber")]
    pub page_number: u32,
    #[serde(rename = "pageSize")]
    pub page_size: u32,
    pub search: String,
}

impl Default for ListRequest {
    fn default() -> Self {
        Self {
            page_number: 1,
            page_size: DEFAULT_PAGE_SIZE,
            search: String::new(),
        }
    }
}

impl ListRequest {
    pub fn new(page_size: u32) -> Self {
        Self {
            page_size: page_size.max(1),
            ..Self::default()
        }
    }

    /// Same query on another page. Pages are 1-based.
    pub fn page(&self, page_number: u32) -> Self {
        Self {
            page_number: page_number.max(1),
            ..self.clone()
        }
    }

    /// New search term, back to the first page.
    pub fn with_search(&self, search: impl Into<String>) -> Self {
        Self {
            page_number: 1,
            search: search.into(),
            ..self.clone()
        }
    }
}

/// One page of a paginated list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub data: Vec<T>,
    #[serde(rename = "pageNumber")]
    pub page_number: u32,
    #[serde(rename = "pageSize")]
    pub page_size: u32,
    #[serde(rename = "totalRecords")]
    pub total_records: u64,
}

impl<T> Default for ListResponse<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            page_number: 1,
            page_size: DEFAULT_PAGE_SIZE,
            total_records: 0,
        }
    }
}

impl<T> ListResponse<T> {
    pub fn total_pages(&self) -> u32 {
        if self.page_size == 0 {
            return 1;
        }
        let pages = self.total_records.div_ceil(self.page_size as u64);
        pages.max(1) as u32
    }

    pub fn has_next(&self) -> bool {
        self.page_number < self.total_pages()
    }

    pub fn has_prev(&self) -> bool {
        self.page_number > 1
    }

    /// Wrap an unpaginated list as a single page.
    pub fn single_page(data: Vec<T>) -> Self {
        let len = data.len();
        Self {
            data,
            page_number: 1,
            page_size: len.max(1) as u32,
            total_records: len as u64,
        }
    }
}

/// Envelope some endpoints wrap their payload in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub message: String,
    pub data: T,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_request_query_names() {
        let req = ListRequest {
            page_number: 2,
            page_size: 25,
            search: "ana".to_string(),
        };
        let json = serde_json::to_value(&req).expect("serialize");
        assert_eq!(json["pageNumber"], 2);
        assert_eq!(json["pageSize"], 25);
        assert_eq!(json["search"], "ana");
    }

    #[test]
    fn test_list_request_paging() {
        let req = ListRequest::new(20).page(3);
        assert_eq!(req.page_number, 3);
        assert_eq!(req.page_size, 20);

        let searched = req.with_search("joão");
        assert_eq!(searched.page_number, 1);
        assert_eq!(searched.search, "joão");

        assert_eq!(ListRequest::new(0).page_size, 1);
        assert_eq!(ListRequest::default().page(0).page_number, 1);
    }

    #[test]
    fn test_total_pages() {
        let mut page: ListResponse<u8> = ListResponse {
            data: vec![],
            page_number: 1,
            page_size: 10,
            total_records: 21,
        };
        assert_eq!(page.total_pages(), 3);
        assert!(page.has_next());
        assert!(!page.has_prev());

        page.page_number = 3;
        assert!(!page.has_next());
        assert!(page.has_prev());

        page.total_records = 0;
        assert_eq!(page.total_pages(), 1);
    }

    #[test]
    fn test_parse_list_response() {
        let json = r#"{"data":[1,2],"pageNumber":1,"pageSize":2,"totalRecords":5}"#;
        let page: ListResponse<u8> = serde_json::from_str(json).expect("parse");
        assert_eq!(page.data, vec![1, 2]);
        assert_eq!(page.total_pages(), 3);
    }

    #[test]
    fn test_single_page() {
        let page = ListResponse::single_page(vec!["a", "b", "c"]);
        assert_eq!(page.total_records, 3);
        assert_eq!(page.total_pages(), 1);
    }
}
