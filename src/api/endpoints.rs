//! Paths and query shapes of the product service.

use crate::model::{PaginationParams, SortOption};
use crate::transport::ApiRequest;
use std::fmt::Display;

pub const PRODUCTS: &str = "/products";
pub const CATEGORIES: &str = "/products/categories";
pub const SINGLE_CATEGORY: &str = "/products/category";
pub const CATEGORY_LIST: &str = "/products/category-list";
pub const SEARCH: &str = "/products/search";
pub const ADD_PRODUCT: &str = "/products/add";

/// `/products/{id}`; ids are rendered verbatim so negative and zero ids can
/// be sent on purpose.
pub fn product_path(id: impl Display) -> String {
    format!("{PRODUCTS}/{id}")
}

/// `/products/category/{slug}`; an empty slug yields the bare trailing-slash path.
pub fn category_path(slug: &str) -> String {
    format!("{SINGLE_CATEGORY}/{slug}")
}

/// Query for `GET /products`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    pub limit: Option<u64>,
    pub skip: Option<u64>,
    pub select: Option<Vec<String>>,
    pub sort: Option<SortOption>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn skip(mut self, skip: u64) -> Self {
        self.skip = Some(skip);
        self
    }

    pub fn select<S: AsRef<str>>(mut self, fields: &[S]) -> Self {
        self.select = Some(fields.iter().map(|f| f.as_ref().trim().to_string()).collect());
        self
    }

    pub fn sort(mut self, sort: SortOption) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Requested window for page checks. A missing limit is reported as 0,
    /// which disables the item-count check.
    pub fn pagination(&self) -> Option<PaginationParams> {
        match (self.limit, self.skip) {
            (Some(limit), skip) => Some(PaginationParams::new(limit, skip.unwrap_or(0))),
            (None, Some(skip)) => Some(PaginationParams::new(0, skip)),
            (None, None) => None,
        }
    }

    pub fn apply(&self, mut request: ApiRequest) -> ApiRequest {
        if let Some(limit) = self.limit {
            request = request.query("limit", limit);
        }
        if let Some(skip) = self.skip {
            request = request.query("skip", skip);
        }
        if let Some(select) = &self.select {
            request = request.query("select", select.join(","));
        }
        if let Some(sort) = &self.sort {
            request = request.query("sortBy", sort.sort_by).query("order", sort.order);
        }
        request
    }
}

impl From<PaginationParams> for ListQuery {
    fn from(params: PaginationParams) -> Self {
        ListQuery::new().limit(params.limit).skip(params.skip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SortOrder;

    #[test]
    fn paths_render_raw_ids() {
        assert_eq!(product_path(-1), "/products/-1");
        assert_eq!(product_path(0), "/products/0");
        assert_eq!(category_path(""), "/products/category/");
        assert_eq!(category_path("laptops"), "/products/category/laptops");
    }

    #[test]
    fn list_query_renders_parameters_in_order() {
        let query = ListQuery::from(PaginationParams::new(5, 10))
            .select(&["title", " price"])
            .sort(SortOption { sort_by: "price", order: SortOrder::Desc });
        let request = query.apply(ApiRequest::get(PRODUCTS));
        let pairs: Vec<(&str, &str)> = request
            .query
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("limit", "5"),
                ("skip", "10"),
                ("select", "title,price"),
                ("sortBy", "price"),
                ("order", "desc"),
            ]
        );
        assert_eq!(query.pagination(), Some(PaginationParams::new(5, 10)));
        assert_eq!(ListQuery::new().pagination(), None);
    }
}
