use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Product record as returned by `GET /products/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub category: String,
    pub price: f64,
    pub discount_percentage: f64,
    pub rating: f64,
    pub stock: i64,
    pub tags: Vec<String>,
    pub brand: String,
    pub sku: String,
    pub weight: f64,
    pub dimensions: Dimensions,
    pub warranty_information: String,
    pub shipping_information: String,
    pub availability_status: String,
    pub reviews: Vec<Review>,
    pub return_policy: String,
    pub minimum_order_quantity: u32,
    pub meta: ProductMeta,
    pub images: Vec<String>,
    pub thumbnail: String,
}

impl Product {
    /// JSON object form, as the remote service would send it.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub rating: u8,
    pub comment: String,
    /// RFC 3339 / ISO-8601 timestamp
    pub date: String,
    pub reviewer_name: String,
    pub reviewer_email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductMeta {
    pub created_at: String,
    pub updated_at: String,
    pub barcode: String,
    pub qr_code: String,
}

/// Category entry from `GET /products/categories`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub slug: String,
    pub name: String,
    pub url: String,
}

/// Pagination envelope wrapping any product list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPage<T = Value> {
    pub products: Vec<T>,
    pub total: u64,
    pub skip: u64,
    pub limit: u64,
}

/// Body for create / update / patch requests.
///
/// Every field is optional so the same type carries full create bodies,
/// partial patches and deliberately broken payloads (e.g. negative stock).
/// Unknown keys are kept in `extra` and flattened back out on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_percentage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProductPayload {
    pub fn is_empty(&self) -> bool {
        self.field_names().is_empty()
    }

    /// Wire names of the fields present in this payload (sorted).
    pub fn field_names(&self) -> Vec<String> {
        match self.to_value() {
            Value::Object(map) => map.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| Value::Object(Map::new()))
    }

    /// Keep only the named wire fields.
    pub fn retain_fields(&self, fields: &[&str]) -> ProductPayload {
        let Value::Object(map) = self.to_value() else {
            return ProductPayload::default();
        };
        let kept: Map<String, Value> = map
            .into_iter()
            .filter(|(key, _)| fields.contains(&key.as_str()))
            .collect();
        serde_json::from_value(Value::Object(kept)).unwrap_or_default()
    }
}

/// Receipt returned by `DELETE /products/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedProduct {
    pub id: u64,
    pub is_deleted: bool,
    pub deleted_on: String,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// `{limit, skip}` query pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaginationParams {
    pub limit: u64,
    pub skip: u64,
}

impl PaginationParams {
    pub const fn new(limit: u64, skip: u64) -> Self {
        Self { limit, skip }
    }
}

impl fmt::Display for PaginationParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "limit={}, skip={}", self.limit, self.skip)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        })
    }
}

/// `sortBy` / `order` query pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SortOption {
    pub sort_by: &'static str,
    pub order: SortOrder,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payload_omits_absent_fields_and_keeps_extras() {
        let mut payload = ProductPayload {
            title: Some("Lamp".to_string()),
            price: Some(12.5),
            ..Default::default()
        };
        payload
            .extra
            .insert("invalidField".to_string(), json!("should not exist"));

        let value = payload.to_value();
        assert_eq!(
            value,
            json!({"title": "Lamp", "price": 12.5, "invalidField": "should not exist"})
        );
        assert_eq!(payload.field_names().len(), 3);
        assert!(ProductPayload::default().is_empty());
    }

    #[test]
    fn retain_operates_on_wire_names() {
        let base = ProductPayload {
            title: Some("Desk".to_string()),
            stock: Some(4),
            discount_percentage: Some(10.0),
            ..Default::default()
        };

        let only_discount = base.retain_fields(&["discountPercentage"]);
        assert_eq!(only_discount.to_value(), json!({"discountPercentage": 10.0}));
    }

    #[test]
    fn envelope_deserializes_from_remote_shape() {
        let page: ProductPage = serde_json::from_value(json!({
            "products": [{"id": 11, "title": "x"}],
            "total": 194,
            "skip": 10,
            "limit": 1
        }))
        .expect("envelope");
        assert_eq!(page.products.len(), 1);
        assert_eq!(page.skip, 10);
    }
}
