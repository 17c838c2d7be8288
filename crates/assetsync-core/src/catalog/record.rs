//! Product records: loose input view and the normalized output shape.

use super::image_ref::{truthy, ImageRef};
use crate::url_model::sanitize_identity;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One normalized catalog entry as written back to disk.
///
/// Field order is the on-disk key order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogProduct {
    pub id: i64,
    pub name: String,
    pub slug: Value,
    pub description: String,
    pub short_description: String,
    pub price: f64,
    pub regular_price: Value,
    pub sale_price: Value,
    pub on_sale: Value,
    pub currency: String,
    pub categories: Vec<String>,
    pub category: String,
    pub image: String,
    pub images: Vec<String>,
    pub in_stock: Value,
    pub stock_amount: Value,
    pub material: Value,
    pub assembly_required: Value,
    pub color: Value,
    pub weight: Value,
    pub dimensions: Value,
    pub age: Value,
    pub sku: String,
    pub variants: Value,
    pub modified: Value,
}

/// Read-only view over a raw catalog object with the coercions the output needs.
#[derive(Debug, Clone, Copy)]
pub struct RawProduct<'a> {
    obj: &'a Map<String, Value>,
}

impl<'a> RawProduct<'a> {
    pub fn new(obj: &'a Map<String, Value>) -> Self {
        Self { obj }
    }

    /// Integer id from an int or numeric string; `None` when missing or unusable.
    pub fn id(&self) -> Option<i64> {
        match self.obj.get("id")? {
            Value::Number(n) => n.as_i64().or_else(|| {
                // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive.
                n.as_f64()
                    .filter(|f| f.is_finite() && f.fract() == 0.0)
                    .filter(|f| *f >= i64::MIN as f64 && *f < i64::MAX as f64)
                    .map(|f| f as i64)
            }),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Raw SKU as a string, or the id when the SKU is blank.
    pub fn sku_or_id(&self, id: i64) -> String {
        match self.obj.get("sku") {
            Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
            Some(v) if truthy(v) && !v.is_string() => v.to_string(),
            _ => id.to_string(),
        }
    }

    /// Path-safe folder and file key for this product's images.
    pub fn identity(&self, id: i64) -> String {
        sanitize_identity(self.sku_or_id(id).trim())
    }

    /// True when name or SKU equals `sentinel`, ignoring case and surrounding blanks.
    pub fn matches_sentinel(&self, sentinel: &str) -> bool {
        let sentinel = sentinel.trim().to_lowercase();
        if sentinel.is_empty() {
            return false;
        }
        ["name", "sku"]
            .iter()
            .any(|k| self.text_or(k, "").trim().to_lowercase() == sentinel)
    }

    pub fn main_image(&self) -> ImageRef {
        ImageRef::from_value(self.obj.get("image"))
    }

    /// Gallery entries in input order; empty and unusable entries removed.
    pub fn gallery(&self) -> Vec<ImageRef> {
        match self.obj.get("images") {
            Some(Value::Array(items)) => items
                .iter()
                .map(|v| ImageRef::from_value(Some(v)))
                .filter(|r| *r != ImageRef::Empty)
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Builds the output record around already-resolved image paths.
    pub fn into_catalog_product(
        self,
        id: i64,
        image: String,
        images: Vec<String>,
    ) -> CatalogProduct {
        let categories = self.category_names();
        let category = if categories.is_empty() {
            self.text_or("category", "")
        } else {
            categories.join(", ")
        };

        CatalogProduct {
            id,
            name: self.text_or("name", ""),
            slug: self.passthrough("slug"),
            description: self.text_or("description", ""),
            short_description: self.text_or("shortDescription", ""),
            price: self.price(),
            regular_price: self.passthrough("regularPrice"),
            sale_price: self.passthrough("salePrice"),
            on_sale: self.value_or("onSale", Value::Bool(false)),
            currency: self.text_or("currency", "AUD"),
            categories,
            category,
            image,
            images,
            in_stock: self.value_or("inStock", Value::Bool(true)),
            stock_amount: self.passthrough("stockAmount"),
            material: self.passthrough("material"),
            assembly_required: self.value_or("assemblyRequired", Value::from("Yes")),
            color: self.passthrough("color"),
            weight: self.passthrough("weight"),
            dimensions: self.passthrough("dimensions"),
            age: self.value_or("age", Value::from("")),
            sku: self.sku_or_id(id),
            variants: self.value_or("variants", Value::Array(Vec::new())),
            modified: self.passthrough("modified"),
        }
    }

    /// First non-null, non-blank of `price`, `regularPrice`, `salePrice` as a
    /// finite float, else 0. A present zero or unparseable value does not fall through.
    fn price(&self) -> f64 {
        let raw = ["price", "regularPrice", "salePrice"]
            .iter()
            .filter_map(|k| self.obj.get(*k))
            .find(|v| match v {
                Value::Null => false,
                Value::String(s) => !s.trim().is_empty(),
                _ => true,
            });
        let parsed = match raw {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
            Some(Value::Bool(true)) => Some(1.0),
            _ => None,
        };
        parsed.filter(|f| f.is_finite()).unwrap_or(0.0)
    }

    fn category_names(&self) -> Vec<String> {
        let Some(Value::Array(items)) = self.obj.get("categories") else {
            return Vec::new();
        };
        items
            .iter()
            .filter_map(|c| match c {
                Value::String(s) => Some(s.trim().to_string()),
                Value::Object(o) => o.get("name").filter(|n| truthy(n)).map(|n| match n {
                    Value::String(s) => s.trim().to_string(),
                    other => other.to_string(),
                }),
                _ => None,
            })
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Truthy value as text (non-strings stringified), else `default`.
    fn text_or(&self, key: &str, default: &str) -> String {
        match self.obj.get(key) {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            Some(v) if truthy(v) && !v.is_string() => v.to_string(),
            _ => default.to_string(),
        }
    }

    /// Value when the key is present (null included), else `default`.
    fn value_or(&self, key: &str, default: Value) -> Value {
        self.obj.get(key).cloned().unwrap_or(default)
    }

    fn passthrough(&self, key: &str) -> Value {
        self.value_or(key, Value::Null)
    }
}
