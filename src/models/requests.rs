//! Request DTOs for the inventory API
//!
//! Bodies are parsed as raw JSON and checked field by field so every
//! rejection carries a field-specific message. Validation never touches
//! the store or the cache.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{InventoryError, Result};
use crate::models::Product;

/// Name-like fields: a leading letter, then letters, digits and spaces.
///
/// The leading letter is what the SKU prefix is derived from.
static NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9 ]*$").expect("name pattern compiles"));

/// Fields a full product body must carry, in validation order.
pub const REQUIRED_FIELDS: [&str; 6] = [
    "Product",
    "Description",
    "Quantity",
    "Brand",
    "Department",
    "Price",
];

/// Longest accepted product name, in characters
pub const MAX_NAME_LEN: usize = 80;
/// Longest accepted brand, in characters
pub const MAX_BRAND_LEN: usize = 80;
/// Longest accepted department, in characters
pub const MAX_DEPARTMENT_LEN: usize = 90;
/// Longest accepted description, in characters
pub const MAX_DESCRIPTION_LEN: usize = 1500;

/// Default page size for quantity listings
pub const DEFAULT_PER_PAGE: i64 = 10;

fn invalid(msg: impl Into<String>) -> InventoryError {
    InventoryError::Validation(msg.into())
}

/// Decodes a request body into a non-empty JSON object.
pub fn parse_body(bytes: &[u8]) -> Result<Map<String, Value>> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(invalid("Request body cannot be empty"));
    }
    let value: Value =
        serde_json::from_slice(bytes).map_err(|_| invalid("Request body must be valid JSON"))?;
    match value {
        Value::Object(map) if map.is_empty() => Err(invalid("Request body cannot be empty")),
        Value::Object(map) => Ok(map),
        _ => Err(invalid("Request body must be a JSON object")),
    }
}

// == Field Checks ==

fn check_len(s: &str, label: &str, max: usize) -> Result<()> {
    if s.chars().count() > max {
        return Err(invalid(format!("{} must be at most {} characters", label, max)));
    }
    Ok(())
}

fn name_field(value: &Value, label: &str, max: usize) -> Result<String> {
    match value.as_str() {
        Some(s) if NAME_PATTERN.is_match(s) => {
            check_len(s, label, max)?;
            Ok(s.to_string())
        }
        _ => Err(invalid(format!(
            "{} must start with a letter and can only contain letters, numbers, and spaces",
            label
        ))),
    }
}

fn description_field(value: &Value) -> Result<String> {
    let s = value
        .as_str()
        .ok_or_else(|| invalid("Description must be a string"))?;
    check_len(s, "Description", MAX_DESCRIPTION_LEN)?;
    Ok(s.to_string())
}

fn quantity_field(value: &Value) -> Result<i64> {
    // as_i64 is None for floats, booleans and out-of-range integers
    match value.as_i64() {
        Some(q) if q >= 0 => Ok(q),
        _ => Err(invalid("Quantity must be a non-negative integer")),
    }
}

fn price_field(value: &Value) -> Result<f64> {
    match value.as_f64() {
        Some(p) if p >= 0.0 && p.is_finite() => Ok(p),
        _ => Err(invalid("Price must be a non-negative number")),
    }
}

// == Full Product Body ==
/// Validated body for create (POST) and full replace (PUT).
#[derive(Debug, Clone, PartialEq)]
pub struct ProductFields {
    pub name: String,
    pub description: String,
    pub brand: String,
    pub department: String,
    pub quantity: i64,
    pub price: f64,
}

impl ProductFields {
    /// Validates a full product body.
    ///
    /// All six fields are required; the first missing or invalid one
    /// determines the error message.
    pub fn from_json(body: &Map<String, Value>) -> Result<Self> {
        if let Some(missing) = REQUIRED_FIELDS.iter().find(|f| !body.contains_key(**f)) {
            return Err(invalid(format!("Missing field: {}", missing)));
        }

        let name = name_field(&body["Product"], "Product name", MAX_NAME_LEN)?;
        let description = description_field(&body["Description"])?;
        let quantity = quantity_field(&body["Quantity"])?;
        let brand = name_field(&body["Brand"], "Brand", MAX_BRAND_LEN)?;
        let department = name_field(&body["Department"], "Department", MAX_DEPARTMENT_LEN)?;
        let price = price_field(&body["Price"])?;

        Ok(Self {
            name,
            description,
            brand,
            department,
            quantity,
            price,
        })
    }

    /// Builds the stored record under the given SKU.
    pub fn into_product(self, sku: String) -> Product {
        Product {
            sku,
            name: self.name,
            description: self.description,
            brand: self.brand,
            department: self.department,
            quantity: self.quantity,
            price: self.price,
        }
    }
}

// == Partial Product Body ==
/// Validated body for PATCH; absent fields stay untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub brand: Option<String>,
    pub department: Option<String>,
    pub quantity: Option<i64>,
    pub price: Option<f64>,
}

impl ProductPatch {
    /// Validates every known field present in the body. Unknown keys are ignored.
    pub fn from_json(body: &Map<String, Value>) -> Result<Self> {
        Ok(Self {
            name: body
                .get("Product")
                .map(|v| name_field(v, "Product name", MAX_NAME_LEN))
                .transpose()?,
            description: body.get("Description").map(description_field).transpose()?,
            quantity: body.get("Quantity").map(quantity_field).transpose()?,
            price: body.get("Price").map(price_field).transpose()?,
            brand: body
                .get("Brand")
                .map(|v| name_field(v, "Brand", MAX_BRAND_LEN))
                .transpose()?,
            department: body
                .get("Department")
                .map(|v| name_field(v, "Department", MAX_DEPARTMENT_LEN))
                .transpose()?,
        })
    }

    /// Writes the present fields onto `product`. The SKU is never changed.
    pub fn apply(self, product: &mut Product) {
        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(description) = self.description {
            product.description = description;
        }
        if let Some(brand) = self.brand {
            product.brand = brand;
        }
        if let Some(department) = self.department {
            product.department = department;
        }
        if let Some(quantity) = self.quantity {
            product.quantity = quantity;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
    }
}

// == Quantity Listing Query ==
/// Raw query string of `GET /products/getbyquantity`.
///
/// Values are kept as strings so a non-integer can be reported as a 400
/// with a readable message instead of an extractor rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuantityQuery {
    pub quantity: Option<String>,
    pub page: Option<String>,
    pub per_page: Option<String>,
}

/// Validated quantity filter plus offset pagination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Minimum quantity (inclusive)
    pub quantity: i64,
    /// One-based page number
    pub page: i64,
    pub per_page: i64,
}

impl PageRequest {
    /// Rows to skip before this page.
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.per_page
    }
}

fn int_param(raw: &Option<String>, name: &str, default: i64) -> Result<i64> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(default),
        Some(s) => s
            .parse()
            .map_err(|_| invalid(format!("{} must be an integer", name))),
    }
}

impl QuantityQuery {
    /// Applies defaults (quantity 0, page 1, per_page 10) and range checks.
    pub fn validate(&self) -> Result<PageRequest> {
        let quantity = int_param(&self.quantity, "quantity", 0)?;
        let page = int_param(&self.page, "page", 1)?;
        let per_page = int_param(&self.per_page, "per_page", DEFAULT_PER_PAGE)?;

        if quantity < 0 {
            return Err(invalid("The provided quantity must be a non-negative integer"));
        }
        if page <= 0 || per_page <= 0 {
            return Err(invalid("Page and per_page must be greater than zero"));
        }
        if (page - 1).checked_mul(per_page).is_none() {
            return Err(invalid("Page is out of range"));
        }

        Ok(PageRequest {
            quantity,
            page,
            per_page,
        })
    }
}
