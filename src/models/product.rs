// src/models/product.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::FromRow;

use crate::errors::AppError;

/// Canonical product row. The document store carries a denormalized copy of
/// the display fields under the same id, tagged with the same `version`.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
  pub id: String,
  pub product_name: String,
  pub brand: String,
  pub price: f64,
  pub market_price: f64,
  pub percentage_of_discount_offered: f64,
  pub stock: i32,
  pub category: String,
  pub description: String,
  pub seller: String,
  pub delivery_info: String,
  pub emi: bool,
  pub images: Vec<String>,
  pub manufacturing_date: DateTime<Utc>,
  pub expiry_date: DateTime<Utc>,
  pub listing_date: DateTime<Utc>,
  pub version: i64,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Product {
  /// Display fields mirrored into the document store, keyed the way the
  /// storefront reads them. Row bookkeeping (`createdAt`, `updatedAt`) and the
  /// document key itself are not part of the copy.
  pub fn document_fields(&self) -> Map<String, Value> {
    let mut fields = match serde_json::to_value(self) {
      Ok(Value::Object(map)) => map,
      _ => Map::new(),
    };
    fields.remove("id");
    fields.remove("createdAt");
    fields.remove("updatedAt");
    fields
  }
}

/// Untyped update payload as received on the wire. Numeric, date and flag
/// fields arrive as strings or as their native JSON type depending on the
/// client; `ProductUpdate::parse` is the single place they are coerced.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
  pub product_name: String,
  pub brand: String,
  pub price: Value,
  pub market_price: Value,
  pub percentage_of_discount_offered: Value,
  pub stock: Value,
  pub category: String,
  #[serde(default)]
  pub description: String,
  pub seller: String,
  #[serde(default)]
  pub delivery_info: String,
  pub emi: Value,
  #[serde(default)]
  pub images: Vec<String>,
  pub manufacturing_date: String,
  pub expiry_date: String,
  pub listing_date: String,
  /// Optional optimistic guard. When present the relational update only
  /// applies if the stored row still carries this version.
  #[serde(default)]
  pub version: Option<i64>,
}

/// Validated, strongly-typed product update. Both store writers consume this
/// command, so the relational row and the document copy always receive the
/// same values.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductUpdate {
  pub product_name: String,
  pub brand: String,
  pub price: f64,
  pub market_price: f64,
  pub percentage_of_discount_offered: f64,
  pub stock: i32,
  pub category: String,
  pub description: String,
  pub seller: String,
  pub delivery_info: String,
  pub emi: bool,
  pub images: Vec<String>,
  pub manufacturing_date: DateTime<Utc>,
  pub expiry_date: DateTime<Utc>,
  pub listing_date: DateTime<Utc>,
  pub expected_version: Option<i64>,
}

impl ProductUpdate {
  /// Coerces and validates an untyped payload. Fails with
  /// `AppError::Validation` before either store is touched.
  pub fn parse(req: UpdateProductRequest) -> Result<Self, AppError> {
    let price = coerce_f64("price", &req.price)?;
    let market_price = coerce_f64("marketPrice", &req.market_price)?;
    let percentage_of_discount_offered =
      coerce_f64("percentageOfDiscountOffered", &req.percentage_of_discount_offered)?;
    let stock = coerce_i32("stock", &req.stock)?;
    if stock < 0 {
      return Err(AppError::Validation("stock must not be negative".to_string()));
    }
    let emi = coerce_bool("emi", &req.emi)?;
    let manufacturing_date = coerce_date("manufacturingDate", &req.manufacturing_date)?;
    let expiry_date = coerce_date("expiryDate", &req.expiry_date)?;
    let listing_date = coerce_date("listingDate", &req.listing_date)?;

    if req.product_name.trim().is_empty() {
      return Err(AppError::Validation("productName must not be empty".to_string()));
    }

    Ok(Self {
      product_name: req.product_name,
      brand: req.brand,
      price,
      market_price,
      percentage_of_discount_offered,
      stock,
      category: req.category,
      description: req.description,
      seller: req.seller,
      delivery_info: req.delivery_info,
      emi,
      images: req.images,
      manufacturing_date,
      expiry_date,
      listing_date,
      expected_version: req.version,
    })
  }

  /// Field set mirrored into the document store after a successful relational
  /// write, including the version the row now carries.
  pub fn document_fields(&self, version: i64) -> Map<String, Value> {
    let mut fields = Map::new();
    fields.insert("productName".into(), Value::from(self.product_name.clone()));
    fields.insert("brand".into(), Value::from(self.brand.clone()));
    fields.insert("price".into(), Value::from(self.price));
    fields.insert("marketPrice".into(), Value::from(self.market_price));
    fields.insert(
      "percentageOfDiscountOffered".into(),
      Value::from(self.percentage_of_discount_offered),
    );
    fields.insert("stock".into(), Value::from(self.stock));
    fields.insert("category".into(), Value::from(self.category.clone()));
    fields.insert("description".into(), Value::from(self.description.clone()));
    fields.insert("seller".into(), Value::from(self.seller.clone()));
    fields.insert("deliveryInfo".into(), Value::from(self.delivery_info.clone()));
    fields.insert("emi".into(), Value::from(self.emi));
    fields.insert("images".into(), Value::from(self.images.clone()));
    fields.insert(
      "manufacturingDate".into(),
      Value::from(self.manufacturing_date.to_rfc3339()),
    );
    fields.insert("expiryDate".into(), Value::from(self.expiry_date.to_rfc3339()));
    fields.insert("listingDate".into(), Value::from(self.listing_date.to_rfc3339()));
    fields.insert("version".into(), Value::from(version));
    fields
  }
}

fn coerce_f64(field: &str, value: &Value) -> Result<f64, AppError> {
  match value {
    Value::Number(n) => n
      .as_f64()
      .ok_or_else(|| AppError::Validation(format!("{} is not a representable number", field))),
    Value::String(s) => s
      .trim()
      .parse::<f64>()
      .map_err(|_| AppError::Validation(format!("{} is not a valid number: '{}'", field, s))),
    other => Err(AppError::Validation(format!(
      "{} must be a number or numeric string, got {}",
      field,
      json_type_name(other)
    ))),
  }
}

fn coerce_i32(field: &str, value: &Value) -> Result<i32, AppError> {
  match value {
    Value::Number(n) => n
      .as_i64()
      .and_then(|v| i32::try_from(v).ok())
      .ok_or_else(|| AppError::Validation(format!("{} is not a valid integer", field))),
    Value::String(s) => s
      .trim()
      .parse::<i32>()
      .map_err(|_| AppError::Validation(format!("{} is not a valid integer: '{}'", field, s))),
    other => Err(AppError::Validation(format!(
      "{} must be an integer or numeric string, got {}",
      field,
      json_type_name(other)
    ))),
  }
}

fn coerce_bool(field: &str, value: &Value) -> Result<bool, AppError> {
  match value {
    Value::Bool(b) => Ok(*b),
    Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
      "true" => Ok(true),
      "false" => Ok(false),
      _ => Err(AppError::Validation(format!(
        "{} is not a valid boolean: '{}'",
        field, s
      ))),
    },
    other => Err(AppError::Validation(format!(
      "{} must be a boolean, got {}",
      field,
      json_type_name(other)
    ))),
  }
}

// Accepts RFC 3339 timestamps and plain dates; a plain date is taken as
// midnight UTC.
fn coerce_date(field: &str, raw: &str) -> Result<DateTime<Utc>, AppError> {
  let raw = raw.trim();
  if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
    return Ok(ts.with_timezone(&Utc));
  }
  if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
    if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
      return Ok(midnight.and_utc());
    }
  }
  Err(AppError::Validation(format!(
    "{} is not a valid date: '{}'",
    field, raw
  )))
}

fn json_type_name(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "boolean",
    Value::Number(_) => "number",
    Value::String(_) => "string",
    Value::Array(_) => "array",
    Value::Object(_) => "object",
  }
}
