//! Part and product entry forms.
//!
//! Form fields hold raw text as typed by the operator. `validate` applies the
//! entry rules in a fixed order and reports only the first failure.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use stockroom_core::{Entity, PartId, ProductId, StockLevels};
use stockroom_parts::{Part, PartKind, PartSource};
use stockroom_products::Product;

/// Operator-facing validation failure. `Display` is the message shown.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FormError {
    #[error("Must include Part Name")]
    MissingName,
    #[error("Stock must be greater than 0")]
    InvalidStock,
    #[error("Must Enter a Cost")]
    InvalidPrice,
    #[error("Maximum must be greater than 0")]
    InvalidMax,
    #[error("Minimum must be greater than 0")]
    InvalidMin,
    #[error("Maximum must be greater than Minimum")]
    MaxBelowMin,
    #[error("Inventory Level Must Be Less Than Max.")]
    StockAboveMax,
    #[error("Inventory Level Must Be More Than Min.")]
    StockBelowMin,
    #[error("Must Enter a Company Name")]
    MissingCompanyName,
    #[error("Invalid Machine Id")]
    InvalidMachineId,
}

static UNSIGNED_RE: OnceLock<Option<Regex>> = OnceLock::new();
static DECIMAL_RE: OnceLock<Option<Regex>> = OnceLock::new();

fn is_unsigned(text: &str) -> bool {
    UNSIGNED_RE
        .get_or_init(|| Regex::new(r"^[0-9]+$").ok())
        .as_ref()
        .is_some_and(|re| re.is_match(text))
}

fn is_decimal(text: &str) -> bool {
    DECIMAL_RE
        .get_or_init(|| Regex::new(r"^[0-9]+(\.[0-9]+)?$").ok())
        .as_ref()
        .is_some_and(|re| re.is_match(text))
}

/// Digits-only field that also fits a `u32`; overflow counts as a bad entry.
fn unsigned_field(text: &str, err: FormError) -> Result<u32, FormError> {
    let text = text.trim();
    if !is_unsigned(text) {
        return Err(err);
    }
    text.parse::<u32>().map_err(|_| err)
}

fn price_field(text: &str) -> Result<f64, FormError> {
    let text = text.trim();
    if !is_decimal(text) {
        return Err(FormError::InvalidPrice);
    }
    match text.parse::<f64>() {
        Ok(price) if price.is_finite() => Ok(price),
        _ => Err(FormError::InvalidPrice),
    }
}

/// Fields shared by both forms, after validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedFields {
    pub name: String,
    pub price: f64,
    pub levels: StockLevels,
}

/// Text fields common to the part and product forms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockFields {
    pub name: String,
    pub stock: String,
    pub price: String,
    pub min: String,
    pub max: String,
}

impl StockFields {
    fn from_entity<E: Entity>(entity: &E) -> Self {
        let levels = entity.levels();
        Self {
            name: entity.name().to_string(),
            stock: levels.stock.to_string(),
            price: entity.price().to_string(),
            min: levels.min.to_string(),
            max: levels.max.to_string(),
        }
    }

    pub fn validate(&self) -> Result<ValidatedFields, FormError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(FormError::MissingName);
        }
        let stock = unsigned_field(&self.stock, FormError::InvalidStock)?;
        let price = price_field(&self.price)?;
        let max = unsigned_field(&self.max, FormError::InvalidMax)?;
        let min = unsigned_field(&self.min, FormError::InvalidMin)?;

        if max < min {
            return Err(FormError::MaxBelowMin);
        }
        if stock > max {
            return Err(FormError::StockAboveMax);
        }
        if stock < min {
            return Err(FormError::StockBelowMin);
        }

        Ok(ValidatedFields {
            name: name.to_string(),
            price,
            levels: StockLevels::new(stock, min, max),
        })
    }
}

/// Add/modify part form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartForm {
    #[serde(flatten)]
    pub fields: StockFields,
    pub kind: PartKind,
    /// Machine id or company name, depending on `kind`.
    pub identifier: String,
}

impl Default for PartForm {
    fn default() -> Self {
        Self {
            fields: StockFields::default(),
            kind: PartKind::InHouse,
            identifier: String::new(),
        }
    }
}

/// A part form that passed validation; only the id is missing.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidPart {
    pub fields: ValidatedFields,
    pub source: PartSource,
}

impl ValidPart {
    pub fn into_part(self, id: PartId) -> Part {
        Part::new(id, self.fields.name, self.fields.price, self.fields.levels, self.source)
    }
}

impl PartForm {
    /// Form pre-filled from an existing part (modify screen).
    pub fn from_part(part: &Part) -> Self {
        Self {
            fields: StockFields::from_entity(part),
            kind: part.kind(),
            identifier: part.source().identifier(),
        }
    }

    /// Label shown next to the identifier field.
    pub fn identifier_label(&self) -> &'static str {
        self.kind.identifier_label()
    }

    pub fn validate(&self) -> Result<ValidPart, FormError> {
        let fields = self.fields.validate()?;
        let identifier = self.identifier.trim();
        let source = match self.kind {
            PartKind::Outsourced => {
                if identifier.is_empty() {
                    return Err(FormError::MissingCompanyName);
                }
                PartSource::Outsourced {
                    company_name: identifier.to_string(),
                }
            }
            PartKind::InHouse => PartSource::InHouse {
                machine_id: unsigned_field(identifier, FormError::InvalidMachineId)?,
            },
        };
        Ok(ValidPart { fields, source })
    }
}

/// Add/modify product form. Associated parts live in the session's draft.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductForm {
    #[serde(flatten)]
    pub fields: StockFields,
}

impl ProductForm {
    pub fn from_product(product: &Product) -> Self {
        Self {
            fields: StockFields::from_entity(product),
        }
    }

    pub fn validate(&self) -> Result<ValidatedFields, FormError> {
        self.fields.validate()
    }
}

impl ValidatedFields {
    pub fn into_product(self, id: ProductId) -> Product {
        Product::new(id, self.name, self.price, self.levels)
    }
}
