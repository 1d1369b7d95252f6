use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, Entity, PartId, StockLevels};

/// Arena handle of a part stored in an inventory.
///
/// Keys are allocated by the inventory, never reused, and are the identity used
/// by updates, deletions and product associations. Two parts with the same
/// `PartId` still have distinct keys.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartKey(u64);

impl PartKey {
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

impl core::fmt::Display for PartKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "part#{}", self.0)
    }
}

/// Parses the `part#N` form produced by `Display`.
impl core::str::FromStr for PartKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .strip_prefix("part#")
            .and_then(|raw| raw.parse::<u64>().ok())
            .map(Self)
            .ok_or_else(|| DomainError::invalid_id(format!("PartKey: `{}`", s.trim())))
    }
}

/// Where a part comes from, with the variant-specific identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum PartSource {
    InHouse { machine_id: u32 },
    Outsourced { company_name: String },
}

/// Variant tag without payload (what a form's radio toggle selects).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartKind {
    InHouse,
    Outsourced,
}

impl PartKind {
    /// Label of the variant-specific identifier field.
    pub fn identifier_label(self) -> &'static str {
        match self {
            PartKind::InHouse => "Machine Id",
            PartKind::Outsourced => "Company Name",
        }
    }
}

impl PartSource {
    pub fn kind(&self) -> PartKind {
        match self {
            PartSource::InHouse { .. } => PartKind::InHouse,
            PartSource::Outsourced { .. } => PartKind::Outsourced,
        }
    }

    /// Variant-specific identifier rendered as text.
    pub fn identifier(&self) -> String {
        match self {
            PartSource::InHouse { machine_id } => machine_id.to_string(),
            PartSource::Outsourced { company_name } => company_name.clone(),
        }
    }

    pub fn identifier_label(&self) -> &'static str {
        self.kind().identifier_label()
    }
}

/// A stocked part.
///
/// Plain data holder: setters do not validate, the form layer does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    id: PartId,
    name: String,
    price: f64,
    #[serde(flatten)]
    levels: StockLevels,
    #[serde(flatten)]
    source: PartSource,
}

impl Part {
    pub fn new(
        id: PartId,
        name: impl Into<String>,
        price: f64,
        levels: StockLevels,
        source: PartSource,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            levels,
            source,
        }
    }

    pub fn in_house(
        id: PartId,
        name: impl Into<String>,
        price: f64,
        levels: StockLevels,
        machine_id: u32,
    ) -> Self {
        Self::new(id, name, price, levels, PartSource::InHouse { machine_id })
    }

    pub fn outsourced(
        id: PartId,
        name: impl Into<String>,
        price: f64,
        levels: StockLevels,
        company_name: impl Into<String>,
    ) -> Self {
        Self::new(
            id,
            name,
            price,
            levels,
            PartSource::Outsourced {
                company_name: company_name.into(),
            },
        )
    }

    pub fn stock(&self) -> u32 {
        self.levels.stock
    }

    pub fn min(&self) -> u32 {
        self.levels.min
    }

    pub fn max(&self) -> u32 {
        self.levels.max
    }

    pub fn source(&self) -> &PartSource {
        &self.source
    }

    pub fn kind(&self) -> PartKind {
        self.source.kind()
    }

    /// Machine id for in-house parts.
    pub fn machine_id(&self) -> Option<u32> {
        match &self.source {
            PartSource::InHouse { machine_id } => Some(*machine_id),
            PartSource::Outsourced { .. } => None,
        }
    }

    /// Company name for outsourced parts.
    pub fn company_name(&self) -> Option<&str> {
        match &self.source {
            PartSource::InHouse { .. } => None,
            PartSource::Outsourced { company_name } => Some(company_name),
        }
    }

    pub fn set_id(&mut self, id: PartId) {
        self.id = id;
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_price(&mut self, price: f64) {
        self.price = price;
    }

    pub fn set_stock(&mut self, stock: u32) {
        self.levels.stock = stock;
    }

    pub fn set_min(&mut self, min: u32) {
        self.levels.min = min;
    }

    pub fn set_max(&mut self, max: u32) {
        self.levels.max = max;
    }

    /// Changes the machine id. Returns false (and does nothing) for outsourced parts.
    pub fn set_machine_id(&mut self, value: u32) -> bool {
        match &mut self.source {
            PartSource::InHouse { machine_id } => {
                *machine_id = value;
                true
            }
            PartSource::Outsourced { .. } => false,
        }
    }

    /// Changes the company name. Returns false (and does nothing) for in-house parts.
    pub fn set_company_name(&mut self, value: impl Into<String>) -> bool {
        match &mut self.source {
            PartSource::Outsourced { company_name } => {
                *company_name = value.into();
                true
            }
            PartSource::InHouse { .. } => false,
        }
    }
}

impl Entity for Part {
    type Id = PartId;

    fn id(&self) -> PartId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn price(&self) -> f64 {
        self.price
    }

    fn levels(&self) -> StockLevels {
        self.levels
    }
}
