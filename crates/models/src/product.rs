use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::ModelError;

/// Store-assigned product identifier.
///
/// Wraps the store's native object id so the service layer never handles the
/// raw format. Crosses the HTTP boundary as a 24-character hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProductId(ObjectId);

impl ProductId {
    /// Fresh id, as the store would assign on insert.
    pub fn generate() -> Self {
        Self(ObjectId::new())
    }

    pub fn parse(hex: &str) -> Result<Self, ModelError> {
        ObjectId::parse_str(hex)
            .map(Self)
            .map_err(|_| ModelError::InvalidId(hex.to_string()))
    }

    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }

    pub fn as_object_id(&self) -> ObjectId {
        self.0
    }
}

impl From<ObjectId> for ProductId {
    fn from(oid: ObjectId) -> Self {
        Self(oid)
    }
}

impl FromStr for ProductId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_hex())
    }
}

impl Serialize for ProductId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ProductId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        ProductId::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// The product record as it crosses the API.
///
/// Missing fields decode to their zero value; `id` is never required on input.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Product {
    #[serde(rename = "_id", alias = "id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ProductId>,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock: i64,
}

impl Product {
    pub fn new(name: impl Into<String>, description: impl Into<String>, price: f64, stock: i64) -> Self {
        Self { id: None, name: name.into(), description: description.into(), price, stock }
    }

    pub fn with_id(mut self, id: ProductId) -> Self {
        self.id = Some(id);
        self
    }

    /// Apply a partial field set in place.
    pub fn apply(&mut self, fields: &UpdateFields) {
        for (field, value) in fields.iter() {
            match field {
                ProductField::Name => self.name = value.clone(),
                ProductField::Description => self.description = value.clone(),
            }
        }
    }
}

/// Fields an update may touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProductField {
    Name,
    Description,
}

impl ProductField {
    /// Document key in the store.
    pub fn as_str(self) -> &'static str {
        match self {
            ProductField::Name => "name",
            ProductField::Description => "description",
        }
    }
}

/// Partial field set: only the fields present are changed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UpdateFields(BTreeMap<ProductField, String>);

impl UpdateFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: ProductField, value: impl Into<String>) -> &mut Self {
        self.0.insert(field, value.into());
        self
    }

    pub fn with(mut self, field: ProductField, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn get(&self, field: ProductField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: ProductField) -> bool {
        self.0.contains_key(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ProductField, &String)> {
        self.0.iter().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
