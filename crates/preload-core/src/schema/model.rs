use super::{Field, FieldId};
use crate::stmt;

use std::fmt;

#[derive(Debug, Clone)]
pub struct Model {
    /// Uniquely identifies the model within the schema
    pub id: ModelId,

    /// Name of the model
    pub name: String,

    /// Table the model is stored in
    pub table_name: String,

    /// Database schema of the table, if not the default one
    pub schema: Option<String>,

    /// Fields contained by the model, in declaration order
    pub fields: Vec<Field>,

    /// Primary key fields, in key order
    pub primary_key: Vec<FieldId>,

    /// Set when the model shares its table with other models and its rows are
    /// told apart by a column value.
    pub discriminator: Option<Discriminator>,
}

/// Identifies the rows of a table that belong to a model.
#[derive(Debug, Clone)]
pub struct Discriminator {
    pub field: FieldId,
    pub value: stmt::Value,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ModelId(pub usize);

impl Model {
    pub fn field(&self, index: usize) -> &Field {
        &self.fields[index]
    }

    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name.app_name == name)
    }

    /// Primitive fields, in declaration order.
    pub fn primitives(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|field| field.ty.is_primitive())
    }

    pub fn primary_key_fields(&self) -> impl ExactSizeIterator<Item = &Field> + '_ {
        self.primary_key.iter().map(|id| &self.fields[id.index])
    }
}

impl ModelId {
    /// Create a `FieldId` representing the current model's field at index
    /// `index`.
    pub const fn field(self, index: usize) -> FieldId {
        FieldId { model: self, index }
    }
}

impl From<&Self> for ModelId {
    fn from(src: &Self) -> Self {
        *src
    }
}

impl From<&Model> for ModelId {
    fn from(value: &Model) -> Self {
        value.id
    }
}

impl fmt::Debug for ModelId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "ModelId({})", self.0)
    }
}
