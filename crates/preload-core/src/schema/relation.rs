use super::{Field, FieldId, ModelId, Schema};

#[derive(Debug, Clone)]
pub struct BelongsTo {
    /// Model the relation points to
    pub target: ModelId,

    /// The `HasMany` or `HasOne` association that pairs with this
    pub pair: Option<FieldId>,

    /// The foreign key is a set of primitive fields that match the target's
    /// primary key.
    pub foreign_key: ForeignKey,
}

#[derive(Debug, Clone)]
pub struct HasMany {
    /// Associated model
    pub target: ModelId,

    /// The `BelongsTo` association that pairs with this
    pub pair: FieldId,
}

#[derive(Debug, Clone)]
pub struct HasOne {
    /// Associated model
    pub target: ModelId,

    /// The `BelongsTo` association that pairs with this
    pub pair: FieldId,
}

#[derive(Debug, Clone)]
pub struct ForeignKey {
    pub fields: Vec<ForeignKeyField>,
}

#[derive(Debug, Clone)]
pub struct ForeignKeyField {
    /// The field on the source model that is acting as the foreign key
    pub source: FieldId,

    /// The field on the target model that this FK field maps to.
    pub target: FieldId,
}

impl BelongsTo {
    /// The foreign key is required when none of its fields can be null.
    pub fn is_required(&self, schema: &Schema) -> bool {
        self.foreign_key
            .fields
            .iter()
            .all(|fk_field| !schema.field(fk_field.source).nullable)
    }
}

impl ForeignKeyField {
    pub fn source<'a>(&self, schema: &'a Schema) -> &'a Field {
        schema.field(self.source)
    }

    pub fn target<'a>(&self, schema: &'a Schema) -> &'a Field {
        schema.field(self.target)
    }
}
