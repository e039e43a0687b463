use super::{BelongsTo, Field, FieldId, ModelId, Schema};

/// One step of an include path, derived from a relation field.
///
/// The foreign key always lives on the dependent model; the principal key is
/// the primary key it references. `foreign_key[i]` pairs with
/// `principal_key[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Navigation {
    /// The relation field
    pub field: FieldId,

    /// The model declaring the relation
    pub source: ModelId,

    /// The model the relation points to
    pub target: ModelId,

    /// Multi-valued navigation
    pub collection: bool,

    /// `true` when the navigation goes from the model holding the foreign key
    /// to the model it references.
    pub dependent_to_principal: bool,

    /// `true` when no foreign key field can be null.
    pub required: bool,

    pub foreign_key: Vec<FieldId>,

    pub principal_key: Vec<FieldId>,
}

impl Navigation {
    pub(super) fn belongs_to(schema: &Schema, field: &Field, belongs_to: &BelongsTo) -> Self {
        Self {
            field: field.id,
            source: field.id.model,
            target: belongs_to.target,
            collection: false,
            dependent_to_principal: true,
            required: belongs_to.is_required(schema),
            foreign_key: belongs_to.foreign_key.fields.iter().map(|f| f.source).collect(),
            principal_key: belongs_to.foreign_key.fields.iter().map(|f| f.target).collect(),
        }
    }

    pub(super) fn principal_to_dependent(
        schema: &Schema,
        field: &Field,
        target: ModelId,
        pair: &BelongsTo,
        collection: bool,
    ) -> Self {
        Self {
            field: field.id,
            source: field.id.model,
            target,
            collection,
            dependent_to_principal: false,
            required: pair.is_required(schema),
            foreign_key: pair.foreign_key.fields.iter().map(|f| f.source).collect(),
            principal_key: pair.foreign_key.fields.iter().map(|f| f.target).collect(),
        }
    }

    /// The foreign key field paired with principal key field `principal`.
    pub fn foreign_key_for(&self, principal: FieldId) -> Option<FieldId> {
        self.principal_key
            .iter()
            .position(|field| *field == principal)
            .map(|index| self.foreign_key[index])
    }

    /// The model holding the foreign key.
    pub fn dependent(&self) -> ModelId {
        if self.dependent_to_principal {
            self.source
        } else {
            self.target
        }
    }
}
