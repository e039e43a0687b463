mod builder;
pub use builder::{Builder, ModelBuilder};

mod field;
pub use field::{Field, FieldId, FieldName, FieldPrimitive, FieldTy};

mod model;
pub use model::{Discriminator, Model, ModelId};

mod navigation;
pub use navigation::Navigation;

mod relation;
pub use relation::{BelongsTo, ForeignKey, ForeignKeyField, HasMany, HasOne};

mod verify;

use crate::{stmt, Error, Result};
use indexmap::IndexMap;

/// Entity metadata: models, their fields, relations and table mapping.
#[derive(Debug, Clone)]
pub struct Schema {
    pub models: IndexMap<ModelId, Model>,
}

impl Schema {
    pub fn builder() -> Builder {
        Builder::new()
    }

    /// Get a model by ID
    #[track_caller]
    pub fn model(&self, id: impl Into<ModelId>) -> &Model {
        let id = id.into();
        self.models
            .get(&id)
            .unwrap_or_else(|| panic!("no model with id {id:?}"))
    }

    pub fn get_model(&self, id: impl Into<ModelId>) -> Option<&Model> {
        self.models.get(&id.into())
    }

    pub fn model_by_name(&self, name: &str) -> Option<&Model> {
        self.models.values().find(|model| model.name == name)
    }

    pub fn models(&self) -> impl ExactSizeIterator<Item = &Model> {
        self.models.values()
    }

    /// Get a field by ID
    #[track_caller]
    pub fn field(&self, id: FieldId) -> &Field {
        self.model(id.model)
            .fields
            .get(id.index)
            .unwrap_or_else(|| panic!("invalid field ID: {id:?}"))
    }

    pub fn get_field(&self, id: FieldId) -> Option<&Field> {
        self.get_model(id.model)?.fields.get(id.index)
    }

    /// `Model.field`, for messages.
    pub fn qualified_name(&self, id: FieldId) -> String {
        match self.get_field(id) {
            Some(field) => format!("{}.{}", self.model(id.model).name, field.name.app_name),
            None => format!("{id:?}"),
        }
    }

    /// The column a field is stored in: its storage name, falling back to its
    /// declared name.
    pub fn column_name_for(&self, id: FieldId) -> &str {
        self.field(id).name.storage_name()
    }

    /// The column type of a primitive field, nullable when the field is.
    pub fn column_type_for(&self, id: FieldId) -> Result<stmt::Type> {
        let field = self.field(id);

        let Some(primitive) = field.ty.as_primitive() else {
            return Err(Error::unresolvable_column(
                self.qualified_name(id),
                "non-primitive field",
            ));
        };

        Ok(if field.nullable {
            primitive.ty.clone().nullable()
        } else {
            primitive.ty.clone()
        })
    }

    pub fn table_name_for(&self, model: impl Into<ModelId>) -> &str {
        &self.model(model).table_name
    }

    /// The database schema the model's table lives in, if not the default
    /// one.
    pub fn schema_for(&self, model: impl Into<ModelId>) -> Option<&str> {
        self.model(model).schema.as_deref()
    }

    /// Resolves a relation field into the navigation step it describes.
    pub fn navigation(&self, id: FieldId) -> Result<Navigation> {
        let Some(field) = self.get_field(id) else {
            return Err(Error::invalid_include(format!("unknown field {id:?}")));
        };

        match &field.ty {
            FieldTy::BelongsTo(belongs_to) => Ok(Navigation::belongs_to(self, field, belongs_to)),
            FieldTy::HasMany(has_many) => {
                let pair = self.field(has_many.pair).ty.expect_belongs_to();
                Ok(Navigation::principal_to_dependent(
                    self,
                    field,
                    has_many.target,
                    pair,
                    true,
                ))
            }
            FieldTy::HasOne(has_one) => {
                let pair = self.field(has_one.pair).ty.expect_belongs_to();
                Ok(Navigation::principal_to_dependent(
                    self,
                    field,
                    has_one.target,
                    pair,
                    false,
                ))
            }
            FieldTy::Primitive(_) => Err(Error::invalid_include(format!(
                "`{}` is not a navigation",
                self.qualified_name(id)
            ))),
        }
    }
}
