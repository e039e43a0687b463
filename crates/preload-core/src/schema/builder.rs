use super::{
    BelongsTo, Discriminator, Field, FieldId, FieldName, FieldPrimitive, FieldTy, ForeignKey,
    ForeignKeyField, HasMany, HasOne, Model, ModelId, Schema,
};
use crate::{stmt, Error, Result};
use indexmap::IndexMap;

/// Declares models and builds a validated [`Schema`].
///
/// Relations refer to other models and fields by name; names are resolved
/// when the schema is built, so models can be declared in any order.
#[derive(Debug, Default)]
pub struct Builder {
    /// If set, prefix all table names with this string
    table_name_prefix: Option<String>,

    models: Vec<ModelBuilder>,
}

#[derive(Debug)]
pub struct ModelBuilder {
    name: String,
    table_name: Option<String>,
    schema: Option<String>,
    fields: Vec<FieldBuilder>,
    discriminator: Option<(String, stmt::Value)>,
}

#[derive(Debug)]
struct FieldBuilder {
    name: String,
    storage_name: Option<String>,
    ty: FieldBuilderTy,
    nullable: bool,
    primary_key: bool,
}

#[derive(Debug)]
enum FieldBuilderTy {
    Primitive(stmt::Type),
    BelongsTo {
        target: String,
        foreign_key: Vec<String>,
    },
    HasMany {
        target: String,
        pair: String,
    },
    HasOne {
        target: String,
        pair: String,
    },
}

/// Used to track state during the build process
struct BuildSchema<'a> {
    builder: &'a Builder,

    /// Model name to identifier
    model_lookup: IndexMap<&'a str, ModelId>,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table_name_prefix(&mut self, prefix: &str) -> &mut Self {
        self.table_name_prefix = Some(prefix.to_string());
        self
    }

    /// Declares a model. Models are numbered in declaration order.
    pub fn model(&mut self, name: &str, f: impl FnOnce(&mut ModelBuilder)) -> &mut Self {
        let mut model = ModelBuilder {
            name: name.to_string(),
            table_name: None,
            schema: None,
            fields: vec![],
            discriminator: None,
        };

        f(&mut model);
        self.models.push(model);
        self
    }

    pub fn build(&self) -> Result<Schema> {
        let mut build = BuildSchema {
            builder: self,
            model_lookup: IndexMap::new(),
        };

        for (index, model) in self.models.iter().enumerate() {
            if build
                .model_lookup
                .insert(&model.name, ModelId(index))
                .is_some()
            {
                return Err(Error::invalid_schema(format!(
                    "model `{}` is declared twice",
                    model.name
                )));
            }
        }

        let mut models = IndexMap::new();

        for (index, model) in self.models.iter().enumerate() {
            let model = build
                .build_model(ModelId(index), model)
                .map_err(|err| err.context(crate::err!("model `{}`", model.name)))?;
            models.insert(model.id, model);
        }

        let mut schema = Schema { models };
        link_belongs_to_pairs(&mut schema);
        schema.verify()?;

        Ok(schema)
    }
}

impl ModelBuilder {
    /// Stores the model in `name` instead of the default table, which is named
    /// after the model.
    pub fn table_name(&mut self, name: &str) -> &mut Self {
        self.table_name = Some(name.to_string());
        self
    }

    /// Places the model's table in a database schema.
    pub fn schema(&mut self, schema: &str) -> &mut Self {
        self.schema = Some(schema.to_string());
        self
    }

    /// Adds a non-nullable primary key field.
    pub fn primary_key(&mut self, name: &str, ty: stmt::Type) -> &mut Self {
        self.push_field(name, FieldBuilderTy::Primitive(ty), false, true)
    }

    /// Adds a non-nullable primitive field.
    pub fn field(&mut self, name: &str, ty: stmt::Type) -> &mut Self {
        self.push_field(name, FieldBuilderTy::Primitive(ty), false, false)
    }

    /// Adds a nullable primitive field.
    pub fn nullable(&mut self, name: &str, ty: stmt::Type) -> &mut Self {
        self.push_field(name, FieldBuilderTy::Primitive(ty), true, false)
    }

    /// Sets the column name of the most recently declared field.
    #[track_caller]
    pub fn storage_name(&mut self, column: &str) -> &mut Self {
        let field = self
            .fields
            .last_mut()
            .unwrap_or_else(|| panic!("`storage_name` called before any field was declared"));
        field.storage_name = Some(column.to_string());
        self
    }

    /// Adds a reference to `target` through the foreign key fields named
    /// `foreign_key`, which must already be declared on this model. They map,
    /// in order, to `target`'s primary key.
    pub fn belongs_to(&mut self, name: &str, target: &str, foreign_key: &[&str]) -> &mut Self {
        let ty = FieldBuilderTy::BelongsTo {
            target: target.to_string(),
            foreign_key: foreign_key.iter().map(|s| s.to_string()).collect(),
        };
        self.push_field(name, ty, false, false)
    }

    /// Adds a collection of `target`s, paired with the `belongs_to` field
    /// named `pair` on `target`.
    pub fn has_many(&mut self, name: &str, target: &str, pair: &str) -> &mut Self {
        let ty = FieldBuilderTy::HasMany {
            target: target.to_string(),
            pair: pair.to_string(),
        };
        self.push_field(name, ty, false, false)
    }

    /// Adds a single `target`, paired with the `belongs_to` field named `pair`
    /// on `target`.
    pub fn has_one(&mut self, name: &str, target: &str, pair: &str) -> &mut Self {
        let ty = FieldBuilderTy::HasOne {
            target: target.to_string(),
            pair: pair.to_string(),
        };
        self.push_field(name, ty, false, false)
    }

    /// Restricts the model to the rows of its table where `field` equals
    /// `value`.
    pub fn discriminator(&mut self, field: &str, value: impl Into<stmt::Value>) -> &mut Self {
        self.discriminator = Some((field.to_string(), value.into()));
        self
    }

    fn push_field(
        &mut self,
        name: &str,
        ty: FieldBuilderTy,
        nullable: bool,
        primary_key: bool,
    ) -> &mut Self {
        self.fields.push(FieldBuilder {
            name: name.to_string(),
            storage_name: None,
            ty,
            nullable,
            primary_key,
        });
        self
    }

    fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.name == name)
    }

    fn primary_key_indices(&self) -> Vec<usize> {
        self.fields
            .iter()
            .enumerate()
            .filter(|(_, field)| field.primary_key)
            .map(|(index, _)| index)
            .collect()
    }
}

impl BuildSchema<'_> {
    fn build_model(&self, id: ModelId, model: &ModelBuilder) -> Result<Model> {
        let mut fields = Vec::with_capacity(model.fields.len());

        for (index, field) in model.fields.iter().enumerate() {
            if model.field_index(&field.name) != Some(index) {
                return Err(Error::invalid_schema(format!(
                    "field `{}` is declared twice",
                    field.name
                )));
            }

            fields.push(Field {
                id: id.field(index),
                name: FieldName {
                    app_name: field.name.clone(),
                    storage_name: field.storage_name.clone(),
                },
                ty: self.build_field_ty(id, model, field)?,
                nullable: field.nullable,
                primary_key: field.primary_key,
            });
        }

        let discriminator = match &model.discriminator {
            Some((name, value)) => {
                let Some(index) = model.field_index(name) else {
                    return Err(Error::invalid_schema(format!(
                        "discriminator field `{name}` does not exist"
                    )));
                };

                Some(Discriminator {
                    field: id.field(index),
                    value: value.clone(),
                })
            }
            None => None,
        };

        let table_name = model.table_name.as_deref().unwrap_or(&model.name);
        let table_name = match &self.builder.table_name_prefix {
            Some(prefix) => format!("{prefix}{table_name}"),
            None => table_name.to_string(),
        };

        Ok(Model {
            id,
            name: model.name.clone(),
            table_name,
            schema: model.schema.clone(),
            fields,
            primary_key: model
                .primary_key_indices()
                .into_iter()
                .map(|index| id.field(index))
                .collect(),
            discriminator,
        })
    }

    fn build_field_ty(
        &self,
        id: ModelId,
        model: &ModelBuilder,
        field: &FieldBuilder,
    ) -> Result<FieldTy> {
        Ok(match &field.ty {
            FieldBuilderTy::Primitive(ty) => FieldTy::Primitive(FieldPrimitive { ty: ty.clone() }),
            FieldBuilderTy::BelongsTo {
                target,
                foreign_key,
            } => {
                let (target_id, target_model) = self.lookup_model(target)?;
                let principal_key = target_model.primary_key_indices();

                if principal_key.len() != foreign_key.len() {
                    return Err(Error::invalid_schema(format!(
                        "`{}` has {} foreign key fields but `{}` has {} primary key fields",
                        field.name,
                        foreign_key.len(),
                        target,
                        principal_key.len()
                    )));
                }

                let mut fields = vec![];

                for (name, target_index) in foreign_key.iter().zip(principal_key) {
                    let Some(source_index) = model.field_index(name) else {
                        return Err(Error::invalid_schema(format!(
                            "foreign key field `{name}` of `{}` does not exist",
                            field.name
                        )));
                    };

                    fields.push(ForeignKeyField {
                        source: id.field(source_index),
                        target: target_id.field(target_index),
                    });
                }

                FieldTy::BelongsTo(BelongsTo {
                    target: target_id,
                    pair: None,
                    foreign_key: ForeignKey { fields },
                })
            }
            FieldBuilderTy::HasMany { target, pair } => {
                let (target, pair) = self.lookup_pair(&field.name, target, pair)?;
                FieldTy::HasMany(HasMany { target, pair })
            }
            FieldBuilderTy::HasOne { target, pair } => {
                let (target, pair) = self.lookup_pair(&field.name, target, pair)?;
                FieldTy::HasOne(HasOne { target, pair })
            }
        })
    }

    fn lookup_model(&self, name: &str) -> Result<(ModelId, &ModelBuilder)> {
        match self.model_lookup.get(name) {
            Some(id) => Ok((*id, &self.builder.models[id.0])),
            None => Err(Error::invalid_schema(format!(
                "relation target `{name}` is not a declared model"
            ))),
        }
    }

    fn lookup_pair(&self, field: &str, target: &str, pair: &str) -> Result<(ModelId, FieldId)> {
        let (target_id, target_model) = self.lookup_model(target)?;

        let Some(index) = target_model.field_index(pair) else {
            return Err(Error::invalid_schema(format!(
                "`{field}` is paired with `{target}.{pair}`, which does not exist"
            )));
        };

        Ok((target_id, target_id.field(index)))
    }
}

/// Points every `BelongsTo` at the `HasMany` / `HasOne` declared against it.
fn link_belongs_to_pairs(schema: &mut Schema) {
    let mut pairs = vec![];

    for model in schema.models.values() {
        for field in &model.fields {
            let pair = match &field.ty {
                FieldTy::HasMany(has_many) => has_many.pair,
                FieldTy::HasOne(has_one) => has_one.pair,
                _ => continue,
            };

            pairs.push((pair, field.id));
        }
    }

    for (belongs_to, pair) in pairs {
        let Some(model) = schema.models.get_mut(&belongs_to.model) else {
            continue;
        };

        if let Some(FieldTy::BelongsTo(belongs_to)) = model
            .fields
            .get_mut(belongs_to.index)
            .map(|field| &mut field.ty)
        {
            belongs_to.pair = Some(pair);
        }
    }
}
