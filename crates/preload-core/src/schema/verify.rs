use super::{FieldId, FieldTy, Model, Schema};
use crate::{Error, Result};

struct Verify<'a> {
    schema: &'a Schema,
}

impl Schema {
    pub(super) fn verify(&self) -> Result<()> {
        Verify { schema: self }.verify()
    }
}

impl Verify<'_> {
    fn verify(&self) -> Result<()> {
        for model in self.schema.models() {
            self.verify_model(model)
                .map_err(|err| err.context(crate::err!("model `{}`", model.name)))?;
        }

        Ok(())
    }

    fn verify_model(&self, model: &Model) -> Result<()> {
        if model.primary_key.is_empty() {
            return Err(Error::invalid_schema("model has no primary key"));
        }

        for field in model.primary_key_fields() {
            if !field.ty.is_primitive() || field.nullable {
                return Err(Error::invalid_schema(format!(
                    "primary key field `{}` must be a non-nullable primitive",
                    field.name.app_name
                )));
            }
        }

        if let Some(discriminator) = &model.discriminator {
            if !self.schema.field(discriminator.field).ty.is_primitive() {
                return Err(Error::invalid_schema("discriminator must be a primitive field"));
            }
        }

        for field in &model.fields {
            match &field.ty {
                FieldTy::Primitive(_) => {}
                FieldTy::BelongsTo(belongs_to) => {
                    for fk_field in &belongs_to.foreign_key.fields {
                        self.verify_foreign_key_field(fk_field.source, fk_field.target)?;
                    }
                }
                FieldTy::HasMany(has_many) => {
                    self.verify_pair(model, &field.name.app_name, has_many.pair)?
                }
                FieldTy::HasOne(has_one) => {
                    self.verify_pair(model, &field.name.app_name, has_one.pair)?
                }
            }
        }

        Ok(())
    }

    fn verify_foreign_key_field(&self, source: FieldId, target: FieldId) -> Result<()> {
        let source_field = self.schema.field(source);
        let target_field = self.schema.field(target);

        let (Some(source_ty), Some(target_ty)) = (
            source_field.ty.as_primitive(),
            target_field.ty.as_primitive(),
        ) else {
            return Err(Error::invalid_schema(format!(
                "foreign key field `{}` must be primitive",
                source_field.name.app_name
            )));
        };

        if source_ty.ty.non_nullable() != target_ty.ty.non_nullable() {
            return Err(Error::invalid_schema(format!(
                "foreign key field `{}` has type {:?} but references {} of type {:?}",
                source_field.name.app_name,
                source_ty.ty,
                self.schema.qualified_name(target),
                target_ty.ty
            )));
        }

        Ok(())
    }

    fn verify_pair(&self, model: &Model, name: &str, pair: FieldId) -> Result<()> {
        match self.schema.field(pair).ty.as_belongs_to() {
            Some(belongs_to) if belongs_to.target == model.id => Ok(()),
            _ => Err(Error::invalid_schema(format!(
                "`{name}` must pair with a `belongs_to` pointing back at `{}`, found {}",
                model.name,
                self.schema.qualified_name(pair)
            ))),
        }
    }
}
