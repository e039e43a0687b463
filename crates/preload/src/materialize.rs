use preload_core::{
    schema::{Field, Model, ModelId, Schema},
    stmt::{Expr, Select, Value, ValueRecord},
    Error, Materializer, MaterializerFactory, Result, Shaper,
};

use std::sync::Arc;

/// Materializes entities as records of their primitive fields, in
/// declaration order.
///
/// For a model sharing its table with others, the discriminator column is
/// compared with the model's discriminator value, restricting the table to
/// the model's rows.
#[derive(Debug, Default, Clone, Copy)]
pub struct ModelMaterializer;

struct ModelShape {
    model: ModelId,
    positions: Vec<usize>,
}

impl MaterializerFactory for ModelMaterializer {
    fn create_materializer(
        &self,
        _schema: &Schema,
        model: &Model,
        select: &mut Select,
        project: &mut dyn FnMut(&Field, &mut Select) -> usize,
    ) -> Result<Box<dyn Materializer>> {
        let window_start = select.projection.len();

        let positions: Vec<_> = model
            .primitives()
            .map(|field| (field.id, project(field, select)))
            .collect();

        if let Some(discriminator) = &model.discriminator {
            let Some((_, position)) = positions.iter().find(|(id, _)| *id == discriminator.field)
            else {
                return Err(Error::invalid_schema(format!(
                    "discriminator of `{}` is not projected",
                    model.name
                )));
            };

            let Some(projection) = select.projection.get(window_start + position) else {
                return Err(Error::invalid_result(format!(
                    "discriminator of `{}` projected out of bounds",
                    model.name
                )));
            };

            let column = (*projection.expr).clone();
            select.add_filter(Expr::eq(column, discriminator.value.clone()));
        }

        Ok(Box::new(ModelShape {
            model: model.id,
            positions: positions.into_iter().map(|(_, position)| position).collect(),
        }))
    }
}

impl Materializer for ModelShape {
    fn compile(&self) -> Shaper {
        let model = self.model;
        let positions = self.positions.clone();

        Arc::new(move |window: &[Value]| {
            positions
                .iter()
                .map(|position| {
                    window.get(*position).cloned().ok_or_else(|| {
                        Error::invalid_result(format!(
                            "{model:?}: window has {} values, expected at least {}",
                            window.len(),
                            position + 1
                        ))
                    })
                })
                .collect::<Result<Vec<_>>>()
                .map(ValueRecord::from_vec)
        })
    }
}
