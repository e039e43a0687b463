use super::Planner;
use crate::ModelMaterializer;
use preload_core::{MaterializerFactory, Schema};

pub struct Builder<'a> {
    schema: &'a Schema,
    materializer: Box<dyn MaterializerFactory + 'a>,
    exists_strategy: bool,
}

impl<'a> Builder<'a> {
    pub(super) fn new(schema: &'a Schema) -> Self {
        Self {
            schema,
            materializer: Box::new(ModelMaterializer),
            exists_strategy: true,
        }
    }

    /// Sets the factory creating materializers for included entities.
    pub fn materializer(mut self, materializer: impl MaterializerFactory + 'a) -> Self {
        self.materializer = Box::new(materializer);
        self
    }

    /// When disabled, collection plans always join a copy of the principal
    /// plan instead of correlating an `EXISTS` subquery.
    pub fn exists_strategy(mut self, enabled: bool) -> Self {
        self.exists_strategy = enabled;
        self
    }

    pub fn build(self) -> Planner<'a> {
        Planner {
            schema: self.schema,
            materializer: self.materializer,
            exists_strategy: self.exists_strategy,
        }
    }
}
