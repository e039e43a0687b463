pub mod engine;

pub mod loader;
pub use loader::{CollectionLoader, ReferenceLoader, RelatedLoader};

pub mod materialize;
pub use materialize::ModelMaterializer;

pub mod planner;
pub use planner::{IncludeFilters, Planner};

pub use preload_core::{
    bail, err, schema, stmt, Error, Generate, Materializer, MaterializerFactory, QueryText, Result,
    Schema, Shaper,
};
