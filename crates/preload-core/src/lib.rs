mod error;
pub use error::{Error, IntoError};

pub mod generate;
pub use generate::{Generate, QueryText};

pub mod materialize;
pub use materialize::{Materializer, MaterializerFactory, Shaper};

pub mod schema;
pub use schema::Schema;

pub mod stmt;

/// A Result type alias that uses preload's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;
