use crate::{
    stmt::{Select, Value},
    Result,
};

/// Query text ready to be sent to a database, with its bound parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryText {
    pub sql: String,
    pub params: Vec<Value>,
}

/// Renders a plan as query text.
pub trait Generate {
    fn generate(&self, select: &Select) -> Result<QueryText>;
}
