#[macro_use]
mod fmt;
use fmt::ToSql;

mod delim;
use delim::{Comma, Delimited};

mod flavor;
use flavor::Flavor;

mod ident;
use ident::Ident;

mod params;
pub use params::{Params, Placeholder};

// Fragment serializers
mod expr;
mod stmt;
mod ty;
mod value;

use preload_core::{stmt::Select, Error, Generate, QueryText, Result};

/// Serialize a plan to a SQL string
#[derive(Debug, Clone)]
pub struct Serializer {
    /// The database flavor handles the differences between SQL dialects.
    flavor: Flavor,
}

struct Formatter<'a, T> {
    /// Handle to the serializer
    serializer: &'a Serializer,

    /// Where to write the serialized SQL
    dst: &'a mut String,

    /// Where to store parameters
    params: &'a mut T,

    /// The first node that could not be serialized
    error: Option<Error>,
}

impl Serializer {
    pub fn serialize(&self, select: &Select, params: &mut impl Params) -> Result<String> {
        let mut ret = String::new();

        let mut fmt = Formatter {
            serializer: self,
            dst: &mut ret,
            params,
            error: None,
        };

        select.to_sql(&mut fmt);

        if let Some(err) = fmt.error {
            return Err(err);
        }

        ret.push(';');
        Ok(ret)
    }
}

impl Generate for Serializer {
    fn generate(&self, select: &Select) -> Result<QueryText> {
        let mut params = vec![];
        let sql = self.serialize(select, &mut params)?;
        Ok(QueryText { sql, params })
    }
}

impl<T> Formatter<'_, T> {
    fn fail(&mut self, err: Error) {
        self.error.get_or_insert(err);
    }
}
