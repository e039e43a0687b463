use super::{Comma, Params, ToSql};

use preload_core::stmt;

impl ToSql for &stmt::Value {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        match self {
            stmt::Value::Null => fmt!(f, "NULL"),
            stmt::Value::Record(record) => fmt!(f, "(", Comma(&record.fields), ")"),
            value => {
                let placeholder = f.params.push(value);
                fmt!(f, placeholder);
            }
        }
    }
}
