use super::{Flavor, Params, ToSql};

use preload_core::stmt::Type;

/// The type name used in `CAST` expressions. Nullability is not part of a
/// SQL type.
impl ToSql for &Type {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        let ty = self.non_nullable();

        let name = match f.serializer.flavor {
            Flavor::Mysql => match ty {
                Type::String => "CHAR",
                _ => "SIGNED",
            },
            Flavor::Postgresql => match ty {
                Type::Bool => "BOOLEAN",
                Type::I32 => "INTEGER",
                Type::I64 => "BIGINT",
                Type::String | Type::Nullable(_) => "TEXT",
            },
            Flavor::Sqlite => match ty {
                Type::String => "TEXT",
                _ => "INTEGER",
            },
        };

        fmt!(f, name);
    }
}
