use super::{Comma, Delimited, Ident, Params, ToSql};

use preload_core::{err, stmt};

/// An operand of `AND` / `OR`, parenthesized when it is itself a
/// combination.
struct Operand<'a>(&'a stmt::Expr);

impl ToSql for &stmt::Expr {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        use stmt::Expr::*;

        match self {
            Alias(expr) => fmt!(f, &*expr.expr),
            And(expr) => fmt!(f, Delimited(expr.iter().map(Operand), " AND ")),
            BinaryOp(expr) if expr.rhs.is_value_null() => match expr.op {
                stmt::BinaryOp::Eq => fmt!(f, &*expr.lhs, " IS NULL"),
                stmt::BinaryOp::Ne => fmt!(f, &*expr.lhs, " IS NOT NULL"),
                _ => fmt!(f, &*expr.lhs, " ", expr.op, " NULL"),
            },
            BinaryOp(expr) => fmt!(f, &*expr.lhs, " ", expr.op, " ", &*expr.rhs),
            Cast(expr) => fmt!(f, "CAST(", &*expr.expr, " AS ", &expr.ty, ")"),
            Column(expr) => fmt!(f, Ident(&expr.table), ".", Ident(&expr.name)),
            Exists(expr) => {
                if expr.negated {
                    fmt!(f, "NOT ");
                }

                fmt!(f, "EXISTS (", &*expr.subquery, ")");
            }
            Func(expr) => fmt!(f, expr.name.as_str(), "(", Comma(&expr.args), ")"),
            Not(expr) => fmt!(f, "NOT (", &*expr.expr, ")"),
            Or(expr) => fmt!(f, Delimited(expr.iter().map(Operand), " OR ")),
            Stmt(expr) => fmt!(f, "(", &*expr.select, ")"),
            Value(value) => fmt!(f, value),
            Field(_) | Project(_) => {
                f.fail(err!("model-level expression cannot be serialized: {self:?}"));
            }
        }
    }
}

impl ToSql for Operand<'_> {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        if self.0.is_and() || matches!(self.0, stmt::Expr::Or(_)) {
            fmt!(f, "(", self.0, ")");
        } else {
            fmt!(f, self.0);
        }
    }
}

impl ToSql for stmt::BinaryOp {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        f.dst.push_str(match self {
            stmt::BinaryOp::Eq => "=",
            stmt::BinaryOp::Gt => ">",
            stmt::BinaryOp::Ge => ">=",
            stmt::BinaryOp::Lt => "<",
            stmt::BinaryOp::Le => "<=",
            stmt::BinaryOp::Ne => "<>",
        })
    }
}
