use preload_core::{
    schema::{FieldId, Model, Schema},
    stmt::{Expr, ExprAlias, ExprAnd, ExprColumn, ExprOr},
    Error, Result,
};

/// Binds an include filter written against `model`'s fields to the table
/// aliased `table`.
///
/// Every field reference becomes an alias-wrapped column of the table;
/// operators and combinators are rebuilt node for node. Anything else is
/// rejected rather than dropped.
pub fn translate_filter(schema: &Schema, model: &Model, table: &str, expr: &Expr) -> Result<Expr> {
    TranslateFilter {
        schema,
        model,
        table,
    }
    .translate(expr)
}

struct TranslateFilter<'a> {
    schema: &'a Schema,
    model: &'a Model,
    table: &'a str,
}

impl TranslateFilter<'_> {
    fn translate(&self, expr: &Expr) -> Result<Expr> {
        Ok(match expr {
            Expr::Field(expr_field) => self.translate_field(expr_field.field)?,
            Expr::Value(value) => Expr::Value(value.clone()),
            Expr::BinaryOp(expr_binary_op) => Expr::binary_op(
                self.translate(&expr_binary_op.lhs)?,
                expr_binary_op.op,
                self.translate(&expr_binary_op.rhs)?,
            ),
            Expr::And(expr_and) => ExprAnd {
                operands: self.translate_all(&expr_and.operands)?,
            }
            .into(),
            Expr::Or(expr_or) => ExprOr {
                operands: self.translate_all(&expr_or.operands)?,
            }
            .into(),
            Expr::Not(expr_not) => Expr::not(self.translate(&expr_not.expr)?),
            Expr::Func(expr_func) => {
                return Err(Error::unsupported_filter_expression(format!(
                    "function call `{}`",
                    expr_func.name
                )))
            }
            Expr::Project(expr_project) => {
                return Err(Error::unsupported_filter_expression(format!(
                    "navigation traversal to `{}`",
                    self.schema.qualified_name(expr_project.field)
                )))
            }
            Expr::Column(_) | Expr::Alias(_) => {
                return Err(Error::unsupported_filter_expression(
                    "column reference bound to a table",
                ))
            }
            Expr::Exists(_) | Expr::Stmt(_) => {
                return Err(Error::unsupported_filter_expression("subquery"))
            }
            Expr::Cast(_) => return Err(Error::unsupported_filter_expression("cast")),
        })
    }

    fn translate_all(&self, operands: &[Expr]) -> Result<Vec<Expr>> {
        operands.iter().map(|operand| self.translate(operand)).collect()
    }

    fn translate_field(&self, id: FieldId) -> Result<Expr> {
        if id.model != self.model.id {
            return Err(Error::unsupported_filter_expression(format!(
                "`{}` is not a field of `{}`",
                self.schema.qualified_name(id),
                self.model.name
            )));
        }

        let Some(field) = self.schema.get_field(id) else {
            return Err(Error::unsupported_filter_expression(format!(
                "`{}` has no field #{}",
                self.model.name, id.index
            )));
        };

        if field.is_relation() {
            return Err(Error::unsupported_filter_expression(format!(
                "navigation traversal through `{}`",
                self.schema.qualified_name(id)
            )));
        }

        Ok(ExprAlias::new(ExprColumn {
            table: self.table.to_string(),
            name: self.schema.column_name_for(id).to_string(),
            field: Some(id),
            ty: self.schema.column_type_for(id)?,
        })
        .into())
    }
}
