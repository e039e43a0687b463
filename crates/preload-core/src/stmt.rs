mod direction;
pub use direction::Direction;

mod expr;
pub use expr::Expr;

mod expr_alias;
pub use expr_alias::ExprAlias;

mod expr_and;
pub use expr_and::ExprAnd;

mod expr_binary_op;
pub use expr_binary_op::ExprBinaryOp;

mod expr_cast;
pub use expr_cast::ExprCast;

mod expr_column;
pub use expr_column::ExprColumn;

mod expr_exists;
pub use expr_exists::ExprExists;

mod expr_field;
pub use expr_field::ExprField;

mod expr_func;
pub use expr_func::ExprFunc;

mod expr_not;
pub use expr_not::ExprNot;

mod expr_or;
pub use expr_or::ExprOr;

mod expr_project;
pub use expr_project::ExprProject;

mod expr_stmt;
pub use expr_stmt::ExprStmt;

mod filter;
pub use filter::Filter;

mod join;
pub use join::{Join, JoinKind};

mod limit;
pub use limit::Limit;

mod op_binary;
pub use op_binary::BinaryOp;

mod order_by_expr;
pub use order_by_expr::OrderByExpr;

mod query_source;
pub use query_source::QuerySource;

mod select;
pub use select::Select;

mod table_ref;
pub use table_ref::{ExposedProjection, TableBase, TableDerived, TableRef};

mod ty;
pub use ty::Type;

mod value;
pub use value::Value;

mod value_record;
pub use value_record::ValueRecord;

mod verify;

pub mod visit;
pub use visit::Visit;

pub mod visit_mut;
pub use visit_mut::VisitMut;
