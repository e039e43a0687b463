#![allow(unused_variables)]

use super::{
    Expr, ExprAlias, ExprAnd, ExprBinaryOp, ExprCast, ExprColumn, ExprExists, ExprField, ExprFunc,
    ExprNot, ExprOr, ExprProject, ExprStmt, Filter, Join, Limit, OrderByExpr, Select, TableBase,
    TableDerived, TableRef, Value,
};

pub trait Visit {
    fn visit_expr(&mut self, i: &Expr) {
        visit_expr(self, i);
    }

    fn visit_expr_alias(&mut self, i: &ExprAlias) {
        visit_expr_alias(self, i);
    }

    fn visit_expr_and(&mut self, i: &ExprAnd) {
        visit_expr_and(self, i);
    }

    fn visit_expr_binary_op(&mut self, i: &ExprBinaryOp) {
        visit_expr_binary_op(self, i);
    }

    fn visit_expr_cast(&mut self, i: &ExprCast) {
        visit_expr_cast(self, i);
    }

    fn visit_expr_column(&mut self, i: &ExprColumn) {
        visit_expr_column(self, i);
    }

    fn visit_expr_exists(&mut self, i: &ExprExists) {
        visit_expr_exists(self, i);
    }

    fn visit_expr_field(&mut self, i: &ExprField) {
        visit_expr_field(self, i);
    }

    fn visit_expr_func(&mut self, i: &ExprFunc) {
        visit_expr_func(self, i);
    }

    fn visit_expr_not(&mut self, i: &ExprNot) {
        visit_expr_not(self, i);
    }

    fn visit_expr_or(&mut self, i: &ExprOr) {
        visit_expr_or(self, i);
    }

    fn visit_expr_project(&mut self, i: &ExprProject) {
        visit_expr_project(self, i);
    }

    fn visit_expr_stmt(&mut self, i: &ExprStmt) {
        visit_expr_stmt(self, i);
    }

    fn visit_filter(&mut self, i: &Filter) {
        visit_filter(self, i);
    }

    fn visit_join(&mut self, i: &Join) {
        visit_join(self, i);
    }

    fn visit_limit(&mut self, i: &Limit) {
        visit_limit(self, i);
    }

    fn visit_order_by_expr(&mut self, i: &OrderByExpr) {
        visit_order_by_expr(self, i);
    }

    fn visit_select(&mut self, i: &Select) {
        visit_select(self, i);
    }

    fn visit_table_base(&mut self, i: &TableBase) {
        visit_table_base(self, i);
    }

    fn visit_table_derived(&mut self, i: &TableDerived) {
        visit_table_derived(self, i);
    }

    fn visit_table_ref(&mut self, i: &TableRef) {
        visit_table_ref(self, i);
    }

    fn visit_value(&mut self, i: &Value) {
        visit_value(self, i);
    }
}

impl<V: Visit + ?Sized> Visit for &mut V {
    fn visit_expr(&mut self, i: &Expr) {
        Visit::visit_expr(&mut **self, i);
    }

    fn visit_expr_alias(&mut self, i: &ExprAlias) {
        Visit::visit_expr_alias(&mut **self, i);
    }

    fn visit_expr_and(&mut self, i: &ExprAnd) {
        Visit::visit_expr_and(&mut **self, i);
    }

    fn visit_expr_binary_op(&mut self, i: &ExprBinaryOp) {
        Visit::visit_expr_binary_op(&mut **self, i);
    }

    fn visit_expr_cast(&mut self, i: &ExprCast) {
        Visit::visit_expr_cast(&mut **self, i);
    }

    fn visit_expr_column(&mut self, i: &ExprColumn) {
        Visit::visit_expr_column(&mut **self, i);
    }

    fn visit_expr_exists(&mut self, i: &ExprExists) {
        Visit::visit_expr_exists(&mut **self, i);
    }

    fn visit_expr_field(&mut self, i: &ExprField) {
        Visit::visit_expr_field(&mut **self, i);
    }

    fn visit_expr_func(&mut self, i: &ExprFunc) {
        Visit::visit_expr_func(&mut **self, i);
    }

    fn visit_expr_not(&mut self, i: &ExprNot) {
        Visit::visit_expr_not(&mut **self, i);
    }

    fn visit_expr_or(&mut self, i: &ExprOr) {
        Visit::visit_expr_or(&mut **self, i);
    }

    fn visit_expr_project(&mut self, i: &ExprProject) {
        Visit::visit_expr_project(&mut **self, i);
    }

    fn visit_expr_stmt(&mut self, i: &ExprStmt) {
        Visit::visit_expr_stmt(&mut **self, i);
    }

    fn visit_filter(&mut self, i: &Filter) {
        Visit::visit_filter(&mut **self, i);
    }

    fn visit_join(&mut self, i: &Join) {
        Visit::visit_join(&mut **self, i);
    }

    fn visit_limit(&mut self, i: &Limit) {
        Visit::visit_limit(&mut **self, i);
    }

    fn visit_order_by_expr(&mut self, i: &OrderByExpr) {
        Visit::visit_order_by_expr(&mut **self, i);
    }

    fn visit_select(&mut self, i: &Select) {
        Visit::visit_select(&mut **self, i);
    }

    fn visit_table_base(&mut self, i: &TableBase) {
        Visit::visit_table_base(&mut **self, i);
    }

    fn visit_table_derived(&mut self, i: &TableDerived) {
        Visit::visit_table_derived(&mut **self, i);
    }

    fn visit_table_ref(&mut self, i: &TableRef) {
        Visit::visit_table_ref(&mut **self, i);
    }

    fn visit_value(&mut self, i: &Value) {
        Visit::visit_value(&mut **self, i);
    }
}

pub fn visit_expr<V>(v: &mut V, node: &Expr)
where
    V: Visit + ?Sized,
{
    match node {
        Expr::Alias(expr) => v.visit_expr_alias(expr),
        Expr::And(expr) => v.visit_expr_and(expr),
        Expr::BinaryOp(expr) => v.visit_expr_binary_op(expr),
        Expr::Cast(expr) => v.visit_expr_cast(expr),
        Expr::Column(expr) => v.visit_expr_column(expr),
        Expr::Exists(expr) => v.visit_expr_exists(expr),
        Expr::Field(expr) => v.visit_expr_field(expr),
        Expr::Func(expr) => v.visit_expr_func(expr),
        Expr::Not(expr) => v.visit_expr_not(expr),
        Expr::Or(expr) => v.visit_expr_or(expr),
        Expr::Project(expr) => v.visit_expr_project(expr),
        Expr::Stmt(expr) => v.visit_expr_stmt(expr),
        Expr::Value(expr) => v.visit_value(expr),
    }
}

pub fn visit_expr_alias<V>(v: &mut V, node: &ExprAlias)
where
    V: Visit + ?Sized,
{
    v.visit_expr(&node.expr);
}

pub fn visit_expr_and<V>(v: &mut V, node: &ExprAnd)
where
    V: Visit + ?Sized,
{
    for expr in node {
        v.visit_expr(expr);
    }
}

pub fn visit_expr_binary_op<V>(v: &mut V, node: &ExprBinaryOp)
where
    V: Visit + ?Sized,
{
    v.visit_expr(&node.lhs);
    v.visit_expr(&node.rhs);
}

pub fn visit_expr_cast<V>(v: &mut V, node: &ExprCast)
where
    V: Visit + ?Sized,
{
    v.visit_expr(&node.expr);
}

pub fn visit_expr_column<V>(v: &mut V, node: &ExprColumn)
where
    V: Visit + ?Sized,
{
}

pub fn visit_expr_exists<V>(v: &mut V, node: &ExprExists)
where
    V: Visit + ?Sized,
{
    v.visit_select(&node.subquery);
}

pub fn visit_expr_field<V>(v: &mut V, node: &ExprField)
where
    V: Visit + ?Sized,
{
}

pub fn visit_expr_func<V>(v: &mut V, node: &ExprFunc)
where
    V: Visit + ?Sized,
{
    for expr in &node.args {
        v.visit_expr(expr);
    }
}

pub fn visit_expr_not<V>(v: &mut V, node: &ExprNot)
where
    V: Visit + ?Sized,
{
    v.visit_expr(&node.expr);
}

pub fn visit_expr_or<V>(v: &mut V, node: &ExprOr)
where
    V: Visit + ?Sized,
{
    for expr in node {
        v.visit_expr(expr);
    }
}

pub fn visit_expr_project<V>(v: &mut V, node: &ExprProject)
where
    V: Visit + ?Sized,
{
    v.visit_expr(&node.base);
}

pub fn visit_expr_stmt<V>(v: &mut V, node: &ExprStmt)
where
    V: Visit + ?Sized,
{
    v.visit_select(&node.select);
}

pub fn visit_filter<V>(v: &mut V, node: &Filter)
where
    V: Visit + ?Sized,
{
    if let Some(expr) = &node.expr {
        v.visit_expr(expr);
    }
}

pub fn visit_join<V>(v: &mut V, node: &Join)
where
    V: Visit + ?Sized,
{
    v.visit_table_ref(&node.table);

    if let Some(expr) = &node.constraint {
        v.visit_expr(expr);
    }
}

pub fn visit_limit<V>(v: &mut V, node: &Limit)
where
    V: Visit + ?Sized,
{
    if let Some(expr) = &node.limit {
        v.visit_expr(expr);
    }

    if let Some(expr) = &node.offset {
        v.visit_expr(expr);
    }
}

pub fn visit_order_by_expr<V>(v: &mut V, node: &OrderByExpr)
where
    V: Visit + ?Sized,
{
    v.visit_expr(&node.expr);
}

pub fn visit_select<V>(v: &mut V, node: &Select)
where
    V: Visit + ?Sized,
{
    for table in &node.tables {
        v.visit_table_ref(table);
    }

    v.visit_filter(&node.filter);

    for projection in &node.projection {
        v.visit_expr_alias(projection);
    }

    for order_by in &node.order_by {
        v.visit_order_by_expr(order_by);
    }

    if let Some(limit) = &node.limit {
        v.visit_limit(limit);
    }
}

pub fn visit_table_base<V>(v: &mut V, node: &TableBase)
where
    V: Visit + ?Sized,
{
}

pub fn visit_table_derived<V>(v: &mut V, node: &TableDerived)
where
    V: Visit + ?Sized,
{
    v.visit_select(&node.select);
}

pub fn visit_table_ref<V>(v: &mut V, node: &TableRef)
where
    V: Visit + ?Sized,
{
    match node {
        TableRef::Table(table) => v.visit_table_base(table),
        TableRef::Join(join) => v.visit_join(join),
        TableRef::Derived(table) => v.visit_table_derived(table),
    }
}

pub fn visit_value<V>(v: &mut V, node: &Value)
where
    V: Visit + ?Sized,
{
}

/// Calls `f` for every expression node reachable from `expr`, including the
/// contents of subqueries.
pub fn for_each_expr<F>(expr: &Expr, f: F)
where
    F: FnMut(&Expr),
{
    struct ForEach<F> {
        f: F,
    }

    impl<F> Visit for ForEach<F>
    where
        F: FnMut(&Expr),
    {
        fn visit_expr(&mut self, i: &Expr) {
            visit_expr(self, i);
            (self.f)(i);
        }
    }

    ForEach { f }.visit_expr(expr);
}
