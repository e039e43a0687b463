use preload_core::{
    schema::{FieldId, Navigation, Schema},
    stmt::{ExposedProjection, Expr, ExprColumn, QuerySource, TableRef},
    Error, Result,
};

/// Builds the predicate joining the dependent side of `navigation` to its
/// principal side.
///
/// The result has one equality per foreign key field, in declaration order,
/// with the foreign key column on the left. When exactly one side of an
/// equality is nullable, the other side is cast to the nullable type.
pub fn build_join_predicate(
    schema: &Schema,
    navigation: &Navigation,
    fk_side: &TableRef,
    pk_side: &TableRef,
    source: QuerySource,
) -> Result<Expr> {
    let fk_projections = fk_side.exposed_projections();
    let pk_projections = pk_side.exposed_projections();

    let mut operands = Vec::with_capacity(navigation.foreign_key.len());

    for (fk_field, pk_field) in navigation.foreign_key.iter().zip(&navigation.principal_key) {
        let fk = resolve(schema, &fk_projections, fk_side, *fk_field, source)?;
        let pk = resolve(schema, &pk_projections, pk_side, *pk_field, source)?;

        let (lhs, rhs) = coerce(fk, pk);
        operands.push(Expr::eq(lhs, rhs));
    }

    Ok(Expr::and_from_vec(operands))
}

/// Resolves `field` to a column of `table`.
///
/// Tables exposing projections are read through the projected name. Other
/// tables are read directly, using the field's column name.
pub(crate) fn resolve_column(
    schema: &Schema,
    table: &TableRef,
    field: FieldId,
    source: QuerySource,
) -> Result<ExprColumn> {
    resolve(schema, &table.exposed_projections(), table, field, source)
}

fn resolve(
    schema: &Schema,
    projections: &[ExposedProjection<'_>],
    table: &TableRef,
    field: FieldId,
    source: QuerySource,
) -> Result<ExprColumn> {
    if projections.is_empty() {
        return Ok(ExprColumn {
            table: table.alias().to_string(),
            name: schema.column_name_for(field).to_string(),
            field: Some(field),
            ty: schema.column_type_for(field)?,
        });
    }

    let matches: Vec<_> = projections
        .iter()
        .filter(|exposed| {
            exposed
                .projection
                .column()
                .is_some_and(|column| column.field == Some(field))
        })
        .collect();

    let exposed = match &matches[..] {
        [] => {
            return Err(Error::unresolvable_column(
                schema.qualified_name(field),
                table.alias(),
            ))
        }
        [exposed] => *exposed,
        // Several projections carry the field: take the last one read from a
        // table of the navigation's query source.
        _ => match matches.iter().rev().find(|exposed| exposed.source == Some(source)) {
            Some(exposed) => *exposed,
            None => {
                return Err(Error::ambiguous_column_alias(
                    schema.qualified_name(field),
                    matches.len(),
                ))
            }
        },
    };

    let (Some(name), Some(column)) = (exposed.projection.output_name(), exposed.projection.column())
    else {
        return Err(Error::unresolvable_column(
            schema.qualified_name(field),
            table.alias(),
        ));
    };

    Ok(ExprColumn {
        table: table.alias().to_string(),
        name: name.to_string(),
        field: Some(field),
        ty: column.ty.clone(),
    })
}

fn coerce(fk: ExprColumn, pk: ExprColumn) -> (Expr, Expr) {
    match (fk.ty.is_nullable(), pk.ty.is_nullable()) {
        (true, false) => {
            let ty = fk.ty.clone();
            (fk.into(), Expr::cast(pk, ty))
        }
        (false, true) => {
            let ty = pk.ty.clone();
            (Expr::cast(fk, ty), pk.into())
        }
        _ => (fk.into(), pk.into()),
    }
}
