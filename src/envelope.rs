use crate::error::{FieldContext, TransformError};
use crate::lower::lower_expr;
use odata_syntax::{Expr, FieldResolver};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// Select list that returns every stored field.
pub const SELECT_ALL: &str = "*";

/// The document handed to the search backend.
///
/// Field order here is the key order of the serialized document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryEnvelope {
    pub query: Value,
    pub size: i64,
    pub from: i64,
    #[serde(rename = "_source")]
    pub source: SourceFilter,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceFilter {
    pub includes: Vec<String>,
}

/// Resolves a comma separated select list into physical field names.
///
/// `*` passes through untouched. Entries are not trimmed, and order and
/// duplicates are preserved.
pub fn resolve_projection<R>(
    select: &str,
    scope: &str,
    resolver: &R,
) -> Result<Vec<String>, TransformError>
where
    R: FieldResolver + ?Sized,
{
    if select == SELECT_ALL {
        return Ok(vec![SELECT_ALL.to_string()]);
    }

    select
        .split(',')
        .map(|field| {
            resolver.resolve(scope, field).ok_or_else(|| {
                debug!(scope, field, "select field did not resolve");
                TransformError::UnresolvedField {
                    context: FieldContext::Select,
                    field: field.to_string(),
                }
            })
        })
        .collect()
}

/// Wraps a parsed filter with paging and projection.
///
/// `top` and `offset` are copied into `size` and `from` as given.
pub fn assemble<R>(
    expr: &Expr,
    select: &str,
    top: i64,
    offset: i64,
    scope: &str,
    resolver: &R,
) -> Result<QueryEnvelope, TransformError>
where
    R: FieldResolver + ?Sized,
{
    let includes = resolve_projection(select, scope, resolver)?;
    let envelope = QueryEnvelope {
        query: lower_expr(expr),
        size: top,
        from: offset,
        source: SourceFilter { includes },
    };
    debug!(?envelope, "assembled query document");
    Ok(envelope)
}
