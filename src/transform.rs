use crate::envelope::{QueryEnvelope, SELECT_ALL, assemble};
use crate::error::TransformError;
use odata_syntax::{FieldResolver, ParseMode, parse_filter_with};
use serde::Deserialize;
use tracing::{debug, error, instrument, warn};

pub const DEFAULT_TOP: i64 = 500;
pub const DEFAULT_OFFSET: i64 = 0;

/// Per-request options next to the filter string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct QueryOptions {
    /// Comma separated logical field names, or `*`.
    pub select: String,
    /// Becomes `size`.
    pub top: i64,
    /// Becomes `from`.
    pub offset: i64,
    /// Accept unclosed groups and trailing tokens.
    pub lenient: bool,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            select: SELECT_ALL.to_string(),
            top: DEFAULT_TOP,
            offset: DEFAULT_OFFSET,
            lenient: false,
        }
    }
}

impl QueryOptions {
    pub fn parse_mode(&self) -> ParseMode {
        if self.lenient {
            ParseMode::Lenient
        } else {
            ParseMode::Strict
        }
    }
}

/// Parses `filter` and assembles the query document without serializing it.
#[instrument(level = "debug", skip(resolver))]
pub fn build_query<R>(
    resolver: &R,
    scope: &str,
    filter: &str,
    options: &QueryOptions,
) -> Result<QueryEnvelope, TransformError>
where
    R: FieldResolver + ?Sized,
{
    let parsed = parse_filter_with(filter, scope, resolver, options.parse_mode())?;
    debug!(expr = ?parsed.expr, "parsed filter");
    assemble(
        &parsed.expr,
        &options.select,
        options.top,
        options.offset,
        scope,
        resolver,
    )
}

/// Translates an OData-style filter into a compact search query document.
///
/// ```
/// use odata_elk::{transform, FieldMappings, QueryOptions};
///
/// let mut mappings = FieldMappings::new();
/// mappings.insert("log_*", "name", "newName");
///
/// let document = transform(&mappings, "log_*", "name eq 'Naveen'", &QueryOptions::default()).unwrap();
/// assert_eq!(
///     document,
///     r#"{"query":{"match_phrase":{"newName":"Naveen"}},"size":500,"from":0,"_source":{"includes":["*"]}}"#
/// );
/// ```
pub fn transform<R>(
    resolver: &R,
    scope: &str,
    filter: &str,
    options: &QueryOptions,
) -> Result<String, TransformError>
where
    R: FieldResolver + ?Sized,
{
    run(resolver, scope, filter, options, |envelope| {
        serde_json::to_string(envelope)
    })
}

/// Same as [`transform`] with an indented document.
pub fn transform_pretty<R>(
    resolver: &R,
    scope: &str,
    filter: &str,
    options: &QueryOptions,
) -> Result<String, TransformError>
where
    R: FieldResolver + ?Sized,
{
    run(resolver, scope, filter, options, |envelope| {
        serde_json::to_string_pretty(envelope)
    })
}

fn run<R, F>(
    resolver: &R,
    scope: &str,
    filter: &str,
    options: &QueryOptions,
    serialize: F,
) -> Result<String, TransformError>
where
    R: FieldResolver + ?Sized,
    F: FnOnce(&QueryEnvelope) -> serde_json::Result<String>,
{
    let result = build_query(resolver, scope, filter, options)
        .and_then(|envelope| serialize(&envelope).map_err(TransformError::from));
    match &result {
        Ok(document) => debug!(document = %document, "generated query document"),
        Err(err) if err.is_user_error() => warn!(%err, filter, "rejected filter"),
        Err(err) => error!(?err, filter, "query generation failed"),
    }
    result
}
