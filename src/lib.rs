//! Translate OData-style `$filter` expressions into search query documents.
//!
//! A request goes through three steps: [`odata_syntax`] tokenizes and parses
//! the filter (resolving every field through a [`FieldResolver`]), the parsed
//! tree is lowered into query DSL nodes, and the result is wrapped with paging
//! and `_source` projection before it is serialized.

mod envelope;
mod error;
mod lower;
mod mappings;
mod transform;

pub use envelope::{QueryEnvelope, SELECT_ALL, SourceFilter, assemble, resolve_projection};
pub use error::{ErrorKind, FieldContext, TransformError};
pub use lower::{literal_value, lower_expr};
pub use mappings::FieldMappings;
pub use transform::{
    DEFAULT_OFFSET, DEFAULT_TOP, QueryOptions, build_query, transform, transform_pretty,
};

pub use odata_syntax::{
    CompareOp, Comparison, Expr, FieldResolver, Filter, Literal, ParseError, ParseMode,
};
