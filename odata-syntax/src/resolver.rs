/// Maps a logical field name, within a scope such as an index prefix, to the
/// physical field name the search backend stores.
///
/// `None` is an ordinary answer meaning the name is not allowed in that
/// scope. Implementations must be deterministic for a given scope and name.
pub trait FieldResolver {
    fn resolve(&self, scope: &str, field: &str) -> Option<String>;
}

impl<F> FieldResolver for F
where
    F: Fn(&str, &str) -> Option<String>,
{
    fn resolve(&self, scope: &str, field: &str) -> Option<String> {
        self(scope, field)
    }
}
