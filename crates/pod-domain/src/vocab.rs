//! Well-known vocabulary IRIs used for default predicate mapping.

/// `foaf:name`
pub const FOAF_NAME: &str = "http://xmlns.com/foaf/0.1/name";

/// `foaf:mbox`
pub const FOAF_MBOX: &str = "http://xmlns.com/foaf/0.1/mbox";

/// `foaf:homepage`
pub const FOAF_HOMEPAGE: &str = "http://xmlns.com/foaf/0.1/homepage";

/// `dc:title`
pub const DC_TITLE: &str = "http://purl.org/dc/terms/title";

/// `dc:description`
pub const DC_DESCRIPTION: &str = "http://purl.org/dc/terms/description";

/// `schema:dateCreated`
pub const SCHEMA_DATE_CREATED: &str = "http://schema.org/dateCreated";

/// `schema:dateModified`
pub const SCHEMA_DATE_MODIFIED: &str = "http://schema.org/dateModified";

/// Fallback predicate base for fields with no namespace or builtin mapping
pub const EXAMPLE_BASE: &str = "http://example.org/";

/// Built-in default predicate for common field names.
///
/// Consulted only when the column has no explicit predicate and the table
/// has no namespace.
pub fn default_predicate(field: &str) -> Option<&'static str> {
    match field {
        "name" => Some(FOAF_NAME),
        "title" => Some(DC_TITLE),
        "description" | "content" => Some(DC_DESCRIPTION),
        "createdAt" => Some(SCHEMA_DATE_CREATED),
        "updatedAt" => Some(SCHEMA_DATE_MODIFIED),
        "email" => Some(FOAF_MBOX),
        "url" | "homepage" => Some(FOAF_HOMEPAGE),
        _ => None,
    }
}
