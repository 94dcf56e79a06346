use crate::{Value, vocab};

/// Semantic type of a column, driving literal formatting and result typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    String,
    Integer,
    Boolean,
    DateTime,
    Json,
    Object,
}

/// A single table column.
///
/// Columns are built standalone and attached to a table; the owning table
/// assigns the back reference and resolves the predicate when it is built.
#[derive(Debug, Clone)]
pub struct Column {
    name: String,
    column_type: ColumnType,
    predicate: Option<String>,
    reference_target: Option<String>,
    primary_key: bool,
    required: bool,
    default_value: Option<Value>,
    table: Option<String>,
}

impl Column {
    fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            predicate: None,
            reference_target: None,
            primary_key: false,
            required: false,
            default_value: None,
            table: None,
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::String)
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Integer)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Boolean)
    }

    pub fn datetime(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::DateTime)
    }

    pub fn json(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Json)
    }

    pub fn object(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Object)
    }

    /// Mark as the table's primary key. Primary keys are always required.
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.required = true;
        self
    }

    /// NOT NULL: the translator emits a plain BGP triple instead of OPTIONAL.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Explicit predicate IRI, overriding namespace and builtin defaults.
    pub fn predicate(mut self, iri: impl Into<String>) -> Self {
        self.predicate = Some(iri.into());
        self
    }

    /// Advisory reference target; numeric values of this column are
    /// formatted as `<target/N>` IRIs.
    pub fn references(mut self, target: impl Into<String>) -> Self {
        self.reference_target = Some(target.into());
        self
    }

    /// Value used on insert when the field is absent from the row.
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }

    pub fn is_primary_key(&self) -> bool {
        self.primary_key
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn reference_target(&self) -> Option<&str> {
        self.reference_target.as_deref()
    }

    pub fn default(&self) -> Option<&Value> {
        self.default_value.as_ref()
    }

    /// Name of the owning table, once attached.
    pub fn table_name(&self) -> Option<&str> {
        self.table.as_deref()
    }

    /// Resolved predicate IRI. Available after the owning table is built.
    pub fn predicate_iri(&self) -> &str {
        self.predicate
            .as_deref()
            .expect("column predicate is resolved when the table is built")
    }

    /// Predicate resolution order: explicit > namespace ⧺ name >
    /// builtin default > `http://example.org/<name>`.
    pub(crate) fn attach(&mut self, table: &str, namespace_uri: Option<&str>) {
        self.table = Some(table.to_string());
        if self.predicate.is_some() {
            return;
        }
        self.predicate = Some(match namespace_uri {
            Some(base) => format!("{base}{}", self.name),
            None => vocab::default_predicate(&self.name)
                .map(str::to_string)
                .unwrap_or_else(|| format!("{}{}", vocab::EXAMPLE_BASE, self.name)),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_key_implies_required() {
        let col = Column::string("id").primary_key();
        assert!(col.is_required());
    }

    #[test]
    fn explicit_predicate_wins_over_namespace() {
        let mut col = Column::string("name").predicate("http://example.com/fullName");
        col.attach("people", Some("http://example.com/ns#"));
        assert_eq!(col.predicate_iri(), "http://example.com/fullName");
    }

    #[test]
    fn namespace_wins_over_builtin() {
        let mut col = Column::string("name");
        col.attach("people", Some("http://example.com/ns#"));
        assert_eq!(col.predicate_iri(), "http://example.com/ns#name");
    }

    #[test]
    fn builtin_defaults_apply_without_namespace() {
        let mut name = Column::string("name");
        name.attach("people", None);
        assert_eq!(name.predicate_iri(), vocab::FOAF_NAME);

        let mut content = Column::string("content");
        content.attach("posts", None);
        assert_eq!(content.predicate_iri(), vocab::DC_DESCRIPTION);
    }

    #[test]
    fn unknown_fields_fall_back_to_example_org() {
        let mut col = Column::integer("age");
        col.attach("people", None);
        assert_eq!(col.predicate_iri(), "http://example.org/age");
    }
}
