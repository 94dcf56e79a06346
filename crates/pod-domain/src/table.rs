use crate::{
    Column,
    error::{DomainError, Result},
};

/// Prefix/URI pair used as the default predicate base for a table.
#[derive(Debug, Clone)]
pub struct Namespace {
    pub prefix: String,
    pub uri: String,
}

/// A registered table: an ordered set of columns bound to an RDF class and
/// a container path inside the Pod.
///
/// Tables are immutable after construction.
#[derive(Debug, Clone)]
pub struct Table {
    name: String,
    columns: Vec<Column>,
    container_path: String,
    rdf_class: String,
    namespace: Option<Namespace>,
    auto_register: bool,
}

impl Table {
    /// Start building a table. `container_path` is normalized to end with
    /// `/`; `rdf_class` must be an absolute IRI.
    pub fn build(
        name: impl Into<String>,
        container_path: impl Into<String>,
        rdf_class: impl Into<String>,
    ) -> TableBuilder {
        TableBuilder {
            name: name.into(),
            container_path: container_path.into(),
            rdf_class: rdf_class.into(),
            columns: Vec::new(),
            namespace: None,
            auto_register: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    /// Columns that map to triples, i.e. everything except the id column.
    pub fn data_columns(&self) -> impl Iterator<Item = &Column> {
        let id = self.id_column_name().to_string();
        self.columns.iter().filter(move |c| c.name() != id)
    }

    pub fn container_path(&self) -> &str {
        &self.container_path
    }

    pub fn rdf_class(&self) -> &str {
        &self.rdf_class
    }

    pub fn namespace(&self) -> Option<&Namespace> {
        self.namespace.as_ref()
    }

    pub fn auto_register(&self) -> bool {
        self.auto_register
    }

    pub fn primary_key(&self) -> Option<&Column> {
        self.columns.iter().find(|c| c.is_primary_key())
    }

    /// Field that carries the row identity: the primary key if one is
    /// declared, otherwise the conventional `id`.
    pub fn id_column_name(&self) -> &str {
        self.primary_key().map(|c| c.name()).unwrap_or("id")
    }
}

/// Builder for [`Table`]; validation happens in [`TableBuilder::finish`].
#[derive(Debug)]
pub struct TableBuilder {
    name: String,
    container_path: String,
    rdf_class: String,
    columns: Vec<Column>,
    namespace: Option<Namespace>,
    auto_register: bool,
}

impl TableBuilder {
    /// Default predicate base applied to columns without an explicit
    /// predicate.
    pub fn namespace(mut self, prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        self.namespace = Some(Namespace {
            prefix: prefix.into(),
            uri: uri.into(),
        });
        self
    }

    /// Hint for external registries; not consulted by the query layer.
    pub fn auto_register(mut self, enable: bool) -> Self {
        self.auto_register = enable;
        self
    }

    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    pub fn finish(self) -> Result<Table> {
        let TableBuilder {
            name,
            mut container_path,
            rdf_class,
            mut columns,
            namespace,
            auto_register,
        } = self;

        if !is_absolute_iri(&rdf_class) {
            return Err(DomainError::RelativeClassIri(rdf_class));
        }
        if !container_path.ends_with('/') {
            container_path.push('/');
        }
        if columns.iter().filter(|c| c.is_primary_key()).count() > 1 {
            return Err(DomainError::MultiplePrimaryKeys(name));
        }

        let namespace_uri = namespace.as_ref().map(|ns| ns.uri.clone());
        for column in &mut columns {
            column.attach(&name, namespace_uri.as_deref());
        }

        Ok(Table {
            name,
            columns,
            container_path,
            rdf_class,
            namespace,
            auto_register,
        })
    }
}

pub(crate) fn is_absolute_iri(iri: &str) -> bool {
    iri.contains("://") || iri.starts_with("urn:") || iri.starts_with("did:")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn container_path_gets_trailing_slash() {
        let table = Table::build("profiles", "/tests/t1", "http://schema.org/Person")
            .column(Column::string("id").primary_key())
            .finish()
            .unwrap();
        assert_eq!(table.container_path(), "/tests/t1/");
    }

    #[test]
    fn rejects_relative_class() {
        let err = Table::build("profiles", "/tests/", "Person").finish();
        assert!(matches!(err, Err(DomainError::RelativeClassIri(_))));
    }

    #[test]
    fn rejects_two_primary_keys() {
        let err = Table::build("profiles", "/tests/", "http://schema.org/Person")
            .column(Column::string("id").primary_key())
            .column(Column::string("other").primary_key())
            .finish();
        assert!(matches!(err, Err(DomainError::MultiplePrimaryKeys(_))));
    }

    #[test]
    fn id_column_defaults_to_primary_key() {
        let table = Table::build("profiles", "/tests/", "http://schema.org/Person")
            .column(Column::string("key").primary_key())
            .column(Column::string("name"))
            .finish()
            .unwrap();
        assert_eq!(table.id_column_name(), "key");
        assert_eq!(table.data_columns().count(), 1);
    }
}
