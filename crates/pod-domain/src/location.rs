use crate::{
    Table,
    error::{DomainError, Result},
    table::is_absolute_iri,
};

/// Pod anchor derived from a webId: the origin plus the first path segment.
///
/// For `https://host/alice/profile/card#me` this is
/// `pod_base = "https://host"` and `user_path = "/alice/"`. All relative
/// container paths resolve under that anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PodLocation {
    pod_base: String,
    user_path: String,
}

impl PodLocation {
    pub fn from_web_id(web_id: &str) -> Result<Self> {
        let rest = web_id
            .split_once("://")
            .ok_or_else(|| DomainError::InvalidWebId(web_id.to_string()))?;
        let (scheme, remainder) = rest;
        let remainder = remainder.split(['#', '?']).next().unwrap_or(remainder);
        let (host, path) = match remainder.split_once('/') {
            Some((host, path)) => (host, path),
            None => (remainder, ""),
        };
        if host.is_empty() {
            return Err(DomainError::InvalidWebId(web_id.to_string()));
        }

        let user = path.split('/').next().unwrap_or("");
        let user_path = if user.is_empty() {
            "/".to_string()
        } else {
            format!("/{user}/")
        };

        Ok(Self {
            pod_base: format!("{scheme}://{host}"),
            user_path,
        })
    }

    pub fn pod_base(&self) -> &str {
        &self.pod_base
    }

    pub fn user_path(&self) -> &str {
        &self.user_path
    }

    /// Container holding the table's resource. Absolute container paths
    /// pass through untouched.
    pub fn container_url(&self, table: &Table) -> String {
        let path = table.container_path();
        if is_absolute_iri(path) {
            path.to_string()
        } else {
            format!(
                "{}{}{}",
                self.pod_base,
                self.user_path,
                path.trim_start_matches('/')
            )
        }
    }

    /// Turtle document of the table: `<container><name>.ttl`.
    pub fn resource_url(&self, table: &Table) -> String {
        format!("{}{}.ttl", self.container_url(table), table.name())
    }

    /// Subject IRI of a row: the container path without its trailing slash,
    /// a fragment separator, and the row id.
    pub fn subject_uri(&self, table: &Table, id: &str) -> String {
        let container = self.container_url(table);
        format!("{}#{id}", container.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Column;

    fn table() -> Table {
        Table::build("profiles", "/drizzle-tests/t1/", "http://schema.org/Person")
            .column(Column::string("id").primary_key())
            .finish()
            .unwrap()
    }

    #[test]
    fn derives_base_and_user_path() {
        let loc = PodLocation::from_web_id("https://pod.example/alice/profile/card#me").unwrap();
        assert_eq!(loc.pod_base(), "https://pod.example");
        assert_eq!(loc.user_path(), "/alice/");
    }

    #[test]
    fn rejects_relative_web_id() {
        assert!(PodLocation::from_web_id("alice/profile").is_err());
    }

    #[test]
    fn resource_and_subject_urls() {
        let loc = PodLocation::from_web_id("https://pod.example/alice/profile/card#me").unwrap();
        let table = table();
        assert_eq!(
            loc.container_url(&table),
            "https://pod.example/alice/drizzle-tests/t1/"
        );
        assert_eq!(
            loc.resource_url(&table),
            "https://pod.example/alice/drizzle-tests/t1/profiles.ttl"
        );
        assert_eq!(
            loc.subject_uri(&table, "p1"),
            "https://pod.example/alice/drizzle-tests/t1#p1"
        );
    }

    #[test]
    fn absolute_container_paths_pass_through() {
        let loc = PodLocation::from_web_id("https://pod.example/alice/card#me").unwrap();
        let table = Table::build("notes", "https://other.example/data/", "http://schema.org/Note")
            .column(Column::string("id").primary_key())
            .finish()
            .unwrap();
        assert_eq!(
            loc.resource_url(&table),
            "https://other.example/data/notes.ttl"
        );
    }
}
