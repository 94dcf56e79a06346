/// Prefix registry emitted at the top of every compiled statement.
///
/// Seeded with the fixed dialect prefixes; user additions take effect for
/// every subsequent compilation.
#[derive(Debug, Clone)]
pub struct PrefixRegistry {
    prefixes: Vec<(String, String)>,
}

/// Fixed prefixes every statement declares.
pub const FIXED_PREFIXES: &[(&str, &str)] = &[
    ("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
    ("rdfs", "http://www.w3.org/2000/01/rdf-schema#"),
    ("schema", "http://schema.org/"),
    ("foaf", "http://xmlns.com/foaf/0.1/"),
    ("dc", "http://purl.org/dc/terms/"),
    ("solid", "http://www.w3.org/ns/solid/terms#"),
    ("ldp", "http://www.w3.org/ns/ldp#"),
];

impl Default for PrefixRegistry {
    fn default() -> Self {
        Self {
            prefixes: FIXED_PREFIXES
                .iter()
                .map(|(p, u)| (p.to_string(), u.to_string()))
                .collect(),
        }
    }
}

impl PrefixRegistry {
    /// Register or replace a prefix.
    pub fn add(&mut self, prefix: impl Into<String>, uri: impl Into<String>) {
        let prefix = prefix.into();
        let uri = uri.into();
        match self.prefixes.iter_mut().find(|(p, _)| *p == prefix) {
            Some(entry) => entry.1 = uri,
            None => self.prefixes.push((prefix, uri)),
        }
    }

    pub fn get(&self, prefix: &str) -> Option<&str> {
        self.prefixes
            .iter()
            .find(|(p, _)| p == prefix)
            .map(|(_, u)| u.as_str())
    }

    /// `PREFIX` declaration block, one line per entry.
    pub fn header(&self) -> String {
        let mut out = String::new();
        for (prefix, uri) in &self.prefixes {
            out.push_str(&format!("PREFIX {prefix}: <{uri}>\n"));
        }
        out
    }
}
