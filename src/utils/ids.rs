//! Graph identifier normalization
//!
//! Every node in a dump is referenced by `<markup id>_<source token>`, where the
//! source token is the input file name with `.`, `-` and `/` folded to `_`. The
//! token namespaces ids so several dumps can be loaded into one database.

/// Fold the characters that cannot appear in a Cypher variable name.
pub fn sanitize_source_token(source_name: &str) -> String {
    source_name.replace(['.', '-', '/'], "_")
}

/// Graph identifier for a local markup id.
///
/// Uniqueness within one file is the caller's responsibility (markup ids are
/// assumed unique in a well-formed document).
pub fn graph_id(local_id: &str, source_token: &str) -> String {
    format!("{}_{}", local_id, source_token)
}

/// The input a graph was built from: its display name and derived token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    name: String,
    token: String,
}

impl Source {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let token = sanitize_source_token(&name);
        Self { name, token }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn graph_id(&self, local_id: &str) -> String {
        graph_id(local_id, &self.token)
    }
}
