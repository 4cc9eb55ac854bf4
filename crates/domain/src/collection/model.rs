//! Collection, folder and variable types

use serde::{Deserialize, Serialize};

use crate::auth::AuthConfig;
use crate::id::generate_id;
use crate::request::Request;

/// A folder of requests and nested folders.
///
/// Parentage is implied by containment; folders hold no back-pointer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    /// Unique identifier
    pub id: String,
    /// Folder name
    pub name: String,
    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Authorization; unset behaves like `InheritParent`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthConfig>,
    /// Child folders
    #[serde(default)]
    pub folders: Vec<Self>,
    /// Child requests
    #[serde(default)]
    pub requests: Vec<Request>,
}

impl Folder {
    /// Creates a new empty folder.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
            description: None,
            auth: None,
            folders: Vec::new(),
            requests: Vec::new(),
        }
    }

    /// Appends a child folder.
    #[must_use]
    pub fn with_folder(mut self, folder: Self) -> Self {
        self.folders.push(folder);
        self
    }

    /// Appends a child request.
    #[must_use]
    pub fn with_request(mut self, request: Request) -> Self {
        self.requests.push(request);
        self
    }

    /// Sets the folder's authorization.
    #[must_use]
    pub fn with_auth(mut self, auth: AuthConfig) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Number of requests in this folder and all descendants.
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.requests.len() + self.folders.iter().map(Self::request_count).sum::<usize>()
    }

    /// Number of descendant folders.
    #[must_use]
    pub fn folder_count(&self) -> usize {
        self.folders.len() + self.folders.iter().map(Self::folder_count).sum::<usize>()
    }
}

/// A named value scoped to a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    /// Unique identifier
    pub id: String,
    /// Name referenced as `{{name}}`
    pub name: String,
    /// Value shared when the collection is exported
    #[serde(default)]
    pub initial_value: String,
    /// Value used for substitution
    #[serde(default)]
    pub current_value: String,
    /// Whether the variable takes part in substitution
    #[serde(default = "default_selected")]
    pub is_selected: bool,
}

const fn default_selected() -> bool {
    true
}

impl Variable {
    /// Creates a selected variable whose initial and current values match.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            id: generate_id(),
            name: name.into(),
            initial_value: value.clone(),
            current_value: value,
            is_selected: true,
        }
    }
}

/// A collection of requests organized in folders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    /// Unique identifier
    pub id: String,
    /// Collection name
    pub name: String,
    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Authorization; unset behaves like `None`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthConfig>,
    /// Collection variables, in display order
    #[serde(default)]
    pub variables: Vec<Variable>,
    /// Top-level folders
    #[serde(default)]
    pub folders: Vec<Folder>,
    /// Top-level requests
    #[serde(default)]
    pub requests: Vec<Request>,
}

impl Collection {
    /// Creates a new empty collection.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
            description: None,
            auth: None,
            variables: Vec::new(),
            folders: Vec::new(),
            requests: Vec::new(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the collection's authorization.
    #[must_use]
    pub fn with_auth(mut self, auth: AuthConfig) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Appends a variable.
    #[must_use]
    pub fn with_variable(mut self, variable: Variable) -> Self {
        self.variables.push(variable);
        self
    }

    /// Appends a top-level folder.
    #[must_use]
    pub fn with_folder(mut self, folder: Folder) -> Self {
        self.folders.push(folder);
        self
    }

    /// Appends a top-level request.
    #[must_use]
    pub fn with_request(mut self, request: Request) -> Self {
        self.requests.push(request);
        self
    }

    /// Looks up a variable by name.
    #[must_use]
    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.name == name)
    }

    /// Returns the total number of requests in the collection (recursive).
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.requests.len() + self.folders.iter().map(Folder::request_count).sum::<usize>()
    }

    /// Returns the total number of folders in the collection (recursive).
    #[must_use]
    pub fn folder_count(&self) -> usize {
        self.folders.len() + self.folders.iter().map(Folder::folder_count).sum::<usize>()
    }
}

impl Default for Collection {
    fn default() -> Self {
        Self::new("New Collection")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_collection_creation() {
        let collection = Collection::new("My API");
        assert_eq!(collection.name, "My API");
        assert!(collection.auth.is_none());
        assert_eq!(collection.request_count(), 0);
    }

    #[test]
    fn test_counts_are_recursive() {
        let collection = Collection::new("Test")
            .with_request(Request::new("Request 1"))
            .with_folder(
                Folder::new("Users")
                    .with_request(Request::new("Get Users"))
                    .with_folder(Folder::new("Admin").with_request(Request::new("Ban"))),
            );

        assert_eq!(collection.request_count(), 3);
        assert_eq!(collection.folder_count(), 2);
    }

    #[test]
    fn test_variable_defaults_to_selected() {
        let variable: Variable =
            serde_json::from_str(r#"{"id": "v1", "name": "host", "currentValue": "api.test"}"#)
                .unwrap_or_else(|e| unreachable!("{e}"));
        assert!(variable.is_selected);
        assert_eq!(variable.initial_value, "");
        assert_eq!(variable.current_value, "api.test");
    }
}
