//! Effective authorization lookup
//!
//! A node's authorization is the first non-inheriting value found walking
//! from the node toward the root. A request's own setting is not consulted;
//! the walk starts at the folder that owns it. Folders with no auth set are
//! treated as inheriting, and the collection level turns both an unset
//! value and `InheritParent` into `None`.

use super::AuthConfig;
use crate::collection::{Collection, Folder, NodeKind, NodeRef, locate_kind};
use crate::error::DomainResult;

/// Resolves the authorization that applies to a node.
///
/// The result is never `InheritParent`.
///
/// # Errors
///
/// Returns `NodeNotFound` if no node of the given kind has this id.
pub fn try_resolve_auth(
    collection: &Collection,
    node_id: &str,
    kind: NodeKind,
) -> DomainResult<AuthConfig> {
    let (node, ancestors) = locate_kind(collection, node_id, kind)?;

    let mut chain: Vec<&Folder> = Vec::with_capacity(ancestors.len() + 1);
    if let NodeRef::Folder(folder) = node {
        chain.push(folder);
    }
    chain.extend(ancestors.into_iter().rev());

    Ok(resolve_chain(collection, &chain))
}

/// Resolves the authorization that applies to a node, falling back to the
/// collection's own setting when the node cannot be found.
#[must_use]
pub fn resolve_auth(collection: &Collection, node_id: &str, kind: NodeKind) -> AuthConfig {
    try_resolve_auth(collection, node_id, kind)
        .unwrap_or_else(|_| resolve_chain(collection, &[]))
}

fn resolve_chain(collection: &Collection, chain: &[&Folder]) -> AuthConfig {
    chain
        .iter()
        .filter_map(|folder| folder.auth.as_ref())
        .find(|auth| !auth.is_inherit())
        .or_else(|| collection.auth.as_ref().filter(|auth| !auth.is_inherit()))
        .cloned()
        .unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::request::Request;
    use pretty_assertions::assert_eq;

    fn request(id: &str) -> Request {
        let mut request = Request::new(id);
        request.id = id.to_string();
        request
    }

    fn folder(id: &str) -> Folder {
        let mut folder = Folder::new(id);
        folder.id = id.to_string();
        folder
    }

    #[test]
    fn test_request_uses_owning_folder() {
        let collection = Collection::new("api")
            .with_auth(AuthConfig::bearer("root"))
            .with_folder(
                folder("f1")
                    .with_auth(AuthConfig::basic("u", "p"))
                    .with_request(request("r1")),
            );

        assert_eq!(
            resolve_auth(&collection, "r1", NodeKind::Request),
            AuthConfig::basic("u", "p")
        );
    }

    #[test]
    fn test_request_own_auth_is_not_consulted() {
        let collection = Collection::new("api")
            .with_auth(AuthConfig::bearer("root"))
            .with_request(request("r1").with_auth(AuthConfig::basic("u", "p")));

        assert_eq!(
            resolve_auth(&collection, "r1", NodeKind::Request),
            AuthConfig::bearer("root")
        );
    }

    #[test]
    fn test_inheriting_folders_are_skipped() {
        let collection = Collection::new("api").with_folder(
            folder("outer")
                .with_auth(AuthConfig::bearer("outer"))
                .with_folder(
                    folder("middle")
                        .with_auth(AuthConfig::InheritParent)
                        .with_folder(folder("inner").with_request(request("r1"))),
                ),
        );

        assert_eq!(
            resolve_auth(&collection, "r1", NodeKind::Request),
            AuthConfig::bearer("outer")
        );
        assert_eq!(
            resolve_auth(&collection, "inner", NodeKind::Folder),
            AuthConfig::bearer("outer")
        );
    }

    #[test]
    fn test_folder_starts_with_itself() {
        let collection = Collection::new("api")
            .with_auth(AuthConfig::bearer("root"))
            .with_folder(folder("f1").with_auth(AuthConfig::None));

        assert_eq!(
            resolve_auth(&collection, "f1", NodeKind::Folder),
            AuthConfig::None
        );
    }

    #[test]
    fn test_collection_inherit_becomes_none() {
        let collection = Collection::new("api")
            .with_auth(AuthConfig::InheritParent)
            .with_request(request("r1"));

        assert_eq!(
            resolve_auth(&collection, "r1", NodeKind::Request),
            AuthConfig::None
        );
    }

    #[test]
    fn test_missing_node() {
        let collection = Collection::new("api").with_auth(AuthConfig::bearer("root"));

        assert!(try_resolve_auth(&collection, "ghost", NodeKind::Request).is_err());
        assert_eq!(
            resolve_auth(&collection, "ghost", NodeKind::Request),
            AuthConfig::bearer("root")
        );
    }

    #[test]
    fn test_kind_must_match() {
        let collection = Collection::new("api").with_folder(folder("f1"));
        assert!(try_resolve_auth(&collection, "f1", NodeKind::Request).is_err());
    }
}
