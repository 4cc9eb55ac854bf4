//! Tree operations over collection snapshots.
//!
//! Every mutating operation takes the current snapshot by reference and
//! returns a new one; the input is never modified. Lookups are depth-first,
//! visiting each folder before its sibling requests. Ancestor chains are
//! recomputed by searching from the root since nodes keep no parent links.

use std::collections::HashSet;

use super::model::{Collection, Folder, Variable};
use super::node::{Node, NodeKind, NodeRef};
use crate::auth::AuthConfig;
use crate::error::{DomainError, DomainResult};
use crate::request::{Request, ResponseEntry};

/// Finds a folder or request by id.
///
/// # Errors
///
/// Returns `NodeNotFound` if no node has this id.
pub fn find_node<'a>(collection: &'a Collection, id: &str) -> DomainResult<NodeRef<'a>> {
    locate(collection, id).map(|(node, _)| node)
}

/// Finds a request by id.
///
/// # Errors
///
/// Returns `NodeNotFound` if no request has this id.
pub fn find_request<'a>(collection: &'a Collection, id: &str) -> DomainResult<&'a Request> {
    match find_node(collection, id)? {
        NodeRef::Request(request) => Ok(request),
        NodeRef::Folder(_) => Err(DomainError::NodeNotFound(id.to_string())),
    }
}

/// Finds a folder by id.
///
/// # Errors
///
/// Returns `NodeNotFound` if no folder has this id.
pub fn find_folder<'a>(collection: &'a Collection, id: &str) -> DomainResult<&'a Folder> {
    match find_node(collection, id)? {
        NodeRef::Folder(folder) => Ok(folder),
        NodeRef::Request(_) => Err(DomainError::NodeNotFound(id.to_string())),
    }
}

/// Finds a node of the given kind together with its ancestor folders.
///
/// The chain runs from the top-level folder down to the folder that directly
/// contains the node; it is empty for top-level nodes and never includes the
/// node itself.
///
/// # Errors
///
/// Returns `NodeNotFound` if no node of that kind has this id.
pub fn locate_kind<'a>(
    collection: &'a Collection,
    id: &str,
    kind: NodeKind,
) -> DomainResult<(NodeRef<'a>, Vec<&'a Folder>)> {
    let (node, chain) = locate(collection, id)?;
    if node.kind() == kind {
        Ok((node, chain))
    } else {
        Err(DomainError::NodeNotFound(id.to_string()))
    }
}

/// Returns the ancestor folders of a node, outermost first.
///
/// # Errors
///
/// Returns `NodeNotFound` if no node has this id.
pub fn ancestors<'a>(collection: &'a Collection, id: &str) -> DomainResult<Vec<&'a Folder>> {
    locate(collection, id).map(|(_, chain)| chain)
}

/// Returns true if any folder or request uses this id.
#[must_use]
pub fn contains_id(collection: &Collection, id: &str) -> bool {
    locate(collection, id).is_ok()
}

/// Inserts a node under a folder, or at the top level when `parent_id` is
/// `None` or the collection's own id.
///
/// # Errors
///
/// - `NodeNotFound` if the parent does not exist
/// - `NotAContainer` if the parent is a request
/// - `DuplicateId` if the node or one of its descendants reuses an existing id
pub fn insert(
    collection: &Collection,
    parent_id: Option<&str>,
    node: Node,
) -> DomainResult<Collection> {
    check_fresh_ids(collection, &node)?;

    let mut next = collection.clone();
    let (folders, requests) = match parent_id {
        None => (&mut next.folders, &mut next.requests),
        Some(pid) if pid == collection.id => (&mut next.folders, &mut next.requests),
        Some(pid) => {
            if let Some(parent) = folder_mut(&mut next.folders, pid) {
                (&mut parent.folders, &mut parent.requests)
            } else if find_request(collection, pid).is_ok() {
                return Err(DomainError::NotAContainer(pid.to_string()));
            } else {
                return Err(DomainError::NodeNotFound(pid.to_string()));
            }
        }
    };

    match node {
        Node::Folder(folder) => folders.push(folder),
        Node::Request(request) => requests.push(request),
    }
    Ok(next)
}

/// Removes a node and everything below it.
///
/// # Errors
///
/// Returns `NodeNotFound` if no node has this id.
pub fn remove(collection: &Collection, id: &str) -> DomainResult<Collection> {
    let mut next = collection.clone();
    if remove_from(&mut next.folders, &mut next.requests, id) {
        Ok(next)
    } else {
        Err(DomainError::NodeNotFound(id.to_string()))
    }
}

/// Renames a folder, a request, or the collection itself.
///
/// # Errors
///
/// Returns `NodeNotFound` if no node has this id.
pub fn rename(collection: &Collection, id: &str, name: &str) -> DomainResult<Collection> {
    let mut next = collection.clone();
    if id == collection.id {
        next.name = name.to_string();
    } else if let Some(folder) = folder_mut(&mut next.folders, id) {
        folder.name = name.to_string();
    } else if let Some(request) = request_mut(&mut next.folders, &mut next.requests, id) {
        request.name = name.to_string();
    } else {
        return Err(DomainError::NodeNotFound(id.to_string()));
    }
    Ok(next)
}

/// Replaces the request with the same id by an edited copy.
///
/// # Errors
///
/// Returns `NodeNotFound` if no request has this id.
pub fn update_request(collection: &Collection, request: Request) -> DomainResult<Collection> {
    let mut next = collection.clone();
    let slot = request_mut(&mut next.folders, &mut next.requests, &request.id)
        .ok_or_else(|| DomainError::NodeNotFound(request.id.clone()))?;
    *slot = request;
    Ok(next)
}

/// Sets the authorization of a folder, a request, or the collection itself.
///
/// # Errors
///
/// Returns `NodeNotFound` if no node has this id.
pub fn set_auth(collection: &Collection, node_id: &str, auth: AuthConfig) -> DomainResult<Collection> {
    let mut next = collection.clone();
    if node_id == collection.id {
        next.auth = Some(auth);
    } else if let Some(folder) = folder_mut(&mut next.folders, node_id) {
        folder.auth = Some(auth);
    } else if let Some(request) = request_mut(&mut next.folders, &mut next.requests, node_id) {
        request.auth = auth;
    } else {
        return Err(DomainError::NodeNotFound(node_id.to_string()));
    }
    Ok(next)
}

/// Appends a variable.
///
/// # Errors
///
/// Returns `DuplicateVariable` if the name is already taken.
pub fn add_variable(collection: &Collection, variable: Variable) -> DomainResult<Collection> {
    if collection.variable(&variable.name).is_some() {
        return Err(DomainError::DuplicateVariable(variable.name));
    }
    let mut next = collection.clone();
    next.variables.push(variable);
    Ok(next)
}

/// Appends a response to a request's informational cache.
///
/// # Errors
///
/// Returns `NodeNotFound` if no request has this id.
pub fn record_response(
    collection: &Collection,
    request_id: &str,
    entry: ResponseEntry,
) -> DomainResult<Collection> {
    let mut next = collection.clone();
    request_mut(&mut next.folders, &mut next.requests, request_id)
        .ok_or_else(|| DomainError::NodeNotFound(request_id.to_string()))?
        .push_response(entry);
    Ok(next)
}

fn locate<'a>(
    collection: &'a Collection,
    id: &str,
) -> DomainResult<(NodeRef<'a>, Vec<&'a Folder>)> {
    let mut chain = Vec::new();
    search(&collection.folders, &collection.requests, id, &mut chain)
        .map(|node| (node, chain))
        .ok_or_else(|| DomainError::NodeNotFound(id.to_string()))
}

fn search<'a>(
    folders: &'a [Folder],
    requests: &'a [Request],
    id: &str,
    chain: &mut Vec<&'a Folder>,
) -> Option<NodeRef<'a>> {
    for folder in folders {
        if folder.id == id {
            return Some(NodeRef::Folder(folder));
        }
        chain.push(folder);
        if let Some(found) = search(&folder.folders, &folder.requests, id, chain) {
            return Some(found);
        }
        chain.pop();
    }
    requests.iter().find(|r| r.id == id).map(NodeRef::Request)
}

fn folder_mut<'a>(folders: &'a mut [Folder], id: &str) -> Option<&'a mut Folder> {
    for folder in folders.iter_mut() {
        if folder.id == id {
            return Some(folder);
        }
        if let Some(found) = folder_mut(&mut folder.folders, id) {
            return Some(found);
        }
    }
    None
}

fn request_mut<'a>(
    folders: &'a mut [Folder],
    requests: &'a mut [Request],
    id: &str,
) -> Option<&'a mut Request> {
    for folder in folders.iter_mut() {
        if let Some(found) = request_mut(&mut folder.folders, &mut folder.requests, id) {
            return Some(found);
        }
    }
    requests.iter_mut().find(|r| r.id == id)
}

fn remove_from(folders: &mut Vec<Folder>, requests: &mut Vec<Request>, id: &str) -> bool {
    if let Some(pos) = folders.iter().position(|f| f.id == id) {
        folders.remove(pos);
        return true;
    }
    if let Some(pos) = requests.iter().position(|r| r.id == id) {
        requests.remove(pos);
        return true;
    }
    folders
        .iter_mut()
        .any(|f| remove_from(&mut f.folders, &mut f.requests, id))
}

fn check_fresh_ids(collection: &Collection, node: &Node) -> DomainResult<()> {
    let mut ids = Vec::new();
    match node {
        Node::Folder(folder) => collect_ids(folder, &mut ids),
        Node::Request(request) => ids.push(request.id.as_str()),
    }

    let mut seen = HashSet::new();
    for id in ids {
        if id == collection.id || !seen.insert(id) || contains_id(collection, id) {
            return Err(DomainError::DuplicateId(id.to_string()));
        }
    }
    Ok(())
}

fn collect_ids<'a>(folder: &'a Folder, ids: &mut Vec<&'a str>) {
    ids.push(&folder.id);
    for child in &folder.folders {
        collect_ids(child, ids);
    }
    ids.extend(folder.requests.iter().map(|r| r.id.as_str()));
}
