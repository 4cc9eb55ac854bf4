//! Tree node handles

use serde::{Deserialize, Serialize};

use super::model::Folder;
use crate::request::Request;

/// The kind of a node below the collection root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// A folder.
    Folder,
    /// A request.
    Request,
}

/// An owned node, used when inserting into a tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Node {
    /// A folder with its whole subtree.
    Folder(Folder),
    /// A single request.
    Request(Request),
}

impl Node {
    /// Returns the ID of this node.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Folder(f) => &f.id,
            Self::Request(r) => &r.id,
        }
    }

    /// Returns the name of this node.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Folder(f) => &f.name,
            Self::Request(r) => &r.name,
        }
    }

    /// Returns the kind of this node.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        match self {
            Self::Folder(_) => NodeKind::Folder,
            Self::Request(_) => NodeKind::Request,
        }
    }
}

impl From<Folder> for Node {
    fn from(folder: Folder) -> Self {
        Self::Folder(folder)
    }
}

impl From<Request> for Node {
    fn from(request: Request) -> Self {
        Self::Request(request)
    }
}

/// A borrowed node found in a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRef<'a> {
    /// A folder.
    Folder(&'a Folder),
    /// A request.
    Request(&'a Request),
}

impl<'a> NodeRef<'a> {
    /// Returns the ID of this node.
    #[must_use]
    pub fn id(&self) -> &'a str {
        match *self {
            Self::Folder(f) => &f.id,
            Self::Request(r) => &r.id,
        }
    }

    /// Returns the name of this node.
    #[must_use]
    pub fn name(&self) -> &'a str {
        match *self {
            Self::Folder(f) => &f.name,
            Self::Request(r) => &r.name,
        }
    }

    /// Returns the kind of this node.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        match self {
            Self::Folder(_) => NodeKind::Folder,
            Self::Request(_) => NodeKind::Request,
        }
    }

    /// Clones the node into an owned [`Node`].
    #[must_use]
    pub fn to_owned_node(&self) -> Node {
        match *self {
            Self::Folder(f) => Node::Folder(f.clone()),
            Self::Request(r) => Node::Request(r.clone()),
        }
    }
}
