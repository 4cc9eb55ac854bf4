//! Collections and the folder tree
//!
//! A collection owns its folders, which own their subfolders and requests.
//! The tree functions treat a collection as an immutable snapshot and
//! return a modified copy.

mod model;
mod node;
mod tree;

pub use model::{Collection, Folder, Variable};
pub use node::{Node, NodeKind, NodeRef};
pub use tree::{
    add_variable, ancestors, contains_id, find_folder, find_node, find_request, insert,
    locate_kind, record_response, remove, rename, set_auth, update_request,
};
