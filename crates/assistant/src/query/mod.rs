//! Query API for UI consumption

mod tree;

pub use tree::{FolderNode, NavigationTree, build_navigation_tree, navigation_tree};
