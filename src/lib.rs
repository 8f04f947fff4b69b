//! This crate provides a tree reader for FBX binary.
//!
//! FBX data consists of generic nodes and node properties, and it requires
//! interpretation to use as 3D contents; in the same way XML carries COLLADA
//! without being COLLADA, the node tree carries meshes and bones without
//! knowing about them. This crate is the XML-reader side of that analogy,
//! not the importer.
//!
//! The reader decodes the whole node hierarchy into an owned tree: a list
//! of named nodes, each carrying its properties and an optional nested
//! list of children. Scalar property values are decoded and kept on the
//! node; array, string and raw payloads are skipped by their encoded
//! length and never materialized (compressed arrays are not inflated).
//!
//! This crate is specialized to read FBX binary format and would *NOT* implement FBX ASCII
//! reader or FBX writer.
//!
//! ```no_run
//! let root = fbx_tree_reader::parse_file("scene.fbx").expect("cannot parse FBX");
//! for node in &root {
//!     println!("{} ({} properties)", node.name, node.properties.len());
//! }
//! ```

pub use crate::error::{Error, Result};
pub use crate::property::{ArrayHeader, Property};
pub use crate::reader::{parse_file, TreeReader};
pub use crate::tree::{Node, NodeList};

pub mod error;
pub mod property;
pub mod reader;
pub mod tree;
