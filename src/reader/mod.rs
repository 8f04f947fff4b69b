//! Contains interface for a tree-building FBX parser.

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use crate::error::Result;
use crate::tree::NodeList;

mod parser;

/// A wrapper around a seekable `std::io::Read` instance which decodes the
/// FBX node tree.
pub struct TreeReader<R: Read + Seek> {
    source: R,
}

impl<R: Read + Seek> TreeReader<R> {
    /// Creates a new reader, consuming the given stream.
    ///
    /// The stream must be positioned at the start of the FBX data.
    pub fn new(source: R) -> Self {
        TreeReader { source }
    }

    /// Decodes the whole document and returns its root node list.
    pub fn read_document(&mut self) -> Result<NodeList> {
        parser::read_magic(&mut self.source)?;
        parser::read_node_list(&mut self.source)
    }

    /// Returns internal stream.
    pub fn into_inner(self) -> R {
        self.source
    }
}

/// Parses the FBX file at `path` and returns its root node list.
///
/// The file handle is released on every exit path, success or failure.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<NodeList> {
    let file = File::open(path)?;
    TreeReader::new(BufReader::new(file)).read_document()
}
