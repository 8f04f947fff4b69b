//! Contains implementations of the FBX decode internals.

use std::io::{Read, Seek, SeekFrom};

use byteorder::{LittleEndian, ReadBytesExt};
use log::{debug, warn};

use crate::error::{Error, Result};
use crate::property::read_property;
use crate::tree::{Node, NodeList};

/// Absolute stream offset of the first node record.
const FIRST_RECORD_OFFSET: u64 = 27;

const MAGIC: &[u8; 20] = b"Kaydara FBX Binary  ";

/// Reads and validates the file header, leaving the stream at the first
/// node record.
///
/// Returns the FBX version stored in the header.
pub fn read_magic<R: Read + Seek>(reader: &mut R) -> Result<i32> {
    {
        // 20 bytes of magic plus one ignored byte.
        let mut magic = [0_u8; 21];
        reader
            .read_exact(&mut magic)
            .map_err(|_| Error::InvalidMagic)?;
        if magic[..20] != MAGIC[..] {
            return Err(Error::InvalidMagic);
        }
    }
    {
        // Unknown bytes, but all observed files show [0x1a, 0x00],
        // see https://code.blender.org/2013/08/fbx-binary-file-format-specification/ .
        let mut buffer = [0_u8; 2];
        reader.read_exact(&mut buffer)?;
        if buffer != [0x1a, 0x00] {
            warn!(
                "Expected [26, 0] right after magic binary, but got {:?}",
                buffer
            );
        }
    }
    let version = reader.read_i32::<LittleEndian>()?;
    debug!("magic binary read, FBX binary (version={})", version);
    reader.seek(SeekFrom::Start(FIRST_RECORD_OFFSET))?;
    Ok(version)
}

/// A header of a node record.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct NodeRecordHeader {
    /// Position of the end of the node.
    end_offset: u32,
    /// Number of the properties the node has.
    num_properties: u32,
    /// Byte size of properties of the node in the FBX stream.
    property_byte_len: u32,
    /// Byte size of the node name.
    name_len: u8,
}

impl NodeRecordHeader {
    /// Constructs `NodeRecordHeader` from the given stream.
    ///
    /// A sentinel record is encoded as an `end_offset` of 0; it is
    /// recognized from those 4 bytes alone, with no further fields read,
    /// and yields `None`.
    fn read_from<R: Read>(reader: &mut R) -> Result<Option<Self>> {
        let end_offset = reader.read_u32::<LittleEndian>()?;
        if end_offset == 0 {
            return Ok(None);
        }
        let num_properties = reader.read_u32::<LittleEndian>()?;
        let property_byte_len = reader.read_u32::<LittleEndian>()?;
        let name_len = reader.read_u8()?;
        Ok(Some(NodeRecordHeader {
            end_offset,
            num_properties,
            property_byte_len,
            name_len,
        }))
    }
}

/// Reads one node record without its children.
///
/// Returns `Ok(None)` for the sentinel record that terminates a sibling
/// list. `children` is left empty; nesting is decided by the caller from
/// the stream position.
fn read_node<R: Read + Seek>(reader: &mut R) -> Result<Option<Node>> {
    let header = match NodeRecordHeader::read_from(reader)? {
        Some(header) => header,
        None => return Ok(None),
    };

    let name = {
        let mut buf = vec![0_u8; usize::from(header.name_len)];
        reader.read_exact(&mut buf)?;
        String::from_utf8(buf)?
    };

    let mut properties = Vec::new();
    for _ in 0..header.num_properties {
        properties.push(read_property(reader)?);
    }

    Ok(Some(Node {
        end_offset: header.end_offset,
        num_properties: header.num_properties,
        property_byte_len: header.property_byte_len,
        name,
        properties,
        children: None,
    }))
}

/// Decodes one sibling level of the node tree.
///
/// The level ends at the sentinel record or at end of stream. A
/// structurally broken record also ends the level, keeping the nodes
/// decoded so far; only an allocation failure or an I/O failure while
/// repositioning propagates as `Err`.
pub fn read_node_list<R: Read + Seek>(reader: &mut R) -> Result<NodeList> {
    let mut list = NodeList::create(0)?;
    loop {
        let mut node = match read_node(reader) {
            Ok(Some(node)) => node,
            Ok(None) => break,
            Err(Error::UnexpectedEof) => {
                debug!("node list ended at EOF without a sentinel record");
                break;
            },
            Err(err) => {
                warn!("node list cut short by a malformed record: {}", err);
                break;
            },
        };

        // A node whose record ends beyond the current position owns the
        // bytes up to `end_offset`: exactly one nested node list plus its
        // end marker.
        if reader.stream_position()? < u64::from(node.end_offset) {
            node.children = Some(read_node_list(reader)?);
            // Mandatory reseek: the child decode may stop early on
            // malformed input, which would desynchronize the siblings
            // that follow.
            reader.seek(SeekFrom::Start(u64::from(node.end_offset)))?;
        }
        list.insert(node)?;
    }
    list.shrink_to_fit();
    Ok(list)
}
