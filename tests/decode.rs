//! End-to-end decoding tests over synthetic FBX documents.

use std::io::{Cursor, Write};

use fbx_tree_reader::{parse_file, Error, NodeList, Property, TreeReader};

/// Returns the fixed 27-byte FBX file header: magic, one ignored byte,
/// the two reserved bytes and a version field.
fn fbx_header() -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend_from_slice(b"Kaydara FBX Binary  \0");
    buf.extend_from_slice(&[0x1a, 0x00]);
    buf.extend_from_slice(&7400_u32.to_le_bytes());
    assert_eq!(buf.len(), 27);
    buf
}

/// Appends a node record to `buf`, patching `end_offset` afterwards.
///
/// `children` appends the nested records and must include their
/// terminating sentinel. `buf` must hold the stream from position 0 so
/// that `end_offset` comes out absolute.
fn append_node<F>(buf: &mut Vec<u8>, name: &str, num_properties: u32, props: &[u8], children: F)
where
    F: FnOnce(&mut Vec<u8>),
{
    let header_at = buf.len();
    buf.extend_from_slice(&[0_u8; 4]);
    buf.extend_from_slice(&num_properties.to_le_bytes());
    buf.extend_from_slice(&(props.len() as u32).to_le_bytes());
    buf.push(name.len() as u8);
    buf.extend_from_slice(name.as_bytes());
    buf.extend_from_slice(props);
    children(buf);
    let end_offset = buf.len() as u32;
    buf[header_at..header_at + 4].copy_from_slice(&end_offset.to_le_bytes());
}

fn i32_prop(value: i32) -> Vec<u8> {
    let mut buf = vec![b'I'];
    buf.extend_from_slice(&value.to_le_bytes());
    buf
}

fn decode(buf: Vec<u8>) -> NodeList {
    TreeReader::new(Cursor::new(buf)).read_document().unwrap()
}

#[test]
fn test_empty_document() {
    let mut buf = fbx_header();
    buf.extend_from_slice(&[0_u8; 4]);

    let root = decode(buf);
    assert!(root.is_empty());
}

#[test]
fn test_single_root_node() {
    let mut buf = fbx_header();
    append_node(&mut buf, "Root", 1, &i32_prop(42), |_| {});
    let expected_end = buf.len() as u32;
    buf.extend_from_slice(&[0_u8; 4]);

    let root = decode(buf);
    assert_eq!(root.len(), 1);
    let node = &root[0];
    assert_eq!(node.name, "Root");
    assert_eq!(node.end_offset, expected_end);
    assert_eq!(node.num_properties, 1);
    assert_eq!(node.property_byte_len, 5);
    assert_eq!(node.properties, vec![Property::I32(42)]);
    assert!(node.children.is_none());
}

#[test]
fn test_nested_list_then_sibling() {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut buf = fbx_header();
    append_node(&mut buf, "Objects", 0, &[], |buf| {
        append_node(buf, "Model", 1, &i32_prop(1), |_| {});
        append_node(buf, "Model", 1, &i32_prop(2), |_| {});
        buf.extend_from_slice(&[0_u8; 4]);
    });
    append_node(&mut buf, "Connections", 0, &[], |_| {});
    buf.extend_from_slice(&[0_u8; 4]);

    let root = decode(buf);
    assert_eq!(root.len(), 2);
    assert_eq!(root[0].name, "Objects");
    assert_eq!(root[1].name, "Connections");
    assert!(root[1].children.is_none());

    let models = root[0].children.as_ref().unwrap();
    assert_eq!(models.len(), 2);
    assert_eq!(models[0].properties, vec![Property::I32(1)]);
    assert_eq!(models[1].properties, vec![Property::I32(2)]);
    assert_eq!(root.find("Connections").unwrap().end_offset, root[1].end_offset);
}

#[test]
fn test_array_and_string_properties_are_metadata_only() {
    let mut props = vec![b'd'];
    props.extend_from_slice(&4_u32.to_le_bytes());
    props.extend_from_slice(&0_u32.to_le_bytes());
    props.extend_from_slice(&32_u32.to_le_bytes());
    props.extend_from_slice(&[0x11; 32]);
    props.push(b'S');
    props.extend_from_slice(&6_u32.to_le_bytes());
    props.extend_from_slice(b"Scene\0");

    let mut buf = fbx_header();
    append_node(&mut buf, "Geometry", 2, &props, |_| {});
    buf.extend_from_slice(&[0_u8; 4]);

    let root = decode(buf);
    assert_eq!(root.len(), 1);
    let node = &root[0];
    assert_eq!(node.properties.len(), 2);
    match node.properties[0] {
        Property::F64Array(header) => {
            assert_eq!(header.num_elements, 4);
            assert_eq!(header.encoding, 0);
            assert_eq!(header.compressed_length, 32);
            assert_eq!(header.encoded_len(8), 32);
        },
        ref other => panic!("expected f64 array metadata, got {:?}", other),
    }
    assert_eq!(node.properties[1], Property::String { byte_len: 6 });
}

#[test]
fn test_idempotent_decoding() {
    let mut buf = fbx_header();
    append_node(&mut buf, "A", 1, &i32_prop(10), |buf| {
        append_node(buf, "B", 0, &[], |buf| {
            append_node(buf, "C", 1, &i32_prop(30), |_| {});
            buf.extend_from_slice(&[0_u8; 4]);
        });
        buf.extend_from_slice(&[0_u8; 4]);
    });
    append_node(&mut buf, "D", 0, &[], |_| {});
    buf.extend_from_slice(&[0_u8; 4]);

    let first = decode(buf.clone());
    let second = decode(buf);
    assert_eq!(first, second);
}

#[test]
fn test_missing_sentinel_is_tolerated() {
    // The root level simply ends at EOF.
    let mut buf = fbx_header();
    append_node(&mut buf, "Only", 0, &[], |_| {});

    let root = decode(buf);
    assert_eq!(root.len(), 1);
    assert_eq!(root[0].name, "Only");
}

#[test]
fn test_invalid_magic() {
    let mut buf = b"Kaydara FBX Birnay  \0".to_vec();
    buf.extend_from_slice(&[0_u8; 10]);
    match TreeReader::new(Cursor::new(buf)).read_document() {
        Err(Error::InvalidMagic) => {},
        other => panic!("expected invalid magic, got {:?}", other),
    }

    // A file shorter than the magic is not a recognized container either.
    match TreeReader::new(Cursor::new(b"Kaydara".to_vec())).read_document() {
        Err(Error::InvalidMagic) => {},
        other => panic!("expected invalid magic, got {:?}", other),
    }
}

#[test]
fn test_parse_file_round_trip() {
    let mut buf = fbx_header();
    append_node(&mut buf, "Root", 1, &i32_prop(42), |_| {});
    buf.extend_from_slice(&[0_u8; 4]);

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&buf).unwrap();
    file.flush().unwrap();

    let from_file = parse_file(file.path()).unwrap();
    let from_memory = decode(buf);
    assert_eq!(from_file, from_memory);
}

#[test]
fn test_parse_file_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("does-not-exist.fbx");
    match parse_file(&missing) {
        Err(Error::Io(err)) => assert_eq!(err.kind(), std::io::ErrorKind::NotFound),
        other => panic!("expected I/O error, got {:?}", other),
    }
}
