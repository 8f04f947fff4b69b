//! Contains node property related stuff.

use std::io::{Read, Seek, SeekFrom};

use byteorder::{LittleEndian, ReadBytesExt};
use log::{error, warn};

use crate::error::{Error, Result};

/// A single decoded node property.
///
/// Scalar variants own their decoded value. Array variants own only the
/// array header; string and raw-binary variants own only their byte
/// length. Payloads of the latter kinds are skipped in the stream, never
/// materialized, and compressed arrays are skipped by their encoded length
/// without being inflated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Property {
    /// Boolean.
    Bool(bool),
    /// 2-byte signed integer.
    I16(i16),
    /// 4-byte signed integer.
    I32(i32),
    /// 8-byte signed integer.
    I64(i64),
    /// 4-byte single-precision IEEE 754 floating-point number.
    F32(f32),
    /// 8-byte double-precision IEEE 754 floating-point number.
    F64(f64),
    /// String; only the byte length is kept.
    String {
        byte_len: u32,
    },
    /// Raw binary; only the byte length is kept.
    Binary {
        byte_len: u32,
    },
    /// Array of boolean.
    BoolArray(ArrayHeader),
    /// Array of 4-byte signed integer.
    I32Array(ArrayHeader),
    /// Array of 8-byte signed integer.
    I64Array(ArrayHeader),
    /// Array of 4-byte single-precision IEEE 754 number.
    F32Array(ArrayHeader),
    /// Array of 8-byte double-precision IEEE 754 number.
    F64Array(ArrayHeader),
}

/// Header of array type property value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrayHeader {
    /// Number of values in the array, *NOT byte size*.
    pub num_elements: u32,
    /// Denotes whether data in stream is plain (0), or compressed (any
    /// other value).
    pub encoding: u32,
    /// Byte size of the compressed array value in the stream.
    pub compressed_length: u32,
}

impl ArrayHeader {
    /// Constructs `ArrayHeader` from the given stream.
    fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let num_elements = reader.read_u32::<LittleEndian>()?;
        let encoding = reader.read_u32::<LittleEndian>()?;
        let compressed_length = reader.read_u32::<LittleEndian>()?;
        Ok(ArrayHeader {
            num_elements,
            encoding,
            compressed_length,
        })
    }

    /// Byte span of the encoded payload in the stream.
    ///
    /// `element_size` is the byte width of one raw element; a compressed
    /// payload occupies exactly `compressed_length` bytes.
    pub fn encoded_len(&self, element_size: u32) -> u64 {
        if self.encoding == 0 {
            u64::from(element_size) * u64::from(self.num_elements)
        } else {
            u64::from(self.compressed_length)
        }
    }
}

/// Reads exactly one property from the stream.
///
/// On success the stream rests immediately after the property's full
/// on-disk representation. Every property type is self-describing in
/// length, so array/string/raw payloads are skipped by their byte span
/// without interpreting their contents.
///
/// On `Error::UnknownPropertyType` the stream position is unusable and
/// the enclosing node decode must abort.
pub fn read_property<R: Read + Seek>(reader: &mut R) -> Result<Property> {
    let type_code = reader.read_u8()?;
    match type_code {
        // Boolean.
        b'C' => {
            let val = reader.read_u8()?;
            if (val != b'T') && (val != b'Y') {
                warn!(
                    "Expected 0x54 ('T') or 0x59 ('Y') as boolean property value, but got {:#x}",
                    val
                );
            }
            Ok(Property::Bool(val & 1 == 1))
        },
        // 2-byte signed integer.
        b'Y' => Ok(Property::I16(reader.read_i16::<LittleEndian>()?)),
        // 4-byte signed integer.
        b'I' => Ok(Property::I32(reader.read_i32::<LittleEndian>()?)),
        // 8-byte signed integer.
        b'L' => Ok(Property::I64(reader.read_i64::<LittleEndian>()?)),
        // 4-byte single-precision IEEE 754 floating-point number.
        b'F' => Ok(Property::F32(reader.read_f32::<LittleEndian>()?)),
        // 8-byte double-precision IEEE 754 floating-point number.
        b'D' => Ok(Property::F64(reader.read_f64::<LittleEndian>()?)),
        // String.
        b'S' => {
            let byte_len = reader.read_u32::<LittleEndian>()?;
            reader.seek(SeekFrom::Current(i64::from(byte_len)))?;
            Ok(Property::String { byte_len })
        },
        // Raw binary.
        b'R' => {
            let byte_len = reader.read_u32::<LittleEndian>()?;
            reader.seek(SeekFrom::Current(i64::from(byte_len)))?;
            Ok(Property::Binary { byte_len })
        },
        b'b' | b'i' | b'l' | b'f' | b'd' => {
            let header = ArrayHeader::read_from(reader)?;
            let element_size = match type_code {
                b'b' => 1,
                b'i' | b'f' => 4,
                b'l' | b'd' => 8,
                _ => unreachable!(),
            };
            reader.seek(SeekFrom::Current(header.encoded_len(element_size) as i64))?;
            Ok(match type_code {
                b'b' => Property::BoolArray(header),
                b'i' => Property::I32Array(header),
                b'l' => Property::I64Array(header),
                b'f' => Property::F32Array(header),
                b'd' => Property::F64Array(header),
                _ => unreachable!(),
            })
        },
        _ => {
            error!("Unknown type code: {:#x}", type_code);
            Err(Error::UnknownPropertyType(type_code))
        },
    }
}

macro_rules! implement_property_value_getter {
    ($t:ty, $method_name:ident, $variant:ident) => {
        /// Get property value without consuming self.
        ///
        /// Tries to get property value of specific type without type conversion.
        pub fn $method_name(&self) -> Option<$t> {
            match *self {
                Property::$variant(v) => Some(v),
                _ => None,
            }
        }
    };
}

impl Property {
    implement_property_value_getter!(bool, get_bool, Bool);
    implement_property_value_getter!(i16, get_i16, I16);
    implement_property_value_getter!(i32, get_i32, I32);
    implement_property_value_getter!(i64, get_i64, I64);
    implement_property_value_getter!(f32, get_f32, F32);
    implement_property_value_getter!(f64, get_f64, F64);

    /// Safe conversion.
    ///
    /// Tries to convert property value into specific type without data loss.
    pub fn as_i32(&self) -> Option<i32> {
        match *self {
            Property::I16(v) => Some(i32::from(v)),
            Property::I32(v) => Some(v),
            _ => None,
        }
    }

    /// Safe conversion.
    ///
    /// Tries to convert property value into specific type without data loss.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Property::I16(v) => Some(i64::from(v)),
            Property::I32(v) => Some(i64::from(v)),
            Property::I64(v) => Some(v),
            _ => None,
        }
    }

    /// Safe conversion.
    ///
    /// Tries to convert property value into specific type.
    pub fn as_f32(&self) -> Option<f32> {
        match *self {
            Property::F32(v) => Some(v),
            Property::F64(v) => Some(v as f32),
            _ => None,
        }
    }

    /// Safe conversion.
    ///
    /// Tries to convert property value into specific type.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Property::F32(v) => Some(f64::from(v)),
            Property::F64(v) => Some(v),
            _ => None,
        }
    }
}
