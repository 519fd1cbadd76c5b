//! Constant pool decoding and symbolic lookups.

use crate::error::{DecodeError, DecodeResult};
use crate::reader::ClassReader;

const CONSTANT_UTF8: u8 = 1;
const CONSTANT_INTEGER: u8 = 3;
const CONSTANT_FLOAT: u8 = 4;
const CONSTANT_LONG: u8 = 5;
const CONSTANT_DOUBLE: u8 = 6;
const CONSTANT_CLASS: u8 = 7;
const CONSTANT_STRING: u8 = 8;
const CONSTANT_FIELDREF: u8 = 9;
const CONSTANT_METHODREF: u8 = 10;
const CONSTANT_INTERFACE_METHODREF: u8 = 11;
const CONSTANT_NAME_AND_TYPE: u8 = 12;
const CONSTANT_METHOD_HANDLE: u8 = 15;
const CONSTANT_METHOD_TYPE: u8 = 16;
const CONSTANT_DYNAMIC: u8 = 17;
const CONSTANT_INVOKE_DYNAMIC: u8 = 18;
const CONSTANT_MODULE: u8 = 19;
const CONSTANT_PACKAGE: u8 = 20;

#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    Utf8(String),
    Integer(i32),
    Float(f32),
    Long(i64),
    Double(f64),
    Class { name_index: u16 },
    String { string_index: u16 },
    Fieldref { class_index: u16, name_and_type_index: u16 },
    Methodref { class_index: u16, name_and_type_index: u16 },
    InterfaceMethodref { class_index: u16, name_and_type_index: u16 },
    NameAndType { name_index: u16, descriptor_index: u16 },
    MethodHandle { reference_kind: u8, reference_index: u16 },
    MethodType { descriptor_index: u16 },
    Dynamic { bootstrap_method_attr_index: u16, name_and_type_index: u16 },
    InvokeDynamic { bootstrap_method_attr_index: u16, name_and_type_index: u16 },
    Module { name_index: u16 },
    Package { name_index: u16 },
}

impl Constant {
    /// Long and Double take the following slot as well.
    fn is_wide(&self) -> bool {
        matches!(self, Constant::Long(_) | Constant::Double(_))
    }
}

/// Slot 0 and the upper half of wide constants are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstantPool {
    entries: Vec<Option<Constant>>,
}

impl ConstantPool {
    pub fn read(reader: &mut ClassReader<'_>) -> DecodeResult<Self> {
        let count = reader.read_u16()?;
        let mut entries = Vec::with_capacity(usize::from(count));
        entries.push(None);

        while entries.len() < usize::from(count) {
            // index fits in u16: bounded by count
            let index = entries.len() as u16;
            let constant = read_constant(reader, index)?;
            let wide = constant.is_wide();
            if wide && entries.len() + 2 > usize::from(count) {
                return Err(DecodeError::WideConstantOverflow { index, count });
            }
            entries.push(Some(constant));
            if wide {
                entries.push(None);
            }
        }

        Ok(Self { entries })
    }

    /// Declared `constant_pool_count`, one more than the highest usable index.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.len() <= 1
    }

    pub fn get(&self, index: u16) -> Option<&Constant> {
        self.entries.get(usize::from(index)).and_then(Option::as_ref)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u16, &Constant)> {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.as_ref().map(|c| (i as u16, c)))
    }

    pub fn utf8(&self, index: u16) -> DecodeResult<&str> {
        match self.get(index) {
            Some(Constant::Utf8(s)) => Ok(s),
            _ => Err(DecodeError::BadConstantIndex {
                index,
                expected: "Utf8",
            }),
        }
    }

    /// Internal (slash separated) name of a Class entry.
    pub fn class_name(&self, index: u16) -> DecodeResult<&str> {
        match self.get(index) {
            Some(Constant::Class { name_index }) => self.utf8(*name_index),
            _ => Err(DecodeError::BadConstantIndex {
                index,
                expected: "Class",
            }),
        }
    }
}

fn read_constant(reader: &mut ClassReader<'_>, index: u16) -> DecodeResult<Constant> {
    let offset = reader.offset();
    let tag = reader.read_u8()?;
    let constant = match tag {
        CONSTANT_UTF8 => {
            let len = reader.read_u16()?;
            let bytes = reader.read_bytes(usize::from(len))?;
            Constant::Utf8(decode_mutf8(bytes).ok_or(DecodeError::BadUtf8 { index })?)
        }
        CONSTANT_INTEGER => Constant::Integer(reader.read_u32()? as i32),
        CONSTANT_FLOAT => Constant::Float(f32::from_bits(reader.read_u32()?)),
        CONSTANT_LONG => Constant::Long(reader.read_u64()? as i64),
        CONSTANT_DOUBLE => Constant::Double(f64::from_bits(reader.read_u64()?)),
        CONSTANT_CLASS => Constant::Class {
            name_index: reader.read_u16()?,
        },
        CONSTANT_STRING => Constant::String {
            string_index: reader.read_u16()?,
        },
        CONSTANT_FIELDREF => Constant::Fieldref {
            class_index: reader.read_u16()?,
            name_and_type_index: reader.read_u16()?,
        },
        CONSTANT_METHODREF => Constant::Methodref {
            class_index: reader.read_u16()?,
            name_and_type_index: reader.read_u16()?,
        },
        CONSTANT_INTERFACE_METHODREF => Constant::InterfaceMethodref {
            class_index: reader.read_u16()?,
            name_and_type_index: reader.read_u16()?,
        },
        CONSTANT_NAME_AND_TYPE => Constant::NameAndType {
            name_index: reader.read_u16()?,
            descriptor_index: reader.read_u16()?,
        },
        CONSTANT_METHOD_HANDLE => Constant::MethodHandle {
            reference_kind: reader.read_u8()?,
            reference_index: reader.read_u16()?,
        },
        CONSTANT_METHOD_TYPE => Constant::MethodType {
            descriptor_index: reader.read_u16()?,
        },
        CONSTANT_DYNAMIC => Constant::Dynamic {
            bootstrap_method_attr_index: reader.read_u16()?,
            name_and_type_index: reader.read_u16()?,
        },
        CONSTANT_INVOKE_DYNAMIC => Constant::InvokeDynamic {
            bootstrap_method_attr_index: reader.read_u16()?,
            name_and_type_index: reader.read_u16()?,
        },
        CONSTANT_MODULE => Constant::Module {
            name_index: reader.read_u16()?,
        },
        CONSTANT_PACKAGE => Constant::Package {
            name_index: reader.read_u16()?,
        },
        tag => return Err(DecodeError::BadConstantTag { tag, offset }),
    };
    Ok(constant)
}

/// Decodes the JVM's modified UTF-8: NUL is `C0 80`, supplementary
/// characters are surrogate pairs of three-byte sequences, no four-byte forms.
///
/// Java strings may hold unpaired surrogates; those decode to U+FFFD.
pub fn decode_mutf8(bytes: &[u8]) -> Option<String> {
    let mut units: Vec<u16> = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        match b {
            0x01..=0x7f => {
                units.push(u16::from(b));
                i += 1;
            }
            _ if b & 0xe0 == 0xc0 => {
                let b2 = continuation(bytes.get(i + 1))?;
                units.push((u16::from(b & 0x1f) << 6) | b2);
                i += 2;
            }
            _ if b & 0xf0 == 0xe0 => {
                let b2 = continuation(bytes.get(i + 1))?;
                let b3 = continuation(bytes.get(i + 2))?;
                units.push((u16::from(b & 0x0f) << 12) | (b2 << 6) | b3);
                i += 3;
            }
            _ => return None,
        }
    }
    Some(String::from_utf16_lossy(&units))
}

fn continuation(byte: Option<&u8>) -> Option<u16> {
    match byte {
        Some(b) if b & 0xc0 == 0x80 => Some(u16::from(b & 0x3f)),
        _ => None,
    }
}
