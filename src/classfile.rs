//! Class-file decoding.
//!
//! Fields are read in the order the format lays them out, all from one
//! [`ClassReader`]. A decode either returns a complete [`ClassFile`] or a
//! [`DecodeError`]; nothing partial escapes.

use crate::attribute::{AttributeInfo, read_attributes};
use crate::constant_pool::ConstantPool;
use crate::error::{DecodeError, DecodeResult};
use crate::member::{MemberInfo, read_members};
use crate::reader::ClassReader;

pub const MAGIC: u32 = 0xCAFE_BABE;

/// Oldest format the loader accepts (JDK 1.0.2).
pub const MIN_MAJOR_VERSION: u16 = 45;
/// Newest format the loader accepts (Java 8).
pub const MAX_MAJOR_VERSION: u16 = 52;

pub const ACC_PUBLIC: u16 = 0x0001;
pub const ACC_FINAL: u16 = 0x0010;
pub const ACC_SUPER: u16 = 0x0020;
pub const ACC_INTERFACE: u16 = 0x0200;
pub const ACC_ABSTRACT: u16 = 0x0400;
pub const ACC_SYNTHETIC: u16 = 0x1000;
pub const ACC_ANNOTATION: u16 = 0x2000;
pub const ACC_ENUM: u16 = 0x4000;

const CLASS_FLAG_NAMES: [(u16, &str); 8] = [
    (ACC_PUBLIC, "public"),
    (ACC_FINAL, "final"),
    (ACC_SUPER, "super"),
    (ACC_INTERFACE, "interface"),
    (ACC_ABSTRACT, "abstract"),
    (ACC_SYNTHETIC, "synthetic"),
    (ACC_ANNOTATION, "annotation"),
    (ACC_ENUM, "enum"),
];

/// Keywords for the class-level bits set in `flags`, in declaration order.
pub fn class_flag_names(flags: u16) -> Vec<&'static str> {
    CLASS_FLAG_NAMES
        .iter()
        .filter(|(bit, _)| flags & bit != 0)
        .map(|(_, name)| *name)
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassFile {
    pub minor_version: u16,
    pub major_version: u16,
    pub constant_pool: ConstantPool,
    pub access_flags: u16,
    pub this_class: u16,
    /// Zero only for `java/lang/Object`.
    pub super_class: u16,
    pub interfaces: Vec<u16>,
    pub fields: Vec<MemberInfo>,
    pub methods: Vec<MemberInfo>,
    pub attributes: Vec<AttributeInfo>,
}

impl ClassFile {
    pub fn parse(class_data: &[u8]) -> DecodeResult<Self> {
        let mut reader = ClassReader::new(class_data);
        Self::read(&mut reader)
    }

    pub fn read(reader: &mut ClassReader<'_>) -> DecodeResult<Self> {
        read_and_check_magic(reader)?;
        let (minor_version, major_version) = read_and_check_version(reader)?;
        let constant_pool = ConstantPool::read(reader)?;
        let access_flags = reader.read_u16()?;
        let this_class = reader.read_u16()?;
        let super_class = reader.read_u16()?;
        let interfaces = reader.read_u16_table()?;
        let fields = read_members(reader, &constant_pool)?;
        let methods = read_members(reader, &constant_pool)?;
        let attributes = read_attributes(reader, &constant_pool)?;

        constant_pool.class_name(this_class)?;
        if super_class != 0 {
            constant_pool.class_name(super_class)?;
        }
        for &index in &interfaces {
            constant_pool.class_name(index)?;
        }

        Ok(Self {
            minor_version,
            major_version,
            constant_pool,
            access_flags,
            this_class,
            super_class,
            interfaces,
            fields,
            methods,
            attributes,
        })
    }

    // Linkage indices were checked in `read`, so the lookups below cannot miss.

    pub fn class_name(&self) -> &str {
        self.constant_pool
            .class_name(self.this_class)
            .unwrap_or_default()
    }

    /// `None` for the root of the hierarchy.
    pub fn super_class_name(&self) -> Option<&str> {
        if self.super_class == 0 {
            return None;
        }
        self.constant_pool.class_name(self.super_class).ok()
    }

    pub fn interface_names(&self) -> Vec<&str> {
        self.interfaces
            .iter()
            .filter_map(|&index| self.constant_pool.class_name(index).ok())
            .collect()
    }

    pub fn source_file(&self) -> Option<&str> {
        self.attributes.iter().find_map(|a| match a {
            AttributeInfo::SourceFile { source_file_index } => {
                self.constant_pool.utf8(*source_file_index).ok()
            }
            _ => None,
        })
    }

    pub fn is_interface(&self) -> bool {
        self.access_flags & ACC_INTERFACE != 0
    }
}

fn read_and_check_magic(reader: &mut ClassReader<'_>) -> DecodeResult<()> {
    let magic = reader.read_u32()?;
    if magic != MAGIC {
        return Err(DecodeError::BadMagic { found: magic });
    }
    Ok(())
}

fn read_and_check_version(reader: &mut ClassReader<'_>) -> DecodeResult<(u16, u16)> {
    let minor = reader.read_u16()?;
    let major = reader.read_u16()?;
    match major {
        MIN_MAJOR_VERSION => Ok((minor, major)),
        m if m > MIN_MAJOR_VERSION && m <= MAX_MAJOR_VERSION && minor == 0 => Ok((minor, major)),
        _ => Err(DecodeError::UnsupportedVersion { major, minor }),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Assembles a class file with no fields, methods or attributes beyond a
    /// `SourceFile`, extending `java/lang/Object` unless `super_name` is `None`.
    pub(crate) fn class_bytes(
        major: u16,
        name: &str,
        super_name: Option<&str>,
        interfaces: &[&str],
    ) -> Vec<u8> {
        let mut pool: Vec<Vec<u8>> = Vec::new();
        let this_index = add_class(&mut pool, name);
        let super_index = super_name.map_or(0, |s| add_class(&mut pool, s));
        let interface_indices: Vec<u16> =
            interfaces.iter().map(|i| add_class(&mut pool, i)).collect();

        let source = b"Demo.java";
        for s in [&b"SourceFile"[..], &source[..]] {
            let mut utf8 = vec![1];
            utf8.extend_from_slice(&(s.len() as u16).to_be_bytes());
            utf8.extend_from_slice(s);
            pool.push(utf8);
        }
        let source_file_name = pool.len() as u16 - 1;

        let mut out = MAGIC.to_be_bytes().to_vec();
        out.extend_from_slice(&0u16.to_be_bytes());
        out.extend_from_slice(&major.to_be_bytes());
        out.extend_from_slice(&(pool.len() as u16 + 1).to_be_bytes());
        for entry in &pool {
            out.extend_from_slice(entry);
        }
        out.extend_from_slice(&(ACC_PUBLIC | ACC_SUPER).to_be_bytes());
        out.extend_from_slice(&this_index.to_be_bytes());
        out.extend_from_slice(&super_index.to_be_bytes());
        out.extend_from_slice(&(interface_indices.len() as u16).to_be_bytes());
        for i in &interface_indices {
            out.extend_from_slice(&i.to_be_bytes());
        }
        out.extend_from_slice(&0u16.to_be_bytes());
        out.extend_from_slice(&0u16.to_be_bytes());
        out.extend_from_slice(&1u16.to_be_bytes());
        out.extend_from_slice(&source_file_name.to_be_bytes());
        out.extend_from_slice(&2u32.to_be_bytes());
        out.extend_from_slice(&(source_file_name + 1).to_be_bytes());
        out
    }

    fn add_class(pool: &mut Vec<Vec<u8>>, name: &str) -> u16 {
        let mut utf8 = vec![1];
        utf8.extend_from_slice(&(name.len() as u16).to_be_bytes());
        utf8.extend_from_slice(name.as_bytes());
        pool.push(utf8);
        let utf8_index = pool.len() as u16;
        let mut class = vec![7];
        class.extend_from_slice(&utf8_index.to_be_bytes());
        pool.push(class);
        pool.len() as u16
    }

    #[test]
    fn decodes_minimal_class() {
        let data = class_bytes(52, "demo/Hello", Some("java/lang/Object"), &[]);
        let cf = ClassFile::parse(&data).unwrap();

        assert_eq!(cf.major_version, 52);
        assert_eq!(cf.minor_version, 0);
        assert!(cf.interfaces.is_empty());
        assert_eq!(cf.class_name(), "demo/Hello");
        assert_eq!(cf.super_class_name(), Some("java/lang/Object"));
        assert_eq!(cf.source_file(), Some("Demo.java"));
        assert_eq!(class_flag_names(cf.access_flags), vec!["public", "super"]);
        assert!(!cf.is_interface());
    }

    #[test]
    fn root_class_has_no_super() {
        let data = class_bytes(52, "java/lang/Object", None, &[]);
        let cf = ClassFile::parse(&data).unwrap();
        assert_eq!(cf.super_class, 0);
        assert_eq!(cf.super_class_name(), None);
    }

    #[test]
    fn interface_names_keep_table_order() {
        let data = class_bytes(
            50,
            "demo/Impl",
            Some("java/lang/Object"),
            &["java/lang/Runnable", "java/io/Serializable"],
        );
        let cf = ClassFile::parse(&data).unwrap();
        assert_eq!(
            cf.interface_names(),
            vec!["java/lang/Runnable", "java/io/Serializable"]
        );
    }

    #[test]
    fn bad_magic_stops_after_four_bytes() {
        let mut data = class_bytes(52, "demo/Hello", Some("java/lang/Object"), &[]);
        data[0] = 0xCA;
        data[3] = 0x00;
        let mut reader = ClassReader::new(&data);
        let err = ClassFile::read(&mut reader).unwrap_err();
        assert_eq!(err, DecodeError::BadMagic { found: 0xCAFE_BA00 });
        assert_eq!(reader.offset(), 4);
    }

    #[test]
    fn unsupported_versions_are_rejected() {
        for (minor, major) in [(0u16, 53u16), (0, 44), (3, 52)] {
            let mut data = class_bytes(major, "demo/Hello", None, &[]);
            data[4..6].copy_from_slice(&minor.to_be_bytes());
            assert_eq!(
                ClassFile::parse(&data).unwrap_err(),
                DecodeError::UnsupportedVersion { major, minor }
            );
        }

        let mut data = class_bytes(45, "demo/Old", None, &[]);
        data[4..6].copy_from_slice(&3u16.to_be_bytes());
        assert_eq!(ClassFile::parse(&data).unwrap().minor_version, 3);
    }

    #[test]
    fn every_truncation_is_an_error() {
        let data = class_bytes(52, "demo/Hello", Some("java/lang/Object"), &["demo/I"]);
        for len in 0..data.len() {
            assert!(
                ClassFile::parse(&data[..len]).is_err(),
                "truncated at {len} decoded successfully"
            );
        }
    }

    #[test]
    fn this_class_must_name_a_class_entry() {
        let mut data = class_bytes(52, "demo/Hello", None, &[]);
        // 22 trailing bytes: flags through the SourceFile attribute.
        let pool_end = data.len() - 22;
        data[pool_end + 2..pool_end + 4].copy_from_slice(&1u16.to_be_bytes());
        assert_eq!(
            ClassFile::parse(&data).unwrap_err(),
            DecodeError::BadConstantIndex {
                index: 1,
                expected: "Class"
            }
        );
    }
}
