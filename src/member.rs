use crate::attribute::{AttributeInfo, read_attributes};
use crate::constant_pool::ConstantPool;
use crate::error::DecodeResult;
use crate::reader::ClassReader;

/// A field or method entry. Both tables share this layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberInfo {
    pub access_flags: u16,
    pub name_index: u16,
    pub descriptor_index: u16,
    pub name: String,
    pub descriptor: String,
    pub attributes: Vec<AttributeInfo>,
}

impl MemberInfo {
    /// `Code` attribute of a method, if it has a body.
    pub fn code(&self) -> Option<&AttributeInfo> {
        self.attributes
            .iter()
            .find(|a| matches!(a, AttributeInfo::Code { .. }))
    }
}

pub fn read_members(
    reader: &mut ClassReader<'_>,
    pool: &ConstantPool,
) -> DecodeResult<Vec<MemberInfo>> {
    let count = reader.read_u16()?;
    (0..count).map(|_| read_member(reader, pool)).collect()
}

fn read_member(reader: &mut ClassReader<'_>, pool: &ConstantPool) -> DecodeResult<MemberInfo> {
    let access_flags = reader.read_u16()?;
    let name_index = reader.read_u16()?;
    let descriptor_index = reader.read_u16()?;
    let attributes = read_attributes(reader, pool)?;
    Ok(MemberInfo {
        access_flags,
        name_index,
        descriptor_index,
        name: pool.utf8(name_index)?.to_string(),
        descriptor: pool.utf8(descriptor_index)?.to_string(),
        attributes,
    })
}
