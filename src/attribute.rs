use crate::constant_pool::ConstantPool;
use crate::error::{DecodeError, DecodeResult};
use crate::reader::ClassReader;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionTableEntry {
    pub start_pc: u16,
    pub end_pc: u16,
    pub handler_pc: u16,
    pub catch_type: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineNumber {
    pub start_pc: u16,
    pub line_number: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeInfo {
    Code {
        max_stack: u16,
        max_locals: u16,
        code: Vec<u8>,
        exception_table: Vec<ExceptionTableEntry>,
        attributes: Vec<AttributeInfo>,
    },
    ConstantValue {
        constant_value_index: u16,
    },
    Exceptions {
        exception_index_table: Vec<u16>,
    },
    SourceFile {
        source_file_index: u16,
    },
    LineNumberTable(Vec<LineNumber>),
    Deprecated,
    Synthetic,
    /// Anything without a dedicated decoder.
    Unparsed { name: String, info: Vec<u8> },
}

impl AttributeInfo {
    pub fn name(&self) -> &str {
        match self {
            AttributeInfo::Code { .. } => "Code",
            AttributeInfo::ConstantValue { .. } => "ConstantValue",
            AttributeInfo::Exceptions { .. } => "Exceptions",
            AttributeInfo::SourceFile { .. } => "SourceFile",
            AttributeInfo::LineNumberTable(_) => "LineNumberTable",
            AttributeInfo::Deprecated => "Deprecated",
            AttributeInfo::Synthetic => "Synthetic",
            AttributeInfo::Unparsed { name, .. } => name,
        }
    }
}

/// Reads a u16-counted attribute table.
pub fn read_attributes(
    reader: &mut ClassReader<'_>,
    pool: &ConstantPool,
) -> DecodeResult<Vec<AttributeInfo>> {
    let count = reader.read_u16()?;
    (0..count).map(|_| read_attribute(reader, pool)).collect()
}

fn read_attribute(
    reader: &mut ClassReader<'_>,
    pool: &ConstantPool,
) -> DecodeResult<AttributeInfo> {
    let name_index = reader.read_u16()?;
    let length = reader.read_u32()?;
    let info = reader.read_bytes(length as usize)?;
    let name = pool.utf8(name_index)?;

    // Body reads are bounded by the declared length.
    let mut body = ClassReader::new(info);
    let attribute = match name {
        "Code" => AttributeInfo::Code {
            max_stack: body.read_u16()?,
            max_locals: body.read_u16()?,
            code: {
                let len = body.read_u32()?;
                body.read_bytes(len as usize)?.to_vec()
            },
            exception_table: {
                let n = body.read_u16()?;
                (0..n)
                    .map(|_| -> DecodeResult<ExceptionTableEntry> {
                        Ok(ExceptionTableEntry {
                            start_pc: body.read_u16()?,
                            end_pc: body.read_u16()?,
                            handler_pc: body.read_u16()?,
                            catch_type: body.read_u16()?,
                        })
                    })
                    .collect::<DecodeResult<_>>()?
            },
            attributes: read_attributes(&mut body, pool)?,
        },
        "ConstantValue" => AttributeInfo::ConstantValue {
            constant_value_index: body.read_u16()?,
        },
        "Exceptions" => AttributeInfo::Exceptions {
            exception_index_table: body.read_u16_table()?,
        },
        "SourceFile" => AttributeInfo::SourceFile {
            source_file_index: body.read_u16()?,
        },
        "LineNumberTable" => {
            let n = body.read_u16()?;
            let lines = (0..n)
                .map(|_| -> DecodeResult<LineNumber> {
                    Ok(LineNumber {
                        start_pc: body.read_u16()?,
                        line_number: body.read_u16()?,
                    })
                })
                .collect::<DecodeResult<_>>()?;
            AttributeInfo::LineNumberTable(lines)
        }
        "Deprecated" => AttributeInfo::Deprecated,
        "Synthetic" => AttributeInfo::Synthetic,
        other => {
            return Ok(AttributeInfo::Unparsed {
                name: other.to_string(),
                info: info.to_vec(),
            });
        }
    };

    if !body.is_empty() {
        return Err(DecodeError::TrailingAttributeBytes {
            name: name.to_string(),
            remaining: body.remaining(),
        });
    }
    Ok(attribute)
}
