//! Class file header decoding
//!
//! Reads the constant pool, access flags, this/super/interfaces and the
//! headers of fields and methods (with their `Signature` attributes). Code
//! attributes and everything else are skipped by length.

use thiserror::Error;

use super::signature::{self, binary_to_qualified};
use crate::features::classpath::domain::{
    JvmType, MemberKind, MemberSignature, Origin, TypeDescriptor, TypeKind,
};

const ACC_PRIVATE: u16 = 0x0002;
const ACC_STATIC: u16 = 0x0008;
const ACC_INTERFACE: u16 = 0x0200;
const ACC_SYNTHETIC: u16 = 0x1000;
const ACC_ANNOTATION: u16 = 0x2000;
const ACC_ENUM: u16 = 0x4000;

#[derive(Debug, Error)]
pub enum ClassParseError {
    #[error("unexpected end of class file")]
    UnexpectedEof,
    #[error("invalid class file magic header")]
    InvalidMagic,
    #[error("unsupported constant pool tag {tag}")]
    UnsupportedConstant { tag: u8 },
    #[error("invalid constant pool index {index}")]
    InvalidConstantIndex { index: u16 },
    #[error("malformed modified UTF-8 at byte {offset} of a constant")]
    ModifiedUtf8 { offset: usize },
    #[error("malformed descriptor: {0}")]
    InvalidDescriptor(String),
}

/// Decode a class file into a descriptor
pub fn parse_class(bytes: &[u8], origin: Origin) -> Result<TypeDescriptor, ClassParseError> {
    let mut reader = ClassReader::new(bytes);
    reader.expect_magic()?;
    let _minor_version = reader.read_u2()?;
    let _major_version = reader.read_u2()?;
    let pool = ConstantPool::parse(&mut reader)?;

    let access_flags = reader.read_u2()?;
    let this_class = reader.read_u2()?;
    let super_class = reader.read_u2()?;

    let qualified_name = binary_to_qualified(&pool.class_name(this_class)?);

    let mut supertypes = Vec::new();
    if super_class != 0 {
        supertypes.push(binary_to_qualified(&pool.class_name(super_class)?));
    }
    let interfaces_count = reader.read_u2()?;
    for _ in 0..interfaces_count {
        let index = reader.read_u2()?;
        supertypes.push(binary_to_qualified(&pool.class_name(index)?));
    }

    let mut members = Vec::new();

    let fields_count = reader.read_u2()?;
    for _ in 0..fields_count {
        let header = MemberHeader::read(&mut reader, &pool)?;
        if !header.is_visible() {
            continue;
        }
        let ty = match header.signature.as_deref().map(signature::parse_field_type) {
            Some(Ok(ty)) => ty,
            _ => signature::parse_field_type(&header.descriptor)?,
        };
        members.push(MemberSignature {
            name: header.name,
            kind: MemberKind::Field,
            parameters: Vec::new(),
            return_type: ty,
            is_static: header.access_flags & ACC_STATIC != 0,
        });
    }

    let methods_count = reader.read_u2()?;
    for _ in 0..methods_count {
        let header = MemberHeader::read(&mut reader, &pool)?;
        if !header.is_visible() || header.name == "<clinit>" {
            continue;
        }
        let shape = match header.signature.as_deref().map(signature::parse_method) {
            Some(Ok(shape)) => shape,
            _ => signature::parse_method(&header.descriptor)?,
        };
        let (kind, return_type) = if header.name == "<init>" {
            (MemberKind::Constructor, JvmType::class(qualified_name.clone()))
        } else {
            (MemberKind::Method, shape.return_type)
        };
        members.push(MemberSignature {
            name: header.name,
            kind,
            parameters: shape.parameters,
            return_type,
            is_static: header.access_flags & ACC_STATIC != 0,
        });
    }

    // class attributes: only the generic signature is of interest
    let attributes_count = reader.read_u2()?;
    let class_signature = read_signature_attribute(&mut reader, &pool, attributes_count)?;
    if let Some(Ok(shape)) = class_signature.as_deref().map(signature::parse_class) {
        let generic: Vec<String> = shape
            .supertypes
            .iter()
            .filter_map(|t| t.qualified_name().map(str::to_string))
            .collect();
        if !generic.is_empty() {
            supertypes = generic;
        }
    }

    Ok(TypeDescriptor {
        kind: kind_of(access_flags),
        qualified_name,
        supertypes,
        members,
        origin,
    })
}

fn kind_of(access_flags: u16) -> TypeKind {
    if access_flags & ACC_ANNOTATION != 0 {
        TypeKind::Annotation
    } else if access_flags & ACC_INTERFACE != 0 {
        TypeKind::Interface
    } else if access_flags & ACC_ENUM != 0 {
        TypeKind::Enum
    } else {
        TypeKind::Class
    }
}

struct MemberHeader {
    access_flags: u16,
    name: String,
    descriptor: String,
    signature: Option<String>,
}

impl MemberHeader {
    fn read(reader: &mut ClassReader<'_>, pool: &ConstantPool) -> Result<Self, ClassParseError> {
        let access_flags = reader.read_u2()?;
        let name_index = reader.read_u2()?;
        let descriptor_index = reader.read_u2()?;
        let attributes_count = reader.read_u2()?;
        let signature = read_signature_attribute(reader, pool, attributes_count)?;
        Ok(Self {
            access_flags,
            name: pool.utf8(name_index)?.to_string(),
            descriptor: pool.utf8(descriptor_index)?.to_string(),
            signature,
        })
    }

    fn is_visible(&self) -> bool {
        self.access_flags & (ACC_PRIVATE | ACC_SYNTHETIC) == 0
    }
}

/// Walk an attribute table, returning the `Signature` value if present
fn read_signature_attribute(
    reader: &mut ClassReader<'_>,
    pool: &ConstantPool,
    count: u16,
) -> Result<Option<String>, ClassParseError> {
    let mut signature = None;
    for _ in 0..count {
        let name_index = reader.read_u2()?;
        let length = reader.read_u4()? as usize;
        if pool.utf8(name_index)? == "Signature" && length == 2 {
            let index = reader.read_u2()?;
            signature = Some(pool.utf8(index)?.to_string());
        } else {
            reader.skip(length)?;
        }
    }
    Ok(signature)
}

#[derive(Debug, Clone)]
enum Constant {
    Utf8(String),
    Class { name_index: u16 },
    Other,
    Unusable,
}

struct ConstantPool {
    entries: Vec<Constant>,
}

impl ConstantPool {
    fn parse(reader: &mut ClassReader<'_>) -> Result<Self, ClassParseError> {
        let count = reader.read_u2()? as usize;
        let mut entries = Vec::with_capacity(count);
        entries.push(Constant::Unusable); // index 0 unused

        let mut index = 1;
        while index < count {
            let tag = reader.read_u1()?;
            let entry = match tag {
                1 => {
                    let length = reader.read_u2()? as usize;
                    let bytes = reader.read_slice(length)?;
                    Constant::Utf8(decode_modified_utf8(bytes)?)
                }
                3 | 4 => {
                    reader.skip(4)?;
                    Constant::Other
                }
                5 | 6 => {
                    // long and double take two slots
                    reader.skip(8)?;
                    entries.push(Constant::Other);
                    index += 1;
                    Constant::Unusable
                }
                7 => Constant::Class {
                    name_index: reader.read_u2()?,
                },
                8 | 16 | 19 | 20 => {
                    reader.skip(2)?;
                    Constant::Other
                }
                9 | 10 | 11 | 12 | 17 | 18 => {
                    reader.skip(4)?;
                    Constant::Other
                }
                15 => {
                    reader.skip(3)?;
                    Constant::Other
                }
                other => return Err(ClassParseError::UnsupportedConstant { tag: other }),
            };

            entries.push(entry);
            index += 1;
        }

        Ok(Self { entries })
    }

    fn get(&self, index: u16) -> Result<&Constant, ClassParseError> {
        self.entries
            .get(index as usize)
            .ok_or(ClassParseError::InvalidConstantIndex { index })
    }

    fn utf8(&self, index: u16) -> Result<&str, ClassParseError> {
        match self.get(index)? {
            Constant::Utf8(value) => Ok(value.as_str()),
            _ => Err(ClassParseError::InvalidConstantIndex { index }),
        }
    }

    fn class_name(&self, index: u16) -> Result<String, ClassParseError> {
        match self.get(index)? {
            Constant::Class { name_index } => Ok(self.utf8(*name_index)?.to_string()),
            _ => Err(ClassParseError::InvalidConstantIndex { index }),
        }
    }
}

/// Decode the JVM's modified UTF-8: NUL is `C0 80` and supplementary
/// characters are stored as two encoded surrogates.
fn decode_modified_utf8(bytes: &[u8]) -> Result<String, ClassParseError> {
    if let Ok(text) = std::str::from_utf8(bytes) {
        return Ok(text.to_string());
    }

    let mut units: Vec<u16> = Vec::with_capacity(bytes.len());
    let mut pos = 0;
    let continuation = |offset: usize| -> Result<u16, ClassParseError> {
        match bytes.get(offset) {
            Some(&b) if b & 0xC0 == 0x80 => Ok((b & 0x3F) as u16),
            _ => Err(ClassParseError::ModifiedUtf8 { offset }),
        }
    };
    while pos < bytes.len() {
        let lead = bytes[pos];
        if lead & 0x80 == 0 {
            units.push(lead as u16);
            pos += 1;
        } else if lead & 0xE0 == 0xC0 {
            units.push(((lead & 0x1F) as u16) << 6 | continuation(pos + 1)?);
            pos += 2;
        } else if lead & 0xF0 == 0xE0 {
            units.push(((lead & 0x0F) as u16) << 12 | continuation(pos + 1)? << 6 | continuation(pos + 2)?);
            pos += 3;
        } else {
            return Err(ClassParseError::ModifiedUtf8 { offset: pos });
        }
    }

    // lone surrogates cannot appear in a String
    Ok(char::decode_utf16(units)
        .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect())
}

struct ClassReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ClassReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn expect_magic(&mut self) -> Result<(), ClassParseError> {
        const MAGIC: u32 = 0xCAFEBABE;
        if self.read_u4()? != MAGIC {
            return Err(ClassParseError::InvalidMagic);
        }
        Ok(())
    }

    fn read_u1(&mut self) -> Result<u8, ClassParseError> {
        let value = *self.data.get(self.pos).ok_or(ClassParseError::UnexpectedEof)?;
        self.pos += 1;
        Ok(value)
    }

    fn read_u2(&mut self) -> Result<u16, ClassParseError> {
        let bytes = self.read_slice(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    fn read_u4(&mut self) -> Result<u32, ClassParseError> {
        let bytes = self.read_slice(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn read_slice(&mut self, len: usize) -> Result<&'a [u8], ClassParseError> {
        if self.pos + len > self.data.len() {
            return Err(ClassParseError::UnexpectedEof);
        }
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    fn skip(&mut self, len: usize) -> Result<(), ClassParseError> {
        self.read_slice(len).map(|_| ())
    }
}
