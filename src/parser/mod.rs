//! Binary format decoder.
//!
//! Reads a `.wasm` byte stream into a [`module::Module`] in one strict,
//! non-recovering pass. The grammar is the core spec (2.0 draft 2023-04-08)
//! plus the threads extension, the exception handling proposal and the
//! extended name section.
//!
//! Only the module name, the type section and the import section populate the
//! AST; every other section is parsed for conformance (framing, tags, LEB128
//! ranges) and its payload discarded.
//!
//! # Example
//!
//! ```
//! use wasmtext::parser::{self, reader::Reader};
//!
//! // magic + version: the smallest valid module
//! let bytes = vec![0x00, 0x61, 0x73, 0x6D, 0x01, 0x00, 0x00, 0x00];
//! let module = parser::parse(&mut Reader::new(bytes)).unwrap();
//! assert!(module.name.is_none());
//! assert!(module.types.is_empty());
//! ```

pub mod encoding;
pub mod error;
pub mod instruction;
pub mod module;
pub mod reader;

use tracing::{debug, warn};

use self::encoding::*;
use self::error::ParseError;
use self::instruction::read_expr;
use self::module::{FunctionType, Import, Module, ValueType};
use self::reader::Reader;

/// Decode a complete binary module.
///
/// Consumes the reader to end of input; trailing bytes after the last section
/// are an error.
pub fn parse(r: &mut Reader) -> Result<Module, ParseError> {
    let mut module = Module::new();

    read_magic(r)?;
    read_version(r)?;

    // Zero or more custom sections are admitted between any two non-custom
    // sections; the known sections appear in this fixed order, each optional.
    read_custom_sections(r, &mut module)?;
    if r.cur_byte() == Some(SECTION_TYPE) {
        module.types = read_type_section(r)?;
    }
    read_custom_sections(r, &mut module)?;
    if r.cur_byte() == Some(SECTION_IMPORT) {
        module.imports = read_import_section(r)?;
    }
    read_custom_sections(r, &mut module)?;
    if r.cur_byte() == Some(SECTION_FUNCTION) {
        read_function_section(r)?;
    }
    read_custom_sections(r, &mut module)?;
    if r.cur_byte() == Some(SECTION_TABLE) {
        read_table_section(r)?;
    }
    read_custom_sections(r, &mut module)?;
    if r.cur_byte() == Some(SECTION_MEMORY) {
        read_memory_section(r)?;
    }
    read_custom_sections(r, &mut module)?;
    if r.cur_byte() == Some(SECTION_TAG) {
        read_tag_section(r)?;
    }
    read_custom_sections(r, &mut module)?;
    if r.cur_byte() == Some(SECTION_GLOBAL) {
        read_global_section(r)?;
    }
    read_custom_sections(r, &mut module)?;
    if r.cur_byte() == Some(SECTION_EXPORT) {
        read_export_section(r)?;
    }
    read_custom_sections(r, &mut module)?;
    if r.cur_byte() == Some(SECTION_START) {
        read_start_section(r)?;
    }
    read_custom_sections(r, &mut module)?;
    if r.cur_byte() == Some(SECTION_ELEMENT) {
        read_element_section(r)?;
    }
    read_custom_sections(r, &mut module)?;
    if r.cur_byte() == Some(SECTION_DATA_COUNT) {
        read_data_count_section(r)?;
    }
    read_custom_sections(r, &mut module)?;
    if r.cur_byte() == Some(SECTION_CODE) {
        read_code_section(r)?;
    }
    read_custom_sections(r, &mut module)?;
    if r.cur_byte() == Some(SECTION_DATA) {
        read_data_section(r)?;
    }
    read_custom_sections(r, &mut module)?;

    if let Some(found) = r.cur_byte() {
        return Err(ParseError::TrailingData {
            offset: r.offset(),
            found,
        });
    }

    Ok(module)
}

fn read_magic(r: &mut Reader) -> Result<(), ParseError> {
    for byte in MAGIC {
        r.expect_byte(byte)?;
    }
    Ok(())
}

fn read_version(r: &mut Reader) -> Result<(), ParseError> {
    for byte in VERSION {
        r.expect_byte(byte)?;
    }
    Ok(())
}

// Types (§5.3) --------------------------------------------------------------

fn read_numtype(r: &mut Reader) -> Result<ValueType, ParseError> {
    let offset = r.offset();
    let b = r.read_byte()?;
    match b {
        0x7F => Ok(ValueType::I32),
        0x7E => Ok(ValueType::I64),
        0x7D => Ok(ValueType::F32),
        0x7C => Ok(ValueType::F64),
        _ => Err(ParseError::UnknownTag {
            what: "numtype",
            found: b,
            offset,
        }),
    }
}

fn read_vectype(r: &mut Reader) -> Result<ValueType, ParseError> {
    let offset = r.offset();
    let b = r.read_byte()?;
    match b {
        0x7B => Ok(ValueType::V128),
        _ => Err(ParseError::UnknownTag {
            what: "vectype",
            found: b,
            offset,
        }),
    }
}

fn read_reftype(r: &mut Reader) -> Result<ValueType, ParseError> {
    let offset = r.offset();
    let b = r.read_byte()?;
    match b {
        0x70 => Ok(ValueType::FuncRef),
        0x6F => Ok(ValueType::ExternRef),
        _ => Err(ParseError::UnknownTag {
            what: "reftype",
            found: b,
            offset,
        }),
    }
}

/// Dispatch on the lookahead byte to the matching sub-parser.
pub(crate) fn read_valtype(r: &mut Reader) -> Result<ValueType, ParseError> {
    match r.cur_byte() {
        Some(0x7C..=0x7F) => read_numtype(r),
        Some(0x7B) => read_vectype(r),
        Some(0x70) | Some(0x6F) => read_reftype(r),
        _ => {
            let offset = r.offset();
            let found = r.read_byte()?;
            Err(ParseError::UnknownTag {
                what: "valtype",
                found,
                offset,
            })
        }
    }
}

fn read_result_type(r: &mut Reader) -> Result<Vec<ValueType>, ParseError> {
    r.read_vec(read_valtype)
}

fn read_functype(r: &mut Reader) -> Result<FunctionType, ParseError> {
    r.expect_byte(TYPE_FUNC)?;
    let params = read_result_type(r)?;
    let results = read_result_type(r)?;
    Ok(FunctionType { params, results })
}

/// Limits flags select unshared/shared and min-only/min-max, followed by one
/// or two u32s.
fn read_limits(r: &mut Reader) -> Result<(), ParseError> {
    let offset = r.offset();
    let flags = r.read_byte()?;
    match flags {
        LIMITS_MIN | LIMITS_SHARED_MIN => {
            r.read_vu32()?; // n
        }
        LIMITS_MIN_MAX | LIMITS_SHARED_MIN_MAX => {
            r.read_vu32()?; // n
            r.read_vu32()?; // m
        }
        _ => {
            return Err(ParseError::UnknownTag {
                what: "limits flags",
                found: flags,
                offset,
            });
        }
    }
    Ok(())
}

fn read_table_type(r: &mut Reader) -> Result<(), ParseError> {
    read_reftype(r)?;
    read_limits(r)
}

fn read_global_type(r: &mut Reader) -> Result<(), ParseError> {
    read_valtype(r)?;
    read_mut(r)
}

fn read_mut(r: &mut Reader) -> Result<(), ParseError> {
    let offset = r.offset();
    let b = r.read_byte()?;
    match b {
        MUT_CONST | MUT_VAR => Ok(()),
        _ => Err(ParseError::UnknownTag {
            what: "mut type",
            found: b,
            offset,
        }),
    }
}

/// A tag (exception handling spec): attribute byte 0x00, then a type index.
fn read_tag(r: &mut Reader) -> Result<(), ParseError> {
    r.expect_byte(0x00)?;
    r.read_vu32()?; // typeidx
    Ok(())
}

// Sections (§5.5) -----------------------------------------------------------

/// Section framing: id, declared size, payload. The payload parser is not
/// bounded to the declared size while running; the declared/actual comparison
/// afterwards rejects any mismatch.
fn read_section<T>(
    r: &mut Reader,
    id: u8,
    section: impl FnOnce(&mut Reader, u32) -> Result<T, ParseError>,
) -> Result<T, ParseError> {
    r.expect_byte(id)?;
    let declared = r.read_vu32()?;
    let start = r.offset();
    let result = section(r, declared)?;
    let end = r.offset();
    let actual = end - start;
    if actual != declared as usize {
        return Err(ParseError::SectionSizeMismatch {
            id,
            start,
            end,
            declared,
            actual,
        });
    }
    Ok(result)
}

fn read_custom_sections(r: &mut Reader, module: &mut Module) -> Result<(), ParseError> {
    while r.cur_byte() == Some(SECTION_CUSTOM) {
        read_custom_section(r, module)?;
    }
    Ok(())
}

fn read_custom_section(r: &mut Reader, module: &mut Module) -> Result<(), ParseError> {
    read_section(r, SECTION_CUSTOM, |r, size| {
        let start = r.offset();
        let end = start + size as usize;
        let name = r.read_name()?;
        match name.as_str() {
            "name" => read_name_section(r, end, module)?,
            "sourceMappingURL" => {
                let url = r.read_name()?;
                debug!("source mapping url: {url}");
                if let Some(surplus) = end.checked_sub(r.offset()) {
                    r.skip(surplus)?;
                }
            }
            _ => {
                if let Some(remaining) = end.checked_sub(r.offset()) {
                    r.skip(remaining)?;
                }
            }
        }
        Ok(())
    })
}

/// Extended name section. Subsections are dispatched on the lookahead byte
/// until the payload is exhausted; only the module name is retained. Unknown
/// subsection ids are the one tolerated unknown in the whole grammar: they
/// are logged and skipped.
fn read_name_section(r: &mut Reader, end: usize, module: &mut Module) -> Result<(), ParseError> {
    while r.offset() < end {
        match r.cur_byte() {
            Some(NAME_SUB_MODULE) => {
                module.name = Some(read_name_subsection(r, NAME_SUB_MODULE, |r, _| {
                    r.read_name()
                })?);
            }
            Some(NAME_SUB_FUNCTIONS) => {
                read_name_subsection(r, NAME_SUB_FUNCTIONS, |r, _| read_name_map(r))?;
            }
            Some(NAME_SUB_LOCALS) => {
                read_name_subsection(r, NAME_SUB_LOCALS, |r, _| read_indirect_name_map(r))?;
            }
            Some(NAME_SUB_GLOBALS) => {
                read_name_subsection(r, NAME_SUB_GLOBALS, |r, _| read_name_map(r))?;
            }
            Some(NAME_SUB_DATA_SEGMENTS) => {
                read_name_subsection(r, NAME_SUB_DATA_SEGMENTS, |r, _| read_name_map(r))?;
            }
            _ => {
                let offset = r.offset();
                let id = r.read_byte()?;
                let size = r.read_vu32()?;
                warn!("unrecognized name subsection id {id} at offset {offset}, skipping {size} bytes");
                r.skip(size as usize)?;
            }
        }
    }
    Ok(())
}

fn read_name_subsection<T>(
    r: &mut Reader,
    id: u8,
    subsection: impl FnOnce(&mut Reader, u32) -> Result<T, ParseError>,
) -> Result<T, ParseError> {
    r.expect_byte(id)?;
    let size = r.read_vu32()?;
    subsection(r, size)
}

/// Vector of (index, name) pairs.
fn read_name_map(r: &mut Reader) -> Result<(), ParseError> {
    r.read_vec(|r| {
        r.read_vu32()?; // idx
        r.read_name()?;
        Ok(())
    })?;
    Ok(())
}

/// Vector of (index, name map) pairs; carries local names.
fn read_indirect_name_map(r: &mut Reader) -> Result<(), ParseError> {
    r.read_vec(|r| {
        r.read_vu32()?; // idx
        read_name_map(r)
    })?;
    Ok(())
}

fn read_type_section(r: &mut Reader) -> Result<Vec<FunctionType>, ParseError> {
    read_section(r, SECTION_TYPE, |r, _| r.read_vec(read_functype))
}

fn read_import_section(r: &mut Reader) -> Result<Vec<Import>, ParseError> {
    read_section(r, SECTION_IMPORT, |r, _| r.read_vec(read_import))
}

fn read_import(r: &mut Reader) -> Result<Import, ParseError> {
    let module = r.read_name()?;
    let name = r.read_name()?;
    read_import_desc(r)?;
    Ok(Import { module, name })
}

fn read_import_desc(r: &mut Reader) -> Result<(), ParseError> {
    let offset = r.offset();
    let b = r.read_byte()?;
    match b {
        DESC_FUNC => {
            r.read_vu32()?; // typeidx
        }
        DESC_TABLE => read_table_type(r)?,
        DESC_MEMORY => read_limits(r)?,
        DESC_GLOBAL => read_global_type(r)?,
        DESC_TAG => read_tag(r)?,
        _ => {
            return Err(ParseError::UnknownTag {
                what: "importdesc type",
                found: b,
                offset,
            });
        }
    }
    Ok(())
}

fn read_function_section(r: &mut Reader) -> Result<(), ParseError> {
    read_section(r, SECTION_FUNCTION, |r, _| {
        r.read_vec(|r| {
            r.read_vu32()?; // typeidx
            Ok(())
        })?;
        Ok(())
    })
}

fn read_table_section(r: &mut Reader) -> Result<(), ParseError> {
    read_section(r, SECTION_TABLE, |r, _| {
        r.read_vec(read_table_type)?;
        Ok(())
    })
}

fn read_memory_section(r: &mut Reader) -> Result<(), ParseError> {
    read_section(r, SECTION_MEMORY, |r, _| {
        r.read_vec(read_limits)?;
        Ok(())
    })
}

fn read_tag_section(r: &mut Reader) -> Result<(), ParseError> {
    read_section(r, SECTION_TAG, |r, _| {
        r.read_vec(read_tag)?;
        Ok(())
    })
}

fn read_global_section(r: &mut Reader) -> Result<(), ParseError> {
    read_section(r, SECTION_GLOBAL, |r, _| {
        r.read_vec(|r| {
            read_global_type(r)?;
            read_expr(r) // init expression
        })?;
        Ok(())
    })
}

fn read_export_section(r: &mut Reader) -> Result<(), ParseError> {
    read_section(r, SECTION_EXPORT, |r, _| {
        r.read_vec(|r| {
            r.read_name()?;
            read_export_desc(r)
        })?;
        Ok(())
    })
}

fn read_export_desc(r: &mut Reader) -> Result<(), ParseError> {
    let offset = r.offset();
    let b = r.read_byte()?;
    match b {
        DESC_FUNC | DESC_TABLE | DESC_MEMORY | DESC_GLOBAL | DESC_TAG => {
            r.read_vu32()?; // idx
            Ok(())
        }
        _ => Err(ParseError::UnknownTag {
            what: "exportdesc type",
            found: b,
            offset,
        }),
    }
}

fn read_start_section(r: &mut Reader) -> Result<(), ParseError> {
    read_section(r, SECTION_START, |r, _| {
        r.read_vu32()?; // funcidx
        Ok(())
    })
}

fn read_element_section(r: &mut Reader) -> Result<(), ParseError> {
    read_section(r, SECTION_ELEMENT, |r, _| {
        r.read_vec(read_element)?;
        Ok(())
    })
}

fn read_element(r: &mut Reader) -> Result<(), ParseError> {
    let offset = r.offset();
    let discriminant = r.read_vu32()?;
    match discriminant {
        0 => {
            // active, implicit table 0: offset expression, then func indices
            read_expr(r)?;
            r.read_vec(|r| {
                r.read_vu32()?; // funcidx
                Ok(())
            })?;
            Ok(())
        }
        _ => Err(ParseError::UnknownDiscriminant {
            what: "elem discriminant",
            found: discriminant,
            offset,
        }),
    }
}

fn read_data_count_section(r: &mut Reader) -> Result<(), ParseError> {
    read_section(r, SECTION_DATA_COUNT, |r, _| {
        r.read_vu32()?; // n
        Ok(())
    })
}

fn read_code_section(r: &mut Reader) -> Result<(), ParseError> {
    read_section(r, SECTION_CODE, |r, _| {
        r.read_vec(read_code)?;
        Ok(())
    })
}

fn read_code(r: &mut Reader) -> Result<(), ParseError> {
    // The body is assumed to span exactly the declared size; the section
    // framing check catches any drift.
    r.read_vu32()?; // size
    r.read_vec(read_locals)?;
    read_expr(r)
}

fn read_locals(r: &mut Reader) -> Result<(), ParseError> {
    r.read_vu32()?; // n
    read_valtype(r)?;
    Ok(())
}

fn read_data_section(r: &mut Reader) -> Result<(), ParseError> {
    read_section(r, SECTION_DATA, |r, _| {
        r.read_vec(read_data)?;
        Ok(())
    })
}

fn read_data(r: &mut Reader) -> Result<(), ParseError> {
    let offset = r.offset();
    let discriminant = r.read_vu32()?;
    match discriminant {
        0 => {
            // active, implicit memory 0
            read_expr(r)?;
            r.read_vec(|r| r.read_byte())?;
            Ok(())
        }
        1 => {
            // passive
            r.read_vec(|r| r.read_byte())?;
            Ok(())
        }
        2 => {
            // active, explicit memory
            r.read_vu32()?; // memidx
            read_expr(r)?;
            r.read_vec(|r| r.read_byte())?;
            Ok(())
        }
        _ => Err(ParseError::UnknownDiscriminant {
            what: "data discriminant",
            found: discriminant,
            offset,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_section_is_skipped_exactly() {
        // custom section named "hi!" with no payload, followed by one byte
        // that must remain for the caller
        let bytes = vec![0x00, 0x04, 0x03, b'h', b'i', b'!', 0xBA];
        let mut reader = Reader::new(bytes);
        let mut module = Module::new();
        read_custom_section(&mut reader, &mut module).unwrap();
        assert_eq!(reader.read_byte().unwrap(), 0xBA);
    }

    #[test]
    fn custom_section_size_mismatch() {
        // declared size 5 but the name consumes only 4 bytes and the payload
        // skip runs past the end of input
        let bytes = vec![0x00, 0x05, 0x03, b'h', b'i', b'!'];
        let mut reader = Reader::new(bytes);
        let mut module = Module::new();
        assert!(read_custom_section(&mut reader, &mut module).is_err());
    }

    #[test]
    fn valtype_dispatch() {
        let read = |v: Vec<u8>| read_valtype(&mut Reader::new(v));

        assert_eq!(read(vec![0x7F]).unwrap(), ValueType::I32);
        assert_eq!(read(vec![0x7B]).unwrap(), ValueType::V128);
        assert_eq!(read(vec![0x6F]).unwrap(), ValueType::ExternRef);
        assert!(matches!(
            read(vec![0x41]),
            Err(ParseError::UnknownTag { what: "valtype", .. })
        ));
        assert!(matches!(
            read(vec![]),
            Err(ParseError::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn valtype_byte_predicate_matches_decoder() {
        // the lookahead predicate must agree with what read_valtype accepts
        for byte in 0x00..=0xFFu8 {
            let decoded = read_valtype(&mut Reader::new(vec![byte]));
            assert_eq!(decoded.is_ok(), ValueType::is_value_type_byte(byte));
        }
    }

    #[test]
    fn limits_flags() {
        let read = |v: Vec<u8>| read_limits(&mut Reader::new(v));

        assert!(read(vec![0x00, 0x01]).is_ok());
        assert!(read(vec![0x01, 0x01, 0x02]).is_ok());
        assert!(read(vec![0x02, 0x01]).is_ok());
        assert!(read(vec![0x03, 0x01, 0x02]).is_ok());
        assert!(matches!(
            read(vec![0x04, 0x01]),
            Err(ParseError::UnknownTag {
                what: "limits flags",
                ..
            })
        ));
    }

    #[test]
    fn functype_needs_leading_byte() {
        let bytes = vec![0x61, 0x00, 0x00];
        assert!(matches!(
            read_functype(&mut Reader::new(bytes)),
            Err(ParseError::UnexpectedByte {
                expected: 0x60,
                found: 0x61,
                ..
            })
        ));
    }
}
