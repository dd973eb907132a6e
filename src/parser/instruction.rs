//! Instruction grammar: opcode dispatch and expression parsing.
//!
//! Instructions are consumed for conformance only; nothing is retained in the
//! module. Dispatch is a single-byte opcode match, with the 0xFC (extended)
//! and 0xFE (atomic) prefixes each introducing a second-level match on a
//! LEB128 secondary opcode. Block-structured opcodes read instructions until
//! a delimiter appears in the lookahead byte.

use super::encoding::*;
use super::error::ParseError;
use super::module::ValueType;
use super::read_valtype;
use super::reader::Reader;

/// Instructions up to (and consuming) the terminating `end` opcode.
pub fn read_expr(r: &mut Reader) -> Result<(), ParseError> {
    while r.cur_byte() != Some(OP_END) {
        read_instr(r)?;
    }
    r.expect_byte(OP_END)
}

/// Block type: empty, a single value type, or an s33 type index.
fn read_block_type(r: &mut Reader) -> Result<(), ParseError> {
    if r.accept_byte(BLOCK_TYPE_EMPTY) {
        return Ok(());
    }
    match r.cur_byte() {
        Some(b) if ValueType::is_value_type_byte(b) => {
            read_valtype(r)?;
        }
        _ => {
            r.read_vs33()?;
        }
    }
    Ok(())
}

/// Memory argument: alignment and offset.
fn read_mem_arg(r: &mut Reader) -> Result<(), ParseError> {
    r.read_vu32()?; // align
    r.read_vu32()?; // offset
    Ok(())
}

pub fn read_instr(r: &mut Reader) -> Result<(), ParseError> {
    let opcode_offset = r.offset();
    let opcode = r.read_byte()?;
    match opcode {
        // Control instructions. `else`, `end`, `catch`, `catch_all` and
        // `delegate` are delimiters consumed by their enclosing block, so a
        // stray one falls through to the unknown-opcode error below.
        OP_UNREACHABLE | OP_NOP | OP_RETURN => {}
        OP_BLOCK | OP_LOOP => {
            read_block_type(r)?;
            while r.cur_byte() != Some(OP_END) {
                read_instr(r)?;
            }
            r.expect_byte(OP_END)?;
        }
        OP_IF => {
            read_block_type(r)?;
            while !matches!(r.cur_byte(), Some(OP_ELSE | OP_END)) {
                read_instr(r)?;
            }
            if r.accept_byte(OP_ELSE) {
                while r.cur_byte() != Some(OP_END) {
                    read_instr(r)?;
                }
            }
            r.expect_byte(OP_END)?;
        }
        OP_TRY => {
            read_block_type(r)?;
            while !matches!(
                r.cur_byte(),
                Some(OP_CATCH | OP_CATCH_ALL | OP_DELEGATE | OP_END)
            ) {
                read_instr(r)?;
            }
            if r.accept_byte(OP_DELEGATE) {
                // try-delegate: the label index replaces the end opcode
                r.read_vu32()?;
            } else {
                while r.accept_byte(OP_CATCH) {
                    r.read_vu32()?; // tagidx
                    while !matches!(r.cur_byte(), Some(OP_CATCH | OP_CATCH_ALL | OP_END)) {
                        read_instr(r)?;
                    }
                }
                while r.accept_byte(OP_CATCH_ALL) {
                    while !matches!(r.cur_byte(), Some(OP_CATCH_ALL | OP_END)) {
                        read_instr(r)?;
                    }
                }
                r.expect_byte(OP_END)?;
            }
        }
        OP_THROW => {
            r.read_vu32()?; // tagidx
        }
        OP_RETHROW | OP_BR | OP_BR_IF => {
            r.read_vu32()?; // labelidx
        }
        OP_BR_TABLE => {
            r.read_vec(|r| {
                r.read_vu32()?; // labelidx
                Ok(())
            })?;
            r.read_vu32()?; // default labelidx
        }
        OP_CALL => {
            r.read_vu32()?; // funcidx
        }
        OP_CALL_INDIRECT => {
            r.read_vu32()?; // typeidx
            r.read_vu32()?; // tableidx
        }

        // Parametric instructions
        OP_DROP | OP_SELECT => {}

        // Variable instructions
        OP_LOCAL_GET | OP_LOCAL_SET | OP_LOCAL_TEE | OP_GLOBAL_GET | OP_GLOBAL_SET => {
            r.read_vu32()?;
        }

        // Memory instructions
        OP_I32_LOAD | OP_I64_LOAD | OP_F32_LOAD | OP_F64_LOAD | OP_I32_LOAD8_S
        | OP_I32_LOAD8_U | OP_I32_LOAD16_S | OP_I32_LOAD16_U | OP_I64_LOAD8_S
        | OP_I64_LOAD8_U | OP_I64_LOAD16_S | OP_I64_LOAD16_U | OP_I64_LOAD32_S
        | OP_I64_LOAD32_U | OP_I32_STORE | OP_I64_STORE | OP_F32_STORE | OP_F64_STORE
        | OP_I32_STORE8 | OP_I32_STORE16 | OP_I64_STORE8 | OP_I64_STORE16
        | OP_I64_STORE32 => {
            read_mem_arg(r)?;
        }
        OP_MEMORY_SIZE => {
            r.expect_byte(0x00)?;
        }

        // Atomic memory instructions (threads extension)
        OP_ATOMIC_PREFIX => {
            read_atomic_instr(r)?;
        }

        // Numeric instructions
        OP_I32_CONST => {
            r.read_vs32()?;
        }
        OP_I64_CONST => {
            r.read_vs64()?;
        }
        OP_F32_CONST => {
            r.read_f32()?;
        }
        OP_F64_CONST => {
            r.read_f64()?;
        }

        OP_I32_EQZ | OP_I32_EQ | OP_I32_NE | OP_I32_LT_S | OP_I32_LT_U | OP_I32_GT_S
        | OP_I32_GT_U | OP_I32_LE_S | OP_I32_LE_U | OP_I32_GE_S | OP_I32_GE_U => {}

        OP_I64_EQZ | OP_I64_EQ | OP_I64_NE | OP_I64_LT_S | OP_I64_LT_U | OP_I64_GT_S
        | OP_I64_GT_U | OP_I64_LE_S | OP_I64_LE_U | OP_I64_GE_S | OP_I64_GE_U => {}

        OP_F64_EQ | OP_F64_NE | OP_F64_LT | OP_F64_GT | OP_F64_LE | OP_F64_GE => {}

        OP_I32_CLZ | OP_I32_CTZ | OP_I32_ADD | OP_I32_SUB | OP_I32_MUL | OP_I32_DIV_S
        | OP_I32_DIV_U | OP_I32_REM_S | OP_I32_REM_U | OP_I32_AND | OP_I32_OR
        | OP_I32_XOR | OP_I32_SHL | OP_I32_SHR_S | OP_I32_SHR_U | OP_I32_ROTL => {}

        OP_I64_CLZ | OP_I64_CTZ | OP_I64_ADD | OP_I64_SUB | OP_I64_MUL | OP_I64_DIV_S
        | OP_I64_DIV_U | OP_I64_REM_S | OP_I64_REM_U | OP_I64_AND | OP_I64_OR
        | OP_I64_XOR | OP_I64_SHL | OP_I64_SHR_S | OP_I64_SHR_U => {}

        OP_F32_MUL => {}

        OP_F64_ABS | OP_F64_NEG | OP_F64_CEIL | OP_F64_FLOOR | OP_F64_SQRT | OP_F64_ADD
        | OP_F64_SUB | OP_F64_MUL | OP_F64_DIV => {}

        OP_I32_WRAP_I64 | OP_I32_TRUNC_F64_S | OP_I32_TRUNC_F64_U | OP_I64_EXTEND_I32_S
        | OP_I64_EXTEND_I32_U | OP_I64_TRUNC_F64_S | OP_I64_TRUNC_F64_U
        | OP_F32_CONVERT_I32_S | OP_F32_DEMOTE_F64 | OP_F64_CONVERT_I32_S
        | OP_F64_CONVERT_I32_U | OP_F64_CONVERT_I64_S | OP_F64_CONVERT_I64_U
        | OP_F64_PROMOTE_F32 | OP_I32_REINTERPRET_F32 | OP_I64_REINTERPRET_F64
        | OP_F32_REINTERPRET_I32 | OP_F64_REINTERPRET_I64 => {}

        OP_I32_EXTEND8_S | OP_I32_EXTEND16_S | OP_I64_EXTEND8_S | OP_I64_EXTEND16_S => {}

        // Extended instructions
        OP_EXT_PREFIX => {
            read_ext_instr(r)?;
        }

        _ => {
            return Err(ParseError::UnknownTag {
                what: "instruction opcode",
                found: opcode,
                offset: opcode_offset,
            });
        }
    }
    Ok(())
}

/// Secondary dispatch for the 0xFC prefix.
fn read_ext_instr(r: &mut Reader) -> Result<(), ParseError> {
    let opcode_offset = r.offset();
    let opcode = r.read_vu32()?;
    match opcode {
        EXT_OP_MEMORY_INIT => {
            r.read_vu32()?; // dataidx
            r.expect_byte(0x00)?;
        }
        EXT_OP_DATA_DROP => {
            r.read_vu32()?; // dataidx
        }
        EXT_OP_MEMORY_COPY => {
            r.expect_byte(0x00)?;
            r.expect_byte(0x00)?;
        }
        EXT_OP_MEMORY_FILL => {
            r.expect_byte(0x00)?;
        }
        _ => {
            return Err(ParseError::UnknownDiscriminant {
                what: "extended instruction secondary opcode",
                found: opcode,
                offset: opcode_offset,
            });
        }
    }
    Ok(())
}

/// Secondary dispatch for the 0xFE prefix. Every atomic memory instruction
/// carries a memory argument and nothing else.
fn read_atomic_instr(r: &mut Reader) -> Result<(), ParseError> {
    let opcode_offset = r.offset();
    let opcode = r.read_vu32()?;
    match opcode {
        ATOMIC_OP_MEMORY_ATOMIC_NOTIFY
        | ATOMIC_OP_MEMORY_ATOMIC_WAIT32
        | ATOMIC_OP_I32_ATOMIC_LOAD
        | ATOMIC_OP_I64_ATOMIC_LOAD
        | ATOMIC_OP_I32_ATOMIC_LOAD8_U
        | ATOMIC_OP_I32_ATOMIC_STORE
        | ATOMIC_OP_I64_ATOMIC_STORE
        | ATOMIC_OP_I32_ATOMIC_STORE8
        | ATOMIC_OP_I32_ATOMIC_RMW_ADD
        | ATOMIC_OP_I32_ATOMIC_RMW_SUB
        | ATOMIC_OP_I32_ATOMIC_RMW_OR
        | ATOMIC_OP_I32_ATOMIC_RMW_XCHG
        | ATOMIC_OP_I32_ATOMIC_RMW8_XCHG_U
        | ATOMIC_OP_I32_ATOMIC_RMW_CMPXCHG
        | ATOMIC_OP_I32_ATOMIC_RMW8_CMPXCHG_U => read_mem_arg(r),
        _ => Err(ParseError::UnknownDiscriminant {
            what: "atomic instruction secondary opcode",
            found: opcode,
            offset: opcode_offset,
        }),
    }
}
