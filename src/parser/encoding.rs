//! Binary-format constants for the WebAssembly module grammar.
//!
//! Covers the core spec (2.0 draft 2023-04-08) plus the threads extension
//! (atomic memory instructions), the exception handling proposal (tag section,
//! try/catch family) and the extended name section.

// ---------------------------------------------------------------------------
// Module framing (§5.5.16)
// ---------------------------------------------------------------------------

pub const MAGIC: [u8; 4] = [0x00, 0x61, 0x73, 0x6D];
pub const VERSION: [u8; 4] = [0x01, 0x00, 0x00, 0x00];

// Section ids (§5.5.2, tag section from the exception handling spec)
pub const SECTION_CUSTOM: u8 = 0;
pub const SECTION_TYPE: u8 = 1;
pub const SECTION_IMPORT: u8 = 2;
pub const SECTION_FUNCTION: u8 = 3;
pub const SECTION_TABLE: u8 = 4;
pub const SECTION_MEMORY: u8 = 5;
pub const SECTION_GLOBAL: u8 = 6;
pub const SECTION_EXPORT: u8 = 7;
pub const SECTION_START: u8 = 8;
pub const SECTION_ELEMENT: u8 = 9;
pub const SECTION_CODE: u8 = 10;
pub const SECTION_DATA: u8 = 11;
pub const SECTION_DATA_COUNT: u8 = 12;
pub const SECTION_TAG: u8 = 13;

// Name-section subsection ids (extended name section §7.4.1)
pub const NAME_SUB_MODULE: u8 = 0;
pub const NAME_SUB_FUNCTIONS: u8 = 1;
pub const NAME_SUB_LOCALS: u8 = 2;
pub const NAME_SUB_GLOBALS: u8 = 7;
pub const NAME_SUB_DATA_SEGMENTS: u8 = 9;

// ---------------------------------------------------------------------------
// Types (§5.3)
// ---------------------------------------------------------------------------

// Function type constructor (§5.3.6)
pub const TYPE_FUNC: u8 = 0x60;

// Limits flags (§5.3.7, shared variants from the threads spec)
pub const LIMITS_MIN: u8 = 0x00;
pub const LIMITS_MIN_MAX: u8 = 0x01;
pub const LIMITS_SHARED_MIN: u8 = 0x02;
pub const LIMITS_SHARED_MIN_MAX: u8 = 0x03;

// Global mutability (§5.3.10)
pub const MUT_CONST: u8 = 0x00;
pub const MUT_VAR: u8 = 0x01;

// Import/export descriptor kinds (§5.5.5, §5.5.10, tag kind from the
// exception handling spec)
pub const DESC_FUNC: u8 = 0x00;
pub const DESC_TABLE: u8 = 0x01;
pub const DESC_MEMORY: u8 = 0x02;
pub const DESC_GLOBAL: u8 = 0x03;
pub const DESC_TAG: u8 = 0x04;

// Block type: empty (§5.4.1)
pub const BLOCK_TYPE_EMPTY: u8 = 0x40;

// ---------------------------------------------------------------------------
// Instruction opcodes (§5.4)
// ---------------------------------------------------------------------------

// Control instructions (§5.4.1, try/catch family from the exception
// handling spec)
pub const OP_UNREACHABLE: u8 = 0x00;
pub const OP_NOP: u8 = 0x01;
pub const OP_BLOCK: u8 = 0x02;
pub const OP_LOOP: u8 = 0x03;
pub const OP_IF: u8 = 0x04;
pub const OP_ELSE: u8 = 0x05;
pub const OP_TRY: u8 = 0x06;
pub const OP_CATCH: u8 = 0x07;
pub const OP_THROW: u8 = 0x08;
pub const OP_RETHROW: u8 = 0x09;
pub const OP_END: u8 = 0x0B;
pub const OP_BR: u8 = 0x0C;
pub const OP_BR_IF: u8 = 0x0D;
pub const OP_BR_TABLE: u8 = 0x0E;
pub const OP_RETURN: u8 = 0x0F;
pub const OP_CALL: u8 = 0x10;
pub const OP_CALL_INDIRECT: u8 = 0x11;
pub const OP_DELEGATE: u8 = 0x18;
pub const OP_CATCH_ALL: u8 = 0x19;

// Parametric instructions (§5.4.3)
pub const OP_DROP: u8 = 0x1A;
pub const OP_SELECT: u8 = 0x1B;

// Variable instructions (§5.4.4)
pub const OP_LOCAL_GET: u8 = 0x20;
pub const OP_LOCAL_SET: u8 = 0x21;
pub const OP_LOCAL_TEE: u8 = 0x22;
pub const OP_GLOBAL_GET: u8 = 0x23;
pub const OP_GLOBAL_SET: u8 = 0x24;

// Memory instructions (§5.4.6)
pub const OP_I32_LOAD: u8 = 0x28;
pub const OP_I64_LOAD: u8 = 0x29;
pub const OP_F32_LOAD: u8 = 0x2A;
pub const OP_F64_LOAD: u8 = 0x2B;
pub const OP_I32_LOAD8_S: u8 = 0x2C;
pub const OP_I32_LOAD8_U: u8 = 0x2D;
pub const OP_I32_LOAD16_S: u8 = 0x2E;
pub const OP_I32_LOAD16_U: u8 = 0x2F;
pub const OP_I64_LOAD8_S: u8 = 0x30;
pub const OP_I64_LOAD8_U: u8 = 0x31;
pub const OP_I64_LOAD16_S: u8 = 0x32;
pub const OP_I64_LOAD16_U: u8 = 0x33;
pub const OP_I64_LOAD32_S: u8 = 0x34;
pub const OP_I64_LOAD32_U: u8 = 0x35;
pub const OP_I32_STORE: u8 = 0x36;
pub const OP_I64_STORE: u8 = 0x37;
pub const OP_F32_STORE: u8 = 0x38;
pub const OP_F64_STORE: u8 = 0x39;
pub const OP_I32_STORE8: u8 = 0x3A;
pub const OP_I32_STORE16: u8 = 0x3B;
pub const OP_I64_STORE8: u8 = 0x3C;
pub const OP_I64_STORE16: u8 = 0x3D;
pub const OP_I64_STORE32: u8 = 0x3E;
pub const OP_MEMORY_SIZE: u8 = 0x3F;

// Numeric instructions (§5.4.7)
pub const OP_I32_CONST: u8 = 0x41;
pub const OP_I64_CONST: u8 = 0x42;
pub const OP_F32_CONST: u8 = 0x43;
pub const OP_F64_CONST: u8 = 0x44;

pub const OP_I32_EQZ: u8 = 0x45;
pub const OP_I32_EQ: u8 = 0x46;
pub const OP_I32_NE: u8 = 0x47;
pub const OP_I32_LT_S: u8 = 0x48;
pub const OP_I32_LT_U: u8 = 0x49;
pub const OP_I32_GT_S: u8 = 0x4A;
pub const OP_I32_GT_U: u8 = 0x4B;
pub const OP_I32_LE_S: u8 = 0x4C;
pub const OP_I32_LE_U: u8 = 0x4D;
pub const OP_I32_GE_S: u8 = 0x4E;
pub const OP_I32_GE_U: u8 = 0x4F;

pub const OP_I64_EQZ: u8 = 0x50;
pub const OP_I64_EQ: u8 = 0x51;
pub const OP_I64_NE: u8 = 0x52;
pub const OP_I64_LT_S: u8 = 0x53;
pub const OP_I64_LT_U: u8 = 0x54;
pub const OP_I64_GT_S: u8 = 0x55;
pub const OP_I64_GT_U: u8 = 0x56;
pub const OP_I64_LE_S: u8 = 0x57;
pub const OP_I64_LE_U: u8 = 0x58;
pub const OP_I64_GE_S: u8 = 0x59;
pub const OP_I64_GE_U: u8 = 0x5A;

pub const OP_F64_EQ: u8 = 0x61;
pub const OP_F64_NE: u8 = 0x62;
pub const OP_F64_LT: u8 = 0x63;
pub const OP_F64_GT: u8 = 0x64;
pub const OP_F64_LE: u8 = 0x65;
pub const OP_F64_GE: u8 = 0x66;

pub const OP_I32_CLZ: u8 = 0x67;
pub const OP_I32_CTZ: u8 = 0x68;
pub const OP_I32_ADD: u8 = 0x6A;
pub const OP_I32_SUB: u8 = 0x6B;
pub const OP_I32_MUL: u8 = 0x6C;
pub const OP_I32_DIV_S: u8 = 0x6D;
pub const OP_I32_DIV_U: u8 = 0x6E;
pub const OP_I32_REM_S: u8 = 0x6F;
pub const OP_I32_REM_U: u8 = 0x70;
pub const OP_I32_AND: u8 = 0x71;
pub const OP_I32_OR: u8 = 0x72;
pub const OP_I32_XOR: u8 = 0x73;
pub const OP_I32_SHL: u8 = 0x74;
pub const OP_I32_SHR_S: u8 = 0x75;
pub const OP_I32_SHR_U: u8 = 0x76;
pub const OP_I32_ROTL: u8 = 0x77;

pub const OP_I64_CLZ: u8 = 0x79;
pub const OP_I64_CTZ: u8 = 0x7A;
pub const OP_I64_ADD: u8 = 0x7C;
pub const OP_I64_SUB: u8 = 0x7D;
pub const OP_I64_MUL: u8 = 0x7E;
pub const OP_I64_DIV_S: u8 = 0x7F;
pub const OP_I64_DIV_U: u8 = 0x80;
pub const OP_I64_REM_S: u8 = 0x81;
pub const OP_I64_REM_U: u8 = 0x82;
pub const OP_I64_AND: u8 = 0x83;
pub const OP_I64_OR: u8 = 0x84;
pub const OP_I64_XOR: u8 = 0x85;
pub const OP_I64_SHL: u8 = 0x86;
pub const OP_I64_SHR_S: u8 = 0x87;
pub const OP_I64_SHR_U: u8 = 0x88;

pub const OP_F32_MUL: u8 = 0x94;

pub const OP_F64_ABS: u8 = 0x99;
pub const OP_F64_NEG: u8 = 0x9A;
pub const OP_F64_CEIL: u8 = 0x9B;
pub const OP_F64_FLOOR: u8 = 0x9C;
pub const OP_F64_SQRT: u8 = 0x9F;
pub const OP_F64_ADD: u8 = 0xA0;
pub const OP_F64_SUB: u8 = 0xA1;
pub const OP_F64_MUL: u8 = 0xA2;
pub const OP_F64_DIV: u8 = 0xA3;

pub const OP_I32_WRAP_I64: u8 = 0xA7;
pub const OP_I32_TRUNC_F64_S: u8 = 0xAA;
pub const OP_I32_TRUNC_F64_U: u8 = 0xAB;
pub const OP_I64_EXTEND_I32_S: u8 = 0xAC;
pub const OP_I64_EXTEND_I32_U: u8 = 0xAD;
pub const OP_I64_TRUNC_F64_S: u8 = 0xB0;
pub const OP_I64_TRUNC_F64_U: u8 = 0xB1;
pub const OP_F32_CONVERT_I32_S: u8 = 0xB2;
pub const OP_F32_DEMOTE_F64: u8 = 0xB6;
pub const OP_F64_CONVERT_I32_S: u8 = 0xB7;
pub const OP_F64_CONVERT_I32_U: u8 = 0xB8;
pub const OP_F64_CONVERT_I64_S: u8 = 0xB9;
pub const OP_F64_CONVERT_I64_U: u8 = 0xBA;
pub const OP_F64_PROMOTE_F32: u8 = 0xBB;
pub const OP_I32_REINTERPRET_F32: u8 = 0xBC;
pub const OP_I64_REINTERPRET_F64: u8 = 0xBD;
pub const OP_F32_REINTERPRET_I32: u8 = 0xBE;
pub const OP_F64_REINTERPRET_I64: u8 = 0xBF;

pub const OP_I32_EXTEND8_S: u8 = 0xC0;
pub const OP_I32_EXTEND16_S: u8 = 0xC1;
pub const OP_I64_EXTEND8_S: u8 = 0xC2;
pub const OP_I64_EXTEND16_S: u8 = 0xC3;

// Opcode prefixes introducing a LEB128 secondary opcode
pub const OP_EXT_PREFIX: u8 = 0xFC;
pub const OP_ATOMIC_PREFIX: u8 = 0xFE;

// Extended secondary opcodes (0xFC prefix, §5.4.6)
pub const EXT_OP_MEMORY_INIT: u32 = 8;
pub const EXT_OP_DATA_DROP: u32 = 9;
pub const EXT_OP_MEMORY_COPY: u32 = 10;
pub const EXT_OP_MEMORY_FILL: u32 = 11;

// Atomic secondary opcodes (0xFE prefix, threads spec §5.4.4)
pub const ATOMIC_OP_MEMORY_ATOMIC_NOTIFY: u32 = 0x00;
pub const ATOMIC_OP_MEMORY_ATOMIC_WAIT32: u32 = 0x01;
pub const ATOMIC_OP_I32_ATOMIC_LOAD: u32 = 0x10;
pub const ATOMIC_OP_I64_ATOMIC_LOAD: u32 = 0x11;
pub const ATOMIC_OP_I32_ATOMIC_LOAD8_U: u32 = 0x12;
pub const ATOMIC_OP_I32_ATOMIC_STORE: u32 = 0x17;
pub const ATOMIC_OP_I64_ATOMIC_STORE: u32 = 0x18;
pub const ATOMIC_OP_I32_ATOMIC_STORE8: u32 = 0x19;
pub const ATOMIC_OP_I32_ATOMIC_RMW_ADD: u32 = 0x1E;
pub const ATOMIC_OP_I32_ATOMIC_RMW_SUB: u32 = 0x25;
pub const ATOMIC_OP_I32_ATOMIC_RMW_OR: u32 = 0x33;
pub const ATOMIC_OP_I32_ATOMIC_RMW_XCHG: u32 = 0x41;
pub const ATOMIC_OP_I32_ATOMIC_RMW8_XCHG_U: u32 = 0x43;
pub const ATOMIC_OP_I32_ATOMIC_RMW_CMPXCHG: u32 = 0x48;
pub const ATOMIC_OP_I32_ATOMIC_RMW8_CMPXCHG_U: u32 = 0x4A;
