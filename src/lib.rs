//! A WebAssembly binary-to-text toolkit written in Rust.
//!
//! wasmtext decodes binary `.wasm` modules into an in-memory representation
//! and renders them in the WebAssembly text format (WAT):
//!
//! - [`parser`] -- Binary format decoder. Reads `.wasm` bytes into a
//!   [`parser::module::Module`] with strict framing, section-order and LEB128
//!   range checks.
//! - [`wat`] -- Text format emitter. Renders a `Module` as an s-expression
//!   with stable two-space indentation.
//!
//! # Example
//!
//! Decode a binary module and print it as text:
//!
//! ```
//! use wasmtext::parser::{self, reader::Reader};
//! use wasmtext::wat::WatWriter;
//!
//! let bytes = vec![0x00, 0x61, 0x73, 0x6D, 0x01, 0x00, 0x00, 0x00];
//! let module = parser::parse(&mut Reader::new(bytes)).unwrap();
//!
//! let mut out = String::new();
//! WatWriter::new(&mut out).write_module(&module).unwrap();
//! assert_eq!(out, "(module)");
//! ```
//!
//! # Specification
//!
//! Targets the [WebAssembly 2.0 specification](https://webassembly.github.io/spec/core/)
//! (draft 2023-04-08), plus the threads extension (atomic memory
//! instructions), the exception handling proposal (tag section, try/catch)
//! and the extended name section.

pub mod parser;
pub mod wat;
