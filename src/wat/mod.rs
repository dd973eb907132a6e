//! WebAssembly Text Format (WAT) emission.
//!
//! This module renders a decoded [`crate::parser::module::Module`] as WAT, the
//! human-readable s-expression format for WebAssembly modules.
//!
//! # Example
//!
//! ```
//! use wasmtext::parser::module::Module;
//! use wasmtext::wat::WatWriter;
//!
//! let module = Module {
//!     name: Some("hello".to_string()),
//!     ..Module::new()
//! };
//!
//! let mut out = String::new();
//! WatWriter::new(&mut out).write_module(&module).unwrap();
//! assert_eq!(out, "(module $hello)");
//! ```

mod error;
mod writer;

pub use error::EmitError;
pub use writer::WatWriter;
