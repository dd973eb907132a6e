//! Text-format emission: a stateful s-expression printer.
//!
//! [`WatWriter`] appends tokens to a string sink while tracking the small
//! amount of lexical state the format needs: whether the next token must be
//! separated from the previous one (`need_ws`), whether an s-expression was
//! just closed (`just_closed_sexp`, so `)` followed by `(` still gets a
//! space), and the current indentation depth for explicit newlines.
//!
//! A writer is bound to one module emission; state does not carry across
//! modules.

use crate::parser::module::{FunctionType, Import, Module, ValueType};

use super::error::EmitError;

/// Characters permitted in an identifier besides digits and ASCII letters.
const ID_PUNCTUATION: &str = "!#$%&'*+-./:<=>?@\\^_`|~";

pub struct WatWriter<'a> {
    out: &'a mut String,
    need_ws: bool,
    indent_level: i32,
    just_closed_sexp: bool,
}

impl<'a> WatWriter<'a> {
    pub fn new(out: &'a mut String) -> WatWriter<'a> {
        WatWriter {
            out,
            need_ws: false,
            indent_level: 0,
            just_closed_sexp: false,
        }
    }

    // Lexical format ----------------------------------------------------------

    /// One space if the previous token requires separation.
    fn maybe_ws(&mut self) {
        if self.need_ws || self.just_closed_sexp {
            self.out.push(' ');
            self.need_ws = false;
            self.just_closed_sexp = false;
        }
    }

    /// Newline followed by the current indentation.
    pub fn newline(&mut self) {
        self.out.push('\n');
        for _ in 0..self.indent_level {
            self.out.push(' ');
        }
        self.need_ws = false;
        self.just_closed_sexp = false;
    }

    pub fn left_paren(&mut self) {
        self.maybe_ws();
        self.out.push('(');
        self.indent_level += 2;
        self.need_ws = false;
        self.just_closed_sexp = false;
    }

    pub fn right_paren(&mut self) {
        self.out.push(')');
        self.indent_level -= 2;
        self.need_ws = false;
        self.just_closed_sexp = true;
    }

    pub fn keyword(&mut self, keyword: &str) {
        self.maybe_ws();
        self.out.push_str(keyword);
        self.need_ws = true;
        self.just_closed_sexp = false;
    }

    /// `$`-prefixed identifier. The identifier must be non-empty and drawn
    /// from digits, ASCII letters and [`ID_PUNCTUATION`].
    pub fn id(&mut self, id: &str) -> Result<(), EmitError> {
        if id.is_empty() {
            return Err(EmitError::new("invalid empty identifier"));
        }
        for c in id.chars() {
            if !c.is_ascii_alphanumeric() && !ID_PUNCTUATION.contains(c) {
                return Err(EmitError::new(format!(
                    "invalid character {c:?} in identifier \"{id}\""
                )));
            }
        }
        self.maybe_ws();
        self.out.push('$');
        self.out.push_str(id);
        self.need_ws = true;
        self.just_closed_sexp = false;
        Ok(())
    }

    /// Quoted string. Printable ASCII passes through, the short escapes are
    /// used where they exist, and everything else is dumped as raw bytes in
    /// `\xx` hex form (no UTF-8 awareness).
    pub fn string(&mut self, s: &str) {
        self.maybe_ws();
        self.out.push('"');
        for b in s.bytes() {
            match b {
                b'\t' => self.out.push_str("\\t"),
                b'\n' => self.out.push_str("\\n"),
                b'\r' => self.out.push_str("\\r"),
                b'"' => self.out.push_str("\\\""),
                b'\'' => self.out.push_str("\\'"),
                b'\\' => self.out.push_str("\\\\"),
                0x20..=0x7E => self.out.push(b as char),
                _ => self.out.push_str(&format!("\\{b:02x}")),
            }
        }
        self.out.push('"');
        self.need_ws = true;
        self.just_closed_sexp = false;
    }

    /// A name is written as a string.
    pub fn name(&mut self, name: &str) {
        self.string(name);
    }

    /// `(;`-style block comment. The body is assumed not to contain an
    /// unbalanced `;)`.
    pub fn block_comment(&mut self, comment: &str) {
        self.maybe_ws();
        self.out.push_str("(;");
        self.out.push_str(comment);
        self.out.push_str(";)");
        self.need_ws = true;
        self.just_closed_sexp = true;
    }

    // Types -------------------------------------------------------------------

    pub fn write_valtype(&mut self, valtype: ValueType) {
        self.keyword(valtype.keyword());
    }

    /// `(func (param ...) (result ...))`, omitting an empty `param` or
    /// `result` list.
    pub fn write_functype(&mut self, functype: &FunctionType) {
        self.left_paren();
        self.keyword("func");
        if !functype.params.is_empty() {
            self.left_paren();
            self.keyword("param");
            for &param in &functype.params {
                self.write_valtype(param);
            }
            self.right_paren();
        }
        if !functype.results.is_empty() {
            self.left_paren();
            self.keyword("result");
            for &result in &functype.results {
                self.write_valtype(result);
            }
            self.right_paren();
        }
        self.right_paren();
    }

    // Modules -----------------------------------------------------------------

    /// `(type (;N;) <functype>)` on its own line.
    pub fn write_type(&mut self, type_idx: usize, functype: &FunctionType) {
        self.newline();
        self.left_paren();
        self.keyword("type");
        self.block_comment(&type_idx.to_string());
        self.write_functype(functype);
        self.right_paren();
    }

    /// `(import "module" "name")` on its own line.
    pub fn write_import(&mut self, import: &Import) {
        self.newline();
        self.left_paren();
        self.keyword("import");
        self.name(&import.module);
        self.name(&import.name);
        self.right_paren();
    }

    pub fn write_module(&mut self, module: &Module) -> Result<(), EmitError> {
        self.left_paren();
        self.keyword("module");
        if let Some(name) = &module.name {
            self.id(name)?;
        }
        for (type_idx, functype) in module.types.iter().enumerate() {
            self.write_type(type_idx, functype);
        }
        for import in &module.imports {
            self.write_import(import);
        }
        self.right_paren();
        Ok(())
    }
}
