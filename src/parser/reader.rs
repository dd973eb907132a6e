//! Byte source and primitive readers for the binary format.
//!
//! [`Reader`] owns the module bytes and exposes the primitive productions of
//! the binary grammar: raw bytes, LEB128 integers with strict range checks,
//! IEEE 754 floats, length-prefixed names and generic vectors. The grammar
//! layers in [`super`] and [`super::instruction`] are built entirely on these.
//!
//! Several productions (value types, section ids, block terminators) branch on
//! the next byte without consuming it, so the reader keeps a one-byte
//! lookahead: [`Reader::cur_byte`] is the byte the next read will return, and
//! [`Reader::offset`] counts the bytes consumed so far. Offsets appear in
//! every diagnostic.

use byteorder::{ByteOrder, LittleEndian};

use super::error::ParseError;

pub struct Reader {
    bytes: Vec<u8>,
    pos: usize,
}

impl Reader {
    pub fn new(bytes: Vec<u8>) -> Reader {
        Reader { bytes, pos: 0 }
    }

    // Basic operations --------------------------------------------------------

    /// Offset of the lookahead byte: the number of bytes consumed so far.
    pub fn offset(&self) -> usize {
        self.pos
    }

    /// The lookahead byte, or `None` at end of input.
    pub fn cur_byte(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    pub fn is_eof(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    pub fn read_byte(&mut self) -> Result<u8, ParseError> {
        match self.bytes.get(self.pos) {
            Some(&byte) => {
                self.pos += 1;
                Ok(byte)
            }
            None => Err(ParseError::UnexpectedEof { offset: self.pos }),
        }
    }

    /// Consume one byte and require it to equal `expected`.
    pub fn expect_byte(&mut self, expected: u8) -> Result<(), ParseError> {
        let offset = self.pos;
        let found = self.read_byte()?;
        if found != expected {
            return Err(ParseError::UnexpectedByte {
                expected,
                found,
                offset,
            });
        }
        Ok(())
    }

    /// Consume one byte if the lookahead equals `probe`. Never fails.
    pub fn accept_byte(&mut self, probe: u8) -> bool {
        if self.cur_byte() == Some(probe) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    pub fn skip(&mut self, count: usize) -> Result<(), ParseError> {
        if count == 0 {
            return Ok(());
        }
        if self.pos + count > self.bytes.len() {
            return Err(ParseError::UnexpectedEofInSkip {
                count,
                offset: self.pos,
            });
        }
        self.pos += count;
        Ok(())
    }

    // LEB128 integers ---------------------------------------------------------

    /// Unsigned LEB128 with at most `bits` payload bits.
    ///
    /// Each continuation byte contributes 7 bits. The terminator byte must fit
    /// the remaining bit budget, and a continuation byte arriving with 7 or
    /// fewer bits left is itself an overflow, so over-long encodings are
    /// rejected even when the value would fit.
    fn read_unsigned(&mut self, bits: u32) -> Result<u64, ParseError> {
        let start = self.pos;
        let mut result: u64 = 0;
        let mut remaining = bits;
        let mut shift = 0;
        loop {
            let b = self.read_byte()?;
            if b & 0x80 == 0 {
                if remaining < 8 && u32::from(b) >= (1 << remaining) {
                    return Err(ParseError::IntTooWide {
                        kind: "u",
                        bits,
                        position: "trailing",
                        offset: start,
                    });
                }
                result |= u64::from(b & 0x7F) << shift;
                break;
            }
            if remaining <= 7 {
                return Err(ParseError::IntTooWide {
                    kind: "u",
                    bits,
                    position: "middle",
                    offset: start,
                });
            }
            result |= u64::from(b & 0x7F) << shift;
            shift += 7;
            remaining -= 7;
        }
        Ok(result)
    }

    pub fn read_vu8(&mut self) -> Result<u8, ParseError> {
        self.read_unsigned(8).map(|v| v as u8)
    }

    pub fn read_vu16(&mut self) -> Result<u16, ParseError> {
        self.read_unsigned(16).map(|v| v as u16)
    }

    pub fn read_vu32(&mut self) -> Result<u32, ParseError> {
        self.read_unsigned(32).map(|v| v as u32)
    }

    /// Signed LEB128 with at most `bits` payload bits, sign bit included.
    ///
    /// Bit 6 of the terminator byte is the sign. A positive terminator must
    /// fit `remaining - 1` bits; a negative one, read as a 7-bit unsigned,
    /// must be at least `128 - 2^(remaining-1)`. Sign extension subtracts
    /// 0x80 from the terminator before shifting.
    fn read_signed(&mut self, bits: u32) -> Result<i64, ParseError> {
        let start = self.pos;
        let mut result: i64 = 0;
        let mut remaining = bits;
        let mut shift = 0;
        loop {
            let b = self.read_byte()?;
            if b & 0x80 == 0 {
                if b & 0x40 == 0 {
                    // positive
                    if remaining < 8 && u32::from(b) >= (1 << (remaining - 1)) {
                        return Err(ParseError::IntTooWide {
                            kind: "s",
                            bits,
                            position: "trailing",
                            offset: start,
                        });
                    }
                    result |= i64::from(b & 0x3F) << shift;
                } else {
                    // negative
                    if remaining < 8 && u32::from(b) < 128 - (1 << (remaining - 1)) {
                        return Err(ParseError::IntTooWide {
                            kind: "s",
                            bits,
                            position: "trailing",
                            offset: start,
                        });
                    }
                    result |= (i64::from(b) - 0x80) << shift;
                }
                break;
            }
            if remaining <= 7 {
                return Err(ParseError::IntTooWide {
                    kind: "s",
                    bits,
                    position: "middle",
                    offset: start,
                });
            }
            result |= i64::from(b & 0x7F) << shift;
            shift += 7;
            remaining -= 7;
        }
        Ok(result)
    }

    pub fn read_vs8(&mut self) -> Result<i8, ParseError> {
        self.read_signed(8).map(|v| v as i8)
    }

    pub fn read_vs16(&mut self) -> Result<i16, ParseError> {
        self.read_signed(16).map(|v| v as i16)
    }

    pub fn read_vs32(&mut self) -> Result<i32, ParseError> {
        self.read_signed(32).map(|v| v as i32)
    }

    /// 33-bit signed integer, used by block types to hold a type index.
    pub fn read_vs33(&mut self) -> Result<i64, ParseError> {
        self.read_signed(33)
    }

    pub fn read_vs64(&mut self) -> Result<i64, ParseError> {
        self.read_signed(64)
    }

    // Floating point ----------------------------------------------------------

    pub fn read_f32(&mut self) -> Result<f32, ParseError> {
        let mut buf = [0u8; 4];
        for slot in &mut buf {
            *slot = self.read_byte()?;
        }
        Ok(LittleEndian::read_f32(&buf))
    }

    pub fn read_f64(&mut self) -> Result<f64, ParseError> {
        let mut buf = [0u8; 8];
        for slot in &mut buf {
            *slot = self.read_byte()?;
        }
        Ok(LittleEndian::read_f64(&buf))
    }

    // Names and vectors -------------------------------------------------------

    /// Length-prefixed byte sequence interpreted as a UTF-8 string.
    pub fn read_name(&mut self) -> Result<String, ParseError> {
        let len_offset = self.pos;
        let len = self.read_vu32()?;
        if len == u32::MAX {
            return Err(ParseError::VecTooLong {
                len,
                offset: len_offset,
            });
        }
        let start = self.pos;
        let mut bytes = Vec::with_capacity(len as usize);
        for _ in 0..len {
            bytes.push(self.read_byte()?);
        }
        String::from_utf8(bytes).map_err(|_| ParseError::InvalidUtf8 { offset: start })
    }

    /// `u32` count followed by that many elements, each produced by `elem`.
    /// The returned sequence preserves invocation order.
    pub fn read_vec<T>(
        &mut self,
        mut elem: impl FnMut(&mut Reader) -> Result<T, ParseError>,
    ) -> Result<Vec<T>, ParseError> {
        let len_offset = self.pos;
        let n = self.read_vu32()?;
        if n == u32::MAX {
            return Err(ParseError::VecTooLong {
                len: n,
                offset: len_offset,
            });
        }
        let mut result = Vec::with_capacity(n as usize);
        for _ in 0..n {
            result.push(elem(self)?);
        }
        Ok(result)
    }
}

#[test]
fn test_read_byte() {
    let mut reader = Reader::new(vec![0x01, 0x02]);
    assert_eq!(reader.read_byte().unwrap(), 0x01);
    assert_eq!(reader.offset(), 1);
    assert_eq!(reader.cur_byte(), Some(0x02));
    assert_eq!(reader.read_byte().unwrap(), 0x02);
    assert!(reader.is_eof());
    assert_eq!(reader.cur_byte(), None);
    assert_eq!(
        reader.read_byte(),
        Err(ParseError::UnexpectedEof { offset: 2 })
    );
}

#[test]
fn test_expect_byte() {
    let mut reader = Reader::new(vec![0x60, 0x7F]);
    assert!(reader.expect_byte(0x60).is_ok());
    assert_eq!(
        reader.expect_byte(0x60),
        Err(ParseError::UnexpectedByte {
            expected: 0x60,
            found: 0x7F,
            offset: 1
        })
    );
}

#[test]
fn test_accept_byte() {
    let mut reader = Reader::new(vec![0x40]);
    assert!(!reader.accept_byte(0x41));
    assert_eq!(reader.offset(), 0);
    assert!(reader.accept_byte(0x40));
    assert_eq!(reader.offset(), 1);
    assert!(!reader.accept_byte(0x40)); // EOF: never fails, just declines
}

#[test]
fn test_skip() {
    let skip_n_then_read = |n: usize, read: bool| -> Result<u8, ParseError> {
        let mut reader = Reader::new(vec![0x01, 0x02, 0x03, 0x04]);
        reader.skip(n)?;
        if read { reader.read_byte() } else { Ok(0) }
    };

    assert_eq!(skip_n_then_read(0, true).unwrap(), 0x01);
    assert_eq!(skip_n_then_read(1, true).unwrap(), 0x02);
    assert_eq!(skip_n_then_read(2, true).unwrap(), 0x03);
    assert_eq!(skip_n_then_read(3, true).unwrap(), 0x04);
    // skipping to exactly EOF is fine; reading past it is not
    assert!(skip_n_then_read(4, false).is_ok());
    assert!(skip_n_then_read(4, true).is_err());
    assert_eq!(
        skip_n_then_read(7, false),
        Err(ParseError::UnexpectedEofInSkip {
            count: 7,
            offset: 0
        })
    );
}

#[test]
fn test_read_vu8() {
    let read = |v: Vec<u8>| Reader::new(v).read_vu8();

    assert_eq!(read(vec![0x00]).unwrap(), 0);
    assert_eq!(read(vec![0x42]).unwrap(), 0x42);
    assert_eq!(read(vec![0x03]).unwrap(), 0x03);
    assert_eq!(read(vec![0x7F]).unwrap(), 0x7F);
    assert_eq!(read(vec![0x83, 0x00]).unwrap(), 0x03);
    // exceeds u8 range in the trailing byte
    assert!(read(vec![0x83, 0x10]).is_err());
    // exceeds u8 range in a middle byte
    assert!(read(vec![0x80, 0x88, 0x00]).is_err());
    assert_eq!(read(vec![0x80]), Err(ParseError::UnexpectedEof { offset: 1 }));
}

#[test]
fn test_read_vu16() {
    let read = |v: Vec<u8>| Reader::new(v).read_vu16();

    assert_eq!(read(vec![0x00]).unwrap(), 0);
    assert_eq!(read(vec![0x42]).unwrap(), 0x42);
    assert_eq!(read(vec![0x83, 0x00]).unwrap(), 0x03);
    assert_eq!(read(vec![0x83, 0x10]).unwrap(), 0x10 << 7 | 0x03);
    assert_eq!(read(vec![0x80, 0x88, 0x00]).unwrap(), 0x08 << 7);
    assert!(read(vec![0x80]).is_err());
    assert!(read(vec![0x80, 0x88]).is_err());
    assert!(read(vec![0x83, 0x80, 0x10]).is_err()); // trailing-byte overflow
    assert!(read(vec![0x80, 0x80, 0x88, 0x00]).is_err()); // middle-byte overflow
}

#[test]
fn test_read_vu32() {
    let read = |v: Vec<u8>| Reader::new(v).read_vu32();

    assert_eq!(read(vec![0x00]).unwrap(), 0);
    assert_eq!(read(vec![0x01]).unwrap(), 1);
    assert_eq!(read(vec![0b11100101, 0b10001110, 0b00100110]).unwrap(), 624485);
    assert_eq!(read(vec![0x80, 0x7F]).unwrap(), 16256);
    assert_eq!(read(vec![0xFF, 0xFF, 0xFF, 0xFF, 0x0F]).unwrap(), 0xFFFFFFFF);
    assert_eq!(
        read(vec![0xFF, 0xFF, 0xFF, 0xFF, 0x1F]),
        Err(ParseError::IntTooWide {
            kind: "u",
            bits: 32,
            position: "trailing",
            offset: 0
        })
    );
    assert_eq!(
        read(vec![0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x00]),
        Err(ParseError::IntTooWide {
            kind: "u",
            bits: 32,
            position: "middle",
            offset: 0
        })
    );
}

#[test]
fn test_read_vs8() {
    let read = |v: Vec<u8>| Reader::new(v).read_vs8();

    assert_eq!(read(vec![0x00]).unwrap(), 0);
    assert_eq!(read(vec![0x2E]).unwrap(), 0x2E);
    assert_eq!(read(vec![0x7F]).unwrap(), -1);
    assert_eq!(read(vec![0x7E]).unwrap(), -2);
    assert_eq!(read(vec![0xFE, 0x7F]).unwrap(), -2);
    assert!(read(vec![0x80]).is_err()); // EOF
    assert!(read(vec![0x80, 0x88]).is_err()); // EOF
    assert!(read(vec![0x83, 0x3E]).is_err()); // positive trailing overflow
    assert!(read(vec![0xFF, 0x7B]).is_err()); // negative trailing overflow
    assert!(read(vec![0xFF, 0xFF, 0x3F]).is_err()); // middle-byte overflow
    assert!(read(vec![0xFF, 0xFF, 0x7F]).is_err()); // middle-byte overflow
}

#[test]
fn test_read_vs16() {
    let read = |v: Vec<u8>| Reader::new(v).read_vs16();

    assert_eq!(read(vec![0x00]).unwrap(), 0);
    assert_eq!(read(vec![0x7F]).unwrap(), -1);
    assert_eq!(read(vec![0xFE, 0x7F]).unwrap(), -2);
    assert_eq!(read(vec![0xFF, 0x3F]).unwrap(), 0x3F << 7 | 0x7F);
    assert!(read(vec![0xFF, 0xFF, 0x3F]).is_err());
    assert!(read(vec![0xFF, 0xFF, 0x7B]).is_err());
    assert!(read(vec![0xFF, 0xFF, 0xFF, 0x3F]).is_err());
}

#[test]
fn test_read_vs32() {
    let read = |v: Vec<u8>| Reader::new(v).read_vs32();

    assert_eq!(read(vec![0x00]).unwrap(), 0);
    assert_eq!(read(vec![0x01]).unwrap(), 1);
    assert_eq!(read(vec![0b11100101, 0b10001110, 0b00100110]).unwrap(), 624485);
    assert_eq!(read(vec![0x7F]).unwrap(), -1);
    assert_eq!(read(vec![0x80, 0x7F]).unwrap(), -128);
    assert_eq!(
        read(vec![0b10011011, 0b11110001, 0b01011001]).unwrap(),
        -624485
    );
    assert_eq!(
        read(vec![0x80, 0x80, 0x80, 0x80, 0x78]).unwrap(),
        i32::MIN
    );
}

#[test]
fn test_read_vs33() {
    let read = |v: Vec<u8>| Reader::new(v).read_vs33();

    assert_eq!(read(vec![0x00]).unwrap(), 0);
    assert_eq!(read(vec![0x2A]).unwrap(), 42);
    assert_eq!(read(vec![0x7F]).unwrap(), -1);
    // 2^32 - 1 as a type index needs all 33 bits
    assert_eq!(
        read(vec![0xFF, 0xFF, 0xFF, 0xFF, 0x0F]).unwrap(),
        0xFFFFFFFF
    );
    assert!(read(vec![0xFF, 0xFF, 0xFF, 0xFF, 0x4F]).is_err());
}

#[test]
fn test_read_vs64() {
    let read = |v: Vec<u8>| Reader::new(v).read_vs64();

    assert_eq!(read(vec![0x00]).unwrap(), 0);
    assert_eq!(read(vec![0x7F]).unwrap(), -1);
    assert_eq!(
        read(vec![0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0xFC, 0xFF, 0x00]).unwrap(),
        0x7FF8000000000000
    );
    assert_eq!(
        read(vec![0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x7F]).unwrap(),
        i64::MIN
    );
    // only 0x00 and 0x7f are valid tenth bytes
    assert!(read(vec![0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x7E]).is_err());
    assert!(read(vec![0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x01]).is_err());
}

#[test]
fn test_read_f32() {
    let read = |v: Vec<u8>| Reader::new(v).read_f32();

    assert_eq!(read(vec![0x00, 0x48, 0x2A, 0x44]).unwrap(), 681.125f32);
    assert_eq!(read(vec![0, 0, 0, 0]).unwrap(), 0.0);
    let neg_zero = read(vec![0, 0, 0, 0x80]).unwrap();
    assert_eq!(neg_zero, 0.0);
    assert!(neg_zero.is_sign_negative());
    assert_eq!(read(vec![0, 0, 0x80, 0x7F]).unwrap(), f32::INFINITY);
    assert_eq!(read(vec![0, 0, 0x80, 0xFF]).unwrap(), f32::NEG_INFINITY);
    assert!(read(vec![0, 0, 0xC0, 0x7F]).unwrap().is_nan());
    assert!(read(vec![0, 0, 0]).is_err());
}

#[test]
fn test_read_f64() {
    let read = |v: Vec<u8>| Reader::new(v).read_f64();

    assert_eq!(
        read(vec![0x00, 0x00, 0x00, 0x00, 0x00, 0x49, 0x85, 0x40]).unwrap(),
        681.125
    );
    assert_eq!(read(vec![0, 0, 0, 0, 0, 0, 0, 0]).unwrap(), 0.0);
    let neg_zero = read(vec![0, 0, 0, 0, 0, 0, 0, 0x80]).unwrap();
    assert_eq!(neg_zero, 0.0);
    assert!(neg_zero.is_sign_negative());
    assert_eq!(
        read(vec![0, 0, 0, 0, 0, 0, 0xF0, 0x7F]).unwrap(),
        f64::INFINITY
    );
    assert_eq!(
        read(vec![0, 0, 0, 0, 0, 0, 0xF0, 0xFF]).unwrap(),
        f64::NEG_INFINITY
    );
    assert_eq!(
        read(vec![0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xE9, 0x3F]).unwrap(),
        0.781250
    );
    assert_eq!(
        read(vec![0x00, 0x00, 0x00, 0xC0, 0x8B, 0xF5, 0x72, 0x41]).unwrap(),
        19880124.0
    );
    assert!(read(vec![0, 0, 0, 0]).is_err());
}

#[test]
fn test_read_name() {
    let read = |v: Vec<u8>| Reader::new(v).read_name();

    assert_eq!(read(vec![0x00]).unwrap(), "");
    assert_eq!(read(vec![0x05, b'h', b'e', b'l', b'l', b'o']).unwrap(), "hello");
    assert_eq!(
        read(vec![0x02, 0xFF, 0xFE]),
        Err(ParseError::InvalidUtf8 { offset: 1 })
    );
    assert_eq!(
        read(vec![0x05, b'h', b'i']),
        Err(ParseError::UnexpectedEof { offset: 3 })
    );
}

#[test]
fn test_read_vec() {
    let mut reader = Reader::new(vec![0x03, 0x0A, 0x0B, 0x0C]);
    let v = reader.read_vec(|r| r.read_byte()).unwrap();
    assert_eq!(v, vec![0x0A, 0x0B, 0x0C]);

    let mut reader = Reader::new(vec![0x02, 0x0A]);
    assert!(reader.read_vec(|r| r.read_byte()).is_err());

    // a count of 2^32 - 1 would overflow the element loop
    let mut reader = Reader::new(vec![0xFF, 0xFF, 0xFF, 0xFF, 0x0F]);
    assert_eq!(
        reader.read_vec(|r| r.read_byte()),
        Err(ParseError::VecTooLong {
            len: u32::MAX,
            offset: 0
        })
    );
}
