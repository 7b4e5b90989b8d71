use std::collections::BTreeMap;

use crate::error::TypeError;

/// Nesting limit for decoding. Deeper input is rejected rather than recursed.
const MAX_DEPTH: usize = 64;

/// A bencode value in canonical form.
///
/// Dictionaries are kept in a `BTreeMap`, so keys are always emitted in
/// ascending byte order and the encoding of a given value is unique. Hashes
/// and signatures are computed over [`Value::encode`], never over any other
/// representation.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Value {
    Int(i64),
    Bytes(Vec<u8>),
    List(Vec<Value>),
    Dict(BTreeMap<Vec<u8>, Value>),
}

impl Value {
    /// Canonical bencoding of this value.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.encode_into(&mut out);
        out
    }

    /// Append the canonical bencoding of this value to `out`.
    pub fn encode_into(&self, out: &mut Vec<u8>) {
        match self {
            Self::Int(n) => {
                out.push(b'i');
                out.extend_from_slice(n.to_string().as_bytes());
                out.push(b'e');
            }
            Self::Bytes(b) => write_byte_string(out, b),
            Self::List(items) => {
                out.push(b'l');
                for item in items {
                    item.encode_into(out);
                }
                out.push(b'e');
            }
            Self::Dict(entries) => {
                out.push(b'd');
                for (key, value) in entries {
                    write_byte_string(out, key);
                    value.encode_into(out);
                }
                out.push(b'e');
            }
        }
    }

    /// Decode a complete bencoded buffer.
    ///
    /// Only canonical input is accepted: integers without leading zeros or
    /// `-0`, dictionary keys strictly ascending, and no trailing bytes. This
    /// makes `decode(b)?.encode() == b` for every accepted `b`.
    pub fn decode(data: &[u8]) -> Result<Self, TypeError> {
        let mut decoder = Decoder { data, pos: 0 };
        let value = decoder.value(0)?;
        if decoder.pos != data.len() {
            return Err(decoder.error("trailing data after value"));
        }
        Ok(value)
    }

    /// The byte string payload, if this is a byte string.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// The integer payload, if this is an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }
}

/// Append `data` as a bencode byte string (`<len>:<bytes>`).
pub fn write_byte_string(out: &mut Vec<u8>, data: &[u8]) {
    out.extend_from_slice(data.len().to_string().as_bytes());
    out.push(b':');
    out.extend_from_slice(data);
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Bytes(s.as_bytes().to_vec())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Bytes(s.into_bytes())
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Self::Bytes(b.to_vec())
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Self::Bytes(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

struct Decoder<'a> {
    data: &'a [u8],
    pos: usize,
}

impl Decoder<'_> {
    fn error(&self, reason: &str) -> TypeError {
        TypeError::Bencode {
            offset: self.pos,
            reason: reason.into(),
        }
    }

    fn peek(&self) -> Result<u8, TypeError> {
        self.data
            .get(self.pos)
            .copied()
            .ok_or_else(|| self.error("unexpected end of input"))
    }

    fn value(&mut self, depth: usize) -> Result<Value, TypeError> {
        if depth > MAX_DEPTH {
            return Err(self.error("nesting too deep"));
        }
        match self.peek()? {
            b'i' => {
                self.pos += 1;
                let n = self.integer(b'e')?;
                Ok(Value::Int(n))
            }
            b'0'..=b'9' => Ok(Value::Bytes(self.byte_string()?)),
            b'l' => {
                self.pos += 1;
                let mut items = Vec::new();
                while self.peek()? != b'e' {
                    items.push(self.value(depth + 1)?);
                }
                self.pos += 1;
                Ok(Value::List(items))
            }
            b'd' => {
                self.pos += 1;
                let mut entries = BTreeMap::new();
                let mut last_key: Option<Vec<u8>> = None;
                while self.peek()? != b'e' {
                    let key = self.byte_string()?;
                    if let Some(prev) = &last_key {
                        if key <= *prev {
                            return Err(self.error("dictionary keys not strictly ascending"));
                        }
                    }
                    let value = self.value(depth + 1)?;
                    last_key = Some(key.clone());
                    entries.insert(key, value);
                }
                self.pos += 1;
                Ok(Value::Dict(entries))
            }
            _ => Err(self.error("unexpected byte")),
        }
    }

    /// Parse a decimal integer up to `terminator`, consuming the terminator.
    fn integer(&mut self, terminator: u8) -> Result<i64, TypeError> {
        let start = self.pos;
        let end = self.data[start..]
            .iter()
            .position(|&b| b == terminator)
            .map(|i| start + i)
            .ok_or_else(|| self.error("unterminated integer"))?;
        let digits = &self.data[start..end];
        let canonical = match digits {
            [] | [b'-'] => false,
            [b'0'] => true,
            [b'-', b'0', ..] | [b'0', ..] => false,
            [b'-', rest @ ..] | rest => rest.iter().all(u8::is_ascii_digit),
        };
        if !canonical {
            return Err(self.error("non-canonical integer"));
        }
        let text = std::str::from_utf8(digits).map_err(|_| self.error("invalid integer"))?;
        let n = text
            .parse::<i64>()
            .map_err(|_| self.error("integer out of range"))?;
        self.pos = end + 1;
        Ok(n)
    }

    fn byte_string(&mut self) -> Result<Vec<u8>, TypeError> {
        let len = self.integer(b':')?;
        let len = usize::try_from(len).map_err(|_| self.error("negative string length"))?;
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| self.error("string length exceeds input"))?;
        let bytes = self.data[self.pos..end].to_vec();
        self.pos = end;
        Ok(bytes)
    }
}
