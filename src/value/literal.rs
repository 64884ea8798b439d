//! Literal text syntax for documents
//!
//! The text format stores a document as a single literal expression:
//!
//! ```text
//! {'name': 'leaf', 'size': 3, 'ratio': 0.5, 'tags': ['a', 'b'], 'ok': True, 'gone': None}
//! ```
//!
//! Besides mappings, lists and scalars the syntax knows bytes (`b'\x00'`),
//! timestamps (`datetime('2024-01-01T00:00:00Z')`) and links
//! (`link({'name': 'sub.pyn', 'format': 'structured'})`). The reader
//! accepts literals only; there is no expression evaluation.

use std::fmt::Write as _;

use chrono::{DateTime, SecondsFormat, Utc};

use super::errors::{ValueError, ValueResult};
use super::{Link, Map, Value};

/// Deepest nesting of containers the reader accepts
pub const MAX_DEPTH: usize = 128;

/// Render a value in literal syntax
pub fn to_literal(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value);
    out
}

/// Parse a complete literal document
pub fn parse_literal(text: &str) -> ValueResult<Value> {
    let mut parser = Parser {
        src: text,
        pos: 0,
        depth: 0,
    };
    let value = parser.parse_value()?;
    parser.skip_whitespace();
    if parser.pos != text.len() {
        return Err(ValueError::syntax(parser.pos, "trailing characters"));
    }
    Ok(value)
}

fn write_value(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("None"),
        Value::Bool(true) => out.push_str("True"),
        Value::Bool(false) => out.push_str("False"),
        Value::Int(n) => {
            let _ = write!(out, "{}", n);
        }
        Value::Float(f) => write_float(out, *f),
        Value::Str(s) => write_str(out, s),
        Value::Bytes(b) => write_bytes(out, b),
        Value::Timestamp(t) => {
            out.push_str("datetime(");
            write_str(out, &t.to_rfc3339_opts(SecondsFormat::AutoSi, true));
            out.push(')');
        }
        Value::List(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_value(out, item);
            }
            out.push(']');
        }
        Value::Map(map) => write_map(out, map),
        Value::Link(link) => {
            out.push_str("link(");
            write_map(out, &link.to_map());
            out.push(')');
        }
    }
}

fn write_map(out: &mut String, map: &Map) {
    out.push('{');
    for (i, (key, item)) in map.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_str(out, key);
        out.push_str(": ");
        write_value(out, item);
    }
    out.push('}');
}

fn write_float(out: &mut String, f: f64) {
    if f.is_nan() {
        out.push_str("nan");
    } else if f.is_infinite() {
        out.push_str(if f > 0.0 { "inf" } else { "-inf" });
    } else {
        // Debug keeps a fractional part or exponent, so the reader sees a float
        let _ = write!(out, "{:?}", f);
    }
}

fn write_str(out: &mut String, s: &str) {
    out.push('\'');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 || c as u32 == 0x7f => {
                let _ = write!(out, "\\x{:02x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('\'');
}

fn write_bytes(out: &mut String, bytes: &[u8]) {
    out.push_str("b'");
    for &b in bytes {
        match b {
            b'\\' => out.push_str("\\\\"),
            b'\'' => out.push_str("\\'"),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b'\t' => out.push_str("\\t"),
            0x20..=0x7e => out.push(b as char),
            _ => {
                let _ = write!(out, "\\x{:02x}", b);
            }
        }
    }
    out.push('\'');
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
    }

    fn expect(&mut self, expected: char) -> ValueResult<()> {
        self.skip_whitespace();
        match self.bump() {
            Some(c) if c == expected => Ok(()),
            Some(c) => Err(ValueError::syntax(
                self.pos - c.len_utf8(),
                format!("expected '{}', found '{}'", expected, c),
            )),
            None => Err(ValueError::syntax(
                self.pos,
                format!("expected '{}', found end of input", expected),
            )),
        }
    }

    fn parse_value(&mut self) -> ValueResult<Value> {
        if self.depth >= MAX_DEPTH {
            return Err(ValueError::syntax(self.pos, "nesting too deep"));
        }
        self.depth += 1;
        let value = self.parse_item();
        self.depth -= 1;
        value
    }

    fn parse_item(&mut self) -> ValueResult<Value> {
        self.skip_whitespace();
        let start = self.pos;
        match self.peek() {
            None => Err(ValueError::syntax(start, "unexpected end of input")),
            Some('{') => self.parse_map().map(Value::Map),
            Some('[') => self.parse_sequence('[', ']').map(Value::List),
            Some('(') => self.parse_sequence('(', ')').map(Value::List),
            Some('\'') | Some('"') => self.parse_str().map(Value::Str),
            Some(c) if c.is_ascii_digit() || c == '-' || c == '+' || c == '.' => {
                self.parse_number()
            }
            Some(c) if c.is_ascii_alphabetic() || c == '_' => self.parse_word(),
            Some(c) => Err(ValueError::syntax(
                start,
                format!("unexpected character '{}'", c),
            )),
        }
    }

    fn parse_map(&mut self) -> ValueResult<Map> {
        self.expect('{')?;
        let mut map = Map::new();
        loop {
            self.skip_whitespace();
            if self.peek() == Some('}') {
                self.bump();
                return Ok(map);
            }
            let key_pos = self.pos;
            let key = match self.parse_value()? {
                Value::Str(s) => s,
                other => {
                    return Err(ValueError::syntax(
                        key_pos,
                        format!("mapping keys must be strings, found {}", other.type_name()),
                    ))
                }
            };
            self.expect(':')?;
            let value = self.parse_value()?;
            map.insert(key, value);
            self.skip_whitespace();
            match self.bump() {
                Some(',') => continue,
                Some('}') => return Ok(map),
                _ => return Err(ValueError::syntax(self.pos, "expected ',' or '}'")),
            }
        }
    }

    fn parse_sequence(&mut self, open: char, close: char) -> ValueResult<Vec<Value>> {
        self.expect(open)?;
        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            if self.peek() == Some(close) {
                self.bump();
                return Ok(items);
            }
            items.push(self.parse_value()?);
            self.skip_whitespace();
            match self.bump() {
                Some(',') => continue,
                Some(c) if c == close => return Ok(items),
                _ => {
                    return Err(ValueError::syntax(
                        self.pos,
                        format!("expected ',' or '{}'", close),
                    ))
                }
            }
        }
    }

    /// Reads a quoted body, returning raw chars with escapes resolved by `unescape`
    fn parse_quoted<F>(&mut self, mut unescape: F) -> ValueResult<()>
    where
        F: FnMut(&mut Self, Option<char>, char) -> ValueResult<()>,
    {
        let start = self.pos;
        let quote = match self.bump() {
            Some(q @ ('\'' | '"')) => q,
            _ => return Err(ValueError::syntax(start, "expected quote")),
        };
        loop {
            match self.bump() {
                None => return Err(ValueError::syntax(start, "unterminated string")),
                Some(c) if c == quote => return Ok(()),
                Some('\\') => {
                    let escaped = self.bump();
                    unescape(self, escaped, '\\')?;
                }
                Some(c) => unescape(self, None, c)?,
            }
        }
    }

    fn parse_str(&mut self) -> ValueResult<String> {
        let mut out = String::new();
        self.parse_quoted(|parser, escaped, c| {
            match escaped {
                None => out.push(c),
                Some(e) => {
                    let code = parser.parse_escape(e)?;
                    let ch = char::from_u32(code).ok_or_else(|| {
                        ValueError::syntax(parser.pos, "invalid unicode escape")
                    })?;
                    out.push(ch);
                }
            }
            Ok(())
        })?;
        Ok(out)
    }

    fn parse_bytes(&mut self) -> ValueResult<Vec<u8>> {
        let mut out = Vec::new();
        self.parse_quoted(|parser, escaped, c| {
            let code = match escaped {
                None => c as u32,
                Some(e) => parser.parse_escape(e)?,
            };
            let byte = u8::try_from(code)
                .map_err(|_| ValueError::syntax(parser.pos, "bytes literal must be ASCII"))?;
            if escaped.is_none() && !byte.is_ascii() {
                return Err(ValueError::syntax(parser.pos, "bytes literal must be ASCII"));
            }
            out.push(byte);
            Ok(())
        })?;
        Ok(out)
    }

    /// Resolves the character after a backslash to a code point
    fn parse_escape(&mut self, escaped: char) -> ValueResult<u32> {
        let code = match escaped {
            '\\' => '\\' as u32,
            '\'' => '\'' as u32,
            '"' => '"' as u32,
            'n' => '\n' as u32,
            'r' => '\r' as u32,
            't' => '\t' as u32,
            '0' => 0,
            'x' => self.parse_hex(2)?,
            'u' => self.parse_hex(4)?,
            other => {
                return Err(ValueError::syntax(
                    self.pos,
                    format!("unknown escape '\\{}'", other),
                ))
            }
        };
        Ok(code)
    }

    fn parse_hex(&mut self, digits: usize) -> ValueResult<u32> {
        let start = self.pos;
        let end = start + digits;
        let hex = self
            .src
            .get(start..end)
            .ok_or_else(|| ValueError::syntax(start, "truncated escape"))?;
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ValueError::syntax(start, "invalid hex escape"));
        }
        let code = u32::from_str_radix(hex, 16)
            .map_err(|_| ValueError::syntax(start, "invalid hex escape"))?;
        self.pos = end;
        Ok(code)
    }

    fn parse_number(&mut self) -> ValueResult<Value> {
        let src = self.src;
        let start = self.pos;
        while let Some(c) = self.peek() {
            let sign_after_exponent =
                (c == '-' || c == '+') && src[start..self.pos].ends_with(['e', 'E']);
            let leading_sign = (c == '-' || c == '+') && self.pos == start;
            if c.is_ascii_digit()
                || c == '.'
                || c == 'e'
                || c == 'E'
                || c == '_'
                || sign_after_exponent
                || leading_sign
            {
                self.pos += 1;
            } else {
                break;
            }
        }
        let text = &src[start..self.pos];

        // signed specials: -inf, +inf, -nan
        if text == "-" || text == "+" {
            let word = self.parse_identifier();
            return match word {
                "inf" if text == "-" => Ok(Value::Float(f64::NEG_INFINITY)),
                "inf" => Ok(Value::Float(f64::INFINITY)),
                "nan" => Ok(Value::Float(f64::NAN)),
                _ => Err(ValueError::syntax(start, "invalid number")),
            };
        }

        let cleaned: String = text.chars().filter(|&c| c != '_').collect();
        if cleaned.contains(['.', 'e', 'E']) {
            cleaned
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| ValueError::syntax(start, format!("invalid float '{}'", text)))
        } else {
            cleaned
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|_| ValueError::syntax(start, format!("invalid integer '{}'", text)))
        }
    }

    fn parse_identifier(&mut self) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                self.pos += 1;
            } else {
                break;
            }
        }
        let src = self.src;
        &src[start..self.pos]
    }

    fn parse_word(&mut self) -> ValueResult<Value> {
        let start = self.pos;
        let word = self.parse_identifier();
        match word {
            "None" => Ok(Value::Null),
            "True" => Ok(Value::Bool(true)),
            "False" => Ok(Value::Bool(false)),
            "inf" => Ok(Value::Float(f64::INFINITY)),
            "nan" => Ok(Value::Float(f64::NAN)),
            "b" if matches!(self.peek(), Some('\'' | '"')) => self.parse_bytes().map(Value::Bytes),
            "datetime" => {
                self.expect('(')?;
                self.skip_whitespace();
                let text_pos = self.pos;
                let text = self.parse_str()?;
                self.expect(')')?;
                DateTime::parse_from_rfc3339(&text)
                    .map(|t| Value::Timestamp(t.with_timezone(&Utc)))
                    .map_err(|e| ValueError::syntax(text_pos, format!("invalid timestamp: {}", e)))
            }
            "link" => {
                self.expect('(')?;
                self.skip_whitespace();
                let map_pos = self.pos;
                let map = self.parse_map()?;
                self.expect(')')?;
                Link::from_map(&map)
                    .map(Value::Link)
                    .ok_or_else(|| ValueError::syntax(map_pos, "malformed link"))
            }
            other => Err(ValueError::syntax(
                start,
                format!("'{}' is not a literal", other),
            )),
        }
    }
}
