//! Single-pass recursive-descent parser for the configuration dialect
//!
//! The parser walks a mutable byte buffer once and never backtracks beyond
//! single-byte peeks. String values are decoded destructively in place:
//! escape sequences are overwritten with their UTF-8 expansion and a zero
//! byte is written over the closing quote, so every string node is a
//! zero-copy view into the buffer. The write cursor can never overtake the
//! read cursor because every escape consumes at least as many source bytes
//! as it produces.
//!
//! Reading past the end of the buffer behaves as reading a 0x00 terminator,
//! and an embedded 0x00 byte likewise ends the document.
use std::collections::HashMap;

use crate::errors::JsonResult;
use crate::syntax_error;
use crate::value::{span_str, Node, NodeKind, Span};

pub(crate) struct Parser<'a> {
    buf: &'a mut [u8],
    pos: usize,
    line: u32,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(buf: &'a mut [u8]) -> Self {
        Parser { buf, pos: 0, line: 1 }
    }

    /// Parse the whole buffer into a node tree, consuming the parser.
    /// Trailing whitespace and comments after the root value are permitted;
    /// anything else is an error.
    pub(crate) fn parse(mut self) -> JsonResult<Node> {
        let root = self.parse_value()?;
        self.skip_whitespace();
        if self.peek() != 0 {
            return syntax_error!("invalid value syntax", self.line);
        }
        Ok(root)
    }

    fn at(&self, pos: usize) -> u8 {
        self.buf.get(pos).copied().unwrap_or(0)
    }

    fn peek(&self) -> u8 {
        self.at(self.pos)
    }

    fn take(&mut self) -> u8 {
        let c = self.peek();
        self.pos += 1;
        c
    }

    fn skip_byte(&mut self, byte: u8) -> bool {
        if self.peek() == byte {
            self.pos += 1;
            return true;
        }
        false
    }

    fn skip_text(&mut self, text: &[u8]) -> bool {
        match self.buf.get(self.pos..) {
            Some(rest) if rest.starts_with(text) => {
                self.pos += text.len();
                true
            }
            _ => false,
        }
    }

    /// Skip spaces, tabs, line terminators, and `//` comments, advancing the
    /// line counter on every CR, LF, or CRLF pair
    fn skip_whitespace(&mut self) {
        loop {
            match self.peek() {
                b' ' | b'\t' => self.pos += 1,
                b'\r' | b'\n' => self.skip_to_eol(),
                b'/' if self.at(self.pos + 1) == b'/' => self.skip_to_eol(),
                _ => break,
            }
        }
    }

    /// Consume up to and including the next line terminator, counting the
    /// line. CRLF counts as a single terminator.
    fn skip_to_eol(&mut self) {
        loop {
            let c = self.peek();
            if c == 0 {
                break;
            }
            self.pos += 1;
            if c == b'\r' {
                self.line += 1;
                if self.peek() == b'\n' {
                    self.pos += 1;
                }
                break;
            }
            if c == b'\n' {
                self.line += 1;
                break;
            }
        }
    }

    fn parse_value(&mut self) -> JsonResult<Node> {
        self.skip_whitespace();
        let line = self.line;
        match self.peek() {
            b'n' => {
                if !self.skip_text(b"null") {
                    return syntax_error!("invalid syntax", self.line);
                }
                Ok(Node::new(NodeKind::Null, line))
            }
            b't' => {
                if !self.skip_text(b"true") {
                    return syntax_error!("invalid syntax", self.line);
                }
                Ok(Node::new(NodeKind::Bool(true), line))
            }
            b'f' => {
                if !self.skip_text(b"false") {
                    return syntax_error!("invalid syntax", self.line);
                }
                Ok(Node::new(NodeKind::Bool(false), line))
            }
            b'"' => {
                let span = self.parse_string()?;
                Ok(Node::new(NodeKind::Str(span), line))
            }
            b'[' => self.parse_array(line),
            b'{' => self.parse_object(line),
            b'-' | b'0'..=b'9' => self.parse_number(line),
            _ => syntax_error!("invalid syntax", self.line),
        }
    }

    fn parse_array(&mut self, line: u32) -> JsonResult<Node> {
        self.pos += 1; // '['
        let mut elements: Vec<Node> = Vec::new();
        self.skip_whitespace();
        if !self.skip_byte(b']') {
            loop {
                let mut element = self.parse_value()?;
                element.idx = elements.len() as i32;
                elements.push(element);
                self.skip_whitespace();
                if self.skip_byte(b']') {
                    break;
                }
                if !self.skip_byte(b',') {
                    return syntax_error!("invalid array syntax: expected ',' or ']'", self.line);
                }
            }
        }
        Ok(Node::new(NodeKind::Arr(elements), line))
    }

    fn parse_object(&mut self, line: u32) -> JsonResult<Node> {
        self.pos += 1; // '{'
        let mut members: Vec<Node> = Vec::new();
        let mut index: HashMap<Box<str>, u32> = HashMap::new();
        self.skip_whitespace();
        if !self.skip_byte(b'}') {
            loop {
                if self.peek() != b'"' {
                    return syntax_error!(
                        "invalid object syntax: expected member name or '}'",
                        self.line
                    );
                }
                let name = self.parse_string()?;
                self.skip_whitespace();
                if !self.skip_byte(b':') {
                    return syntax_error!(
                        "invalid object syntax: expected ':' after member name",
                        self.line
                    );
                }
                let mut member = self.parse_value()?;
                member.idx = members.len() as i32;
                member.name = name;
                let key: Box<str> = span_str(self.buf, name).into();
                if index.insert(key, members.len() as u32).is_some() {
                    return syntax_error!(
                        "invalid object syntax: duplicate member name",
                        self.line
                    );
                }
                members.push(member);
                self.skip_whitespace();
                if self.skip_byte(b'}') {
                    break;
                }
                if !self.skip_byte(b',') {
                    return syntax_error!("invalid object syntax: expected ',' or '}'", self.line);
                }
                self.skip_whitespace();
            }
        }
        Ok(Node::new(NodeKind::Obj { members, index }, line))
    }

    /// Parse a string token, decoding it in place. The caller has already
    /// checked that the next byte is the opening quote.
    fn parse_string(&mut self) -> JsonResult<Span> {
        self.pos += 1; // opening quote
        let start = self.pos;
        let mut write = self.pos;
        loop {
            let c = self.take();
            if c == b'"' {
                break;
            }
            if c == b'\r' || c == b'\n' || c == 0 {
                return syntax_error!(
                    "invalid string syntax: line ending before closing quotes",
                    self.line
                );
            }
            if c < 0x20 {
                return syntax_error!(
                    "invalid string syntax: control characters not allowed",
                    self.line
                );
            }
            let decoded = if c == b'\\' {
                match self.take() {
                    b'\\' => b'\\',
                    b'/' => b'/',
                    b'b' => 0x08,
                    b'f' => 0x0C,
                    b'n' => b'\n',
                    b'r' => b'\r',
                    b't' => b'\t',
                    b'u' => {
                        write = self.parse_unicode_escape(write)?;
                        continue;
                    }
                    _ => {
                        self.pos -= 1;
                        return syntax_error!(
                            "invalid string syntax: bad escape character",
                            self.line
                        );
                    }
                }
            } else {
                c
            };
            self.buf[write] = decoded;
            write += 1;
        }
        self.buf[write] = 0; // overwrite the closing quote, or earlier
        Ok(Span {
            start: start as u32,
            len: (write - start) as u32,
        })
    }

    /// Decode a `\u` escape (the `\u` itself is already consumed), writing
    /// the UTF-8 expansion at the write cursor and returning its new
    /// position. A high surrogate must be followed by a `\u` low surrogate;
    /// the pair is combined into a single code point.
    fn parse_unicode_escape(&mut self, mut write: usize) -> JsonResult<usize> {
        let mut code = self.parse_hex4()?;
        if (0xDC00..=0xDFFF).contains(&code) {
            // orphan low surrogate
            return syntax_error!("invalid string syntax: bad utf-16 codepoint", self.line);
        }
        if (0xD800..=0xDBFF).contains(&code) {
            if !self.skip_text(b"\\u") {
                return syntax_error!("invalid string syntax: bad utf-16 codepoint", self.line);
            }
            let low = self.parse_hex4()?;
            if !(0xDC00..=0xDFFF).contains(&low) {
                return syntax_error!("invalid string syntax: bad utf-16 codepoint", self.line);
            }
            code = (((code - 0xD800) << 10) | (low - 0xDC00)) + 0x10000;
        }
        if code <= 0x7F {
            self.buf[write] = code as u8;
            write += 1;
        } else if code <= 0x7FF {
            self.buf[write] = 0xC0 | (code >> 6) as u8;
            self.buf[write + 1] = 0x80 | (code & 0x3F) as u8;
            write += 2;
        } else if code <= 0xFFFF {
            self.buf[write] = 0xE0 | (code >> 12) as u8;
            self.buf[write + 1] = 0x80 | ((code >> 6) & 0x3F) as u8;
            self.buf[write + 2] = 0x80 | (code & 0x3F) as u8;
            write += 3;
        } else {
            self.buf[write] = 0xF0 | (code >> 18) as u8;
            self.buf[write + 1] = 0x80 | ((code >> 12) & 0x3F) as u8;
            self.buf[write + 2] = 0x80 | ((code >> 6) & 0x3F) as u8;
            self.buf[write + 3] = 0x80 | (code & 0x3F) as u8;
            write += 4;
        }
        Ok(write)
    }

    /// Consume exactly four hex digits, case-insensitively
    fn parse_hex4(&mut self) -> JsonResult<u32> {
        let mut code: u32 = 0;
        for _ in 0..4 {
            let digit = match self.take() {
                c @ b'0'..=b'9' => u32::from(c - b'0'),
                c @ b'A'..=b'F' => u32::from(c - b'A' + 10),
                c @ b'a'..=b'f' => u32::from(c - b'a' + 10),
                _ => {
                    return syntax_error!(
                        "invalid string syntax: bad utf-16 codepoint",
                        self.line
                    )
                }
            };
            code = (code << 4) | digit;
        }
        Ok(code)
    }

    /// Parse a number token. The caller has already checked that the next
    /// byte is a digit or a minus sign. A token containing `.`, `e`, or `E`
    /// is a float; everything else must fit in a signed 64-bit integer.
    fn parse_number(&mut self, line: u32) -> JsonResult<Node> {
        let mut p = self.pos;
        let negative = self.at(p) == b'-';
        if negative {
            p += 1;
        }
        let digits_start = p;
        while self.at(p).is_ascii_digit() {
            p += 1;
        }
        if p == digits_start {
            return syntax_error!("invalid number syntax: no digits after '-'", self.line);
        }
        if self.at(digits_start) == b'0' && p - digits_start > 1 {
            return syntax_error!(
                "invalid number syntax: can't start with '0' if followed by another digit",
                self.line
            );
        }
        let mut is_float = false;
        if self.at(p) == b'.' {
            is_float = true;
            p += 1;
            while self.at(p).is_ascii_digit() {
                p += 1;
            }
        }
        if self.at(p) == b'e' || self.at(p) == b'E' {
            is_float = true;
            p += 1;
            if self.at(p) == b'+' || self.at(p) == b'-' {
                p += 1;
            }
            while self.at(p).is_ascii_digit() {
                p += 1;
            }
        }
        let node = if is_float {
            let span = &self.buf[self.pos..p];
            match fast_float::parse_partial::<f64, _>(span) {
                Ok((num, consumed)) if consumed == span.len() => {
                    if !num.is_finite() {
                        return syntax_error!("invalid number syntax: float is too huge", self.line);
                    }
                    Node::new(NodeKind::Float(num), line)
                }
                _ => {
                    return syntax_error!("invalid number syntax: bad float format", self.line);
                }
            }
        } else {
            // Accumulate negated so that i64::MIN remains representable; the
            // cutoff test rejects any magnitude past 9223372036854775807
            // (positive) or 9223372036854775808 (negative).
            const CUTOFF: i64 = -922_337_203_685_477_580;
            let last_digit = if negative { 8 } else { 7 };
            let mut num: i64 = 0;
            for &c in &self.buf[digits_start..p] {
                let digit = i64::from(c - b'0');
                if num < CUTOFF || (num == CUTOFF && digit > last_digit) {
                    return syntax_error!(
                        "invalid number syntax: integer doesn't fit in 64 bits",
                        self.line
                    );
                }
                num = num * 10 - digit;
            }
            if !negative {
                num = -num;
            }
            Node::new(NodeKind::Int(num), line)
        };
        self.pos = p;
        Ok(node)
    }
}
