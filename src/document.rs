//! The document handle owning a parsed configuration
use crate::errors::JsonResult;
use crate::parser::Parser;
use crate::syntax_error;
use crate::value::{Node, Value};

/// Backing storage for a parsed document
enum Buffer<'b> {
    Empty,
    Owned(Box<[u8]>),
    Borrowed(&'b mut [u8]),
}

impl Buffer<'_> {
    fn bytes(&self) -> &[u8] {
        match self {
            Buffer::Empty => &[],
            Buffer::Owned(buf) => buf,
            Buffer::Borrowed(buf) => buf,
        }
    }
}

/// Top-level handle owning the parsed tree and, for [Document::parse], its
/// backing buffer
///
/// A document starts out empty. [Document::parse] copies the input into an
/// internal buffer before parsing; [Document::parse_in_place] decodes
/// directly inside the caller's buffer, which then must stay alive and
/// untouched for the document's lifetime. Either way the previous tree and
/// buffer are released first, and a failed parse leaves the document empty
/// rather than half-built.
pub struct Document<'b> {
    buf: Buffer<'b>,
    root: Option<Node>,
}

impl<'b> Document<'b> {
    pub fn new() -> Self {
        Document {
            buf: Buffer::Empty,
            root: None,
        }
    }

    /// Parse a copy of `input`, returning the root value
    pub fn parse(&mut self, input: &[u8]) -> JsonResult<Value<'_>> {
        self.clear();
        check_utf8(input)?;
        let mut owned: Box<[u8]> = input.to_vec().into_boxed_slice();
        let root = Parser::new(&mut owned).parse()?;
        Ok(self.install(Buffer::Owned(owned), root))
    }

    /// Parse a copy of a string slice, returning the root value
    pub fn parse_str(&mut self, input: &str) -> JsonResult<Value<'_>> {
        self.parse(input.as_bytes())
    }

    /// Parse directly inside the caller's buffer, returning the root value.
    /// String decoding rewrites the buffer, so the caller must not assume
    /// its contents are preserved, and must keep it alive and unmodified
    /// until the document is cleared or dropped.
    pub fn parse_in_place(&mut self, buf: &'b mut [u8]) -> JsonResult<Value<'_>> {
        self.clear();
        check_utf8(buf)?;
        let root = Parser::new(&mut buf[..]).parse()?;
        Ok(self.install(Buffer::Borrowed(buf), root))
    }

    fn install(&mut self, buf: Buffer<'b>, root: Node) -> Value<'_> {
        self.buf = buf;
        let node = self.root.insert(root);
        Value::new(self.buf.bytes(), node)
    }

    /// The root value of the last successful parse
    pub fn root(&self) -> Option<Value<'_>> {
        self.root
            .as_ref()
            .map(|node| Value::new(self.buf.bytes(), node))
    }

    /// Release the tree and any owned buffer
    pub fn clear(&mut self) {
        self.root = None;
        self.buf = Buffer::Empty;
    }
}

impl Default for Document<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// The whole input must be valid UTF-8 up front; together with the escape
/// decoder this guarantees every string view handed out later is valid
fn check_utf8(input: &[u8]) -> JsonResult<()> {
    match std::str::from_utf8(input) {
        Ok(_) => Ok(()),
        Err(err) => syntax_error!(
            "invalid document: not valid utf-8",
            line_of(input, err.valid_up_to())
        ),
    }
}

/// 1-based line containing `pos`, counting CR, LF, and CRLF terminators the
/// same way the parser does
fn line_of(input: &[u8], pos: usize) -> u32 {
    let mut line = 1;
    let mut i = 0;
    while i < pos {
        match input[i] {
            b'\r' => {
                line += 1;
                if input.get(i + 1) == Some(&b'\n') {
                    i += 1;
                }
            }
            b'\n' => line += 1,
            _ => (),
        }
        i += 1;
    }
    line
}
