//! The parsed value tree and the borrowed [Value] handle over it
//!
//! Nodes are span-based: string payloads and member names are offsets into
//! the document's backing buffer rather than borrowed slices, so the tree
//! owns no references and the document handle stays free of self-borrows.
//! The public [Value] type pairs a node with the buffer and resolves the
//! spans on access.
use std::cell::Cell;
use std::collections::HashMap;
use std::fmt::{Debug, Display, Formatter};

use crate::accessors::{ArrayValue, FloatValue, IntValue, ObjectValue, StrValue};
use crate::errors::{ErrorDetails, JsonResult};
use crate::value_error;

/// Enumeration of the value types in the dialect
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Tag {
    Null,
    Bool,
    Int,
    Float,
    Str,
    Arr,
    Obj,
}

impl Display for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let str = match self {
            Tag::Null => "null",
            Tag::Bool => "bool",
            Tag::Int => "int",
            Tag::Float => "float",
            Tag::Str => "str",
            Tag::Arr => "arr",
            Tag::Obj => "obj",
        };
        write!(f, "{str}")
    }
}

/// A byte interval within the document buffer
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct Span {
    pub(crate) start: u32,
    pub(crate) len: u32,
}

impl Span {
    pub(crate) const EMPTY: Span = Span { start: 0, len: 0 };

    fn range(self) -> std::ops::Range<usize> {
        let start = self.start as usize;
        start..start + self.len as usize
    }
}

/// Resolve a span against the buffer it indexes into
pub(crate) fn span_str(buf: &[u8], span: Span) -> &str {
    let bytes = &buf[span.range()];
    debug_assert!(std::str::from_utf8(bytes).is_ok());
    // SAFETY: the document validates the whole input as UTF-8 before parsing
    // and every escape the parser decodes is written back as well-formed
    // UTF-8, so any span recorded in a node covers valid UTF-8.
    unsafe { std::str::from_utf8_unchecked(bytes) }
}

/// Payload of a single node in the parsed tree
#[derive(Debug)]
pub(crate) enum NodeKind {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Span),
    Arr(Vec<Node>),
    Obj {
        members: Vec<Node>,
        index: HashMap<Box<str>, u32>,
    },
}

/// A single node in the parsed tree, along with its source attribution and
/// its position within the enclosing container
#[derive(Debug)]
pub(crate) struct Node {
    pub(crate) kind: NodeKind,
    pub(crate) line: u32,
    pub(crate) name: Span,
    pub(crate) idx: i32,
    pub(crate) accessed: Cell<bool>,
}

impl Node {
    pub(crate) fn new(kind: NodeKind, line: u32) -> Self {
        Node {
            kind,
            line,
            name: Span::EMPTY,
            idx: -1,
            accessed: Cell::new(false),
        }
    }

    pub(crate) fn tag(&self) -> Tag {
        match self.kind {
            NodeKind::Null => Tag::Null,
            NodeKind::Bool(_) => Tag::Bool,
            NodeKind::Int(_) => Tag::Int,
            NodeKind::Float(_) => Tag::Float,
            NodeKind::Str(_) => Tag::Str,
            NodeKind::Arr(_) => Tag::Arr,
            NodeKind::Obj { .. } => Tag::Obj,
        }
    }

    /// Child nodes for containers, empty for scalars
    pub(crate) fn children(&self) -> &[Node] {
        match &self.kind {
            NodeKind::Arr(elements) => elements,
            NodeKind::Obj { members, .. } => members,
            _ => &[],
        }
    }
}

/// A borrowed handle onto one value of a parsed document
///
/// Handles are cheap to copy and live as long as the borrow of the owning
/// [Document](crate::Document). Conversions narrow the handle to a typed
/// view and mark the value as accessed; [Value::reject_unknown_members]
/// later fails on any object member that was never exposed this way.
#[derive(Copy, Clone)]
pub struct Value<'d> {
    buf: &'d [u8],
    node: &'d Node,
}

impl<'d> Value<'d> {
    pub(crate) fn new(buf: &'d [u8], node: &'d Node) -> Self {
        Value { buf, node }
    }

    pub(crate) fn buf(&self) -> &'d [u8] {
        self.buf
    }

    pub(crate) fn mark_accessed(&self) {
        self.node.accessed.set(true);
    }

    /// The tag of this value
    pub fn tag(&self) -> Tag {
        self.node.tag()
    }

    /// 1-based line of the token that produced this value
    pub fn line(&self) -> u32 {
        self.node.line
    }

    /// Member name when this value belongs to an object, empty otherwise
    pub fn name(&self) -> &'d str {
        span_str(self.buf, self.node.name)
    }

    /// Zero-based position within the enclosing container, -1 for the root
    pub fn idx(&self) -> i32 {
        self.node.idx
    }

    pub fn is_null(&self) -> bool {
        matches!(self.node.kind, NodeKind::Null)
    }

    /// True for both integer and float values
    pub fn is_num(&self) -> bool {
        matches!(self.node.kind, NodeKind::Int(_) | NodeKind::Float(_))
    }

    /// Narrow to a boolean, marking the value accessed
    pub fn as_bool(&self) -> JsonResult<bool> {
        match self.node.kind {
            NodeKind::Bool(b) => {
                self.mark_accessed();
                Ok(b)
            }
            _ => value_error!(ErrorDetails::BadType { expected: Tag::Bool }, self),
        }
    }

    /// Narrow to an integer view, marking the value accessed
    pub fn as_int(&self) -> JsonResult<IntValue<'d>> {
        match self.node.kind {
            NodeKind::Int(num) => {
                self.mark_accessed();
                Ok(IntValue::new(*self, num))
            }
            _ => value_error!(ErrorDetails::BadType { expected: Tag::Int }, self),
        }
    }

    /// Narrow to a float view, marking the value accessed. Integer values
    /// are accepted and widened to double precision.
    pub fn as_f64(&self) -> JsonResult<FloatValue<'d>> {
        match self.node.kind {
            NodeKind::Int(num) => {
                self.mark_accessed();
                Ok(FloatValue::new(*self, num as f64))
            }
            NodeKind::Float(num) => {
                self.mark_accessed();
                Ok(FloatValue::new(*self, num))
            }
            _ => value_error!(ErrorDetails::BadType { expected: Tag::Float }, self),
        }
    }

    /// Narrow to a string view, marking the value accessed
    pub fn as_str(&self) -> JsonResult<StrValue<'d>> {
        match self.node.kind {
            NodeKind::Str(span) => {
                self.mark_accessed();
                Ok(StrValue::new(*self, span_str(self.buf, span)))
            }
            _ => value_error!(ErrorDetails::BadType { expected: Tag::Str }, self),
        }
    }

    /// Narrow to an array view, marking the value accessed
    pub fn as_arr(&self) -> JsonResult<ArrayValue<'d>> {
        match &self.node.kind {
            NodeKind::Arr(elements) => {
                self.mark_accessed();
                Ok(ArrayValue::new(*self, elements))
            }
            _ => value_error!(ErrorDetails::BadType { expected: Tag::Arr }, self),
        }
    }

    /// Narrow to an object view, marking the value accessed
    pub fn as_obj(&self) -> JsonResult<ObjectValue<'d>> {
        match &self.node.kind {
            NodeKind::Obj { members, index } => {
                self.mark_accessed();
                Ok(ObjectValue::new(*self, members, index))
            }
            _ => value_error!(ErrorDetails::BadType { expected: Tag::Obj }, self),
        }
    }

    /// Fail with an unknown-member error if any object member below this
    /// value was never accessed
    ///
    /// Array elements carry no names and are not themselves checked, but
    /// containers nested inside arrays are descended into.
    pub fn reject_unknown_members(&self) -> JsonResult<()> {
        let named = matches!(self.node.kind, NodeKind::Obj { .. });
        for child in self.node.children() {
            let child = Value::new(self.buf, child);
            if named && !child.node.accessed.get() {
                return value_error!(ErrorDetails::UnknownMember, &child);
            }
            child.reject_unknown_members()?;
        }
        Ok(())
    }

    /// Mark every descendant of this value as accessed, suppressing
    /// unknown-member checks over an intentionally open subtree
    pub fn ignore_members(&self) {
        for child in self.node.children() {
            child.accessed.set(true);
            Value::new(self.buf, child).ignore_members();
        }
    }
}

impl Debug for Value<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Value")
            .field("tag", &self.tag())
            .field("line", &self.line())
            .field("name", &self.name())
            .field("idx", &self.idx())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::value::Tag;

    #[test]
    fn should_render_tags_in_short_form() {
        let rendered: Vec<String> = [
            Tag::Null,
            Tag::Bool,
            Tag::Int,
            Tag::Float,
            Tag::Str,
            Tag::Arr,
            Tag::Obj,
        ]
        .iter()
        .map(|t| t.to_string())
        .collect();
        assert_eq!(rendered, ["null", "bool", "int", "float", "str", "arr", "obj"]);
    }
}
