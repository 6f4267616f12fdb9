//! Typed, range-checked views over parsed values
//!
//! Each `as_*` conversion on [Value] narrows to one of the view types in
//! this module. The views carry the getters a schema is written in terms
//! of: numeric range checks, enumerated string sets, defaulted member
//! lookups. Every getter that exposes a value marks it accessed, which is
//! what makes [Value::reject_unknown_members] work as a closing sweep.
use std::collections::HashMap;

use crate::errors::{ErrorDetails, JsonError, JsonResult};
use crate::value::{span_str, Node, Value};
use crate::value_error;

/// View over an integer value
#[derive(Copy, Clone)]
pub struct IntValue<'d> {
    value: Value<'d>,
    num: i64,
}

impl<'d> IntValue<'d> {
    pub(crate) fn new(value: Value<'d>, num: i64) -> Self {
        IntValue { value, num }
    }

    /// The raw integer
    pub fn get(&self) -> i64 {
        self.num
    }

    /// Range-checked read; `lo > hi` disables the check
    pub fn get_in(&self, lo: i64, hi: i64) -> JsonResult<i64> {
        if lo <= hi && (self.num < lo || self.num > hi) {
            return value_error!(ErrorDetails::BadIntRange { lo, hi }, &self.value);
        }
        Ok(self.num)
    }

    /// Read checked against the full signed 32-bit range
    pub fn get_i32(&self) -> JsonResult<i32> {
        Ok(self.get_in(i64::from(i32::MIN), i64::from(i32::MAX))? as i32)
    }

    /// Range-checked 32-bit read; `lo > hi` means the full i32 range
    pub fn get_i32_in(&self, lo: i32, hi: i32) -> JsonResult<i32> {
        let (lo, hi) = if lo > hi { (i32::MIN, i32::MAX) } else { (lo, hi) };
        Ok(self.get_in(i64::from(lo), i64::from(hi))? as i32)
    }
}

/// View over a numeric value, widened to double precision
#[derive(Copy, Clone)]
pub struct FloatValue<'d> {
    value: Value<'d>,
    num: f64,
}

impl<'d> FloatValue<'d> {
    pub(crate) fn new(value: Value<'d>, num: f64) -> Self {
        FloatValue { value, num }
    }

    /// The value as a double; integers arrive here already widened
    pub fn get(&self) -> f64 {
        self.num
    }

    /// Range-checked read; `lo > hi` disables the check
    pub fn get_in(&self, lo: f64, hi: f64) -> JsonResult<f64> {
        if lo <= hi && (self.num < lo || self.num > hi) {
            return value_error!(ErrorDetails::BadFloatRange { lo, hi }, &self.value);
        }
        Ok(self.num)
    }
}

/// View over a string value
#[derive(Copy, Clone)]
pub struct StrValue<'d> {
    value: Value<'d>,
    str: &'d str,
}

impl<'d> StrValue<'d> {
    pub(crate) fn new(value: Value<'d>, str: &'d str) -> Self {
        StrValue { value, str }
    }

    /// The decoded string, borrowed from the document buffer
    pub fn get(&self) -> &'d str {
        self.str
    }

    /// Position of this string within a candidate set, matched byte-exactly
    pub fn get_enum_idx(&self, set: &[&str]) -> JsonResult<usize> {
        match set.iter().position(|candidate| *candidate == self.str) {
            Some(idx) => Ok(idx),
            None => value_error!(ErrorDetails::BadEnum, &self.value),
        }
    }
}

/// View over an array value, exposing positional access
#[derive(Debug, Copy, Clone)]
pub struct ArrayValue<'d> {
    value: Value<'d>,
    elements: &'d [Node],
}

impl<'d> ArrayValue<'d> {
    pub(crate) fn new(value: Value<'d>, elements: &'d [Node]) -> Self {
        ArrayValue { value, elements }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Bounds-checked element access; marks the element accessed
    pub fn at(&self, idx: usize) -> JsonResult<Value<'d>> {
        match self.elements.get(idx) {
            Some(node) => {
                let element = Value::new(self.value.buf(), node);
                element.mark_accessed();
                Ok(element)
            }
            None => value_error!(
                ErrorDetails::OutOfRange { len: self.elements.len() },
                &self.value
            ),
        }
    }

    /// Iterate the elements in order, marking each accessed
    pub fn iter(&self) -> impl Iterator<Item = Value<'d>> + 'd {
        let buf = self.value.buf();
        self.elements.iter().map(move |node| {
            let element = Value::new(buf, node);
            element.mark_accessed();
            element
        })
    }

    pub fn get_bool(&self, idx: usize) -> JsonResult<bool> {
        self.at(idx)?.as_bool()
    }

    pub fn get_i32(&self, idx: usize, lo: i32, hi: i32) -> JsonResult<i32> {
        self.at(idx)?.as_int()?.get_i32_in(lo, hi)
    }

    pub fn get_i64(&self, idx: usize, lo: i64, hi: i64) -> JsonResult<i64> {
        self.at(idx)?.as_int()?.get_in(lo, hi)
    }

    pub fn get_f64(&self, idx: usize, lo: f64, hi: f64) -> JsonResult<f64> {
        self.at(idx)?.as_f64()?.get_in(lo, hi)
    }

    pub fn get_str(&self, idx: usize) -> JsonResult<&'d str> {
        Ok(self.at(idx)?.as_str()?.get())
    }

    pub fn get_arr(&self, idx: usize) -> JsonResult<ArrayValue<'d>> {
        self.at(idx)?.as_arr()
    }

    pub fn get_obj(&self, idx: usize) -> JsonResult<ObjectValue<'d>> {
        self.at(idx)?.as_obj()
    }
}

/// View over an object value, exposing lookup by member name as well as
/// ordered positional access over the members
#[derive(Copy, Clone)]
pub struct ObjectValue<'d> {
    value: Value<'d>,
    members: &'d [Node],
    index: &'d HashMap<Box<str>, u32>,
}

impl<'d> ObjectValue<'d> {
    pub(crate) fn new(
        value: Value<'d>,
        members: &'d [Node],
        index: &'d HashMap<Box<str>, u32>,
    ) -> Self {
        ObjectValue { value, members, index }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Bounds-checked member access by position; marks the member accessed
    pub fn at(&self, idx: usize) -> JsonResult<Value<'d>> {
        match self.members.get(idx) {
            Some(node) => {
                let member = Value::new(self.value.buf(), node);
                member.mark_accessed();
                Ok(member)
            }
            None => value_error!(
                ErrorDetails::OutOfRange { len: self.members.len() },
                &self.value
            ),
        }
    }

    /// Iterate the members in insertion order, marking each accessed
    pub fn iter(&self) -> impl Iterator<Item = Value<'d>> + 'd {
        let buf = self.value.buf();
        self.members.iter().map(move |node| {
            let member = Value::new(buf, node);
            member.mark_accessed();
            member
        })
    }

    /// Name of the member at a position, without marking it accessed
    pub fn member_name(&self, idx: usize) -> JsonResult<&'d str> {
        match self.members.get(idx) {
            Some(node) => Ok(span_str(self.value.buf(), node.name)),
            None => value_error!(
                ErrorDetails::OutOfRange { len: self.members.len() },
                &self.value
            ),
        }
    }

    /// Byte-exact member lookup
    pub fn find(&self, name: &str) -> Option<usize> {
        self.index.get(name).map(|idx| *idx as usize)
    }

    /// Look up a member by name; the member found is marked accessed. A
    /// missing member is an error only when `required` is set.
    pub fn get_member(&self, name: &str, required: bool) -> JsonResult<Option<Value<'d>>> {
        match self.find(name) {
            Some(idx) => {
                let member = Value::new(self.value.buf(), &self.members[idx]);
                member.mark_accessed();
                Ok(Some(member))
            }
            None if required => Err(JsonError::member_not_found(&self.value, name)),
            None => Ok(None),
        }
    }

    /// Look up a member that must exist
    fn require(&self, name: &str) -> JsonResult<Value<'d>> {
        match self.get_member(name, true)? {
            Some(member) => Ok(member),
            None => Err(JsonError::member_not_found(&self.value, name)),
        }
    }

    /// Boolean member; absent members yield the default when one is given
    pub fn get_bool(&self, name: &str, def: Option<bool>) -> JsonResult<bool> {
        match self.get_member(name, def.is_none())? {
            Some(member) => member.as_bool(),
            None => Ok(def.unwrap_or_default()),
        }
    }

    /// 32-bit integer member with a range check; `lo > hi` means the full
    /// i32 range. Absent members yield the default when one is given.
    pub fn get_i32(&self, name: &str, lo: i32, hi: i32, def: Option<i32>) -> JsonResult<i32> {
        match self.get_member(name, def.is_none())? {
            Some(member) => member.as_int()?.get_i32_in(lo, hi),
            None => Ok(def.unwrap_or_default()),
        }
    }

    /// Integer member with a range check; `lo > hi` disables the check.
    /// Absent members yield the default when one is given.
    pub fn get_i64(&self, name: &str, lo: i64, hi: i64, def: Option<i64>) -> JsonResult<i64> {
        match self.get_member(name, def.is_none())? {
            Some(member) => member.as_int()?.get_in(lo, hi),
            None => Ok(def.unwrap_or_default()),
        }
    }

    /// Numeric member with a range check; `lo > hi` disables the check.
    /// Absent members yield the default when one is given.
    pub fn get_f64(&self, name: &str, lo: f64, hi: f64, def: Option<f64>) -> JsonResult<f64> {
        match self.get_member(name, def.is_none())? {
            Some(member) => member.as_f64()?.get_in(lo, hi),
            None => Ok(def.unwrap_or_default()),
        }
    }

    /// String member; absent members yield the default when one is given
    pub fn get_str(&self, name: &str, def: Option<&'d str>) -> JsonResult<&'d str> {
        match self.get_member(name, def.is_none())? {
            Some(member) => Ok(member.as_str()?.get()),
            None => Ok(def.unwrap_or("")),
        }
    }

    /// Array member; always required
    pub fn get_arr(&self, name: &str) -> JsonResult<ArrayValue<'d>> {
        self.require(name)?.as_arr()
    }

    /// Object member; always required
    pub fn get_obj(&self, name: &str) -> JsonResult<ObjectValue<'d>> {
        self.require(name)?.as_obj()
    }

    /// Position of a string member within a candidate set. An absent member
    /// is an error only when `required` is set; a present member that
    /// matches no candidate always is.
    pub fn get_enum_idx(
        &self,
        name: &str,
        set: &[&str],
        required: bool,
    ) -> JsonResult<Option<usize>> {
        match self.get_member(name, required)? {
            Some(member) => Ok(Some(member.as_str()?.get_enum_idx(set)?)),
            None => Ok(None),
        }
    }

    /// Map a required string member onto a parallel value set. `names` and
    /// `values` must be the same length.
    pub fn get_enum<T: Copy>(&self, name: &str, names: &[&str], values: &[T]) -> JsonResult<T> {
        debug_assert_eq!(names.len(), values.len());
        let idx = self.require(name)?.as_str()?.get_enum_idx(names)?;
        Ok(values[idx])
    }

    /// Map an optional string member onto a parallel value set, falling back
    /// to `def` when the member is absent. `names` and `values` must be the
    /// same length.
    pub fn get_enum_or<T: Copy>(
        &self,
        name: &str,
        names: &[&str],
        values: &[T],
        def: T,
    ) -> JsonResult<T> {
        debug_assert_eq!(names.len(), values.len());
        match self.get_enum_idx(name, names, false)? {
            Some(idx) => Ok(values[idx]),
            None => Ok(def),
        }
    }
}
