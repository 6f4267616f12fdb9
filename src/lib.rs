//! Strict parsing and typed validation for a JSON configuration dialect
//!
//! The dialect is strict JSON extended with `//`-to-end-of-line comments and
//! tolerance of CR, LF, and CRLF line endings. Everything else is enforced:
//! no trailing commas, no unquoted member names, no single-quoted strings.
//! The supported escapes are `\\`, `\/`, `\b`, `\f`, `\n`, `\r`, `\t` and
//! `\uXXXX` with UTF-16 surrogate pairs.
//!
//! Parsing is a single destructive pass over a mutable byte buffer: escape
//! sequences are decoded in place, so string values are zero-copy views into
//! the buffer. Every value carries the 1-based line it came from and errors
//! cite it.
//!
//! There is no separate schema type. Each typed read *is* the schema
//! declaration — the member name, the expected type, the permitted range —
//! and reading a value marks it accessed. Once the configuration has been
//! read, [Value::reject_unknown_members] fails on any object member the
//! program never asked for.
//!
//! ```
//! use jsonfig::Document;
//!
//! let source = r#"
//! {
//!     "listen": "0.0.0.0", // interface to bind
//!     "port": 8080,
//!     "mode": "fast"
//! }
//! "#;
//!
//! let mut doc = Document::new();
//! let root = doc.parse_str(source)?;
//! let cfg = root.as_obj()?;
//! let listen = cfg.get_str("listen", Some("127.0.0.1"))?;
//! let port = cfg.get_i32("port", 1, 65535, None)?;
//! let mode = cfg.get_enum("mode", &["slow", "fast", "auto"], &[0, 1, 2])?;
//! root.reject_unknown_members()?;
//! assert_eq!((listen, port, mode), ("0.0.0.0", 8080, 1));
//! # Ok::<(), jsonfig::JsonError>(())
//! ```

pub mod accessors;
pub mod document;
pub mod errors;
mod parser;
mod test_macros;
pub mod value;

pub use accessors::{ArrayValue, FloatValue, IntValue, ObjectValue, StrValue};
pub use document::Document;
pub use errors::{ErrorDetails, JsonError, JsonResult};
pub use value::{Tag, Value};
