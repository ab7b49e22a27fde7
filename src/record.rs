//! Typed view over one parsed JSONL value for text extraction.

use serde::Serialize;
use serde_json::ser::Formatter;
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::io;

/// Field names tried, in order, when pulling text out of a JSON object.
pub const DEFAULT_TEXT_FIELDS: [&str; 5] = ["text", "content", "body", "message", "data"];

/// A parsed line: either a JSON object or any other JSON value.
#[derive(Clone, Debug, PartialEq)]
pub enum TextRecord {
    Mapping(Map<String, Value>),
    Scalar(Value),
}

impl From<Value> for TextRecord {
    fn from(v: Value) -> Self {
        match v {
            Value::Object(map) => TextRecord::Mapping(map),
            other => TextRecord::Scalar(other),
        }
    }
}

/// First field from `fields` that is present on a mapping and holds a string.
/// Scalars never match.
pub fn extract_text<'a, S: AsRef<str>>(record: &'a TextRecord, fields: &[S]) -> Option<&'a str> {
    match record {
        TextRecord::Mapping(map) => fields
            .iter()
            .find_map(|f| map.get(f.as_ref()).and_then(Value::as_str)),
        TextRecord::Scalar(_) => None,
    }
}

impl TextRecord {
    /// Text to count: the extracted field, or the whole value rendered as text
    /// when no field matched or the matched string is empty.
    pub fn text<S: AsRef<str>>(&self, fields: &[S]) -> Cow<'_, str> {
        if let Some(s) = extract_text(self, fields).filter(|s| !s.is_empty()) {
            return Cow::Borrowed(s);
        }
        match self {
            TextRecord::Mapping(map) => Cow::Owned(spaced_json(map)),
            TextRecord::Scalar(Value::String(s)) => Cow::Borrowed(s.as_str()),
            TextRecord::Scalar(v) => Cow::Owned(spaced_json(v)),
        }
    }

    pub fn word_count<S: AsRef<str>>(&self, fields: &[S]) -> u64 {
        count_words(&self.text(fields))
    }
}

/// Whitespace-delimited tokens (Unicode whitespace, runs collapse).
pub fn count_words(text: &str) -> u64 {
    text.split_whitespace().count() as u64
}

/// JSON with `", "` between items and `": "` after keys, so a rendered object
/// splits into one token per key and value rather than one blob. Non-ASCII
/// whitespace inside strings is written as `\xNN`/`\uNNNN`, so only the
/// separators split tokens.
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }
    fn begin_object_key<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }
    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b": ")
    }
    fn write_string_fragment<W: ?Sized + io::Write>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()> {
        let mut start = 0;
        for (i, c) in fragment.char_indices() {
            if c.is_ascii() || !c.is_whitespace() {
                continue;
            }
            writer.write_all(fragment[start..i].as_bytes())?;
            match c as u32 {
                cp @ 0..=0xff => write!(writer, "\\x{:02x}", cp)?,
                cp => write!(writer, "\\u{:04x}", cp)?,
            }
            start = i + c.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}

fn spaced_json<T: Serialize + ?Sized>(v: &T) -> String {
    let mut out = Vec::with_capacity(128);
    let mut ser = serde_json::Serializer::with_formatter(&mut out, SpacedFormatter);
    if v.serialize(&mut ser).is_err() {
        return String::new();
    }
    // serde_json only emits UTF-8.
    String::from_utf8(out).unwrap_or_default()
}
