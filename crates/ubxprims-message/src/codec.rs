//! Payload decoding and encoding against a [`FormatDescriptor`].

use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};
use serde::ser::{SerializeMap, SerializeSeq, SerializeStruct};
use serde::{Serialize, Serializer};
use ubxprims_frame::Identity;

use crate::catalog::MessageId;
use crate::descriptor::{Block, Field, FormatDescriptor, Layout, Primitive};
use crate::error::{MessageError, Result};
use crate::sensor::decode_sensor;

/// One decoded field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    U8(u8),
    I8(i8),
    U16(u16),
    I16(i16),
    U32(u32),
    I32(i32),
    F32(f32),
    F64(f64),
    Bytes(Bytes),
    /// Raw bit-packed sensor word.
    Sensor(u32),
}

impl Value {
    /// Integer view of any integer-like value.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::U8(v) => Some(v.into()),
            Value::I8(v) => Some(v.into()),
            Value::U16(v) => Some(v.into()),
            Value::I16(v) => Some(v.into()),
            Value::U32(v) | Value::Sensor(v) => Some(v.into()),
            Value::I32(v) => Some(v.into()),
            Value::F32(_) | Value::F64(_) | Value::Bytes(_) => None,
        }
    }

    /// Unsigned view; `None` for negative or non-integer values.
    pub fn as_u64(&self) -> Option<u64> {
        self.as_i64().and_then(|v| u64::try_from(v).ok())
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::F32(v) => Some(v.into()),
            Value::F64(v) => Some(v),
            _ => self.as_i64().map(|v| v as f64),
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Byte arrays as text, with trailing NUL padding removed.
    pub fn as_text(&self) -> Option<String> {
        self.as_bytes().map(trim_text)
    }
}

impl From<u8> for Value {
    fn from(v: u8) -> Self {
        Value::U8(v)
    }
}

impl From<u16> for Value {
    fn from(v: u16) -> Self {
        Value::U16(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::U32(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::I32(v)
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Bytes(Bytes::copy_from_slice(v))
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Bytes(Bytes::copy_from_slice(v.as_bytes()))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::F32(v) => write!(f, "{v}"),
            Value::F64(v) => write!(f, "{v}"),
            Value::Bytes(bytes) => match printable(bytes) {
                Some(text) => write!(f, "{text:?}"),
                None => write!(f, "{bytes:02x?}"),
            },
            Value::Sensor(raw) => match decode_sensor(*raw) {
                Some(sample) => write!(f, "{}={}{}", sample.kind.name, sample.value, sample.kind.unit),
                None => write!(f, "0x{raw:08x}"),
            },
            other => match other.as_i64() {
                Some(v) => write!(f, "{v}"),
                None => Ok(()),
            },
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::U8(v) => serializer.serialize_u8(*v),
            Value::I8(v) => serializer.serialize_i8(*v),
            Value::U16(v) => serializer.serialize_u16(*v),
            Value::I16(v) => serializer.serialize_i16(*v),
            Value::U32(v) => serializer.serialize_u32(*v),
            Value::I32(v) => serializer.serialize_i32(*v),
            Value::F32(v) => serializer.serialize_f32(*v),
            Value::F64(v) => serializer.serialize_f64(*v),
            Value::Bytes(bytes) => match printable(bytes) {
                Some(text) => serializer.serialize_str(&text),
                None => {
                    let mut seq = serializer.serialize_seq(Some(bytes.len()))?;
                    for byte in bytes.iter() {
                        seq.serialize_element(byte)?;
                    }
                    seq.end()
                }
            },
            Value::Sensor(raw) => {
                let mut state = serializer.serialize_struct("Sensor", 2)?;
                state.serialize_field("raw", raw)?;
                state.serialize_field("decoded", &decode_sensor(*raw))?;
                state.end()
            }
        }
    }
}

fn trim_text(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).trim_end().to_string()
}

fn printable(bytes: &[u8]) -> Option<String> {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    let (text, padding) = bytes.split_at(end);
    let clean = text.iter().all(|b| b.is_ascii_graphic() || *b == b' ')
        && padding.iter().all(|&b| b == 0);
    clean.then(|| String::from_utf8_lossy(text).into_owned())
}

/// Ordered field name → value pairs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    fields: Vec<(&'static str, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value)
    }

    /// Integer field as `u64`.
    pub fn get_u64(&self, name: &str) -> Option<u64> {
        self.get(name).and_then(Value::as_u64)
    }

    /// Replace a field or append it.
    pub fn set(&mut self, name: &'static str, value: impl Into<Value>) {
        let value = value.into();
        match self.fields.iter_mut().find(|(field, _)| *field == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, name: &'static str, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(name, _)| *name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        self.fields.iter().map(|(name, value)| (*name, value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// A payload resolved against its layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedMessage {
    #[serde(rename = "name")]
    pub id: MessageId,
    pub header: Record,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub blocks: Vec<Record>,
}

impl DecodedMessage {
    pub fn new(id: MessageId, header: Record, blocks: Vec<Record>) -> Self {
        Self { id, header, blocks }
    }

    /// An empty body, as produced by a zero-length frame.
    pub fn empty(id: MessageId) -> Self {
        Self::new(id, Record::new(), Vec::new())
    }

    pub fn identity(&self) -> Identity {
        self.id.identity()
    }

    pub fn name(&self) -> &'static str {
        self.id.name()
    }

    pub fn is_empty(&self) -> bool {
        self.header.is_empty() && self.blocks.is_empty()
    }
}

/// Decode `payload` with `desc`. The caller has already matched the length
/// for fixed layouts.
pub fn decode_with(desc: &FormatDescriptor, payload: &[u8]) -> Result<DecodedMessage> {
    match desc.layout {
        Layout::Fixed(block) => {
            if payload.len() != block.len {
                return Err(MessageError::UnknownMessage {
                    identity: desc.id.identity(),
                    length: payload.len(),
                });
            }
            Ok(DecodedMessage::new(desc.id, decode_block(&block, payload), Vec::new()))
        }
        Layout::Repeating { header, block } => {
            let malformed = || MessageError::MalformedMessage {
                name: desc.id.name(),
                length: payload.len().saturating_sub(header.len),
                header: header.len,
                block: block.len,
            };
            let rest = payload.len().checked_sub(header.len).ok_or_else(malformed)?;
            if rest % block.len != 0 {
                return Err(malformed());
            }

            let head = decode_block(&header, &payload[..header.len]);
            let blocks = payload[header.len..]
                .chunks_exact(block.len)
                .map(|chunk| decode_block(&block, chunk))
                .collect();
            Ok(DecodedMessage::new(desc.id, head, blocks))
        }
    }
}

fn decode_block(block: &Block, bytes: &[u8]) -> Record {
    let mut record = Record::new();
    let mut offset = 0;
    for field in block.fields {
        let size = field.kind.size();
        let raw = &bytes[offset..offset + size];
        record.fields.push((field.name, decode_value(field.kind, raw)));
        offset += size;
    }
    record
}

fn decode_value(kind: Primitive, raw: &[u8]) -> Value {
    let mut word = [0u8; 8];
    word[..raw.len().min(8)].copy_from_slice(&raw[..raw.len().min(8)]);
    match kind {
        Primitive::U8 => Value::U8(raw[0]),
        Primitive::I8 => Value::I8(raw[0] as i8),
        Primitive::U16 => Value::U16(u16::from_le_bytes([word[0], word[1]])),
        Primitive::I16 => Value::I16(i16::from_le_bytes([word[0], word[1]])),
        Primitive::U32 => Value::U32(u32::from_le_bytes([word[0], word[1], word[2], word[3]])),
        Primitive::I32 => Value::I32(i32::from_le_bytes([word[0], word[1], word[2], word[3]])),
        Primitive::Sensor => {
            Value::Sensor(u32::from_le_bytes([word[0], word[1], word[2], word[3]]))
        }
        Primitive::F32 => Value::F32(f32::from_le_bytes([word[0], word[1], word[2], word[3]])),
        Primitive::F64 => Value::F64(f64::from_le_bytes(word)),
        Primitive::Bytes(_) | Primitive::Reserved(_) => Value::Bytes(Bytes::copy_from_slice(raw)),
    }
}

/// Encode `header` and `blocks` with `desc`.
pub fn encode_with(desc: &FormatDescriptor, header: &Record, blocks: &[Record]) -> Result<Bytes> {
    let mut out = BytesMut::with_capacity(desc.payload_len(blocks.len()));
    encode_block(desc.id, desc.header(), header, &mut out)?;
    if let Some(block) = desc.repeat() {
        for record in blocks {
            encode_block(desc.id, block, record, &mut out)?;
        }
    }
    Ok(out.freeze())
}

fn encode_block(id: MessageId, block: &Block, record: &Record, out: &mut BytesMut) -> Result<()> {
    if let Some(extra) = record.names().find(|name| block.field(name).is_none()) {
        return Err(MessageError::NoMatchingFormat {
            message: id.name(),
            fields: extra.to_string(),
        });
    }
    for field in block.fields {
        match record.get(field.name) {
            Some(value) => encode_value(id, field, value, out)?,
            None if field.is_reserved() => out.put_bytes(0, field.kind.size()),
            None => {
                return Err(MessageError::MissingField {
                    message: id.name(),
                    field: field.name,
                })
            }
        }
    }
    Ok(())
}

fn encode_value(id: MessageId, field: &Field, value: &Value, out: &mut BytesMut) -> Result<()> {
    let out_of_range = || MessageError::ValueOutOfRange {
        message: id.name(),
        field: field.name,
        value: value.to_string(),
        expected: primitive_label(field.kind),
    };
    let int = || value.as_i64().ok_or_else(out_of_range);

    match field.kind {
        Primitive::U8 => out.put_u8(u8::try_from(int()?).map_err(|_| out_of_range())?),
        Primitive::I8 => out.put_i8(i8::try_from(int()?).map_err(|_| out_of_range())?),
        Primitive::U16 => out.put_u16_le(u16::try_from(int()?).map_err(|_| out_of_range())?),
        Primitive::I16 => out.put_i16_le(i16::try_from(int()?).map_err(|_| out_of_range())?),
        Primitive::U32 | Primitive::Sensor => {
            out.put_u32_le(u32::try_from(int()?).map_err(|_| out_of_range())?)
        }
        Primitive::I32 => out.put_i32_le(i32::try_from(int()?).map_err(|_| out_of_range())?),
        Primitive::F32 => match value {
            Value::F32(v) => out.put_f32_le(*v),
            other => out.put_f32_le(other.as_f64().ok_or_else(out_of_range)? as f32),
        },
        Primitive::F64 => out.put_f64_le(value.as_f64().ok_or_else(out_of_range)?),
        Primitive::Bytes(len) | Primitive::Reserved(len) => {
            let bytes = value.as_bytes().ok_or_else(out_of_range)?;
            if bytes.len() > len {
                return Err(out_of_range());
            }
            out.put_slice(bytes);
            out.put_bytes(0, len - bytes.len());
        }
    }
    Ok(())
}

fn primitive_label(kind: Primitive) -> &'static str {
    match kind {
        Primitive::U8 => "u8",
        Primitive::I8 => "i8",
        Primitive::U16 => "u16",
        Primitive::I16 => "i16",
        Primitive::U32 => "u32",
        Primitive::I32 => "i32",
        Primitive::F32 => "f32",
        Primitive::F64 => "f64",
        Primitive::Bytes(_) => "byte array",
        Primitive::Reserved(_) => "reserved bytes",
        Primitive::Sensor => "sensor word",
    }
}
