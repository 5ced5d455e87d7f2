use std::collections::{HashMap, HashSet};

use bytes::Bytes;
use tracing::{error, trace, warn};
use ubxprims_frame::{Frame, Identity};

use crate::catalog::MessageId;
use crate::codec::{decode_with, encode_with, DecodedMessage, Record, Value};
use crate::config::RegistryConfig;
use crate::descriptor::{Block, FormatDescriptor, Layout, Primitive};
use crate::error::{MessageError, Result};
use crate::formats::BUILTIN;

#[derive(Debug, Default)]
struct Entry {
    fixed: Vec<&'static FormatDescriptor>,
    repeating: Option<&'static FormatDescriptor>,
}

/// Identity-keyed registry of payload layouts.
///
/// Every descriptor is checked when the registry is built: declared lengths
/// must equal the packed field sizes, field names must be unique, and an
/// identity may carry at most one layout per fixed length plus at most one
/// repeating layout.
#[derive(Debug)]
pub struct FormatRegistry {
    entries: HashMap<MessageId, Entry>,
    count: usize,
    config: RegistryConfig,
}

impl FormatRegistry {
    /// Registry over the built-in format catalog.
    pub fn builtin() -> Result<Self> {
        Self::from_descriptors(BUILTIN, RegistryConfig::default())
    }

    /// Built-in catalog with explicit config.
    pub fn with_config(config: RegistryConfig) -> Result<Self> {
        Self::from_descriptors(BUILTIN, config)
    }

    /// Build from an arbitrary descriptor table.
    pub fn from_descriptors(
        descriptors: &'static [FormatDescriptor],
        config: RegistryConfig,
    ) -> Result<Self> {
        let mut entries: HashMap<MessageId, Entry> = HashMap::new();

        for desc in descriptors {
            let invalid = |reason: String| MessageError::InvalidDescriptor {
                name: desc.id.name(),
                reason,
            };
            desc.check().map_err(invalid)?;

            let entry = entries.entry(desc.id).or_default();
            match desc.layout {
                Layout::Fixed(block) => {
                    if entry.fixed.iter().any(|f| f.fixed_len() == Some(block.len)) {
                        return Err(invalid(format!("length {} registered twice", block.len)));
                    }
                    entry.fixed.push(desc);
                }
                Layout::Repeating { .. } => {
                    if entry.repeating.is_some() {
                        return Err(invalid("repeating layout registered twice".into()));
                    }
                    entry.repeating = Some(desc);
                }
            }
        }

        Ok(Self {
            entries,
            count: descriptors.len(),
            config,
        })
    }

    /// Exact-length fixed layout, else the repeating layout.
    pub fn lookup(&self, id: MessageId, length: usize) -> Option<&'static FormatDescriptor> {
        let entry = self.entries.get(&id)?;
        entry
            .fixed
            .iter()
            .find(|desc| desc.fixed_len() == Some(length))
            .copied()
            .or(entry.repeating)
    }

    /// All layouts registered for a message, fixed ones first.
    pub fn formats_for(&self, id: MessageId) -> Vec<&'static FormatDescriptor> {
        match self.entries.get(&id) {
            Some(entry) => entry.fixed.iter().copied().chain(entry.repeating).collect(),
            None => Vec::new(),
        }
    }

    /// Check whether any layout is registered for a message.
    pub fn contains(&self, id: MessageId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Every registered layout, ordered by message.
    pub fn descriptors(&self) -> Vec<&'static FormatDescriptor> {
        let mut ids: Vec<MessageId> = self.entries.keys().copied().collect();
        ids.sort_unstable();
        ids.into_iter().flat_map(|id| self.formats_for(id)).collect()
    }

    /// Number of registered layouts.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Decode a payload received under `identity`.
    pub fn decode(&self, identity: Identity, payload: &[u8]) -> Result<DecodedMessage> {
        let unknown = || MessageError::UnknownMessage {
            identity,
            length: payload.len(),
        };
        let id = MessageId::from_identity(identity).ok_or_else(unknown)?;

        if payload.is_empty() {
            warn!(message = id.name(), "zero-length payload");
        }

        match self.lookup(id, payload.len()) {
            Some(desc) => {
                let result = decode_with(desc, payload);
                match &result {
                    Ok(_) => trace!(message = id.name(), length = payload.len(), "decoded"),
                    Err(err @ MessageError::MalformedMessage { .. }) => error!(%err),
                    Err(_) => {}
                }
                result
            }
            None if payload.is_empty() && !self.config.strict_zero_length => {
                Ok(DecodedMessage::empty(id))
            }
            None => Err(unknown()),
        }
    }

    /// Decode the payload of a frame.
    pub fn decode_frame(&self, frame: &Frame) -> Result<DecodedMessage> {
        self.decode(frame.identity, &frame.payload)
    }

    /// Encode a header record and optional repeated blocks.
    ///
    /// With blocks, the repeating layout is used. Without, the fixed layout
    /// whose required fields are exactly the record's fields wins; failing
    /// that the repeating layout with zero blocks. Reserved fields may be
    /// left out and are zero-filled. An empty message with no matching layout
    /// encodes to an empty payload, mirroring [`decode`](Self::decode).
    pub fn encode(&self, id: MessageId, header: &Record, blocks: &[Record]) -> Result<Bytes> {
        let entry = self.entries.get(&id).ok_or(MessageError::UnknownMessage {
            identity: id.identity(),
            length: 0,
        })?;

        let bare = header.is_empty() && blocks.is_empty();
        let desc = if bare {
            self.lookup(id, 0)
        } else if blocks.is_empty() {
            select_fixed(&entry.fixed, header).or(entry.repeating)
        } else {
            entry.repeating
        };

        match desc {
            Some(desc) => encode_with(desc, header, blocks),
            None if bare && !self.config.strict_zero_length => Ok(Bytes::new()),
            None => Err(MessageError::NoMatchingFormat {
                message: id.name(),
                fields: header.names().collect::<Vec<_>>().join(", "),
            }),
        }
    }

    /// Encode a decoded message back into its payload.
    pub fn encode_message(&self, message: &DecodedMessage) -> Result<Bytes> {
        self.encode(message.id, &message.header, &message.blocks)
    }

    /// Encode by catalog name, e.g. `"CFG-RATE"`.
    pub fn encode_named(&self, name: &str, header: &Record, blocks: &[Record]) -> Result<Bytes> {
        let id: MessageId = name.parse()?;
        self.encode(id, header, blocks)
    }

    /// Encode straight into a frame.
    pub fn frame(&self, id: MessageId, header: &Record, blocks: &[Record]) -> Result<Frame> {
        Ok(Frame::new(id.identity(), self.encode(id, header, blocks)?))
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }
}

fn select_fixed(
    candidates: &[&'static FormatDescriptor],
    record: &Record,
) -> Option<&'static FormatDescriptor> {
    let matching: Vec<_> = candidates
        .iter()
        .copied()
        .filter(|desc| fields_match(desc.header(), record))
        .collect();

    // Prefer the layout whose byte arrays are exactly the supplied length.
    matching
        .iter()
        .copied()
        .find(|desc| byte_lengths(desc.header(), record, |field, value| field == value))
        .or_else(|| {
            matching
                .iter()
                .copied()
                .find(|desc| byte_lengths(desc.header(), record, |field, value| value <= field))
        })
}

fn fields_match(block: &Block, record: &Record) -> bool {
    let declared: HashSet<&str> = block.fields.iter().map(|field| field.name).collect();
    block.required().all(|field| record.get(field.name).is_some())
        && record.names().all(|name| declared.contains(name))
}

fn byte_lengths(block: &Block, record: &Record, accept: impl Fn(usize, usize) -> bool) -> bool {
    block.fields.iter().all(|field| match (field.kind, record.get(field.name)) {
        (Primitive::Bytes(len) | Primitive::Reserved(len), Some(Value::Bytes(bytes))) => {
            accept(len, bytes.len())
        }
        _ => true,
    })
}
