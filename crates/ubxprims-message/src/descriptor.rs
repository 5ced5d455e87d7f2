//! Typed payload layouts.

use crate::catalog::MessageId;

/// Wire type of one field. All multi-byte values are little-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    F32,
    F64,
    /// Fixed-length byte array (ASCII text or opaque data).
    Bytes(usize),
    /// Fixed-length padding; may be omitted when encoding.
    Reserved(usize),
    /// Raw 4-byte value carrying a data-type tag and 24 data bits.
    Sensor,
}

impl Primitive {
    /// Packed size in bytes.
    pub const fn size(self) -> usize {
        match self {
            Primitive::U8 | Primitive::I8 => 1,
            Primitive::U16 | Primitive::I16 => 2,
            Primitive::U32 | Primitive::I32 | Primitive::F32 | Primitive::Sensor => 4,
            Primitive::F64 => 8,
            Primitive::Bytes(n) | Primitive::Reserved(n) => n,
        }
    }

    /// Short type name used in diagnostics and the catalog listing.
    pub fn type_name(self) -> String {
        match self {
            Primitive::U8 => "u8".into(),
            Primitive::I8 => "i8".into(),
            Primitive::U16 => "u16".into(),
            Primitive::I16 => "i16".into(),
            Primitive::U32 => "u32".into(),
            Primitive::I32 => "i32".into(),
            Primitive::F32 => "f32".into(),
            Primitive::F64 => "f64".into(),
            Primitive::Bytes(n) => format!("[u8; {n}]"),
            Primitive::Reserved(n) => format!("reserved[{n}]"),
            Primitive::Sensor => "sensor".into(),
        }
    }
}

/// A named field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub kind: Primitive,
}

impl Field {
    pub const fn new(name: &'static str, kind: Primitive) -> Self {
        Self { name, kind }
    }

    pub const fn u8(name: &'static str) -> Self {
        Self::new(name, Primitive::U8)
    }

    pub const fn i8(name: &'static str) -> Self {
        Self::new(name, Primitive::I8)
    }

    pub const fn u16(name: &'static str) -> Self {
        Self::new(name, Primitive::U16)
    }

    pub const fn i16(name: &'static str) -> Self {
        Self::new(name, Primitive::I16)
    }

    pub const fn u32(name: &'static str) -> Self {
        Self::new(name, Primitive::U32)
    }

    pub const fn i32(name: &'static str) -> Self {
        Self::new(name, Primitive::I32)
    }

    pub const fn f32(name: &'static str) -> Self {
        Self::new(name, Primitive::F32)
    }

    pub const fn f64(name: &'static str) -> Self {
        Self::new(name, Primitive::F64)
    }

    pub const fn bytes(name: &'static str, len: usize) -> Self {
        Self::new(name, Primitive::Bytes(len))
    }

    pub const fn reserved(name: &'static str, len: usize) -> Self {
        Self::new(name, Primitive::Reserved(len))
    }

    pub const fn sensor(name: &'static str) -> Self {
        Self::new(name, Primitive::Sensor)
    }

    /// Whether the field may be left out of a record when encoding.
    pub const fn is_reserved(&self) -> bool {
        matches!(self.kind, Primitive::Reserved(_))
    }
}

/// A declared byte length with its ordered fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub len: usize,
    pub fields: &'static [Field],
}

impl Block {
    pub const fn new(len: usize, fields: &'static [Field]) -> Self {
        Self { len, fields }
    }

    /// Sum of the field sizes.
    pub fn packed_size(&self) -> usize {
        self.fields.iter().map(|field| field.kind.size()).sum()
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Fields a caller has to supply.
    pub fn required(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|field| !field.is_reserved())
    }
}

/// Shape of a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Exactly one length, one flat record.
    Fixed(Block),
    /// A header followed by zero or more equally sized blocks.
    Repeating { header: Block, block: Block },
}

/// Layout bound to a message identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatDescriptor {
    pub id: MessageId,
    pub layout: Layout,
}

impl FormatDescriptor {
    pub const fn fixed(id: MessageId, len: usize, fields: &'static [Field]) -> Self {
        Self {
            id,
            layout: Layout::Fixed(Block::new(len, fields)),
        }
    }

    pub const fn repeating(id: MessageId, header: Block, block: Block) -> Self {
        Self {
            id,
            layout: Layout::Repeating { header, block },
        }
    }

    /// Exact payload length for fixed layouts.
    pub fn fixed_len(&self) -> Option<usize> {
        match self.layout {
            Layout::Fixed(block) => Some(block.len),
            Layout::Repeating { .. } => None,
        }
    }

    /// Payload length for `blocks` repetitions (ignored for fixed layouts).
    pub fn payload_len(&self, blocks: usize) -> usize {
        match self.layout {
            Layout::Fixed(block) => block.len,
            Layout::Repeating { header, block } => header.len + block.len * blocks,
        }
    }

    /// The block describing the header record.
    pub fn header(&self) -> &Block {
        match &self.layout {
            Layout::Fixed(block) => block,
            Layout::Repeating { header, .. } => header,
        }
    }

    /// The repeated block, if any.
    pub fn repeat(&self) -> Option<&Block> {
        match &self.layout {
            Layout::Fixed(_) => None,
            Layout::Repeating { block, .. } => Some(block),
        }
    }

    /// Check the declared lengths against the field lists.
    pub(crate) fn check(&self) -> Result<(), String> {
        check_block("header", self.header())?;
        if let Some(block) = self.repeat() {
            if block.len == 0 {
                return Err("repeat block length is zero".into());
            }
            check_block("repeat block", block)?;
            for field in block.fields {
                if self.header().field(field.name).is_some() {
                    return Err(format!("field {} appears in header and block", field.name));
                }
            }
        }
        Ok(())
    }
}

fn check_block(what: &str, block: &Block) -> Result<(), String> {
    let packed = block.packed_size();
    if packed != block.len {
        return Err(format!(
            "{what} declares {} bytes but its fields pack to {packed}",
            block.len
        ));
    }
    for (index, field) in block.fields.iter().enumerate() {
        if block.fields[..index].iter().any(|f| f.name == field.name) {
            return Err(format!("duplicate field {} in {what}", field.name));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOOD: &[Field] = &[Field::u8("a"), Field::u16("b"), Field::reserved("pad", 1)];
    const DUPLICATE: &[Field] = &[Field::u8("a"), Field::u8("a")];
    const BLOCK: &[Field] = &[Field::u32("a")];

    #[test]
    fn primitive_sizes() {
        assert_eq!(Primitive::F64.size(), 8);
        assert_eq!(Primitive::Sensor.size(), 4);
        assert_eq!(Primitive::Bytes(30).size(), 30);
        assert_eq!(Primitive::Reserved(3).type_name(), "reserved[3]");
    }

    #[test]
    fn packed_size_matches() {
        let desc = FormatDescriptor::fixed(MessageId::AckAck, 4, GOOD);
        assert!(desc.check().is_ok());
        assert_eq!(desc.fixed_len(), Some(4));
        assert_eq!(desc.header().required().count(), 2);
    }

    #[test]
    fn packed_size_mismatch_is_rejected() {
        let desc = FormatDescriptor::fixed(MessageId::AckAck, 5, GOOD);
        let err = desc.check().unwrap_err();
        assert!(err.contains("declares 5 bytes"));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let desc = FormatDescriptor::fixed(MessageId::AckAck, 2, DUPLICATE);
        assert!(desc.check().unwrap_err().contains("duplicate field a"));
    }

    #[test]
    fn header_and_block_names_must_differ() {
        let desc = FormatDescriptor::repeating(
            MessageId::CfgPrt,
            Block::new(4, BLOCK),
            Block::new(4, BLOCK),
        );
        assert!(desc.check().is_err());
    }

    #[test]
    fn repeating_lengths() {
        let desc =
            FormatDescriptor::repeating(MessageId::CfgPrt, Block::new(0, &[]), Block::new(4, BLOCK));
        assert_eq!(desc.fixed_len(), None);
        assert_eq!(desc.payload_len(3), 12);
        assert!(desc.check().is_ok());
    }
}
