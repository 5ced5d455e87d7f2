//! Typed accessors over decoded messages that the session layer and the
//! command-line tools act on.

use serde::Serialize;
use ubxprims_frame::Identity;

use crate::catalog::{MessageId, MessageKind};
use crate::codec::{DecodedMessage, Record, Value};
use crate::error::{MessageError, Result};
use crate::masks::{name_of, value_of, GNSS_IDS};

fn expect_kind(message: &DecodedMessage, expected: &[MessageId]) -> Result<()> {
    if expected.contains(&message.id) {
        Ok(())
    } else {
        Err(MessageError::UnexpectedMessage {
            expected: expected[0].name(),
            found: message.name(),
        })
    }
}

fn field_u64(message: &DecodedMessage, record: &Record, field: &'static str) -> Result<u64> {
    record.get_u64(field).ok_or(MessageError::MissingField {
        message: message.name(),
        field,
    })
}

fn field_u8(message: &DecodedMessage, record: &Record, field: &'static str) -> Result<u8> {
    let value = field_u64(message, record, field)?;
    u8::try_from(value).map_err(|_| MessageError::ValueOutOfRange {
        message: message.name(),
        field,
        value: value.to_string(),
        expected: "u8",
    })
}

/// ACK-ACK or ACK-NACK.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ack {
    /// Identity of the message being acknowledged.
    pub acknowledged: Identity,
    pub positive: bool,
}

impl Ack {
    pub fn from_message(message: &DecodedMessage) -> Result<Self> {
        expect_kind(message, &[MessageId::AckAck, MessageId::AckNack])?;
        Ok(Self {
            acknowledged: Identity::new(
                field_u8(message, &message.header, "clsID")?,
                field_u8(message, &message.header, "msgID")?,
            ),
            positive: message.id == MessageId::AckAck,
        })
    }

    /// Whether this acknowledges `identity`.
    pub fn acknowledges(&self, identity: Identity) -> bool {
        self.acknowledged == identity
    }

    /// Catalog view of the acknowledged identity.
    pub fn acknowledged_kind(&self) -> MessageKind {
        MessageKind::of(self.acknowledged)
    }
}

/// One CFG-PRT port block.
#[derive(Debug, Clone, PartialEq)]
pub struct PortConfig {
    record: Record,
}

impl PortConfig {
    /// Every port block of a CFG-PRT reply.
    pub fn all(message: &DecodedMessage) -> Result<Vec<Self>> {
        expect_kind(message, &[MessageId::CfgPrt])?;
        message
            .blocks
            .iter()
            .map(|record| {
                field_u64(message, record, "baudRate")?;
                Ok(Self {
                    record: record.clone(),
                })
            })
            .collect()
    }

    /// The first port block of a CFG-PRT reply.
    pub fn first(message: &DecodedMessage) -> Result<Self> {
        Self::all(message)?
            .into_iter()
            .next()
            .ok_or(MessageError::MissingField {
                message: message.name(),
                field: "portID",
            })
    }

    pub fn port_id(&self) -> u8 {
        self.record
            .get_u64("portID")
            .and_then(|v| u8::try_from(v).ok())
            .unwrap_or_default()
    }

    pub fn baud_rate(&self) -> u32 {
        self.record
            .get_u64("baudRate")
            .and_then(|v| u32::try_from(v).ok())
            .unwrap_or_default()
    }

    pub fn set_baud_rate(&mut self, rate: u32) {
        self.record.set("baudRate", rate);
    }

    /// Block record suitable for re-encoding as a CFG-PRT payload.
    pub fn to_record(&self) -> Record {
        self.record.clone()
    }

    pub fn record(&self) -> &Record {
        &self.record
    }
}

/// MON-VER strings with NUL padding removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionInfo {
    pub software: String,
    pub hardware: String,
    pub extensions: Vec<String>,
}

impl VersionInfo {
    pub fn from_message(message: &DecodedMessage) -> Result<Self> {
        expect_kind(message, &[MessageId::MonVer])?;
        let text = |record: &Record, field: &'static str| {
            record
                .get(field)
                .and_then(Value::as_text)
                .ok_or(MessageError::MissingField {
                    message: message.name(),
                    field,
                })
        };
        Ok(Self {
            software: text(&message.header, "swVersion")?,
            hardware: text(&message.header, "hwVersion")?,
            extensions: message
                .blocks
                .iter()
                .map(|block| text(block, "extension"))
                .collect::<Result<_>>()?,
        })
    }
}

const ENABLE_BIT: u32 = 0x01;
const SIGNAL_SHIFT: u32 = 16;

/// One CFG-GNSS system block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GnssSystem {
    pub gnss_id: u8,
    pub name: &'static str,
    pub reserved_channels: u8,
    pub max_channels: u8,
    pub flags: u32,
}

impl GnssSystem {
    pub fn enabled(&self) -> bool {
        self.flags & ENABLE_BIT != 0
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled {
            self.flags |= ENABLE_BIT;
        } else {
            self.flags &= !ENABLE_BIT;
        }
    }

    /// Human-readable names of the configured signals.
    pub fn signals(&self) -> Vec<&'static str> {
        let mask = self.flags >> SIGNAL_SHIFT;
        let table: &[(u32, &str)] = match self.gnss_id {
            0 => &[(0x01, "GPS L1CA")],
            1 => &[(0x01, "SBAS L1CA")],
            2 => &[(0x01, "Galileo E1B/C")],
            3 => &[(0x01, "BeiDou B1I")],
            4 => &[(0x01, "IMES L1CA")],
            5 => &[(0x01, "QZSS L1CA"), (0x04, "QZSS L1SAIF")],
            6 => &[(0x01, "GLONASS L1OF")],
            _ => &[],
        };
        table
            .iter()
            .filter(|(bit, _)| mask & bit != 0)
            .map(|(_, name)| *name)
            .collect()
    }
}

/// CFG-GNSS header plus system blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GnssConfig {
    pub msg_ver: u8,
    pub hw_channels: u8,
    pub used_channels: u8,
    pub systems: Vec<GnssSystem>,
}

impl GnssConfig {
    pub fn from_message(message: &DecodedMessage) -> Result<Self> {
        expect_kind(message, &[MessageId::CfgGnss])?;
        let header = &message.header;
        let systems = message
            .blocks
            .iter()
            .map(|block| {
                let gnss_id = field_u8(message, block, "gnssId")?;
                Ok(GnssSystem {
                    gnss_id,
                    name: name_of(gnss_id, GNSS_IDS).unwrap_or("unknown"),
                    reserved_channels: field_u8(message, block, "resTrkCh")?,
                    max_channels: field_u8(message, block, "maxTrkCh")?,
                    flags: field_u64(message, block, "flags")? as u32,
                })
            })
            .collect::<Result<_>>()?;

        Ok(Self {
            msg_ver: field_u8(message, header, "msgVer")?,
            hw_channels: field_u8(message, header, "numTrkChHw")?,
            used_channels: field_u8(message, header, "numTrkChUse")?,
            systems,
        })
    }

    /// Enable exactly the named systems and disable the rest.
    pub fn set_enabled<S: AsRef<str>>(&mut self, names: &[S]) -> Result<()> {
        let ids = names
            .iter()
            .map(|name| value_of(name.as_ref(), GNSS_IDS))
            .collect::<Result<Vec<_>>>()?;
        for system in &mut self.systems {
            system.set_enabled(ids.contains(&system.gnss_id));
        }
        Ok(())
    }

    /// Header and block records for a CFG-GNSS payload.
    pub fn to_records(&self) -> (Record, Vec<Record>) {
        let header = Record::new()
            .with("msgVer", self.msg_ver)
            .with("numTrkChHw", self.hw_channels)
            .with("numTrkChUse", self.used_channels)
            .with("numConfigBlocks", self.systems.len() as u8);
        let blocks = self
            .systems
            .iter()
            .map(|system| {
                Record::new()
                    .with("gnssId", system.gnss_id)
                    .with("resTrkCh", system.reserved_channels)
                    .with("maxTrkCh", system.max_channels)
                    .with("flags", system.flags)
            })
            .collect();
        (header, blocks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::FormatRegistry;

    fn decode(id: MessageId, payload: &[u8]) -> DecodedMessage {
        FormatRegistry::builtin()
            .unwrap()
            .decode(id.identity(), payload)
            .unwrap()
    }

    #[test]
    fn ack_view() {
        let ack = Ack::from_message(&decode(MessageId::AckAck, &[0x06, 0x00])).unwrap();
        assert!(ack.positive);
        assert!(ack.acknowledges(Identity::new(0x06, 0x00)));
        assert_eq!(ack.acknowledged_kind(), MessageKind::Known(MessageId::CfgPrt));

        let nack = Ack::from_message(&decode(MessageId::AckNack, &[0x06, 0x3E])).unwrap();
        assert!(!nack.positive);
    }

    #[test]
    fn view_rejects_wrong_message() {
        let msg = decode(MessageId::AckAck, &[0x06, 0x00]);
        let err = VersionInfo::from_message(&msg).unwrap_err();
        assert!(matches!(
            err,
            MessageError::UnexpectedMessage {
                expected: "MON-VER",
                found: "ACK-ACK"
            }
        ));
    }

    #[test]
    fn port_config_baud_round_trip() {
        let mut payload = vec![1u8, 0, 0, 0, 0xC0, 0x08, 0, 0];
        payload.extend_from_slice(&9600u32.to_le_bytes());
        payload.extend_from_slice(&[0x07, 0x00, 0x03, 0x00, 0, 0, 0, 0]);
        let msg = decode(MessageId::CfgPrt, &payload);

        let mut port = PortConfig::first(&msg).unwrap();
        assert_eq!(port.port_id(), 1);
        assert_eq!(port.baud_rate(), 9600);

        port.set_baud_rate(115_200);
        let registry = FormatRegistry::builtin().unwrap();
        let encoded = registry
            .encode(MessageId::CfgPrt, &Record::new(), &[port.to_record()])
            .unwrap();
        assert_eq!(&encoded[8..12], &115_200u32.to_le_bytes());
        assert_eq!(&encoded[..8], &payload[..8]);
    }

    #[test]
    fn empty_port_reply_has_no_first_block() {
        let msg = decode(MessageId::CfgPrt, &[]);
        assert!(PortConfig::first(&msg).is_err());
    }

    #[test]
    fn version_strings_are_trimmed() {
        let mut payload = vec![0u8; 40 + 30];
        payload[..7].copy_from_slice(b"ROM 2.0");
        payload[30..38].copy_from_slice(b"00080000");
        payload[40..48].copy_from_slice(b"PROTVER=");
        let info = VersionInfo::from_message(&decode(MessageId::MonVer, &payload)).unwrap();
        assert_eq!(info.software, "ROM 2.0");
        assert_eq!(info.hardware, "00080000");
        assert_eq!(info.extensions, vec!["PROTVER=".to_string()]);
    }

    fn gnss_payload() -> Vec<u8> {
        let mut payload = vec![0, 32, 32, 2];
        payload.extend_from_slice(&[0, 8, 16, 0]);
        payload.extend_from_slice(&0x0001_0001u32.to_le_bytes());
        payload.extend_from_slice(&[6, 8, 14, 0]);
        payload.extend_from_slice(&0x0001_0000u32.to_le_bytes());
        payload
    }

    #[test]
    fn gnss_config_view() {
        let config = GnssConfig::from_message(&decode(MessageId::CfgGnss, &gnss_payload())).unwrap();
        assert_eq!(config.systems.len(), 2);
        assert_eq!(config.systems[0].name, "GPS");
        assert!(config.systems[0].enabled());
        assert_eq!(config.systems[0].signals(), vec!["GPS L1CA"]);
        assert_eq!(config.systems[1].name, "GLONASS");
        assert!(!config.systems[1].enabled());
    }

    #[test]
    fn gnss_enable_and_encode() {
        let mut config =
            GnssConfig::from_message(&decode(MessageId::CfgGnss, &gnss_payload())).unwrap();
        config.set_enabled(&["GLONASS"]).unwrap();
        assert!(!config.systems[0].enabled());
        assert!(config.systems[1].enabled());
        assert!(config.set_enabled(&["Bogus"]).is_err());

        let (header, blocks) = config.to_records();
        let payload = FormatRegistry::builtin()
            .unwrap()
            .encode(MessageId::CfgGnss, &header, &blocks)
            .unwrap();
        assert_eq!(payload.len(), 4 + 8 * 2);
        assert_eq!(payload[8], 0x00);
        assert_eq!(payload[16], 0x01);
    }
}
