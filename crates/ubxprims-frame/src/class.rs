//! Message class ids.
//!
//! The class byte groups message sub-types by purpose. Classes 0xF0 and
//! above carry ids for messages of other protocols (NMEA, RTCM) so their
//! output rate can be configured through the binary protocol.

/// Navigation results.
pub const NAV: u8 = 0x01;

/// Receiver manager (raw measurements).
pub const RXM: u8 = 0x02;

/// Informative text.
pub const INF: u8 = 0x04;

/// Acknowledgements of configuration messages.
pub const ACK: u8 = 0x05;

/// Configuration input.
pub const CFG: u8 = 0x06;

/// Firmware update.
pub const UPD: u8 = 0x09;

/// Monitoring.
pub const MON: u8 = 0x0A;

/// Legacy AssistNow aiding.
pub const AID: u8 = 0x0B;

/// Timing.
pub const TIM: u8 = 0x0D;

/// External sensor fusion.
pub const ESF: u8 = 0x10;

/// Multiple GNSS assistance.
pub const MGA: u8 = 0x13;

/// Logging.
pub const LOG: u8 = 0x21;

/// Security.
pub const SEC: u8 = 0x27;

/// High rate navigation.
pub const HNR: u8 = 0x28;

/// Standard NMEA sentence ids.
pub const NMEA: u8 = 0xF0;

/// Proprietary NMEA sentence ids.
pub const NMEAP: u8 = 0xF1;

/// RTCM 3 message ids.
pub const RTCM: u8 = 0xF5;

/// Returns the mnemonic for a class id.
pub fn class_name(class: u8) -> &'static str {
    match class {
        NAV => "NAV",
        RXM => "RXM",
        INF => "INF",
        ACK => "ACK",
        CFG => "CFG",
        UPD => "UPD",
        MON => "MON",
        AID => "AID",
        TIM => "TIM",
        ESF => "ESF",
        MGA => "MGA",
        LOG => "LOG",
        SEC => "SEC",
        HNR => "HNR",
        NMEA => "NMEA",
        NMEAP => "NMEAP",
        RTCM => "RTCM",
        _ => "UNKNOWN",
    }
}

/// Returns true if the class carries ids of a foreign protocol.
pub fn is_foreign(class: u8) -> bool {
    class >= NMEA
}
