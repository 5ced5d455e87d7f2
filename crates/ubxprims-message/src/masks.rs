//! Named bit and value tables for configuration payloads.

use crate::error::{MessageError, Result};

/// Name → bit position (for masks) or name → value (for enumerations).
pub type NameTable = &'static [(&'static str, u8)];

/// CFG-CFG clear/save/load mask bits.
pub const CONFIG_SECTIONS: NameTable = &[
    ("ioPort", 0),
    ("msgConf", 1),
    ("infMsg", 2),
    ("navConf", 3),
    ("rxmConf", 4),
    ("rinvConf", 9),
    ("antConf", 10),
    ("logConf", 11),
];

/// CFG-RST battery-backed RAM sections to clear.
pub const NAV_BBR_SECTIONS: NameTable = &[
    ("eph", 0),
    ("alm", 1),
    ("health", 2),
    ("klob", 3),
    ("pos", 4),
    ("clkd", 5),
    ("osc", 6),
    ("utc", 7),
    ("rtc", 8),
    ("aop", 15),
];

/// CFG-RST `resetMode` values.
pub const RESET_MODES: NameTable = &[
    ("hw", 0),
    ("sw", 1),
    ("swGnssOnly", 2),
    ("hwAfterShutdown", 4),
    ("gnssStop", 8),
    ("gnssStart", 9),
];

/// CFG-PMS power setup values.
pub const POWER_SETUPS: NameTable = &[
    ("fullPower", 0),
    ("balanced", 1),
    ("interval", 2),
    ("aggressive1Hz", 3),
    ("aggressive2Hz", 4),
    ("aggressive4Hz", 5),
];

/// CFG-RATE `timeRef` values.
pub const TIME_REFS: NameTable = &[
    ("utc", 0),
    ("gps", 1),
    ("glonass", 2),
    ("beidou", 3),
    ("galileo", 4),
];

/// Receiver port identifiers.
pub const PORT_IDS: NameTable = &[
    ("I2C", 0),
    ("UART1", 1),
    ("UART2", 2),
    ("USB", 3),
    ("SPI", 4),
];

/// CFG-GNSS system identifiers.
pub const GNSS_IDS: NameTable = &[
    ("GPS", 0),
    ("SBAS", 1),
    ("Galileo", 2),
    ("BeiDou", 3),
    ("IMES", 4),
    ("QZSS", 5),
    ("GLONASS", 6),
];

fn choices(table: NameTable) -> String {
    table.iter().map(|(name, _)| *name).collect::<Vec<_>>().join(", ")
}

/// Value for `name` in an enumeration table.
pub fn value_of(name: &str, table: NameTable) -> Result<u8> {
    table
        .iter()
        .find(|(entry, _)| *entry == name)
        .map(|(_, value)| *value)
        .ok_or_else(|| MessageError::InvalidChoice {
            name: name.to_string(),
            choices: choices(table),
        })
}

/// Name for `value` in an enumeration table.
pub fn name_of(value: u8, table: NameTable) -> Option<&'static str> {
    table
        .iter()
        .find(|(_, entry)| *entry == value)
        .map(|(name, _)| *name)
}

/// OR together the bits named in `names`.
///
/// An empty list or `["none"]` yields 0; `"all"` anywhere sets every bit in
/// the table.
pub fn build_mask<S: AsRef<str>>(names: &[S], table: NameTable) -> Result<u32> {
    if names.iter().any(|name| name.as_ref() == "all") {
        return Ok(table.iter().fold(0, |mask, (_, bit)| mask | (1 << bit)));
    }

    let mut mask = 0u32;
    for name in names {
        let name = name.as_ref();
        if name == "none" {
            continue;
        }
        let bit = table
            .iter()
            .find(|(entry, _)| *entry == name)
            .map(|(_, bit)| *bit)
            .ok_or_else(|| MessageError::InvalidChoice {
                name: name.to_string(),
                choices: format!("{}, all, none", choices(table)),
            })?;
        mask |= 1 << bit;
    }
    Ok(mask)
}

/// Preset for CFG-RST `navBbrMask`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartType {
    Hot,
    Warm,
    Cold,
}

impl StartType {
    pub fn nav_bbr_mask(self) -> u16 {
        match self {
            StartType::Hot => 0x0000,
            StartType::Warm => 0x0001,
            StartType::Cold => 0x00FF,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_and_empty_are_zero() {
        assert_eq!(build_mask::<&str>(&[], CONFIG_SECTIONS).unwrap(), 0);
        assert_eq!(build_mask(&["none"], CONFIG_SECTIONS).unwrap(), 0);
    }

    #[test]
    fn all_sets_every_bit() {
        assert_eq!(build_mask(&["all"], CONFIG_SECTIONS).unwrap(), 0x0E1F);
        assert_eq!(build_mask(&["eph", "all"], NAV_BBR_SECTIONS).unwrap(), 0x81FF);
    }

    #[test]
    fn named_bits_combine() {
        assert_eq!(build_mask(&["ioPort", "navConf"], CONFIG_SECTIONS).unwrap(), 0b1001);
        assert_eq!(build_mask(&["aop"], NAV_BBR_SECTIONS).unwrap(), 0x8000);
    }

    #[test]
    fn unknown_bit_lists_choices() {
        let err = build_mask(&["bogus"], CONFIG_SECTIONS).unwrap_err();
        let text = err.to_string();
        assert!(text.contains("bogus"));
        assert!(text.contains("ioPort"));
    }

    #[test]
    fn value_tables() {
        assert_eq!(value_of("swGnssOnly", RESET_MODES).unwrap(), 2);
        assert_eq!(value_of("balanced", POWER_SETUPS).unwrap(), 1);
        assert_eq!(name_of(6, GNSS_IDS), Some("GLONASS"));
        assert_eq!(name_of(9, GNSS_IDS), None);
        assert!(value_of("UART9", PORT_IDS).is_err());
    }

    #[test]
    fn start_type_presets() {
        assert_eq!(StartType::Hot.nav_bbr_mask(), 0);
        assert_eq!(StartType::Warm.nav_bbr_mask(), 1);
        assert_eq!(StartType::Cold.nav_bbr_mask(), 0xFF);
    }
}
