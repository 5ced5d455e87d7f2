//! Bit-packed external sensor data (ESF-MEAS, ESF-RAW).
//!
//! Each 4-byte word holds a data-type tag in bits 24..32 and a measurement in
//! bits 0..24. The tag selects both the scale factor and how the 24 data bits
//! carry their sign: inertial measurements are two's complement, tick
//! counters use bit 23 as a sign flag over a 23-bit magnitude.

use serde::Serialize;

const DATA_MASK: u32 = 0x00FF_FFFF;
const SIGN_BIT: u32 = 0x0080_0000;
const MAGNITUDE_MASK: u32 = 0x007F_FFFF;

/// How the 24 data bits encode negative values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SignRule {
    /// Two's complement over 24 bits.
    TwosComplement,
    /// Bit 23 is the sign, bits 0..23 the magnitude.
    SignMagnitude,
}

impl SignRule {
    /// Interpret the low 24 bits of `data`.
    pub fn apply(self, data: u32) -> i32 {
        let data = data & DATA_MASK;
        match self {
            SignRule::TwosComplement => ((data << 8) as i32) >> 8,
            SignRule::SignMagnitude => {
                let magnitude = (data & MAGNITUDE_MASK) as i32;
                if data & SIGN_BIT != 0 {
                    -magnitude
                } else {
                    magnitude
                }
            }
        }
    }
}

/// Scale and sign convention for one data-type tag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SensorType {
    pub tag: u8,
    pub name: &'static str,
    pub unit: &'static str,
    pub scale: f64,
    pub sign: SignRule,
}

const GYRO_SCALE: f64 = 1.0 / 4096.0;
const ACCEL_SCALE: f64 = 1.0 / 1024.0;

macro_rules! sensor {
    ($tag:literal, $name:literal, $unit:literal, $scale:expr, $sign:ident) => {
        SensorType {
            tag: $tag,
            name: $name,
            unit: $unit,
            scale: $scale,
            sign: SignRule::$sign,
        }
    };
}

/// Known data-type tags.
pub static SENSOR_TYPES: &[SensorType] = &[
    sensor!(5, "gyroZ", "deg/s", GYRO_SCALE, TwosComplement),
    sensor!(6, "wheelTickFrontLeft", "ticks", 1.0, SignMagnitude),
    sensor!(7, "wheelTickFrontRight", "ticks", 1.0, SignMagnitude),
    sensor!(8, "wheelTickRearLeft", "ticks", 1.0, SignMagnitude),
    sensor!(9, "wheelTickRearRight", "ticks", 1.0, SignMagnitude),
    sensor!(10, "speedTick", "ticks", 1.0, SignMagnitude),
    sensor!(11, "speed", "m/s", 1e-3, TwosComplement),
    sensor!(12, "gyroTemperature", "degC", 1e-2, TwosComplement),
    sensor!(13, "gyroY", "deg/s", GYRO_SCALE, TwosComplement),
    sensor!(14, "gyroX", "deg/s", GYRO_SCALE, TwosComplement),
    sensor!(16, "accelX", "m/s^2", ACCEL_SCALE, TwosComplement),
    sensor!(17, "accelY", "m/s^2", ACCEL_SCALE, TwosComplement),
    sensor!(18, "accelZ", "m/s^2", ACCEL_SCALE, TwosComplement),
];

/// Look up the convention for a tag.
pub fn sensor_type(tag: u8) -> Option<&'static SensorType> {
    SENSOR_TYPES.iter().find(|kind| kind.tag == tag)
}

/// Data-type tag of a raw word.
pub fn data_type(raw: u32) -> u8 {
    (raw >> 24) as u8
}

/// A decoded sensor word.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SensorSample {
    #[serde(rename = "type")]
    pub kind: &'static SensorType,
    /// Signed measurement in sensor units.
    pub raw: i32,
    /// Measurement after applying the scale.
    pub value: f64,
}

/// Decode a raw word; `None` when the tag is not in [`SENSOR_TYPES`].
pub fn decode_sensor(raw: u32) -> Option<SensorSample> {
    let kind = sensor_type(data_type(raw))?;
    let signed = kind.sign.apply(raw);
    Some(SensorSample {
        kind,
        raw: signed,
        value: f64::from(signed) * kind.scale,
    })
}
