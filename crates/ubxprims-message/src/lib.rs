//! Message catalog, payload layouts and codec.
//!
//! Every catalogued message is a [`MessageId`] variant. The
//! [`FormatRegistry`] maps an identity and payload length to a typed
//! [`FormatDescriptor`]: either one fixed-size record or a header followed
//! by repeated blocks. Decoding produces a [`DecodedMessage`]; encoding is
//! its exact inverse.

pub mod catalog;
pub mod codec;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod formats;
pub mod masks;
pub mod registry;
pub mod sensor;
pub mod views;

pub use catalog::{MessageId, MessageKind};
pub use codec::{DecodedMessage, Record, Value};
pub use config::RegistryConfig;
pub use descriptor::{Block, Field, FormatDescriptor, Layout, Primitive};
pub use error::{MessageError, Result};
pub use masks::{build_mask, StartType};
pub use registry::FormatRegistry;
pub use sensor::{decode_sensor, SensorSample, SensorType, SignRule};
pub use views::{Ack, GnssConfig, GnssSystem, PortConfig, VersionInfo};
