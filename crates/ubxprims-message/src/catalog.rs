//! Message identity catalog.
//!
//! Every known (class, sub-type) pair is a [`MessageId`] variant; the mapping
//! between names and identities is one-to-one. Identities that are not in the
//! catalog surface as [`MessageKind::Unrecognized`].

use std::fmt;

use serde::{Serialize, Serializer};
use ubxprims_frame::Identity;

macro_rules! message_ids {
    ($($variant:ident = ($class:literal, $id:literal, $name:literal)),* $(,)?) => {
        /// A known message type.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum MessageId {
            $($variant),*
        }

        impl MessageId {
            /// Every catalogued message, ordered by class and sub-type.
            pub const ALL: &'static [MessageId] = &[$(MessageId::$variant),*];

            /// The wire identity of this message.
            pub const fn identity(self) -> Identity {
                match self {
                    $(MessageId::$variant => Identity::new($class, $id)),*
                }
            }

            /// The catalog name, e.g. `CFG-PRT`.
            pub const fn name(self) -> &'static str {
                match self {
                    $(MessageId::$variant => $name),*
                }
            }

            /// Resolve a wire identity.
            pub fn from_identity(identity: Identity) -> Option<Self> {
                match (identity.class, identity.id) {
                    $(($class, $id) => Some(MessageId::$variant),)*
                    _ => None,
                }
            }
        }
    };
}

message_ids! {
    NavPosecef = (0x01, 0x01, "NAV-POSECEF"),
    NavPosllh = (0x01, 0x02, "NAV-POSLLH"),
    NavStatus = (0x01, 0x03, "NAV-STATUS"),
    NavDop = (0x01, 0x04, "NAV-DOP"),
    NavAtt = (0x01, 0x05, "NAV-ATT"),
    NavSol = (0x01, 0x06, "NAV-SOL"),
    NavPvt = (0x01, 0x07, "NAV-PVT"),
    NavPosutm = (0x01, 0x08, "NAV-POSUTM"),
    NavVelecef = (0x01, 0x11, "NAV-VELECEF"),
    NavVelned = (0x01, 0x12, "NAV-VELNED"),
    NavHpposecef = (0x01, 0x13, "NAV-HPPOSECEF"),
    NavHpposllh = (0x01, 0x14, "NAV-HPPOSLLH"),
    NavTimegps = (0x01, 0x20, "NAV-TIMEGPS"),
    NavTimeutc = (0x01, 0x21, "NAV-TIMEUTC"),
    NavClock = (0x01, 0x22, "NAV-CLOCK"),
    NavSvinfo = (0x01, 0x30, "NAV-SVINFO"),
    NavDgps = (0x01, 0x31, "NAV-DGPS"),
    NavSbas = (0x01, 0x32, "NAV-SBAS"),
    NavSvin = (0x01, 0x3B, "NAV-SVIN"),
    NavRelposned = (0x01, 0x3C, "NAV-RELPOSNED"),
    NavEkfstatus = (0x01, 0x40, "NAV-EKFSTATUS"),
    RxmRaw = (0x02, 0x10, "RXM-RAW"),
    RxmSfrb = (0x02, 0x11, "RXM-SFRB"),
    RxmSvsi = (0x02, 0x20, "RXM-SVSI"),
    RxmAlm = (0x02, 0x30, "RXM-ALM"),
    RxmEph = (0x02, 0x31, "RXM-EPH"),
    RxmRtcm = (0x02, 0x32, "RXM-RTCM"),
    RxmPosreq = (0x02, 0x40, "RXM-POSREQ"),
    InfError = (0x04, 0x00, "INF-ERROR"),
    InfWarning = (0x04, 0x01, "INF-WARNING"),
    InfNotice = (0x04, 0x02, "INF-NOTICE"),
    InfTest = (0x04, 0x03, "INF-TEST"),
    InfDebug = (0x04, 0x04, "INF-DEBUG"),
    InfUser = (0x04, 0x07, "INF-USER"),
    AckNack = (0x05, 0x00, "ACK-NACK"),
    AckAck = (0x05, 0x01, "ACK-ACK"),
    CfgPrt = (0x06, 0x00, "CFG-PRT"),
    CfgMsg = (0x06, 0x01, "CFG-MSG"),
    CfgInf = (0x06, 0x02, "CFG-INF"),
    CfgRst = (0x06, 0x04, "CFG-RST"),
    CfgDat = (0x06, 0x06, "CFG-DAT"),
    CfgTp = (0x06, 0x07, "CFG-TP"),
    CfgRate = (0x06, 0x08, "CFG-RATE"),
    CfgCfg = (0x06, 0x09, "CFG-CFG"),
    CfgFxn = (0x06, 0x0E, "CFG-FXN"),
    CfgTm = (0x06, 0x10, "CFG-TM"),
    CfgRxm = (0x06, 0x11, "CFG-RXM"),
    CfgEkf = (0x06, 0x12, "CFG-EKF"),
    CfgAnt = (0x06, 0x13, "CFG-ANT"),
    CfgSbas = (0x06, 0x16, "CFG-SBAS"),
    CfgNmea = (0x06, 0x17, "CFG-NMEA"),
    CfgTm2 = (0x06, 0x19, "CFG-TM2"),
    CfgNav2 = (0x06, 0x1A, "CFG-NAV2"),
    CfgUsb = (0x06, 0x1B, "CFG-USB"),
    CfgTmode = (0x06, 0x1D, "CFG-TMODE"),
    CfgGnss = (0x06, 0x3E, "CFG-GNSS"),
    CfgHnr = (0x06, 0x5C, "CFG-HNR"),
    CfgLic = (0x06, 0x80, "CFG-LIC"),
    CfgPms = (0x06, 0x86, "CFG-PMS"),
    UpdDownl = (0x09, 0x01, "UPD-DOWNL"),
    UpdUpload = (0x09, 0x02, "UPD-UPLOAD"),
    UpdExec = (0x09, 0x03, "UPD-EXEC"),
    UpdMemcpy = (0x09, 0x04, "UPD-MEMCPY"),
    UpdSos = (0x09, 0x14, "UPD-SOS"),
    MonSchd = (0x0A, 0x01, "MON-SCHD"),
    MonIo = (0x0A, 0x02, "MON-IO"),
    MonIpc = (0x0A, 0x03, "MON-IPC"),
    MonVer = (0x0A, 0x04, "MON-VER"),
    MonExcept = (0x0A, 0x05, "MON-EXCEPT"),
    MonMsgpp = (0x0A, 0x06, "MON-MSGPP"),
    MonRxbuf = (0x0A, 0x07, "MON-RXBUF"),
    MonTxbuf = (0x0A, 0x08, "MON-TXBUF"),
    MonHw = (0x0A, 0x09, "MON-HW"),
    MonUsb = (0x0A, 0x0A, "MON-USB"),
    MonSmgr = (0x0A, 0x2E, "MON-SMGR"),
    AidReq = (0x0B, 0x00, "AID-REQ"),
    AidIni = (0x0B, 0x01, "AID-INI"),
    AidHui = (0x0B, 0x02, "AID-HUI"),
    AidData = (0x0B, 0x10, "AID-DATA"),
    AidAlm = (0x0B, 0x30, "AID-ALM"),
    AidEph = (0x0B, 0x31, "AID-EPH"),
    AidUnknown32 = (0x0B, 0x32, "AID-UNKNOWN-0x32"),
    AidUnknown50 = (0x0B, 0x50, "AID-UNKNOWN-0x50"),
    TimTp = (0x0D, 0x01, "TIM-TP"),
    TimTm = (0x0D, 0x02, "TIM-TM"),
    TimTm2 = (0x0D, 0x03, "TIM-TM2"),
    TimSvin = (0x0D, 0x04, "TIM-SVIN"),
    TimDosc = (0x0D, 0x11, "TIM-DOSC"),
    TimTos = (0x0D, 0x12, "TIM-TOS"),
    TimSmeas = (0x0D, 0x13, "TIM-SMEAS"),
    TimVcocal = (0x0D, 0x15, "TIM-VCOCAL"),
    TimFchg = (0x0D, 0x16, "TIM-FCHG"),
    EsfMeas = (0x10, 0x02, "ESF-MEAS"),
    EsfRaw = (0x10, 0x03, "ESF-RAW"),
    EsfStatus = (0x10, 0x10, "ESF-STATUS"),
    EsfIns = (0x10, 0x15, "ESF-INS"),
    MgaGps = (0x13, 0x00, "MGA-GPS"),
    MgaGlo = (0x13, 0x06, "MGA-GLO"),
    MgaFlash = (0x13, 0x21, "MGA-FLASH"),
    MgaIni = (0x13, 0x40, "MGA-INI"),
    MgaAck = (0x13, 0x60, "MGA-ACK"),
    MgaDbd = (0x13, 0x80, "MGA-DBD"),
    LogRetrievepos = (0x21, 0x0B, "LOG-RETRIEVEPOS"),
    LogRetrievestring = (0x21, 0x0D, "LOG-RETRIEVESTRING"),
    LogFindtime = (0x21, 0x0E, "LOG-FINDTIME"),
    LogRetrieveposextra = (0x21, 0x0F, "LOG-RETRIEVEPOSEXTRA"),
    SecSign = (0x27, 0x01, "SEC-SIGN"),
    SecUniqid = (0x27, 0x03, "SEC-UNIQID"),
    HnrPvt = (0x28, 0x00, "HNR-PVT"),
    NmeaGga = (0xF0, 0x00, "NMEA-GGA"),
    NmeaGll = (0xF0, 0x01, "NMEA-GLL"),
    NmeaGsa = (0xF0, 0x02, "NMEA-GSA"),
    NmeaGsv = (0xF0, 0x03, "NMEA-GSV"),
    NmeaRmc = (0xF0, 0x04, "NMEA-RMC"),
    NmeaVtg = (0xF0, 0x05, "NMEA-VTG"),
    NmeaGrs = (0xF0, 0x06, "NMEA-GRS"),
    NmeaGst = (0xF0, 0x07, "NMEA-GST"),
    NmeaZda = (0xF0, 0x08, "NMEA-ZDA"),
    NmeaGbs = (0xF0, 0x09, "NMEA-GBS"),
    NmeaDtm = (0xF0, 0x0A, "NMEA-DTM"),
    NmeaGns = (0xF0, 0x0D, "NMEA-GNS"),
    NmeapUnknown01 = (0xF1, 0x01, "NMEAP-UNKNOWN-0x01"),
    NmeapTime = (0xF1, 0x04, "NMEAP-TIME"),
    NmeapConfig = (0xF1, 0x41, "NMEAP-CONFIG"),
    RtcmRefstationarp = (0xF5, 0x05, "RTCM-REFSTATIONARP"),
    RtcmGpsmsm4 = (0xF5, 0x4A, "RTCM-GPSMSM4"),
    RtcmGpsmsm7 = (0xF5, 0x4D, "RTCM-GPSMSM7"),
    RtcmGlomsm4 = (0xF5, 0x54, "RTCM-GLOMSM4"),
    RtcmGlomsm7 = (0xF5, 0x57, "RTCM-GLOMSM7"),
    RtcmBeimsm4 = (0xF5, 0x7C, "RTCM-BEIMSM4"),
    RtcmBeimsm7 = (0xF5, 0x7F, "RTCM-BEIMSM7"),
    RtcmGlocode = (0xF5, 0xE6, "RTCM-GLOCODE"),
    RtcmRefstationpvt = (0xF5, 0xFE, "RTCM-REFSTATIONPVT"),
}

impl MessageId {
    /// Resolve a catalog name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|id| id.name().eq_ignore_ascii_case(name))
    }

    /// Class mnemonic, e.g. `CFG`.
    pub fn class_name(self) -> &'static str {
        ubxprims_frame::class_name(self.identity().class)
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for MessageId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl std::str::FromStr for MessageId {
    type Err = crate::error::MessageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| crate::error::MessageError::UnknownName(s.to_string()))
    }
}

/// A message identity seen on the wire, known or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Known(MessageId),
    Unrecognized(Identity),
}

impl MessageKind {
    pub fn of(identity: Identity) -> Self {
        match MessageId::from_identity(identity) {
            Some(id) => MessageKind::Known(id),
            None => MessageKind::Unrecognized(identity),
        }
    }

    pub fn identity(self) -> Identity {
        match self {
            MessageKind::Known(id) => id.identity(),
            MessageKind::Unrecognized(identity) => identity,
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageKind::Known(id) => f.write_str(id.name()),
            MessageKind::Unrecognized(identity) => write!(f, "UNKNOWN-{identity}"),
        }
    }
}
