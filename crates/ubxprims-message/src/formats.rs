//! Built-in payload layouts.
//!
//! Several identities carry more than one fixed length (poll request vs.
//! response) and some combine fixed polls with a repeating response.
//! Padding is kept as named reserved fields so that encoding reproduces the
//! received bytes exactly.

use crate::catalog::MessageId as M;
use crate::descriptor::{Block, Field as F, FormatDescriptor as D};

const NONE: &[F] = &[];

// NAV

const NAV_POSECEF: &[F] = &[
    F::u32("iTOW"),
    F::i32("ecefX"),
    F::i32("ecefY"),
    F::i32("ecefZ"),
    F::u32("pAcc"),
];

const NAV_POSLLH: &[F] = &[
    F::u32("iTOW"),
    F::i32("lon"),
    F::i32("lat"),
    F::i32("height"),
    F::i32("hMSL"),
    F::u32("hAcc"),
    F::u32("vAcc"),
];

const NAV_POSUTM: &[F] = &[
    F::u32("iTOW"),
    F::i32("east"),
    F::i32("north"),
    F::i32("alt"),
    F::i8("zone"),
    F::i8("hem"),
];

const NAV_DOP: &[F] = &[
    F::u32("iTOW"),
    F::u16("gDOP"),
    F::u16("pDOP"),
    F::u16("tDOP"),
    F::u16("vDOP"),
    F::u16("hDOP"),
    F::u16("nDOP"),
    F::u16("eDOP"),
];

const NAV_STATUS: &[F] = &[
    F::u32("iTOW"),
    F::u8("gpsFix"),
    F::u8("flags"),
    F::u8("fixStat"),
    F::u8("flags2"),
    F::u32("ttff"),
    F::u32("msss"),
];

const NAV_SOL: &[F] = &[
    F::u32("iTOW"),
    F::i32("fTOW"),
    F::i16("week"),
    F::u8("gpsFix"),
    F::u8("flags"),
    F::i32("ecefX"),
    F::i32("ecefY"),
    F::i32("ecefZ"),
    F::u32("pAcc"),
    F::i32("ecefVX"),
    F::i32("ecefVY"),
    F::i32("ecefVZ"),
    F::u32("sAcc"),
    F::u16("pDOP"),
    F::reserved("reserved1", 1),
    F::u8("numSV"),
    F::reserved("reserved2", 4),
];

const NAV_VELECEF: &[F] = &[
    F::u32("iTOW"),
    F::i32("ecefVX"),
    F::i32("ecefVY"),
    F::i32("ecefVZ"),
    F::u32("sAcc"),
];

const NAV_VELNED: &[F] = &[
    F::u32("iTOW"),
    F::i32("velN"),
    F::i32("velE"),
    F::i32("velD"),
    F::u32("speed"),
    F::u32("gSpeed"),
    F::i32("heading"),
    F::u32("sAcc"),
    F::u32("cAcc"),
];

const NAV_TIMEGPS: &[F] = &[
    F::u32("iTOW"),
    F::i32("fTOW"),
    F::i16("week"),
    F::i8("leapS"),
    F::u8("valid"),
    F::u32("tAcc"),
];

const NAV_TIMEUTC: &[F] = &[
    F::u32("iTOW"),
    F::u32("tAcc"),
    F::i32("nano"),
    F::u16("year"),
    F::u8("month"),
    F::u8("day"),
    F::u8("hour"),
    F::u8("min"),
    F::u8("sec"),
    F::u8("valid"),
];

const NAV_CLOCK: &[F] = &[
    F::u32("iTOW"),
    F::i32("clkB"),
    F::i32("clkD"),
    F::u32("tAcc"),
    F::u32("fAcc"),
];

const NAV_PVT: &[F] = &[
    F::u32("iTOW"),
    F::u16("year"),
    F::u8("month"),
    F::u8("day"),
    F::u8("hour"),
    F::u8("min"),
    F::u8("sec"),
    F::u8("valid"),
    F::u32("tAcc"),
    F::i32("nano"),
    F::u8("fixType"),
    F::u8("flags"),
    F::u8("flags2"),
    F::u8("numSV"),
    F::i32("lon"),
    F::i32("lat"),
    F::i32("height"),
    F::i32("hMSL"),
    F::u32("hAcc"),
    F::u32("vAcc"),
    F::i32("velN"),
    F::i32("velE"),
    F::i32("velD"),
    F::i32("gSpeed"),
    F::i32("headMot"),
    F::u32("sAcc"),
    F::u32("headAcc"),
    F::u16("pDOP"),
    F::reserved("reserved1", 6),
    F::i32("headVeh"),
    F::i16("magDec"),
    F::u16("magAcc"),
];

const NAV_SVINFO_HEADER: &[F] = &[
    F::u32("iTOW"),
    F::u8("numCh"),
    F::u8("globalFlags"),
    F::reserved("reserved1", 2),
];

const NAV_SVINFO_BLOCK: &[F] = &[
    F::u8("chn"),
    F::u8("svid"),
    F::u8("flags"),
    F::u8("quality"),
    F::u8("cno"),
    F::i8("elev"),
    F::i16("azim"),
    F::i32("prRes"),
];

const NAV_DGPS_HEADER: &[F] = &[
    F::u32("iTOW"),
    F::i32("age"),
    F::i16("baseId"),
    F::i16("baseHealth"),
    F::u8("numCh"),
    F::u8("status"),
    F::reserved("reserved1", 2),
];

const NAV_DGPS_BLOCK: &[F] = &[
    F::u8("svid"),
    F::u8("flags"),
    F::u16("ageC"),
    F::f32("prc"),
    F::f32("prrc"),
];

const NAV_SBAS_HEADER: &[F] = &[
    F::u32("iTOW"),
    F::u8("geo"),
    F::u8("mode"),
    F::i8("sys"),
    F::u8("service"),
    F::u8("cnt"),
    F::reserved("reserved0", 3),
];

const NAV_SBAS_BLOCK: &[F] = &[
    F::u8("svid"),
    F::u8("flags"),
    F::u8("udre"),
    F::u8("svSys"),
    F::u8("svService"),
    F::reserved("reserved1", 1),
    F::i16("prc"),
    F::reserved("reserved2", 2),
    F::i16("ic"),
];

const NAV_EKFSTATUS: &[F] = &[
    F::i32("pulses"),
    F::i32("period"),
    F::u32("gyroMean"),
    F::i16("temperature"),
    F::i8("direction"),
    F::i8("calibStatus"),
    F::i32("pulseScale"),
    F::i32("gyroBias"),
    F::i32("gyroScale"),
    F::i16("accPulseScale"),
    F::i16("accGyroBias"),
    F::i16("accGyroScale"),
    F::i8("measUsed"),
    F::reserved("reserved1", 1),
];

const NAV_ATT: &[F] = &[
    F::u32("iTOW"),
    F::u8("version"),
    F::reserved("reserved1", 3),
    F::i32("roll"),
    F::i32("pitch"),
    F::i32("heading"),
    F::u32("accRoll"),
    F::u32("accPitch"),
    F::u32("accHeading"),
];

// RXM and AID almanac / ephemeris share their layouts.

const SVID_U8: &[F] = &[F::u8("svid")];

const ALM_SHORT: &[F] = &[F::u32("svid"), F::u32("week")];

const ALM_FULL: &[F] = &[
    F::u32("svid"),
    F::u32("week"),
    F::u32("dwrd0"),
    F::u32("dwrd1"),
    F::u32("dwrd2"),
    F::u32("dwrd3"),
    F::u32("dwrd4"),
    F::u32("dwrd5"),
    F::u32("dwrd6"),
    F::u32("dwrd7"),
];

const EPH_SHORT: &[F] = &[F::u32("svid"), F::u32("how")];

const EPH_FULL: &[F] = &[
    F::u32("svid"),
    F::u32("how"),
    F::u32("sf1d0"),
    F::u32("sf1d1"),
    F::u32("sf1d2"),
    F::u32("sf1d3"),
    F::u32("sf1d4"),
    F::u32("sf1d5"),
    F::u32("sf1d6"),
    F::u32("sf1d7"),
    F::u32("sf2d0"),
    F::u32("sf2d1"),
    F::u32("sf2d2"),
    F::u32("sf2d3"),
    F::u32("sf2d4"),
    F::u32("sf2d5"),
    F::u32("sf2d6"),
    F::u32("sf2d7"),
    F::u32("sf3d0"),
    F::u32("sf3d1"),
    F::u32("sf3d2"),
    F::u32("sf3d3"),
    F::u32("sf3d4"),
    F::u32("sf3d5"),
    F::u32("sf3d6"),
    F::u32("sf3d7"),
];

const RXM_RAW_HEADER: &[F] = &[
    F::i32("iTOW"),
    F::i16("week"),
    F::u8("numSV"),
    F::reserved("reserved1", 1),
];

const RXM_RAW_BLOCK: &[F] = &[
    F::f64("cpMes"),
    F::f64("prMes"),
    F::f32("doMes"),
    F::u8("sv"),
    F::i8("mesQI"),
    F::i8("cno"),
    F::u8("lli"),
];

const RXM_SVSI_HEADER: &[F] = &[
    F::i32("iTOW"),
    F::i16("week"),
    F::u8("numVis"),
    F::u8("numSV"),
];

const RXM_SVSI_BLOCK: &[F] = &[
    F::u8("svid"),
    F::u8("svFlag"),
    F::i16("azim"),
    F::i8("elev"),
    F::u8("age"),
];

const RXM_SFRB: &[F] = &[
    F::u8("chn"),
    F::u8("svid"),
    F::u32("dwrd0"),
    F::u32("dwrd1"),
    F::u32("dwrd2"),
    F::u32("dwrd3"),
    F::u32("dwrd4"),
    F::u32("dwrd5"),
    F::u32("dwrd6"),
    F::u32("dwrd7"),
    F::u32("dwrd8"),
    F::u32("dwrd9"),
];

// INF

const INF_CHAR: &[F] = &[F::bytes("char", 1)];

// ACK

const ACK: &[F] = &[F::u8("clsID"), F::u8("msgID")];

// CFG

const CFG_GNSS_HEADER: &[F] = &[
    F::u8("msgVer"),
    F::u8("numTrkChHw"),
    F::u8("numTrkChUse"),
    F::u8("numConfigBlocks"),
];

const CFG_GNSS_BLOCK: &[F] = &[
    F::u8("gnssId"),
    F::u8("resTrkCh"),
    F::u8("maxTrkCh"),
    F::reserved("reserved1", 1),
    F::u32("flags"),
];

const PORT_ID: &[F] = &[F::u8("portID")];

const CFG_PRT_BLOCK: &[F] = &[
    F::u8("portID"),
    F::reserved("reserved1", 1),
    F::u16("txReady"),
    F::u32("mode"),
    F::u32("baudRate"),
    F::u16("inProtoMask"),
    F::u16("outProtoMask"),
    F::u16("flags"),
    F::reserved("reserved2", 2),
];

const CFG_USB: &[F] = &[
    F::u16("vendorID"),
    F::u16("productID"),
    F::reserved("reserved1", 2),
    F::reserved("reserved2", 2),
    F::u16("powerConsumption"),
    F::u16("flags"),
    F::bytes("vendorString", 32),
    F::bytes("productString", 32),
    F::bytes("serialNumber", 32),
];

const CFG_MSG_POLL: &[F] = &[F::u8("msgClass"), F::u8("msgID")];

const CFG_MSG_RATE: &[F] = &[F::u8("rate")];

const CFG_NMEA: &[F] = &[
    F::u8("filter"),
    F::u8("nmeaVersion"),
    F::u8("numSV"),
    F::u8("flags"),
];

const CFG_PMS: &[F] = &[
    F::u8("version"),
    F::u8("powerSetupValue"),
    F::u16("period"),
    F::u16("onTime"),
    F::reserved("reserved1", 2),
];

const CFG_RATE: &[F] = &[F::u16("measRate"), F::u16("navRate"), F::u16("timeRef")];

const CFG_CFG: &[F] = &[F::u32("clearMask"), F::u32("saveMask"), F::u32("loadMask")];

const CFG_CFG_DEVICE: &[F] = &[
    F::u32("clearMask"),
    F::u32("saveMask"),
    F::u32("loadMask"),
    F::u8("deviceMask"),
];

const CFG_TP: &[F] = &[
    F::u32("interval"),
    F::u32("length"),
    F::i8("status"),
    F::u8("timeRef"),
    F::u8("flags"),
    F::reserved("reserved1", 1),
    F::i16("antennaCableDelay"),
    F::i16("rfGroupDelay"),
    F::i32("userDelay"),
];

const CFG_NAV2: &[F] = &[
    F::u8("platform"),
    F::reserved("reserved1", 3),
    F::u8("minSVInitial"),
    F::u8("minSVs"),
    F::u8("maxSVs"),
    F::u8("fixMode"),
    F::i32("fixedAltitude"),
    F::u8("minCN0Initial"),
    F::u8("minCN0After"),
    F::u8("minElev"),
    F::u8("dgpsTimeout"),
    F::u8("maxDR"),
    F::u8("navOpt"),
    F::reserved("reserved2", 2),
    F::u16("pDOP"),
    F::u16("tDOP"),
    F::u16("pAcc"),
    F::u16("tAcc"),
    F::u8("staticThres"),
    F::reserved("reserved3", 11),
];

const PROTOCOL_ID: &[F] = &[F::u8("protocolID")];

const CFG_INF_BLOCK: &[F] = &[
    F::u8("protocolID"),
    F::reserved("reserved1", 3),
    F::u8("infMsgMask0"),
    F::u8("infMsgMask1"),
    F::u8("infMsgMask2"),
    F::u8("infMsgMask3"),
    F::u8("infMsgMask4"),
    F::u8("infMsgMask5"),
];

const CFG_RST: &[F] = &[
    F::u16("navBbrMask"),
    F::u8("resetMode"),
    F::reserved("reserved1", 1),
];

const CFG_RXM: &[F] = &[F::u8("gpsMode"), F::u8("lpMode")];

const CFG_ANT: &[F] = &[F::u16("flags"), F::u16("pins")];

const CFG_FXN: &[F] = &[
    F::u32("flags"),
    F::u32("tReacq"),
    F::u32("tAcq"),
    F::u32("tReacqOff"),
    F::u32("tAcqOff"),
    F::u32("tOn"),
    F::u32("tOff"),
    F::reserved("reserved1", 4),
    F::u32("baseTow"),
];

const CFG_SBAS: &[F] = &[
    F::u8("mode"),
    F::u8("usage"),
    F::u8("maxSBAS"),
    F::u8("scanmode2"),
    F::u32("scanmode1"),
];

const CFG_LIC: &[F] = &[
    F::u16("lic1"),
    F::u16("lic2"),
    F::u16("lic3"),
    F::u16("lic4"),
    F::u16("lic5"),
    F::u16("lic6"),
];

const CFG_TM: &[F] = &[F::u32("intid"), F::u32("rate"), F::u32("flags")];

const CFG_TM2_POLL: &[F] = &[F::u8("ch")];

const CFG_TM2: &[F] = &[
    F::u8("ch"),
    F::reserved("reserved1", 3),
    F::u32("rate"),
    F::u32("flags"),
];

const CFG_TMODE: &[F] = &[
    F::u32("timeMode"),
    F::i32("fixedPosX"),
    F::i32("fixedPosY"),
    F::i32("fixedPosZ"),
    F::u32("fixedPosVar"),
    F::u32("svinMinDur"),
    F::u32("svinVarLimit"),
];

const CFG_HNR: &[F] = &[F::u8("highNavRate"), F::reserved("reserved1", 3)];

// UPD

const UPD_UPLOAD_16: &[F] = &[
    F::u32("startAddr"),
    F::u32("dataSize"),
    F::u32("flags"),
    F::bytes("data", 16),
];

const UPD_UPLOAD_1: &[F] = &[
    F::u32("startAddr"),
    F::u32("dataSize"),
    F::u32("flags"),
    F::bytes("data", 1),
];

const UPD_DOWNL_1: &[F] = &[F::u32("startAddr"), F::u32("flags"), F::bytes("data", 1)];

const UPD_DOWNL: &[F] = &[F::u32("startAddr"), F::u32("flags")];

// MON

const MON_SCHD: &[F] = &[
    F::u32("tskRun"),
    F::u32("tskSchd"),
    F::u32("tskOvrr"),
    F::u32("tskReg"),
    F::u16("stack"),
    F::u16("stackSize"),
    F::u16("cpuIdle"),
    F::u8("flySly"),
    F::u8("ptlSly"),
];

const MON_HW: &[F] = &[
    F::u32("pinSel"),
    F::u32("pinBank"),
    F::u32("pinDir"),
    F::u32("pinVal"),
    F::u16("noisePerMS"),
    F::u16("agcCnt"),
    F::u8("aStatus"),
    F::u8("aPower"),
    F::u8("flags"),
    F::reserved("reserved1", 1),
    F::u32("usedMask"),
    F::bytes("vp", 17),
    F::u8("jamInd"),
    F::reserved("reserved2", 2),
    F::u32("pinIrq"),
    F::u32("pullH"),
    F::u32("pullL"),
];

const MON_VER_HEADER: &[F] = &[F::bytes("swVersion", 30), F::bytes("hwVersion", 10)];

const MON_VER_BLOCK: &[F] = &[F::bytes("extension", 30)];

const MON_IPC: &[F] = &[
    F::u32("hndlrInst"),
    F::bytes("lastEvent", 16),
    F::u32("irqInst"),
    F::u32("irqCall"),
];

const MON_EXCEPT: &[F] = &[F::u32("code"), F::u32("num"), F::bytes("registers", 308)];

// AID

const AID_INI: &[F] = &[
    F::i32("ecefXOrLat"),
    F::i32("ecefYOrLon"),
    F::i32("ecefZOrAlt"),
    F::u32("posAcc"),
    F::u16("tmCfg"),
    F::u16("wn"),
    F::u32("tow"),
    F::i32("towNs"),
    F::u32("tAccMs"),
    F::u32("tAccNs"),
    F::i32("clkDOrFreq"),
    F::u32("clkDAccOrFreqAcc"),
    F::u32("flags"),
];

const AID_HUI: &[F] = &[
    F::u32("health"),
    F::f64("utcA1"),
    F::f64("utcA0"),
    F::i32("utcTOT"),
    F::u16("utcWNT"),
    F::u16("utcLS"),
    F::u16("utcWNF"),
    F::u16("utcDN"),
    F::u16("utcLSF"),
    F::u16("utcSpare"),
    F::f32("klobA0"),
    F::f32("klobA1"),
    F::f32("klobA2"),
    F::f32("klobA3"),
    F::f32("klobB0"),
    F::f32("klobB1"),
    F::f32("klobB2"),
    F::f32("klobB3"),
    F::u32("flags"),
];

// ESF

const ESF_STATUS_HEADER: &[F] = &[
    F::u32("iTOW"),
    F::u8("version"),
    F::reserved("reserved1", 7),
    F::u8("fusionMode"),
    F::reserved("reserved2", 2),
    F::u8("numSens"),
];

const ESF_STATUS_BLOCK: &[F] = &[
    F::u8("sensStatus1"),
    F::u8("sensStatus2"),
    F::u8("freq"),
    F::u8("faults"),
];

const ESF_INS: &[F] = &[
    F::u32("bitfield0"),
    F::reserved("reserved1", 4),
    F::u32("iTOW"),
    F::i32("xAngRate"),
    F::i32("yAngRate"),
    F::i32("zAngRate"),
    F::i32("xAccel"),
    F::i32("yAccel"),
    F::i32("zAccel"),
];

const ESF_MEAS_HEADER: &[F] = &[F::u32("timeTag"), F::u16("flags"), F::u16("id")];

const ESF_MEAS_BLOCK: &[F] = &[F::sensor("data")];

const ESF_RAW_HEADER: &[F] = &[F::reserved("reserved1", 4)];

const ESF_RAW_BLOCK: &[F] = &[F::sensor("data"), F::u32("sTtag")];

// HNR

const HNR_PVT: &[F] = &[
    F::u32("iTOW"),
    F::u16("year"),
    F::u8("month"),
    F::u8("day"),
    F::u8("hour"),
    F::u8("min"),
    F::u8("sec"),
    F::u8("valid"),
    F::i32("nano"),
    F::u8("gpsFix"),
    F::u8("flags"),
    F::reserved("reserved1", 2),
    F::i32("lon"),
    F::i32("lat"),
    F::i32("height"),
    F::i32("hMSL"),
    F::i32("gSpeed"),
    F::i32("speed"),
    F::i32("headMot"),
    F::i32("headVeh"),
    F::u32("hAcc"),
    F::u32("vAcc"),
    F::u32("sAcc"),
    F::u32("headAcc"),
    F::reserved("reserved2", 4),
];

// MGA

const MGA_GPS_EPH: &[F] = &[
    F::u8("type"),
    F::u8("version"),
    F::u8("svId"),
    F::reserved("reserved1", 1),
    F::u8("fitInterval"),
    F::u8("uraIndex"),
    F::u8("svHealth"),
    F::i8("tgd"),
    F::u16("iodc"),
    F::u16("toc"),
    F::reserved("reserved2", 1),
    F::i8("af2"),
    F::i16("af1"),
    F::i32("af0"),
    F::i16("crs"),
    F::i16("deltaN"),
    F::i32("m0"),
    F::i16("cuc"),
    F::i16("cus"),
    F::u32("e"),
    F::u32("sqrtA"),
    F::u16("toe"),
    F::i16("cic"),
    F::i32("omega0"),
    F::i16("cis"),
    F::i16("crc"),
    F::i32("i0"),
    F::i32("omega"),
    F::i32("omegaDot"),
    F::i16("idot"),
    F::reserved("reserved3", 2),
];

const MGA_GPS_ALM: &[F] = &[
    F::u8("type"),
    F::u8("version"),
    F::u8("svId"),
    F::u8("svHealth"),
    F::u16("e"),
    F::u8("almWNa"),
    F::u8("toa"),
    F::i16("deltaI"),
    F::i16("omegaDot"),
    F::u32("sqrtA"),
    F::i32("omega0"),
    F::i32("omega"),
    F::i32("m0"),
    F::i16("af0"),
    F::i16("af1"),
    F::reserved("reserved1", 4),
];

const MGA_GLO_EPH: &[F] = &[
    F::u8("type"),
    F::u8("version"),
    F::u8("svId"),
    F::reserved("reserved1", 1),
    F::u8("ft"),
    F::u8("b"),
    F::u8("m"),
    F::i8("h"),
    F::i32("x"),
    F::i32("y"),
    F::i32("z"),
    F::i32("dx"),
    F::i32("dy"),
    F::i32("dz"),
    F::i8("ddx"),
    F::i8("ddy"),
    F::i8("ddz"),
    F::u8("tb"),
    F::i16("gamma"),
    F::u8("e"),
    F::i8("deltaTau"),
    F::i32("tau"),
    F::reserved("reserved2", 4),
];

const MGA_GLO_ALM: &[F] = &[
    F::u8("type"),
    F::u8("version"),
    F::u8("svId"),
    F::reserved("reserved1", 1),
    F::u16("n"),
    F::u8("m"),
    F::u8("c"),
    F::i16("tau"),
    F::u16("epsilon"),
    F::i32("lambda"),
    F::i32("deltaI"),
    F::u32("tLambda"),
    F::i32("deltaT"),
    F::i8("deltaDT"),
    F::i8("h"),
    F::i16("omega"),
    F::reserved("reserved2", 4),
];

const MGA_INI_TIME_UTC: &[F] = &[
    F::u8("type"),
    F::u8("version"),
    F::u8("ref"),
    F::i8("leapSecs"),
    F::u16("year"),
    F::u8("month"),
    F::u8("day"),
    F::u8("hour"),
    F::u8("minute"),
    F::u8("second"),
    F::reserved("reserved1", 1),
    F::u32("ns"),
    F::u16("tAccS"),
    F::reserved("reserved2", 2),
    F::u32("tAccNs"),
];

/// Every built-in layout.
pub static BUILTIN: &[D] = &[
    D::fixed(M::NavPosecef, 20, NAV_POSECEF),
    D::fixed(M::NavPosllh, 28, NAV_POSLLH),
    D::fixed(M::NavPosutm, 18, NAV_POSUTM),
    D::fixed(M::NavDop, 18, NAV_DOP),
    D::fixed(M::NavStatus, 16, NAV_STATUS),
    D::fixed(M::NavSol, 52, NAV_SOL),
    D::fixed(M::NavVelecef, 20, NAV_VELECEF),
    D::fixed(M::NavVelned, 36, NAV_VELNED),
    D::fixed(M::NavTimegps, 16, NAV_TIMEGPS),
    D::fixed(M::NavTimeutc, 20, NAV_TIMEUTC),
    D::fixed(M::NavClock, 20, NAV_CLOCK),
    D::fixed(M::NavPvt, 92, NAV_PVT),
    D::repeating(
        M::NavSvinfo,
        Block::new(8, NAV_SVINFO_HEADER),
        Block::new(12, NAV_SVINFO_BLOCK),
    ),
    D::repeating(
        M::NavDgps,
        Block::new(16, NAV_DGPS_HEADER),
        Block::new(12, NAV_DGPS_BLOCK),
    ),
    D::repeating(
        M::NavSbas,
        Block::new(12, NAV_SBAS_HEADER),
        Block::new(12, NAV_SBAS_BLOCK),
    ),
    D::fixed(M::NavEkfstatus, 36, NAV_EKFSTATUS),
    D::fixed(M::NavAtt, 32, NAV_ATT),
    D::repeating(
        M::RxmRaw,
        Block::new(8, RXM_RAW_HEADER),
        Block::new(24, RXM_RAW_BLOCK),
    ),
    D::repeating(
        M::RxmSvsi,
        Block::new(8, RXM_SVSI_HEADER),
        Block::new(6, RXM_SVSI_BLOCK),
    ),
    D::fixed(M::RxmSfrb, 42, RXM_SFRB),
    D::fixed(M::RxmAlm, 1, SVID_U8),
    D::fixed(M::RxmAlm, 8, ALM_SHORT),
    D::fixed(M::RxmAlm, 40, ALM_FULL),
    D::fixed(M::RxmEph, 1, SVID_U8),
    D::fixed(M::RxmEph, 8, EPH_SHORT),
    D::fixed(M::RxmEph, 104, EPH_FULL),
    D::repeating(M::InfError, Block::new(0, NONE), Block::new(1, INF_CHAR)),
    D::repeating(M::InfWarning, Block::new(0, NONE), Block::new(1, INF_CHAR)),
    D::repeating(M::InfNotice, Block::new(0, NONE), Block::new(1, INF_CHAR)),
    D::repeating(M::InfTest, Block::new(0, NONE), Block::new(1, INF_CHAR)),
    D::repeating(M::InfDebug, Block::new(0, NONE), Block::new(1, INF_CHAR)),
    D::repeating(M::InfUser, Block::new(0, NONE), Block::new(1, INF_CHAR)),
    D::fixed(M::AckAck, 2, ACK),
    D::fixed(M::AckNack, 2, ACK),
    D::repeating(
        M::CfgGnss,
        Block::new(4, CFG_GNSS_HEADER),
        Block::new(8, CFG_GNSS_BLOCK),
    ),
    D::fixed(M::CfgPrt, 1, PORT_ID),
    D::repeating(M::CfgPrt, Block::new(0, NONE), Block::new(20, CFG_PRT_BLOCK)),
    D::fixed(M::CfgUsb, 108, CFG_USB),
    D::fixed(M::CfgMsg, 2, CFG_MSG_POLL),
    D::repeating(
        M::CfgMsg,
        Block::new(2, CFG_MSG_POLL),
        Block::new(1, CFG_MSG_RATE),
    ),
    D::fixed(M::CfgNmea, 4, CFG_NMEA),
    D::fixed(M::CfgPms, 8, CFG_PMS),
    D::fixed(M::CfgRate, 6, CFG_RATE),
    D::fixed(M::CfgCfg, 12, CFG_CFG),
    D::fixed(M::CfgCfg, 13, CFG_CFG_DEVICE),
    D::fixed(M::CfgTp, 20, CFG_TP),
    D::fixed(M::CfgNav2, 40, CFG_NAV2),
    D::fixed(M::CfgInf, 1, PROTOCOL_ID),
    D::repeating(M::CfgInf, Block::new(0, NONE), Block::new(10, CFG_INF_BLOCK)),
    D::fixed(M::CfgRst, 4, CFG_RST),
    D::fixed(M::CfgRxm, 2, CFG_RXM),
    D::fixed(M::CfgAnt, 4, CFG_ANT),
    D::fixed(M::CfgFxn, 36, CFG_FXN),
    D::fixed(M::CfgSbas, 8, CFG_SBAS),
    D::fixed(M::CfgLic, 12, CFG_LIC),
    D::fixed(M::CfgTm, 12, CFG_TM),
    D::fixed(M::CfgTm2, 1, CFG_TM2_POLL),
    D::fixed(M::CfgTm2, 12, CFG_TM2),
    D::fixed(M::CfgTmode, 28, CFG_TMODE),
    D::fixed(M::CfgHnr, 4, CFG_HNR),
    D::fixed(M::UpdUpload, 28, UPD_UPLOAD_16),
    D::fixed(M::UpdUpload, 13, UPD_UPLOAD_1),
    D::fixed(M::UpdDownl, 9, UPD_DOWNL_1),
    D::fixed(M::UpdDownl, 8, UPD_DOWNL),
    D::fixed(M::MonSchd, 24, MON_SCHD),
    D::fixed(M::MonHw, 60, MON_HW),
    D::repeating(
        M::MonVer,
        Block::new(40, MON_VER_HEADER),
        Block::new(30, MON_VER_BLOCK),
    ),
    D::fixed(M::MonIpc, 28, MON_IPC),
    D::fixed(M::MonExcept, 316, MON_EXCEPT),
    D::fixed(M::AidIni, 48, AID_INI),
    D::fixed(M::AidData, 0, NONE),
    D::fixed(M::AidHui, 72, AID_HUI),
    D::fixed(M::AidAlm, 1, SVID_U8),
    D::fixed(M::AidAlm, 8, ALM_SHORT),
    D::fixed(M::AidAlm, 40, ALM_FULL),
    D::fixed(M::AidEph, 1, SVID_U8),
    D::fixed(M::AidEph, 8, EPH_SHORT),
    D::fixed(M::AidEph, 104, EPH_FULL),
    D::repeating(
        M::EsfStatus,
        Block::new(16, ESF_STATUS_HEADER),
        Block::new(4, ESF_STATUS_BLOCK),
    ),
    D::fixed(M::EsfIns, 36, ESF_INS),
    D::repeating(
        M::EsfMeas,
        Block::new(8, ESF_MEAS_HEADER),
        Block::new(4, ESF_MEAS_BLOCK),
    ),
    D::repeating(
        M::EsfRaw,
        Block::new(4, ESF_RAW_HEADER),
        Block::new(8, ESF_RAW_BLOCK),
    ),
    D::fixed(M::HnrPvt, 72, HNR_PVT),
    D::fixed(M::MgaGps, 68, MGA_GPS_EPH),
    D::fixed(M::MgaGps, 36, MGA_GPS_ALM),
    D::fixed(M::MgaGlo, 48, MGA_GLO_EPH),
    D::fixed(M::MgaGlo, 36, MGA_GLO_ALM),
    D::fixed(M::MgaIni, 24, MGA_INI_TIME_UTC),
];
