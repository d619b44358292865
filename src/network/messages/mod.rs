//! Typed J1939-71 parameter groups.
//!
//! Each record carries the timestamp of the PDU it was decoded from, followed
//! by its parameters in engineering units. Scaled readings that were not
//! available on the bus hold the negated raw code (see [`super::scaling`]).

mod brake;
mod command;
mod engine;
mod engine_config;
mod pdu;
mod retarder;
mod transmission;
mod vehicle;

pub use brake::{Ebc1, Ebc2};
pub use command::{
    exac_checksum, Command, Exac, Tsc1, EXAC_DESTINATION, EXAC_PRIORITY, TSC1_PRIORITY,
};
pub use engine::{Eec1, Eec2, Eec3, Ei, Etemp, Fd, Gfi2, Lfe, Turbo};
pub use engine_config::Ecfg;
pub use pdu::PduInterpreter;
pub use retarder::{Erc1, Rcfg, Rf};
pub use transmission::{Etc1, Etc2, Tf};
pub use vehicle::{Ambc, Ccvs, Dd, Hrvd, Iec, Pto, Vd, Vep};

use crate::types::Pgn;

pub const PGN_TSC1: Pgn = 0x0000;
pub const PGN_TSC1_ENGINE_RETARDER: Pgn = 0x000F;
pub const PGN_TSC1_DRIVELINE_RETARDER: Pgn = 0x0010;
pub const PGN_TSC1_EXHAUST_RETARDER: Pgn = 0x0029;
/// Destinations with a TSC1 interpreter: engine and the three retarders
pub const TSC1_DESTINATIONS: [u8; 4] = [
    PGN_TSC1 as u8,
    PGN_TSC1_ENGINE_RETARDER as u8,
    PGN_TSC1_DRIVELINE_RETARDER as u8,
    PGN_TSC1_EXHAUST_RETARDER as u8,
];
pub const PGN_EXAC: Pgn = 0x040B;
pub const PGN_ERC1: Pgn = 0xF000;
pub const PGN_EBC1: Pgn = 0xF001;
pub const PGN_ETC1: Pgn = 0xF002;
pub const PGN_EEC2: Pgn = 0xF003;
pub const PGN_EEC1: Pgn = 0xF004;
pub const PGN_ETC2: Pgn = 0xF005;
pub const PGN_GFI2: Pgn = 0xFE81;
pub const PGN_EI: Pgn = 0xFE92;
pub const PGN_FD: Pgn = 0xFEBD;
pub const PGN_EBC2: Pgn = 0xFEBF;
pub const PGN_HRVD: Pgn = 0xFEC1;
pub const PGN_TURBO: Pgn = 0xFEDD;
pub const PGN_EEC3: Pgn = 0xFEDF;
pub const PGN_VD: Pgn = 0xFEE0;
pub const PGN_RCFG: Pgn = 0xFEE1;
pub const PGN_ECFG: Pgn = 0xFEE3;
pub const PGN_ETEMP: Pgn = 0xFEEE;
pub const PGN_PTO: Pgn = 0xFEF0;
pub const PGN_CCVS: Pgn = 0xFEF1;
pub const PGN_LFE: Pgn = 0xFEF2;
pub const PGN_AMBC: Pgn = 0xFEF5;
pub const PGN_IEC: Pgn = 0xFEF6;
pub const PGN_VEP: Pgn = 0xFEF7;
pub const PGN_TF: Pgn = 0xFEF8;
pub const PGN_RF: Pgn = 0xFEFB;
pub const PGN_DD: Pgn = 0xFEFC;
