//! IEEE 488.2 common commands and the SCPI error queue, as bare headers.

///Identification
pub const IDN: &str = "*IDN";
///Option identification
pub const OPT: &str = "*OPT";
///Reset
pub const RST: &str = "*RST";
///Clear status
pub const CLS: &str = "*CLS";
///Operation complete
pub const OPC: &str = "*OPC";
///Wait to complete
pub const WAI: &str = "*WAI";
///Event status enable
pub const ESE: &str = "*ESE";
///Event status register
pub const ESR: &str = "*ESR";
///Service request enable
pub const SRE: &str = "*SRE";
///Read status byte
pub const STB: &str = "*STB";
///Error queue
pub const SYST_ERR: &str = ":SYSTem:ERRor";
