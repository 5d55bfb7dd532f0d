pub mod codec;
pub mod hex;
pub mod types;

pub use codec::{RegisterFrame, QUERY_FRAME};
pub use hex::HexError;
pub use types::{
    Bandwidth, RadioConfig, SubPacketSize, TransmissionMode, TransmitPower, UartBaudRate,
};
