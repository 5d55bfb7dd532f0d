//! Register field types for the E220-900JP configuration window
//!
//! Every field is a tagged enum (or validated scalar) with an explicit
//! bidirectional mapping between the human value and its register bit
//! pattern. Constructors from raw values are lossy on purpose: an
//! unrecognised input falls back to the module's documented default
//! instead of failing, matching the module's own behaviour.

use crate::config::radio_defaults;

/// UART baud rate, 3 bits in REG0[7:5]
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UartBaudRate {
    B1200 = 0b000,
    B2400 = 0b001,
    B4800 = 0b010,
    B9600 = 0b011,
    B19200 = 0b100,
    B38400 = 0b101,
    B57600 = 0b110,
    B115200 = 0b111,
}

impl UartBaudRate {
    /// Register code for this rate
    pub fn bits(self) -> u8 {
        self as u8
    }

    /// Decode the 3-bit register code; total over the bit width
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0b111 {
            0b000 => Self::B1200,
            0b001 => Self::B2400,
            0b010 => Self::B4800,
            0b011 => Self::B9600,
            0b100 => Self::B19200,
            0b101 => Self::B38400,
            0b110 => Self::B57600,
            _ => Self::B115200,
        }
    }

    /// Map a rate in bps; unrecognised rates fall back to 9600
    pub fn from_bps(bps: u32) -> Self {
        match bps {
            1200 => Self::B1200,
            2400 => Self::B2400,
            4800 => Self::B4800,
            9600 => Self::B9600,
            19200 => Self::B19200,
            38400 => Self::B38400,
            57600 => Self::B57600,
            115200 => Self::B115200,
            _ => Self::B9600,
        }
    }

    /// The rate in bps
    pub fn bps(self) -> u32 {
        match self {
            Self::B1200 => 1200,
            Self::B2400 => 2400,
            Self::B4800 => 4800,
            Self::B9600 => 9600,
            Self::B19200 => 19200,
            Self::B38400 => 38400,
            Self::B57600 => 57600,
            Self::B115200 => 115200,
        }
    }
}

impl Default for UartBaudRate {
    fn default() -> Self {
        Self::B9600
    }
}

/// LoRa bandwidth, the low two bits of the 5-bit air data rate code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bandwidth {
    Khz125,
    Khz250,
    Khz500,
}

impl Bandwidth {
    /// Offset contributed to the air data rate code
    pub fn air_rate_offset(self) -> u8 {
        match self {
            Self::Khz125 => 0,
            Self::Khz250 => 1,
            Self::Khz500 => 2,
        }
    }

    /// Map a bandwidth in kHz; unrecognised values fall back to 125 kHz
    pub fn from_khz(khz: u16) -> Self {
        match khz {
            125 => Self::Khz125,
            250 => Self::Khz250,
            500 => Self::Khz500,
            _ => Self::Khz125,
        }
    }

    /// The bandwidth in kHz
    pub fn khz(self) -> u16 {
        match self {
            Self::Khz125 => 125,
            Self::Khz250 => 250,
            Self::Khz500 => 500,
        }
    }

    /// Valid spreading factor range at this bandwidth
    pub fn spreading_factor_range(self) -> core::ops::RangeInclusive<u8> {
        match self {
            Self::Khz125 => 5..=9,
            Self::Khz250 => 5..=10,
            Self::Khz500 => 5..=11,
        }
    }

    /// Highest channel number usable at this bandwidth
    pub fn max_channel(self) -> u8 {
        match self {
            Self::Khz125 => 37,
            Self::Khz250 => 36,
            Self::Khz500 => 30,
        }
    }

    /// Base frequency of channel 0 in MHz (E220-900JP band plan)
    pub fn base_frequency_mhz(self) -> f32 {
        match self {
            Self::Khz125 => 920.6,
            Self::Khz250 => 920.7,
            Self::Khz500 => 920.8,
        }
    }
}

impl Default for Bandwidth {
    fn default() -> Self {
        Self::Khz125
    }
}

/// Maximum payload chunk size used by the module's fragmentation,
/// 2 bits in REG1[7:6]
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubPacketSize {
    Bytes200 = 0b00,
    Bytes128 = 0b01,
    Bytes64 = 0b10,
    Bytes32 = 0b11,
}

impl SubPacketSize {
    pub fn bits(self) -> u8 {
        self as u8
    }

    pub fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0b00 => Self::Bytes200,
            0b01 => Self::Bytes128,
            0b10 => Self::Bytes64,
            _ => Self::Bytes32,
        }
    }

    /// Map a size in bytes to the smallest sub-packet that holds it
    pub fn from_bytes(bytes: u16) -> Self {
        if bytes <= 32 {
            Self::Bytes32
        } else if bytes <= 64 {
            Self::Bytes64
        } else if bytes <= 128 {
            Self::Bytes128
        } else {
            Self::Bytes200
        }
    }

    /// The size in bytes
    pub fn bytes(self) -> u16 {
        match self {
            Self::Bytes200 => 200,
            Self::Bytes128 => 128,
            Self::Bytes64 => 64,
            Self::Bytes32 => 32,
        }
    }
}

impl Default for SubPacketSize {
    fn default() -> Self {
        Self::Bytes200
    }
}

/// Transmit power, 2 bits in REG1[1:0]
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransmitPower {
    Dbm22 = 0b00,
    Dbm17 = 0b01,
    Dbm13 = 0b10,
    Dbm0 = 0b11,
}

impl TransmitPower {
    pub fn bits(self) -> u8 {
        self as u8
    }

    pub fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0b00 => Self::Dbm22,
            0b01 => Self::Dbm17,
            0b10 => Self::Dbm13,
            _ => Self::Dbm0,
        }
    }

    /// Map a power in dBm; unrecognised values fall back to 13 dBm
    pub fn from_dbm(dbm: u8) -> Self {
        match dbm {
            22 => Self::Dbm22,
            17 => Self::Dbm17,
            13 => Self::Dbm13,
            0 => Self::Dbm0,
            _ => Self::Dbm13,
        }
    }

    /// The power in dBm
    pub fn dbm(self) -> u8 {
        match self {
            Self::Dbm22 => 22,
            Self::Dbm17 => 17,
            Self::Dbm13 => 13,
            Self::Dbm0 => 0,
        }
    }
}

impl Default for TransmitPower {
    fn default() -> Self {
        Self::Dbm13
    }
}

/// Transmission method, 1 bit in REG3[6]
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransmissionMode {
    /// Payload relayed as-is to every listener on the channel
    Transparent = 0,
    /// Payload prefixed with a destination address and channel
    Fixed = 1,
}

impl TransmissionMode {
    pub fn bits(self) -> u8 {
        self as u8
    }

    pub fn from_bits(bits: u8) -> Self {
        if bits & 0b1 == 0 {
            Self::Transparent
        } else {
            Self::Fixed
        }
    }
}

impl Default for TransmissionMode {
    fn default() -> Self {
        Self::Transparent
    }
}

/// Structured configuration of the module's eight register bytes
///
/// A plain value type: two configs with equal fields are the same
/// configuration. Invalid raw inputs never reach this struct; the lossy
/// enum constructors above clamp them to defaults first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RadioConfig {
    pub own_address: u16,
    pub baud_rate: UartBaudRate,
    pub bandwidth: Bandwidth,
    pub spreading_factor: u8,
    pub subpacket_size: SubPacketSize,
    pub rssi_ambient_noise: bool,
    pub transmitting_power: TransmitPower,
    pub own_channel: u8,
    pub rssi_byte: bool,
    pub transmission_mode: TransmissionMode,
    /// Wake-on-radio listen interval, multiples of 500 ms up to 4000;
    /// out-of-step values clamp at encode time
    pub wor_cycle_ms: u16,
    /// Opaque 16-bit key, carried verbatim
    pub encryption_key: u16,
}

impl Default for RadioConfig {
    fn default() -> Self {
        Self {
            own_address: 0,
            baud_rate: UartBaudRate::from_bps(radio_defaults::BAUD_RATE),
            bandwidth: Bandwidth::from_khz(radio_defaults::BANDWIDTH_KHZ),
            spreading_factor: radio_defaults::SPREADING_FACTOR,
            subpacket_size: SubPacketSize::from_bytes(radio_defaults::SUBPACKET_SIZE),
            rssi_ambient_noise: false,
            transmitting_power: TransmitPower::from_dbm(radio_defaults::TX_POWER_DBM),
            own_channel: 0,
            rssi_byte: false,
            transmission_mode: TransmissionMode::Transparent,
            wor_cycle_ms: radio_defaults::WOR_CYCLE_MS,
            encryption_key: 0,
        }
    }
}

impl RadioConfig {
    /// Centre frequency of the configured channel in MHz
    pub fn frequency_mhz(&self) -> f32 {
        self.bandwidth.base_frequency_mhz() + self.own_channel as f32 * 0.2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baud_rate_bits_round_trip() {
        for bps in [1200u32, 2400, 4800, 9600, 19200, 38400, 57600, 115200] {
            let rate = UartBaudRate::from_bps(bps);
            assert_eq!(rate.bps(), bps);
            assert_eq!(UartBaudRate::from_bits(rate.bits()), rate);
        }
    }

    #[test]
    fn test_unknown_baud_rate_falls_back_to_9600() {
        assert_eq!(UartBaudRate::from_bps(31250), UartBaudRate::B9600);
        assert_eq!(UartBaudRate::from_bps(0), UartBaudRate::B9600);
        assert_eq!(UartBaudRate::B9600.bits(), 0b011);
    }

    #[test]
    fn test_subpacket_thresholds() {
        assert_eq!(SubPacketSize::from_bytes(1), SubPacketSize::Bytes32);
        assert_eq!(SubPacketSize::from_bytes(32), SubPacketSize::Bytes32);
        assert_eq!(SubPacketSize::from_bytes(33), SubPacketSize::Bytes64);
        assert_eq!(SubPacketSize::from_bytes(64), SubPacketSize::Bytes64);
        assert_eq!(SubPacketSize::from_bytes(128), SubPacketSize::Bytes128);
        assert_eq!(SubPacketSize::from_bytes(129), SubPacketSize::Bytes200);
        assert_eq!(SubPacketSize::from_bytes(200), SubPacketSize::Bytes200);
    }

    #[test]
    fn test_transmit_power_fallback() {
        assert_eq!(TransmitPower::from_dbm(22).bits(), 0b00);
        assert_eq!(TransmitPower::from_dbm(17).bits(), 0b01);
        assert_eq!(TransmitPower::from_dbm(13).bits(), 0b10);
        assert_eq!(TransmitPower::from_dbm(0).bits(), 0b11);
        // Values off the module's menu clamp to 13 dBm
        assert_eq!(TransmitPower::from_dbm(20), TransmitPower::Dbm13);
        assert_eq!(TransmitPower::from_dbm(14), TransmitPower::Dbm13);
    }

    #[test]
    fn test_bandwidth_channel_limits() {
        assert_eq!(Bandwidth::Khz125.max_channel(), 37);
        assert_eq!(Bandwidth::Khz250.max_channel(), 36);
        assert_eq!(Bandwidth::Khz500.max_channel(), 30);
    }

    #[test]
    fn test_frequency_display() {
        let mut config = RadioConfig::default();
        config.own_channel = 0;
        assert!((config.frequency_mhz() - 920.6).abs() < 0.01);
        config.own_channel = 10;
        assert!((config.frequency_mhz() - 922.6).abs() < 0.01);
        config.bandwidth = Bandwidth::Khz500;
        assert!((config.frequency_mhz() - 922.8).abs() < 0.01);
    }
}
