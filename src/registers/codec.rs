//! Register frame encode/decode for the E220-900JP
//!
//! # Frame Format
//!
//! Set command and query response share one 11-byte layout:
//! ```text
//! [opcode][addr 0x00][len 0x08][own_addr: u16 BE][REG0][REG1][REG2][REG3][key: u16 BE]
//! ```
//!
//! Register bit packing:
//! ```text
//! REG0 = [uart_baud: 3][air_data_rate: 5]
//! REG1 = [subpacket: 2][ambient_rssi: 1][reserved: 3... power occupies 1:0]
//! REG2 = [channel: 8]
//! REG3 = [rssi_byte: 1][mode: 1][reserved: 3][wor_cycle: 3]
//! ```
//!
//! The query command is the bare 3-byte header `C1 00 08`; the module
//! answers with its current register state in the layout above.

use crate::config::protocol::{
    FRAME_LEN, QUERY_LEN, QUERY_OPCODE, REGISTER_ADDRESS, REGISTER_LENGTH, SET_OPCODE,
};
use crate::registers::types::{
    Bandwidth, RadioConfig, SubPacketSize, TransmissionMode, TransmitPower, UartBaudRate,
};

/// Field offsets within the 11-byte frame
mod offset {
    pub const ADDR_HI: usize = 3;
    pub const ADDR_LO: usize = 4;
    pub const REG0: usize = 5;
    pub const REG1: usize = 6;
    pub const REG2: usize = 7;
    pub const REG3: usize = 8;
    pub const KEY_HI: usize = 9;
    pub const KEY_LO: usize = 10;
}

/// Bit positions and widths of the packed register fields
mod field {
    pub const BAUD_SHIFT: u8 = 5;
    pub const AIR_RATE_MASK: u8 = 0b0001_1111;
    pub const SUBPACKET_SHIFT: u8 = 6;
    pub const AMBIENT_RSSI_SHIFT: u8 = 5;
    pub const POWER_MASK: u8 = 0b0000_0011;
    pub const RSSI_BYTE_SHIFT: u8 = 7;
    pub const MODE_SHIFT: u8 = 6;
    pub const WOR_MASK: u8 = 0b0000_0111;
}

/// Air data rate code for an unsupported (bandwidth, SF) pair: BW125/SF7
const AIR_RATE_DEFAULT: u8 = 0b01000;

/// The fixed 3-byte "query registers" command
pub const QUERY_FRAME: [u8; QUERY_LEN] = [QUERY_OPCODE, REGISTER_ADDRESS, REGISTER_LENGTH];

/// One 11-byte set command or query response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterFrame {
    bytes: [u8; FRAME_LEN],
}

impl RegisterFrame {
    /// Pack a configuration into a set command frame
    ///
    /// Never fails: fields that cannot be represented (an SF outside the
    /// bandwidth's range, an off-step WOR cycle) fall back to their
    /// documented defaults or clamp.
    pub fn encode(config: &RadioConfig) -> Self {
        let air_rate = air_data_rate_bits(config.bandwidth, config.spreading_factor);

        let reg0 = (config.baud_rate.bits() << field::BAUD_SHIFT) | air_rate;
        let reg1 = (config.subpacket_size.bits() << field::SUBPACKET_SHIFT)
            | ((config.rssi_ambient_noise as u8) << field::AMBIENT_RSSI_SHIFT)
            | config.transmitting_power.bits();
        let reg2 = config.own_channel;
        let reg3 = ((config.rssi_byte as u8) << field::RSSI_BYTE_SHIFT)
            | (config.transmission_mode.bits() << field::MODE_SHIFT)
            | wor_cycle_bits(config.wor_cycle_ms);

        let [addr_hi, addr_lo] = config.own_address.to_be_bytes();
        let [key_hi, key_lo] = config.encryption_key.to_be_bytes();

        Self {
            bytes: [
                SET_OPCODE,
                REGISTER_ADDRESS,
                REGISTER_LENGTH,
                addr_hi,
                addr_lo,
                reg0,
                reg1,
                reg2,
                reg3,
                key_hi,
                key_lo,
            ],
        }
    }

    /// Wrap an 11-byte response slice; `None` if the length is off
    pub fn from_response(response: &[u8]) -> Option<Self> {
        if response.len() < FRAME_LEN {
            return None;
        }
        let mut bytes = [0u8; FRAME_LEN];
        bytes.copy_from_slice(&response[..FRAME_LEN]);
        Some(Self { bytes })
    }

    /// Wrap a raw frame without inspection
    pub fn from_bytes(bytes: [u8; FRAME_LEN]) -> Self {
        Self { bytes }
    }

    /// The raw frame, ready for the wire
    pub fn as_bytes(&self) -> &[u8; FRAME_LEN] {
        &self.bytes
    }

    /// Unpack the register bytes into a structured configuration
    ///
    /// Extraction is mechanical and total: every bit pattern maps to some
    /// field value, including patterns the encoder never emits (the module
    /// can report states this crate would not have written). Callers that
    /// care about the encodable subset should re-encode and compare.
    pub fn decode(&self) -> RadioConfig {
        let reg0 = self.bytes[offset::REG0];
        let reg1 = self.bytes[offset::REG1];
        let reg3 = self.bytes[offset::REG3];

        let (bandwidth, spreading_factor) = split_air_data_rate(reg0 & field::AIR_RATE_MASK);

        RadioConfig {
            own_address: u16::from_be_bytes([
                self.bytes[offset::ADDR_HI],
                self.bytes[offset::ADDR_LO],
            ]),
            baud_rate: UartBaudRate::from_bits(reg0 >> field::BAUD_SHIFT),
            bandwidth,
            spreading_factor,
            subpacket_size: SubPacketSize::from_bits(reg1 >> field::SUBPACKET_SHIFT),
            rssi_ambient_noise: (reg1 >> field::AMBIENT_RSSI_SHIFT) & 1 != 0,
            transmitting_power: TransmitPower::from_bits(reg1 & field::POWER_MASK),
            own_channel: self.bytes[offset::REG2],
            rssi_byte: (reg3 >> field::RSSI_BYTE_SHIFT) & 1 != 0,
            transmission_mode: TransmissionMode::from_bits(reg3 >> field::MODE_SHIFT),
            wor_cycle_ms: ((reg3 & field::WOR_MASK) as u16 + 1) * 500,
            encryption_key: u16::from_be_bytes([
                self.bytes[offset::KEY_HI],
                self.bytes[offset::KEY_LO],
            ]),
        }
    }
}

/// 5-bit air data rate code from bandwidth + spreading factor
///
/// The code is (sf - 5) * 4 plus the bandwidth offset. A spreading factor
/// outside the bandwidth's supported range falls back to BW125/SF7.
fn air_data_rate_bits(bandwidth: Bandwidth, sf: u8) -> u8 {
    if !bandwidth.spreading_factor_range().contains(&sf) {
        return AIR_RATE_DEFAULT;
    }
    ((sf - 5) << 2) | bandwidth.air_rate_offset()
}

/// Inverse of `air_data_rate_bits`, permissive over all 5-bit patterns
///
/// Bandwidth comes from the low two bits, bit 0 checked before bit 1, the
/// way the module documentation tabulates the codes. The resulting SF may
/// lie outside the encodable range for reserved patterns; it is reported
/// as extracted.
fn split_air_data_rate(bits: u8) -> (Bandwidth, u8) {
    let bandwidth = if bits & 0b01 != 0 {
        Bandwidth::Khz250
    } else if bits & 0b10 != 0 {
        Bandwidth::Khz500
    } else {
        Bandwidth::Khz125
    };
    (bandwidth, (bits >> 2) + 5)
}

/// 3-bit WOR cycle code: 500 ms steps starting at 500, clamped at 4000
fn wor_cycle_bits(wor_cycle_ms: u16) -> u8 {
    if wor_cycle_ms <= 500 {
        0
    } else if wor_cycle_ms >= 4000 {
        7
    } else {
        ((wor_cycle_ms - 500) / 500) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_frame() {
        // Hand-computed: baud 9600 -> 0b011, BW125/SF7 -> 0b01000,
        // so REG0 = 0b011_01000 = 0x68; subpacket 200 -> 0b00, ambient off,
        // 13 dBm -> 0b10, so REG1 = 0x02; everything else zero.
        let frame = RegisterFrame::encode(&RadioConfig::default());
        assert_eq!(
            frame.as_bytes(),
            &[0xC0, 0x00, 0x08, 0x00, 0x00, 0x68, 0x02, 0x00, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn test_query_frame() {
        assert_eq!(QUERY_FRAME, [0xC1, 0x00, 0x08]);
    }

    #[test]
    fn test_air_data_rate_table() {
        // The full code table from the module datasheet
        let cases = [
            (Bandwidth::Khz125, 5, 0b00000),
            (Bandwidth::Khz125, 6, 0b00100),
            (Bandwidth::Khz125, 7, 0b01000),
            (Bandwidth::Khz125, 8, 0b01100),
            (Bandwidth::Khz125, 9, 0b10000),
            (Bandwidth::Khz250, 5, 0b00001),
            (Bandwidth::Khz250, 6, 0b00101),
            (Bandwidth::Khz250, 7, 0b01001),
            (Bandwidth::Khz250, 8, 0b01101),
            (Bandwidth::Khz250, 9, 0b10001),
            (Bandwidth::Khz250, 10, 0b10101),
            (Bandwidth::Khz500, 5, 0b00010),
            (Bandwidth::Khz500, 6, 0b00110),
            (Bandwidth::Khz500, 7, 0b01010),
            (Bandwidth::Khz500, 8, 0b01110),
            (Bandwidth::Khz500, 9, 0b10010),
            (Bandwidth::Khz500, 10, 0b10110),
            (Bandwidth::Khz500, 11, 0b11010),
        ];
        for (bw, sf, expected) in cases {
            assert_eq!(air_data_rate_bits(bw, sf), expected, "{bw:?} SF{sf}");
            // and the codes split back to the same pair
            assert_eq!(split_air_data_rate(expected), (bw, sf));
        }
    }

    #[test]
    fn test_air_data_rate_out_of_range_defaults() {
        // SF10 is not valid at 125 kHz, SF12 nowhere
        assert_eq!(air_data_rate_bits(Bandwidth::Khz125, 10), AIR_RATE_DEFAULT);
        assert_eq!(air_data_rate_bits(Bandwidth::Khz250, 11), AIR_RATE_DEFAULT);
        assert_eq!(air_data_rate_bits(Bandwidth::Khz500, 12), AIR_RATE_DEFAULT);
        assert_eq!(air_data_rate_bits(Bandwidth::Khz125, 4), AIR_RATE_DEFAULT);
    }

    #[test]
    fn test_wor_cycle_steps() {
        assert_eq!(wor_cycle_bits(0), 0);
        assert_eq!(wor_cycle_bits(500), 0);
        assert_eq!(wor_cycle_bits(1000), 1);
        assert_eq!(wor_cycle_bits(1500), 2);
        assert_eq!(wor_cycle_bits(3500), 6);
        assert_eq!(wor_cycle_bits(4000), 7);
        // Clamps, not errors
        assert_eq!(wor_cycle_bits(60000), 7);
        // Off-step values round down
        assert_eq!(wor_cycle_bits(1700), 2);
    }

    #[test]
    fn test_encode_packs_all_fields() {
        let config = RadioConfig {
            own_address: 0x1234,
            baud_rate: UartBaudRate::B115200,
            bandwidth: Bandwidth::Khz500,
            spreading_factor: 11,
            subpacket_size: SubPacketSize::Bytes32,
            rssi_ambient_noise: true,
            transmitting_power: TransmitPower::Dbm22,
            own_channel: 30,
            rssi_byte: true,
            transmission_mode: TransmissionMode::Fixed,
            wor_cycle_ms: 4000,
            encryption_key: 0xBEEF,
        };
        let bytes = *RegisterFrame::encode(&config).as_bytes();
        assert_eq!(&bytes[..5], &[0xC0, 0x00, 0x08, 0x12, 0x34]);
        assert_eq!(bytes[5], 0b111_11010); // 115200 | BW500/SF11
        assert_eq!(bytes[6], 0b11_1_000_00); // 32 bytes | ambient | 22 dBm
        assert_eq!(bytes[7], 30);
        assert_eq!(bytes[8], 0b1_1_000_111); // rssi byte | fixed | 4000 ms
        assert_eq!(&bytes[9..], &[0xBE, 0xEF]);
    }

    #[test]
    fn test_round_trip_all_air_rates() {
        for bandwidth in [Bandwidth::Khz125, Bandwidth::Khz250, Bandwidth::Khz500] {
            for sf in bandwidth.spreading_factor_range() {
                let config = RadioConfig {
                    bandwidth,
                    spreading_factor: sf,
                    ..RadioConfig::default()
                };
                let decoded = RegisterFrame::encode(&config).decode();
                assert_eq!(decoded.bandwidth, bandwidth);
                assert_eq!(decoded.spreading_factor, sf);
            }
        }
    }

    #[test]
    fn test_round_trip_randomized_configs() {
        // xorshift so the fixture set is reproducible without an RNG crate
        let mut state: u32 = 0x2545_F491;
        let mut next = move || {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            state
        };

        let bauds = [
            UartBaudRate::B1200,
            UartBaudRate::B2400,
            UartBaudRate::B4800,
            UartBaudRate::B9600,
            UartBaudRate::B19200,
            UartBaudRate::B38400,
            UartBaudRate::B57600,
            UartBaudRate::B115200,
        ];
        let bandwidths = [Bandwidth::Khz125, Bandwidth::Khz250, Bandwidth::Khz500];
        let sizes = [
            SubPacketSize::Bytes32,
            SubPacketSize::Bytes64,
            SubPacketSize::Bytes128,
            SubPacketSize::Bytes200,
        ];
        let powers = [
            TransmitPower::Dbm22,
            TransmitPower::Dbm17,
            TransmitPower::Dbm13,
            TransmitPower::Dbm0,
        ];

        for _ in 0..1000 {
            let bandwidth = bandwidths[next() as usize % bandwidths.len()];
            let sf_range = bandwidth.spreading_factor_range();
            let sf_span = (*sf_range.end() - *sf_range.start() + 1) as u32;
            let config = RadioConfig {
                own_address: next() as u16,
                baud_rate: bauds[next() as usize % bauds.len()],
                bandwidth,
                spreading_factor: *sf_range.start() + (next() % sf_span) as u8,
                subpacket_size: sizes[next() as usize % sizes.len()],
                rssi_ambient_noise: next() & 1 != 0,
                transmitting_power: powers[next() as usize % powers.len()],
                own_channel: (next() % (bandwidth.max_channel() as u32 + 1)) as u8,
                rssi_byte: next() & 1 != 0,
                transmission_mode: if next() & 1 != 0 {
                    TransmissionMode::Fixed
                } else {
                    TransmissionMode::Transparent
                },
                wor_cycle_ms: 500 * (1 + (next() % 8) as u16),
                encryption_key: next() as u16,
            };
            assert_eq!(RegisterFrame::encode(&config).decode(), config);
        }
    }

    #[test]
    fn test_from_response_length_check() {
        assert!(RegisterFrame::from_response(&[0xC1; 10]).is_none());
        let frame = RegisterFrame::from_response(&[0u8; 11]).unwrap();
        assert_eq!(frame.as_bytes(), &[0u8; 11]);
        // Extra trailing bytes are ignored
        assert!(RegisterFrame::from_response(&[0u8; 16]).is_some());
    }

    #[test]
    fn test_decode_is_permissive() {
        // Reserved air rate pattern 0b11111: decode still yields a value
        let mut bytes = *RegisterFrame::encode(&RadioConfig::default()).as_bytes();
        bytes[5] = 0b011_11111;
        let decoded = RegisterFrame::from_bytes(bytes).decode();
        // bit 0 set reads as 250 kHz, SF extracted mechanically
        assert_eq!(decoded.bandwidth, Bandwidth::Khz250);
        assert_eq!(decoded.spreading_factor, 12);
    }
}
