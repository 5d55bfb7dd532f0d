//! Human-readable readout of a module configuration
//!
//! Renders the decoded register state line by line, the way the module's
//! datasheet tabulates it, for display in whatever text view the host
//! provides.

use core::fmt::Write as _;

use heapless::String;

use crate::registers::types::{Bandwidth, RadioConfig, TransmissionMode};

/// Full report: eleven short lines
pub const REPORT_CAPACITY: usize = 512;

/// Over-the-air throughput label for a (bandwidth, spreading factor) pair
///
/// `None` for pairs the module cannot be configured to.
pub fn air_data_rate_label(bandwidth: Bandwidth, sf: u8) -> Option<&'static str> {
    let label = match (bandwidth, sf) {
        (Bandwidth::Khz125, 5) => "15.625kbps SF5 BW125",
        (Bandwidth::Khz125, 6) => "9.375kbps SF6 BW125",
        (Bandwidth::Khz125, 7) => "5.469kbps SF7 BW125",
        (Bandwidth::Khz125, 8) => "3.125kbps SF8 BW125",
        (Bandwidth::Khz125, 9) => "1.758kbps SF9 BW125",
        (Bandwidth::Khz250, 5) => "31.25kbps SF5 BW250",
        (Bandwidth::Khz250, 6) => "18.75kbps SF6 BW250",
        (Bandwidth::Khz250, 7) => "10.938kbps SF7 BW250",
        (Bandwidth::Khz250, 8) => "6.25kbps SF8 BW250",
        (Bandwidth::Khz250, 9) => "3.516kbps SF9 BW250",
        (Bandwidth::Khz250, 10) => "1.953kbps SF10 BW250",
        (Bandwidth::Khz500, 5) => "62.5kbps SF5 BW500",
        (Bandwidth::Khz500, 6) => "37.5kbps SF6 BW500",
        (Bandwidth::Khz500, 7) => "21.875kbps SF7 BW500",
        (Bandwidth::Khz500, 8) => "12.5kbps SF8 BW500",
        (Bandwidth::Khz500, 9) => "7.031kbps SF9 BW500",
        (Bandwidth::Khz500, 10) => "3.906kbps SF10 BW500",
        (Bandwidth::Khz500, 11) => "2.148kbps SF11 BW500",
        _ => return None,
    };
    Some(label)
}

/// Render the line-per-field configuration readout
pub fn render(config: &RadioConfig) -> String<REPORT_CAPACITY> {
    let mut out = String::new();

    let _ = writeln!(out, "Address: 0x{:04X}", config.own_address);
    let _ = writeln!(out, "UART: {}bps", config.baud_rate.bps());

    match air_data_rate_label(config.bandwidth, config.spreading_factor) {
        Some(label) => {
            let _ = writeln!(out, "Air Data Rate: {label}");
        }
        None => {
            let _ = writeln!(
                out,
                "Air Data Rate: Unknown (SF{} BW{})",
                config.spreading_factor,
                config.bandwidth.khz()
            );
        }
    }

    let _ = writeln!(
        out,
        "Sub Packet Size: {} bytes",
        config.subpacket_size.bytes()
    );
    let _ = writeln!(
        out,
        "RSSI Ambient: {}",
        enabled_text(config.rssi_ambient_noise)
    );
    let _ = writeln!(out, "Tx Power: {} dBm", config.transmitting_power.dbm());
    let _ = writeln!(out, "Channel: {}", config.own_channel);
    let _ = writeln!(out, "RSSI Byte: {}", enabled_text(config.rssi_byte));
    let _ = writeln!(
        out,
        "Transmission Method: {}",
        match config.transmission_mode {
            TransmissionMode::Transparent => "Transparent transmission",
            TransmissionMode::Fixed => "Fixed transmission",
        }
    );
    let _ = writeln!(out, "WOR Cycle: {}ms", config.wor_cycle_ms);
    let _ = writeln!(out, "Encryption Key: 0x{:04X}", config.encryption_key);

    out
}

fn enabled_text(flag: bool) -> &'static str {
    if flag {
        "Enable"
    } else {
        "Disable"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registers::types::{SubPacketSize, TransmitPower, UartBaudRate};

    #[test]
    fn test_default_report() {
        let report = render(&RadioConfig::default());
        let expected = "Address: 0x0000\n\
                        UART: 9600bps\n\
                        Air Data Rate: 5.469kbps SF7 BW125\n\
                        Sub Packet Size: 200 bytes\n\
                        RSSI Ambient: Disable\n\
                        Tx Power: 13 dBm\n\
                        Channel: 0\n\
                        RSSI Byte: Disable\n\
                        Transmission Method: Transparent transmission\n\
                        WOR Cycle: 500ms\n\
                        Encryption Key: 0x0000\n";
        assert_eq!(report.as_str(), expected);
    }

    #[test]
    fn test_non_default_values_appear() {
        let config = RadioConfig {
            own_address: 0xBEEF,
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
            encryption_key: 0x1234,
        };
        let report = render(&config);
        assert!(report.contains("Address: 0xBEEF"));
        assert!(report.contains("UART: 115200bps"));
        assert!(report.contains("Air Data Rate: 2.148kbps SF11 BW500"));
        assert!(report.contains("Sub Packet Size: 32 bytes"));
        assert!(report.contains("RSSI Ambient: Enable"));
        assert!(report.contains("Tx Power: 22 dBm"));
        assert!(report.contains("Transmission Method: Fixed transmission"));
        assert!(report.contains("WOR Cycle: 4000ms"));
        assert!(report.contains("Encryption Key: 0x1234"));
    }

    #[test]
    fn test_unknown_air_rate_label() {
        // SF10 is not valid at 125 kHz; a permissively decoded frame can
        // still carry it
        assert_eq!(air_data_rate_label(Bandwidth::Khz125, 10), None);
        let config = RadioConfig {
            bandwidth: Bandwidth::Khz125,
            spreading_factor: 10,
            ..RadioConfig::default()
        };
        assert!(render(&config).contains("Air Data Rate: Unknown (SF10 BW125)"));
    }
}
