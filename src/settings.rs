//! Key=value codec for persisted module settings
//!
//! File I/O belongs to the host application; this module only turns the
//! text body of a settings file into a [`RadioConfig`] and back. The
//! format is one decimal `key=value` per line under an `[E220-900JP]`
//! section header. Parsing follows the fallback policy of the register
//! codec: unknown keys, malformed numbers and out-of-menu values keep the
//! field's default instead of failing.

use core::fmt::Write as _;

use heapless::String;

use crate::registers::types::{
    Bandwidth, RadioConfig, SubPacketSize, TransmissionMode, TransmitPower, UartBaudRate,
};

/// Section header emitted at the top of a rendered settings body
pub const SECTION_HEADER: &str = "[E220-900JP]";

/// Rendered settings body: header plus twelve short decimal lines
pub const SETTINGS_RENDER_CAPACITY: usize = 256;

/// `transmission_method_type` value for transparent transmission
const METHOD_TRANSPARENT: u32 = 1;
/// `transmission_method_type` value for fixed transmission
const METHOD_FIXED: u32 = 2;

/// Parse a settings body into a configuration
///
/// Lines that are not `key=value` (the section header, blanks, comments)
/// are skipped. Every absent or unparseable field stays at its default.
pub fn parse(text: &str) -> RadioConfig {
    let mut config = RadioConfig::default();

    for line in text.lines() {
        let Some((key, value)) = line.trim().split_once('=') else {
            continue;
        };
        let Ok(value) = value.trim().parse::<u32>() else {
            continue;
        };

        match key.trim() {
            "own_address" => config.own_address = value as u16,
            "baud_rate" => config.baud_rate = UartBaudRate::from_bps(value),
            "bw" => config.bandwidth = Bandwidth::from_khz(value as u16),
            "sf" => config.spreading_factor = value as u8,
            "subpacket_size" => config.subpacket_size = SubPacketSize::from_bytes(value as u16),
            "rssi_ambient_noise_flag" => config.rssi_ambient_noise = value != 0,
            "transmitting_power" => {
                config.transmitting_power = TransmitPower::from_dbm(value as u8)
            }
            "own_channel" => config.own_channel = value as u8,
            "rssi_byte_flag" => config.rssi_byte = value != 0,
            "transmission_method_type" => {
                config.transmission_mode = if value == METHOD_FIXED {
                    TransmissionMode::Fixed
                } else {
                    TransmissionMode::Transparent
                }
            }
            "wor_cycle" => config.wor_cycle_ms = value as u16,
            "encryption_key" => config.encryption_key = value as u16,
            _ => {}
        }
    }

    config
}

/// Render a configuration as a settings body
pub fn render(config: &RadioConfig) -> String<SETTINGS_RENDER_CAPACITY> {
    let method = match config.transmission_mode {
        TransmissionMode::Transparent => METHOD_TRANSPARENT,
        TransmissionMode::Fixed => METHOD_FIXED,
    };

    let mut out = String::new();
    // Capacity comfortably covers twelve short lines, writes cannot fail
    let _ = writeln!(out, "{SECTION_HEADER}");
    let _ = writeln!(out, "own_address={}", config.own_address);
    let _ = writeln!(out, "baud_rate={}", config.baud_rate.bps());
    let _ = writeln!(out, "bw={}", config.bandwidth.khz());
    let _ = writeln!(out, "sf={}", config.spreading_factor);
    let _ = writeln!(out, "subpacket_size={}", config.subpacket_size.bytes());
    let _ = writeln!(
        out,
        "rssi_ambient_noise_flag={}",
        config.rssi_ambient_noise as u8
    );
    let _ = writeln!(
        out,
        "transmitting_power={}",
        config.transmitting_power.dbm()
    );
    let _ = writeln!(out, "own_channel={}", config.own_channel);
    let _ = writeln!(out, "rssi_byte_flag={}", config.rssi_byte as u8);
    let _ = writeln!(out, "transmission_method_type={method}");
    let _ = writeln!(out, "wor_cycle={}", config.wor_cycle_ms);
    let _ = writeln!(out, "encryption_key={}", config.encryption_key);
    out
}
