//! Configure and monitor an Ebyte E220-900JP LoRa module over UART.
//!
//! The crate has two halves. The register codec ([`registers`]) packs a
//! structured [`registers::RadioConfig`] into the module's 11-byte
//! command frame and back, with the canonical hex-text rendering. The
//! link side drives a [`serial::SerialLink`] implementation: [`control`]
//! runs the set/query round trips and [`monitor`] accumulates streamed
//! bytes into a bounded hex log behind a worker. [`settings`] and
//! [`report`] translate configurations to their persisted and displayed
//! text forms.
//!
//! No hardware driver lives here; hosts implement [`serial::SerialLink`]
//! for their UART and provide an executor for the async pieces.

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod control;
pub mod monitor;
pub mod registers;
pub mod report;
pub mod serial;
pub mod settings;
