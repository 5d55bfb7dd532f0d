//! Constants for the E220-900JP register protocol and the receive pipeline

/// Register protocol constants
pub mod protocol {
    /// Opcode for "set registers" commands
    pub const SET_OPCODE: u8 = 0xC0;

    /// Opcode for "query registers" commands
    pub const QUERY_OPCODE: u8 = 0xC1;

    /// Start address byte of the register window
    pub const REGISTER_ADDRESS: u8 = 0x00;

    /// Number of register bytes covered by a command
    pub const REGISTER_LENGTH: u8 = 0x08;

    /// Full set command / query response size in bytes
    pub const FRAME_LEN: usize = 11;

    /// Query command size in bytes (header only, no payload)
    pub const QUERY_LEN: usize = 3;

    /// Capacity of the hex rendering of a frame:
    /// 11 bytes as "XX " minus the trailing space, 32 visible chars
    pub const HEX_RENDER_CAPACITY: usize = 33;
}

/// Serial link timing
pub mod link {
    use embassy_time::Duration;

    /// Default UART baud rate when the configured one is unrecognised
    pub const DEFAULT_BAUD_RATE: u32 = 9600;

    /// How long to wait for the 11-byte query response
    pub const QUERY_TIMEOUT: Duration = Duration::from_millis(3000);

    /// Cadence of the response poll while waiting (not a busy spin)
    pub const POLL_INTERVAL: Duration = Duration::from_millis(100);
}

/// Receive pipeline capacities
pub mod monitor {
    /// Bounded byte queue between the rx callback and the worker
    pub const RX_QUEUE_CAPACITY: usize = 256;

    /// Text log capacity in characters; oldest evicted first beyond this
    pub const LOG_CAPACITY: usize = 4096;

    /// One drained batch rendered as hex, "XX " per byte
    pub const BATCH_TEXT_CAPACITY: usize = RX_QUEUE_CAPACITY * 3;
}

/// Factory defaults of the module's register fields
pub mod radio_defaults {
    pub const BAUD_RATE: u32 = 9600;
    pub const BANDWIDTH_KHZ: u16 = 125;
    pub const SPREADING_FACTOR: u8 = 7;
    pub const SUBPACKET_SIZE: u16 = 200;
    pub const TX_POWER_DBM: u8 = 13;
    pub const WOR_CYCLE_MS: u16 = 500;
}
