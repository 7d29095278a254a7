//! Exit codes (BSD sysexits.h compatible)

/// Successful termination
pub const OK: u8 = 0;

/// Data format error (response body could not be decoded)
pub const DATAERR: u8 = 65;

/// Cannot open input
pub const NOINPUT: u8 = 66;

/// Service unavailable
pub const UNAVAILABLE: u8 = 69;

/// Input/output error
pub const IOERR: u8 = 74;

/// Remote error in protocol (service answered with a non-success status)
pub const PROTOCOL: u8 = 76;

/// Configuration error
pub const CONFIG: u8 = 78;
