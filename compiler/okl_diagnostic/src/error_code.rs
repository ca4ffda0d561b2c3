//! Error codes for all export diagnostics.
//!
//! Each error code is a unique identifier (e.g., `E2001`) with the first
//! digit indicating the rule family that rejected the declaration.

use std::fmt;

/// The rule family an error code belongs to.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Phase {
    /// Structural exportability rules (shape of the type itself).
    Structural,
    /// Restricted-dialect rules (policy, not shape).
    Dialect,
    /// Minimum-API-level gating rules.
    ApiGate,
    /// Engine-internal conditions.
    Internal,
}

/// Error codes for all export diagnostics.
///
/// Format: E#### where the first digit indicates the rule family:
/// - E2xxx: structural exportability errors
/// - E3xxx: restricted-dialect errors
/// - E4xxx: API-gate errors
/// - E9xxx: internal errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Structural (E2xxx)
    /// Union type cannot be exported
    E2001,
    /// Anonymous struct cannot be exported
    E2002,
    /// Struct is not defined in this unit
    E2003,
    /// Bitfield member cannot be exported
    E2004,
    /// Struct containing a pointer cannot be exported
    E2005,
    /// Multiple levels of pointers cannot be exported
    E2006,
    /// Pointer to an array cannot be exported
    E2007,
    /// Multidimensional array cannot be exported
    E2008,
    /// Array of width-3 vectors cannot be exported
    E2009,
    /// Vector over a non-builtin element cannot be exported
    E2010,
    /// Type has no derivable name
    E2011,
    /// Builtin kind cannot be exported (platform-dependent width)
    E2012,
    /// Record field type cannot be exported
    E2013,
    /// Matrix struct does not have the required shape
    E2014,
    /// Array length does not fit a 32-bit representation
    E2015,
    /// Union containing a device object type
    E2016,
    /// Struct with a flexible array member
    E2017,

    // Restricted dialect (E3xxx)
    /// Pointer use under the restricted dialect
    E3001,
    /// Builtin wider than 32 bits under the restricted dialect
    E3002,

    // API gate (E4xxx)
    /// Device object inside an exported aggregate below the required API level
    E4001,
    /// Width-3 vector field in an exported struct below the required API level
    E4002,

    // Internal (E9xxx)
    /// Error limit reached
    E9001,
}

impl ErrorCode {
    /// The rule family this code belongs to.
    pub const fn phase(self) -> Phase {
        match self {
            ErrorCode::E2001
            | ErrorCode::E2002
            | ErrorCode::E2003
            | ErrorCode::E2004
            | ErrorCode::E2005
            | ErrorCode::E2006
            | ErrorCode::E2007
            | ErrorCode::E2008
            | ErrorCode::E2009
            | ErrorCode::E2010
            | ErrorCode::E2011
            | ErrorCode::E2012
            | ErrorCode::E2013
            | ErrorCode::E2014
            | ErrorCode::E2015
            | ErrorCode::E2016
            | ErrorCode::E2017 => Phase::Structural,
            ErrorCode::E3001 | ErrorCode::E3002 => Phase::Dialect,
            ErrorCode::E4001 | ErrorCode::E4002 => Phase::ApiGate,
            ErrorCode::E9001 => Phase::Internal,
        }
    }

    /// Check if this is an API-gate error (carries a required API level).
    pub const fn is_api_gate(self) -> bool {
        matches!(self.phase(), Phase::ApiGate)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}
