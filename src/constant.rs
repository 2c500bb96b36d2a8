use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

bitflags::bitflags! {
    /// Client capability flags
    ///
    /// Unknown bits sent by newer servers are kept as-is.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CapabilityFlags: u64 {
        const CLIENT_LONG_PASSWORD = 0x00000001;
        const CLIENT_FOUND_ROWS = 0x00000002;
        const CLIENT_LONG_FLAG = 0x00000004;
        const CLIENT_CONNECT_WITH_DB = 0x00000008;
        const CLIENT_NO_SCHEMA = 0x00000010;
        const CLIENT_COMPRESS = 0x00000020;
        const CLIENT_ODBC = 0x00000040;
        const CLIENT_LOCAL_FILES = 0x00000080;
        const CLIENT_IGNORE_SPACE = 0x00000100;
        const CLIENT_PROTOCOL_41 = 0x00000200;
        const CLIENT_INTERACTIVE = 0x00000400;
        const CLIENT_SSL = 0x00000800;
        const CLIENT_IGNORE_SIGPIPE = 0x00001000;
        const CLIENT_TRANSACTIONS = 0x00002000;
        const CLIENT_RESERVED = 0x00004000;
        const CLIENT_SECURE_CONNECTION = 0x00008000;
        const CLIENT_MULTI_STATEMENTS = 0x00010000;
        const CLIENT_MULTI_RESULTS = 0x00020000;
        const CLIENT_PS_MULTI_RESULTS = 0x00040000;

        const _ = !0;
    }
}

/// Capabilities the client advertises regardless of configuration
pub const CAPABILITIES_ALWAYS_ENABLED: CapabilityFlags = CapabilityFlags::CLIENT_LOCAL_FILES
    .union(CapabilityFlags::CLIENT_PROTOCOL_41)
    .union(CapabilityFlags::CLIENT_TRANSACTIONS)
    .union(CapabilityFlags::CLIENT_MULTI_RESULTS)
    .union(CapabilityFlags::CLIENT_LONG_PASSWORD)
    .union(CapabilityFlags::CLIENT_PS_MULTI_RESULTS);

/// Capabilities the client only sets when the server offers them
pub const CAPABILITIES_SERVER_GATED: CapabilityFlags = CapabilityFlags::CLIENT_LONG_FLAG
    .union(CapabilityFlags::CLIENT_SECURE_CONNECTION)
    .union(CapabilityFlags::CLIENT_COMPRESS)
    .union(CapabilityFlags::CLIENT_CONNECT_WITH_DB)
    .union(CapabilityFlags::CLIENT_SSL);

bitflags::bitflags! {
    /// Server status flags, refreshed on every OK/EOF packet
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ServerStatusFlags: u16 {
        const IN_TRANSACTION = 0x0001;
        const AUTOCOMMIT_MODE = 0x0002;
        /// Not sent by 4.1 and later servers
        const MORE_RESULTS = 0x0004;
        const ANOTHER_QUERY = 0x0008;
        const BAD_INDEX = 0x0010;
        const NO_INDEX = 0x0020;
        const CURSOR_EXISTS = 0x0040;
        const LAST_ROW_SENT = 0x0080;
        const OUTPUT_PARAMETERS = 0x1000;

        const _ = !0;
    }
}

impl ServerStatusFlags {
    /// Whether another result set follows the current one
    pub fn has_more_results(&self) -> bool {
        self.intersects(Self::MORE_RESULTS | Self::ANOTHER_QUERY)
    }
}

bitflags::bitflags! {
    /// Column definition flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ColumnFlags: i32 {
        const NOT_NULL = 0x0001;
        const PRIMARY_KEY = 0x0002;
        const UNIQUE_KEY = 0x0004;
        const MULTIPLE_KEY = 0x0008;
        const BLOB = 0x0010;
        const UNSIGNED = 0x0020;
        const ZERO_FILL = 0x0040;
        const BINARY = 0x0080;
        const ENUM = 0x0100;
        const AUTO_INCREMENT = 0x0200;
        const TIMESTAMP = 0x0400;
        const SET = 0x0800;
        const NUMBER = 0x8000;

        const _ = !0;
    }
}

/// MySQL column types as sent in column definition packets
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Decimal = 0x00,
    Tiny = 0x01,
    Short = 0x02,
    Long = 0x03,
    Float = 0x04,
    Double = 0x05,
    Null = 0x06,
    Timestamp = 0x07,
    LongLong = 0x08,
    Int24 = 0x09,
    Date = 0x0a,
    Time = 0x0b,
    DateTime = 0x0c,
    Year = 0x0d,
    NewDate = 0x0e,
    VarChar = 0x0f,
    Bit = 0x10,
    Json = 0xf5,
    NewDecimal = 0xf6,
    Enum = 0xf7,
    Set = 0xf8,
    TinyBlob = 0xf9,
    MediumBlob = 0xfa,
    LongBlob = 0xfb,
    Blob = 0xfc,
    VarString = 0xfd,
    String = 0xfe,
    Geometry = 0xff,
}

impl FieldType {
    pub const ALL: [FieldType; 28] = [
        Self::Decimal,
        Self::Tiny,
        Self::Short,
        Self::Long,
        Self::Float,
        Self::Double,
        Self::Null,
        Self::Timestamp,
        Self::LongLong,
        Self::Int24,
        Self::Date,
        Self::Time,
        Self::DateTime,
        Self::Year,
        Self::NewDate,
        Self::VarChar,
        Self::Bit,
        Self::Json,
        Self::NewDecimal,
        Self::Enum,
        Self::Set,
        Self::TinyBlob,
        Self::MediumBlob,
        Self::LongBlob,
        Self::Blob,
        Self::VarString,
        Self::String,
        Self::Geometry,
    ];

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x00 => Some(Self::Decimal),
            0x01 => Some(Self::Tiny),
            0x02 => Some(Self::Short),
            0x03 => Some(Self::Long),
            0x04 => Some(Self::Float),
            0x05 => Some(Self::Double),
            0x06 => Some(Self::Null),
            0x07 => Some(Self::Timestamp),
            0x08 => Some(Self::LongLong),
            0x09 => Some(Self::Int24),
            0x0a => Some(Self::Date),
            0x0b => Some(Self::Time),
            0x0c => Some(Self::DateTime),
            0x0d => Some(Self::Year),
            0x0e => Some(Self::NewDate),
            0x0f => Some(Self::VarChar),
            0x10 => Some(Self::Bit),
            0xf5 => Some(Self::Json),
            0xf6 => Some(Self::NewDecimal),
            0xf7 => Some(Self::Enum),
            0xf8 => Some(Self::Set),
            0xf9 => Some(Self::TinyBlob),
            0xfa => Some(Self::MediumBlob),
            0xfb => Some(Self::LongBlob),
            0xfc => Some(Self::Blob),
            0xfd => Some(Self::VarString),
            0xfe => Some(Self::String),
            0xff => Some(Self::Geometry),
            _ => None,
        }
    }

    pub fn is_blob(&self) -> bool {
        matches!(
            self,
            Self::TinyBlob | Self::MediumBlob | Self::LongBlob | Self::Blob
        )
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::Decimal
                | Self::NewDecimal
                | Self::Tiny
                | Self::Short
                | Self::Long
                | Self::Int24
                | Self::LongLong
                | Self::Float
                | Self::Double
                | Self::Year
        )
    }
}

impl TryFrom<u8> for FieldType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        Self::from_u8(value).ok_or(Error::UnknownFieldType(value))
    }
}

/// Transport used to reach the server
///
/// Several names map to the same transport, see [`ConnectionProtocol::NAMES`].
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionProtocol {
    Tcp = 1,
    NamedPipe = 2,
    UnixSocket = 3,
    SharedMemory = 4,
}

impl ConnectionProtocol {
    /// Every accepted name with the transport it selects
    pub const NAMES: [(&'static str, ConnectionProtocol); 9] = [
        ("Sockets", Self::Tcp),
        ("Socket", Self::Tcp),
        ("Tcp", Self::Tcp),
        ("Pipe", Self::NamedPipe),
        ("NamedPipe", Self::NamedPipe),
        ("UnixSocket", Self::UnixSocket),
        ("Unix", Self::UnixSocket),
        ("SharedMemory", Self::SharedMemory),
        ("Memory", Self::SharedMemory),
    ];

    /// Numeric transport selector
    pub fn value(&self) -> u8 {
        *self as u8
    }

    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Tcp),
            2 => Some(Self::NamedPipe),
            3 => Some(Self::UnixSocket),
            4 => Some(Self::SharedMemory),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Tcp => "Tcp",
            Self::NamedPipe => "NamedPipe",
            Self::UnixSocket => "UnixSocket",
            Self::SharedMemory => "SharedMemory",
        }
    }
}

impl FromStr for ConnectionProtocol {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::NAMES
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(s))
            .map(|(_, protocol)| *protocol)
            .ok_or_else(|| Error::InvalidConnectionStringValue {
                value: s.to_string(),
                key: "Connection Protocol".to_string(),
            })
    }
}

impl fmt::Display for ConnectionProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// TLS negotiation policy
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SslMode {
    None = 0,
    Preferred = 1,
    Required = 2,
    VerifyCA = 3,
    VerifyFull = 4,
}

impl SslMode {
    pub const NAMES: [(&'static str, SslMode); 6] = [
        ("None", Self::None),
        ("Preferred", Self::Preferred),
        // misspelling accepted by older connection strings
        ("Prefered", Self::Preferred),
        ("Required", Self::Required),
        ("VerifyCA", Self::VerifyCA),
        ("VerifyFull", Self::VerifyFull),
    ];

    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::None),
            1 => Some(Self::Preferred),
            2 => Some(Self::Required),
            3 => Some(Self::VerifyCA),
            4 => Some(Self::VerifyFull),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Preferred => "Preferred",
            Self::Required => "Required",
            Self::VerifyCA => "VerifyCA",
            Self::VerifyFull => "VerifyFull",
        }
    }
}

impl FromStr for SslMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::NAMES
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(s))
            .map(|(_, mode)| *mode)
            .ok_or_else(|| Error::InvalidConnectionStringValue {
                value: s.to_string(),
                key: "Ssl Mode".to_string(),
            })
    }
}

impl fmt::Display for SslMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where client certificates are looked up
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CertificateStoreLocation {
    None = 0,
    CurrentUser = 1,
    LocalMachine = 2,
}

impl CertificateStoreLocation {
    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::None),
            1 => Some(Self::CurrentUser),
            2 => Some(Self::LocalMachine),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::CurrentUser => "CurrentUser",
            Self::LocalMachine => "LocalMachine",
        }
    }
}

impl FromStr for CertificateStoreLocation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        [Self::None, Self::CurrentUser, Self::LocalMachine]
            .into_iter()
            .find(|location| location.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::InvalidConnectionStringValue {
                value: s.to_string(),
                key: "Certificate Store Location".to_string(),
            })
    }
}

impl fmt::Display for CertificateStoreLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
