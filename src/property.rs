use std::fmt;
use std::str::FromStr;

use crate::constant::{CertificateStoreLocation, ConnectionProtocol, SslMode};
use crate::error::{Error, Result};

/// Declared type of a connection option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionType {
    Bool,
    UInt,
    String,
    OptionalString,
    Protocol,
    SslMode,
    CertificateStoreLocation,
}

/// A typed connection option value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    Bool(bool),
    UInt(u32),
    String(String),
    OptionalString(Option<String>),
    Protocol(ConnectionProtocol),
    SslMode(SslMode),
    CertificateStoreLocation(CertificateStoreLocation),
}

impl OptionValue {
    pub fn ty(&self) -> OptionType {
        match self {
            Self::Bool(_) => OptionType::Bool,
            Self::UInt(_) => OptionType::UInt,
            Self::String(_) => OptionType::String,
            Self::OptionalString(_) => OptionType::OptionalString,
            Self::Protocol(_) => OptionType::Protocol,
            Self::SslMode(_) => OptionType::SslMode,
            Self::CertificateStoreLocation(_) => OptionType::CertificateStoreLocation,
        }
    }

    /// Convert connection string text into a value of type `ty`
    ///
    /// `key` only labels the error.
    pub fn parse(ty: OptionType, key: &str, text: &str) -> Result<Self> {
        let invalid = || Error::InvalidConnectionStringValue {
            value: text.to_string(),
            key: key.to_string(),
        };
        match ty {
            OptionType::Bool => parse_bool(text).map(Self::Bool),
            OptionType::UInt => text.trim().parse().map(Self::UInt).map_err(|_| invalid()),
            OptionType::String => Ok(Self::String(text.to_string())),
            OptionType::OptionalString => Ok(Self::OptionalString(Some(text.to_string()))),
            OptionType::Protocol => parse_enum(text, ConnectionProtocol::from_value)
                .map(Self::Protocol)
                .ok_or_else(invalid),
            OptionType::SslMode => parse_enum(text, SslMode::from_value)
                .map(Self::SslMode)
                .ok_or_else(invalid),
            OptionType::CertificateStoreLocation => {
                parse_enum(text, CertificateStoreLocation::from_value)
                    .map(Self::CertificateStoreLocation)
                    .ok_or_else(invalid)
            }
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::UInt(n) => write!(f, "{n}"),
            Self::String(s) => f.write_str(s),
            Self::OptionalString(s) => f.write_str(s.as_deref().unwrap_or("")),
            Self::Protocol(p) => write!(f, "{p}"),
            Self::SslMode(m) => write!(f, "{m}"),
            Self::CertificateStoreLocation(l) => write!(f, "{l}"),
        }
    }
}

/// An enum by numeric value or by case-insensitive name
fn parse_enum<T: FromStr>(text: &str, from_value: fn(u8) -> Option<T>) -> Option<T> {
    let text = text.trim();
    match text.parse::<u8>() {
        Ok(n) => from_value(n),
        Err(_) => text.parse().ok(),
    }
}

fn parse_bool(text: &str) -> Result<bool> {
    match text.trim().to_lowercase().as_str() {
        "true" | "yes" => Ok(true),
        "false" | "no" => Ok(false),
        _ => Err(Error::InvalidBoolean(text.to_string())),
    }
}

/// Declared type and default value of one connection option
///
/// The pair is not checked for agreement; the option registry does that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDefaultValue {
    ty: OptionType,
    default: OptionValue,
}

impl PropertyDefaultValue {
    pub fn new(ty: OptionType, default: OptionValue) -> Self {
        Self { ty, default }
    }

    pub fn ty(&self) -> OptionType {
        self.ty
    }

    pub fn default_value(&self) -> &OptionValue {
        &self.default
    }
}

impl From<OptionValue> for PropertyDefaultValue {
    fn from(default: OptionValue) -> Self {
        Self {
            ty: default.ty(),
            default,
        }
    }
}
