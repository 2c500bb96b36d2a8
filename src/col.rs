use zerocopy::byteorder::little_endian::{U16 as U16LE, U32 as U32LE};
use zerocopy::{FromBytes, Immutable, KnownLayout};

use crate::constant::{ColumnFlags, FieldType};
use crate::error::{Error, Result};

/// Fixed-size tail of Column Definition packet (12 bytes)
#[repr(C, packed)]
#[derive(Debug, Clone, Copy, FromBytes, KnownLayout, Immutable)]
pub struct ColumnDefinitionTail {
    charset: U16LE,
    column_length: U32LE,
    column_type: u8,
    flags: U16LE,
    decimals: u8,
    reserved: U16LE,
}

impl ColumnDefinitionTail {
    /// Read the tail from the last 12 bytes of a column definition payload
    pub fn from_payload(payload: &[u8]) -> Result<&Self> {
        let start = payload.len().checked_sub(12).ok_or(Error::InvalidPacket)?;
        Self::ref_from_bytes(&payload[start..]).map_err(|_| Error::InvalidPacket)
    }

    pub fn charset(&self) -> u16 {
        self.charset.get()
    }

    pub fn column_length(&self) -> u32 {
        self.column_length.get()
    }

    pub fn field_type(&self) -> Result<FieldType> {
        FieldType::try_from(self.column_type)
    }

    /// Unknown bits are kept
    pub fn flags(&self) -> ColumnFlags {
        ColumnFlags::from_bits_retain(i32::from(self.flags.get()))
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }
}

/// Column metadata as exposed to schema consumers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDefinition {
    pub schema: String,
    pub table: String,
    pub name: String,
    pub charset: u16,
    pub column_length: u32,
    pub field_type: FieldType,
    pub flags: ColumnFlags,
    pub decimals: u8,
}

impl ColumnDefinition {
    pub fn new(
        schema: impl Into<String>,
        table: impl Into<String>,
        name: impl Into<String>,
        tail: &ColumnDefinitionTail,
    ) -> Result<Self> {
        Ok(Self {
            schema: schema.into(),
            table: table.into(),
            name: name.into(),
            charset: tail.charset(),
            column_length: tail.column_length(),
            field_type: tail.field_type()?,
            flags: tail.flags(),
            decimals: tail.decimals(),
        })
    }

    pub fn is_nullable(&self) -> bool {
        !self.flags.contains(ColumnFlags::NOT_NULL)
    }

    pub fn is_unsigned(&self) -> bool {
        self.flags.contains(ColumnFlags::UNSIGNED)
    }

    pub fn is_primary_key(&self) -> bool {
        self.flags.contains(ColumnFlags::PRIMARY_KEY)
    }

    pub fn is_auto_increment(&self) -> bool {
        self.flags.contains(ColumnFlags::AUTO_INCREMENT)
    }

    /// BLOB flag or a blob field type
    pub fn is_blob(&self) -> bool {
        self.flags.contains(ColumnFlags::BLOB) || self.field_type.is_blob()
    }
}
