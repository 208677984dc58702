//! Zip record classification from the four-byte `PK` header.

use std::fmt;
use std::str::FromStr;

use crate::signature::ParseTagError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZipRecordType {
    LocalFile,
    CentralDirectory,
    EndOfCentralDirectory,
    DataDescriptor,
    Unknown,
}

impl ZipRecordType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ZipRecordType::LocalFile => "local_file",
            ZipRecordType::CentralDirectory => "central_directory",
            ZipRecordType::EndOfCentralDirectory => "end_of_central_directory",
            ZipRecordType::DataDescriptor => "data_descriptor",
            ZipRecordType::Unknown => "unknown",
        }
    }

    /// An end-of-central-directory record at offset 0 means the archive has
    /// no entries. Only meaningful for a record read from the start of the
    /// window; the same record later in a file is the normal trailer.
    pub fn is_empty_archive(&self) -> bool {
        matches!(self, ZipRecordType::EndOfCentralDirectory)
    }
}

impl fmt::Display for ZipRecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ZipRecordType {
    type Err = ParseTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "local_file" => Ok(ZipRecordType::LocalFile),
            "central_directory" => Ok(ZipRecordType::CentralDirectory),
            "end_of_central_directory" => Ok(ZipRecordType::EndOfCentralDirectory),
            "data_descriptor" => Ok(ZipRecordType::DataDescriptor),
            "unknown" => Ok(ZipRecordType::Unknown),
            _ => Err(ParseTagError::new("zip record", s)),
        }
    }
}

pub fn zip_record_type(data: &[u8]) -> ZipRecordType {
    match data {
        [b'P', b'K', 0x03, 0x04, ..] => ZipRecordType::LocalFile,
        [b'P', b'K', 0x01, 0x02, ..] => ZipRecordType::CentralDirectory,
        [b'P', b'K', 0x05, 0x06, ..] => ZipRecordType::EndOfCentralDirectory,
        [b'P', b'K', 0x07, 0x08, ..] => ZipRecordType::DataDescriptor,
        _ => ZipRecordType::Unknown,
    }
}
