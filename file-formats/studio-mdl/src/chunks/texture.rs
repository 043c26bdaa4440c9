//! Texture records
//!
//! Only the bookkeeping fields are parsed; pixel decoding is a renderer
//! concern and stays outside this crate.

use std::io::{Read, Seek};

use crate::error::Result;
use crate::io_ext::ReadExt;

/// One texture table entry
#[derive(Debug, Clone)]
pub struct Texture {
    /// Texture file name as recorded by the compiler
    pub name: String,
    /// Render flags (chrome, additive, masked, ...)
    pub flags: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Byte offset of the indexed pixel data
    pub data_offset: u32,
}

impl Texture {
    /// On-disk record size in bytes
    pub const DISK_SIZE: usize = 80;

    /// Read one texture record
    pub fn read<R: Read + Seek>(reader: &mut R) -> Result<Self> {
        Ok(Self {
            name: reader.read_name::<64>()?,
            flags: reader.read_u32_le()?,
            width: reader.read_i32_le()?.max(0) as u32,
            height: reader.read_i32_le()?.max(0) as u32,
            data_offset: reader.read_i32_le()?.max(0) as u32,
        })
    }
}
