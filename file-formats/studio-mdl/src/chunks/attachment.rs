//! Attachment records

use std::io::{Read, Seek};

use glam::Vec3;

use crate::error::Result;
use crate::io_ext::ReadExt;

/// A named point rigidly offset from a bone, used for effect and weapon
/// placement
#[derive(Debug, Clone)]
pub struct Attachment {
    /// Attachment name (often empty in shipped content)
    pub name: String,
    /// Index of the bone this point follows
    pub bone: u32,
    /// Offset from the bone origin, in bone-local space
    pub origin: Vec3,
    /// Orientation basis vectors (unused by most content)
    pub vectors: [Vec3; 3],
}

impl Attachment {
    /// On-disk record size in bytes
    pub const DISK_SIZE: usize = 88;

    /// Read one attachment record
    pub fn read<R: Read + Seek>(reader: &mut R) -> Result<Self> {
        let name = reader.read_name::<32>()?;
        let _attachment_type = reader.read_i32_le()?;
        let bone = reader.read_i32_le()?.max(0) as u32;
        let origin = Vec3::from_array(reader.read_vec3()?);
        let vectors = [
            Vec3::from_array(reader.read_vec3()?),
            Vec3::from_array(reader.read_vec3()?),
            Vec3::from_array(reader.read_vec3()?),
        ];
        Ok(Self {
            name,
            bone,
            origin,
            vectors,
        })
    }
}
