//! Hitbox records

use std::io::{Read, Seek};

use glam::Vec3;

use crate::error::Result;
use crate::io_ext::ReadExt;

/// An axis-aligned box rigidly offset from one bone, used for collision
/// and damage-group testing
#[derive(Debug, Clone)]
pub struct Hitbox {
    /// Index of the bone this box follows
    pub bone: u32,
    /// Damage group (head, chest, ...)
    pub group: u32,
    /// Box minimum corner in bone-local space
    pub bb_min: Vec3,
    /// Box maximum corner in bone-local space
    pub bb_max: Vec3,
}

impl Hitbox {
    /// On-disk record size in bytes
    pub const DISK_SIZE: usize = 32;

    /// Read one hitbox record
    pub fn read<R: Read + Seek>(reader: &mut R) -> Result<Self> {
        Ok(Self {
            bone: reader.read_i32_le()?.max(0) as u32,
            group: reader.read_i32_le()?.max(0) as u32,
            bb_min: Vec3::from_array(reader.read_vec3()?),
            bb_max: Vec3::from_array(reader.read_vec3()?),
        })
    }
}
