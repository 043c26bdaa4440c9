//! Bone records and the six-channel DOF addressing they share

use std::io::{Read, Seek};

use crate::error::Result;
use crate::io_ext::ReadExt;

/// One of the six per-bone degrees of freedom.
///
/// Channel order matches the on-disk layout: three translations followed by
/// three rotations. Rotation channels store Euler angles in radians once the
/// compression scale has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dof {
    /// Translation along X
    X,
    /// Translation along Y
    Y,
    /// Translation along Z
    Z,
    /// Rotation about X (roll)
    RotX,
    /// Rotation about Y (pitch)
    RotY,
    /// Rotation about Z (yaw)
    RotZ,
}

impl Dof {
    /// All six channels in stream order
    pub const ALL: [Self; 6] = [
        Self::X,
        Self::Y,
        Self::Z,
        Self::RotX,
        Self::RotY,
        Self::RotZ,
    ];

    /// Channel index in the 0-5 on-disk order
    pub fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
            Self::RotX => 3,
            Self::RotY => 4,
            Self::RotZ => 5,
        }
    }

    /// Whether this is one of the three rotation channels
    pub fn is_rotation(self) -> bool {
        self.index() >= 3
    }

    /// Decode the motion-type bit used by bone controllers (0x01 = X .. 0x20 = RotZ)
    pub fn from_motion_bits(bits: u32) -> Option<Self> {
        match bits & 0x3F {
            0x01 => Some(Self::X),
            0x02 => Some(Self::Y),
            0x04 => Some(Self::Z),
            0x08 => Some(Self::RotX),
            0x10 => Some(Self::RotY),
            0x20 => Some(Self::RotZ),
            _ => None,
        }
    }
}

/// A node in the skeletal hierarchy
#[derive(Debug, Clone)]
pub struct Bone {
    /// Bone name
    pub name: String,
    /// Parent bone index, -1 for root bones
    pub parent: i32,
    /// Bone flags (unused by the pose core)
    pub flags: u32,
    /// Per-DOF bone controller table index, -1 when no controller drives a channel
    pub controller: [i32; 6],
    /// Per-DOF base value (translation units, or radians for rotations)
    pub value: [f32; 6],
    /// Per-DOF compression scale applied to decoded deltas
    pub scale: [f32; 6],
}

impl Bone {
    /// On-disk record size in bytes
    pub const DISK_SIZE: usize = 112;

    /// Read one bone record
    pub fn read<R: Read + Seek>(reader: &mut R) -> Result<Self> {
        let name = reader.read_name::<32>()?;
        let parent = reader.read_i32_le()?;
        let flags = reader.read_u32_le()?;

        let mut controller = [0i32; 6];
        for slot in &mut controller {
            *slot = reader.read_i32_le()?;
        }
        let mut value = [0f32; 6];
        for v in &mut value {
            *v = reader.read_f32_le()?;
        }
        let mut scale = [0f32; 6];
        for s in &mut scale {
            *s = reader.read_f32_le()?;
        }

        Ok(Self {
            name,
            parent,
            flags,
            controller,
            value,
            scale,
        })
    }

    /// Controller table index driving the given channel, if any
    pub fn controller_for(&self, dof: Dof) -> Option<usize> {
        let idx = self.controller[dof.index()];
        (idx >= 0).then_some(idx as usize)
    }
}
