//! Bone controller records

use std::io::{Read, Seek};

use crate::error::Result;
use crate::io_ext::ReadExt;

use super::bone::Dof;

/// Motion-type flag marking a rotation channel that wraps through 360 degrees
const MOTION_WRAP: u32 = 0x8000;

/// The reserved controller slot driven by the mouth input
pub const MOUTH_SLOT: usize = 4;

/// Maps one controller input slot onto one bone's one DOF channel
#[derive(Debug, Clone)]
pub struct BoneController {
    /// Index of the owning bone
    pub bone: i32,
    /// Raw motion type bits (channel selector plus wrap flag)
    pub motion_type: u32,
    /// Value produced at input 0.0
    pub start: f32,
    /// Value produced at input 1.0
    pub end: f32,
    /// Default raw engine value for this controller
    pub rest: i32,
    /// Input slot: 0-3 general, 4 mouth
    pub slot: u32,
}

impl BoneController {
    /// On-disk record size in bytes
    pub const DISK_SIZE: usize = 24;

    /// Read one bone controller record
    pub fn read<R: Read + Seek>(reader: &mut R) -> Result<Self> {
        Ok(Self {
            bone: reader.read_i32_le()?,
            motion_type: reader.read_u32_le()?,
            start: reader.read_f32_le()?,
            end: reader.read_f32_le()?,
            rest: reader.read_i32_le()?,
            slot: reader.read_u32_le()?,
        })
    }

    /// The DOF channel this controller writes, if the motion type names one
    pub fn channel(&self) -> Option<Dof> {
        Dof::from_motion_bits(self.motion_type)
    }

    /// Whether this controller wraps its rotation through 360 degrees
    pub fn wraps(&self) -> bool {
        self.motion_type & MOTION_WRAP != 0
    }

    /// Whether this controller is fed by the dedicated mouth input
    pub fn is_mouth(&self) -> bool {
        self.slot as usize >= MOUTH_SLOT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn controller_bytes(motion_type: u32, slot: u32) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&0i32.to_le_bytes());
        data.extend_from_slice(&motion_type.to_le_bytes());
        data.extend_from_slice(&(-30.0f32).to_le_bytes());
        data.extend_from_slice(&30.0f32.to_le_bytes());
        data.extend_from_slice(&0i32.to_le_bytes());
        data.extend_from_slice(&slot.to_le_bytes());
        data
    }

    #[test]
    fn test_controller_read() {
        let data = controller_bytes(0x08, 0);
        assert_eq!(data.len(), BoneController::DISK_SIZE);

        let ctrl = BoneController::read(&mut Cursor::new(&data)).unwrap();
        assert_eq!(ctrl.channel(), Some(Dof::RotX));
        assert!(!ctrl.wraps());
        assert!(!ctrl.is_mouth());
        assert_eq!(ctrl.start, -30.0);
        assert_eq!(ctrl.end, 30.0);
    }

    #[test]
    fn test_wrap_and_mouth_flags() {
        let data = controller_bytes(0x8020, 4);
        let ctrl = BoneController::read(&mut Cursor::new(&data)).unwrap();
        assert_eq!(ctrl.channel(), Some(Dof::RotZ));
        assert!(ctrl.wraps());
        assert!(ctrl.is_mouth());
    }
}
