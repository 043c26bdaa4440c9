//! Sequence descriptors and sequence groups

use std::io::{Read, Seek};

use bitflags::bitflags;

use crate::error::Result;
use crate::io_ext::ReadExt;

bitflags! {
    /// Sequence playback flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SequenceFlags: u32 {
        /// The sequence wraps from its last frame back to frame 0
        const LOOPING = 0x0001;
    }
}

/// One animation clip: playback parameters plus the location of its
/// compressed per-bone animation blocks
#[derive(Debug, Clone)]
pub struct SequenceDesc {
    /// Sequence label, e.g. "walk" or "idle1"
    pub label: String,
    /// Playback rate in frames per second
    pub fps: f32,
    /// Playback flags
    pub flags: SequenceFlags,
    /// Activity tag and weight (engine AI metadata, unused by the core)
    pub activity: i32,
    /// Activity selection weight
    pub activity_weight: i32,
    /// Number of frames in the clip
    pub num_frames: u32,
    /// Number of animation blocks: 1 (no blending), 2 (one axis) or 4 (two axes)
    pub num_blends: u32,
    /// Byte offset of the animation blocks within the owning group's buffer
    pub anim_offset: u32,
    /// Motion-type bits selecting the controller channel per blend axis
    pub blend_type: [u32; 2],
    /// Blend axis range start values
    pub blend_start: [f32; 2],
    /// Blend axis range end values
    pub blend_end: [f32; 2],
    /// Sequence group index; 0 = embedded in the main file
    pub seq_group: u32,
    /// Clip bounding box
    pub bb_min: [f32; 3],
    /// Clip bounding box
    pub bb_max: [f32; 3],
}

impl SequenceDesc {
    /// On-disk record size in bytes
    pub const DISK_SIZE: usize = 176;

    /// Read one sequence descriptor
    pub fn read<R: Read + Seek>(reader: &mut R) -> Result<Self> {
        let label = reader.read_name::<32>()?;
        let fps = reader.read_f32_le()?;
        let flags = SequenceFlags::from_bits_retain(reader.read_u32_le()?);

        let activity = reader.read_i32_le()?;
        let activity_weight = reader.read_i32_le()?;

        // Event table: consumed by the engine's animation events, not the pose core
        let _num_events = reader.read_i32_le()?;
        let _event_offset = reader.read_i32_le()?;

        let num_frames = reader.read_i32_le()?.max(0) as u32;

        let _num_pivots = reader.read_i32_le()?;
        let _pivot_offset = reader.read_i32_le()?;

        // Ground-motion extraction fields, owned by the (out of scope) driver
        let _motion_type = reader.read_i32_le()?;
        let _motion_bone = reader.read_i32_le()?;
        let _linear_movement = reader.read_vec3()?;
        let _automove_pos_offset = reader.read_i32_le()?;
        let _automove_angle_offset = reader.read_i32_le()?;

        let bb_min = reader.read_vec3()?;
        let bb_max = reader.read_vec3()?;

        let num_blends = reader.read_i32_le()?.max(0) as u32;
        let anim_offset = reader.read_i32_le()?.max(0) as u32;

        let blend_type = [reader.read_u32_le()?, reader.read_u32_le()?];
        let blend_start = [reader.read_f32_le()?, reader.read_f32_le()?];
        let blend_end = [reader.read_f32_le()?, reader.read_f32_le()?];
        let _blend_parent = reader.read_i32_le()?;

        let seq_group = reader.read_i32_le()?.max(0) as u32;

        // Node transition graph, unused by the core
        let _entry_node = reader.read_i32_le()?;
        let _exit_node = reader.read_i32_le()?;
        let _node_flags = reader.read_i32_le()?;
        let _next_seq = reader.read_i32_le()?;

        Ok(Self {
            label,
            fps,
            flags,
            activity,
            activity_weight,
            num_frames,
            num_blends,
            anim_offset,
            blend_type,
            blend_start,
            blend_end,
            seq_group,
            bb_min,
            bb_max,
        })
    }

    /// Whether this sequence wraps from its last frame back to frame 0
    pub fn is_looping(&self) -> bool {
        self.flags.contains(SequenceFlags::LOOPING)
    }

    /// Number of blend axes implied by the block count (0, 1 or 2)
    pub fn blend_axes(&self) -> usize {
        match self.num_blends {
            0 | 1 => 0,
            2 | 3 => 1,
            _ => 2,
        }
    }
}

/// One sequence group: a partition of the animation data, either embedded
/// in the main file (group 0) or stored in a numbered auxiliary file
#[derive(Debug, Clone)]
pub struct SequenceGroup {
    /// Group label
    pub label: String,
    /// File name of the auxiliary file holding this group's data
    pub file_name: String,
    /// Byte offset of group 0's data within the main buffer
    pub data_offset: u32,
}

impl SequenceGroup {
    /// On-disk record size in bytes
    pub const DISK_SIZE: usize = 104;

    /// Read one sequence group record
    pub fn read<R: Read + Seek>(reader: &mut R) -> Result<Self> {
        let label = reader.read_name::<32>()?;
        let file_name = reader.read_name::<64>()?;
        let _cache = reader.read_i32_le()?;
        let data_offset = reader.read_i32_le()?.max(0) as u32;
        Ok(Self {
            label,
            file_name,
            data_offset,
        })
    }
}
