//! Per-bone local pose sampling at a fractional frame
//!
//! Translation channels interpolate linearly between the two bracketing
//! integer frames; rotation channels decode per-axis Euler angles at both
//! frames, fold in controller adjustments, convert to quaternions and
//! interpolate spherically. Controller offsets are added to the raw angles
//! before quaternion conversion, matching the original engine's ordering.

use glam::{Quat, Vec3};

use crate::chunks::bone::{Bone, Dof};

use super::controller::ControllerAdjustments;
use super::decoder::AnimBlocks;
use super::math::{angle_quat, slerp};

/// A sampled bone-local transform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalPose {
    /// Translation relative to the parent bone
    pub position: Vec3,
    /// Orientation relative to the parent bone
    pub rotation: Quat,
}

impl LocalPose {
    /// The rest transform: no offset, no rotation
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };
}

impl Default for LocalPose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Integer frame bracket and interpolation fraction for one pose query
#[derive(Debug, Clone, Copy)]
pub struct FrameTiming {
    /// Lower bracketing frame
    pub low: u32,
    /// Upper bracketing frame; equals `low` at clip ends, or wraps to 0
    /// on looping sequences
    pub high: u32,
    /// Interpolation fraction in `[0, 1)`
    pub fraction: f32,
}

impl FrameTiming {
    /// Split a fractional frame against a clip of `num_frames` frames
    pub fn new(frame: f32, num_frames: u32, looping: bool) -> Self {
        if num_frames <= 1 {
            return Self {
                low: 0,
                high: 0,
                fraction: 0.0,
            };
        }

        let frame = frame.max(0.0);
        let fraction = frame.fract();
        let mut low = frame.floor() as u32;
        let high = if looping {
            low %= num_frames;
            (low + 1) % num_frames
        } else {
            low = low.min(num_frames - 1);
            (low + 1).min(num_frames - 1)
        };

        Self {
            low,
            high,
            fraction,
        }
    }

    /// Whether the bracket is two consecutive frames of the same stream scan
    fn is_sequential(&self) -> bool {
        self.high == self.low + 1
    }
}

/// Sample one bone's local pose from one animation block
pub fn sample_block(
    blocks: &AnimBlocks,
    blend: usize,
    bone_index: usize,
    bone: &Bone,
    timing: FrameTiming,
    adj: &ControllerAdjustments,
) -> LocalPose {
    let mut position = Vec3::ZERO;
    let mut angles_low = Vec3::ZERO;
    let mut angles_high = Vec3::ZERO;

    for dof in Dof::ALL {
        let axis = dof.index() % 3;
        let base = bone.value[dof.index()];
        let scale = bone.scale[dof.index()];
        let adjustment = bone
            .controller_for(dof)
            .map_or(0.0, |index| adj.get(index));

        let (value_low, value_high) = match blocks.channel(blend, bone_index, dof) {
            Some(stream) => {
                let (v1, v2) = if timing.is_sequential() {
                    stream.value_pair(timing.low)
                } else {
                    (stream.value_at(timing.low), stream.value_at(timing.high))
                };
                (
                    base + f32::from(v1) * scale,
                    base + f32::from(v2) * scale,
                )
            }
            None => (base, base),
        };

        if dof.is_rotation() {
            angles_low[axis] = value_low + adjustment;
            angles_high[axis] = value_high + adjustment;
        } else {
            // Translations interpolate linearly, so the adjustment can be
            // folded in after the lerp
            position[axis] =
                value_low + (value_high - value_low) * timing.fraction + adjustment;
        }
    }

    let rotation = if angles_low == angles_high {
        angle_quat(angles_low)
    } else {
        slerp(
            angle_quat(angles_low),
            angle_quat(angles_high),
            timing.fraction,
        )
    };

    LocalPose { position, rotation }
}
