//! Pose requests and the per-query solving pipeline
//!
//! A pose query is a pure function of the model and the request: no hidden
//! state, no I/O. The request is an explicit immutable value so the solver
//! never reads ambient viewer settings.

use crate::chunks::bone::Bone;
use crate::chunks::{BoneController, SequenceDesc};

use super::blender::blend_blocks;
use super::controller::{CONTROLLER_SLOTS, compute_adjustments};
use super::decoder::AnimBlocks;
use super::sampler::{FrameTiming, LocalPose, sample_block};

/// Maximum number of animation blocks a sequence can carry (2x2 blend grid)
const MAX_BLENDS: usize = 4;

/// Everything one pose query depends on.
///
/// `bodygroup` and `skin` select meshes and textures for the renderer and
/// never affect bone math.
#[derive(Debug, Clone, Copy)]
pub struct PoseRequest {
    /// Sequence index
    pub sequence: usize,
    /// Fractional frame number, >= 0
    pub frame: f32,
    /// Raw blend-axis inputs, in the sequence's blend range units
    pub blend: [f32; 2],
    /// General controller inputs, in each controller's engine units
    pub controllers: [f32; CONTROLLER_SLOTS],
    /// Dedicated mouth input, 0-64
    pub mouth: f32,
    /// Packed body group selector
    pub bodygroup: u32,
    /// Skin family selector
    pub skin: u32,
}

impl Default for PoseRequest {
    fn default() -> Self {
        Self {
            sequence: 0,
            frame: 0.0,
            blend: [0.0; 2],
            controllers: [0.0; CONTROLLER_SLOTS],
            mouth: 0.0,
            bodygroup: 0,
            skin: 0,
        }
    }
}

impl PoseRequest {
    /// A request for frame 0 of the given sequence with neutral inputs
    pub fn sequence(index: usize) -> Self {
        Self {
            sequence: index,
            ..Self::default()
        }
    }
}

/// Solve every bone's blended local pose for one query.
///
/// `blocks` must already be resolved against the sequence's group buffer;
/// the result is indexed like the bone table and ready for hierarchical
/// composition.
pub fn solve_local_poses(
    bones: &[Bone],
    controllers: &[BoneController],
    sequence: &SequenceDesc,
    blocks: &AnimBlocks,
    request: &PoseRequest,
) -> Vec<LocalPose> {
    let timing = FrameTiming::new(request.frame, sequence.num_frames, sequence.is_looping());
    let adj = compute_adjustments(controllers, &request.controllers, request.mouth);
    let num_blends = (sequence.num_blends.max(1) as usize).min(MAX_BLENDS);

    bones
        .iter()
        .enumerate()
        .map(|(bone_index, bone)| {
            let mut block_poses = [LocalPose::IDENTITY; MAX_BLENDS];
            for (blend, slot) in block_poses.iter_mut().enumerate().take(num_blends) {
                *slot = sample_block(blocks, blend, bone_index, bone, timing, &adj);
            }
            blend_blocks(&block_poses[..num_blends], sequence, request.blend)
        })
        .collect()
}
