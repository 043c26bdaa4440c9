//! Hierarchical world transform composition
//!
//! Bones are stored parent-before-child (validated at load), so a single
//! in-order pass composes every bone's world transform from its parent's.
//! Child translations are applied in the parent's rotated frame.

use glam::Affine3A;

use super::sampler::LocalPose;

/// Compose local poses into world-space 3x4 transforms, indexed like the
/// bone table.
///
/// `parents[i]` must be -1 or an index less than `i`; the loader has
/// already rejected anything else, so this pass does not re-validate.
pub fn compose(local_poses: &[LocalPose], parents: &[i32]) -> Vec<Affine3A> {
    let mut world = Vec::with_capacity(local_poses.len());
    for (pose, &parent) in local_poses.iter().zip(parents) {
        let local = Affine3A::from_rotation_translation(pose.rotation, pose.position);
        let transform = if parent < 0 {
            local
        } else {
            world[parent as usize] * local
        };
        world.push(transform);
    }
    world
}
