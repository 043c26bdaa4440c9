//! Multi-block sequence blending
//!
//! A sequence carries 1, 2 or 4 animation blocks. Two blocks interpolate
//! along one controller-driven axis; four blocks form a 2x2 grid blended
//! bilinearly across both axes (aim-direction blending on player models).

use crate::chunks::SequenceDesc;

use super::math::slerp;
use super::sampler::LocalPose;

/// Map a raw axis value onto `[0, 1]` against the axis range.
///
/// Ranges compiled with `start > end` normalize through the same formula,
/// which keeps the weight monotonic in the input; a degenerate range pins
/// the weight to the first block.
pub fn normalize_weight(value: f32, start: f32, end: f32) -> f32 {
    let span = end - start;
    if span == 0.0 {
        0.0
    } else {
        ((value - start) / span).clamp(0.0, 1.0)
    }
}

/// Interpolate two sampled poses: linear for position, spherical for
/// rotation
pub fn blend_pair(a: &LocalPose, b: &LocalPose, weight: f32) -> LocalPose {
    if weight <= 0.0 {
        return *a;
    }
    if weight >= 1.0 {
        return *b;
    }
    LocalPose {
        position: a.position.lerp(b.position, weight),
        rotation: slerp(a.rotation, b.rotation, weight),
    }
}

/// Blend one bone's sampled block poses into its final local pose.
///
/// `poses` holds one entry per animation block; `axis_values` are the raw
/// blend inputs from the pose request, normalized here against the
/// sequence's blend ranges. A single-block sequence short-circuits.
pub fn blend_blocks(poses: &[LocalPose], sequence: &SequenceDesc, axis_values: [f32; 2]) -> LocalPose {
    let weight0 = normalize_weight(
        axis_values[0],
        sequence.blend_start[0],
        sequence.blend_end[0],
    );

    match poses {
        [] => LocalPose::IDENTITY,
        [single] => *single,
        [a, b] => blend_pair(a, b, weight0),
        [a, b, rest @ ..] => {
            let weight1 = normalize_weight(
                axis_values[1],
                sequence.blend_start[1],
                sequence.blend_end[1],
            );
            // 2x2 grid: blocks 0,1 along axis 0 at axis-1 start,
            // blocks 2,3 along axis 0 at axis-1 end
            let bottom = blend_pair(a, b, weight0);
            let top = match rest {
                [c, d, ..] => blend_pair(c, d, weight0),
                [c] => *c,
                [] => bottom,
            };
            blend_pair(&bottom, &top, weight1)
        }
    }
}
