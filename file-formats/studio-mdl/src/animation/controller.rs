//! Controller input mapping
//!
//! Controller inputs arrive in engine units (degrees for rotation channels,
//! map units for translations; mouth in its dedicated 0-64 range). Each
//! controller clamps its input into its `[start, end]` range (or wraps it,
//! for full-turn channels) and the result is layered onto the owning bone's
//! DOF channel as an additive offset during sampling.

use crate::chunks::BoneController;

/// Number of general-purpose controller slots
pub const CONTROLLER_SLOTS: usize = 4;
/// Full range of the dedicated mouth input
const MOUTH_RANGE: f32 = 64.0;

/// Per-controller DOF offsets for one pose query, indexed by the
/// controller's position in the model's controller table
#[derive(Debug, Clone)]
pub struct ControllerAdjustments {
    values: Vec<f32>,
}

impl ControllerAdjustments {
    /// Adjustment for controller table entry `index`, in the units the
    /// sampler adds (radians for rotation channels)
    pub fn get(&self, index: usize) -> f32 {
        self.values.get(index).copied().unwrap_or(0.0)
    }

    /// An all-zero adjustment set, for queries without controller input
    pub fn neutral(count: usize) -> Self {
        Self {
            values: vec![0.0; count],
        }
    }
}

/// Resolve raw controller inputs into per-controller DOF offsets.
///
/// `slots` are the four general inputs; `mouth` feeds every controller on
/// the reserved mouth slot. Inputs outside a controller's range clamp to
/// the nearer endpoint, which keeps the mapping monotonic even for
/// controllers compiled with `start > end`.
pub fn compute_adjustments(
    controllers: &[BoneController],
    slots: &[f32; CONTROLLER_SLOTS],
    mouth: f32,
) -> ControllerAdjustments {
    let values = controllers
        .iter()
        .map(|ctrl| {
            let raw = if ctrl.is_mouth() {
                let normalized = (mouth / MOUTH_RANGE).clamp(0.0, 1.0);
                (1.0 - normalized) * ctrl.start + normalized * ctrl.end
            } else if ctrl.wraps() {
                // Full-turn channel: wrap into [start, start + 360)
                ctrl.start + (slots[ctrl.slot as usize] - ctrl.start).rem_euclid(360.0)
            } else {
                let span = ctrl.end - ctrl.start;
                let normalized = if span == 0.0 {
                    0.0
                } else {
                    ((slots[ctrl.slot as usize] - ctrl.start) / span).clamp(0.0, 1.0)
                };
                (1.0 - normalized) * ctrl.start + normalized * ctrl.end
            };

            match ctrl.channel() {
                Some(dof) if dof.is_rotation() => raw.to_radians(),
                Some(_) => raw,
                None => 0.0,
            }
        })
        .collect();

    ControllerAdjustments { values }
}
