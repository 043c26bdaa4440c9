//! Skeletal animation decoding and pose solving
//!
//! The pipeline runs in four stages, one pass per pose query:
//! - [`decoder`]: run-length channel streams to raw per-frame deltas
//! - [`sampler`]: per-bone local position and rotation at a fractional frame
//! - [`blender`]: controller-weighted mixing of a sequence's blend blocks
//! - [`composer`]: parent-before-child world transform composition
//!
//! Queries are pure: they share the read-only model data and nothing else,
//! so independent model instances can be posed concurrently without locks.

pub mod blender;
pub mod composer;
pub mod controller;
pub mod decoder;
pub mod math;
pub mod pose;
pub mod sampler;

pub use blender::{blend_blocks, blend_pair, normalize_weight};
pub use composer::compose;
pub use controller::{CONTROLLER_SLOTS, ControllerAdjustments, compute_adjustments};
pub use decoder::{AnimBlocks, ChannelStream};
pub use math::{angle_quat, slerp};
pub use pose::{PoseRequest, solve_local_poses};
pub use sampler::{FrameTiming, LocalPose, sample_block};
