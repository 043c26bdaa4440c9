//! Parser and skeletal pose solver for GoldSrc studio model (MDL) files.
//!
//! A studio model is a skeleton-driven mesh with run-length compressed
//! per-frame animation, body-part/skin variants, attachment points and
//! hitboxes. This crate loads the binary format, validates its structure,
//! and answers pose queries: given a sequence, a fractional frame,
//! controller inputs and blend weights, it produces the world-space 3x4
//! transform of every bone for that instant.
//!
//! Rendering, texture decoding and playback timing are deliberately out of
//! scope; the pose API is the boundary consumed by a viewer.
//!
//! # Example
//!
//! ```no_run
//! use studio_mdl::{PoseRequest, StudioModel};
//!
//! # fn main() -> studio_mdl::Result<()> {
//! let model = StudioModel::load("scientist.mdl")?;
//! let request = PoseRequest {
//!     sequence: 3,
//!     frame: 12.5,
//!     ..PoseRequest::default()
//! };
//! let transforms = model.bone_transforms(&request)?;
//! assert_eq!(transforms.len(), model.bones().len());
//! # Ok(())
//! # }
//! ```

pub mod animation;
pub mod chunks;
pub mod error;
pub mod header;
pub mod io_ext;
pub mod model;

// Re-export common types
pub use animation::PoseRequest;
pub use error::{Result, StudioError};
pub use header::{STUDIO_GROUP_MAGIC, STUDIO_MAGIC, STUDIO_VERSION, StudioHeader};
pub use model::StudioModel;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
