//! Per-table record types of the studio model format

pub mod attachment;
pub mod body_part;
pub mod bone;
pub mod bone_controller;
pub mod hitbox;
pub mod sequence;
pub mod texture;

pub use attachment::Attachment;
pub use body_part::{BodyPart, SkinFamilies};
pub use bone::{Bone, Dof};
pub use bone_controller::BoneController;
pub use hitbox::Hitbox;
pub use sequence::{SequenceDesc, SequenceFlags, SequenceGroup};
pub use texture::Texture;
