//! Body part records and skin family tables
//!
//! Body groups and skin families select which meshes and textures are drawn.
//! They never participate in bone math; the pose core carries them so the
//! renderer can resolve a [`crate::PoseRequest`]'s selectors.

use std::io::{Read, Seek};

use crate::error::Result;
use crate::io_ext::ReadExt;

/// One body part: a group of interchangeable sub-models
#[derive(Debug, Clone)]
pub struct BodyPart {
    /// Body part name
    pub name: String,
    /// Number of selectable sub-models in this group
    pub num_models: u32,
    /// Positional base used when decoding a packed bodygroup selector
    pub base: u32,
    /// Byte offset of the sub-model table
    pub model_offset: u32,
}

impl BodyPart {
    /// On-disk record size in bytes
    pub const DISK_SIZE: usize = 76;

    /// Read one body part record
    pub fn read<R: Read + Seek>(reader: &mut R) -> Result<Self> {
        Ok(Self {
            name: reader.read_name::<64>()?,
            num_models: reader.read_i32_le()?.max(0) as u32,
            base: reader.read_i32_le()?.max(1) as u32,
            model_offset: reader.read_i32_le()?.max(0) as u32,
        })
    }

    /// Decode this group's sub-model index from a packed bodygroup selector
    pub fn model_index(&self, bodygroup: u32) -> u32 {
        if self.num_models <= 1 {
            return 0;
        }
        (bodygroup / self.base) % self.num_models
    }
}

/// The skin family table: `families x refs` texture indices
#[derive(Debug, Clone)]
pub struct SkinFamilies {
    /// Number of texture references per family
    pub refs_per_family: usize,
    /// Row-major family table
    pub entries: Vec<u16>,
}

impl SkinFamilies {
    /// Read the full skin family table
    pub fn read<R: Read + Seek>(
        reader: &mut R,
        families: usize,
        refs_per_family: usize,
    ) -> Result<Self> {
        let mut entries = Vec::with_capacity(families * refs_per_family);
        for _ in 0..families * refs_per_family {
            entries.push(reader.read_u16_le()?);
        }
        Ok(Self {
            refs_per_family,
            entries,
        })
    }

    /// Number of families in the table
    pub fn family_count(&self) -> usize {
        if self.refs_per_family == 0 {
            0
        } else {
            self.entries.len() / self.refs_per_family
        }
    }

    /// Look up the texture index for a (family, reference) pair,
    /// falling back to family 0 for an out-of-range selector
    pub fn texture_for(&self, family: usize, skin_ref: usize) -> Option<u16> {
        if skin_ref >= self.refs_per_family {
            return None;
        }
        let family = if family < self.family_count() { family } else { 0 };
        self.entries
            .get(family * self.refs_per_family + skin_ref)
            .copied()
    }
}
