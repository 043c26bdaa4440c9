//! Studio model file header

use std::io::{Read, Seek};

use crate::error::{Result, StudioError};
use crate::io_ext::ReadExt;

/// Magic signature for main studio model files ("IDST")
pub const STUDIO_MAGIC: [u8; 4] = *b"IDST";
/// Magic signature for external sequence group files ("IDSQ")
pub const STUDIO_GROUP_MAGIC: [u8; 4] = *b"IDSQ";
/// The only studio format version this crate understands
pub const STUDIO_VERSION: i32 = 10;

/// Count + byte offset pair describing one table in the file
#[derive(Debug, Clone, Copy, Default)]
pub struct TableRef {
    /// Number of entries in the table
    pub count: u32,
    /// Byte offset of the table from the start of the buffer
    pub offset: u32,
}

impl TableRef {
    fn read<R: Read>(reader: &mut R) -> std::io::Result<Self> {
        let count = reader.read_i32_le()?.max(0) as u32;
        let offset = reader.read_i32_le()?.max(0) as u32;
        Ok(Self { count, offset })
    }

    /// Check that `count` entries of `entry_size` bytes fit inside `buffer_len`
    pub fn check_bounds(&self, entry_size: usize, buffer_len: usize) -> Result<()> {
        let end = (self.offset as usize)
            .checked_add((self.count as usize).saturating_mul(entry_size))
            .ok_or(StudioError::UnexpectedEof)?;
        if end > buffer_len {
            return Err(StudioError::UnexpectedEof);
        }
        Ok(())
    }
}

/// Parsed main file header: identity plus one [`TableRef`] per sub-table
#[derive(Debug, Clone)]
pub struct StudioHeader {
    /// Internal model name
    pub name: String,
    /// Total file length recorded in the header
    pub length: u32,
    /// Eye position (model editing metadata, unused by the pose core)
    pub eye_position: [f32; 3],
    /// Movement hull
    pub hull_min: [f32; 3],
    /// Movement hull
    pub hull_max: [f32; 3],
    /// Clipping bounding box
    pub bb_min: [f32; 3],
    /// Clipping bounding box
    pub bb_max: [f32; 3],
    /// Model flags
    pub flags: u32,

    /// Bone table
    pub bones: TableRef,
    /// Bone controller table
    pub bone_controllers: TableRef,
    /// Hitbox table
    pub hitboxes: TableRef,
    /// Sequence table
    pub sequences: TableRef,
    /// Sequence group table
    pub sequence_groups: TableRef,
    /// Texture table
    pub textures: TableRef,
    /// Byte offset of raw texture pixel data
    pub texture_data_offset: u32,
    /// Number of skin references per family
    pub skin_ref_count: u32,
    /// Skin family table (count = number of families)
    pub skin_families: TableRef,
    /// Body part table
    pub body_parts: TableRef,
    /// Attachment table
    pub attachments: TableRef,
    /// Node transition table
    pub transitions: TableRef,
}

impl StudioHeader {
    /// Parse the header from the start of a main model file
    pub fn parse<R: Read + Seek>(reader: &mut R) -> Result<Self> {
        read_magic(reader, STUDIO_MAGIC)?;
        let version = reader.read_i32_le()?;
        if version != STUDIO_VERSION {
            return Err(StudioError::UnsupportedVersion(version));
        }

        let name = reader.read_name::<64>()?;
        let length = reader.read_i32_le()?.max(0) as u32;

        let eye_position = reader.read_vec3()?;
        let hull_min = reader.read_vec3()?;
        let hull_max = reader.read_vec3()?;
        let bb_min = reader.read_vec3()?;
        let bb_max = reader.read_vec3()?;

        let flags = reader.read_u32_le()?;

        let bones = TableRef::read(reader)?;
        let bone_controllers = TableRef::read(reader)?;
        let hitboxes = TableRef::read(reader)?;
        let sequences = TableRef::read(reader)?;
        let sequence_groups = TableRef::read(reader)?;

        let texture_count = reader.read_i32_le()?.max(0) as u32;
        let texture_offset = reader.read_i32_le()?.max(0) as u32;
        let texture_data_offset = reader.read_i32_le()?.max(0) as u32;

        let skin_ref_count = reader.read_i32_le()?.max(0) as u32;
        let skin_family_count = reader.read_i32_le()?.max(0) as u32;
        let skin_offset = reader.read_i32_le()?.max(0) as u32;

        let body_parts = TableRef::read(reader)?;
        let attachments = TableRef::read(reader)?;

        // Sound table fields are legacy and always zero in shipped content
        let _sound_table = reader.read_i32_le()?;
        let _sound_offset = reader.read_i32_le()?;
        let _sound_groups = reader.read_i32_le()?;
        let _sound_group_offset = reader.read_i32_le()?;

        let transitions = TableRef::read(reader)?;

        Ok(Self {
            name,
            length,
            eye_position,
            hull_min,
            hull_max,
            bb_min,
            bb_max,
            flags,
            bones,
            bone_controllers,
            hitboxes,
            sequences,
            sequence_groups,
            textures: TableRef {
                count: texture_count,
                offset: texture_offset,
            },
            texture_data_offset,
            skin_ref_count,
            skin_families: TableRef {
                count: skin_family_count,
                offset: skin_offset,
            },
            body_parts,
            attachments,
            transitions,
        })
    }
}

/// Header of an external sequence group file ("IDSQ")
#[derive(Debug, Clone)]
pub struct SequenceGroupFileHeader {
    /// Internal group file name
    pub name: String,
    /// Total file length recorded in the header
    pub length: u32,
}

impl SequenceGroupFileHeader {
    /// Parse the header from the start of a sequence group file
    pub fn parse<R: Read + Seek>(reader: &mut R) -> Result<Self> {
        read_magic(reader, STUDIO_GROUP_MAGIC)?;
        let version = reader.read_i32_le()?;
        if version != STUDIO_VERSION {
            return Err(StudioError::UnsupportedVersion(version));
        }
        let name = reader.read_name::<64>()?;
        let length = reader.read_i32_le()?.max(0) as u32;
        Ok(Self { name, length })
    }
}

fn read_magic<R: Read>(reader: &mut R, expected: [u8; 4]) -> Result<()> {
    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic)?;
    if magic != expected {
        return Err(StudioError::InvalidMagic {
            expected: String::from_utf8_lossy(&expected).into_owned(),
            found: String::from_utf8_lossy(&magic).into_owned(),
        });
    }
    Ok(())
}
