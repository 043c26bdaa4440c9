//! Loading, validation and pose queries over a compiled studio model

use std::collections::HashSet;
use std::fs;
use std::io::{Cursor, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use glam::{Affine3A, Vec3};
use log::{debug, warn};

use crate::animation::{PoseRequest, compose, solve_local_poses};
use crate::animation::decoder::AnimBlocks;
use crate::chunks::bone::Dof;
use crate::chunks::{
    Attachment, BodyPart, Bone, BoneController, Hitbox, SequenceDesc, SequenceGroup,
    SkinFamilies, Texture,
};
use crate::error::{Result, StudioError};
use crate::header::{SequenceGroupFileHeader, StudioHeader};

/// Highest valid controller slot (0-3 general, 4 mouth)
const MAX_CONTROLLER_SLOT: usize = 4;

/// A parsed, validated studio model.
///
/// All tables are read once at load time; the struct is immutable afterwards
/// and safe to share across concurrent pose queries.
#[derive(Debug, Clone)]
pub struct StudioModel {
    header: StudioHeader,
    /// Main file bytes; group 0 animation data is addressed into this
    buffer: Vec<u8>,
    bones: Vec<Bone>,
    /// Cached parent indices in bone order, for transform composition
    parents: Vec<i32>,
    bone_controllers: Vec<BoneController>,
    hitboxes: Vec<Hitbox>,
    sequences: Vec<SequenceDesc>,
    sequence_groups: Vec<SequenceGroup>,
    /// Auxiliary buffers per sequence group; entry 0 is never used
    group_buffers: Vec<Option<Vec<u8>>>,
    textures: Vec<Texture>,
    skin_families: SkinFamilies,
    body_parts: Vec<BodyPart>,
    attachments: Vec<Attachment>,
}

impl StudioModel {
    /// Parse a model from the raw bytes of a main (`IDST`) file.
    ///
    /// Sequences stored in external group files stay unresolved until the
    /// matching buffers are attached; see [`Self::attach_sequence_group`].
    pub fn parse(buffer: Vec<u8>) -> Result<Self> {
        let mut cursor = Cursor::new(buffer.as_slice());
        let header = StudioHeader::parse(&mut cursor)?;

        let bones = read_table(&buffer, &header.bones, Bone::DISK_SIZE, Bone::read)?;
        let bone_controllers = read_table(
            &buffer,
            &header.bone_controllers,
            BoneController::DISK_SIZE,
            BoneController::read,
        )?;
        let hitboxes = read_table(&buffer, &header.hitboxes, Hitbox::DISK_SIZE, Hitbox::read)?;
        let sequences = read_table(
            &buffer,
            &header.sequences,
            SequenceDesc::DISK_SIZE,
            SequenceDesc::read,
        )?;
        let sequence_groups = read_table(
            &buffer,
            &header.sequence_groups,
            SequenceGroup::DISK_SIZE,
            SequenceGroup::read,
        )?;
        let textures = read_table(&buffer, &header.textures, Texture::DISK_SIZE, Texture::read)?;
        let body_parts = read_table(
            &buffer,
            &header.body_parts,
            BodyPart::DISK_SIZE,
            BodyPart::read,
        )?;
        let attachments = read_table(
            &buffer,
            &header.attachments,
            Attachment::DISK_SIZE,
            Attachment::read,
        )?;

        let family_count = header.skin_families.count as usize;
        let refs_per_family = header.skin_ref_count as usize;
        header
            .skin_families
            .check_bounds(refs_per_family * 2, buffer.len())?;
        let mut cursor = Cursor::new(buffer.as_slice());
        cursor.seek(SeekFrom::Start(u64::from(header.skin_families.offset)))?;
        let skin_families = SkinFamilies::read(&mut cursor, family_count, refs_per_family)?;

        let parents = bones.iter().map(|b| b.parent).collect();
        let group_buffers = vec![None; sequence_groups.len()];

        let model = Self {
            header,
            buffer,
            bones,
            parents,
            bone_controllers,
            hitboxes,
            sequences,
            sequence_groups,
            group_buffers,
            textures,
            skin_families,
            body_parts,
            attachments,
        };
        model.validate()?;

        debug!(
            "loaded '{}': {} bones, {} sequences, {} groups",
            model.header.name,
            model.bones.len(),
            model.sequences.len(),
            model.sequence_groups.len()
        );
        Ok(model)
    }

    /// Load a model from disk, resolving numbered external sequence group
    /// files (`<name>01.mdl`, `<name>02.mdl`, ...) next to the main file.
    ///
    /// A missing group file is only an error once a pose query actually
    /// needs it, so models can be inspected without their auxiliaries.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut model = Self::parse(fs::read(path)?)?;

        for group in 1..model.sequence_groups.len() {
            let group_path = sequence_group_path(path, group);
            match fs::read(&group_path) {
                Ok(data) => model.attach_sequence_group(group, data)?,
                Err(err) => {
                    if model.sequences.iter().any(|s| s.seq_group as usize == group) {
                        warn!(
                            "sequence group file {} not readable: {err}",
                            group_path.display()
                        );
                    }
                }
            }
        }
        Ok(model)
    }

    /// Attach the raw bytes of an external sequence group (`IDSQ`) file
    pub fn attach_sequence_group(&mut self, group: usize, data: Vec<u8>) -> Result<()> {
        if group == 0 || group >= self.group_buffers.len() {
            return Err(StudioError::MissingSequenceGroup(group));
        }
        let header = SequenceGroupFileHeader::parse(&mut Cursor::new(data.as_slice()))?;
        debug!("attached sequence group {group} '{}'", header.name);
        self.group_buffers[group] = Some(data);
        Ok(())
    }

    /// Load-time structural validation.
    ///
    /// Rejecting the model here is what lets the per-query pose path skip
    /// re-validation entirely.
    fn validate(&self) -> Result<()> {
        // Parent-before-child: a bone's parent is -1 or a smaller index
        for (index, bone) in self.bones.iter().enumerate() {
            let parent = bone.parent;
            if parent != -1 && (parent < 0 || parent as usize >= index) {
                return Err(StudioError::MalformedHierarchy {
                    bone: index,
                    parent,
                });
            }
        }

        // At most one controller per (bone, DOF) channel
        let mut claimed = HashSet::new();
        for ctrl in &self.bone_controllers {
            let bone = ctrl.bone;
            if bone < 0 || bone as usize >= self.bones.len() {
                return Err(StudioError::ParseError(format!(
                    "bone controller references bone {bone} of {}",
                    self.bones.len()
                )));
            }
            if let Some(dof) = ctrl.channel() {
                if !claimed.insert((bone as usize, dof.index())) {
                    return Err(StudioError::DuplicateController {
                        bone: bone as usize,
                        channel: dof.index(),
                    });
                }
            }
        }

        // Bone references in dependent tables
        for (index, hitbox) in self.hitboxes.iter().enumerate() {
            if hitbox.bone as usize >= self.bones.len() {
                return Err(StudioError::ParseError(format!(
                    "hitbox {index} references bone {}",
                    hitbox.bone
                )));
            }
        }
        for (index, attachment) in self.attachments.iter().enumerate() {
            if attachment.bone as usize >= self.bones.len() {
                return Err(StudioError::ParseError(format!(
                    "attachment {index} references bone {}",
                    attachment.bone
                )));
            }
        }
        for (index, sequence) in self.sequences.iter().enumerate() {
            if sequence.seq_group as usize >= self.sequence_groups.len().max(1) {
                return Err(StudioError::ParseError(format!(
                    "sequence {index} references group {}",
                    sequence.seq_group
                )));
            }
        }

        Ok(())
    }

    /// Compute world-space 3x4 transforms for every bone at the requested
    /// instant. The result is indexed like [`Self::bones`].
    pub fn bone_transforms(&self, request: &PoseRequest) -> Result<Vec<Affine3A>> {
        let sequence = self
            .sequences
            .get(request.sequence)
            .ok_or(StudioError::SequenceOutOfRange {
                index: request.sequence,
                count: self.sequences.len(),
            })?;

        let (buffer, anim_base) = self.anim_source(sequence)?;
        let blocks = AnimBlocks::new(buffer, anim_base, self.bones.len());
        let local = solve_local_poses(
            &self.bones,
            &self.bone_controllers,
            sequence,
            &blocks,
            request,
        );
        Ok(compose(&local, &self.parents))
    }

    /// World transform of one attachment point
    pub fn attachment_transform(
        &self,
        index: usize,
        request: &PoseRequest,
    ) -> Result<Affine3A> {
        let attachment =
            self.attachments
                .get(index)
                .ok_or(StudioError::AttachmentOutOfRange {
                    index,
                    count: self.attachments.len(),
                })?;
        let world = self.bone_transforms(request)?;
        Ok(world[attachment.bone as usize] * Affine3A::from_translation(attachment.origin))
    }

    /// World-space axis-aligned bounds of one hitbox: the transformed box's
    /// eight corners collapsed back to a min/max pair
    pub fn hitbox_bounds(&self, index: usize, request: &PoseRequest) -> Result<(Vec3, Vec3)> {
        let hitbox = self
            .hitboxes
            .get(index)
            .ok_or(StudioError::HitboxOutOfRange {
                index,
                count: self.hitboxes.len(),
            })?;
        let world = self.bone_transforms(request)?;
        let transform = world[hitbox.bone as usize];

        let (lo, hi) = (hitbox.bb_min, hitbox.bb_max);
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for corner in [
            Vec3::new(lo.x, lo.y, lo.z),
            Vec3::new(hi.x, lo.y, lo.z),
            Vec3::new(lo.x, hi.y, lo.z),
            Vec3::new(hi.x, hi.y, lo.z),
            Vec3::new(lo.x, lo.y, hi.z),
            Vec3::new(hi.x, lo.y, hi.z),
            Vec3::new(lo.x, hi.y, hi.z),
            Vec3::new(hi.x, hi.y, hi.z),
        ] {
            let p = transform.transform_point3(corner);
            min = min.min(p);
            max = max.max(p);
        }
        Ok((min, max))
    }

    /// The `[start, end]` engine-unit range of a controller slot, or `None`
    /// when no controller occupies it. Slots above 4 are a caller error.
    pub fn controller_range(&self, slot: usize) -> Result<Option<(f32, f32)>> {
        if slot > MAX_CONTROLLER_SLOT {
            return Err(StudioError::ControllerOutOfRange(slot));
        }
        Ok(self
            .bone_controllers
            .iter()
            .find(|c| c.slot as usize == slot)
            .map(|c| (c.start, c.end)))
    }

    /// Resolve which buffer and base offset a sequence's animation blocks
    /// live at: the main file for group 0, an attached auxiliary buffer
    /// otherwise
    fn anim_source(&self, sequence: &SequenceDesc) -> Result<(&[u8], usize)> {
        let group = sequence.seq_group as usize;
        if group == 0 {
            let data_offset = self
                .sequence_groups
                .first()
                .map_or(0, |g| g.data_offset as usize);
            return Ok((&self.buffer, data_offset + sequence.anim_offset as usize));
        }
        let buffer = self
            .group_buffers
            .get(group)
            .and_then(Option::as_ref)
            .ok_or(StudioError::MissingSequenceGroup(group))?;
        Ok((buffer, sequence.anim_offset as usize))
    }

    /// Internal model name from the header
    pub fn name(&self) -> &str {
        &self.header.name
    }

    /// The parsed file header
    pub fn header(&self) -> &StudioHeader {
        &self.header
    }

    /// Bone table, in hierarchy (parent-before-child) order
    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    /// Bone controller table
    pub fn bone_controllers(&self) -> &[BoneController] {
        &self.bone_controllers
    }

    /// Hitbox table
    pub fn hitboxes(&self) -> &[Hitbox] {
        &self.hitboxes
    }

    /// Sequence table
    pub fn sequences(&self) -> &[SequenceDesc] {
        &self.sequences
    }

    /// Sequence group table
    pub fn sequence_groups(&self) -> &[SequenceGroup] {
        &self.sequence_groups
    }

    /// Texture table
    pub fn textures(&self) -> &[Texture] {
        &self.textures
    }

    /// Body part table
    pub fn body_parts(&self) -> &[BodyPart] {
        &self.body_parts
    }

    /// Skin family table
    pub fn skin_families(&self) -> &SkinFamilies {
        &self.skin_families
    }

    /// Attachment table
    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    /// Which controller, if any, drives the given bone DOF channel
    pub fn controller_on(&self, bone: usize, dof: Dof) -> Option<&BoneController> {
        let index = self.bones.get(bone)?.controller_for(dof)?;
        self.bone_controllers.get(index)
    }
}

/// Derive the conventional path of a numbered sequence group file:
/// `scientist.mdl` group 1 -> `scientist01.mdl`
fn sequence_group_path(model_path: &Path, group: usize) -> PathBuf {
    let stem = model_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    model_path.with_file_name(format!("{stem}{group:02}.mdl"))
}

fn read_table<'a, T>(
    buffer: &'a [u8],
    table: &crate::header::TableRef,
    entry_size: usize,
    read_one: impl Fn(&mut Cursor<&'a [u8]>) -> Result<T>,
) -> Result<Vec<T>> {
    table.check_bounds(entry_size, buffer.len())?;
    let mut cursor = Cursor::new(buffer);
    cursor.seek(SeekFrom::Start(u64::from(table.offset)))?;
    let mut entries = Vec::with_capacity(table.count as usize);
    for _ in 0..table.count {
        entries.push(read_one(&mut cursor)?);
    }
    Ok(entries)
}
