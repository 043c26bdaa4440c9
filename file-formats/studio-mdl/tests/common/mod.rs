//! Synthetic studio model files built in memory for integration tests

use std::collections::HashMap;

pub const HEADER_SIZE: usize = 244;
pub const GROUP_HEADER_SIZE: usize = 76;
const ANIM_RECORD_SIZE: usize = 12;

/// One bone of the synthetic skeleton
#[derive(Clone)]
pub struct BoneSpec {
    pub name: &'static str,
    pub parent: i32,
    /// Controller table index per DOF channel, -1 for none
    pub controller: [i32; 6],
    pub value: [f32; 6],
    pub scale: [f32; 6],
}

impl BoneSpec {
    pub fn root(name: &'static str) -> Self {
        Self {
            name,
            parent: -1,
            controller: [-1; 6],
            value: [0.0; 6],
            scale: [1.0; 6],
        }
    }

    pub fn child(name: &'static str, parent: i32) -> Self {
        Self {
            parent,
            ..Self::root(name)
        }
    }
}

/// One bone controller record
#[derive(Clone)]
pub struct ControllerSpec {
    pub bone: i32,
    pub motion_type: u32,
    pub start: f32,
    pub end: f32,
    pub slot: u32,
}

/// One sequence plus its channel data, keyed by (blend, bone, dof)
#[derive(Clone)]
pub struct SequenceSpec {
    pub label: &'static str,
    pub fps: f32,
    pub looping: bool,
    pub num_frames: u32,
    pub num_blends: u32,
    pub blend_start: [f32; 2],
    pub blend_end: [f32; 2],
    pub seq_group: u32,
    pub channels: HashMap<(usize, usize, usize), Vec<i16>>,
}

impl SequenceSpec {
    pub fn new(label: &'static str, num_frames: u32) -> Self {
        Self {
            label,
            fps: 30.0,
            looping: false,
            num_frames,
            num_blends: 1,
            blend_start: [0.0; 2],
            blend_end: [0.0; 2],
            seq_group: 0,
            channels: HashMap::new(),
        }
    }

    pub fn looping(mut self) -> Self {
        self.looping = true;
        self
    }

    pub fn with_channel(mut self, blend: usize, bone: usize, dof: usize, values: Vec<i16>) -> Self {
        self.channels.insert((blend, bone, dof), values);
        self
    }
}

#[derive(Clone)]
pub struct HitboxSpec {
    pub bone: i32,
    pub group: i32,
    pub bb_min: [f32; 3],
    pub bb_max: [f32; 3],
}

#[derive(Clone)]
pub struct AttachmentSpec {
    pub name: &'static str,
    pub bone: i32,
    pub origin: [f32; 3],
}

/// Builds main-file bytes (and external group files) for a model
pub struct ModelBuilder {
    pub bones: Vec<BoneSpec>,
    pub controllers: Vec<ControllerSpec>,
    pub sequences: Vec<SequenceSpec>,
    pub hitboxes: Vec<HitboxSpec>,
    pub attachments: Vec<AttachmentSpec>,
    /// Number of sequence groups; group 0 is always the embedded one
    pub group_count: usize,
}

impl ModelBuilder {
    pub fn new() -> Self {
        Self {
            bones: Vec::new(),
            controllers: Vec::new(),
            sequences: Vec::new(),
            hitboxes: Vec::new(),
            attachments: Vec::new(),
            group_count: 1,
        }
    }

    pub fn bone(mut self, bone: BoneSpec) -> Self {
        self.bones.push(bone);
        self
    }

    pub fn controller(mut self, controller: ControllerSpec) -> Self {
        self.controllers.push(controller);
        self
    }

    pub fn sequence(mut self, sequence: SequenceSpec) -> Self {
        if sequence.seq_group as usize >= self.group_count {
            self.group_count = sequence.seq_group as usize + 1;
        }
        self.sequences.push(sequence);
        self
    }

    pub fn hitbox(mut self, hitbox: HitboxSpec) -> Self {
        self.hitboxes.push(hitbox);
        self
    }

    pub fn attachment(mut self, attachment: AttachmentSpec) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Serialize the main model file
    pub fn build(&self) -> Vec<u8> {
        let bones_bytes = self.bone_table();
        let ctrl_bytes = self.controller_table();
        let hitbox_bytes = self.hitbox_table();
        let attach_bytes = self.attachment_table();

        let off_bones = HEADER_SIZE;
        let off_ctrl = off_bones + bones_bytes.len();
        let off_hitbox = off_ctrl + ctrl_bytes.len();
        let off_attach = off_hitbox + hitbox_bytes.len();
        let off_groups = off_attach + attach_bytes.len();
        let off_seq = off_groups + self.group_count * 104;
        let off_anim = off_seq + self.sequences.len() * 176;

        // Animation blobs for embedded (group 0) sequences
        let mut anim_blob = Vec::new();
        let mut anim_offsets = Vec::with_capacity(self.sequences.len());
        for seq in &self.sequences {
            if seq.seq_group == 0 {
                let offset = off_anim + anim_blob.len();
                anim_blob.extend_from_slice(&encode_anim_blocks(seq, self.bones.len()));
                anim_offsets.push(offset as u32);
            } else {
                // Offset inside the external group file
                anim_offsets.push(GROUP_HEADER_SIZE as u32);
            }
        }

        let total = off_anim + anim_blob.len();
        let mut data = Vec::with_capacity(total);

        // --- header ---
        data.extend_from_slice(b"IDST");
        data.extend_from_slice(&10i32.to_le_bytes());
        data.extend_from_slice(&name_bytes::<64>("synthetic.mdl"));
        data.extend_from_slice(&(total as i32).to_le_bytes());
        for _ in 0..15 {
            data.extend_from_slice(&0f32.to_le_bytes()); // eye, hulls, bbox
        }
        data.extend_from_slice(&0u32.to_le_bytes()); // flags
        push_table(&mut data, self.bones.len(), off_bones);
        push_table(&mut data, self.controllers.len(), off_ctrl);
        push_table(&mut data, self.hitboxes.len(), off_hitbox);
        push_table(&mut data, self.sequences.len(), off_seq);
        push_table(&mut data, self.group_count, off_groups);
        push_table(&mut data, 0, 0); // textures
        data.extend_from_slice(&0i32.to_le_bytes()); // texture data offset
        data.extend_from_slice(&0i32.to_le_bytes()); // skin refs
        data.extend_from_slice(&0i32.to_le_bytes()); // skin families
        data.extend_from_slice(&0i32.to_le_bytes()); // skin offset
        push_table(&mut data, 0, 0); // body parts
        push_table(&mut data, self.attachments.len(), off_attach);
        for _ in 0..4 {
            data.extend_from_slice(&0i32.to_le_bytes()); // sound table
        }
        push_table(&mut data, 0, 0); // transitions
        assert_eq!(data.len(), HEADER_SIZE);

        data.extend_from_slice(&bones_bytes);
        data.extend_from_slice(&ctrl_bytes);
        data.extend_from_slice(&hitbox_bytes);
        data.extend_from_slice(&attach_bytes);

        // Sequence groups: group 0 embedded, others named for external files
        for group in 0..self.group_count {
            data.extend_from_slice(&name_bytes::<32>(if group == 0 { "default" } else { "extra" }));
            data.extend_from_slice(&name_bytes::<64>(&format!("synthetic{group:02}.mdl")));
            data.extend_from_slice(&0i32.to_le_bytes()); // cache
            data.extend_from_slice(&0i32.to_le_bytes()); // data offset
        }

        for (seq, anim_offset) in self.sequences.iter().zip(&anim_offsets) {
            data.extend_from_slice(&self.sequence_record(seq, *anim_offset));
        }
        data.extend_from_slice(&anim_blob);
        data
    }

    /// Serialize the external (`IDSQ`) file holding one sequence's blocks
    pub fn build_group_file(&self, sequence_index: usize) -> Vec<u8> {
        let seq = &self.sequences[sequence_index];
        let mut data = Vec::new();
        data.extend_from_slice(b"IDSQ");
        data.extend_from_slice(&10i32.to_le_bytes());
        data.extend_from_slice(&name_bytes::<64>("synthetic group"));
        let blocks = encode_anim_blocks(seq, self.bones.len());
        data.extend_from_slice(&((GROUP_HEADER_SIZE + blocks.len()) as i32).to_le_bytes());
        assert_eq!(data.len(), GROUP_HEADER_SIZE);
        data.extend_from_slice(&blocks);
        data
    }

    fn bone_table(&self) -> Vec<u8> {
        let mut data = Vec::new();
        for bone in &self.bones {
            data.extend_from_slice(&name_bytes::<32>(bone.name));
            data.extend_from_slice(&bone.parent.to_le_bytes());
            data.extend_from_slice(&0u32.to_le_bytes()); // flags
            for c in bone.controller {
                data.extend_from_slice(&c.to_le_bytes());
            }
            for v in bone.value {
                data.extend_from_slice(&v.to_le_bytes());
            }
            for s in bone.scale {
                data.extend_from_slice(&s.to_le_bytes());
            }
        }
        data
    }

    fn controller_table(&self) -> Vec<u8> {
        let mut data = Vec::new();
        for ctrl in &self.controllers {
            data.extend_from_slice(&ctrl.bone.to_le_bytes());
            data.extend_from_slice(&ctrl.motion_type.to_le_bytes());
            data.extend_from_slice(&ctrl.start.to_le_bytes());
            data.extend_from_slice(&ctrl.end.to_le_bytes());
            data.extend_from_slice(&0i32.to_le_bytes()); // rest
            data.extend_from_slice(&ctrl.slot.to_le_bytes());
        }
        data
    }

    fn hitbox_table(&self) -> Vec<u8> {
        let mut data = Vec::new();
        for hb in &self.hitboxes {
            data.extend_from_slice(&hb.bone.to_le_bytes());
            data.extend_from_slice(&hb.group.to_le_bytes());
            for v in hb.bb_min.iter().chain(&hb.bb_max) {
                data.extend_from_slice(&v.to_le_bytes());
            }
        }
        data
    }

    fn attachment_table(&self) -> Vec<u8> {
        let mut data = Vec::new();
        for att in &self.attachments {
            data.extend_from_slice(&name_bytes::<32>(att.name));
            data.extend_from_slice(&0i32.to_le_bytes()); // type
            data.extend_from_slice(&att.bone.to_le_bytes());
            for v in att.origin {
                data.extend_from_slice(&v.to_le_bytes());
            }
            for _ in 0..9 {
                data.extend_from_slice(&0f32.to_le_bytes()); // basis vectors
            }
        }
        data
    }

    fn sequence_record(&self, seq: &SequenceSpec, anim_offset: u32) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&name_bytes::<32>(seq.label));
        data.extend_from_slice(&seq.fps.to_le_bytes());
        data.extend_from_slice(&u32::from(seq.looping).to_le_bytes());
        data.extend_from_slice(&0i32.to_le_bytes()); // activity
        data.extend_from_slice(&0i32.to_le_bytes()); // activity weight
        data.extend_from_slice(&0i32.to_le_bytes()); // num events
        data.extend_from_slice(&0i32.to_le_bytes()); // event offset
        data.extend_from_slice(&(seq.num_frames as i32).to_le_bytes());
        for _ in 0..4 {
            data.extend_from_slice(&0i32.to_le_bytes()); // pivots, motion
        }
        for _ in 0..3 {
            data.extend_from_slice(&0f32.to_le_bytes()); // linear movement
        }
        data.extend_from_slice(&0i32.to_le_bytes()); // automove pos
        data.extend_from_slice(&0i32.to_le_bytes()); // automove angle
        for _ in 0..6 {
            data.extend_from_slice(&0f32.to_le_bytes()); // bb min/max
        }
        data.extend_from_slice(&(seq.num_blends as i32).to_le_bytes());
        data.extend_from_slice(&anim_offset.to_le_bytes());
        data.extend_from_slice(&0u32.to_le_bytes()); // blend type 0
        data.extend_from_slice(&0u32.to_le_bytes()); // blend type 1
        data.extend_from_slice(&seq.blend_start[0].to_le_bytes());
        data.extend_from_slice(&seq.blend_start[1].to_le_bytes());
        data.extend_from_slice(&seq.blend_end[0].to_le_bytes());
        data.extend_from_slice(&seq.blend_end[1].to_le_bytes());
        data.extend_from_slice(&0i32.to_le_bytes()); // blend parent
        data.extend_from_slice(&(seq.seq_group as i32).to_le_bytes());
        for _ in 0..4 {
            data.extend_from_slice(&0i32.to_le_bytes()); // nodes
        }
        assert_eq!(data.len(), 176);
        data
    }
}

/// Encode a sequence's animation block table plus channel streams.
/// Each provided channel becomes a single run with every value valid.
fn encode_anim_blocks(seq: &SequenceSpec, num_bones: usize) -> Vec<u8> {
    let blends = seq.num_blends.max(1) as usize;
    let table_size = blends * num_bones * ANIM_RECORD_SIZE;
    let mut data = vec![0u8; table_size];

    for blend in 0..blends {
        for bone in 0..num_bones {
            let record = (blend * num_bones + bone) * ANIM_RECORD_SIZE;
            for dof in 0..6 {
                let Some(values) = seq.channels.get(&(blend, bone, dof)) else {
                    continue;
                };
                let offset = (data.len() - record) as u16;
                data[record + dof * 2..record + dof * 2 + 2]
                    .copy_from_slice(&offset.to_le_bytes());
                data.push(values.len() as u8); // valid
                data.push(values.len() as u8); // total
                for v in values {
                    data.extend_from_slice(&v.to_le_bytes());
                }
            }
        }
    }
    data
}

fn name_bytes<const N: usize>(name: &str) -> [u8; N] {
    let mut buf = [0u8; N];
    let len = name.len().min(N - 1);
    buf[..len].copy_from_slice(&name.as_bytes()[..len]);
    buf
}

fn push_table(data: &mut Vec<u8>, count: usize, offset: usize) {
    data.extend_from_slice(&(count as i32).to_le_bytes());
    data.extend_from_slice(&(offset as i32).to_le_bytes());
}
