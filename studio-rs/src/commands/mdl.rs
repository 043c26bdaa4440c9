//! MDL model file command implementations

use anyhow::{Context, Result};
use clap::Subcommand;
use std::path::{Path, PathBuf};

use studio_mdl::{PoseRequest, StudioModel};

#[derive(Subcommand)]
pub enum MdlCommands {
    /// Display information about an MDL model file
    Info {
        /// Path to the MDL file
        file: PathBuf,

        /// Show detailed information
        #[arg(short, long)]
        detailed: bool,
    },

    /// List the bone hierarchy
    Bones {
        /// Path to the MDL file
        file: PathBuf,
    },

    /// List the animation sequences
    Sequences {
        /// Path to the MDL file
        file: PathBuf,
    },

    /// Solve a pose and print world-space bone transforms
    Pose {
        /// Path to the MDL file
        file: PathBuf,

        /// Sequence index
        #[arg(short, long, default_value = "0")]
        sequence: usize,

        /// Fractional frame within the sequence
        #[arg(short, long, default_value = "0")]
        frame: f32,

        /// Blend axis values (raw controller units)
        #[arg(short, long, num_args = 2, default_values_t = [0.0, 0.0])]
        blend: Vec<f32>,

        /// Controller slot values (raw engine units, slots 0-3)
        #[arg(short, long, num_args = 0..=4)]
        controller: Vec<f32>,

        /// Mouth controller value (0-64)
        #[arg(short, long, default_value = "0")]
        mouth: f32,
    },
}

pub fn execute(cmd: MdlCommands) -> Result<()> {
    match cmd {
        MdlCommands::Info { file, detailed } => handle_info(file, detailed),
        MdlCommands::Bones { file } => handle_bones(file),
        MdlCommands::Sequences { file } => handle_sequences(file),
        MdlCommands::Pose {
            file,
            sequence,
            frame,
            blend,
            controller,
            mouth,
        } => handle_pose(file, sequence, frame, &blend, &controller, mouth),
    }
}

fn load_model(path: &Path) -> Result<StudioModel> {
    StudioModel::load(path)
        .with_context(|| format!("Failed to load MDL model from {}", path.display()))
}

fn handle_info(path: PathBuf, detailed: bool) -> Result<()> {
    let model = load_model(&path)?;

    println!("=== MDL Model Information ===");
    println!("Name: {}", model.name());
    println!("Bones: {}", model.bones().len());
    println!("Bone controllers: {}", model.bone_controllers().len());
    println!("Sequences: {}", model.sequences().len());
    println!("Sequence groups: {}", model.sequence_groups().len());
    println!("Hitboxes: {}", model.hitboxes().len());
    println!("Attachments: {}", model.attachments().len());
    println!("Body parts: {}", model.body_parts().len());
    println!("Textures: {}", model.textures().len());
    println!("Skin families: {}", model.skin_families().family_count());

    if detailed {
        println!("\n=== Detailed Information ===");
        println!("{:#?}", model.header());
    }

    Ok(())
}

fn handle_bones(path: PathBuf) -> Result<()> {
    let model = load_model(&path)?;

    println!("{} bones:", model.bones().len());
    for (index, bone) in model.bones().iter().enumerate() {
        let parent = if bone.parent < 0 {
            "root".to_string()
        } else {
            format!("parent {}", bone.parent)
        };
        println!("  [{index:3}] {} ({parent})", bone.name);
    }

    for attachment in model.attachments() {
        println!(
            "  attachment '{}' on bone {} at {:?}",
            attachment.name, attachment.bone, attachment.origin
        );
    }

    Ok(())
}

fn handle_sequences(path: PathBuf) -> Result<()> {
    let model = load_model(&path)?;

    println!("{} sequences:", model.sequences().len());
    for (index, seq) in model.sequences().iter().enumerate() {
        let looping = if seq.is_looping() { ", looping" } else { "" };
        println!(
            "  [{index:3}] {:<24} {} frames @ {} fps, {} blend(s), group {}{looping}",
            seq.label, seq.num_frames, seq.fps, seq.num_blends, seq.seq_group
        );
    }

    Ok(())
}

fn handle_pose(
    path: PathBuf,
    sequence: usize,
    frame: f32,
    blend: &[f32],
    controller: &[f32],
    mouth: f32,
) -> Result<()> {
    let model = load_model(&path)?;

    let mut request = PoseRequest {
        frame,
        mouth,
        ..PoseRequest::sequence(sequence)
    };
    for (slot, value) in blend.iter().take(2).enumerate() {
        request.blend[slot] = *value;
    }
    for (slot, value) in controller.iter().take(4).enumerate() {
        request.controllers[slot] = *value;
    }

    let transforms = model
        .bone_transforms(&request)
        .with_context(|| format!("Failed to solve sequence {sequence} at frame {frame}"))?;

    let seq = &model.sequences()[sequence];
    println!("Pose for '{}' frame {frame}:", seq.label);
    for (bone, transform) in model.bones().iter().zip(&transforms) {
        let pos = transform.translation;
        println!(
            "  {:<24} pos ({:8.3}, {:8.3}, {:8.3})",
            bone.name, pos.x, pos.y, pos.z
        );
    }

    Ok(())
}
