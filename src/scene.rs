//! Scene description files
//!
//! A scene places the player, static walls, and NPCs (with their dialogue) on
//! a flat ground plane.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::info;
use warden_game::NpcData;

/// The demo scene shipped with the binary
const BUILTIN_OUTPOST: &str = include_str!("../assets/scenes/outpost.toml");

/// Where the player starts
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerSpawn {
    pub position: Vec3,
}

/// A static box collider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wall {
    pub half_extents: Vec3,
    pub position: Vec3,
}

/// A complete scene
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    pub name: String,
    #[serde(default)]
    pub ground_height: f32,
    #[serde(default)]
    pub player: PlayerSpawn,
    #[serde(default, rename = "wall")]
    pub walls: Vec<Wall>,
    #[serde(default, rename = "npc")]
    pub npcs: Vec<NpcData>,
}

impl Scene {
    /// Parse and validate a scene from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        let scene: Scene = toml::from_str(content).context("Invalid scene TOML")?;
        scene.validate()?;
        Ok(scene)
    }

    /// Load and validate a scene file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read scene file {:?}", path))?;
        let scene = Self::parse(&content).with_context(|| format!("Failed to load scene {:?}", path))?;
        info!("Loaded scene '{}' from {:?}", scene.name, path);
        Ok(scene)
    }

    /// The built-in outpost scene
    pub fn builtin() -> Result<Self> {
        Self::parse(BUILTIN_OUTPOST).context("Built-in outpost scene is broken")
    }

    /// Reject scenes whose dialogue jumps past the end of a script
    pub fn validate(&self) -> Result<()> {
        for npc in &self.npcs {
            npc.script
                .validate()
                .with_context(|| format!("NPC '{}' has an invalid dialogue script", npc.name))?;
        }
        Ok(())
    }
}
