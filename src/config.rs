//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`AMC_SECTION__KEY`)

use figment::{Figment, providers::{Format, Toml, Env}};
use serde::{Serialize, Deserialize};
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Field dimensions
    #[serde(default)]
    pub field: FieldConfig,
    /// Which demo field to fill in
    #[serde(default)]
    pub scene: SceneConfig,
    /// Output limits for the sweep
    #[serde(default)]
    pub mesh: MeshConfig,
    /// Files and reports to produce
    #[serde(default)]
    pub output: OutputConfig,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugConfig,
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`AMC_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        // Load user config (optional)
        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // Environment variables override everything
        // AMC_FIELD__SIZE=[8,8,8] -> field.size = [8, 8, 8]
        figment = figment.merge(Env::prefixed("AMC_").split("__"));

        figment.extract().map_err(ConfigError::from)
    }
}

/// Field configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Samples along x, y and z (ignored by the ambiguous scenarios)
    pub size: [usize; 3],
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self { size: [24, 24, 24] }
    }
}

/// Kind of demo field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SceneKind {
    /// Blended spheres on a negative background
    #[default]
    Spheres,
    /// One of the two-cell strips sharing an ambiguous face
    Ambiguous,
}

/// One sphere of the sphere scene
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SphereConfig {
    pub center: [f32; 3],
    pub radius: f32,
}

/// Scene configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub kind: SceneKind,
    /// Value every sample starts from before spheres are added
    pub background: f32,
    /// Animation phase in radians
    pub phase: f32,
    /// Radius of the circle sphere centers travel on as `phase` changes
    pub orbit: f32,
    /// Ambiguous scenario index (0..=5)
    pub ambiguous_case: usize,
    pub spheres: Vec<SphereConfig>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            kind: SceneKind::Spheres,
            background: -1.0,
            phase: 0.0,
            orbit: 0.0,
            ambiguous_case: 0,
            spheres: vec![
                SphereConfig { center: [8.3, 11.6, 11.1], radius: 6.2 },
                SphereConfig { center: [14.7, 11.2, 12.4], radius: 5.3 },
            ],
        }
    }
}

/// Mesh output limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshConfig {
    pub max_vertices: usize,
    pub max_triangles: usize,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            max_vertices: 500_000,
            max_triangles: 1_000_000,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Write the mesh as Wavefront OBJ
    pub obj_path: Option<PathBuf>,
    /// Dump the generated case table as RON
    pub case_table_path: Option<PathBuf>,
    /// Print the per-case usage counters after the sweep
    pub usage_stats: bool,
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
    /// Print the triangles of this cell
    pub inspect_cell: Option<[usize; 3]>,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            inspect_cell: None,
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}
