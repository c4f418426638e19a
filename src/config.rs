//! Configuration file handling.
//!
//! Every setting has a built-in default that reproduces the stock figures, so
//! a run with no `diet_radar.toml` and no flags needs nothing else. A config
//! file only has to name the values it changes.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::cli::Args;
use crate::error::{PipelineError, PipelineResult};

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "diet_radar.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    /// Diet groups in drawing order, most meat first.
    #[serde(default = "default_groups")]
    pub groups: Vec<GroupConfig>,

    #[serde(default)]
    pub inputs: InputsConfig,

    #[serde(default)]
    pub outputs: OutputsConfig,

    #[serde(default)]
    pub render: RenderConfig,

    #[serde(default)]
    pub motion: MotionConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data: DataConfig::default(),
            groups: default_groups(),
            inputs: InputsConfig::default(),
            outputs: OutputsConfig::default(),
            render: RenderConfig::default(),
            motion: MotionConfig::default(),
        }
    }
}

/// Column names and scaling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_group_column")]
    pub group_column: String,

    /// Indicator columns, one radar axis each, in axis order.
    #[serde(default = "default_indicators")]
    pub indicators: Vec<String>,

    /// Value a column maximum maps to after scaling.
    #[serde(default = "default_scale")]
    pub scale: f64,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            group_column: default_group_column(),
            indicators: default_indicators(),
            scale: default_scale(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupConfig {
    pub name: String,
    /// `#RRGGBB`
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputsConfig {
    /// Relative dataset paths are resolved against this directory.
    #[serde(default = "default_dir")]
    pub directory: PathBuf,

    #[serde(default = "default_real_world")]
    pub real_world: DatasetConfig,

    #[serde(default = "default_efficiency")]
    pub efficiency: DatasetConfig,
}

impl Default for InputsConfig {
    fn default() -> Self {
        Self {
            directory: default_dir(),
            real_world: default_real_world(),
            efficiency: default_efficiency(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    pub path: PathBuf,
    /// Panel title on the static figure.
    pub title: String,
    /// Prefix for the highlight animation titles.
    pub short_title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputsConfig {
    #[serde(default = "default_dir")]
    pub directory: PathBuf,

    #[serde(default = "default_static_image")]
    pub static_image: PathBuf,

    #[serde(default = "default_highlight_animation")]
    pub highlight_animation: PathBuf,

    #[serde(default = "default_move_animation")]
    pub move_animation: PathBuf,

    /// Per-group means and scaled values, written only when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary_csv: Option<PathBuf>,
}

impl Default for OutputsConfig {
    fn default() -> Self {
        Self {
            directory: default_dir(),
            static_image: default_static_image(),
            highlight_animation: default_highlight_animation(),
            move_animation: default_move_animation(),
            summary_csv: None,
        }
    }
}

/// Figure size and timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_width_in")]
    pub width_in: f64,

    #[serde(default = "default_height_in")]
    pub height_in: f64,

    #[serde(default = "default_static_dpi")]
    pub static_dpi: f64,

    #[serde(default = "default_animation_dpi")]
    pub animation_dpi: f64,

    #[serde(default = "default_move_dpi")]
    pub move_dpi: f64,

    /// Outer edge of the radial axis.
    #[serde(default = "default_radial_limit")]
    pub radial_limit: f64,

    #[serde(default = "default_highlight_frame_ms")]
    pub highlight_frame_ms: u32,

    #[serde(default = "default_move_frame_ms")]
    pub move_frame_ms: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width_in: default_width_in(),
            height_in: default_height_in(),
            static_dpi: default_static_dpi(),
            animation_dpi: default_animation_dpi(),
            move_dpi: default_move_dpi(),
            radial_limit: default_radial_limit(),
            highlight_frame_ms: default_highlight_frame_ms(),
            move_frame_ms: default_move_frame_ms(),
        }
    }
}

/// Move-to-center animation timing and anchors, as figure-width fractions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionConfig {
    /// Frames spent sliding; the rest of the frames hold the final layout.
    #[serde(default = "default_travel_frames")]
    pub travel_frames: u32,

    #[serde(default = "default_total_frames")]
    pub total_frames: u32,

    #[serde(default = "default_left_start")]
    pub left_start: f64,

    #[serde(default = "default_right_start")]
    pub right_start: f64,

    #[serde(default = "default_center")]
    pub center: f64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            travel_frames: default_travel_frames(),
            total_frames: default_total_frames(),
            left_start: default_left_start(),
            right_start: default_right_start(),
            center: default_center(),
        }
    }
}

fn default_group_column() -> String {
    "diet_group".to_string()
}

fn default_indicators() -> Vec<String> {
    [
        "mean_ghgs",
        "mean_land",
        "mean_watscar",
        "mean_eut",
        "mean_ghgs_ch4",
        "mean_ghgs_n2o",
        "mean_bio",
        "mean_watuse",
        "mean_acid",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_scale() -> f64 {
    1.0
}

fn default_groups() -> Vec<GroupConfig> {
    [
        ("meat100", "#E41A1C"),
        ("meat", "#FF7F00"),
        ("meat50", "#F781BF"),
        ("fish", "#4DAF4A"),
        ("veggie", "#377EB8"),
        ("vegan", "#984EA3"),
    ]
    .iter()
    .map(|(name, color)| GroupConfig {
        name: name.to_string(),
        color: color.to_string(),
    })
    .collect()
}

fn default_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_real_world() -> DatasetConfig {
    DatasetConfig {
        path: PathBuf::from("Results_21MAR2022_nokcaladjust.csv"),
        title: "Real-world Impact (No kcal Adjustment)".to_string(),
        short_title: "Real-world".to_string(),
    }
}

fn default_efficiency() -> DatasetConfig {
    DatasetConfig {
        path: PathBuf::from("Results_21MAR2022.csv"),
        title: "Efficiency (kcal-Adjusted)".to_string(),
        short_title: "Efficiency".to_string(),
    }
}

fn default_static_image() -> PathBuf {
    PathBuf::from("diet_comparison_static.png")
}

fn default_highlight_animation() -> PathBuf {
    PathBuf::from("diet_comparison_animated.gif")
}

fn default_move_animation() -> PathBuf {
    PathBuf::from("diet_comparison_move.gif")
}

fn default_width_in() -> f64 {
    18.0
}

fn default_height_in() -> f64 {
    10.0
}

fn default_static_dpi() -> f64 {
    300.0
}

fn default_animation_dpi() -> f64 {
    150.0
}

fn default_move_dpi() -> f64 {
    80.0
}

fn default_radial_limit() -> f64 {
    1.1
}

fn default_highlight_frame_ms() -> u32 {
    2000
}

fn default_move_frame_ms() -> u32 {
    50
}

fn default_travel_frames() -> u32 {
    30
}

fn default_total_frames() -> u32 {
    51
}

fn default_left_start() -> f64 {
    0.05
}

fn default_right_start() -> f64 {
    0.55
}

fn default_center() -> f64 {
    0.30
}

/// Parse `#RRGGBB` (leading `#` optional) into its channels.
pub fn parse_hex_color(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&content).with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Load `diet_radar.toml` from the working directory, if there is one.
    pub fn load_default() -> Result<Option<Self>> {
        let path = Path::new(DEFAULT_CONFIG_FILE);
        if path.exists() {
            Ok(Some(Self::load(path)?))
        } else {
            Ok(None)
        }
    }

    /// The built-in defaults as TOML, for `--init-config`.
    pub fn default_toml() -> Result<String> {
        let body = toml::to_string_pretty(&Config::default()).context("Failed to serialize default config")?;
        Ok(format!("# diet_radar configuration\n\n{}", body))
    }

    /// Command-line flags win over the file.
    pub fn merge_with_args(&mut self, args: &Args) {
        if let Some(ref dir) = args.data_dir {
            self.inputs.directory = dir.clone();
        }
        if let Some(ref dir) = args.out_dir {
            self.outputs.directory = dir.clone();
        }
        if let Some(ref summary) = args.summary {
            self.outputs.summary_csv = Some(summary.clone());
        }
    }

    pub fn validate(&self) -> PipelineResult<()> {
        if self.data.indicators.len() < 3 {
            return Err(PipelineError::TooFewIndicators {
                count: self.data.indicators.len(),
            });
        }
        if self.groups.is_empty() {
            return Err(PipelineError::Config("at least one diet group is required".to_string()));
        }

        let mut seen = HashSet::new();
        for group in &self.groups {
            if !seen.insert(group.name.as_str()) {
                return Err(PipelineError::Config(format!("diet group '{}' is listed twice", group.name)));
            }
            if parse_hex_color(&group.color).is_none() {
                return Err(PipelineError::Config(format!(
                    "color '{}' for diet group '{}' is not #RRGGBB",
                    group.color, group.name
                )));
            }
        }

        if !(self.data.scale > 0.0 && self.data.scale.is_finite()) {
            return Err(PipelineError::Config(format!("scale must be positive, got {}", self.data.scale)));
        }
        let render = &self.render;
        let lengths = [
            ("radial_limit", render.radial_limit),
            ("width_in", render.width_in),
            ("height_in", render.height_in),
            ("static_dpi", render.static_dpi),
            ("animation_dpi", render.animation_dpi),
            ("move_dpi", render.move_dpi),
        ];
        for (name, value) in lengths {
            if !(value.is_finite() && value > 0.0) {
                return Err(PipelineError::Config(format!("{} must be positive, got {}", name, value)));
            }
        }
        for (name, ms) in [("highlight_frame_ms", render.highlight_frame_ms), ("move_frame_ms", render.move_frame_ms)] {
            if ms == 0 {
                return Err(PipelineError::Config(format!("{} must be at least 1", name)));
            }
        }

        let motion = &self.motion;
        if motion.travel_frames == 0 || motion.travel_frames >= motion.total_frames {
            return Err(PipelineError::Config(format!(
                "travel_frames must be in 1..{}, got {}",
                motion.total_frames, motion.travel_frames
            )));
        }

        Ok(())
    }

    pub fn input_path(&self, dataset: &DatasetConfig) -> PathBuf {
        resolve(&self.inputs.directory, &dataset.path)
    }

    pub fn output_path(&self, file: &Path) -> PathBuf {
        resolve(&self.outputs.directory, file)
    }

    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|g| g.name.as_str())
    }
}

fn resolve(dir: &Path, file: &Path) -> PathBuf {
    if file.is_absolute() {
        file.to_path_buf()
    } else {
        dir.join(file)
    }
}
