//! On-disk configuration for glowfield.
//!
//! ```toml
//! version = 1
//!
//! [window]
//! size = "1920x1080"
//! fullscreen = false
//! fps = 0
//! antialias = "auto"
//! color_space = "auto"
//! gpu_power = "low"
//!
//! [field]
//! drift_rate = 0.08
//! octaves = 5
//!
//! [still]
//! time = "2.5s"
//! size = "1280x720"
//! ```
//!
//! Every key is optional except `version`; anything left out falls back to
//! the command line or the built-in defaults.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::de::{self, Deserializer};
use serde::Deserialize;
use shading::FieldParams;

pub const CONFIG_VERSION: u32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read configuration at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GlowConfig {
    pub version: u32,
    #[serde(default)]
    pub window: WindowSection,
    #[serde(default)]
    pub field: FieldSection,
    #[serde(default)]
    pub still: StillSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WindowSection {
    #[serde(default, deserialize_with = "deserialize_size_opt")]
    pub size: Option<SurfaceSize>,
    pub fullscreen: Option<bool>,
    pub fps: Option<f32>,
    #[serde(default, deserialize_with = "deserialize_antialias_opt")]
    pub antialias: Option<AntialiasSetting>,
    pub color_space: Option<ColorSpaceSetting>,
    pub gpu_power: Option<GpuPowerSetting>,
}

/// Overrides for the field constants; unset keys keep the defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldSection {
    pub drift_rate: Option<f32>,
    pub secondary_drift_ratio: Option<f32>,
    pub octaves: Option<u32>,
    pub primary_scale: Option<f32>,
    pub secondary_scale: Option<f32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StillSection {
    #[serde(default, deserialize_with = "deserialize_duration_opt")]
    pub time: Option<Duration>,
    #[serde(default, deserialize_with = "deserialize_size_opt")]
    pub size: Option<SurfaceSize>,
}

/// `WIDTHxHEIGHT` in physical pixels, both non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub fn as_tuple(self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl fmt::Display for SurfaceSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for SurfaceSize {
    type Err = String;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let (w, h) = spec
            .trim()
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("size must be WIDTHxHEIGHT (got '{spec}')"))?;
        let width: u32 = w
            .trim()
            .parse()
            .map_err(|_| format!("invalid width in size '{spec}'"))?;
        let height: u32 = h
            .trim()
            .parse()
            .map_err(|_| format!("invalid height in size '{spec}'"))?;
        if width == 0 || height == 0 {
            return Err(format!("size must be non-zero (got '{spec}')"));
        }
        Ok(Self { width, height })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AntialiasSetting {
    Auto,
    Off,
    Samples2,
    Samples4,
    Samples8,
    Samples16,
}

impl AntialiasSetting {
    pub fn from_samples(samples: u32) -> Option<Self> {
        match samples {
            0 | 1 => Some(Self::Off),
            2 => Some(Self::Samples2),
            4 => Some(Self::Samples4),
            8 => Some(Self::Samples8),
            16 => Some(Self::Samples16),
            _ => None,
        }
    }

    /// MSAA sample count, or `None` for `Auto`.
    pub fn samples(self) -> Option<u32> {
        match self {
            Self::Auto => None,
            Self::Off => Some(1),
            Self::Samples2 => Some(2),
            Self::Samples4 => Some(4),
            Self::Samples8 => Some(8),
            Self::Samples16 => Some(16),
        }
    }
}

impl FromStr for AntialiasSetting {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "auto" | "max" | "default" => Ok(Self::Auto),
            "off" | "none" | "disable" | "disabled" => Ok(Self::Off),
            other => other
                .parse::<u32>()
                .ok()
                .and_then(Self::from_samples)
                .ok_or_else(|| format!("invalid antialias setting '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorSpaceSetting {
    Auto,
    #[serde(alias = "srgb-off")]
    Gamma,
    Linear,
}

impl FromStr for ColorSpaceSetting {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "gamma" | "srgb-off" => Ok(Self::Gamma),
            "linear" => Ok(Self::Linear),
            other => Err(format!(
                "invalid color space '{other}'; expected auto, gamma or linear"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GpuPowerSetting {
    Low,
    High,
}

impl FromStr for GpuPowerSetting {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "low" | "low-power" | "integrated" => Ok(Self::Low),
            "high" | "high-performance" | "discrete" => Ok(Self::High),
            other => Err(format!("invalid GPU power preference '{other}'; expected low or high")),
        }
    }
}

fn deserialize_duration_opt<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    struct Visitor;
    impl<'de> de::Visitor<'de> for Visitor {
        type Value = Option<Duration>;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a duration as number of seconds or human-readable string")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            humantime::parse_duration(v)
                .map(Some)
                .map_err(|err| E::custom(format!("invalid duration '{v}': {err}")))
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            u64::try_from(v)
                .map(|secs| Some(Duration::from_secs(secs)))
                .map_err(|_| E::custom("duration must be non-negative"))
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(Duration::from_secs(v)))
        }

        fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if !v.is_finite() || v.is_sign_negative() {
                return Err(E::custom("duration must be a non-negative number"));
            }
            Duration::try_from_secs_f64(v)
                .map(Some)
                .map_err(|err| E::custom(format!("invalid duration {v}: {err}")))
        }
    }

    deserializer.deserialize_any(Visitor)
}

fn deserialize_size_opt<'de, D>(deserializer: D) -> Result<Option<SurfaceSize>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    raw.map(|raw| raw.parse().map_err(de::Error::custom))
        .transpose()
}

fn deserialize_antialias_opt<'de, D>(deserializer: D) -> Result<Option<AntialiasSetting>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Helper {
        Str(String),
        Num(i64),
    }

    let helper: Option<Helper> = Option::deserialize(deserializer)?;
    let result = match helper {
        None => None,
        Some(Helper::Str(raw)) => Some(raw.parse().map_err(de::Error::custom)?),
        Some(Helper::Num(value)) => {
            if value < 0 {
                return Err(de::Error::custom("antialias value must be non-negative"));
            }
            Some(value.to_string().parse().map_err(de::Error::custom)?)
        }
    };
    Ok(result)
}

impl FieldSection {
    /// Layers the configured values over `base`.
    pub fn apply(&self, base: FieldParams) -> FieldParams {
        FieldParams {
            drift_rate: self.drift_rate.unwrap_or(base.drift_rate),
            secondary_drift_ratio: self
                .secondary_drift_ratio
                .unwrap_or(base.secondary_drift_ratio),
            octaves: self.octaves.unwrap_or(base.octaves),
            primary_scale: self.primary_scale.unwrap_or(base.primary_scale),
            secondary_scale: self.secondary_scale.unwrap_or(base.secondary_scale),
        }
    }
}

impl GlowConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let raw: GlowConfig = toml::from_str(input)?;
        raw.validate()?;
        Ok(raw)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let input = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&input)
    }

    /// Field constants after applying `[field]` over the defaults.
    pub fn field_params(&self) -> FieldParams {
        self.field.apply(FieldParams::default())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != CONFIG_VERSION {
            return Err(ConfigError::Invalid(format!(
                "unsupported config version {}; expected {CONFIG_VERSION}",
                self.version
            )));
        }

        if let Some(fps) = self.window.fps {
            if !fps.is_finite() || fps < 0.0 {
                return Err(ConfigError::Invalid("window.fps must be >= 0".into()));
            }
        }

        self.field_params()
            .validate()
            .map_err(|err| ConfigError::Invalid(format!("field: {err}")))?;

        Ok(())
    }
}
