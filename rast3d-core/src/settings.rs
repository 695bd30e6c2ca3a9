/// Named numeric parameters that feed the camera and geometry each frame
///
/// Parameters are declared up front with their bounds and can be exported to, and
/// restored from, a URL-query style share string such as `fov=1.5&speed=20`.
use nom::{
    bytes::complete::take_while1,
    character::complete::char,
    combinator::{all_consuming, opt},
    multi::separated_list0,
    number::complete::double,
    sequence::{preceded, separated_pair},
    IResult,
};

pub const FOV: &str = "fov";
pub const SPEED: &str = "speed";
pub const LINE_SIZE: &str = "line-size";

/// Errors raised while reading or changing parameters
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Unknown parameter: {0}")]
    UnknownParam(String),
    #[error("Malformed share string: {0}")]
    Malformed(String),
    #[error("Parameter {id} must be finite, got {value}")]
    NotFinite { id: String, value: f64 },
}

/// How a parameter is presented to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// A slider
    Range,
    /// A free number input
    Number,
}

/// Declaration of one parameter
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    pub id: &'static str,
    pub label: &'static str,
    pub kind: ParamKind,
    pub default: f64,
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl ParamSpec {
    pub fn range(id: &'static str, label: &'static str, default: f64) -> Self {
        Self {
            id,
            label,
            kind: ParamKind::Range,
            default,
            min: f64::NEG_INFINITY,
            max: f64::INFINITY,
            step: 1.0,
        }
    }

    pub fn number(id: &'static str, label: &'static str, default: f64) -> Self {
        Self {
            kind: ParamKind::Number,
            ..Self::range(id, label, default)
        }
    }

    pub fn bounds(mut self, min: f64, max: f64) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    pub fn step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    fn clamp(&self, value: f64) -> f64 {
        value.max(self.min).min(self.max)
    }
}

/// The parameters every scene is driven by
pub fn default_specs() -> Vec<ParamSpec> {
    vec![
        ParamSpec::range(FOV, "Field of vision", 1.0)
            .bounds(0.2, 5.0)
            .step(0.1),
        ParamSpec::range(SPEED, "Rotation speed", 10.0)
            .bounds(0.1, 100.0)
            .step(0.1),
        ParamSpec::number(LINE_SIZE, "Line size", 1.0)
            .bounds(0.1, 10.0)
            .step(0.1),
    ]
}

/// Current values for a set of declared parameters
#[derive(Debug, Clone, PartialEq)]
pub struct ParamConfig {
    specs: Vec<ParamSpec>,
    values: Vec<f64>,
}

impl ParamConfig {
    pub fn new(specs: Vec<ParamSpec>) -> Self {
        let values = specs.iter().map(|spec| spec.clamp(spec.default)).collect();
        Self { specs, values }
    }

    fn position(&self, id: &str) -> Result<usize, ConfigError> {
        self.specs
            .iter()
            .position(|spec| spec.id == id)
            .ok_or_else(|| ConfigError::UnknownParam(id.to_string()))
    }

    pub fn get(&self, id: &str) -> Option<f64> {
        self.position(id).ok().map(|i| self.values[i])
    }

    /// Set a value, clamped to the parameter's bounds. Returns the stored value.
    pub fn set(&mut self, id: &str, value: f64) -> Result<f64, ConfigError> {
        let i = self.position(id)?;
        if !value.is_finite() {
            return Err(ConfigError::NotFinite {
                id: id.to_string(),
                value,
            });
        }
        self.values[i] = self.specs[i].clamp(value);
        Ok(self.values[i])
    }

    /// Move a value by whole steps
    pub fn nudge(&mut self, id: &str, steps: i32) -> Result<f64, ConfigError> {
        let i = self.position(id)?;
        let value = self.values[i] + self.specs[i].step * steps as f64;
        self.set(id, value)
    }

    pub fn reset(&mut self) {
        for (value, spec) in self.values.iter_mut().zip(&self.specs) {
            *value = spec.clamp(spec.default);
        }
    }

    /// `id=value` pairs joined by `&`, in declaration order
    pub fn to_share_string(&self) -> String {
        self.specs
            .iter()
            .zip(&self.values)
            .map(|(spec, value)| format!("{}={}", spec.id, value))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Apply a share string. Nothing changes unless every pair is valid.
    pub fn apply_share_string(&mut self, input: &str) -> Result<(), ConfigError> {
        let (_, pairs) = parse_share_string(input.trim())
            .map_err(|e| ConfigError::Malformed(format!("{:?}", e)))?;

        let mut updated = self.clone();
        for (id, value) in pairs {
            updated.set(id, value)?;
        }
        *self = updated;
        Ok(())
    }
}

impl Default for ParamConfig {
    fn default() -> Self {
        Self::new(default_specs())
    }
}

fn parse_share_string(input: &str) -> IResult<&str, Vec<(&str, f64)>> {
    all_consuming(preceded(
        opt(char('?')),
        separated_list0(char('&'), parse_pair),
    ))(input)
}

fn parse_pair(input: &str) -> IResult<&str, (&str, f64)> {
    separated_pair(
        take_while1(|c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_'),
        char('='),
        double,
    )(input)
}
