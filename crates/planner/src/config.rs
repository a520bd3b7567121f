use castplan_core::{CastPlanError, Result};
use castplan_orders::FlaskSize;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Immutable plant capacities for one planning run.
#[derive(Debug, Clone)]
pub struct ResourceConfig {
    pub max_molds_per_day: u32,
    pub max_same_part_molds_per_day: u32,
    pub max_pouring_tons_per_day: f64,
    pub max_patterns_per_day: u32,
    pub max_staging_molds: u32,
    pub flask_limits: HashMap<FlaskSize, u32>,
    /// Per-family cap as a fraction of `max_molds_per_day`. Families absent
    /// from the map are uncapped.
    pub product_family_max_mix: HashMap<String, f64>,
}

#[derive(Debug, Deserialize)]
struct RawResourceConfig {
    max_molds_per_day: u32,
    max_same_part_molds_per_day: u32,
    max_pouring_tons_per_day: f64,
    max_patterns_per_day: u32,
    max_staging_molds: u32,
    flask_limits: HashMap<FlaskSize, u32>,
    #[serde(default)]
    product_family_max_mix: HashMap<String, String>,
}

impl ResourceConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self> {
        let raw: RawResourceConfig = serde_yaml::from_str(text)?;

        let mut product_family_max_mix = HashMap::new();
        for (family, percentage) in raw.product_family_max_mix {
            let fraction = parse_percentage(&percentage)?;
            product_family_max_mix.insert(family, fraction);
        }

        let config = Self {
            max_molds_per_day: raw.max_molds_per_day,
            max_same_part_molds_per_day: raw.max_same_part_molds_per_day,
            max_pouring_tons_per_day: raw.max_pouring_tons_per_day,
            max_patterns_per_day: raw.max_patterns_per_day,
            max_staging_molds: raw.max_staging_molds,
            flask_limits: raw.flask_limits,
            product_family_max_mix,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_molds_per_day == 0 {
            return Err(CastPlanError::Config(
                "max_molds_per_day must be at least 1".to_string(),
            ));
        }
        if self.max_same_part_molds_per_day == 0 {
            return Err(CastPlanError::Config(
                "max_same_part_molds_per_day must be at least 1".to_string(),
            ));
        }
        if self.max_pouring_tons_per_day <= 0.0 {
            return Err(CastPlanError::Config(
                "max_pouring_tons_per_day must be positive".to_string(),
            ));
        }
        // the pattern walk advances only when a day has a free slot
        if self.max_patterns_per_day == 0 {
            return Err(CastPlanError::Config(
                "max_patterns_per_day must be at least 1".to_string(),
            ));
        }
        if self.max_staging_molds == 0 {
            return Err(CastPlanError::Config(
                "max_staging_molds must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn flask_limit(&self, size: FlaskSize) -> u32 {
        self.flask_limits.get(&size).copied().unwrap_or(0)
    }
}

fn parse_percentage(text: &str) -> Result<f64> {
    let number = text
        .trim()
        .strip_suffix('%')
        .ok_or_else(|| {
            CastPlanError::Config(format!("expected a percentage like \"40%\", got {:?}", text))
        })?
        .trim();
    let value: f64 = number
        .parse()
        .map_err(|_| CastPlanError::Config(format!("invalid percentage: {:?}", text)))?;
    if value <= 0.0 || value > 100.0 {
        return Err(CastPlanError::Config(format!(
            "percentage out of range (0, 100]: {:?}",
            text
        )));
    }
    Ok(value / 100.0)
}
