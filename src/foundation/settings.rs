/// Environment variable read by [`RasterSettings::from_env`].
pub const ACCEL_ENV: &str = "LAZYRASTER_ACCEL";

/// Settings shared by bitmaps and devices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RasterSettings {
    /// Whether blends and draws may create and prefer accelerated images.
    pub accelerated: bool,
}

impl Default for RasterSettings {
    fn default() -> Self {
        Self { accelerated: true }
    }
}

impl RasterSettings {
    /// Settings with acceleration turned off.
    pub fn software() -> Self {
        Self { accelerated: false }
    }

    /// Defaults, overridden by `LAZYRASTER_ACCEL` when set.
    pub fn from_env() -> Self {
        Self::default().with_env()
    }

    /// These settings, overridden by `LAZYRASTER_ACCEL` when set.
    pub fn with_env(self) -> Self {
        match std::env::var(ACCEL_ENV) {
            Ok(v) => self.with_accel_value(&v),
            Err(_) => self,
        }
    }

    fn with_accel_value(mut self, raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "0" | "false" | "off" | "no" => self.accelerated = false,
            "1" | "true" | "on" | "yes" => self.accelerated = true,
            other => tracing::warn!(value = other, "ignoring unrecognized LAZYRASTER_ACCEL value"),
        }
        self
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/settings.rs"]
mod tests;
