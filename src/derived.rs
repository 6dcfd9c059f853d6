//! Values derived from recorded samples for the live readout
//!
//! Missing inputs never produce an error here: the readout shows `0` until
//! the first sample arrives.

use std::time::Duration;

/// Decimal places shown for acceleration and pressure readouts
pub const READOUT_DECIMALS: usize = 5;

/// Euclidean norm of the three axes, rounded to five decimal places
///
/// Returns `0.0` when any axis is missing or the result is not finite.
pub fn acceleration_magnitude(x: Option<f64>, y: Option<f64>, z: Option<f64>) -> f64 {
    let (Some(x), Some(y), Some(z)) = (x, y, z) else {
        return 0.0;
    };

    let norm = (x * x + y * y + z * z).sqrt();
    if !norm.is_finite() {
        return 0.0;
    }

    let scale = 10f64.powi(READOUT_DECIMALS as i32);
    (norm * scale).round() / scale
}

/// Magnitude as displayed: `5.00000`, or `0` when it cannot be computed
pub fn format_magnitude(x: Option<f64>, y: Option<f64>, z: Option<f64>) -> String {
    match (x, y, z) {
        (Some(x), Some(y), Some(z)) if (x * x + y * y + z * z).sqrt().is_finite() => {
            format!(
                "{:.*}",
                READOUT_DECIMALS,
                acceleration_magnitude(Some(x), Some(y), Some(z))
            )
        }
        _ => "0".to_string(),
    }
}

/// Pressure as displayed, with missing values shown as zero
pub fn format_pressure(hpa: Option<f64>) -> String {
    let value = hpa.filter(|p| p.is_finite()).unwrap_or(0.0);
    format!("{:.*}", READOUT_DECIMALS, value)
}

/// Elapsed time as `m:ss` (minutes unpadded, seconds zero-padded)
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Atmosphere model used for pressure-to-altitude conversion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Atmosphere {
    /// Sea-level standard temperature (K)
    pub sea_level_temperature: f64,
    /// Temperature lapse rate (K/m)
    pub lapse_rate: f64,
    /// Sea-level standard pressure (Pa)
    pub sea_level_pressure: f64,
    /// Universal gas constant (J/(mol·K))
    pub gas_constant: f64,
    /// Gravitational acceleration (m/s²)
    pub gravity: f64,
    /// Molar mass of the air (kg/mol)
    pub molar_mass: f64,
}

const DRY_AIR_MOLAR_MASS: f64 = 0.0289644;
const WATER_VAPOUR_MOLAR_MASS: f64 = 0.0180;

impl Atmosphere {
    /// Standard atmosphere with air of the given relative humidity (0.0..=1.0)
    pub fn with_humidity(humidity: f64) -> Self {
        let humidity = humidity.clamp(0.0, 1.0);
        Self {
            molar_mass: humidity * WATER_VAPOUR_MOLAR_MASS
                + (1.0 - humidity) * DRY_AIR_MOLAR_MASS,
            ..Self::default()
        }
    }

    fn exponent(&self) -> f64 {
        self.gas_constant * self.lapse_rate / (self.gravity * self.molar_mass)
    }

    /// Altitude in metres above the sea-level reference for a pressure in Pa
    pub fn altitude(&self, pressure_pa: f64) -> f64 {
        let ratio = pressure_pa / self.sea_level_pressure;
        self.sea_level_temperature / self.lapse_rate * (1.0 - ratio.powf(self.exponent()))
    }

    /// Altitude change in metres corresponding to a pressure step of `dp` Pa
    /// around `pressure_pa`
    pub fn altitude_uncertainty(&self, pressure_pa: f64, dp: f64) -> f64 {
        let k = self.exponent();
        let coefficient = -(self.sea_level_temperature * self.gas_constant)
            / (self.gravity * self.molar_mass * self.sea_level_pressure.powf(k));
        (coefficient * pressure_pa.powf(k - 1.0)).abs() * dp
    }
}

impl Default for Atmosphere {
    fn default() -> Self {
        Self {
            sea_level_temperature: 288.15,
            lapse_rate: 0.0065,
            sea_level_pressure: 101_325.0,
            gas_constant: 8.314,
            gravity: 9.80665,
            molar_mass: DRY_AIR_MOLAR_MASS,
        }
    }
}

/// Barometers report hPa, the atmosphere model works in Pa
pub fn hpa_to_pa(hpa: f64) -> f64 {
    hpa * 100.0
}
