use serde::{Deserialize, Serialize};

/// Offset between the Celsius and Kelvin scales.
pub const KELVIN_OFFSET: f64 = 273.15;

/// City-level record resolved from a CEP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locality {
    pub city: String,
    pub state: String,
}

/// Current conditions as reported by the weather provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    pub temp_c: f64,
    pub temp_f: f64,
}

/// Values bound into the success template.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemperatureResult {
    #[serde(rename = "TempC")]
    pub temp_c: f64,
    #[serde(rename = "TempF")]
    pub temp_f: f64,
    #[serde(rename = "TempK")]
    pub temp_k: f64,
    #[serde(rename = "Cidade")]
    pub city: String,
}

impl TemperatureResult {
    /// Fahrenheit is taken verbatim from the provider so its rounding is kept.
    pub fn new(reading: WeatherReading, city: impl Into<String>) -> Self {
        Self {
            temp_c: reading.temp_c,
            temp_f: reading.temp_f,
            temp_k: celsius_to_kelvin(reading.temp_c),
            city: city.into(),
        }
    }
}

pub fn celsius_to_kelvin(temp_c: f64) -> f64 {
    temp_c + KELVIN_OFFSET
}
