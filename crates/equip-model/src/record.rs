use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// One validated row of an equipment upload.
///
/// Fields are private to keep the non-empty and finite invariants; build
/// records through [`EquipmentRecord::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRecord")]
pub struct EquipmentRecord {
    equipment_name: String,
    equipment_type: String,
    flowrate: f64,
    pressure: f64,
    temperature: f64,
}

impl EquipmentRecord {
    pub fn new(
        equipment_name: impl Into<String>,
        equipment_type: impl Into<String>,
        flowrate: f64,
        pressure: f64,
        temperature: f64,
    ) -> Result<Self> {
        let equipment_name = trimmed(equipment_name.into());
        if equipment_name.is_empty() {
            return Err(ModelError::EmptyEquipmentName);
        }
        let equipment_type = trimmed(equipment_type.into());
        if equipment_type.is_empty() {
            return Err(ModelError::EmptyEquipmentType);
        }
        Ok(Self {
            equipment_name,
            equipment_type,
            flowrate: finite("flowrate", flowrate)?,
            pressure: finite("pressure", pressure)?,
            temperature: finite("temperature", temperature)?,
        })
    }

    pub fn equipment_name(&self) -> &str {
        &self.equipment_name
    }

    pub fn equipment_type(&self) -> &str {
        &self.equipment_type
    }

    pub fn flowrate(&self) -> f64 {
        self.flowrate
    }

    pub fn pressure(&self) -> f64 {
        self.pressure
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }
}

fn trimmed(value: String) -> String {
    let trimmed = value.trim();
    if trimmed.len() == value.len() {
        value
    } else {
        trimmed.to_string()
    }
}

fn finite(field: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ModelError::NonFiniteValue {
            field,
            value: value.to_string(),
        })
    }
}

/// Unchecked wire shape; deserialization re-validates through `new`.
#[derive(Deserialize)]
struct RawRecord {
    equipment_name: String,
    equipment_type: String,
    flowrate: f64,
    pressure: f64,
    temperature: f64,
}

impl TryFrom<RawRecord> for EquipmentRecord {
    type Error = ModelError;

    fn try_from(raw: RawRecord) -> Result<Self> {
        Self::new(
            raw.equipment_name,
            raw.equipment_type,
            raw.flowrate,
            raw.pressure,
            raw.temperature,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_text_fields() {
        let record = EquipmentRecord::new("  Pump-1 ", " Centrifugal", 1.0, 2.0, 3.0).unwrap();
        assert_eq!(record.equipment_name(), "Pump-1");
        assert_eq!(record.equipment_type(), "Centrifugal");
    }

    #[test]
    fn rejects_blank_name() {
        let err = EquipmentRecord::new("   ", "Gate", 1.0, 2.0, 3.0).unwrap_err();
        assert_eq!(err, ModelError::EmptyEquipmentName);
    }

    #[test]
    fn rejects_non_finite_values() {
        let err = EquipmentRecord::new("Valve", "Gate", f64::NAN, 2.0, 3.0).unwrap_err();
        assert!(matches!(
            err,
            ModelError::NonFiniteValue {
                field: "flowrate",
                ..
            }
        ));
        let err = EquipmentRecord::new("Valve", "Gate", 1.0, 2.0, f64::INFINITY).unwrap_err();
        assert!(matches!(
            err,
            ModelError::NonFiniteValue {
                field: "temperature",
                ..
            }
        ));
    }
}
