//! Equipment model and inventory filter types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::ToSchema;
use validator::Validate;

/// Device category used for inventory filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
pub enum DeviceType {
    Multimeter,
    PowerSupply,
    Oscilloscope,
    SignalGenerator,
    Mcu,
    Sensor,
    Other,
}

impl DeviceType {
    /// Display string, matching the values stored in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceType::Multimeter => "Multimeter",
            DeviceType::PowerSupply => "Power Supply",
            DeviceType::Oscilloscope => "Oscilloscope",
            DeviceType::SignalGenerator => "Signal generator",
            DeviceType::Mcu => "MCU",
            DeviceType::Sensor => "Sensor",
            DeviceType::Other => "Other",
        }
    }
}

impl std::fmt::Display for DeviceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// Serialized with the display spelling so API payloads match the stored values
impl Serialize for DeviceType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DeviceType {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl std::str::FromStr for DeviceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Accept both the display spelling and the compact spelling
        match s.to_lowercase().replace(' ', "").as_str() {
            "multimeter" => Ok(DeviceType::Multimeter),
            "powersupply" => Ok(DeviceType::PowerSupply),
            "oscilloscope" => Ok(DeviceType::Oscilloscope),
            "signalgenerator" => Ok(DeviceType::SignalGenerator),
            "mcu" => Ok(DeviceType::Mcu),
            "sensor" => Ok(DeviceType::Sensor),
            "other" => Ok(DeviceType::Other),
            _ => Err(format!("Invalid device type: {}", s)),
        }
    }
}

// SQLx conversion for DeviceType (stored as text)
impl sqlx::Type<Postgres> for DeviceType {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for DeviceType {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for DeviceType {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        let s: String = self.as_str().to_string();
        <String as Encode<Postgres>>::encode(s, buf)
    }
}

/// Internal row structure for equipment queries joined with the holder
#[derive(Debug, Clone, FromRow)]
pub struct EquipmentRow {
    id: i32,
    device: String,
    device_type: DeviceType,
    serial: String,
    held_by: Option<i32>,
    holder_name: Option<String>,
    description: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<EquipmentRow> for Equipment {
    fn from(row: EquipmentRow) -> Self {
        Equipment {
            id: row.id,
            device: row.device,
            device_type: row.device_type,
            serial: row.serial,
            status: row
                .holder_name
                .unwrap_or_else(|| Equipment::STATUS_AVAILABLE.to_string()),
            held_by: row.held_by,
            description: row.description,
            created_at: row.created_at,
        }
    }
}

/// Equipment record with the hold status resolved to a display string
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Equipment {
    pub id: i32,
    pub device: String,
    pub device_type: DeviceType,
    pub serial: String,
    /// "Available" or the name of the current holder
    pub status: String,
    /// Holder's user id, if the item is held
    pub held_by: Option<i32>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Equipment {
    pub const STATUS_AVAILABLE: &'static str = "Available";

    pub fn is_available(&self) -> bool {
        self.held_by.is_none()
    }
}

/// Create equipment request (admin)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateEquipment {
    #[validate(length(min = 1, message = "Device name is required"))]
    pub device: String,
    pub device_type: DeviceType,
    #[validate(length(min = 1, message = "Serial is required"))]
    pub serial: String,
    /// "Available" or the name of an existing user; defaults to "Available"
    pub status: Option<String>,
    pub description: Option<String>,
}

/// Update equipment request (admin) - full overwrite of all fields
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateEquipment {
    #[validate(length(min = 1, message = "Device name is required"))]
    pub device: String,
    pub device_type: DeviceType,
    #[validate(length(min = 1, message = "Serial is required"))]
    pub serial: String,
    /// "Available" or the name of an existing user
    pub status: String,
    pub description: Option<String>,
}

/// Inventory view filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InventoryFilter {
    /// Every record
    All,
    /// Records held by the caller
    Mine,
    /// Records of one device category
    Type(DeviceType),
}

impl InventoryFilter {
    /// Parse a filter value from a query string or form field.
    ///
    /// Accepts the wire spellings used by the original dashboard forms
    /// ("All Devices"/"All", "My Workbench"/"My", "Signal"). Absent or
    /// unrecognized values fall back to showing everything; the GET/POST
    /// default asymmetry of the original forms is unified here.
    pub fn parse(raw: Option<&str>) -> Self {
        let raw = match raw.map(str::trim) {
            Some(s) if !s.is_empty() => s,
            _ => return InventoryFilter::All,
        };
        match raw {
            "All" | "All Devices" => InventoryFilter::All,
            "My" | "My Workbench" => InventoryFilter::Mine,
            "Signal" => InventoryFilter::Type(DeviceType::SignalGenerator),
            other => other
                .parse::<DeviceType>()
                .map(InventoryFilter::Type)
                .unwrap_or(InventoryFilter::All),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_type_accepts_both_spellings() {
        assert_eq!("Power Supply".parse::<DeviceType>().unwrap(), DeviceType::PowerSupply);
        assert_eq!("PowerSupply".parse::<DeviceType>().unwrap(), DeviceType::PowerSupply);
        assert_eq!("Signal generator".parse::<DeviceType>().unwrap(), DeviceType::SignalGenerator);
        assert_eq!("MCU".parse::<DeviceType>().unwrap(), DeviceType::Mcu);
        assert!("Teapot".parse::<DeviceType>().is_err());
    }

    #[test]
    fn device_type_display_round_trip() {
        for t in [
            DeviceType::Multimeter,
            DeviceType::PowerSupply,
            DeviceType::Oscilloscope,
            DeviceType::SignalGenerator,
            DeviceType::Mcu,
            DeviceType::Sensor,
            DeviceType::Other,
        ] {
            assert_eq!(t.as_str().parse::<DeviceType>().unwrap(), t);
        }
    }

    #[test]
    fn filter_parses_dashboard_spellings() {
        assert_eq!(InventoryFilter::parse(Some("All Devices")), InventoryFilter::All);
        assert_eq!(InventoryFilter::parse(Some("All")), InventoryFilter::All);
        assert_eq!(InventoryFilter::parse(Some("My Workbench")), InventoryFilter::Mine);
        assert_eq!(InventoryFilter::parse(Some("My")), InventoryFilter::Mine);
        assert_eq!(
            InventoryFilter::parse(Some("Signal")),
            InventoryFilter::Type(DeviceType::SignalGenerator)
        );
        assert_eq!(
            InventoryFilter::parse(Some("Multimeter")),
            InventoryFilter::Type(DeviceType::Multimeter)
        );
    }

    #[test]
    fn filter_defaults_to_all() {
        assert_eq!(InventoryFilter::parse(None), InventoryFilter::All);
        assert_eq!(InventoryFilter::parse(Some("")), InventoryFilter::All);
        assert_eq!(InventoryFilter::parse(Some("Unknown")), InventoryFilter::All);
    }

    #[test]
    fn row_resolves_status_to_holder_name() {
        let row = EquipmentRow {
            id: 1,
            device: "DE-208E".to_string(),
            device_type: DeviceType::Multimeter,
            serial: "N00016141".to_string(),
            held_by: Some(7),
            holder_name: Some("Alice".to_string()),
            description: None,
            created_at: Utc::now(),
        };
        let equipment: Equipment = row.into();
        assert_eq!(equipment.status, "Alice");
        assert!(!equipment.is_available());
    }

    #[test]
    fn row_without_holder_is_available() {
        let row = EquipmentRow {
            id: 1,
            device: "DE-208E".to_string(),
            device_type: DeviceType::Multimeter,
            serial: "N00016141".to_string(),
            held_by: None,
            holder_name: None,
            description: None,
            created_at: Utc::now(),
        };
        let equipment: Equipment = row.into();
        assert_eq!(equipment.status, Equipment::STATUS_AVAILABLE);
        assert!(equipment.is_available());
    }
}
