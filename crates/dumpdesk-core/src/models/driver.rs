use serde::{Deserialize, Serialize};

/// PIX payment key kinds accepted by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PixKeyType {
    #[serde(rename = "CPF")]
    Cpf,
    #[serde(rename = "CNPJ")]
    Cnpj,
    Email,
    Phone,
    Random,
}

impl PixKeyType {
    pub const ALL: [PixKeyType; 5] = [
        PixKeyType::Cpf,
        PixKeyType::Cnpj,
        PixKeyType::Email,
        PixKeyType::Phone,
        PixKeyType::Random,
    ];
}

impl std::fmt::Display for PixKeyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PixKeyType::Cpf => write!(f, "CPF"),
            PixKeyType::Cnpj => write!(f, "CNPJ"),
            PixKeyType::Email => write!(f, "Email"),
            PixKeyType::Phone => write!(f, "Phone"),
            PixKeyType::Random => write!(f, "Random"),
        }
    }
}

/// A dumpster truck driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    pub id: String,
    #[serde(rename = "fullName")]
    pub full_name: String,
    pub email: String,
    #[serde(rename = "phoneNumber")]
    pub phone_number: String,
    #[serde(default)]
    pub cpf: Option<String>,
    #[serde(rename = "cnhNumber", default)]
    pub cnh_number: Option<String>,
    #[serde(rename = "licenseExpiration")]
    pub license_expiration: String,
    #[serde(rename = "vehiclePlate", default)]
    pub vehicle_plate: Option<String>,
    #[serde(rename = "vehicleType", default)]
    pub vehicle_type: Option<String>,
    #[serde(rename = "vehicleModel", default)]
    pub vehicle_model: Option<String>,
    #[serde(rename = "vehicleColor", default)]
    pub vehicle_color: Option<String>,
    #[serde(rename = "dumpsterSizeInCubicMeters", default)]
    pub dumpster_size_m3: Option<f64>,
    #[serde(rename = "registeredAt")]
    pub registered_at: String,
    #[serde(rename = "isAvailable", default)]
    pub is_available: bool,
    #[serde(rename = "pixKey", default)]
    pub pix_key: Option<String>,
    #[serde(rename = "pixKeyType", default)]
    pub pix_key_type: Option<PixKeyType>,
    #[serde(rename = "creditBalance", default)]
    pub credit_balance: Option<f64>,
}

impl Driver {
    /// "Model (Color) - PLATE", skipping missing parts.
    pub fn vehicle_display(&self) -> String {
        let mut out = String::new();
        if let Some(ref model) = self.vehicle_model {
            out.push_str(model);
        }
        if let Some(ref color) = self.vehicle_color {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(&format!("({})", color));
        }
        if let Some(ref plate) = self.vehicle_plate {
            if !out.is_empty() {
                out.push_str(" - ");
            }
            out.push_str(plate);
        }
        if out.is_empty() {
            "No vehicle".to_string()
        } else {
            out
        }
    }

    pub fn availability_display(&self) -> &'static str {
        if self.is_available {
            "Available"
        } else {
            "Unavailable"
        }
    }

    pub fn to_update(&self) -> UpdateDriverPayload {
        UpdateDriverPayload {
            id: self.id.clone(),
            full_name: self.full_name.clone(),
            phone_number: self.phone_number.clone(),
            cpf: self.cpf.clone(),
            cnh_number: self.cnh_number.clone(),
            license_expiration: self.license_expiration.clone(),
            vehicle_plate: self.vehicle_plate.clone(),
            vehicle_type: self.vehicle_type.clone(),
            vehicle_model: self.vehicle_model.clone(),
            vehicle_color: self.vehicle_color.clone(),
            dumpster_size_m3: self.dumpster_size_m3,
            is_available: self.is_available,
            pix_key: self.pix_key.clone(),
            pix_key_type: self.pix_key_type,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateDriverPayload {
    #[serde(rename = "fullName")]
    pub full_name: String,
    pub email: String,
    #[serde(rename = "phoneNumber")]
    pub phone_number: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpf: Option<String>,
    #[serde(rename = "cnhNumber", skip_serializing_if = "Option::is_none")]
    pub cnh_number: Option<String>,
    #[serde(rename = "licenseExpiration")]
    pub license_expiration: String,
    #[serde(rename = "vehiclePlate", skip_serializing_if = "Option::is_none")]
    pub vehicle_plate: Option<String>,
    #[serde(rename = "vehicleType", skip_serializing_if = "Option::is_none")]
    pub vehicle_type: Option<String>,
    #[serde(rename = "vehicleModel", skip_serializing_if = "Option::is_none")]
    pub vehicle_model: Option<String>,
    #[serde(rename = "vehicleColor", skip_serializing_if = "Option::is_none")]
    pub vehicle_color: Option<String>,
    #[serde(
        rename = "dumpsterSizeInCubicMeters",
        skip_serializing_if = "Option::is_none"
    )]
    pub dumpster_size_m3: Option<f64>,
    #[serde(rename = "isAvailable")]
    pub is_available: bool,
    #[serde(rename = "pixKey", skip_serializing_if = "Option::is_none")]
    pub pix_key: Option<String>,
    #[serde(rename = "pixKeyType", skip_serializing_if = "Option::is_none")]
    pub pix_key_type: Option<PixKeyType>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateDriverPayload {
    pub id: String,
    #[serde(rename = "fullName")]
    pub full_name: String,
    #[serde(rename = "phoneNumber")]
    pub phone_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpf: Option<String>,
    #[serde(rename = "cnhNumber", skip_serializing_if = "Option::is_none")]
    pub cnh_number: Option<String>,
    #[serde(rename = "licenseExpiration")]
    pub license_expiration: String,
    #[serde(rename = "vehiclePlate", skip_serializing_if = "Option::is_none")]
    pub vehicle_plate: Option<String>,
    #[serde(rename = "vehicleType", skip_serializing_if = "Option::is_none")]
    pub vehicle_type: Option<String>,
    #[serde(rename = "vehicleModel", skip_serializing_if = "Option::is_none")]
    pub vehicle_model: Option<String>,
    #[serde(rename = "vehicleColor", skip_serializing_if = "Option::is_none")]
    pub vehicle_color: Option<String>,
    #[serde(
        rename = "dumpsterSizeInCubicMeters",
        skip_serializing_if = "Option::is_none"
    )]
    pub dumpster_size_m3: Option<f64>,
    #[serde(rename = "isAvailable")]
    pub is_available: bool,
    #[serde(rename = "pixKey", skip_serializing_if = "Option::is_none")]
    pub pix_key: Option<String>,
    #[serde(rename = "pixKeyType", skip_serializing_if = "Option::is_none")]
    pub pix_key_type: Option<PixKeyType>,
}
