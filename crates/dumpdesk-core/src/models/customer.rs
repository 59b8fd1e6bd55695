use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    #[serde(rename = "fullName")]
    pub full_name: String,
    pub email: String,
    #[serde(rename = "phoneNumber")]
    pub phone_number: String,
    #[serde(rename = "cpForCNPJ", default)]
    pub cpf_or_cnpj: Option<String>,
    #[serde(rename = "registeredAt")]
    pub registered_at: String,
    #[serde(rename = "defaultAddress", default)]
    pub default_address: Option<String>,
    #[serde(rename = "additionalInfo", default)]
    pub additional_info: Option<String>,
    #[serde(rename = "receivesPromotions", default)]
    pub receives_promotions: bool,
}

impl Customer {
    pub fn to_update(&self) -> UpdateCustomerPayload {
        UpdateCustomerPayload {
            id: self.id.clone(),
            full_name: self.full_name.clone(),
            phone_number: self.phone_number.clone(),
            cpf_or_cnpj: self.cpf_or_cnpj.clone(),
            default_address: self.default_address.clone(),
            additional_info: self.additional_info.clone(),
            receives_promotions: self.receives_promotions,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateCustomerPayload {
    #[serde(rename = "fullName")]
    pub full_name: String,
    pub email: String,
    #[serde(rename = "phoneNumber")]
    pub phone_number: String,
    pub password: String,
    #[serde(rename = "cpForCNPJ", skip_serializing_if = "Option::is_none")]
    pub cpf_or_cnpj: Option<String>,
    #[serde(rename = "defaultAddress", skip_serializing_if = "Option::is_none")]
    pub default_address: Option<String>,
    #[serde(rename = "additionalInfo", skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<String>,
    #[serde(rename = "receivesPromotions")]
    pub receives_promotions: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateCustomerPayload {
    pub id: String,
    #[serde(rename = "fullName")]
    pub full_name: String,
    #[serde(rename = "phoneNumber")]
    pub phone_number: String,
    #[serde(rename = "cpForCNPJ", skip_serializing_if = "Option::is_none")]
    pub cpf_or_cnpj: Option<String>,
    #[serde(rename = "defaultAddress", skip_serializing_if = "Option::is_none")]
    pub default_address: Option<String>,
    #[serde(rename = "additionalInfo", skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<String>,
    #[serde(rename = "receivesPromotions")]
    pub receives_promotions: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_customer_with_nulls() {
        let json = r#"{
            "id": "c1",
            "fullName": "José Lima",
            "email": "jose@example.com",
            "phoneNumber": "11987654321",
            "cpForCNPJ": null,
            "registeredAt": "2024-01-02T03:04:05Z",
            "defaultAddress": null,
            "additionalInfo": null,
            "receivesPromotions": true
        }"#;
        let customer: Customer = serde_json::from_str(json).expect("parse");
        assert_eq!(customer.cpf_or_cnpj, None);
        assert!(customer.receives_promotions);
    }

    #[test]
    fn test_to_update_keeps_identity() {
        let customer = Customer {
            id: "c2".to_string(),
            full_name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            phone_number: "1133334444".to_string(),
            cpf_or_cnpj: Some("12345678000195".to_string()),
            registered_at: String::new(),
            default_address: None,
            additional_info: None,
            receives_promotions: false,
        };
        let update = customer.to_update();
        let json = serde_json::to_value(&update).expect("serialize");
        assert_eq!(json["id"], "c2");
        assert_eq!(json["cpForCNPJ"], "12345678000195");
        assert!(json.get("defaultAddress").is_none());
        // Email is not editable
        assert!(json.get("email").is_none());
    }

    #[test]
    fn test_create_payload_wire_shape() {
        let payload = CreateCustomerPayload {
            full_name: "Ana Costa".to_string(),
            email: "ana@example.com".to_string(),
            phone_number: "11987654321".to_string(),
            password: "s3cret!".to_string(),
            cpf_or_cnpj: None,
            default_address: Some("Rua A, 10".to_string()),
            additional_info: None,
            receives_promotions: true,
        };
        let json = serde_json::to_value(&payload).expect("serialize");
        assert_eq!(json["fullName"], "Ana Costa");
        assert_eq!(json["email"], "ana@example.com");
        assert_eq!(json["password"], "s3cret!");
        assert_eq!(json["defaultAddress"], "Rua A, 10");
        assert_eq!(json["receivesPromotions"], true);
        assert!(json.get("cpForCNPJ").is_none());
        assert!(json.get("additionalInfo").is_none());
    }
}
