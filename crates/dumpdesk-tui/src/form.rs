//! Create/edit forms for the entity pages.
//!
//! A form is a flat list of fields and a focus index. The index one past the
//! last field is the Save button. [`EntityForm::submission`] validates the
//! values and builds the request the backend expects.

use std::path::Path;

use anyhow::Result;
use thiserror::Error;

use dumpdesk_core::api::{ApiClient, EntityKind};
use dumpdesk_core::models::{
    Admin, CreateCustomerPayload, CreateDriverPayload, CreateProductPayload, Customer, Driver,
    PixKeyType, Product, ProductImage, UpdateAdminPayload, UpdateCustomerPayload,
    UpdateDriverPayload, UpdateProductPayload,
};
use dumpdesk_core::utils::{date_input, is_valid_date_input};

/// Maximum length of a single text field.
const MAX_FIELD_LENGTH: usize = 200;

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    /// Typed like text, drawn masked
    Secret(String),
    Flag(bool),
    /// Index into `options`; `None` is unset
    Choice {
        options: Vec<String>,
        index: Option<usize>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub key: &'static str,
    pub label: &'static str,
    pub value: FieldValue,
    pub required: bool,
    /// Shown but not editable
    pub locked: bool,
}

impl FormField {
    fn text(key: &'static str, label: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            label,
            value: FieldValue::Text(value.into()),
            required: false,
            locked: false,
        }
    }

    fn secret(key: &'static str, label: &'static str) -> Self {
        Self {
            value: FieldValue::Secret(String::new()),
            ..Self::text(key, label, "")
        }
    }

    fn flag(key: &'static str, label: &'static str, on: bool) -> Self {
        Self {
            value: FieldValue::Flag(on),
            ..Self::text(key, label, "")
        }
    }

    fn choice(
        key: &'static str,
        label: &'static str,
        options: Vec<String>,
        index: Option<usize>,
    ) -> Self {
        Self {
            value: FieldValue::Choice { options, index },
            ..Self::text(key, label, "")
        }
    }

    fn required(mut self) -> Self {
        self.required = true;
        self
    }

    fn locked_if(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }

    /// True for fields edited by typing.
    pub fn accepts_text(&self) -> bool {
        !self.locked && matches!(self.value, FieldValue::Text(_) | FieldValue::Secret(_))
    }

    pub fn display(&self) -> String {
        match &self.value {
            FieldValue::Text(v) => v.clone(),
            FieldValue::Secret(v) => "*".repeat(v.chars().count()),
            FieldValue::Flag(true) => "[x]".to_string(),
            FieldValue::Flag(false) => "[ ]".to_string(),
            FieldValue::Choice { options, index } => match index.and_then(|i| options.get(i)) {
                Some(option) => format!("< {} >", option),
                None => "< - >".to_string(),
            },
        }
    }

    fn is_blank(&self) -> bool {
        match &self.value {
            FieldValue::Text(v) | FieldValue::Secret(v) => v.trim().is_empty(),
            FieldValue::Choice { index, .. } => index.is_none(),
            FieldValue::Flag(_) => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    /// Editing the record with this id
    Edit(String),
}

#[derive(Error, Debug, PartialEq)]
pub enum FormError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("{0} is not a valid email")]
    InvalidEmail(&'static str),

    #[error("{0} must be a number")]
    InvalidNumber(&'static str),

    #[error("{0} must be a date like 2027-03-01")]
    InvalidDate(&'static str),

    #[error("Image: {0}")]
    Image(String),

    #[error("New {0}s cannot be created from the console")]
    Unsupported(&'static str),
}

/// A validated request, ready to send.
#[derive(Debug, Clone)]
pub enum Submission {
    CreateCustomer(CreateCustomerPayload),
    UpdateCustomer(UpdateCustomerPayload),
    CreateDriver(CreateDriverPayload),
    UpdateDriver(UpdateDriverPayload),
    CreateProduct(CreateProductPayload),
    UpdateProduct(UpdateProductPayload),
    UpdateAdmin(String, UpdateAdminPayload),
}

impl Submission {
    pub fn is_create(&self) -> bool {
        matches!(
            self,
            Submission::CreateCustomer(_)
                | Submission::CreateDriver(_)
                | Submission::CreateProduct(_)
        )
    }

    /// Send the request. Returns the saved record's display name.
    pub async fn send(self, api: &ApiClient) -> Result<String> {
        match self {
            Submission::CreateCustomer(p) => api.create_customer(&p).await.map(|c| c.full_name),
            Submission::UpdateCustomer(p) => {
                api.update_customer(&p.id, &p).await.map(|c| c.full_name)
            }
            Submission::CreateDriver(p) => api.create_driver(&p).await.map(|d| d.full_name),
            Submission::UpdateDriver(p) => api.update_driver(&p.id, &p).await.map(|d| d.full_name),
            Submission::CreateProduct(p) => api.create_product(&p).await.map(|p| p.name),
            Submission::UpdateProduct(p) => api.update_product(&p.id, &p).await.map(|p| p.name),
            Submission::UpdateAdmin(id, p) => api.update_admin(&id, &p).await.map(|a| a.full_name),
        }
    }
}

/// State of an open create/edit form.
#[derive(Debug, Clone)]
pub struct EntityForm {
    pub kind: EntityKind,
    pub mode: FormMode,
    pub fields: Vec<FormField>,
    pub focus: usize,
    pub error: Option<String>,
    pub submitting: bool,
}

fn pix_options() -> Vec<String> {
    PixKeyType::ALL.iter().map(|t| t.to_string()).collect()
}

/// Text of an optional record field, empty when the record or value is missing.
fn or_empty(value: Option<&Option<String>>) -> String {
    value.and_then(|v| v.clone()).unwrap_or_default()
}

fn looks_like_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && domain
            .rsplit_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
}

impl EntityForm {
    fn new(kind: EntityKind, mode: FormMode, fields: Vec<FormField>) -> Self {
        // Start on the first field that can be typed into
        let focus = fields.iter().position(|f| !f.locked).unwrap_or(0);
        Self {
            kind,
            mode,
            fields,
            focus,
            error: None,
            submitting: false,
        }
    }

    // =========================================================================
    // Builders
    // =========================================================================

    fn customer_fields(customer: Option<&Customer>) -> Vec<FormField> {
        let editing = customer.is_some();
        let mut fields = vec![
            FormField::text("full_name", "Full name", customer.map_or("", |c| c.full_name.as_str()))
                .required(),
            FormField::text("email", "Email", customer.map_or("", |c| c.email.as_str()))
                .required()
                .locked_if(editing),
            FormField::text("phone", "Phone", customer.map_or("", |c| c.phone_number.as_str()))
                .required(),
            FormField::text(
                "document",
                "CPF or CNPJ",
                or_empty(customer.map(|c| &c.cpf_or_cnpj)),
            ),
            FormField::text(
                "address",
                "Default address",
                or_empty(customer.map(|c| &c.default_address)),
            ),
            FormField::text(
                "info",
                "Additional info",
                or_empty(customer.map(|c| &c.additional_info)),
            ),
            FormField::flag(
                "promotions",
                "Receives promotions",
                customer.is_some_and(|c| c.receives_promotions),
            ),
        ];
        if !editing {
            fields.push(FormField::secret("password", "Password").required());
        }
        fields
    }

    pub fn new_customer() -> Self {
        Self::new(
            EntityKind::Customers,
            FormMode::Create,
            Self::customer_fields(None),
        )
    }

    pub fn edit_customer(customer: &Customer) -> Self {
        Self::new(
            EntityKind::Customers,
            FormMode::Edit(customer.id.clone()),
            Self::customer_fields(Some(customer)),
        )
    }

    fn driver_fields(driver: Option<&Driver>) -> Vec<FormField> {
        let editing = driver.is_some();
        let mut fields = vec![
            FormField::text("full_name", "Full name", driver.map_or("", |d| d.full_name.as_str()))
                .required(),
            FormField::text("email", "Email", driver.map_or("", |d| d.email.as_str()))
                .required()
                .locked_if(editing),
            FormField::text("phone", "Phone", driver.map_or("", |d| d.phone_number.as_str()))
                .required(),
        ];
        if !editing {
            fields.push(FormField::secret("password", "Password").required());
        }
        fields.extend([
            FormField::text("cpf", "CPF", or_empty(driver.map(|d| &d.cpf))),
            FormField::text("cnh", "CNH number", or_empty(driver.map(|d| &d.cnh_number))),
            FormField::text(
                "license",
                "CNH expiry (yyyy-mm-dd)",
                driver
                    .map(|d| date_input(&d.license_expiration))
                    .unwrap_or_default(),
            ),
            FormField::text("plate", "Vehicle plate", or_empty(driver.map(|d| &d.vehicle_plate))),
            FormField::text(
                "vehicle_type",
                "Vehicle type",
                or_empty(driver.map(|d| &d.vehicle_type)),
            ),
            FormField::text("model", "Vehicle model", or_empty(driver.map(|d| &d.vehicle_model))),
            FormField::text("color", "Vehicle color", or_empty(driver.map(|d| &d.vehicle_color))),
            FormField::text(
                "size",
                "Dumpster size (m³)",
                driver
                    .and_then(|d| d.dumpster_size_m3)
                    .map(|v| v.to_string())
                    .unwrap_or_default(),
            ),
            FormField::text("pix_key", "Pix key", or_empty(driver.map(|d| &d.pix_key))),
            FormField::choice(
                "pix_type",
                "Pix key type",
                pix_options(),
                driver
                    .and_then(|d| d.pix_key_type)
                    .and_then(|t| PixKeyType::ALL.iter().position(|p| *p == t)),
            ),
            FormField::flag(
                "available",
                "Available",
                driver.map_or(true, |d| d.is_available),
            ),
        ]);
        fields
    }

    pub fn new_driver() -> Self {
        Self::new(EntityKind::Drivers, FormMode::Create, Self::driver_fields(None))
    }

    pub fn edit_driver(driver: &Driver) -> Self {
        Self::new(
            EntityKind::Drivers,
            FormMode::Edit(driver.id.clone()),
            Self::driver_fields(Some(driver)),
        )
    }

    fn product_fields(product: Option<&Product>) -> Vec<FormField> {
        vec![
            FormField::text("name", "Name", product.map_or("", |p| p.name.as_str())).required(),
            FormField::text(
                "description",
                "Description",
                product.map_or("", |p| p.description.as_str()),
            )
            .required(),
            FormField::flag("active", "Active", product.map_or(true, |p| p.is_active)),
            // Left empty on edit to keep the current picture
            FormField::text("image", "Image file", ""),
        ]
    }

    pub fn new_product() -> Self {
        Self::new(
            EntityKind::Products,
            FormMode::Create,
            Self::product_fields(None),
        )
    }

    pub fn edit_product(product: &Product) -> Self {
        Self::new(
            EntityKind::Products,
            FormMode::Edit(product.id.clone()),
            Self::product_fields(Some(product)),
        )
    }

    pub fn edit_admin(admin: &Admin) -> Self {
        Self::new(
            EntityKind::Admins,
            FormMode::Edit(admin.id.clone()),
            vec![
                FormField::text("full_name", "Full name", admin.full_name.as_str()).required(),
                FormField::text("email", "Email", admin.email.as_str()).locked_if(true),
                FormField::text("cpf", "CPF", admin.cpf.as_str()).required(),
                FormField::flag("active", "Active", admin.is_active),
            ],
        )
    }

    // =========================================================================
    // Editing
    // =========================================================================

    pub fn title(&self) -> String {
        let verb = match self.mode {
            FormMode::Create => "New",
            FormMode::Edit(_) => "Edit",
        };
        format!(" {} {} ", verb, self.kind.label())
    }

    pub fn button_focused(&self) -> bool {
        self.focus == self.fields.len()
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % (self.fields.len() + 1);
    }

    pub fn focus_prev(&mut self) {
        let stops = self.fields.len() + 1;
        self.focus = (self.focus + stops - 1) % stops;
    }

    fn focused_mut(&mut self) -> Option<&mut FormField> {
        self.fields.get_mut(self.focus).filter(|f| !f.locked)
    }

    /// True when the focused field is a flag or a choice.
    pub fn focused_is_toggle(&self) -> bool {
        self.fields
            .get(self.focus)
            .is_some_and(|f| matches!(f.value, FieldValue::Flag(_) | FieldValue::Choice { .. }))
    }

    pub fn push_char(&mut self, c: char) {
        let Some(field) = self.focused_mut() else {
            return;
        };
        if let FieldValue::Text(v) | FieldValue::Secret(v) = &mut field.value {
            if v.chars().count() < MAX_FIELD_LENGTH && !c.is_control() {
                v.push(c);
            }
        }
    }

    pub fn pop_char(&mut self) {
        if let Some(field) = self.focused_mut() {
            if let FieldValue::Text(v) | FieldValue::Secret(v) = &mut field.value {
                v.pop();
            }
        }
    }

    /// Flip a flag, or step a choice through its options and back to unset.
    pub fn cycle(&mut self, forward: bool) {
        let Some(field) = self.focused_mut() else {
            return;
        };
        match &mut field.value {
            FieldValue::Flag(on) => *on = !*on,
            FieldValue::Choice { options, index } => {
                let stops = options.len() + 1;
                // Position 0 is unset
                let current = index.map_or(0, |i| i + 1);
                let next = if forward {
                    (current + 1) % stops
                } else {
                    (current + stops - 1) % stops
                };
                *index = next.checked_sub(1);
            }
            FieldValue::Text(_) | FieldValue::Secret(_) => {}
        }
    }

    // =========================================================================
    // Validation
    // =========================================================================

    fn field(&self, key: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.key == key)
    }

    fn label(&self, key: &str) -> &'static str {
        self.field(key).map_or("Field", |f| f.label)
    }

    /// Trimmed text; secrets are returned untrimmed.
    fn text(&self, key: &str) -> String {
        match self.field(key).map(|f| &f.value) {
            Some(FieldValue::Text(v)) => v.trim().to_string(),
            Some(FieldValue::Secret(v)) => v.clone(),
            _ => String::new(),
        }
    }

    fn optional(&self, key: &str) -> Option<String> {
        Some(self.text(key)).filter(|v| !v.is_empty())
    }

    fn flag(&self, key: &str) -> bool {
        matches!(self.field(key).map(|f| &f.value), Some(FieldValue::Flag(true)))
    }

    fn choice(&self, key: &str) -> Option<usize> {
        match self.field(key).map(|f| &f.value) {
            Some(FieldValue::Choice { index, .. }) => *index,
            _ => None,
        }
    }

    fn email(&self) -> Result<String, FormError> {
        let email = self.text("email");
        if looks_like_email(&email) {
            Ok(email)
        } else {
            Err(FormError::InvalidEmail(self.label("email")))
        }
    }

    fn license(&self) -> Result<String, FormError> {
        let date = self.text("license");
        if date.is_empty() || is_valid_date_input(&date) {
            Ok(date)
        } else {
            Err(FormError::InvalidDate(self.label("license")))
        }
    }

    fn dumpster_size(&self) -> Result<Option<f64>, FormError> {
        let Some(raw) = self.optional("size") else {
            return Ok(None);
        };
        // Accept the Brazilian decimal comma
        raw.replace(',', ".")
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v >= 0.0)
            .map(Some)
            .ok_or(FormError::InvalidNumber(self.label("size")))
    }

    fn image(&self) -> Result<Option<ProductImage>, FormError> {
        let Some(path) = self.optional("image") else {
            return Ok(None);
        };
        ProductImage::from_path(Path::new(&path))
            .map(Some)
            .map_err(|e| FormError::Image(format!("{:#}", e)))
    }

    /// Validate the form and build its request.
    pub fn submission(&self) -> Result<Submission, FormError> {
        if let Some(missing) = self.fields.iter().find(|f| f.required && f.is_blank()) {
            return Err(FormError::Required(missing.label));
        }

        let submission = match (self.kind, &self.mode) {
            (EntityKind::Customers, FormMode::Create) => {
                Submission::CreateCustomer(CreateCustomerPayload {
                    full_name: self.text("full_name"),
                    email: self.email()?,
                    phone_number: self.text("phone"),
                    password: self.text("password"),
                    cpf_or_cnpj: self.optional("document"),
                    default_address: self.optional("address"),
                    additional_info: self.optional("info"),
                    receives_promotions: self.flag("promotions"),
                })
            }
            (EntityKind::Customers, FormMode::Edit(id)) => {
                Submission::UpdateCustomer(UpdateCustomerPayload {
                    id: id.clone(),
                    full_name: self.text("full_name"),
                    phone_number: self.text("phone"),
                    cpf_or_cnpj: self.optional("document"),
                    default_address: self.optional("address"),
                    additional_info: self.optional("info"),
                    receives_promotions: self.flag("promotions"),
                })
            }
            (EntityKind::Drivers, FormMode::Create) => {
                Submission::CreateDriver(CreateDriverPayload {
                    full_name: self.text("full_name"),
                    email: self.email()?,
                    phone_number: self.text("phone"),
                    password: self.text("password"),
                    cpf: self.optional("cpf"),
                    cnh_number: self.optional("cnh"),
                    license_expiration: self.license()?,
                    vehicle_plate: self.optional("plate"),
                    vehicle_type: self.optional("vehicle_type"),
                    vehicle_model: self.optional("model"),
                    vehicle_color: self.optional("color"),
                    dumpster_size_m3: self.dumpster_size()?,
                    is_available: self.flag("available"),
                    pix_key: self.optional("pix_key"),
                    pix_key_type: self
                        .choice("pix_type")
                        .and_then(|i| PixKeyType::ALL.get(i).copied()),
                })
            }
            (EntityKind::Drivers, FormMode::Edit(id)) => {
                Submission::UpdateDriver(UpdateDriverPayload {
                    id: id.clone(),
                    full_name: self.text("full_name"),
                    phone_number: self.text("phone"),
                    cpf: self.optional("cpf"),
                    cnh_number: self.optional("cnh"),
                    license_expiration: self.license()?,
                    vehicle_plate: self.optional("plate"),
                    vehicle_type: self.optional("vehicle_type"),
                    vehicle_model: self.optional("model"),
                    vehicle_color: self.optional("color"),
                    dumpster_size_m3: self.dumpster_size()?,
                    is_available: self.flag("available"),
                    pix_key: self.optional("pix_key"),
                    pix_key_type: self
                        .choice("pix_type")
                        .and_then(|i| PixKeyType::ALL.get(i).copied()),
                })
            }
            (EntityKind::Products, FormMode::Create) => {
                Submission::CreateProduct(CreateProductPayload {
                    name: self.text("name"),
                    description: self.text("description"),
                    is_active: self.flag("active"),
                    image: self.image()?,
                })
            }
            (EntityKind::Products, FormMode::Edit(id)) => {
                Submission::UpdateProduct(UpdateProductPayload {
                    id: id.clone(),
                    name: self.text("name"),
                    description: self.text("description"),
                    is_active: self.flag("active"),
                    image: self.image()?,
                })
            }
            (EntityKind::Admins, FormMode::Edit(id)) => Submission::UpdateAdmin(
                id.clone(),
                UpdateAdminPayload {
                    full_name: Some(self.text("full_name")),
                    cpf: Some(self.text("cpf")),
                    is_active: Some(self.flag("active")),
                },
            ),
            (EntityKind::Admins, FormMode::Create) => {
                return Err(FormError::Unsupported(self.kind.label()));
            }
        };
        Ok(submission)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_into(form: &mut EntityForm, key: &str, text: &str) {
        form.focus = form
            .fields
            .iter()
            .position(|f| f.key == key)
            .expect("field exists");
        for c in text.chars() {
            form.push_char(c);
        }
    }

    fn driver() -> Driver {
        Driver {
            id: "d1".to_string(),
            full_name: "Carlos Pereira".to_string(),
            email: "carlos@example.com".to_string(),
            phone_number: "21999998888".to_string(),
            cpf: None,
            cnh_number: Some("01234567890".to_string()),
            license_expiration: "2027-03-01T00:00:00".to_string(),
            vehicle_plate: Some("ABC1D23".to_string()),
            vehicle_type: None,
            vehicle_model: None,
            vehicle_color: None,
            dumpster_size_m3: Some(5.0),
            registered_at: String::new(),
            is_available: true,
            pix_key: Some("carlos@example.com".to_string()),
            pix_key_type: Some(PixKeyType::Email),
            credit_balance: None,
        }
    }

    #[test]
    fn test_new_customer_requires_fields() {
        let form = EntityForm::new_customer();
        assert_eq!(form.title(), " New customer ");
        assert_eq!(
            form.submission().unwrap_err(),
            FormError::Required("Full name")
        );
    }

    #[test]
    fn test_new_customer_builds_create_payload() {
        let mut form = EntityForm::new_customer();
        type_into(&mut form, "full_name", "  Ana Costa ");
        type_into(&mut form, "email", "ana@example.com");
        type_into(&mut form, "phone", "11987654321");
        type_into(&mut form, "password", " pass ");
        form.focus = form.fields.iter().position(|f| f.key == "promotions").expect("flag");
        form.cycle(true);

        let submission = form.submission().expect("valid");
        assert!(submission.is_create());
        let Submission::CreateCustomer(payload) = submission else {
            panic!("expected a customer create");
        };
        assert_eq!(payload.full_name, "Ana Costa");
        // Passwords are sent as typed
        assert_eq!(payload.password, " pass ");
        assert_eq!(payload.cpf_or_cnpj, None);
        assert!(payload.receives_promotions);
    }

    #[test]
    fn test_invalid_email_rejected() {
        let mut form = EntityForm::new_customer();
        type_into(&mut form, "full_name", "Ana");
        type_into(&mut form, "email", "ana@example");
        type_into(&mut form, "phone", "1");
        type_into(&mut form, "password", "x");
        assert_eq!(
            form.submission().unwrap_err(),
            FormError::InvalidEmail("Email")
        );
    }

    #[test]
    fn test_edit_customer_locks_email_and_drops_password() {
        let customer = Customer {
            id: "c1".to_string(),
            full_name: "José Lima".to_string(),
            email: "jose@example.com".to_string(),
            phone_number: "11987654321".to_string(),
            cpf_or_cnpj: Some("12345678909".to_string()),
            registered_at: String::new(),
            default_address: None,
            additional_info: None,
            receives_promotions: false,
        };
        let mut form = EntityForm::edit_customer(&customer);
        assert!(form.fields.iter().all(|f| f.key != "password"));

        type_into(&mut form, "email", "other@example.com");
        assert_eq!(form.text("email"), "jose@example.com");

        let Submission::UpdateCustomer(payload) = form.submission().expect("valid") else {
            panic!("expected a customer update");
        };
        assert_eq!(payload.id, "c1");
        assert_eq!(payload.cpf_or_cnpj.as_deref(), Some("12345678909"));
    }

    #[test]
    fn test_edit_driver_prefills_and_validates() {
        let mut form = EntityForm::edit_driver(&driver());
        assert_eq!(form.text("license"), "2027-03-01");
        assert_eq!(form.text("size"), "5");
        assert_eq!(form.choice("pix_type"), Some(2));

        let Submission::UpdateDriver(payload) = form.submission().expect("valid") else {
            panic!("expected a driver update");
        };
        assert_eq!(payload.id, "d1");
        assert_eq!(payload.pix_key_type, Some(PixKeyType::Email));
        assert_eq!(payload.dumpster_size_m3, Some(5.0));

        type_into(&mut form, "size", "x");
        assert_eq!(
            form.submission().unwrap_err(),
            FormError::InvalidNumber("Dumpster size (m³)")
        );
    }

    #[test]
    fn test_driver_size_accepts_decimal_comma() {
        let mut form = EntityForm::edit_driver(&driver());
        let size = form.fields.iter().position(|f| f.key == "size").expect("size");
        form.fields[size].value = FieldValue::Text("4,5".to_string());
        assert_eq!(form.dumpster_size(), Ok(Some(4.5)));
    }

    #[test]
    fn test_driver_bad_license_date() {
        let mut form = EntityForm::edit_driver(&driver());
        let license = form.fields.iter().position(|f| f.key == "license").expect("license");
        form.fields[license].value = FieldValue::Text("01/03/2027".to_string());
        assert_eq!(
            form.submission().unwrap_err(),
            FormError::InvalidDate("CNH expiry (yyyy-mm-dd)")
        );
    }

    #[test]
    fn test_choice_cycles_through_unset() {
        let mut form = EntityForm::new_driver();
        form.focus = form.fields.iter().position(|f| f.key == "pix_type").expect("pix");
        assert!(form.focused_is_toggle());
        assert_eq!(form.choice("pix_type"), None);

        form.cycle(true);
        assert_eq!(form.choice("pix_type"), Some(0));
        form.cycle(false);
        form.cycle(false);
        assert_eq!(form.choice("pix_type"), Some(4));
        form.cycle(true);
        assert_eq!(form.choice("pix_type"), None);
    }

    #[test]
    fn test_product_image_is_loaded() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("cacamba.png");
        std::fs::write(&path, [0x89, b'P', b'N', b'G']).expect("write");

        let mut form = EntityForm::new_product();
        type_into(&mut form, "name", "Caçamba 5m³");
        type_into(&mut form, "description", "Entulho");
        type_into(&mut form, "image", &path.to_string_lossy());

        let Submission::CreateProduct(payload) = form.submission().expect("valid") else {
            panic!("expected a product create");
        };
        let image = payload.image.expect("image attached");
        assert_eq!(image.mime_type, "image/png");
        assert!(payload.is_active);

        type_into(&mut form, "image", ".txt");
        assert!(matches!(form.submission(), Err(FormError::Image(_))));
    }

    #[test]
    fn test_edit_admin_sends_editable_fields() {
        let admin = Admin {
            id: "a1".to_string(),
            full_name: "Maria Souza".to_string(),
            email: "maria@example.com".to_string(),
            cpf: "12345678909".to_string(),
            profile_picture_url: None,
            is_active: true,
            created_at: String::new(),
        };
        let mut form = EntityForm::edit_admin(&admin);
        // Email is locked, so focus starts on the name
        assert_eq!(form.focus, 0);
        form.focus = 3;
        form.cycle(true);

        let Submission::UpdateAdmin(id, payload) = form.submission().expect("valid") else {
            panic!("expected an admin update");
        };
        assert_eq!(id, "a1");
        assert_eq!(payload.is_active, Some(false));
        assert_eq!(payload.full_name.as_deref(), Some("Maria Souza"));
    }

    #[test]
    fn test_focus_wraps_through_button() {
        let mut form = EntityForm::new_product();
        form.focus_prev();
        assert!(form.button_focused());
        form.focus_next();
        assert_eq!(form.focus, 0);
    }

    #[test]
    fn test_looks_like_email() {
        assert!(looks_like_email("a@b.co"));
        assert!(!looks_like_email("a@b"));
        assert!(!looks_like_email("@b.co"));
        assert!(!looks_like_email("a b@c.d"));
        assert!(!looks_like_email("a@.d"));
    }
}
