use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// A rentable product (dumpster size, service, etc.).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "isActive", default)]
    pub is_active: bool,
    #[serde(rename = "productPictureUrl", default)]
    pub product_picture_url: Option<String>,
}

impl Product {
    pub fn status_display(&self) -> &'static str {
        if self.is_active {
            "Active"
        } else {
            "Inactive"
        }
    }

    pub fn to_update(&self) -> UpdateProductPayload {
        UpdateProductPayload {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            is_active: self.is_active,
            image: None,
        }
    }
}

/// Image attached to a product create/update.
#[derive(Debug, Clone)]
pub struct ProductImage {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ProductImage {
    /// Read an image from disk. The MIME type comes from the extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        let mime_type = match extension.as_str() {
            "png" => "image/png",
            "jpg" | "jpeg" => "image/jpeg",
            "webp" => "image/webp",
            "gif" => "image/gif",
            _ => bail!("Unsupported image type: {}", path.display()),
        };
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image")
            .to_string();
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read image {}", path.display()))?;

        Ok(Self {
            file_name,
            mime_type: mime_type.to_string(),
            bytes,
        })
    }
}

/// JSON part of the multipart product form.
#[derive(Debug, Clone, Serialize)]
pub struct ProductJson<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<&'a str>,
    pub name: &'a str,
    pub description: &'a str,
    #[serde(rename = "isActive")]
    pub is_active: bool,
}

#[derive(Debug, Clone)]
pub struct CreateProductPayload {
    pub name: String,
    pub description: String,
    pub is_active: bool,
    pub image: Option<ProductImage>,
}

impl CreateProductPayload {
    pub fn json(&self) -> ProductJson<'_> {
        ProductJson {
            id: None,
            name: &self.name,
            description: &self.description,
            is_active: self.is_active,
        }
    }
}

#[derive(Debug, Clone)]
pub struct UpdateProductPayload {
    pub id: String,
    pub name: String,
    pub description: String,
    pub is_active: bool,
    pub image: Option<ProductImage>,
}

impl UpdateProductPayload {
    pub fn json(&self) -> ProductJson<'_> {
        ProductJson {
            id: Some(&self.id),
            name: &self.name,
            description: &self.description,
            is_active: self.is_active,
        }
    }
}
