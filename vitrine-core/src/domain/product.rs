use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, de::Error as _};

use crate::error::{CatalogError, Result};

/// Upper bound on the filenames a product keeps in `imagens`.
pub const MAX_PRODUCT_IMAGES: usize = 6;

/// A catalog entry as stored and returned by the API.
///
/// `imagens` is always a decoded list here; the text encoding used by the
/// store lives in [`crate::database::codec`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub nome: String,
    pub codigo: String,
    pub descricao: Option<String>,
    pub preco: f64,
    #[serde(default)]
    pub imagens: Vec<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Create payload. Every field is optional on the wire so that missing
/// required values surface as a store-level validation failure instead of a
/// body rejection. `id` and `imagens` are not accepted on create.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewProduct {
    #[serde(default)]
    pub nome: Option<String>,
    #[serde(default)]
    pub codigo: Option<String>,
    #[serde(default)]
    pub descricao: Option<String>,
    #[serde(default, deserialize_with = "lenient_price")]
    pub preco: Option<f64>,
}

/// A create payload that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub nome: String,
    pub codigo: String,
    pub descricao: Option<String>,
    pub preco: f64,
}

impl NewProduct {
    pub fn validate(&self) -> Result<ProductDraft> {
        let nome = required_text("nome", self.nome.as_deref())?;
        let codigo = required_text("codigo", self.codigo.as_deref())?;
        let preco = self.preco.ok_or_else(|| {
            CatalogError::Validation("preco is required".to_string())
        })?;
        validate_price(preco)?;

        Ok(ProductDraft {
            nome,
            codigo,
            descricao: self.descricao.clone(),
            preco,
        })
    }
}

/// Update payload. Absent fields are left untouched; `descricao: null`
/// clears the description.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductChanges {
    #[serde(default)]
    pub nome: Option<String>,
    #[serde(default)]
    pub codigo: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub descricao: Option<Option<String>>,
    #[serde(default, deserialize_with = "lenient_price")]
    pub preco: Option<f64>,
    /// Applied by a separate store call after the field update.
    #[serde(default)]
    pub imagens: Option<Vec<String>>,
}

impl ProductChanges {
    pub fn validate(&self) -> Result<()> {
        if let Some(nome) = self.nome.as_deref() {
            required_text("nome", Some(nome))?;
        }
        if let Some(codigo) = self.codigo.as_deref() {
            required_text("codigo", Some(codigo))?;
        }
        if let Some(preco) = self.preco {
            validate_price(preco)?;
        }
        if let Some(imagens) = self.imagens.as_ref() {
            validate_image_count(imagens)?;
        }
        Ok(())
    }

    /// True when none of the scalar columns would change.
    pub fn has_field_changes(&self) -> bool {
        self.nome.is_some()
            || self.codigo.is_some()
            || self.descricao.is_some()
            || self.preco.is_some()
    }
}

/// Append newly processed filenames and keep the first
/// [`MAX_PRODUCT_IMAGES`] entries. Existing images always win over new ones.
pub fn append_images(current: &[String], incoming: &[String]) -> Vec<String> {
    current
        .iter()
        .chain(incoming)
        .take(MAX_PRODUCT_IMAGES)
        .cloned()
        .collect()
}

pub fn validate_image_count(imagens: &[String]) -> Result<()> {
    if imagens.len() > MAX_PRODUCT_IMAGES {
        return Err(CatalogError::Validation(format!(
            "imagens accepts at most {MAX_PRODUCT_IMAGES} entries, got {}",
            imagens.len()
        )));
    }
    Ok(())
}

fn required_text(field: &str, value: Option<&str>) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.to_string()),
        Some(_) => Err(CatalogError::Validation(format!(
            "{field} must not be empty"
        ))),
        None => Err(CatalogError::Validation(format!("{field} is required"))),
    }
}

fn validate_price(preco: f64) -> Result<()> {
    if !preco.is_finite() || preco < 0.0 {
        return Err(CatalogError::Validation(format!(
            "preco must be a non-negative number, got {preco}"
        )));
    }
    Ok(())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PriceInput {
    Number(f64),
    Text(String),
}

// Form-style clients send prices as strings; "19.99" reads as 19.99.
fn lenient_price<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<PriceInput>::deserialize(deserializer)? {
        None => Ok(None),
        Some(PriceInput::Number(value)) => Ok(Some(value)),
        Some(PriceInput::Text(raw)) => raw.trim().parse::<f64>().map(Some).map_err(
            |_| D::Error::custom(format!("preco `{raw}` is not a number")),
        ),
    }
}

fn double_option<'de, D, T>(
    deserializer: D,
) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
