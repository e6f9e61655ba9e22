use chrono::{DateTime, NaiveDate, Utc};
use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use strum_macros::EnumString;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, From, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentoId(pub Uuid);

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TipoDocumento {
    Circular,
    Protocolo,
    Formulario,
    Guia,
    Reglamento,
    Manual,
    Informe,
    #[serde(other)]
    Otro,
}

impl TipoDocumento {
    pub fn label(&self) -> &'static str {
        match self {
            TipoDocumento::Circular => "Circular",
            TipoDocumento::Protocolo => "Protocolo",
            TipoDocumento::Formulario => "Formulario",
            TipoDocumento::Guia => "Guía",
            TipoDocumento::Reglamento => "Reglamento",
            TipoDocumento::Manual => "Manual",
            TipoDocumento::Informe => "Informe",
            TipoDocumento::Otro => "Otro",
        }
    }
}

/// An institutional document as the list serializer renders it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Documento {
    pub id: DocumentoId,
    #[serde(default)]
    pub codigo_documento: String,
    pub titulo: String,
    pub tipo: TipoDocumento,
    #[serde(default)]
    pub tipo_display: String,
    #[serde(default)]
    pub categoria_nombre: Option<String>,
    #[serde(default)]
    pub extension: String,
    /// Bytes.
    #[serde(default)]
    pub tamano: u64,
    pub nombre_archivo: String,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub fecha_vigencia: Option<NaiveDate>,
    #[serde(default)]
    pub fecha_expiracion: Option<NaiveDate>,
    #[serde(default)]
    pub publico: bool,
    #[serde(default)]
    pub descargas: u64,
    #[serde(default)]
    pub visualizaciones: u64,
    #[serde(default)]
    pub esta_vigente: bool,
    #[serde(default)]
    pub subido_por_nombre: Option<String>,
    #[serde(default)]
    pub subido_en: Option<DateTime<Utc>>,
    #[serde(default)]
    pub url_descarga: Option<String>,
}

impl Documento {
    pub fn tipo_label(&self) -> &str {
        if self.tipo_display.is_empty() {
            self.tipo.label()
        } else {
            &self.tipo_display
        }
    }

    /// Case-insensitive match on title, file name or document code; a blank
    /// term matches everything.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        term.is_empty()
            || [&self.titulo, &self.nombre_archivo, &self.codigo_documento]
                .iter()
                .any(|field| field.to_lowercase().contains(&term))
    }
}

/// `/documentos/` is paginated on some deployments and a bare array on others.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum DocumentoList {
    Page { results: Vec<Documento> },
    Plain(Vec<Documento>),
}

impl From<DocumentoList> for Vec<Documento> {
    fn from(list: DocumentoList) -> Self {
        match list {
            DocumentoList::Page { results } => results,
            DocumentoList::Plain(items) => items,
        }
    }
}
