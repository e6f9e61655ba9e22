use chrono::{DateTime, NaiveDate, Utc};
use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use strum_macros::EnumString;
use uuid::Uuid;

use crate::utils::upload::UploadFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, From, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LicenciaId(pub Uuid);

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EstadoLicencia {
    Pendiente,
    Aprobada,
    Rechazada,
}

impl EstadoLicencia {
    pub fn label(&self) -> &'static str {
        match self {
            EstadoLicencia::Pendiente => "Pendiente",
            EstadoLicencia::Aprobada => "Aprobada",
            EstadoLicencia::Rechazada => "Rechazada",
        }
    }
}

/// A medical-leave document record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LicenciaMedica {
    pub id: LicenciaId,
    pub numero_licencia: String,
    #[serde(default)]
    pub usuario: Option<Uuid>,
    #[serde(default)]
    pub usuario_nombre: Option<String>,
    #[serde(default)]
    pub area_nombre: Option<String>,
    pub fecha_inicio: NaiveDate,
    pub fecha_termino: NaiveDate,
    #[serde(default)]
    pub dias_totales: i64,
    /// URL of the uploaded document.
    #[serde(default)]
    pub documento_licencia: Option<String>,
    pub estado: EstadoLicencia,
    #[serde(default)]
    pub revisada_por: Option<Uuid>,
    #[serde(default)]
    pub revisada_por_nombre: Option<String>,
    #[serde(default)]
    pub comentarios_revision: Option<String>,
    #[serde(default)]
    pub fecha_revision: Option<DateTime<Utc>>,
    pub creado_en: DateTime<Utc>,
    #[serde(default)]
    pub actualizada_en: Option<DateTime<Utc>>,
    #[serde(default)]
    pub esta_vigente: bool,
    #[serde(default)]
    pub dias_restantes: i64,
}

impl LicenciaMedica {
    /// Approved leaves are permanent; everything else may still be withdrawn.
    pub fn can_delete(&self) -> bool {
        self.estado != EstadoLicencia::Aprobada
    }
}

/// A validated upload, ready to be sent as multipart form data.
#[derive(Debug, Clone)]
pub struct NuevaLicencia {
    pub numero_licencia: String,
    pub fecha_inicio: NaiveDate,
    pub fecha_termino: NaiveDate,
    pub documento: UploadFile,
}

#[derive(Debug, Clone, Serialize)]
pub struct GestionarLicenciaDto {
    pub nuevo_estado: EstadoLicencia,
    pub comentarios: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GestionarResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub revisor: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LicenciaStats {
    pub total: usize,
    pub aprobadas: usize,
    pub pendientes: usize,
}

impl LicenciaStats {
    pub fn of(licencias: &[LicenciaMedica]) -> Self {
        Self {
            total: licencias.len(),
            aprobadas: licencias
                .iter()
                .filter(|l| l.estado == EstadoLicencia::Aprobada)
                .count(),
            pendientes: licencias
                .iter()
                .filter(|l| l.estado == EstadoLicencia::Pendiente)
                .count(),
        }
    }
}
