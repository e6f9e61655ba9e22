use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use derive_more::{Display, From};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum_macros::{EnumIter, EnumString};
use uuid::Uuid;

use crate::utils::decimal::de_decimal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, From, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SolicitudId(pub Uuid);

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, EnumIter,
    strum_macros::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TipoSolicitud {
    Vacaciones,
    DiaAdministrativo,
    PermisoSinGoce,
    DevolucionTiempo,
    OtroPermiso,
}

impl TipoSolicitud {
    pub fn label(&self) -> &'static str {
        match self {
            TipoSolicitud::Vacaciones => "Vacaciones",
            TipoSolicitud::DiaAdministrativo => "Día Administrativo",
            TipoSolicitud::PermisoSinGoce => "Permiso sin Goce",
            TipoSolicitud::DevolucionTiempo => "Devolución de Tiempo",
            TipoSolicitud::OtroPermiso => "Otro Permiso",
        }
    }

    /// Time-in-lieu is requested in hours; every other type in days.
    pub fn counts_hours(&self) -> bool {
        matches!(self, TipoSolicitud::DevolucionTiempo)
    }
}

/// Request status as reported by the server.
///
/// Values this client does not know (older server revisions emit
/// `rechazada_jefatura`, `cancelada`, ...) land in `Desconocido` with the raw
/// text preserved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum EstadoSolicitud {
    PendienteJefatura,
    PendienteDireccion,
    Aprobada,
    Rechazada,
    AnuladaUsuario,
    SolicitudAnulacionLicencia,
    AnuladaPorLicencia,
    #[strum(default)]
    Desconocido(String),
}

impl EstadoSolicitud {
    pub fn as_str(&self) -> &str {
        match self {
            EstadoSolicitud::PendienteJefatura => "pendiente_jefatura",
            EstadoSolicitud::PendienteDireccion => "pendiente_direccion",
            EstadoSolicitud::Aprobada => "aprobada",
            EstadoSolicitud::Rechazada => "rechazada",
            EstadoSolicitud::AnuladaUsuario => "anulada_usuario",
            EstadoSolicitud::SolicitudAnulacionLicencia => "solicitud_anulacion_licencia",
            EstadoSolicitud::AnuladaPorLicencia => "anulada_por_licencia",
            EstadoSolicitud::Desconocido(raw) => raw,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            EstadoSolicitud::PendienteJefatura => "Pendiente Jefatura",
            EstadoSolicitud::PendienteDireccion => "Pendiente Dirección",
            EstadoSolicitud::Aprobada => "Aprobada",
            EstadoSolicitud::Rechazada => "Rechazada",
            EstadoSolicitud::AnuladaUsuario => "Anulada por Usuario",
            EstadoSolicitud::SolicitudAnulacionLicencia => "Anulación por Licencia",
            EstadoSolicitud::AnuladaPorLicencia => "Anulada (Licencia)",
            EstadoSolicitud::Desconocido(raw) => raw,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(
            self,
            EstadoSolicitud::PendienteJefatura | EstadoSolicitud::PendienteDireccion
        )
    }
}

impl fmt::Display for EstadoSolicitud {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for EstadoSolicitud {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EstadoSolicitud {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        // infallible: unknown values fall into `Desconocido`
        Ok(EstadoSolicitud::from_str(&raw).unwrap_or(EstadoSolicitud::Desconocido(raw)))
    }
}

/// A leave/permission request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solicitud {
    pub id: SolicitudId,
    #[serde(default)]
    pub numero_solicitud: String,
    #[serde(default)]
    pub usuario: Option<Uuid>,
    #[serde(default)]
    pub usuario_nombre: String,
    /// Area *name* of the requester.
    #[serde(default)]
    pub usuario_area: String,
    #[serde(default)]
    pub usuario_cargo: Option<String>,
    pub tipo: TipoSolicitud,
    #[serde(default)]
    pub tipo_display: String,
    #[serde(default)]
    pub nombre_otro_permiso: Option<String>,
    pub fecha_inicio: NaiveDate,
    pub fecha_termino: NaiveDate,
    #[serde(deserialize_with = "de_decimal")]
    pub cantidad_dias: f64,
    #[serde(default)]
    pub es_medio_dia: bool,
    #[serde(default)]
    pub motivo: String,
    #[serde(default)]
    pub telefono_contacto: String,
    pub estado: EstadoSolicitud,
    #[serde(default)]
    pub estado_display: String,

    #[serde(default)]
    pub jefatura_aprobador_nombre: Option<String>,
    #[serde(default, alias = "jefatura_fecha_aprobacion")]
    pub fecha_aprobacion_jefatura: Option<DateTime<Utc>>,
    #[serde(default)]
    pub direccion_aprobador_nombre: Option<String>,
    #[serde(default, alias = "direccion_fecha_aprobacion")]
    pub fecha_aprobacion_direccion: Option<DateTime<Utc>>,
    #[serde(default)]
    pub comentarios_administracion: Option<String>,

    #[serde(default)]
    pub pdf_generado: bool,
    #[serde(default)]
    pub url_pdf: Option<String>,
    pub creada_en: DateTime<Utc>,
    #[serde(default)]
    pub actualizada_en: Option<DateTime<Utc>>,
}

impl Solicitud {
    /// The server's type label, the local one when it sent none.
    pub fn tipo_label(&self) -> &str {
        if self.tipo_display.is_empty() {
            self.tipo.label()
        } else {
            &self.tipo_display
        }
    }

    pub fn estado_label(&self) -> &str {
        if self.estado_display.is_empty() {
            self.estado.label()
        } else {
            &self.estado_display
        }
    }

    pub fn has_pdf(&self) -> bool {
        self.url_pdf.as_deref().map(|u| !u.is_empty()).unwrap_or(false)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CrearSolicitudDto {
    pub tipo: TipoSolicitud,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nombre_otro_permiso: Option<String>,
    pub fecha_inicio: NaiveDate,
    pub fecha_termino: NaiveDate,
    pub cantidad_dias: f64,
    pub es_medio_dia: bool,
    pub motivo: String,
    pub telefono_contacto: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AprobarRechazarDto {
    pub aprobar: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comentarios: Option<String>,
}

/// Body returned by the approve/annul actions.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccionResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub nuevo_estado: Option<EstadoSolicitud>,
}

/// Query filters accepted by `GET /solicitudes/`.
#[derive(Debug, Clone, Default)]
pub struct SolicitudFilter {
    pub tipo: Option<TipoSolicitud>,
    pub estado: Option<EstadoSolicitud>,
    /// Area id of the requester.
    pub area: Option<Uuid>,
    pub search: Option<String>,
    /// DRF ordering field, e.g. `-fecha_solicitud`.
    pub ordering: Option<String>,
}

impl SolicitudFilter {
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();

        if let Some(tipo) = self.tipo {
            query.push(("tipo", tipo.to_string()));
        }
        if let Some(estado) = &self.estado {
            query.push(("estado", estado.to_string()));
        }
        if let Some(area) = self.area {
            query.push(("usuario__area", area.to_string()));
        }
        if let Some(search) = self.search.as_deref().filter(|s| !s.trim().is_empty()) {
            query.push(("search", search.trim().to_string()));
        }
        if let Some(ordering) = &self.ordering {
            query.push(("ordering", ordering.clone()));
        }

        query
    }
}
