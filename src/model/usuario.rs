use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::decimal::de_decimal_or_zero;

/// The authenticated user as returned by `/usuarios/me/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usuario {
    pub id: Uuid,
    #[serde(default)]
    pub rut: String,
    #[serde(default)]
    pub nombre: String,
    #[serde(default)]
    pub apellido_paterno: String,
    #[serde(default)]
    pub apellido_materno: String,
    #[serde(default)]
    pub nombre_completo: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub telefono: Option<String>,
    #[serde(default)]
    pub cargo: String,

    #[serde(default)]
    pub area: Option<Uuid>,
    #[serde(default)]
    pub area_nombre: String,
    #[serde(default)]
    pub rol: Option<Uuid>,
    #[serde(default)]
    pub rol_nombre: String,
    #[serde(default)]
    pub rol_nivel: Option<u8>,
    #[serde(default)]
    pub es_jefe_de_area: bool,

    // leave balances
    #[serde(default, deserialize_with = "de_decimal_or_zero")]
    pub dias_vacaciones_disponibles: f64,
    #[serde(default, deserialize_with = "de_decimal_or_zero")]
    pub dias_administrativos_disponibles: f64,
    #[serde(default, deserialize_with = "de_decimal_or_zero")]
    pub dias_sin_goce_acumulados: f64,
    #[serde(default, deserialize_with = "de_decimal_or_zero")]
    pub horas_devolucion_disponibles: f64,

    // role flags
    #[serde(default)]
    pub rol_puede_crear_usuarios: bool,
    #[serde(default)]
    pub rol_puede_eliminar_contenido: bool,
    #[serde(default)]
    pub rol_puede_aprobar_solicitudes: bool,
    #[serde(default)]
    pub rol_puede_subir_documentos: bool,
    #[serde(default)]
    pub rol_puede_crear_actividades: bool,
    #[serde(default)]
    pub rol_puede_crear_anuncios: bool,
    #[serde(default)]
    pub rol_puede_gestionar_licencias: bool,
    #[serde(default)]
    pub rol_puede_ver_reportes: bool,
    #[serde(default)]
    pub rol_puede_editar_calendario: bool,

    #[serde(default)]
    pub is_active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Saldos {
    pub vacaciones: f64,
    pub administrativos: f64,
    pub sin_goce: f64,
    pub devolucion_horas: f64,
}

impl Usuario {
    /// Level used for every client-side decision; a missing or zero level
    /// counts as a plain employee.
    pub fn nivel(&self) -> u8 {
        match self.rol_nivel {
            Some(n) if n > 0 => n,
            _ => 1,
        }
    }

    pub fn saldos(&self) -> Saldos {
        Saldos {
            vacaciones: self.dias_vacaciones_disponibles,
            administrativos: self.dias_administrativos_disponibles,
            sin_goce: self.dias_sin_goce_acumulados,
            devolucion_horas: self.horas_devolucion_disponibles,
        }
    }

    pub fn display_name(&self) -> &str {
        if self.nombre_completo.is_empty() {
            &self.nombre
        } else {
            &self.nombre_completo
        }
    }

    /// Whether `area` names this user's area, by id or by display name.
    ///
    /// Request lists carry the requester's area as a name while other
    /// payloads use the id.
    pub fn belongs_to_area(&self, area: &str) -> bool {
        same_area(self.area, &self.area_nombre, area)
    }
}

/// `area` (an id or a name) against an area known by id and name.
pub(crate) fn same_area(area_id: Option<Uuid>, area_nombre: &str, area: &str) -> bool {
    if area.is_empty() {
        return false;
    }
    let by_id = area_id.map(|id| id.to_string() == area).unwrap_or(false);
    by_id || (!area_nombre.is_empty() && area_nombre == area)
}
