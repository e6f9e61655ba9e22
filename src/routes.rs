use std::fmt::Display;

// Every DRF route ends with a slash; without it the server redirects and a
// POST loses its body.

// AUTH
//  ├─ POST /token/          {rut, password} -> {access, refresh}
//  └─ POST /token/refresh/  {refresh}       -> {access}
pub const TOKEN: &str = "/token/";
pub const TOKEN_REFRESH: &str = "/token/refresh/";

pub const USUARIOS_ME: &str = "/usuarios/me/";
pub const TIPOS_CONTRATO: &str = "/tipos-contrato/";
pub const ROLES: &str = "/roles/";
pub const AREAS: &str = "/areas/";

pub fn usuario(id: impl Display) -> String {
    format!("/usuarios/{id}/")
}

/* =========================
Solicitudes
========================= */
pub const SOLICITUDES: &str = "/solicitudes/";
pub const SOLICITUDES_MIAS: &str = "/solicitudes/mis_solicitudes/";
pub const SOLICITUDES_PENDIENTES: &str = "/solicitudes/pendientes/";
pub const SOLICITUDES_MIS_APROBACIONES: &str = "/solicitudes/mis_aprobaciones/";
pub const SOLICITUDES_HISTORIAL: &str = "/solicitudes/historial_completo/";

pub fn solicitud(id: impl Display) -> String {
    format!("/solicitudes/{id}/")
}

pub fn solicitud_action(id: impl Display, action: &str) -> String {
    format!("/solicitudes/{id}/{action}/")
}

/* =========================
Licencias médicas
========================= */
pub const LICENCIAS: &str = "/licencias/";
pub const LICENCIAS_MIAS: &str = "/licencias/mis_licencias/";
pub const LICENCIAS_AREA: &str = "/licencias/historial_area/";
pub const LICENCIAS_VIGENTES: &str = "/licencias/vigentes/";

pub fn licencia(id: impl Display) -> String {
    format!("/licencias/{id}/")
}

/* =========================
Documentos
========================= */
pub const DOCUMENTOS: &str = "/documentos/";

pub fn documento(id: impl Display) -> String {
    format!("/documentos/{id}/")
}

pub fn documento_download(id: impl Display) -> String {
    format!("/documentos/{id}/download/")
}

/// The two revisions of the medical-leave review contract seen on servers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LicenciaRouteScheme {
    /// `/pendientes/`, `/mis_revisiones/`, `/historial_completo/` and
    /// `/gestionar-licencia/`.
    #[default]
    Actions,
    /// `?estado=pendiente`, `?gestionado_por=`, `?excluir_estado=pendiente`
    /// and `/gestionar_licencia/`.
    Legacy,
}

impl LicenciaRouteScheme {
    pub fn gestionar(&self, id: impl Display) -> String {
        match self {
            LicenciaRouteScheme::Actions => format!("/licencias/{id}/gestionar-licencia/"),
            LicenciaRouteScheme::Legacy => format!("/licencias/{id}/gestionar_licencia/"),
        }
    }

    pub fn pendientes(&self) -> (String, Vec<(&'static str, String)>) {
        match self {
            LicenciaRouteScheme::Actions => ("/licencias/pendientes/".to_string(), Vec::new()),
            LicenciaRouteScheme::Legacy => (
                LICENCIAS.to_string(),
                vec![("estado", "pendiente".to_string())],
            ),
        }
    }

    pub fn mis_revisiones(&self, reviewer_id: impl Display) -> (String, Vec<(&'static str, String)>) {
        match self {
            LicenciaRouteScheme::Actions => ("/licencias/mis_revisiones/".to_string(), Vec::new()),
            LicenciaRouteScheme::Legacy => (
                LICENCIAS.to_string(),
                vec![("gestionado_por", reviewer_id.to_string())],
            ),
        }
    }

    pub fn historial(&self) -> (String, Vec<(&'static str, String)>) {
        match self {
            LicenciaRouteScheme::Actions => ("/licencias/historial_completo/".to_string(), Vec::new()),
            LicenciaRouteScheme::Legacy => (
                LICENCIAS.to_string(),
                vec![("excluir_estado", "pendiente".to_string())],
            ),
        }
    }
}
