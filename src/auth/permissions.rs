use uuid::Uuid;

use crate::error::{IntranetError, IntranetResult};
use crate::model::usuario::{Usuario, same_area};

/// Advisory capabilities: they decide what the client offers, the server
/// still authorizes every call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Permisos {
    pub nivel: u8,

    pub es_director: bool,
    pub es_subdirector: bool,
    pub es_jefatura: bool,
    pub es_funcionario: bool,

    pub puede_crear_usuarios: bool,
    pub puede_eliminar_contenido: bool,
    pub puede_aprobar_solicitudes: bool,
    pub puede_subir_documentos: bool,
    pub puede_crear_actividades: bool,
    pub puede_crear_anuncios: bool,
    pub puede_gestionar_licencias: bool,
    pub puede_gestionar_documentos: bool,
    pub puede_ver_reportes: bool,
    pub puede_editar_calendario: bool,

    user_id: Option<Uuid>,
    area_id: Option<Uuid>,
    area_nombre: String,
}

/// No user means no capabilities at all (level 0).
pub fn resolve(user: Option<&Usuario>) -> Permisos {
    let user = match user {
        Some(u) => u,
        None => return Permisos::default(),
    };

    let nivel = user.nivel();

    Permisos {
        nivel,
        es_director: nivel == 4,
        es_subdirector: nivel == 3,
        es_jefatura: nivel == 2,
        es_funcionario: nivel == 1,

        puede_crear_usuarios: user.rol_puede_crear_usuarios,
        puede_eliminar_contenido: user.rol_puede_eliminar_contenido,
        puede_aprobar_solicitudes: user.rol_puede_aprobar_solicitudes,
        puede_subir_documentos: user.rol_puede_subir_documentos,
        puede_crear_actividades: user.rol_puede_crear_actividades,
        puede_crear_anuncios: user.rol_puede_crear_anuncios,
        // Dirección and Subdirección manage medical leaves whatever the flag says
        puede_gestionar_licencias: nivel >= 3,
        puede_gestionar_documentos: nivel >= 3,
        puede_ver_reportes: user.rol_puede_ver_reportes,
        puede_editar_calendario: user.rol_puede_editar_calendario,

        user_id: Some(user.id),
        area_id: user.area,
        area_nombre: user.area_nombre.clone(),
    }
}

impl Permisos {
    fn is_own_area(&self, area: &str) -> bool {
        same_area(self.area_id, &self.area_nombre, area)
    }

    /// `area` is the requester's area, by id or by name.
    pub fn puede_aprobar_solicitud(&self, area: &str) -> bool {
        if self.nivel >= 3 {
            return true;
        }
        if self.es_jefatura {
            return self.is_own_area(area);
        }
        false
    }

    pub fn puede_editar_contenido(&self, creador_id: &str) -> bool {
        if self.nivel >= 3 {
            return true;
        }
        self.user_id
            .map(|id| id.to_string() == creador_id)
            .unwrap_or(false)
    }

    pub fn puede_ver_contenido_de_area(&self, area: &str) -> bool {
        if self.nivel >= 3 {
            return true;
        }
        self.is_own_area(area)
    }

    pub fn require_approver_of(&self, area: &str) -> IntranetResult<()> {
        if self.puede_aprobar_solicitud(area) {
            Ok(())
        } else {
            Err(IntranetError::Forbidden(
                "No tienes permisos para aprobar esta solicitud".into(),
            ))
        }
    }

    pub fn require_licencia_manager(&self) -> IntranetResult<()> {
        if self.puede_gestionar_licencias {
            Ok(())
        } else {
            Err(IntranetError::Forbidden(
                "No tiene permisos para gestionar licencias.".into(),
            ))
        }
    }

    pub fn require_documento_manager(&self) -> IntranetResult<()> {
        if self.puede_gestionar_documentos {
            Ok(())
        } else {
            Err(IntranetError::Forbidden(
                "No tienes permisos para eliminar documentos".into(),
            ))
        }
    }
}
