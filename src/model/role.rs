use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Hierarchy level of a role as the API reports it in `rol_nivel`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, PartialOrd, Ord)]
pub enum RoleLevel {
    Funcionario = 1,
    Jefatura = 2,
    Subdireccion = 3,
    Direccion = 4,
}

impl RoleLevel {
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(RoleLevel::Funcionario),
            2 => Some(RoleLevel::Jefatura),
            3 => Some(RoleLevel::Subdireccion),
            4 => Some(RoleLevel::Direccion),
            _ => None,
        }
    }
}

pub fn level_label(nivel: u8) -> &'static str {
    match RoleLevel::from_id(nivel) {
        Some(RoleLevel::Funcionario) => "Funcionario",
        Some(RoleLevel::Jefatura) => "Jefatura",
        Some(RoleLevel::Subdireccion) => "Subdirección",
        Some(RoleLevel::Direccion) => "Dirección",
        None => "Desconocido",
    }
}

/// Role master data (`/roles/`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rol {
    pub id: Uuid,
    pub nombre: String,
    #[serde(default)]
    pub descripcion: String,
    pub nivel: u8,
    #[serde(default)]
    pub puede_crear_usuarios: bool,
    #[serde(default)]
    pub puede_eliminar_contenido: bool,
    #[serde(default)]
    pub puede_aprobar_solicitudes: bool,
    #[serde(default)]
    pub puede_subir_documentos: bool,
    #[serde(default)]
    pub puede_crear_actividades: bool,
    #[serde(default)]
    pub puede_crear_anuncios: bool,
    #[serde(default)]
    pub puede_gestionar_licencias: bool,
    #[serde(default)]
    pub puede_ver_reportes: bool,
    #[serde(default)]
    pub puede_editar_calendario: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_by_level() {
        assert_eq!(level_label(1), "Funcionario");
        assert_eq!(level_label(3), "Subdirección");
        assert_eq!(level_label(9), "Desconocido");
    }
}
