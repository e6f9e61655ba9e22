use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Area {
    pub id: Uuid,
    pub nombre: String,
    #[serde(default)]
    pub descripcion: String,
    #[serde(default)]
    pub codigo: String,
    #[serde(default)]
    pub jefe: Option<Uuid>,
    #[serde(default)]
    pub jefe_nombre: Option<String>,
    #[serde(default)]
    pub total_funcionarios: u32,
    #[serde(default = "default_activa")]
    pub activa: bool,
}

fn default_activa() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TipoContrato {
    pub id: Uuid,
    pub nombre: String,
    #[serde(default)]
    pub descripcion: Option<String>,
}
