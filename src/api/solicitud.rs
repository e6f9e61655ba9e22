use async_trait::async_trait;
use tracing::info;

use crate::api::client::ApiClient;
use crate::error::IntranetResult;
use crate::model::solicitud::{
    AccionResponse, AprobarRechazarDto, CrearSolicitudDto, Solicitud, SolicitudFilter, SolicitudId,
};
use crate::routes;
use crate::utils::business_days::count_business_days_str;

pub const APROBAR_JEFATURA: &str = "aprobar_jefatura";
pub const APROBAR_DIRECCION: &str = "aprobar_direccion";

/// Approval endpoint for an approver of the given role level: Dirección
/// and Subdirección act on the direction stage, everyone else on the
/// supervisor stage.
pub fn approval_action(nivel: u8) -> &'static str {
    if nivel >= 3 {
        APROBAR_DIRECCION
    } else {
        APROBAR_JEFATURA
    }
}

/// Leave-request operations of the API.
#[async_trait]
pub trait SolicitudApi: Send + Sync {
    async fn create(&self, dto: &CrearSolicitudDto) -> IntranetResult<Solicitud>;

    async fn get_all(&self, filter: &SolicitudFilter) -> IntranetResult<Vec<Solicitud>>;

    async fn get_by_id(&self, id: SolicitudId) -> IntranetResult<Solicitud>;

    async fn get_mis_solicitudes(&self) -> IntranetResult<Vec<Solicitud>>;

    async fn get_pendientes(&self) -> IntranetResult<Vec<Solicitud>>;

    async fn get_mis_aprobaciones(&self) -> IntranetResult<Vec<Solicitud>>;

    async fn get_historial_completo(&self) -> IntranetResult<Vec<Solicitud>>;

    async fn aprobar(
        &self,
        id: SolicitudId,
        dto: &AprobarRechazarDto,
        nivel: u8,
    ) -> IntranetResult<AccionResponse>;

    async fn rechazar(
        &self,
        id: SolicitudId,
        comentarios: &str,
        nivel: u8,
    ) -> IntranetResult<AccionResponse> {
        let dto = AprobarRechazarDto {
            aprobar: false,
            comentarios: Some(comentarios.to_string()),
        };
        self.aprobar(id, &dto, nivel).await
    }

    async fn anular_usuario(&self, id: SolicitudId) -> IntranetResult<AccionResponse>;

    async fn descargar_pdf(&self, id: SolicitudId) -> IntranetResult<Vec<u8>>;
}

#[derive(Clone)]
pub struct SolicitudService {
    client: ApiClient,
}

impl SolicitudService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Weekdays in the inclusive `YYYY-MM-DD` range, 0 for blank or
    /// inverted input.
    pub fn calcular_dias_habiles(&self, fecha_inicio: &str, fecha_fin: &str) -> u32 {
        count_business_days_str(fecha_inicio, fecha_fin)
    }
}

#[async_trait]
impl SolicitudApi for SolicitudService {
    async fn create(&self, dto: &CrearSolicitudDto) -> IntranetResult<Solicitud> {
        let created: Solicitud = self.client.post(routes::SOLICITUDES, dto).await?;
        info!(
            numero = %created.numero_solicitud,
            tipo = %created.tipo,
            "Request created"
        );
        Ok(created)
    }

    async fn get_all(&self, filter: &SolicitudFilter) -> IntranetResult<Vec<Solicitud>> {
        self.client.get(routes::SOLICITUDES, &filter.to_query()).await
    }

    async fn get_by_id(&self, id: SolicitudId) -> IntranetResult<Solicitud> {
        self.client.get(&routes::solicitud(id), &[]).await
    }

    async fn get_mis_solicitudes(&self) -> IntranetResult<Vec<Solicitud>> {
        self.client.get(routes::SOLICITUDES_MIAS, &[]).await
    }

    async fn get_pendientes(&self) -> IntranetResult<Vec<Solicitud>> {
        self.client.get(routes::SOLICITUDES_PENDIENTES, &[]).await
    }

    async fn get_mis_aprobaciones(&self) -> IntranetResult<Vec<Solicitud>> {
        self.client.get(routes::SOLICITUDES_MIS_APROBACIONES, &[]).await
    }

    async fn get_historial_completo(&self) -> IntranetResult<Vec<Solicitud>> {
        self.client.get(routes::SOLICITUDES_HISTORIAL, &[]).await
    }

    async fn aprobar(
        &self,
        id: SolicitudId,
        dto: &AprobarRechazarDto,
        nivel: u8,
    ) -> IntranetResult<AccionResponse> {
        let action = approval_action(nivel);
        info!(solicitud_id = %id, action, aprobar = dto.aprobar, "Approval action");
        self.client
            .post(&routes::solicitud_action(id, action), dto)
            .await
    }

    async fn anular_usuario(&self, id: SolicitudId) -> IntranetResult<AccionResponse> {
        info!(solicitud_id = %id, "Annul own request");
        self.client
            .post_empty(&routes::solicitud_action(id, "anular_usuario"))
            .await
    }

    async fn descargar_pdf(&self, id: SolicitudId) -> IntranetResult<Vec<u8>> {
        self.client
            .get_bytes(&routes::solicitud_action(id, "descargar_pdf"))
            .await
    }
}
