use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use tracing::{info, warn};
use uuid::Uuid;

use crate::api::client::ApiClient;
use crate::error::{IntranetError, IntranetResult};
use crate::model::licencia::{
    GestionarLicenciaDto, GestionarResponse, LicenciaId, LicenciaMedica, NuevaLicencia,
};
use crate::routes::{self, LicenciaRouteScheme};
use crate::utils::upload::validate_file;

/// Medical-leave operations of the API.
#[async_trait]
pub trait LicenciaApi: Send + Sync {
    async fn get_licencias(&self) -> IntranetResult<Vec<LicenciaMedica>>;

    async fn get_mis_licencias(&self) -> IntranetResult<Vec<LicenciaMedica>>;

    async fn get_historial_area(&self) -> IntranetResult<Vec<LicenciaMedica>>;

    async fn get_vigentes(&self) -> IntranetResult<Vec<LicenciaMedica>>;

    async fn get_pendientes(&self) -> IntranetResult<Vec<LicenciaMedica>>;

    /// Leaves reviewed by `revisor`.
    async fn get_mis_revisiones(&self, revisor: Uuid) -> IntranetResult<Vec<LicenciaMedica>>;

    async fn get_historial_completo(&self) -> IntranetResult<Vec<LicenciaMedica>>;

    async fn create(&self, nueva: NuevaLicencia) -> IntranetResult<LicenciaMedica>;

    /// Refuses, without calling the server, to delete an approved leave.
    async fn delete(&self, licencia: &LicenciaMedica) -> IntranetResult<()>;

    async fn gestionar(
        &self,
        id: LicenciaId,
        dto: &GestionarLicenciaDto,
    ) -> IntranetResult<GestionarResponse>;
}

#[derive(Clone)]
pub struct LicenciaService {
    client: ApiClient,
    scheme: LicenciaRouteScheme,
}

impl LicenciaService {
    pub fn new(client: ApiClient, scheme: LicenciaRouteScheme) -> Self {
        Self { client, scheme }
    }

    async fn fetch(
        &self,
        (path, query): (String, Vec<(&'static str, String)>),
    ) -> IntranetResult<Vec<LicenciaMedica>> {
        self.client.get(&path, &query).await
    }
}

#[async_trait]
impl LicenciaApi for LicenciaService {
    async fn get_licencias(&self) -> IntranetResult<Vec<LicenciaMedica>> {
        self.client.get(routes::LICENCIAS, &[]).await
    }

    async fn get_mis_licencias(&self) -> IntranetResult<Vec<LicenciaMedica>> {
        self.client.get(routes::LICENCIAS_MIAS, &[]).await
    }

    async fn get_historial_area(&self) -> IntranetResult<Vec<LicenciaMedica>> {
        self.client.get(routes::LICENCIAS_AREA, &[]).await
    }

    async fn get_vigentes(&self) -> IntranetResult<Vec<LicenciaMedica>> {
        self.client.get(routes::LICENCIAS_VIGENTES, &[]).await
    }

    async fn get_pendientes(&self) -> IntranetResult<Vec<LicenciaMedica>> {
        self.fetch(self.scheme.pendientes()).await
    }

    async fn get_mis_revisiones(&self, revisor: Uuid) -> IntranetResult<Vec<LicenciaMedica>> {
        self.fetch(self.scheme.mis_revisiones(revisor)).await
    }

    async fn get_historial_completo(&self) -> IntranetResult<Vec<LicenciaMedica>> {
        self.fetch(self.scheme.historial()).await
    }

    async fn create(&self, nueva: NuevaLicencia) -> IntranetResult<LicenciaMedica> {
        let NuevaLicencia {
            numero_licencia,
            fecha_inicio,
            fecha_termino,
            documento,
        } = nueva;

        validate_file(&documento.mime_type, documento.size())?;

        let part = Part::bytes(documento.bytes)
            .file_name(documento.file_name)
            .mime_str(&documento.mime_type)?;
        let form = Form::new()
            .text("numero_licencia", numero_licencia.clone())
            .text("fecha_inicio", fecha_inicio.to_string())
            .text("fecha_termino", fecha_termino.to_string())
            .part("documento_licencia", part);

        let created: LicenciaMedica = self.client.post_multipart(routes::LICENCIAS, form).await?;
        info!(folio = %numero_licencia, id = %created.id, "Medical leave uploaded");
        Ok(created)
    }

    async fn delete(&self, licencia: &LicenciaMedica) -> IntranetResult<()> {
        if !licencia.can_delete() {
            warn!(id = %licencia.id, "Refusing to delete an approved medical leave");
            return Err(IntranetError::Forbidden(
                "No se puede eliminar una licencia aprobada".into(),
            ));
        }

        self.client.delete(&routes::licencia(licencia.id)).await?;
        info!(id = %licencia.id, "Medical leave deleted");
        Ok(())
    }

    async fn gestionar(
        &self,
        id: LicenciaId,
        dto: &GestionarLicenciaDto,
    ) -> IntranetResult<GestionarResponse> {
        info!(id = %id, nuevo_estado = %dto.nuevo_estado, "Medical leave review");
        self.client.post(&self.scheme.gestionar(id), dto).await
    }
}
