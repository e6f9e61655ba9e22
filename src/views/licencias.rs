use tracing::{error, info, warn};
use uuid::Uuid;

use crate::api::licencia::LicenciaApi;
use crate::auth::permissions;
use crate::error::{IntranetError, IntranetResult};
use crate::model::licencia::{
    EstadoLicencia, GestionarLicenciaDto, LicenciaId, LicenciaMedica, LicenciaStats, NuevaLicencia,
};
use crate::model::usuario::Usuario;
use crate::utils::business_days::parse_date;
use crate::utils::upload::{UploadFile, validate_file};

pub const LOAD_FALLBACK: &str = "No se pudieron cargar las licencias";
pub const UPLOAD_FALLBACK: &str = "Error al subir el archivo al servidor";
pub const DELETE_FALLBACK: &str = "No se pudo eliminar";
pub const REVIEW_LOAD_FALLBACK: &str = "Error al cargar la información";
pub const REVIEW_FALLBACK: &str = "Error al procesar la solicitud";

fn already_processing() -> IntranetError {
    IntranetError::validation("processing", "Ya hay una acción en curso")
}

#[derive(Debug, Clone, Default)]
pub struct LicenciaForm {
    pub numero_licencia: String,
    pub fecha_inicio: String,
    pub fecha_termino: String,
    pub documento: Option<UploadFile>,
}

impl LicenciaForm {
    pub fn validate(self) -> IntranetResult<NuevaLicencia> {
        let numero_licencia = self.numero_licencia.trim().to_string();
        if numero_licencia.is_empty() {
            return Err(IntranetError::validation("numero_licencia", "Requerido"));
        }

        let fecha_inicio = parse_date(&self.fecha_inicio)
            .ok_or_else(|| IntranetError::validation("fecha_inicio", "Requerido"))?;
        let fecha_termino = parse_date(&self.fecha_termino)
            .ok_or_else(|| IntranetError::validation("fecha_termino", "Requerido"))?;
        if fecha_termino < fecha_inicio {
            return Err(IntranetError::validation(
                "fecha_termino",
                "No puede ser anterior al inicio",
            ));
        }

        let documento = self.documento.ok_or_else(|| {
            IntranetError::validation("documento_licencia", "Debe subir el documento")
        })?;
        validate_file(&documento.mime_type, documento.size())?;

        Ok(NuevaLicencia {
            numero_licencia,
            fecha_inicio,
            fecha_termino,
            documento,
        })
    }
}

/// The owner's medical leaves with upload and withdrawal.
pub struct MisLicencias<S> {
    service: S,
    licencias: Vec<LicenciaMedica>,
    processing: bool,
    error: Option<String>,
    success: Option<String>,
}

impl<S: LicenciaApi> MisLicencias<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            licencias: Vec::new(),
            processing: false,
            error: None,
            success: None,
        }
    }

    pub fn licencias(&self) -> &[LicenciaMedica] {
        &self.licencias
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    pub fn stats(&self) -> LicenciaStats {
        LicenciaStats::of(&self.licencias)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn success(&self) -> Option<&str> {
        self.success.as_deref()
    }

    pub async fn load(&mut self) -> IntranetResult<()> {
        self.error = None;
        match self.service.get_mis_licencias().await {
            Ok(data) => {
                self.licencias = data;
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Failed to load medical leaves");
                self.error = Some(e.banner(LOAD_FALLBACK));
                Err(e)
            }
        }
    }

    /// Validates and uploads; the new leave is prepended to the list.
    pub async fn subir(&mut self, form: LicenciaForm) -> IntranetResult<LicenciaMedica> {
        if self.processing {
            warn!(folio = %form.numero_licencia.trim(), "Upload already in flight");
            return Err(already_processing());
        }
        let nueva = match form.validate() {
            Ok(n) => n,
            Err(e) => {
                self.error = Some(e.banner(UPLOAD_FALLBACK));
                return Err(e);
            }
        };

        self.processing = true;
        let result = self.service.create(nueva).await;
        self.processing = false;

        match result {
            Ok(created) => {
                self.success = Some("Licencia cargada exitosamente".into());
                self.licencias.insert(0, created.clone());
                Ok(created)
            }
            Err(e) => {
                error!(error = %e, "Failed to upload medical leave");
                self.error = Some(e.banner(UPLOAD_FALLBACK));
                Err(e)
            }
        }
    }

    pub async fn eliminar(&mut self, id: LicenciaId) -> IntranetResult<()> {
        if self.processing {
            warn!(id = %id, "Action already in flight");
            return Err(already_processing());
        }
        let licencia = self
            .licencias
            .iter()
            .find(|l| l.id == id)
            .cloned()
            .ok_or_else(|| IntranetError::validation("licencia", "Licencia no encontrada"))?;

        self.processing = true;
        let result = self.service.delete(&licencia).await;
        self.processing = false;

        match result {
            Ok(()) => {
                self.licencias.retain(|l| l.id != id);
                self.success = Some("Eliminado correctamente".into());
                Ok(())
            }
            Err(e) => {
                self.error = Some(e.banner(DELETE_FALLBACK));
                Err(e)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VistaRevision {
    #[default]
    Pendientes,
    MisRevisiones,
    HistorialCompleto,
}

/// Review desk for Dirección and Subdirección.
pub struct LicenciaReviewDesk<S> {
    service: S,
    revisor: Uuid,
    vista: VistaRevision,
    licencias: Vec<LicenciaMedica>,
    processing: bool,
    error: Option<String>,
    success: Option<String>,
}

impl<S: LicenciaApi> LicenciaReviewDesk<S> {
    /// Fails for users whose level does not manage medical leaves.
    pub fn new(service: S, user: &Usuario) -> IntranetResult<Self> {
        permissions::resolve(Some(user)).require_licencia_manager()?;

        Ok(Self {
            service,
            revisor: user.id,
            vista: VistaRevision::default(),
            licencias: Vec::new(),
            processing: false,
            error: None,
            success: None,
        })
    }

    pub fn vista(&self) -> VistaRevision {
        self.vista
    }

    pub fn licencias(&self) -> &[LicenciaMedica] {
        &self.licencias
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn success(&self) -> Option<&str> {
        self.success.as_deref()
    }

    pub async fn set_vista(&mut self, vista: VistaRevision) -> IntranetResult<()> {
        self.vista = vista;
        self.load().await
    }

    pub async fn load(&mut self) -> IntranetResult<()> {
        self.error = None;
        let result = match self.vista {
            VistaRevision::Pendientes => self.service.get_pendientes().await,
            VistaRevision::MisRevisiones => self.service.get_mis_revisiones(self.revisor).await,
            VistaRevision::HistorialCompleto => self.service.get_historial_completo().await,
        };

        match result {
            Ok(data) => {
                self.licencias = data;
                Ok(())
            }
            Err(e) => {
                error!(error = %e, vista = ?self.vista, "Failed to load medical leaves for review");
                self.error = Some(e.banner(REVIEW_LOAD_FALLBACK));
                Err(e)
            }
        }
    }

    /// Approves or rejects; the reviewed leave leaves the local list
    /// without a re-fetch.
    pub async fn gestionar(
        &mut self,
        id: LicenciaId,
        nuevo_estado: EstadoLicencia,
        comentarios: &str,
    ) -> IntranetResult<()> {
        if self.processing {
            warn!(id = %id, "Review already in flight");
            return Err(already_processing());
        }
        if nuevo_estado == EstadoLicencia::Pendiente {
            return Err(IntranetError::validation(
                "nuevo_estado",
                "Estado no válido. Use 'aprobada' o 'rechazada'.",
            ));
        }
        if nuevo_estado == EstadoLicencia::Rechazada && comentarios.trim().is_empty() {
            let err = IntranetError::validation(
                "comentarios",
                "Debes agregar un comentario para rechazar",
            );
            self.error = Some(err.banner(REVIEW_FALLBACK));
            return Err(err);
        }

        let dto = GestionarLicenciaDto {
            nuevo_estado,
            comentarios: comentarios.trim().to_string(),
        };
        self.processing = true;
        let result = self.service.gestionar(id, &dto).await;
        self.processing = false;

        match result {
            Ok(_) => {
                info!(id = %id, estado = %nuevo_estado, "Medical leave reviewed");
                self.licencias.retain(|l| l.id != id);
                self.success = Some(format!("Licencia {nuevo_estado} exitosamente"));
                Ok(())
            }
            Err(e) => {
                error!(error = %e, id = %id, "Medical leave review failed");
                self.error = Some(e.banner(REVIEW_FALLBACK));
                Err(e)
            }
        }
    }
}
