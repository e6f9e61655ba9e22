use std::cmp::Ordering;

use tracing::{error, info, warn};

use crate::api::solicitud::SolicitudApi;
use crate::auth::permissions;
use crate::error::{IntranetError, IntranetResult};
use crate::model::solicitud::{
    AprobarRechazarDto, EstadoSolicitud, Solicitud, SolicitudId, TipoSolicitud,
};
use crate::model::usuario::Usuario;

pub const LOAD_FALLBACK: &str = "No se pudieron cargar las solicitudes.";
pub const APPROVE_FALLBACK: &str = "Error al aprobar";
pub const REJECT_FALLBACK: &str = "Error al rechazar";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Vista {
    #[default]
    Pendientes,
    MisAprobaciones,
    HistorialCompleto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accion {
    Aprobar,
    Rechazar,
}

/// The confirmation dialog of an approve/reject action.
#[derive(Debug, Clone)]
pub struct Dialogo {
    pub accion: Accion,
    pub solicitud: Solicitud,
    pub comentario: String,
}

/// Keeps, from the server's pending set, what this viewer acts on: the
/// direction stage for level 3+, their own area's supervisor stage for
/// level 2. Level 1 sees the set unchanged.
pub fn narrow_pending(data: Vec<Solicitud>, viewer: &Usuario) -> Vec<Solicitud> {
    match viewer.nivel() {
        n if n >= 3 => data
            .into_iter()
            .filter(|s| s.estado == EstadoSolicitud::PendienteDireccion)
            .collect(),
        2 => data
            .into_iter()
            .filter(|s| {
                s.estado == EstadoSolicitud::PendienteJefatura
                    && viewer.belongs_to_area(&s.usuario_area)
            })
            .collect(),
        _ => data,
    }
}

fn oldest_first(a: &Solicitud, b: &Solicitud) -> Ordering {
    a.creada_en
        .cmp(&b.creada_en)
        .then_with(|| a.numero_solicitud.cmp(&b.numero_solicitud))
}

/// Pending work oldest-first, everything else newest-first.
pub fn sort_for(vista: Vista, solicitudes: &mut [Solicitud]) {
    match vista {
        Vista::Pendientes => solicitudes.sort_by(oldest_first),
        Vista::MisAprobaciones | Vista::HistorialCompleto => {
            solicitudes.sort_by(|a, b| oldest_first(b, a))
        }
    }
}

pub struct ApprovalDesk<S> {
    service: S,
    user: Usuario,
    vista: Vista,
    solicitudes: Vec<Solicitud>,

    pub filtro_tipo: Option<TipoSolicitud>,
    pub filtro_area: Option<String>,

    dialogo: Option<Dialogo>,
    processing: bool,
    loading: bool,
    error: Option<String>,
    success: Option<String>,
}

impl<S: SolicitudApi> ApprovalDesk<S> {
    pub fn new(service: S, user: Usuario) -> Self {
        Self {
            service,
            user,
            vista: Vista::default(),
            solicitudes: Vec::new(),
            filtro_tipo: None,
            filtro_area: None,
            dialogo: None,
            processing: false,
            loading: false,
            error: None,
            success: None,
        }
    }

    pub fn vista(&self) -> Vista {
        self.vista
    }

    pub fn is_loading(&self) -> bool {
        self.loading
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

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn dismiss_success(&mut self) {
        self.success = None;
    }

    pub fn dialogo(&self) -> Option<&Dialogo> {
        self.dialogo.as_ref()
    }

    /// The loaded set, ordered for the current tab, before client filters.
    pub fn solicitudes(&self) -> &[Solicitud] {
        &self.solicitudes
    }

    pub async fn set_vista(&mut self, vista: Vista) -> IntranetResult<()> {
        self.vista = vista;
        self.load().await
    }

    /// Fetches the current tab. On failure the previous list stays and the
    /// error banner is set.
    pub async fn load(&mut self) -> IntranetResult<()> {
        self.loading = true;
        self.error = None;

        let result = match self.vista {
            Vista::Pendientes => self.service.get_pendientes().await,
            Vista::MisAprobaciones => self.service.get_mis_aprobaciones().await,
            Vista::HistorialCompleto => self.service.get_historial_completo().await,
        };
        self.loading = false;

        match result {
            Ok(data) => {
                let mut data = match self.vista {
                    Vista::Pendientes => narrow_pending(data, &self.user),
                    _ => data,
                };
                sort_for(self.vista, &mut data);
                info!(vista = ?self.vista, total = data.len(), "Requests loaded");
                self.solicitudes = data;
                Ok(())
            }
            Err(e) => {
                error!(error = %e, vista = ?self.vista, "Failed to load requests");
                self.error = Some(e.banner(LOAD_FALLBACK));
                Err(e)
            }
        }
    }

    /// The loaded set narrowed by the type and area filters.
    pub fn visibles(&self) -> Vec<&Solicitud> {
        self.solicitudes
            .iter()
            .filter(|s| self.filtro_tipo.is_none_or(|t| s.tipo == t))
            .filter(|s| {
                self.filtro_area
                    .as_deref()
                    .is_none_or(|area| s.usuario_area == area)
            })
            .collect()
    }

    /// Distinct requester areas of the loaded set, in load order.
    pub fn areas(&self) -> Vec<String> {
        let mut areas: Vec<String> = Vec::new();
        for s in &self.solicitudes {
            if !areas.contains(&s.usuario_area) {
                areas.push(s.usuario_area.clone());
            }
        }
        areas
    }

    pub fn abrir(&mut self, id: SolicitudId, accion: Accion) -> IntranetResult<()> {
        let solicitud = self
            .solicitudes
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| IntranetError::validation("solicitud", "Solicitud no encontrada"))?;

        if !solicitud.estado.is_pending() {
            return Err(IntranetError::validation(
                "estado",
                "La solicitud ya fue procesada",
            ));
        }
        permissions::resolve(Some(&self.user)).require_approver_of(&solicitud.usuario_area)?;

        self.dialogo = Some(Dialogo {
            accion,
            solicitud,
            comentario: String::new(),
        });
        Ok(())
    }

    pub fn set_comentario(&mut self, comentario: &str) {
        if let Some(dialogo) = self.dialogo.as_mut() {
            dialogo.comentario = comentario.to_string();
        }
    }

    pub fn cerrar(&mut self) {
        self.dialogo = None;
    }

    /// Sends the open dialog's action and reloads the tab.
    ///
    /// A rejection without a comment fails validation before any call. A
    /// second confirm while one is in flight is refused.
    pub async fn confirmar(&mut self) -> IntranetResult<()> {
        let dialogo = self
            .dialogo
            .clone()
            .ok_or_else(|| IntranetError::validation("dialogo", "No hay una acción abierta"))?;

        if self.processing {
            warn!(id = %dialogo.solicitud.id, "Action already in flight");
            return Err(IntranetError::validation(
                "processing",
                "Ya hay una acción en curso",
            ));
        }

        let comentario = dialogo.comentario.trim().to_string();
        if dialogo.accion == Accion::Rechazar && comentario.is_empty() {
            let err = IntranetError::validation(
                "comentarios",
                "Debes proporcionar un motivo para rechazar",
            );
            self.error = Some(err.banner(REJECT_FALLBACK));
            return Err(err);
        }

        let id = dialogo.solicitud.id;
        let nivel = self.user.nivel();
        self.processing = true;

        let result = match dialogo.accion {
            Accion::Aprobar => {
                let dto = AprobarRechazarDto {
                    aprobar: true,
                    comentarios: (!comentario.is_empty()).then_some(comentario),
                };
                self.service.aprobar(id, &dto, nivel).await
            }
            Accion::Rechazar => self.service.rechazar(id, &comentario, nivel).await,
        };

        let (verb, fallback) = match dialogo.accion {
            Accion::Aprobar => ("aprobada", APPROVE_FALLBACK),
            Accion::Rechazar => ("rechazada", REJECT_FALLBACK),
        };

        let outcome = match result {
            Ok(_) => {
                info!(id = %id, verb, "Request processed");
                self.success = Some(format!(
                    "Solicitud de {} {}",
                    dialogo.solicitud.usuario_nombre, verb
                ));
                // a failed reload only sets the banner; the action itself went through
                let _ = self.load().await;
                self.cerrar();
                Ok(())
            }
            Err(e) => {
                error!(error = %e, id = %id, "Approval action failed");
                self.error = Some(e.banner(fallback));
                Err(e)
            }
        };

        self.processing = false;
        outcome
    }
}
