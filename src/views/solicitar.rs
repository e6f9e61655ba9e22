use chrono::NaiveDate;
use tracing::{error, info};

use crate::api::solicitud::SolicitudApi;
use crate::error::{IntranetError, IntranetResult};
use crate::model::solicitud::{
    CrearSolicitudDto, EstadoSolicitud, Solicitud, SolicitudId, TipoSolicitud,
};
use crate::model::usuario::Usuario;
use crate::utils::business_days::{count_business_days, parse_date};

pub const SUBMIT_FALLBACK: &str = "Error al procesar la solicitud";
pub const ANNUL_FALLBACK: &str = "No se pudo anular la solicitud";

#[derive(Debug, Clone)]
pub struct SolicitudForm {
    pub tipo: TipoSolicitud,
    pub nombre_otro_permiso: String,
    /// `YYYY-MM-DD` as typed.
    pub fecha_inicio: String,
    pub fecha_termino: String,
    pub es_medio_dia: bool,
    /// Only read for time-in-lieu, which is requested in hours.
    pub horas: f64,
    pub motivo: Option<String>,
}

impl SolicitudForm {
    pub fn new(tipo: TipoSolicitud) -> Self {
        Self {
            tipo,
            nombre_otro_permiso: String::new(),
            fecha_inicio: String::new(),
            fecha_termino: String::new(),
            es_medio_dia: false,
            horas: 0.0,
            motivo: None,
        }
    }

    /// Start and end dates; a half day ends the day it starts.
    pub fn fechas(&self) -> (Option<NaiveDate>, Option<NaiveDate>) {
        let inicio = parse_date(&self.fecha_inicio);
        if self.es_medio_dia {
            return (inicio, inicio);
        }
        (inicio, parse_date(&self.fecha_termino))
    }

    /// Quantity charged: 0.5 for a half day, the typed hours for
    /// time-in-lieu, the business-day count otherwise.
    pub fn cantidad(&self) -> f64 {
        if self.es_medio_dia {
            return 0.5;
        }
        if self.tipo.counts_hours() {
            return self.horas;
        }
        let (inicio, fin) = self.fechas();
        count_business_days(inicio, fin) as f64
    }

    pub fn default_motivo(&self) -> String {
        format!("Solicitud de {}", self.tipo.to_string().replacen('_', " ", 1))
    }

    /// Checks the form against the user's balances and builds the payload.
    pub fn validate(&self, user: &Usuario) -> IntranetResult<CrearSolicitudDto> {
        let (inicio, fin) = self.fechas();

        let inicio = inicio.ok_or_else(|| IntranetError::validation("fecha_inicio", "Requerido"))?;
        let fin = fin.ok_or_else(|| IntranetError::validation("fecha_termino", "Requerido"))?;
        if fin < inicio {
            return Err(IntranetError::validation(
                "fecha_termino",
                "No puede ser anterior al inicio",
            ));
        }

        let cantidad = self.cantidad();
        let saldos = user.saldos();
        let saldo = match self.tipo {
            TipoSolicitud::Vacaciones => Some(saldos.vacaciones),
            TipoSolicitud::DiaAdministrativo => Some(saldos.administrativos),
            _ => None,
        };
        if saldo.is_some_and(|disponible| cantidad > disponible) {
            return Err(IntranetError::validation("cantidad_dias", "Días insuficientes."));
        }

        let nombre_otro_permiso = match self.tipo {
            TipoSolicitud::OtroPermiso => {
                let nombre = self.nombre_otro_permiso.trim();
                if nombre.is_empty() {
                    return Err(IntranetError::validation("nombre_otro_permiso", "Requerido"));
                }
                Some(nombre.to_string())
            }
            _ => None,
        };

        if cantidad <= 0.0 {
            return Err(IntranetError::validation(
                "cantidad_dias",
                "La cantidad debe ser mayor a cero.",
            ));
        }

        let motivo = self
            .motivo
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| self.default_motivo());
        let telefono_contacto = user
            .telefono
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or("N/A")
            .to_string();

        Ok(CrearSolicitudDto {
            tipo: self.tipo,
            nombre_otro_permiso,
            fecha_inicio: inicio,
            fecha_termino: fin,
            cantidad_dias: cantidad,
            es_medio_dia: self.es_medio_dia,
            motivo,
            telefono_contacto,
        })
    }
}

/// Validates and submits; nothing is sent when validation fails.
pub async fn enviar<S: SolicitudApi + ?Sized>(
    service: &S,
    form: &SolicitudForm,
    user: &Usuario,
) -> IntranetResult<Solicitud> {
    let dto = form.validate(user)?;
    service.create(&dto).await.map_err(|e| {
        error!(error = %e, tipo = %dto.tipo, "Failed to submit request");
        e
    })
}

/// Local narrowing of the requester's list; `None` means every value.
#[derive(Debug, Clone, Default)]
pub struct FiltroSolicitudes {
    /// Matched against the request number and the type label.
    pub busqueda: String,
    pub tipo: Option<TipoSolicitud>,
    pub estado: Option<EstadoSolicitud>,
}

impl FiltroSolicitudes {
    pub fn matches(&self, solicitud: &Solicitud) -> bool {
        let term = self.busqueda.trim().to_lowercase();
        let by_text = term.is_empty()
            || solicitud.numero_solicitud.to_lowercase().contains(&term)
            || solicitud.tipo_label().to_lowercase().contains(&term);
        by_text
            && self.tipo.is_none_or(|t| t == solicitud.tipo)
            && self.estado.as_ref().is_none_or(|e| *e == solicitud.estado)
    }
}

/// The requester's own requests, newest first.
pub struct MisSolicitudes<S> {
    service: S,
    solicitudes: Vec<Solicitud>,
    error: Option<String>,
    success: Option<String>,
    pub filtro: FiltroSolicitudes,
}

impl<S: SolicitudApi> MisSolicitudes<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            solicitudes: Vec::new(),
            error: None,
            success: None,
            filtro: FiltroSolicitudes::default(),
        }
    }

    pub fn solicitudes(&self) -> &[Solicitud] {
        &self.solicitudes
    }

    /// Loaded requests that pass `filtro`, in load order.
    pub fn visibles(&self) -> Vec<&Solicitud> {
        self.solicitudes
            .iter()
            .filter(|s| self.filtro.matches(s))
            .collect()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn success(&self) -> Option<&str> {
        self.success.as_deref()
    }

    pub async fn load(&mut self) -> IntranetResult<()> {
        self.error = None;
        match self.service.get_mis_solicitudes().await {
            Ok(mut data) => {
                data.sort_by(|a, b| {
                    b.creada_en
                        .cmp(&a.creada_en)
                        .then_with(|| b.numero_solicitud.cmp(&a.numero_solicitud))
                });
                self.solicitudes = data;
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Failed to load own requests");
                self.error = Some(e.banner(crate::views::approvals::LOAD_FALLBACK));
                Err(e)
            }
        }
    }

    /// Withdraws a request that no one has decided on yet.
    pub async fn anular(&mut self, id: SolicitudId) -> IntranetResult<()> {
        let solicitud = self
            .solicitudes
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| IntranetError::validation("solicitud", "Solicitud no encontrada"))?;
        if !solicitud.estado.is_pending() {
            return Err(IntranetError::validation(
                "estado",
                "Solo se pueden anular solicitudes pendientes",
            ));
        }
        let numero = solicitud.numero_solicitud.clone();

        match self.service.anular_usuario(id).await {
            Ok(resp) => {
                info!(numero = %numero, "Request annulled by requester");
                self.success = Some(
                    resp.message
                        .unwrap_or_else(|| format!("Solicitud {numero} anulada")),
                );
                let _ = self.load().await;
                Ok(())
            }
            Err(e) => {
                error!(error = %e, numero = %numero, "Failed to annul request");
                self.error = Some(e.banner(ANNUL_FALLBACK));
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::solicitud::EstadoSolicitud;
    use crate::model::solicitud::fixtures::solicitud;
    use crate::model::usuario::fixtures::usuario;
    use crate::views::approvals::fakes::FakeSolicitudes;

    fn form(tipo: TipoSolicitud, inicio: &str, fin: &str) -> SolicitudForm {
        let mut form = SolicitudForm::new(tipo);
        form.fecha_inicio = inicio.into();
        form.fecha_termino = fin.into();
        form
    }

    #[test]
    fn quantity_is_business_days() {
        let f = form(TipoSolicitud::Vacaciones, "2024-01-01", "2024-01-07");
        assert_eq!(f.cantidad(), 5.0);
    }

    #[test]
    fn half_day_forces_half_and_same_end() {
        let mut f = form(TipoSolicitud::DiaAdministrativo, "2024-01-03", "2024-01-10");
        f.es_medio_dia = true;
        assert_eq!(f.cantidad(), 0.5);

        let dto = f.validate(&usuario(1, "Urgencia")).unwrap();
        assert_eq!(dto.fecha_termino, dto.fecha_inicio);
        assert_eq!(dto.cantidad_dias, 0.5);
        assert!(dto.es_medio_dia);
    }

    #[test]
    fn half_day_needs_no_end_date() {
        let mut f = form(TipoSolicitud::DiaAdministrativo, "2024-01-03", "");
        f.es_medio_dia = true;
        assert!(f.validate(&usuario(1, "Urgencia")).is_ok());
    }

    #[test]
    fn time_in_lieu_uses_typed_hours() {
        let mut f = form(TipoSolicitud::DevolucionTiempo, "2024-01-01", "2024-01-05");
        f.horas = 3.0;
        assert_eq!(f.cantidad(), 3.0);
        assert_eq!(f.validate(&usuario(1, "Urgencia")).unwrap().cantidad_dias, 3.0);
    }

    #[test]
    fn missing_dates_are_required() {
        let user = usuario(1, "Urgencia");
        let err = form(TipoSolicitud::Vacaciones, "", "2024-01-05")
            .validate(&user)
            .unwrap_err();
        assert_eq!(err.to_string(), "fecha_inicio: Requerido");

        let err = form(TipoSolicitud::Vacaciones, "2024-01-01", "")
            .validate(&user)
            .unwrap_err();
        assert_eq!(err.to_string(), "fecha_termino: Requerido");
    }

    #[test]
    fn balance_limits_vacation_and_administrative_days() {
        // fixture: 15 vacation days, 6 administrative days
        let user = usuario(1, "Urgencia");
        let err = form(TipoSolicitud::Vacaciones, "2024-01-01", "2024-01-31")
            .validate(&user)
            .unwrap_err();
        assert_eq!(err.banner(""), "Días insuficientes.");

        let err = form(TipoSolicitud::DiaAdministrativo, "2024-01-01", "2024-01-09")
            .validate(&user)
            .unwrap_err();
        assert_eq!(err.banner(""), "Días insuficientes.");

        // unpaid leave has no balance to check
        assert!(form(TipoSolicitud::PermisoSinGoce, "2024-01-01", "2024-01-31")
            .validate(&user)
            .is_ok());
    }

    #[test]
    fn other_permit_needs_a_name() {
        let user = usuario(1, "Urgencia");
        let mut f = form(TipoSolicitud::OtroPermiso, "2024-01-02", "2024-01-02");
        assert_eq!(
            f.validate(&user).unwrap_err().to_string(),
            "nombre_otro_permiso: Requerido"
        );
        f.nombre_otro_permiso = " Matrimonio ".into();
        assert_eq!(
            f.validate(&user).unwrap().nombre_otro_permiso.as_deref(),
            Some("Matrimonio")
        );
    }

    #[test]
    fn weekend_only_range_is_rejected() {
        let err = form(TipoSolicitud::PermisoSinGoce, "2024-01-06", "2024-01-07")
            .validate(&usuario(1, "Urgencia"))
            .unwrap_err();
        assert_eq!(err.banner(""), "La cantidad debe ser mayor a cero.");
    }

    #[test]
    fn defaults_for_reason_and_phone() {
        let dto = form(TipoSolicitud::DiaAdministrativo, "2024-01-02", "2024-01-02")
            .validate(&usuario(1, "Urgencia"))
            .unwrap();
        assert_eq!(dto.motivo, "Solicitud de dia administrativo");
        assert_eq!(dto.telefono_contacto, "N/A");

        let mut user = usuario(1, "Urgencia");
        user.telefono = Some("+56 9 1234 5678".into());
        let mut f = form(TipoSolicitud::PermisoSinGoce, "2024-01-02", "2024-01-02");
        f.motivo = Some("Trámite notarial".into());
        let dto = f.validate(&user).unwrap();
        assert_eq!(dto.motivo, "Trámite notarial");
        assert_eq!(dto.telefono_contacto, "+56 9 1234 5678");
        // only the first underscore is replaced
        assert_eq!(f.default_motivo(), "Solicitud de permiso sin_goce");
    }

    #[tokio::test]
    async fn invalid_form_is_not_sent() {
        let fake = FakeSolicitudes::default();
        let f = form(TipoSolicitud::Vacaciones, "", "");
        assert!(enviar(&fake, &f, &usuario(1, "Urgencia")).await.is_err());
        assert!(fake.calls().is_empty());

        let f = form(TipoSolicitud::Vacaciones, "2024-01-01", "2024-01-05");
        let created = enviar(&fake, &f, &usuario(1, "Urgencia")).await.unwrap();
        assert_eq!(created.cantidad_dias, 5.0);
        assert_eq!(fake.calls(), vec!["create:vacaciones"]);
    }

    #[tokio::test]
    async fn only_pending_requests_can_be_annulled() {
        let pending = solicitud("SOL-1", EstadoSolicitud::PendienteJefatura, "Urgencia", 1);
        let approved = solicitud("SOL-2", EstadoSolicitud::Aprobada, "Urgencia", 2);
        let (pending_id, approved_id) = (pending.id, approved.id);
        let fake = FakeSolicitudes {
            mias: vec![pending, approved],
            ..Default::default()
        };

        let mut mias = MisSolicitudes::new(fake);
        mias.load().await.unwrap();
        assert_eq!(mias.solicitudes()[0].numero_solicitud, "SOL-2");

        assert!(mias.anular(approved_id).await.unwrap_err().is_validation());
        mias.anular(pending_id).await.unwrap();
        assert_eq!(mias.success(), Some("Solicitud SOL-1 anulada"));
        assert_eq!(
            mias.service.calls(),
            vec![
                "mis_solicitudes".to_string(),
                format!("anular_usuario:{pending_id}"),
                "mis_solicitudes".to_string()
            ]
        );
    }

    #[tokio::test]
    async fn list_narrows_by_text_type_and_state() {
        let mut otro = solicitud("SOL-7", EstadoSolicitud::Aprobada, "Urgencia", 3);
        otro.tipo = TipoSolicitud::DiaAdministrativo;
        otro.tipo_display = "Día Administrativo".into();
        let fake = FakeSolicitudes {
            mias: vec![
                solicitud("SOL-1", EstadoSolicitud::PendienteJefatura, "Urgencia", 1),
                solicitud("SOL-2", EstadoSolicitud::Aprobada, "Urgencia", 2),
                otro,
            ],
            ..Default::default()
        };
        let mut mias = MisSolicitudes::new(fake);
        mias.load().await.unwrap();

        let numeros = |m: &MisSolicitudes<FakeSolicitudes>| {
            m.visibles()
                .iter()
                .map(|s| s.numero_solicitud.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(numeros(&mias), vec!["SOL-7", "SOL-2", "SOL-1"]);

        mias.filtro.busqueda = "  sol-2 ".into();
        assert_eq!(numeros(&mias), vec!["SOL-2"]);

        // the type label is searchable too
        mias.filtro.busqueda = "administrativo".into();
        assert_eq!(numeros(&mias), vec!["SOL-7"]);

        mias.filtro.busqueda.clear();
        mias.filtro.estado = Some(EstadoSolicitud::Aprobada);
        assert_eq!(numeros(&mias), vec!["SOL-7", "SOL-2"]);

        mias.filtro.tipo = Some(TipoSolicitud::Vacaciones);
        assert_eq!(numeros(&mias), vec!["SOL-2"]);

        mias.filtro.busqueda = "SOL-1".into();
        assert!(mias.visibles().is_empty());
    }
}
