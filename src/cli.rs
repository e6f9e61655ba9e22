use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use uuid::Uuid;

use intranet::api::client::ApiClient;
use intranet::api::documento::DocumentoService;
use intranet::api::licencia::{LicenciaApi, LicenciaService};
use intranet::api::maestros::MaestrosService;
use intranet::api::solicitud::{SolicitudApi, SolicitudService};
use intranet::api::usuario::UsuarioService;
use intranet::auth::permissions;
use intranet::config::Config;
use intranet::model::documento::DocumentoId;
use intranet::model::licencia::{EstadoLicencia, LicenciaId, LicenciaMedica, LicenciaStats};
use intranet::model::role::level_label;
use intranet::model::solicitud::{EstadoSolicitud, Solicitud, SolicitudId, TipoSolicitud};
use intranet::model::usuario::Usuario;
use intranet::utils::upload::{UploadFile, file_extension, format_file_size};
use intranet::utils::rut;
use intranet::views::approvals::{Accion, ApprovalDesk, Vista};
use intranet::views::licencias::{LicenciaForm, LicenciaReviewDesk, MisLicencias, VistaRevision};
use intranet::views::solicitar::{self, FiltroSolicitudes, MisSolicitudes, SolicitudForm};

#[derive(Parser)]
#[command(name = "intranet", version, about = "HR intranet client")]
pub struct Cli {
    /// Log filter, e.g. `debug` or `intranet=trace`; defaults to RUST_LOG.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Log in with RUT and password and keep the session.
    Login {
        #[arg(long)]
        rut: String,
        #[arg(long, env = "INTRANET_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Logout,
    /// Current user, balances and capabilities.
    Me,
    #[command(subcommand)]
    Solicitudes(SolicitudCmd),
    #[command(subcommand)]
    Licencias(LicenciaCmd),
    #[command(subcommand)]
    Documentos(DocumentoCmd),
    #[command(subcommand)]
    Maestros(MaestroCmd),
}

#[derive(Args)]
pub struct Filtros {
    #[arg(long)]
    tipo: Option<TipoSolicitud>,
    /// Requester area name.
    #[arg(long)]
    area: Option<String>,
}

#[derive(Subcommand)]
pub enum SolicitudCmd {
    Mias {
        /// Matches the request number or the type label.
        #[arg(long, default_value = "")]
        buscar: String,
        #[arg(long)]
        tipo: Option<TipoSolicitud>,
        #[arg(long)]
        estado: Option<EstadoSolicitud>,
    },
    Pendientes(Filtros),
    Aprobaciones(Filtros),
    Historial(Filtros),
    Ver {
        id: Uuid,
    },
    Crear {
        #[arg(long)]
        tipo: TipoSolicitud,
        /// YYYY-MM-DD
        #[arg(long)]
        inicio: String,
        #[arg(long, default_value = "")]
        termino: String,
        #[arg(long)]
        medio_dia: bool,
        /// Hours, for time-in-lieu.
        #[arg(long, default_value_t = 0.0)]
        horas: f64,
        #[arg(long, default_value = "")]
        nombre_otro: String,
        #[arg(long)]
        motivo: Option<String>,
    },
    Aprobar {
        id: Uuid,
        #[arg(long, default_value = "")]
        comentario: String,
    },
    Rechazar {
        id: Uuid,
        #[arg(long, default_value = "")]
        comentario: String,
    },
    Anular {
        id: Uuid,
    },
    Pdf {
        id: Uuid,
        /// Defaults to `solicitud_<numero>.pdf`.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    DiasHabiles {
        inicio: String,
        fin: String,
    },
}

#[derive(Subcommand)]
pub enum LicenciaCmd {
    Mias,
    Area,
    Vigentes,
    Pendientes,
    Revisiones,
    Historial,
    Subir {
        #[arg(long)]
        folio: String,
        #[arg(long)]
        inicio: String,
        #[arg(long)]
        termino: String,
        #[arg(long)]
        archivo: PathBuf,
    },
    Aprobar {
        id: Uuid,
        #[arg(long, default_value = "")]
        comentario: String,
    },
    Rechazar {
        id: Uuid,
        #[arg(long, default_value = "")]
        comentario: String,
    },
    Eliminar {
        id: Uuid,
    },
}

#[derive(Subcommand)]
pub enum DocumentoCmd {
    Lista {
        /// Matches title, file name or document code.
        #[arg(long, default_value = "")]
        buscar: String,
    },
    Descargar {
        id: Uuid,
        /// Defaults to the document's file name.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    Eliminar {
        id: Uuid,
    },
}

#[derive(Subcommand)]
pub enum MaestroCmd {
    TiposContrato,
    Roles,
    Areas,
}

struct Services {
    client: ApiClient,
    solicitudes: SolicitudService,
    licencias: LicenciaService,
    documentos: DocumentoService,
    usuarios: UsuarioService,
    maestros: MaestrosService,
}

impl Services {
    fn new(config: &Config) -> Result<Self> {
        let client = ApiClient::from_config(config).context("building HTTP client")?;
        Ok(Self {
            solicitudes: SolicitudService::new(client.clone()),
            licencias: LicenciaService::new(client.clone(), config.licencia_routes),
            documentos: DocumentoService::new(client.clone()),
            usuarios: UsuarioService::new(client.clone()),
            maestros: MaestrosService::new(
                client.clone(),
                Duration::from_secs(config.cache_ttl_secs),
            ),
            client,
        })
    }

    async fn me(&self) -> Result<Usuario> {
        self.usuarios.me().await.context("loading current user")
    }
}

pub async fn run(command: Command, config: Config) -> Result<()> {
    let services = Services::new(&config)?;

    match command {
        Command::Login { rut, password } => {
            let rut = if rut::is_valid_format(&rut) { rut } else { rut::format(&rut) };
            services.client.login(&rut, &password).await.context("login failed")?;
            let user = services.me().await?;
            println!("Sesión iniciada como {} ({})", user.display_name(), level_label(user.nivel()));
        }
        Command::Logout => {
            services.client.logout().await?;
            println!("Sesión cerrada");
        }
        Command::Me => print_me(&services.me().await?),
        Command::Solicitudes(cmd) => run_solicitudes(&services, cmd).await?,
        Command::Licencias(cmd) => run_licencias(&services, cmd).await?,
        Command::Documentos(cmd) => run_documentos(&services, cmd).await?,
        Command::Maestros(cmd) => run_maestros(&services, cmd).await?,
    }

    Ok(())
}

fn print_me(user: &Usuario) {
    let p = permissions::resolve(Some(user));
    let saldos = user.saldos();

    println!("{} <{}>", user.display_name(), user.email);
    println!("RUT: {}  Cargo: {}", user.rut, user.cargo);
    println!("Área: {}  Rol: {} (nivel {}, {})", user.area_nombre, user.rol_nombre, p.nivel, level_label(p.nivel));
    println!(
        "Saldos: vacaciones {}  administrativos {}  sin goce acumulados {}  devolución {} h",
        saldos.vacaciones, saldos.administrativos, saldos.sin_goce, saldos.devolucion_horas
    );
    println!(
        "Puede aprobar solicitudes: {}  gestionar licencias: {}  gestionar documentos: {}  ver reportes: {}",
        p.puede_aprobar_solicitudes,
        p.puede_gestionar_licencias,
        p.puede_gestionar_documentos,
        p.puede_ver_reportes
    );
}

fn print_solicitudes<'a>(list: impl IntoIterator<Item = &'a Solicitud>) {
    let mut total = 0;
    for s in list {
        total += 1;
        println!(
            "{}  {:<14} {:<22} {:<24} {:<14} {} → {}  {} {}  [{}]",
            s.id,
            s.numero_solicitud,
            s.usuario_nombre,
            s.tipo_label(),
            s.usuario_area,
            s.fecha_inicio,
            s.fecha_termino,
            s.cantidad_dias,
            if s.tipo.counts_hours() { "h" } else { "d" },
            s.estado_label()
        );
    }
    if total == 0 {
        println!("Sin solicitudes");
    }
}

fn print_licencias(list: &[LicenciaMedica]) {
    for l in list {
        println!(
            "{}  {:<12} {:<22} {} → {}  {} días  {:<9} {}",
            l.id,
            l.numero_licencia,
            l.usuario_nombre.as_deref().unwrap_or("-"),
            l.fecha_inicio,
            l.fecha_termino,
            l.dias_totales,
            l.estado.label(),
            file_extension(l.documento_licencia.as_deref())
        );
    }
    let stats = LicenciaStats::of(list);
    println!(
        "Total {}  aprobadas {}  pendientes {}",
        stats.total, stats.aprobadas, stats.pendientes
    );
}

async fn approval_desk(
    services: &Services,
    vista: Vista,
    filtros: Option<Filtros>,
) -> Result<ApprovalDesk<SolicitudService>> {
    let mut desk = ApprovalDesk::new(services.solicitudes.clone(), services.me().await?);
    if let Some(filtros) = filtros {
        desk.filtro_tipo = filtros.tipo;
        desk.filtro_area = filtros.area;
    }
    if let Err(e) = desk.set_vista(vista).await {
        bail!("{}", desk.error().map(str::to_string).unwrap_or_else(|| e.to_string()));
    }
    Ok(desk)
}

async fn decide(services: &Services, id: Uuid, accion: Accion, comentario: &str) -> Result<()> {
    let mut desk = approval_desk(services, Vista::Pendientes, None).await?;
    desk.abrir(SolicitudId(id), accion)?;
    desk.set_comentario(comentario);
    if desk.confirmar().await.is_err() {
        bail!("{}", desk.error().unwrap_or("Error"));
    }
    if let Some(msg) = desk.success() {
        println!("{msg}");
    }
    Ok(())
}

async fn run_solicitudes(services: &Services, cmd: SolicitudCmd) -> Result<()> {
    match cmd {
        SolicitudCmd::Mias { buscar, tipo, estado } => {
            let mut mias = MisSolicitudes::new(services.solicitudes.clone());
            mias.filtro = FiltroSolicitudes {
                busqueda: buscar,
                tipo,
                estado,
            };
            mias.load().await?;
            print_solicitudes(mias.visibles());
        }
        SolicitudCmd::Pendientes(f) => {
            let desk = approval_desk(services, Vista::Pendientes, Some(f)).await?;
            print_solicitudes(desk.visibles());
        }
        SolicitudCmd::Aprobaciones(f) => {
            let desk = approval_desk(services, Vista::MisAprobaciones, Some(f)).await?;
            print_solicitudes(desk.visibles());
        }
        SolicitudCmd::Historial(f) => {
            let desk = approval_desk(services, Vista::HistorialCompleto, Some(f)).await?;
            print_solicitudes(desk.visibles());
            println!("Áreas: {}", desk.areas().join(", "));
        }
        SolicitudCmd::Ver { id } => {
            let s = services.solicitudes.get_by_id(SolicitudId(id)).await?;
            print_solicitudes([&s]);
            println!("Motivo: {}", s.motivo);
            if let Some(nombre) = &s.jefatura_aprobador_nombre {
                println!("Jefatura: {nombre}");
            }
            if let Some(nombre) = &s.direccion_aprobador_nombre {
                println!("Dirección: {nombre}");
            }
            if let Some(c) = &s.comentarios_administracion {
                println!("Comentarios: {c}");
            }
        }
        SolicitudCmd::Crear {
            tipo,
            inicio,
            termino,
            medio_dia,
            horas,
            nombre_otro,
            motivo,
        } => {
            let user = services.me().await?;
            let form = SolicitudForm {
                tipo,
                nombre_otro_permiso: nombre_otro,
                fecha_inicio: inicio,
                fecha_termino: termino,
                es_medio_dia: medio_dia,
                horas,
                motivo,
            };
            let created = solicitar::enviar(&services.solicitudes, &form, &user).await?;
            println!(
                "Solicitud {} creada ({})",
                created.numero_solicitud,
                created.estado_label()
            );
        }
        SolicitudCmd::Aprobar { id, comentario } => {
            decide(services, id, Accion::Aprobar, &comentario).await?
        }
        SolicitudCmd::Rechazar { id, comentario } => {
            decide(services, id, Accion::Rechazar, &comentario).await?
        }
        SolicitudCmd::Anular { id } => {
            let mut mias = MisSolicitudes::new(services.solicitudes.clone());
            mias.load().await?;
            mias.anular(SolicitudId(id)).await?;
            if let Some(msg) = mias.success() {
                println!("{msg}");
            }
        }
        SolicitudCmd::Pdf { id, out } => {
            let id = SolicitudId(id);
            let out = match out {
                Some(path) => path,
                None => {
                    let s = services.solicitudes.get_by_id(id).await?;
                    PathBuf::from(format!("solicitud_{}.pdf", s.numero_solicitud))
                }
            };
            let bytes = services.solicitudes.descargar_pdf(id).await?;
            tokio::fs::write(&out, &bytes)
                .await
                .with_context(|| format!("writing {}", out.display()))?;
            println!("{} ({})", out.display(), format_file_size(bytes.len() as u64));
        }
        SolicitudCmd::DiasHabiles { inicio, fin } => {
            println!("{}", services.solicitudes.calcular_dias_habiles(&inicio, &fin));
        }
    }
    Ok(())
}

async fn review_desk(
    services: &Services,
    vista: VistaRevision,
) -> Result<LicenciaReviewDesk<LicenciaService>> {
    let user = services.me().await?;
    let mut desk = LicenciaReviewDesk::new(services.licencias.clone(), &user)?;
    if let Err(e) = desk.set_vista(vista).await {
        bail!("{}", desk.error().map(str::to_string).unwrap_or_else(|| e.to_string()));
    }
    Ok(desk)
}

async fn run_licencias(services: &Services, cmd: LicenciaCmd) -> Result<()> {
    match cmd {
        LicenciaCmd::Mias => {
            let mut mias = MisLicencias::new(services.licencias.clone());
            mias.load().await?;
            print_licencias(mias.licencias());
        }
        LicenciaCmd::Area => print_licencias(&services.licencias.get_historial_area().await?),
        LicenciaCmd::Vigentes => print_licencias(&services.licencias.get_vigentes().await?),
        LicenciaCmd::Pendientes => {
            print_licencias(review_desk(services, VistaRevision::Pendientes).await?.licencias())
        }
        LicenciaCmd::Revisiones => {
            print_licencias(review_desk(services, VistaRevision::MisRevisiones).await?.licencias())
        }
        LicenciaCmd::Historial => print_licencias(
            review_desk(services, VistaRevision::HistorialCompleto)
                .await?
                .licencias(),
        ),
        LicenciaCmd::Subir {
            folio,
            inicio,
            termino,
            archivo,
        } => {
            let documento = UploadFile::from_path(&archivo)
                .await
                .with_context(|| format!("reading {}", archivo.display()))?;
            let form = LicenciaForm {
                numero_licencia: folio,
                fecha_inicio: inicio,
                fecha_termino: termino,
                documento: Some(documento),
            };
            let mut mias = MisLicencias::new(services.licencias.clone());
            let created = mias.subir(form).await?;
            println!("Licencia {} cargada ({})", created.numero_licencia, created.estado.label());
        }
        LicenciaCmd::Aprobar { id, comentario } => {
            let mut desk = review_desk(services, VistaRevision::Pendientes).await?;
            desk.gestionar(LicenciaId(id), EstadoLicencia::Aprobada, &comentario)
                .await?;
            println!("{}", desk.success().unwrap_or_default());
        }
        LicenciaCmd::Rechazar { id, comentario } => {
            let mut desk = review_desk(services, VistaRevision::Pendientes).await?;
            desk.gestionar(LicenciaId(id), EstadoLicencia::Rechazada, &comentario)
                .await?;
            println!("{}", desk.success().unwrap_or_default());
        }
        LicenciaCmd::Eliminar { id } => {
            let mut mias = MisLicencias::new(services.licencias.clone());
            mias.load().await?;
            mias.eliminar(LicenciaId(id)).await?;
            println!("{}", mias.success().unwrap_or_default());
        }
    }
    Ok(())
}

async fn run_documentos(services: &Services, cmd: DocumentoCmd) -> Result<()> {
    match cmd {
        DocumentoCmd::Lista { buscar } => {
            let documentos = services.documentos.get_all().await?;
            for d in documentos.iter().filter(|d| d.matches(&buscar)) {
                println!(
                    "{}  {:<14} {:<36} {:<11} v{:<5} {:>9}  {}",
                    d.id,
                    d.codigo_documento,
                    d.titulo,
                    d.tipo_label(),
                    d.version,
                    format_file_size(d.tamano),
                    if d.esta_vigente { "vigente" } else { "no vigente" }
                );
            }
        }
        DocumentoCmd::Descargar { id, out } => {
            let id = DocumentoId(id);
            let out = match out {
                Some(path) => path,
                None => {
                    let nombre = services.documentos.get_by_id(id).await?.nombre_archivo;
                    // server-supplied name: keep only the last component
                    Path::new(&nombre)
                        .file_name()
                        .map(PathBuf::from)
                        .with_context(|| format!("invalid file name {nombre:?}"))?
                }
            };
            let bytes = services.documentos.download(id).await?;
            tokio::fs::write(&out, &bytes)
                .await
                .with_context(|| format!("writing {}", out.display()))?;
            println!("{} ({})", out.display(), format_file_size(bytes.len() as u64));
        }
        DocumentoCmd::Eliminar { id } => {
            let permisos = permissions::resolve(Some(&services.me().await?));
            services.documentos.delete(&permisos, DocumentoId(id)).await?;
            println!("Documento eliminado");
        }
    }
    Ok(())
}

async fn run_maestros(services: &Services, cmd: MaestroCmd) -> Result<()> {
    match cmd {
        MaestroCmd::TiposContrato => {
            for t in services.maestros.tipos_contrato().await?.iter() {
                println!("{}  {}", t.id, t.nombre);
            }
        }
        MaestroCmd::Roles => {
            for r in services.maestros.roles().await?.iter() {
                println!("{}  {:<20} nivel {} ({})", r.id, r.nombre, r.nivel, level_label(r.nivel));
            }
        }
        MaestroCmd::Areas => {
            for a in services.maestros.areas().await?.iter() {
                println!(
                    "{}  {:<24} {:<8} jefe: {}  funcionarios: {}",
                    a.id,
                    a.nombre,
                    a.codigo,
                    a.jefe_nombre.as_deref().unwrap_or("-"),
                    a.total_funcionarios
                );
            }
        }
    }
    Ok(())
}
