#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::time::Duration;

use actix_web::dev::ServerHandle;
use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::{Value, json};

use intranet::api::client::ApiClient;
use intranet::auth::session::SessionStore;

pub const RUT: &str = "12.345.678-5";
pub const PASSWORD: &str = "secret";
/// Requests for this id fail with a DRF error body.
pub const LOCKED_ID: &str = "00000000-0000-0000-0000-00000000dead";

#[derive(Debug, Clone)]
pub struct Hit {
    pub method: String,
    pub path: String,
    pub query: String,
    pub authorization: Option<String>,
    pub request_id: Option<String>,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl Hit {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

pub struct MockState {
    pub hits: Mutex<Vec<Hit>>,
    pub nivel: AtomicU8,
    pub refresh_rejected: AtomicBool,
    pub area: Mutex<String>,
    pub pendientes: Mutex<Vec<Value>>,
    pub licencias: Mutex<Vec<Value>>,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            hits: Mutex::new(Vec::new()),
            nivel: AtomicU8::new(1),
            refresh_rejected: AtomicBool::new(false),
            area: Mutex::new("Urgencia".into()),
            pendientes: Mutex::new(Vec::new()),
            licencias: Mutex::new(Vec::new()),
        }
    }
}

pub struct MockApi {
    pub base_url: String,
    pub state: web::Data<MockState>,
    handle: ServerHandle,
}

impl MockApi {
    pub async fn start() -> Self {
        let state = web::Data::new(MockState::default());
        let data = state.clone();

        let server = HttpServer::new(move || {
            App::new()
                .app_data(data.clone())
                .default_service(web::to(dispatch))
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .expect("bind mock api");
        let addr = server.addrs()[0];
        let server = server.run();
        let handle = server.handle();
        actix_web::rt::spawn(server);

        Self {
            base_url: format!("http://{addr}/api"),
            state,
            handle,
        }
    }

    pub fn set_nivel(&self, nivel: u8) {
        self.state.nivel.store(nivel, Ordering::SeqCst);
    }

    /// Makes `/token/refresh/` answer 401, as for a blacklisted refresh token.
    pub fn reject_refresh(&self) {
        self.state.refresh_rejected.store(true, Ordering::SeqCst);
    }

    pub fn set_area(&self, area: &str) {
        *self.state.area.lock().unwrap() = area.to_string();
    }

    pub fn set_pendientes(&self, list: Vec<Value>) {
        *self.state.pendientes.lock().unwrap() = list;
    }

    pub fn set_licencias(&self, list: Vec<Value>) {
        *self.state.licencias.lock().unwrap() = list;
    }

    pub fn hits(&self) -> Vec<Hit> {
        self.state.hits.lock().unwrap().clone()
    }

    /// `METHOD /path` of every request received, token calls included.
    pub fn paths(&self) -> Vec<String> {
        self.hits()
            .iter()
            .map(|h| format!("{} {}", h.method, h.path))
            .collect()
    }

    pub fn clear_hits(&self) {
        self.state.hits.lock().unwrap().clear();
    }

    pub fn client(&self, session_file: &std::path::Path) -> ApiClient {
        ApiClient::new(
            &self.base_url,
            Duration::from_secs(5),
            SessionStore::new(session_file),
        )
        .expect("client")
    }

    /// A client that already logged in; the login hit is cleared.
    pub async fn logged_in(&self, dir: &tempfile::TempDir) -> ApiClient {
        let client = self.client(&dir.path().join("session.json"));
        client.login(RUT, PASSWORD).await.expect("login");
        self.clear_hits();
        client
    }

    pub async fn stop(self) {
        self.handle.stop(false).await;
    }
}

pub fn token(token_type: &str, expires_in: i64) -> String {
    let exp = chrono::Utc::now().timestamp() + expires_in;
    encode(
        &Header::default(),
        &json!({
            "token_type": token_type,
            "exp": exp,
            "iat": exp - 60,
            "jti": uuid::Uuid::new_v4().to_string(),
            "user_id": "0b0c1a55-7f3e-4a55-9d0e-0a4c6c1c9f22",
        }),
        &EncodingKey::from_secret(b"mock-signing-key"),
    )
    .expect("encode token")
}

pub fn solicitud_json(id: &str, numero: &str, estado: &str, area: &str, creada_en: &str) -> Value {
    json!({
        "id": id,
        "numero_solicitud": numero,
        "usuario": "5d1f4e3a-1111-4a55-9d0e-0a4c6c1c9f22",
        "usuario_nombre": format!("Funcionario {numero}"),
        "usuario_area": area,
        "usuario_cargo": "TENS",
        "tipo": "vacaciones",
        "tipo_display": "Vacaciones",
        "nombre_otro_permiso": null,
        "fecha_inicio": "2024-02-05",
        "fecha_termino": "2024-02-09",
        "cantidad_dias": "5.00",
        "es_medio_dia": false,
        "motivo": "Solicitud de vacaciones",
        "telefono_contacto": "N/A",
        "estado": estado,
        "estado_display": estado,
        "jefatura_aprobador_nombre": null,
        "fecha_aprobacion_jefatura": null,
        "direccion_aprobador_nombre": null,
        "fecha_aprobacion_direccion": null,
        "comentarios_administracion": "",
        "pdf_generado": false,
        "url_pdf": "",
        "creada_en": creada_en,
        "actualizada_en": creada_en,
    })
}

pub fn licencia_json(id: &str, folio: &str, estado: &str) -> Value {
    json!({
        "id": id,
        "numero_licencia": folio,
        "usuario": "5d1f4e3a-1111-4a55-9d0e-0a4c6c1c9f22",
        "usuario_nombre": "Ana Rojas Soto",
        "area_nombre": "Urgencia",
        "fecha_inicio": "2024-04-01",
        "fecha_termino": "2024-04-07",
        "dias_totales": 7,
        "documento_licencia": format!("http://testserver/media/licencias/2024/04/{folio}.pdf"),
        "estado": estado,
        "revisada_por": null,
        "revisada_por_nombre": null,
        "comentarios_revision": null,
        "fecha_revision": null,
        "creado_en": "2024-04-01T08:00:00Z",
        "actualizada_en": "2024-04-01T08:00:00Z",
        "esta_vigente": true,
        "dias_restantes": 3,
    })
}

pub const DOCUMENTO_PROTOCOLO: &str = "9d4a7e10-1111-4a55-9d0e-0a4c6c1c9f01";
pub const DOCUMENTO_CIRCULAR: &str = "9d4a7e10-1111-4a55-9d0e-0a4c6c1c9f02";

pub fn documento_json(id: &str, codigo: &str, titulo: &str, tipo: &str, archivo: &str) -> Value {
    json!({
        "id": id,
        "codigo_documento": codigo,
        "titulo": titulo,
        "tipo": tipo,
        "tipo_display": "",
        "categoria": 1,
        "categoria_nombre": "General",
        "extension": "pdf",
        "tamano": 2048,
        "nombre_archivo": archivo,
        "mime_type": "application/pdf",
        "storage_type": "database",
        "version": "1.0",
        "fecha_vigencia": "2024-01-01",
        "fecha_expiracion": null,
        "publico": true,
        "descargas": 0,
        "visualizaciones": 0,
        "activo": true,
        "esta_vigente": true,
        "subido_por_nombre": "Luis Pérez",
        "subido_en": "2024-01-02T10:00:00Z",
        "url_descarga": format!("/api/documentos/{id}/download/"),
    })
}

fn documentos() -> Vec<Value> {
    vec![
        documento_json(
            DOCUMENTO_PROTOCOLO,
            "DOC-2024-0001",
            "Protocolo de Turnos",
            "protocolo",
            "turnos.pdf",
        ),
        documento_json(
            DOCUMENTO_CIRCULAR,
            "DOC-2024-0002",
            "Circular Feriados",
            "circular",
            "feriados_2024.pdf",
        ),
    ]
}

fn header(req: &HttpRequest, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn dispatch(req: HttpRequest, body: web::Bytes, state: web::Data<MockState>) -> HttpResponse {
    let method = req.method().as_str().to_string();
    let path = req.path().to_string();

    state.hits.lock().unwrap().push(Hit {
        method: method.clone(),
        path: path.clone(),
        query: req.query_string().to_string(),
        authorization: header(&req, "Authorization"),
        request_id: header(&req, "X-Request-Id"),
        content_type: header(&req, "Content-Type"),
        body: body.to_vec(),
    });

    let segments: Vec<&str> = path
        .trim_start_matches("/api/")
        .trim_end_matches('/')
        .split('/')
        .collect();

    if segments.get(1) == Some(&LOCKED_ID) {
        return HttpResponse::BadRequest()
            .json(json!({"error": "Esta solicitud no está en un estado que permita esta acción"}));
    }

    let authorized = header(&req, "Authorization")
        .map(|h| h.starts_with("Bearer "))
        .unwrap_or(false);
    let public = matches!(segments.as_slice(), ["token"] | ["token", "refresh"]);
    if !public && !authorized {
        return HttpResponse::Unauthorized()
            .json(json!({"detail": "Las credenciales de autenticación no se proveyeron."}));
    }

    match (method.as_str(), segments.as_slice()) {
        ("POST", ["token"]) => {
            let creds: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
            if creds["rut"] == RUT && creds["password"] == PASSWORD {
                HttpResponse::Ok().json(json!({
                    "access": token("access", 3600),
                    "refresh": token("refresh", 86400),
                }))
            } else {
                HttpResponse::Unauthorized().json(json!({
                    "detail": "No active account found with the given credentials"
                }))
            }
        }
        ("POST", ["token", "refresh"]) => {
            if state.refresh_rejected.load(Ordering::SeqCst) {
                HttpResponse::Unauthorized().json(json!({
                    "detail": "Token is invalid or expired",
                    "code": "token_not_valid",
                }))
            } else {
                HttpResponse::Ok().json(json!({"access": token("access", 3600)}))
            }
        }
        ("GET", ["usuarios", "me"]) => HttpResponse::Ok().json(json!({
            "id": "0b0c1a55-7f3e-4a55-9d0e-0a4c6c1c9f22",
            "rut": RUT,
            "nombre": "Ana",
            "apellido_paterno": "Rojas",
            "apellido_materno": "Soto",
            "nombre_completo": "Ana Rojas Soto",
            "email": "ana.rojas@example.cl",
            "telefono": "+56 9 1234 5678",
            "cargo": "Enfermera",
            "area": "9e4c3b2a-2222-4a55-9d0e-0a4c6c1c9f22",
            "area_nombre": state.area.lock().unwrap().clone(),
            "rol": "7a6b5c4d-3333-4a55-9d0e-0a4c6c1c9f22",
            "rol_nombre": "Rol",
            "rol_nivel": state.nivel.load(Ordering::SeqCst),
            "dias_vacaciones_disponibles": "15.00",
            "dias_administrativos_disponibles": "6.00",
            "dias_sin_goce_acumulados": "0.00",
            "horas_devolucion_disponibles": 4,
            "is_active": true,
        })),
        ("GET", ["solicitudes"]) => HttpResponse::Ok().json(json!([])),
        ("POST", ["solicitudes"]) => {
            let dto: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
            let mut created = solicitud_json(
                "6f1c2a50-8a3e-4d55-9d0e-0a4c6c1c9f99",
                "SOL-2024-0100",
                "pendiente_jefatura",
                "Urgencia",
                "2024-05-01T10:00:00Z",
            );
            created["tipo"] = dto["tipo"].clone();
            created["cantidad_dias"] = dto["cantidad_dias"].clone();
            HttpResponse::Created().json(created)
        }
        ("GET", ["solicitudes", "pendientes"]) => {
            HttpResponse::Ok().json(state.pendientes.lock().unwrap().clone())
        }
        ("GET", ["solicitudes", "mis_solicitudes" | "mis_aprobaciones" | "historial_completo"]) => {
            HttpResponse::Ok().json(json!([]))
        }
        ("GET", ["solicitudes", id]) => {
            let found = state
                .pendientes
                .lock()
                .unwrap()
                .iter()
                .find(|s| s["id"] == *id)
                .cloned();
            match found {
                Some(s) => HttpResponse::Ok().json(s),
                None => HttpResponse::NotFound().json(json!({"detail": "No encontrado."})),
            }
        }
        ("POST", ["solicitudes", _, "aprobar_jefatura" | "aprobar_direccion"]) => {
            HttpResponse::Ok().json(json!({
                "message": "Solicitud procesada",
                "nuevo_estado": "pendiente_direccion",
            }))
        }
        ("POST", ["solicitudes", _, "anular_usuario"]) => HttpResponse::Ok().finish(),
        ("GET", ["solicitudes", _, "descargar_pdf"]) => HttpResponse::Ok()
            .content_type("application/pdf")
            .body(&b"%PDF-1.4 mock"[..]),
        ("GET", ["licencias"]) => HttpResponse::Ok().json(state.licencias.lock().unwrap().clone()),
        (
            "GET",
            [
                "licencias",
                "mis_licencias" | "historial_area" | "vigentes" | "pendientes" | "mis_revisiones"
                | "historial_completo",
            ],
        ) => HttpResponse::Ok().json(state.licencias.lock().unwrap().clone()),
        ("POST", ["licencias"]) => HttpResponse::Created().json(licencia_json(
            "3c2b1a00-4444-4a55-9d0e-0a4c6c1c9f22",
            "LM-889",
            "pendiente",
        )),
        ("DELETE", ["licencias", _]) => HttpResponse::NoContent().finish(),
        ("POST", ["licencias", _, "gestionar-licencia" | "gestionar_licencia"]) => {
            let dto: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
            HttpResponse::Ok().json(json!({"status": dto["nuevo_estado"], "revisor": "Ana Rojas Soto"}))
        }
        ("GET", ["documentos"]) => HttpResponse::Ok().json(json!({
            "count": 2,
            "next": null,
            "previous": null,
            "results": documentos(),
        })),
        ("GET", ["documentos", id]) => match documentos().into_iter().find(|d| d["id"] == *id) {
            Some(d) => HttpResponse::Ok().json(d),
            None => HttpResponse::NotFound().json(json!({"detail": "No encontrado."})),
        },
        ("GET", ["documentos", _, "download"]) => HttpResponse::Ok()
            .content_type("application/pdf")
            .insert_header(("Content-Disposition", "inline; filename=\"turnos.pdf\""))
            .body(&b"%PDF-1.4 documento"[..]),
        ("DELETE", ["documentos", _]) => {
            if state.nivel.load(Ordering::SeqCst) < 3 {
                HttpResponse::Forbidden()
                    .json(json!({"error": "No tienes permisos para eliminar documentos"}))
            } else {
                HttpResponse::NoContent().finish()
            }
        }
        ("GET", ["tipos-contrato"]) => HttpResponse::Ok().json(json!([
            {"id": "11111111-0000-4a55-9d0e-0a4c6c1c9f22", "nombre": "Planta", "descripcion": null},
            {"id": "22222222-0000-4a55-9d0e-0a4c6c1c9f22", "nombre": "Contrata", "descripcion": null},
        ])),
        ("GET", ["roles"]) => HttpResponse::Ok().json(json!([
            {"id": "33333333-0000-4a55-9d0e-0a4c6c1c9f22", "nombre": "Jefatura", "nivel": 2,
             "puede_aprobar_solicitudes": true},
        ])),
        ("GET", ["areas"]) => HttpResponse::Ok().json(json!([
            {"id": "44444444-0000-4a55-9d0e-0a4c6c1c9f22", "nombre": "Urgencia", "codigo": "URG",
             "jefe": null, "jefe_nombre": null, "total_funcionarios": 12, "activa": true},
        ])),
        _ => HttpResponse::NotFound().json(json!({"detail": "No encontrado."})),
    }
}
