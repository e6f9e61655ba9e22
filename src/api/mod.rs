pub mod client;
pub mod documento;
pub mod licencia;
pub mod maestros;
pub mod solicitud;
pub mod usuario;
