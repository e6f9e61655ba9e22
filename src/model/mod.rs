pub mod area;
pub mod documento;
pub mod licencia;
pub mod role;
pub mod solicitud;
pub mod usuario;
