pub mod approvals;
pub mod licencias;
pub mod solicitar;
