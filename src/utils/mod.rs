pub mod business_days;
pub mod decimal;
pub mod rut;
pub mod upload;
