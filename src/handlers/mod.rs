pub mod cadastro;
pub mod habilidades;
pub mod perfil;
