pub mod credentials;
pub mod idealizadores;

pub use credentials::{BcryptHasher, CredentialHasher};
pub use idealizadores::{IdealizadorService, LoginOutcome};
