pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod router;
pub mod service;
pub mod types;

pub use error::{ErrorKind, IdealizaError};
pub use service::{BcryptHasher, CredentialHasher, IdealizadorService};
