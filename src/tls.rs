use crate::error::{IoErrorContext, Result, ServerError};
use rustls::ServerConfig;
use rustls_pemfile::{certs, private_key};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub fn load_tls_config(cert_path: &Path, key_path: &Path) -> Result<ServerConfig> {
    let cert_file = File::open(cert_path).io_context("Failed to open certificate file")?;
    let cert_chain = certs(&mut BufReader::new(cert_file))
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| ServerError::TlsSetup {
            reason: format!("Failed to parse certificate: {e}"),
        })?;

    // Handles PKCS8, PKCS1 and SEC1 keys.
    let key_file = File::open(key_path).io_context("Failed to open private key file")?;
    let key = private_key(&mut BufReader::new(key_file))
        .map_err(|e| ServerError::TlsSetup {
            reason: format!("Failed to parse private key: {e}"),
        })?
        .ok_or_else(|| ServerError::TlsSetup {
            reason: "No private key found in PEM file".to_string(),
        })?;

    ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(cert_chain, key)
        .map_err(|e| ServerError::TlsSetup {
            reason: format!("Failed to create TLS config: {e}"),
        })
        .map_err(Into::into)
}
