//! HTTPS client construction for the provider API.
//!
//! `AT_CA_BUNDLE` and `AT_SSL_VERIFY` are applied here and nowhere else.

use reqwest::{Certificate, Client};
use std::path::Path;

use super::SmsError;
use crate::config::ProviderConfig;

/// Build the reqwest client used for every provider request.
pub fn build_http_client(config: &ProviderConfig) -> Result<Client, SmsError> {
    let mut builder = Client::builder().timeout(config.timeout());

    if let Some(path) = config.ca_bundle() {
        let certs = load_ca_bundle(path)?;
        tracing::info!(
            path = %path.display(),
            certificates = certs.len(),
            "Trusting custom CA bundle"
        );
        for cert in certs {
            builder = builder.add_root_certificate(cert);
        }
    }

    if !config.ssl_verify_enabled() {
        tracing::warn!("AT_SSL_VERIFY is off, TLS certificates will NOT be verified (insecure)");
        builder = builder.danger_accept_invalid_certs(true);
    }

    builder
        .build()
        .map_err(|e| SmsError::Tls(format!("failed to build https client: {}", e)))
}

/// Read every certificate in a PEM bundle.
fn load_ca_bundle(path: &Path) -> Result<Vec<Certificate>, SmsError> {
    let pem = std::fs::read(path).map_err(|e| {
        SmsError::Tls(format!("cannot read CA bundle {}: {}", path.display(), e))
    })?;

    let certs = Certificate::from_pem_bundle(&pem).map_err(|e| {
        SmsError::Tls(format!("invalid CA bundle {}: {}", path.display(), e))
    })?;

    if certs.is_empty() {
        return Err(SmsError::Tls(format!(
            "CA bundle {} contains no certificates",
            path.display()
        )));
    }

    Ok(certs)
}
