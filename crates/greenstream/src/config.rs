//! CLI configuration -- thin wrapper around `greenstream_config` shared types.
//!
//! Re-exports the shared types and adds CLI-specific resolution that
//! respects `GlobalOpts` flag overrides (--token, --timeout, --admin-token).

use secrecy::{ExposeSecret, SecretString};
use subtle::ConstantTimeEq;

use greenstream_core::{Caller, UpstreamConfig};

use crate::cli::{GlobalOpts, Role};
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use greenstream_config::{
    Config, Credential, config_path, load_config, load_config_or_default, save_config,
    store_credential,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Work out who is calling.
///
/// `--admin-token` wins when given and must match the configured admin
/// token; otherwise `--caller` acts in `--role`.
pub fn resolve_caller(global: &GlobalOpts, cfg: &Config) -> Result<Caller, CliError> {
    if let Some(ref presented) = global.admin_token {
        let expected =
            greenstream_config::resolve_admin_token(cfg).ok_or_else(|| CliError::AuthFailed {
                reason: "no admin token is configured".into(),
            })?;
        if !admin_token_matches(presented, &expected) {
            return Err(CliError::AuthFailed {
                reason: "admin token does not match".into(),
            });
        }
        return Ok(Caller::Admin);
    }

    let id = global
        .caller
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or(CliError::NoCaller)?
        .to_owned();

    Ok(match global.role {
        Role::Consumer => Caller::Consumer(id),
        Role::Provider => Caller::Provider(id),
    })
}

/// Compare in constant time for equal-length tokens.
fn admin_token_matches(presented: &str, expected: &SecretString) -> bool {
    presented
        .as_bytes()
        .ct_eq(expected.expose_secret().as_bytes())
        .into()
}

/// Translate config + global flags into an `UpstreamConfig`.
///
/// The token comes from `--token` when given, else the credential chain.
pub fn resolve_upstream(global: &GlobalOpts, cfg: &Config) -> Result<UpstreamConfig, CliError> {
    let token = match global.token {
        Some(ref token) => SecretString::from(token.clone()),
        None => greenstream_config::resolve_token(cfg)?,
    };
    Ok(cfg.upstream_config(token, global.timeout)?)
}
