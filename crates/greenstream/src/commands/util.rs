//! Shared helpers for command handlers.

use std::io::IsTerminal;

use greenstream_core::{GeographicZone, Provider};

use crate::cli::{LocationArgs, ProviderFilter};
use crate::error::CliError;

/// Build the requester's place from `--city` / `--country`.
pub fn zone(location: LocationArgs) -> Result<GeographicZone, CliError> {
    Ok(GeographicZone::new(location.city, location.country)?)
}

/// Parse `--providers`; absent means the configured default set.
pub fn providers(filter: &ProviderFilter) -> Result<Vec<Provider>, CliError> {
    match filter.providers.as_deref() {
        Some(list) => Ok(Provider::parse_list(list)?),
        None => Ok(Vec::new()),
    }
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal to ask on, `--yes` is required.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}
