//! Config subcommand handlers.

use std::path::PathBuf;

use dialoguer::{Input, Select};

use greenstream_core::Provider;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Credential};
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Format config for display, masking sensitive fields.
fn format_config_redacted(cfg: &Config) -> String {
    use std::fmt::Write;
    let mut out = String::new();

    if cfg.admin_token.is_some() {
        let _ = writeln!(out, "admin_token = \"****\"");
    }
    if let Some(ref env) = cfg.admin_token_env {
        let _ = writeln!(out, "admin_token_env = \"{env}\"");
    }
    let _ = writeln!(out, "forecast_timeout = {}", cfg.forecast_timeout);
    let providers: Vec<_> = cfg.providers.iter().map(|p| format!("\"{p}\"")).collect();
    let _ = writeln!(out, "providers = [{}]", providers.join(", "));

    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);

    let up = &cfg.upstream;
    let _ = writeln!(out);
    let _ = writeln!(out, "[upstream]");
    let _ = writeln!(out, "nominatim_url = \"{}\"", up.nominatim_url);
    let _ = writeln!(out, "electricity_maps_url = \"{}\"", up.electricity_maps_url);
    if up.token.is_some() {
        let _ = writeln!(out, "token = \"****\"");
    }
    if let Some(ref env) = up.token_env {
        let _ = writeln!(out, "token_env = \"{env}\"");
    }
    if let Some(ref agent) = up.user_agent {
        let _ = writeln!(out, "user_agent = \"{agent}\"");
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "[storage]");
    let _ = writeln!(out, "history_path = \"{}\"", cfg.history_path().display());
    if let Some(ref catalog) = cfg.storage.catalog_path {
        let _ = writeln!(out, "catalog_path = \"{}\"", catalog.display());
    }

    if cfg.parameters.is_some() {
        let _ = writeln!(out);
        let _ = writeln!(out, "# [parameters] overrides the built-in energy tables");
    }

    out
}

/// Config with every secret masked, for structured output formats.
fn redacted(cfg: &Config) -> Config {
    let mask = |s: &Option<String>| s.as_ref().map(|_| "****".to_owned());
    let mut shown = cfg.clone();
    shown.admin_token = mask(&cfg.admin_token);
    shown.upstream.token = mask(&cfg.upstream.token);
    shown
}

fn save_config(cfg: &Config) -> Result<PathBuf, CliError> {
    Ok(config::save_config(cfg)?)
}

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Offer to store a secret in the system keyring or return it for plaintext config.
///
/// Returns `Some(secret)` if the user chose plaintext, `None` if stored in keyring.
fn prompt_keyring_storage(
    secret: &str,
    credential: Credential,
    label: &str,
) -> Result<Option<String>, CliError> {
    let choices = &[
        "Store in system keyring (recommended)",
        "Save to config file (plaintext)",
    ];
    let selection = Select::new()
        .with_prompt(format!("Where to store the {label}?"))
        .items(choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    if selection == 0 {
        config::store_credential(credential, secret)?;
        eprintln!("   ✓ {label} stored in system keyring");
        Ok(None)
    } else {
        Ok(Some(secret.to_owned()))
    }
}

fn set_plaintext(cfg: &mut Config, credential: Credential, secret: String) {
    match credential {
        Credential::ElectricityMapsToken => cfg.upstream.token = Some(secret),
        Credential::AdminToken => cfg.admin_token = Some(secret),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("GreenStream -- configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            let mut cfg = config::load_config_or_default();

            // 1. Electricity Maps token
            let token =
                rpassword::prompt_password("Electricity Maps token (empty to skip): ")
                    .map_err(prompt_err)?;
            if !token.is_empty() {
                if let Some(plain) =
                    prompt_keyring_storage(&token, Credential::ElectricityMapsToken, "token")?
                {
                    cfg.upstream.token = Some(plain);
                }
            }

            // 2. Default providers
            let providers: String = Input::new()
                .with_prompt("Default providers (comma-separated)")
                .default("aws,gcp,azure".into())
                .interact_text()
                .map_err(prompt_err)?;
            cfg.providers = Provider::parse_list(&providers)?
                .iter()
                .map(|p| p.to_string().to_lowercase())
                .collect();

            // 3. History file
            let history: String = Input::new()
                .with_prompt("History file")
                .default(cfg.history_path().display().to_string())
                .interact_text()
                .map_err(prompt_err)?;
            cfg.storage.history_path = Some(PathBuf::from(history));

            let path = save_config(&cfg)?;
            eprintln!("\n✓ Configuration written to {}", path.display());
            eprintln!("\n  Test it: greenstream status");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            let out = output::render_single(
                &global.output,
                &redacted(&cfg),
                format_config_redacted,
                |_| config::config_path().display().to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }

        // ── Set token ───────────────────────────────────────────────
        ConfigCommand::SetToken {
            value,
            admin,
            plaintext,
        } => {
            let (credential, label) = if admin {
                (Credential::AdminToken, "admin token")
            } else {
                (Credential::ElectricityMapsToken, "Electricity Maps token")
            };

            let secret = match value {
                Some(v) => v,
                None => rpassword::prompt_password(format!("{label}: ")).map_err(prompt_err)?,
            };
            if secret.trim().is_empty() {
                return Err(CliError::Validation {
                    field: "token".into(),
                    reason: format!("{label} cannot be empty"),
                });
            }

            if plaintext {
                let mut cfg = config::load_config()?;
                set_plaintext(&mut cfg, credential, secret);
                let path = save_config(&cfg)?;
                if !global.quiet {
                    eprintln!("✓ {label} written to {}", path.display());
                }
            } else {
                config::store_credential(credential, &secret)?;
                if !global.quiet {
                    eprintln!("✓ {label} stored in system keyring");
                }
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secrets_are_masked() {
        let mut cfg = Config::default();
        cfg.upstream.token = Some("em-secret".into());
        cfg.admin_token = Some("admin-secret".into());

        let text = format_config_redacted(&cfg);
        assert!(!text.contains("em-secret"));
        assert!(!text.contains("admin-secret"));
        assert!(text.contains("token = \"****\""));

        let shown = redacted(&cfg);
        assert_eq!(shown.upstream.token.as_deref(), Some("****"));
        assert_eq!(shown.admin_token.as_deref(), Some("****"));
    }

    #[test]
    fn unset_secrets_stay_unset() {
        let shown = redacted(&Config::default());
        assert!(shown.upstream.token.is_none());
        assert!(shown.admin_token.is_none());
    }
}
