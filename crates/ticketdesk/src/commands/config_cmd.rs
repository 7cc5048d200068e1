//! Config command handlers.

use dialoguer::{Input, Select};

use ticketdesk_config::TokenStoreKind;
use ticketdesk_core::DEFAULT_API_URL;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile, save_config};
use crate::error::CliError;
use crate::output;

fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Io(std::io::Error::other(e.to_string()))
}

fn format_config(cfg: &Config) -> String {
    let mut lines = vec![
        format!("Config file:      {}", config::config_path().display()),
        format!("Default profile:  {}", cfg.active_profile_name()),
        format!(
            "Defaults:         output={} color={} timeout={}s insecure={}",
            cfg.defaults.output, cfg.defaults.color, cfg.defaults.timeout, cfg.defaults.insecure
        ),
    ];

    let mut names: Vec<&String> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let p = &cfg.profiles[name];
        lines.push(String::new());
        lines.push(format!("[{name}]"));
        lines.push(format!("  api_url      {}", p.api_url));
        lines.push(format!(
            "  token_store  {}",
            match p.token_store {
                TokenStoreKind::Keyring => "keyring",
                TokenStoreKind::File => "file",
            }
        ));
        if let Some(ref var) = p.token_env {
            lines.push(format!("  token_env    ${var}"));
        }
        if let Some(ref user) = p.username {
            lines.push(format!("  username     {user}"));
        }
        if let Some(ref role) = p.role {
            lines.push(format!("  role         {role}"));
        }
    }
    lines.join("\n")
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("ticketdesk configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            let api_url: String = Input::new()
                .with_prompt("Ticket API URL")
                .default(DEFAULT_API_URL.into())
                .validate_with(|input: &String| -> Result<(), String> {
                    url::Url::parse(input)
                        .map(|_| ())
                        .map_err(|e| format!("invalid URL: {e}"))
                })
                .interact_text()
                .map_err(prompt_err)?;

            let store_choices = &["System keyring (recommended)", "File in the data directory"];
            let token_store = match Select::new()
                .with_prompt("Where should the bearer token be kept?")
                .items(store_choices)
                .default(0)
                .interact()
                .map_err(prompt_err)?
            {
                0 => TokenStoreKind::Keyring,
                _ => TokenStoreKind::File,
            };

            let username: String = Input::new()
                .with_prompt("Username (blank to read it from the token)")
                .allow_empty(true)
                .interact_text()
                .map_err(prompt_err)?;

            let roles = &["admin", "manager", "operator", "viewer"];
            let role = if username.trim().is_empty() {
                None
            } else {
                let idx = Select::new()
                    .with_prompt("Role")
                    .items(roles)
                    .default(2)
                    .interact()
                    .map_err(prompt_err)?;
                roles.get(idx).map(|r| (*r).to_owned())
            };

            let profile = Profile {
                api_url,
                token_store,
                username: Some(username.trim().to_owned()).filter(|u| !u.is_empty()),
                role,
                ..Profile::default()
            };

            let mut cfg = config::load_config_or_default();
            cfg.profiles.insert(profile_name.clone(), profile);
            cfg.default_profile = Some(profile_name.clone());
            save_config(&cfg)?;

            eprintln!("\n✓ Configuration written to {}", config_path.display());
            eprintln!("  Active profile: {profile_name}");
            eprintln!("\n  Next: ticketdesk token set");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            let out = output::render_single(&global.output, &cfg, format_config, |c| {
                c.active_profile_name().to_owned()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Use <name> ─────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();

            if !cfg.profiles.contains_key(&name) {
                let mut available: Vec<_> = cfg.profiles.keys().cloned().collect();
                available.sort();
                return Err(CliError::ProfileNotFound {
                    name,
                    available: if available.is_empty() {
                        "(none)".into()
                    } else {
                        available.join(", ")
                    },
                });
            }

            cfg.default_profile = Some(name.clone());
            save_config(&cfg)?;
            eprintln!("✓ Default profile set to '{name}'");
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }
    }
}
