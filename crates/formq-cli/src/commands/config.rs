use std::env;

use formq_core::config::normalize_endpoint;

use crate::cli::{ConfigCommands, EncodingArg};
use crate::config_profiles::{normalize_text_option, CliProfilesConfig};
use crate::error::CliError;

pub fn run_config(command: ConfigCommands, global_profile: Option<&str>) -> Result<(), CliError> {
    match command {
        ConfigCommands::Init {
            set_endpoint,
            set_timeout,
            encoding,
            no_activate,
        } => run_config_init(
            global_profile,
            set_endpoint,
            set_timeout,
            encoding,
            no_activate,
        ),
        ConfigCommands::Show => run_config_show(global_profile),
    }
}

pub fn run_config_init(
    profile_name: Option<&str>,
    endpoint: Option<String>,
    timeout_secs: Option<u64>,
    encoding: Option<EncodingArg>,
    no_activate: bool,
) -> Result<(), CliError> {
    let mut config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(profile_name);
    let existing_profile = config.profile(&profile_name).cloned().unwrap_or_default();

    let merged_endpoint = normalize_text_option(endpoint)
        .or_else(|| normalize_text_option(env::var("FORMQ_ENDPOINT").ok()))
        .or_else(|| existing_profile.endpoint())
        .ok_or(CliError::EndpointNotConfigured)?;
    let merged_endpoint = normalize_endpoint(merged_endpoint)?;

    let profile = config.profile_mut_or_default(&profile_name);
    profile.endpoint = Some(merged_endpoint);
    if let Some(encoding) = encoding {
        profile.encoding = Some(encoding.into());
    }
    if timeout_secs.is_some() {
        profile.timeout_secs = timeout_secs;
    }

    if !no_activate {
        config.active_profile = Some(profile_name.clone());
    }

    let path = config.save().map_err(CliError::Config)?;
    println!("Saved profile '{profile_name}' to {}", path.display());
    Ok(())
}

pub fn run_config_show(profile_name: Option<&str>) -> Result<(), CliError> {
    let config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(profile_name);
    let profile = config.profile(&profile_name).cloned().unwrap_or_default();

    println!("profile:  {profile_name}");
    println!(
        "endpoint: {}",
        profile.endpoint().unwrap_or_else(|| "(not set)".to_string())
    );
    println!("encoding: {}", profile.encoding.unwrap_or_default());
    println!(
        "timeout:  {}",
        profile
            .timeout_secs
            .map_or_else(|| "(none)".to_string(), |secs| format!("{secs}s"))
    );
    Ok(())
}
