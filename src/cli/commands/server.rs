use clap::Subcommand;
use serde_json::json;

use crate::cli::config::*;
use crate::cli::utils::*;
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum ServerCommands {
    #[command(about = "Register a backend under a name")]
    Add {
        #[arg(help = "Server name")]
        name: String,
        #[arg(help = "Base URL, e.g. http://localhost:8080")]
        url: String,
        #[arg(long, help = "Free-form description", default_value = "")]
        description: String,
    },

    #[command(about = "List registered servers")]
    List,

    #[command(about = "Show the current server")]
    Current,

    #[command(about = "Switch the current server")]
    Use {
        #[arg(help = "Server name")]
        name: String,
    },

    #[command(about = "Remove a server")]
    Delete {
        #[arg(help = "Server name")]
        name: String,
    },
}

pub async fn handle(cmd: ServerCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        ServerCommands::Add { name, url, description } => {
            url::Url::parse(&url).map_err(|e| anyhow::anyhow!("Invalid server URL '{}': {}", url, e))?;

            let mut config = load_server_config()?;
            if config.servers.contains_key(&name) {
                return Err(anyhow::anyhow!("Server '{}' already exists", name));
            }

            config.servers.insert(name.clone(), ServerInfo::new(url.clone(), description));
            save_server_config(&config)?;

            // First server registered becomes current
            let mut env_config = load_environment_config()?;
            if env_config.current_server.is_none() {
                env_config.current_server = Some(name.clone());
                save_environment_config(&env_config)?;
            }

            output_success(
                &output_format,
                &format!("Server '{}' added", name),
                Some(json!({ "server": name, "url": url })),
            )
        }
        ServerCommands::List => {
            let config = load_server_config()?;
            let env_config = load_environment_config()?;

            if config.servers.is_empty() {
                return output_empty_collection(&output_format, "servers", "No servers configured");
            }

            let mut names: Vec<_> = config.servers.keys().cloned().collect();
            names.sort();

            match output_format {
                OutputFormat::Json => {
                    let servers: Vec<_> = names
                        .iter()
                        .map(|name| {
                            let info = &config.servers[name];
                            json!({
                                "name": name,
                                "url": info.url,
                                "description": info.description,
                                "added_at": info.added_at,
                                "current": env_config.current_server.as_ref() == Some(name)
                            })
                        })
                        .collect();
                    println!("{}", serde_json::to_string_pretty(&json!({ "servers": servers }))?);
                }
                OutputFormat::Text => {
                    println!("{:<15} {:<35} {:<20} {}", "NAME", "URL", "ADDED", "DESCRIPTION");
                    println!("{}", "-".repeat(85));

                    for name in &names {
                        let info = &config.servers[name];
                        let current_marker = if env_config.current_server.as_ref() == Some(name) { "*" } else { " " };
                        println!(
                            "{}{:<14} {:<35} {:<20} {}",
                            current_marker,
                            name,
                            info.url,
                            info.added_at.format("%Y-%m-%d %H:%M"),
                            info.description
                        );
                    }
                }
            }

            Ok(())
        }
        ServerCommands::Current => {
            let env_config = load_environment_config()?;
            let Some(name) = env_config.current_server else {
                return match output_format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&json!({ "current_server": null }))?);
                        Ok(())
                    }
                    OutputFormat::Text => {
                        println!("No current server set");
                        Ok(())
                    }
                };
            };

            let config = load_server_config()?;
            let info = config
                .servers
                .get(&name)
                .ok_or_else(|| anyhow::anyhow!("Current server '{}' not found in configuration", name))?;

            match output_format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&json!({
                        "current_server": { "name": name, "url": info.url, "description": info.description }
                    }))?);
                }
                OutputFormat::Text => {
                    println!("Current server: {}", name);
                    println!("URL: {}", info.url);
                    if !info.description.is_empty() {
                        println!("Description: {}", info.description);
                    }
                }
            }

            Ok(())
        }
        ServerCommands::Use { name } => switch_current_item(
            &name,
            "server",
            |name| Ok(load_server_config()?.servers.contains_key(name)),
            |name| {
                let mut env_config = load_environment_config()?;
                env_config.current_server = Some(name.to_string());
                save_environment_config(&env_config)
            },
            &output_format,
        ),
        ServerCommands::Delete { name } => {
            let mut config = load_server_config()?;
            if config.servers.remove(&name).is_none() {
                return Err(anyhow::anyhow!("Server '{}' not found", name));
            }
            save_server_config(&config)?;

            let mut env_config = load_environment_config()?;
            if env_config.current_server.as_deref() == Some(name.as_str()) {
                env_config.current_server = None;
                save_environment_config(&env_config)?;
            }

            output_success(&output_format, &format!("Server '{}' deleted successfully", name), None)
        }
    }
}
