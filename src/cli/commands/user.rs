use clap::Subcommand;

use crate::api::UserApi;
use crate::cli::utils::*;
use crate::cli::Session;
use crate::forms::validate::{is_valid_email, is_valid_mobile};
use crate::models::{User, UserType, UserUpdate};

#[derive(Subcommand)]
pub enum UserCommands {
    #[command(about = "List all users")]
    List,

    #[command(about = "Show a single user")]
    Show {
        #[arg(help = "User ID")]
        id: i64,
    },

    #[command(about = "Update fields of a user")]
    Update {
        #[arg(help = "User ID")]
        id: i64,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        mobile_number: Option<String>,
        #[arg(long)]
        country_id: Option<i64>,
        #[arg(long, help = "Activate (true) or deactivate (false) the account")]
        active: Option<bool>,
        #[arg(long = "type", value_parser = parse_user_type, help = "client or system")]
        user_type: Option<UserType>,
    },

    #[command(about = "Delete a user")]
    Delete {
        #[arg(help = "User ID")]
        id: i64,
    },
}

fn parse_user_type(raw: &str) -> Result<UserType, String> {
    match raw.to_ascii_lowercase().as_str() {
        "client" => Ok(UserType::Client),
        "system" => Ok(UserType::System),
        other => Err(format!("unknown user type '{}', expected client or system", other)),
    }
}

pub async fn handle(cmd: UserCommands, session: &Session) -> anyhow::Result<()> {
    let output_format = &session.output_format;
    let users = &session.api.users;

    match cmd {
        UserCommands::List => {
            let all = users.get_all_users().await?;
            if all.is_empty() {
                return output_empty_collection(output_format, "users", "No users found");
            }

            output_collection(
                output_format,
                "users",
                &all,
                &format!("{:<6} {:<30} {:<24} {:<8} {}", "ID", "EMAIL", "NAME", "TYPE", "ACTIVE"),
                user_row,
            )
        }
        UserCommands::Show { id } => {
            let user = users.get_user_by_id(id).await?;
            output_record(output_format, &user)
        }
        UserCommands::Update { id, email, name, mobile_number, country_id, active, user_type } => {
            if let Some(email) = &email {
                if !is_valid_email(email) {
                    return Err(anyhow::anyhow!("Invalid email address '{}'", email));
                }
            }
            if let Some(mobile) = &mobile_number {
                if !is_valid_mobile(mobile) {
                    return Err(anyhow::anyhow!("Mobile number must be 10-15 digits"));
                }
            }

            let update = UserUpdate {
                email,
                name,
                mobile_number,
                country_id,
                is_active: active,
                user_type,
            };
            if update.is_empty() {
                return Err(anyhow::anyhow!("Provide at least one field to update"));
            }

            users.update_user(id, &update).await?;
            tracing::info!("Updated user {}", id);
            output_success(output_format, &format!("User {} updated successfully", id), None)
        }
        UserCommands::Delete { id } => {
            users.delete_user(id).await?;
            tracing::info!("Deleted user {}", id);
            output_success(output_format, &format!("User {} deleted successfully", id), None)
        }
    }
}

fn user_row(user: &User) -> String {
    format!(
        "{:<6} {:<30} {:<24} {:<8} {}",
        user.id,
        user.email,
        user.name,
        user.user_type,
        if user.is_active { "yes" } else { "no" }
    )
}
