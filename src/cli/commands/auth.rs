use clap::Subcommand;
use serde_json::json;

use crate::api::CredentialStore;
use crate::cli::config::{load_environment_config, save_environment_config};
use crate::cli::utils::*;
use crate::cli::{OutputFormat, Session};
use crate::forms::{ChangePasswordForm, LoginForm, Page, ProfilePage, RegisterForm};
use crate::models::UserType;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Register a new user")]
    Register {
        #[arg(help = "Email")]
        email: String,
        #[arg(help = "Full name")]
        name: String,
        #[arg(help = "Mobile number, 10-15 digits")]
        mobile_number: String,
        #[arg(long, help = "Password (read from stdin if not provided)")]
        password: Option<String>,
        #[arg(long, help = "Register a system user instead of a client")]
        system: bool,
    },

    #[command(about = "Log in and store the session token")]
    Login {
        #[arg(help = "Email")]
        email: String,
        #[arg(long, help = "Password (read from stdin if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Forget the stored session token")]
    Logout,

    #[command(about = "Show whether a session token is stored")]
    Status,

    #[command(about = "Show the profile of the logged-in user")]
    Whoami,

    #[command(about = "Change a user's password")]
    ChangePassword {
        #[arg(help = "Email")]
        email: String,
        #[arg(long, help = "Current password (read from stdin if not provided)")]
        old_password: Option<String>,
        #[arg(long, help = "New password (read from stdin if not provided)")]
        new_password: Option<String>,
    },
}

pub async fn handle(cmd: AuthCommands, session: &Session) -> anyhow::Result<()> {
    let output_format = &session.output_format;

    match cmd {
        AuthCommands::Register { email, name, mobile_number, password, system } => {
            let mut form = RegisterForm::new();
            form.set_email(email);
            form.set_name(name);
            form.set_mobile_number(mobile_number);
            form.set_password(read_secret(password, "Password")?);
            if system {
                form.set_user_type(UserType::System);
            }

            let user = form.submit(&session.api.users).await;
            print_field_errors(output_format, form.field_errors());
            output_page(output_format, form.state(), user.map(|u| json!({ "user": u })))
        }
        AuthCommands::Login { email, password } => {
            let mut form = LoginForm::new();
            form.set_email(email.clone());
            form.set_password(read_secret(password, "Password")?);

            let logged_in = form.submit(&session.api.users, session.credentials.as_ref()).await;
            print_field_errors(output_format, form.field_errors());

            if logged_in {
                let mut env_config = load_environment_config()?;
                env_config.current_user = Some(email.clone());
                save_environment_config(&env_config)?;
            }

            let redirect = form.state().redirect().map(|r| r.path());
            output_page(
                output_format,
                form.state(),
                Some(json!({ "user": email, "redirect": redirect })),
            )
        }
        AuthCommands::Logout => {
            session.credentials.clear()?;

            let mut env_config = load_environment_config()?;
            env_config.current_user = None;
            save_environment_config(&env_config)?;

            tracing::info!("Session token removed");
            output_success(output_format, "Logged out", None)
        }
        AuthCommands::Status => {
            let env_config = load_environment_config()?;
            let logged_in = session.credentials.token().is_some();
            let saved_at = session.credentials.saved_at();

            match output_format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&json!({
                        "logged_in": logged_in,
                        "user": env_config.current_user,
                        "token_saved_at": saved_at,
                        "token_file": session.credentials.path().display().to_string()
                    }))?);
                }
                OutputFormat::Text => {
                    if logged_in {
                        println!("Logged in as {}", env_config.current_user.as_deref().unwrap_or("(unknown user)"));
                        if let Some(saved_at) = saved_at {
                            println!("Token saved: {}", saved_at.format("%Y-%m-%d %H:%M:%S UTC"));
                        }
                    } else {
                        println!("Not logged in");
                    }
                }
            }
            Ok(())
        }
        AuthCommands::Whoami => {
            let mut page = ProfilePage::new();
            page.load(&session.api.users, session.credentials.as_ref()).await;

            if let Some(profile) = page.profile() {
                output_record(output_format, profile)?;
            }
            match page_failure(page.state()) {
                Some(failure) => Err(failure),
                None => Ok(()),
            }
        }
        AuthCommands::ChangePassword { email, old_password, new_password } => {
            let mut form = ChangePasswordForm::new();
            form.set_email(email);
            form.set_old_password(read_secret(old_password, "Current password")?);
            form.set_new_password(read_secret(new_password, "New password")?);

            form.submit(&session.api.users).await;
            print_field_errors(output_format, form.field_errors());
            output_page(output_format, form.state(), None)
        }
    }
}
