use clap::Subcommand;
use serde_json::json;

use crate::api::SubscriptionApi;
use crate::cli::utils::*;
use crate::cli::{OutputFormat, Session};
use crate::forms::{
    CreateSubscriptionForm, MapFeatureToSubscriptionForm, MapUserToSubscriptionForm, Page,
    SubscriptionListPage,
};
use crate::models::{Subscription, SubscriptionUpdate};

#[derive(Subcommand)]
pub enum SubscriptionCommands {
    #[command(about = "Create a subscription")]
    Create {
        #[arg(help = "Display name")]
        name: String,
        #[arg(help = "Short code")]
        code: String,
    },

    #[command(about = "List all subscriptions")]
    List,

    #[command(about = "Rename or recode a subscription")]
    Update {
        #[arg(help = "Subscription ID")]
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        code: Option<String>,
    },

    #[command(about = "Delete a subscription")]
    Delete {
        #[arg(help = "Subscription ID")]
        id: i64,
    },

    #[command(about = "List the subscriptions a user holds")]
    ByUser {
        #[arg(help = "User ID")]
        user_id: i64,
    },

    #[command(about = "Map a user to a subscription")]
    MapUser {
        #[arg(help = "User ID")]
        user_id: i64,
        #[arg(help = "Subscription ID")]
        subscription_id: i64,
    },

    #[command(about = "List the features of a subscription")]
    Features {
        #[arg(help = "Subscription ID")]
        subscription_id: i64,
    },

    #[command(about = "Map a feature to a subscription")]
    MapFeature {
        #[arg(help = "Feature ID")]
        feature_id: i64,
        #[arg(help = "Subscription ID")]
        subscription_id: i64,
    },
}

pub async fn handle(cmd: SubscriptionCommands, session: &Session) -> anyhow::Result<()> {
    let output_format = &session.output_format;
    let subscriptions = &session.api.subscriptions;

    match cmd {
        SubscriptionCommands::Create { name, code } => {
            let mut form = CreateSubscriptionForm::new();
            form.set_name(name);
            form.set_code(code);

            let created = form.submit(subscriptions).await;
            output_page(output_format, form.state(), created.map(|s| json!({ "subscription": s })))
        }
        SubscriptionCommands::List => {
            let mut page = SubscriptionListPage::new();
            page.load(subscriptions).await;
            if let Some(failure) = page_failure(page.state()) {
                return Err(failure);
            }
            output_subscriptions(output_format, page.subscriptions())
        }
        SubscriptionCommands::Update { id, name, code } => {
            let updates = SubscriptionUpdate { name, code };
            if updates.name.is_none() && updates.code.is_none() {
                return Err(anyhow::anyhow!("Provide --name and/or --code"));
            }

            subscriptions.update_subscription(id, &updates).await?;
            tracing::info!("Updated subscription {}", id);
            output_success(output_format, &format!("Subscription {} updated successfully", id), None)
        }
        SubscriptionCommands::Delete { id } => {
            subscriptions.delete_subscription(id).await?;
            tracing::info!("Deleted subscription {}", id);
            output_success(output_format, &format!("Subscription {} deleted successfully", id), None)
        }
        SubscriptionCommands::ByUser { user_id } => {
            let held = subscriptions.get_subscriptions_by_user(user_id).await?;
            output_subscriptions(output_format, &held)
        }
        SubscriptionCommands::MapUser { user_id, subscription_id } => {
            let mut form = MapUserToSubscriptionForm::new();
            form.set_user_id(user_id);
            form.set_subscription_id(subscription_id);

            let mapping = form.submit(subscriptions).await;
            output_page(output_format, form.state(), mapping.map(|m| json!({ "mapping": m })))
        }
        SubscriptionCommands::Features { subscription_id } => {
            let features = subscriptions.get_features_by_subscription(subscription_id).await?;
            if features.is_empty() {
                return output_empty_collection(output_format, "features", "No features mapped to this subscription");
            }

            output_collection(
                output_format,
                "features",
                &features,
                &format!("{:<8} {:<12} {}", "ID", "FEATURE", "SUBSCRIPTION"),
                |f| {
                    format!(
                        "{:<8} {:<12} {}",
                        f.id.map(|id| id.to_string()).unwrap_or_else(|| "-".into()),
                        f.feature_id,
                        f.subscription_id
                    )
                },
            )
        }
        SubscriptionCommands::MapFeature { feature_id, subscription_id } => {
            let mut form = MapFeatureToSubscriptionForm::new();
            form.set_feature_id(feature_id);
            form.set_subscription_id(subscription_id);

            let mapping = form.submit(subscriptions).await;
            output_page(output_format, form.state(), mapping.map(|m| json!({ "mapping": m })))
        }
    }
}

fn output_subscriptions(output_format: &OutputFormat, subscriptions: &[Subscription]) -> anyhow::Result<()> {
    if subscriptions.is_empty() {
        return output_empty_collection(output_format, "subscriptions", SubscriptionListPage::EMPTY_MESSAGE);
    }

    output_collection(
        output_format,
        "subscriptions",
        subscriptions,
        &format!("{:<6} {:<12} {:<30} {}", "ID", "CODE", "NAME", "CREATED"),
        |s| {
            format!(
                "{:<6} {:<12} {:<30} {}",
                s.id,
                s.code,
                s.name,
                s.created_at
                    .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(|| "-".into())
            )
        },
    )
}
