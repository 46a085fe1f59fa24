use clap::Subcommand;
use serde_json::json;

use crate::api::TenantApi;
use crate::cli::utils::*;
use crate::cli::{OutputFormat, Session};
use crate::forms::{
    CreateTenantForm, DeleteTenantMappingForm, MapUserToTenantForm, MapUsersToTenantForm, Page,
    TenantListPage, UpdateTenantForm,
};
use crate::models::Tenant;

#[derive(Subcommand)]
pub enum TenantCommands {
    #[command(about = "Create a tenant")]
    Create {
        #[arg(long, help = "Company GUID (generated if omitted)")]
        guid: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        bmrm_port: Option<String>,
        #[arg(long)]
        sg_biz_port: Option<String>,
        #[arg(long)]
        tally_sync_port: Option<String>,
    },

    #[command(about = "List all tenants")]
    List,

    #[command(about = "List the tenants a user is mapped to")]
    ByUser {
        #[arg(help = "User ID")]
        user_id: i64,
    },

    #[command(about = "Update fields of a tenant")]
    Update {
        #[arg(help = "Tenant ID")]
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        bmrm_port: Option<String>,
        #[arg(long)]
        sg_biz_port: Option<String>,
        #[arg(long)]
        tally_sync_port: Option<String>,
    },

    #[command(about = "Map a user to a tenant")]
    Map {
        #[arg(help = "User ID")]
        user_id: i64,
        #[arg(help = "Tenant ID")]
        tenant_id: i64,
    },

    #[command(about = "Map several users to tenants in one request")]
    MapMany {
        #[arg(long = "pair", value_parser = parse_pair, required = true, help = "USER_ID:TENANT_ID, repeatable")]
        pairs: Vec<(i64, i64)>,
    },

    #[command(about = "Remove a user-tenant mapping")]
    Unmap {
        #[arg(help = "User ID")]
        user_id: i64,
        #[arg(help = "Tenant ID")]
        tenant_id: i64,
    },
}

fn parse_pair(raw: &str) -> Result<(i64, i64), String> {
    let (user, tenant) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected USER_ID:TENANT_ID, got '{}'", raw))?;
    let user = user.trim().parse().map_err(|_| format!("invalid user ID '{}'", user))?;
    let tenant = tenant.trim().parse().map_err(|_| format!("invalid tenant ID '{}'", tenant))?;
    Ok((user, tenant))
}

pub async fn handle(cmd: TenantCommands, session: &Session) -> anyhow::Result<()> {
    let output_format = &session.output_format;
    let tenants = &session.api.tenants;

    match cmd {
        TenantCommands::Create { guid, name, host, bmrm_port, sg_biz_port, tally_sync_port } => {
            let mut form = CreateTenantForm::new();
            form.set_company_guid(guid.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()));
            form.set_company_name(name.unwrap_or_default());
            form.set_host(host.unwrap_or_default());
            form.set_bmrm_port(bmrm_port.unwrap_or_default());
            form.set_sg_biz_port(sg_biz_port.unwrap_or_default());
            form.set_tally_sync_port(tally_sync_port.unwrap_or_default());

            let created = form.submit(tenants).await;
            print_field_errors(output_format, form.field_errors());
            output_page(output_format, form.state(), created.map(|t| json!({ "tenant": t })))
        }
        TenantCommands::List => {
            let mut page = TenantListPage::new();
            page.load(tenants).await;
            if let Some(failure) = page_failure(page.state()) {
                return Err(failure);
            }
            output_tenants(output_format, page.tenants())
        }
        TenantCommands::ByUser { user_id } => {
            let mapped = tenants.get_tenants_by_user(user_id).await?;
            output_tenants(output_format, &mapped)
        }
        TenantCommands::Update { id, name, host, bmrm_port, sg_biz_port, tally_sync_port } => {
            let mut form = UpdateTenantForm::new(id);
            form.set_company_name(name.unwrap_or_default());
            form.set_host(host.unwrap_or_default());
            form.set_bmrm_port(bmrm_port.unwrap_or_default());
            form.set_sg_biz_port(sg_biz_port.unwrap_or_default());
            form.set_tally_sync_port(tally_sync_port.unwrap_or_default());

            form.submit(tenants).await;
            print_field_errors(output_format, form.field_errors());
            output_page(output_format, form.state(), Some(json!({ "tenant_id": form.tenant_id() })))
        }
        TenantCommands::Map { user_id, tenant_id } => {
            let mut form = MapUserToTenantForm::new();
            form.set_user_id(user_id);
            form.set_tenant_id(tenant_id);

            let mapping = form.submit(tenants).await;
            output_page(output_format, form.state(), mapping.map(|m| json!({ "mapping": m })))
        }
        TenantCommands::MapMany { pairs } => {
            let mut form = MapUsersToTenantForm::new();
            for (user_id, tenant_id) in pairs {
                let index = form.add_mapping();
                form.set_user_id(index, user_id);
                form.set_tenant_id(index, tenant_id);
            }

            let mappings = form.submit(tenants).await;
            output_page(output_format, form.state(), mappings.map(|m| json!({ "mappings": m })))
        }
        TenantCommands::Unmap { user_id, tenant_id } => {
            let mut form = DeleteTenantMappingForm::new();
            form.set_user_id(user_id);
            form.set_tenant_id(tenant_id);

            form.submit(tenants).await;
            output_page(output_format, form.state(), None)
        }
    }
}

fn output_tenants(output_format: &OutputFormat, tenants: &[Tenant]) -> anyhow::Result<()> {
    if tenants.is_empty() {
        return output_empty_collection(output_format, "tenants", TenantListPage::EMPTY_MESSAGE);
    }

    output_collection(
        output_format,
        "tenants",
        tenants,
        &format!("{:<6} {:<38} {:<24} {}", "ID", "COMPANY GUID", "COMPANY", "HOST"),
        |t| {
            format!(
                "{:<6} {:<38} {:<24} {}",
                t.id.map(|id| id.to_string()).unwrap_or_else(|| "-".into()),
                t.company_guid,
                t.company_name.as_deref().unwrap_or("-"),
                t.host.as_deref().unwrap_or("-")
            )
        },
    )
}
