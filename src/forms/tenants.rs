use crate::api::TenantApi;
use crate::forms::state::{FormState, Page};
use crate::forms::validate::{parse_port, ValidationErrors};
use crate::forms::FIX_VALIDATION_ERRORS;
use crate::models::{Tenant, TenantUpdate, UserTenantMapping};

pub const BOTH_IDS_REQUIRED: &str = "Both User ID and Tenant ID are required.";

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn port_field(errors: &mut ValidationErrors, field: &'static str, raw: &str) -> Option<u16> {
    match parse_port(raw) {
        Ok(port) => port,
        Err(message) => {
            errors.add(field, message);
            None
        }
    }
}

/// Text fields shared by the create and update tenant forms
#[derive(Debug, Clone, Default)]
struct TenantFields {
    company_name: String,
    host: String,
    bmrm_port: String,
    sg_biz_port: String,
    tally_sync_port: String,
}

impl TenantFields {
    fn parse(&self, errors: &mut ValidationErrors) -> TenantUpdate {
        TenantUpdate {
            company_name: non_blank(&self.company_name),
            host: non_blank(&self.host),
            bmrm_port: port_field(errors, "bmrmPort", &self.bmrm_port),
            sg_biz_port: port_field(errors, "sgBizPort", &self.sg_biz_port),
            tally_sync_port: port_field(errors, "tallySyncPort", &self.tally_sync_port),
        }
    }
}

macro_rules! tenant_field_setters {
    ($form:ty) => {
        impl $form {
            pub fn set_company_name(&mut self, value: impl Into<String>) {
                self.fields.company_name = value.into();
            }

            pub fn set_host(&mut self, value: impl Into<String>) {
                self.fields.host = value.into();
            }

            pub fn set_bmrm_port(&mut self, value: impl Into<String>) {
                self.fields.bmrm_port = value.into();
                self.field_errors.clear_field("bmrmPort");
            }

            pub fn set_sg_biz_port(&mut self, value: impl Into<String>) {
                self.fields.sg_biz_port = value.into();
                self.field_errors.clear_field("sgBizPort");
            }

            pub fn set_tally_sync_port(&mut self, value: impl Into<String>) {
                self.fields.tally_sync_port = value.into();
                self.field_errors.clear_field("tallySyncPort");
            }

            pub fn field_errors(&self) -> &ValidationErrors {
                &self.field_errors
            }
        }

        impl Page for $form {
            fn state(&self) -> &FormState {
                &self.state
            }

            fn state_mut(&mut self) -> &mut FormState {
                &mut self.state
            }
        }
    };
}

#[derive(Debug, Clone, Default)]
pub struct CreateTenantForm {
    company_guid: String,
    fields: TenantFields,
    field_errors: ValidationErrors,
    state: FormState,
}

tenant_field_setters!(CreateTenantForm);

impl CreateTenantForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_company_guid(&mut self, value: impl Into<String>) {
        self.company_guid = value.into();
        self.field_errors.clear_field("companyGuid");
    }

    fn validate(&mut self) -> Option<Tenant> {
        let mut errors = ValidationErrors::new();
        errors.require("companyGuid", &self.company_guid, "Company GUID is required");
        let parsed = self.fields.parse(&mut errors);

        self.field_errors = errors;
        if !self.field_errors.is_empty() {
            return None;
        }

        Some(Tenant {
            company_guid: self.company_guid.trim().to_string(),
            company_name: parsed.company_name,
            host: parsed.host,
            bmrm_port: parsed.bmrm_port,
            sg_biz_port: parsed.sg_biz_port,
            tally_sync_port: parsed.tally_sync_port,
            ..Default::default()
        })
    }

    pub async fn submit<A: TenantApi + ?Sized>(&mut self, api: &A) -> Option<Tenant> {
        if !self.state.can_submit() {
            return None;
        }
        let Some(tenant) = self.validate() else {
            self.state.reject(FIX_VALIDATION_ERRORS);
            return None;
        };
        self.state.begin();

        let result = api.create_tenant(&tenant).await;
        self.state.finish(result, "Tenant created successfully")
    }
}

/// Partial update of one tenant; blank fields are left unchanged
#[derive(Debug, Clone)]
pub struct UpdateTenantForm {
    tenant_id: i64,
    fields: TenantFields,
    field_errors: ValidationErrors,
    state: FormState,
}

tenant_field_setters!(UpdateTenantForm);

impl UpdateTenantForm {
    pub fn new(tenant_id: i64) -> Self {
        Self {
            tenant_id,
            fields: TenantFields::default(),
            field_errors: ValidationErrors::new(),
            state: FormState::new(),
        }
    }

    pub fn tenant_id(&self) -> i64 {
        self.tenant_id
    }

    pub async fn submit<A: TenantApi + ?Sized>(&mut self, api: &A) -> bool {
        if !self.state.can_submit() {
            return false;
        }
        if self.tenant_id <= 0 {
            self.state.reject("Tenant ID is required.");
            return false;
        }

        let mut errors = ValidationErrors::new();
        let updates = self.fields.parse(&mut errors);
        self.field_errors = errors;
        if !self.field_errors.is_empty() {
            self.state.reject(FIX_VALIDATION_ERRORS);
            return false;
        }
        if updates.is_empty() {
            self.state.reject("Provide at least one field to update.");
            return false;
        }
        self.state.begin();

        let result = api.update_tenant(self.tenant_id, &updates).await;
        self.state.finish(result, "Tenant updated successfully").is_some()
    }
}

#[derive(Debug, Clone, Default)]
pub struct TenantListPage {
    tenants: Vec<Tenant>,
    state: FormState,
}

impl TenantListPage {
    pub const EMPTY_MESSAGE: &'static str = "No tenants available";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn tenants(&self) -> &[Tenant] {
        &self.tenants
    }

    pub async fn load<A: TenantApi + ?Sized>(&mut self, api: &A) -> &[Tenant] {
        if self.state.begin() {
            let result = api.get_all_tenants().await;
            if let Some(tenants) = self.state.finish_quietly(result) {
                self.tenants = tenants;
            }
        }
        &self.tenants
    }
}

impl Page for TenantListPage {
    fn state(&self) -> &FormState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut FormState {
        &mut self.state
    }
}

#[derive(Debug, Clone, Default)]
pub struct MapUserToTenantForm {
    user_id: i64,
    tenant_id: i64,
    state: FormState,
}

impl MapUserToTenantForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_user_id(&mut self, id: i64) {
        self.user_id = id;
    }

    pub fn set_tenant_id(&mut self, id: i64) {
        self.tenant_id = id;
    }

    pub async fn submit<A: TenantApi + ?Sized>(&mut self, api: &A) -> Option<UserTenantMapping> {
        if !self.state.can_submit() {
            return None;
        }
        if self.user_id <= 0 || self.tenant_id <= 0 {
            self.state.reject(BOTH_IDS_REQUIRED);
            return None;
        }
        self.state.begin();

        let mapping = UserTenantMapping::new(self.user_id, self.tenant_id);
        let result = api.map_user_to_tenant(&mapping).await;
        self.state.finish(result, "User successfully mapped to tenant")
    }
}

impl Page for MapUserToTenantForm {
    fn state(&self) -> &FormState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut FormState {
        &mut self.state
    }
}

/// Builder for a batch of user-tenant mappings sent in one call
#[derive(Debug, Clone, Default)]
pub struct MapUsersToTenantForm {
    mappings: Vec<UserTenantMapping>,
    state: FormState,
}

impl MapUsersToTenantForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mappings(&self) -> &[UserTenantMapping] {
        &self.mappings
    }

    /// Append an empty entry and return its index
    pub fn add_mapping(&mut self) -> usize {
        self.mappings.push(UserTenantMapping::new(0, 0));
        self.mappings.len() - 1
    }

    pub fn remove_mapping(&mut self, index: usize) -> Option<UserTenantMapping> {
        (index < self.mappings.len()).then(|| self.mappings.remove(index))
    }

    /// False if `index` is out of range
    pub fn set_user_id(&mut self, index: usize, id: i64) -> bool {
        match self.mappings.get_mut(index) {
            Some(mapping) => {
                mapping.user_id = id;
                true
            }
            None => false,
        }
    }

    /// False if `index` is out of range
    pub fn set_tenant_id(&mut self, index: usize, id: i64) -> bool {
        match self.mappings.get_mut(index) {
            Some(mapping) => {
                mapping.tenant_id = id;
                true
            }
            None => false,
        }
    }

    pub async fn submit<A: TenantApi + ?Sized>(&mut self, api: &A) -> Option<Vec<UserTenantMapping>> {
        if !self.state.can_submit() {
            return None;
        }
        if self.mappings.is_empty() {
            self.state.reject("Add at least one mapping.");
            return None;
        }
        if self.mappings.iter().any(|m| m.user_id <= 0 || m.tenant_id <= 0) {
            self.state.reject("Every mapping needs both a User ID and a Tenant ID.");
            return None;
        }
        self.state.begin();

        let result = api.map_users_to_tenant(&self.mappings).await;
        self.state.finish(result, "Users successfully mapped to tenant")
    }
}

impl Page for MapUsersToTenantForm {
    fn state(&self) -> &FormState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut FormState {
        &mut self.state
    }
}

#[derive(Debug, Clone, Default)]
pub struct DeleteTenantMappingForm {
    user_id: i64,
    tenant_id: i64,
    state: FormState,
}

impl DeleteTenantMappingForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_user_id(&mut self, id: i64) {
        self.user_id = id;
    }

    pub fn set_tenant_id(&mut self, id: i64) {
        self.tenant_id = id;
    }

    pub async fn submit<A: TenantApi + ?Sized>(&mut self, api: &A) -> bool {
        if !self.state.can_submit() {
            return false;
        }
        if self.user_id <= 0 || self.tenant_id <= 0 {
            self.state.reject(BOTH_IDS_REQUIRED);
            return false;
        }
        self.state.begin();

        let result = api.delete_user_tenant_mapping(self.user_id, self.tenant_id).await;
        self.state
            .finish(result, "User-Tenant mapping deleted successfully")
            .is_some()
    }
}

impl Page for DeleteTenantMappingForm {
    fn state(&self) -> &FormState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut FormState {
        &mut self.state
    }
}
