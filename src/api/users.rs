use async_trait::async_trait;

use crate::api::{HttpClient, UserApi};
use crate::error::ApiResult;
use crate::models::{LoginUser, PasswordChange, RegisterUser, TokenResponse, User, UserUpdate};

#[derive(Debug, Clone)]
pub struct UsersClient {
    http: HttpClient,
}

impl UsersClient {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }
}

#[async_trait]
impl UserApi for UsersClient {
    async fn register_user(&self, data: &RegisterUser) -> ApiResult<User> {
        self.http.post("/register", data).await
    }

    async fn login_user(&self, data: &LoginUser) -> ApiResult<TokenResponse> {
        self.http.post("/login", data).await
    }

    async fn get_all_users(&self) -> ApiResult<Vec<User>> {
        self.http.get("/users").await
    }

    async fn get_user_by_id(&self, id: i64) -> ApiResult<User> {
        self.http.get(&format!("/user?id={}", id)).await
    }

    async fn update_user(&self, id: i64, data: &UserUpdate) -> ApiResult<()> {
        self.http.put_unit(&format!("/user?id={}", id), data).await
    }

    async fn delete_user(&self, id: i64) -> ApiResult<()> {
        self.http.delete_unit(&format!("/user?id={}", id)).await
    }

    async fn get_user_profile(&self) -> ApiResult<User> {
        self.http.get("/profile").await
    }

    async fn change_password(&self, data: &PasswordChange) -> ApiResult<()> {
        self.http.post_unit("/password/change", data).await
    }
}
