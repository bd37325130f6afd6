use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ApiError;
use crate::auth::{AuthError, AuthenticatedUser, TokenStore};
use crate::domain::company::{Company, CompanyError, CompanyService, CompanyType};

// ============================================================================
// Route Table
// ============================================================================

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .route("/login", web::post().to(login))
            .route("/companies", web::post().to(create_company))
            .route("/companies/{id}", web::get().to(get_company))
            .route("/companies/{id}", web::patch().to(update_company))
            .route("/companies/{id}", web::delete().to(delete_company)),
    );
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Company write payload. Field presence and shape are checked here,
/// before the coordinator ever sees the request.
#[derive(Deserialize)]
pub struct CompanyInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub employees: i32,
    #[serde(default)]
    pub registered: bool,
    #[serde(rename = "type")]
    pub company_type: CompanyType,
}

impl CompanyInput {
    fn into_company(self) -> Result<Company, ApiError> {
        if self.name.trim().is_empty() {
            return Err(ApiError::BadRequest("name must not be empty".to_string()));
        }
        if self.employees <= 0 {
            return Err(ApiError::BadRequest(
                "employees must be a positive integer".to_string(),
            ));
        }

        Ok(Company {
            // Placeholder; identity is assigned by the coordinator.
            id: Uuid::nil(),
            name: self.name,
            description: self.description,
            employees: self.employees,
            registered: self.registered,
            company_type: self.company_type,
        })
    }
}

// ============================================================================
// Handlers
// ============================================================================

async fn login(
    tokens: web::Data<TokenStore>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, AuthError> {
    match tokens.login(&body.username, &body.password) {
        Some(token) => Ok(HttpResponse::Ok().json(LoginResponse { token })),
        None => Err(AuthError::InvalidCredentials),
    }
}

async fn create_company(
    service: web::Data<CompanyService>,
    user: AuthenticatedUser,
    body: web::Json<CompanyInput>,
) -> Result<HttpResponse, ApiError> {
    let company = body.into_inner().into_company()?;
    tracing::debug!(user = %user.username, name = %company.name, "create company request");

    let created = service.create(company).await?;
    Ok(HttpResponse::Created().json(created))
}

async fn get_company(
    service: web::Data<CompanyService>,
    _user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_id(&path)?;

    match service.get_by_id(id).await? {
        Some(company) => Ok(HttpResponse::Ok().json(company)),
        None => Err(ApiError::Domain(CompanyError::NotFound(id))),
    }
}

async fn update_company(
    service: web::Data<CompanyService>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    body: web::Json<CompanyInput>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_id(&path)?;
    let company = body.into_inner().into_company()?;
    tracing::debug!(user = %user.username, company_id = %id, "update company request");

    let updated = service.update(id, company).await?;
    Ok(HttpResponse::Ok().json(updated))
}

async fn delete_company(
    service: web::Data<CompanyService>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_id(&path)?;
    tracing::debug!(user = %user.username, company_id = %id, "delete company request");

    service.delete(id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({})))
}

fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|e| ApiError::InvalidId(format!("invalid company id: {e}")))
}

// ============================================================================
// Handler Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::{header, StatusCode};
    use actix_web::{test, App};
    use chrono::Duration;

    use super::*;
    use crate::auth::Credentials;
    use crate::messaging::testing::CollectingPublisher;
    use crate::metrics::Metrics;
    use crate::store::memory::MemoryCompanyStore;

    fn app_data() -> (web::Data<CompanyService>, web::Data<TokenStore>) {
        let service = CompanyService::new(
            Arc::new(MemoryCompanyStore::new()),
            Arc::new(CollectingPublisher::new()),
            Arc::new(Metrics::new().unwrap()),
        );
        let tokens = TokenStore::new(Credentials::new("admin", "admin"), Duration::seconds(60));
        (web::Data::new(service), web::Data::new(tokens))
    }

    fn acme_body() -> serde_json::Value {
        serde_json::json!({
            "name": "Acme",
            "description": "widgets",
            "employees": 100,
            "registered": true,
            "type": "Corporation"
        })
    }

    macro_rules! test_app {
        ($service:expr, $tokens:expr) => {
            test::init_service(
                App::new()
                    .app_data($service.clone())
                    .app_data($tokens.clone())
                    .configure(configure),
            )
            .await
        };
    }

    macro_rules! login_token {
        ($app:expr) => {{
            let req = test::TestRequest::post()
                .uri("/api/v1/login")
                .set_json(serde_json::json!({"username": "admin", "password": "admin"}))
                .to_request();
            let resp: LoginResponse = test::call_and_read_body_json(&$app, req).await;
            resp.token
        }};
    }

    #[actix_web::test]
    async fn full_lifecycle_over_http() {
        let (service, tokens) = app_data();
        let app = test_app!(service, tokens);
        let token = login_token!(app);
        let bearer = (header::AUTHORIZATION, format!("Bearer {token}"));

        // Create
        let req = test::TestRequest::post()
            .uri("/api/v1/companies")
            .insert_header(bearer.clone())
            .set_json(acme_body())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: Company = test::read_body_json(resp).await;
        assert_ne!(created.id, Uuid::nil());

        // Get
        let req = test::TestRequest::get()
            .uri(&format!("/api/v1/companies/{}", created.id))
            .insert_header(bearer.clone())
            .to_request();
        let fetched: Company = test::call_and_read_body_json(&app, req).await;
        assert_eq!(fetched, created);

        // Update
        let mut body = acme_body();
        body["employees"] = serde_json::json!(250);
        let req = test::TestRequest::patch()
            .uri(&format!("/api/v1/companies/{}", created.id))
            .insert_header(bearer.clone())
            .set_json(body)
            .to_request();
        let updated: Company = test::call_and_read_body_json(&app, req).await;
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.employees, 250);

        // Delete, then the record is gone
        let req = test::TestRequest::delete()
            .uri(&format!("/api/v1/companies/{}", created.id))
            .insert_header(bearer.clone())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri(&format!("/api/v1/companies/{}", created.id))
            .insert_header(bearer)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn duplicate_name_returns_conflict() {
        let (service, tokens) = app_data();
        let app = test_app!(service, tokens);
        let token = login_token!(app);
        let bearer = (header::AUTHORIZATION, format!("Bearer {token}"));

        let req = test::TestRequest::post()
            .uri("/api/v1/companies")
            .insert_header(bearer.clone())
            .set_json(acme_body())
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::CREATED
        );

        let req = test::TestRequest::post()
            .uri("/api/v1/companies")
            .insert_header(bearer)
            .set_json(acme_body())
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::CONFLICT
        );
    }

    #[actix_web::test]
    async fn requests_without_token_are_unauthorized() {
        let (service, tokens) = app_data();
        let app = test_app!(service, tokens);

        let req = test::TestRequest::post()
            .uri("/api/v1/companies")
            .set_json(acme_body())
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[actix_web::test]
    async fn malformed_id_and_body_are_rejected() {
        let (service, tokens) = app_data();
        let app = test_app!(service, tokens);
        let token = login_token!(app);
        let bearer = (header::AUTHORIZATION, format!("Bearer {token}"));

        let req = test::TestRequest::get()
            .uri("/api/v1/companies/not-a-uuid")
            .insert_header(bearer.clone())
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );

        let mut body = acme_body();
        body["employees"] = serde_json::json!(0);
        let req = test::TestRequest::post()
            .uri("/api/v1/companies")
            .insert_header(bearer.clone())
            .set_json(body)
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::BAD_REQUEST
        );

        let mut body = acme_body();
        body["name"] = serde_json::json!("   ");
        let req = test::TestRequest::post()
            .uri("/api/v1/companies")
            .insert_header(bearer)
            .set_json(body)
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[actix_web::test]
    async fn bad_login_is_unauthorized() {
        let (service, tokens) = app_data();
        let app = test_app!(service, tokens);

        let req = test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(serde_json::json!({"username": "admin", "password": "nope"}))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::UNAUTHORIZED
        );
    }
}
