//! API routes

use axum::{
    routing::{get, post},
    Router,
};
use serde::Serialize;

use crate::extractors::{AppState, HalResponse};
use crate::handlers::{auth, export, projects, reports, task_activities, users};
use crate::representers::hal::{rels, HalLink, HalLinks, API_PREFIX};

/// Create the complete API router
pub fn router() -> Router<AppState> {
    Router::new().nest(API_PREFIX, api_v1_router())
}

fn api_v1_router() -> Router<AppState> {
    Router::new()
        .route("/", get(api_root))
        .nest("/auth", auth_router())
        .nest("/users", users_router())
        .nest("/projects", projects_router())
        .nest("/reports", reports_router())
        .nest("/export", export_router())
        .route("/task-activities", get(task_activities::list_task_activities))
        .route("/task-activities/:id", get(task_activities::get_task_activity))
}

fn auth_router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
}

fn users_router() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list_users).post(users::create_user))
        .route("/me", get(users::get_me).patch(users::update_me))
        .route("/:id", get(users::get_user).patch(users::update_user))
}

fn projects_router() -> Router<AppState> {
    Router::new()
        .route("/", get(projects::list_projects).post(projects::create_project))
        .route(
            "/:id",
            get(projects::get_project)
                .patch(projects::update_project)
                .delete(projects::delete_project),
        )
        .route(
            "/:id/managers/:user_id",
            post(projects::add_manager).delete(projects::remove_manager),
        )
        .route(
            "/:id/members/:user_id",
            post(projects::add_member).delete(projects::remove_member),
        )
        .route("/:id/join", post(projects::join_project))
        .route(
            "/:id/task-activities",
            get(projects::list_project_task_activities).post(projects::add_project_task_activity),
        )
        .route(
            "/:id/task-activities/:activity_id",
            axum::routing::delete(projects::remove_project_task_activity),
        )
}

fn reports_router() -> Router<AppState> {
    Router::new()
        .route("/", get(reports::list_reports).post(reports::create_report))
        .route("/hours-per-date", get(reports::hours_per_date))
        .route("/daily-hours", get(reports::daily_hours))
        .route("/statistics/work-percentage", get(reports::work_percentage))
        .route("/author/:id", get(reports::list_author_reports))
        .route("/project/:id", get(reports::list_project_reports))
        .route(
            "/project/:id/author/:user_id",
            get(reports::list_project_author_reports),
        )
        .route(
            "/:id",
            get(reports::get_report)
                .patch(reports::update_report)
                .delete(reports::delete_report),
        )
}

fn export_router() -> Router<AppState> {
    Router::new()
        .route("/user/:id", get(export::export_user))
        .route("/project/:id", get(export::export_project))
        .route("/project/:id/author/:user_id", get(export::export_project_author))
}

async fn api_root() -> HalResponse<ApiRoot> {
    let links = HalLinks::new()
        .with(rels::SELF, HalLink::new(API_PREFIX))
        .with("login", HalLink::new(format!("{}/auth/login", API_PREFIX)).method("POST"))
        .with("user", HalLink::new(format!("{}/users/me", API_PREFIX)))
        .with("projects", HalLink::new(format!("{}/projects", API_PREFIX)))
        .with(
            rels::REPORTS,
            HalLink::templated(format!("{}/reports{{?year,month}}", API_PREFIX)),
        )
        .with(
            rels::TASK_ACTIVITIES,
            HalLink::new(format!("{}/task-activities", API_PREFIX)),
        );
    HalResponse(ApiRoot {
        type_name: "Root".into(),
        instance_name: "SheetStorm".into(),
        links,
    })
}

#[derive(Serialize)]
struct ApiRoot {
    #[serde(rename = "_type")]
    type_name: String,
    #[serde(rename = "instanceName")]
    instance_name: String,
    #[serde(rename = "_links")]
    links: HalLinks,
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use ss_auth::{hash_password, JwtService};
    use ss_models::{User, UserType};
    use ss_services::{AccountPolicy, Stores};
    use tower::ServiceExt;

    const SECRET: &[u8] = b"test-secret-key-at-least-32-bytes";
    const PASSWORD: &str = "passwduser";

    struct TestApp {
        state: AppState,
    }

    impl TestApp {
        fn new() -> Self {
            let state = AppState::new(
                Stores::memory(),
                AccountPolicy::default(),
                JwtService::new(SECRET, 1),
            );
            Self { state }
        }

        /// Stored account plus a bearer token for it
        async fn user(&self, email: &str, user_type: UserType) -> (User, String) {
            let mut user = User::new(email, user_type);
            user.first_name = "Jan".into();
            user.last_name = "Kowalski".into();
            user.password_hash = Some(hash_password(PASSWORD).unwrap());
            let user = self.state.stores.users.insert(&user).await.unwrap();
            let token = self
                .state
                .jwt
                .create_token(user.id.unwrap(), None, None)
                .unwrap();
            (user, token)
        }

        async fn raw(
            &self,
            method: Method,
            uri: &str,
            token: Option<&str>,
            body: Option<Value>,
        ) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
            let mut request = Request::builder().method(method).uri(uri);
            if let Some(token) = token {
                request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
            }
            let request = match body {
                Some(body) => request
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
                None => request.body(Body::empty()).unwrap(),
            };

            let response = router()
                .with_state(self.state.clone())
                .oneshot(request)
                .await
                .unwrap();
            let status = response.status();
            let headers = response.headers().clone();
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            (status, headers, bytes.to_vec())
        }

        async fn send(
            &self,
            method: Method,
            uri: &str,
            token: Option<&str>,
            body: Option<Value>,
        ) -> (StatusCode, Value) {
            let (status, _, bytes) = self.raw(method, uri, token, body).await;
            let json = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).unwrap()
            };
            (status, json)
        }
    }

    fn project_body(name: &str) -> Value {
        json!({ "name": name, "startDate": "2024-01-01" })
    }

    fn report_body(project_id: i64, date: &str, hours: &str) -> Value {
        json!({
            "date": date,
            "description": "Code review",
            "projectId": project_id,
            "workHours": hours,
        })
    }

    #[tokio::test]
    async fn test_api_root() {
        let app = TestApp::new();
        let (status, json) = app.send(Method::GET, "/api/v1/", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["_type"], "Root");
        assert_eq!(json["_links"]["self"]["href"], "/api/v1");
    }

    #[tokio::test]
    async fn test_signup_then_login() {
        let app = TestApp::new();
        let (status, json) = app
            .send(
                Method::POST,
                "/api/v1/auth/signup",
                None,
                Some(json!({
                    "email": "New.User@codepoets.it",
                    "password": PASSWORD,
                    "passwordConfirmation": PASSWORD,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["email"], "new.user@codepoets.it");
        assert_eq!(json["userType"], "EMPLOYEE");

        let (status, json) = app
            .send(
                Method::POST,
                "/api/v1/auth/login",
                None,
                Some(json!({ "email": "new.user@codepoets.it", "password": PASSWORD })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["tokenType"], "Bearer");
        let token = json["token"].as_str().unwrap().to_string();

        let (status, json) = app.send(Method::GET, "/api/v1/users/me", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["email"], "new.user@codepoets.it");
    }

    #[tokio::test]
    async fn test_signup_validation_details() {
        let app = TestApp::new();
        let (status, json) = app
            .send(
                Method::POST,
                "/api/v1/auth/signup",
                None,
                Some(json!({
                    "email": "someone@gmail.com",
                    "password": "short",
                    "passwordConfirmation": "other",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            json["errorIdentifier"],
            "urn:sheetstorm:api:v1:errors:PropertyConstraintViolation"
        );
        assert!(json["_embedded"]["details"]["email"].is_array());
        assert!(json["_embedded"]["details"]["password"].is_array());
        assert!(json["_embedded"]["details"]["password_confirmation"].is_array());
    }

    #[tokio::test]
    async fn test_wrong_password_is_unauthorized() {
        let app = TestApp::new();
        app.user("jan@codepoets.it", UserType::Employee).await;
        let (status, json) = app
            .send(
                Method::POST,
                "/api/v1/auth/login",
                None,
                Some(json!({ "email": "jan@codepoets.it", "password": "wrong-password" })),
            )
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["_type"], "Error");
    }

    #[tokio::test]
    async fn test_requires_authentication() {
        let app = TestApp::new();
        let (status, json) = app.send(Method::GET, "/api/v1/reports", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["errorIdentifier"], "urn:sheetstorm:api:v1:errors:Unauthenticated");

        let (status, _) = app
            .send(Method::GET, "/api/v1/reports", Some("not-a-token"), None)
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_user_listing_is_admin_only() {
        let app = TestApp::new();
        let (_, admin) = app.user("admin@codepoets.it", UserType::Admin).await;
        let (_, employee) = app.user("jan@codepoets.it", UserType::Employee).await;

        let (status, json) = app.send(Method::GET, "/api/v1/users", Some(&admin), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["_type"], "UserCollection");
        assert_eq!(json["total"], 2);
        assert_eq!(json["_embedded"]["elements"][0]["email"], "admin@codepoets.it");

        let (status, json) = app.send(Method::GET, "/api/v1/users", Some(&employee), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["errorIdentifier"], "urn:sheetstorm:api:v1:errors:MissingPermission");
    }

    #[tokio::test]
    async fn test_admin_promotes_user() {
        let app = TestApp::new();
        let (_, admin) = app.user("admin@codepoets.it", UserType::Admin).await;
        let (jan, _) = app.user("jan@codepoets.it", UserType::Employee).await;

        let uri = format!("/api/v1/users/{}", jan.id.unwrap());
        let (status, json) = app
            .send(Method::PATCH, &uri, Some(&admin), Some(json!({ "userType": "MANAGER" })))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["userType"], "MANAGER");
    }

    #[tokio::test]
    async fn test_project_lifecycle_and_promotion() {
        let app = TestApp::new();
        let (_, admin) = app.user("admin@codepoets.it", UserType::Admin).await;
        let (jan, jan_token) = app.user("jan@codepoets.it", UserType::Employee).await;
        let jan_id = jan.id.unwrap();

        let (status, json) = app
            .send(Method::POST, "/api/v1/projects", Some(&admin), Some(project_body("Time Monkey")))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["status"], "active");
        let project_id = json["id"].as_i64().unwrap();

        let (status, twin) = app
            .send(Method::POST, "/api/v1/projects", Some(&admin), Some(project_body("Time Monkey")))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_ne!(twin["id"].as_i64().unwrap(), project_id);

        let uri = format!("/api/v1/projects/{}/managers/{}", project_id, jan_id);
        let (status, json) = app.send(Method::POST, &uri, Some(&admin), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["managers"], json!([jan_id]));
        assert_eq!(json["members"], json!([jan_id]));

        let (_, me) = app.send(Method::GET, "/api/v1/users/me", Some(&jan_token), None).await;
        assert_eq!(me["userType"], "MANAGER");

        let (status, json) = app.send(Method::GET, "/api/v1/projects", Some(&jan_token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["total"], 1);

        let (status, _) = app.send(Method::DELETE, &uri, Some(&admin), None).await;
        assert_eq!(status, StatusCode::OK);
        let (_, me) = app.send(Method::GET, "/api/v1/users/me", Some(&jan_token), None).await;
        assert_eq!(me["userType"], "EMPLOYEE");

        let project_uri = format!("/api/v1/projects/{}", project_id);
        let (status, _) = app.send(Method::DELETE, &project_uri, Some(&jan_token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        let (status, _) = app.send(Method::DELETE, &project_uri, Some(&admin), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = app.send(Method::GET, &project_uri, Some(&admin), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_join_and_report_flow() {
        let app = TestApp::new();
        let (_, admin) = app.user("admin@codepoets.it", UserType::Admin).await;
        let (jan, jan_token) = app.user("jan@codepoets.it", UserType::Employee).await;

        let (_, project) = app
            .send(Method::POST, "/api/v1/projects", Some(&admin), Some(project_body("Alpha")))
            .await;
        let project_id = project["id"].as_i64().unwrap();

        let report = report_body(project_id, "2024-03-04", "02:30");
        let (status, _) = app
            .send(Method::POST, "/api/v1/reports", Some(&jan_token), Some(report.clone()))
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let join = format!("/api/v1/projects/{}/join", project_id);
        let (status, json) = app.send(Method::POST, &join, Some(&jan_token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["members"], json!([jan.id.unwrap()]));

        let (status, json) = app
            .send(Method::POST, "/api/v1/reports", Some(&jan_token), Some(report))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["workHours"], "02:30");
        assert_eq!(json["_links"]["taskActivity"]["title"], "Other");
        assert_eq!(json["_links"]["project"]["title"], "Alpha");
        let report_uri = format!("/api/v1/reports/{}", json["id"]);

        let (status, json) = app
            .send(
                Method::PATCH,
                &report_uri,
                Some(&jan_token),
                Some(json!({ "workHours": "03:00" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["workHours"], "03:00");

        let (status, json) = app
            .send(
                Method::GET,
                "/api/v1/reports?year=2024&month=3",
                Some(&jan_token),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["_type"], "ReportCollection");
        assert_eq!(json["total"], 1);
        assert_eq!(
            json["_links"]["self"]["href"],
            "/api/v1/reports?year=2024&month=3&offset=0&pageSize=20"
        );

        let (status, json) = app
            .send(
                Method::GET,
                "/api/v1/reports/hours-per-date?year=2024&month=3",
                Some(&jan_token),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["dates"]["2024-03-04"], "03:00");

        let (status, json) = app
            .send(
                Method::GET,
                "/api/v1/reports/daily-hours?date=2024-03-04",
                Some(&jan_token),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["remaining"], "21:00");

        let (status, _) = app.send(Method::DELETE, &report_uri, Some(&jan_token), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = app.send(Method::GET, &report_uri, Some(&jan_token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_invalid_month_is_rejected() {
        let app = TestApp::new();
        let (_, token) = app.user("jan@codepoets.it", UserType::Employee).await;
        let (status, json) = app
            .send(Method::GET, "/api/v1/reports?year=2024&month=13", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(json["_embedded"]["details"].is_object());

        let (status, json) = app
            .send(Method::GET, "/api/v1/reports?year=262142&month=12", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(json["_embedded"]["details"]["year"].is_array());
    }

    #[tokio::test]
    async fn test_project_task_activities() {
        let app = TestApp::new();
        let (_, admin) = app.user("admin@codepoets.it", UserType::Admin).await;
        let (_, project) = app
            .send(Method::POST, "/api/v1/projects", Some(&admin), Some(project_body("Alpha")))
            .await;
        let uri = format!("/api/v1/projects/{}/task-activities", project["id"]);

        let (status, json) = app
            .send(Method::POST, &uri, Some(&admin), Some(json!({ "name": "Code Review" })))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let activity_id = json["id"].as_i64().unwrap();

        let (status, json) = app.send(Method::GET, &uri, Some(&admin), None).await;
        assert_eq!(status, StatusCode::OK);
        let names: Vec<&str> = json["_embedded"]["elements"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|a| a["name"].as_str())
            .collect();
        assert!(names.contains(&"Code Review"));

        let delete = format!("{}/{}", uri, activity_id);
        let (status, _) = app.send(Method::DELETE, &delete, Some(&admin), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, json) = app
            .send(Method::GET, "/api/v1/task-activities", Some(&admin), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert!(json["_embedded"]["elements"]
            .as_array()
            .unwrap()
            .iter()
            .any(|a| a["name"] == "Other" && a["isDefault"] == true));
    }

    #[tokio::test]
    async fn test_project_export_download() {
        let app = TestApp::new();
        let (_, admin) = app.user("admin@codepoets.it", UserType::Admin).await;
        let (_, jan_token) = app.user("jan@codepoets.it", UserType::Employee).await;
        let (_, project) = app
            .send(Method::POST, "/api/v1/projects", Some(&admin), Some(project_body("Alpha")))
            .await;
        let project_id = project["id"].as_i64().unwrap();
        let join = format!("/api/v1/projects/{}/join", project_id);
        app.send(Method::POST, &join, Some(&jan_token), None).await;
        app.send(
            Method::POST,
            "/api/v1/reports",
            Some(&jan_token),
            Some(report_body(project_id, "2024-03-04", "02:00")),
        )
        .await;

        let uri = format!("/api/v1/export/project/{}?year=2024&month=3&format=csv", project_id);
        let (status, headers, bytes) = app.raw(Method::GET, &uri, Some(&admin), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            headers[header::CONTENT_DISPOSITION],
            "attachment; filename=\"Alpha-2024-03.csv\""
        );
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("Employee: Jan K."));

        let uri = format!("/api/v1/export/project/{}?year=2024&month=3&format=zip", project_id);
        let (status, headers, bytes) = app.raw(Method::GET, &uri, Some(&admin), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_TYPE], "application/zip");
        assert!(bytes.starts_with(b"PK"));

        let (status, _, _) = app.raw(Method::GET, &uri, Some(&jan_token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_user_export_formats() {
        let app = TestApp::new();
        let (jan, token) = app.user("jan@codepoets.it", UserType::Employee).await;
        let base = format!("/api/v1/export/user/{}?year=2024&month=3", jan.id.unwrap());

        let (status, headers, _) = app.raw(Method::GET, &base, Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            headers[header::CONTENT_DISPOSITION],
            "attachment; filename=\"Jan K.-2024-03.xlsx\""
        );

        let (status, _) = app
            .send(Method::GET, &format!("{}&format=zip", base), Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let (status, json) = app
            .send(Method::GET, &format!("{}&format=pdf", base), Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(json["_embedded"]["details"]["format"].is_array());
    }
}
