use crate::catalog::Catalog;
use crate::core::{filter_directory, filter_resources, Matcher};
use crate::models::{
    Category, DirectoryListResponse, DirectoryQuery, ErrorResponse, HealthResponse, RecommendRequest,
    RecommendResponse, Resource, ResourceListResponse, ResourceQuery,
};
use crate::services::{ChatProvider, ChatProxy, LlmProvider};
use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub matcher: Matcher,
    pub chat: Arc<ChatProxy<LlmProvider>>,
}

/// Configure recommendation and browsing routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/recommend", web::post().to(recommend))
        .route("/resources", web::get().to(list_resources))
        .route("/directory", web::get().to(list_directory));
}

/// Health check endpoint
///
/// Reports "degraded" when the chat vendor has no API key; recommendations
/// and browsing still work.
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let provider = state.chat.provider();
    let status = if provider.is_configured() { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        provider: provider.name().to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Rank the catalog for a founder profile
///
/// POST /api/recommend
///
/// Request body:
/// ```json
/// {
///   "profile": {
///     "sector": "FinTech",
///     "stage": "MVP",
///     "teamBackground": "Student",
///     "geography": "Mumbai",
///     "isResearchBased": false
///   }
/// }
/// ```
async fn recommend(state: web::Data<AppState>, req: web::Json<RecommendRequest>) -> impl Responder {
    let profile = match req.into_inner().profile {
        Some(profile) if profile.has_sector() => profile,
        _ => {
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "Profile required".to_string(),
                message: "A profile with at least a sector is required".to_string(),
                status_code: 400,
            });
        }
    };

    let result = state.matcher.get_recommendations(&profile, &state.catalog);

    tracing::info!(
        "Recommended {} grants, {} incubators, {} investors for sector {} (from {} resources)",
        result.top_grants.len(),
        result.top_incubators.len(),
        result.top_investors.len(),
        profile.sector(),
        result.all.len()
    );

    HttpResponse::Ok().json(RecommendResponse {
        profile,
        recommendations: result.into_top(),
    })
}

/// Resolve a category query value to its dataset
fn resources_for<'a>(catalog: &'a Catalog, category: &str) -> Option<(Category, &'a [Resource])> {
    match category.trim().to_lowercase().as_str() {
        "grants" | "grant" => Some((Category::Grant, catalog.grants())),
        "incubators" | "incubator" => Some((Category::Incubator, catalog.incubators())),
        "investors" | "investor" => Some((Category::Investor, catalog.investors())),
        _ => None,
    }
}

/// Browse one resource category
///
/// GET /api/resources?category=grants&q=women&sector=FinTech&stage=MVP
async fn list_resources(state: web::Data<AppState>, query: web::Query<ResourceQuery>) -> impl Responder {
    let Some((category, resources)) = resources_for(&state.catalog, &query.category) else {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Invalid category".to_string(),
            message: "Category must be one of: grants, incubators, investors".to_string(),
            status_code: 400,
        });
    };

    let results: Vec<Resource> = filter_resources(resources, &query.q, &query.sector, &query.stage)
        .into_iter()
        .cloned()
        .collect();

    tracing::debug!("{} of {} {} passed filters", results.len(), resources.len(), category.as_str());

    HttpResponse::Ok().json(ResourceListResponse {
        category,
        total: results.len(),
        results,
    })
}

/// Browse the local startup-space directory
///
/// GET /api/directory?search=powai&region=East%20Mumbai&broadType=Private&equity=Zero%20Equity
async fn list_directory(state: web::Data<AppState>, query: web::Query<DirectoryQuery>) -> impl Responder {
    let results: Vec<_> = filter_directory(state.catalog.directory(), &query)
        .into_iter()
        .cloned()
        .collect();

    HttpResponse::Ok().json(DirectoryListResponse {
        total: results.len(),
        results,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChatSettings;
    use crate::routes::{configure_extractors, configure_routes};
    use actix_web::{test, App};
    use serde_json::{json, Value};

    fn create_state() -> AppState {
        let catalog = Arc::new(Catalog::bundled().unwrap());
        let settings = ChatSettings::default();
        let provider = LlmProvider::from_settings(&settings).unwrap();
        let chat = ChatProxy::new(provider, catalog.clone(), Matcher::default(), &settings);

        AppState {
            catalog,
            matcher: Matcher::default(),
            chat: Arc::new(chat),
        }
    }

    #[actix_web::test]
    async fn test_health_reports_provider() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(create_state()))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["status"], "degraded");
        assert_eq!(body["provider"], "nvidia-nim");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[actix_web::test]
    async fn test_recommend_returns_ranked_lists() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(create_state()))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/recommend")
            .set_json(json!({"profile": {"sector": "FinTech", "stage": "MVP", "geography": "Mumbai"}}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        let grants = body["recommendations"]["topGrants"].as_array().unwrap();
        assert_eq!(grants.len(), 5);
        assert!(grants.iter().all(|g| g["category"] == "grant"));
        assert!(grants[0]["matchScore"].as_u64().unwrap() >= grants[4]["matchScore"].as_u64().unwrap());
        assert_eq!(body["profile"]["sector"], "FinTech");
    }

    #[actix_web::test]
    async fn test_recommend_requires_sector() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(create_state()))
                .configure(configure_routes),
        )
        .await;

        for payload in [json!({}), json!({"profile": {"stage": "Idea"}})] {
            let req = test::TestRequest::post().uri("/api/recommend").set_json(payload).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), 400);

            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["status_code"], 400);
        }
    }

    #[actix_web::test]
    async fn test_malformed_json_is_json_400() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(create_state()))
                .configure(configure_extractors)
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/recommend")
            .insert_header(("content-type", "application/json"))
            .set_payload("{\"profile\":")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "invalid_json");
    }

    #[actix_web::test]
    async fn test_list_resources_filters() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(create_state()))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/resources?category=investors&sector=HealthTech&stage=Scaling")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["category"], "investor");
        let names: Vec<&str> = body["results"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["HealthQuad", "Chiratae Ventures"]);
        assert_eq!(body["total"], 2);
    }

    #[actix_web::test]
    async fn test_list_resources_rejects_unknown_category() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(create_state()))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/resources?category=loans").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
    }

    #[actix_web::test]
    async fn test_list_directory_filters() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(create_state()))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/directory?region=Navi%20Mumbai")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        let results = body["results"].as_array().unwrap();
        assert_eq!(body["total"].as_u64().unwrap() as usize, results.len());
        assert!(!results.is_empty());
        assert!(results.iter().all(|e| e["subRegion"] == "Navi Mumbai"));
    }
}
