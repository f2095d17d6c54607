use crate::models::{ChatRequest, ChatResponse, DirectoryChatRequest, ErrorResponse};
use crate::routes::AppState;
use actix_web::{web, HttpResponse, Responder};
use tracing::Instrument;
use validator::Validate;

/// Configure chat routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/chat", web::post().to(chat))
        .route("/directory-chat", web::post().to(directory_chat));
}

fn empty_message() -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Validation failed".to_string(),
        message: "message must not be empty".to_string(),
        status_code: 400,
    })
}

/// Startup advisor chat
///
/// POST /api/chat
///
/// Request body:
/// ```json
/// {
///   "message": "Which grants am I eligible for?",
///   "profile": { "sector": "AgriTech", "stage": "Idea" },
///   "history": [{ "role": "user", "content": "Hi" }]
/// }
/// ```
///
/// Always answers 200 with a reply once the message is valid; vendor
/// failures are turned into fallback text by the proxy.
async fn chat(state: web::Data<AppState>, req: web::Json<ChatRequest>) -> impl Responder {
    if req.validate().is_err() || req.message.trim().is_empty() {
        return empty_message();
    }

    let request_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("chat", %request_id, history = req.history.len());

    let reply = async {
        tracing::info!("Advisor question received (profile: {})", req.profile.is_some());
        state
            .chat
            .advise(&req.message, req.profile.as_ref(), &req.history)
            .await
    }
    .instrument(span)
    .await;

    HttpResponse::Ok()
        .insert_header(("x-request-id", request_id.to_string()))
        .json(ChatResponse { reply })
}

/// Directory advisor chat, answering only from the local listing
///
/// POST /api/directory-chat
async fn directory_chat(state: web::Data<AppState>, req: web::Json<DirectoryChatRequest>) -> impl Responder {
    if req.validate().is_err() || req.message.trim().is_empty() {
        return empty_message();
    }

    let request_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("directory_chat", %request_id);

    let reply = state
        .chat
        .directory(&req.message, &req.history)
        .instrument(span)
        .await;

    HttpResponse::Ok()
        .insert_header(("x-request-id", request_id.to_string()))
        .json(ChatResponse { reply })
}
