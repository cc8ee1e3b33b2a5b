use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

use crate::core::{high_ticket_score, OnboardingWizard, TasteQuiz};
use crate::models::{
    CompleteOnboardingRequest, ErrorResponse, ImageMetadata, OnboardingResponse, SaveBoardRequest,
    SaveItemRequest, TasteQuizRequest,
};
use crate::routes::{internal_error, not_found, validation_error, AppState};
use crate::services::resolve_reference_image;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/onboarding/complete", web::post().to(complete_onboarding))
        .route("/quiz/score", web::post().to(score_quiz))
        .route("/profiles/{user_id}", web::get().to(get_profile))
        .route("/saved", web::post().to(save_item))
        .route("/saved/{user_id}", web::get().to(list_saved_items))
        .route("/saved/{user_id}/{item_id}", web::delete().to(remove_saved_item))
        .route("/moodboards", web::put().to(save_board))
        .route("/moodboards/{user_id}", web::get().to(list_boards))
        .route("/moodboards/{user_id}/{board_id}", web::delete().to(delete_board));
}

/// Finish onboarding
///
/// POST /api/v1/onboarding/complete
///
/// The submission is replayed through the wizard so every step is validated
/// the same way the client validated it. A reference image for the project
/// is resolved in the background; failures there never block the user.
async fn complete_onboarding(
    state: web::Data<AppState>,
    req: web::Json<CompleteOnboardingRequest>,
) -> impl Responder {
    if let Some(resp) = validation_error(&*req) {
        return resp;
    }

    let req = req.into_inner();
    let data = match OnboardingWizard::replay(req.data) {
        Ok(data) => data,
        Err(e) => {
            tracing::info!("Onboarding rejected for {}: {}", req.user_id, e);
            return HttpResponse::BadRequest().json(ErrorResponse::new(
                "Onboarding incomplete",
                e.to_string(),
                400,
            ));
        }
    };

    let score = high_ticket_score(&data);
    if let Err(e) = state.store.upsert_profile(&req.user_id, &data, score).await {
        return internal_error("Failed to store profile", e);
    }

    let seed = ImageMetadata::onboarding_seed(&data);
    let sanity = state.sanity.clone();
    let generator = state.image_generator.clone();
    let user_id = req.user_id.clone();
    actix_web::rt::spawn(async move {
        let url = resolve_reference_image(&sanity, generator.as_deref(), &seed).await;
        tracing::info!("Onboarding reference image for {}: {}", user_id, url);
    });

    tracing::info!("Onboarding complete for {} (high-ticket score {})", req.user_id, score);

    HttpResponse::Ok().json(OnboardingResponse {
        success: true,
        high_ticket_score: score,
        redirect: "/discover".to_string(),
    })
}

/// Fold quiz swipes into a taste vector
///
/// POST /api/v1/quiz/score
async fn score_quiz(req: web::Json<TasteQuizRequest>) -> impl Responder {
    if let Some(resp) = validation_error(&*req) {
        return resp;
    }

    let req = req.into_inner();
    let mut quiz = TasteQuiz::new(req.cards);
    for swipe in &req.swipes {
        quiz.swipe(&swipe.card_id, swipe.direction);
    }

    HttpResponse::Ok().json(json!({
        "tasteVector": quiz.taste(),
        "complete": quiz.is_complete(),
        "remaining": quiz.remaining(),
    }))
}

/// GET /api/v1/profiles/{user_id}
async fn get_profile(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let user_id = path.into_inner();

    match state.store.get_profile(&user_id).await {
        Ok(Some(data)) => HttpResponse::Ok().json(data),
        Ok(None) => not_found("Profile not found", format!("No profile for user {}", user_id)),
        Err(e) => internal_error("Failed to fetch profile", e),
    }
}

/// Add an item to the saved collection; saving twice is a no-op
///
/// POST /api/v1/saved
async fn save_item(state: web::Data<AppState>, req: web::Json<SaveItemRequest>) -> impl Responder {
    if let Some(resp) = validation_error(&*req) {
        return resp;
    }

    match state
        .store
        .save_item(&req.user_id, &req.item, req.notes.as_deref())
        .await
    {
        Ok(added) => {
            tracing::debug!("Save {} for {}: added={}", req.item.id, req.user_id, added);
            HttpResponse::Ok().json(json!({ "success": true, "added": added }))
        }
        Err(e) => internal_error("Failed to save item", e),
    }
}

/// GET /api/v1/saved/{user_id}
async fn list_saved_items(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    match state.store.list_saved_items(&path).await {
        Ok(items) => HttpResponse::Ok().json(items),
        Err(e) => internal_error("Failed to fetch saved items", e),
    }
}

/// DELETE /api/v1/saved/{user_id}/{item_id}
async fn remove_saved_item(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> impl Responder {
    let (user_id, item_id) = path.into_inner();

    match state.store.remove_saved_item(&user_id, &item_id).await {
        Ok(removed) => HttpResponse::Ok().json(json!({ "success": true, "removed": removed })),
        Err(e) => internal_error("Failed to remove saved item", e),
    }
}

/// Store a whole board
///
/// PUT /api/v1/moodboards
async fn save_board(state: web::Data<AppState>, req: web::Json<SaveBoardRequest>) -> impl Responder {
    if let Some(resp) = validation_error(&*req) {
        return resp;
    }

    let mut board = req.into_inner();
    board.board.updated_at = chrono::Utc::now().timestamp_millis();

    match state.store.save_board(&board.user_id, &board.board).await {
        Ok(()) => HttpResponse::Ok().json(board.board),
        Err(e) => internal_error("Failed to save moodboard", e),
    }
}

/// GET /api/v1/moodboards/{user_id}
async fn list_boards(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    match state.store.list_boards(&path).await {
        Ok(boards) => HttpResponse::Ok().json(boards),
        Err(e) => internal_error("Failed to fetch moodboards", e),
    }
}

/// DELETE /api/v1/moodboards/{user_id}/{board_id}
async fn delete_board(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> impl Responder {
    let (user_id, board_id) = path.into_inner();

    match state.store.delete_board(&user_id, &board_id).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(crate::services::StoreError::NotFound(what)) => not_found("Moodboard not found", what),
        Err(e) => internal_error("Failed to delete moodboard", e),
    }
}
