mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum::Router;
use dreamtales_core::status::{StoryStatus, SubscriptionTier};
use dreamtales_db::models::character::CreateCharacter;
use dreamtales_db::repositories::{CharacterRepo, ProfileRepo, StoryImageRepo, StoryRepo};
use serde_json::json;
use sqlx::PgPool;

use common::{expect_data, expect_error, get, new_user, post_json, FakeProvider};

const ENGINE: &str = "/api/v1/story-engine";

fn app(pool: &PgPool, provider: &Arc<FakeProvider>) -> Router {
    common::build_app(pool.clone(), Some(Arc::clone(provider)))
}

/// Generate a story through the API and return its id.
async fn generate_story(
    pool: &PgPool,
    provider: &Arc<FakeProvider>,
    token: &str,
    complete: bool,
) -> i64 {
    let response = post_json(
        app(pool, provider),
        ENGINE,
        token,
        json!({ "operation": "generate", "prompt": "An owl who cannot sleep", "complete": complete }),
    )
    .await;
    let data = expect_data(response, StatusCode::CREATED).await;
    data["story"]["id"].as_i64().unwrap()
}

// ---------------------------------------------------------------------------
// generate
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_generate_stores_story_and_counts_usage(pool: PgPool) {
    let provider = Arc::new(FakeProvider::default());
    let (user_id, token) = new_user(&pool, SubscriptionTier::Free).await;

    let response = post_json(
        app(&pool, &provider),
        ENGINE,
        &token,
        json!({
            "operation": "generate",
            "prompt": "An owl who cannot sleep",
            "length": "short",
            "tone": "Calm",
            "themes": ["friendship"]
        }),
    )
    .await;
    let data = expect_data(response, StatusCode::CREATED).await;

    assert_eq!(data["operation"], "generate");
    assert_eq!(data["story"]["title"], "The Sleepy Owl");
    assert_eq!(data["story"]["status"], "complete");
    assert_eq!(data["story"]["is_complete"], true);
    assert_eq!(data["story"]["length"], "short");
    assert_eq!(data["story"]["tone"], "calm");
    assert_eq!(data["story"]["version"], 1);
    assert!(data["story"]["content"]
        .as_str()
        .unwrap()
        .starts_with("Once upon a time"));
    assert_eq!(data["images"], json!([]));
    assert!(data.get("image_error").is_none());
    assert_eq!(data["usage"]["stories_this_month"], 1);
    assert_eq!(data["usage"]["stories_remaining"], 2);

    assert_eq!(StoryRepo::count_by_user(&pool, user_id).await.unwrap(), 1);
    assert_eq!(provider.completion_calls(), 1);
    assert!(provider.last_prompt().user.contains("An owl who cannot sleep"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_generate_without_ending_leaves_story_paused(pool: PgPool) {
    let provider = Arc::new(FakeProvider::default());
    let (user_id, token) = new_user(&pool, SubscriptionTier::Free).await;

    let story_id = generate_story(&pool, &provider, &token, false).await;

    let story = StoryRepo::find_by_id(&pool, user_id, story_id)
        .await
        .unwrap()
        .unwrap();
    assert!(!story.is_complete);
    assert_eq!(story.status(), StoryStatus::Paused);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_free_tier_quota_blocks_fourth_story(pool: PgPool) {
    let provider = Arc::new(FakeProvider::default());
    let (user_id, token) = new_user(&pool, SubscriptionTier::Free).await;

    for _ in 0..3 {
        generate_story(&pool, &provider, &token, true).await;
    }

    let response = post_json(
        app(&pool, &provider),
        ENGINE,
        &token,
        json!({ "operation": "generate", "prompt": "One more please" }),
    )
    .await;
    let code = expect_error(response, StatusCode::TOO_MANY_REQUESTS).await;
    assert_eq!(code, "QUOTA_EXCEEDED");

    // Rejected before the provider is called.
    assert_eq!(provider.completion_calls(), 3);
    assert_eq!(StoryRepo::count_by_user(&pool, user_id).await.unwrap(), 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_generates_cannot_pass_quota(pool: PgPool) {
    let provider = Arc::new(FakeProvider::default());
    let (user_id, token) = new_user(&pool, SubscriptionTier::Free).await;
    for _ in 0..2 {
        generate_story(&pool, &provider, &token, true).await;
    }

    // Both requests are in flight while the provider answers.
    provider.delay_completions(Duration::from_millis(200));
    let request = || {
        post_json(
            app(&pool, &provider),
            ENGINE,
            &token,
            json!({ "operation": "generate", "prompt": "Two at once" }),
        )
    };
    let (a, b) = tokio::join!(request(), request());
    let mut statuses = [a.status().as_u16(), b.status().as_u16()];
    statuses.sort_unstable();
    assert_eq!(statuses, [201, 429]);

    let profile = ProfileRepo::find_by_id(&pool, user_id).await.unwrap().unwrap();
    assert_eq!(profile.stories_this_month, 3);
    assert_eq!(StoryRepo::count_by_user(&pool, user_id).await.unwrap(), 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_provider_failure_gives_story_back(pool: PgPool) {
    let provider = Arc::new(FakeProvider::default());
    let (user_id, token) = new_user(&pool, SubscriptionTier::Free).await;

    provider.fail_completion(500);
    let response = post_json(
        app(&pool, &provider),
        ENGINE,
        &token,
        json!({ "operation": "generate", "prompt": "An owl who cannot sleep" }),
    )
    .await;
    let code = expect_error(response, StatusCode::BAD_GATEWAY).await;
    assert_eq!(code, "PROVIDER_ERROR");

    let profile = ProfileRepo::find_by_id(&pool, user_id).await.unwrap().unwrap();
    assert_eq!(profile.stories_this_month, 0);

    // The full allowance is still available.
    for _ in 0..3 {
        generate_story(&pool, &provider, &token, true).await;
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_images_require_paid_tier(pool: PgPool) {
    let provider = Arc::new(FakeProvider::default());
    let (user_id, token) = new_user(&pool, SubscriptionTier::Free).await;

    let response = post_json(
        app(&pool, &provider),
        ENGINE,
        &token,
        json!({ "operation": "generate", "generate_images": true }),
    )
    .await;
    let code = expect_error(response, StatusCode::FORBIDDEN).await;
    assert_eq!(code, "FORBIDDEN");
    assert_eq!(provider.completion_calls(), 0);
    assert_eq!(StoryRepo::count_by_user(&pool, user_id).await.unwrap(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_premium_generate_with_images(pool: PgPool) {
    let provider = Arc::new(FakeProvider::default());
    let (_, token) = new_user(&pool, SubscriptionTier::Premium).await;

    let response = post_json(
        app(&pool, &provider),
        ENGINE,
        &token,
        json!({ "operation": "generate", "length": "medium", "generate_images": true }),
    )
    .await;
    let data = expect_data(response, StatusCode::CREATED).await;

    let images = data["images"].as_array().unwrap();
    assert_eq!(images.len(), 2);
    assert_eq!(images[0]["section_index"], 0);
    assert_eq!(images[1]["section_index"], 1);
    assert_eq!(images[0]["image_url"], "https://images.example/0.png");
    assert!(data.get("image_error").is_none());
    assert_eq!(data["usage"]["stories_remaining"], 29);
    assert_eq!(provider.image_calls(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_image_failure_keeps_story(pool: PgPool) {
    let provider = Arc::new(FakeProvider::default());
    let (user_id, token) = new_user(&pool, SubscriptionTier::Premium).await;
    // Enough failures to exhaust every attempt on the first image.
    provider.fail_images(500, 3);

    let response = post_json(
        app(&pool, &provider),
        ENGINE,
        &token,
        json!({ "operation": "generate", "generate_images": true, "image_count": 2 }),
    )
    .await;
    let data = expect_data(response, StatusCode::CREATED).await;

    assert_eq!(data["images"], json!([]));
    assert!(data["image_error"].as_str().unwrap().contains("saved"));
    assert_eq!(provider.image_calls(), 3);

    let story_id = data["story"]["id"].as_i64().unwrap();
    assert!(StoryRepo::find_by_id(&pool, user_id, story_id)
        .await
        .unwrap()
        .is_some());
    assert_eq!(data["usage"]["stories_this_month"], 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_generate_uses_saved_characters(pool: PgPool) {
    let provider = Arc::new(FakeProvider::default());
    let (user_id, token) = new_user(&pool, SubscriptionTier::Free).await;
    let luna = CharacterRepo::create(
        &pool,
        user_id,
        &CreateCharacter {
            name: "Luna".to_string(),
            description: Some("A brave little girl".to_string()),
            age: Some(6),
            appearance: Some("curly red hair".to_string()),
            traits: vec!["curious".to_string()],
        },
    )
    .await
    .unwrap();

    let response = post_json(
        app(&pool, &provider),
        ENGINE,
        &token,
        json!({ "operation": "generate", "character_ids": [luna.id, luna.id] }),
    )
    .await;
    let data = expect_data(response, StatusCode::CREATED).await;

    assert!(provider.last_prompt().user.contains("Luna"));
    let characters = data["story"]["characters"].as_array().unwrap();
    assert_eq!(characters.len(), 1);
    assert_eq!(characters[0]["name"], "Luna");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_character_is_404_and_not_counted(pool: PgPool) {
    let provider = Arc::new(FakeProvider::default());
    let (_, token) = new_user(&pool, SubscriptionTier::Free).await;

    let response = post_json(
        app(&pool, &provider),
        ENGINE,
        &token,
        json!({ "operation": "generate", "character_ids": [999999] }),
    )
    .await;
    let code = expect_error(response, StatusCode::NOT_FOUND).await;
    assert_eq!(code, "NOT_FOUND");
    assert_eq!(provider.completion_calls(), 0);

    let data = expect_data(get(app(&pool, &provider), "/api/v1/user-data", &token).await, StatusCode::OK).await;
    assert_eq!(data["usage"]["stories_this_month"], 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_invalid_tone_is_rejected(pool: PgPool) {
    let provider = Arc::new(FakeProvider::default());
    let (_, token) = new_user(&pool, SubscriptionTier::Free).await;

    let response = post_json(
        app(&pool, &provider),
        ENGINE,
        &token,
        json!({ "operation": "generate", "tone": "terrifying" }),
    )
    .await;
    let code = expect_error(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(code, "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_image_count_out_of_range(pool: PgPool) {
    let provider = Arc::new(FakeProvider::default());
    let (_, token) = new_user(&pool, SubscriptionTier::Premium).await;

    let response = post_json(
        app(&pool, &provider),
        ENGINE,
        &token,
        json!({ "operation": "generate", "generate_images": true, "image_count": 9 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(provider.completion_calls(), 0);
}

// ---------------------------------------------------------------------------
// Request shape
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_operation_lists_valid_ones(pool: PgPool) {
    let provider = Arc::new(FakeProvider::default());
    let (_, token) = new_user(&pool, SubscriptionTier::Free).await;

    let response = post_json(
        app(&pool, &provider),
        ENGINE,
        &token,
        json!({ "operation": "summarize" }),
    )
    .await;
    let json = common::body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
    let message = json["error"].as_str().unwrap();
    assert!(message.contains("summarize"));
    assert!(message.contains("generate, continue, edit, coach, illustrate"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_missing_operation_is_400(pool: PgPool) {
    let provider = Arc::new(FakeProvider::default());
    let (_, token) = new_user(&pool, SubscriptionTier::Free).await;

    let response = post_json(app(&pool, &provider), ENGINE, &token, json!({ "prompt": "hi" })).await;
    let code = expect_error(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(code, "BAD_REQUEST");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_without_provider_is_503(pool: PgPool) {
    let (user_id, token) = new_user(&pool, SubscriptionTier::Free).await;

    let response = post_json(
        common::build_app(pool.clone(), None),
        ENGINE,
        &token,
        json!({ "operation": "generate" }),
    )
    .await;
    let code = expect_error(response, StatusCode::SERVICE_UNAVAILABLE).await;
    assert_eq!(code, "PROVIDER_UNAVAILABLE");
    assert_eq!(StoryRepo::count_by_user(&pool, user_id).await.unwrap(), 0);
}

// ---------------------------------------------------------------------------
// continue
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_continue_appends_then_finishes(pool: PgPool) {
    let provider = Arc::new(FakeProvider::default());
    let (_, token) = new_user(&pool, SubscriptionTier::Free).await;
    let story_id = generate_story(&pool, &provider, &token, false).await;

    provider.push_completion("The Sleepy Owl\nA breeze rustled the leaves.");
    let response = post_json(
        app(&pool, &provider),
        ENGINE,
        &token,
        json!({ "operation": "continue", "story_id": story_id, "direction": "add a breeze" }),
    )
    .await;
    let data = expect_data(response, StatusCode::OK).await;
    assert_eq!(data["operation"], "continue");
    let content = data["story"]["content"].as_str().unwrap();
    assert!(content.starts_with("Once upon a time"));
    assert!(content.ends_with("\n\nA breeze rustled the leaves."));
    assert_eq!(data["story"]["status"], "paused");
    assert_eq!(data["story"]["version"], 2);
    assert!(provider.last_prompt().user.contains("add a breeze"));

    provider.push_completion("And everyone slept soundly. The end.");
    let response = post_json(
        app(&pool, &provider),
        ENGINE,
        &token,
        json!({ "operation": "continue", "story_id": story_id, "finish": true }),
    )
    .await;
    let data = expect_data(response, StatusCode::OK).await;
    assert_eq!(data["story"]["status"], "complete");
    assert_eq!(data["story"]["is_complete"], true);
    assert_eq!(data["story"]["version"], 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_continue_complete_story_conflicts(pool: PgPool) {
    let provider = Arc::new(FakeProvider::default());
    let (_, token) = new_user(&pool, SubscriptionTier::Free).await;
    let story_id = generate_story(&pool, &provider, &token, true).await;

    let response = post_json(
        app(&pool, &provider),
        ENGINE,
        &token,
        json!({ "operation": "continue", "story_id": story_id }),
    )
    .await;
    let code = expect_error(response, StatusCode::CONFLICT).await;
    assert_eq!(code, "CONFLICT");
    assert_eq!(provider.completion_calls(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_continue_failure_restores_paused_status(pool: PgPool) {
    let provider = Arc::new(FakeProvider::default());
    let (user_id, token) = new_user(&pool, SubscriptionTier::Free).await;
    let story_id = generate_story(&pool, &provider, &token, false).await;

    provider.fail_completion(500);
    let response = post_json(
        app(&pool, &provider),
        ENGINE,
        &token,
        json!({ "operation": "continue", "story_id": story_id }),
    )
    .await;
    let code = expect_error(response, StatusCode::BAD_GATEWAY).await;
    assert_eq!(code, "PROVIDER_ERROR");

    let story = StoryRepo::find_by_id(&pool, user_id, story_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(story.status(), StoryStatus::Paused);
    assert_eq!(story.version, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_abandoned_continue_still_finishes(pool: PgPool) {
    let provider = Arc::new(FakeProvider::default());
    let (user_id, token) = new_user(&pool, SubscriptionTier::Free).await;
    let story_id = generate_story(&pool, &provider, &token, false).await;

    // The client gives up long before the provider answers.
    provider.delay_completions(Duration::from_millis(300));
    let request = post_json(
        app(&pool, &provider),
        ENGINE,
        &token,
        json!({ "operation": "continue", "story_id": story_id }),
    );
    assert!(tokio::time::timeout(Duration::from_millis(50), request)
        .await
        .is_err());

    let mut story = StoryRepo::find_by_id(&pool, user_id, story_id)
        .await
        .unwrap()
        .unwrap();
    for _ in 0..50 {
        if story.status() != StoryStatus::Generating && story.version == 2 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
        story = StoryRepo::find_by_id(&pool, user_id, story_id)
            .await
            .unwrap()
            .unwrap();
    }
    assert_eq!(story.status(), StoryStatus::Paused);
    assert_eq!(story.version, 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_continue_someone_elses_story_is_404(pool: PgPool) {
    let provider = Arc::new(FakeProvider::default());
    let (_, owner) = new_user(&pool, SubscriptionTier::Free).await;
    let (_, intruder) = new_user(&pool, SubscriptionTier::Free).await;
    let story_id = generate_story(&pool, &provider, &owner, false).await;

    let response = post_json(
        app(&pool, &provider),
        ENGINE,
        &intruder,
        json!({ "operation": "continue", "story_id": story_id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// edit
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_edit_with_content_replaces_text(pool: PgPool) {
    let provider = Arc::new(FakeProvider::default());
    let (_, token) = new_user(&pool, SubscriptionTier::Free).await;
    let story_id = generate_story(&pool, &provider, &token, true).await;

    let response = post_json(
        app(&pool, &provider),
        ENGINE,
        &token,
        json!({
            "operation": "edit",
            "story_id": story_id,
            "content": "  A shorter story.  ",
            "title": "The Short Owl"
        }),
    )
    .await;
    let data = expect_data(response, StatusCode::OK).await;

    assert_eq!(data["operation"], "edit");
    assert_eq!(data["story"]["content"], "A shorter story.");
    assert_eq!(data["story"]["title"], "The Short Owl");
    assert_eq!(data["story"]["status"], "complete");
    assert_eq!(data["story"]["version"], 2);
    // Direct edits never reach the model.
    assert_eq!(provider.completion_calls(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_edit_with_instruction_rewrites(pool: PgPool) {
    let provider = Arc::new(FakeProvider::default());
    let (_, token) = new_user(&pool, SubscriptionTier::Free).await;
    let story_id = generate_story(&pool, &provider, &token, true).await;

    provider.push_completion("Once upon a time, a little owl yawned.");
    let response = post_json(
        app(&pool, &provider),
        ENGINE,
        &token,
        json!({ "operation": "edit", "story_id": story_id, "instruction": "make it shorter" }),
    )
    .await;
    let data = expect_data(response, StatusCode::OK).await;

    assert_eq!(data["story"]["content"], "Once upon a time, a little owl yawned.");
    assert_eq!(data["story"]["title"], "The Sleepy Owl");
    assert!(provider.last_prompt().user.contains("make it shorter"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_edit_needs_exactly_one_source(pool: PgPool) {
    let provider = Arc::new(FakeProvider::default());
    let (_, token) = new_user(&pool, SubscriptionTier::Free).await;
    let story_id = generate_story(&pool, &provider, &token, true).await;

    let both = post_json(
        app(&pool, &provider),
        ENGINE,
        &token,
        json!({ "operation": "edit", "story_id": story_id, "content": "x", "instruction": "y" }),
    )
    .await;
    assert_eq!(both.status(), StatusCode::BAD_REQUEST);

    let neither = post_json(
        app(&pool, &provider),
        ENGINE,
        &token,
        json!({ "operation": "edit", "story_id": story_id }),
    )
    .await;
    assert_eq!(neither.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_edit_rejects_blank_title(pool: PgPool) {
    let provider = Arc::new(FakeProvider::default());
    let (user_id, token) = new_user(&pool, SubscriptionTier::Free).await;
    let story_id = generate_story(&pool, &provider, &token, true).await;

    let response = post_json(
        app(&pool, &provider),
        ENGINE,
        &token,
        json!({ "operation": "edit", "story_id": story_id, "content": "New text.", "title": "   " }),
    )
    .await;
    let code = expect_error(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(code, "VALIDATION_ERROR");

    let story = StoryRepo::find_by_id(&pool, user_id, story_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(story.title, "The Sleepy Owl");
    assert_eq!(story.version, 1);
}

// ---------------------------------------------------------------------------
// coach
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_coach_returns_suggestions_without_saving(pool: PgPool) {
    let provider = Arc::new(FakeProvider::default());
    let (user_id, token) = new_user(&pool, SubscriptionTier::Free).await;
    provider.push_completion("Some ideas:\n- Give the owl a friend\n- End with a lullaby");

    let response = post_json(
        app(&pool, &provider),
        ENGINE,
        &token,
        json!({ "operation": "coach", "prompt": "An owl story" }),
    )
    .await;
    let data = expect_data(response, StatusCode::OK).await;

    assert_eq!(data["operation"], "coach");
    assert_eq!(
        data["suggestions"],
        json!(["Give the owl a friend", "End with a lullaby"])
    );
    assert_eq!(StoryRepo::count_by_user(&pool, user_id).await.unwrap(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_coach_requires_prompt(pool: PgPool) {
    let provider = Arc::new(FakeProvider::default());
    let (_, token) = new_user(&pool, SubscriptionTier::Free).await;

    let response = post_json(
        app(&pool, &provider),
        ENGINE,
        &token,
        json!({ "operation": "coach", "prompt": "" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(provider.completion_calls(), 0);
}

// ---------------------------------------------------------------------------
// illustrate
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_illustrate_retries_transient_failures(pool: PgPool) {
    let provider = Arc::new(FakeProvider::default());
    let (user_id, token) = new_user(&pool, SubscriptionTier::Dreambook).await;
    let story_id = generate_story(&pool, &provider, &token, true).await;
    provider.fail_images(503, 2);

    let response = post_json(
        app(&pool, &provider),
        ENGINE,
        &token,
        json!({ "operation": "illustrate", "story_id": story_id, "count": 1, "style": "crayon" }),
    )
    .await;
    let data = expect_data(response, StatusCode::OK).await;

    assert_eq!(data["operation"], "illustrate");
    assert_eq!(data["story_id"], story_id);
    let images = data["images"].as_array().unwrap();
    assert_eq!(images.len(), 1);
    assert!(images[0]["prompt"].as_str().unwrap().starts_with("crayon"));
    assert_eq!(provider.image_calls(), 3);

    let stored = StoryImageRepo::list_by_story(&pool, user_id, story_id)
        .await
        .unwrap();
    assert_eq!(stored.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_illustrate_does_not_retry_client_errors(pool: PgPool) {
    let provider = Arc::new(FakeProvider::default());
    let (_, token) = new_user(&pool, SubscriptionTier::Premium).await;
    let story_id = generate_story(&pool, &provider, &token, true).await;
    provider.fail_images(400, 1);

    let response = post_json(
        app(&pool, &provider),
        ENGINE,
        &token,
        json!({ "operation": "illustrate", "story_id": story_id }),
    )
    .await;
    let code = expect_error(response, StatusCode::BAD_GATEWAY).await;
    assert_eq!(code, "PROVIDER_ERROR");
    assert_eq!(provider.image_calls(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_illustrate_on_free_tier_is_403(pool: PgPool) {
    let provider = Arc::new(FakeProvider::default());
    let (_, token) = new_user(&pool, SubscriptionTier::Free).await;
    let story_id = generate_story(&pool, &provider, &token, true).await;

    let response = post_json(
        app(&pool, &provider),
        ENGINE,
        &token,
        json!({ "operation": "illustrate", "story_id": story_id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(provider.image_calls(), 0);
}
