//! The five story engine operations.

use dreamtales_ai::StoryProvider;
use dreamtales_core::error::CoreError;
use dreamtales_core::illustration::resolve_image_count;
use dreamtales_core::parsing::{clean_passage, parse_story_completion, parse_suggestions};
use dreamtales_core::prompt::{
    build_coach_prompt, build_continuation_prompt, build_edit_prompt, build_story_prompt,
    CharacterBrief, PlaceBrief, StoryBrief,
};
use dreamtales_core::status::StoryStatus;
use dreamtales_core::story::normalize_tone;
use dreamtales_core::types::{DbId, UserId};
use dreamtales_db::models::profile::UsageSummary;
use dreamtales_db::models::story::{CreateStory, Story, UpdateStoryContent};
use dreamtales_db::models::story_engine::{
    CoachRequest, CoachResult, ContinueStoryRequest, EditStoryRequest, GenerateStoryRequest,
    GeneratedStory, IllustrateRequest, IllustrationResult, StoryResult,
};
use dreamtales_db::repositories::{CharacterRepo, PlaceRepo, StoryRepo};

use crate::engine::illustration::illustrate_story;
use crate::engine::quota;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Shown to the client when a story was saved but its pictures were not.
const IMAGE_FAILURE_MESSAGE: &str =
    "Your story was saved, but some illustrations could not be generated. Try illustrating it again later.";

// ---------------------------------------------------------------------------
// generate
// ---------------------------------------------------------------------------

/// Write a new story, store it, and count it against the caller's quota.
///
/// The quota slot is claimed before the provider call and handed back if no
/// story gets stored.
pub async fn generate(
    state: &AppState,
    user: &AuthUser,
    req: GenerateStoryRequest,
) -> AppResult<GeneratedStory> {
    let tone = req.tone.as_deref().map(normalize_tone).transpose()?;
    let provider = state.provider()?;

    let profile = quota::ensure_profile(state, user).await?;
    let image_count = if req.generate_images {
        quota::require_media(&profile, "Illustration")?;
        Some(resolve_image_count(req.image_count, req.length)?)
    } else {
        None
    };
    let image_style = req.image_style.clone();

    let profile = quota::reserve_story(state, user, &profile).await?;
    let story = match write_story(state, provider, user, req, tone).await {
        Ok(story) => story,
        Err(e) => {
            quota::release_story(state, user).await;
            return Err(e);
        }
    };
    let status = story.status();

    tracing::info!(
        user_id = %user.user_id,
        story_id = story.id,
        length = story.length.as_str(),
        status = %status,
        stories_this_month = profile.stories_this_month,
        "Story generated"
    );

    let (images, image_error) = match image_count {
        Some(count) => {
            let outcome = illustrate_story(
                state,
                provider,
                user.user_id,
                &story,
                count,
                image_style.as_deref(),
            )
            .await?;
            let error = outcome.failure.map(|_| IMAGE_FAILURE_MESSAGE.to_string());
            (outcome.images, error)
        }
        None => (Vec::new(), None),
    };

    Ok(GeneratedStory {
        story,
        images,
        image_error,
        usage: UsageSummary::for_profile(&profile, chrono::Utc::now()),
    })
}

/// Build the prompt, run the completion and insert the new story row.
async fn write_story(
    state: &AppState,
    provider: &dyn StoryProvider,
    user: &AuthUser,
    req: GenerateStoryRequest,
    tone: Option<String>,
) -> AppResult<Story> {
    let characters = load_characters(state, user.user_id, &req.character_ids).await?;
    let places = load_places(state, user.user_id, &req.place_ids).await?;

    let brief = StoryBrief {
        prompt: req.prompt.clone(),
        story_type: req.story_type,
        length: req.length,
        tone: tone.clone(),
        setting: req.setting.clone(),
        themes: req.themes.clone(),
        characters,
        places,
        complete: req.complete,
    };
    let prompt = build_story_prompt(&brief);
    let completion = provider
        .complete(&prompt, state.config.generation.temperature)
        .await?;
    if completion.was_truncated() {
        tracing::warn!(user_id = %user.user_id, "Story completion hit the token limit");
    }
    let parsed = parse_story_completion(&completion.text);

    let status = if req.complete {
        StoryStatus::Complete
    } else {
        StoryStatus::Paused
    };
    Ok(StoryRepo::create(
        &state.pool,
        user.user_id,
        &CreateStory {
            title: parsed.title,
            content: parsed.content,
            prompt: req.prompt,
            story_type: req.story_type,
            length: req.length,
            tone,
            setting: req.setting,
            characters: brief.characters,
            themes: req.themes,
            is_complete: req.complete,
            status,
        },
    )
    .await?)
}

// ---------------------------------------------------------------------------
// continue
// ---------------------------------------------------------------------------

/// Append the next part of a paused story, or its ending when `finish` is set.
pub async fn continue_story(
    state: &AppState,
    user: &AuthUser,
    req: ContinueStoryRequest,
) -> AppResult<StoryResult> {
    let provider = state.provider()?;
    let story = load_story(state, user.user_id, req.story_id).await?;
    if story.is_complete {
        return Err(CoreError::Conflict(format!(
            "Story {} is already complete and cannot be continued",
            story.id
        ))
        .into());
    }

    StoryRepo::set_status(&state.pool, user.user_id, story.id, StoryStatus::Generating).await?;

    let updated = match append_passage(state, provider, user, &story, &req).await {
        Ok(updated) => updated,
        Err(e) => {
            if let Err(db_err) =
                StoryRepo::set_status(&state.pool, user.user_id, story.id, StoryStatus::Paused)
                    .await
            {
                tracing::error!(story_id = story.id, error = %db_err, "Failed to restore story status");
            }
            return Err(e);
        }
    };

    tracing::info!(
        user_id = %user.user_id,
        story_id = updated.id,
        version = updated.version,
        finished = req.finish,
        "Story continued"
    );
    Ok(StoryResult { story: updated })
}

/// Generate the next passage and store it, bumping the version.
async fn append_passage(
    state: &AppState,
    provider: &dyn StoryProvider,
    user: &AuthUser,
    story: &Story,
    req: &ContinueStoryRequest,
) -> AppResult<Story> {
    let prompt = build_continuation_prompt(
        &story.title,
        &story.content,
        story.length(),
        req.direction.as_deref(),
        req.finish,
    );
    let completion = provider
        .complete(&prompt, state.config.generation.temperature)
        .await?;

    let passage = clean_passage(&completion.text, &story.title);
    let content = if story.content.trim().is_empty() {
        passage
    } else {
        format!("{}\n\n{passage}", story.content.trim_end())
    };
    let status = if req.finish {
        StoryStatus::Complete
    } else {
        StoryStatus::Paused
    };

    StoryRepo::update_content(
        &state.pool,
        user.user_id,
        story.id,
        &UpdateStoryContent {
            title: None,
            content,
            is_complete: req.finish,
            status,
        },
    )
    .await?
    .ok_or(story_not_found(story.id))
}

// ---------------------------------------------------------------------------
// edit
// ---------------------------------------------------------------------------

/// Replace a story's text, either verbatim or through a model rewrite.
pub async fn edit(state: &AppState, user: &AuthUser, req: EditStoryRequest) -> AppResult<StoryResult> {
    let story = load_story(state, user.user_id, req.story_id).await?;
    let title = match req.title.as_deref().map(str::trim) {
        Some("") => return Err(CoreError::Validation("Title must not be empty".into()).into()),
        title => title.map(str::to_string),
    };

    let content = match (req.content, req.instruction.as_deref()) {
        (Some(content), None) => content.trim().to_string(),
        (None, Some(instruction)) => {
            let provider = state.provider()?;
            let prompt = build_edit_prompt(&story.title, &story.content, instruction, story.length());
            let completion = provider
                .complete(&prompt, state.config.generation.temperature)
                .await?;
            clean_passage(&completion.text, &story.title)
        }
        _ => {
            return Err(CoreError::Validation(
                "Provide either 'content' or 'instruction', not both".into(),
            )
            .into())
        }
    };
    if content.is_empty() {
        return Err(CoreError::Validation("Story content must not be empty".into()).into());
    }

    let updated = StoryRepo::update_content(
        &state.pool,
        user.user_id,
        story.id,
        &UpdateStoryContent {
            title,
            content,
            is_complete: story.is_complete,
            status: story.status(),
        },
    )
    .await?
    .ok_or(story_not_found(story.id))?;

    tracing::info!(
        user_id = %user.user_id,
        story_id = updated.id,
        version = updated.version,
        rewritten = req.instruction.is_some(),
        "Story edited"
    );
    Ok(StoryResult { story: updated })
}

// ---------------------------------------------------------------------------
// coach
// ---------------------------------------------------------------------------

/// Suggest improvements to a story idea. Nothing is stored or counted.
pub async fn coach(state: &AppState, user: &AuthUser, req: CoachRequest) -> AppResult<CoachResult> {
    let provider = state.provider()?;
    let excerpt = match req.story_id {
        Some(id) => Some(load_story(state, user.user_id, id).await?.content),
        None => None,
    };

    let prompt = build_coach_prompt(&req.prompt, excerpt.as_deref());
    let completion = provider
        .complete(&prompt, state.config.generation.temperature)
        .await?;

    let suggestions = parse_suggestions(&completion.text);
    tracing::debug!(user_id = %user.user_id, count = suggestions.len(), "Coaching suggestions");
    Ok(CoachResult { suggestions })
}

// ---------------------------------------------------------------------------
// illustrate
// ---------------------------------------------------------------------------

/// Generate illustrations for an existing story. Paid tiers only.
pub async fn illustrate(
    state: &AppState,
    user: &AuthUser,
    req: IllustrateRequest,
) -> AppResult<IllustrationResult> {
    let provider = state.provider()?;
    let profile = quota::ensure_profile(state, user).await?;
    quota::require_media(&profile, "Illustration")?;

    let story = load_story(state, user.user_id, req.story_id).await?;
    let count = resolve_image_count(req.count, story.length())?;

    let outcome = illustrate_story(
        state,
        provider,
        user.user_id,
        &story,
        count,
        req.style.as_deref(),
    )
    .await?;
    if let Some(e) = outcome.failure {
        return Err(AppError::Provider(e));
    }

    Ok(IllustrationResult {
        story_id: story.id,
        images: outcome.images,
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn story_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Story", id })
}

/// Load a story owned by `user_id`; anyone else's story is a 404.
pub async fn load_story(state: &AppState, user_id: UserId, id: DbId) -> AppResult<Story> {
    StoryRepo::find_by_id(&state.pool, user_id, id)
        .await?
        .ok_or(story_not_found(id))
}

/// Drop repeated ids, keeping first occurrences in order.
fn unique_ids(ids: &[DbId]) -> Vec<DbId> {
    let mut unique = Vec::with_capacity(ids.len());
    for id in ids {
        if !unique.contains(id) {
            unique.push(*id);
        }
    }
    unique
}

/// The first requested id that is not among `found`.
fn first_missing(requested: &[DbId], found: &[DbId]) -> Option<DbId> {
    requested.iter().copied().find(|id| !found.contains(id))
}

async fn load_characters(
    state: &AppState,
    user_id: UserId,
    ids: &[DbId],
) -> AppResult<Vec<CharacterBrief>> {
    let ids = unique_ids(ids);
    let characters = CharacterRepo::find_by_ids(&state.pool, user_id, &ids).await?;
    let found: Vec<DbId> = characters.iter().map(|c| c.id).collect();
    if let Some(id) = first_missing(&ids, &found) {
        return Err(CoreError::NotFound {
            entity: "Character",
            id,
        }
        .into());
    }
    Ok(characters.iter().map(CharacterBrief::from).collect())
}

async fn load_places(
    state: &AppState,
    user_id: UserId,
    ids: &[DbId],
) -> AppResult<Vec<PlaceBrief>> {
    let ids = unique_ids(ids);
    let places = PlaceRepo::find_by_ids(&state.pool, user_id, &ids).await?;
    let found: Vec<DbId> = places.iter().map(|p| p.id).collect();
    if let Some(id) = first_missing(&ids, &found) {
        return Err(CoreError::NotFound { entity: "Place", id }.into());
    }
    Ok(places.iter().map(PlaceBrief::from).collect())
}
