//! Illustration pipeline: plan sections, then generate and store one image
//! per section, sequentially.

use std::future::Future;

use dreamtales_ai::{GeneratedImage, ProviderError, StoryProvider};
use dreamtales_core::illustration::{plan_illustrations, IllustrationPlan};
use dreamtales_core::types::UserId;
use dreamtales_db::models::story::Story;
use dreamtales_db::models::story_image::{CreateStoryImage, StoryImage};
use dreamtales_db::repositories::StoryImageRepo;

use crate::config::GenerationConfig;
use crate::error::AppResult;
use crate::state::AppState;

/// Images stored so far, and the provider error that stopped the run, if any.
#[derive(Debug)]
pub struct IllustrationOutcome<T = StoryImage> {
    pub images: Vec<T>,
    pub failure: Option<ProviderError>,
}

/// Generate `count` illustrations for `story` and store each one.
///
/// The first image that still fails after its retries ends the run. Rows
/// already inserted stay. Database errors propagate.
pub async fn illustrate_story(
    state: &AppState,
    provider: &dyn StoryProvider,
    user_id: UserId,
    story: &Story,
    count: u32,
    style: Option<&str>,
) -> AppResult<IllustrationOutcome> {
    let characters = story.character_briefs();
    let plans = plan_illustrations(&story.title, &story.content, &characters, count, style);
    let story_id = story.id;

    let outcome = generate_in_sequence(
        provider,
        &state.config.generation,
        &plans,
        move |section_index, prompt, generated| async move {
            let image = StoryImageRepo::create(
                &state.pool,
                user_id,
                &CreateStoryImage {
                    story_id,
                    image_url: generated.url,
                    image_data: generated.b64_json,
                    section_index,
                    prompt,
                },
            )
            .await?;
            Ok(image)
        },
    )
    .await?;

    match &outcome.failure {
        Some(e) => tracing::warn!(
            story_id,
            stored = outcome.images.len(),
            error = %e,
            "Illustration stopped"
        ),
        None => tracing::info!(story_id, count = outcome.images.len(), "Story illustrated"),
    }
    Ok(outcome)
}

/// Request one image per plan, in order, handing each success to `store`.
///
/// Each request runs inside the configured retry policy. Consecutive
/// requests are spaced by the configured delay; the first is sent at once.
async fn generate_in_sequence<T, F, Fut>(
    provider: &dyn StoryProvider,
    generation: &GenerationConfig,
    plans: &[IllustrationPlan],
    mut store: F,
) -> AppResult<IllustrationOutcome<T>>
where
    F: FnMut(i32, String, GeneratedImage) -> Fut,
    Fut: Future<Output = AppResult<T>>,
{
    let mut images = Vec::with_capacity(plans.len());
    for (i, plan) in plans.iter().enumerate() {
        if i > 0 && !generation.image_request_delay.is_zero() {
            tokio::time::sleep(generation.image_request_delay).await;
        }

        let prompt = plan.prompt.as_str();
        let generated = match generation
            .image_retry
            .run("story_image", move || provider.generate_image(prompt))
            .await
        {
            Ok(image) => image,
            Err(e) => {
                tracing::debug!(section_index = plan.section_index, "Image request gave up");
                return Ok(IllustrationOutcome {
                    images,
                    failure: Some(e),
                });
            }
        };

        images.push(store(plan.section_index, plan.prompt.clone(), generated).await?);
    }

    Ok(IllustrationOutcome {
        images,
        failure: None,
    })
}
