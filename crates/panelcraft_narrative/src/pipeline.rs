//! Multi-stage story generation on top of a single text generator.

use crate::extraction::parse_beats;
use crate::prompts::{
    beat_extraction_prompt, foundation_prompt, outline_continuation_prompt,
    outline_start_prompt, story_continuation_prompt, story_start_prompt,
};
use crate::schema::{beats_schema, story_part_schema};
use crate::seeds::Seeds;
use panelcraft_core::{ContinuationContext, StoryBeat, StoryPart, StoryRequest};
use panelcraft_error::PanelcraftResult;
use panelcraft_interface::TextGenerator;
use tracing::{debug, instrument};

/// Number of ideas and names drawn for a new story.
pub const SEED_COUNT: usize = 10;

/// Runs the start and continuation stages against one generator.
///
/// - Start: foundation, opening outline, opening prose, beat extraction
/// - Continue: next outline, next prose, beat extraction
pub struct StoryPipeline<'a> {
    generator: &'a dyn TextGenerator,
}

impl<'a> StoryPipeline<'a> {
    /// Create a pipeline over a generator.
    pub fn new(generator: &'a dyn TextGenerator) -> Self {
        Self { generator }
    }

    /// Run the stages matching the request, drawing fresh seeds for a start.
    pub async fn run(&self, request: &StoryRequest) -> PanelcraftResult<StoryPart> {
        match request {
            StoryRequest::Start { premise } => {
                let seeds = Seeds::sample(&mut rand::thread_rng(), SEED_COUNT);
                self.start(premise, &seeds).await
            }
            StoryRequest::Continue(context) => self.continue_story(context).await,
        }
    }

    /// Bootstrap a story from a premise.
    #[instrument(
        skip(self, premise, seeds),
        fields(provider = self.generator.provider_name(), model = self.generator.model_name())
    )]
    pub async fn start(&self, premise: &str, seeds: &Seeds) -> PanelcraftResult<StoryPart> {
        let foundation = self
            .generator
            .generate_text(&foundation_prompt(premise, &seeds.ideas, &seeds.names))
            .await?;
        debug!(len = foundation.len(), "Foundation written");

        let outline = self
            .generator
            .generate_text(&outline_start_prompt(premise, &foundation))
            .await?;
        let narrative = self
            .generator
            .generate_text(&story_start_prompt(&outline, &foundation))
            .await?;
        let beats = self.extract_beats("", &narrative, &foundation).await?;

        Ok(StoryPart::new(Some(foundation), outline, narrative, beats))
    }

    /// Write the next part of a story in progress.
    #[instrument(
        skip(self, context),
        fields(provider = self.generator.provider_name(), model = self.generator.model_name())
    )]
    pub async fn continue_story(
        &self,
        context: &ContinuationContext,
    ) -> PanelcraftResult<StoryPart> {
        let outline = self
            .generator
            .generate_text(&outline_continuation_prompt(context))
            .await?;
        let narrative = self
            .generator
            .generate_text(&story_continuation_prompt(context, &outline))
            .await?;
        let beats = self
            .extract_beats(context.history(), &narrative, context.foundation())
            .await?;

        Ok(StoryPart::new(None, outline, narrative, beats))
    }

    /// Produce a whole story part from one JSON-mode call.
    #[instrument(skip(self, prompt), fields(model = self.generator.model_name()))]
    pub async fn single_shot(&self, prompt: &str) -> PanelcraftResult<StoryPart> {
        let raw = self
            .generator
            .generate_json(prompt, &story_part_schema())
            .await?;
        let json = crate::extraction::extract_json(&raw)?;
        crate::extraction::parse_json(&json)
    }

    async fn extract_beats(
        &self,
        history: &str,
        narrative: &str,
        foundation: &str,
    ) -> PanelcraftResult<Vec<StoryBeat>> {
        let raw = self
            .generator
            .generate_json(
                &beat_extraction_prompt(history, narrative, foundation),
                &beats_schema(),
            )
            .await?;
        let beats = parse_beats(&raw)?;
        debug!(count = beats.len(), "Beats extracted");
        Ok(beats)
    }
}
