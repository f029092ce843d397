//! Look-ahead prefetch orchestration.
//!
//! The orchestrator owns the beat sequence, the reading cursor and the image
//! cache. Each `advance` moves the cursor one panel forward and, in the
//! background, asks for more story once few enough beats remain past the
//! cursor and for the images of the next few panels.
//!
//! Shared state sits behind a synchronous mutex that is never held across an
//! await. Fetchers never see that state; they receive a request and hand
//! back a result that is merged under the lock.

use crate::prompts::image_prompt;
use crate::story::StoryTimeline;
use derive_getters::Getters;
use futures::future::join_all;
use panelcraft_cache::{CacheSummary, ImageCache, ImageState};
use panelcraft_core::{GenerationSettings, HorizonConfig, StoryBeat, StoryPart};
use panelcraft_error::{GenerationError, GenerationErrorKind, PanelcraftResult};
use panelcraft_interface::{ImageSource, StorySource};
use std::ops::Range;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

/// The panel the reader is looking at after an advance.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct Panel {
    /// Cursor position
    index: usize,
    /// Caption and depiction
    beat: StoryBeat,
}

/// Beat indices whose images are prefetched for a cursor position.
///
/// # Examples
///
/// ```
/// use panelcraft_narrative::prefetch_window;
///
/// assert_eq!(prefetch_window(2, 4, 3), 2..4);
/// assert_eq!(prefetch_window(0, 10, 3), 0..3);
/// ```
pub fn prefetch_window(cursor: usize, len: usize, image_horizon: usize) -> Range<usize> {
    let end = len.min(cursor.saturating_add(image_horizon));
    cursor.min(end)..end
}

#[derive(Debug, Default)]
struct SharedState {
    timeline: StoryTimeline,
    /// -1 before the first panel
    cursor: isize,
    images: ImageCache,
    /// Bumped by every branch, rollback and reset
    epoch: u64,
    /// Bumped by reset only; the image cache survives branches
    resets: u64,
}

impl SharedState {
    fn fresh(epoch: u64, resets: u64) -> Self {
        Self {
            cursor: -1,
            epoch,
            resets,
            ..Self::default()
        }
    }

    fn current_index(&self) -> Option<usize> {
        usize::try_from(self.cursor).ok()
    }

    fn has_current_beat(&self) -> bool {
        self.current_index()
            .is_some_and(|i| self.timeline.get(i).is_some())
    }
}

struct Inner {
    stories: Arc<dyn StorySource>,
    images: Arc<dyn ImageSource>,
    horizons: HorizonConfig,
    state: Mutex<SharedState>,
    /// Held for the fetch-and-merge of one continuation, never for images
    continuation: tokio::sync::Mutex<()>,
    /// Serializes `advance` and `reset`
    turn: tokio::sync::Mutex<()>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
    revision: watch::Sender<u64>,
}

/// Decides when to fetch story text and images as the reader advances.
///
/// Cheap to clone; clones share the same story.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use panelcraft_core::{ComicConfig, GenerationSettings, ServiceSelection};
/// use panelcraft_narrative::{ContinuationFetcher, ImageFetcher, LookAheadOrchestrator};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ComicConfig::load()?;
/// let orchestrator = LookAheadOrchestrator::new(
///     Arc::new(ContinuationFetcher::from_config(&config)),
///     Arc::new(ImageFetcher::from_config(&config)),
///     *config.horizons(),
/// );
///
/// let settings = GenerationSettings::new(
///     ServiceSelection::new("Google AI Studio", "gemini-2.5-flash", "key"),
///     ServiceSelection::new("TensorOpera", "Flux/Dev", "key"),
///     "Watercolor comic panel. ",
/// );
/// let panel = orchestrator.advance(&settings, "a lighthouse keeper").await?;
/// println!("{}", panel.beat().caption);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct LookAheadOrchestrator {
    inner: Arc<Inner>,
}

impl LookAheadOrchestrator {
    /// Create an orchestrator with an empty story.
    pub fn new(
        stories: Arc<dyn StorySource>,
        images: Arc<dyn ImageSource>,
        horizons: HorizonConfig,
    ) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            inner: Arc::new(Inner {
                stories,
                images,
                horizons,
                state: Mutex::new(SharedState::fresh(0, 0)),
                continuation: tokio::sync::Mutex::new(()),
                turn: tokio::sync::Mutex::new(()),
                tasks: Mutex::new(Vec::new()),
                revision,
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, SharedState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn tasks(&self) -> MutexGuard<'_, Vec<JoinHandle<()>>> {
        self.inner
            .tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self) {
        self.inner.revision.send_modify(|revision| *revision += 1);
    }

    /// Move to the next panel.
    ///
    /// `edited_caption` is the caption currently shown for the cursor's
    /// panel, or the premise when no story exists yet. If it differs from the
    /// stored caption, every beat after the cursor is discarded and the story
    /// continues from the edit.
    ///
    /// # Errors
    ///
    /// When no beat exists at the new cursor even after a synchronous fetch,
    /// the story is rolled back to empty and the fetch error (or
    /// `EmptyGenerationResult`) is returned.
    #[instrument(skip(self, settings, edited_caption), fields(caption_len = edited_caption.len()))]
    pub async fn advance(
        &self,
        settings: &GenerationSettings,
        edited_caption: &str,
    ) -> PanelcraftResult<Panel> {
        let _turn = self.inner.turn.lock().await;

        let index = {
            let mut state = self.state();
            if let Some(current) = state.current_index() {
                let edited = state
                    .timeline
                    .get(current)
                    .is_some_and(|b| b.beat().caption != edited_caption);
                if edited {
                    let dropped = state.timeline.len().saturating_sub(current + 1);
                    state.timeline.truncate_after(current);
                    state.epoch += 1;
                    info!(index = current, dropped, "Caption edited, branching story");
                }
                state.timeline.set_caption(current, edited_caption);
            }
            state.cursor += 1;
            state.cursor as usize
        };

        if !self.state().has_current_beat() {
            debug!(index, "No beat at cursor, fetching synchronously");
            let fetched = self.fetch_blocking(settings, edited_caption).await;

            if !self.state().has_current_beat() {
                self.rollback();
                return Err(match fetched {
                    Err(e) => {
                        error!(error = %e, "Synchronous story fetch failed");
                        e
                    }
                    Ok(()) => GenerationError::new(GenerationErrorKind::EmptyGenerationResult).into(),
                });
            }
        }

        let panel = {
            let state = self.state();
            let beat = state
                .timeline
                .get(index)
                .map(|b| b.beat().clone())
                .ok_or_else(|| GenerationError::new(GenerationErrorKind::EmptyGenerationResult))?;
            Panel { index, beat }
        };
        self.notify();

        self.spawn_background(settings);
        Ok(panel)
    }

    /// Wait for any in-flight continuation, then fetch only if the cursor
    /// still has no beat.
    async fn fetch_blocking(
        &self,
        settings: &GenerationSettings,
        premise: &str,
    ) -> PanelcraftResult<()> {
        let _guard = self.inner.continuation.lock().await;

        let (request, epoch) = {
            let state = self.state();
            if state.has_current_beat() {
                debug!("In-flight continuation supplied the beat");
                return Ok(());
            }
            (state.timeline.next_request(premise), state.epoch)
        };

        let part = self
            .inner
            .stories
            .fetch_story(settings.text(), &request)
            .await?;
        self.merge(part, epoch);
        Ok(())
    }

    /// Append a fetched part unless the story branched since it was requested.
    fn merge(&self, part: StoryPart, epoch: u64) -> usize {
        let appended = {
            let mut state = self.state();
            if state.epoch != epoch {
                debug!(
                    requested_epoch = epoch,
                    current_epoch = state.epoch,
                    "Discarding stale continuation"
                );
                return 0;
            }
            state.timeline.append_part(part)
        };
        if appended > 0 {
            info!(appended, "Merged story part");
            self.notify();
        }
        appended
    }

    fn rollback(&self) {
        {
            let mut state = self.state();
            warn!(beats = state.timeline.len(), "Rolling story back to empty");
            state.timeline.clear();
            state.cursor = -1;
            state.epoch += 1;
        }
        self.notify();
    }

    fn spawn_background(&self, settings: &GenerationSettings) {
        let continuation = {
            let this = self.clone();
            let settings = settings.clone();
            tokio::spawn(async move {
                if let Err(e) = this.continue_in_background(&settings).await {
                    error!(error = %e, "Background continuation failed");
                }
            })
        };
        let images = {
            let this = self.clone();
            let settings = settings.clone();
            tokio::spawn(async move { this.prefetch_images(&settings).await })
        };

        let mut tasks = self.tasks();
        tasks.retain(|task| !task.is_finished());
        tasks.push(continuation);
        tasks.push(images);
    }

    async fn continue_in_background(&self, settings: &GenerationSettings) -> PanelcraftResult<()> {
        let Ok(guard) = self.inner.continuation.try_lock() else {
            debug!("Continuation already in flight");
            return Ok(());
        };

        let (request, epoch) = {
            let state = self.state();
            let Some(cursor) = state.current_index() else {
                return Ok(());
            };
            if state.timeline.is_empty() {
                return Ok(());
            }
            let remaining = state.timeline.len().saturating_sub(cursor);
            if remaining > *self.inner.horizons.text_horizon() {
                return Ok(());
            }
            debug!(remaining, "Requesting story continuation");
            (state.timeline.next_request(""), state.epoch)
        };

        let part = self
            .inner
            .stories
            .fetch_story(settings.text(), &request)
            .await?;

        let appended = self.merge(part, epoch);
        drop(guard);

        if appended > 0 {
            self.prefetch_images(settings).await;
        }
        Ok(())
    }

    /// Claim and fetch images for the panels in the prefetch window.
    async fn prefetch_images(&self, settings: &GenerationSettings) {
        let (claimed, resets) = {
            let mut guard = self.state();
            let state = &mut *guard;
            let Some(cursor) = state.current_index() else {
                return;
            };
            let window = prefetch_window(
                cursor,
                state.timeline.len(),
                *self.inner.horizons.image_horizon(),
            );
            let mut claimed = Vec::new();
            for index in window {
                if let Some(entry) = state.timeline.get(index)
                    && state.images.claim(&entry.beat().depiction)
                {
                    claimed.push(entry.beat().depiction.clone());
                }
            }
            (claimed, state.resets)
        };

        if claimed.is_empty() {
            return;
        }
        debug!(count = claimed.len(), "Prefetching images");
        self.notify();

        let fetches = claimed.iter().map(|depiction| {
            let prompt = image_prompt(settings.image_style(), depiction);
            async move {
                self.inner
                    .images
                    .fetch_image(settings.image(), &prompt)
                    .await
            }
        });
        let results = join_all(fetches).await;

        {
            let mut state = self.state();
            if state.resets != resets {
                debug!(count = claimed.len(), "Story reset during prefetch, dropping images");
                return;
            }
            for (depiction, result) in claimed.iter().zip(results) {
                record_image(&mut state.images, depiction, result);
            }
        }
        self.notify();
    }

    /// Refetch an image whose previous fetch failed.
    ///
    /// Returns the resulting state; entries that are not Failed are left
    /// alone and returned as they are.
    #[instrument(skip(self, settings))]
    pub async fn retry_image(
        &self,
        settings: &GenerationSettings,
        depiction: &str,
    ) -> Option<ImageState> {
        let resets = {
            let mut state = self.state();
            if !state.images.reclaim_failed(depiction) {
                return state.images.state(depiction).cloned();
            }
            state.resets
        };
        self.notify();

        let prompt = image_prompt(settings.image_style(), depiction);
        let result = self
            .inner
            .images
            .fetch_image(settings.image(), &prompt)
            .await;

        {
            let mut state = self.state();
            if state.resets != resets {
                debug!(depiction, "Story reset during retry, dropping image");
                return None;
            }
            record_image(&mut state.images, depiction, result);
        }
        self.notify();
        self.image(depiction)
    }

    /// Snapshot of every beat.
    pub fn beats(&self) -> Vec<StoryBeat> {
        self.state()
            .timeline
            .beats()
            .iter()
            .map(|b| b.beat().clone())
            .collect()
    }

    /// Cursor position, -1 before the first panel.
    pub fn cursor(&self) -> isize {
        self.state().cursor
    }

    /// Cached foundation of the current story.
    pub fn foundation(&self) -> Option<String> {
        self.state().timeline.foundation().map(str::to_string)
    }

    /// Image state for a depiction; None when never requested.
    pub fn image(&self, depiction: &str) -> Option<ImageState> {
        self.state().images.state(depiction).cloned()
    }

    /// Image cache counts per state.
    pub fn image_summary(&self) -> CacheSummary {
        self.state().images.summary()
    }

    /// Wait until a depiction's image settles or `timeout` elapses.
    ///
    /// Returns the last known state: Ready or Failed when settled, Pending
    /// or None on timeout.
    pub async fn wait_for_image(&self, depiction: &str, timeout: Duration) -> Option<ImageState> {
        let mut revisions = self.inner.revision.subscribe();
        let settled = async {
            loop {
                if let Some(state) = self.image(depiction).filter(ImageState::is_settled) {
                    return Some(state);
                }
                if revisions.changed().await.is_err() {
                    return self.image(depiction);
                }
            }
        };
        match tokio::time::timeout(timeout, settled).await {
            Ok(state) => state,
            Err(_) => self.image(depiction),
        }
    }

    /// Wait for every background task spawned so far.
    pub async fn settle(&self) {
        loop {
            let tasks = std::mem::take(&mut *self.tasks());
            if tasks.is_empty() {
                break;
            }
            for task in tasks {
                if let Err(e) = task.await {
                    error!(error = %e, "Background task panicked");
                }
            }
        }
    }

    /// Forget the story and every cached image.
    ///
    /// Background fetches still in flight are discarded when they finish.
    pub async fn reset(&self) {
        let _turn = self.inner.turn.lock().await;
        {
            let mut state = self.state();
            let (epoch, resets) = (state.epoch + 1, state.resets + 1);
            *state = SharedState::fresh(epoch, resets);
        }
        info!("Story reset");
        self.notify();
    }
}

fn record_image(cache: &mut ImageCache, depiction: &str, result: PanelcraftResult<String>) {
    match result {
        Ok(payload) if payload.is_empty() => cache.fail(depiction, "empty image payload"),
        Ok(payload) if payload.starts_with("http://") || payload.starts_with("https://") => {
            cache.fail(depiction, "image source returned a URL instead of image data")
        }
        Ok(payload) => cache.fulfil(depiction, payload),
        Err(e) => {
            error!(depiction, error = %e, "Image fetch failed");
            cache.fail(depiction, e.to_string());
        }
    }
}
