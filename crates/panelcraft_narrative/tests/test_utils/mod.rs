//! Scripted generation backends for narrative tests.

#![allow(dead_code)]

use async_trait::async_trait;
use panelcraft_core::{
    GenerationSettings, HorizonConfig, ServiceSelection, StoryBeat, StoryPart, StoryRequest,
};
use panelcraft_error::{GenerationError, GenerationErrorKind, PanelcraftResult};
use panelcraft_interface::{ImageSource, StorySource, TextGenerator};
use panelcraft_narrative::LookAheadOrchestrator;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

/// One scripted answer to a story request.
pub enum Reply {
    Part(StoryPart),
    Fail(String),
    /// Held until the gate is notified
    Gated(Arc<Notify>, StoryPart),
}

/// Story source answering from a script, recording every request.
///
/// An exhausted script answers with an empty part.
pub struct ScriptedStories {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<StoryRequest>>,
}

impl ScriptedStories {
    pub fn new(replies: Vec<Reply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<StoryRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub async fn wait_for_calls(&self, count: usize) {
        wait_until(|| self.call_count() >= count).await;
    }
}

#[async_trait]
impl StorySource for ScriptedStories {
    async fn fetch_story(
        &self,
        _selection: &ServiceSelection,
        request: &StoryRequest,
    ) -> PanelcraftResult<StoryPart> {
        self.requests.lock().unwrap().push(request.clone());
        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(Reply::Part(part)) => Ok(part),
            Some(Reply::Fail(message)) => {
                Err(GenerationError::new(GenerationErrorKind::UpstreamGenerationFailure {
                    primary: message.clone(),
                    fallback: message,
                })
                .into())
            }
            Some(Reply::Gated(gate, part)) => {
                gate.notified().await;
                Ok(part)
            }
            None => Ok(StoryPart::default()),
        }
    }
}

/// Image source answering `b64:<prompt>`, counting requests per prompt.
pub struct ScriptedImages {
    counts: Mutex<HashMap<String, usize>>,
    fail_once: Mutex<HashSet<String>>,
}

impl ScriptedImages {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            counts: Mutex::new(HashMap::new()),
            fail_once: Mutex::new(HashSet::new()),
        })
    }

    /// The next request for `prompt` fails.
    pub fn fail_next(&self, prompt: &str) {
        self.fail_once.lock().unwrap().insert(prompt.to_string());
    }

    pub fn count(&self, prompt: &str) -> usize {
        self.counts.lock().unwrap().get(prompt).copied().unwrap_or(0)
    }
}

#[async_trait]
impl ImageSource for ScriptedImages {
    async fn fetch_image(
        &self,
        _selection: &ServiceSelection,
        prompt: &str,
    ) -> PanelcraftResult<String> {
        *self
            .counts
            .lock()
            .unwrap()
            .entry(prompt.to_string())
            .or_insert(0) += 1;
        if self.fail_once.lock().unwrap().remove(prompt) {
            return Err(GenerationError::new(GenerationErrorKind::ImageDeliveryFailure(
                "scripted failure".to_string(),
            ))
            .into());
        }
        Ok(format!("b64:{}", prompt))
    }
}

/// Image source that holds every fetch until `release` is called.
pub struct GatedImages {
    gate: Notify,
    open: Mutex<bool>,
    counts: Mutex<HashMap<String, usize>>,
}

impl GatedImages {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            gate: Notify::new(),
            open: Mutex::new(false),
            counts: Mutex::new(HashMap::new()),
        })
    }

    pub fn release(&self) {
        *self.open.lock().unwrap() = true;
        self.gate.notify_waiters();
    }

    pub fn count(&self, prompt: &str) -> usize {
        self.counts.lock().unwrap().get(prompt).copied().unwrap_or(0)
    }
}

#[async_trait]
impl ImageSource for GatedImages {
    async fn fetch_image(
        &self,
        _selection: &ServiceSelection,
        prompt: &str,
    ) -> PanelcraftResult<String> {
        *self
            .counts
            .lock()
            .unwrap()
            .entry(prompt.to_string())
            .or_insert(0) += 1;
        loop {
            let released = self.gate.notified();
            if *self.open.lock().unwrap() {
                break;
            }
            released.await;
        }
        Ok(format!("b64:{}", prompt))
    }
}

/// Text generator answering from a script, recording every prompt.
pub struct ScriptedGenerator {
    texts: Mutex<VecDeque<String>>,
    json: Mutex<VecDeque<String>>,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn new(texts: &[&str], json: &[&str]) -> Self {
        Self {
            texts: Mutex::new(texts.iter().map(|t| t.to_string()).collect()),
            json: Mutex::new(json.iter().map(|t| t.to_string()).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate_text(&self, prompt: &str) -> PanelcraftResult<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.texts.lock().unwrap().pop_front().unwrap_or_default())
    }

    async fn generate_json(
        &self,
        prompt: &str,
        _schema: &serde_json::Value,
    ) -> PanelcraftResult<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.json.lock().unwrap().pop_front().unwrap_or_default())
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }

    fn model_name(&self) -> &str {
        "scripted-1"
    }
}

/// Beats captioned `captions[i]` with depiction `scene of <caption>`.
pub fn part(foundation: Option<&str>, outline: &str, captions: &[&str]) -> StoryPart {
    StoryPart::new(
        foundation.map(str::to_string),
        outline,
        "prose",
        captions
            .iter()
            .map(|c| StoryBeat::new(*c, format!("scene of {}", c)))
            .collect(),
    )
}

/// Beats from explicit caption/depiction pairs.
pub fn part_with_depictions(foundation: Option<&str>, beats: &[(&str, &str)]) -> StoryPart {
    StoryPart::new(
        foundation.map(str::to_string),
        "outline",
        "prose",
        beats.iter().map(|(c, d)| StoryBeat::new(*c, *d)).collect(),
    )
}

/// Settings with an empty style, so image prompts equal depictions.
pub fn settings() -> GenerationSettings {
    GenerationSettings::new(
        ServiceSelection::new("Google AI Studio", "gemini-2.5-flash", "text-key"),
        ServiceSelection::new("TensorOpera", "Flux/Dev", "image-key"),
        "",
    )
}

pub fn orchestrator(
    stories: &Arc<ScriptedStories>,
    images: &Arc<ScriptedImages>,
    text_horizon: usize,
    image_horizon: usize,
) -> LookAheadOrchestrator {
    LookAheadOrchestrator::new(
        stories.clone(),
        images.clone(),
        HorizonConfig::default()
            .with_text_horizon(text_horizon)
            .with_image_horizon(image_horizon),
    )
}

/// Poll `condition` until it holds, failing the test after two seconds.
pub async fn wait_until(condition: impl Fn() -> bool) {
    for _ in 0..400 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not reached within two seconds");
}
