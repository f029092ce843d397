//! Look-ahead orchestrator behavior against scripted sources.

mod test_utils;

use panelcraft_cache::ImageState;
use panelcraft_core::{ContinuationContext, HorizonConfig, StoryBeat, StoryRequest};
use panelcraft_error::GenerationErrorKind;
use panelcraft_narrative::LookAheadOrchestrator;
use std::sync::Arc;
use std::time::Duration;
use test_utils::{
    GatedImages, Reply, ScriptedImages, ScriptedStories, orchestrator, part,
    part_with_depictions, settings, wait_until,
};
use tokio::sync::Notify;

fn captions(beats: &[StoryBeat]) -> Vec<String> {
    beats.iter().map(|b| b.caption.clone()).collect()
}

fn gated_orchestrator(
    stories: &Arc<ScriptedStories>,
    images: &Arc<GatedImages>,
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

#[tokio::test]
async fn test_first_advance_starts_story_from_premise() -> anyhow::Result<()> {
    let stories = ScriptedStories::new(vec![Reply::Part(part(
        Some("a foggy coast"),
        "o1",
        &["A", "B", "C"],
    ))]);
    let images = ScriptedImages::new();
    let orchestrator = orchestrator(&stories, &images, 0, 3);

    assert_eq!(orchestrator.cursor(), -1);
    let panel = orchestrator
        .advance(&settings(), "a lighthouse keeper")
        .await?;
    orchestrator.settle().await;

    assert_eq!(*panel.index(), 0);
    assert_eq!(panel.beat().caption, "A");
    assert_eq!(orchestrator.cursor(), 0);
    assert_eq!(orchestrator.foundation().as_deref(), Some("a foggy coast"));
    assert_eq!(
        stories.requests(),
        vec![StoryRequest::Start {
            premise: "a lighthouse keeper".to_string()
        }]
    );
    Ok(())
}

#[tokio::test]
async fn test_unchanged_caption_keeps_story() -> anyhow::Result<()> {
    let stories = ScriptedStories::new(vec![Reply::Part(part(
        Some("world"),
        "o1",
        &["A", "B", "C"],
    ))]);
    let images = ScriptedImages::new();
    let orchestrator = orchestrator(&stories, &images, 0, 3);

    orchestrator.advance(&settings(), "premise").await?;
    let panel = orchestrator.advance(&settings(), "A").await?;
    orchestrator.settle().await;

    assert_eq!(panel.beat().caption, "B");
    assert_eq!(captions(&orchestrator.beats()), vec!["A", "B", "C"]);
    assert_eq!(stories.call_count(), 1);
    Ok(())
}

#[tokio::test]
async fn test_edited_caption_branches_story() -> anyhow::Result<()> {
    let stories = ScriptedStories::new(vec![
        Reply::Part(part(Some("world"), "o1", &["A", "B", "C"])),
        Reply::Part(part(None, "o2", &["D"])),
    ]);
    let images = ScriptedImages::new();
    let orchestrator = orchestrator(&stories, &images, 0, 3);

    orchestrator.advance(&settings(), "premise").await?;
    orchestrator.advance(&settings(), "A").await?;
    let panel = orchestrator.advance(&settings(), "B edited").await?;
    orchestrator.settle().await;

    assert_eq!(*panel.index(), 2);
    assert_eq!(panel.beat().caption, "D");
    assert_eq!(captions(&orchestrator.beats()), vec!["A", "B edited", "D"]);
    assert_eq!(
        stories.requests()[1],
        StoryRequest::Continue(ContinuationContext::new("world", "o1", "A\nB edited"))
    );
    Ok(())
}

#[tokio::test]
async fn test_empty_result_rolls_back() -> anyhow::Result<()> {
    let stories = ScriptedStories::new(vec![Reply::Part(part(Some("world"), "o1", &[]))]);
    let images = ScriptedImages::new();
    let orchestrator = orchestrator(&stories, &images, 5, 3);

    let err = orchestrator
        .advance(&settings(), "premise")
        .await
        .expect_err("an empty story cannot be shown");

    assert_eq!(
        err.generation_kind(),
        Some(&GenerationErrorKind::EmptyGenerationResult)
    );
    assert_eq!(orchestrator.cursor(), -1);
    assert!(orchestrator.beats().is_empty());
    assert_eq!(orchestrator.foundation(), None);
    Ok(())
}

#[tokio::test]
async fn test_failed_fetch_rolls_back_and_restarts() -> anyhow::Result<()> {
    let stories = ScriptedStories::new(vec![
        Reply::Part(part(Some("world"), "o1", &["A"])),
        Reply::Fail("service down".to_string()),
        Reply::Part(part(Some("new world"), "o1", &["X"])),
    ]);
    let images = ScriptedImages::new();
    let orchestrator = orchestrator(&stories, &images, 0, 3);

    orchestrator.advance(&settings(), "premise").await?;
    let err = orchestrator
        .advance(&settings(), "A")
        .await
        .expect_err("no beat at cursor 1");

    assert!(matches!(
        err.generation_kind(),
        Some(GenerationErrorKind::UpstreamGenerationFailure { .. })
    ));
    assert_eq!(orchestrator.cursor(), -1);
    assert!(orchestrator.beats().is_empty());
    assert_eq!(orchestrator.foundation(), None);

    let panel = orchestrator.advance(&settings(), "new premise").await?;
    orchestrator.settle().await;
    assert_eq!(*panel.index(), 0);
    assert_eq!(panel.beat().caption, "X");
    assert_eq!(
        stories.requests()[2],
        StoryRequest::Start {
            premise: "new premise".to_string()
        }
    );
    Ok(())
}

#[tokio::test]
async fn test_continuation_waits_beyond_text_horizon() -> anyhow::Result<()> {
    let stories = ScriptedStories::new(vec![Reply::Part(part(
        Some("world"),
        "o1",
        &["A", "B", "C", "D", "E", "F"],
    ))]);
    let images = ScriptedImages::new();
    let orchestrator = orchestrator(&stories, &images, 5, 3);

    orchestrator.advance(&settings(), "premise").await?;
    orchestrator.settle().await;

    // Six beats remain past cursor 0
    assert_eq!(stories.call_count(), 1);
    assert_eq!(orchestrator.beats().len(), 6);
    Ok(())
}

#[tokio::test]
async fn test_continuation_fetched_within_text_horizon() -> anyhow::Result<()> {
    let stories = ScriptedStories::new(vec![
        Reply::Part(part(Some("world"), "o1", &["A", "B", "C", "D", "E"])),
        Reply::Part(part(None, "o2", &["F", "G"])),
    ]);
    let images = ScriptedImages::new();
    let orchestrator = orchestrator(&stories, &images, 5, 3);

    orchestrator.advance(&settings(), "premise").await?;
    orchestrator.settle().await;

    assert_eq!(stories.call_count(), 2);
    assert!(matches!(
        stories.requests()[1],
        StoryRequest::Continue(_)
    ));
    assert_eq!(
        captions(&orchestrator.beats()),
        vec!["A", "B", "C", "D", "E", "F", "G"]
    );
    assert_eq!(orchestrator.cursor(), 0);
    Ok(())
}

#[tokio::test]
async fn test_background_failure_is_not_surfaced() -> anyhow::Result<()> {
    let stories = ScriptedStories::new(vec![
        Reply::Part(part(Some("world"), "o1", &["A", "B"])),
        Reply::Fail("quota exceeded".to_string()),
    ]);
    let images = ScriptedImages::new();
    let orchestrator = orchestrator(&stories, &images, 5, 3);

    let panel = orchestrator.advance(&settings(), "premise").await?;
    orchestrator.settle().await;

    assert_eq!(panel.beat().caption, "A");
    assert_eq!(stories.call_count(), 2);
    assert_eq!(orchestrator.cursor(), 0);
    assert_eq!(captions(&orchestrator.beats()), vec!["A", "B"]);
    Ok(())
}

#[tokio::test]
async fn test_images_prefetched_within_window() -> anyhow::Result<()> {
    let stories = ScriptedStories::new(vec![Reply::Part(part_with_depictions(
        Some("world"),
        &[("A", "d0"), ("B", "d1"), ("C", "d2"), ("D", "d3")],
    ))]);
    let images = ScriptedImages::new();
    let orchestrator = orchestrator(&stories, &images, 0, 3);

    orchestrator.advance(&settings(), "premise").await?;
    orchestrator.settle().await;

    for depiction in ["d0", "d1", "d2"] {
        assert_eq!(images.count(depiction), 1);
        assert_eq!(
            orchestrator.image(depiction),
            Some(ImageState::Ready(format!("b64:{}", depiction)))
        );
    }
    assert_eq!(images.count("d3"), 0);
    assert_eq!(orchestrator.image("d3"), None);

    orchestrator.advance(&settings(), "A").await?;
    orchestrator.settle().await;

    assert_eq!(images.count("d3"), 1);
    assert_eq!(images.count("d0"), 1);
    assert_eq!(*orchestrator.image_summary().ready(), 4);
    Ok(())
}

#[tokio::test]
async fn test_image_style_prefixes_prompt() -> anyhow::Result<()> {
    let stories = ScriptedStories::new(vec![Reply::Part(part_with_depictions(
        Some("world"),
        &[("A", "a quiet pier")],
    ))]);
    let images = ScriptedImages::new();
    let orchestrator = orchestrator(&stories, &images, 0, 3);

    let styled = panelcraft_core::GenerationSettings::new(
        settings().text().clone(),
        settings().image().clone(),
        "Ink comic. ",
    );
    orchestrator.advance(&styled, "premise").await?;
    orchestrator.settle().await;

    assert_eq!(images.count("Ink comic. a quiet pier"), 1);
    // The cache is keyed by depiction, not by prompt
    assert_eq!(
        orchestrator.image("a quiet pier"),
        Some(ImageState::Ready("b64:Ink comic. a quiet pier".to_string()))
    );
    Ok(())
}

#[tokio::test]
async fn test_shared_depiction_fetched_once() -> anyhow::Result<()> {
    let stories = ScriptedStories::new(vec![Reply::Part(part_with_depictions(
        Some("world"),
        &[
            ("A", "a red boat at sunset"),
            ("B", "a red boat at sunset"),
            ("C", "a harbor"),
        ],
    ))]);
    let images = ScriptedImages::new();
    let orchestrator = orchestrator(&stories, &images, 0, 3);

    // Two prefetch passes overlap before either settles
    orchestrator.advance(&settings(), "premise").await?;
    orchestrator.advance(&settings(), "A").await?;
    orchestrator.settle().await;

    assert_eq!(images.count("a red boat at sunset"), 1);
    assert_eq!(images.count("a harbor"), 1);
    Ok(())
}

#[tokio::test]
async fn test_depiction_reused_across_branch() -> anyhow::Result<()> {
    let stories = ScriptedStories::new(vec![
        Reply::Part(part_with_depictions(
            Some("world"),
            &[("A", "d0"), ("B", "a red boat at sunset")],
        )),
        Reply::Part(part_with_depictions(None, &[("X", "a red boat at sunset")])),
    ]);
    let images = ScriptedImages::new();
    let orchestrator = orchestrator(&stories, &images, 0, 3);

    orchestrator.advance(&settings(), "premise").await?;
    orchestrator.settle().await;
    assert_eq!(
        orchestrator.image("a red boat at sunset"),
        Some(ImageState::Ready("b64:a red boat at sunset".to_string()))
    );

    let panel = orchestrator.advance(&settings(), "A edited").await?;
    orchestrator.settle().await;

    assert_eq!(panel.beat().caption, "X");
    assert_eq!(captions(&orchestrator.beats()), vec!["A edited", "X"]);
    assert_eq!(images.count("a red boat at sunset"), 1);
    assert_eq!(
        orchestrator.image(&panel.beat().depiction),
        Some(ImageState::Ready("b64:a red boat at sunset".to_string()))
    );
    Ok(())
}

#[tokio::test]
async fn test_stale_continuation_discarded_after_branch() -> anyhow::Result<()> {
    let gate = Arc::new(Notify::new());
    let stories = ScriptedStories::new(vec![
        Reply::Part(part(Some("world"), "o1", &["A", "B", "C"])),
        Reply::Gated(gate.clone(), part(None, "stale", &["X", "Y"])),
        Reply::Part(part(None, "o2", &["D"])),
    ]);
    let images = ScriptedImages::new();
    let orchestrator = orchestrator(&stories, &images, 5, 3);

    orchestrator.advance(&settings(), "premise").await?;
    stories.wait_for_calls(2).await;

    let branching = tokio::spawn({
        let orchestrator = orchestrator.clone();
        async move { orchestrator.advance(&settings(), "A edited").await }
    });
    wait_until(|| orchestrator.beats().len() == 1).await;
    gate.notify_one();

    let panel = branching.await??;
    orchestrator.settle().await;

    assert_eq!(panel.beat().caption, "D");
    let beats = captions(&orchestrator.beats());
    assert_eq!(&beats[..2], &["A edited", "D"]);
    assert!(!beats.iter().any(|c| c == "X" || c == "Y"));
    Ok(())
}

#[tokio::test]
async fn test_advance_waits_for_in_flight_continuation() -> anyhow::Result<()> {
    let gate = Arc::new(Notify::new());
    let stories = ScriptedStories::new(vec![
        Reply::Part(part(Some("world"), "o1", &["A"])),
        Reply::Gated(gate.clone(), part(None, "o2", &["B", "C"])),
    ]);
    let images = ScriptedImages::new();
    let orchestrator = orchestrator(&stories, &images, 5, 3);

    orchestrator.advance(&settings(), "premise").await?;
    stories.wait_for_calls(2).await;

    let advancing = tokio::spawn({
        let orchestrator = orchestrator.clone();
        async move { orchestrator.advance(&settings(), "A").await }
    });
    gate.notify_one();

    let panel = advancing.await??;
    orchestrator.settle().await;

    assert_eq!(*panel.index(), 1);
    assert_eq!(panel.beat().caption, "B");
    let continued_from_a = stories
        .requests()
        .iter()
        .filter(|r| matches!(r, StoryRequest::Continue(c) if c.recent_story() == "A"))
        .count();
    assert_eq!(continued_from_a, 1);
    Ok(())
}

#[tokio::test]
async fn test_retry_failed_image() -> anyhow::Result<()> {
    let stories = ScriptedStories::new(vec![Reply::Part(part_with_depictions(
        Some("world"),
        &[("A", "a storm")],
    ))]);
    let images = ScriptedImages::new();
    images.fail_next("a storm");
    let orchestrator = orchestrator(&stories, &images, 0, 3);

    orchestrator.advance(&settings(), "premise").await?;
    let state = orchestrator
        .wait_for_image("a storm", Duration::from_secs(2))
        .await;
    assert!(matches!(state, Some(ImageState::Failed(_))));
    orchestrator.settle().await;

    let retried = orchestrator.retry_image(&settings(), "a storm").await;
    assert_eq!(retried, Some(ImageState::Ready("b64:a storm".to_string())));
    assert_eq!(images.count("a storm"), 2);

    // Ready entries are not fetched again
    orchestrator.retry_image(&settings(), "a storm").await;
    assert_eq!(images.count("a storm"), 2);
    Ok(())
}

#[tokio::test]
async fn test_wait_for_unknown_image_times_out() -> anyhow::Result<()> {
    let stories = ScriptedStories::new(vec![]);
    let images = ScriptedImages::new();
    let orchestrator = orchestrator(&stories, &images, 0, 3);

    let state = orchestrator
        .wait_for_image("never requested", Duration::from_millis(50))
        .await;
    assert_eq!(state, None);
    Ok(())
}

#[tokio::test]
async fn test_reset_forgets_story_and_images() -> anyhow::Result<()> {
    let stories = ScriptedStories::new(vec![
        Reply::Part(part_with_depictions(Some("world"), &[("A", "d0")])),
        Reply::Part(part(Some("other"), "o1", &["Z"])),
    ]);
    let images = ScriptedImages::new();
    let orchestrator = orchestrator(&stories, &images, 0, 3);

    orchestrator.advance(&settings(), "premise").await?;
    orchestrator.settle().await;
    orchestrator.reset().await;

    assert_eq!(orchestrator.cursor(), -1);
    assert!(orchestrator.beats().is_empty());
    assert_eq!(orchestrator.foundation(), None);
    assert_eq!(orchestrator.image("d0"), None);

    let panel = orchestrator.advance(&settings(), "another premise").await?;
    assert_eq!(panel.beat().caption, "Z");
    Ok(())
}

#[tokio::test]
async fn test_slow_images_do_not_block_reading() -> anyhow::Result<()> {
    let stories = ScriptedStories::new(vec![
        Reply::Part(part(Some("world"), "o1", &["A"])),
        Reply::Part(part(None, "o2", &["B", "C"])),
        Reply::Part(part(None, "o3", &["D"])),
    ]);
    let images = GatedImages::new();
    let orchestrator = gated_orchestrator(&stories, &images, 1, 3);

    orchestrator.advance(&settings(), "premise").await?;
    wait_until(|| orchestrator.beats().len() == 3).await;
    orchestrator.advance(&settings(), "A").await?;
    orchestrator.advance(&settings(), "B").await?;

    let panel = tokio::time::timeout(
        Duration::from_secs(1),
        orchestrator.advance(&settings(), "C"),
    )
    .await
    .expect("advance must not wait on image fetches")?;

    assert_eq!(panel.beat().caption, "D");
    assert!(stories.call_count() >= 3);
    images.release();
    orchestrator.settle().await;
    Ok(())
}

#[tokio::test]
async fn test_images_in_flight_across_reset_are_dropped() -> anyhow::Result<()> {
    let stories = ScriptedStories::new(vec![Reply::Part(part_with_depictions(
        Some("world"),
        &[("A", "d0")],
    ))]);
    let images = GatedImages::new();
    let orchestrator = gated_orchestrator(&stories, &images, 0, 3);

    orchestrator.advance(&settings(), "premise").await?;
    wait_until(|| images.count("d0") == 1).await;
    assert_eq!(orchestrator.image("d0"), Some(ImageState::Pending));

    orchestrator.reset().await;
    images.release();
    orchestrator.settle().await;

    assert_eq!(orchestrator.image("d0"), None);
    assert_eq!(*orchestrator.image_summary().ready(), 0);
    Ok(())
}
