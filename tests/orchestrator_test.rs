mod support;

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use support::{Call, JobScript, SpyOperations, TEST_KEY, orchestrator};
use veo_story::prelude::*;
use veo_story::types::{GeneratedVideo, OperationResponse};

const URI: &str = "https://files.example/v1/files/abc:download?alt=media";

#[tokio::test(start_paused = true)]
async fn text_to_video_runs_one_cycle() {
    let spy = Arc::new(SpyOperations::new([JobScript::completes_after(
        "operations/t2v",
        0,
        URI,
    )]));

    let result = orchestrator(&spy)
        .generate(&GenerationRequest::text("a red fox in snow"))
        .await
        .unwrap();

    assert_eq!(
        spy.calls(),
        vec![
            Call::Submit,
            Call::Poll("operations/t2v".into()),
            Call::Download(format!("{URI}&key={TEST_KEY}")),
        ]
    );
    assert_eq!(result.source_uri, URI);
    assert_eq!(result.remote_video, VideoHandle::new(URI));
    assert!(result.local_handle().starts_with("asset://"));
    assert_eq!(
        result.asset.bytes,
        format!("video-bytes:{URI}&key={TEST_KEY}").into_bytes()
    );

    let submission = &spy.submissions()[0];
    assert_eq!(submission.prompt.as_deref(), Some("a red fox in snow"));
    assert!(submission.video.is_none());
    assert_eq!(submission.config.aspect_ratio, Some(AspectRatio::Landscape));
}

#[tokio::test(start_paused = true)]
async fn polls_every_ten_seconds_until_done() {
    let spy = Arc::new(SpyOperations::new([JobScript::completes_after(
        "operations/slow",
        3,
        URI,
    )]));

    orchestrator(&spy)
        .generate(&GenerationRequest::text("slow job"))
        .await
        .unwrap();

    assert_eq!(spy.poll_count(), 4);
    assert_eq!(spy.downloads().len(), 1);

    let submitted = spy.submit_times.lock().unwrap()[0];
    let polls = spy.poll_times.lock().unwrap().clone();
    let mut previous = submitted;
    for at in polls {
        assert_eq!(at - previous, Duration::from_secs(10));
        previous = at;
    }
}

#[tokio::test(start_paused = true)]
async fn percent_encoded_locator_is_decoded_before_fetch() {
    let encoded = "https%3A%2F%2Ffiles.example%2Fv1%2Ffiles%2Fabc%3Adownload%3Falt%3Dmedia";
    let spy = Arc::new(SpyOperations::new([JobScript::completes_after(
        "operations/enc",
        0,
        encoded,
    )]));

    let result = orchestrator(&spy)
        .generate(&GenerationRequest::text("x"))
        .await
        .unwrap();

    assert_eq!(result.source_uri, URI);
    assert_eq!(result.remote_video.uri, encoded);
    assert_eq!(spy.downloads(), vec![format!("{URI}&key={TEST_KEY}")]);
}

#[tokio::test(start_paused = true)]
async fn empty_asset_list_is_no_assets_produced() {
    let spy = Arc::new(SpyOperations::new([JobScript::finishes_with(
        "operations/empty",
        1,
        VideoOperation::completed("operations/empty", vec![]),
    )]));

    let err = orchestrator(&spy)
        .generate(&GenerationRequest::text("nothing"))
        .await
        .unwrap_err();

    assert!(matches!(err, VeoError::NoAssetsProduced));
    assert!(spy.downloads().is_empty());
}

#[tokio::test(start_paused = true)]
async fn descriptor_without_uri_is_missing_locator() {
    let terminal = VideoOperation {
        name: "operations/nouri".into(),
        done: true,
        response: Some(OperationResponse::with_videos(vec![GeneratedVideo::default()])),
        error: None,
    };
    let spy = Arc::new(SpyOperations::new([JobScript::finishes_with(
        "operations/nouri",
        0,
        terminal,
    )]));

    let err = orchestrator(&spy)
        .generate(&GenerationRequest::text("x"))
        .await
        .unwrap_err();

    assert!(matches!(err, VeoError::MissingAssetLocator));
    assert!(spy.downloads().is_empty());
}

#[tokio::test(start_paused = true)]
async fn finished_without_response_is_generation_failed() {
    let spy = Arc::new(SpyOperations::new([JobScript::finishes_with(
        "operations/bad",
        2,
        VideoOperation::failed("operations/bad", "safety filter triggered"),
    )]));

    let err = orchestrator(&spy)
        .generate(&GenerationRequest::text("x"))
        .await
        .unwrap_err();

    match err {
        VeoError::GenerationFailed(reason) => assert_eq!(reason, "safety filter triggered"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn extend_without_source_makes_no_remote_call() {
    let spy = Arc::new(SpyOperations::new([]));
    let request = GenerationRequest::new(GenerationMode::ExtendVideo).with_prompt("continue");

    let err = orchestrator(&spy).generate(&request).await.unwrap_err();

    assert!(matches!(err, VeoError::MissingExtensionSource));
    assert!(spy.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn extend_submits_source_handle_without_aspect_ratio() {
    let source = VideoHandle::new("https://files.example/v1/files/prev:download?alt=media");
    let spy = Arc::new(SpyOperations::new([JobScript::completes_after(
        "operations/ext",
        1,
        URI,
    )]));

    orchestrator(&spy)
        .generate(&GenerationRequest::extend(source.clone(), "the camera pulls back"))
        .await
        .unwrap();

    let submission = &spy.submissions()[0];
    assert_eq!(submission.video.as_ref(), Some(&source));
    assert_eq!(submission.config.aspect_ratio, None);
    assert_eq!(submission.model, ModelVariant::Veo31);
}

#[tokio::test(start_paused = true)]
async fn rejected_submission_is_surfaced() {
    let spy = Arc::new(SpyOperations::rejecting_submissions(429, "quota exceeded"));

    let err = orchestrator(&spy)
        .generate(&GenerationRequest::text("x"))
        .await
        .unwrap_err();

    assert!(matches!(err, VeoError::SubmissionRejected { status: 429, .. }));
    assert_eq!(spy.poll_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn failed_download_carries_status() {
    let spy = Arc::new(
        SpyOperations::new([JobScript::completes_after("operations/dl", 0, URI)])
            .with_download_failure(403),
    );

    let err = orchestrator(&spy)
        .generate(&GenerationRequest::text("x"))
        .await
        .unwrap_err();

    assert!(matches!(err, VeoError::AssetFetchFailed { status: 403 }));
    assert_eq!(err.status_code(), Some(403));
}

#[tokio::test(start_paused = true)]
async fn attempt_budget_stops_polling() {
    let spy = Arc::new(SpyOperations::new([JobScript::runs_forever("operations/stuck")]));
    let orch = orchestrator(&spy).with_poll_policy(PollPolicy::default().with_max_attempts(5));

    let err = orch.generate(&GenerationRequest::text("x")).await.unwrap_err();

    match err {
        VeoError::PollBudgetExhausted {
            operation,
            attempts,
        } => {
            assert_eq!(operation, "operations/stuck");
            assert_eq!(attempts, 5);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(spy.poll_count(), 5);
}

#[tokio::test(start_paused = true)]
async fn deadline_stops_polling() {
    let spy = Arc::new(SpyOperations::new([JobScript::runs_forever("operations/stuck")]));
    let orch = orchestrator(&spy)
        .with_poll_policy(PollPolicy::default().with_timeout(Duration::from_secs(35)));
    let started = Instant::now();

    let err = orch.generate(&GenerationRequest::text("x")).await.unwrap_err();

    assert!(matches!(err, VeoError::TimeoutError(_)));
    // Polls at 10, 20 and 30 seconds; the wait for the fourth is cut at 35.
    assert_eq!(spy.poll_count(), 3);
    assert_eq!(started.elapsed(), Duration::from_secs(35));
}

#[tokio::test(start_paused = true)]
async fn deadline_shorter_than_one_interval_is_not_overrun() {
    let spy = Arc::new(SpyOperations::new([JobScript::runs_forever("operations/stuck")]));
    let orch = orchestrator(&spy).with_poll_policy(
        PollPolicy::default()
            .with_interval(Duration::from_secs(60))
            .with_timeout(Duration::from_secs(61)),
    );
    let started = Instant::now();

    let err = orch.generate(&GenerationRequest::text("x")).await.unwrap_err();

    assert!(matches!(err, VeoError::TimeoutError(_)));
    assert!(started.elapsed() <= Duration::from_secs(61));
    assert_eq!(spy.poll_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn completion_after_the_deadline_is_not_fetched() {
    let spy = Arc::new(SpyOperations::new([JobScript::completes_after(
        "operations/late",
        3,
        URI,
    )]));
    let orch = orchestrator(&spy)
        .with_poll_policy(PollPolicy::default().with_timeout(Duration::from_secs(35)));

    let err = orch.generate(&GenerationRequest::text("x")).await.unwrap_err();

    assert!(matches!(err, VeoError::TimeoutError(_)));
    assert_eq!(spy.poll_count(), 3);
    assert!(spy.downloads().is_empty());
}

#[tokio::test(start_paused = true)]
async fn cancellation_stops_an_unbounded_poll_loop() {
    let spy = Arc::new(SpyOperations::new([JobScript::runs_forever("operations/orphan")]));
    let orch = orchestrator(&spy);
    let cancel = CancelHandle::new();

    let task = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            orch.generate_with_cancel(&GenerationRequest::text("x"), &cancel)
                .await
        })
    };

    tokio::time::sleep(Duration::from_secs(25)).await;
    cancel.cancel();
    let err = task.await.unwrap().unwrap_err();

    assert!(matches!(err, VeoError::Cancelled));
    let polls_at_cancel = spy.poll_count();
    assert_eq!(polls_at_cancel, 2);

    // The remote job was never told to stop; the orchestrator just stopped asking.
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(spy.poll_count(), polls_at_cancel);
    assert!(spy.downloads().is_empty());
}
