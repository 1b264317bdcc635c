//! Scripted `VideoOperations` spy shared by the orchestrator tests.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::time::Instant;
use veo_story::prelude::*;
use veo_story::types::GeneratedVideo;

pub const TEST_KEY: &str = "test-key";

/// How one submitted job behaves.
#[derive(Debug, Clone)]
pub struct JobScript {
    pub accepted: VideoOperation,
    /// Responses returned by successive polls; the last one repeats.
    pub polls: VecDeque<VideoOperation>,
}

impl JobScript {
    /// `running` not-done polls, then a done poll with one video at `uri`.
    pub fn completes_after(name: &str, running: usize, uri: &str) -> Self {
        Self::finishes_with(
            name,
            running,
            VideoOperation::completed(name, vec![GeneratedVideo::new(VideoHandle::new(uri))]),
        )
    }

    pub fn finishes_with(name: &str, running: usize, terminal: VideoOperation) -> Self {
        let mut polls: VecDeque<VideoOperation> =
            (0..running).map(|_| VideoOperation::pending(name)).collect();
        polls.push_back(terminal);
        Self {
            accepted: VideoOperation::pending(name),
            polls,
        }
    }

    /// Never finishes.
    pub fn runs_forever(name: &str) -> Self {
        Self {
            accepted: VideoOperation::pending(name),
            polls: VecDeque::from([VideoOperation::pending(name)]),
        }
    }
}

/// Everything the spy saw, in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Submit,
    Poll(String),
    Download(String),
}

#[derive(Default)]
pub struct SpyOperations {
    scripts: Mutex<VecDeque<JobScript>>,
    active: Mutex<VecDeque<VideoOperation>>,
    pub submissions: Mutex<Vec<JobSubmission>>,
    pub poll_times: Mutex<Vec<Instant>>,
    pub submit_times: Mutex<Vec<Instant>>,
    pub calls: Mutex<Vec<Call>>,
    submit_failure: Option<(u16, String)>,
    download_failure: Option<u16>,
}

impl SpyOperations {
    pub fn new(scripts: impl IntoIterator<Item = JobScript>) -> Self {
        Self {
            scripts: Mutex::new(scripts.into_iter().collect()),
            ..Default::default()
        }
    }

    pub fn rejecting_submissions(status: u16, message: &str) -> Self {
        Self {
            submit_failure: Some((status, message.to_string())),
            ..Default::default()
        }
    }

    pub fn with_download_failure(mut self, status: u16) -> Self {
        self.download_failure = Some(status);
        self
    }

    pub fn submissions(&self) -> Vec<JobSubmission> {
        self.submissions.lock().unwrap().clone()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn poll_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Poll(_)))
            .count()
    }

    pub fn downloads(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Download(url) => Some(url),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl VideoOperations for SpyOperations {
    async fn submit(&self, submission: &JobSubmission) -> Result<VideoOperation, VeoError> {
        self.calls.lock().unwrap().push(Call::Submit);
        self.submissions.lock().unwrap().push(submission.clone());
        self.submit_times.lock().unwrap().push(Instant::now());

        if let Some((status, message)) = &self.submit_failure {
            return Err(VeoError::SubmissionRejected {
                status: *status,
                message: message.clone(),
            });
        }

        let script = self
            .scripts
            .lock()
            .unwrap()
            .pop_front()
            .expect("no job script left for submission");
        *self.active.lock().unwrap() = script.polls;
        Ok(script.accepted)
    }

    async fn poll(&self, operation: &VideoOperation) -> Result<VideoOperation, VeoError> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Poll(operation.name.clone()));
        self.poll_times.lock().unwrap().push(Instant::now());

        let mut active = self.active.lock().unwrap();
        let next = if active.len() > 1 {
            active.pop_front()
        } else {
            active.front().cloned()
        };
        Ok(next.unwrap_or_else(|| operation.clone()))
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, VeoError> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Download(url.to_string()));
        if let Some(status) = self.download_failure {
            return Err(VeoError::AssetFetchFailed { status });
        }
        Ok(format!("video-bytes:{url}").into_bytes())
    }
}

pub fn orchestrator(spy: &Arc<SpyOperations>) -> VideoOrchestrator {
    VideoOrchestrator::new(spy.clone(), Arc::new(StaticCredential::new(TEST_KEY)))
}
