use crate::ai::{QuestionClient, QuestionSource};
use crate::config::GenerationConfig;
use crate::error::QuizError;
use crate::logger;
use crate::models::{GenerationMode, Question, QuestionType};
use crossbeam_channel::{Receiver, Sender, TryRecvError};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

/// Everything the worker needs, resolved on the UI thread before spawning.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub section: String,
    pub topic: String,
    pub topic_path: PathBuf,
    pub count: usize,
    pub mode: GenerationMode,
    pub question_type: QuestionType,
}

/// What the UI does with a finished run.
#[derive(Debug)]
pub enum GenerationOutcome {
    Ready(Vec<Question>),
    /// The run succeeded but produced nothing.
    Empty,
    Failed(QuizError),
}

impl From<Result<Vec<Question>, QuizError>> for GenerationOutcome {
    fn from(result: Result<Vec<Question>, QuizError>) -> Self {
        match result {
            Ok(questions) if questions.is_empty() => GenerationOutcome::Empty,
            Ok(questions) => GenerationOutcome::Ready(questions),
            Err(e) => GenerationOutcome::Failed(e),
        }
    }
}

/// Read the topic and generate questions according to the request's mode.
pub async fn run_generation<S: QuestionSource + ?Sized>(
    source: &S,
    request: &GenerationRequest,
    delay: Duration,
) -> Result<Vec<Question>, QuizError> {
    let context = std::fs::read_to_string(&request.topic_path)?;
    logger::log(&format!(
        "Generating {} question(s) for {} / {} ({}, {})",
        request.count, request.section, request.topic, request.mode, request.question_type
    ));

    match request.mode {
        GenerationMode::Batch => {
            source
                .generate_batch(&context, request.count, request.question_type.batch_label())
                .await
        }
        GenerationMode::Single => {
            let mut questions = Vec::new();
            for i in 0..request.count {
                if i > 0 && !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                let label = request.question_type.single_label(&mut rand::thread_rng());
                // A parse or transport failure aborts the whole run; only an empty answer is skipped.
                match source.generate_one(&context, label).await? {
                    Some(question) => questions.push(question),
                    None => logger::log(&format!("Request {} produced no question, skipping", i + 1)),
                }
            }
            Ok(questions)
        }
    }
}

/// One-shot mailbox for a generation run in flight.
#[derive(Debug)]
pub struct GenerationHandle {
    rx: Receiver<Result<Vec<Question>, QuizError>>,
}

impl GenerationHandle {
    /// Non-blocking check; `None` while the worker is still running.
    pub fn try_take(&self) -> Option<GenerationOutcome> {
        match self.rx.try_recv() {
            Ok(result) => Some(result.into()),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(GenerationOutcome::Failed(
                QuizError::Transport("generation worker stopped unexpectedly".into()),
            )),
        }
    }

    /// Blocking wait, for callers without a UI loop.
    pub fn wait(self, timeout: Duration) -> Option<GenerationOutcome> {
        self.rx.recv_timeout(timeout).ok().map(Into::into)
    }
}

/// Spawn a run on a dedicated thread with the real HTTP client.
pub fn spawn_generation(request: GenerationRequest, config: GenerationConfig) -> GenerationHandle {
    let delay = config.request_delay();
    spawn_with(request, delay, move || {
        QuestionClient::new(config).map(|c| Box::new(c) as Box<dyn QuestionSource>)
    })
}

/// Spawn a run against whatever source `make_source` builds on the worker thread.
pub fn spawn_with<F>(request: GenerationRequest, delay: Duration, make_source: F) -> GenerationHandle
where
    F: FnOnce() -> Result<Box<dyn QuestionSource>, QuizError> + Send + 'static,
{
    let (tx, rx) = crossbeam_channel::bounded(1);

    let spawned = thread::Builder::new()
        .name("topic-quiz::generation_worker".to_string())
        .spawn(move || deliver(&tx, work(request, delay, make_source)));

    if let Err(e) = spawned {
        logger::log(&format!("Failed to spawn generation worker: {}", e));
        // The receiver reports a disconnected mailbox as a failure.
    }

    GenerationHandle { rx }
}

fn work<F>(
    request: GenerationRequest,
    delay: Duration,
    make_source: F,
) -> Result<Vec<Question>, QuizError>
where
    F: FnOnce() -> Result<Box<dyn QuestionSource>, QuizError>,
{
    let source = make_source()?;
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    rt.block_on(run_generation(source.as_ref(), &request, delay))
}

fn deliver(
    tx: &Sender<Result<Vec<Question>, QuizError>>,
    result: Result<Vec<Question>, QuizError>,
) {
    match &result {
        Ok(questions) => logger::log(&format!(
            "Worker sending {} generated question(s)",
            questions.len()
        )),
        Err(e) => logger::log(&format!("Worker error: {}", e)),
    }
    if tx.send(result).is_err() {
        logger::log("Mailbox receiver dropped before delivery");
    }
}
