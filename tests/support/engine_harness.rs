#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use depthgate::clock::ManualClock;
use depthgate::error::OracleError;
use depthgate::gate::Classification;
use depthgate::observability::{Observer, ObserverEvent, ObserverMetric};
use depthgate::oracle::{OracleFuture, ScoringOracle};
use depthgate::scoring::Tier;
use depthgate::store::InMemoryContextStore;
use depthgate::{Config, EngagementEngine};

/// How a scripted oracle answers.
#[derive(Debug, Clone, Copy)]
pub enum Answer<T> {
    Value(T),
    Fail,
    Hang,
}

pub struct ScriptedOracle {
    score: Answer<f64>,
    classification: Answer<Classification>,
    pub score_calls: AtomicUsize,
    pub classify_calls: AtomicUsize,
}

impl ScriptedOracle {
    pub fn new(score: Answer<f64>, classification: Answer<Classification>) -> Arc<Self> {
        Arc::new(Self {
            score,
            classification,
            score_calls: AtomicUsize::new(0),
            classify_calls: AtomicUsize::new(0),
        })
    }

    pub fn score_calls(&self) -> usize {
        self.score_calls.load(Ordering::SeqCst)
    }

    pub fn classify_calls(&self) -> usize {
        self.classify_calls.load(Ordering::SeqCst)
    }
}

async fn answer<T: Copy>(answer: Answer<T>) -> Result<T, OracleError> {
    match answer {
        Answer::Value(value) => Ok(value),
        Answer::Fail => Err(OracleError::Request {
            oracle: "scripted".into(),
            message: "connection refused".into(),
        }),
        Answer::Hang => {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Err(OracleError::Request {
                oracle: "scripted".into(),
                message: "unreachable".into(),
            })
        }
    }
}

impl ScoringOracle for ScriptedOracle {
    fn name(&self) -> &str {
        "scripted"
    }

    fn score<'a>(&'a self, _text: &'a str, _tier: Tier) -> OracleFuture<'a, f64> {
        self.score_calls.fetch_add(1, Ordering::SeqCst);
        Box::pin(answer(self.score))
    }

    fn classify<'a>(
        &'a self,
        _text: &'a str,
        _history: &'a [String],
    ) -> OracleFuture<'a, Classification> {
        self.classify_calls.fetch_add(1, Ordering::SeqCst);
        Box::pin(answer(self.classification))
    }
}

/// Observer that keeps every event for assertions.
#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<ObserverEvent>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<ObserverEvent> {
        self.events
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    pub fn count(&self, pred: impl Fn(&ObserverEvent) -> bool) -> usize {
        self.events().iter().filter(|e| pred(e)).count()
    }
}

impl Observer for RecordingObserver {
    fn record_event(&self, event: &ObserverEvent) {
        self.events
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(event.clone());
    }

    fn record_metric(&self, _metric: &ObserverMetric) {}

    fn name(&self) -> &str {
        "recording"
    }
}

pub struct Harness {
    pub engine: Arc<EngagementEngine>,
    pub store: Arc<InMemoryContextStore>,
    pub clock: Arc<ManualClock>,
    pub observer: Arc<RecordingObserver>,
}

pub fn harness(config: Config, oracle: Option<Arc<ScriptedOracle>>) -> Harness {
    let clock = Arc::new(ManualClock::starting_now());
    let store = Arc::new(InMemoryContextStore::new(&config.store));
    let observer = Arc::new(RecordingObserver::default());
    let engine = EngagementEngine::new(
        config,
        store.clone(),
        oracle.map(|o| o as Arc<dyn ScoringOracle>),
        clock.clone(),
    )
    .with_observer(observer.clone());
    Harness {
        engine: Arc::new(engine),
        store,
        clock,
        observer,
    }
}

pub fn default_harness() -> Harness {
    harness(Config::default(), None)
}

/// Config with a short oracle budget so timeout paths finish quickly.
pub fn fast_oracle_config() -> Config {
    let mut config = Config::default();
    config.oracle.timeout_ms = 50;
    config
}

pub const GENUINE: &str =
    "Lately I have been thinking about moving back home because my mother is getting older";
pub const AMBIGUOUS: &str = "I feel sad about my job";
