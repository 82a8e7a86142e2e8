//! Transformation gateway.
//!
//! [`Bridge`] owns the exclusion lock and the runtime state behind it. Every
//! call, including the first one that runs the initialization sequence, is
//! serialized on that lock; the runtime's own execution lock is taken by the
//! [`Transformer`] inside it:
//!
//! ```text
//!   transform(text)
//!     └─ exclusion lock (Mutex<RuntimeState>)
//!          ├─ ensure ready ── Loader::load (first success only)
//!          └─ Transformer::apply
//!               └─ runtime execution lock (GIL)
//! ```
//!
//! Both guards are scoped, so every early return releases them.

mod outcome;
mod stats;

pub use outcome::{FallbackReason, Outcome};
pub use stats::BridgeStats;

use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use stats::StatsCounters;
use tracing::{debug, info, warn};

use crate::escape::escape_basic;
use crate::observability;
use crate::runtime::{Loader, RuntimeState, Transformer};
use crate::types::{Config, Error, Result};

/// Thread-safe gateway to a lazily initialized runtime.
pub struct Bridge<L: Loader> {
    loader: L,
    config: Config,
    state: Mutex<RuntimeState>,
    stats: StatsCounters,
}

impl<L: Loader> Bridge<L> {
    pub fn new(loader: L, config: Config) -> Self {
        Self {
            loader,
            config,
            state: Mutex::new(RuntimeState::new()),
            stats: StatsCounters::default(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Transform `text`, or return it unchanged if the runtime cannot.
    ///
    /// Absent input returns absent output without taking any lock.
    pub fn transform(&self, text: Option<&str>) -> Option<String> {
        let text = text?;
        Some(self.run(text).into_text(text))
    }

    /// Host-side escaping. A passthrough returns `text` unchanged like
    /// [`Bridge::transform`]; only an empty runtime result falls back to
    /// [`escape_basic`]. Empty input never reaches the runtime.
    pub fn escape_markdown(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }

        match self.run(text) {
            Outcome::Transformed(result) if result.is_empty() => {
                warn!("markdownify returned empty result, using basic escaping");
                escape_basic(text)
            }
            outcome => outcome.into_text(text),
        }
    }

    /// Install the tracing subscriber described by this bridge's
    /// [`Config::observability`].
    pub fn init_tracing(&self) {
        observability::init_tracing(&self.config().observability);
    }

    /// Run the initialization sequence if it has not succeeded yet.
    pub fn ensure_ready(&self) -> bool {
        let mut state = self.lock_state();
        self.ready_transformer(&mut state).is_ok()
    }

    pub fn is_ready(&self) -> bool {
        self.lock_state().is_ready()
    }

    pub fn stats(&self) -> BridgeStats {
        self.stats.snapshot()
    }

    /// One gateway pass, without collapsing the outcome.
    pub fn run(&self, text: &str) -> Outcome {
        let mut state = self.lock_state();

        let transformer = match self.ready_transformer(&mut state) {
            Ok(transformer) => transformer,
            Err(err) => return self.passthrough(&err),
        };

        match transformer.apply(text, &self.config.call_options) {
            Ok(result) => {
                self.stats.record_transformed();
                Outcome::Transformed(result)
            }
            Err(err) => self.passthrough(&err),
        }
    }

    /// Record and log a call that returns its input unchanged.
    pub(crate) fn passthrough(&self, err: &Error) -> Outcome {
        let reason = FallbackReason::from(err);
        self.stats.record_passthrough();
        match reason {
            // Already logged by the failed initialization attempt.
            FallbackReason::Unavailable => debug!(error = %err, "runtime not ready, passing text through"),
            _ => warn!(error = %err, ?reason, "transformation failed, passing text through"),
        }
        Outcome::Passthrough(reason)
    }

    /// Fast path when ready; otherwise one full initialization attempt.
    /// Nothing from a failed attempt is kept, so the next call starts over.
    fn ready_transformer<'s>(&self, state: &'s mut RuntimeState) -> Result<&'s dyn Transformer> {
        if !state.is_ready() {
            self.stats.record_init_attempt();
            let transformer = self.loader.load(&self.config).map_err(|err| {
                warn!(error = %err, module = %self.config.module, "runtime initialization failed");
                err
            })?;
            info!(callable = %transformer.name(), "runtime initialized");
            state.install(transformer);
            self.stats.record_init_success();
        }

        state
            .transformer()
            .ok_or_else(|| Error::runtime_start("runtime state empty after initialization"))
    }

    /// The state is written once, at the ready transition, so a lock
    /// poisoned by a panicking caller still guards consistent data.
    fn lock_state(&self) -> MutexGuard<'_, RuntimeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<L: Loader> fmt::Debug for Bridge<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bridge")
            .field("module", &self.config.module)
            .field("callable", &self.config.callable)
            .field("stats", &self.stats.snapshot())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockLoader;
    use crate::types::CallOptions;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tracing_test::traced_test;

    /// Escapes markdown specials; raises on "boom"; returns "" for "empty".
    struct FakeMarkdownify;

    impl Transformer for FakeMarkdownify {
        fn apply(&self, text: &str, options: &CallOptions) -> Result<String> {
            assert_eq!(options, &CallOptions::default());
            match text {
                "boom" => Err(Error::invocation("ValueError: boom")),
                "empty" => Ok(String::new()),
                "number" => Err(Error::unexpected_type("'int' object is not a str")),
                _ => Ok(escape_basic(text)),
            }
        }

        fn name(&self) -> String {
            "fake.markdownify".to_string()
        }
    }

    /// Fails the first `failures` loads, then succeeds.
    struct FlakyLoader {
        failures: usize,
        calls: Arc<AtomicUsize>,
    }

    impl FlakyLoader {
        fn new(failures: usize) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            let loader = Self {
                failures,
                calls: Arc::clone(&calls),
            };
            (loader, calls)
        }
    }

    impl Loader for FlakyLoader {
        fn load(&self, _config: &Config) -> Result<Box<dyn Transformer>> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.failures {
                return Err(Error::module_import("No module named 'telegramify_markdown'"));
            }
            Ok(Box::new(FakeMarkdownify))
        }
    }

    fn healthy() -> (Bridge<FlakyLoader>, Arc<AtomicUsize>) {
        let (loader, calls) = FlakyLoader::new(0);
        (Bridge::new(loader, Config::default()), calls)
    }

    fn unavailable() -> (Bridge<FlakyLoader>, Arc<AtomicUsize>) {
        let (loader, calls) = FlakyLoader::new(usize::MAX);
        (Bridge::new(loader, Config::default()), calls)
    }

    #[test]
    fn test_absent_input_skips_everything() {
        let (bridge, calls) = healthy();
        assert_eq!(bridge.transform(None), None);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(bridge.stats(), BridgeStats::default());
    }

    #[test]
    fn test_bold_is_escaped_by_healthy_runtime() {
        let (bridge, _) = healthy();
        let out = bridge.transform(Some("**bold**")).unwrap();
        assert_ne!(out, "**bold**");
        assert_eq!(out, "\\*\\*bold\\*\\*");
    }

    #[test]
    fn test_bold_passes_through_unavailable_runtime() {
        let (bridge, _) = unavailable();
        assert_eq!(bridge.transform(Some("**bold**")).as_deref(), Some("**bold**"));
        assert!(!bridge.is_ready());
    }

    #[test]
    fn test_initializes_once_across_calls() {
        let (bridge, calls) = healthy();
        for _ in 0..5 {
            bridge.transform(Some("text"));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let stats = bridge.stats();
        assert_eq!(stats.init_attempts, 1);
        assert_eq!(stats.init_successes, 1);
        assert_eq!(stats.transformed, 5);
    }

    #[test]
    fn test_failed_init_retries_on_next_call() {
        let (loader, calls) = FlakyLoader::new(2);
        let bridge = Bridge::new(loader, Config::default());

        assert_eq!(bridge.transform(Some("a_b")).as_deref(), Some("a_b"));
        assert_eq!(bridge.transform(Some("a_b")).as_deref(), Some("a_b"));
        assert_eq!(bridge.transform(Some("a_b")).as_deref(), Some("a\\_b"));
        assert_eq!(bridge.transform(Some("a_b")).as_deref(), Some("a\\_b"));

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        let stats = bridge.stats();
        assert_eq!(stats.init_attempts, 3);
        assert_eq!(stats.init_successes, 1);
        assert_eq!(stats.passthrough, 2);
        assert_eq!(stats.transformed, 2);
    }

    #[test]
    fn test_raising_callable_returns_input_and_releases_lock() {
        let (bridge, _) = healthy();
        assert_eq!(bridge.transform(Some("boom")).as_deref(), Some("boom"));
        // A held lock would deadlock here.
        assert_eq!(bridge.transform(Some("ok!")).as_deref(), Some("ok\\!"));
        assert!(bridge.is_ready());
    }

    #[test]
    fn test_non_string_result_returns_input() {
        let (bridge, _) = healthy();
        assert_eq!(
            bridge.run("number"),
            Outcome::Passthrough(FallbackReason::Invocation)
        );
        assert!(bridge.is_ready());
    }

    #[test]
    fn test_no_double_escaping_through_bridge() {
        let (bridge, _) = healthy();
        let once = bridge.transform(Some("plain words")).unwrap();
        let twice = bridge.transform(Some(&once)).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_ensure_ready_reports_state() {
        let (bridge, _) = unavailable();
        assert!(!bridge.ensure_ready());

        let (bridge, calls) = healthy();
        assert!(bridge.ensure_ready());
        assert!(bridge.ensure_ready());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_loader_receives_config_once() {
        let mut loader = MockLoader::new();
        loader
            .expect_load()
            .withf(|config| config.module == "telegramify_markdown")
            .times(1)
            .returning(|_| Ok(Box::new(FakeMarkdownify)));

        let bridge = Bridge::new(loader, Config::default());
        bridge.transform(Some("x"));
        bridge.transform(Some("y"));
    }

    #[test]
    fn test_escape_markdown_uses_runtime_result() {
        let (bridge, _) = healthy();
        assert_eq!(bridge.escape_markdown("1.5"), "1\\.5");
    }

    #[test]
    fn test_escape_markdown_empty_input_skips_runtime() {
        let (bridge, calls) = healthy();
        assert_eq!(bridge.escape_markdown(""), "");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[traced_test]
    #[test]
    fn test_escape_markdown_returns_input_when_unavailable() {
        let (bridge, _) = unavailable();
        assert_eq!(bridge.escape_markdown("Hello_world!"), "Hello_world!");
        assert!(logs_contain("runtime initialization failed"));
        assert!(!logs_contain("using basic escaping"));
    }

    #[test]
    fn test_escape_markdown_returns_input_when_callable_raises() {
        let (bridge, _) = healthy();
        assert_eq!(bridge.escape_markdown("boom"), "boom");
    }

    #[traced_test]
    #[test]
    fn test_escape_markdown_falls_back_on_empty_result() {
        let (bridge, _) = healthy();
        assert_eq!(bridge.escape_markdown("empty"), "empty");
        assert!(logs_contain("returned empty result"));
    }

    #[traced_test]
    #[test]
    fn test_invocation_failure_is_logged() {
        let (bridge, _) = healthy();
        bridge.transform(Some("boom"));
        assert!(logs_contain("ValueError: boom"));
    }

    #[test]
    fn test_poisoned_lock_is_recovered() {
        let (bridge, _) = healthy();
        let bridge = Arc::new(bridge);

        let poisoner = Arc::clone(&bridge);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.state.lock();
            panic!("poison the exclusion lock");
        })
        .join();

        assert!(bridge.state.is_poisoned());
        assert_eq!(bridge.transform(Some("a.b")).as_deref(), Some("a\\.b"));
    }
}
