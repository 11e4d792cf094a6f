//! End-to-end tests of the gate driving real runs on paused Tokio time.

#[cfg(test)]
mod tests {
    use crate::config::{DurationPolicy, JitterRange, PlaybackConfig};
    use crate::core::{RunSummary, SequencerState};
    use crate::events::CollectingEventSink;
    use crate::gate::{ActivationGate, MockCompletionHandler};
    use crate::stages::{badge_forge, zk_computation, Stage, StageTable};
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Arc, OnceLock, Weak};
    use std::time::Duration;
    use tokio::sync::mpsc;
    use tokio::time::Instant;

    fn two_stage_table() -> StageTable {
        StageTable::new(vec![
            Stage::new("A", ["a1", "a2"]),
            Stage::new("B", ["b1"]),
        ])
        .unwrap()
    }

    /// One line per second, no jitter.
    fn second_per_line() -> PlaybackConfig {
        PlaybackConfig::new()
            .with_duration(DurationPolicy::FixedPerLine { line_ms: 1000 })
            .with_jitter(None)
            .with_seed(1)
    }

    fn counting_gate(
        table: StageTable,
        config: PlaybackConfig,
    ) -> (ActivationGate, Arc<CollectingEventSink>, Arc<AtomicUsize>) {
        let sink = Arc::new(CollectingEventSink::new());
        let completions = Arc::new(AtomicUsize::new(0));
        let counter = completions.clone();
        let gate = ActivationGate::new(table, config)
            .unwrap()
            .with_sink(sink.clone())
            .on_complete(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        (gate, sink, completions)
    }

    async fn wait_for_lines(gate: &ActivationGate, count: usize) {
        for _ in 0..10_000 {
            if gate.snapshot().emitted_lines.len() >= count {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("timed out waiting for {count} lines");
    }

    async fn wait_for_complete(gate: &ActivationGate) {
        for _ in 0..10_000 {
            if gate.snapshot().is_complete {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("timed out waiting for the last line");
    }

    fn event_types(sink: &CollectingEventSink) -> Vec<String> {
        sink.events().into_iter().map(|(event_type, _)| event_type).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_two_stage_run_emits_in_order_and_completes_once() {
        let mut handler = MockCompletionHandler::new();
        handler
            .expect_on_complete()
            .withf(|summary: &RunSummary| summary.lines_emitted == 3 && summary.stages == 2)
            .times(1)
            .return_const(());

        let sink = Arc::new(CollectingEventSink::new());
        let gate = ActivationGate::new(two_stage_table(), second_per_line())
            .unwrap()
            .with_sink(sink.clone())
            .with_completion_handler(Arc::new(handler));

        gate.set_active(true);
        tokio::time::sleep(Duration::from_secs(30)).await;

        let snapshot = gate.snapshot();
        assert_eq!(snapshot.emitted_lines, vec!["a1", "a2", "b1"]);
        assert_eq!(snapshot.state, SequencerState::Complete);
        assert!(snapshot.is_complete);
        assert!((snapshot.progress - 100.0).abs() < 1e-9);
        assert_eq!(sink.emitted_texts(), vec!["a1", "a2", "b1"]);
        assert_eq!(sink.events_of_type("playback.completed").len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_completion_never_precedes_last_line() {
        let sink = Arc::new(CollectingEventSink::new());
        let saw_all_lines = Arc::new(AtomicBool::new(false));
        let (tx, mut rx) = mpsc::unbounded_channel();

        let observer = sink.clone();
        let flag = saw_all_lines.clone();
        let gate = ActivationGate::new(two_stage_table(), second_per_line())
            .unwrap()
            .with_sink(sink.clone())
            .on_complete(move |summary| {
                flag.store(observer.emitted_texts().len() == 3, Ordering::SeqCst);
                let _ = tx.send(summary.clone());
            });

        let started = Instant::now();
        gate.activate();
        let summary = rx.recv().await.unwrap();

        assert!(saw_all_lines.load(Ordering::SeqCst));
        assert_eq!(summary.lines_emitted, 3);
        // 3 lines + one 500 ms pause + 2 s terminal delay.
        assert!(started.elapsed() >= Duration::from_millis(5500));
        assert!(started.elapsed() < Duration::from_millis(5600));
    }

    #[tokio::test(start_paused = true)]
    async fn test_deactivate_after_first_line_stops_emission() {
        let (gate, sink, completions) = counting_gate(two_stage_table(), second_per_line());

        gate.set_active(true);
        wait_for_lines(&gate, 1).await;
        assert_eq!(gate.snapshot().emitted_lines, vec!["a1"]);

        gate.set_active(false);
        let events_at_cancel = sink.len();
        tokio::time::sleep(Duration::from_secs(60)).await;

        assert!(!gate.is_active());
        assert_eq!(gate.snapshot().emitted_lines, Vec::<String>::new());
        assert_eq!(gate.snapshot().state, SequencerState::Idle);
        assert_eq!(sink.len(), events_at_cancel);
        assert_eq!(sink.emitted_texts(), vec!["a1"]);
        assert_eq!(sink.events_of_type("playback.cancelled").len(), 1);
        assert_eq!(completions.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reactivation_starts_fresh() {
        let (gate, _sink, completions) = counting_gate(two_stage_table(), second_per_line());

        gate.activate();
        let first_run = gate.run_id();
        wait_for_lines(&gate, 2).await;

        gate.deactivate();
        gate.activate();
        let snapshot = gate.snapshot();
        assert!(snapshot.emitted_lines.is_empty());
        assert_eq!(snapshot.state, SequencerState::RunningStage(0));
        assert!(snapshot.progress.abs() < f64::EPSILON);
        assert_ne!(gate.run_id(), first_run);

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(gate.snapshot().emitted_lines, vec!["a1", "a2", "b1"]);
        assert_eq!(completions.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_progress_monotonic_over_run() {
        let (gate, _sink, completions) =
            counting_gate(zk_computation(), PlaybackConfig::zk_computation().with_seed(8));

        gate.activate();
        let mut readings = vec![gate.progress()];
        while completions.load(Ordering::SeqCst) == 0 {
            tokio::time::sleep(Duration::from_millis(50)).await;
            readings.push(gate.progress());
        }

        assert!(readings[0].abs() < f64::EPSILON);
        assert!(readings.windows(2).all(|w| w[1] >= w[0]));
        assert!((readings.last().copied().unwrap() - 100.0).abs() < 1e-9);
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeated_inputs_are_noops() {
        let (gate, sink, _) = counting_gate(two_stage_table(), second_per_line());

        gate.set_active(false);
        gate.set_active(true);
        let run_id = gate.run_id();
        gate.set_active(true);
        assert_eq!(gate.run_id(), run_id);
        assert_eq!(sink.events_of_type("playback.started").len(), 1);

        gate.set_active(false);
        gate.set_active(false);
        assert_eq!(sink.events_of_type("playback.cancelled").len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_gate_cancels_run() {
        let (gate, sink, completions) = counting_gate(two_stage_table(), second_per_line());

        gate.activate();
        wait_for_lines(&gate, 1).await;
        drop(gate);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(sink.emitted_texts(), vec!["a1"]);
        assert_eq!(completions.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismiss_after_completion() {
        let (gate, sink, completions) = counting_gate(two_stage_table(), second_per_line());

        gate.activate();
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(completions.load(Ordering::SeqCst), 1);

        gate.dismiss();
        assert!(!gate.is_active());
        assert_eq!(gate.snapshot(), crate::core::PlaybackSnapshot::inactive());
        assert_eq!(sink.events_of_type("playback.dismissed").len(), 1);
        assert!(sink.events_of_type("playback.cancelled").is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_zk_run_with_randomized_budget() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sink = Arc::new(CollectingEventSink::new());
        let gate = ActivationGate::new(zk_computation(), PlaybackConfig::new().with_seed(2024))
            .unwrap()
            .with_sink(sink.clone())
            .on_complete(move |summary| {
                let _ = tx.send(summary.clone());
            });

        let started = Instant::now();
        gate.activate();
        let summary = rx.recv().await.unwrap();

        assert!((30_000..=50_000).contains(&summary.budget_ms));
        assert_eq!(summary.lines_emitted, 40);
        assert_eq!(sink.emitted_texts(), zk_computation().all_lines());
        assert_eq!(sink.events_of_type("stage.started").len(), 4);
        assert_eq!(sink.events_of_type("stage.completed").len(), 4);
        // Jitter keeps every line within [0.5, 1.5) of its share.
        assert!(started.elapsed() >= Duration::from_secs(15));
        assert!(started.elapsed() <= Duration::from_secs(80));
    }

    #[tokio::test(start_paused = true)]
    async fn test_badge_forge_preset_timing() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let gate = ActivationGate::new(badge_forge(), PlaybackConfig::badge_forge())
            .unwrap()
            .on_complete(move |summary| {
                let _ = tx.send(summary.clone());
            });

        let started = Instant::now();
        gate.activate();
        let summary = rx.recv().await.unwrap();

        assert_eq!(summary.lines_emitted, 8);
        assert!(started.elapsed() >= Duration::from_millis(3200));
        assert!(started.elapsed() < Duration::from_millis(3300));
        assert_eq!(gate.snapshot().emitted_lines, badge_forge().all_lines());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = PlaybackConfig::new().with_duration(DurationPolicy::FixedPerLine { line_ms: 0 });
        assert!(ActivationGate::new(two_stage_table(), config).is_err());
    }

    #[test]
    fn test_inactive_gate_snapshot() {
        let gate = ActivationGate::new(two_stage_table(), second_per_line()).unwrap();
        assert!(!gate.is_active());
        assert!(gate.run_id().is_none());
        assert_eq!(gate.snapshot().state, SequencerState::Idle);
        assert!(gate.progress().abs() < f64::EPSILON);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deactivate_during_stage_pause_never_starts_next_stage() {
        let (gate, sink, completions) = counting_gate(two_stage_table(), second_per_line());

        gate.activate();
        wait_for_lines(&gate, 2).await;
        assert_eq!(sink.events_of_type("stage.completed").len(), 1);
        assert_eq!(sink.events_of_type("stage.started").len(), 1);

        gate.deactivate();
        tokio::time::sleep(Duration::from_secs(60)).await;

        assert_eq!(sink.events_of_type("stage.started").len(), 1);
        assert_eq!(sink.emitted_texts(), vec!["a1", "a2"]);
        assert_eq!(sink.events_of_type("playback.cancelled").len(), 1);
        assert_eq!(completions.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deactivate_during_terminal_delay_skips_completion() {
        let (gate, sink, completions) = counting_gate(two_stage_table(), second_per_line());

        gate.activate();
        wait_for_complete(&gate).await;
        assert_eq!(sink.events_of_type("playback.finished").len(), 1);

        gate.deactivate();
        tokio::time::sleep(Duration::from_secs(60)).await;

        assert_eq!(completions.load(Ordering::SeqCst), 0);
        assert!(sink.events_of_type("playback.completed").is_empty());
        assert_eq!(sink.events_of_type("playback.dismissed").len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_handler_dismissing_gate_keeps_lifecycle_order() {
        let sink = Arc::new(CollectingEventSink::new());
        let slot: Arc<OnceLock<Weak<ActivationGate>>> = Arc::new(OnceLock::new());
        let (tx, mut rx) = mpsc::unbounded_channel();

        let handle = slot.clone();
        let gate = Arc::new(
            ActivationGate::new(two_stage_table(), second_per_line())
                .unwrap()
                .with_sink(sink.clone())
                .on_complete(move |summary| {
                    if let Some(gate) = handle.get().and_then(Weak::upgrade) {
                        gate.dismiss();
                    }
                    let _ = tx.send(summary.lines_emitted);
                }),
        );
        slot.set(Arc::downgrade(&gate)).unwrap();

        gate.activate();
        assert_eq!(rx.recv().await, Some(3));

        assert!(!gate.is_active());
        let types = event_types(&sink);
        assert_eq!(
            types[types.len() - 3..].to_vec(),
            vec!["playback.finished", "playback.completed", "playback.dismissed"]
        );
    }

    #[test]
    fn test_oversized_jitter_rejected_by_gate() {
        let config = second_per_line().with_jitter(Some(JitterRange { min: 0.5, max: 1e300 }));
        assert!(ActivationGate::new(two_stage_table(), config).is_err());
    }
}
