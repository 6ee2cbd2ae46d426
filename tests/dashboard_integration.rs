//! Dashboard Integration Tests
//!
//! Exercises the playbook properties through the public API, including the
//! async run driver on a paused tokio clock.

use std::time::{Duration, Instant};

use playdeck::core::{drive, Action, Catalog, Dashboard, PipelineId, COMPLETION_MESSAGE};

fn dashboard() -> Dashboard {
    Dashboard::new(Catalog::builtin(), Duration::from_secs(1))
}

fn ids(dashboard: &Dashboard) -> Vec<PipelineId> {
    dashboard.playbook().items().iter().map(|i| i.pipeline.id).collect()
}

fn messages_since(dashboard: &Dashboard, cursor: usize) -> Vec<String> {
    dashboard.log().since(cursor).iter().map(|l| l.message.clone()).collect()
}

// ============================================================================
// Playbook Properties
// ============================================================================

#[test]
fn test_duplicate_add_keeps_length() {
    let mut dashboard = dashboard();
    let now = Instant::now();

    dashboard.apply(Action::AddPipeline(2), now);
    let cursor = dashboard.log().len();
    dashboard.apply(Action::AddPipeline(2), now);

    assert_eq!(dashboard.playbook().len(), 1);
    let fresh = messages_since(&dashboard, cursor);
    assert_eq!(fresh.len(), 1);
    assert!(fresh[0].contains("already in the playbook"));
}

#[test]
fn test_four_distinct_adds_keep_order() {
    let mut dashboard = dashboard();
    let now = Instant::now();
    for id in [3, 1, 4, 2] {
        dashboard.apply(Action::AddPipeline(id), now);
    }
    assert_eq!(ids(&dashboard), vec![3, 1, 4, 2]);
}

#[test]
fn test_remove_by_key_removes_exactly_one() {
    let mut dashboard = dashboard();
    let now = Instant::now();
    for id in 1..=4 {
        dashboard.apply(Action::AddPipeline(id), now);
    }

    let key = dashboard.playbook().items()[2].unique_id;
    dashboard.apply(Action::Remove(key), now);

    assert_eq!(ids(&dashboard), vec![1, 2, 4]);
    assert!(dashboard.playbook().position(key).is_none());
}

#[test]
fn test_drag_i_to_j_for_every_pair() {
    let now = Instant::now();
    for i in 0..4 {
        for j in 0..4 {
            let mut dashboard = dashboard();
            for id in 1..=4 {
                dashboard.apply(Action::AddPipeline(id), now);
            }
            let before = ids(&dashboard);
            let dragged = dashboard.playbook().items()[i].unique_id;
            let target = dashboard.playbook().items()[j].unique_id;

            dashboard.apply(Action::Reorder { dragged, target }, now);

            let after = ids(&dashboard);
            assert_eq!(after[j], before[i], "moved entry should sit at {j}");

            let rest_before: Vec<_> = before.iter().filter(|&&id| id != before[i]).collect();
            let rest_after: Vec<_> = after.iter().filter(|&&id| id != before[i]).collect();
            assert_eq!(rest_before, rest_after, "untouched entries keep relative order");
        }
    }
}

#[test]
fn test_empty_run_and_schedule() {
    let now = Instant::now();

    let mut dashboard = dashboard();
    let cursor = dashboard.log().len();
    dashboard.apply(Action::Run, now);
    assert_eq!(messages_since(&dashboard, cursor).len(), 1);
    assert!(dashboard.next_due().is_none());

    let cursor = dashboard.log().len();
    dashboard.apply(Action::Schedule("noon".to_string()), now);
    assert_eq!(messages_since(&dashboard, cursor).len(), 1);
    assert!(dashboard.next_due().is_none());
}

// ============================================================================
// Run Driver
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_drive_emits_n_plus_one_lines() {
    let mut dashboard = dashboard();
    let now = tokio::time::Instant::now().into_std();
    for id in [4, 2, 1] {
        dashboard.apply(Action::AddPipeline(id), now);
    }
    dashboard.apply(Action::Run, now);

    let started = tokio::time::Instant::now();
    let mut streamed = Vec::new();
    drive(&mut dashboard, std::future::pending(), |lines| {
        streamed.extend(lines.iter().map(|l| l.message.clone()));
    })
    .await;

    assert_eq!(
        streamed,
        vec![
            "▶️ Executing pipeline 1: Cleanup Pipeline",
            "▶️ Executing pipeline 2: Deploy Pipeline",
            "▶️ Executing pipeline 3: Build Pipeline",
            COMPLETION_MESSAGE,
        ]
    );
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(4) && elapsed < Duration::from_millis(4100));
    assert!(dashboard.simulator().is_idle());
}

#[tokio::test(start_paused = true)]
async fn test_drive_stop_cancels_remaining() {
    let mut dashboard = dashboard();
    let now = tokio::time::Instant::now().into_std();
    for id in 1..=4 {
        dashboard.apply(Action::AddPipeline(id), now);
    }
    dashboard.apply(Action::Run, now);

    let mut streamed = Vec::new();
    drive(&mut dashboard, tokio::time::sleep(Duration::from_millis(2500)), |lines| {
        streamed.extend(lines.iter().map(|l| l.message.clone()));
    })
    .await;

    assert_eq!(
        streamed,
        vec![
            "▶️ Executing pipeline 1: Build Pipeline",
            "▶️ Executing pipeline 2: Deploy Pipeline",
            "⏹ Pipelines stopped.",
        ]
    );
    assert!(dashboard.simulator().is_idle());
}

#[tokio::test(start_paused = true)]
async fn test_drive_without_run_returns_immediately() {
    let mut dashboard = dashboard();
    let mut calls = 0;
    drive(&mut dashboard, std::future::pending(), |_| calls += 1).await;
    assert_eq!(calls, 0);
}
