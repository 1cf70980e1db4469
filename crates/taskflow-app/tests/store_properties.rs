//! Behavioral properties of the task store, query engine and statistics,
//! exercised through the public API only.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::Arc;

use taskflow_app::{Fixture, StoreError, TaskPatch, TaskStore, TaskflowService};
use taskflow_core::{
    FixedClock, NewTask, StatusFilter, TaskId, TaskQuery, TaskStats, apply_filters,
};
use time::OffsetDateTime;
use time::macros::datetime;

const NOW: OffsetDateTime = datetime!(2024-05-01 08:00 UTC);

fn empty_store() -> TaskStore {
    TaskStore::new(Arc::new(FixedClock::new(NOW)))
}

#[tokio::test]
async fn buy_milk_scenario() {
    let store = empty_store();
    let milk = store.create(NewTask::titled("Buy milk")).await;

    assert_eq!(
        store.get_stats().await,
        TaskStats {
            total: 1,
            completed: 0,
            pending: 1,
            overdue: 0,
            completion_rate: 0,
        }
    );

    store.toggle_complete(&milk.id).await.expect("toggle");
    assert_eq!(
        store.get_stats().await,
        TaskStats {
            total: 1,
            completed: 1,
            pending: 0,
            overdue: 0,
            completion_rate: 100,
        }
    );
}

#[tokio::test]
async fn pay_rent_scenario_is_overdue_everywhere() {
    let store = empty_store();
    let rent = store
        .create(NewTask::titled("Pay rent").due(datetime!(2020-01-01 00:00 UTC)))
        .await;

    assert_eq!(store.get_stats().await.overdue, 1);

    let overdue = apply_filters(
        &store.get_all().await,
        &TaskQuery {
            status: StatusFilter::Overdue,
            ..TaskQuery::default()
        },
        NOW,
    );
    assert_eq!(overdue.len(), 1);
    assert_eq!(overdue[0].id, rent.id);

    // Completing removes it from the overdue count without deleting it.
    store.toggle_complete(&rent.id).await.expect("toggle");
    let stats = store.get_stats().await;
    assert_eq!(stats.overdue, 0);
    assert_eq!(stats.total, 1);
}

#[tokio::test]
async fn pending_always_equals_total_minus_completed() {
    let store = empty_store();
    let mut ids: Vec<TaskId> = Vec::new();
    for idx in 0..10 {
        ids.push(store.create(NewTask::titled(format!("t{idx}"))).await.id);
    }

    for (step, id) in ids.iter().enumerate() {
        if step % 3 == 0 {
            store.toggle_complete(id).await.expect("toggle");
        } else if step % 3 == 1 {
            store.delete(id).await.expect("delete");
        }
        let stats = store.get_stats().await;
        assert_eq!(stats.pending, stats.total - stats.completed);
    }
}

#[tokio::test]
async fn update_on_missing_id_is_not_found_and_writes_nothing() {
    let store = empty_store();
    store.create(NewTask::titled("keep")).await;
    let before = store.get_all().await;

    let err = store
        .update(
            &TaskId::from("ghost"),
            TaskPatch {
                completed: Some(true),
                ..TaskPatch::default()
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::TaskNotFound(id) if id.as_str() == "ghost"));
    assert_eq!(store.get_all().await, before);
}

#[tokio::test]
async fn toggle_on_missing_id_is_not_found() {
    let store = empty_store();
    let err = store.toggle_complete(&TaskId::from("ghost")).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn seeded_service_answers_queries_over_fixture_data() {
    let fixture = Fixture::from_json(
        r##"{
            "tasks": [
                {"id": "1", "title": "Late", "dueDate": "2024-01-01", "createdAt": "2023-12-01T00:00:00Z"},
                {"id": "2", "title": "Done", "completed": true, "createdAt": "2024-04-30T09:00:00Z", "categoryId": "c1"},
                {"id": "3", "title": "Future", "dueDate": "2030-01-01", "createdAt": "2024-01-02T00:00:00Z", "categoryId": "c1"}
            ],
            "categories": [{"id": "c1", "name": "Work", "color": "#6366F1", "taskCount": 99}]
        }"##,
    )
    .expect("fixture");
    let service: TaskflowService = fixture.into_service(Arc::new(FixedClock::new(NOW)));

    let stats = service.tasks().get_stats().await;
    assert_eq!((stats.total, stats.completed, stats.overdue, stats.completion_rate), (3, 1, 1, 33));

    let ordered: Vec<String> = service
        .list_tasks(&TaskQuery::default())
        .await
        .into_iter()
        .map(|t| t.id.to_string())
        .collect();
    assert_eq!(ordered, vec!["1", "3", "2"]);

    let categories = service.categories_with_counts().await;
    assert_eq!(categories[0].task_count, 2);

    let completed = service.completed_stats().await;
    assert_eq!(completed.total_completed, 1);
    assert_eq!(completed.completed_today, 0);
    assert_eq!(completed.completed_this_week, 1);
}
