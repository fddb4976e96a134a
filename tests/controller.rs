mod common;

use common::{queued, task, Call, FakeTaskService, Harness};
use tasklist::controller::TaskListController;
use tasklist::sync::SyncStatus;

fn controller(harness: &Harness) -> TaskListController {
    TaskListController::new(harness.engine.clone(), 5)
}

#[tokio::test]
async fn test_refresh_loads_with_configured_limit() {
    let harness = Harness::new(FakeTaskService::with_tasks(vec![task(1, "A", false), task(2, "B", true)]));
    let mut controller = controller(&harness);

    let tasks = controller.refresh().await.unwrap().to_vec();

    assert_eq!(tasks, vec![task(1, "A", false), task(2, "B", true)]);
    assert_eq!(harness.remote.calls(), vec![Call::List(5)]);
    assert_eq!(controller.find(2), Some(&task(2, "B", true)));
}

#[tokio::test]
async fn test_add_task_prepends_and_trims() {
    let harness = Harness::new(FakeTaskService::with_tasks(vec![task(1, "A", false)]));
    let mut controller = controller(&harness);
    controller.refresh().await.unwrap();

    let added = controller.add_task("  Water plants  ").await.unwrap().unwrap();

    assert_eq!(added.title, "Water plants");
    assert_eq!(controller.tasks()[0], added);
    assert_eq!(controller.tasks().len(), 2);
}

#[tokio::test]
async fn test_add_blank_task_is_ignored() {
    let harness = Harness::new(FakeTaskService::new());
    let mut controller = controller(&harness);

    assert_eq!(controller.add_task("   ").await.unwrap(), None);
    assert!(controller.tasks().is_empty());
    assert!(harness.remote.calls().is_empty());
}

#[tokio::test]
async fn test_offline_add_counts_as_pending() {
    let harness = Harness::new(FakeTaskService::new());
    harness.remote.set_online(false);
    let mut controller = controller(&harness);

    let added = controller.add_task("Call mom").await.unwrap().unwrap();

    assert!(added.offline);
    assert_eq!(controller.pending_count(), 1);
}

#[tokio::test]
async fn test_toggle_task_flips_completion() {
    let harness = Harness::new(FakeTaskService::with_tasks(vec![task(1, "A", false)]));
    let mut controller = controller(&harness);
    controller.refresh().await.unwrap();

    let update = controller.toggle_task(1).await.unwrap().unwrap();

    assert!(update.completed);
    assert!(controller.find(1).unwrap().completed);
    assert!(harness.remote.remote_tasks()[0].completed);
}

#[tokio::test]
async fn test_toggle_offline_keeps_local_value() {
    let harness = Harness::new(FakeTaskService::with_tasks(vec![task(1, "A", false)]));
    let mut controller = controller(&harness);
    controller.refresh().await.unwrap();
    harness.remote.set_online(false);

    controller.toggle_task(1).await.unwrap();

    assert!(controller.find(1).unwrap().completed);
    assert_eq!(harness.stored().await.unwrap(), vec![queued(1, "A", true, false)]);
}

#[tokio::test]
async fn test_toggle_unknown_task_is_ignored() {
    let harness = Harness::new(FakeTaskService::new());
    let mut controller = controller(&harness);

    assert_eq!(controller.toggle_task(42).await.unwrap(), None);
    assert!(harness.remote.calls().is_empty());
}

#[tokio::test]
async fn test_delete_task_removes_from_list() {
    let harness = Harness::new(FakeTaskService::with_tasks(vec![task(1, "A", false), task(2, "B", false)]));
    let mut controller = controller(&harness);
    controller.refresh().await.unwrap();

    assert!(controller.delete_task(1).await.unwrap());
    assert_eq!(controller.tasks(), &[task(2, "B", false)]);
}

#[tokio::test]
async fn test_sync_refreshes_after_replay() {
    let harness = Harness::new(FakeTaskService::new());
    harness.remote.set_online(false);
    let mut controller = controller(&harness);
    controller.add_task("Offline task").await.unwrap();

    harness.remote.set_online(true);
    let status = controller.sync().await.unwrap();

    assert_eq!(status, SyncStatus::Completed { synced: 1, failed: 0 });
    assert_eq!(controller.tasks(), &[task(201, "Offline task", false)]);
    assert_eq!(controller.pending_count(), 0);
}
