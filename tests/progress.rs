mod common;

use lectern::action::{ActionContext, ActionError, AuthenticationError, ValidationError};
use lectern::model::MemoryStore;
use lectern::model::memory::{FailOn, StoreCall};
use lectern::progress::ProgressTracker;

use crate::common::{seed_course, student};

fn is_validation(err: &ActionError, expected: fn(&ValidationError) -> bool) -> bool {
    matches!(err, ActionError::ValidationError(e) if expected(e))
}

#[tokio::test]
async fn tracker_requires_a_user() {
    let store = MemoryStore::new();
    let course = seed_course(&store, "Rust", &["One"]).await;

    let err = ProgressTracker::load(&store, &ActionContext::anonymous(), course.id)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ActionError::AuthenticationError(AuthenticationError::AuthenticationRequired)
    ));
    assert!(store.calls().await.is_empty());
}

#[tokio::test]
async fn enroll_then_complete_lessons() {
    let store = MemoryStore::new();
    let course = seed_course(&store, "Rust", &["One", "Two", "Three", "Four"]).await;
    let ctx = student();

    let mut tracker = ProgressTracker::load(&store, &ctx, course.id).await.unwrap();
    assert!(!tracker.is_enrolled());
    assert_eq!(tracker.course_progress().percentage(), 0.0);

    let enrollment = tracker.enroll(&store).await.unwrap();
    assert!(enrollment.progress().is_empty());
    assert_eq!(enrollment.student_id(), ctx.user().unwrap().user_id());

    let first = tracker.lessons()[0].id.clone();
    let third = tracker.lessons()[2].id.clone();
    tracker.mark_complete(&store, &first).await.unwrap();
    tracker.mark_complete(&store, &third).await.unwrap();

    let progress = tracker.course_progress();
    assert_eq!((progress.completed_lessons, progress.total_lessons), (2, 4));
    assert_eq!(progress.percentage(), 50.0);
    assert!(tracker.is_completed(&first));
    assert!(!tracker.is_completed(&tracker.lessons()[1].id));

    let next = tracker.next_uncompleted(&first).unwrap();
    assert_eq!(next.title, "Two");
    let next = tracker.next_uncompleted(&tracker.lessons()[1].id).unwrap();
    assert_eq!(next.title, "Four");

    let nav = tracker.navigation(&third).unwrap();
    assert_eq!(nav.prev.map(|l| l.title), Some(String::from("Two")));
    assert_eq!(nav.next.map(|l| l.title), Some(String::from("Four")));
    assert_eq!((nav.current, nav.total), (3, 4));

    // a fresh load sees the persisted progress
    let reloaded = ProgressTracker::load(&store, &ctx, course.id).await.unwrap();
    assert_eq!(reloaded.course_progress(), progress);
}

#[tokio::test]
async fn completing_twice_changes_nothing() {
    let store = MemoryStore::new();
    let course = seed_course(&store, "Rust", &["One", "Two"]).await;
    let mut tracker = ProgressTracker::load(&store, &student(), course.id).await.unwrap();
    tracker.enroll(&store).await.unwrap();

    let lesson = tracker.lessons()[0].id.clone();
    let first = tracker.mark_complete(&store, &lesson).await.unwrap().clone();
    store.clear_calls().await;

    let second = tracker.mark_complete(&store, &lesson).await.unwrap();
    assert_eq!(second.progress(), first.progress());
    assert_eq!(second.progress().len(), 1);
    assert!(store.calls().await.is_empty());
}

#[tokio::test]
async fn completions_from_two_trackers_are_merged() {
    let store = MemoryStore::new();
    let course = seed_course(&store, "Rust", &["One", "Two"]).await;
    let ctx = student();

    let mut laptop = ProgressTracker::load(&store, &ctx, course.id).await.unwrap();
    laptop.enroll(&store).await.unwrap();
    let mut phone = ProgressTracker::load(&store, &ctx, course.id).await.unwrap();

    let one = laptop.lessons()[0].id.clone();
    let two = laptop.lessons()[1].id.clone();
    laptop.mark_complete(&store, &one).await.unwrap();
    phone.mark_complete(&store, &two).await.unwrap();

    // the second tracker picks up what the first one stored
    assert!(phone.is_completed(&one));
    assert!(phone.is_completed(&two));

    let reloaded = ProgressTracker::load(&store, &ctx, course.id).await.unwrap();
    assert!(reloaded.is_completed(&one), "completion of lesson One was lost");
    assert!(reloaded.is_completed(&two));
    assert_eq!(reloaded.course_progress().percentage(), 100.0);

    // already stored by the other tracker: no second write
    store.clear_calls().await;
    laptop.mark_complete(&store, &two).await.unwrap();
    assert!(laptop.is_completed(&two));
    let writes = store
        .calls()
        .await
        .into_iter()
        .filter(|c| matches!(c, StoreCall::UpdateEnrollmentProgress(_)))
        .count();
    assert_eq!(writes, 0);
}

#[tokio::test]
async fn enrolling_twice_is_rejected() {
    let store = MemoryStore::new();
    let course = seed_course(&store, "Rust", &["One"]).await;
    let ctx = student();

    let mut tracker = ProgressTracker::load(&store, &ctx, course.id).await.unwrap();
    tracker.enroll(&store).await.unwrap();
    let err = tracker.enroll(&store).await.unwrap_err();
    assert!(is_validation(&err, |e| matches!(e, ValidationError::AlreadyEnrolled)));

    // a second tracker that has not seen the enrollment yet
    let mut stale = ProgressTracker::load(&store, &ctx, course.id).await.unwrap();
    assert!(stale.is_enrolled());
    let err = stale.enroll(&store).await.unwrap_err();
    assert!(is_validation(&err, |e| matches!(e, ValidationError::AlreadyEnrolled)));

    let creates = store
        .calls()
        .await
        .into_iter()
        .filter(|c| matches!(c, StoreCall::CreateEnrollment { .. }))
        .count();
    assert_eq!(creates, 1);
}

#[tokio::test]
async fn completion_is_validated() {
    let store = MemoryStore::new();
    let course = seed_course(&store, "Rust", &["One"]).await;
    let mut tracker = ProgressTracker::load(&store, &student(), course.id).await.unwrap();
    let lesson = tracker.lessons()[0].id.clone();

    let err = tracker.mark_complete(&store, &lesson).await.unwrap_err();
    assert!(is_validation(&err, |e| matches!(e, ValidationError::NotEnrolled)));

    tracker.enroll(&store).await.unwrap();

    let err = tracker.mark_complete(&store, "").await.unwrap_err();
    assert!(is_validation(&err, |e| matches!(e, ValidationError::MissingLesson)));

    let err = tracker.mark_complete(&store, "not-a-lesson").await.unwrap_err();
    assert!(is_validation(&err, |e| matches!(
        e,
        ValidationError::UnknownLesson { .. }
    )));
    assert!(tracker.enrollment().unwrap().progress().is_empty());
}

#[tokio::test]
async fn failed_completion_keeps_previous_progress() {
    let store = MemoryStore::new();
    let course = seed_course(&store, "Rust", &["One", "Two"]).await;
    let mut tracker = ProgressTracker::load(&store, &student(), course.id).await.unwrap();
    tracker.enroll(&store).await.unwrap();
    let lesson = tracker.lessons()[1].id.clone();

    store.fail_next(FailOn::UpdateEnrollmentProgress).await;
    let err = tracker.mark_complete(&store, &lesson).await.unwrap_err();
    assert!(matches!(err, ActionError::PersistenceError(_)));
    assert!(!tracker.is_completed(&lesson));

    tracker.mark_complete(&store, &lesson).await.unwrap();
    assert!(tracker.is_completed(&lesson));
}

#[tokio::test]
async fn course_without_lessons_reports_zero() {
    let store = MemoryStore::new();
    let course = seed_course(&store, "Empty", &[]).await;
    let mut tracker = ProgressTracker::load(&store, &student(), course.id).await.unwrap();
    tracker.enroll(&store).await.unwrap();

    let progress = tracker.course_progress();
    assert_eq!(progress.total_lessons, 0);
    assert_eq!(progress.percentage(), 0.0);
    assert!(tracker.next_uncompleted("anything").is_none());
}
