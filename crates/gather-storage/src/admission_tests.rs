//! Admission semantics tests
//!
//! These run against the in-memory backend, which shares the Postgres
//! backend's outcome taxonomy, check order, and atomicity guarantees. The
//! concurrency scenarios use a multi-threaded runtime so competing admissions
//! genuinely contend for the table lock.

use chrono::{Duration, Utc};
use tokio::task::JoinSet;
use uuid::Uuid;

use gather_core::{AdmissionOutcome, JoinOutcome, PaymentStatus, UserRole};

use crate::models::{ClubRow, CreateClub, CreateEvent, CreateUser, EventRow};
use crate::StorageBackend;

async fn seed_user(storage: &StorageBackend, tag: &str) -> Uuid {
    storage
        .create_user(CreateUser {
            email: format!("{tag}@example.com"),
            password_hash: "unused".to_string(),
            first_name: "Test".to_string(),
            last_name: tag.to_string(),
            role: UserRole::User,
            bio: None,
            city: Some("Lisbon".to_string()),
            interests: vec![],
        })
        .await
        .unwrap()
        .id
}

async fn seed_event(storage: &StorageBackend, capacity: i32, price_cents: i64) -> EventRow {
    storage
        .create_event(CreateEvent {
            title: "Pottery Workshop".to_string(),
            description: "Hands-on introduction to wheel throwing.".to_string(),
            category: "cultural".to_string(),
            starts_at: Utc::now() + Duration::days(7),
            location: "Studio 4".to_string(),
            city: "Lisbon".to_string(),
            price_cents,
            capacity,
            image_url: None,
            creator_id: Uuid::now_v7(),
            club_id: None,
        })
        .await
        .unwrap()
}

async fn seed_club(storage: &StorageBackend) -> ClubRow {
    storage
        .create_club(CreateClub {
            name: "Ceramics Circle".to_string(),
            description: "Weekly wheel nights and glaze experiments.".to_string(),
            city: "Lisbon".to_string(),
            category: "cultural".to_string(),
            manager_id: Uuid::now_v7(),
            image_url: None,
        })
        .await
        .unwrap()
}

fn tally(outcomes: &[AdmissionOutcome]) -> (usize, usize, usize) {
    let admitted = outcomes.iter().filter(|o| o.is_admitted()).count();
    let full = outcomes
        .iter()
        .filter(|o| matches!(o, AdmissionOutcome::EventFull))
        .count();
    let duplicate = outcomes
        .iter()
        .filter(|o| matches!(o, AdmissionOutcome::AlreadyRegistered))
        .count();
    (admitted, full, duplicate)
}

#[tokio::test]
async fn admits_when_capacity_available() {
    let storage = StorageBackend::in_memory();
    let event = seed_event(&storage, 10, 0).await;
    let user = seed_user(&storage, "ana").await;

    let outcome = storage.register_for_event(user, event.id).await.unwrap();
    let AdmissionOutcome::Admitted { registration } = outcome else {
        panic!("expected admission, got {outcome:?}");
    };
    assert_eq!(registration.user_id, user);
    assert_eq!(registration.event_id, event.id);
    assert_eq!(
        storage.count_registrations_for_event(event.id).await.unwrap(),
        1
    );
}

#[tokio::test]
async fn free_event_is_paid_immediately() {
    let storage = StorageBackend::in_memory();
    let event = seed_event(&storage, 10, 0).await;
    let user = seed_user(&storage, "bruno").await;

    match storage.register_for_event(user, event.id).await.unwrap() {
        AdmissionOutcome::Admitted { registration } => {
            assert_eq!(registration.payment_status, PaymentStatus::Paid);
        }
        other => panic!("expected admission, got {other:?}"),
    }
}

#[tokio::test]
async fn priced_event_starts_pending() {
    let storage = StorageBackend::in_memory();
    let event = seed_event(&storage, 10, 2500).await;
    let user = seed_user(&storage, "carla").await;

    match storage.register_for_event(user, event.id).await.unwrap() {
        AdmissionOutcome::Admitted { registration } => {
            assert_eq!(registration.payment_status, PaymentStatus::Pending);
            assert_eq!(registration.payment_ref, None);
        }
        other => panic!("expected admission, got {other:?}"),
    }
}

#[tokio::test]
async fn unknown_event_is_not_found() {
    let storage = StorageBackend::in_memory();
    let user = seed_user(&storage, "dario").await;

    let outcome = storage
        .register_for_event(user, Uuid::now_v7())
        .await
        .unwrap();
    assert_eq!(outcome, AdmissionOutcome::NotFound);
}

#[tokio::test]
async fn second_attempt_is_already_registered() {
    let storage = StorageBackend::in_memory();
    let event = seed_event(&storage, 10, 0).await;
    let user = seed_user(&storage, "eva").await;

    let first = storage.register_for_event(user, event.id).await.unwrap();
    assert!(first.is_admitted());

    let second = storage.register_for_event(user, event.id).await.unwrap();
    assert_eq!(second, AdmissionOutcome::AlreadyRegistered);

    // The duplicate attempt must not have written anything
    assert_eq!(
        storage.count_registrations_for_event(event.id).await.unwrap(),
        1
    );
}

#[tokio::test]
async fn full_event_rejects_with_event_full() {
    let storage = StorageBackend::in_memory();
    let event = seed_event(&storage, 2, 0).await;
    for tag in ["fatima", "goncalo"] {
        let user = seed_user(&storage, tag).await;
        assert!(storage
            .register_for_event(user, event.id)
            .await
            .unwrap()
            .is_admitted());
    }

    let late = seed_user(&storage, "hugo").await;
    let outcome = storage.register_for_event(late, event.id).await.unwrap();
    assert_eq!(outcome, AdmissionOutcome::EventFull);
    assert_eq!(
        storage.count_registrations_for_event(event.id).await.unwrap(),
        2
    );
}

#[tokio::test]
async fn full_event_wins_over_duplicate() {
    // Capacity is checked before the duplicate insert would fire, so a repeat
    // request against a full event reports EventFull, not AlreadyRegistered.
    let storage = StorageBackend::in_memory();
    let event = seed_event(&storage, 1, 0).await;
    let user = seed_user(&storage, "ines").await;

    assert!(storage
        .register_for_event(user, event.id)
        .await
        .unwrap()
        .is_admitted());
    let outcome = storage.register_for_event(user, event.id).await.unwrap();
    assert_eq!(outcome, AdmissionOutcome::EventFull);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn two_concurrent_attempts_one_spot() {
    let storage = StorageBackend::in_memory();
    let event = seed_event(&storage, 1, 0).await;
    let first = seed_user(&storage, "joana").await;
    let second = seed_user(&storage, "kiko").await;

    let mut set = JoinSet::new();
    for user in [first, second] {
        let storage = storage.clone();
        let event_id = event.id;
        set.spawn(async move { storage.register_for_event(user, event_id).await.unwrap() });
    }

    let mut outcomes = Vec::new();
    while let Some(joined) = set.join_next().await {
        outcomes.push(joined.unwrap());
    }

    let (admitted, full, _) = tally(&outcomes);
    assert_eq!(admitted, 1);
    assert_eq!(full, 1);
    assert_eq!(
        storage.count_registrations_for_event(event.id).await.unwrap(),
        1
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn five_concurrent_distinct_users_all_admitted() {
    let storage = StorageBackend::in_memory();
    let event = seed_event(&storage, 5, 0).await;

    let mut users = Vec::new();
    for n in 0..5 {
        users.push(seed_user(&storage, &format!("batch{n}")).await);
    }

    let mut set = JoinSet::new();
    for user in users {
        let storage = storage.clone();
        let event_id = event.id;
        set.spawn(async move { storage.register_for_event(user, event_id).await.unwrap() });
    }

    let mut outcomes = Vec::new();
    while let Some(joined) = set.join_next().await {
        outcomes.push(joined.unwrap());
    }

    let (admitted, full, duplicate) = tally(&outcomes);
    assert_eq!((admitted, full, duplicate), (5, 0, 0));
    assert_eq!(
        storage.count_registrations_for_event(event.id).await.unwrap(),
        5
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn capacity_never_exceeded_under_contention() {
    let storage = StorageBackend::in_memory();
    let event = seed_event(&storage, 3, 1500).await;

    let mut users = Vec::new();
    for n in 0..20 {
        users.push(seed_user(&storage, &format!("crowd{n}")).await);
    }

    let mut set = JoinSet::new();
    for user in users {
        let storage = storage.clone();
        let event_id = event.id;
        set.spawn(async move { storage.register_for_event(user, event_id).await.unwrap() });
    }

    let mut outcomes = Vec::new();
    while let Some(joined) = set.join_next().await {
        outcomes.push(joined.unwrap());
    }

    let (admitted, full, duplicate) = tally(&outcomes);
    assert_eq!(admitted, 3);
    assert_eq!(full, 17);
    assert_eq!(duplicate, 0);
    assert_eq!(
        storage.count_registrations_for_event(event.id).await.unwrap(),
        3
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_duplicates_create_one_row() {
    let storage = StorageBackend::in_memory();
    let event = seed_event(&storage, 100, 0).await;
    let user = seed_user(&storage, "lena").await;

    let mut set = JoinSet::new();
    for _ in 0..10 {
        let storage = storage.clone();
        let event_id = event.id;
        set.spawn(async move { storage.register_for_event(user, event_id).await.unwrap() });
    }

    let mut outcomes = Vec::new();
    while let Some(joined) = set.join_next().await {
        outcomes.push(joined.unwrap());
    }

    let (admitted, _, duplicate) = tally(&outcomes);
    assert_eq!(admitted, 1);
    assert_eq!(duplicate, 9);
    assert_eq!(
        storage.count_registrations_for_event(event.id).await.unwrap(),
        1
    );
}

#[tokio::test]
async fn failed_attempts_leave_no_rows() {
    let storage = StorageBackend::in_memory();
    let event = seed_event(&storage, 1, 0).await;
    let winner = seed_user(&storage, "mara").await;
    let loser = seed_user(&storage, "nuno").await;

    assert!(storage
        .register_for_event(winner, event.id)
        .await
        .unwrap()
        .is_admitted());

    // EventFull, AlreadyRegistered (via full-event order), and NotFound all
    // leave occupancy untouched
    let _ = storage.register_for_event(loser, event.id).await.unwrap();
    let _ = storage.register_for_event(winner, event.id).await.unwrap();
    let _ = storage
        .register_for_event(loser, Uuid::now_v7())
        .await
        .unwrap();

    assert_eq!(
        storage.count_registrations_for_event(event.id).await.unwrap(),
        1
    );
}

#[tokio::test]
async fn join_club_then_duplicate() {
    let storage = StorageBackend::in_memory();
    let club = seed_club(&storage).await;
    let user = seed_user(&storage, "olga").await;

    match storage.join_club(user, club.id).await.unwrap() {
        JoinOutcome::Joined { membership } => {
            assert_eq!(membership.user_id, user);
            assert_eq!(membership.club_id, club.id);
        }
        other => panic!("expected join, got {other:?}"),
    }

    let again = storage.join_club(user, club.id).await.unwrap();
    assert_eq!(again, JoinOutcome::AlreadyMember);
    assert_eq!(storage.count_members_for_club(club.id).await.unwrap(), 1);
}

#[tokio::test]
async fn join_missing_club_is_not_found() {
    let storage = StorageBackend::in_memory();
    let user = seed_user(&storage, "paulo").await;

    let outcome = storage.join_club(user, Uuid::now_v7()).await.unwrap();
    assert_eq!(outcome, JoinOutcome::NotFound);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_joins_create_one_membership() {
    let storage = StorageBackend::in_memory();
    let club = seed_club(&storage).await;
    let user = seed_user(&storage, "rita").await;

    let mut set = JoinSet::new();
    for _ in 0..10 {
        let storage = storage.clone();
        let club_id = club.id;
        set.spawn(async move { storage.join_club(user, club_id).await.unwrap() });
    }

    let mut joined = 0;
    let mut already = 0;
    while let Some(outcome) = set.join_next().await {
        match outcome.unwrap() {
            JoinOutcome::Joined { .. } => joined += 1,
            JoinOutcome::AlreadyMember => already += 1,
            JoinOutcome::NotFound => panic!("club exists"),
        }
    }

    assert_eq!(joined, 1);
    assert_eq!(already, 9);
    assert_eq!(storage.count_members_for_club(club.id).await.unwrap(), 1);
}
