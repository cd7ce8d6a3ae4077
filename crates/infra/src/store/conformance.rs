//! Behaviour every `StudentStore` backend must share.
//!
//! Each backend's test module calls these against a fresh store.

use std::sync::Arc;

use students_core::{StudentFields, StudentId};

use super::r#trait::{StoreError, StudentStore};

pub async fn crud_lifecycle<S: StudentStore>(store: &S) {
    let id = store
        .create(StudentFields::new("Ann", "ann@x.com", 20))
        .await
        .unwrap();

    let got = store.get(id).await.unwrap();
    assert_eq!(got.id, id);
    assert_eq!(got.name, "Ann");
    assert_eq!(got.email, "ann@x.com");
    assert_eq!(got.age, 20);

    store
        .update(id, StudentFields::new("Annie", "annie@y.org", 21))
        .await
        .unwrap();
    let got = store.get(id).await.unwrap();
    assert_eq!(got.id, id);
    assert_eq!(
        (got.name.as_str(), got.email.as_str(), got.age),
        ("Annie", "annie@y.org", 21)
    );

    // Keeping one's own email is not a duplicate.
    store
        .update(id, StudentFields::new("Anne", "annie@y.org", 22))
        .await
        .unwrap();

    store.delete(id).await.unwrap();
    assert!(matches!(store.get(id).await, Err(StoreError::NotFound(x)) if x == id));
    assert!(matches!(store.delete(id).await, Err(StoreError::NotFound(_))));
}

pub async fn duplicate_email_is_rejected<S: StudentStore>(store: &S) {
    let first = store
        .create(StudentFields::new("Ann", "ann@x.com", 20))
        .await
        .unwrap();

    let second = store.create(StudentFields::new("Other", "ann@x.com", 30)).await;
    assert!(matches!(second, Err(StoreError::ConstraintViolation(_))));
    assert_eq!(store.list().await.unwrap().len(), 1);

    // Updating another record onto a taken email fails and changes nothing.
    let bob = store
        .create(StudentFields::new("Bob", "bob@x.com", 40))
        .await
        .unwrap();
    let clash = store
        .update(bob, StudentFields::new("Bob", "ann@x.com", 41))
        .await;
    assert!(matches!(clash, Err(StoreError::ConstraintViolation(_))));

    let bob_now = store.get(bob).await.unwrap();
    assert_eq!((bob_now.email.as_str(), bob_now.age), ("bob@x.com", 40));
    assert_eq!(store.get(first).await.unwrap().name, "Ann");
}

pub async fn column_constraints_are_enforced<S: StudentStore>(store: &S) {
    for age in [-1, 131] {
        let res = store.create(StudentFields::new("Ann", "ann@x.com", age)).await;
        assert!(
            matches!(res, Err(StoreError::ConstraintViolation(_))),
            "age {age} accepted"
        );
    }
    for age in [0, 130] {
        let email = format!("age{age}@x.com");
        store
            .create(StudentFields::new("Ann", email, age))
            .await
            .unwrap();
    }

    let empty_name = store.create(StudentFields::new("", "e@x.com", 5)).await;
    assert!(matches!(empty_name, Err(StoreError::ConstraintViolation(_))));
}

pub async fn absent_records_are_errors<S: StudentStore>(store: &S) {
    let missing = StudentId::new(9_999);
    assert!(matches!(store.get(missing).await, Err(StoreError::NotFound(_))));
    assert!(matches!(
        store
            .update(missing, StudentFields::new("Ann", "ann@x.com", 20))
            .await,
        Err(StoreError::NotFound(_))
    ));
    assert!(matches!(store.delete(missing).await, Err(StoreError::NotFound(_))));
    assert!(store.list().await.unwrap().is_empty());
}

pub async fn list_returns_every_present_record<S: StudentStore>(store: &S) {
    let mut ids = Vec::new();
    for (name, email) in [("A", "a@x.com"), ("B", "b@x.com"), ("C", "c@x.com")] {
        ids.push(store.create(StudentFields::new(name, email, 18)).await.unwrap());
    }

    let mut listed: Vec<StudentId> = store.list().await.unwrap().into_iter().map(|s| s.id).collect();
    listed.sort();
    ids.sort();
    assert_eq!(listed, ids);

    store.delete(ids[1]).await.unwrap();
    let listed: Vec<StudentId> = store.list().await.unwrap().into_iter().map(|s| s.id).collect();
    assert_eq!(listed.len(), 2);
    assert!(!listed.contains(&ids[1]));
}

pub async fn concurrent_creates_with_same_email<S: StudentStore + 'static>(store: Arc<S>) {
    let tasks: Vec<_> = (0..8)
        .map(|i| {
            let store = store.clone();
            tokio::spawn(async move {
                store
                    .create(StudentFields::new(format!("S{i}"), "same@x.com", 20))
                    .await
            })
        })
        .collect();

    let mut ok = 0;
    for t in tasks {
        match t.await.unwrap() {
            Ok(_) => ok += 1,
            Err(StoreError::ConstraintViolation(_)) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
    assert_eq!(ok, 1);
    assert_eq!(store.list().await.unwrap().len(), 1);
}

pub async fn delete_races_update<S: StudentStore + 'static>(store: Arc<S>) {
    for round in 0..50 {
        let id = store
            .create(StudentFields::new("Ann", format!("race{round}@x.com"), 20))
            .await
            .unwrap();

        let updater = {
            let store = store.clone();
            tokio::spawn(async move {
                store
                    .update(id, StudentFields::new("Bea", format!("moved{round}@y.org"), 30))
                    .await
            })
        };
        let deleter = {
            let store = store.clone();
            tokio::spawn(async move { store.delete(id).await })
        };

        let deleted = deleter.await.unwrap();
        let updated = updater.await.unwrap();

        assert!(deleted.is_ok(), "round {round}: delete failed: {deleted:?}");
        assert!(
            matches!(updated, Ok(()) | Err(StoreError::NotFound(_))),
            "round {round}: update returned {updated:?}"
        );
        assert!(
            matches!(store.get(id).await, Err(StoreError::NotFound(x)) if x == id),
            "round {round}: record survived delete"
        );
    }
    assert!(store.list().await.unwrap().is_empty());
}
