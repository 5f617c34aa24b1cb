use roster_core::{
    AddressFields, NewAddress, NewStudent, ReadOptions, RemoveOptions, RosterError, RosterStore,
    ValidationError,
};

fn metropolis() -> NewAddress {
    NewAddress::new("Metropolis", "Main St", 5)
}

#[test]
fn create_without_address_then_get_expanded_has_no_address() {
    let store = RosterStore::open_in_memory().unwrap();

    let created = store
        .create_without_address(&NewStudent::new("Jane", "Doe", 20))
        .unwrap();
    assert!(!created.has_address());

    let loaded = store.get(created.id, ReadOptions::EXPANDED).unwrap();
    assert_eq!(loaded.first_name, "Jane");
    assert_eq!(loaded.last_name, "Doe");
    assert_eq!(loaded.age, 20);
    assert!(loaded.address.is_none());
    assert_eq!(store.address_count().unwrap(), 0);
}

#[test]
fn create_with_address_returns_full_view() {
    let store = RosterStore::open_in_memory().unwrap();

    let created = store
        .create_with_address(&NewStudent::new("Jane", "Doe", 20), &metropolis())
        .unwrap();
    assert_eq!(
        created.address,
        Some(AddressFields {
            city: "Metropolis".to_string(),
            street: "Main St".to_string(),
            street_number: 5,
        })
    );
}

#[test]
fn get_omits_address_unless_expanded() {
    let store = RosterStore::open_in_memory().unwrap();
    let created = store
        .create_with_address(&NewStudent::new("Jane", "Doe", 20), &metropolis())
        .unwrap();

    let bare = store.get(created.id, ReadOptions::default()).unwrap();
    assert!(bare.address.is_none());

    let expanded = store.get(created.id, ReadOptions::EXPANDED).unwrap();
    assert_eq!(expanded.address, created.address);
}

#[test]
fn list_follows_creation_order_and_expansion_rule() {
    let store = RosterStore::open_in_memory().unwrap();
    let first = store
        .create_with_address(&NewStudent::new("Jane", "Doe", 20), &metropolis())
        .unwrap();
    let second = store
        .create_without_address(&NewStudent::new("Ann", "Lee", 21))
        .unwrap();
    let third = store
        .create_with_address(
            &NewStudent::new("Bob", "Ray", 22),
            &NewAddress::new("Gotham", "Park Ave", 12),
        )
        .unwrap();

    let bare = store.list(ReadOptions::default()).unwrap();
    let ids = bare.iter().map(|view| view.id).collect::<Vec<_>>();
    assert_eq!(ids, vec![first.id, second.id, third.id]);
    assert!(bare.iter().all(|view| view.address.is_none()));

    let expanded = store.list(ReadOptions::EXPANDED).unwrap();
    assert_eq!(expanded[0].address, first.address);
    assert!(expanded[1].address.is_none());
    assert_eq!(
        expanded[2].address.as_ref().map(|a| a.city.as_str()),
        Some("Gotham")
    );

    // Restartable: a second pass yields the same sequence.
    assert_eq!(store.list(ReadOptions::EXPANDED).unwrap(), expanded);
}

#[test]
fn list_on_empty_store_is_empty() {
    let store = RosterStore::open_in_memory().unwrap();
    assert!(store.list(ReadOptions::EXPANDED).unwrap().is_empty());
}

#[test]
fn update_overwrites_scalars_and_keeps_address() {
    let store = RosterStore::open_in_memory().unwrap();
    let created = store
        .create_with_address(&NewStudent::new("Jane", "Doe", 20), &metropolis())
        .unwrap();
    let before = store.get(created.id, ReadOptions::EXPANDED).unwrap();

    let updated = store
        .update(created.id, &NewStudent::new("Janet", "Dough", 21))
        .unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.first_name, "Janet");
    assert_eq!(updated.last_name, "Dough");
    assert_eq!(updated.age, 21);
    assert!(updated.address.is_none(), "update never reports address");

    let after = store.get(created.id, ReadOptions::EXPANDED).unwrap();
    assert_eq!(after.address, before.address);
    assert_eq!(after.first_name, "Janet");
}

#[test]
fn update_keeps_student_without_address_addressless() {
    let store = RosterStore::open_in_memory().unwrap();
    let created = store
        .create_without_address(&NewStudent::new("Jane", "Doe", 20))
        .unwrap();

    store
        .update(created.id, &NewStudent::new("Jane", "Doe", 30))
        .unwrap();

    let after = store.get(created.id, ReadOptions::EXPANDED).unwrap();
    assert!(after.address.is_none());
    assert_eq!(after.age, 30);
}

#[test]
fn missing_ids_fail_with_not_found() {
    let store = RosterStore::open_in_memory().unwrap();

    assert!(matches!(
        store.get(404, ReadOptions::default()),
        Err(RosterError::NotFound(404))
    ));
    assert!(matches!(
        store.remove(404, RemoveOptions::PRUNE_ORPHANED_ADDRESS),
        Err(RosterError::NotFound(404))
    ));
    assert!(matches!(
        store.update(404, &NewStudent::new("Jane", "Doe", 20)),
        Err(RosterError::NotFound(404))
    ));
}

#[test]
fn remove_twice_fails_the_second_time() {
    let store = RosterStore::open_in_memory().unwrap();
    let created = store
        .create_without_address(&NewStudent::new("Jane", "Doe", 20))
        .unwrap();

    assert_eq!(store.remove(created.id, RemoveOptions::default()).unwrap(), 1);
    assert!(matches!(
        store.remove(created.id, RemoveOptions::default()),
        Err(RosterError::NotFound(id)) if id == created.id
    ));
}

#[test]
fn ids_are_not_reused_after_remove() {
    let store = RosterStore::open_in_memory().unwrap();
    let first = store
        .create_without_address(&NewStudent::new("Jane", "Doe", 20))
        .unwrap();
    store.remove(first.id, RemoveOptions::default()).unwrap();

    let second = store
        .create_without_address(&NewStudent::new("Ann", "Lee", 21))
        .unwrap();
    assert!(second.id > first.id);
}

#[test]
fn invalid_fields_are_rejected_without_writes() {
    let store = RosterStore::open_in_memory().unwrap();

    let cases = [
        (
            NewStudent::new("", "Doe", 20),
            metropolis(),
            ValidationError::BlankFirstName,
        ),
        (
            NewStudent::new("Jane", " ", 20),
            metropolis(),
            ValidationError::BlankLastName,
        ),
        (
            NewStudent::new("Jane", "Doe", -3),
            metropolis(),
            ValidationError::NegativeAge(-3),
        ),
        (
            NewStudent::new("Jane", "Doe", 20),
            NewAddress::new("", "Main St", 5),
            ValidationError::BlankCity,
        ),
        (
            NewStudent::new("Jane", "Doe", 20),
            NewAddress::new("Metropolis", "", 5),
            ValidationError::BlankStreet,
        ),
        (
            NewStudent::new("Jane", "Doe", 20),
            NewAddress::new("Metropolis", "Main St", -1),
            ValidationError::NonPositiveStreetNumber(-1),
        ),
    ];

    for (student, address, expected) in cases {
        match store.create_with_address(&student, &address) {
            Err(RosterError::Validation(actual)) => assert_eq!(actual, expected),
            other => panic!("expected validation error {expected:?}, got {other:?}"),
        }
    }

    assert_eq!(store.student_count().unwrap(), 0);
    assert_eq!(store.address_count().unwrap(), 0);
}

#[test]
fn update_rejects_invalid_fields_and_keeps_row() {
    let store = RosterStore::open_in_memory().unwrap();
    let created = store
        .create_without_address(&NewStudent::new("Jane", "Doe", 20))
        .unwrap();

    let err = store
        .update(created.id, &NewStudent::new("Jane", "Doe", -1))
        .unwrap_err();
    assert!(matches!(
        err,
        RosterError::Validation(ValidationError::NegativeAge(-1))
    ));
    assert_eq!(
        store.get(created.id, ReadOptions::default()).unwrap().age,
        20
    );
}

#[test]
fn file_backed_store_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roster.db");

    let created = {
        let store = RosterStore::open(&path).unwrap();
        store
            .create_with_address(&NewStudent::new("Jane", "Doe", 20), &metropolis())
            .unwrap()
    };

    let reopened = RosterStore::open(&path).unwrap();
    let loaded = reopened.get(created.id, ReadOptions::EXPANDED).unwrap();
    assert_eq!(loaded, created);
}
