//! Members, staff and reservations

use rstest::rstest;

use library_console::{
    models::{MemberInput, MembershipStatus, ReservationStatus, StaffInput},
    AppError, ErrorKind,
};

use crate::common::{add_book, add_member, borrowing, copies, gateway, in_days, seed};

#[tokio::test]
async fn test_member_lifecycle() {
    let repository = gateway().await;
    let id = add_member(&repository, "ada@example.org").await;

    let member = repository.get_member(id).await.unwrap();
    assert_eq!(member.full_name(), "Ada Lovelace");
    assert_eq!(member.membership_status, MembershipStatus::Active);
    assert_eq!(member.membership_date, crate::common::today());

    repository
        .update_member(
            id,
            &MemberInput {
                first_name: "Augusta Ada".to_string(),
                last_name: "King".to_string(),
                email: "ada.king@example.org".to_string(),
                phone: None,
                address: Some("St James's Square".to_string()),
            },
        )
        .await
        .unwrap();
    let member = repository.get_member(id).await.unwrap();
    assert_eq!(member.full_name(), "Augusta Ada King");
    assert_eq!(member.phone, None);

    repository.delete_member(id).await.unwrap();
    assert!(matches!(repository.get_member(id).await, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_members_sorted_by_last_then_first_name() {
    let repository = gateway().await;
    for (first, last, email) in [
        ("Grace", "Hopper", "grace@example.org"),
        ("Alan", "Turing", "alan@example.org"),
        ("Anita", "Borg", "anita@example.org"),
    ] {
        repository
            .create_member(&MemberInput {
                first_name: first.to_string(),
                last_name: last.to_string(),
                email: email.to_string(),
                phone: None,
                address: None,
            })
            .await
            .unwrap();
    }

    let names: Vec<String> = repository
        .list_members()
        .await
        .unwrap()
        .iter()
        .map(|m| m.last_name.clone())
        .collect();
    assert_eq!(names, ["Borg", "Hopper", "Turing"]);
}

#[tokio::test]
async fn test_duplicate_or_invalid_email() {
    let repository = gateway().await;
    add_member(&repository, "ada@example.org").await;

    let input = MemberInput {
        first_name: "Ada".to_string(),
        last_name: "Byron".to_string(),
        email: "ada@example.org".to_string(),
        phone: None,
        address: None,
    };
    let err = repository.create_member(&input).await.unwrap_err();
    assert!(err.is_constraint_violation());

    let err = repository
        .create_member(&MemberInput {
            email: "not an email".to_string(),
            ..input
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(repository.list_members().await.unwrap().len(), 1);
}

#[rstest]
#[case(MembershipStatus::Inactive)]
#[case(MembershipStatus::Suspended)]
#[tokio::test]
async fn test_only_active_members_borrow(#[case] status: MembershipStatus) {
    let repository = gateway().await;
    let seed = seed(&repository).await;
    let book_id = add_book(&repository, seed.category_id, "9780441013593", "Dune", 1).await;

    repository
        .update_member_status(seed.member_id, status)
        .await
        .unwrap();
    assert_eq!(
        repository.get_member(seed.member_id).await.unwrap().membership_status,
        status
    );

    let err = repository
        .create_borrowing(&borrowing(book_id, &seed, in_days(14)))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BusinessRule(_)));
    assert_eq!(copies(&repository, book_id).await, (1, 1));

    repository
        .update_member_status(seed.member_id, MembershipStatus::Active)
        .await
        .unwrap();
    repository
        .create_borrowing(&borrowing(book_id, &seed, in_days(14)))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_member_status_edge_cases() {
    let repository = gateway().await;
    let id = add_member(&repository, "ada@example.org").await;

    let err = repository
        .update_member_status(id, MembershipStatus::Unknown)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    assert!(matches!(
        repository
            .update_member_status(999, MembershipStatus::Inactive)
            .await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_staff_lifecycle() {
    let repository = gateway().await;
    let input = StaffInput {
        first_name: "Melvil".to_string(),
        last_name: "Dewey".to_string(),
        email: "melvil@library.test".to_string(),
        phone: None,
        position: Some("Cataloguer".to_string()),
        salary: 30000.0,
    };
    let id = repository.create_staff(&input).await.unwrap();

    let staff = repository.get_staff(id).await.unwrap();
    assert_eq!(staff.full_name(), "Melvil Dewey");
    assert_eq!(staff.position.as_deref(), Some("Cataloguer"));

    repository
        .update_staff(
            id,
            &StaffInput {
                position: Some("Head Librarian".to_string()),
                salary: 35000.0,
                ..input.clone()
            },
        )
        .await
        .unwrap();
    let staff = repository.list_staff().await.unwrap();
    assert_eq!(staff.len(), 1);
    assert_eq!(staff[0].position.as_deref(), Some("Head Librarian"));

    let err = repository
        .create_staff(&StaffInput {
            salary: -1.0,
            email: "other@library.test".to_string(),
            ..input
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    repository.delete_staff(id).await.unwrap();
    assert!(matches!(repository.get_staff(id).await, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_reservation_lifecycle() {
    let repository = gateway().await;
    let seed = seed(&repository).await;
    let book_id = add_book(&repository, seed.category_id, "9780441013593", "Dune", 1).await;

    let id = repository
        .create_reservation(book_id, seed.member_id)
        .await
        .unwrap();

    let reservations = repository.list_reservations().await.unwrap();
    assert_eq!(reservations.len(), 1);
    let reservation = &reservations[0];
    assert_eq!(reservation.reservation_id, id);
    assert_eq!(reservation.book_title, "Dune");
    assert_eq!(reservation.member_name, "Ada Lovelace");
    assert!(reservation.is_pending());
    let expiry = reservation.expiry_date.unwrap();
    assert_eq!((expiry - reservation.reservation_date).num_days(), 7);

    repository.cancel_reservation(id).await.unwrap();
    assert_eq!(
        repository.list_reservations().await.unwrap()[0].status,
        ReservationStatus::Cancelled
    );

    let err = repository.cancel_reservation(id).await.unwrap_err();
    assert!(matches!(err, AppError::BusinessRule(_)));
    assert!(matches!(
        repository.cancel_reservation(999).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_reservation_for_unknown_book() {
    let repository = gateway().await;
    let seed = seed(&repository).await;
    let err = repository
        .create_reservation(404, seed.member_id)
        .await
        .unwrap_err();
    assert!(err.is_constraint_violation());
    assert!(repository.list_reservations().await.unwrap().is_empty());
}
