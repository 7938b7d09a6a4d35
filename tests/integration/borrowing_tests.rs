//! Compound borrowing and return operations

use library_console::{models::BorrowingStatus, AppError, ErrorKind};

use crate::common::{add_book, borrowing, copies, gateway, in_days, seed, FileDatabase};

#[tokio::test]
async fn test_borrow_and_return_keep_copies_consistent() {
    let repository = gateway().await;
    let seed = seed(&repository).await;
    let book_id = add_book(&repository, seed.category_id, "9780441013593", "Dune", 2).await;

    let first = repository
        .create_borrowing(&borrowing(book_id, &seed, in_days(14)))
        .await
        .unwrap();
    assert_eq!(copies(&repository, book_id).await, (1, 2));

    let second = repository
        .create_borrowing(&borrowing(book_id, &seed, in_days(14)))
        .await
        .unwrap();
    assert_eq!(copies(&repository, book_id).await, (0, 2));

    let open = repository.list_current_borrowings().await.unwrap();
    assert_eq!(open.len(), 2);

    repository.return_book(first).await.unwrap();
    assert_eq!(copies(&repository, book_id).await, (1, 2));

    let returned = repository.get_borrowing(first).await.unwrap();
    assert_eq!(returned.status, BorrowingStatus::Returned);
    assert!(returned.is_returned());

    let still_open = repository.get_borrowing(second).await.unwrap();
    assert_eq!(still_open.status, BorrowingStatus::Borrowed);
    assert!(still_open.return_date.is_none());

    let open = repository.list_current_borrowings().await.unwrap();
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].borrowing_id, second);
}

#[tokio::test]
async fn test_no_copy_left_is_rejected_without_a_borrowing() {
    let repository = gateway().await;
    let seed = seed(&repository).await;
    let book_id = add_book(&repository, seed.category_id, "9780441013593", "Dune", 1).await;

    repository
        .create_borrowing(&borrowing(book_id, &seed, in_days(14)))
        .await
        .unwrap();

    let err = repository
        .create_borrowing(&borrowing(book_id, &seed, in_days(14)))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unavailable(_)));
    assert_eq!(err.kind(), ErrorKind::Rule);

    assert_eq!(copies(&repository, book_id).await, (0, 1));
    assert_eq!(repository.list_borrowings().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_book_with_zero_copies_never_lends() {
    let repository = gateway().await;
    let seed = seed(&repository).await;
    let book_id = add_book(&repository, seed.category_id, "9780000000001", "Out of Print", 0).await;

    let err = repository
        .create_borrowing(&borrowing(book_id, &seed, in_days(14)))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unavailable(_)));
    assert!(repository.list_borrowings().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_staff_rolls_back_the_decrement() {
    let repository = gateway().await;
    let seed = seed(&repository).await;
    let book_id = add_book(&repository, seed.category_id, "9780441013593", "Dune", 3).await;

    let mut data = borrowing(book_id, &seed, in_days(14));
    data.staff_id = 9999;
    let err = repository.create_borrowing(&data).await.unwrap_err();

    assert!(matches!(err, AppError::Transaction(_)), "got {:?}", err);
    assert_eq!(copies(&repository, book_id).await, (3, 3));
    assert!(repository.list_borrowings().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_book_or_member() {
    let repository = gateway().await;
    let seed = seed(&repository).await;
    let book_id = add_book(&repository, seed.category_id, "9780441013593", "Dune", 1).await;

    let err = repository
        .create_borrowing(&borrowing(4242, &seed, in_days(14)))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let mut data = borrowing(book_id, &seed, in_days(14));
    data.member_id = 4242;
    let err = repository.create_borrowing(&data).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    assert_eq!(copies(&repository, book_id).await, (1, 1));
}

#[tokio::test]
async fn test_second_return_is_rejected_and_changes_nothing() {
    let repository = gateway().await;
    let seed = seed(&repository).await;
    let book_id = add_book(&repository, seed.category_id, "9780441013593", "Dune", 2).await;

    let borrowing_id = repository
        .create_borrowing(&borrowing(book_id, &seed, in_days(14)))
        .await
        .unwrap();
    repository.return_book(borrowing_id).await.unwrap();
    let first_return = repository.get_borrowing(borrowing_id).await.unwrap().return_date;
    assert_eq!(copies(&repository, book_id).await, (2, 2));

    let err = repository.return_book(borrowing_id).await.unwrap_err();
    assert!(matches!(err, AppError::AlreadyReturned(id) if id == borrowing_id));

    assert_eq!(copies(&repository, book_id).await, (2, 2));
    assert_eq!(
        repository.get_borrowing(borrowing_id).await.unwrap().return_date,
        first_return
    );
}

#[tokio::test]
async fn test_return_unknown_borrowing() {
    let repository = gateway().await;
    let err = repository.return_book(77).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_return_never_exceeds_total_copies() {
    let repository = gateway().await;
    let seed = seed(&repository).await;
    let book_id = add_book(&repository, seed.category_id, "9780441013593", "Dune", 2).await;

    let borrowing_id = repository
        .create_borrowing(&borrowing(book_id, &seed, in_days(14)))
        .await
        .unwrap();
    // Someone restocked the shelf by hand in the meantime
    repository.update_book_availability(book_id, 2).await.unwrap();

    repository.return_book(borrowing_id).await.unwrap();
    assert_eq!(copies(&repository, book_id).await, (2, 2));
}

#[tokio::test]
async fn test_member_borrowings() {
    let repository = gateway().await;
    let seed = seed(&repository).await;
    let dune = add_book(&repository, seed.category_id, "9780441013593", "Dune", 1).await;
    let messiah = add_book(&repository, seed.category_id, "9780441172696", "Dune Messiah", 1).await;

    repository
        .create_borrowing(&borrowing(dune, &seed, in_days(14)))
        .await
        .unwrap();
    repository
        .create_borrowing(&borrowing(messiah, &seed, in_days(14)))
        .await
        .unwrap();

    let history = repository.list_member_borrowings(seed.member_id).await.unwrap();
    assert_eq!(history.len(), 2);
    assert!(history.iter().all(|b| b.member_name == "Ada Lovelace"));

    let err = repository.list_member_borrowings(555).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_concurrent_borrowers_wait_for_the_lock() {
    let database = FileDatabase::new("contention");
    let mut front_desk = database.open().await;
    let seed = seed(&front_desk).await;
    let book_id = add_book(&front_desk, seed.category_id, "9780441013593", "Dune", 1).await;
    let mut back_office = database.open().await;

    for _ in 0..10 {
        let data = borrowing(book_id, &seed, in_days(14));
        let (first, second) = tokio::join!(
            front_desk.create_borrowing(&data),
            back_office.create_borrowing(&data)
        );

        let (winner, loser) = match (first, second) {
            (Ok(id), Err(err)) | (Err(err), Ok(id)) => (id, err),
            other => panic!("expected exactly one borrowing, got {:?}", other),
        };
        assert!(matches!(loser, AppError::Unavailable(_)), "got {:?}", loser);
        assert_eq!(copies(&back_office, book_id).await, (0, 1));

        front_desk.return_book(winner).await.unwrap();
        assert_eq!(copies(&back_office, book_id).await, (1, 1));
    }

    assert!(front_desk.list_current_borrowings().await.unwrap().is_empty());
    front_desk.disconnect().await;
    back_office.disconnect().await;
}

#[tokio::test]
async fn test_engine_fault_during_return_changes_nothing() {
    let database = FileDatabase::new("return-fault");
    let mut repository = database.open().await;
    let seed = seed(&repository).await;
    let book_id = add_book(&repository, seed.category_id, "9780441013593", "Dune", 2).await;
    let borrowing_id = repository
        .create_borrowing(&borrowing(book_id, &seed, in_days(14)))
        .await
        .unwrap();

    // Make the restock statement fail after the borrowing row is closed
    let admin = sqlx::SqlitePool::connect(&database.url).await.unwrap();
    sqlx::query(
        r#"
        CREATE TRIGGER block_restock BEFORE UPDATE OF AvailableCopies ON Books
        BEGIN SELECT RAISE(ABORT, 'restock blocked'); END
        "#,
    )
    .execute(&admin)
    .await
    .unwrap();
    admin.close().await;

    let err = repository.return_book(borrowing_id).await.unwrap_err();
    assert!(matches!(err, AppError::Transaction(_)), "got {:?}", err);
    assert_eq!(err.kind(), ErrorKind::Transaction);

    let open = repository.get_borrowing(borrowing_id).await.unwrap();
    assert_eq!(open.status, BorrowingStatus::Borrowed);
    assert!(open.return_date.is_none());
    assert_eq!(copies(&repository, book_id).await, (1, 2));
    repository.disconnect().await;
}
