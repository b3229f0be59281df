use rusty_library_loans::adapters::mock::Inventory;
use rusty_library_loans::application::{LibraryError, ReturnStore};
use rusty_library_loans::domain::LoanChanges;
use rusty_library_loans::domain::value_objects::*;
use std::sync::Arc;

mod common;

use common::{TestData, date, new_loan};

// ============================================================================
// 在庫との整合性
// ============================================================================

#[test]
fn test_single_copy_is_reserved_and_released() {
    let data = TestData::new();
    let inventory = Arc::new(Inventory::new());
    inventory.add_book("Dune", 1);
    let mut store = data.loan_store(&inventory);

    // 利用者Aが借りる
    let first = store.new_loan(new_loan(1, "Dune", date(2024, 3, 1), date(2024, 3, 15)));
    let first_id = store.create(first).unwrap();
    assert_eq!(inventory.quantity_of("Dune"), Some(0));

    // 利用者Bは借りられない
    let second = store.new_loan(new_loan(2, "Dune", date(2024, 3, 2), date(2024, 3, 16)));
    assert!(matches!(
        store.create(second.clone()),
        Err(LibraryError::Unavailable(title)) if title == "Dune"
    ));
    assert_eq!(store.list_all().len(), 1);

    // Aの貸出を削除すると在庫が戻る
    store.delete(first_id).unwrap();
    assert_eq!(inventory.quantity_of("Dune"), Some(1));

    // 今度はBが借りられる
    let second_id = store.create(second).unwrap();
    assert_ne!(first_id, second_id);
    assert_eq!(inventory.quantity_of("Dune"), Some(0));
    assert_eq!(store.list_all().len(), 1);
    assert_eq!(store.list_all()[0].user_id, UserId::new(2));
}

#[test]
fn test_unknown_title_is_rejected_without_side_effects() {
    let data = TestData::new();
    let inventory = Arc::new(Inventory::new());
    let mut store = data.loan_store(&inventory);

    let loan = store.new_loan(new_loan(1, "Nowhere", date(2024, 3, 1), date(2024, 3, 15)));
    assert!(matches!(
        store.create(loan),
        Err(LibraryError::ReferenceNotFound(_))
    ));
    assert!(store.list_all().is_empty());
    assert!(!data.loans_path().exists());
    assert_eq!(inventory.save_count(), 0);
}

#[test]
fn test_modify_moves_reservation_between_titles() {
    let data = TestData::new();
    let inventory = Arc::new(Inventory::new());
    inventory.add_book("Dune", 1);
    inventory.add_book("Hyperion", 2);
    let mut store = data.loan_store(&inventory);

    let loan = store.new_loan(new_loan(1, "Dune", date(2024, 3, 1), date(2024, 3, 15)));
    let loan_id = store.create(loan).unwrap();

    store
        .modify(
            loan_id,
            LoanChanges {
                user_id: UserId::new(1),
                title: "Hyperion".to_string(),
                loan_date: date(2024, 3, 1),
                due_date: date(2024, 3, 20),
            },
        )
        .unwrap();

    assert_eq!(inventory.quantity_of("Dune"), Some(1));
    assert_eq!(inventory.quantity_of("Hyperion"), Some(1));
    assert_eq!(store.find(loan_id).unwrap().title, "Hyperion");
}

#[test]
fn test_delete_after_catalog_removal_still_deletes() {
    let data = TestData::new();
    let inventory = Arc::new(Inventory::new());
    inventory.add_book("Dune", 1);
    let mut store = data.loan_store(&inventory);

    let loan = store.new_loan(new_loan(1, "Dune", date(2024, 3, 1), date(2024, 3, 15)));
    let loan_id = store.create(loan).unwrap();
    inventory.remove_book("Dune");

    assert!(store.delete(loan_id).is_ok());
    assert!(store.list_all().is_empty());
    assert_eq!(inventory.quantity_of("Dune"), None);
}

// ============================================================================
// 検索と永続化
// ============================================================================

#[test]
fn test_search_by_title_is_case_insensitive() {
    let data = TestData::new();
    let inventory = Arc::new(Inventory::new());
    inventory.add_book("Dune", 3);
    inventory.add_book("Dune Messiah", 1);
    let mut store = data.loan_store(&inventory);

    for (user, title) in [(1, "Dune"), (2, "Dune"), (3, "Dune Messiah")] {
        let loan = store.new_loan(new_loan(user, title, date(2024, 3, 1), date(2024, 3, 15)));
        store.create(loan).unwrap();
    }

    assert_eq!(store.search_by_title("dune").len(), 2);
    assert_eq!(store.search_by_title("DUNE MESSIAH").len(), 1);
    assert!(store.search_by_title("Hyperion").is_empty());
}

#[test]
fn test_reload_keeps_ids_and_continues_sequence() {
    let data = TestData::new();
    let inventory = Arc::new(Inventory::new());
    inventory.add_book("Dune", 5);

    let mut store = data.loan_store(&inventory);
    let a = store.new_loan(new_loan(1, "Dune", date(2024, 3, 1), date(2024, 3, 15)));
    let b = store.new_loan(new_loan(2, "Dune", date(2024, 3, 2), date(2024, 3, 16)));
    let a_id = store.create(a).unwrap();
    let b_id = store.create(b).unwrap();
    store.extend(b_id, 7).unwrap();

    // 別プロセスの起動を想定して読み直す
    let mut reloaded = data.loan_store(&inventory);
    assert_eq!(reloaded.load(), 2);
    assert_eq!(reloaded.find(a_id).unwrap().user_id, UserId::new(1));
    assert_eq!(reloaded.find(b_id).unwrap().due_date, date(2024, 3, 23));

    let c = reloaded.new_loan(new_loan(3, "Dune", date(2024, 3, 3), date(2024, 3, 17)));
    assert!(c.loan_id > a_id && c.loan_id > b_id);
}

#[test]
fn test_import_returns_from_saved_loans() {
    let data = TestData::new();
    let inventory = Arc::new(Inventory::new());
    inventory.add_book("Dune", 2);
    let mut loans = data.loan_store(&inventory);
    let loan = loans.new_loan(new_loan(1, "Dune", date(2024, 3, 1), date(2024, 3, 15)));
    let loan_id = loans.create(loan).unwrap();

    let mut returns = ReturnStore::new(data.returns_path());
    assert_eq!(returns.import_from(loans.path()).unwrap(), 1);
    // 二度目は何も取り込まない
    assert_eq!(returns.import_from(loans.path()).unwrap(), 0);

    let imported = returns.find(loan_id).unwrap();
    assert!(!imported.is_returned());
    assert_eq!(imported.due_date, date(2024, 3, 15));
}
