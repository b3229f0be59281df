use rusty_library_loans::adapters::csv::CsvInventory;
use rusty_library_loans::application::{
    LibraryError, LoanStore, ReturnStore, UserStore, loan_statistics, penalty_report, report,
};
use rusty_library_loans::domain::Role;
use rusty_library_loans::domain::value_objects::*;
use std::fs;
use std::sync::Arc;

mod common;

use common::{TestData, date, new_loan, new_user};

// ============================================================================
// E2Eテスト：実際のCSVファイルを使った一連の流れ
// ============================================================================

/// 在庫ファイルを用意して開く
fn open_inventory(data: &TestData, content: &str) -> Arc<CsvInventory> {
    let path = data.inventory_path();
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    Arc::new(CsvInventory::open(&path).unwrap())
}

#[test]
fn test_full_loan_cycle_over_csv_files() {
    let data = TestData::new();
    let inventory = open_inventory(&data, "Titre;Quantite\nDune;2\nHyperion;1\n");

    // 1. 貸出を作成
    let mut loans = LoanStore::new(data.loans_path(), inventory.clone());
    let first = loans.new_loan(new_loan(7, "Dune", date(2024, 3, 1), date(2024, 3, 15)));
    let second = loans.new_loan(new_loan(8, "Hyperion", date(2024, 3, 2), date(2024, 3, 16)));
    let third = loans.new_loan(new_loan(7, "Dune", date(2024, 3, 5), date(2024, 3, 19)));
    let first_id = loans.create(first).unwrap();
    let second_id = loans.create(second).unwrap();
    let third_id = loans.create(third).unwrap();

    // 在庫ファイルにも反映されている
    let reopened = CsvInventory::open(data.inventory_path()).unwrap();
    let quantities: Vec<(String, u32)> = reopened
        .books()
        .into_iter()
        .map(|book| (book.title, book.available_quantity))
        .collect();
    assert_eq!(
        quantities,
        vec![("Dune".to_string(), 0), ("Hyperion".to_string(), 0)]
    );

    // 2. 貸出ログから読み直す
    let mut reloaded = LoanStore::new(data.loans_path(), inventory.clone());
    assert_eq!(reloaded.load(), 3);
    assert_eq!(reloaded.list_all(), loans.list_all());

    // 3. 返却記録を取り込み、実返却日を記録する
    let mut returns = ReturnStore::new(data.returns_path());
    assert_eq!(returns.import_from(&data.loans_path()).unwrap(), 3);
    returns
        .set_actual_return_date(first_id, date(2024, 3, 18))
        .unwrap();
    returns
        .set_actual_return_date(second_id, date(2024, 3, 10))
        .unwrap();

    let mut returns_reloaded = ReturnStore::new(data.returns_path());
    assert_eq!(returns_reloaded.load(), 3);
    assert_eq!(returns_reloaded.pending().len(), 1);
    assert_eq!(returns_reloaded.pending()[0].loan_id, third_id);
    assert_eq!(returns_reloaded.total_penalties(), 150);
    assert_eq!(
        returns_reloaded.penalties_by_user().get(&UserId::new(7)),
        Some(&150)
    );
    assert_eq!(
        penalty_report(&returns_reloaded.list()),
        "Penalties:\nUser 7: 150\nTotal: 150\n"
    );

    // 4. ファイルを正本とする集計
    let statistics = loan_statistics(&data.loans_path());
    assert_eq!(statistics.total_loans, 3);
    assert_eq!(statistics.distinct_users(), 2);
    assert_eq!(
        report::general_report(&data.loans_path()),
        "General report:\n\
         Most borrowed titles:\nDune: 2 loan(s)\nHyperion: 1 loan(s)\n\
         \n\
         Most active users:\nUser 7: 2 loan(s)\nUser 8: 1 loan(s)\n"
    );
}

#[test]
fn test_import_accepts_day_first_dates_and_rejects_garbage() {
    let data = TestData::new();
    let loans_path = data.loans_path();
    fs::create_dir_all(loans_path.parent().unwrap()).unwrap();

    fs::write(
        &loans_path,
        "Id;IdUtilisateur;TitreLivre;DateEmprunt;DateRetour\n\
         1;7;Dune;01/03/2024;15/03/2024\n\
         2;8;Hyperion\n",
    )
    .unwrap();
    let mut returns = ReturnStore::new(data.returns_path());
    assert_eq!(returns.import_from(&loans_path).unwrap(), 1);
    assert_eq!(
        returns.find(LoanId::new(1)).unwrap().due_date,
        date(2024, 3, 15)
    );

    fs::write(
        &loans_path,
        "Id;IdUtilisateur;TitreLivre;DateEmprunt;DateRetour\n\
         3;7;Dune;2024-03-01;2024-03-15\n\
         4;8;Hyperion;yesterday;2024-03-16\n",
    )
    .unwrap();
    assert!(matches!(
        returns.import_from(&loans_path),
        Err(LibraryError::MalformedDate(_))
    ));
    assert_eq!(returns.list().len(), 1);
}

#[test]
fn test_users_are_validated_and_persisted() {
    let data = TestData::new();
    let mut users = UserStore::new(data.users_path());

    users
        .create(new_user(1, "Alice", "secret1", "Admin"))
        .unwrap();
    users
        .create(new_user(2, "Bob", "hunter22", "Member"))
        .unwrap();
    assert!(matches!(
        users.create(new_user(3, "Carol", "secret3", "Guest")),
        Err(LibraryError::InvalidRole(_))
    ));
    assert!(matches!(
        users.create(new_user(3, "Carol", "abc", "Member")),
        Err(LibraryError::InvalidPassword { .. })
    ));
    assert!(matches!(
        users.create(new_user(3, "Bob", "secret3", "Member")),
        Err(LibraryError::DuplicateEntry(_))
    ));

    let mut reloaded = UserStore::new(data.users_path());
    assert_eq!(reloaded.load(), 2);
    let alice = reloaded.find(UserId::new(1)).unwrap();
    assert_eq!(alice.role, Role::Admin);
    assert_eq!(alice.password.as_str(), "secret1");
}

#[test]
fn test_legacy_role_spellings_are_normalised() {
    let data = TestData::new();
    let users_path = data.users_path();
    fs::create_dir_all(users_path.parent().unwrap()).unwrap();
    fs::write(
        &users_path,
        "id;nom;email;motDePasse;role\n\
         1;Alice;alice@example.com;secret1;Bibliothecaire\n\
         2;Bob;bob@example.com;secret2;Membre\n\
         3;Eve;eve@example.com;secret3;Guest\n",
    )
    .unwrap();

    let mut users = UserStore::new(&users_path);
    assert_eq!(users.load(), 2);
    users.save();

    let content = fs::read_to_string(&users_path).unwrap();
    assert!(content.contains("1;Alice;alice@example.com;secret1;Librarian"));
    assert!(content.contains("2;Bob;bob@example.com;secret2;Member"));
    assert!(!content.contains("Eve"));
}
