#![allow(dead_code)]

use chrono::NaiveDate;
use rusty_library_loans::adapters::mock::Inventory;
use rusty_library_loans::application::LoanStore;
use rusty_library_loans::domain::value_objects::*;
use rusty_library_loans::domain::{NewLoan, NewUser};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

/// テスト用のデータディレクトリ
///
/// テストごとに独立した一時ディレクトリを作成します。
/// `TempDir`がドロップされるとファイルも削除されるため、
/// テスト本体で保持しておく必要があります。
pub struct TestData {
    pub dir: TempDir,
}

impl TestData {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    pub fn loans_path(&self) -> PathBuf {
        self.dir.path().join("data").join("emprunts.csv")
    }

    pub fn returns_path(&self) -> PathBuf {
        self.dir.path().join("data").join("retours.csv")
    }

    pub fn users_path(&self) -> PathBuf {
        self.dir.path().join("data").join("utilisateurs.csv")
    }

    pub fn inventory_path(&self) -> PathBuf {
        self.dir.path().join("data").join("livres.csv")
    }

    /// インメモリ在庫を注入したLoanStore
    pub fn loan_store(&self, inventory: &Arc<Inventory>) -> LoanStore {
        LoanStore::new(self.loans_path(), inventory.clone())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn new_loan(user_id: u32, title: &str, loan_date: NaiveDate, due_date: NaiveDate) -> NewLoan {
    NewLoan {
        user_id: UserId::new(user_id),
        title: title.to_string(),
        loan_date,
        due_date,
    }
}

pub fn new_user(user_id: u32, name: &str, password: &str, role: &str) -> NewUser {
    NewUser {
        user_id: UserId::new(user_id),
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        password: password.to_string(),
        role: role.to_string(),
    }
}
