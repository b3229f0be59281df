use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::UserId;

/// コマンド：書籍を貸し出す
///
/// IDはまだ持たない。`LoanStore::new_loan`で採番されて`Loan`になる。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLoan {
    pub user_id: UserId,
    pub title: String,
    pub loan_date: NaiveDate,
    pub due_date: NaiveDate,
}

/// コマンド：貸出内容を書き換える
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanChanges {
    pub user_id: UserId,
    pub title: String,
    pub loan_date: NaiveDate,
    pub due_date: NaiveDate,
}

/// コマンド：利用者を登録する
///
/// 役割とパスワードは未検証の文字列で受け取る。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub user_id: UserId,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

/// コマンド：利用者情報を書き換える
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserChanges {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
}
