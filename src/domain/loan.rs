use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{ExtendLoanError, LoanChanges, LoanId, NewLoan, UserId};

/// Loan - 1冊の書籍の1回の貸出
///
/// 書名は書籍の自然キーとして在庫の検索に使われる。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    // 識別子
    pub loan_id: LoanId,

    // 他の集約への参照
    pub user_id: UserId,
    pub title: String,

    // 貸出管理の責務
    pub loan_date: NaiveDate,
    pub due_date: NaiveDate,
}

/// 重複判定用の指紋
///
/// 業務フィールドをすべて含み、識別子は含めない。
/// 起動と終了を繰り返すうちにIDだけ異なる同一貸出が紛れ込むのを防ぐ。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LoanFingerprint {
    pub user_id: UserId,
    pub title: String,
    pub loan_date: NaiveDate,
    pub due_date: NaiveDate,
}

impl Loan {
    pub fn fingerprint(&self) -> LoanFingerprint {
        LoanFingerprint {
            user_id: self.user_id,
            title: self.title.clone(),
            loan_date: self.loan_date,
            due_date: self.due_date,
        }
    }

    /// 書名が一致するか（大文字小文字を区別しない完全一致）
    pub fn has_title(&self, title: &str) -> bool {
        same_title(&self.title, title)
    }
}

/// 書名の比較規則（大文字小文字を区別しない完全一致）
///
/// 貸出の検索と在庫の書名検索で共通。
pub fn same_title(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// 純粋関数：採番済みIDでLoanを組み立てる
pub fn new_loan(loan_id: LoanId, cmd: NewLoan) -> Loan {
    Loan {
        loan_id,
        user_id: cmd.user_id,
        title: cmd.title,
        loan_date: cmd.loan_date,
        due_date: cmd.due_date,
    }
}

/// 純粋関数：返却期限を延長する
///
/// ビジネスルール：
/// - 延長日数は負でもよい（期限の前倒し）
/// - 下限はない。返却期限が貸出日より前になっても受け付ける
///
/// # エラー
/// 計算結果が日付の表現範囲を超えた場合のみ`DueDateOutOfRange`
pub fn extend_loan(loan: &Loan, extra_days: i64) -> Result<Loan, ExtendLoanError> {
    let delta = Duration::try_days(extra_days).ok_or(ExtendLoanError::DueDateOutOfRange)?;
    let due_date = loan
        .due_date
        .checked_add_signed(delta)
        .ok_or(ExtendLoanError::DueDateOutOfRange)?;

    Ok(Loan {
        due_date,
        ..loan.clone()
    })
}

/// 純粋関数：貸出内容を書き換える（IDは保持）
pub fn modify_loan(loan: &Loan, changes: LoanChanges) -> Loan {
    Loan {
        loan_id: loan.loan_id,
        user_id: changes.user_id,
        title: changes.title,
        loan_date: changes.loan_date,
        due_date: changes.due_date,
    }
}
