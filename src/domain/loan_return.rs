use chrono::NaiveDate;
use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};

use super::{Loan, LoanId, UserId};

/// 延滞1日あたりの延滞料（通貨単位）
pub const PENALTY_PER_DAY: u64 = 50;

/// 返却記録
///
/// 貸出ログから取り込んだスナップショット。貸出との間に生きた参照はなく、
/// 取り込み後は独立して永続化される。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanReturn {
    pub loan_id: LoanId,
    pub user_id: UserId,
    pub title: String,
    pub loan_date: NaiveDate,
    pub due_date: NaiveDate,
    /// 実際の返却日（Noneは未返却）
    pub returned_on: Option<NaiveDate>,
}

/// 重複判定用の指紋（返却記録はすべてのフィールドを含む）
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReturnFingerprint {
    pub loan_id: LoanId,
    pub user_id: UserId,
    pub title: String,
    pub loan_date: NaiveDate,
    pub due_date: NaiveDate,
    pub returned_on: Option<NaiveDate>,
}

impl LoanReturn {
    /// 未返却の返却記録を貸出から作る
    pub fn from_loan(loan: &Loan) -> Self {
        Self {
            loan_id: loan.loan_id,
            user_id: loan.user_id,
            title: loan.title.clone(),
            loan_date: loan.loan_date,
            due_date: loan.due_date,
            returned_on: None,
        }
    }

    pub fn fingerprint(&self) -> ReturnFingerprint {
        ReturnFingerprint {
            loan_id: self.loan_id,
            user_id: self.user_id,
            title: self.title.clone(),
            loan_date: self.loan_date,
            due_date: self.due_date,
            returned_on: self.returned_on,
        }
    }

    pub fn is_returned(&self) -> bool {
        self.returned_on.is_some()
    }

    /// 延滞日数（期限内・未返却なら0）
    pub fn days_late(&self) -> u64 {
        match self.returned_on {
            Some(returned_on) if returned_on > self.due_date => {
                (returned_on - self.due_date).num_days().unsigned_abs()
            }
            _ => 0,
        }
    }
}

/// 純粋関数：延滞料を計算する
///
/// 実返却日が返却期限より後の場合のみ、延滞日数 × 50。
pub fn compute_penalty(loan_return: &LoanReturn) -> u64 {
    loan_return.days_late() * PENALTY_PER_DAY
}

/// 純粋関数：利用者ごとの延滞料合計
///
/// 延滞料が発生している利用者のみ、利用者IDの昇順。
pub fn penalties_by_user(returns: &[LoanReturn]) -> BTreeMap<UserId, u64> {
    let mut totals = BTreeMap::new();
    for loan_return in returns {
        let penalty = compute_penalty(loan_return);
        if penalty > 0 {
            *totals.entry(loan_return.user_id).or_insert(0) += penalty;
        }
    }
    totals
}
