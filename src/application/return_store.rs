use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use super::errors::{LibraryError, Result};
use crate::adapters::csv::{loan_log, return_log};
use crate::domain::{self, LoanId, LoanReturn, UserId, compute_penalty, dates, dedup};

/// 返却ストア
///
/// 貸出ログから派生した返却記録を、貸出とは独立に保持・永続化する。
/// 取り込み後に貸出側と同期することはない（スナップショット）。
///
/// 不変条件：貸出IDごとに返却記録は高々1件。
pub struct ReturnStore {
    returns: Vec<LoanReturn>,
    path: PathBuf,
}

impl ReturnStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            returns: Vec::new(),
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 貸出ログから未返却の返却記録を取り込む
    ///
    /// 日付はdd/MM/yyyy、次にyyyy-MM-ddの順で解釈する。フィールド不足や
    /// IDが整数でない行は黙って読み飛ばす。既に返却記録のある貸出IDは
    /// 取り込まない。日付が解釈できない行があれば何も取り込まずに失敗する。
    ///
    /// 貸出ログが読めない場合はエラーを記録し、0件として扱う。
    ///
    /// # 戻り値
    /// 新たに取り込んだ件数
    ///
    /// # エラー
    /// - MalformedDate: どの形式にも一致しない日付があった
    pub fn import_from(&mut self, loan_log_path: &Path) -> Result<usize> {
        let rows = match loan_log::read(loan_log_path) {
            Ok(rows) => rows,
            Err(e) => {
                tracing::error!(
                    "Failed to read loan log {}: {}",
                    loan_log_path.display(),
                    e
                );
                return Ok(0);
            }
        };

        // 1. すべての行を先に解釈する（途中で失敗しても状態は変わらない）
        let mut known: HashSet<LoanId> = self.returns.iter().map(|r| r.loan_id).collect();
        let mut imported = Vec::new();
        for row in rows {
            let loan = match row.to_loan(dates::parse_lenient) {
                Ok(loan) => loan,
                Err(e) => match LibraryError::from(e) {
                    err @ LibraryError::MalformedDate(_) => return Err(err),
                    other => {
                        tracing::debug!("Skipping loan record during import: {}", other);
                        continue;
                    }
                },
            };

            if known.insert(loan.loan_id) {
                imported.push(LoanReturn::from_loan(&loan));
            }
        }

        // 2. まとめて追加して保存
        let count = imported.len();
        if count > 0 {
            self.returns.extend(imported);
            self.save();
        }
        tracing::info!(
            "Imported {} returns from {}",
            count,
            loan_log_path.display()
        );

        Ok(count)
    }

    /// 返却記録を追加する
    ///
    /// # エラー
    /// - DuplicateEntry: 同じ貸出IDの返却記録が既にある
    pub fn add(&mut self, loan_return: LoanReturn) -> Result<()> {
        if self.position(loan_return.loan_id).is_ok() {
            return Err(LibraryError::DuplicateEntry(format!(
                "return for loan {}",
                loan_return.loan_id
            )));
        }

        tracing::info!("Return for loan {} added", loan_return.loan_id);
        self.returns.push(loan_return);
        self.save();
        Ok(())
    }

    /// 貸出IDで返却記録を取得する
    pub fn find(&self, loan_id: LoanId) -> Result<&LoanReturn> {
        let index = self.position(loan_id)?;
        Ok(&self.returns[index])
    }

    /// 返却記録を削除する
    pub fn delete(&mut self, loan_id: LoanId) -> Result<LoanReturn> {
        let index = self.position(loan_id)?;
        let removed = self.returns.remove(index);
        self.save();
        tracing::info!("Return for loan {} deleted", loan_id);
        Ok(removed)
    }

    /// 実返却日を記録する
    pub fn set_actual_return_date(&mut self, loan_id: LoanId, returned_on: NaiveDate) -> Result<()> {
        let index = self.position(loan_id)?;
        self.returns[index].returned_on = Some(returned_on);
        self.save();
        tracing::info!("Loan {} returned on {}", loan_id, returned_on);
        Ok(())
    }

    /// 返却記録のコピー（呼び出し側からは内部状態を変更できない）
    pub fn list(&self) -> Vec<LoanReturn> {
        self.returns.clone()
    }

    /// 未返却の返却記録
    pub fn pending(&self) -> Vec<&LoanReturn> {
        self.returns.iter().filter(|r| !r.is_returned()).collect()
    }

    /// 延滞料を計算する（副作用なし）
    pub fn compute_penalty(&self, loan_return: &LoanReturn) -> u64 {
        compute_penalty(loan_return)
    }

    /// 全返却記録の延滞料合計
    pub fn total_penalties(&self) -> u64 {
        self.returns.iter().map(compute_penalty).sum()
    }

    /// 利用者ごとの延滞料（延滞料のある利用者のみ、ID順）
    pub fn penalties_by_user(&self) -> BTreeMap<UserId, u64> {
        domain::penalties_by_user(&self.returns)
    }

    /// 返却ログを読み込み、メモリ上の状態を置き換える
    ///
    /// 解釈できない行と、既に読んだ貸出IDと重複する行は読み飛ばす。
    ///
    /// # 戻り値
    /// 保持した返却記録の件数
    pub fn load(&mut self) -> usize {
        self.returns.clear();

        let records = match return_log::read(&self.path) {
            Ok(records) => records,
            Err(e) => {
                tracing::error!("Failed to read return log {}: {}", self.path.display(), e);
                return 0;
            }
        };

        let mut seen = HashSet::with_capacity(records.len());
        for loan_return in records {
            if seen.insert(loan_return.loan_id) {
                self.returns.push(loan_return);
            } else {
                tracing::warn!(
                    "Skipping second return record for loan {}",
                    loan_return.loan_id
                );
            }
        }

        tracing::info!(
            "Loaded {} returns from {}",
            self.returns.len(),
            self.path.display()
        );
        self.returns.len()
    }

    /// 値による重複を取り除いてから返却ログを上書き保存する
    pub fn save(&mut self) {
        let removed = dedup::retain_first_by_key(&mut self.returns, LoanReturn::fingerprint);
        if removed > 0 {
            tracing::warn!("Dropped {} duplicate returns before saving", removed);
        }

        if let Err(e) = return_log::write(&self.path, &self.returns) {
            tracing::error!("Failed to save return log {}: {}", self.path.display(), e);
        }
    }

    fn position(&self, loan_id: LoanId) -> Result<usize> {
        self.returns
            .iter()
            .position(|r| r.loan_id == loan_id)
            .ok_or(LibraryError::return_not_found(loan_id))
    }
}
