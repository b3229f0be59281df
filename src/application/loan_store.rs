use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;

use super::errors::{LibraryError, Result};
use crate::adapters::csv::loan_log;
use crate::domain::{self, Loan, LoanChanges, LoanId, LoanIdSequence, NewLoan, dates, dedup};
use crate::ports::{Book, InventoryGateway};

/// 貸出ストア
///
/// 貸出中の貸出の集合とそのファイル上の正本を所有する。
///
/// 不変条件（在庫ゲートウェイと共同で維持）：
/// - 貸出1件につき書籍の貸出可能数が1減り、削除で1戻る
/// - 貸出作成時に貸出可能数が1以上でなければ拒否する
///
/// すべての検証は書き込みより前に行う。検証で失敗した操作は状態を変更しない。
pub struct LoanStore {
    loans: Vec<Loan>,
    ids: LoanIdSequence,
    path: PathBuf,
    inventory: Arc<dyn InventoryGateway>,
}

impl LoanStore {
    pub fn new(path: impl Into<PathBuf>, inventory: Arc<dyn InventoryGateway>) -> Self {
        Self {
            loans: Vec::new(),
            ids: LoanIdSequence::new(),
            path: path.into(),
            inventory,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 新しいIDを採番して貸出を組み立てる
    ///
    /// IDは組み立て時に消費される。`create`が失敗しても同じIDは再発行されない。
    pub fn new_loan(&mut self, cmd: NewLoan) -> Loan {
        domain::loan::new_loan(self.ids.next_id(), cmd)
    }

    /// 書籍を貸し出す
    ///
    /// ビジネスルール：
    /// - 書名が在庫に存在すること
    /// - 貸出可能数が1以上であること
    /// - 同じ値の貸出（IDは問わない）がまだないこと
    ///
    /// 成功時は貸出可能数を1減らし、在庫と貸出ログの両方を保存する。
    ///
    /// # エラー
    /// - ReferenceNotFound: 書名が在庫にない
    /// - Unavailable: 貸出可能数が0
    /// - DuplicateEntry: 同じ値またはIDの貸出が既にある
    pub fn create(&mut self, loan: Loan) -> Result<LoanId> {
        // 1. 書籍の存在確認
        let book = self
            .inventory
            .find_by_title(&loan.title)
            .ok_or_else(|| LibraryError::ReferenceNotFound(loan.title.clone()))?;

        // 2. 在庫確認
        let available = self.inventory.quantity(&book);
        if available == 0 {
            return Err(LibraryError::Unavailable(loan.title.clone()));
        }

        // 3. 重複確認（値による比較）
        let fingerprint = loan.fingerprint();
        if self
            .loans
            .iter()
            .any(|existing| existing.loan_id == loan.loan_id || existing.fingerprint() == fingerprint)
        {
            return Err(LibraryError::DuplicateEntry(format!(
                "loan {} for user {} of {:?}",
                loan.loan_id, loan.user_id, loan.title
            )));
        }

        // 4. 在庫を減らして追加
        let loan_id = loan.loan_id;
        self.inventory.set_quantity(&book, available - 1);
        self.ids.observe(loan_id);
        tracing::info!(
            "Loan {} created: user {} borrows {:?} until {}",
            loan_id,
            loan.user_id,
            loan.title,
            loan.due_date
        );
        self.loans.push(loan);

        // 5. 在庫と貸出ログを保存
        self.save_inventory();
        self.save();

        Ok(loan_id)
    }

    /// 貸出を削除する
    ///
    /// 書名がまだ在庫に存在すれば貸出可能数を1戻す。存在しなければ在庫は
    /// 変更せずに警告を記録し、削除は続行する。
    pub fn delete(&mut self, loan_id: LoanId) -> Result<Loan> {
        let index = self.position(loan_id)?;
        let loan = self.loans.remove(index);

        if let Some(book) = self.release(&loan.title, loan_id) {
            tracing::debug!("Released one copy of {:?}", book.title);
            self.save_inventory();
        }

        self.save();
        tracing::info!("Loan {} deleted", loan_id);

        Ok(loan)
    }

    /// IDで貸出を取得する
    pub fn find(&self, loan_id: LoanId) -> Result<&Loan> {
        self.loans
            .iter()
            .find(|loan| loan.loan_id == loan_id)
            .ok_or(LibraryError::loan_not_found(loan_id))
    }

    /// 返却期限を延長する（負の日数で前倒し）
    ///
    /// 貸出ログのみ保存する。新しい返却期限を返す。
    ///
    /// # エラー
    /// - NotFound: 貸出が存在しない
    /// - DuplicateEntry: 延長後の値が他の貸出と同じになる
    /// - DateOutOfRange: 返却期限が日付の範囲を超える
    pub fn extend(&mut self, loan_id: LoanId, extra_days: i64) -> Result<NaiveDate> {
        let index = self.position(loan_id)?;
        let extended = domain::loan::extend_loan(&self.loans[index], extra_days)?;
        self.ensure_distinct(&extended)?;

        let due_date = extended.due_date;
        self.loans[index] = extended;

        self.save();
        tracing::info!("Loan {} due date moved to {}", loan_id, due_date);

        Ok(due_date)
    }

    /// 貸出内容を書き換える
    ///
    /// ビジネスルール：
    /// - 新しい書名の書籍が存在し、貸出可能数が1以上であること
    ///   （書名が変わらない場合も確認する）
    /// - 旧書籍の貸出可能数を1戻し、新書籍の貸出可能数を1減らす
    ///
    /// # エラー
    /// - NotFound: 貸出が存在しない
    /// - Unavailable: 新しい書名が在庫にない、または貸出可能数が0
    /// - DuplicateEntry: 書き換え後の値が他の貸出と同じになる
    pub fn modify(&mut self, loan_id: LoanId, changes: LoanChanges) -> Result<()> {
        let index = self.position(loan_id)?;

        let new_book = self
            .inventory
            .find_by_title(&changes.title)
            .filter(|book| self.inventory.quantity(book) > 0)
            .ok_or_else(|| LibraryError::Unavailable(changes.title.clone()))?;

        let modified = domain::loan::modify_loan(&self.loans[index], changes);
        self.ensure_distinct(&modified)?;

        let old_title = self.loans[index].title.clone();
        self.release(&old_title, loan_id);

        let remaining = self.inventory.quantity(&new_book);
        self.inventory
            .set_quantity(&new_book, remaining.saturating_sub(1));

        self.loans[index] = modified;
        tracing::info!(
            "Loan {} modified: now {:?} for user {}",
            loan_id,
            self.loans[index].title,
            self.loans[index].user_id
        );

        self.save_inventory();
        self.save();

        Ok(())
    }

    /// すべての貸出（追加順）
    pub fn list_all(&self) -> &[Loan] {
        &self.loans
    }

    /// 書名で検索する（大文字小文字を区別しない完全一致）
    ///
    /// 該当なしは空のVecでありエラーではない。
    pub fn search_by_title(&self, title: &str) -> Vec<&Loan> {
        self.loans
            .iter()
            .filter(|loan| loan.has_title(title))
            .collect()
    }

    /// 貸出ログを読み込み、メモリ上の状態を置き換える
    ///
    /// 解釈できない行と、既に読んだIDと重複する行は読み飛ばす。
    /// ファイルIDはそのまま保持し、採番の基準値を最大IDまで進める。
    /// 読み込めなかった場合はエラーを記録して空の状態になる。
    ///
    /// # 戻り値
    /// 保持した貸出の件数
    pub fn load(&mut self) -> usize {
        self.loans.clear();

        let rows = match loan_log::read(&self.path) {
            Ok(rows) => rows,
            Err(e) => {
                tracing::error!("Failed to read loan log {}: {}", self.path.display(), e);
                return 0;
            }
        };

        let mut seen = HashSet::with_capacity(rows.len());
        for row in rows {
            let loan = match row.to_loan(dates::parse_iso) {
                Ok(loan) => loan,
                Err(e) => {
                    tracing::warn!("Skipping loan record: {}", LibraryError::from(e));
                    continue;
                }
            };

            if !seen.insert(loan.loan_id) {
                tracing::warn!(
                    "Skipping loan record at line {}: duplicate id {}",
                    row.line,
                    loan.loan_id
                );
                continue;
            }

            self.ids.observe(loan.loan_id);
            self.loans.push(loan);
        }

        tracing::info!(
            "Loaded {} loans from {}",
            self.loans.len(),
            self.path.display()
        );
        self.loans.len()
    }

    /// 値による重複を取り除いてから貸出ログを上書き保存する
    ///
    /// 書き込みに失敗した場合はエラーを記録するのみ。
    pub fn save(&mut self) {
        let removed = dedup::retain_first_by_key(&mut self.loans, Loan::fingerprint);
        if removed > 0 {
            tracing::warn!("Dropped {} duplicate loans before saving", removed);
        }

        if let Err(e) = loan_log::write(&self.path, &self.loans) {
            tracing::error!("Failed to save loan log {}: {}", self.path.display(), e);
        }
    }

    /// 書き換え後の貸出が、自分以外の貸出と値で重複しないこと
    fn ensure_distinct(&self, candidate: &Loan) -> Result<()> {
        let fingerprint = candidate.fingerprint();
        match self
            .loans
            .iter()
            .find(|other| other.loan_id != candidate.loan_id && other.fingerprint() == fingerprint)
        {
            Some(other) => Err(LibraryError::DuplicateEntry(format!(
                "loan {} would equal loan {}",
                candidate.loan_id, other.loan_id
            ))),
            None => Ok(()),
        }
    }

    fn position(&self, loan_id: LoanId) -> Result<usize> {
        self.loans
            .iter()
            .position(|loan| loan.loan_id == loan_id)
            .ok_or(LibraryError::loan_not_found(loan_id))
    }

    /// 書名の書籍の貸出可能数を1戻す
    ///
    /// 書名が在庫から消えている場合は在庫を変更せず警告のみ（在庫の不整合が残る）。
    fn release(&self, title: &str, loan_id: LoanId) -> Option<Book> {
        match self.inventory.find_by_title(title) {
            Some(book) => {
                let current = self.inventory.quantity(&book);
                self.inventory.set_quantity(&book, current.saturating_add(1));
                Some(book)
            }
            None => {
                tracing::warn!(
                    "Book {:?} of loan {} is no longer in the inventory; quantity left unchanged",
                    title,
                    loan_id
                );
                None
            }
        }
    }

    fn save_inventory(&self) {
        if let Err(e) = self.inventory.save() {
            tracing::error!("Failed to save inventory: {}", e);
        }
    }
}
