use thiserror::Error;

use crate::domain::{
    ExtendLoanError, LoanId, MalformedDate, PasswordError, RowError, UserId, UserValidationError,
};

/// ストア層のエラー
///
/// 検証エラーは状態を変更する前に返される。
/// ファイルI/Oの失敗はストア内でログに記録され、ここには現れない。
#[derive(Debug, Error)]
pub enum LibraryError {
    /// IDによる検索に失敗した
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: u32 },

    /// 参照先の書籍が存在しない
    #[error("Book not found: {0}")]
    ReferenceNotFound(String),

    /// 書籍の在庫がない
    #[error("Book is not available for loan: {0}")]
    Unavailable(String),

    /// 同じ値、または同じキーの記録が既にある
    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    /// 役割が定義済みのものではない
    #[error("Invalid role: {0}")]
    InvalidRole(String),

    /// パスワードが最小文字数に満たない
    #[error("Password must be at least {min} characters (got {actual})")]
    InvalidPassword { min: usize, actual: usize },

    /// 日付がどの形式にも一致しない
    #[error(transparent)]
    MalformedDate(#[from] MalformedDate),

    /// 記録のフィールドが解釈できない
    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    /// 返却期限の計算が日付の範囲を超えた
    #[error("Due date out of range")]
    DateOutOfRange,
}

impl LibraryError {
    pub fn loan_not_found(loan_id: LoanId) -> Self {
        LibraryError::NotFound {
            entity: "Loan",
            id: loan_id.value(),
        }
    }

    pub fn return_not_found(loan_id: LoanId) -> Self {
        LibraryError::NotFound {
            entity: "Return",
            id: loan_id.value(),
        }
    }

    pub fn user_not_found(user_id: UserId) -> Self {
        LibraryError::NotFound {
            entity: "User",
            id: user_id.value(),
        }
    }
}

impl From<UserValidationError> for LibraryError {
    fn from(err: UserValidationError) -> Self {
        match err {
            UserValidationError::InvalidRole(role) => LibraryError::InvalidRole(role),
            UserValidationError::InvalidPassword(PasswordError::TooShort { min, actual }) => {
                LibraryError::InvalidPassword { min, actual }
            }
        }
    }
}

impl From<ExtendLoanError> for LibraryError {
    fn from(err: ExtendLoanError) -> Self {
        match err {
            ExtendLoanError::DueDateOutOfRange => LibraryError::DateOutOfRange,
        }
    }
}

impl From<RowError> for LibraryError {
    fn from(err: RowError) -> Self {
        match err {
            RowError::Date { source, .. } => LibraryError::MalformedDate(source),
            other => LibraryError::MalformedRecord(other.to_string()),
        }
    }
}

/// アプリケーション層の Result型
pub type Result<T> = std::result::Result<T, LibraryError>;
