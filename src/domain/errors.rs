use thiserror::Error;

/// 日付文字列がどの形式にも一致しなかった
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Malformed date: {input:?}")]
pub struct MalformedDate {
    pub input: String,
}

/// 記録の行を貸出として解釈できなかった理由
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    #[error("line {line}: {column} is not an integer: {value:?}")]
    NotAnInteger {
        line: usize,
        column: &'static str,
        value: String,
    },

    #[error("line {line}: {source}")]
    Date {
        line: usize,
        #[source]
        source: MalformedDate,
    },
}

/// 延長のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtendLoanError {
    /// 新しい返却期限が日付の表現範囲を超えた
    DueDateOutOfRange,
}

/// パスワードのエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordError {
    /// 最小文字数に満たない
    TooShort { min: usize, actual: usize },
}

/// 利用者の検証エラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// 役割が定義済みのものではない
    InvalidRole(String),
    /// パスワードが条件を満たさない
    InvalidPassword(PasswordError),
}

impl From<PasswordError> for UserValidationError {
    fn from(err: PasswordError) -> Self {
        UserValidationError::InvalidPassword(err)
    }
}
