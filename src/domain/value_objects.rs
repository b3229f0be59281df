use serde::{Deserialize, Serialize};
use std::fmt;

use super::PasswordError;

/// 貸出ID - 貸出記録の識別子
///
/// 貸出ログ上では整数として保存される。採番は`LoanIdSequence`が担う。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LoanId(u32);

impl LoanId {
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for LoanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 利用者ID - 利用者管理への参照
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(u32);

impl UserId {
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 貸出IDの採番器
///
/// 貸出ストアのインスタンスごとに保持する。プロセス全体で共有する
/// カウンタではないため、テストで複数のストアを作っても番号が干渉しない。
///
/// 不変条件：`next_id()`が返すIDは、それまでに発行または`observe()`された
/// どのIDよりも大きい。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoanIdSequence {
    last_used: u32,
}

impl LoanIdSequence {
    /// 新規作成（最初に発行されるIDは1）
    pub fn new() -> Self {
        Self { last_used: 0 }
    }

    /// 次のIDを発行する
    pub fn next_id(&mut self) -> LoanId {
        self.last_used = self.last_used.saturating_add(1);
        LoanId(self.last_used)
    }

    /// 既存のIDを登録し、採番の基準値を引き上げる
    ///
    /// ファイルから読み込んだ貸出のIDと新規発行IDが衝突しないようにする。
    pub fn observe(&mut self, id: LoanId) {
        self.last_used = self.last_used.max(id.0);
    }

    /// 最後に使用したID（未使用なら0）
    pub fn last_used(&self) -> u32 {
        self.last_used
    }
}

impl Default for LoanIdSequence {
    fn default() -> Self {
        Self::new()
    }
}

/// 利用者の役割
///
/// 不変条件：Admin, Librarian, Memberのいずれか。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Librarian,
    Member,
}

impl Role {
    /// 文字列表現を取得する
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Librarian => "Librarian",
            Role::Member => "Member",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    /// 旧形式のファイルにあるフランス語表記（Bibliothecaire, Membre）も受け付ける。
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Admin" => Ok(Role::Admin),
            "Librarian" | "Bibliothecaire" => Ok(Role::Librarian),
            "Member" | "Membre" => Ok(Role::Member),
            _ => Err(s.to_string()),
        }
    }
}

/// パスワードの最小文字数
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// パスワード
///
/// 不変条件：6文字以上。
/// 平文で保持する（利用者ログにそのまま書き出される）。
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    /// # エラー
    /// 6文字未満の場合は`PasswordError::TooShort`を返す
    pub fn new(value: impl Into<String>) -> Result<Self, PasswordError> {
        let value = value.into();
        let length = value.chars().count();
        if length < MIN_PASSWORD_LENGTH {
            return Err(PasswordError::TooShort {
                min: MIN_PASSWORD_LENGTH,
                actual: length,
            });
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(****)")
    }
}
