use std::path::{Path, PathBuf};

use super::errors::{LibraryError, Result};
use crate::adapters::csv::user_log;
use crate::domain::{NewUser, User, UserChanges, UserId, user};

/// 利用者ストア
///
/// 不変条件：
/// - IDと名前はストア内で一意
/// - 役割はAdmin, Librarian, Memberのいずれか
/// - パスワードは6文字以上
pub struct UserStore {
    users: Vec<User>,
    path: PathBuf,
}

impl UserStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            users: Vec::new(),
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 利用者を登録する
    ///
    /// # エラー
    /// - InvalidRole: 役割が定義済みのものではない
    /// - InvalidPassword: パスワードが6文字未満
    /// - DuplicateEntry: IDまたは名前が既存の利用者と衝突する
    pub fn create(&mut self, cmd: NewUser) -> Result<UserId> {
        let user = user::register_user(cmd)?;

        if let Some(existing) = self
            .users
            .iter()
            .find(|u| u.user_id == user.user_id || u.name == user.name)
        {
            return Err(LibraryError::DuplicateEntry(format!(
                "user {} ({:?}) collides with user {} ({:?})",
                user.user_id, user.name, existing.user_id, existing.name
            )));
        }

        let user_id = user.user_id;
        tracing::info!("User {} ({}) created", user_id, user.role);
        self.users.push(user);
        self.save();

        Ok(user_id)
    }

    /// IDで利用者を取得する
    pub fn find(&self, user_id: UserId) -> Result<&User> {
        let index = self.position(user_id)?;
        Ok(&self.users[index])
    }

    /// 利用者情報を書き換える
    ///
    /// 新しい値に登録時と同じ検証を行う。新しい名前が他の利用者と
    /// 衝突する場合も拒否する。
    pub fn modify(&mut self, user_id: UserId, changes: UserChanges) -> Result<()> {
        let index = self.position(user_id)?;
        let updated = user::update_user(&self.users[index], changes)?;

        if self
            .users
            .iter()
            .any(|u| u.user_id != user_id && u.name == updated.name)
        {
            return Err(LibraryError::DuplicateEntry(format!(
                "user name {:?} is already taken",
                updated.name
            )));
        }

        self.users[index] = updated;
        self.save();
        tracing::info!("User {} modified", user_id);
        Ok(())
    }

    /// 利用者を削除する
    pub fn delete(&mut self, user_id: UserId) -> Result<User> {
        let index = self.position(user_id)?;
        let removed = self.users.remove(index);
        self.save();
        tracing::info!("User {} deleted", user_id);
        Ok(removed)
    }

    /// 利用者のコピー
    pub fn list(&self) -> Vec<User> {
        self.users.clone()
    }

    /// 利用者ログを読み込み、メモリ上の状態を置き換える
    ///
    /// 重複除去は行わない（IDの一意性は`create`で保証される）。
    pub fn load(&mut self) -> usize {
        self.users = match user_log::read(&self.path) {
            Ok(users) => users,
            Err(e) => {
                tracing::error!("Failed to read user log {}: {}", self.path.display(), e);
                Vec::new()
            }
        };

        tracing::info!(
            "Loaded {} users from {}",
            self.users.len(),
            self.path.display()
        );
        self.users.len()
    }

    /// 利用者ログを上書き保存する
    pub fn save(&self) {
        if let Err(e) = user_log::write(&self.path, &self.users) {
            tracing::error!("Failed to save user log {}: {}", self.path.display(), e);
        }
    }

    fn position(&self, user_id: UserId) -> Result<usize> {
        self.users
            .iter()
            .position(|u| u.user_id == user_id)
            .ok_or(LibraryError::user_not_found(user_id))
    }
}
