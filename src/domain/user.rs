use super::{NewUser, Password, Role, UserChanges, UserId, UserValidationError};

/// 利用者
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub user_id: UserId,
    pub name: String,
    pub email: String,
    pub password: Password,
    pub role: Role,
}

/// 役割とパスワードを検証する（役割を先に検証）
fn validate(role: &str, password: String) -> Result<(Role, Password), UserValidationError> {
    let role = role
        .parse::<Role>()
        .map_err(UserValidationError::InvalidRole)?;
    let password = Password::new(password)?;
    Ok((role, password))
}

/// 純粋関数：利用者を登録用に組み立てる
///
/// ビジネスルール：
/// - 役割はAdmin, Librarian, Memberのいずれか
/// - パスワードは6文字以上
///
/// 一意性の確認はストアの責務。
pub fn register_user(cmd: NewUser) -> Result<User, UserValidationError> {
    let (role, password) = validate(&cmd.role, cmd.password)?;
    Ok(User {
        user_id: cmd.user_id,
        name: cmd.name,
        email: cmd.email,
        password,
        role,
    })
}

/// 純粋関数：利用者情報を書き換える（登録時と同じ検証を新しい値に適用）
pub fn update_user(user: &User, changes: UserChanges) -> Result<User, UserValidationError> {
    let (role, password) = validate(&changes.role, changes.password)?;
    Ok(User {
        user_id: user.user_id,
        name: changes.name,
        email: changes.email,
        password,
        role,
    })
}
