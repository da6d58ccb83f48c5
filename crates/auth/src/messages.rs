//! Fallback display messages, used when the server supplies none.

pub const LOGIN_FAILED: &str = "Ошибка входа";
pub const REGISTER_FAILED: &str = "Ошибка регистрации";
pub const VERIFY_EMAIL_FAILED: &str = "Ошибка верификации";
pub const FORGOT_PASSWORD_FAILED: &str = "Ошибка восстановления пароля";
pub const RESET_PASSWORD_FAILED: &str = "Ошибка сброса пароля";
pub const REFRESH_USER_FAILED: &str = "Ошибка загрузки профиля";
