//! User-facing texts shown on the status line

pub const NAME_REQUIRED: &str = "Введите имя.";
pub const NAME_INVALID_CHARS: &str = "Имя может содержать только буквы, пробелы и дефис.";
pub const NAME_TOO_SHORT: &str = "Имя должно быть минимум 2 буквы.";
pub const EMAIL_REQUIRED: &str = "Введите email.";
pub const EMAIL_INVALID: &str = "Введите корректный email.";

pub const SCENARIO_REQUIRED: &str = "Сначала выберите сценарий.";
pub const STEP_UNAVAILABLE: &str = "Этот шаг сейчас недоступен.";
pub const IDENTITY_REQUIRED: &str =
    "Откройте форму в Telegram или войдите через Telegram, чтобы мы могли прислать чек-лист.";

pub const NETWORK_ERROR: &str = "Ошибка сети. Попробуйте позже.";
pub const SUBMIT_FAILED: &str = "Ошибка отправки. Попробуйте позже.";
pub const SUBMIT_OK: &str = "Спасибо! Чек-лист отправлен в Telegram (если мы получили ваш Telegram).";
pub const DOWNLOAD_FAILED: &str = "Не удалось скачать чек-лист. Попробуйте позже.";

pub const LOGIN_OK: &str = "Вход через Telegram выполнен — готово к отправке чек-листа.";
