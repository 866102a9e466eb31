//! Texts shown to renters.

use chrono::NaiveDate;

use crate::date::format_date;

pub const START_COMMAND: &str = "/start";
pub const CANCEL_COMMAND: &str = "/cancel";

pub const ASK_START_DATE: &str = "Введите дату начала аренды (в формате ДД.ММ.ГГГГ):";
pub const ASK_END_DATE: &str = "Введите дату окончания аренды (в формате ДД.ММ.ГГГГ):";
pub const INVALID_DATE: &str = "Неверный формат даты. Попробуйте снова (ДД.ММ.ГГГГ):";
pub const END_BEFORE_START: &str =
    "Дата окончания не может быть раньше даты начала. Попробуйте снова:";
pub const NO_AVAILABILITY: &str = "К сожалению, нет свободных боксов на выбранные даты.";
pub const CHOOSE_BOX: &str = "Выберите доступный бокс:";
pub const UNKNOWN_BOX: &str = "Такого бокса нет среди свободных. Выберите бокс из списка:";
pub const ASK_NAME: &str = "Введите ваше имя:";
pub const EMPTY_NAME: &str = "Имя не может быть пустым. Введите ваше имя:";
pub const ASK_PHONE: &str = "Введите ваш номер телефона:";
pub const EMPTY_PHONE: &str = "Номер телефона не может быть пустым. Введите ваш номер телефона:";
pub const CANCELLED: &str = "Процесс отменён.";
pub const UNKNOWN_COMMAND: &str =
    "Неизвестная команда. Доступны /start и /cancel.";
pub const NO_ACTIVE_BOOKING: &str = "Чтобы забронировать бокс, отправьте /start.";
pub const AVAILABILITY_CHECK_FAILED: &str =
    "Не удалось проверить свободные боксы. Попробуйте позже, отправив /start.";
pub const BOOKING_NOT_SAVED: &str =
    "Не удалось сохранить бронирование. Попробуйте позже, отправив /start.";
pub const SOMETHING_WENT_WRONG: &str = "Что-то пошло не так. Начните заново с /start.";

pub fn booking_confirmed(name: &str, box_id: &str, start: NaiveDate, end: NaiveDate) -> String {
    format!(
        "Спасибо, {name}! Вы забронировали {box_id} с {} по {}.",
        format_date(start),
        format_date(end)
    )
}

pub fn box_just_taken(box_id: &str) -> String {
    format!("К сожалению, {box_id} только что забронировали на эти даты. Начните заново с /start.")
}
