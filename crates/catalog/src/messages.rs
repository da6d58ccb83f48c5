//! Fallback display messages for catalog reads.

pub const FETCH_EVENTS_FAILED: &str = "Ошибка загрузки событий";
pub const FETCH_EVENT_FAILED: &str = "Ошибка загрузки события";
