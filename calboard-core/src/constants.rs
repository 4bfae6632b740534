/// Storage key the event collection is persisted under.
pub const DEFAULT_STORAGE_KEY: &str = "calendar-events";

/// File name offered for JSON exports.
pub const EXPORT_FILE_NAME: &str = "calendar-events.json";

/// Separator between event id and slot index in composite slot ids.
pub const SLOT_KEY_SEPARATOR: char = '-';
