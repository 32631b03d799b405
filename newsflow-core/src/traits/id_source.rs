use crate::constants::TIME_FORMAT;

/// Mints event ids and creation timestamps. Injectable so tests can pin
/// the clock and the id suffix.
pub trait IEventIdSource: Send + Sync {
    /// A fresh event id: local time as `%Y%m%d%H%M%S` plus 24 hex digits.
    /// Opaque after creation.
    fn mint(&self) -> String;

    /// Current wall-clock in the canonical string form, used for the
    /// `created` field of new events.
    fn now_string(&self) -> String;
}

/// Production id source: local clock + random suffix.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemIdSource;

impl IEventIdSource for SystemIdSource {
    fn mint(&self) -> String {
        let stamp = chrono::Local::now().format("%Y%m%d%H%M%S");
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        format!("{stamp}{}", &suffix[..24])
    }

    fn now_string(&self) -> String {
        chrono::Local::now().format(TIME_FORMAT).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minted_ids_have_expected_shape() {
        let id = SystemIdSource.mint();
        assert_eq!(id.len(), 14 + 24);
        assert!(id[14..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn minted_ids_are_unique() {
        let a = SystemIdSource.mint();
        let b = SystemIdSource.mint();
        assert_ne!(a, b);
    }
}
