//! Storage key builders for activity records and their listing index.

use activity_entity::activity::ListStatus;

/// Prefix shared by every activity key.
const PREFIX: &str = "ua";

/// Key of the record for a user.
pub fn record(user_id: &str) -> String {
    format!("{PREFIX}|{user_id}")
}

/// Key of the listing index for a status.
pub fn index(status: ListStatus) -> String {
    format!("{PREFIX}|{status}")
}

/// The index a record is not in, given the one it is in.
pub fn other_status(status: ListStatus) -> ListStatus {
    match status {
        ListStatus::Pending => ListStatus::Exempt,
        ListStatus::Exempt => ListStatus::Pending,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_key() {
        assert_eq!(
            record("3b1f6a2c-9d4e-4f5a-8b7c-1d2e3f4a5b6c"),
            "ua|3b1f6a2c-9d4e-4f5a-8b7c-1d2e3f4a5b6c"
        );
    }

    #[test]
    fn test_index_keys() {
        assert_eq!(index(ListStatus::Pending), "ua|pending");
        assert_eq!(index(ListStatus::Exempt), "ua|exempt");
        assert_eq!(other_status(ListStatus::Pending), ListStatus::Exempt);
    }
}
