//! The string encoded inside each QR image: `<user_id>:<token>`.

/// Separator between the user id and the token.
pub const PAYLOAD_DELIMITER: char = ':';

/// Build the payload for a user's token.
pub fn format_payload(user_id: &str, token: &str) -> String {
    format!("{user_id}{PAYLOAD_DELIMITER}{token}")
}

/// Split a scanned payload into `(user_id, token)`.
///
/// Returns `None` unless the input contains exactly one delimiter.
pub fn parse_payload(payload: &str) -> Option<(&str, &str)> {
    let mut parts = payload.split(PAYLOAD_DELIMITER);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(user_id), Some(token), None) => Some((user_id, token)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_with_colon() {
        assert_eq!(format_payload("alice", "X7fQ2mZ9pL"), "alice:X7fQ2mZ9pL");
    }

    #[test]
    fn parses_two_parts() {
        assert_eq!(
            parse_payload("alice:X7fQ2mZ9pL"),
            Some(("alice", "X7fQ2mZ9pL"))
        );
    }

    #[test]
    fn rejects_missing_delimiter() {
        assert_eq!(parse_payload("aliceX7fQ2mZ9pL"), None);
    }

    #[test]
    fn rejects_extra_delimiters() {
        assert_eq!(parse_payload("alice:X7fQ:2mZ9pL"), None);
        assert_eq!(parse_payload("::"), None);
    }

    #[test]
    fn empty_parts_still_split() {
        // Two parts, both empty. The store will simply not find a match.
        assert_eq!(parse_payload(":"), Some(("", "")));
    }
}
