/// Pure decision rules shared by the reconciler and the HTTP handlers
///
/// 1. Normalize the identifier used as lookup key
/// 2. Pick the economic activity to report
/// 3. Classify the Hacienda registration state
use crate::models::ActivityEntry;

/// Registration states Hacienda reports for a taxpayer that is inscribed.
pub const INSCRIBED_STATES: [&str; 3] = ["Inscrito", "Inscrito de Oficio", "Activo"];

/// Strip formatting hyphens from a national identification number.
///
/// No digit-count or checksum validation; anything other than `-` passes through.
pub fn normalize_identifier(raw: &str) -> String {
    raw.replace('-', "")
}

/// Pick the activity to report: the first active one, else the first one listed.
pub fn select_activity(activities: &[ActivityEntry]) -> Option<&ActivityEntry> {
    activities
        .iter()
        .find(|a| a.is_active())
        .or_else(|| activities.first())
}

/// First active activity only, with no fallback.
///
/// Used for the reference-id pass, which intentionally does not fall back the
/// way `select_activity` does.
pub fn first_active_activity(activities: &[ActivityEntry]) -> Option<&ActivityEntry> {
    activities.iter().find(|a| a.is_active())
}

/// Case-sensitive match against the recognised inscribed states.
pub fn is_inscribed(state_text: &str) -> bool {
    INSCRIBED_STATES.contains(&state_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_hyphens() {
        assert_eq!(normalize_identifier("3-101-123456"), "3101123456");
        assert_eq!(normalize_identifier("1-0234-0567"), "102340567");
    }

    #[test]
    fn test_normalize_pass_through() {
        assert_eq!(normalize_identifier(""), "");
        assert_eq!(normalize_identifier("310112 3456"), "310112 3456");
        assert_eq!(normalize_identifier("3101123456"), "3101123456");
    }

    #[test]
    fn test_select_empty() {
        assert_eq!(select_activity(&[]), None);
    }

    #[test]
    fn test_select_prefers_active() {
        let activities = vec![ActivityEntry::new("1", "B"), ActivityEntry::new("2", "A")];
        assert_eq!(
            select_activity(&activities).and_then(|a| a.code.as_deref()),
            Some("2")
        );
    }

    #[test]
    fn test_select_falls_back_to_first() {
        let activities = vec![ActivityEntry::new("1", "B")];
        assert_eq!(
            select_activity(&activities).and_then(|a| a.code.as_deref()),
            Some("1")
        );
    }

    #[test]
    fn test_select_first_of_several_active() {
        let activities = vec![
            ActivityEntry::new("1", "I"),
            ActivityEntry::new("2", "A"),
            ActivityEntry::new("3", "A"),
        ];
        assert_eq!(
            select_activity(&activities).and_then(|a| a.code.as_deref()),
            Some("2")
        );
    }

    #[test]
    fn test_first_active_has_no_fallback() {
        let activities = vec![ActivityEntry::new("1", "B")];
        assert_eq!(first_active_activity(&activities), None);
    }

    #[test]
    fn test_status_is_case_sensitive() {
        assert!(!is_inscribed("inscrito"));
        assert!(!is_inscribed("ACTIVO"));
    }

    #[test]
    fn test_status_classification() {
        assert!(is_inscribed("Inscrito"));
        assert!(is_inscribed("Inscrito de Oficio"));
        assert!(is_inscribed("Activo"));
        assert!(!is_inscribed("Inactivo"));
        assert!(!is_inscribed("No inscrito"));
        assert!(!is_inscribed(""));
    }
}
