//! # Role Parsing and Membership
//!
//! Roles are stored as a single comma-separated VARCHAR column (open set,
//! data-driven) and handled in memory as `Vec<String>`. This module owns the
//! conversion in both directions plus the membership comparison used by the
//! role gate.

/// Parses the stored comma-separated role column into a role list.
///
/// Empty segments and surrounding whitespace are dropped: `"admin, ,user"`
/// parses to `["admin", "user"]`. An empty or all-whitespace column parses
/// to no roles at all.
pub fn parse_roles(stored: &str) -> Vec<String> {
    stored
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Joins a role list back into the stored column format.
pub fn roles_to_column(roles: &[String]) -> String {
    roles.join(",")
}

/// Compares a held role against a required role.
///
/// Comparison is case-insensitive and whitespace-tolerant so that rows
/// touched by hand ("Admin", " admin ") still authorize.
pub fn role_matches(held: &str, required: &str) -> bool {
    held.trim().eq_ignore_ascii_case(required.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roles() {
        assert_eq!(parse_roles("admin"), vec!["admin"]);
        assert_eq!(parse_roles("admin,manager"), vec!["admin", "manager"]);
        assert_eq!(parse_roles("admin, manager"), vec!["admin", "manager"]);
        assert_eq!(parse_roles(" admin , , user "), vec!["admin", "user"]);
    }

    #[test]
    fn test_parse_roles_empty_column() {
        assert!(parse_roles("").is_empty());
        assert!(parse_roles("   ").is_empty());
        assert!(parse_roles(",,").is_empty());
    }

    #[test]
    fn test_roles_round_trip() {
        let roles = vec!["admin".to_string(), "manager".to_string()];
        assert_eq!(parse_roles(&roles_to_column(&roles)), roles);
    }

    #[test]
    fn test_role_matches() {
        assert!(role_matches("admin", "admin"));
        assert!(role_matches("Admin", "admin"));
        assert!(role_matches(" admin ", "admin"));
        assert!(!role_matches("administrator", "admin"));
    }
}
