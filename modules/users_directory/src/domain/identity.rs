use crate::contract::model::Identity;

/// Display name used when the identity carries neither a name nor a usable email.
pub const ANONYMOUS_NAME: &str = "Anonymous";

/// Display name for `identity`: its name, else the local part of its email,
/// else [`ANONYMOUS_NAME`]. Empty candidates are skipped.
pub fn derive_display_name(identity: &Identity) -> String {
    if let Some(name) = identity.name.as_deref().filter(|n| !n.is_empty()) {
        return name.to_owned();
    }

    identity
        .email
        .as_deref()
        .map(email_local_part)
        .filter(|local| !local.is_empty())
        .unwrap_or(ANONYMOUS_NAME)
        .to_owned()
}

/// Substring before the first `@`; the whole string when there is none.
fn email_local_part(email: &str) -> &str {
    email.split_once('@').map_or(email, |(local, _)| local)
}

/// Email to store on creation, if the identity has a non-blank one.
pub fn required_email(identity: &Identity) -> Option<&str> {
    identity.email.as_deref().filter(|e| !e.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_wins_over_email() {
        let id = Identity::new("t").with_name("Bob").with_email("alice@x.com");
        assert_eq!(derive_display_name(&id), "Bob");
    }

    #[test]
    fn email_local_part_when_name_absent() {
        let id = Identity::new("t").with_email("alice@x.com");
        assert_eq!(derive_display_name(&id), "alice");
    }

    #[test]
    fn anonymous_when_nothing_usable() {
        assert_eq!(derive_display_name(&Identity::new("t")), ANONYMOUS_NAME);

        let empty = Identity::new("t").with_name("").with_email("@x.com");
        assert_eq!(derive_display_name(&empty), ANONYMOUS_NAME);
    }

    #[test]
    fn empty_name_falls_through_to_email() {
        let id = Identity::new("t").with_name("").with_email("carol@x.com");
        assert_eq!(derive_display_name(&id), "carol");
    }

    #[test]
    fn only_first_at_splits() {
        let id = Identity::new("t").with_email("a@b@c");
        assert_eq!(derive_display_name(&id), "a");
        let no_at = Identity::new("t").with_email("plainuser");
        assert_eq!(derive_display_name(&no_at), "plainuser");
    }

    #[test]
    fn blank_email_is_not_required_email() {
        assert_eq!(required_email(&Identity::new("t")), None);
        assert_eq!(required_email(&Identity::new("t").with_email("  ")), None);
        assert_eq!(
            required_email(&Identity::new("t").with_email("d@x.com")),
            Some("d@x.com")
        );
    }
}
