use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

static EMAIL_CANDIDATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9][A-Za-z0-9._%+-]*@[A-Za-z0-9.-]+\.[A-Za-z]{2,}")
        .expect("valid email regex")
});

const LOCAL_SPECIALS: [char; 5] = ['.', '_', '%', '+', '-'];

fn is_valid_local(local: &str) -> bool {
    let (Some(first), Some(last)) = (local.chars().next(), local.chars().last()) else {
        return false;
    };
    if local.len() > 64 || !first.is_ascii_alphanumeric() || !last.is_ascii_alphanumeric() {
        return false;
    }

    let chars: Vec<char> = local.chars().collect();
    !chars
        .windows(2)
        .any(|pair| LOCAL_SPECIALS.contains(&pair[0]) && LOCAL_SPECIALS.contains(&pair[1]))
}

fn is_valid_domain(domain: &str) -> bool {
    if domain.len() > 253 || domain.contains("..") {
        return false;
    }
    if !domain.chars().next().is_some_and(|c| c.is_ascii_alphanumeric()) {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|l| l.is_empty() || l.len() > 63) {
        return false;
    }

    // 頂級網域至少兩個英文字母
    labels
        .last()
        .is_some_and(|tld| tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic()))
}

/// Stricter check applied to every regex candidate.
pub fn is_valid_email(email: &str) -> bool {
    if email.len() > 254 {
        return false;
    }
    match email.rsplit_once('@') {
        Some((local, domain)) => is_valid_local(local) && is_valid_domain(domain),
        None => false,
    }
}

/// Finds every valid address in `text`, lower-cased, de-duplicated and sorted.
pub fn extract_emails(text: &str) -> Vec<String> {
    let found: BTreeSet<String> = EMAIL_CANDIDATE
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|candidate| is_valid_email(candidate))
        .map(str::to_lowercase)
        .collect();

    found.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("john@example.com"));
        assert!(is_valid_email("j.o_h%n+tag-1@mail.example.co.uk"));
        assert!(!is_valid_email("john@ex..com"));
        assert!(!is_valid_email(".john@example.com"));
        assert!(!is_valid_email("john.@example.com"));
        assert!(!is_valid_email("john..doe@example.com"));
        assert!(!is_valid_email("jo+-hn@example.com"));
        assert!(!is_valid_email("john@-example.com"));
        assert!(!is_valid_email("john@localhost"));
        assert!(!is_valid_email("john@example.c0m"));
        assert!(!is_valid_email("johnexample.com"));
    }

    #[test]
    fn test_length_limits() {
        let long_local = format!("{}@example.com", "a".repeat(65));
        assert!(!is_valid_email(&long_local));
        assert!(is_valid_email(&format!("{}@example.com", "a".repeat(64))));

        let long_label = format!("john@{}.com", "b".repeat(64));
        assert!(!is_valid_email(&long_label));

        let long_total = format!("a@{}.com", vec!["c".repeat(60); 5].join("."));
        assert!(long_total.len() > 254);
        assert!(!is_valid_email(&long_total));
    }

    #[test]
    fn test_extract_emails_normalizes_and_sorts() {
        let text = "Contact Bob@Example.com or alice@example.org.\n\
                    Duplicate: bob@example.com; broken: x@ex..com, y@@z.io\n\
                    <carol.smith@sub.domain.net>";
        assert_eq!(
            extract_emails(text),
            vec![
                "alice@example.org",
                "bob@example.com",
                "carol.smith@sub.domain.net",
            ]
        );
    }

    #[test]
    fn test_extract_emails_none() {
        assert!(extract_emails("no addresses here, just @ signs and dots.").is_empty());
    }
}
