//! Run-unique usernames and emails.

use std::collections::HashSet;

use rand::Rng;

pub const MIN_USERNAME_LEN: usize = 8;
pub const EMAIL_DOMAIN: &str = "example.com";

/// Suffix redraws before the suffixed name itself becomes the new stem.
const SUFFIX_ATTEMPTS: usize = 64;

/// Usernames that already exist in a fresh database.
const RESERVED_USERNAMES: [&str; 1] = ["admin_user"];

fn clean(part: &str) -> String {
    part.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn pad_to_min<R: Rng + ?Sized>(rng: &mut R, mut name: String) -> String {
    while name.len() < MIN_USERNAME_LEN {
        name.push(char::from(b'a' + rng.gen_range(0..26u8)));
    }
    name
}

/// Hands out usernames and emails that are unique for the lifetime of the
/// generator. One generator per run.
#[derive(Debug, Clone)]
pub struct IdentityGenerator {
    usernames: HashSet<String>,
    emails: HashSet<String>,
}

impl Default for IdentityGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityGenerator {
    pub fn new() -> Self {
        Self {
            usernames: RESERVED_USERNAMES.iter().map(|s| s.to_string()).collect(),
            emails: HashSet::new(),
        }
    }

    /// Initial plus last name, widened with more of the first name and then
    /// random letters until it reaches [`MIN_USERNAME_LEN`]. Collisions get a
    /// three digit suffix.
    pub fn username<R: Rng + ?Sized>(&mut self, rng: &mut R, first: &str, last: &str) -> String {
        let first = clean(first);
        let last = clean(last);

        let mut base: String = first.chars().take(1).chain(last.chars()).collect();
        if base.len() < MIN_USERNAME_LEN && first.len() > 1 {
            let extra = (first.len() - 1).min(MIN_USERNAME_LEN - base.len());
            base = format!("{}{}", &first[..extra + 1], last);
        }
        let base = pad_to_min(rng, base);

        let mut candidate = base.clone();
        let mut stem = base;
        let mut attempts = 0;
        while self.usernames.contains(&candidate) {
            if attempts == SUFFIX_ATTEMPTS {
                stem = candidate.clone();
                attempts = 0;
            }
            candidate = format!("{stem}{}", rng.gen_range(100..=999));
            attempts += 1;
        }

        self.usernames.insert(candidate.clone());
        candidate
    }

    /// `first.last@example.com`, with a numeric suffix on the local part
    /// when taken.
    pub fn email<R: Rng + ?Sized>(&mut self, rng: &mut R, first: &str, last: &str) -> String {
        let local = format!("{}.{}", clean(first), clean(last));

        let mut candidate = format!("{local}@{EMAIL_DOMAIN}");
        let mut stem = local;
        let mut attempts = 0;
        while self.emails.contains(&candidate) {
            if attempts == SUFFIX_ATTEMPTS {
                if let Some((taken, _)) = candidate.rsplit_once('@') {
                    stem = taken.to_string();
                }
                attempts = 0;
            }
            candidate = format!("{stem}{}@{EMAIL_DOMAIN}", rng.gen_range(1..=999));
            attempts += 1;
        }

        self.emails.insert(candidate.clone());
        candidate
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn long_names_use_initial_and_last_name() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut ids = IdentityGenerator::new();
        assert_eq!(ids.username(&mut rng, "Margaret", "Hamilton"), "mhamilton");
    }

    #[test]
    fn short_names_borrow_from_first_name() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut ids = IdentityGenerator::new();
        // "jli" is 3 long, so five more letters of "jonathan" are taken.
        assert_eq!(ids.username(&mut rng, "Jonathan", "Li"), "jonathli");
    }

    #[test]
    fn very_short_names_are_padded() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut ids = IdentityGenerator::new();
        let name = ids.username(&mut rng, "Al", "Wu");
        assert_eq!(name.len(), MIN_USERNAME_LEN);
        assert!(name.starts_with("alwu"));
        assert!(name.chars().all(|c| c.is_ascii_lowercase()));
    }

    #[test]
    fn punctuation_is_dropped() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut ids = IdentityGenerator::new();
        assert_eq!(ids.username(&mut rng, "Sean", "O'Connor-Smith"), "soconnorsmith");
        assert_eq!(
            ids.email(&mut rng, "Sean", "O'Connor"),
            "sean.oconnor@example.com"
        );
    }

    #[test]
    fn collisions_get_a_suffix() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut ids = IdentityGenerator::new();
        let a = ids.username(&mut rng, "Grace", "Hopperton");
        let b = ids.username(&mut rng, "Grace", "Hopperton");
        assert_eq!(a, "ghopperton");
        assert_ne!(a, b);
        assert!(b.starts_with("ghopperton"));
        let suffix: u32 = b["ghopperton".len()..].parse().unwrap();
        assert!((100..=999).contains(&suffix));

        let e1 = ids.email(&mut rng, "Grace", "Hopperton");
        let e2 = ids.email(&mut rng, "Grace", "Hopperton");
        assert_eq!(e1, "grace.hopperton@example.com");
        assert_ne!(e1, e2);
        assert!(e2.starts_with("grace.hopperton") && e2.ends_with("@example.com"));
    }

    #[test]
    fn exhausted_suffixes_grow_the_stem() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut ids = IdentityGenerator::new();
        let mut names = HashSet::new();
        let mut emails = HashSet::new();
        for _ in 0..1_500 {
            assert!(names.insert(ids.username(&mut rng, "Grace", "Hopperton")));
            assert!(emails.insert(ids.email(&mut rng, "Grace", "Hopperton")));
        }
        assert!(names.iter().any(|n| n.len() > "ghopperton".len() + 3));
        assert!(emails.iter().all(|e| e.ends_with("@example.com")));
    }

    #[test]
    fn admin_user_is_reserved() {
        let ids = IdentityGenerator::new();
        assert!(ids.usernames.contains("admin_user"));
        assert!(ids.emails.is_empty());
    }

    #[test]
    fn usernames_are_long_enough_and_unique_over_many_draws() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut ids = IdentityGenerator::new();
        let mut seen = HashSet::new();
        for i in 0..300 {
            let (first, last) = if i % 2 == 0 { ("Bo", "Li") } else { ("Ann", "Ng") };
            let name = ids.username(&mut rng, first, last);
            assert!(name.len() >= MIN_USERNAME_LEN, "{name} too short");
            assert!(seen.insert(name));
        }
    }
}
