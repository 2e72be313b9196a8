//! Random value generation for scenario payloads.
//!
//! Every generator takes the RNG as a parameter. Seeded callers get
//! reproducible output; [`generate_users`] wraps that pattern with a ChaCha
//! generator so the same seed always yields the same batch.

use fake::Fake;
use fake::faker::name::raw::{FirstName, LastName};
use fake::locales::EN;
use rand::distr::Alphanumeric;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Domain used for every generated e-mail address.
pub const EMAIL_DOMAIN: &str = "example.com";

/// Length of generated passwords.
pub const PASSWORD_LEN: usize = 12;

/// Length of the random suffix that keeps generated e-mails distinct.
const EMAIL_SUFFIX_LEN: usize = 6;

/// Number of digits appended to generated usernames.
const USERNAME_DIGITS: u32 = 4;

/// Fallback local part used when a generated name has no usable characters.
const FALLBACK_LOCAL_PART: &str = "user";

/// A synthetic user suitable for sign-up and login requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestUser {
    /// Display name, for example `Ada Lovelace`.
    pub name: String,
    /// Login name derived from the first name plus digits.
    pub username: String,
    /// E-mail address under [`EMAIL_DOMAIN`].
    pub email: String,
    /// Alphanumeric password of [`PASSWORD_LEN`] characters.
    pub password: String,
}

/// Returns an alphanumeric string of exactly `len` characters.
///
/// # Example
///
/// ```
/// use load_data::random_string;
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
///
/// let mut rng = ChaCha8Rng::seed_from_u64(7);
/// let value = random_string(&mut rng, 16);
/// assert_eq!(value.len(), 16);
/// assert!(value.chars().all(|c| c.is_ascii_alphanumeric()));
/// ```
pub fn random_string<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| char::from(rng.sample(Alphanumeric)))
        .collect()
}

/// Returns a plausible e-mail address such as `ada.lovelace.x7k2pq@example.com`.
///
/// The local part is built from a generated name, reduced to lowercase ASCII
/// alphanumerics, followed by a random suffix.
pub fn random_email<R: Rng + ?Sized>(rng: &mut R) -> String {
    let first: String = FirstName(EN).fake_with_rng(rng);
    let last: String = LastName(EN).fake_with_rng(rng);
    email_for(rng, &first, &last)
}

/// Returns a complete [`TestUser`] whose name, username and e-mail agree.
pub fn random_user<R: Rng + ?Sized>(rng: &mut R) -> TestUser {
    let first: String = FirstName(EN).fake_with_rng(rng);
    let last: String = LastName(EN).fake_with_rng(rng);
    let username = format!(
        "{}{}",
        local_part(&first),
        rng.random_range(0..10_u32.pow(USERNAME_DIGITS))
    );
    let email = email_for(rng, &first, &last);
    let password = random_string(rng, PASSWORD_LEN);

    TestUser {
        name: format!("{first} {last}"),
        username,
        email,
        password,
    }
}

/// Generates `count` users from a deterministic seed.
///
/// # Example
///
/// ```
/// use load_data::generate_users;
///
/// let first = generate_users(2024, 5);
/// let second = generate_users(2024, 5);
/// assert_eq!(first, second);
/// ```
#[must_use]
pub fn generate_users(seed: u64, count: usize) -> Vec<TestUser> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count).map(|_| random_user(&mut rng)).collect()
}

fn email_for<R: Rng + ?Sized>(rng: &mut R, first: &str, last: &str) -> String {
    let suffix = random_string(rng, EMAIL_SUFFIX_LEN).to_ascii_lowercase();
    format!(
        "{}.{}.{suffix}@{EMAIL_DOMAIN}",
        local_part(first),
        local_part(last)
    )
}

/// Lowercases a name and drops anything that is not ASCII alphanumeric.
fn local_part(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect();
    if cleaned.is_empty() {
        FALLBACK_LOCAL_PART.to_owned()
    } else {
        cleaned
    }
}
