use fake::faker::address::en::{BuildingNumber, CityName, StateAbbr, StreetName, ZipCode};
use fake::faker::name::en::{FirstName, LastName};
use fake::faker::phone_number::en::PhoneNumber;
use fake::Fake;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::identity::IdentityGenerator;

pub const DEFAULT_USER_COUNT: usize = 30;
pub const DEFAULT_USER_SEED: u64 = 42;
/// Every seeded account shares this password.
pub const SHARED_PASSWORD: &str = "Admin123!";
pub const CUSTOMER_ROLE: &str = "CUSTOMER";

/// One line of `aims_users.csv`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRow {
    pub username: String,
    pub password: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub phone: String,
    pub address: String,
}

/// Collapse a multi-line postal address onto one line.
pub fn single_line(address: &str) -> String {
    address
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

fn fake_address<R: Rng + ?Sized>(rng: &mut R) -> String {
    let building: String = BuildingNumber().fake_with_rng(rng);
    let street: String = StreetName().fake_with_rng(rng);
    let city: String = CityName().fake_with_rng(rng);
    let state: String = StateAbbr().fake_with_rng(rng);
    let zip: String = ZipCode().fake_with_rng(rng);
    single_line(&format!("{building} {street}\n{city}, {state} {zip}"))
}

/// Draw `count` customers. Usernames and emails are unique across the batch.
pub fn synthesize_users<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<UserRow> {
    let mut identities = IdentityGenerator::new();

    (0..count)
        .map(|_| {
            let first_name: String = FirstName().fake_with_rng(rng);
            let last_name: String = LastName().fake_with_rng(rng);
            let username = identities.username(rng, &first_name, &last_name);
            let email = identities.email(rng, &first_name, &last_name);
            let phone: String = PhoneNumber().fake_with_rng(rng);
            let address = fake_address(rng);

            UserRow {
                username,
                password: SHARED_PASSWORD.to_string(),
                email,
                first_name,
                last_name,
                role: CUSTOMER_ROLE.to_string(),
                phone,
                address,
            }
        })
        .collect()
}
