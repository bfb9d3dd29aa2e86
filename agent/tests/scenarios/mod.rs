//! Functional scenarios for the PetFriends API.
//!
//! Each scenario is independent: it fetches its own auth key and asserts on
//! the `(status, body)` pairs the service returns. The same scenarios run
//! against the bundled mock service (`tests/pet_friends.rs`) and, with the
//! `live-tests` feature, against the real deployment (`tests/live.rs`).
//!
//! The service accepts pets with empty fields and absurd ages. Those
//! scenarios assert acceptance; they describe how the service behaves, not
//! how it ought to.

use std::path::PathBuf;

use petfriends_agent::petfriends_core::{AuthKey, Credentials, Pet, PetFilter, PetList, Settings};
use petfriends_agent::PetFriends;

/// Statuses the service uses.
pub const OK: u16 = 200;
pub const BAD_REQUEST: u16 = 400;
pub const FORBIDDEN: u16 = 403;

pub struct Suite {
    pub pf: PetFriends,
    pub settings: Settings,
}

impl Suite {
    pub fn new(settings: Settings) -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        Self {
            pf: PetFriends::from_settings(&settings),
            settings,
        }
    }

    pub fn auth_key(&self) -> AuthKey {
        let resp = self.pf.get_api_key(&self.settings.valid).unwrap();
        assert!(resp.is_success(), "valid credentials rejected: {:?}", resp.body);
        resp.decode().unwrap()
    }

    pub fn my_pets(&self, auth_key: &AuthKey) -> PetList {
        let resp = self.pf.get_list_of_pets(auth_key, PetFilter::MyPets).unwrap();
        assert_eq!(resp.status, OK);
        resp.decode().unwrap()
    }
}

pub fn photo_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/images/pet.png")
}

// ---------------------------------------------------------------------------
// Authentication
// ---------------------------------------------------------------------------

pub fn api_key_for_empty_credentials(suite: &Suite) {
    let resp = suite.pf.get_api_key(&Credentials::new("", "")).unwrap();
    assert_eq!(resp.status, FORBIDDEN);
}

pub fn api_key_for_wrong_password(suite: &Suite) {
    let resp = suite.pf.get_api_key(&suite.settings.invalid).unwrap();
    assert_eq!(resp.status, FORBIDDEN);
    assert!(!resp.body.contains_key("key"));
}

pub fn api_key_for_valid_user(suite: &Suite) {
    let resp = suite.pf.get_api_key(&suite.settings.valid).unwrap();
    assert_eq!(resp.status, OK);
    assert!(resp.body.contains_key("key"), "no key in {:?}", resp.body);
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

pub fn all_pets_with_valid_key(suite: &Suite) {
    let auth_key = suite.auth_key();
    let resp = suite.pf.get_list_of_pets(&auth_key, PetFilter::All).unwrap();
    assert_eq!(resp.status, OK);
    let list: PetList = resp.decode().unwrap();
    assert!(!list.pets.is_empty());
}

pub fn my_pets_with_wrong_key(suite: &Suite) {
    let resp = suite
        .pf
        .get_list_of_pets(&AuthKey::new("555"), PetFilter::MyPets)
        .unwrap();
    assert_eq!(resp.status, FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Creation
// ---------------------------------------------------------------------------

pub fn add_pet_without_photo(suite: &Suite) {
    let auth_key = suite.auth_key();
    let resp = suite
        .pf
        .add_new_pet_without_photo(&auth_key, "Мяу", "Кошара", "2")
        .unwrap();
    assert_eq!(resp.status, OK);
    assert_eq!(resp.body.str_field("name"), Some("Мяу"));
}

pub fn add_empty_pet(suite: &Suite) {
    let auth_key = suite.auth_key();
    let resp = suite.pf.add_new_pet_without_photo(&auth_key, "", "", "").unwrap();
    assert_eq!(resp.status, OK);
    let pet: Pet = resp.decode().unwrap();
    assert_eq!(pet.name, "");
    assert_eq!(pet.animal_type, "");
    assert_eq!(pet.age, "");
}

pub fn add_pet_with_out_of_range_age(suite: &Suite) {
    let auth_key = suite.auth_key();
    let resp = suite
        .pf
        .add_new_pet_without_photo(&auth_key, "Жираф", "млекопитающие", "999")
        .unwrap();
    assert_eq!(resp.status, OK);
    let pet: Pet = resp.decode().unwrap();
    assert_eq!(pet.name, "Жираф");
    assert_ne!(pet.age, "0");
    assert_eq!(pet.age, "999");
}

pub fn add_pet_with_photo(suite: &Suite) {
    let auth_key = suite.auth_key();
    let resp = suite
        .pf
        .add_new_pet(&auth_key, "Терминатор", "кот", "3", photo_path())
        .unwrap();
    assert_eq!(resp.status, OK);
    let pet: Pet = resp.decode().unwrap();
    assert_eq!(pet.name, "Терминатор");
    assert!(!pet.pet_photo.unwrap_or_default().is_empty());
}

// ---------------------------------------------------------------------------
// Mutation
// ---------------------------------------------------------------------------

pub fn delete_own_pet(suite: &Suite) {
    let auth_key = suite.auth_key();
    let mut my_pets = suite.my_pets(&auth_key);

    if my_pets.pets.is_empty() {
        let resp = suite
            .pf
            .add_new_pet(&auth_key, "Терминатор", "кот", "3", photo_path())
            .unwrap();
        assert_eq!(resp.status, OK);
        my_pets = suite.my_pets(&auth_key);
    }

    let pet_id = my_pets.pets[0].id.clone();
    let resp = suite.pf.delete_pet(&auth_key, &pet_id).unwrap();

    let my_pets = suite.my_pets(&auth_key);
    assert_eq!(resp.status, OK);
    assert!(!my_pets.contains(&pet_id), "pet {pet_id} still listed");
}

pub fn update_unknown_pet(suite: &Suite) {
    let auth_key = suite.auth_key();
    let resp = suite
        .pf
        .update_pet_info(&auth_key, "pet", "Мышка", "крыса", "9")
        .unwrap();
    assert_eq!(resp.status, BAD_REQUEST);
}

pub fn update_own_pet(suite: &Suite) {
    let auth_key = suite.auth_key();
    let created: Pet = suite
        .pf
        .add_new_pet_without_photo(&auth_key, "Мышка", "крыса", "1")
        .unwrap()
        .decode()
        .unwrap();

    let resp = suite
        .pf
        .update_pet_info(&auth_key, &created.id, "Мышь", "крыса", "9")
        .unwrap();
    assert_eq!(resp.status, OK);
    let updated: Pet = resp.decode().unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.name, "Мышь");
    assert_eq!(updated.age, "9");

    suite.pf.delete_pet(&auth_key, &created.id).unwrap();
}

pub fn set_photo_of_own_pet(suite: &Suite) {
    let auth_key = suite.auth_key();
    let created: Pet = suite
        .pf
        .add_new_pet_without_photo(&auth_key, "Фотогеничный", "кот", "2")
        .unwrap()
        .decode()
        .unwrap();

    let resp = suite
        .pf
        .add_photo_of_pet(&auth_key, &created.id, photo_path())
        .unwrap();
    assert_eq!(resp.status, OK);
    let pet: Pet = resp.decode().unwrap();
    assert_eq!(pet.id, created.id);
    assert!(!pet.pet_photo.unwrap_or_default().is_empty());

    suite.pf.delete_pet(&auth_key, &created.id).unwrap();
}
