//! In-process emulation of the PetFriends REST API.
//!
//! Mirrors the public service closely enough for the functional suite to run
//! offline, including its leniency: creation and update accept any field
//! values, empty strings and absurd ages included, and echo them back.

use std::{sync::Arc, time::SystemTime};

use axum::{
    extract::{rejection::FormRejection, Multipart, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post, put},
    Form, Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const DEMO_EMAIL: &str = "demo@petfriends.local";
pub const DEMO_PASSWORD: &str = "demo-password";

const FORBIDDEN_PAGE: &str = "<!doctype html>\n<title>403 Forbidden</title>\n<h1>Forbidden</h1>\n\
<p>Please provide 'auth_key' Header</p>\n";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pet {
    pub id: String,
    pub name: String,
    pub animal_type: String,
    pub age: String,
    pub pet_photo: String,
    pub user_id: String,
    pub created_at: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PetForm {
    pub name: String,
    pub animal_type: String,
    pub age: String,
}

#[derive(Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub filter: String,
}

#[derive(Clone, Debug)]
pub struct Account {
    pub email: String,
    pub password: String,
    pub user_id: String,
    pub key: String,
}

impl Account {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            user_id: Uuid::new_v4().simple().to_string(),
            key: Uuid::new_v4().simple().to_string(),
        }
    }
}

/// Initial accounts and the pets each of them owns.
#[derive(Clone, Debug)]
pub struct Seed {
    pub accounts: Vec<(Account, Vec<PetForm>)>,
}

impl Default for Seed {
    /// One demo account owning a single pet.
    fn default() -> Self {
        Self {
            accounts: vec![(
                Account::new(DEMO_EMAIL, DEMO_PASSWORD),
                vec![PetForm {
                    name: "Барсик".to_string(),
                    animal_type: "кот".to_string(),
                    age: "4".to_string(),
                }],
            )],
        }
    }
}

#[derive(Debug, Default)]
pub struct Service {
    accounts: Vec<Account>,
    /// Newest first, as the public service lists them.
    pets: Vec<Pet>,
}

impl Service {
    pub fn from_seed(seed: Seed) -> Self {
        let mut service = Service::default();
        for (account, pets) in seed.accounts {
            for form in pets {
                service.insert(&account.user_id, form, String::new());
            }
            service.accounts.push(account);
        }
        service
    }

    fn account_by_key(&self, key: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.key == key)
    }

    fn insert(&mut self, user_id: &str, form: PetForm, pet_photo: String) -> Pet {
        let pet = Pet {
            id: Uuid::new_v4().simple().to_string(),
            name: form.name,
            animal_type: form.animal_type,
            age: form.age,
            pet_photo,
            user_id: user_id.to_string(),
            created_at: now_timestamp(),
        };
        self.pets.insert(0, pet.clone());
        pet
    }
}

pub type Db = Arc<RwLock<Service>>;

pub fn app(seed: Seed) -> Router {
    let db: Db = Arc::new(RwLock::new(Service::from_seed(seed)));
    Router::new()
        .route("/api/key", get(get_api_key))
        .route("/api/pets", get(list_pets).post(create_pet))
        .route("/api/create_pet_simple", post(create_pet_simple))
        .route("/api/pets/{pet_id}", put(update_pet).delete(delete_pet))
        .route("/api/pets/set_photo/{pet_id}", post(set_photo))
        .with_state(db)
}

/// Startup line for the standalone binary. Names the demo account but not
/// its password.
pub fn startup_message(addr: &str) -> String {
    format!("listening on {addr}; demo account {DEMO_EMAIL} (password in petfriends_mock::DEMO_PASSWORD)")
}

pub async fn run(listener: TcpListener, seed: Seed) -> Result<(), std::io::Error> {
    axum::serve(listener, app(seed)).await
}

fn now_timestamp() -> String {
    let secs = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or_default();
    format!("{secs:.4}")
}

fn forbidden() -> Response {
    (StatusCode::FORBIDDEN, Html(FORBIDDEN_PAGE)).into_response()
}

fn bad_request(reason: &str) -> Response {
    log::debug!("bad request: {reason}");
    (
        StatusCode::BAD_REQUEST,
        Html(format!("<h1>Bad Request</h1>\n<p>{reason}</p>\n")),
    )
        .into_response()
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// User id of the caller, if `auth_key` names a known account.
async fn authorize(db: &Db, headers: &HeaderMap) -> Option<String> {
    let key = header(headers, "auth_key")?;
    let service = db.read().await;
    let user_id = service.account_by_key(key).map(|a| a.user_id.clone());
    if user_id.is_none() {
        log::debug!("rejected unknown auth_key");
    }
    user_id
}

async fn get_api_key(State(db): State<Db>, headers: HeaderMap) -> Response {
    let email = header(&headers, "email").unwrap_or_default();
    let password = header(&headers, "password").unwrap_or_default();
    let service = db.read().await;
    match service
        .accounts
        .iter()
        .find(|a| !a.email.is_empty() && a.email == email && a.password == password)
    {
        Some(account) => Json(serde_json::json!({ "key": account.key })).into_response(),
        None => {
            log::debug!("rejected credentials for {email:?}");
            (
                StatusCode::FORBIDDEN,
                Html("<h1>Forbidden</h1>\n<p>This user wasn't found in database</p>\n"),
            )
                .into_response()
        }
    }
}

async fn list_pets(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Response {
    let Some(user_id) = authorize(&db, &headers).await else {
        return forbidden();
    };
    let service = db.read().await;
    let pets: Vec<Pet> = match query.filter.as_str() {
        "" => service.pets.clone(),
        "my_pets" => service
            .pets
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect(),
        other => return bad_request(&format!("unknown filter {other:?}")),
    };
    Json(serde_json::json!({ "pets": pets })).into_response()
}

async fn create_pet_simple(
    State(db): State<Db>,
    headers: HeaderMap,
    form: Result<Form<PetForm>, FormRejection>,
) -> Response {
    let Some(user_id) = authorize(&db, &headers).await else {
        return forbidden();
    };
    let Ok(Form(form)) = form else {
        return bad_request("name, animal_type and age are required");
    };
    let pet = db.write().await.insert(&user_id, form, String::new());
    Json(pet).into_response()
}

/// Fields and photo collected from a multipart upload.
#[derive(Default)]
struct Upload {
    name: Option<String>,
    animal_type: Option<String>,
    age: Option<String>,
    photo: Option<String>,
}

async fn read_upload(mut multipart: Multipart) -> Result<Upload, String> {
    let mut upload = Upload::default();
    while let Some(field) = multipart.next_field().await.map_err(|e| e.to_string())? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "pet_photo" => {
                let mime = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field.bytes().await.map_err(|e| e.to_string())?;
                upload.photo = Some(format!("data:{mime};base64,{}", STANDARD.encode(&bytes)));
            }
            "name" | "animal_type" | "age" => {
                let value = field.text().await.map_err(|e| e.to_string())?;
                match name.as_str() {
                    "name" => upload.name = Some(value),
                    "animal_type" => upload.animal_type = Some(value),
                    _ => upload.age = Some(value),
                }
            }
            _ => {}
        }
    }
    Ok(upload)
}

async fn create_pet(State(db): State<Db>, headers: HeaderMap, multipart: Multipart) -> Response {
    let Some(user_id) = authorize(&db, &headers).await else {
        return forbidden();
    };
    let upload = match read_upload(multipart).await {
        Ok(upload) => upload,
        Err(e) => return bad_request(&e),
    };
    let (Some(name), Some(animal_type), Some(age), Some(photo)) =
        (upload.name, upload.animal_type, upload.age, upload.photo)
    else {
        return bad_request("name, animal_type, age and pet_photo are required");
    };
    let form = PetForm {
        name,
        animal_type,
        age,
    };
    let pet = db.write().await.insert(&user_id, form, photo);
    Json(pet).into_response()
}

async fn update_pet(
    State(db): State<Db>,
    Path(pet_id): Path<String>,
    headers: HeaderMap,
    form: Result<Form<PetForm>, FormRejection>,
) -> Response {
    let Some(user_id) = authorize(&db, &headers).await else {
        return forbidden();
    };
    let Ok(Form(form)) = form else {
        return bad_request("name, animal_type and age are required");
    };
    let mut service = db.write().await;
    let Some(pet) = service.pets.iter_mut().find(|p| p.id == pet_id) else {
        return bad_request(&format!("pet {pet_id:?} does not exist"));
    };
    if pet.user_id != user_id {
        return forbidden();
    }
    pet.name = form.name;
    pet.animal_type = form.animal_type;
    pet.age = form.age;
    Json(pet.clone()).into_response()
}

async fn delete_pet(
    State(db): State<Db>,
    Path(pet_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let Some(user_id) = authorize(&db, &headers).await else {
        return forbidden();
    };
    let mut service = db.write().await;
    let Some(index) = service.pets.iter().position(|p| p.id == pet_id) else {
        return bad_request(&format!("pet {pet_id:?} does not exist"));
    };
    if service.pets[index].user_id != user_id {
        return forbidden();
    }
    service.pets.remove(index);
    StatusCode::OK.into_response()
}

async fn set_photo(
    State(db): State<Db>,
    Path(pet_id): Path<String>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Response {
    let Some(user_id) = authorize(&db, &headers).await else {
        return forbidden();
    };
    let photo = match read_upload(multipart).await {
        Ok(Upload {
            photo: Some(photo), ..
        }) => photo,
        Ok(_) => return bad_request("pet_photo is required"),
        Err(e) => return bad_request(&e),
    };
    let mut service = db.write().await;
    let Some(pet) = service.pets.iter_mut().find(|p| p.id == pet_id) else {
        return bad_request(&format!("pet {pet_id:?} does not exist"));
    };
    if pet.user_id != user_id {
        return forbidden();
    }
    pet.pet_photo = photo;
    Json(pet.clone()).into_response()
}
