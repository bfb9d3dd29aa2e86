//! Stateless HTTP request builder and response parser for the PetFriends API.
//!
//! # Design
//! `PetFriendsClient` holds only a `base_url`. Each service operation has a
//! `build_*` method producing an `HttpRequest`; every response goes through
//! the single `parse_response`, because the service's contract is uniform:
//! a status code plus a JSON or text body, with no status treated as an
//! error. The caller executes the HTTP round-trip in between.

use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::multipart::MultipartBody;
use crate::types::{ApiResponse, AuthKey, Credentials, PetFields, PetFilter, PetPhoto, ResponseBody};

/// Public PetFriends deployment.
pub const DEFAULT_BASE_URL: &str = "https://petfriends.skillfactory.ru";

const AUTH_KEY_HEADER: &str = "auth_key";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Synchronous, stateless client for the PetFriends API.
#[derive(Debug, Clone)]
pub struct PetFriendsClient {
    base_url: String,
}

impl Default for PetFriendsClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl PetFriendsClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /api/key` with the credentials as `email` / `password` headers.
    pub fn build_get_api_key(&self, credentials: &Credentials) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: format!("{}/api/key", self.base_url),
            headers: vec![
                ("email".to_string(), credentials.email.clone()),
                ("password".to_string(), credentials.password.clone()),
            ],
            body: None,
        }
    }

    pub fn build_get_list_of_pets(&self, auth_key: &AuthKey, filter: PetFilter) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: format!(
                "{}/api/pets?filter={}",
                self.base_url,
                urlencoding::encode(filter.as_query_value())
            ),
            headers: vec![auth_header(auth_key)],
            body: None,
        }
    }

    /// `POST /api/pets` as multipart, with the photo in `pet_photo`.
    pub fn build_add_new_pet(
        &self,
        auth_key: &AuthKey,
        fields: &PetFields,
        photo: &PetPhoto,
    ) -> HttpRequest {
        let mut body = MultipartBody::new();
        for (name, value) in fields.form_pairs() {
            body = body.text(name, value);
        }
        let (content_type, body) = body.file("pet_photo", photo).finish();
        HttpRequest {
            method: HttpMethod::Post,
            url: format!("{}/api/pets", self.base_url),
            headers: vec![auth_header(auth_key), ("content-type".to_string(), content_type)],
            body: Some(body),
        }
    }

    /// `POST /api/create_pet_simple` as a url-encoded form.
    pub fn build_add_new_pet_without_photo(
        &self,
        auth_key: &AuthKey,
        fields: &PetFields,
    ) -> HttpRequest {
        self.form_request(
            HttpMethod::Post,
            format!("{}/api/create_pet_simple", self.base_url),
            auth_key,
            fields,
        )
    }

    pub fn build_update_pet_info(
        &self,
        auth_key: &AuthKey,
        pet_id: &str,
        fields: &PetFields,
    ) -> HttpRequest {
        self.form_request(HttpMethod::Put, self.pet_url(pet_id), auth_key, fields)
    }

    pub fn build_delete_pet(&self, auth_key: &AuthKey, pet_id: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            url: self.pet_url(pet_id),
            headers: vec![auth_header(auth_key)],
            body: None,
        }
    }

    /// `POST /api/pets/set_photo/{pet_id}` with only the `pet_photo` part.
    pub fn build_add_photo_of_pet(
        &self,
        auth_key: &AuthKey,
        pet_id: &str,
        photo: &PetPhoto,
    ) -> HttpRequest {
        let (content_type, body) = MultipartBody::new().file("pet_photo", photo).finish();
        HttpRequest {
            method: HttpMethod::Post,
            url: format!(
                "{}/api/pets/set_photo/{}",
                self.base_url,
                urlencoding::encode(pet_id)
            ),
            headers: vec![auth_header(auth_key), ("content-type".to_string(), content_type)],
            body: Some(body),
        }
    }

    /// Turn any response into the `(status, body)` pair.
    ///
    /// The body is parsed as JSON when the content type says so, or when no
    /// content type was sent and the text happens to be JSON. Anything else,
    /// including JSON-typed bodies that fail to parse, stays raw text.
    pub fn parse_response(&self, response: HttpResponse) -> ApiResponse {
        let declared_json = response
            .header("content-type")
            .map(|ct| ct.to_ascii_lowercase().contains("json"));
        let body = match declared_json {
            Some(false) => ResponseBody::Text(response.body),
            Some(true) | None => match serde_json::from_str(&response.body) {
                Ok(value) => ResponseBody::Json(value),
                Err(_) => ResponseBody::Text(response.body),
            },
        };
        ApiResponse {
            status: response.status,
            body,
        }
    }

    fn pet_url(&self, pet_id: &str) -> String {
        format!("{}/api/pets/{}", self.base_url, urlencoding::encode(pet_id))
    }

    fn form_request(
        &self,
        method: HttpMethod,
        url: String,
        auth_key: &AuthKey,
        fields: &PetFields,
    ) -> HttpRequest {
        HttpRequest {
            method,
            url,
            headers: vec![
                auth_header(auth_key),
                ("content-type".to_string(), FORM_CONTENT_TYPE.to_string()),
            ],
            body: Some(encode_form(&fields.form_pairs()).into_bytes()),
        }
    }
}

fn auth_header(auth_key: &AuthKey) -> (String, String) {
    (AUTH_KEY_HEADER.to_string(), auth_key.key.clone())
}

fn encode_form(pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}
