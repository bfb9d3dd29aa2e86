//! Blocking executor for the PetFriends API.
//!
//! # Overview
//! `PetFriends` pairs the stateless `PetFriendsClient` from `petfriends-core`
//! with a `ureq` agent and runs each request it builds. Every operation
//! returns the service's `(status, body)` pair as an `ApiResponse`.
//!
//! # Design
//! - The agent is configured with `http_status_as_error(false)`, so 4xx and
//!   5xx responses come back as data. `Err` means the request never got an
//!   HTTP response, or a photo file could not be read.
//! - No retries and no timeout beyond ureq's defaults.
//! - Headers are never logged; they carry passwords and auth keys.

use std::path::Path;

use petfriends_core::{
    ApiError, ApiResponse, AuthKey, Credentials, HttpMethod, HttpRequest, HttpResponse,
    PetFields, PetFilter, PetFriendsClient, PetPhoto, Settings,
};

pub use petfriends_core;

/// Response bodies are read whole; listings embed base64 photos and can
/// exceed ureq's default 10 MiB cap.
const MAX_BODY_BYTES: u64 = u64::MAX;

#[derive(Clone)]
pub struct PetFriends {
    client: PetFriendsClient,
    agent: ureq::Agent,
}

impl std::fmt::Debug for PetFriends {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PetFriends")
            .field("base_url", &self.client.base_url())
            .finish_non_exhaustive()
    }
}

impl Default for PetFriends {
    fn default() -> Self {
        Self::with_client(PetFriendsClient::default())
    }
}

impl PetFriends {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(PetFriendsClient::new(base_url))
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(&settings.base_url)
    }

    fn with_client(client: PetFriendsClient) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { client, agent }
    }

    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }

    /// Exchange credentials for an auth key; the key is under `key` on success.
    pub fn get_api_key(&self, credentials: &Credentials) -> Result<ApiResponse, ApiError> {
        self.execute(self.client.build_get_api_key(credentials))
    }

    /// List pets; the records are under `pets`.
    pub fn get_list_of_pets(
        &self,
        auth_key: &AuthKey,
        filter: PetFilter,
    ) -> Result<ApiResponse, ApiError> {
        self.execute(self.client.build_get_list_of_pets(auth_key, filter))
    }

    pub fn add_new_pet(
        &self,
        auth_key: &AuthKey,
        name: &str,
        animal_type: &str,
        age: &str,
        photo_path: impl AsRef<Path>,
    ) -> Result<ApiResponse, ApiError> {
        let photo = PetPhoto::from_path(photo_path)?;
        let fields = PetFields::new(name, animal_type, age);
        self.execute(self.client.build_add_new_pet(auth_key, &fields, &photo))
    }

    pub fn add_new_pet_without_photo(
        &self,
        auth_key: &AuthKey,
        name: &str,
        animal_type: &str,
        age: &str,
    ) -> Result<ApiResponse, ApiError> {
        let fields = PetFields::new(name, animal_type, age);
        self.execute(self.client.build_add_new_pet_without_photo(auth_key, &fields))
    }

    pub fn update_pet_info(
        &self,
        auth_key: &AuthKey,
        pet_id: &str,
        name: &str,
        animal_type: &str,
        age: &str,
    ) -> Result<ApiResponse, ApiError> {
        let fields = PetFields::new(name, animal_type, age);
        self.execute(self.client.build_update_pet_info(auth_key, pet_id, &fields))
    }

    pub fn delete_pet(&self, auth_key: &AuthKey, pet_id: &str) -> Result<ApiResponse, ApiError> {
        self.execute(self.client.build_delete_pet(auth_key, pet_id))
    }

    /// Replace the photo of an existing pet.
    pub fn add_photo_of_pet(
        &self,
        auth_key: &AuthKey,
        pet_id: &str,
        photo_path: impl AsRef<Path>,
    ) -> Result<ApiResponse, ApiError> {
        let photo = PetPhoto::from_path(photo_path)?;
        self.execute(self.client.build_add_photo_of_pet(auth_key, pet_id, &photo))
    }

    /// Run a prebuilt request and parse whatever comes back.
    pub fn execute(&self, request: HttpRequest) -> Result<ApiResponse, ApiError> {
        log::debug!("{} {}", request.method.as_str(), request.url);
        let response = self.send(&request).inspect_err(|e| {
            log::warn!("{} {} failed: {e}", request.method.as_str(), request.url);
        })?;
        log::debug!("{} {} -> {}", request.method.as_str(), request.url, response.status);
        Ok(self.client.parse_response(response))
    }

    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let url = request.url.as_str();
        let headers = &request.headers;
        let result = match (request.method, request.body.as_deref()) {
            (HttpMethod::Get, _) => with_headers(self.agent.get(url), headers).call(),
            (HttpMethod::Delete, _) => with_headers(self.agent.delete(url), headers).call(),
            (HttpMethod::Post, Some(body)) => with_headers(self.agent.post(url), headers).send(body),
            (HttpMethod::Post, None) => with_headers(self.agent.post(url), headers).send_empty(),
            (HttpMethod::Put, Some(body)) => with_headers(self.agent.put(url), headers).send(body),
            (HttpMethod::Put, None) => with_headers(self.agent.put(url), headers).send_empty(),
        };
        let mut response = result.map_err(transport)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| Some((k.as_str().to_string(), v.to_str().ok()?.to_string())))
            .collect();
        let body = response
            .body_mut()
            .with_config()
            .limit(MAX_BODY_BYTES)
            .read_to_string()
            .map_err(transport)?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name, value);
    }
    builder
}

fn transport(err: ureq::Error) -> ApiError {
    ApiError::Transport(err.to_string())
}
