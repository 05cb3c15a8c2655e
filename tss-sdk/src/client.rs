//! Secret Server HTTP client.
//!
//! Every operation authenticates from scratch: the access token is fetched,
//! used for one request sequence and dropped.

use crate::{
    config::Configuration,
    credential::UserCredential,
    error::{TssError, TssResult},
    resource::{Endpoint, Resource},
    secrets::{Secret, SecretField, SecretSearchResult, SecretTemplate},
};
use reqwest::{
    Method, Response,
    header::CONTENT_TYPE,
    multipart::{Form, Part},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{Dispatch, debug, error, info, instrument, instrument::WithSubscriber};
use tss_common::{LogLevel, TracingConfig, build_dispatch, build_http_client};

const CLOUD_DOMAIN: &str = "secretservercloud";
const SEARCH_PAGE_SIZE: &str = "100";

/// Form body of the OAuth2 password grant.
#[derive(Serialize)]
struct PasswordGrantRequest<'a> {
    username: &'a str,
    password: &'a str,
    grant_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    domain: Option<&'a str>,
}

/// Token endpoint response. Only the access token outlives the call.
#[derive(Deserialize)]
struct AccessGrant {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
}

/// Error body shapes returned by the REST API and the token endpoint.
#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

/// Client for the Secret Server REST API.
///
/// Owns its HTTP transport and its logger; constructing one never touches
/// process-wide state.
#[derive(Debug, Clone)]
pub struct Client {
    config: Configuration,
    http: reqwest::Client,
    dispatch: Dispatch,
}

impl Client {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns [`TssError::InvalidConfig`] unless exactly one of
    /// `server_url` and `tenant` is set, or if the transport cannot be built
    /// from the TLS settings.
    pub fn new(config: Configuration) -> TssResult<Self> {
        let config = config
            .normalize()
            .inspect_err(|e| error!(error = %e, "invalid client configuration"))?;

        let http = build_http_client(&config.http_config()).map_err(|e| {
            error!(error = %e, "building HTTP transport");
            TssError::invalid_config(format!("building HTTP transport: {e}"))
        })?;

        let dispatch = config.dispatch.clone().unwrap_or_else(|| {
            build_dispatch(&TracingConfig::default().with_log_level(config.log_level))
        });

        Ok(Self {
            config,
            http,
            dispatch,
        })
    }

    /// The normalized configuration in use.
    #[must_use]
    pub const fn config(&self) -> &Configuration {
        &self.config
    }

    /// Verbosity of the client's own logger.
    #[must_use]
    pub const fn log_level(&self) -> LogLevel {
        self.config.log_level
    }

    /// Base URL: the server URL, or the cloud URL of the tenant.
    #[must_use]
    pub fn base_url(&self) -> String {
        if self.config.server_url.is_empty() {
            format!(
                "https://{}.{CLOUD_DOMAIN}.{}/",
                self.config.tenant, self.config.tld
            )
        } else {
            self.config.server_url.clone()
        }
    }

    /// Full URL of `endpoint`, with `path` appended for resources.
    ///
    /// Segments are trimmed of slashes and joined with single slashes; empty
    /// segments are skipped.
    #[must_use]
    pub fn url_for(&self, endpoint: Endpoint, path: &str) -> String {
        let base = self.base_url();
        let segments: Vec<&str> = match endpoint {
            Endpoint::Token => vec![base.as_str(), self.config.token_path_uri.as_str()],
            Endpoint::Resource(resource) => vec![
                base.as_str(),
                self.config.api_path_uri.as_str(),
                resource.as_str(),
                path,
            ],
        };

        segments
            .into_iter()
            .map(|s| s.trim_matches('/'))
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Obtain a bearer token.
    ///
    /// A static token is returned without any network call. Otherwise the
    /// password grant is exchanged at the token endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`TssError::AuthenticationFailed`] when the token endpoint is
    /// unreachable, rejects the credentials, or answers with a malformed grant.
    pub async fn access_token(&self) -> TssResult<SecretString> {
        self.scoped(self.fetch_access_token()).await
    }

    /// Send an authenticated request to `resource` and return the raw body.
    ///
    /// `body` is serialized to JSON. POST, PUT and PATCH requests carry
    /// `Content-Type: application/json`.
    ///
    /// # Errors
    ///
    /// Fails on serialization, authentication, transport, or non-2xx status.
    pub async fn access_resource<T>(
        &self,
        method: Method,
        resource: Resource,
        path: &str,
        body: Option<&T>,
    ) -> TssResult<Vec<u8>>
    where
        T: Serialize + ?Sized,
    {
        self.scoped(self.request(method, resource, path, &[], body))
            .await
    }

    /// Upload the content of `field` as the file of field `field.slug` on
    /// the secret `secret_id`. The bytes are sent unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`TssError::FieldNotFound`] when `field.slug` is empty.
    /// Otherwise fails on authentication, multipart construction, transport,
    /// or non-2xx status.
    pub async fn upload_file(&self, secret_id: i64, field: &SecretField) -> TssResult<()> {
        self.scoped(self.put_file(secret_id, field)).await
    }

    /// Read a secret, downloading the content of its file fields.
    ///
    /// # Errors
    ///
    /// Fails if the secret or any of its attachments cannot be read.
    pub async fn secret(&self, id: i64) -> TssResult<Secret> {
        self.scoped(self.fetch_secret(id)).await
    }

    /// Search secrets by text, optionally restricted to one field slug.
    ///
    /// # Errors
    ///
    /// Fails on authentication, transport, status, or a malformed page.
    pub async fn search_secrets(
        &self,
        search_text: &str,
        search_field: Option<&str>,
    ) -> TssResult<SecretSearchResult> {
        self.scoped(self.fetch_search(search_text, search_field))
            .await
    }

    /// Search secrets and read every hit in full.
    ///
    /// # Errors
    ///
    /// Fails if the search or any individual read fails.
    pub async fn secrets(
        &self,
        search_text: &str,
        search_field: Option<&str>,
    ) -> TssResult<Vec<Secret>> {
        self.scoped(async {
            let page = self.fetch_search(search_text, search_field).await?;
            let mut secrets = Vec::with_capacity(page.records.len());
            for record in &page.records {
                secrets.push(self.fetch_secret(record.id).await?);
            }
            Ok(secrets)
        })
        .await
    }

    /// Create a secret and return it as stored.
    ///
    /// # Errors
    ///
    /// Fails if the template cannot be read, a field does not belong to the
    /// template, or any request fails.
    pub async fn create_secret(&self, secret: &Secret) -> TssResult<Secret> {
        self.scoped(self.write_secret(Method::POST, "", secret))
            .await
    }

    /// Replace the secret `secret.id` and return it as stored.
    ///
    /// # Errors
    ///
    /// Same as [`Client::create_secret`].
    pub async fn update_secret(&self, secret: &Secret) -> TssResult<Secret> {
        self.scoped(self.write_secret(Method::PUT, &secret.id.to_string(), secret))
            .await
    }

    /// Delete a secret.
    ///
    /// # Errors
    ///
    /// Fails on authentication, transport, or status.
    pub async fn delete_secret(&self, id: i64) -> TssResult<()> {
        self.scoped(self.delete(Resource::Secrets, id)).await
    }

    /// Read a secret template.
    ///
    /// # Errors
    ///
    /// Fails on authentication, transport, status, or a malformed template.
    pub async fn secret_template(&self, id: i64) -> TssResult<SecretTemplate> {
        self.scoped(self.fetch_secret_template(id)).await
    }

    /// Create a secret template and return it as stored.
    ///
    /// # Errors
    ///
    /// Fails on authentication, transport, status, or a malformed template.
    pub async fn create_secret_template(
        &self,
        template: &SecretTemplate,
    ) -> TssResult<SecretTemplate> {
        self.scoped(async {
            let data = self
                .request(Method::POST, Resource::SecretTemplates, "", &[], Some(template))
                .await?;
            decode(&data, "secret template")
        })
        .await
    }

    /// Delete a secret template.
    ///
    /// # Errors
    ///
    /// Fails on authentication, transport, or status.
    pub async fn delete_secret_template(&self, id: i64) -> TssResult<()> {
        self.scoped(self.delete(Resource::SecretTemplates, id))
            .await
    }

    /// Generate a password that satisfies the rules of the template field
    /// `slug`.
    ///
    /// # Errors
    ///
    /// Returns [`TssError::FieldNotFound`] if the template has no such field;
    /// otherwise fails like any other request.
    pub async fn generate_password(
        &self,
        slug: &str,
        template: &SecretTemplate,
    ) -> TssResult<SecretString> {
        self.scoped(async {
            let field = template.field_by_slug(slug).ok_or_else(|| {
                error!(slug, template_id = template.id, "no such template field");
                TssError::field_not_found(slug)
            })?;
            let path = format!("generate-password/{}", field.secret_template_field_id);
            let data = self
                .request::<()>(Method::POST, Resource::SecretTemplates, &path, &[], None)
                .await?;
            let password: String = decode(&data, "generated password")?;
            Ok(SecretString::from(password))
        })
        .await
    }

    fn scoped<F: Future>(&self, future: F) -> impl Future<Output = F::Output> {
        future.with_subscriber(self.dispatch.clone())
    }

    #[instrument(skip(self))]
    async fn fetch_access_token(&self) -> TssResult<SecretString> {
        let (username, password, domain) = match &self.config.credentials {
            UserCredential::AccessToken(token) => return Ok(token.clone()),
            UserCredential::Password {
                username,
                password,
                domain,
            } => (username, password, domain),
        };

        let form = PasswordGrantRequest {
            username: username.as_str(),
            password: password.expose_secret(),
            grant_type: "password",
            domain: domain.as_deref(),
        };
        let url = self.url_for(Endpoint::Token, "");
        debug!(%url, username = %username, "requesting access grant");

        let response = self.http.post(&url).form(&form).send().await.map_err(|e| {
            error!(error = %e, "grant request failed");
            TssError::auth_failed(e.to_string())
        })?;

        let data = handle_response(response).await.map_err(|e| {
            error!(error = %e, "grant response error");
            match e {
                TssError::Status { status, message } => {
                    TssError::auth_failed(format!("token endpoint returned {status}: {message}"))
                }
                other => TssError::auth_failed(other.to_string()),
            }
        })?;

        let grant: AccessGrant = serde_json::from_slice(&data).map_err(|e| {
            error!(error = %e, "parsing grant response");
            TssError::auth_failed(format!("malformed grant: {e}"))
        })?;
        if grant.access_token.is_empty() {
            error!("grant response carries no access token");
            return Err(TssError::auth_failed("grant carries no access token"));
        }

        debug!(
            token_type = grant.token_type.as_deref().unwrap_or_default(),
            expires_in = ?grant.expires_in,
            has_refresh_token = grant.refresh_token.is_some(),
            "received access grant"
        );
        Ok(SecretString::from(grant.access_token))
    }

    #[instrument(skip(self, query, body))]
    async fn request<T>(
        &self,
        method: Method,
        resource: Resource,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&T>,
    ) -> TssResult<Vec<u8>>
    where
        T: Serialize + ?Sized,
    {
        let payload = body
            .map(serde_json::to_vec)
            .transpose()
            .inspect_err(|e| error!(error = %e, "marshaling the request body to JSON"))?;

        let url = self.url_for(Endpoint::Resource(resource), path);
        let mut request = self.http.request(method.clone(), &url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(payload) = payload {
            request = request.body(payload);
        }

        let token = self
            .fetch_access_token()
            .await
            .inspect_err(|e| error!(error = %e, "error getting access token"))?;
        request = request.bearer_auth(token.expose_secret());

        if method == Method::POST || method == Method::PUT || method == Method::PATCH {
            request = request.header(CONTENT_TYPE, "application/json");
        }

        debug!(%method, %url, "calling");
        let response = request.send().await.inspect_err(|e| {
            error!(error = %e, %method, %url, "request failed");
        })?;
        handle_response(response).await
    }

    #[instrument(skip(self, field), fields(slug = %field.slug))]
    async fn put_file(&self, secret_id: i64, field: &SecretField) -> TssResult<()> {
        debug!(filename = %field.filename, "uploading a file");
        if field.slug.is_empty() {
            error!(secret_id, "file field has no slug");
            return Err(TssError::field_not_found(format!(
                "file field of secret {secret_id} has no slug"
            )));
        }

        let token = self
            .fetch_access_token()
            .await
            .inspect_err(|e| error!(error = %e, "error getting access token"))?;

        let filename = field.upload_filename();
        if filename != field.filename {
            debug!(%filename, "adjusted upload filename");
        }
        let part = Part::bytes(field.content().to_vec())
            .file_name(filename)
            .mime_str("application/octet-stream")
            .map_err(|e| {
                error!(error = %e, "building multipart form");
                TssError::file_upload(e.to_string())
            })?;
        let form = Form::new().part("file", part);

        let url = self.url_for(
            Endpoint::Resource(Resource::Secrets),
            &format!("{secret_id}/fields/{}", field.slug),
        );
        debug!(%url, "uploading file with PUT");

        let response = self
            .http
            .put(&url)
            .bearer_auth(token.expose_secret())
            .multipart(form)
            .send()
            .await
            .inspect_err(|e| error!(error = %e, %url, "upload failed"))?;
        handle_response(response).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn fetch_secret(&self, id: i64) -> TssResult<Secret> {
        let data = self
            .request::<()>(Method::GET, Resource::Secrets, &id.to_string(), &[], None)
            .await?;
        let mut secret: Secret = decode(&data, "secret")?;

        for field in secret.fields.iter_mut().filter(|f| f.has_attachment()) {
            debug!(slug = %field.slug, "downloading file attachment");
            let path = format!("{id}/fields/{}", field.slug);
            let content = self
                .request::<()>(Method::GET, Resource::Secrets, &path, &[], None)
                .await?;
            field.set_attachment(content);
        }

        Ok(secret)
    }

    #[instrument(skip(self))]
    async fn fetch_search(
        &self,
        search_text: &str,
        search_field: Option<&str>,
    ) -> TssResult<SecretSearchResult> {
        let mut query = vec![
            ("filter.searchText", search_text),
            ("filter.doNotCalculateTotal", "true"),
            ("take", SEARCH_PAGE_SIZE),
        ];
        if let Some(field) = search_field {
            query.push(("filter.searchField", field));
        }

        let data = self
            .request::<()>(Method::GET, Resource::Secrets, "", &query, None)
            .await?;
        let page: SecretSearchResult = decode(&data, "search result")?;
        info!(hits = page.records.len(), total = page.total, "secret search complete");
        Ok(page)
    }

    #[instrument(skip(self))]
    async fn fetch_secret_template(&self, id: i64) -> TssResult<SecretTemplate> {
        let data = self
            .request::<()>(
                Method::GET,
                Resource::SecretTemplates,
                &id.to_string(),
                &[],
                None,
            )
            .await?;
        decode(&data, "secret template")
    }

    #[instrument(skip(self, secret), fields(name = %secret.name, template_id = secret.secret_template_id))]
    async fn write_secret(&self, method: Method, path: &str, secret: &Secret) -> TssResult<Secret> {
        let template = self.fetch_secret_template(secret.secret_template_id).await?;

        let mut body = secret.clone();
        let mut file_fields = Vec::new();
        let mut fields = Vec::with_capacity(body.fields.len());
        for mut field in std::mem::take(&mut body.fields) {
            let template_field = if field.field_id == 0 {
                template.field_by_slug(&field.slug)
            } else {
                template.field_by_id(field.field_id)
            };
            let Some(template_field) = template_field else {
                error!(field_id = field.field_id, slug = %field.slug, "field is not part of the template");
                return Err(TssError::field_not_found(format!(
                    "field {} (id {}) is not defined by template {}",
                    field.slug, field.field_id, template.id
                )));
            };
            template_field.complete(&mut field);

            if field.is_file {
                file_fields.push(field);
            } else {
                fields.push(field);
            }
        }
        body.fields = fields;

        let data = self
            .request(method, Resource::Secrets, path, &[], Some(&body))
            .await?;
        let written: Secret = decode(&data, "written secret")?;

        for field in &file_fields {
            if field.content().is_empty() {
                debug!(slug = %field.slug, "file field has no content, not uploading");
                continue;
            }
            self.put_file(written.id, field).await?;
        }

        info!(id = written.id, "secret written");
        self.fetch_secret(written.id).await
    }

    #[instrument(skip(self))]
    async fn delete(&self, resource: Resource, id: i64) -> TssResult<()> {
        self.request::<()>(Method::DELETE, resource, &id.to_string(), &[], None)
            .await?;
        info!(id, "deleted");
        Ok(())
    }
}

/// Return the body of a 2xx response, or a [`TssError::Status`] carrying
/// the server's message.
async fn handle_response(response: Response) -> TssResult<Vec<u8>> {
    let status = response.status();
    let body = response
        .bytes()
        .await
        .inspect_err(|e| error!(error = %e, %status, "reading response body"))?;

    if status.is_success() {
        return Ok(body.to_vec());
    }

    let message = serde_json::from_slice::<ErrorBody>(&body)
        .ok()
        .and_then(|e| e.message.or(e.error))
        .unwrap_or_else(|| String::from_utf8_lossy(&body).trim().to_string());
    error!(%status, %message, "server returned an error");
    Err(TssError::Status { status, message })
}

fn decode<T: DeserializeOwned>(data: &[u8], what: &str) -> TssResult<T> {
    serde_json::from_slice(data).map_err(|e| {
        error!(error = %e, what, "parsing response");
        TssError::from(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server_client(server_url: &str) -> Client {
        Client::new(Configuration::for_server(
            server_url,
            UserCredential::password("u", "p"),
        ))
        .unwrap()
    }

    #[test]
    fn test_tenant_base_url() {
        let client = Client::new(Configuration::for_tenant(
            "acme",
            UserCredential::password("u", "p"),
        ))
        .unwrap();
        assert_eq!(client.base_url(), "https://acme.secretservercloud.com/");
        assert_eq!(
            client.url_for(Endpoint::Token, ""),
            "https://acme.secretservercloud.com/oauth2/token"
        );
        assert_eq!(
            client.url_for(Resource::Secrets.into(), "1"),
            "https://acme.secretservercloud.com/api/v1/secrets/1"
        );
    }

    #[test]
    fn test_tenant_with_tld() {
        let client = Client::new(
            Configuration::for_tenant("acme", UserCredential::access_token("t")).with_tld("eu"),
        )
        .unwrap();
        assert_eq!(
            client.url_for(Resource::SecretTemplates.into(), "/6001/"),
            "https://acme.secretservercloud.eu/api/v1/secret-templates/6001"
        );
    }

    #[test]
    fn test_server_resource_url() {
        let client = server_client("https://h/");
        assert_eq!(
            client.url_for(Resource::Secrets.into(), "5/fields/x"),
            "https://h/api/v1/secrets/5/fields/x"
        );
        assert_eq!(client.url_for(Resource::Secrets.into(), ""), "https://h/api/v1/secrets");
    }

    #[test]
    fn test_token_url_ignores_path_and_slashes() {
        let client = Client::new(
            Configuration::for_server("https://h/SecretServer//", UserCredential::password("u", "p"))
                .with_token_path_uri("///oauth2/token//"),
        )
        .unwrap();
        assert_eq!(
            client.url_for(Endpoint::Token, "ignored"),
            "https://h/SecretServer/oauth2/token"
        );
    }

    #[test]
    fn test_rejects_invalid_identity() {
        let err = Client::new(Configuration::new(UserCredential::access_token("t"))).unwrap_err();
        assert!(matches!(err, TssError::InvalidConfig(_)));
    }

    #[test]
    fn test_log_level_kept_on_client() {
        let client = Client::new(
            Configuration::for_server("https://h", UserCredential::access_token("t"))
                .with_log_level(LogLevel::Warn),
        )
        .unwrap();
        assert_eq!(client.log_level(), LogLevel::Warn);
    }

    #[tokio::test]
    async fn test_static_token_returned_unchanged() {
        let client = Client::new(Configuration::for_server(
            "https://unreachable.invalid",
            UserCredential::access_token("static-token"),
        ))
        .unwrap();
        let token = client.access_token().await.unwrap();
        assert_eq!(token.expose_secret(), "static-token");
    }
}
