use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{RequestBuilder, Response};
use url::Url;

use super::wire::{CarsEnvelope, LoginRequest};
use super::CarApi;
use crate::error::{ClientError, ClientResult};
use crate::model::{Car, CarFields, Locator};
use crate::session::Credential;
use crate::types::Operation;

const LOGIN_PATH: &str = "login";
const CARS_PATH: &str = "api/cars";

/// `CarApi` over HTTP. No timeouts and no retries: a hung request stays
/// pending until the server answers.
#[derive(Debug, Clone)]
pub struct HttpCarApi {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpCarApi {
    /// `base_url` should end with '/'; see `config::normalize_base_url`
    pub fn new(base_url: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> ClientResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| ClientError::invalid_locator(path, e))
    }

    /// Resolve a server-issued link. Absolute hrefs are used as-is, relative
    /// ones against the base URL. A trailing URI template (`{?projection}`)
    /// is dropped.
    pub fn resolve(&self, locator: &Locator) -> ClientResult<Url> {
        let href = match locator.as_str().find('{') {
            Some(idx) => &locator.as_str()[..idx],
            None => locator.as_str(),
        };

        match Url::parse(href) {
            Ok(url) => Ok(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => self
                .base_url
                .join(href)
                .map_err(|e| ClientError::invalid_locator(locator.as_str(), e)),
            Err(e) => Err(ClientError::invalid_locator(locator.as_str(), e)),
        }
    }

    fn authorize(builder: RequestBuilder, credential: Option<&Credential>) -> RequestBuilder {
        match credential {
            Some(credential) => builder.header(AUTHORIZATION, credential.as_str()),
            None => builder,
        }
    }

    fn expect_success(operation: Operation, response: Response) -> ClientResult<Response> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(ClientError::Rejected {
                operation,
                status: status.as_u16(),
            })
        }
    }
}

#[async_trait]
impl CarApi for HttpCarApi {
    async fn login(&self, request: &LoginRequest) -> ClientResult<Credential> {
        let url = self.endpoint(LOGIN_PATH)?;
        tracing::debug!("POST {} (user '{}')", url, request.username);

        let response = self.client.post(url).json(request).send().await?;
        let status = response.status().as_u16();

        // The header decides, not the status code
        let token = response
            .headers()
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|token| !token.is_empty());

        match token {
            Some(token) => Ok(Credential::new(token)),
            None => Err(ClientError::MissingToken { status }),
        }
    }

    async fn list_cars(&self, credential: Option<&Credential>) -> ClientResult<Vec<Car>> {
        let url = self.endpoint(CARS_PATH)?;
        tracing::debug!("GET {}", url);

        let response = Self::authorize(self.client.get(url), credential).send().await?;
        let response = Self::expect_success(Operation::Select, response)?;
        let body = response.bytes().await?;
        let envelope: CarsEnvelope = serde_json::from_slice(&body)?;
        Ok(envelope.embedded.cars)
    }

    async fn create_car(&self, credential: Option<&Credential>, fields: &CarFields) -> ClientResult<()> {
        let url = self.endpoint(CARS_PATH)?;
        tracing::debug!("POST {}", url);

        let response = Self::authorize(self.client.post(url), credential)
            .json(fields)
            .send()
            .await?;
        Self::expect_success(Operation::Create, response)?;
        Ok(())
    }

    async fn update_car(
        &self,
        credential: Option<&Credential>,
        target: &Locator,
        fields: &CarFields,
    ) -> ClientResult<()> {
        let url = self.resolve(target)?;
        tracing::debug!("PUT {}", url);

        let response = Self::authorize(self.client.put(url), credential)
            .json(fields)
            .send()
            .await?;
        Self::expect_success(Operation::Update, response)?;
        Ok(())
    }

    async fn delete_car(&self, credential: Option<&Credential>, locator: &Locator) -> ClientResult<()> {
        let url = self.resolve(locator)?;
        tracing::debug!("DELETE {}", url);

        let response = Self::authorize(self.client.delete(url), credential).send().await?;
        Self::expect_success(Operation::Delete, response)?;
        Ok(())
    }
}
