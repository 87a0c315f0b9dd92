pub mod http;
pub mod wire;

use async_trait::async_trait;

use crate::error::ClientResult;
use crate::model::{Car, CarFields, Locator};
use crate::session::Credential;

pub use http::HttpCarApi;
pub use wire::LoginRequest;

/// The remote carshop API.
///
/// Every call takes the credential explicitly. `None` still issues the
/// request, just without an `Authorization` header; rejecting it is the
/// server's business.
#[async_trait]
pub trait CarApi: Send + Sync {
    /// Exchange username/password for a token taken from the
    /// `Authorization` response header.
    async fn login(&self, request: &LoginRequest) -> ClientResult<Credential>;

    async fn list_cars(&self, credential: Option<&Credential>) -> ClientResult<Vec<Car>>;

    async fn create_car(&self, credential: Option<&Credential>, fields: &CarFields) -> ClientResult<()>;

    async fn update_car(
        &self,
        credential: Option<&Credential>,
        target: &Locator,
        fields: &CarFields,
    ) -> ClientResult<()>;

    async fn delete_car(&self, credential: Option<&Credential>, locator: &Locator) -> ClientResult<()>;
}
