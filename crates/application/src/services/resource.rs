//! Generic CRUD client for one REST resource.

use campus_domain::{ApiRequest, DomainError};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::client::AuthenticatedApiClient;
use crate::error::{ApiError, ApiResult};

/// CRUD operations against one service base URL.
#[derive(Debug, Clone)]
pub struct ResourceClient {
    api: AuthenticatedApiClient,
    institution_scoped: bool,
}

impl ResourceClient {
    /// Wraps `api`; scoped resources send the institution context headers and
    /// refuse to run without them.
    #[must_use]
    pub const fn new(api: AuthenticatedApiClient, institution_scoped: bool) -> Self {
        Self {
            api,
            institution_scoped,
        }
    }

    /// The underlying client, for calls outside the CRUD shape.
    #[must_use]
    pub const fn api(&self) -> &AuthenticatedApiClient {
        &self.api
    }

    /// `GET {base}`
    ///
    /// # Errors
    /// Propagates [`AuthenticatedApiClient::execute`] errors.
    pub async fn list<T: DeserializeOwned>(&self) -> ApiResult<Vec<T>> {
        self.list_with_query(&[]).await
    }

    /// `GET {base}?{query}`
    ///
    /// An empty response is an empty list.
    ///
    /// # Errors
    /// Propagates [`AuthenticatedApiClient::execute`] errors.
    pub async fn list_with_query<T: DeserializeOwned>(
        &self,
        query: &[(&str, &str)],
    ) -> ApiResult<Vec<T>> {
        let path = if query.is_empty() {
            String::new()
        } else {
            let encoded = url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(query)
                .finish();
            format!("?{encoded}")
        };

        match self.api.execute(&self.scoped(ApiRequest::get(path))).await? {
            Value::Null => Ok(Vec::new()),
            value => decode(value),
        }
    }

    /// `GET {base}/{id}`
    ///
    /// # Errors
    /// Propagates [`AuthenticatedApiClient::execute`] errors.
    pub async fn get<T: DeserializeOwned>(&self, id: &str) -> ApiResult<T> {
        let request = ApiRequest::get(item_path(id)?);
        self.api.send(&self.scoped(request)).await
    }

    /// `POST {base}`
    ///
    /// # Errors
    /// Propagates [`AuthenticatedApiClient::execute`] errors.
    pub async fn create<T, B>(&self, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + Sync,
    {
        let request = ApiRequest::post("", encode(body)?);
        self.api.send(&self.scoped(request)).await
    }

    /// `PUT {base}/{id}`
    ///
    /// # Errors
    /// Propagates [`AuthenticatedApiClient::execute`] errors.
    pub async fn update<T, B>(&self, id: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + Sync,
    {
        let request = ApiRequest::put(item_path(id)?, encode(body)?);
        self.api.send(&self.scoped(request)).await
    }

    /// `PATCH {base}/{id}`
    ///
    /// # Errors
    /// Propagates [`AuthenticatedApiClient::execute`] errors.
    pub async fn patch<T, B>(&self, id: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + Sync,
    {
        let request = ApiRequest::patch(item_path(id)?, encode(body)?);
        self.api.send(&self.scoped(request)).await
    }

    /// `DELETE {base}/{id}`
    ///
    /// # Errors
    /// Propagates [`AuthenticatedApiClient::execute`] errors.
    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        let request = ApiRequest::delete(item_path(id)?);
        self.api.execute(&self.scoped(request)).await.map(drop)
    }

    /// `POST {base}/{action}` for endpoints that are not plain CRUD.
    ///
    /// # Errors
    /// Propagates [`AuthenticatedApiClient::execute`] errors.
    pub async fn post_action<T, B>(&self, action: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + Sync,
    {
        let request = ApiRequest::post(format!("/{}", action.trim_start_matches('/')), encode(body)?);
        self.api.send(&self.scoped(request)).await
    }

    fn scoped(&self, request: ApiRequest) -> ApiRequest {
        if self.institution_scoped {
            request.institution_scoped()
        } else {
            request
        }
    }
}

fn item_path(id: &str) -> ApiResult<String> {
    if id.is_empty() || id.contains(['/', '?', '#']) {
        return Err(DomainError::InvalidPath(format!("invalid resource id: {id:?}")).into());
    }
    Ok(format!("/{id}"))
}

fn encode<B: Serialize>(body: &B) -> ApiResult<Value> {
    serde_json::to_value(body).map_err(|e| DomainError::InvalidBody(e.to_string()).into())
}

fn decode<T: DeserializeOwned>(value: Value) -> ApiResult<T> {
    serde_json::from_value(value).map_err(|e| ApiError::Decode {
        message: e.to_string(),
    })
}
