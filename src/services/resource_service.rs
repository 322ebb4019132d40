// ============================================================================
// RESOURCE SERVICE - SOLO comunicación API de un recurso (list/create/update/delete)
// ============================================================================

use std::marker::PhantomData;

use serde_json::Value;

use crate::models::{FormValues, Resource, ResourceId};
use crate::services::cancel::CancelHandle;
use crate::services::errors::FetchError;
use crate::services::request_gateway::{ApiCall, RequestGateway};
use crate::utils::constants::*;

/// Conjunto de endpoints de un tipo de recurso
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceEndpoints {
    pub list: String,
    pub create: String,
    pub update: String,
    /// Prefijo; el id se agrega como último segmento
    pub delete: String,
}

impl ResourceEndpoints {
    pub fn clinics() -> Self {
        Self {
            list: CLINICS_LIST_PATH.to_string(),
            create: CLINICS_CREATE_PATH.to_string(),
            update: CLINICS_UPDATE_PATH.to_string(),
            delete: CLINICS_DELETE_PATH.to_string(),
        }
    }

    pub fn pay_periods() -> Self {
        Self {
            list: PAY_PERIODS_LIST_PATH.to_string(),
            create: PAY_PERIODS_CREATE_PATH.to_string(),
            update: PAY_PERIODS_UPDATE_PATH.to_string(),
            delete: PAY_PERIODS_DELETE_PATH.to_string(),
        }
    }

    pub fn delete_path(&self, id: &ResourceId) -> String {
        format!("{}/{}", self.delete.trim_end_matches('/'), id)
    }
}

#[derive(Clone)]
pub struct ResourceService<R: Resource> {
    gateway: RequestGateway,
    endpoints: ResourceEndpoints,
    _resource: PhantomData<R>,
}

impl<R: Resource> ResourceService<R> {
    pub fn new(gateway: RequestGateway, endpoints: ResourceEndpoints) -> Self {
        Self {
            gateway,
            endpoints,
            _resource: PhantomData,
        }
    }

    pub fn default_timeout_ms(&self) -> u32 {
        self.gateway.default_timeout_ms()
    }

    /// Listado completo; un body vacío cuenta como lista vacía
    pub async fn list(&self, cancel: CancelHandle) -> Result<Vec<R>, FetchError> {
        let value = self
            .gateway
            .call(ApiCall::get(self.endpoints.list.as_str()).cancel_with(cancel))
            .await?;
        if value.is_null() {
            return Ok(Vec::new());
        }
        serde_json::from_value(value).map_err(|e| FetchError::MalformedResponse(e.to_string()))
    }

    pub async fn create(&self, form: &FormValues, cancel: CancelHandle) -> Result<Value, FetchError> {
        let body = R::payload(form, None);
        self.gateway
            .call(ApiCall::post(self.endpoints.create.as_str(), body).cancel_with(cancel))
            .await
    }

    pub async fn update(
        &self,
        id: &ResourceId,
        form: &FormValues,
        cancel: CancelHandle,
    ) -> Result<Value, FetchError> {
        let body = R::payload(form, Some(id));
        self.gateway
            .call(ApiCall::put(self.endpoints.update.as_str(), body).cancel_with(cancel))
            .await
    }

    pub async fn delete(&self, id: &ResourceId, cancel: CancelHandle) -> Result<Value, FetchError> {
        self.gateway
            .call(ApiCall::delete(self.endpoints.delete_path(id)).cancel_with(cancel))
            .await
    }
}
