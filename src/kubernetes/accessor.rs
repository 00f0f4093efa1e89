// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Generic read, list, create and delete operations.
//!
//! The kind and namespace of a resource are carried by the `Api<K>` handle,
//! so every operation is addressed by `(Api<K>, name)` or `(Api<K>, selector)`.

use crate::error::{Error, Result};
use kube::{
    api::{DeleteParams, ListParams, PostParams},
    Api, Resource, ResourceExt,
};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Debug;
use tracing::{debug, instrument};

fn describe<K: Resource<DynamicType = ()>>(name: &str) -> String {
    format!("{} {}", K::kind(&()), name)
}

/// Read a resource, `None` when it does not exist
#[instrument(skip(api), fields(kind = %K::kind(&())))]
pub async fn get<K>(api: &Api<K>, name: &str) -> Result<Option<K>>
where
    K: Resource<DynamicType = ()> + Clone + DeserializeOwned + Debug,
{
    api.get_opt(name)
        .await
        .map_err(|e| Error::request("get", describe::<K>(name), e))
}

/// Read a resource that is expected to exist; a 404 is an error
pub async fn get_existing<K>(api: &Api<K>, name: &str) -> Result<K>
where
    K: Resource<DynamicType = ()> + Clone + DeserializeOwned + Debug,
{
    api.get(name)
        .await
        .map_err(|e| Error::request("get", describe::<K>(name), e))
}

/// List resources, optionally restricted by a label selector
#[instrument(skip(api), fields(kind = %K::kind(&())))]
pub async fn list<K>(api: &Api<K>, selector: Option<&str>) -> Result<Vec<K>>
where
    K: Resource<DynamicType = ()> + Clone + DeserializeOwned + Debug,
{
    let mut params = ListParams::default();
    if let Some(selector) = selector.filter(|s| !s.is_empty()) {
        params = params.labels(selector);
    }

    let list = api.list(&params).await.map_err(|e| {
        Error::request(
            "list",
            format!("{} matching '{}'", K::plural(&()), selector.unwrap_or_default()),
            e,
        )
    })?;
    Ok(list.items)
}

/// Create a resource and return the object as stored by the API server
pub async fn create<K>(api: &Api<K>, object: &K) -> Result<K>
where
    K: Resource<DynamicType = ()> + Clone + DeserializeOwned + Serialize + Debug,
{
    let name = object.name_any();
    let created = api
        .create(&PostParams::default(), object)
        .await
        .map_err(|e| Error::request("create", describe::<K>(&name), e))?;
    debug!("Created {}", describe::<K>(&name));
    Ok(created)
}

/// Delete a resource, dependents are removed in the background
pub async fn delete<K>(api: &Api<K>, name: &str) -> Result<()>
where
    K: Resource<DynamicType = ()> + Clone + DeserializeOwned + Debug,
{
    api.delete(name, &DeleteParams::background())
        .await
        .map_err(|e| Error::request("delete", describe::<K>(name), e))?;
    debug!("Deleted {}", describe::<K>(name));
    Ok(())
}
