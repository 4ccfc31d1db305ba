//! Typed CRUD over the backend's entity collections.

use std::fmt;
use std::str::FromStr;

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::types::{
    BusinessDivision, BusinessDivisionDraft, Competency, Department, DepartmentDraft, Employee, EmployeeDraft,
    JobRole, JobRoleDraft,
};
use crate::error::ApiError;
use crate::http::{ApiClient, path_segment};

/// A REST collection with list/read/create/update/delete endpoints.
pub trait Entity: DeserializeOwned + Serialize + Send + Sync + 'static {
    /// Collection path, as the backend spells it (trailing slash included).
    const COLLECTION: &'static str;
    /// Human label used in messages.
    const LABEL: &'static str;

    type Key: fmt::Display + FromStr + PartialEq + Send + Sync;
    type Draft: Serialize + DeserializeOwned + Send + Sync;

    fn key(&self) -> Self::Key;

    fn item_path(key: &Self::Key) -> String {
        format!("{}/{}", Self::COLLECTION.trim_end_matches('/'), path_segment(&key.to_string()))
    }

    /// Single-item read path; `None` when the backend only offers the list.
    fn read_path(key: &Self::Key) -> Option<String> {
        Some(Self::item_path(key))
    }
}

impl Entity for BusinessDivision {
    const COLLECTION: &'static str = "/business-divisions/";
    const LABEL: &'static str = "Business division";
    type Key = i64;
    type Draft = BusinessDivisionDraft;

    fn key(&self) -> i64 {
        self.id
    }
}

impl Entity for Department {
    const COLLECTION: &'static str = "/departments/";
    const LABEL: &'static str = "Department";
    type Key = i64;
    type Draft = DepartmentDraft;

    fn key(&self) -> i64 {
        self.id
    }
}

impl Entity for JobRole {
    const COLLECTION: &'static str = "/roles";
    const LABEL: &'static str = "Role";
    type Key = i64;
    type Draft = JobRoleDraft;

    fn key(&self) -> i64 {
        self.id
    }

    fn read_path(key: &i64) -> Option<String> {
        Some(format!("/getrole/{key}"))
    }
}

impl Entity for Competency {
    const COLLECTION: &'static str = "/competency";
    const LABEL: &'static str = "Competency";
    type Key = String;
    type Draft = Competency;

    fn key(&self) -> String {
        self.competency_code.clone()
    }

    fn read_path(_: &String) -> Option<String> {
        None
    }
}

impl Entity for Employee {
    const COLLECTION: &'static str = "/employees/";
    const LABEL: &'static str = "Employee";
    type Key = String;
    type Draft = EmployeeDraft;

    fn key(&self) -> String {
        self.employee_number.clone()
    }
}

/// # Errors
///
/// See [`ApiClient::send`].
pub async fn list<E: Entity>(client: &ApiClient) -> Result<Vec<E>, ApiError> {
    client.get_json(E::COLLECTION).await
}

/// Read one item. Collections without a read endpoint are searched by key.
///
/// # Errors
///
/// A missing item is reported as a 404 [`ApiError::Status`] in both cases.
pub async fn get<E: Entity>(client: &ApiClient, key: &E::Key) -> Result<E, ApiError> {
    if let Some(path) = E::read_path(key) {
        return client.get_json(&path).await;
    }
    list::<E>(client)
        .await?
        .into_iter()
        .find(|item| item.key() == *key)
        .ok_or_else(|| ApiError::Status {
            status: 404,
            body: serde_json::json!({ "detail": format!("{} not found", E::LABEL) }).to_string(),
        })
}

/// # Errors
///
/// See [`ApiClient::send`]; duplicates surface as validation errors.
pub async fn create<E: Entity>(client: &ApiClient, draft: &E::Draft) -> Result<E, ApiError> {
    client.send_json(Method::POST, E::COLLECTION, draft).await
}

/// # Errors
///
/// See [`ApiClient::send`].
pub async fn update<E: Entity>(client: &ApiClient, key: &E::Key, draft: &E::Draft) -> Result<E, ApiError> {
    client.send_json(Method::PUT, &E::item_path(key), draft).await
}

/// # Errors
///
/// See [`ApiClient::send`].
pub async fn delete<E: Entity>(client: &ApiClient, key: &E::Key) -> Result<(), ApiError> {
    client.delete(&E::item_path(key)).await
}

#[cfg(test)]
#[path = "crud_test.rs"]
mod tests;
