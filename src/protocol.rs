//! Wire types for the remote store's JSON API.

use crate::types::Id;
use serde::{Deserialize, Serialize};

/// Successful responses wrap their payload in `data`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

/// Failed responses may carry a message in `error`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

/// Request bodies sent to the remote store.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Request<'a> {
    Login {
        email: &'a str,
        password: &'a str,
    },

    Signup {
        name: &'a str,
        email: &'a str,
        password: &'a str,
    },

    /// Create or rename a project.
    ProjectName { name: &'a str },

    #[serde(rename_all = "camelCase")]
    AddTask { project_id: &'a Id, column_id: &'a Id },

    #[serde(rename_all = "camelCase")]
    EditTask { new_content: &'a str },

    /// Body for requests that carry no fields.
    Empty {},
}
