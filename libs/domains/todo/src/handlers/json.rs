//! JSON shapes of the gateway, following proto3 JSON mapping.
//!
//! Field names are lowerCamelCase with the proto names accepted as aliases,
//! `int64` is written as a string and read from a string or a number, and
//! timestamps are RFC 3339 in UTC. Default values are always written.

use chrono::{DateTime, SecondsFormat};
use prost_types::Timestamp;
use rpc::todo::v1 as pb;
use serde::{Deserialize, Serialize};

mod int64 {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(i64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Number(n) => Ok(n),
            Repr::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| D::Error::custom(format!("invalid int64 value '{s}'"))),
        }
    }
}

mod timestamp {
    use super::*;
    use serde::{Deserializer, Serializer, de::Error as _, ser::Error as _};

    pub fn serialize<S: Serializer>(
        value: &Option<Timestamp>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            None => serializer.serialize_none(),
            Some(ts) => {
                let dt = grpc_client::conversions::timestamp_to_datetime(ts)
                    .map_err(S::Error::custom)?;
                serializer.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Timestamp>, D::Error> {
        let Some(text) = Option::<String>::deserialize(deserializer)? else {
            return Ok(None);
        };
        let dt = DateTime::parse_from_rfc3339(&text)
            .map_err(|e| D::Error::custom(format!("invalid timestamp '{text}': {e}")))?;
        let nanos = i32::try_from(dt.timestamp_subsec_nanos())
            .map_err(|_| D::Error::custom(format!("invalid timestamp '{text}'")))?;
        Ok(Some(Timestamp {
            seconds: dt.timestamp(),
            nanos,
        }))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToDoJson {
    #[serde(default, with = "int64")]
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, with = "timestamp")]
    pub reminder: Option<Timestamp>,
}

impl From<pb::ToDo> for ToDoJson {
    fn from(todo: pb::ToDo) -> Self {
        Self {
            id: todo.id,
            title: todo.title,
            description: todo.description,
            reminder: todo.reminder,
        }
    }
}

impl From<ToDoJson> for pb::ToDo {
    fn from(todo: ToDoJson) -> Self {
        Self {
            id: todo.id,
            title: todo.title,
            description: todo.description,
            reminder: todo.reminder,
        }
    }
}

/// `?api=` on bodiless routes
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiQuery {
    #[serde(default)]
    pub api: String,
}

/// Body of Create and Update
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToDoBody {
    #[serde(default)]
    pub api: String,
    #[serde(default, rename = "toDo", alias = "to_do", alias = "todo")]
    pub to_do: Option<ToDoJson>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateResponseJson {
    #[serde(default)]
    pub api: String,
    #[serde(default, with = "int64")]
    pub id: i64,
}

impl From<pb::CreateResponse> for CreateResponseJson {
    fn from(r: pb::CreateResponse) -> Self {
        Self { api: r.api, id: r.id }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadResponseJson {
    #[serde(default)]
    pub api: String,
    #[serde(default, rename = "toDo", alias = "to_do")]
    pub to_do: Option<ToDoJson>,
}

impl From<pb::ReadResponse> for ReadResponseJson {
    fn from(r: pb::ReadResponse) -> Self {
        Self {
            api: r.api,
            to_do: r.to_do.map(Into::into),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateResponseJson {
    #[serde(default)]
    pub api: String,
    #[serde(default, with = "int64")]
    pub updated: i64,
}

impl From<pb::UpdateResponse> for UpdateResponseJson {
    fn from(r: pb::UpdateResponse) -> Self {
        Self {
            api: r.api,
            updated: r.updated,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteResponseJson {
    #[serde(default)]
    pub api: String,
    #[serde(default, with = "int64")]
    pub deleted: i64,
}

impl From<pb::DeleteResponse> for DeleteResponseJson {
    fn from(r: pb::DeleteResponse) -> Self {
        Self {
            api: r.api,
            deleted: r.deleted,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadAllResponseJson {
    #[serde(default)]
    pub api: String,
    #[serde(default, rename = "toDos", alias = "to_dos")]
    pub to_dos: Vec<ToDoJson>,
}

impl From<pb::ReadAllResponse> for ReadAllResponseJson {
    fn from(r: pb::ReadAllResponse) -> Self {
        Self {
            api: r.api,
            to_dos: r.to_dos.into_iter().map(Into::into).collect(),
        }
    }
}
