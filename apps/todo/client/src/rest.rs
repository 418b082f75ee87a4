//! Sequence over the HTTP/JSON gateway

use axum_helpers::ErrorResponse;
use domain_todo::API_VERSION;
use domain_todo::handlers::json::{
    CreateResponseJson, DeleteResponseJson, ReadAllResponseJson, ReadResponseJson, ToDoBody,
    UpdateResponseJson,
};
use eyre::{Result, WrapErr, eyre};
use reqwest::{Client, RequestBuilder};
use rpc::todo::v1::ToDo;
use serde::de::DeserializeOwned;
use tracing::info;

use crate::{Report, sample_todo, with_scheme};

/// Send `request`, decoding either the expected body or the gateway's error body
async fn send<T: DeserializeOwned>(step: &str, request: RequestBuilder) -> Result<T> {
    let response = request
        .send()
        .await
        .wrap_err_with(|| format!("{step} request failed"))?;
    let status = response.status();

    if status.is_success() {
        return response
            .json::<T>()
            .await
            .wrap_err_with(|| format!("{step} returned an unexpected body"));
    }

    match response.json::<ErrorResponse>().await {
        Ok(err) => Err(eyre!(
            "{step} failed with HTTP {status}: {} ({})",
            err.message,
            err.error
        )),
        Err(_) => Err(eyre!("{step} failed with HTTP {status}")),
    }
}

pub async fn run(server: &str) -> Result<Report> {
    let base = with_scheme(server);
    let base = base.trim_end_matches('/');
    let client = Client::new();

    let created: CreateResponseJson = send(
        "Create",
        client.post(format!("{base}/v1/task")).json(&ToDoBody {
            api: API_VERSION.to_string(),
            to_do: Some(sample_todo()?.into()),
        }),
    )
    .await?;
    info!(id = created.id, "Create result");

    let read: ReadResponseJson = send(
        "Read",
        client
            .get(format!("{base}/v1/task/{}", created.id))
            .query(&[("api", API_VERSION)]),
    )
    .await?;
    let mut todo = read.to_do.ok_or_else(|| eyre!("Read returned no task"))?;
    info!(?todo, "Read result");

    let read_back: ToDo = todo.clone().into();
    todo.description.push_str(" updated");
    let updated: UpdateResponseJson = send(
        "Update",
        client
            .put(format!("{base}/v1/task/{}", created.id))
            .json(&ToDoBody {
                api: API_VERSION.to_string(),
                to_do: Some(todo),
            }),
    )
    .await?;
    info!(updated = updated.updated, "Update result");

    let all: ReadAllResponseJson = send(
        "ReadAll",
        client
            .get(format!("{base}/v1/task/all"))
            .query(&[("api", API_VERSION)]),
    )
    .await?;
    info!(count = all.to_dos.len(), "ReadAll result");

    let deleted: DeleteResponseJson = send(
        "Delete",
        client
            .delete(format!("{base}/v1/task/{}", created.id))
            .query(&[("api", API_VERSION)]),
    )
    .await?;
    info!(deleted = deleted.deleted, "Delete result");

    Ok(Report {
        id: created.id,
        read: read_back,
        updated: updated.updated,
        listed: all.to_dos.into_iter().map(Into::into).collect(),
        deleted: deleted.deleted,
    })
}
