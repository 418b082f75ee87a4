//! Sequence over native gRPC

use domain_todo::API_VERSION;
use eyre::{Result, WrapErr, eyre};
use grpc_client::create_channel;
use rpc::todo::v1::{
    CreateRequest, DeleteRequest, ReadAllRequest, ReadRequest, UpdateRequest,
    to_do_service_client::ToDoServiceClient,
};
use tracing::info;

use crate::{Report, sample_todo, with_scheme};

pub async fn run(server: &str) -> Result<Report> {
    let channel = create_channel(with_scheme(server))
        .await
        .wrap_err_with(|| format!("Failed to connect to {server}"))?;
    let mut client = ToDoServiceClient::new(channel);

    let created = client
        .create(CreateRequest {
            api: API_VERSION.to_string(),
            to_do: Some(sample_todo()?),
        })
        .await
        .wrap_err("Create failed")?
        .into_inner();
    info!(id = created.id, "Create result");

    let read = client
        .read(ReadRequest {
            api: API_VERSION.to_string(),
            id: created.id,
        })
        .await
        .wrap_err("Read failed")?
        .into_inner();
    let mut todo = read
        .to_do
        .ok_or_else(|| eyre!("Read returned no task"))?;
    info!(?todo, "Read result");

    let read_back = todo.clone();
    todo.description.push_str(" updated");
    let updated = client
        .update(UpdateRequest {
            api: API_VERSION.to_string(),
            to_do: Some(todo),
        })
        .await
        .wrap_err("Update failed")?
        .into_inner();
    info!(updated = updated.updated, "Update result");

    let all = client
        .read_all(ReadAllRequest {
            api: API_VERSION.to_string(),
        })
        .await
        .wrap_err("ReadAll failed")?
        .into_inner();
    info!(count = all.to_dos.len(), "ReadAll result");

    let deleted = client
        .delete(DeleteRequest {
            api: API_VERSION.to_string(),
            id: created.id,
        })
        .await
        .wrap_err("Delete failed")?
        .into_inner();
    info!(deleted = deleted.deleted, "Delete result");

    Ok(Report {
        id: created.id,
        read: read_back,
        updated: updated.updated,
        listed: all.to_dos,
        deleted: deleted.deleted,
    })
}
