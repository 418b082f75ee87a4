//! Proto ↔ row conversions
//!
//! Wire input that cannot be converted is the caller's fault
//! (`InvalidArgument`); stored values that cannot be converted back are ours
//! (`Unknown`).

use grpc_client::conversions::{datetime_to_timestamp, required_timestamp_to_datetime};
use rpc::todo::v1::ToDo;

use crate::error::{TodoError, TodoResult};
use crate::store::{NewTodo, TodoRow};

/// Unwrap the `to_do` payload of a Create or Update request
pub fn required_todo(to_do: Option<ToDo>) -> TodoResult<ToDo> {
    to_do.ok_or_else(|| TodoError::InvalidArgument("toDo field is required".to_string()))
}

pub fn new_todo_from_proto(todo: ToDo) -> TodoResult<NewTodo> {
    let reminder = required_timestamp_to_datetime(todo.reminder.as_ref(), "reminder")
        .map_err(|e| TodoError::InvalidArgument(format!("reminder field has invalid format: {e}")))?;
    Ok(NewTodo {
        title: todo.title,
        description: todo.description,
        reminder,
    })
}

pub fn row_from_proto(todo: ToDo) -> TodoResult<TodoRow> {
    let id = todo.id;
    let NewTodo {
        title,
        description,
        reminder,
    } = new_todo_from_proto(todo)?;
    Ok(TodoRow {
        id,
        title,
        description,
        reminder,
    })
}

pub fn row_to_proto(row: TodoRow) -> TodoResult<ToDo> {
    let reminder = datetime_to_timestamp(row.reminder)
        .map_err(|e| TodoError::Unknown(format!("reminder field has invalid format: {e}")))?;
    Ok(ToDo {
        id: row.id,
        title: row.title,
        description: row.description,
        reminder: Some(reminder),
    })
}
