use std::any::type_name;

use crate::command::{DbCommand, MySqlCommand};
use crate::error::{Error, Result};
use crate::value::Value;

/// Kind of SQL statement an adapter runs for a row
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementType {
    Select = 0,
    Insert = 1,
    Update = 2,
    Delete = 3,
    Batch = 4,
}

/// Pending change recorded on a row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RowState {
    Detached,
    #[default]
    Unchanged,
    Added,
    Deleted,
    Modified,
}

/// What the adapter does after an event handler returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UpdateStatus {
    #[default]
    Continue,
    ErrorsOccurred,
    SkipCurrentRow,
    SkipAllRemainingRows,
}

/// A row of named values with its pending change
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataRow {
    columns: Vec<String>,
    values: Vec<Value>,
    state: RowState,
}

impl DataRow {
    pub fn new(state: RowState) -> Self {
        Self {
            columns: Vec::new(),
            values: Vec::new(),
            state,
        }
    }

    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.columns.push(column.into());
        self.values.push(value.into());
        self
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c == column)
            .and_then(|i| self.values.get(i))
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn state(&self) -> RowState {
        self.state
    }

    pub fn set_state(&mut self, state: RowState) {
        self.state = state;
    }

    /// Commit the pending change: deleted rows detach, the rest become unchanged
    pub fn accept_changes(&mut self) {
        self.state = match self.state {
            RowState::Deleted => RowState::Detached,
            RowState::Detached => RowState::Detached,
            _ => RowState::Unchanged,
        };
    }
}

/// Maps a source table and its columns to dataset names
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableMapping {
    source_table: String,
    dataset_table: String,
    column_mappings: Vec<(String, String)>,
}

impl TableMapping {
    pub fn new(source_table: impl Into<String>, dataset_table: impl Into<String>) -> Self {
        Self {
            source_table: source_table.into(),
            dataset_table: dataset_table.into(),
            column_mappings: Vec::new(),
        }
    }

    pub fn with_column(mut self, source: impl Into<String>, dataset: impl Into<String>) -> Self {
        self.column_mappings.push((source.into(), dataset.into()));
        self
    }

    pub fn source_table(&self) -> &str {
        &self.source_table
    }

    pub fn dataset_table(&self) -> &str {
        &self.dataset_table
    }

    pub fn dataset_column(&self, source: &str) -> Option<&str> {
        self.column_mappings
            .iter()
            .find(|(s, _)| s == source)
            .map(|(_, d)| d.as_str())
    }
}

#[derive(Debug)]
enum CommandSlot {
    Driver(MySqlCommand),
    Foreign(Box<dyn DbCommand>),
}

impl CommandSlot {
    fn get(&self) -> Result<&MySqlCommand> {
        match self {
            CommandSlot::Driver(command) => Ok(command),
            CommandSlot::Foreign(command) => command
                .as_any()
                .downcast_ref::<MySqlCommand>()
                .ok_or_else(|| mismatch(&**command)),
        }
    }

    fn get_mut(&mut self) -> Result<&mut MySqlCommand> {
        match self {
            CommandSlot::Driver(command) => Ok(command),
            CommandSlot::Foreign(command) => {
                let found = command.type_name();
                command
                    .as_any_mut()
                    .downcast_mut::<MySqlCommand>()
                    .ok_or(Error::CommandTypeMismatch {
                        expected: type_name::<MySqlCommand>(),
                        found,
                    })
            }
        }
    }

    fn into_inner(self) -> Result<MySqlCommand> {
        match self {
            CommandSlot::Driver(command) => Ok(command),
            CommandSlot::Foreign(command) => {
                let found = command.type_name();
                command
                    .into_any()
                    .downcast::<MySqlCommand>()
                    .map(|command| *command)
                    .map_err(|_| Error::CommandTypeMismatch {
                        expected: type_name::<MySqlCommand>(),
                        found,
                    })
            }
        }
    }
}

fn mismatch(command: &dyn DbCommand) -> Error {
    Error::CommandTypeMismatch {
        expected: type_name::<MySqlCommand>(),
        found: command.type_name(),
    }
}

/// Raised before the adapter runs a row's command
///
/// The handler may replace the command or change `status` to skip the row.
#[derive(Debug)]
pub struct RowUpdatingEvent<'a> {
    row: &'a DataRow,
    command: CommandSlot,
    statement_type: StatementType,
    table_mapping: &'a TableMapping,
    status: UpdateStatus,
    errors: Option<String>,
}

impl<'a> RowUpdatingEvent<'a> {
    pub fn new(
        row: &'a DataRow,
        command: MySqlCommand,
        statement_type: StatementType,
        table_mapping: &'a TableMapping,
    ) -> Self {
        Self {
            row,
            command: CommandSlot::Driver(command),
            statement_type,
            table_mapping,
            status: UpdateStatus::Continue,
            errors: None,
        }
    }

    /// Wrap a command whose concrete type is only known at runtime
    pub fn from_db_command(
        row: &'a DataRow,
        command: Box<dyn DbCommand>,
        statement_type: StatementType,
        table_mapping: &'a TableMapping,
    ) -> Self {
        Self {
            row,
            command: CommandSlot::Foreign(command),
            statement_type,
            table_mapping,
            status: UpdateStatus::Continue,
            errors: None,
        }
    }

    pub fn row(&self) -> &'a DataRow {
        self.row
    }

    /// The command about to run, narrowed to the driver command
    pub fn command(&self) -> Result<&MySqlCommand> {
        self.command.get()
    }

    pub fn command_mut(&mut self) -> Result<&mut MySqlCommand> {
        self.command.get_mut()
    }

    /// Substitute the command the adapter will run
    pub fn set_command(&mut self, command: MySqlCommand) {
        self.command = CommandSlot::Driver(command);
    }

    pub fn into_command(self) -> Result<MySqlCommand> {
        self.command.into_inner()
    }

    pub fn statement_type(&self) -> StatementType {
        self.statement_type
    }

    pub fn table_mapping(&self) -> &'a TableMapping {
        self.table_mapping
    }

    pub fn status(&self) -> UpdateStatus {
        self.status
    }

    pub fn set_status(&mut self, status: UpdateStatus) {
        self.status = status;
    }

    pub fn errors(&self) -> Option<&str> {
        self.errors.as_deref()
    }

    /// Abort the update with `message`
    pub fn fail(&mut self, message: impl Into<String>) {
        self.status = UpdateStatus::ErrorsOccurred;
        self.errors = Some(message.into());
    }
}

/// Raised after the adapter ran a row's command
#[derive(Debug)]
pub struct RowUpdatedEvent<'a> {
    row: &'a DataRow,
    command: CommandSlot,
    statement_type: StatementType,
    table_mapping: &'a TableMapping,
    records_affected: u64,
    status: UpdateStatus,
    errors: Option<String>,
}

impl<'a> RowUpdatedEvent<'a> {
    pub fn new(
        row: &'a DataRow,
        command: MySqlCommand,
        statement_type: StatementType,
        table_mapping: &'a TableMapping,
        records_affected: u64,
    ) -> Self {
        Self {
            row,
            command: CommandSlot::Driver(command),
            statement_type,
            table_mapping,
            records_affected,
            status: UpdateStatus::Continue,
            errors: None,
        }
    }

    pub fn from_db_command(
        row: &'a DataRow,
        command: Box<dyn DbCommand>,
        statement_type: StatementType,
        table_mapping: &'a TableMapping,
        records_affected: u64,
    ) -> Self {
        Self {
            row,
            command: CommandSlot::Foreign(command),
            statement_type,
            table_mapping,
            records_affected,
            status: UpdateStatus::Continue,
            errors: None,
        }
    }

    fn failed(mut self, message: String) -> Self {
        self.status = UpdateStatus::ErrorsOccurred;
        self.errors = Some(message);
        self
    }

    pub fn row(&self) -> &'a DataRow {
        self.row
    }

    /// The command that ran, narrowed to the driver command
    pub fn command(&self) -> Result<&MySqlCommand> {
        self.command.get()
    }

    pub fn statement_type(&self) -> StatementType {
        self.statement_type
    }

    pub fn table_mapping(&self) -> &'a TableMapping {
        self.table_mapping
    }

    pub fn records_affected(&self) -> u64 {
        self.records_affected
    }

    pub fn status(&self) -> UpdateStatus {
        self.status
    }

    pub fn set_status(&mut self, status: UpdateStatus) {
        self.status = status;
    }

    pub fn errors(&self) -> Option<&str> {
        self.errors.as_deref()
    }
}

/// Callbacks around each row an adapter writes back
///
/// Both methods default to doing nothing.
pub trait RowUpdateHandler {
    fn row_updating(&mut self, event: &mut RowUpdatingEvent<'_>) -> Result<()> {
        let _ = event;
        Ok(())
    }

    fn row_updated(&mut self, event: &mut RowUpdatedEvent<'_>) -> Result<()> {
        let _ = event;
        Ok(())
    }
}

impl RowUpdateHandler for () {}

/// Writes changed rows back through the insert, update and delete commands
///
/// This is the only producer of row update events, so every event it raises
/// carries a [`MySqlCommand`].
#[derive(Debug)]
pub struct DataAdapter<H> {
    insert_command: Option<MySqlCommand>,
    update_command: Option<MySqlCommand>,
    delete_command: Option<MySqlCommand>,
    handler: H,
}

impl<H: RowUpdateHandler> DataAdapter<H> {
    pub fn new(handler: H) -> Self {
        Self {
            insert_command: None,
            update_command: None,
            delete_command: None,
            handler,
        }
    }

    pub fn with_insert_command(mut self, command: MySqlCommand) -> Self {
        self.insert_command = Some(command);
        self
    }

    pub fn with_update_command(mut self, command: MySqlCommand) -> Self {
        self.update_command = Some(command);
        self
    }

    pub fn with_delete_command(mut self, command: MySqlCommand) -> Self {
        self.delete_command = Some(command);
        self
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn into_handler(self) -> H {
        self.handler
    }

    /// Run the matching command for every added, modified or deleted row
    ///
    /// `execute` performs the statement and returns the affected row count.
    /// Rows that were written have their changes accepted. Returns the total
    /// number of affected rows.
    #[tracing::instrument(skip_all, fields(table = mapping.source_table()))]
    pub fn update<F>(
        &mut self,
        rows: &mut [DataRow],
        mapping: &TableMapping,
        mut execute: F,
    ) -> Result<u64>
    where
        F: FnMut(&MySqlCommand, &DataRow) -> Result<u64>,
    {
        let mut total = 0;
        for (index, row) in rows.iter_mut().enumerate() {
            let (statement_type, command) = match row.state() {
                RowState::Added => (StatementType::Insert, &self.insert_command),
                RowState::Modified => (StatementType::Update, &self.update_command),
                RowState::Deleted => (StatementType::Delete, &self.delete_command),
                RowState::Unchanged | RowState::Detached => continue,
            };
            let command = command.clone().ok_or_else(|| {
                Error::BadConfigError(format!(
                    "{statement_type:?} command is required for rows with pending changes"
                ))
            })?;

            let mut updating = RowUpdatingEvent::new(&*row, command, statement_type, mapping);
            self.handler.row_updating(&mut updating)?;
            match updating.status() {
                UpdateStatus::Continue => {}
                UpdateStatus::SkipCurrentRow => {
                    tracing::debug!(index, "row skipped by handler");
                    continue;
                }
                UpdateStatus::SkipAllRemainingRows => {
                    tracing::debug!(index, "remaining rows skipped by handler");
                    break;
                }
                UpdateStatus::ErrorsOccurred => return Err(rejected(updating.errors())),
            }
            let command = updating.into_command()?;

            let mut updated = match execute(&command, &*row) {
                Ok(n) => RowUpdatedEvent::new(&*row, command, statement_type, mapping, n),
                Err(err) => {
                    let event = RowUpdatedEvent::new(&*row, command, statement_type, mapping, 0);
                    event.failed(err.to_string())
                }
            };
            self.handler.row_updated(&mut updated)?;
            let affected = updated.records_affected();
            match updated.status() {
                UpdateStatus::Continue => {}
                UpdateStatus::SkipCurrentRow => continue,
                UpdateStatus::SkipAllRemainingRows => {
                    total += affected;
                    row.accept_changes();
                    break;
                }
                UpdateStatus::ErrorsOccurred => return Err(rejected(updated.errors())),
            }

            total += affected;
            row.accept_changes();
        }
        Ok(total)
    }
}

fn rejected(errors: Option<&str>) -> Error {
    Error::RowUpdateFailed(errors.unwrap_or("rejected by handler").to_string())
}
