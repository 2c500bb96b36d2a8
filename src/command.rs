use std::any::Any;

/// How `command_text` is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CommandType {
    #[default]
    Text,
    StoredProcedure,
    TableDirect,
}

/// How command results are applied back to the updated row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UpdateRowSource {
    None,
    OutputParameters,
    FirstReturnedRecord,
    #[default]
    Both,
}

/// Any command object an adapter event can carry
pub trait DbCommand: std::fmt::Debug {
    fn command_text(&self) -> &str;

    /// Type name used in mismatch errors
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

/// The driver's own command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MySqlCommand {
    command_text: String,
    command_type: CommandType,
    /// Seconds; 0 waits forever
    command_timeout: u32,
    updated_row_source: UpdateRowSource,
}

impl MySqlCommand {
    pub fn new(command_text: impl Into<String>) -> Self {
        Self {
            command_text: command_text.into(),
            command_type: CommandType::Text,
            command_timeout: 30,
            updated_row_source: UpdateRowSource::Both,
        }
    }

    pub fn with_command_type(mut self, command_type: CommandType) -> Self {
        self.command_type = command_type;
        self
    }

    pub fn with_timeout(mut self, seconds: u32) -> Self {
        self.command_timeout = seconds;
        self
    }

    pub fn with_updated_row_source(mut self, source: UpdateRowSource) -> Self {
        self.updated_row_source = source;
        self
    }

    pub fn command_type(&self) -> CommandType {
        self.command_type
    }

    pub fn command_timeout(&self) -> u32 {
        self.command_timeout
    }

    pub fn updated_row_source(&self) -> UpdateRowSource {
        self.updated_row_source
    }

    pub fn set_command_text(&mut self, text: impl Into<String>) {
        self.command_text = text.into();
    }
}

impl DbCommand for MySqlCommand {
    fn command_text(&self) -> &str {
        &self.command_text
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}
