use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::constant::{CertificateStoreLocation, ConnectionProtocol, SslMode};
use crate::error::{Error, Result, eyre};
use crate::keyword::ValidKeywords;
use crate::property::{OptionType, OptionValue, PropertyDefaultValue};

/// Declaration of one connection option
///
/// ```rs
/// let port = OptionDescriptor::new("Connect Timeout", OptionValue::UInt(15))
///     .property("ConnectionTimeout")
///     .keywords("connection timeout");
/// ```
#[derive(Debug, Clone)]
pub struct OptionDescriptor {
    display_name: &'static str,
    property: Option<&'static str>,
    keywords: Option<ValidKeywords>,
    default: PropertyDefaultValue,
    obsolete: Option<&'static str>,
}

impl OptionDescriptor {
    pub fn new(display_name: &'static str, default: OptionValue) -> Self {
        Self {
            display_name,
            property: None,
            keywords: None,
            default: PropertyDefaultValue::from(default),
            obsolete: None,
        }
    }

    /// Programmatic property name, accepted as a keyword as well
    pub fn property(mut self, name: &'static str) -> Self {
        self.property = Some(name);
        self
    }

    /// Comma-separated alternative keywords
    pub fn keywords(mut self, keywords: &str) -> Self {
        self.keywords = Some(ValidKeywords::new(keywords));
        self
    }

    /// Mark the option obsolete; using it logs `message`
    pub fn obsolete(mut self, message: &'static str) -> Self {
        self.obsolete = Some(message);
        self
    }

    pub fn display_name(&self) -> &'static str {
        self.display_name
    }

    pub fn valid_keywords(&self) -> Option<&ValidKeywords> {
        self.keywords.as_ref()
    }

    pub fn default(&self) -> &PropertyDefaultValue {
        &self.default
    }

    pub fn ty(&self) -> OptionType {
        self.default.ty()
    }

    pub fn obsolete_message(&self) -> Option<&'static str> {
        self.obsolete
    }
}

/// Every known connection option, indexed by all of its keywords
#[derive(Debug, Default)]
pub struct OptionRegistry {
    descriptors: Vec<OptionDescriptor>,
    // lowercased keyword -> index into `descriptors`
    lookup: HashMap<String, usize>,
}

impl OptionRegistry {
    pub fn with(mut self, descriptor: OptionDescriptor) -> Self {
        let index = self.descriptors.len();
        self.lookup.insert(descriptor.display_name.to_lowercase(), index);
        if let Some(property) = descriptor.property {
            self.lookup.insert(property.to_lowercase(), index);
        }
        if let Some(keywords) = &descriptor.keywords {
            for keyword in keywords.keywords() {
                self.lookup.insert(keyword.trim().to_string(), index);
            }
        }
        self.descriptors.push(descriptor);
        self
    }

    /// Resolve any accepted keyword, ignoring case and surrounding spaces
    pub fn find(&self, keyword: &str) -> Option<&OptionDescriptor> {
        self.lookup
            .get(&keyword.trim().to_lowercase())
            .and_then(|&index| self.descriptors.get(index))
    }

    pub fn resolve(&self, keyword: &str) -> Result<&OptionDescriptor> {
        self.find(keyword)
            .ok_or_else(|| Error::KeywordNotSupported(keyword.to_string()))
    }

    pub fn descriptors(&self) -> &[OptionDescriptor] {
        &self.descriptors
    }

    fn standard() -> Self {
        use OptionValue as V;

        Self::default()
            .with(OptionDescriptor::new("Allow Batch", V::Bool(true)).property("AllowBatch"))
            .with(
                OptionDescriptor::new("Allow User Variables", V::Bool(false))
                    .property("AllowUserVariables"),
            )
            .with(
                OptionDescriptor::new("Allow Zero Datetime", V::Bool(false))
                    .property("AllowZeroDateTime"),
            )
            .with(OptionDescriptor::new("Auto Enlist", V::Bool(true)).property("AutoEnlist"))
            .with(OptionDescriptor::new("BlobAsUTF8ExcludePattern", V::String(String::new())))
            .with(OptionDescriptor::new("BlobAsUTF8IncludePattern", V::String(String::new())))
            .with(
                OptionDescriptor::new("Certificate File", V::OptionalString(None))
                    .property("CertificateFile"),
            )
            .with(
                OptionDescriptor::new("Certificate Password", V::OptionalString(None))
                    .property("CertificatePassword"),
            )
            .with(
                OptionDescriptor::new(
                    "Certificate Store Location",
                    V::CertificateStoreLocation(CertificateStoreLocation::None),
                )
                .property("CertificateStoreLocation"),
            )
            .with(
                OptionDescriptor::new("Certificate Thumbprint", V::OptionalString(None))
                    .property("CertificateThumbprint"),
            )
            .with(
                OptionDescriptor::new("Connection Lifetime", V::UInt(0))
                    .property("ConnectionLifeTime"),
            )
            .with(
                OptionDescriptor::new("Connection Protocol", V::Protocol(ConnectionProtocol::Tcp))
                    .property("ConnectionProtocol")
                    .keywords("protocol"),
            )
            .with(
                OptionDescriptor::new("Connection Reset", V::Bool(false))
                    .property("ConnectionReset"),
            )
            .with(
                OptionDescriptor::new("Connect Timeout", V::UInt(15))
                    .property("ConnectionTimeout")
                    .keywords("connection timeout"),
            )
            .with(
                OptionDescriptor::new("Convert Zero Datetime", V::Bool(false))
                    .property("ConvertZeroDateTime"),
            )
            .with(
                OptionDescriptor::new("Database", V::String(String::new()))
                    .keywords("initial catalog"),
            )
            .with(
                OptionDescriptor::new("Default Command Timeout", V::UInt(30))
                    .property("DefaultCommandTimeout")
                    .keywords("command timeout"),
            )
            .with(
                OptionDescriptor::new("Encrypt", V::Bool(false))
                    .obsolete("Encrypt is now obsolete. Use Ssl Mode instead"),
            )
            .with(
                OptionDescriptor::new("Functions Return String", V::Bool(false))
                    .property("FunctionsReturnString"),
            )
            .with(
                OptionDescriptor::new("Character Set", V::String(String::new()))
                    .property("CharacterSet")
                    .keywords("charset"),
            )
            .with(OptionDescriptor::new("Ignore Prepare", V::Bool(true)).property("IgnorePrepare"))
            .with(
                OptionDescriptor::new("Interactive Session", V::Bool(false))
                    .property("InteractiveSession")
                    .keywords("interactive"),
            )
            .with(OptionDescriptor::new("Keep Alive", V::UInt(0)).property("Keepalive"))
            .with(OptionDescriptor::new("Logging", V::Bool(false)))
            .with(
                OptionDescriptor::new("Maximum Pool Size", V::UInt(100))
                    .property("MaximumPoolSize")
                    .keywords("max pool size"),
            )
            .with(
                OptionDescriptor::new("Minimum Pool Size", V::UInt(0))
                    .property("MinimumPoolSize")
                    .keywords("min pool size"),
            )
            .with(OptionDescriptor::new("Old Guids", V::Bool(false)).property("OldGuids"))
            .with(OptionDescriptor::new("Password", V::String(String::new())).keywords("pwd"))
            .with(
                OptionDescriptor::new("Persist Security Info", V::Bool(false))
                    .property("PersistSecurityInfo"),
            )
            .with(
                OptionDescriptor::new("Pipe Name", V::String("MYSQL".to_string()))
                    .property("PipeName")
                    .keywords("pipe"),
            )
            .with(OptionDescriptor::new("Pooling", V::Bool(true)))
            .with(OptionDescriptor::new("Port", V::UInt(3306)))
            .with(
                OptionDescriptor::new("Procedure Cache Size", V::UInt(25))
                    .property("ProcedureCacheSize")
                    .keywords("procedure cache, procedurecache"),
            )
            .with(
                OptionDescriptor::new("Respect Binary Flags", V::Bool(true))
                    .property("RespectBinaryFlags"),
            )
            .with(
                OptionDescriptor::new("Server", V::String(String::new()))
                    .keywords("host, data source, datasource, address, addr, network address"),
            )
            .with(
                OptionDescriptor::new("Shared Memory Name", V::String("MYSQL".to_string()))
                    .property("SharedMemoryName"),
            )
            .with(
                OptionDescriptor::new("Sql Server Mode", V::Bool(false))
                    .property("SqlServerMode")
                    .keywords("sqlservermode, sql server mode"),
            )
            .with(OptionDescriptor::new("Ssl Mode", V::SslMode(SslMode::None)).property("SslMode"))
            .with(
                OptionDescriptor::new("Treat Blobs As UTF8", V::Bool(false))
                    .property("TreatBlobsAsUTF8"),
            )
            .with(
                OptionDescriptor::new("Treat Tiny As Boolean", V::Bool(true))
                    .property("TreatTinyAsBoolean"),
            )
            .with(
                OptionDescriptor::new("Use Affected Rows", V::Bool(false))
                    .property("UseAffectedRows"),
            )
            .with(
                OptionDescriptor::new("Use Compression", V::Bool(false))
                    .property("UseCompression")
                    .keywords("compress"),
            )
            .with(
                OptionDescriptor::new("Use Old Syntax", V::Bool(false))
                    .property("UseOldSyntax")
                    .keywords("old syntax, oldsyntax")
                    .obsolete("Use Old Syntax is now obsolete.  Please see documentation"),
            )
            .with(
                OptionDescriptor::new("Use Performance Monitor", V::Bool(false))
                    .property("UsePerformanceMonitor")
                    .keywords("userperfmon, perfmon"),
            )
            .with(
                OptionDescriptor::new("Use Procedure Bodies", V::Bool(true))
                    .property("UseProcedureBodies")
                    .keywords("procedure bodies"),
            )
            .with(
                OptionDescriptor::new("User Id", V::String(String::new()))
                    .property("UserID")
                    .keywords("uid, username, user name, user"),
            )
            .with(
                OptionDescriptor::new("Use Usage Advisor", V::Bool(false))
                    .property("UseUsageAdvisor")
                    .keywords("usage advisor"),
            )
    }
}

pub static OPTIONS: LazyLock<OptionRegistry> = LazyLock::new(OptionRegistry::standard);

/// A set of connection options in `key=value;...` form
///
/// Options that were never set read back as their registered default.
///
/// ```rs
/// let mut builder = ConnectionStringBuilder::parse("server=db;uid=root;pwd=secret")?;
/// builder.set("protocol", "unix")?;
/// assert_eq!(builder.connection_string(false), "Server=db;User Id=root;Connection Protocol=UnixSocket");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConnectionStringBuilder {
    // explicitly set options, keyed by display name, in insertion order
    values: Vec<(&'static str, OptionValue)>,
}

impl ConnectionStringBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(conn_str: &str) -> Result<Self> {
        let mut builder = Self::new();
        for (key, value) in split_pairs(conn_str)? {
            builder.set(key, &value)?;
        }
        Ok(builder)
    }

    /// The value of an option, explicit or default
    pub fn get(&self, keyword: &str) -> Result<&OptionValue> {
        let descriptor = resolve(keyword)?;
        Ok(self
            .values
            .iter()
            .find(|(name, _)| *name == descriptor.display_name)
            .map(|(_, value)| value)
            .unwrap_or_else(|| descriptor.default.default_value()))
    }

    /// Whether the option was set explicitly
    pub fn contains(&self, keyword: &str) -> Result<bool> {
        let descriptor = resolve(keyword)?;
        Ok(self
            .values
            .iter()
            .any(|(name, _)| *name == descriptor.display_name))
    }

    /// Set an option from connection string text
    pub fn set(&mut self, keyword: &str, text: &str) -> Result<()> {
        let descriptor = resolve(keyword)?;
        let value = OptionValue::parse(descriptor.ty(), descriptor.display_name, text)?;
        self.store(descriptor, value);
        Ok(())
    }

    /// Set an option from a typed value
    pub fn set_value(&mut self, keyword: &str, value: OptionValue) -> Result<()> {
        let descriptor = resolve(keyword)?;
        if value.ty() != descriptor.ty() {
            return Err(Error::InvalidConnectionStringValue {
                value: value.to_string(),
                key: descriptor.display_name.to_string(),
            });
        }
        self.store(descriptor, value);
        Ok(())
    }

    /// Forget an explicit value so the default applies again
    pub fn remove(&mut self, keyword: &str) -> Result<bool> {
        let descriptor = resolve(keyword)?;
        let before = self.values.len();
        self.values.retain(|(name, _)| *name != descriptor.display_name);
        Ok(self.values.len() != before)
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Render the explicitly set options; passwords are left out unless `include_password`
    pub fn connection_string(&self, include_password: bool) -> String {
        self.values
            .iter()
            .filter(|(name, _)| include_password || *name != "Password")
            .map(|(name, value)| format!("{name}={}", quote_value(&value.to_string())))
            .collect::<Vec<_>>()
            .join(";")
    }

    fn store(&mut self, descriptor: &OptionDescriptor, value: OptionValue) {
        if descriptor.display_name == "Encrypt" {
            let mode = if value == OptionValue::Bool(true) {
                SslMode::Preferred
            } else {
                SslMode::None
            };
            self.put("Ssl Mode", OptionValue::SslMode(mode));
        }
        self.put(descriptor.display_name, value);
    }

    fn put(&mut self, display_name: &'static str, value: OptionValue) {
        match self.values.iter_mut().find(|(n, _)| *n == display_name) {
            Some(slot) => slot.1 = value,
            None => self.values.push((display_name, value)),
        }
    }

    pub fn get_bool(&self, keyword: &str) -> Result<bool> {
        match self.get(keyword)? {
            OptionValue::Bool(b) => Ok(*b),
            other => Err(Error::LibraryBug(eyre!(
                "option '{keyword}' is registered as {:?}, not Bool",
                other.ty()
            ))),
        }
    }

    pub fn get_uint(&self, keyword: &str) -> Result<u32> {
        match self.get(keyword)? {
            OptionValue::UInt(n) => Ok(*n),
            other => Err(Error::LibraryBug(eyre!(
                "option '{keyword}' is registered as {:?}, not UInt",
                other.ty()
            ))),
        }
    }

    pub fn get_str(&self, keyword: &str) -> Result<&str> {
        match self.get(keyword)? {
            OptionValue::String(s) => Ok(s),
            other => Err(Error::LibraryBug(eyre!(
                "option '{keyword}' is registered as {:?}, not String",
                other.ty()
            ))),
        }
    }

    pub fn server(&self) -> Result<&str> {
        self.get_str("Server")
    }

    pub fn port(&self) -> Result<u32> {
        self.get_uint("Port")
    }

    pub fn user_id(&self) -> Result<&str> {
        self.get_str("User Id")
    }

    pub fn password(&self) -> Result<&str> {
        self.get_str("Password")
    }

    pub fn database(&self) -> Result<&str> {
        self.get_str("Database")
    }

    pub fn connection_protocol(&self) -> Result<ConnectionProtocol> {
        match self.get("Connection Protocol")? {
            OptionValue::Protocol(p) => Ok(*p),
            other => Err(Error::LibraryBug(eyre!(
                "option 'Connection Protocol' is registered as {:?}",
                other.ty()
            ))),
        }
    }

    pub fn ssl_mode(&self) -> Result<SslMode> {
        match self.get("Ssl Mode")? {
            OptionValue::SslMode(m) => Ok(*m),
            other => Err(Error::LibraryBug(eyre!(
                "option 'Ssl Mode' is registered as {:?}",
                other.ty()
            ))),
        }
    }

    pub fn certificate_store_location(&self) -> Result<CertificateStoreLocation> {
        match self.get("Certificate Store Location")? {
            OptionValue::CertificateStoreLocation(l) => Ok(*l),
            other => Err(Error::LibraryBug(eyre!(
                "option 'Certificate Store Location' is registered as {:?}",
                other.ty()
            ))),
        }
    }
}

fn resolve(keyword: &str) -> Result<&'static OptionDescriptor> {
    let descriptor = OPTIONS.resolve(keyword)?;
    if let Some(message) = descriptor.obsolete {
        tracing::warn!(keyword, "{message}");
    }
    Ok(descriptor)
}

/// Split a connection string into trimmed `key=value` pairs
///
/// A value starting with `'` or `"` runs to the matching closing quote, and a
/// doubled quote inside it stands for one quote character. Quotes anywhere
/// else are ordinary characters.
fn split_pairs(conn_str: &str) -> Result<Vec<(&str, String)>> {
    let mut pairs = Vec::new();
    let mut rest = conn_str;
    loop {
        rest = rest.trim_start_matches(|c: char| c == ';' || c.is_whitespace());
        if rest.is_empty() {
            return Ok(pairs);
        }

        let (key, after) = rest.split_at(rest.find(['=', ';']).unwrap_or(rest.len()));
        let Some(after) = after.strip_prefix('=') else {
            return Err(Error::BadConfigError(format!(
                "Missing '=' in connection string segment '{}'",
                key.trim()
            )));
        };

        let after = after.trim_start();
        let (value, remaining) = match after.chars().next() {
            Some(quote @ ('\'' | '"')) => read_quoted(&after[1..], quote)?,
            _ => {
                let (value, remaining) = after.split_at(after.find(';').unwrap_or(after.len()));
                (value.trim_end().to_string(), remaining)
            }
        };
        pairs.push((key.trim(), value));
        rest = remaining;
    }
}

/// Read a quoted value up to its closing `quote`, returning it and the text after it
fn read_quoted(text: &str, quote: char) -> Result<(String, &str)> {
    let mut value = String::new();
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if c != quote {
            value.push(c);
        } else if chars.next_if(|&(_, next)| next == quote).is_some() {
            value.push(quote);
        } else {
            let rest = text[i + 1..].trim_start();
            if !rest.is_empty() && !rest.starts_with(';') {
                return Err(Error::BadConfigError(format!(
                    "Unexpected text after quoted value: '{rest}'"
                )));
            }
            return Ok((value, rest));
        }
    }
    Err(Error::BadConfigError(format!("Unterminated quoted value: {quote}{text}")))
}

/// Quote `text` when `split_pairs` would not read it back unchanged
fn quote_value(text: &str) -> Cow<'_, str> {
    let needs_quotes = text.contains(';') || text.starts_with(['\'', '"']) || text.trim() != text;
    if !needs_quotes {
        Cow::Borrowed(text)
    } else if !text.contains('"') {
        Cow::Owned(format!("\"{text}\""))
    } else if !text.contains('\'') {
        Cow::Owned(format!("'{text}'"))
    } else {
        Cow::Owned(format!("\"{}\"", text.replace('"', "\"\"")))
    }
}
