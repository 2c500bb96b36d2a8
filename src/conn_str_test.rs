use pretty_assertions::assert_eq;

use crate::conn_str::{ConnectionStringBuilder, OPTIONS, OptionDescriptor, OptionRegistry};
use crate::constant::{ConnectionProtocol, SslMode};
use crate::error::Error;
use crate::property::{OptionType, OptionValue};

#[test]
fn defaults_without_any_option() {
    let builder = ConnectionStringBuilder::new();
    assert_eq!(builder.server().unwrap(), "");
    assert_eq!(builder.port().unwrap(), 3306);
    assert_eq!(
        builder.connection_protocol().unwrap(),
        ConnectionProtocol::Tcp
    );
    assert_eq!(builder.ssl_mode().unwrap(), SslMode::None);
    assert_eq!(builder.get_str("Pipe Name").unwrap(), "MYSQL");
    assert_eq!(builder.get_uint("Connect Timeout").unwrap(), 15);
    assert_eq!(builder.get_uint("Default Command Timeout").unwrap(), 30);
    assert_eq!(builder.get_uint("Procedure Cache Size").unwrap(), 25);
    assert_eq!(builder.get_uint("Maximum Pool Size").unwrap(), 100);
    assert!(builder.get_bool("Allow Batch").unwrap());
    assert!(!builder.get_bool("Use Compression").unwrap());
    assert_eq!(
        builder.get("Certificate File").unwrap(),
        &OptionValue::OptionalString(None)
    );
    assert_eq!(builder.connection_string(true), "");
}

#[test]
fn keywords_resolve_to_display_name() {
    let name = |keyword| OPTIONS.resolve(keyword).unwrap().display_name();
    for keyword in [
        "host",
        "Data Source",
        "datasource",
        "ADDRESS",
        "addr",
        " network address ",
    ] {
        assert_eq!(name(keyword), "Server", "{keyword}");
    }
    for keyword in ["uid", "username", "user name", "user", "UserID", "user id"] {
        assert_eq!(name(keyword), "User Id", "{keyword}");
    }
    assert_eq!(name("procedurecache"), "Procedure Cache Size");
    assert_eq!(name("connectionprotocol"), "Connection Protocol");
}

#[test]
fn unknown_keyword_is_rejected() {
    assert!(matches!(
        OPTIONS.resolve("flux capacitor"),
        Err(Error::KeywordNotSupported(k)) if k == "flux capacitor"
    ));
    let mut builder = ConnectionStringBuilder::new();
    assert!(matches!(
        builder.set("flux capacitor", "1"),
        Err(Error::KeywordNotSupported(_))
    ));
}

#[test]
fn every_default_matches_its_declared_type() {
    for descriptor in OPTIONS.descriptors() {
        assert_eq!(
            descriptor.default().default_value().ty(),
            descriptor.ty(),
            "{}",
            descriptor.display_name()
        );
    }
}

#[test]
fn parse_connection_string() {
    let builder = ConnectionStringBuilder::parse(
        "Server=db.example.com; Port=3307; uid=admin; pwd='p;ss'; initial catalog=shop; protocol=unix;",
    )
    .unwrap();
    assert_eq!(builder.server().unwrap(), "db.example.com");
    assert_eq!(builder.port().unwrap(), 3307);
    assert_eq!(builder.user_id().unwrap(), "admin");
    assert_eq!(builder.password().unwrap(), "p;ss");
    assert_eq!(builder.database().unwrap(), "shop");
    assert_eq!(
        builder.connection_protocol().unwrap(),
        ConnectionProtocol::UnixSocket
    );
}

#[test]
fn parse_rejects_segment_without_value() {
    assert!(matches!(
        ConnectionStringBuilder::parse("server=localhost;pooling"),
        Err(Error::BadConfigError(_))
    ));
}

#[test]
fn apostrophe_inside_unquoted_value() {
    let builder = ConnectionStringBuilder::parse("password=it's;server=db").unwrap();
    assert_eq!(builder.password().unwrap(), "it's");
    assert_eq!(builder.server().unwrap(), "db");

    let builder = ConnectionStringBuilder::parse("user=o\"brien; port=3307").unwrap();
    assert_eq!(builder.user_id().unwrap(), "o\"brien");
    assert_eq!(builder.port().unwrap(), 3307);
}

#[test]
fn doubled_quote_inside_quoted_value() {
    let builder = ConnectionStringBuilder::parse("pwd=\"a\"\"b\";server='it''s'").unwrap();
    assert_eq!(builder.password().unwrap(), "a\"b");
    assert_eq!(builder.server().unwrap(), "it's");
}

#[test]
fn parse_rejects_broken_quotes() {
    assert!(matches!(
        ConnectionStringBuilder::parse("server='localhost;port=3306"),
        Err(Error::BadConfigError(_))
    ));
    assert!(matches!(
        ConnectionStringBuilder::parse("server='local'host;port=3306"),
        Err(Error::BadConfigError(_))
    ));
}

#[test]
fn connection_string_quotes_values_that_need_it() {
    let mut builder = ConnectionStringBuilder::new();
    builder.set("server", "db").unwrap();
    builder.set("user", "  padded ").unwrap();
    builder.set("password", "a\"b;c").unwrap();
    builder.set("database", "it's \"x\";").unwrap();

    let rendered = builder.connection_string(true);
    assert_eq!(
        rendered,
        "Server=db;User Id=\"  padded \";Password='a\"b;c';Database=\"it's \"\"x\"\";\""
    );

    let parsed = ConnectionStringBuilder::parse(&rendered).unwrap();
    assert_eq!(parsed.server().unwrap(), "db");
    assert_eq!(parsed.user_id().unwrap(), "  padded ");
    assert_eq!(parsed.password().unwrap(), "a\"b;c");
    assert_eq!(parsed.database().unwrap(), "it's \"x\";");
    assert_eq!(parsed.connection_string(true), rendered);
}

#[test]
fn bool_values() {
    let mut builder = ConnectionStringBuilder::new();
    for (text, expected) in [
        ("yes", true),
        ("True", true),
        ("no", false),
        ("FALSE", false),
    ] {
        builder.set("compress", text).unwrap();
        let compress = builder.get_bool("Use Compression").unwrap();
        assert_eq!(compress, expected, "{text}");
    }
    assert!(matches!(
        builder.set("compress", "maybe"),
        Err(Error::InvalidBoolean(v)) if v == "maybe"
    ));
}

#[test]
fn enum_values_by_name_or_number() {
    let mut builder = ConnectionStringBuilder::new();
    builder.set("protocol", "2").unwrap();
    assert_eq!(
        builder.connection_protocol().unwrap(),
        ConnectionProtocol::NamedPipe
    );
    builder.set("protocol", "memory").unwrap();
    assert_eq!(
        builder.connection_protocol().unwrap(),
        ConnectionProtocol::SharedMemory
    );
    builder.set("Ssl Mode", "required").unwrap();
    assert_eq!(builder.ssl_mode().unwrap(), SslMode::Required);

    assert!(matches!(
        builder.set("protocol", "9"),
        Err(Error::InvalidConnectionStringValue { value, key })
            if value == "9" && key == "Connection Protocol"
    ));
    assert!(matches!(
        builder.set("port", "http"),
        Err(Error::InvalidConnectionStringValue { .. })
    ));
}

#[test]
fn set_value_checks_type() {
    let mut builder = ConnectionStringBuilder::new();
    builder.set_value("port", OptionValue::UInt(3310)).unwrap();
    assert_eq!(builder.port().unwrap(), 3310);
    assert!(matches!(
        builder.set_value("port", OptionValue::Bool(true)),
        Err(Error::InvalidConnectionStringValue { .. })
    ));
}

#[test]
fn remove_restores_default() {
    let mut builder = ConnectionStringBuilder::parse("port=4000").unwrap();
    assert!(builder.contains("Port").unwrap());
    assert!(builder.remove("PORT").unwrap());
    assert!(!builder.remove("port").unwrap());
    assert_eq!(builder.port().unwrap(), 3306);

    builder.set("server", "a").unwrap();
    builder.clear();
    assert_eq!(builder.server().unwrap(), "");
}

#[test]
fn connection_string_hides_password() {
    let builder =
        ConnectionStringBuilder::parse("server=localhost;user=root;password=secret;pooling=false")
            .unwrap();
    assert_eq!(
        builder.connection_string(false),
        "Server=localhost;User Id=root;Pooling=false"
    );
    assert_eq!(
        builder.connection_string(true),
        "Server=localhost;User Id=root;Password=secret;Pooling=false"
    );
}

#[test]
fn later_value_replaces_earlier_alias() {
    let builder = ConnectionStringBuilder::parse("host=a;server=b;data source=c").unwrap();
    assert_eq!(builder.server().unwrap(), "c");
    assert_eq!(builder.connection_string(true), "Server=c");
}

#[test]
fn encrypt_maps_to_ssl_mode() {
    let builder = ConnectionStringBuilder::parse("encrypt=true").unwrap();
    assert_eq!(builder.ssl_mode().unwrap(), SslMode::Preferred);
    let builder = ConnectionStringBuilder::parse("encrypt=false").unwrap();
    assert_eq!(builder.ssl_mode().unwrap(), SslMode::None);
}

#[test]
fn custom_registry() {
    let registry = OptionRegistry::default().with(
        OptionDescriptor::new("Batch Size", OptionValue::UInt(1))
            .property("BatchSize")
            .keywords("Batch, BULK size"),
    );
    let descriptor = registry.resolve("bulk size").unwrap();
    assert_eq!(descriptor.display_name(), "Batch Size");
    assert_eq!(descriptor.ty(), OptionType::UInt);
    assert_eq!(
        descriptor.valid_keywords().unwrap().keywords(),
        vec!["batch", " bulk size"]
    );
    assert!(registry.find("batchsize").is_some());
    assert!(registry.find("port").is_none());
}
