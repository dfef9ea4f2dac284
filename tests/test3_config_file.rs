use std::io::Write;

use stored_procedure_factory::prelude::*;

#[test]
fn loads_section_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "logging": {{ "level": "info" }},
            "stored_procedure": {{
                "hostname": "sql01",
                "username": "svc",
                "password": "secret",
                "instance_name": "REPORTING",
                "default_database": "Warehouse"
            }}
        }}"#
    )
    .unwrap();

    let config = FactoryConfig::from_json_file(file.path()).unwrap();
    assert_eq!(config.hostname, "sql01");
    assert_eq!(config.instance_name.as_deref(), Some("REPORTING"));
    assert_eq!(config.default_database, "Warehouse");
    assert!(config.trust_server_certificate);
}

#[test]
fn missing_file_is_a_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = FactoryConfig::from_json_file(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, ProcedureError::ConfigError(_)));
}

#[test]
fn builder_validates() {
    assert!(FactoryConfig::builder("h", "u", "p").build().is_ok());
    assert!(
        FactoryConfig::builder("h", "u", "p")
            .default_database("")
            .build()
            .is_err()
    );
}
