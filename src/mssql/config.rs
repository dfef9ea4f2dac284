use tiberius::{AuthMethod, Client, Config as TiberiusConfig};
use tokio::net::TcpStream;
use tokio_util::compat::Compat;

use crate::connector::ConnectTarget;

/// Type alias for SQL Server client
pub type MssqlClient = Client<Compat<TcpStream>>;

/// Application name reported to the server.
pub const APPLICATION_NAME: &str = "stored-procedure-factory";

pub(crate) fn build_tiberius_config(target: &ConnectTarget) -> TiberiusConfig {
    let mut config = TiberiusConfig::new();
    config.host(&target.host);
    config.database(&target.database);
    config.port(target.port);
    config.authentication(AuthMethod::sql_server(&target.username, &target.password));
    config.application_name(APPLICATION_NAME);
    if let Some(instance) = &target.instance_name {
        config.instance_name(instance);
    }
    if target.trust_server_certificate {
        config.trust_cert();
    }
    config
}
