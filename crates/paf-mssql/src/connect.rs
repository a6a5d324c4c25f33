use super::*;
use paf_core::Port;
use std::fmt::Display;
use std::fmt::Formatter;
use tiberius::AuthMethod;
use tiberius::Config;
use tokio::net::TcpStream;
use tokio_util::compat::TokioAsyncWriteCompatExt;

/// Where and as whom to connect.
#[derive(Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: Port,
    pub database: String,
    pub user: String,
    pub password: String,
}

impl Endpoint {
    /// ADO-style connection string with the password masked, for logs.
    pub fn ado(&self) -> String {
        format!(
            "server={};user id={};password=****;port={};database={}",
            self.host, self.user, self.port, self.database
        )
    }
    /// tiberius configuration for this endpoint.
    pub fn config(&self) -> Config {
        let mut config = Config::new();
        config.host(&self.host);
        config.port(self.port);
        config.database(&self.database);
        config.authentication(AuthMethod::sql_server(&self.user, &self.password));
        config.trust_cert();
        config
    }
}

impl std::fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Endpoint")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}/{}", self.host, self.port, self.database)
    }
}

/// Opens database sessions.
#[async_trait::async_trait]
pub trait Connector: Send + Sync {
    type Session: Session + 'static;
    async fn connect(&self, endpoint: &Endpoint) -> Result<Self::Session, MssqlError>;
}

/// Connector speaking TDS over TCP via tiberius.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tds;

#[async_trait::async_trait]
impl Connector for Tds {
    type Session = Mssql;
    async fn connect(&self, endpoint: &Endpoint) -> Result<Mssql, MssqlError> {
        log::info!("connecting to database ({})", endpoint.ado());
        let config = endpoint.config();
        let tcp = TcpStream::connect(config.get_addr()).await?;
        tcp.set_nodelay(true)?;
        let client = tiberius::Client::connect(config, tcp.compat_write()).await?;
        Ok(client)
    }
}
