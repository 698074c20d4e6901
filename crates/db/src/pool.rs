//! Connection pool bootstrap from store credentials.

use mysql::prelude::Queryable;
use outpost_config::Store;

use crate::Result;
use crate::runner::{SqlConnection, SqlSource};

/// Prepared-statement cache size applied to every pooled connection.
const STMT_CACHE_SIZE: usize = 250;

/// Connection settings for the plugin database.
///
/// Conventionally read from a store's flat top-level keys; absent keys fall
/// back to the store's sentinels, so a half-filled config fails at connect
/// time rather than at read time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolSettings {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
}

impl PoolSettings {
    /// Read the conventional `Host`, `Port`, `Database`, `User` and
    /// `Password` keys.
    pub fn from_store(store: &Store) -> Self {
        Self {
            host: store.get_string("Host").unwrap_or_default(),
            port: u16::try_from(store.get_int("Port")).unwrap_or_default(),
            database: store.get_string("Database").unwrap_or_default(),
            user: store.get_string("User").unwrap_or_default(),
            password: store.get_string("Password").unwrap_or_default(),
        }
    }

    /// Server URL without credentials.
    pub fn url(&self) -> String {
        format!("mysql://{}:{}/{}", self.host, self.port, self.database)
    }

    /// Open a connection pool against the configured server, with
    /// credentials passed out-of-band and the fixed statement-cache size.
    pub fn connect(&self) -> Result<MariaPool> {
        let opts = mysql::Opts::from_url(&self.url())?;
        let opts = mysql::OptsBuilder::from_opts(opts)
            .user(Some(self.user.as_str()))
            .pass(Some(self.password.as_str()))
            .stmt_cache_size(STMT_CACHE_SIZE);
        Ok(MariaPool {
            inner: mysql::Pool::new(opts)?,
        })
    }
}

/// A pooled MariaDB/MySQL connection source.
#[derive(Debug, Clone)]
pub struct MariaPool {
    inner: mysql::Pool,
}

impl MariaPool {
    /// The underlying pool, for callers that need direct query access.
    pub fn inner(&self) -> &mysql::Pool {
        &self.inner
    }
}

impl SqlSource for MariaPool {
    type Connection = MariaConnection;

    /// One connection with an explicit transaction already open.
    fn connection(&self) -> Result<MariaConnection> {
        let mut conn = self.inner.get_conn()?;
        conn.query_drop("START TRANSACTION")?;
        Ok(MariaConnection { conn })
    }
}

/// A live connection running batch statements inside one transaction.
pub struct MariaConnection {
    conn: mysql::PooledConn,
}

impl SqlConnection for MariaConnection {
    fn execute(&mut self, statement: &str) -> Result<()> {
        let prepared = self.conn.prep(statement)?;
        self.conn.exec_drop(&prepared, ())?;
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        self.conn.query_drop("COMMIT")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use outpost_common::MemoryResources;

    #[test]
    fn settings_read_conventional_keys() {
        let tmp = tempfile::tempdir().unwrap();
        let bundle = MemoryResources::new().with(
            "db.yml",
            "Host: db.outpost.net\nPort: 3307\nDatabase: outpost\nUser: plugin\nPassword: hunter2\n",
        );
        let store = Store::open(tmp.path(), "db", &bundle);

        let settings = PoolSettings::from_store(&store);
        assert_eq!(settings.host, "db.outpost.net");
        assert_eq!(settings.port, 3307);
        assert_eq!(settings.database, "outpost");
        assert_eq!(settings.user, "plugin");
        assert_eq!(settings.password, "hunter2");
        assert_eq!(settings.url(), "mysql://db.outpost.net:3307/outpost");
    }

    #[test]
    fn settings_fall_back_to_sentinels() {
        let tmp = tempfile::tempdir().unwrap();
        let store = Store::open(tmp.path(), "db", &MemoryResources::new());

        let settings = PoolSettings::from_store(&store);
        assert_eq!(settings.host, "");
        assert_eq!(settings.port, 0);
        assert_eq!(settings.database, "");
        assert_eq!(settings.url(), "mysql://:0/");
    }

    #[test]
    fn out_of_range_port_reads_as_zero() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = Store::open(tmp.path(), "db", &MemoryResources::new());

        store.set("Port", 70000);
        assert_eq!(PoolSettings::from_store(&store).port, 0);
        store.set("Port", -1);
        assert_eq!(PoolSettings::from_store(&store).port, 0);
    }
}
