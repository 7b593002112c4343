use clap::Parser;

use crate::store::DatastoreConfig;

/// hostinv — single-shot host inventory agent
#[derive(Parser, Debug)]
#[command(name = "hostinv")]
#[command(author, version, about = "Collects host hardware facts and upserts them into a central datastore")]
#[command(long_about = "hostinv resolves a stable hardware identifier for this machine, probes \n\
    hostname, current user, CPU, GPU, RAM, disk usage and the vendor service \n\
    tag, and writes the result to one row of a central inventory table. \n\
    Re-running from the same machine updates that row in place.")]
pub struct Cli {
    /// Network address of the inventory datastore
    #[arg(long, env = "HOSTINV_DB_SERVER", default_value = "localhost")]
    pub server: String,

    /// Datastore port
    #[arg(long, env = "HOSTINV_DB_PORT", default_value_t = 3306)]
    pub port: u16,

    /// Target schema name
    #[arg(long, env = "HOSTINV_DB_NAME", default_value = "sysinfo")]
    pub database: String,

    /// Datastore user
    #[arg(long, env = "HOSTINV_DB_USER", default_value = "root")]
    pub user: String,

    /// Datastore password (prefer the environment variable over the flag)
    #[arg(long, env = "HOSTINV_DB_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Collect and print the record as JSON without touching the datastore
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    pub fn datastore(&self) -> DatastoreConfig {
        DatastoreConfig {
            server: self.server.clone(),
            port: self.port,
            database: self.database.clone(),
            user: self.user.clone(),
            password: self.password.clone(),
        }
    }
}
