#![deny(rust_2018_idioms)]
#![feature(never_type)]
#![feature(proc_macro_hygiene, decl_macro)]

// BUG https://github.com/sgrif/pq-sys/issues/25
#[allow(unused_extern_crates)]
extern crate openssl;

#[macro_use]
extern crate diesel;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;
#[macro_use]
extern crate rocket;
#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate serde_json;
#[macro_use]
extern crate maplit;

#[macro_use]
mod macros;

mod config;
mod digest;
mod domain;
mod error;
mod github;
mod mattermost;
mod review;
mod server;

use chrono::Local;
use diesel::pg::PgConnection;
use diesel::r2d2::ConnectionManager;
use diesel::r2d2::Pool;

use crate::config::CONFIG;

fn main() {
    use std::io::Write;

    // init environment variables and logging
    dotenv::dotenv().ok();

    env_logger::Builder::new()
        .format(|buf, rec| {
            writeln!(
                buf,
                "[{} {}:{} {}] {}",
                rec.level(),
                rec.module_path().unwrap_or("<unnamed>"),
                rec.line().unwrap_or(0),
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                rec.args()
            )
        })
        .parse_filters(&std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()))
        .init();

    debug!("Logging initialized.");
    let _ = CONFIG.check();

    if let Some(ref pool) = *DB_POOL {
        let _ = pool.get().expect("Unable to test connection pool.");
    }

    server::serve();
}

// review tracking is optional: the pool only exists when a connection string is configured
lazy_static! {
    pub static ref DB_POOL: Option<Pool<ConnectionManager<PgConnection>>> = {
        CONFIG.database_url.as_ref().map(|url| {
            info!("Initializing database connection pool.");

            let manager = ConnectionManager::<PgConnection>::new(url.clone());

            match Pool::builder().max_size(CONFIG.db_pool_size).build(manager) {
                Ok(p) => {
                    info!("DB connection pool established.");
                    p
                }
                Err(why) => {
                    error!("Failed to establish DB connection pool: {}", why);
                    panic!("Error creating connection pool.");
                }
            }
        })
    };
}
