// crudsvc
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! REST service that exposes CRUD operations over a table of users.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use crudsvc_core::db::Db;
use log::{info, warn};
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;

pub(crate) mod db;
pub(crate) mod driver;
use driver::Driver;
pub(crate) mod model;
mod rest;
use rest::app;

/// Waits until the process is asked to terminate.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Cannot listen for the termination signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Termination requested; shutting down");
}

/// Prepares `db` for use and serves the application on `bind_addr` until termination.
async fn run(bind_addr: SocketAddr, db: Arc<dyn Db + Send + Sync>) -> Result<(), Box<dyn Error>> {
    db.ping().await?;
    info!("Database is reachable");

    db::init_schema(&mut db.ex().await?).await?;

    let driver = Driver::new(db);
    let app = app(driver);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
    Ok(())
}

/// Instantiates all resources to serve the application on `bind_addr` backed by `db`.
///
/// The database is probed once before serving and its schema is created if missing.  The
/// connection pool is closed once the server stops, whether it stopped cleanly or not.
///
/// While it'd be nice to push this responsibility to `main`, doing so would force us to expose many
/// crate-internal types to the public, which in turn would make dead code detection harder.
pub async fn serve(
    bind_addr: impl Into<SocketAddr>,
    db: Arc<dyn Db + Send + Sync>,
) -> Result<(), Box<dyn Error>> {
    let result = run(bind_addr.into(), db.clone()).await;
    db.close().await;
    result
}
