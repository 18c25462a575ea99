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

//! Entry point to the users service.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use crudsvc_core::db::postgres::{PostgresDb, PostgresOptions};
use crudsvc_core::env::get_optional_var;
use crudsvc_users::serve;
use log::error;
use std::error::Error;
use std::net::Ipv4Addr;
use std::process;
use std::sync::Arc;

/// Default port to listen on when `USERS_PORT` is not set.
const DEFAULT_PORT: u16 = 8000;

/// Loads the configuration from the environment and runs the service until termination.
async fn run() -> Result<(), Box<dyn Error>> {
    let port = get_optional_var::<u16>("USERS", "PORT")?.unwrap_or(DEFAULT_PORT);
    let addr = (Ipv4Addr::UNSPECIFIED, port);

    let db_opts = PostgresOptions::from_env("DB")?;
    let db = Arc::from(PostgresDb::connect(db_opts)?);

    serve(addr, db).await
}

#[tokio::main]
async fn main() {
    env_logger::init();

    if let Err(e) = run().await {
        error!("{}", e);
        process::exit(1);
    }
}
