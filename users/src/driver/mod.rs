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

//! Business logic for the users service.

use crudsvc_core::db::{Db, DbError, DbResult};
use std::sync::Arc;

mod user;
#[cfg(test)]
pub(crate) mod testutils;
mod users;

/// Business logic.
///
/// The public operations exposed by the driver are all "one shot": they start and resolve a
/// transaction, so it's incorrect for the caller to use two separate calls.  For this reason,
/// these operations consume the driver in an attempt to minimize the possibility of executing
/// two operations.
#[derive(Clone)]
pub(crate) struct Driver {
    /// The database that the driver uses for persistence.
    db: Arc<dyn Db + Send + Sync>,
}

impl Driver {
    /// Creates a new driver backed by the given injected components.
    pub(crate) fn new(db: Arc<dyn Db + Send + Sync>) -> Self {
        Self { db }
    }
}

/// Turns an affected-row count of zero into `DbError::NotFound`.
///
/// Feeding the outcome of a mutation through this before resolving its transaction makes a no-op
/// mutation roll back instead of commit.
fn require_rows(rows_affected: u64) -> DbResult<u64> {
    if rows_affected == 0 {
        return Err(DbError::NotFound);
    }
    Ok(rows_affected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_rows() {
        assert_eq!(DbError::NotFound, require_rows(0).unwrap_err());
        assert_eq!(1, require_rows(1).unwrap());
        assert_eq!(3, require_rows(3).unwrap());
    }
}
