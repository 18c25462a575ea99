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

//! API to create a new user.

use crate::driver::Driver;
use crate::model::User;
use axum::Json;
use axum::extract::State;
use axum::http;
use crudsvc_core::rest::{JsonBody, RestError};

/// POST handler for this API.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    JsonBody(user): JsonBody<User>,
) -> Result<(http::StatusCode, Json<User>), RestError> {
    let user = driver.create_user(user).await?;
    Ok((http::StatusCode::CREATED, Json(user)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UserId;
    use crate::rest::testutils::*;
    use crudsvc_core::rest::testutils::*;
    use crudsvc_core::test_payload_must_be_json;
    use serde_json::json;

    fn route() -> (http::Method, String) {
        (http::Method::POST, "/users".to_owned())
    }

    #[tokio::test]
    async fn test_ok() {
        let context = TestContext::setup().await;

        let response = OneShotBuilder::new(context.app(), route())
            .send_json(json!({"name": "jane", "age": 31, "email": "jane@example.com"}))
            .await
            .expect_status(http::StatusCode::CREATED)
            .expect_json::<User>()
            .await;
        let id = response.id().clone().unwrap();
        assert_eq!(User::new("jane", 31, "jane@example.com").with_id(id.clone()), response);

        assert_eq!(Some(response), context.get_user(&id).await);
    }

    #[tokio::test]
    async fn test_ignores_client_id() {
        let context = TestContext::setup().await;

        let response = OneShotBuilder::new(context.app(), route())
            .send_json(json!({"id": "1000", "name": "jane"}))
            .await
            .expect_status(http::StatusCode::CREATED)
            .expect_json::<User>()
            .await;
        assert_ne!(&Some(UserId::new("1000")), response.id());

        assert_eq!(vec![response], context.all_users().await);
    }

    #[tokio::test]
    async fn test_missing_fields_take_defaults() {
        let context = TestContext::setup().await;

        let response = OneShotBuilder::new(context.app(), route())
            .send_json(json!({}))
            .await
            .expect_status(http::StatusCode::CREATED)
            .expect_json::<User>()
            .await;
        assert_eq!(User::default(), response.clone().without_id());
    }

    #[tokio::test]
    async fn test_bad_types() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.app(), route())
            .send_json(json!({"name": "jane", "age": "old"}))
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .expect_error("invalid type")
            .await;

        assert!(context.all_users().await.is_empty());
    }

    #[tokio::test]
    async fn test_backend_error() {
        let context = TestContext::setup().await;

        context.break_table().await;

        OneShotBuilder::new(context.app(), route())
            .send_json(json!({"name": "jane"}))
            .await
            .expect_status(http::StatusCode::INTERNAL_SERVER_ERROR)
            .expect_error("^Internal server error$")
            .await;
    }

    #[tokio::test]
    async fn test_insert_without_effect() {
        let context = TestContext::setup().await;

        context.discard_inserts().await;

        OneShotBuilder::new(context.app(), route())
            .send_json(json!({"name": "jane"}))
            .await
            .expect_status(http::StatusCode::INTERNAL_SERVER_ERROR)
            .expect_error("^Internal server error$")
            .await;

        assert!(context.all_users().await.is_empty());
    }

    test_payload_must_be_json!(TestContext::setup().await.into_app(), route());
}
