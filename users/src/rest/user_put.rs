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

//! API to replace all fields of an existing user.

use crate::driver::Driver;
use crate::model::{User, UserId};
use axum::Json;
use axum::extract::{Path, State};
use crudsvc_core::rest::{JsonBody, RestError};

/// PUT handler for this API.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    Path(id): Path<String>,
    JsonBody(user): JsonBody<User>,
) -> Result<Json<User>, RestError> {
    let user = driver.replace_user(UserId::new(id), user).await?;
    Ok(Json(user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::testutils::*;
    use axum::http;
    use crudsvc_core::rest::testutils::*;
    use crudsvc_core::test_payload_must_be_json;
    use serde_json::json;

    fn route(id: &str) -> (http::Method, String) {
        (http::Method::PUT, format!("/users/{}", id))
    }

    #[tokio::test]
    async fn test_ok() {
        let context = TestContext::setup().await;

        let id = context.create_user("old", 1, "old@example.com").await;
        let other = context.create_user("other", 2, "other@example.com").await;

        let response = OneShotBuilder::new(context.app(), route(id.as_str()))
            .send_json(json!({"name": "new", "age": 5, "email": "new@example.com"}))
            .await
            .expect_json::<User>()
            .await;
        let exp_user = User::new("new", 5, "new@example.com").with_id(id.clone());
        assert_eq!(exp_user, response);

        assert_eq!(Some(exp_user), context.get_user(&id).await);
        assert_eq!(
            Some(User::new("other", 2, "other@example.com").with_id(other.clone())),
            context.get_user(&other).await
        );
    }

    #[tokio::test]
    async fn test_path_id_wins_over_body_id() {
        let context = TestContext::setup().await;

        let id = context.create_user("old", 1, "old@example.com").await;
        let other = context.create_user("other", 2, "other@example.com").await;

        let response = OneShotBuilder::new(context.app(), route(id.as_str()))
            .send_json(json!({"id": other.as_str(), "name": "new"}))
            .await
            .expect_json::<User>()
            .await;
        assert_eq!(User::new("new", 0, "").with_id(id), response);

        assert_eq!(
            Some(User::new("other", 2, "other@example.com").with_id(other.clone())),
            context.get_user(&other).await
        );
    }

    #[tokio::test]
    async fn test_not_found() {
        let context = TestContext::setup().await;

        let id = context.create_user("keep", 1, "keep@example.com").await;
        let before = context.all_users().await;

        OneShotBuilder::new(context.app(), route("999"))
            .send_json(json!({"name": "new"}))
            .await
            .expect_status(http::StatusCode::NOT_FOUND)
            .expect_error("User with ID 999 doesn't exist")
            .await;

        assert_eq!(before, context.all_users().await);
        assert!(context.get_user(&id).await.is_some());
    }

    #[tokio::test]
    async fn test_non_canonical_id() {
        let context = TestContext::setup().await;

        let id = context.create_user("keep", 1, "keep@example.com").await;
        let before = context.all_users().await;

        let alias = format!("{}.0", id);
        OneShotBuilder::new(context.app(), route(&alias))
            .send_json(json!({"name": "z"}))
            .await
            .expect_status(http::StatusCode::NOT_FOUND)
            .expect_error(&format!("User with ID {} doesn't exist", alias))
            .await;

        assert_eq!(before, context.all_users().await);
    }

    #[tokio::test]
    async fn test_backend_error() {
        let context = TestContext::setup().await;

        let id = context.create_user("old", 1, "old@example.com").await;
        context.break_table().await;

        OneShotBuilder::new(context.app(), route(id.as_str()))
            .send_json(json!({"name": "new"}))
            .await
            .expect_status(http::StatusCode::INTERNAL_SERVER_ERROR)
            .expect_error("^Internal server error$")
            .await;
    }

    test_payload_must_be_json!(TestContext::setup().await.into_app(), route("1"));
}
