use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Error body returned by every non-2xx response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Machine readable error kind (`validation`, `not_found`, `domain_logic`,
    /// `conflict`, `timeout`, `internal`, `bad_request`).
    pub kind: String,
    pub message: String,
}

/// Body returned next to the `Location` header by create endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct Created {
    pub uuid: Uuid,
}

pub mod category {
    use super::*;

    /// Request body for `POST /categories`.
    ///
    /// `type` is kept as a raw string: whether it names a known kind is
    /// decided by the engine, not by the decoder.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryCreate {
        pub name: String,
        #[serde(rename = "type")]
        pub kind: String,
        pub user_uuid: Option<Uuid>,
    }

    /// Request body for `PATCH /categories/one/{uuid}`.
    ///
    /// Every field is optional; absent fields keep their stored value. The
    /// category type cannot be changed and is ignored if sent.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CategoryUpdate {
        pub name: Option<String>,
        /// Version the client last read. A stale value is rejected with 409.
        pub version: Option<i32>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryView {
        pub uuid: Uuid,
        pub user_uuid: Option<Uuid>,
        pub name: String,
        #[serde(rename = "type")]
        pub kind: String,
        pub version: i32,
    }

    /// Query string for `GET /categories/name/{name}`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CategoryNameQuery {
        pub user_uuid: Option<Uuid>,
    }
}

pub mod operation {
    use super::*;

    /// Request body for `POST /operations`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct OperationCreate {
        pub category_uuid: Uuid,
        /// Decimal amount, at most two fractional digits.
        pub money_sum: f64,
        pub description: Option<String>,
        /// RFC3339 timestamp. If absent, server uses now().
        pub date_time: Option<DateTime<FixedOffset>>,
    }

    /// Request body for `PATCH /operations/one/{uuid}`.
    ///
    /// Absent fields keep their stored value. An empty `description` clears
    /// it; `money_sum: 0` sets the amount to zero.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct OperationUpdate {
        pub category_uuid: Option<Uuid>,
        pub money_sum: Option<f64>,
        pub description: Option<String>,
        pub version: Option<i32>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct OperationView {
        pub uuid: Uuid,
        pub category_uuid: Uuid,
        pub money_sum: f64,
        pub description: Option<String>,
        /// RFC3339 timestamp in UTC.
        pub date_time: DateTime<FixedOffset>,
        pub version: i32,
    }
}
