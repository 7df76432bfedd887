use serde::Deserialize;

use infra::documents::Direction;

use crate::errors::ApiError;

pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 50;

/// Raw listing parameters, exactly as a query layer hands them over:
/// optional, still-untrusted strings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    pub limit: Option<String>,
    pub offset: Option<String>,
    pub order: Option<String>,
    #[serde(rename = "orderBy")]
    pub order_by: Option<String>,
}

/// The vocabulary of fields an entity can be listed by.
pub trait OrderField: Copy {
    const DEFAULT: Self;

    fn parse(name: &str) -> Option<Self>;

    /// The stored field name to order on.
    fn field(&self) -> &'static str;
}

/// Validated listing parameters. Each violation names the offending
/// parameter; absent (or empty) parameters fall back to defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ListQuery<F> {
    pub limit: i64,
    pub offset: i64,
    pub direction: Direction,
    pub order_by: F,
}

impl<F: OrderField> ListQuery<F> {
    pub(crate) fn from_params(params: &ListParams) -> Result<Self, ApiError> {
        let limit = int_param(&params.limit, DEFAULT_LIMIT, "limit")?;
        if limit < 1 || limit > MAX_LIMIT {
            return Err(ApiError::InvalidQuery("limit"));
        }

        let offset = int_param(&params.offset, 0, "offset")?;
        if offset < 0 {
            return Err(ApiError::InvalidQuery("offset"));
        }

        let direction = match text_param(&params.order) {
            None | Some("asc") => Direction::Ascending,
            Some("desc") => Direction::Descending,
            Some(_) => return Err(ApiError::InvalidQuery("order")),
        };

        let order_by = match text_param(&params.order_by) {
            None => F::DEFAULT,
            Some(name) => F::parse(name).ok_or(ApiError::InvalidQuery("orderBy"))?,
        };

        Ok(ListQuery {
            limit,
            offset,
            direction,
            order_by,
        })
    }
}

// An empty parameter value reads as unset.
fn text_param(param: &Option<String>) -> Option<&str> {
    param
        .as_ref()
        .map(|text| text.as_str())
        .filter(|text| !text.is_empty())
}

fn int_param(param: &Option<String>, default: i64, name: &'static str) -> Result<i64, ApiError> {
    match text_param(param) {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|_| ApiError::InvalidQuery(name)),
    }
}
