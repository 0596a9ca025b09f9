//! Upstream URL construction for each proxied route.
//!
//! Each inbound query type knows how to render itself into the upstream
//! URL. In [`ParamMode::Verbatim`] values are interpolated exactly as
//! received and absent values become `undefined`. [`ParamMode::Strict`]
//! validates and percent-encodes them first.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use url::form_urlencoded;

use crate::upstream::constants::{MENU_PATH, MISSING_PARAM_TOKEN, RESTAURANT_LIST_PATH};
use crate::upstream::error::ParamError;

const MAX_LATITUDE: f64 = 90.0;
const MAX_LONGITUDE: f64 = 180.0;

/// How inbound query values are copied into upstream URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParamMode {
    #[default]
    Verbatim,
    Strict,
}

impl ParamMode {
    pub fn from_strict(strict: bool) -> Self {
        if strict {
            ParamMode::Strict
        } else {
            ParamMode::Verbatim
        }
    }

    fn coordinate(
        self,
        name: &'static str,
        value: Option<&str>,
        limit: f64,
    ) -> Result<String, ParamError> {
        match self {
            ParamMode::Verbatim => Ok(verbatim(value)),
            ParamMode::Strict => {
                let raw = value.ok_or(ParamError::Missing(name))?.trim();
                let parsed: f64 = raw.parse().map_err(|_| ParamError::NotANumber {
                    name,
                    value: raw.to_string(),
                })?;
                if !parsed.is_finite() || parsed.abs() > limit {
                    return Err(ParamError::OutOfRange {
                        name,
                        value: raw.to_string(),
                        limit,
                    });
                }
                Ok(encode(raw))
            }
        }
    }

    fn identifier(self, name: &'static str, value: Option<&str>) -> Result<String, ParamError> {
        match self {
            ParamMode::Verbatim => Ok(verbatim(value)),
            ParamMode::Strict => {
                let raw = value.ok_or(ParamError::Missing(name))?.trim();
                if raw.is_empty() {
                    return Err(ParamError::Empty(name));
                }
                Ok(encode(raw))
            }
        }
    }
}

fn verbatim(value: Option<&str>) -> String {
    value.unwrap_or(MISSING_PARAM_TOKEN).to_string()
}

fn encode(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

fn base(base_url: &str) -> &str {
    base_url.trim_end_matches('/')
}

/// Decoded inbound query string.
///
/// Never rejects input: a repeated key keeps every value, joined with `,`
/// in arrival order (`lat=1&lat=2` reads as `1,2`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(HashMap<String, String>);

impl QueryParams {
    pub fn parse(raw: Option<&str>) -> Self {
        let mut params = HashMap::new();
        for (key, value) in form_urlencoded::parse(raw.unwrap_or_default().as_bytes()) {
            match params.entry(key.into_owned()) {
                Entry::Occupied(mut entry) => {
                    let joined: &mut String = entry.get_mut();
                    joined.push(',');
                    joined.push_str(&value);
                }
                Entry::Vacant(entry) => {
                    entry.insert(value.into_owned());
                }
            }
        }
        Self(params)
    }

    pub fn take(&mut self, name: &str) -> Option<String> {
        self.0.remove(name)
    }
}

/// An inbound query that maps onto one upstream endpoint.
pub trait UpstreamQuery: Send + Sync + 'static {
    /// Route label for logs and metrics.
    const ROUTE: &'static str;

    fn from_params(params: QueryParams) -> Self;

    fn upstream_url(&self, base_url: &str, mode: ParamMode) -> Result<String, ParamError>;
}

/// Query of `GET /api/restaurants`.
#[derive(Debug, Clone, Default)]
pub struct RestaurantListQuery {
    pub lat: Option<String>,
    pub lng: Option<String>,
}

impl UpstreamQuery for RestaurantListQuery {
    const ROUTE: &'static str = "restaurants";

    fn from_params(mut params: QueryParams) -> Self {
        Self {
            lat: params.take("lat"),
            lng: params.take("lng"),
        }
    }

    fn upstream_url(&self, base_url: &str, mode: ParamMode) -> Result<String, ParamError> {
        let lat = mode.coordinate("lat", self.lat.as_deref(), MAX_LATITUDE)?;
        let lng = mode.coordinate("lng", self.lng.as_deref(), MAX_LONGITUDE)?;
        Ok(format!(
            "{}{RESTAURANT_LIST_PATH}?lat={lat}&lng={lng}&page_type=DESKTOP_WEB_LISTING",
            base(base_url)
        ))
    }
}

/// Query of `GET /api/menu`.
#[derive(Debug, Clone, Default)]
pub struct MenuQuery {
    pub lat: Option<String>,
    pub lng: Option<String>,
    pub restaurant_id: Option<String>,
}

impl UpstreamQuery for MenuQuery {
    const ROUTE: &'static str = "menu";

    fn from_params(mut params: QueryParams) -> Self {
        Self {
            lat: params.take("lat"),
            lng: params.take("lng"),
            restaurant_id: params.take("restaurantId"),
        }
    }

    fn upstream_url(&self, base_url: &str, mode: ParamMode) -> Result<String, ParamError> {
        let lat = mode.coordinate("lat", self.lat.as_deref(), MAX_LATITUDE)?;
        let lng = mode.coordinate("lng", self.lng.as_deref(), MAX_LONGITUDE)?;
        let restaurant_id = mode.identifier("restaurantId", self.restaurant_id.as_deref())?;
        Ok(format!(
            "{}{MENU_PATH}?page-type=REGULAR_MENU&complete-menu=true&lat={lat}&lng={lng}&submitAction=ENTER&restaurantId={restaurant_id}",
            base(base_url)
        ))
    }
}
