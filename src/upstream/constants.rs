/// The default base URL of the restaurant/menu data service
pub const DEFAULT_UPSTREAM_BASE_URL: &str = "https://www.swiggy.com/dapi";

/// The service rejects non-browser clients, so every request claims to be desktop Chrome
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Path of the restaurant listing endpoint, relative to the base URL
pub const RESTAURANT_LIST_PATH: &str = "/restaurants/list/v5";

/// Path of the menu endpoint, relative to the base URL
pub const MENU_PATH: &str = "/menu/pl";

/// Substituted for any query parameter the caller left out
pub const MISSING_PARAM_TOKEN: &str = "undefined";
