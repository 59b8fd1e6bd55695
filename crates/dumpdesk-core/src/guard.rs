//! Route selection from the session state.
//!
//! The console shows exactly one of three trees. While the session is still
//! being restored it shows a loading screen, never the sign-in page, so a
//! valid stored session does not flash the public tree on startup.

/// Which tree to mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Loading,
    Private,
    Public,
}

impl Route {
    /// Map the result of `SessionManager::is_authenticated`.
    pub fn from_auth(auth: Option<bool>) -> Self {
        match auth {
            None => Route::Loading,
            Some(true) => Route::Private,
            Some(false) => Route::Public,
        }
    }
}

/// Pages of the authenticated console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Admins,
    Customers,
    Drivers,
    Products,
    NotFound,
}

impl Page {
    /// Resolve a path in the private router. Trailing slashes are ignored.
    pub fn from_path(path: &str) -> Self {
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Page::Home,
            "/admin" => Page::Admins,
            "/clientes" => Page::Customers,
            "/cacambeiros" => Page::Drivers,
            "/produtos" => Page::Products,
            _ => Page::NotFound,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Page::Home => "/",
            Page::Admins => "/admin",
            Page::Customers => "/clientes",
            Page::Drivers => "/cacambeiros",
            Page::Products => "/produtos",
            Page::NotFound => "/404",
        }
    }
}

/// The public router has one page: sign-in at `/`. Every other path
/// redirects there.
pub fn public_path(_requested: &str) -> &'static str {
    "/"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_from_auth() {
        assert_eq!(Route::from_auth(None), Route::Loading);
        assert_eq!(Route::from_auth(Some(true)), Route::Private);
        assert_eq!(Route::from_auth(Some(false)), Route::Public);
    }

    #[test]
    fn test_page_from_path() {
        assert_eq!(Page::from_path("/"), Page::Home);
        assert_eq!(Page::from_path(""), Page::Home);
        assert_eq!(Page::from_path("/admin"), Page::Admins);
        assert_eq!(Page::from_path("/clientes/"), Page::Customers);
        assert_eq!(Page::from_path("/cacambeiros"), Page::Drivers);
        assert_eq!(Page::from_path("/produtos"), Page::Products);
        assert_eq!(Page::from_path("/nope"), Page::NotFound);
    }

    #[test]
    fn test_page_path_roundtrip() {
        for page in [
            Page::Home,
            Page::Admins,
            Page::Customers,
            Page::Drivers,
            Page::Products,
        ] {
            assert_eq!(Page::from_path(page.path()), page);
        }
    }

    #[test]
    fn test_public_router_redirects_everything_to_root() {
        assert_eq!(public_path("/admin"), "/");
        assert_eq!(public_path("/"), "/");
    }
}
