//! Autorización por rol: vistas accesibles y operaciones de gestión

use serde::{Deserialize, Serialize};

use crate::models::auth::AuthRole;

/// Secciones de la interfaz
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppView {
    Dashboard,
    Map,
    Vehicles,
    Drivers,
    Geofences,
    Alerts,
    Trips,
    Admin,
    Settings,
}

const ALL_VIEWS: &[AppView] = &[
    AppView::Dashboard,
    AppView::Map,
    AppView::Vehicles,
    AppView::Drivers,
    AppView::Geofences,
    AppView::Alerts,
    AppView::Trips,
    AppView::Admin,
    AppView::Settings,
];

const CHILD_VIEWS: &[AppView] = &[
    AppView::Dashboard,
    AppView::Map,
    AppView::Vehicles,
    AppView::Drivers,
    AppView::Geofences,
    AppView::Alerts,
    AppView::Trips,
    AppView::Settings,
];

impl AppView {
    pub fn from_str(s: &str) -> Option<Self> {
        ALL_VIEWS.iter().copied().find(|view| view.as_str() == s)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AppView::Dashboard => "dashboard",
            AppView::Map => "map",
            AppView::Vehicles => "vehicles",
            AppView::Drivers => "drivers",
            AppView::Geofences => "geofences",
            AppView::Alerts => "alerts",
            AppView::Trips => "trips",
            AppView::Admin => "admin",
            AppView::Settings => "settings",
        }
    }
}

/// Vistas permitidas por rol, en orden de navegación
pub fn allowed_views(role: AuthRole) -> &'static [AppView] {
    match role {
        AuthRole::SuperAdmin | AuthRole::MasterAdmin => ALL_VIEWS,
        AuthRole::ChildUser => CHILD_VIEWS,
    }
}

pub fn can_access_view(role: AuthRole, view: AppView) -> bool {
    allowed_views(role).contains(&view)
}

/// Vista efectiva: la pedida si está permitida, si no la primera permitida
pub fn resolve_view(role: AuthRole, requested: AppView) -> AppView {
    if can_access_view(role, requested) {
        return requested;
    }
    let fallback = allowed_views(role).first().copied().unwrap_or(AppView::Dashboard);
    log::debug!(
        "↪️ Vista {} no permitida para {}, redirigiendo a {}",
        requested.as_str(),
        role.as_str(),
        fallback.as_str()
    );
    fallback
}

/// Alta, edición y baja de vehículos/dispositivos y configuración
pub fn can_manage_fleet(role: AuthRole) -> bool {
    can_access_view(role, AppView::Admin)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admins_see_every_view() {
        for role in [AuthRole::SuperAdmin, AuthRole::MasterAdmin] {
            assert!(can_access_view(role, AppView::Admin));
            assert_eq!(allowed_views(role).len(), 9);
        }
    }

    #[test]
    fn test_child_user_is_redirected_from_admin() {
        assert!(!can_access_view(AuthRole::ChildUser, AppView::Admin));
        assert_eq!(resolve_view(AuthRole::ChildUser, AppView::Admin), AppView::Dashboard);
        assert_eq!(resolve_view(AuthRole::ChildUser, AppView::Trips), AppView::Trips);
    }

    #[test]
    fn test_fleet_management_roles() {
        assert!(can_manage_fleet(AuthRole::SuperAdmin));
        assert!(can_manage_fleet(AuthRole::MasterAdmin));
        assert!(!can_manage_fleet(AuthRole::ChildUser));
    }

    #[test]
    fn test_view_names() {
        assert_eq!(AppView::from_str("geofences"), Some(AppView::Geofences));
        assert_eq!(AppView::from_str("reports"), None);
        assert_eq!(serde_json::to_string(&AppView::Admin).unwrap(), "\"admin\"");
    }
}
