use crate::{containers::layout::Layout, models::app_state::AppState, pages::*};
use client::{Session, View};
use strum::{EnumIter, IntoEnumIterator};
use yew::prelude::*;
use yew_icons::IconId;
use yew_router::prelude::*;
use yewdux::prelude::use_selector;

use crate::console;

/// The application routes
#[derive(Debug, Clone, PartialEq, Eq, Routable, EnumIter)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/approvals")]
    Approvals,
    #[at("/analytics")]
    Analytics,
    #[at("/invoices")]
    Invoices,
    #[at("/notifications")]
    Notifications,
    #[at("/audit")]
    Audit,
    #[at("/users")]
    Users,
    #[at("/profile")]
    Profile,
    #[at("/login")]
    Login,
    #[at("/signup")]
    SignUp,
    #[at("/forgot-password")]
    ForgotPassword,
    #[at("/reset-password")]
    ResetPassword,
    #[not_found]
    #[at("/404")]
    NotFound,
}

/// Who may open a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Anyone.
    Public,
    /// Only visitors without a session; signed-in users go to the dashboard.
    Guest,
    Member,
    /// Managers and admins.
    Reviewer,
    Admin,
}

impl Route {
    pub fn access(&self) -> Access {
        match self {
            Self::NotFound => Access::Public,
            Self::Login | Self::SignUp | Self::ForgotPassword | Self::ResetPassword => {
                Access::Guest
            }
            Self::Home | Self::Analytics | Self::Invoices | Self::Notifications | Self::Profile => {
                Access::Member
            }
            Self::Approvals => Access::Reviewer,
            Self::Audit | Self::Users => Access::Admin,
        }
    }

    /// Where `session` is sent instead of this route, if it may not open it.
    pub fn redirect_for(&self, session: &Session) -> Option<Self> {
        let signed_in = session.is_authenticated();
        match self.access() {
            Access::Public => None,
            Access::Guest => signed_in.then_some(Self::Home),
            _ if !signed_in => Some(Self::Login),
            Access::Member => None,
            Access::Reviewer => (!session.roles.can_review()).then_some(Self::Home),
            Access::Admin => (!session.is_admin()).then_some(Self::Home),
        }
    }

    /// Label and icon for routes shown in the header.
    pub fn nav_entry(&self) -> Option<(&'static str, IconId)> {
        match self {
            Self::Home => Some(("Expenses", IconId::HeroiconsOutlineBanknotes)),
            Self::Approvals => Some(("Approvals", IconId::HeroiconsOutlineCheckBadge)),
            Self::Analytics => Some(("Analytics", IconId::HeroiconsOutlineChartBar)),
            Self::Invoices => Some(("Invoices", IconId::HeroiconsOutlineDocumentText)),
            Self::Audit => Some(("Audit log", IconId::HeroiconsOutlineClipboardDocumentList)),
            Self::Users => Some(("Users", IconId::HeroiconsOutlineUsers)),
            _ => None,
        }
    }

    /// Header routes `session` is allowed to open.
    pub fn navigation(session: &Session) -> Vec<Self> {
        Self::iter()
            .filter(|route| route.nav_entry().is_some() && route.redirect_for(session).is_none())
            .collect()
    }
}

impl From<View> for Route {
    fn from(view: View) -> Self {
        match view {
            View::Login => Self::Login,
            View::Dashboard => Self::Home,
        }
    }
}

#[derive(Properties, PartialEq)]
struct RouteViewProps {
    route: Route,
}

#[function_component(RouteView)]
fn route_view(props: &RouteViewProps) -> Html {
    let session = use_selector(|state: &AppState| state.session.clone());
    let route = props.route.clone();

    if let Some(target) = route.redirect_for(&session) {
        return html! { <Redirect<Route> to={target} /> };
    }

    match route {
        Route::Login => html! { <LoginPage /> },
        Route::SignUp => html! { <SignUpPage /> },
        Route::ForgotPassword => html! { <ForgotPasswordPage /> },
        Route::ResetPassword => html! { <ResetPasswordPage /> },
        Route::Home => html! { <Layout current_route={route}><DashboardPage /></Layout> },
        Route::Approvals => html! { <Layout current_route={route}><ApprovalsPage /></Layout> },
        Route::Analytics => html! { <Layout current_route={route}><AnalyticsPage /></Layout> },
        Route::Invoices => html! { <Layout current_route={route}><InvoicesPage /></Layout> },
        Route::Notifications => {
            html! { <Layout current_route={route}><NotificationsPage /></Layout> }
        }
        Route::Audit => html! { <Layout current_route={route}><AuditPage /></Layout> },
        Route::Users => html! { <Layout current_route={route}><UsersPage /></Layout> },
        Route::Profile => html! { <Layout current_route={route}><ProfilePage /></Layout> },
        Route::NotFound => html! { <Layout current_route={route}><ErrorPage /></Layout> },
    }
}

/// Switch function for the application routes.
pub fn switch(route: Route) -> Html {
    console::log(&format!("Switching to route: {route:?}"));
    html! { <RouteView {route} /> }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::RoleFlags;

    fn signed_in(roles: RoleFlags) -> Session {
        Session {
            token: Some("abc123".into()),
            roles,
            ..Session::default()
        }
    }

    #[test]
    fn visitors_are_sent_to_login() {
        let visitor = Session::default();
        assert_eq!(Route::Home.redirect_for(&visitor), Some(Route::Login));
        assert_eq!(Route::Users.redirect_for(&visitor), Some(Route::Login));
        assert_eq!(Route::Login.redirect_for(&visitor), None);
        assert_eq!(Route::ResetPassword.redirect_for(&visitor), None);
        assert_eq!(Route::NotFound.redirect_for(&visitor), None);
        assert!(Route::navigation(&visitor).is_empty());
    }

    #[test]
    fn signed_in_users_skip_guest_pages() {
        let employee = signed_in(RoleFlags::default());
        assert_eq!(Route::Login.redirect_for(&employee), Some(Route::Home));
        assert_eq!(Route::SignUp.redirect_for(&employee), Some(Route::Home));
        assert_eq!(Route::Profile.redirect_for(&employee), None);
    }

    #[test]
    fn privileged_pages_follow_roles() {
        let employee = signed_in(RoleFlags::default());
        assert_eq!(Route::Approvals.redirect_for(&employee), Some(Route::Home));
        assert_eq!(Route::Audit.redirect_for(&employee), Some(Route::Home));

        let manager = signed_in(RoleFlags {
            is_manager: true,
            ..RoleFlags::default()
        });
        assert_eq!(Route::Approvals.redirect_for(&manager), None);
        assert_eq!(Route::Users.redirect_for(&manager), Some(Route::Home));

        let admin = signed_in(RoleFlags {
            is_admin: true,
            ..RoleFlags::default()
        });
        assert_eq!(Route::Approvals.redirect_for(&admin), None);
        assert_eq!(Route::Users.redirect_for(&admin), None);
    }

    #[test]
    fn navigation_lists_only_reachable_pages() {
        let employee = Route::navigation(&signed_in(RoleFlags::default()));
        assert_eq!(employee, vec![Route::Home, Route::Analytics, Route::Invoices]);

        let admin = Route::navigation(&signed_in(RoleFlags {
            is_admin: true,
            is_manager: false,
        }));
        assert_eq!(
            admin,
            vec![
                Route::Home,
                Route::Approvals,
                Route::Analytics,
                Route::Invoices,
                Route::Audit,
                Route::Users
            ]
        );
    }

    #[test]
    fn session_views_map_to_routes() {
        assert_eq!(Route::from(View::Login), Route::Login);
        assert_eq!(Route::from(View::Dashboard), Route::Home);
        assert_eq!(Route::ResetPassword.to_path(), "/reset-password");
    }
}
