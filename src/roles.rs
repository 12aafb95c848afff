//! Roles & Routes
//!
//! Identities, the route table and the guard that decides whether an
//! identity may open a route.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::ids::{OrderId, UserId};

/// A user's role.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    /// Shop administrator
    Admin,

    /// Counter staff
    Cashier,

    /// Delivery driver
    Driver,

    /// Customer
    Customer,

    /// A role this client does not know about
    Other(String),
}

impl Role {
    /// Wire name of the role.
    pub fn as_str(&self) -> &str {
        match self {
            Role::Admin => "admin",
            Role::Cashier => "cashier",
            Role::Driver => "driver",
            Role::Customer => "customer",
            Role::Other(raw) => raw,
        }
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        match value.as_str() {
            "admin" => Role::Admin,
            "cashier" => Role::Cashier,
            "driver" => Role::Driver,
            "customer" => Role::Customer,
            _ => Role::Other(value),
        }
    }
}

impl From<Role> for String {
    fn from(value: Role) -> Self {
        match value {
            Role::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl FromStr for Role {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Role::from(s.trim().to_ascii_lowercase()))
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Counter staff.
pub const STAFF: &[Role] = &[Role::Admin, Role::Cashier];

/// Administrators only.
pub const ADMIN_ONLY: &[Role] = &[Role::Admin];

/// Roles that see the delivery board.
pub const LOGISTICS: &[Role] = &[Role::Admin, Role::Driver];

/// Customers only.
pub const CUSTOMER_ONLY: &[Role] = &[Role::Customer];

const EVERYONE: &[Role] = &[Role::Admin, Role::Cashier, Role::Customer, Role::Driver];

/// A user account as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User id
    pub id: UserId,

    /// Login name
    pub username: String,

    /// Full name
    #[serde(default)]
    pub full_name: Option<String>,

    /// Phone number
    #[serde(default)]
    pub phone: Option<String>,

    /// Role
    pub role: Role,
}

impl User {
    /// Full name when present, else the username.
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.username)
    }

    /// Case-insensitive match on username or full name.
    pub fn matches_search(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();

        self.username.to_lowercase().contains(&needle)
            || self
                .full_name
                .as_deref()
                .is_some_and(|name| name.to_lowercase().contains(&needle))
    }
}

/// The signed-in principal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// User id
    pub id: UserId,

    /// Role
    pub role: Role,

    /// Name shown in the interface
    pub display_name: String,
}

impl From<&User> for Identity {
    fn from(user: &User) -> Self {
        Identity {
            id: user.id,
            role: user.role.clone(),
            display_name: user.display_name().to_string(),
        }
    }
}

impl Identity {
    /// Check if the identity holds any of `roles`.
    pub fn has_role(&self, roles: &[Role]) -> bool {
        roles.contains(&self.role)
    }

    /// Check if the identity may perform `capability`.
    pub fn can(&self, capability: Capability) -> bool {
        self.has_role(capability.roles())
    }

    /// Menu entries visible to this identity.
    pub fn menu(&self) -> Vec<MenuItem> {
        MENU.iter()
            .filter(|item| self.has_role(item.roles))
            .cloned()
            .collect()
    }
}

/// Privileged actions on an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Move an order to another status
    ChangeStatus,

    /// Record a cash payment
    TakePayment,

    /// Assign a delivery driver
    AssignDriver,
}

impl Capability {
    /// Roles allowed to perform the action.
    pub fn roles(self) -> &'static [Role] {
        match self {
            Capability::ChangeStatus | Capability::TakePayment | Capability::AssignDriver => STAFF,
        }
    }
}

/// A page of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// `/`
    Landing,
    /// `/login`
    Login,
    /// `/register`
    Register,
    /// `/track`
    Track,
    /// `/app`
    AppIndex,
    /// `/app/dashboard`
    Dashboard,
    /// `/app/orders`
    Orders,
    /// `/app/orders/:id`
    OrderDetail(OrderId),
    /// `/app/services`
    Services,
    /// `/app/users`
    Users,
    /// `/app/logistics`
    Logistics,
    /// `/app/my-orders`
    MyOrders,
    /// `/app/my-orders/:id`
    MyOrderDetail(OrderId),
    /// `/app/new-order`
    NewOrder,
    /// `/app/checkout`
    Checkout,
    /// `/app/settings`
    Settings,
}

impl Route {
    /// Match a path against the route table.
    pub fn from_path(path: &str) -> Option<Self> {
        let trimmed = path.trim().trim_end_matches('/');
        let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();

        let route = match segments.as_slice() {
            [] => Route::Landing,
            ["login"] => Route::Login,
            ["register"] => Route::Register,
            ["track"] => Route::Track,
            ["app"] => Route::AppIndex,
            ["app", "dashboard"] => Route::Dashboard,
            ["app", "orders"] => Route::Orders,
            ["app", "orders", id] => Route::OrderDetail(id.parse().ok()?),
            ["app", "services"] => Route::Services,
            ["app", "users"] => Route::Users,
            ["app", "logistics"] => Route::Logistics,
            ["app", "my-orders"] => Route::MyOrders,
            ["app", "my-orders", id] => Route::MyOrderDetail(id.parse().ok()?),
            ["app", "new-order"] => Route::NewOrder,
            ["app", "checkout"] => Route::Checkout,
            ["app", "settings"] => Route::Settings,
            _ => return None,
        };

        Some(route)
    }

    /// Canonical path of the route.
    pub fn path(self) -> String {
        match self {
            Route::Landing => "/".to_string(),
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::Track => "/track".to_string(),
            Route::AppIndex => "/app".to_string(),
            Route::Dashboard => "/app/dashboard".to_string(),
            Route::Orders => "/app/orders".to_string(),
            Route::OrderDetail(id) => format!("/app/orders/{id}"),
            Route::Services => "/app/services".to_string(),
            Route::Users => "/app/users".to_string(),
            Route::Logistics => "/app/logistics".to_string(),
            Route::MyOrders => "/app/my-orders".to_string(),
            Route::MyOrderDetail(id) => format!("/app/my-orders/{id}"),
            Route::NewOrder => "/app/new-order".to_string(),
            Route::Checkout => "/app/checkout".to_string(),
            Route::Settings => "/app/settings".to_string(),
        }
    }

    /// Check if the route is reachable without signing in.
    pub fn is_public(self) -> bool {
        matches!(
            self,
            Route::Landing | Route::Login | Route::Register | Route::Track
        )
    }

    /// Roles allowed on the route, `None` when any signed-in user may open it.
    pub fn allowed_roles(self) -> Option<&'static [Role]> {
        match self {
            Route::OrderDetail(_) => Some(STAFF),
            Route::Users => Some(ADMIN_ONLY),
            _ => None,
        }
    }
}

/// Outcome of the route guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Render the route.
    Granted(Route),

    /// Navigate elsewhere instead.
    Redirect(Route),
}

/// Decide what happens when `identity` navigates to `path`.
///
/// Unknown paths go to the landing page, signed-out visitors of `/app`
/// routes go to login, and signed-in users without the required role go to
/// the dashboard.
pub fn authorize(path: &str, identity: Option<&Identity>) -> Access {
    let Some(route) = Route::from_path(path) else {
        return Access::Redirect(Route::Landing);
    };

    if route.is_public() {
        return Access::Granted(route);
    }

    let Some(identity) = identity else {
        return Access::Redirect(Route::Login);
    };

    if route == Route::AppIndex {
        return Access::Redirect(Route::Dashboard);
    }

    match route.allowed_roles() {
        Some(roles) if !identity.has_role(roles) => Access::Redirect(Route::Dashboard),
        _ => Access::Granted(route),
    }
}

/// A navigation menu entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    /// Label
    pub label: &'static str,

    /// Target
    pub route: Route,

    /// Roles that see the entry
    pub roles: &'static [Role],
}

const MENU: &[MenuItem] = &[
    MenuItem {
        label: "Dashboard",
        route: Route::Dashboard,
        roles: EVERYONE,
    },
    MenuItem {
        label: "Orders & POS",
        route: Route::Orders,
        roles: STAFF,
    },
    MenuItem {
        label: "Services",
        route: Route::Services,
        roles: ADMIN_ONLY,
    },
    MenuItem {
        label: "Logistics",
        route: Route::Logistics,
        roles: LOGISTICS,
    },
    MenuItem {
        label: "New order",
        route: Route::NewOrder,
        roles: CUSTOMER_ONLY,
    },
    MenuItem {
        label: "My orders",
        route: Route::MyOrders,
        roles: CUSTOMER_ONLY,
    },
];
