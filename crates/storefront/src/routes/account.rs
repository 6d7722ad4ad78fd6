//! Account route handlers.
//!
//! `GET /account` shows the login/register forms to anonymous visitors and
//! the dashboard to signed-in customers (orders, or store metrics for
//! admins). Form posts redirect back to `/account` with a flash message.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::middleware::CurrentCustomer;
use crate::middleware::customer::customer_token;
use crate::models::Flash;
use crate::services::account::{
    self, AdminPanel, LOGIN_FAILED, LOGIN_SUCCESS, OrdersOutcome, RECOVERY_FAILED, RECOVERY_SENT,
    REGISTER_FAILED, REGISTER_SUCCESS, SESSION_EXPIRED,
};
use crate::shopify::{Customer, Order};
use crate::state::AppState;

use super::layout::{Layout, set_flash};

// =============================================================================
// View Models
// =============================================================================

/// Customer display data for templates.
#[derive(Clone)]
pub struct CustomerView {
    pub display_name: String,
    pub full_name: String,
    pub email: String,
}

impl From<&Customer> for CustomerView {
    fn from(customer: &Customer) -> Self {
        Self {
            display_name: customer.display_name().to_string(),
            full_name: customer.full_name(),
            email: customer.email.clone().unwrap_or_default(),
        }
    }
}

/// Order line display data for templates.
#[derive(Clone)]
pub struct LineItemView {
    pub title: String,
    pub quantity: i64,
    pub image: Option<String>,
}

/// Order display data for templates.
#[derive(Clone)]
pub struct OrderView {
    pub order_number: i64,
    pub date: String,
    pub total: String,
    pub financial_status: String,
    pub fulfillment_status: String,
    pub fulfilled: bool,
    pub status_url: String,
    pub line_items: Vec<LineItemView>,
}

impl From<Order> for OrderView {
    fn from(order: Order) -> Self {
        Self {
            order_number: order.order_number,
            date: order.processed_at.format("%b %-d, %Y").to_string(),
            total: order.total_price.display(),
            financial_status: order
                .financial_status
                .map(|s| s.label().to_string())
                .unwrap_or_default(),
            fulfillment_status: order.fulfillment_status.label().to_string(),
            fulfilled: order.fulfillment_status.is_complete(),
            status_url: order.status_url,
            line_items: order
                .line_items
                .into_nodes()
                .into_iter()
                .map(|item| LineItemView {
                    image: item.image_url().map(String::from),
                    title: item.title,
                    quantity: item.quantity,
                })
                .collect(),
        }
    }
}

/// Admin metrics panel display data.
#[derive(Clone, Default)]
pub struct AdminView {
    pub orders_count: Option<i64>,
    pub total_sales: Option<String>,
    pub error: Option<String>,
}

impl From<AdminPanel> for AdminView {
    fn from(panel: AdminPanel) -> Self {
        match panel {
            AdminPanel::Loaded {
                orders_count,
                total_sales,
            } => Self {
                orders_count: Some(orders_count),
                total_sales: Some(total_sales),
                error: None,
            },
            AdminPanel::Unavailable(message) => Self {
                error: Some(message),
                ..Self::default()
            },
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Login / registration forms.
#[derive(Template, WebTemplate)]
#[template(path = "account/auth.html")]
pub struct AccountAuthTemplate {
    pub layout: Layout,
    pub register_mode: bool,
}

/// Signed-in dashboard.
#[derive(Template, WebTemplate)]
#[template(path = "account/dashboard.html")]
pub struct AccountDashboardTemplate {
    pub layout: Layout,
    pub customer: CustomerView,
    /// Present for admins instead of the order list.
    pub admin: Option<AdminView>,
    pub orders: Vec<OrderView>,
    pub orders_error: Option<String>,
}

// =============================================================================
// Forms
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct AccountQuery {
    pub mode: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize)]
pub struct RegisterForm {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize)]
pub struct RecoverForm {
    #[serde(default)]
    pub email: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Account page: forms or dashboard depending on the resolved session.
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    CurrentCustomer(resolved): CurrentCustomer,
    Query(query): Query<AccountQuery>,
) -> Result<Response> {
    let Some(customer) = resolved.profile() else {
        return Ok(AccountAuthTemplate {
            layout: Layout::load(&session).await?,
            register_mode: query.mode.as_deref() == Some("register"),
        }
        .into_response());
    };

    if customer.is_admin() {
        let admin = account::load_admin_panel(state.admin()).await;
        return Ok(AccountDashboardTemplate {
            layout: Layout::load(&session).await?,
            customer: CustomerView::from(customer),
            admin: Some(AdminView::from(admin)),
            orders: Vec::new(),
            orders_error: None,
        }
        .into_response());
    }

    let outcome = match customer_token(&session).await? {
        Some(token) => account::load_orders(state.storefront(), &session, &token).await?,
        None => OrdersOutcome::SessionExpired,
    };

    let (orders, orders_error) = match outcome {
        OrdersOutcome::Loaded(orders) => (orders.into_iter().map(OrderView::from).collect(), None),
        OrdersOutcome::Failed(message) => (Vec::new(), Some(message)),
        OrdersOutcome::SessionExpired => {
            account::sign_out(&session).await?;
            set_flash(&session, Flash::error(SESSION_EXPIRED)).await?;
            return Ok(Redirect::to("/account").into_response());
        }
    };

    Ok(AccountDashboardTemplate {
        layout: Layout::load(&session).await?,
        customer: CustomerView::from(customer),
        admin: None,
        orders,
        orders_error,
    }
    .into_response())
}

/// Sign in.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Redirect> {
    let flash = match account::sign_in(state.storefront(), &session, &form.email, &form.password)
        .await
    {
        Ok(_) => Flash::success(LOGIN_SUCCESS),
        Err(e) => {
            tracing::info!(error = %e, "Login failed");
            Flash::error(e.user_message(LOGIN_FAILED))
        }
    };
    set_flash(&session, flash).await?;
    Ok(Redirect::to("/account"))
}

/// Create an account and sign in.
#[instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Result<Redirect> {
    let result = account::sign_up(
        state.storefront(),
        &session,
        &form.email,
        &form.password,
        form.first_name.as_deref(),
        form.last_name.as_deref(),
    )
    .await;

    match result {
        Ok(_) => {
            set_flash(&session, Flash::success(REGISTER_SUCCESS)).await?;
            Ok(Redirect::to("/account"))
        }
        Err(e) => {
            tracing::info!(error = %e, "Registration failed");
            set_flash(&session, Flash::error(e.user_message(REGISTER_FAILED))).await?;
            Ok(Redirect::to("/account?mode=register"))
        }
    }
}

/// Send a password reset email.
#[instrument(skip_all)]
pub async fn recover(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RecoverForm>,
) -> Result<Redirect> {
    let flash = match account::recover(state.storefront(), &form.email).await {
        Ok(()) => Flash::success(RECOVERY_SENT),
        Err(e) => Flash::error(e.user_message(RECOVERY_FAILED)),
    };
    set_flash(&session, flash).await?;
    Ok(Redirect::to("/account"))
}

/// Sign out. The cart is kept.
#[instrument(skip_all)]
pub async fn logout(session: Session) -> Result<Redirect> {
    account::sign_out(&session).await?;
    Ok(Redirect::to("/"))
}
