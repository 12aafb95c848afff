use std::{sync::Arc, time::Duration};

use rust_decimal::Decimal;
use steamline::prelude::*;
use steamline_app::{
    api::{
        LoginResponse, MockAuthApi, MockCatalogApi, MockDashboardApi, MockOrdersApi, MockUsersApi,
    },
    context::{AppContext, Services},
    notifications::NotificationKind,
    session::SessionError,
    storage::{KeyValueStore, MemoryStore, PENDING_CART_KEY},
};
use testresult::TestResult;

fn customer() -> User {
    User {
        id: UserId::new(21),
        username: "rani".to_string(),
        full_name: Some("Rani Putri".to_string()),
        phone: Some("0813".to_string()),
        role: Role::Customer,
    }
}

fn context(auth: MockAuthApi, orders: MockOrdersApi, store: Arc<MemoryStore>) -> AppContext {
    AppContext::new(
        Services {
            auth: Arc::new(auth),
            catalog: Arc::new(MockCatalogApi::new()),
            orders: Arc::new(orders),
            users: Arc::new(MockUsersApi::new()),
            dashboard: Arc::new(MockDashboardApi::new()),
        },
        store,
        Duration::from_secs(10),
    )
}

fn signed_in_auth(user: User) -> MockAuthApi {
    let mut auth = MockAuthApi::new();

    auth.expect_login().once().return_once(move |_| {
        Ok(LoginResponse {
            access_token: "secret".to_string(),
            user,
        })
    });

    auth
}

#[tokio::test]
async fn customer_places_an_order_end_to_end() -> TestResult {
    let mut orders = MockOrdersApi::new();

    orders
        .expect_create_order()
        .once()
        .withf(|request, _| {
            request.customer_id == Some(UserId::new(21)) && request.items.len() == 1
        })
        .return_once(|_, _| {
            Ok(OrderCreated {
                order_id: OrderId::new(88),
            })
        });

    let store = Arc::new(MemoryStore::new());
    let context = context(signed_in_auth(customer()), orders, store.clone());

    let identity = context.session.login("rani", "pw").await?;
    let mut checkout = context.checkout()?;

    checkout.cart_mut().add_item_by(
        &Service {
            id: ServiceId::new(1),
            name: "Cuci Setrika".to_string(),
            unit: "kg".to_string(),
            price: Decimal::new(9_000, 0),
        },
        Quantity::new(Decimal::new(35, 1))?,
    );

    let total = checkout.commit()?.total;
    assert_eq!(total, Decimal::new(31_500, 0));
    assert!(store.get(PENDING_CART_KEY)?.is_some());

    let order_id = checkout
        .submit_order(PaymentMethod::Cod, Some(identity.id))
        .await?;

    assert_eq!(order_id, OrderId::new(88));
    assert!(store.get(PENDING_CART_KEY)?.is_none());
    assert!(checkout.cart().is_empty());

    let notes = context.notifications.drain();
    assert!(
        notes
            .iter()
            .any(|note| note.kind == NotificationKind::Success && note.description.contains("#ORD-88"))
    );

    Ok(())
}

#[tokio::test]
async fn a_fresh_process_resumes_the_pending_checkout() -> TestResult {
    let store = Arc::new(MemoryStore::new());
    let first = context(MockAuthApi::new(), MockOrdersApi::new(), store.clone());

    let mut checkout = first.checkout()?;
    checkout.cart_mut().add_item(&Service {
        id: ServiceId::new(2),
        name: "Bed Cover".to_string(),
        unit: "pcs".to_string(),
        price: Decimal::new(25_000, 0),
    });
    let key = checkout.commit()?.idempotency_key;

    let second = context(MockAuthApi::new(), MockOrdersApi::new(), store);
    let resumed = second.checkout()?;

    assert_eq!(
        resumed.stage().pending().map(|pending| pending.idempotency_key),
        Some(key)
    );

    Ok(())
}

#[tokio::test]
async fn guards_follow_the_signed_in_role() -> TestResult {
    let store = Arc::new(MemoryStore::new());
    let context = context(signed_in_auth(customer()), MockOrdersApi::new(), store);

    assert!(matches!(
        context.session.require_identity(Route::Orders),
        Err(SessionError::NotSignedIn)
    ));

    context.session.login("rani", "pw").await?;

    assert!(context.session.require_identity(Route::MyOrders).is_ok());
    assert!(matches!(
        context.session.require_identity(Route::Users),
        Err(SessionError::Forbidden { .. })
    ));

    context.session.logout()?;

    assert!(context.session.current()?.is_none());

    Ok(())
}
