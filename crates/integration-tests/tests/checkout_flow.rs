//! End-to-end storefront flows against a mock backend.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::num::NonZeroU32;

use ix_core::{Money, OrderId, ProductId, Username};
use ix_integration_tests::TestContext;
use ix_storefront::cart::{DurableSlot, ProductRef};
use ix_storefront::services::{CheckoutError, CheckoutOutcome, CheckoutService, SessionService};
use mockito::Matcher;
use secrecy::SecretString;
use serde_json::json;

const WHEY: &str = r#"{"id":1,"name":"Whey","slug":"whey","price":"2499.00","stock":10,"image":"/media/whey.jpg","category":{"id":1,"name":"Protein","slug":"protein"}}"#;

fn arjun() -> Username {
    Username::parse("arjun").unwrap()
}

#[tokio::test]
async fn test_browse_add_login_checkout() {
    let mut ctx = TestContext::new().await;
    ctx.server
        .mock("GET", "/api/products/items/1/")
        .with_status(200)
        .with_body(WHEY)
        .create_async()
        .await;
    ctx.server
        .mock("POST", "/api/accounts/session-login/")
        .with_status(200)
        .with_header("set-cookie", "csrftoken=c5rf; Path=/")
        .with_body(r#"{"status":"ok"}"#)
        .create_async()
        .await;
    let place = ctx
        .server
        .mock("POST", "/api/orders/place/")
        .match_header("x-csrftoken", "c5rf")
        .match_body(Matcher::Json(json!({
            "items": [{"product": 1, "price": 2499, "quantity": 3}],
            "total_amount": 7497,
            "user": "arjun"
        })))
        .with_status(201)
        .with_body(r#"{"id":42,"user_name":"arjun","total_amount":"7497.00","discount_amount":"0.00","items":[{"product":1,"price":"2499.00","quantity":3}],"created_at":"2025-06-01T09:30:00Z"}"#)
        .create_async()
        .await;

    let state = &ctx.state;
    let whey = state.api().get_product(ProductId::new(1)).await.unwrap();
    {
        let mut cart = state.open_cart();
        cart.add_one(&whey);
        cart.add_item(&whey, NonZeroU32::new(2).unwrap());
    }

    let session_slot = state.session_slot();
    let user = SessionService::new(state.api(), &session_slot)
        .login(arjun(), &SecretString::from("hunter22"))
        .await
        .unwrap();

    let mut cart = state.open_cart();
    assert_eq!(cart.count(), 3);
    assert_eq!(cart.total(), Money::from_units(7497));

    let outcome = CheckoutService::new(state.api())
        .place_order(&mut cart, Some(&user))
        .await
        .unwrap();

    assert!(matches!(outcome, CheckoutOutcome::Placed(ref o) if o.id == OrderId::new(42)));
    assert!(cart.is_empty());
    assert_eq!(state.cart_slot().load().unwrap().as_deref(), Some("[]"));
    place.assert_async().await;
}

#[tokio::test]
async fn test_checkout_sends_exact_amounts() {
    let mut ctx = TestContext::new().await;
    ctx.server
        .mock("POST", "/api/accounts/session-login/")
        .with_status(200)
        .with_body(r#"{"status":"ok"}"#)
        .create_async()
        .await;
    let place = ctx
        .server
        .mock("POST", "/api/orders/place/")
        .match_body(Matcher::Regex(
            r#""price":1234567890123456.78,"quantity":2\}\],"total_amount":2469135780246913.56"#
                .to_string(),
        ))
        .with_status(201)
        .with_body(r#"{"id":43,"total_amount":"2469135780246913.56","discount_amount":"0.00","items":[]}"#)
        .create_async()
        .await;

    let price: Money = "1234567890123456.78".parse().unwrap();
    let mut cart = ctx.state.open_cart();
    cart.add_item(
        ProductRef::new(ProductId::new(7), "Bulk Pallet", price),
        NonZeroU32::new(2).unwrap(),
    );

    let session_slot = ctx.state.session_slot();
    let user = SessionService::new(ctx.state.api(), &session_slot)
        .login(arjun(), &SecretString::from("hunter22"))
        .await
        .unwrap();
    let outcome = CheckoutService::new(ctx.state.api())
        .place_order(&mut cart, Some(&user))
        .await
        .unwrap();

    assert!(matches!(outcome, CheckoutOutcome::Placed(ref o) if o.id == OrderId::new(43)));
    place.assert_async().await;
}

#[tokio::test]
async fn test_remembered_user_survives_restart() {
    let mut ctx = TestContext::new().await;
    ctx.server
        .mock("POST", "/api/accounts/session-login/")
        .with_status(200)
        .with_body(r#"{"status":"ok"}"#)
        .create_async()
        .await;

    let slot = ctx.state.session_slot();
    SessionService::new(ctx.state.api(), &slot)
        .login(arjun(), &SecretString::from("hunter22"))
        .await
        .unwrap();

    assert!(ctx.data_dir().join("ix_session.json").exists());
    let reopened = ctx.state.session_slot();
    let user = SessionService::new(ctx.state.api(), &reopened).current_user();
    assert_eq!(user.unwrap().username, arjun());
}

#[tokio::test]
async fn test_checkout_without_login_keeps_cart() {
    let mut ctx = TestContext::new().await;
    let place = ctx
        .server
        .mock("POST", "/api/orders/place/")
        .expect(0)
        .create_async()
        .await;
    ctx.server
        .mock("GET", "/api/products/items/1/")
        .with_status(200)
        .with_body(WHEY)
        .create_async()
        .await;

    let whey = ctx.state.api().get_product(ProductId::new(1)).await.unwrap();
    let mut cart = ctx.state.open_cart();
    cart.add_one(&whey);

    let err = CheckoutService::new(ctx.state.api())
        .place_order(&mut cart, None)
        .await
        .unwrap_err();

    assert!(matches!(err, CheckoutError::NotLoggedIn));
    assert_eq!(ctx.state.open_cart().count(), 1);
    place.assert_async().await;
}

#[tokio::test]
async fn test_logout_clears_cart_on_disk() {
    let mut ctx = TestContext::new().await;
    ctx.server
        .mock("POST", "/api/accounts/session-login/")
        .with_status(200)
        .with_body(r#"{"status":"ok"}"#)
        .create_async()
        .await;
    ctx.server
        .mock("POST", "/api/accounts/session-logout/")
        .with_status(200)
        .with_body(r#"{"status":"ok"}"#)
        .create_async()
        .await;
    ctx.server
        .mock("GET", "/api/products/items/1/")
        .with_status(200)
        .with_body(WHEY)
        .create_async()
        .await;

    let state = &ctx.state;
    let slot = state.session_slot();
    let session = SessionService::new(state.api(), &slot);
    session
        .login(arjun(), &SecretString::from("hunter22"))
        .await
        .unwrap();

    let whey = state.api().get_product(ProductId::new(1)).await.unwrap();
    let mut cart = state.open_cart();
    cart.add_one(&whey);

    session.logout(&mut cart).await.unwrap();

    assert!(state.open_cart().is_empty());
    assert_eq!(session.current_user(), None);
}

#[tokio::test]
async fn test_order_history_after_checkout() {
    let mut ctx = TestContext::new().await;
    ctx.server
        .mock("GET", "/api/orders/mine/")
        .with_status(200)
        .with_body(r#"{"count":1,"orders":[{"id":42,"user_name":"arjun","total_amount":"6747.30","discount_amount":"749.70","items":[{"product":1,"price":"2499.00","quantity":3}],"created_at":"2025-06-01T09:30:00Z"}]}"#)
        .create_async()
        .await;

    let history = ctx.state.api().my_orders().await.unwrap();

    assert_eq!(history.count, 1);
    assert_eq!(history.orders[0].discount_amount.to_string(), "749.70");
    assert_eq!(history.orders[0].items[0].product, ProductId::new(1));
}
