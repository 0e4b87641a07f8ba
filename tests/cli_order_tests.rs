mod common;

use payment_order_gateway::cli::{order::usage, BufferedOutput, OrderCommands};
use payment_order_gateway::models::Order;
use rust_decimal_macros::dec;
use std::sync::Arc;

use crate::common::{mock_order, MockOrderApi, IDENTITY};

fn commands(orders: Vec<Order>) -> (OrderCommands, Arc<MockOrderApi>, Arc<BufferedOutput>) {
    let api = Arc::new(MockOrderApi::new(IDENTITY, orders));
    let out = Arc::new(BufferedOutput::new());
    (OrderCommands::new(api.clone(), out.clone()), api, out)
}

#[tokio::test]
async fn test_no_action_prints_usage() {
    let (cmd, api, out) = commands(vec![]);
    cmd.run("   ").await;

    assert_eq!(out.infos(), vec![usage()]);
    assert_eq!(api.calls(), 0);
}

#[tokio::test]
async fn test_unknown_action() {
    let (cmd, api, out) = commands(vec![]);
    cmd.run("cancel 1").await;

    assert_eq!(out.warnings(), vec!["Unknown sub-command 'cancel 1'"]);
    assert_eq!(out.infos(), vec![usage()]);
    assert_eq!(api.calls(), 0);
}

#[tokio::test]
async fn test_create_prints_order() {
    let (cmd, api, out) = commands(vec![mock_order(1, IDENTITY, "EUR", "MYST", dec!(10))]);
    cmd.run(&format!("create {} 10 EUR MYST", IDENTITY)).await;

    assert!(out.warnings().is_empty());
    assert_eq!(
        out.infos(),
        vec![
            "Order ID '1' is in state: 'pending'",
            "Price: 10 EUR",
            "Pay: 1 test",
            "Receive: 1 MYST",
            "Payment address: 0x00",
        ]
    );

    let request = api.last_create.lock().clone().unwrap();
    assert_eq!(request.price_amount, dec!(10));
    assert_eq!(request.price_currency, "EUR");
    assert_eq!(request.receive_currency, "MYST");
    assert!(!request.lightning_network);
}

#[tokio::test]
async fn test_create_fifth_token_enables_lightning() {
    let (cmd, api, _out) = commands(vec![mock_order(1, IDENTITY, "EUR", "BTC", dec!(1))]);
    cmd.run(&format!("create {} 1.5 EUR BTC no", IDENTITY)).await;

    let request = api.last_create.lock().clone().unwrap();
    assert_eq!(request.price_amount, dec!(1.5));
    assert!(request.lightning_network);
}

#[tokio::test]
async fn test_create_wrong_arg_count() {
    for args in ["create", "create 0xb 1 EUR", "create 0xb 1 EUR BTC yes extra"] {
        let (cmd, api, out) = commands(vec![]);
        cmd.run(args).await;

        assert_eq!(
            out.infos(),
            vec!["Usage: create [identity] [amount] [price currency] [receive currency] [use lightning network]"],
            "args {:?}",
            args
        );
        assert_eq!(api.calls(), 0);
    }
}

#[tokio::test]
async fn test_create_bad_amount() {
    for amount in ["ten", "1e-29", "1e40", "NaN"] {
        let (cmd, api, out) = commands(vec![]);
        cmd.run(&format!("create {} {} EUR MYST", IDENTITY, amount)).await;

        assert_eq!(out.warnings(), vec!["could not parse amount"], "amount {:?}", amount);
        assert_eq!(api.calls(), 0);
    }
}

#[tokio::test]
async fn test_create_scientific_amount() {
    let (cmd, api, out) = commands(vec![mock_order(1, IDENTITY, "EUR", "MYST", dec!(1000))]);
    cmd.run(&format!("create {} 1e3 EUR MYST", IDENTITY)).await;

    assert!(out.warnings().is_empty());
    assert_eq!(api.calls(), 1);
    let request = api.last_create.lock().clone().unwrap();
    assert_eq!(request.price_amount, dec!(1000));
}

#[tokio::test]
async fn test_create_non_positive_amount_short_circuits() {
    for amount in ["0", "-2"] {
        let (cmd, api, out) = commands(vec![]);
        cmd.run(&format!("create {} {} EUR MYST", IDENTITY, amount)).await;

        let warnings = out.warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].starts_with("could not create an order: invalid order request"));
        assert_eq!(api.calls(), 0);
    }
}

#[tokio::test]
async fn test_create_upstream_failure() {
    let (cmd, api, out) = commands(vec![]);
    cmd.run("create 0x000000000000000000000000000000000000000c 1 EUR MYST").await;

    assert_eq!(
        out.warnings(),
        vec!["could not create an order: upstream request failed: wrong identity"]
    );
    assert_eq!(api.calls(), 1);
}

#[tokio::test]
async fn test_get_prints_order() {
    let (cmd, api, out) = commands(vec![mock_order(1, IDENTITY, "EUR", "MYST", dec!(2))]);
    cmd.run(&format!("get {} 42", IDENTITY)).await;

    assert_eq!(out.infos()[0], "Order ID '42' is in state: 'pending'");
    assert_eq!(out.infos()[1], "Price: 2 EUR");
    assert_eq!(api.calls(), 1);
}

#[tokio::test]
async fn test_get_non_numeric_id_makes_no_call() {
    let (cmd, api, out) = commands(vec![]);
    cmd.run(&format!("get {} x", IDENTITY)).await;

    assert_eq!(out.warnings(), vec!["could not parse orderID"]);
    assert!(out.infos().is_empty());
    assert_eq!(api.calls(), 0);
}

#[tokio::test]
async fn test_get_wrong_arg_count() {
    let (cmd, api, out) = commands(vec![]);
    cmd.run("get x").await;

    assert_eq!(out.infos(), vec!["Usage: get [identity] [orderID]"]);
    assert!(out.warnings().is_empty());
    assert_eq!(api.calls(), 0);
}

#[tokio::test]
async fn test_get_upstream_failure() {
    let (cmd, _api, out) = commands(vec![]);
    cmd.run(&format!("get {} 7", IDENTITY)).await;

    assert_eq!(
        out.warnings(),
        vec!["could not get an order: upstream request failed: 404 Not Found: order not found"]
    );
}

#[tokio::test]
async fn test_get_all_lists_summaries() {
    let (cmd, api, out) = commands(vec![
        mock_order(3, IDENTITY, "EUR", "MYST", dec!(1)),
        mock_order(4, IDENTITY, "EUR", "MYST", dec!(1)),
    ]);
    cmd.run(&format!("get-all {}", IDENTITY)).await;

    assert_eq!(
        out.infos(),
        vec![
            "Order ID '3' is in state: 'pending'",
            "Order ID '4' is in state: 'pending'",
            "To explore additional order information use: 'get [identity] [orderID]'",
        ]
    );
    assert_eq!(api.calls(), 1);
}

#[tokio::test]
async fn test_get_all_wrong_arg_count() {
    let (cmd, api, out) = commands(vec![]);
    cmd.run("get-all").await;

    assert_eq!(out.infos(), vec!["Usage: get-all [identity]"]);
    assert_eq!(api.calls(), 0);
}
