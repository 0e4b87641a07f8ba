use std::sync::Arc;
use tracing::debug;

use crate::cli::output::OutputSink;
use crate::error::Operation;
use crate::models::{amount, Identity, OrderCreateRequest, OrderId};
use crate::services::formatter::{render_order_summary, render_order_text};
use crate::services::upstream::OrderApi;

pub const USAGE_ORDER_CREATE: &str =
    "create [identity] [amount] [price currency] [receive currency] [use lightning network]";
pub const USAGE_ORDER_GET: &str = "get [identity] [orderID]";
pub const USAGE_ORDER_GET_ALL: &str = "get-all [identity]";

pub fn usage() -> String {
    [
        "Usage: order <action> [args]".to_string(),
        "Available actions:".to_string(),
        format!("  {}", USAGE_ORDER_CREATE),
        format!("  {}", USAGE_ORDER_GET),
        format!("  {}", USAGE_ORDER_GET_ALL),
    ]
    .join("\n")
}

/// The `order` shell command: `create`, `get` and `get-all`.
///
/// Malformed input is answered with usage or a warning and never reaches the API.
pub struct OrderCommands {
    api: Arc<dyn OrderApi>,
    out: Arc<dyn OutputSink>,
}

impl OrderCommands {
    pub fn new(api: Arc<dyn OrderApi>, out: Arc<dyn OutputSink>) -> Self {
        Self { api, out }
    }

    /// Runs one `order` invocation; `input` is everything after the command name.
    pub async fn run(&self, input: &str) {
        let args: Vec<&str> = input.split_whitespace().collect();
        let Some((action, rest)) = args.split_first() else {
            self.out.info(&usage());
            return;
        };

        debug!(action = %action, args = rest.len(), "order command");
        match *action {
            "create" => self.create(rest).await,
            "get" => self.get(rest).await,
            "get-all" => self.get_all(rest).await,
            _ => {
                self.out
                    .warn(&format!("Unknown sub-command '{}'", input.trim()));
                self.out.info(&usage());
            }
        }
    }

    async fn create(&self, args: &[&str]) {
        if !(4..=5).contains(&args.len()) {
            self.out.info(&format!("Usage: {}", USAGE_ORDER_CREATE));
            return;
        }

        let Some(amount) = amount::parse(args[1]) else {
            self.out.warn("could not parse amount");
            return;
        };

        let request = OrderCreateRequest::new(amount, args[2], args[3], args.len() == 5);
        if let Err(err) = request.validate() {
            self.out.warn(&Operation::Create.wrap(&err));
            return;
        }

        match self.api.create_order(&Identity::from(args[0]), request).await {
            Ok(order) => self.print_lines(render_order_text(&order)),
            Err(err) => self.out.warn(&Operation::Create.wrap(&err)),
        }
    }

    async fn get(&self, args: &[&str]) {
        if args.len() != 2 {
            self.out.info(&format!("Usage: {}", USAGE_ORDER_GET));
            return;
        }

        let Ok(order_id) = args[1].parse::<OrderId>() else {
            self.out.warn("could not parse orderID");
            return;
        };

        match self.api.get_order(&Identity::from(args[0]), order_id).await {
            Ok(order) => self.print_lines(render_order_text(&order)),
            Err(err) => self.out.warn(&Operation::Get.wrap(&err)),
        }
    }

    async fn get_all(&self, args: &[&str]) {
        if args.len() != 1 {
            self.out.info(&format!("Usage: {}", USAGE_ORDER_GET_ALL));
            return;
        }

        match self.api.list_orders(&Identity::from(args[0])).await {
            Ok(orders) => {
                for order in &orders {
                    self.out.info(&render_order_summary(order));
                }
                self.out.info(&format!(
                    "To explore additional order information use: '{}'",
                    USAGE_ORDER_GET
                ));
            }
            Err(err) => self.out.warn(&Operation::List.wrap(&err)),
        }
    }

    fn print_lines(&self, lines: Vec<String>) {
        for line in lines {
            self.out.info(&line);
        }
    }
}
