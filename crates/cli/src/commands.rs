// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command handlers: each subcommand maps to one or two API calls and
//! prints the result as pretty JSON.

use shopfront::api::{auth, cart, orders, products};
use shopfront::dispatch::ApiClient;

use crate::config::{CartCmd, Command, OrdersCmd, ProductsCmd};

pub async fn run(client: &ApiClient, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Login { username, password } => {
            auth::login(client, &auth::LoginRequest { username: username.clone(), password })
                .await?;
            println!("signed in as {username}");
        }
        Command::Register { username, email, password } => {
            let message =
                auth::register(client, &auth::RegisterRequest { username, email, password })
                    .await?;
            println!("{message}");
        }
        Command::Logout => {
            client.session().clear();
            println!("signed out");
        }
        Command::Whoami => match client.session().identity() {
            Some(identity) => print_json(&serde_json::json!({
                "subject": identity.subject,
                "roles": identity.roles,
                "expiresAtMs": identity.expires_at_ms,
            }))?,
            None => println!("not signed in"),
        },
        Command::Profile => {
            let profile = auth::fetch_profile(client).await?;
            print_json(&profile)?;
        }
        Command::Products { cmd } => run_products(client, cmd).await?,
        Command::Cart { customer, cmd } => run_cart(client, customer, cmd).await?,
        Command::Orders { cmd } => run_orders(client, cmd).await?,
    }
    Ok(())
}

async fn run_products(client: &ApiClient, cmd: ProductsCmd) -> anyhow::Result<()> {
    match cmd {
        ProductsCmd::List => print_json(&products::list(client).await?),
        ProductsCmd::Add { name, price, category, description, stock } => {
            let product = products::create(
                client,
                &products::NewProduct { name, price, description, stock_quantity: stock, category },
            )
            .await?;
            print_json(&product)
        }
        ProductsCmd::Update { id, name, price, category, description, stock } => {
            let product = products::update(
                client,
                id,
                &products::NewProduct { name, price, description, stock_quantity: stock, category },
            )
            .await?;
            print_json(&product)
        }
        ProductsCmd::Remove { id } => {
            products::remove(client, id).await?;
            println!("removed product {id}");
            Ok(())
        }
    }
}

async fn run_cart(client: &ApiClient, customer: i64, cmd: CartCmd) -> anyhow::Result<()> {
    match cmd {
        CartCmd::Show => print_json(&cart::fetch(client, customer).await?),
        CartCmd::Add { product, quantity } => {
            let updated = cart::add_item(
                client,
                customer,
                &cart::NewCartItem { product_id: product, quantity },
            )
            .await?;
            print_json(&updated)
        }
        CartCmd::Update { product, quantity } => {
            print_json(&cart::update_item(client, customer, product, quantity).await?)
        }
        CartCmd::Remove { product } => {
            print_json(&cart::remove_item(client, customer, product).await?)
        }
        CartCmd::Checkout { cart: cart_id } => {
            print_json(&cart::checkout(client, cart_id).await?)
        }
    }
}

async fn run_orders(client: &ApiClient, cmd: OrdersCmd) -> anyhow::Result<()> {
    match cmd {
        OrdersCmd::List => print_json(&orders::list(client).await?),
        OrdersCmd::Mine { customer } => {
            print_json(&orders::list_for_customer(client, customer).await?)
        }
        OrdersCmd::Create { customer, items } => {
            let items = items
                .iter()
                .map(|raw| parse_order_item(raw))
                .collect::<anyhow::Result<Vec<_>>>()?;
            let order =
                orders::create(client, &orders::NewOrder { customer_id: customer, items }).await?;
            print_json(&order)
        }
        OrdersCmd::Status { id, status } => {
            print_json(&orders::update_status(client, id, &status).await?)
        }
    }
}

/// Parse an order line given as `<product-id>:<quantity>`.
fn parse_order_item(raw: &str) -> anyhow::Result<orders::NewOrderItem> {
    let (product, quantity) = raw
        .split_once(':')
        .ok_or_else(|| anyhow::anyhow!("invalid item {raw:?}, expected <product-id>:<quantity>"))?;
    Ok(orders::NewOrderItem {
        product_id: product.trim().parse()?,
        quantity: quantity.trim().parse()?,
    })
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
