// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Terminal storefront for the shop backend.
#[derive(Debug, Parser)]
#[command(name = "shopfront", version, about)]
pub struct Cli {
    /// Base URL of the shop API (including the /api prefix).
    #[arg(long, env = "SHOPFRONT_API_URL", default_value = "http://127.0.0.1:8080/api")]
    pub api_url: String,

    /// Path to the credentials file. Defaults to the state directory.
    #[arg(long, env = "SHOPFRONT_CREDENTIALS")]
    pub credentials: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, env = "SHOPFRONT_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,

    /// Log format (json or text).
    #[arg(long, env = "SHOPFRONT_LOG_FORMAT", default_value = "text")]
    pub log_format: String,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Resolve the credentials file path: explicit flag, else state dir.
    pub fn credentials_path(&self) -> PathBuf {
        match self.credentials {
            Some(ref path) => path.clone(),
            None => state_dir().join("credentials.json"),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in and store the issued credentials.
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account.
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Discard stored credentials.
    Logout,
    /// Show the identity decoded from the stored access token.
    Whoami,
    /// Fetch the authenticated profile.
    Profile,
    /// Product catalog.
    Products {
        #[command(subcommand)]
        cmd: ProductsCmd,
    },
    /// Shopping cart for a customer.
    Cart {
        /// Customer ID the cart belongs to.
        #[arg(long)]
        customer: i64,
        #[command(subcommand)]
        cmd: CartCmd,
    },
    /// Orders.
    Orders {
        #[command(subcommand)]
        cmd: OrdersCmd,
    },
}

#[derive(Debug, Subcommand)]
pub enum ProductsCmd {
    /// List the catalog.
    List,
    /// Add a product (admin).
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        price: f64,
        #[arg(long)]
        category: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, default_value = "0")]
        stock: i64,
    },
    /// Update a product (admin).
    Update {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        price: f64,
        #[arg(long)]
        category: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, default_value = "0")]
        stock: i64,
    },
    /// Remove a product (admin).
    Remove {
        #[arg(long)]
        id: i64,
    },
}

#[derive(Debug, Subcommand)]
pub enum CartCmd {
    /// Show the cart.
    Show,
    /// Add a product to the cart.
    Add {
        #[arg(long)]
        product: i64,
        #[arg(long, default_value = "1")]
        quantity: i64,
    },
    /// Set a cart line's quantity (0 removes it).
    Update {
        #[arg(long)]
        product: i64,
        #[arg(long)]
        quantity: i64,
    },
    /// Remove a product from the cart.
    Remove {
        #[arg(long)]
        product: i64,
    },
    /// Convert a cart into an order.
    Checkout {
        /// Cart ID (not the customer ID).
        #[arg(long)]
        cart: i64,
    },
}

#[derive(Debug, Subcommand)]
pub enum OrdersCmd {
    /// List all orders (admin).
    List,
    /// List a customer's orders.
    Mine {
        #[arg(long)]
        customer: i64,
    },
    /// Place an order from product:quantity pairs.
    Create {
        #[arg(long)]
        customer: i64,
        /// Order line as `<product-id>:<quantity>`, repeatable.
        #[arg(long = "item", required = true)]
        items: Vec<String>,
    },
    /// Update an order's status (admin).
    Status {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        status: String,
    },
}

/// Resolve the state directory for shopfront data.
///
/// Checks `SHOPFRONT_STATE_DIR`, then `$XDG_STATE_HOME/shopfront`,
/// then `$HOME/.local/state/shopfront`.
pub fn state_dir() -> PathBuf {
    state_dir_with(|name| std::env::var(name).ok())
}

/// Inner implementation that accepts a lookup function for testability.
fn state_dir_with(get_env: impl Fn(&str) -> Option<String>) -> PathBuf {
    if let Some(dir) = get_env("SHOPFRONT_STATE_DIR") {
        return PathBuf::from(dir);
    }
    if let Some(xdg) = get_env("XDG_STATE_HOME") {
        return PathBuf::from(xdg).join("shopfront");
    }
    if let Some(home) = get_env("HOME") {
        return PathBuf::from(home).join(".local/state/shopfront");
    }
    PathBuf::from(".shopfront")
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
