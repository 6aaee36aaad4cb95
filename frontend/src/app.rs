use std::fmt;

use tracing::error;

use crate::api::{ApiClient, ApiError, Product};
use crate::cart::Cart;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    Unknown,
    Healthy,
    Unhealthy,
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unknown => "unknown",
            Self::Healthy => "healthy",
            Self::Unhealthy => "unhealthy",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Add(i32),
    Cart,
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let mut words = line.split_whitespace();
        match (words.next(), words.next()) {
            (Some("list" | "ls"), None) => Self::List,
            (Some("cart"), None) => Self::Cart,
            (Some("help" | "?"), None) => Self::Help,
            (Some("quit" | "exit" | "q"), None) => Self::Quit,
            (Some("add"), Some(id)) => id
                .parse()
                .map(Self::Add)
                .unwrap_or_else(|_| Self::Unknown(line.trim().to_string())),
            _ => Self::Unknown(line.trim().to_string()),
        }
    }
}

pub const HELP: &str = "commands: list | add <id> | cart | help | quit";

/// Everything the UI shows. Products and health are fetched once at start.
#[derive(Debug)]
pub struct App {
    products: Vec<Product>,
    cart: Cart,
    health: HealthStatus,
}

impl Default for App {
    fn default() -> Self {
        Self {
            products: Vec::new(),
            cart: Cart::new(),
            health: HealthStatus::Unknown,
        }
    }
}

impl App {
    /// Fetch products and health concurrently; either may fail on its own.
    pub async fn load(client: &ApiClient) -> Self {
        let (products, health) = tokio::join!(client.products(), client.health());
        Self::from_fetch(products, health)
    }

    pub fn from_fetch(
        products: Result<Vec<Product>, ApiError>,
        health: Result<(), ApiError>,
    ) -> Self {
        let products = products.unwrap_or_else(|err| {
            error!(error = %err, "Fetching products failed");
            Vec::new()
        });
        let health = match health {
            Ok(()) => HealthStatus::Healthy,
            Err(err) => {
                error!(error = %err, "Health check failed");
                HealthStatus::Unhealthy
            }
        };

        Self {
            products,
            health,
            ..Self::default()
        }
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn health(&self) -> HealthStatus {
        self.health
    }

    /// Apply one command and return the text to show. `None` means quit.
    pub fn handle(&mut self, command: Command) -> Option<String> {
        let body = match command {
            Command::Quit => return None,
            Command::List => self.render_products(),
            Command::Cart => self.render_cart(),
            Command::Help => HELP.to_string(),
            Command::Add(id) => match self.products.iter().find(|p| p.id == id) {
                Some(product) => {
                    let line = format!("added {}", product.name);
                    self.cart.add(product.clone());
                    line
                }
                None => format!("no product with id {id}"),
            },
            Command::Unknown(input) => format!("unknown command {input:?} ({HELP})"),
        };
        Some(format!("{}\n{}", self.render_header(), body))
    }

    pub fn render_header(&self) -> String {
        format!(
            "== DevOps E-commerce Test ==\nHealth: {} | Cart: {} items",
            self.health,
            self.cart.len()
        )
    }

    pub fn render_products(&self) -> String {
        if self.products.is_empty() {
            return "(no products)".to_string();
        }
        let rows: String = self
            .products
            .iter()
            .map(|p| format!("  [{:>3}] {:<24} ${:>8}  {}\n", p.id, p.name, p.price, p.category))
            .collect();
        format!("Products\n{rows}")
    }

    pub fn render_cart(&self) -> String {
        if self.cart.is_empty() {
            return "Shopping Cart is empty".to_string();
        }
        let rows: String = self
            .cart
            .lines()
            .iter()
            .map(|item| format!("  {} - ${}\n", item.name, item.price))
            .collect();
        format!("Shopping Cart\n{rows}Total: ${}", self.cart.total())
    }
}
