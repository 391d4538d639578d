use std::env;

use anyhow::Context;

const DEFAULT_OBJECT_TYPES: &str = "Product,Category,Customer,Order,Store";

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Object types that accept dynamic properties, registered at startup
    pub dynamic_property_types: Vec<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let port = match env::var("PORT") {
            Ok(p) => p.parse().with_context(|| format!("Invalid PORT: {}", p))?,
            Err(_) => 8080,
        };

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port,
            dynamic_property_types: parse_type_list(
                &env::var("DYNAMIC_PROPERTY_TYPES")
                    .unwrap_or_else(|_| DEFAULT_OBJECT_TYPES.to_string()),
            ),
        })
    }
}

/// Split a comma separated list, dropping blanks
fn parse_type_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_type_list_trims_and_skips_blanks() {
        assert_eq!(
            parse_type_list(" Product, ,Order ,"),
            vec!["Product".to_string(), "Order".to_string()]
        );
    }

    #[test]
    fn default_types_are_parsed() {
        assert_eq!(parse_type_list(DEFAULT_OBJECT_TYPES).len(), 5);
    }
}
