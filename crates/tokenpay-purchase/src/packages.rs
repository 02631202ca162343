// SPDX-FileCopyrightText: 2026 Tokenpay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The fixed token package catalog.

use serde::Serialize;

/// One purchasable package. The price is the only authority on what a
/// receipt for this package must show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    pub id: u32,
    pub name: &'static str,
    pub price_etb: u32,
    pub tokens: u32,
}

pub const PACKAGES: [Package; 3] = [
    Package {
        id: 1,
        name: "Starter",
        price_etb: 50,
        tokens: 50,
    },
    Package {
        id: 2,
        name: "Professional",
        price_etb: 200,
        tokens: 200,
    },
    Package {
        id: 3,
        name: "Enterprise",
        price_etb: 500,
        tokens: 500,
    },
];

/// Looks a package up by id. Accepts any integer so callers can pass
/// unvalidated input straight through.
pub fn find_package(id: i64) -> Option<&'static Package> {
    PACKAGES.iter().find(|p| i64::from(p.id) == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_ids_resolve() {
        assert_eq!(find_package(1).map(|p| p.price_etb), Some(50));
        assert_eq!(find_package(2).map(|p| p.tokens), Some(200));
        assert_eq!(find_package(3).map(|p| p.name), Some("Enterprise"));
    }

    #[test]
    fn unknown_ids_do_not_resolve() {
        for id in [0, -1, 4, i64::MAX] {
            assert!(find_package(id).is_none(), "id {id}");
        }
    }

    #[test]
    fn ids_are_unique() {
        let mut ids: Vec<u32> = PACKAGES.iter().map(|p| p.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), PACKAGES.len());
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_value(PACKAGES[0]).unwrap();
        assert_eq!(json["priceEtb"], 50);
        assert_eq!(json["name"], "Starter");
    }
}
